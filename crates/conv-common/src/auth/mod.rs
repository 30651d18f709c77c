//! Authentication utilities

mod jwt;
mod password;

pub use jwt::{Claims, IssuedTokens, JwtService, TokenPair, TokenType};
pub use password::{
    hash_password, validate_password_strength, verify_password, PasswordService,
    PASSWORD_MAX_LEN, PASSWORD_MIN_LEN,
};
