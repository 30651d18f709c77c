//! # conv-common
//!
//! Shared utilities: configuration, error handling, authentication,
//! telemetry and request rate limiting.

pub mod auth;
pub mod config;
pub mod error;
pub mod rate_limit;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    hash_password, validate_password_strength, verify_password, Claims, IssuedTokens,
    JwtService, PasswordService, TokenPair, TokenType,
};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment,
    HelloAssoConfig, JwtConfig, PushConfig, RateLimitConfig, ServerConfig, SnowflakeConfig,
    StorageConfig, WindowLimitConfig,
};
pub use error::AppError;
pub use rate_limit::{RateDecision, SlidingWindowLimiter};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
