//! # conv-service
//!
//! Application layer containing business logic, services, DTOs and the
//! outbound integrations (HelloAsso, push relay, upload storage).

pub mod dto;
pub mod integrations;
pub mod services;

pub use dto::*;
pub use services::*;
