//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod auth;
pub mod carpool;
pub mod collaborators;
pub mod conventions;
pub mod editions;
pub mod external_ticketing;
pub mod health;
pub mod meals;
pub mod notifications;
pub mod teams;
pub mod ticketing;
pub mod time_slots;
pub mod uploads;
pub mod users;
pub mod volunteers;
