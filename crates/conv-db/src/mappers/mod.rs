//! Entity to model mappers
//!
//! This module provides conversions between domain entities (conv-core) and database models.
//! - `From<Model> for Entity`: rows with no enum columns
//! - `TryFrom<Model> for Entity`: rows whose text columns must parse into domain enums;
//!   an unknown value surfaces as `DomainError::InvalidEnumValue`
//! - `*_with_*` helpers: assemble aggregates loaded from several tables

mod carpool;
mod collaborator;
mod convention;
mod meal;
mod notification;
mod ticketing;
mod user;
mod volunteer;

pub use collaborator::collaborator_with_permissions;
pub use ticketing::{order_with_items, quota_with_links, QuotaLinks};
pub use volunteer::time_slot_with_assignments;
