//! Business rules evaluated per request over loaded rows

pub mod meals;
pub mod permissions;
pub mod quotas;

pub use meals::{default_meal_plan, eligible_meals, PlannedMeal};
pub use permissions::{AccessScope, Capability};
pub use quotas::{compute_quota_stats, QuotaStats};
