//! Volunteer meal models

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database model for volunteer_meals table
#[derive(Debug, Clone, FromRow)]
pub struct MealModel {
    pub id: i64,
    pub edition_id: i64,
    pub date: NaiveDate,
    pub meal_type: String,
    pub phase: String,
    pub enabled: bool,
}

/// Database model for volunteer_meal_selections table
#[derive(Debug, Clone, FromRow)]
pub struct MealSelectionModel {
    pub application_id: i64,
    pub meal_id: i64,
    pub accepted: bool,
    pub updated_at: DateTime<Utc>,
}

/// Aggregated number of volunteers taking a meal
#[derive(Debug, Clone, FromRow)]
pub struct MealHeadcountModel {
    pub meal_id: i64,
    pub headcount: i64,
}
