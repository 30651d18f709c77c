//! Volunteer application, team and time slot models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for volunteer_applications table
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationModel {
    pub id: i64,
    pub edition_id: i64,
    pub user_id: i64,
    pub status: String,
    pub motivation: Option<String>,
    /// `YYYY-MM-DD_timeOfDay`
    pub arrival: Option<String>,
    pub departure: Option<String>,
    pub setup_availability: bool,
    pub event_availability: bool,
    pub teardown_availability: bool,
    pub team_preferences: Vec<i64>,
    pub diet: String,
    pub allergies: Option<String>,
    pub phone: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    pub decided_by_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for volunteer_teams table
#[derive(Debug, Clone, FromRow)]
pub struct TeamModel {
    pub id: i64,
    pub edition_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub max_volunteers: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for volunteer_time_slots table
#[derive(Debug, Clone, FromRow)]
pub struct TimeSlotModel {
    pub id: i64,
    pub edition_id: i64,
    pub team_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub max_volunteers: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of volunteer_assignments
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentModel {
    pub time_slot_id: i64,
    pub user_id: i64,
}
