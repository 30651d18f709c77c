//! Convention and edition models

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database model for conventions table
#[derive(Debug, Clone, FromRow)]
pub struct ConventionModel {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub author_id: i64,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for editions table
#[derive(Debug, Clone, FromRow)]
pub struct EditionModel {
    pub id: i64,
    pub convention_id: i64,
    pub creator_id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub city: String,
    pub country: String,
    pub address: Option<String>,
    pub image: Option<String>,
    pub is_online: bool,
    pub volunteers_open: bool,
    pub volunteer_setup_start: Option<NaiveDate>,
    pub volunteer_teardown_end: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
