//! Collaborator models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for convention_collaborators table
#[derive(Debug, Clone, FromRow)]
pub struct CollaboratorModel {
    pub id: i64,
    pub convention_id: i64,
    pub user_id: i64,
    pub title: Option<String>,
    pub rights: i32,
    pub added_by_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for collaborator_edition_permissions table
#[derive(Debug, Clone, FromRow)]
pub struct EditionPermissionModel {
    pub collaborator_id: i64,
    pub edition_id: i64,
    pub rights: i32,
}
