//! Convention collaborator - a user with partial management rights

use chrono::{DateTime, Utc};

use crate::value_objects::{CollaboratorRights, EditionRights, Snowflake};

/// Per-edition override attached to a collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditionPermission {
    pub edition_id: Snowflake,
    pub rights: EditionRights,
}

/// Collaborator entity (junction between User and Convention)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionCollaborator {
    pub id: Snowflake,
    pub convention_id: Snowflake,
    pub user_id: Snowflake,
    pub title: Option<String>,
    pub rights: CollaboratorRights,
    pub edition_permissions: Vec<EditionPermission>,
    pub added_by_id: Snowflake,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConventionCollaborator {
    #[inline]
    pub fn has(&self, right: CollaboratorRights) -> bool {
        self.rights.contains(right)
    }

    /// Override rights for one edition (empty when none recorded)
    pub fn rights_for_edition(&self, edition_id: Snowflake) -> EditionRights {
        self.edition_permissions
            .iter()
            .filter(|p| p.edition_id == edition_id)
            .fold(EditionRights::empty(), |acc, p| acc | p.rights)
    }

    /// Replace all overrides, dropping entries that grant nothing
    pub fn set_edition_permissions(&mut self, permissions: Vec<EditionPermission>) {
        self.edition_permissions = permissions
            .into_iter()
            .filter(|p| !p.rights.is_empty())
            .collect();
        self.updated_at = Utc::now();
    }

    /// True when the row grants no right at all
    pub fn is_empty(&self) -> bool {
        self.rights.is_empty() && self.edition_permissions.iter().all(|p| p.rights.is_empty())
    }
}
