//! Permission service
//!
//! Loads the rows a permission decision needs (user, convention, edition,
//! collaborator entry) and evaluates them with `conv_core::rules::permissions`.

use conv_core::entities::{Convention, ConventionCollaborator, Edition, User};
use conv_core::rules::permissions::effective_edition_rights;
use conv_core::{AccessScope, Capability, EditionRights, Snowflake};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Rows loaded for one permission check
#[derive(Debug, Clone)]
pub struct AccessRows {
    pub user: User,
    pub convention: Convention,
    pub edition: Option<Edition>,
    pub collaborator: Option<ConventionCollaborator>,
}

impl AccessRows {
    pub fn scope(&self) -> AccessScope<'_> {
        let scope = AccessScope::convention(&self.user, &self.convention)
            .with_collaborator(self.collaborator.as_ref());
        match &self.edition {
            Some(edition) => scope.with_edition(edition),
            None => scope,
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        capability.allows(&self.scope())
    }

    /// # Errors
    /// Returns `PermissionDenied` naming the missing capability
    pub fn require(&self, capability: Capability) -> ServiceResult<()> {
        if self.can(capability) {
            Ok(())
        } else {
            debug!(
                user_id = %self.user.id,
                convention_id = %self.convention.id,
                right = capability.name(),
                "Permission denied"
            );
            Err(ServiceError::permission_denied(capability.name()))
        }
    }

    pub fn edition_rights(&self) -> EditionRights {
        effective_edition_rights(&self.scope())
    }

    /// The edition loaded with these rows
    ///
    /// # Errors
    /// Returns an internal error when the rows were loaded for a convention only
    pub fn edition(&self) -> ServiceResult<&Edition> {
        self.edition
            .as_ref()
            .ok_or_else(|| ServiceError::internal("edition scope expected"))
    }
}

/// Permission service for access control
pub struct PermissionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PermissionService<'a> {
    /// Create a new PermissionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn load_user(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))
    }

    #[instrument(skip(self))]
    pub async fn load_convention(&self, convention_id: Snowflake) -> ServiceResult<Convention> {
        self.ctx
            .convention_repo()
            .find_by_id(convention_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Convention", convention_id))
    }

    #[instrument(skip(self))]
    pub async fn load_edition(&self, edition_id: Snowflake) -> ServiceResult<Edition> {
        self.ctx
            .edition_repo()
            .find_by_id(edition_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Edition", edition_id))
    }

    /// Rows for a convention-level decision
    #[instrument(skip(self))]
    pub async fn convention_rows(
        &self,
        user_id: Snowflake,
        convention_id: Snowflake,
    ) -> ServiceResult<AccessRows> {
        let convention = self.load_convention(convention_id).await?;
        let user = self.load_user(user_id).await?;
        let collaborator = self
            .ctx
            .collaborator_repo()
            .find(convention_id, user_id)
            .await?;

        Ok(AccessRows {
            user,
            convention,
            edition: None,
            collaborator,
        })
    }

    /// Rows for an edition-level decision
    #[instrument(skip(self))]
    pub async fn edition_rows(
        &self,
        user_id: Snowflake,
        edition_id: Snowflake,
    ) -> ServiceResult<AccessRows> {
        let edition = self.load_edition(edition_id).await?;
        let mut rows = self.convention_rows(user_id, edition.convention_id).await?;
        rows.edition = Some(edition);
        Ok(rows)
    }

    /// Load convention rows and check `capability`
    #[instrument(skip(self))]
    pub async fn require_convention(
        &self,
        user_id: Snowflake,
        convention_id: Snowflake,
        capability: Capability,
    ) -> ServiceResult<AccessRows> {
        let rows = self.convention_rows(user_id, convention_id).await?;
        rows.require(capability)?;
        Ok(rows)
    }

    /// Load edition rows and check `capability`
    #[instrument(skip(self))]
    pub async fn require_edition(
        &self,
        user_id: Snowflake,
        edition_id: Snowflake,
        capability: Capability,
    ) -> ServiceResult<AccessRows> {
        let rows = self.edition_rows(user_id, edition_id).await?;
        rows.require(capability)?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use conv_core::{CollaboratorRights, EditionPermission};

    fn rows(collaborator_rights: CollaboratorRights) -> AccessRows {
        let now = Utc::now();
        let user = User::new(Snowflake::new(2), "vol@example.com".into(), "vol".into());
        let convention = Convention::new(Snowflake::new(10), "JuggleCon".into(), Snowflake::new(1));
        let date = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap_or_default();
        let edition = Edition {
            id: Snowflake::new(100),
            convention_id: Snowflake::new(10),
            creator_id: Snowflake::new(1),
            name: None,
            description: None,
            start_date: date,
            end_date: date,
            city: "Lyon".into(),
            country: "France".into(),
            address: None,
            image: None,
            is_online: true,
            volunteers_open: true,
            volunteer_setup_start: None,
            volunteer_teardown_end: None,
            created_at: now,
            updated_at: now,
        };
        let collaborator = ConventionCollaborator {
            id: Snowflake::new(50),
            convention_id: Snowflake::new(10),
            user_id: Snowflake::new(2),
            title: None,
            rights: collaborator_rights,
            edition_permissions: vec![EditionPermission {
                edition_id: Snowflake::new(100),
                rights: EditionRights::MANAGE_VOLUNTEERS,
            }],
            added_by_id: Snowflake::new(1),
            created_at: now,
            updated_at: now,
        };

        AccessRows {
            user,
            convention,
            edition: Some(edition),
            collaborator: Some(collaborator),
        }
    }

    #[test]
    fn test_require_reports_capability_name() {
        let rows = rows(CollaboratorRights::empty());
        let err = rows.require(Capability::EditEdition).unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert!(err.to_string().contains(Capability::EditEdition.name()));
    }

    #[test]
    fn test_override_grants_volunteer_management() {
        let rows = rows(CollaboratorRights::empty());
        assert!(rows.require(Capability::ManageVolunteers).is_ok());
        assert_eq!(rows.edition_rights(), EditionRights::MANAGE_VOLUNTEERS);
    }

    #[test]
    fn test_convention_flags_apply() {
        let rows = rows(CollaboratorRights::EDIT_ALL_EDITIONS);
        assert!(rows.can(Capability::EditEdition));
        assert!(!rows.can(Capability::DeleteEdition));
    }

    #[test]
    fn test_edition_accessor_without_edition() {
        let mut rows = rows(CollaboratorRights::empty());
        rows.edition = None;
        assert!(rows.edition().is_err());
    }
}
