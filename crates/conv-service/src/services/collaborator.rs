//! Collaborator service
//!
//! Grants, updates and revokes partial management rights on a convention.
//! Edition overrides are always replaced as a whole.

use std::collections::HashMap;

use chrono::Utc;
use conv_core::entities::{ConventionCollaborator, EditionPermission};
use conv_core::{
    Capability, CollaboratorRights, DomainError, EditionRights, NotificationType, Snowflake,
};
use tracing::{info, instrument};

use crate::dto::{
    AddCollaboratorRequest, CollaboratorResponse, EditionPermissionInput, PublicUserResponse,
    UpdateCollaboratorRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::notification::NotificationService;
use super::permission::PermissionService;

/// Parse override inputs, dropping empty rights and merging duplicates
fn parse_edition_permissions(
    inputs: &[EditionPermissionInput],
) -> ServiceResult<Vec<EditionPermission>> {
    let mut merged: Vec<EditionPermission> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let rights = EditionRights::from_names(&input.rights)?;
        match merged.iter_mut().find(|p| p.edition_id == input.edition_id) {
            Some(existing) => existing.rights |= rights,
            None => merged.push(EditionPermission {
                edition_id: input.edition_id,
                rights,
            }),
        }
    }
    merged.retain(|p| !p.rights.is_empty());
    Ok(merged)
}

/// How the user to add is identified
#[derive(Debug, PartialEq, Eq)]
enum CollaboratorTarget<'r> {
    Id(Snowflake),
    Email(&'r str),
}

fn collaborator_target(request: &AddCollaboratorRequest) -> ServiceResult<CollaboratorTarget<'_>> {
    match (request.user_id, request.email.as_deref().map(str::trim)) {
        (Some(user_id), None) => Ok(CollaboratorTarget::Id(user_id)),
        (None, Some(email)) if !email.is_empty() => Ok(CollaboratorTarget::Email(email)),
        _ => Err(ServiceError::validation("Exactly one of user_id or email is required")),
    }
}

/// Collaborator service
pub struct CollaboratorService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CollaboratorService<'a> {
    /// Create a new CollaboratorService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Overrides may only target editions of the same convention
    async fn check_override_editions(
        &self,
        convention_id: Snowflake,
        permissions: &[EditionPermission],
    ) -> ServiceResult<()> {
        if permissions.is_empty() {
            return Ok(());
        }
        let editions = self.ctx.edition_repo().find_by_convention(convention_id).await?;
        for permission in permissions {
            if !editions.iter().any(|e| e.id == permission.edition_id) {
                return Err(DomainError::EditionNotFound(permission.edition_id).into());
            }
        }
        Ok(())
    }

    async fn with_users(
        &self,
        collaborators: &[ConventionCollaborator],
    ) -> ServiceResult<Vec<CollaboratorResponse>> {
        let ids: Vec<Snowflake> = collaborators.iter().map(|c| c.user_id).collect();
        let users: HashMap<Snowflake, PublicUserResponse> = self
            .ctx
            .user_repo()
            .find_by_ids(&ids)
            .await?
            .iter()
            .map(|u| (u.id, PublicUserResponse::from(u)))
            .collect();

        Ok(collaborators
            .iter()
            .map(|c| {
                let mut response = CollaboratorResponse::from(c);
                response.user = users.get(&c.user_id).cloned();
                response
            })
            .collect())
    }

    /// Anyone with some management access may see the team
    #[instrument(skip(self))]
    pub async fn list_collaborators(
        &self,
        convention_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<CollaboratorResponse>> {
        PermissionService::new(self.ctx)
            .require_convention(user_id, convention_id, Capability::AccessManagement)
            .await?;

        let collaborators = self
            .ctx
            .collaborator_repo()
            .find_by_convention(convention_id)
            .await?;
        self.with_users(&collaborators).await
    }

    #[instrument(skip(self, request))]
    pub async fn add_collaborator(
        &self,
        convention_id: Snowflake,
        actor_id: Snowflake,
        request: AddCollaboratorRequest,
    ) -> ServiceResult<CollaboratorResponse> {
        let rows = PermissionService::new(self.ctx)
            .require_convention(actor_id, convention_id, Capability::ManageCollaborators)
            .await?;

        let target = match collaborator_target(&request)? {
            CollaboratorTarget::Id(user_id) => self.ctx.user_repo().find_by_id(user_id).await?,
            CollaboratorTarget::Email(email) => self.ctx.user_repo().find_by_email(email).await?,
        }
        .ok_or_else(|| {
            ServiceError::not_found(
                "User",
                request
                    .user_id
                    .map_or_else(|| request.email.clone().unwrap_or_default(), |id| id.to_string()),
            )
        })?;

        if rows.convention.is_author(target.id) {
            return Err(DomainError::AuthorCannotBeCollaborator.into());
        }
        if self
            .ctx
            .collaborator_repo()
            .find(convention_id, target.id)
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadyCollaborator.into());
        }

        let rights = CollaboratorRights::from_names(&request.rights)?;
        let edition_permissions = parse_edition_permissions(&request.edition_permissions)?;
        self.check_override_editions(convention_id, &edition_permissions)
            .await?;

        let now = Utc::now();
        let collaborator = ConventionCollaborator {
            id: self.ctx.generate_id(),
            convention_id,
            user_id: target.id,
            title: request.title,
            rights,
            edition_permissions,
            added_by_id: actor_id,
            created_at: now,
            updated_at: now,
        };
        self.ctx.collaborator_repo().create(&collaborator).await?;

        info!(
            convention_id = %convention_id,
            user_id = %target.id,
            rights = %rights.to_i32(),
            "Collaborator added"
        );

        let notifications = NotificationService::new(self.ctx);
        notifications
            .send(
                notifications
                    .build(
                        target.id,
                        NotificationType::Info,
                        "New collaboration",
                        format!(
                            "You were added as a collaborator of {}",
                            rows.convention.name
                        ),
                    )
                    .with_category("collaborator")
                    .with_entity("convention", convention_id)
                    .with_action_url(format!("/conventions/{convention_id}")),
            )
            .await;

        let mut response = CollaboratorResponse::from(&collaborator);
        response.user = Some(PublicUserResponse::from(&target));
        Ok(response)
    }

    /// Replace rights and every edition override in one write
    #[instrument(skip(self, request))]
    pub async fn update_collaborator(
        &self,
        convention_id: Snowflake,
        collaborator_id: Snowflake,
        actor_id: Snowflake,
        request: UpdateCollaboratorRequest,
    ) -> ServiceResult<CollaboratorResponse> {
        PermissionService::new(self.ctx)
            .require_convention(actor_id, convention_id, Capability::ManageCollaborators)
            .await?;

        let mut collaborator = self.find_in(convention_id, collaborator_id).await?;

        let edition_permissions = parse_edition_permissions(&request.edition_permissions)?;
        self.check_override_editions(convention_id, &edition_permissions)
            .await?;

        collaborator.rights = CollaboratorRights::from_names(&request.rights)?;
        collaborator.set_edition_permissions(edition_permissions);
        if request.title.is_some() {
            collaborator.title = request.title;
        }
        collaborator.updated_at = Utc::now();

        self.ctx.collaborator_repo().update(&collaborator).await?;

        info!(
            convention_id = %convention_id,
            collaborator_id = %collaborator_id,
            "Collaborator updated"
        );

        let mut responses = self.with_users(std::slice::from_ref(&collaborator)).await?;
        responses
            .pop()
            .ok_or_else(|| ServiceError::internal("collaborator response missing"))
    }

    #[instrument(skip(self))]
    pub async fn remove_collaborator(
        &self,
        convention_id: Snowflake,
        collaborator_id: Snowflake,
        actor_id: Snowflake,
    ) -> ServiceResult<()> {
        PermissionService::new(self.ctx)
            .require_convention(actor_id, convention_id, Capability::ManageCollaborators)
            .await?;

        self.find_in(convention_id, collaborator_id).await?;
        self.ctx.collaborator_repo().delete(collaborator_id).await?;

        info!(
            convention_id = %convention_id,
            collaborator_id = %collaborator_id,
            "Collaborator removed"
        );

        Ok(())
    }

    async fn find_in(
        &self,
        convention_id: Snowflake,
        collaborator_id: Snowflake,
    ) -> ServiceResult<ConventionCollaborator> {
        self.ctx
            .collaborator_repo()
            .find_by_id(collaborator_id)
            .await?
            .filter(|c| c.convention_id == convention_id)
            .ok_or_else(|| DomainError::CollaboratorNotFound.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(edition: i64, rights: &[&str]) -> EditionPermissionInput {
        EditionPermissionInput {
            edition_id: Snowflake::new(edition),
            rights: rights.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_parse_merges_and_drops_empty() {
        let parsed = parse_edition_permissions(&[
            input(1, &["EDIT"]),
            input(2, &[]),
            input(1, &["MANAGE_VOLUNTEERS"]),
        ])
        .unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].edition_id, Snowflake::new(1));
        assert_eq!(
            parsed[0].rights,
            EditionRights::EDIT | EditionRights::MANAGE_VOLUNTEERS
        );
    }

    #[test]
    fn test_parse_rejects_unknown_right() {
        let err = parse_edition_permissions(&[input(1, &["FLY"])]).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    fn add_request(user_id: Option<i64>, email: Option<&str>) -> AddCollaboratorRequest {
        AddCollaboratorRequest {
            user_id: user_id.map(Snowflake::new),
            email: email.map(ToString::to_string),
            title: None,
            rights: Vec::new(),
            edition_permissions: Vec::new(),
        }
    }

    #[test]
    fn test_target_needs_exactly_one_identifier() {
        assert_eq!(
            collaborator_target(&add_request(Some(4), None)).unwrap(),
            CollaboratorTarget::Id(Snowflake::new(4))
        );
        assert_eq!(
            collaborator_target(&add_request(None, Some(" a@b.test "))).unwrap(),
            CollaboratorTarget::Email("a@b.test")
        );

        for request in [
            add_request(Some(4), Some("a@b.test")),
            add_request(None, None),
            add_request(None, Some("  ")),
        ] {
            assert_eq!(collaborator_target(&request).unwrap_err().status_code(), 400);
        }
    }
}
