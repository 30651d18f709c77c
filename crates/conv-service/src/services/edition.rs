//! Edition service
//!
//! Handles editions of a convention: creation, listing, updates, the online
//! and volunteers-open toggles, and deletion.

use chrono::Utc;
use conv_core::entities::Edition;
use conv_core::{Capability, DomainError, Page, Snowflake};
use tracing::{info, instrument};

use crate::dto::{CreateEditionRequest, EditionResponse, UpdateEditionRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::permission::{AccessRows, PermissionService};

/// Edition response carrying the caller's effective rights
fn with_rights(edition: &Edition, rows: &AccessRows) -> EditionResponse {
    let mut response = EditionResponse::from(edition);
    response.rights = Some(rows.edition_rights().list());
    response
}

/// Which of the edition toggles to flip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditionToggle {
    Online,
    VolunteersOpen,
}

/// Edition service
pub struct EditionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EditionService<'a> {
    /// Create a new EditionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request))]
    pub async fn create_edition(
        &self,
        convention_id: Snowflake,
        user_id: Snowflake,
        request: CreateEditionRequest,
    ) -> ServiceResult<EditionResponse> {
        let rows = PermissionService::new(self.ctx)
            .require_convention(user_id, convention_id, Capability::AddEdition)
            .await?;
        if rows.convention.is_archived {
            return Err(DomainError::ConventionArchived.into());
        }

        let now = Utc::now();
        let edition = Edition {
            id: self.ctx.generate_id(),
            convention_id,
            creator_id: user_id,
            name: request.name,
            description: request.description,
            start_date: request.start_date,
            end_date: request.end_date,
            city: request.city,
            country: request.country,
            address: request.address,
            image: request.image,
            is_online: request.is_online,
            volunteers_open: false,
            volunteer_setup_start: request.volunteer_setup_start,
            volunteer_teardown_end: request.volunteer_teardown_end,
            created_at: now,
            updated_at: now,
        };
        edition.validate_dates()?;

        self.ctx.edition_repo().create(&edition).await?;

        info!(edition_id = %edition.id, convention_id = %convention_id, "Edition created");

        let rows = AccessRows {
            edition: Some(edition.clone()),
            ..rows
        };
        Ok(with_rights(&edition, &rows))
    }

    /// Online editions for everyone, every edition for users with management access
    #[instrument(skip(self))]
    pub async fn list_by_convention(
        &self,
        convention_id: Snowflake,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<Vec<EditionResponse>> {
        let permissions = PermissionService::new(self.ctx);
        let editions = self.ctx.edition_repo().find_by_convention(convention_id).await?;

        let Some(viewer_id) = viewer else {
            permissions.load_convention(convention_id).await?;
            return Ok(editions
                .iter()
                .filter(|e| e.is_online)
                .map(EditionResponse::from)
                .collect());
        };

        let mut rows = permissions.convention_rows(viewer_id, convention_id).await?;
        let mut responses = Vec::with_capacity(editions.len());
        for edition in editions {
            rows.edition = Some(edition);
            let edition = rows.edition()?;
            if edition.is_online || rows.can(Capability::AccessManagement) {
                responses.push(with_rights(edition, &rows));
            }
        }
        Ok(responses)
    }

    /// Online editions that have not ended yet
    #[instrument(skip(self))]
    pub async fn list_upcoming(&self, page: Page) -> ServiceResult<Vec<EditionResponse>> {
        let today = Utc::now().date_naive();
        let editions = self.ctx.edition_repo().find_upcoming(today, page).await?;
        Ok(editions.iter().map(EditionResponse::from).collect())
    }

    /// Offline editions are only visible to users with management access
    #[instrument(skip(self))]
    pub async fn get_edition(
        &self,
        edition_id: Snowflake,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<EditionResponse> {
        let permissions = PermissionService::new(self.ctx);
        match viewer {
            Some(user_id) => {
                let rows = permissions.edition_rows(user_id, edition_id).await?;
                let edition = rows.edition()?;
                if !edition.is_online && !rows.can(Capability::AccessManagement) {
                    return Err(DomainError::EditionNotFound(edition_id).into());
                }
                Ok(with_rights(edition, &rows))
            }
            None => {
                let edition = permissions.load_edition(edition_id).await?;
                if !edition.is_online {
                    return Err(DomainError::EditionNotFound(edition_id).into());
                }
                Ok(EditionResponse::from(&edition))
            }
        }
    }

    #[instrument(skip(self, request))]
    pub async fn update_edition(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
        request: UpdateEditionRequest,
    ) -> ServiceResult<EditionResponse> {
        let rows = PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::EditEdition)
            .await?;
        let mut edition = rows.edition()?.clone();

        if let Some(name) = request.name {
            edition.name = Some(name);
        }
        if let Some(description) = request.description {
            edition.description = Some(description);
        }
        if let Some(start_date) = request.start_date {
            edition.start_date = start_date;
        }
        if let Some(end_date) = request.end_date {
            edition.end_date = end_date;
        }
        if let Some(city) = request.city {
            edition.city = city;
        }
        if let Some(country) = request.country {
            edition.country = country;
        }
        if let Some(address) = request.address {
            edition.address = Some(address);
        }
        if let Some(image) = request.image {
            edition.image = Some(image);
        }
        if let Some(setup) = request.volunteer_setup_start {
            edition.volunteer_setup_start = Some(setup);
        }
        if let Some(teardown) = request.volunteer_teardown_end {
            edition.volunteer_teardown_end = Some(teardown);
        }
        edition.validate_dates()?;
        edition.updated_at = Utc::now();

        self.ctx.edition_repo().update(&edition).await?;

        info!(edition_id = %edition_id, "Edition updated");

        Ok(with_rights(&edition, &rows))
    }

    #[instrument(skip(self))]
    pub async fn set_toggle(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
        toggle: EditionToggle,
        enabled: bool,
    ) -> ServiceResult<EditionResponse> {
        let rows = PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::EditEdition)
            .await?;
        let mut edition = rows.edition()?.clone();

        match toggle {
            EditionToggle::Online => edition.is_online = enabled,
            EditionToggle::VolunteersOpen => edition.volunteers_open = enabled,
        }
        edition.updated_at = Utc::now();

        self.ctx.edition_repo().update(&edition).await?;

        info!(edition_id = %edition_id, ?toggle, enabled, "Edition toggle changed");

        Ok(with_rights(&edition, &rows))
    }

    #[instrument(skip(self))]
    pub async fn delete_edition(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::DeleteEdition)
            .await?;

        self.ctx.edition_repo().delete(edition_id).await?;

        info!(edition_id = %edition_id, "Edition deleted");

        Ok(())
    }
}
