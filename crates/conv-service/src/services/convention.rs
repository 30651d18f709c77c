//! Convention service
//!
//! Handles convention creation, management, and listing.

use chrono::Utc;
use conv_core::entities::Convention;
use conv_core::{Capability, Page, Snowflake};
use tracing::{info, instrument};

use crate::dto::{ConventionResponse, CreateConventionRequest, UpdateConventionRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::permission::PermissionService;

/// Convention service
pub struct ConventionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ConventionService<'a> {
    /// Create a new ConventionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a convention authored by the caller
    #[instrument(skip(self, request))]
    pub async fn create_convention(
        &self,
        author_id: Snowflake,
        request: CreateConventionRequest,
    ) -> ServiceResult<ConventionResponse> {
        let mut convention =
            Convention::new(self.ctx.generate_id(), request.name.trim().to_string(), author_id);
        convention.description = request.description;
        convention.logo = request.logo;

        self.ctx.convention_repo().create(&convention).await?;

        info!(convention_id = %convention.id, author_id = %author_id, "Convention created");

        Ok(ConventionResponse::from(&convention))
    }

    /// Public listing of non-archived conventions
    #[instrument(skip(self))]
    pub async fn list_conventions(&self, page: Page) -> ServiceResult<Vec<ConventionResponse>> {
        let conventions = self.ctx.convention_repo().list_active(page).await?;
        Ok(conventions.iter().map(ConventionResponse::from).collect())
    }

    /// Conventions the user authored or collaborates on
    #[instrument(skip(self))]
    pub async fn list_my_conventions(
        &self,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<ConventionResponse>> {
        let conventions = self.ctx.convention_repo().find_for_user(user_id).await?;
        Ok(conventions.iter().map(ConventionResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_convention(
        &self,
        convention_id: Snowflake,
    ) -> ServiceResult<ConventionResponse> {
        let convention = PermissionService::new(self.ctx)
            .load_convention(convention_id)
            .await?;
        Ok(ConventionResponse::from(&convention))
    }

    #[instrument(skip(self, request))]
    pub async fn update_convention(
        &self,
        convention_id: Snowflake,
        user_id: Snowflake,
        request: UpdateConventionRequest,
    ) -> ServiceResult<ConventionResponse> {
        let rows = PermissionService::new(self.ctx)
            .require_convention(user_id, convention_id, Capability::EditConvention)
            .await?;
        let mut convention = rows.convention;

        if let Some(name) = request.name {
            convention.name = name.trim().to_string();
        }
        if let Some(description) = request.description {
            convention.description = Some(description);
        }
        if let Some(logo) = request.logo {
            convention.logo = Some(logo);
        }
        convention.updated_at = Utc::now();

        self.ctx.convention_repo().update(&convention).await?;

        info!(convention_id = %convention_id, "Convention updated");

        Ok(ConventionResponse::from(&convention))
    }

    /// Archive or unarchive
    #[instrument(skip(self))]
    pub async fn set_archived(
        &self,
        convention_id: Snowflake,
        user_id: Snowflake,
        archived: bool,
    ) -> ServiceResult<ConventionResponse> {
        let rows = PermissionService::new(self.ctx)
            .require_convention(user_id, convention_id, Capability::EditConvention)
            .await?;
        let mut convention = rows.convention;
        convention.set_archived(archived);

        self.ctx.convention_repo().update(&convention).await?;

        info!(convention_id = %convention_id, archived, "Convention archive flag changed");

        Ok(ConventionResponse::from(&convention))
    }

    /// Hard delete; editions and their data cascade
    #[instrument(skip(self))]
    pub async fn delete_convention(
        &self,
        convention_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        PermissionService::new(self.ctx)
            .require_convention(user_id, convention_id, Capability::DeleteConvention)
            .await?;

        self.ctx.convention_repo().delete(convention_id).await?;

        info!(convention_id = %convention_id, "Convention deleted");

        Ok(())
    }
}
