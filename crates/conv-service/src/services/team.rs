//! Volunteer team service

use chrono::Utc;
use conv_core::entities::VolunteerTeam;
use conv_core::{Capability, DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{CreateTeamRequest, TeamResponse, UpdateTeamRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::permission::PermissionService;

pub const DEFAULT_TEAM_COLOR: &str = "#6366f1";

/// Volunteer team service
pub struct TeamService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TeamService<'a> {
    /// Create a new TeamService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn list_teams(&self, edition_id: Snowflake) -> ServiceResult<Vec<TeamResponse>> {
        PermissionService::new(self.ctx).load_edition(edition_id).await?;
        let teams = self.ctx.team_repo().find_by_edition(edition_id).await?;
        Ok(teams.iter().map(TeamResponse::from).collect())
    }

    #[instrument(skip(self, request))]
    pub async fn create_team(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
        request: CreateTeamRequest,
    ) -> ServiceResult<TeamResponse> {
        PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::ManageVolunteers)
            .await?;

        let name = request.name.trim().to_string();
        if self.ctx.team_repo().name_exists(edition_id, &name, None).await? {
            return Err(DomainError::TeamNameTaken.into());
        }

        let now = Utc::now();
        let team = VolunteerTeam {
            id: self.ctx.generate_id(),
            edition_id,
            name,
            description: request.description,
            color: request
                .color
                .unwrap_or_else(|| DEFAULT_TEAM_COLOR.to_string()),
            max_volunteers: request.max_volunteers,
            created_at: now,
            updated_at: now,
        };
        self.ctx.team_repo().create(&team).await?;

        info!(team_id = %team.id, edition_id = %edition_id, "Volunteer team created");

        Ok(TeamResponse::from(&team))
    }

    #[instrument(skip(self, request))]
    pub async fn update_team(
        &self,
        edition_id: Snowflake,
        team_id: Snowflake,
        user_id: Snowflake,
        request: UpdateTeamRequest,
    ) -> ServiceResult<TeamResponse> {
        PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::ManageVolunteers)
            .await?;
        let mut team = self.find_in(edition_id, team_id).await?;

        if let Some(name) = request.name {
            let name = name.trim().to_string();
            if self
                .ctx
                .team_repo()
                .name_exists(edition_id, &name, Some(team_id))
                .await?
            {
                return Err(DomainError::TeamNameTaken.into());
            }
            team.name = name;
        }
        if let Some(description) = request.description {
            team.description = Some(description);
        }
        if let Some(color) = request.color {
            team.color = color;
        }
        if let Some(max) = request.max_volunteers {
            team.max_volunteers = Some(max);
        }
        team.updated_at = Utc::now();

        self.ctx.team_repo().update(&team).await?;

        info!(team_id = %team_id, "Volunteer team updated");

        Ok(TeamResponse::from(&team))
    }

    #[instrument(skip(self))]
    pub async fn delete_team(
        &self,
        edition_id: Snowflake,
        team_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::ManageVolunteers)
            .await?;
        self.find_in(edition_id, team_id).await?;

        self.ctx.team_repo().delete(team_id).await?;

        info!(team_id = %team_id, "Volunteer team deleted");

        Ok(())
    }

    async fn find_in(
        &self,
        edition_id: Snowflake,
        team_id: Snowflake,
    ) -> ServiceResult<VolunteerTeam> {
        self.ctx
            .team_repo()
            .find_by_id(team_id)
            .await?
            .filter(|t| t.edition_id == edition_id)
            .ok_or_else(|| DomainError::TeamNotFound(team_id).into())
    }
}
