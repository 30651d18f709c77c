//! Volunteer team handlers

use axum::{extract::State, Json};
use conv_core::Snowflake;
use conv_service::{CreateTeamRequest, TeamResponse, TeamService, UpdateTeamRequest};

use crate::extractors::{AuthUser, SnowflakePath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// GET /editions/{edition_id}/volunteers/teams
pub async fn list_teams(
    State(state): State<AppState>,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<Vec<TeamResponse>>> {
    let service = TeamService::new(state.service_context());
    let response = service.list_teams(edition_id).await?;
    Ok(Json(response))
}

/// POST /editions/{edition_id}/volunteers/teams
pub async fn create_team(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<CreateTeamRequest>,
) -> ApiResult<Created<Json<TeamResponse>>> {
    let service = TeamService::new(state.service_context());
    let response = service.create_team(edition_id, auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// PATCH /editions/{edition_id}/volunteers/teams/{team_id}
pub async fn update_team(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, team_id)): SnowflakePath<(Snowflake, Snowflake)>,
    ValidatedJson(request): ValidatedJson<UpdateTeamRequest>,
) -> ApiResult<Json<TeamResponse>> {
    let service = TeamService::new(state.service_context());
    let response = service
        .update_team(edition_id, team_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// DELETE /editions/{edition_id}/volunteers/teams/{team_id}
pub async fn delete_team(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, team_id)): SnowflakePath<(Snowflake, Snowflake)>,
) -> ApiResult<NoContent> {
    let service = TeamService::new(state.service_context());
    service.delete_team(edition_id, team_id, auth.user_id).await?;
    Ok(NoContent)
}
