//! Collaborator handlers

use axum::{extract::State, Json};
use conv_core::Snowflake;
use conv_service::{
    AddCollaboratorRequest, CollaboratorResponse, CollaboratorService, UpdateCollaboratorRequest,
};

use crate::extractors::{AuthUser, SnowflakePath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// GET /conventions/{convention_id}/collaborators
pub async fn list_collaborators(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(convention_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<Vec<CollaboratorResponse>>> {
    let service = CollaboratorService::new(state.service_context());
    let response = service
        .list_collaborators(convention_id, auth.user_id)
        .await?;
    Ok(Json(response))
}

/// POST /conventions/{convention_id}/collaborators
pub async fn add_collaborator(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(convention_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<AddCollaboratorRequest>,
) -> ApiResult<Created<Json<CollaboratorResponse>>> {
    let service = CollaboratorService::new(state.service_context());
    let response = service
        .add_collaborator(convention_id, auth.user_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// Replace rights and edition overrides
///
/// PUT /conventions/{convention_id}/collaborators/{collaborator_id}
pub async fn update_collaborator(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((convention_id, collaborator_id)): SnowflakePath<(Snowflake, Snowflake)>,
    ValidatedJson(request): ValidatedJson<UpdateCollaboratorRequest>,
) -> ApiResult<Json<CollaboratorResponse>> {
    let service = CollaboratorService::new(state.service_context());
    let response = service
        .update_collaborator(convention_id, collaborator_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// DELETE /conventions/{convention_id}/collaborators/{collaborator_id}
pub async fn remove_collaborator(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((convention_id, collaborator_id)): SnowflakePath<(Snowflake, Snowflake)>,
) -> ApiResult<NoContent> {
    let service = CollaboratorService::new(state.service_context());
    service
        .remove_collaborator(convention_id, collaborator_id, auth.user_id)
        .await?;
    Ok(NoContent)
}
