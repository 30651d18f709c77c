//! Edition handlers
//!
//! Public reads take an optional token: managers also see offline editions
//! and every response carries the caller's effective rights.

use axum::{extract::State, Json};
use conv_core::Snowflake;
use conv_service::{
    CreateEditionRequest, EditionResponse, EditionService, EditionToggle, ToggleRequest,
    UpdateEditionRequest,
};

use crate::extractors::{AuthUser, OptionalAuthUser, Pagination, SnowflakePath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// POST /conventions/{convention_id}/editions
pub async fn create_edition(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(convention_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<CreateEditionRequest>,
) -> ApiResult<Created<Json<EditionResponse>>> {
    let service = EditionService::new(state.service_context());
    let response = service
        .create_edition(convention_id, auth.user_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// GET /conventions/{convention_id}/editions
pub async fn list_convention_editions(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    SnowflakePath(convention_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<Vec<EditionResponse>>> {
    let service = EditionService::new(state.service_context());
    let response = service
        .list_by_convention(convention_id, viewer.user_id())
        .await?;
    Ok(Json(response))
}

/// Online editions that have not ended yet
///
/// GET /editions/upcoming
pub async fn list_upcoming(
    State(state): State<AppState>,
    pagination: Pagination,
) -> ApiResult<Json<Vec<EditionResponse>>> {
    let service = EditionService::new(state.service_context());
    let response = service.list_upcoming(pagination.page()).await?;
    Ok(Json(response))
}

/// GET /editions/{edition_id}
pub async fn get_edition(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<EditionResponse>> {
    let service = EditionService::new(state.service_context());
    let response = service.get_edition(edition_id, viewer.user_id()).await?;
    Ok(Json(response))
}

/// PATCH /editions/{edition_id}
pub async fn update_edition(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<UpdateEditionRequest>,
) -> ApiResult<Json<EditionResponse>> {
    let service = EditionService::new(state.service_context());
    let response = service
        .update_edition(edition_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// PUT /editions/{edition_id}/online
pub async fn set_online(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<ToggleRequest>,
) -> ApiResult<Json<EditionResponse>> {
    let service = EditionService::new(state.service_context());
    let response = service
        .set_toggle(edition_id, auth.user_id, EditionToggle::Online, request.enabled)
        .await?;
    Ok(Json(response))
}

/// PUT /editions/{edition_id}/volunteers-open
pub async fn set_volunteers_open(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<ToggleRequest>,
) -> ApiResult<Json<EditionResponse>> {
    let service = EditionService::new(state.service_context());
    let response = service
        .set_toggle(
            edition_id,
            auth.user_id,
            EditionToggle::VolunteersOpen,
            request.enabled,
        )
        .await?;
    Ok(Json(response))
}

/// DELETE /editions/{edition_id}
pub async fn delete_edition(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<NoContent> {
    let service = EditionService::new(state.service_context());
    service.delete_edition(edition_id, auth.user_id).await?;
    Ok(NoContent)
}
