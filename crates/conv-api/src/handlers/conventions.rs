//! Convention handlers

use axum::{extract::State, Json};
use conv_core::Snowflake;
use conv_service::{
    ConventionResponse, ConventionService, CreateConventionRequest, ToggleRequest,
    UpdateConventionRequest,
};

use crate::extractors::{AuthUser, Pagination, SnowflakePath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// POST /conventions
pub async fn create_convention(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateConventionRequest>,
) -> ApiResult<Created<Json<ConventionResponse>>> {
    let service = ConventionService::new(state.service_context());
    let response = service.create_convention(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// Non-archived conventions, public
///
/// GET /conventions
pub async fn list_conventions(
    State(state): State<AppState>,
    pagination: Pagination,
) -> ApiResult<Json<Vec<ConventionResponse>>> {
    let service = ConventionService::new(state.service_context());
    let response = service.list_conventions(pagination.page()).await?;
    Ok(Json(response))
}

/// Conventions the caller authored or collaborates on
///
/// GET /conventions/@me
pub async fn list_my_conventions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ConventionResponse>>> {
    let service = ConventionService::new(state.service_context());
    let response = service.list_my_conventions(auth.user_id).await?;
    Ok(Json(response))
}

/// GET /conventions/{convention_id}
pub async fn get_convention(
    State(state): State<AppState>,
    SnowflakePath(convention_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<ConventionResponse>> {
    let service = ConventionService::new(state.service_context());
    let response = service.get_convention(convention_id).await?;
    Ok(Json(response))
}

/// PATCH /conventions/{convention_id}
pub async fn update_convention(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(convention_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<UpdateConventionRequest>,
) -> ApiResult<Json<ConventionResponse>> {
    let service = ConventionService::new(state.service_context());
    let response = service
        .update_convention(convention_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// PUT /conventions/{convention_id}/archived
pub async fn set_archived(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(convention_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<ToggleRequest>,
) -> ApiResult<Json<ConventionResponse>> {
    let service = ConventionService::new(state.service_context());
    let response = service
        .set_archived(convention_id, auth.user_id, request.enabled)
        .await?;
    Ok(Json(response))
}

/// DELETE /conventions/{convention_id}
pub async fn delete_convention(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(convention_id): SnowflakePath<Snowflake>,
) -> ApiResult<NoContent> {
    let service = ConventionService::new(state.service_context());
    service.delete_convention(convention_id, auth.user_id).await?;
    Ok(NoContent)
}
