//! External ticketing (HelloAsso) handlers

use axum::{extract::State, Json};
use conv_core::Snowflake;
use conv_service::{
    ConfigureExternalTicketingRequest, ConnectionTestResponse, ExternalTicketingResponse,
    ExternalTicketingService, SyncResultResponse,
};

use crate::extractors::{AuthUser, SnowflakePath, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// The secret is never returned
///
/// GET /editions/{edition_id}/ticketing/external
pub async fn get_config(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<ExternalTicketingResponse>> {
    let service = ExternalTicketingService::new(state.service_context());
    let response = service.get(edition_id, auth.user_id).await?;
    Ok(Json(response))
}

/// PUT /editions/{edition_id}/ticketing/external
pub async fn configure(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<ConfigureExternalTicketingRequest>,
) -> ApiResult<Json<ExternalTicketingResponse>> {
    let service = ExternalTicketingService::new(state.service_context());
    let response = service.configure(edition_id, auth.user_id, request).await?;
    Ok(Json(response))
}

/// DELETE /editions/{edition_id}/ticketing/external
pub async fn delete_config(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<NoContent> {
    let service = ExternalTicketingService::new(state.service_context());
    service.delete(edition_id, auth.user_id).await?;
    Ok(NoContent)
}

/// POST /editions/{edition_id}/ticketing/external/test
pub async fn test_connection(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<ConnectionTestResponse>> {
    let service = ExternalTicketingService::new(state.service_context());
    let response = service.test_connection(edition_id, auth.user_id).await?;
    Ok(Json(response))
}

/// POST /editions/{edition_id}/ticketing/external/sync
pub async fn sync(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<SyncResultResponse>> {
    let service = ExternalTicketingService::new(state.service_context());
    let response = service.sync(edition_id, auth.user_id).await?;
    Ok(Json(response))
}
