//! Volunteer application handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use conv_core::Snowflake;
use conv_service::{
    ApplicationResponse, ApplyVolunteerRequest, DecideApplicationRequest, VolunteerService,
};
use serde::Deserialize;

use crate::extractors::{AuthUser, SnowflakePath, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ApplicationFilter {
    pub status: Option<String>,
}

/// POST /editions/{edition_id}/volunteers/applications
pub async fn apply(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<ApplyVolunteerRequest>,
) -> ApiResult<Created<Json<ApplicationResponse>>> {
    let service = VolunteerService::new(state.service_context());
    let response = service.apply(edition_id, auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// GET /editions/{edition_id}/volunteers/applications/@me
pub async fn get_own_application(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<ApplicationResponse>> {
    let service = VolunteerService::new(state.service_context());
    let response = service.get_own(edition_id, auth.user_id).await?;
    Ok(Json(response))
}

/// Withdraw a pending application
///
/// DELETE /editions/{edition_id}/volunteers/applications/@me
pub async fn withdraw_application(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<NoContent> {
    let service = VolunteerService::new(state.service_context());
    service.withdraw(edition_id, auth.user_id).await?;
    Ok(NoContent)
}

/// GET /editions/{edition_id}/volunteers/applications?status=PENDING
pub async fn list_applications(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
    filter: Result<Query<ApplicationFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<ApplicationResponse>>> {
    let Query(filter) = filter.map_err(|e| ApiError::invalid_query(e.body_text()))?;
    let service = VolunteerService::new(state.service_context());
    let response = service
        .list_applications(edition_id, auth.user_id, filter.status.as_deref())
        .await?;
    Ok(Json(response))
}

/// Accept or reject an application
///
/// PUT /editions/{edition_id}/volunteers/applications/{application_id}
pub async fn decide_application(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, application_id)): SnowflakePath<(Snowflake, Snowflake)>,
    ValidatedJson(request): ValidatedJson<DecideApplicationRequest>,
) -> ApiResult<Json<ApplicationResponse>> {
    let service = VolunteerService::new(state.service_context());
    let response = service
        .decide(edition_id, application_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}
