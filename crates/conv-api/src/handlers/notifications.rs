//! Notification and web push handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use conv_core::Snowflake;
use conv_service::{
    MarkedReadResponse, NotificationResponse, NotificationService, PushConfigResponse,
    PushSubscriptionResponse, SubscribePushRequest, TestNotificationRequest,
    UnreadCountResponse, UnsubscribePushRequest,
};
use serde::Deserialize;

use crate::extractors::{AuthUser, OptionalValidatedJson, Pagination, SnowflakePath, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NotificationFilter {
    #[serde(default)]
    pub unread: bool,
}

/// Newest first
///
/// GET /notifications?unread=true
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    pagination: Pagination,
    filter: Result<Query<NotificationFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<NotificationResponse>>> {
    let Query(filter) = filter.map_err(|e| ApiError::invalid_query(e.body_text()))?;
    let service = NotificationService::new(state.service_context());
    let response = service
        .list(auth.user_id, filter.unread, pagination.page())
        .await?;
    Ok(Json(response))
}

/// GET /notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UnreadCountResponse>> {
    let service = NotificationService::new(state.service_context());
    let response = service.unread_count(auth.user_id).await?;
    Ok(Json(response))
}

/// PUT /notifications/{notification_id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(notification_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<NotificationResponse>> {
    let service = NotificationService::new(state.service_context());
    let response = service.mark_read(auth.user_id, notification_id).await?;
    Ok(Json(response))
}

/// PUT /notifications/read
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<MarkedReadResponse>> {
    let service = NotificationService::new(state.service_context());
    let response = service.mark_all_read(auth.user_id).await?;
    Ok(Json(response))
}

/// DELETE /notifications/{notification_id}
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(notification_id): SnowflakePath<Snowflake>,
) -> ApiResult<NoContent> {
    let service = NotificationService::new(state.service_context());
    service.delete(auth.user_id, notification_id).await?;
    Ok(NoContent)
}

/// Send a notification to the caller, pushed to every device they subscribed
///
/// POST /notifications/test
pub async fn send_test(
    State(state): State<AppState>,
    auth: AuthUser,
    OptionalValidatedJson(request): OptionalValidatedJson<TestNotificationRequest>,
) -> ApiResult<Created<Json<NotificationResponse>>> {
    let service = NotificationService::new(state.service_context());
    let response = service
        .send_test(auth.user_id, request.unwrap_or_default())
        .await?;
    Ok(Created(Json(response)))
}

// ============================================================================
// Push subscriptions
// ============================================================================

/// Public key browsers need to subscribe; public
///
/// GET /push/config
pub async fn push_config(State(state): State<AppState>) -> Json<PushConfigResponse> {
    let service = NotificationService::new(state.service_context());
    Json(service.push_config())
}

/// GET /push/subscriptions
pub async fn list_subscriptions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<PushSubscriptionResponse>>> {
    let service = NotificationService::new(state.service_context());
    let response = service.list_subscriptions(auth.user_id).await?;
    Ok(Json(response))
}

/// Register a browser endpoint; re-subscribing the same endpoint refreshes it
///
/// POST /push/subscriptions
pub async fn subscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<SubscribePushRequest>,
) -> ApiResult<Created<Json<PushSubscriptionResponse>>> {
    let service = NotificationService::new(state.service_context());
    let response = service.subscribe(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// DELETE /push/subscriptions
pub async fn unsubscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UnsubscribePushRequest>,
) -> ApiResult<NoContent> {
    let service = NotificationService::new(state.service_context());
    service.unsubscribe(auth.user_id, &request.endpoint).await?;
    Ok(NoContent)
}
