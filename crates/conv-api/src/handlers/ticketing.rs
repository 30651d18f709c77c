//! Ticketing handlers: tiers, quotas, options and orders

use axum::{extract::State, Json};
use conv_core::Snowflake;
use conv_service::{
    CreateOptionRequest, CreateOrderRequest, CreateQuotaRequest, CreateTierRequest,
    CustomFieldLinkRequest, OptionResponse, OrderResponse, PaginatedResponse, QuotaResponse,
    QuotaStatsResponse, TicketingService, TierResponse, UpdateOptionRequest, UpdateQuotaRequest,
    UpdateTierRequest,
};

use crate::extractors::{AuthUser, Pagination, SnowflakePath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

type EditionAndId = (Snowflake, Snowflake);

// ============================================================================
// Tiers
// ============================================================================

/// Active tiers, public
///
/// GET /editions/{edition_id}/ticketing/tiers
pub async fn list_tiers(
    State(state): State<AppState>,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<Vec<TierResponse>>> {
    let service = TicketingService::new(state.service_context());
    let response = service.list_tiers(edition_id).await?;
    Ok(Json(response))
}

/// POST /editions/{edition_id}/ticketing/tiers
pub async fn create_tier(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<CreateTierRequest>,
) -> ApiResult<Created<Json<TierResponse>>> {
    let service = TicketingService::new(state.service_context());
    let response = service.create_tier(edition_id, auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// PATCH /editions/{edition_id}/ticketing/tiers/{tier_id}
pub async fn update_tier(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, tier_id)): SnowflakePath<EditionAndId>,
    ValidatedJson(request): ValidatedJson<UpdateTierRequest>,
) -> ApiResult<Json<TierResponse>> {
    let service = TicketingService::new(state.service_context());
    let response = service
        .update_tier(edition_id, tier_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// DELETE /editions/{edition_id}/ticketing/tiers/{tier_id}
pub async fn delete_tier(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, tier_id)): SnowflakePath<EditionAndId>,
) -> ApiResult<NoContent> {
    let service = TicketingService::new(state.service_context());
    service.delete_tier(edition_id, tier_id, auth.user_id).await?;
    Ok(NoContent)
}

// ============================================================================
// Quotas
// ============================================================================

/// GET /editions/{edition_id}/ticketing/quotas
pub async fn list_quotas(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<Vec<QuotaResponse>>> {
    let service = TicketingService::new(state.service_context());
    let response = service.list_quotas(edition_id, auth.user_id).await?;
    Ok(Json(response))
}

/// POST /editions/{edition_id}/ticketing/quotas
pub async fn create_quota(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<CreateQuotaRequest>,
) -> ApiResult<Created<Json<QuotaResponse>>> {
    let service = TicketingService::new(state.service_context());
    let response = service
        .create_quota(edition_id, auth.user_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// PATCH /editions/{edition_id}/ticketing/quotas/{quota_id}
pub async fn update_quota(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, quota_id)): SnowflakePath<EditionAndId>,
    ValidatedJson(request): ValidatedJson<UpdateQuotaRequest>,
) -> ApiResult<Json<QuotaResponse>> {
    let service = TicketingService::new(state.service_context());
    let response = service
        .update_quota(edition_id, quota_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// DELETE /editions/{edition_id}/ticketing/quotas/{quota_id}
pub async fn delete_quota(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, quota_id)): SnowflakePath<EditionAndId>,
) -> ApiResult<NoContent> {
    let service = TicketingService::new(state.service_context());
    service.delete_quota(edition_id, quota_id, auth.user_id).await?;
    Ok(NoContent)
}

/// PUT /editions/{edition_id}/ticketing/quotas/{quota_id}/tiers/{tier_id}
pub async fn link_quota_tier(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, quota_id, tier_id)): SnowflakePath<(
        Snowflake,
        Snowflake,
        Snowflake,
    )>,
) -> ApiResult<Json<QuotaResponse>> {
    let service = TicketingService::new(state.service_context());
    let response = service
        .set_quota_tier(edition_id, quota_id, tier_id, auth.user_id, true)
        .await?;
    Ok(Json(response))
}

/// DELETE /editions/{edition_id}/ticketing/quotas/{quota_id}/tiers/{tier_id}
pub async fn unlink_quota_tier(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, quota_id, tier_id)): SnowflakePath<(
        Snowflake,
        Snowflake,
        Snowflake,
    )>,
) -> ApiResult<Json<QuotaResponse>> {
    let service = TicketingService::new(state.service_context());
    let response = service
        .set_quota_tier(edition_id, quota_id, tier_id, auth.user_id, false)
        .await?;
    Ok(Json(response))
}

/// PUT /editions/{edition_id}/ticketing/quotas/{quota_id}/options/{option_id}
pub async fn link_quota_option(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, quota_id, option_id)): SnowflakePath<(
        Snowflake,
        Snowflake,
        Snowflake,
    )>,
) -> ApiResult<Json<QuotaResponse>> {
    let service = TicketingService::new(state.service_context());
    let response = service
        .set_quota_option(edition_id, quota_id, option_id, auth.user_id, true)
        .await?;
    Ok(Json(response))
}

/// DELETE /editions/{edition_id}/ticketing/quotas/{quota_id}/options/{option_id}
pub async fn unlink_quota_option(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, quota_id, option_id)): SnowflakePath<(
        Snowflake,
        Snowflake,
        Snowflake,
    )>,
) -> ApiResult<Json<QuotaResponse>> {
    let service = TicketingService::new(state.service_context());
    let response = service
        .set_quota_option(edition_id, quota_id, option_id, auth.user_id, false)
        .await?;
    Ok(Json(response))
}

/// Count items whose custom field carries the given answer
///
/// POST /editions/{edition_id}/ticketing/quotas/{quota_id}/custom-fields
pub async fn link_quota_custom_field(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, quota_id)): SnowflakePath<EditionAndId>,
    ValidatedJson(request): ValidatedJson<CustomFieldLinkRequest>,
) -> ApiResult<Json<QuotaResponse>> {
    let service = TicketingService::new(state.service_context());
    let response = service
        .set_quota_custom_field(edition_id, quota_id, auth.user_id, request, true)
        .await?;
    Ok(Json(response))
}

/// DELETE /editions/{edition_id}/ticketing/quotas/{quota_id}/custom-fields
pub async fn unlink_quota_custom_field(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, quota_id)): SnowflakePath<EditionAndId>,
    ValidatedJson(request): ValidatedJson<CustomFieldLinkRequest>,
) -> ApiResult<Json<QuotaResponse>> {
    let service = TicketingService::new(state.service_context());
    let response = service
        .set_quota_custom_field(edition_id, quota_id, auth.user_id, request, false)
        .await?;
    Ok(Json(response))
}

/// GET /editions/{edition_id}/ticketing/quotas/stats
pub async fn quota_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<Vec<QuotaStatsResponse>>> {
    let service = TicketingService::new(state.service_context());
    let response = service.quota_stats(edition_id, auth.user_id).await?;
    Ok(Json(response))
}

// ============================================================================
// Options
// ============================================================================

/// GET /editions/{edition_id}/ticketing/options
pub async fn list_options(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<Vec<OptionResponse>>> {
    let service = TicketingService::new(state.service_context());
    let response = service.list_options(edition_id, auth.user_id).await?;
    Ok(Json(response))
}

/// POST /editions/{edition_id}/ticketing/options
pub async fn create_option(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<CreateOptionRequest>,
) -> ApiResult<Created<Json<OptionResponse>>> {
    let service = TicketingService::new(state.service_context());
    let response = service
        .create_option(edition_id, auth.user_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// PATCH /editions/{edition_id}/ticketing/options/{option_id}
pub async fn update_option(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, option_id)): SnowflakePath<EditionAndId>,
    ValidatedJson(request): ValidatedJson<UpdateOptionRequest>,
) -> ApiResult<Json<OptionResponse>> {
    let service = TicketingService::new(state.service_context());
    let response = service
        .update_option(edition_id, option_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// DELETE /editions/{edition_id}/ticketing/options/{option_id}
pub async fn delete_option(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, option_id)): SnowflakePath<EditionAndId>,
) -> ApiResult<NoContent> {
    let service = TicketingService::new(state.service_context());
    service
        .delete_option(edition_id, option_id, auth.user_id)
        .await?;
    Ok(NoContent)
}

// ============================================================================
// Orders
// ============================================================================

/// GET /editions/{edition_id}/ticketing/orders
pub async fn list_orders(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<OrderResponse>>> {
    let service = TicketingService::new(state.service_context());
    let response = service
        .list_orders(edition_id, auth.user_id, pagination.page())
        .await?;
    Ok(Json(response))
}

/// GET /editions/{edition_id}/ticketing/orders/{order_id}
pub async fn get_order(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, order_id)): SnowflakePath<EditionAndId>,
) -> ApiResult<Json<OrderResponse>> {
    let service = TicketingService::new(state.service_context());
    let response = service.get_order(edition_id, order_id, auth.user_id).await?;
    Ok(Json(response))
}

/// Record an order taken at the door
///
/// POST /editions/{edition_id}/ticketing/orders
pub async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<CreateOrderRequest>,
) -> ApiResult<Created<Json<OrderResponse>>> {
    let service = TicketingService::new(state.service_context());
    let response = service
        .create_order(edition_id, auth.user_id, request)
        .await?;
    Ok(Created(Json(response)))
}
