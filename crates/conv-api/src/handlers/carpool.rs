//! Carpool handlers: offers, requests and seat bookings

use axum::{extract::State, Json};
use conv_core::Snowflake;
use conv_service::{
    BookingResponse, CarpoolOfferResponse, CarpoolRequestResponse, CarpoolService,
    CreateBookingRequest, CreateCarpoolOfferRequest, CreateCarpoolRequestRequest,
    DecideBookingRequest, UpdateCarpoolOfferRequest, UpdateCarpoolRequestRequest,
};

use crate::extractors::{AuthUser, SnowflakePath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

// ============================================================================
// Offers
// ============================================================================

/// GET /editions/{edition_id}/carpool/offers
pub async fn list_offers(
    State(state): State<AppState>,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<Vec<CarpoolOfferResponse>>> {
    let service = CarpoolService::new(state.service_context());
    let response = service.list_offers(edition_id).await?;
    Ok(Json(response))
}

/// POST /editions/{edition_id}/carpool/offers
pub async fn create_offer(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<CreateCarpoolOfferRequest>,
) -> ApiResult<Created<Json<CarpoolOfferResponse>>> {
    let service = CarpoolService::new(state.service_context());
    let response = service.create_offer(edition_id, auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// GET /carpool/offers/{offer_id}
pub async fn get_offer(
    State(state): State<AppState>,
    SnowflakePath(offer_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<CarpoolOfferResponse>> {
    let service = CarpoolService::new(state.service_context());
    let response = service.get_offer(offer_id).await?;
    Ok(Json(response))
}

/// PATCH /carpool/offers/{offer_id}
pub async fn update_offer(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(offer_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<UpdateCarpoolOfferRequest>,
) -> ApiResult<Json<CarpoolOfferResponse>> {
    let service = CarpoolService::new(state.service_context());
    let response = service.update_offer(offer_id, auth.user_id, request).await?;
    Ok(Json(response))
}

/// Passengers with a live booking are notified
///
/// DELETE /carpool/offers/{offer_id}
pub async fn delete_offer(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(offer_id): SnowflakePath<Snowflake>,
) -> ApiResult<NoContent> {
    let service = CarpoolService::new(state.service_context());
    service.delete_offer(offer_id, auth.user_id).await?;
    Ok(NoContent)
}

// ============================================================================
// Requests
// ============================================================================

/// GET /editions/{edition_id}/carpool/requests
pub async fn list_requests(
    State(state): State<AppState>,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<Vec<CarpoolRequestResponse>>> {
    let service = CarpoolService::new(state.service_context());
    let response = service.list_requests(edition_id).await?;
    Ok(Json(response))
}

/// POST /editions/{edition_id}/carpool/requests
pub async fn create_request(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<CreateCarpoolRequestRequest>,
) -> ApiResult<Created<Json<CarpoolRequestResponse>>> {
    let service = CarpoolService::new(state.service_context());
    let response = service
        .create_request(edition_id, auth.user_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// GET /carpool/requests/{request_id}
pub async fn get_request(
    State(state): State<AppState>,
    SnowflakePath(request_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<CarpoolRequestResponse>> {
    let service = CarpoolService::new(state.service_context());
    let response = service.get_request(request_id).await?;
    Ok(Json(response))
}

/// PATCH /carpool/requests/{request_id}
pub async fn update_request(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(request_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<UpdateCarpoolRequestRequest>,
) -> ApiResult<Json<CarpoolRequestResponse>> {
    let service = CarpoolService::new(state.service_context());
    let response = service
        .update_request(request_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// DELETE /carpool/requests/{request_id}
pub async fn delete_request(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(request_id): SnowflakePath<Snowflake>,
) -> ApiResult<NoContent> {
    let service = CarpoolService::new(state.service_context());
    service.delete_request(request_id, auth.user_id).await?;
    Ok(NoContent)
}

// ============================================================================
// Bookings
// ============================================================================

/// Driver only
///
/// GET /carpool/offers/{offer_id}/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(offer_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<Vec<BookingResponse>>> {
    let service = CarpoolService::new(state.service_context());
    let response = service.list_bookings(offer_id, auth.user_id).await?;
    Ok(Json(response))
}

/// POST /carpool/offers/{offer_id}/bookings
pub async fn book(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(offer_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> ApiResult<Created<Json<BookingResponse>>> {
    let service = CarpoolService::new(state.service_context());
    let response = service.book(offer_id, auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// PUT /carpool/offers/{offer_id}/bookings/{booking_id}
pub async fn decide_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((offer_id, booking_id)): SnowflakePath<(Snowflake, Snowflake)>,
    ValidatedJson(request): ValidatedJson<DecideBookingRequest>,
) -> ApiResult<Json<BookingResponse>> {
    let service = CarpoolService::new(state.service_context());
    let response = service
        .decide_booking(offer_id, booking_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// DELETE /carpool/offers/{offer_id}/bookings/{booking_id}
pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((offer_id, booking_id)): SnowflakePath<(Snowflake, Snowflake)>,
) -> ApiResult<Json<BookingResponse>> {
    let service = CarpoolService::new(state.service_context());
    let response = service
        .cancel_booking(offer_id, booking_id, auth.user_id)
        .await?;
    Ok(Json(response))
}
