//! Volunteer time slot handlers

use axum::{extract::State, Json};
use conv_core::Snowflake;
use conv_service::{
    AssignVolunteerRequest, CreateTimeSlotRequest, TimeSlotResponse, TimeSlotService,
    UpdateTimeSlotRequest,
};

use crate::extractors::{AuthUser, SnowflakePath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// GET /editions/{edition_id}/volunteers/time-slots
pub async fn list_slots(
    State(state): State<AppState>,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<Vec<TimeSlotResponse>>> {
    let service = TimeSlotService::new(state.service_context());
    let response = service.list_slots(edition_id).await?;
    Ok(Json(response))
}

/// Slots the caller is assigned to
///
/// GET /editions/{edition_id}/volunteers/time-slots/@me
pub async fn list_my_slots(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<Vec<TimeSlotResponse>>> {
    let service = TimeSlotService::new(state.service_context());
    let response = service.list_my_slots(edition_id, auth.user_id).await?;
    Ok(Json(response))
}

/// POST /editions/{edition_id}/volunteers/time-slots
pub async fn create_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<CreateTimeSlotRequest>,
) -> ApiResult<Created<Json<TimeSlotResponse>>> {
    let service = TimeSlotService::new(state.service_context());
    let response = service.create_slot(edition_id, auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// PATCH /editions/{edition_id}/volunteers/time-slots/{slot_id}
pub async fn update_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, slot_id)): SnowflakePath<(Snowflake, Snowflake)>,
    ValidatedJson(request): ValidatedJson<UpdateTimeSlotRequest>,
) -> ApiResult<Json<TimeSlotResponse>> {
    let service = TimeSlotService::new(state.service_context());
    let response = service
        .update_slot(edition_id, slot_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// DELETE /editions/{edition_id}/volunteers/time-slots/{slot_id}
pub async fn delete_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, slot_id)): SnowflakePath<(Snowflake, Snowflake)>,
) -> ApiResult<NoContent> {
    let service = TimeSlotService::new(state.service_context());
    service.delete_slot(edition_id, slot_id, auth.user_id).await?;
    Ok(NoContent)
}

/// POST /editions/{edition_id}/volunteers/time-slots/{slot_id}/assignments
pub async fn assign_volunteer(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, slot_id)): SnowflakePath<(Snowflake, Snowflake)>,
    ValidatedJson(request): ValidatedJson<AssignVolunteerRequest>,
) -> ApiResult<Json<TimeSlotResponse>> {
    let service = TimeSlotService::new(state.service_context());
    let response = service
        .assign(edition_id, slot_id, auth.user_id, request.user_id)
        .await?;
    Ok(Json(response))
}

/// DELETE /editions/{edition_id}/volunteers/time-slots/{slot_id}/assignments/{user_id}
pub async fn unassign_volunteer(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, slot_id, volunteer_id)): SnowflakePath<(
        Snowflake,
        Snowflake,
        Snowflake,
    )>,
) -> ApiResult<NoContent> {
    let service = TimeSlotService::new(state.service_context());
    service
        .unassign(edition_id, slot_id, auth.user_id, volunteer_id)
        .await?;
    Ok(NoContent)
}
