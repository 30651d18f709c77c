//! Volunteer meal handlers

use axum::{extract::State, Json};
use conv_core::Snowflake;
use conv_service::{
    MealHeadcountResponse, MealPlanResponse, MealResponse, MealService, ToggleRequest,
    UpdateMealSelectionsRequest, VolunteerMealResponse,
};

use crate::extractors::{AuthUser, SnowflakePath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Create the meal grid for every edition day; existing meals are kept
///
/// POST /editions/{edition_id}/volunteers/meals
pub async fn init_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<MealPlanResponse>> {
    let service = MealService::new(state.service_context());
    let response = service.init_plan(edition_id, auth.user_id).await?;
    Ok(Json(response))
}

/// GET /editions/{edition_id}/volunteers/meals
pub async fn list_meals(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<Vec<MealResponse>>> {
    let service = MealService::new(state.service_context());
    let response = service.list_meals(edition_id, auth.user_id).await?;
    Ok(Json(response))
}

/// PUT /editions/{edition_id}/volunteers/meals/{meal_id}/enabled
pub async fn set_meal_enabled(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath((edition_id, meal_id)): SnowflakePath<(Snowflake, Snowflake)>,
    ValidatedJson(request): ValidatedJson<ToggleRequest>,
) -> ApiResult<Json<MealResponse>> {
    let service = MealService::new(state.service_context());
    let response = service
        .set_enabled(edition_id, meal_id, auth.user_id, request.enabled)
        .await?;
    Ok(Json(response))
}

/// GET /editions/{edition_id}/volunteers/meals/@me
pub async fn my_meals(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<Vec<VolunteerMealResponse>>> {
    let service = MealService::new(state.service_context());
    let response = service.my_meals(edition_id, auth.user_id).await?;
    Ok(Json(response))
}

/// PUT /editions/{edition_id}/volunteers/meals/@me
pub async fn update_my_meals(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
    ValidatedJson(request): ValidatedJson<UpdateMealSelectionsRequest>,
) -> ApiResult<Json<Vec<VolunteerMealResponse>>> {
    let service = MealService::new(state.service_context());
    let response = service
        .update_selections(edition_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// GET /editions/{edition_id}/volunteers/meals/headcounts
pub async fn headcounts(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(edition_id): SnowflakePath<Snowflake>,
) -> ApiResult<Json<Vec<MealHeadcountResponse>>> {
    let service = MealService::new(state.service_context());
    let response = service.headcounts(edition_id, auth.user_id).await?;
    Ok(Json(response))
}
