//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::handlers::{
    auth, carpool, collaborators, conventions, editions, external_ticketing, health, meals,
    notifications, teams, ticketing, time_slots, uploads, users, volunteers,
};
use crate::middleware::{limit_by_ip, limit_by_user};
use crate::state::AppState;

/// Room for multipart boundaries and headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the main API router with all routes (excluding health for separate middleware handling)
pub fn create_router(state: &AppState) -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes(state))
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(auth_routes(state))
        .merge(user_routes())
        .merge(convention_routes())
        .merge(edition_routes())
        .merge(volunteer_routes())
        .merge(ticketing_routes(state))
        .merge(notification_routes(state))
        .merge(carpool_routes())
        .merge(upload_routes(state))
}

/// Authentication routes, limited per client IP
fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
        .route_layer(from_fn_with_state(state.clone(), limit_by_ip))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/@me",
            get(users::get_current_user).patch(users::update_current_user),
        )
        .route("/users/:user_id", get(users::get_user))
}

/// Convention and collaborator routes
fn convention_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/conventions",
            get(conventions::list_conventions).post(conventions::create_convention),
        )
        .route("/conventions/@me", get(conventions::list_my_conventions))
        .route(
            "/conventions/:convention_id",
            get(conventions::get_convention)
                .patch(conventions::update_convention)
                .delete(conventions::delete_convention),
        )
        .route(
            "/conventions/:convention_id/archived",
            put(conventions::set_archived),
        )
        // Editions of a convention
        .route(
            "/conventions/:convention_id/editions",
            get(editions::list_convention_editions).post(editions::create_edition),
        )
        // Collaborators
        .route(
            "/conventions/:convention_id/collaborators",
            get(collaborators::list_collaborators).post(collaborators::add_collaborator),
        )
        .route(
            "/conventions/:convention_id/collaborators/:collaborator_id",
            put(collaborators::update_collaborator).delete(collaborators::remove_collaborator),
        )
}

/// Edition routes
fn edition_routes() -> Router<AppState> {
    Router::new()
        .route("/editions/upcoming", get(editions::list_upcoming))
        .route(
            "/editions/:edition_id",
            get(editions::get_edition)
                .patch(editions::update_edition)
                .delete(editions::delete_edition),
        )
        .route("/editions/:edition_id/online", put(editions::set_online))
        .route(
            "/editions/:edition_id/volunteers-open",
            put(editions::set_volunteers_open),
        )
}

/// Volunteer routes: applications, teams, time slots and meals
fn volunteer_routes() -> Router<AppState> {
    Router::new()
        // Applications
        .route(
            "/editions/:edition_id/volunteers/applications",
            get(volunteers::list_applications).post(volunteers::apply),
        )
        .route(
            "/editions/:edition_id/volunteers/applications/@me",
            get(volunteers::get_own_application).delete(volunteers::withdraw_application),
        )
        .route(
            "/editions/:edition_id/volunteers/applications/:application_id",
            put(volunteers::decide_application),
        )
        // Teams
        .route(
            "/editions/:edition_id/volunteers/teams",
            get(teams::list_teams).post(teams::create_team),
        )
        .route(
            "/editions/:edition_id/volunteers/teams/:team_id",
            patch(teams::update_team).delete(teams::delete_team),
        )
        // Time slots
        .route(
            "/editions/:edition_id/volunteers/time-slots",
            get(time_slots::list_slots).post(time_slots::create_slot),
        )
        .route(
            "/editions/:edition_id/volunteers/time-slots/@me",
            get(time_slots::list_my_slots),
        )
        .route(
            "/editions/:edition_id/volunteers/time-slots/:slot_id",
            patch(time_slots::update_slot).delete(time_slots::delete_slot),
        )
        .route(
            "/editions/:edition_id/volunteers/time-slots/:slot_id/assignments",
            post(time_slots::assign_volunteer),
        )
        .route(
            "/editions/:edition_id/volunteers/time-slots/:slot_id/assignments/:user_id",
            delete(time_slots::unassign_volunteer),
        )
        // Meals
        .route(
            "/editions/:edition_id/volunteers/meals",
            get(meals::list_meals).post(meals::init_plan),
        )
        .route(
            "/editions/:edition_id/volunteers/meals/@me",
            get(meals::my_meals).put(meals::update_my_meals),
        )
        .route(
            "/editions/:edition_id/volunteers/meals/headcounts",
            get(meals::headcounts),
        )
        .route(
            "/editions/:edition_id/volunteers/meals/:meal_id/enabled",
            put(meals::set_meal_enabled),
        )
}

/// Ticketing routes; provider calls are limited per user
fn ticketing_routes(state: &AppState) -> Router<AppState> {
    let provider = Router::new()
        .route(
            "/editions/:edition_id/ticketing/external/test",
            post(external_ticketing::test_connection),
        )
        .route(
            "/editions/:edition_id/ticketing/external/sync",
            post(external_ticketing::sync),
        )
        .route_layer(from_fn_with_state(state.clone(), limit_by_user));

    Router::new()
        // Tiers
        .route(
            "/editions/:edition_id/ticketing/tiers",
            get(ticketing::list_tiers).post(ticketing::create_tier),
        )
        .route(
            "/editions/:edition_id/ticketing/tiers/:tier_id",
            patch(ticketing::update_tier).delete(ticketing::delete_tier),
        )
        // Quotas
        .route(
            "/editions/:edition_id/ticketing/quotas",
            get(ticketing::list_quotas).post(ticketing::create_quota),
        )
        .route(
            "/editions/:edition_id/ticketing/quotas/stats",
            get(ticketing::quota_stats),
        )
        .route(
            "/editions/:edition_id/ticketing/quotas/:quota_id",
            patch(ticketing::update_quota).delete(ticketing::delete_quota),
        )
        .route(
            "/editions/:edition_id/ticketing/quotas/:quota_id/tiers/:tier_id",
            put(ticketing::link_quota_tier).delete(ticketing::unlink_quota_tier),
        )
        .route(
            "/editions/:edition_id/ticketing/quotas/:quota_id/options/:option_id",
            put(ticketing::link_quota_option).delete(ticketing::unlink_quota_option),
        )
        .route(
            "/editions/:edition_id/ticketing/quotas/:quota_id/custom-fields",
            post(ticketing::link_quota_custom_field)
                .delete(ticketing::unlink_quota_custom_field),
        )
        // Options
        .route(
            "/editions/:edition_id/ticketing/options",
            get(ticketing::list_options).post(ticketing::create_option),
        )
        .route(
            "/editions/:edition_id/ticketing/options/:option_id",
            patch(ticketing::update_option).delete(ticketing::delete_option),
        )
        // Orders
        .route(
            "/editions/:edition_id/ticketing/orders",
            get(ticketing::list_orders).post(ticketing::create_order),
        )
        .route(
            "/editions/:edition_id/ticketing/orders/:order_id",
            get(ticketing::get_order),
        )
        // External provider
        .route(
            "/editions/:edition_id/ticketing/external",
            get(external_ticketing::get_config)
                .put(external_ticketing::configure)
                .delete(external_ticketing::delete_config),
        )
        .merge(provider)
}

/// Notification and push routes
fn notification_routes(state: &AppState) -> Router<AppState> {
    let test = Router::new()
        .route("/notifications/test", post(notifications::send_test))
        .route_layer(from_fn_with_state(state.clone(), limit_by_user));

    Router::new()
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/unread-count", get(notifications::unread_count))
        .route("/notifications/read", put(notifications::mark_all_read))
        .route(
            "/notifications/:notification_id",
            delete(notifications::delete_notification),
        )
        .route(
            "/notifications/:notification_id/read",
            put(notifications::mark_read),
        )
        .route("/push/config", get(notifications::push_config))
        .route(
            "/push/subscriptions",
            get(notifications::list_subscriptions)
                .post(notifications::subscribe)
                .delete(notifications::unsubscribe),
        )
        .merge(test)
}

/// Carpool routes
fn carpool_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/editions/:edition_id/carpool/offers",
            get(carpool::list_offers).post(carpool::create_offer),
        )
        .route(
            "/editions/:edition_id/carpool/requests",
            get(carpool::list_requests).post(carpool::create_request),
        )
        .route(
            "/carpool/offers/:offer_id",
            get(carpool::get_offer)
                .patch(carpool::update_offer)
                .delete(carpool::delete_offer),
        )
        .route(
            "/carpool/offers/:offer_id/bookings",
            get(carpool::list_bookings).post(carpool::book),
        )
        .route(
            "/carpool/offers/:offer_id/bookings/:booking_id",
            put(carpool::decide_booking).delete(carpool::cancel_booking),
        )
        .route(
            "/carpool/requests/:request_id",
            get(carpool::get_request)
                .patch(carpool::update_request)
                .delete(carpool::delete_request),
        )
}

/// Upload routes; the body limit follows the configured file size
fn upload_routes(state: &AppState) -> Router<AppState> {
    let limit = state.config().storage.max_file_size_bytes() + MULTIPART_OVERHEAD;
    Router::new()
        .route("/uploads/:kind", post(uploads::upload_image))
        .layer(DefaultBodyLimit::max(limit))
}
