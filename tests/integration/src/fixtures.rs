//! Test fixtures and data generators
//!
//! Provides reusable request bodies and response shapes for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data, distinct across runs
pub fn unique_suffix() -> String {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}{n}", Utc::now().timestamp_micros() % 1_000_000_000)
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub pseudo: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            email: format!("test{suffix}@example.com"),
            pseudo: format!("juggler{suffix}"),
            password: "TestPass123!".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub pseudo: String,
}

// ============================================================================
// Conventions and editions
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreateConventionRequest {
    pub name: String,
    pub description: Option<String>,
}

impl CreateConventionRequest {
    pub fn unique() -> Self {
        Self {
            name: format!("Juggling Convention {}", unique_suffix()),
            description: Some("A weekend of juggling".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ConventionResponse {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub is_archived: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateEditionRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub city: String,
    pub country: String,
    pub is_online: bool,
}

impl CreateEditionRequest {
    /// A three-day edition a month from now
    pub fn upcoming(is_online: bool) -> Self {
        let start = Utc::now().date_naive() + Duration::days(30);
        Self {
            start_date: start,
            end_date: start + Duration::days(2),
            city: "Toulouse".to_string(),
            country: "France".to_string(),
            is_online,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EditionResponse {
    pub id: String,
    pub convention_id: String,
    pub is_online: bool,
    pub volunteers_open: bool,
    pub rights: Option<Vec<String>>,
}

// ============================================================================
// Collaborator Fixtures
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditionPermission {
    pub edition_id: String,
    pub rights: Vec<String>,
}

impl EditionPermission {
    pub fn new(edition_id: &str, rights: &[&str]) -> Self {
        Self {
            edition_id: edition_id.to_string(),
            rights: rights.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddCollaboratorRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub rights: Vec<String>,
    pub edition_permissions: Vec<EditionPermission>,
}

impl AddCollaboratorRequest {
    pub fn by_email(email: &str, edition_permissions: Vec<EditionPermission>) -> Self {
        Self {
            user_id: None,
            email: Some(email.to_string()),
            rights: Vec::new(),
            edition_permissions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateCollaboratorRequest {
    pub rights: Vec<String>,
    pub edition_permissions: Vec<EditionPermission>,
}

#[derive(Debug, Deserialize)]
pub struct CollaboratorResponse {
    pub id: String,
    pub user_id: String,
    pub rights: Vec<String>,
    pub edition_permissions: Vec<EditionPermission>,
}

#[derive(Debug, Serialize)]
pub struct ToggleRequest {
    pub enabled: bool,
}

// ============================================================================
// Volunteers
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ApplyVolunteerRequest {
    pub motivation: Option<String>,
    pub event_availability: bool,
    pub diet: Option<String>,
}

impl Default for ApplyVolunteerRequest {
    fn default() -> Self {
        Self {
            motivation: Some("I love helping out".to_string()),
            event_availability: true,
            diet: Some("VEGETARIAN".to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DecideApplicationRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationResponse {
    pub id: String,
    pub user_id: String,
    pub status: String,
    pub diet: String,
}

// ============================================================================
// Ticketing
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreateTierRequest {
    pub name: String,
    pub price_cents: i32,
}

#[derive(Debug, Deserialize)]
pub struct TierResponse {
    pub id: String,
    pub name: String,
    pub price_cents: i32,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct OrderItemInput {
    pub tier_id: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderRequest {
    pub payer_first_name: String,
    pub payer_last_name: String,
    pub payer_email: String,
    pub items: Vec<OrderItemInput>,
}

#[derive(Debug, Deserialize)]
pub struct OrderItemResponse {
    pub name: String,
    pub amount_cents: i32,
}

#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    pub id: String,
    pub amount_cents: i32,
    pub status: String,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Debug, Deserialize)]
pub struct PaginationMeta {
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

#[derive(Debug, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

// ============================================================================
// Carpool and notifications
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreateCarpoolOfferRequest {
    pub direction: String,
    pub trip_date: chrono::DateTime<Utc>,
    pub location_city: String,
    pub seats: i32,
}

impl CreateCarpoolOfferRequest {
    pub fn to_event(seats: i32) -> Self {
        Self {
            direction: "TO_EVENT".to_string(),
            trip_date: Utc::now() + Duration::days(30),
            location_city: "Bordeaux".to_string(),
            seats,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CarpoolOfferResponse {
    pub id: String,
    pub user_id: String,
    pub seats: i32,
    pub remaining_seats: i32,
}

#[derive(Debug, Serialize)]
pub struct CreateBookingRequest {
    pub seats: i32,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DecideBookingRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct BookingResponse {
    pub id: String,
    pub requester_id: String,
    pub seats: i32,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

#[derive(Debug, Deserialize)]
pub struct NotificationResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub is_read: bool,
}

#[derive(Debug, Deserialize)]
pub struct PushConfigResponse {
    pub enabled: bool,
}
