//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, NaiveDate, Utc};
use conv_core::{ArrivalSlot, CustomFieldAnswer, CustomFieldMatch, ItemOption};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Offset-paginated list
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// `data` may hold one extra row, used to compute `has_more` then dropped
    pub fn from_probe(mut data: Vec<T>, limit: i64, offset: i64) -> Self {
        let has_more = data.len() as i64 > limit;
        data.truncate(limit.max(0) as usize);
        Self {
            data,
            pagination: PaginationMeta {
                limit,
                offset,
                has_more,
            },
        }
    }
}

// ============================================================================
// Auth & User Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: CurrentUserResponse,
}

/// The caller's own profile, with private fields
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub email: String,
    pub pseudo: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub profile_picture: Option<String>,
    pub is_global_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Profile visible to other users
#[derive(Debug, Clone, Serialize)]
pub struct PublicUserResponse {
    pub id: String,
    pub pseudo: String,
    pub profile_picture: Option<String>,
}

// ============================================================================
// Convention & Edition Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ConventionResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub author_id: String,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditionResponse {
    pub id: String,
    pub convention_id: String,
    pub creator_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub city: String,
    pub country: String,
    pub address: Option<String>,
    pub image: Option<String>,
    pub is_online: bool,
    pub volunteers_open: bool,
    pub volunteer_setup_start: Option<NaiveDate>,
    pub volunteer_teardown_end: Option<NaiveDate>,
    /// Effective rights of the caller, when authenticated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rights: Option<Vec<&'static str>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Collaborator Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct EditionPermissionResponse {
    pub edition_id: String,
    pub rights: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollaboratorResponse {
    pub id: String,
    pub convention_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicUserResponse>,
    pub title: Option<String>,
    pub rights: Vec<&'static str>,
    pub edition_permissions: Vec<EditionPermissionResponse>,
    pub added_by_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Volunteer Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationResponse {
    pub id: String,
    pub edition_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicUserResponse>,
    pub status: &'static str,
    pub motivation: Option<String>,
    pub arrival: Option<ArrivalSlot>,
    pub departure: Option<ArrivalSlot>,
    pub setup_availability: bool,
    pub event_availability: bool,
    pub teardown_availability: bool,
    pub team_preferences: Vec<String>,
    pub diet: &'static str,
    pub allergies: Option<String>,
    pub phone: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamResponse {
    pub id: String,
    pub edition_id: String,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub max_volunteers: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeSlotResponse {
    pub id: String,
    pub edition_id: String,
    pub team_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub max_volunteers: i32,
    pub assigned_user_ids: Vec<String>,
    pub remaining: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealResponse {
    pub id: String,
    pub date: NaiveDate,
    pub meal_type: &'static str,
    pub phase: &'static str,
    pub enabled: bool,
}

/// An eligible meal with the volunteer's current choice
#[derive(Debug, Clone, Serialize)]
pub struct VolunteerMealResponse {
    #[serde(flatten)]
    pub meal: MealResponse,
    pub accepted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealHeadcountResponse {
    #[serde(flatten)]
    pub meal: MealResponse,
    pub headcount: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealPlanResponse {
    pub created: u64,
    pub meals: Vec<MealResponse>,
}

// ============================================================================
// Ticketing Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct TierResponse {
    pub id: String,
    pub edition_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i32,
    pub position: i32,
    pub is_active: bool,
    pub external_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuotaResponse {
    pub id: String,
    pub edition_id: String,
    pub title: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub tier_ids: Vec<String>,
    pub option_ids: Vec<String>,
    pub custom_fields: Vec<CustomFieldMatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuotaStatsResponse {
    pub quota_id: String,
    pub title: String,
    pub quantity: i32,
    pub used: i32,
    pub remaining: i32,
    pub percentage: f64,
    pub is_full: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionResponse {
    pub id: String,
    pub edition_id: String,
    pub name: String,
    pub description: Option<String>,
    pub kind: &'static str,
    pub choices: Vec<String>,
    pub is_required: bool,
    pub position: i32,
    pub external_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderItemResponse {
    pub id: String,
    pub tier_id: Option<String>,
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub amount_cents: i32,
    pub options: Vec<ItemOption>,
    pub custom_fields: Vec<CustomFieldAnswer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub edition_id: String,
    pub external_id: Option<i64>,
    pub payer_first_name: String,
    pub payer_last_name: String,
    pub payer_email: String,
    pub amount_cents: i32,
    pub status: &'static str,
    pub ordered_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

/// Credentials are never echoed back; only whether a secret is stored
#[derive(Debug, Clone, Serialize)]
pub struct ExternalTicketingResponse {
    pub edition_id: String,
    pub provider: &'static str,
    pub organization_slug: String,
    pub form_type: String,
    pub form_slug: String,
    pub client_id: String,
    pub has_client_secret: bool,
    pub last_sync_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncResultResponse {
    pub tiers: usize,
    pub orders: usize,
    pub items: usize,
    pub synced_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionTestResponse {
    pub ok: bool,
}

// ============================================================================
// Notification Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: String,
    pub message: String,
    pub category: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub action_url: Option<String>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MarkedReadResponse {
    pub updated: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PushSubscriptionResponse {
    pub id: String,
    pub endpoint: String,
    pub user_agent: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PushConfigResponse {
    pub enabled: bool,
    pub public_key: Option<String>,
}

// ============================================================================
// Carpool Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CarpoolOfferResponse {
    pub id: String,
    pub edition_id: String,
    pub user_id: String,
    pub direction: &'static str,
    pub trip_date: DateTime<Utc>,
    pub location_city: String,
    pub location_address: Option<String>,
    pub seats: i32,
    pub remaining_seats: i32,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CarpoolRequestResponse {
    pub id: String,
    pub edition_id: String,
    pub user_id: String,
    pub direction: &'static str,
    pub trip_date: DateTime<Utc>,
    pub location_city: String,
    pub seats_needed: i32,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub offer_id: String,
    pub requester_id: String,
    pub seats: i32,
    pub message: Option<String>,
    pub status: &'static str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Upload Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub kind: &'static str,
    pub path: String,
    pub size: usize,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }
}
