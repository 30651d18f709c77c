//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Enum-like fields travel as their upper-case names and are parsed by the
//! services into domain enums.

use chrono::{DateTime, NaiveDate, Utc};
use conv_core::{ArrivalSlot, CustomFieldAnswer, ItemOption, Snowflake};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

fn default_true() -> bool {
    true
}

fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let hex = color.strip_prefix('#').unwrap_or("");
    if matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color").with_message("Color must be #rgb or #rrggbb".into()))
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("Must not be blank".into()))
    } else {
        Ok(())
    }
}

// ============================================================================
// Auth Requests
// ============================================================================

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 3, max = 32, message = "Pseudo must be 3-32 characters"))]
    pub pseudo: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,

    #[validate(length(max = 100))]
    pub first_name: Option<String>,

    #[validate(length(max = 100))]
    pub last_name: Option<String>,
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Logout request (optional refresh token to revoke)
#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

// ============================================================================
// User Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 32, message = "Pseudo must be 3-32 characters"))]
    pub pseudo: Option<String>,

    #[validate(length(max = 100))]
    pub first_name: Option<String>,

    #[validate(length(max = 100))]
    pub last_name: Option<String>,

    #[validate(length(max = 30))]
    pub phone: Option<String>,

    /// Path returned by the upload endpoint
    #[validate(length(max = 500))]
    pub profile_picture: Option<String>,
}

// ============================================================================
// Convention & Edition Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateConventionRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 500))]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateConventionRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 500))]
    pub logo: Option<String>,
}

/// Body of the boolean toggle endpoints (archive, online, volunteers open)
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct ToggleRequest {
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEditionRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 10000))]
    pub description: Option<String>,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,

    #[validate(length(min = 1, max = 100, message = "Country is required"))]
    pub country: String,

    #[validate(length(max = 300))]
    pub address: Option<String>,

    #[validate(length(max = 500))]
    pub image: Option<String>,

    #[serde(default)]
    pub is_online: bool,

    pub volunteer_setup_start: Option<NaiveDate>,
    pub volunteer_teardown_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEditionRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 10000))]
    pub description: Option<String>,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub country: Option<String>,

    #[validate(length(max = 300))]
    pub address: Option<String>,

    #[validate(length(max = 500))]
    pub image: Option<String>,

    pub volunteer_setup_start: Option<NaiveDate>,
    pub volunteer_teardown_end: Option<NaiveDate>,
}

// ============================================================================
// Collaborator Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditionPermissionInput {
    pub edition_id: Snowflake,
    #[serde(default)]
    pub rights: Vec<String>,
}

fn validate_collaborator_target(request: &AddCollaboratorRequest) -> Result<(), ValidationError> {
    if request.user_id.is_some() == request.email.is_some() {
        return Err(ValidationError::new("target")
            .with_message("Exactly one of user_id or email is required".into()));
    }
    Ok(())
}

/// Add a collaborator by user id or email
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_collaborator_target"))]
pub struct AddCollaboratorRequest {
    pub user_id: Option<Snowflake>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 100))]
    pub title: Option<String>,

    #[serde(default)]
    pub rights: Vec<String>,

    #[serde(default)]
    #[validate(nested)]
    pub edition_permissions: Vec<EditionPermissionInput>,
}

/// Replace the rights and every edition override of a collaborator
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCollaboratorRequest {
    #[validate(length(max = 100))]
    pub title: Option<String>,

    #[serde(default)]
    pub rights: Vec<String>,

    #[serde(default)]
    #[validate(nested)]
    pub edition_permissions: Vec<EditionPermissionInput>,
}

// ============================================================================
// Volunteer Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApplyVolunteerRequest {
    #[validate(length(max = 2000))]
    pub motivation: Option<String>,

    pub arrival: Option<ArrivalSlot>,
    pub departure: Option<ArrivalSlot>,

    #[serde(default)]
    pub setup_availability: bool,
    #[serde(default)]
    pub event_availability: bool,
    #[serde(default)]
    pub teardown_availability: bool,

    #[serde(default)]
    #[validate(length(max = 20))]
    pub team_preferences: Vec<Snowflake>,

    /// NONE, VEGETARIAN or VEGAN
    pub diet: Option<String>,

    #[validate(length(max = 500))]
    pub allergies: Option<String>,

    #[validate(length(max = 30))]
    pub phone: Option<String>,
}

/// ACCEPTED or REJECTED
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DecideApplicationRequest {
    #[validate(length(min = 1))]
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(
        length(min = 1, max = 100, message = "Team name must be 1-100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,

    #[validate(range(min = 1, message = "max_volunteers must be at least 1"))]
    pub max_volunteers: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTeamRequest {
    #[validate(
        length(min = 1, max = 100, message = "Team name must be 1-100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,

    #[validate(range(min = 1, message = "max_volunteers must be at least 1"))]
    pub max_volunteers: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTimeSlotRequest {
    pub team_id: Option<Snowflake>,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,

    #[validate(range(min = 1, max = 1000))]
    pub max_volunteers: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTimeSlotRequest {
    pub team_id: Option<Snowflake>,

    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,

    #[validate(range(min = 1, max = 1000))]
    pub max_volunteers: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignVolunteerRequest {
    pub user_id: Snowflake,
}

#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct MealSelectionInput {
    pub meal_id: Snowflake,
    pub accepted: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMealSelectionsRequest {
    #[validate(nested)]
    pub selections: Vec<MealSelectionInput>,
}

// ============================================================================
// Ticketing Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTierRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_cents: i32,

    #[serde(default)]
    pub position: i32,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTierRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_cents: Option<i32>,

    pub position: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuotaRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuotaRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomFieldLinkRequest {
    #[validate(length(min = 1, max = 200))]
    pub field_name: String,

    #[validate(length(min = 1, max = 200))]
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOptionRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    /// TEXT, SELECT, CHECKBOX or NUMBER
    pub kind: String,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub choices: Vec<String>,

    #[serde(default)]
    pub is_required: bool,

    #[serde(default)]
    pub position: i32,

    #[validate(length(min = 1, max = 200))]
    pub external_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateOptionRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub kind: Option<String>,

    #[validate(length(max = 50))]
    pub choices: Option<Vec<String>>,

    pub is_required: Option<bool>,
    pub position: Option<i32>,

    #[validate(length(min = 1, max = 200))]
    pub external_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemInput {
    pub tier_id: Option<Snowflake>,

    #[validate(length(max = 200))]
    pub name: Option<String>,

    #[validate(length(max = 100))]
    pub first_name: Option<String>,

    #[validate(length(max = 100))]
    pub last_name: Option<String>,

    #[validate(range(min = 0))]
    pub amount_cents: Option<i32>,

    #[serde(default)]
    pub options: Vec<ItemOption>,

    #[serde(default)]
    pub custom_fields: Vec<CustomFieldAnswer>,
}

/// Manual order, for on-site sales
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 100))]
    pub payer_first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub payer_last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub payer_email: String,

    #[validate(length(min = 1, message = "An order needs at least one item"), nested)]
    pub items: Vec<OrderItemInput>,
}

/// HelloAsso credentials; an omitted secret keeps the stored one
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConfigureExternalTicketingRequest {
    #[validate(length(min = 1, max = 200))]
    pub organization_slug: String,

    #[validate(length(min = 1, max = 50))]
    pub form_type: String,

    #[validate(length(min = 1, max = 200))]
    pub form_slug: String,

    #[validate(length(min = 1, max = 200))]
    pub client_id: String,

    #[validate(length(min = 1, max = 500))]
    pub client_secret: Option<String>,
}

// ============================================================================
// Notification Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PushKeys {
    #[validate(length(min = 1, max = 200))]
    pub p256dh: String,

    #[validate(length(min = 1, max = 100))]
    pub auth: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubscribePushRequest {
    #[validate(url(message = "Endpoint must be a URL"), length(max = 1000))]
    pub endpoint: String,

    #[validate(nested)]
    pub keys: PushKeys,

    #[validate(length(max = 500))]
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UnsubscribePushRequest {
    #[validate(length(min = 1, max = 1000))]
    pub endpoint: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TestNotificationRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 2000))]
    pub message: Option<String>,
}

// ============================================================================
// Carpool Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCarpoolOfferRequest {
    /// TO_EVENT or FROM_EVENT
    pub direction: String,

    pub trip_date: DateTime<Utc>,

    #[validate(length(min = 1, max = 100))]
    pub location_city: String,

    #[validate(length(max = 300))]
    pub location_address: Option<String>,

    #[validate(range(min = 1, max = 8, message = "Seats must be between 1 and 8"))]
    pub seats: i32,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[validate(length(max = 30))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCarpoolOfferRequest {
    pub trip_date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, max = 100))]
    pub location_city: Option<String>,

    #[validate(length(max = 300))]
    pub location_address: Option<String>,

    #[validate(range(min = 1, max = 8, message = "Seats must be between 1 and 8"))]
    pub seats: Option<i32>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[validate(length(max = 30))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCarpoolRequestRequest {
    /// TO_EVENT or FROM_EVENT
    pub direction: String,

    pub trip_date: DateTime<Utc>,

    #[validate(length(min = 1, max = 100))]
    pub location_city: String,

    #[validate(range(min = 1, max = 8, message = "Seats must be between 1 and 8"))]
    pub seats_needed: i32,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[validate(length(max = 30))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCarpoolRequestRequest {
    pub trip_date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, max = 100))]
    pub location_city: Option<String>,

    #[validate(range(min = 1, max = 8, message = "Seats must be between 1 and 8"))]
    pub seats_needed: Option<i32>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[validate(length(max = 30))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(range(min = 1, max = 8, message = "Seats must be between 1 and 8"))]
    pub seats: i32,

    #[validate(length(max = 1000))]
    pub message: Option<String>,
}

/// ACCEPTED or REJECTED
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DecideBookingRequest {
    #[validate(length(min = 1))]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let valid = RegisterRequest {
            email: "ada@example.com".into(),
            pseudo: "ada".into(),
            password: "Festival2025".into(),
            first_name: None,
            last_name: None,
        };
        assert!(valid.validate().is_ok());

        let invalid = RegisterRequest {
            email: "not-an-email".into(),
            pseudo: "ab".into(),
            ..valid
        };
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("pseudo"));
    }

    #[test]
    fn test_collaborator_target_is_exclusive() {
        let both: AddCollaboratorRequest = serde_json::from_value(serde_json::json!({
            "user_id": "42",
            "email": "a@b.co",
            "rights": ["EDIT_CONVENTION"]
        }))
        .unwrap();
        assert!(both.validate().is_err());

        let neither: AddCollaboratorRequest =
            serde_json::from_value(serde_json::json!({ "rights": [] })).unwrap();
        assert!(neither.validate().is_err());

        let by_email: AddCollaboratorRequest =
            serde_json::from_value(serde_json::json!({ "email": "a@b.co" })).unwrap();
        assert!(by_email.validate().is_ok());
        assert!(by_email.edition_permissions.is_empty());
    }

    #[test]
    fn test_team_color() {
        let mut team = CreateTeamRequest {
            name: "Bar".into(),
            description: None,
            color: Some("#ff8800".into()),
            max_volunteers: Some(4),
        };
        assert!(team.validate().is_ok());

        team.color = Some("orange".into());
        assert!(team.validate().is_err());

        team.color = None;
        team.name = "   ".into();
        assert!(team.validate().is_err());
    }

    #[test]
    fn test_apply_parses_arrival_slots() {
        let request: ApplyVolunteerRequest = serde_json::from_value(serde_json::json!({
            "arrival": "2025-07-09_afternoon",
            "departure": "2025-07-12_evening",
            "event_availability": true,
            "team_preferences": ["1", 2]
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.team_preferences.len(), 2);
        assert!(request.arrival < request.departure);

        let bad = serde_json::from_value::<ApplyVolunteerRequest>(serde_json::json!({
            "arrival": "2025-07-09 afternoon"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_order_needs_items() {
        let request = CreateOrderRequest {
            payer_first_name: "Ada".into(),
            payer_last_name: "Lovelace".into(),
            payer_email: "ada@example.com".into(),
            items: vec![],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_booking_seat_bounds() {
        assert!(CreateBookingRequest { seats: 0, message: None }.validate().is_err());
        assert!(CreateBookingRequest { seats: 2, message: None }.validate().is_ok());
    }
}
