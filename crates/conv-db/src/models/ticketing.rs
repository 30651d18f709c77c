//! Ticketing models

use chrono::{DateTime, Utc};
use conv_core::entities::{CustomFieldAnswer, ItemOption};
use sqlx::types::Json;
use sqlx::FromRow;

/// Database model for ticketing_tiers table
#[derive(Debug, Clone, FromRow)]
pub struct TierModel {
    pub id: i64,
    pub edition_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i32,
    pub position: i32,
    pub is_active: bool,
    pub external_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for ticketing_quotas table (links loaded separately)
#[derive(Debug, Clone, FromRow)]
pub struct QuotaModel {
    pub id: i64,
    pub edition_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of ticketing_quota_tiers or ticketing_quota_options
#[derive(Debug, Clone, FromRow)]
pub struct QuotaLinkModel {
    pub quota_id: i64,
    pub target_id: i64,
}

/// Row of ticketing_quota_custom_fields
#[derive(Debug, Clone, FromRow)]
pub struct QuotaCustomFieldModel {
    pub quota_id: i64,
    pub field_name: String,
    pub answer: String,
}

/// Database model for ticketing_options table
#[derive(Debug, Clone, FromRow)]
pub struct OptionModel {
    pub id: i64,
    pub edition_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub kind: String,
    pub choices: Vec<String>,
    pub is_required: bool,
    pub position: i32,
    pub external_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for ticketing_orders table
#[derive(Debug, Clone, FromRow)]
pub struct OrderModel {
    pub id: i64,
    pub edition_id: i64,
    pub external_id: Option<i64>,
    pub payer_first_name: String,
    pub payer_last_name: String,
    pub payer_email: String,
    pub amount_cents: i32,
    pub status: String,
    pub ordered_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Database model for ticketing_order_items table
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemModel {
    pub id: i64,
    pub order_id: i64,
    pub tier_id: Option<i64>,
    pub external_id: Option<i64>,
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub amount_cents: i32,
    pub options: Json<Vec<ItemOption>>,
    pub custom_fields: Json<Vec<CustomFieldAnswer>>,
}

/// Database model for external_ticketing table
#[derive(Debug, Clone, FromRow)]
pub struct ExternalTicketingModel {
    pub id: i64,
    pub edition_id: i64,
    pub provider: String,
    pub organization_slug: String,
    pub form_type: String,
    pub form_slug: String,
    pub client_id: String,
    pub client_secret: String,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
