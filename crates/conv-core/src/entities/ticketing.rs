//! Ticketing entities: tiers, quotas, options, orders and the external provider link

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Price tier sold for an edition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketingTier {
    pub id: Snowflake,
    pub edition_id: Snowflake,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i32,
    pub position: i32,
    pub is_active: bool,
    /// Identifier on the external provider when imported
    pub external_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Custom-field answer a quota counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldMatch {
    pub field_name: String,
    pub answer: String,
}

/// Capacity counter fed by tiers, options and custom-field answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketingQuota {
    pub id: Snowflake,
    pub edition_id: Snowflake,
    pub title: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub tier_ids: Vec<Snowflake>,
    pub option_ids: Vec<Snowflake>,
    pub custom_fields: Vec<CustomFieldMatch>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Text,
    Select,
    Checkbox,
    Number,
}

impl OptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Select => "SELECT",
            Self::Checkbox => "CHECKBOX",
            Self::Number => "NUMBER",
        }
    }
}

impl FromStr for OptionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEXT" => Ok(Self::Text),
            "SELECT" => Ok(Self::Select),
            "CHECKBOX" => Ok(Self::Checkbox),
            "NUMBER" => Ok(Self::Number),
            other => Err(DomainError::invalid_value("option kind", other)),
        }
    }
}

/// Extra question or add-on attached to tickets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketingOption {
    pub id: Snowflake,
    pub edition_id: Snowflake,
    pub name: String,
    pub description: Option<String>,
    pub kind: OptionKind,
    pub choices: Vec<String>,
    pub is_required: bool,
    pub position: i32,
    /// Label used by the external provider, when it differs from `name`
    pub external_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TicketingOption {
    /// Name matched against order item options
    pub fn match_name(&self) -> &str {
        self.external_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Processed,
    Refunded,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "PROCESSED",
            Self::Refunded => "REFUNDED",
            Self::Canceled => "CANCELED",
        }
    }

    /// Provider states are free-form; anything not refunded or canceled counts as processed
    pub fn from_provider(state: &str) -> Self {
        match state.to_ascii_lowercase().as_str() {
            "refunded" | "refunding" => Self::Refunded,
            "canceled" | "cancelled" | "deleted" => Self::Canceled,
            _ => Self::Processed,
        }
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROCESSED" => Ok(Self::Processed),
            "REFUNDED" => Ok(Self::Refunded),
            "CANCELED" => Ok(Self::Canceled),
            other => Err(DomainError::invalid_value("order status", other)),
        }
    }
}

/// Option chosen on an order item (stored as JSON)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOption {
    pub name: String,
    #[serde(default)]
    pub amount_cents: i32,
}

/// Custom-field answer on an order item (stored as JSON)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldAnswer {
    pub name: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketingOrderItem {
    pub id: Snowflake,
    pub order_id: Snowflake,
    pub tier_id: Option<Snowflake>,
    pub external_id: Option<i64>,
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub amount_cents: i32,
    pub options: Vec<ItemOption>,
    pub custom_fields: Vec<CustomFieldAnswer>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketingOrder {
    pub id: Snowflake,
    pub edition_id: Snowflake,
    pub external_id: Option<i64>,
    pub payer_first_name: String,
    pub payer_last_name: String,
    pub payer_email: String,
    pub amount_cents: i32,
    pub status: OrderStatus,
    pub ordered_at: DateTime<Utc>,
    pub items: Vec<TicketingOrderItem>,
    pub created_at: DateTime<Utc>,
}

impl TicketingOrder {
    #[inline]
    pub fn is_processed(&self) -> bool {
        self.status == OrderStatus::Processed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketingProvider {
    HelloAsso,
}

impl TicketingProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HelloAsso => "HELLOASSO",
        }
    }
}

impl FromStr for TicketingProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HELLOASSO" => Ok(Self::HelloAsso),
            other => Err(DomainError::invalid_value("ticketing provider", other)),
        }
    }
}

/// External ticketing configuration of an edition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTicketing {
    pub id: Snowflake,
    pub edition_id: Snowflake,
    pub provider: TicketingProvider,
    pub organization_slug: String,
    pub form_type: String,
    pub form_slug: String,
    pub client_id: String,
    pub client_secret: String,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of a provider synchronisation, applied in one transaction
#[derive(Debug, Clone, Default)]
pub struct TicketingSync {
    pub tiers: Vec<TicketingTier>,
    pub orders: Vec<TicketingOrder>,
    pub synced_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_from_provider() {
        assert_eq!(OrderStatus::from_provider("Processed"), OrderStatus::Processed);
        assert_eq!(OrderStatus::from_provider("Authorized"), OrderStatus::Processed);
        assert_eq!(OrderStatus::from_provider("Refunded"), OrderStatus::Refunded);
        assert_eq!(OrderStatus::from_provider("Canceled"), OrderStatus::Canceled);
    }

    #[test]
    fn test_option_match_name() {
        let now = Utc::now();
        let mut option = TicketingOption {
            id: Snowflake::new(1),
            edition_id: Snowflake::new(100),
            name: "Repas samedi".into(),
            description: None,
            kind: OptionKind::Checkbox,
            choices: vec![],
            is_required: false,
            position: 0,
            external_name: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(option.match_name(), "Repas samedi");
        option.external_name = Some("Saturday meal".into());
        assert_eq!(option.match_name(), "Saturday meal");
    }

    #[test]
    fn test_item_option_json() {
        let parsed: Vec<ItemOption> = serde_json::from_str(r#"[{"name":"T-shirt"}]"#).unwrap();
        assert_eq!(parsed[0].amount_cents, 0);
    }
}
