//! HelloAsso REST client
//!
//! Uses the OAuth2 client-credentials flow with the credentials stored per
//! edition, then reads the form's tiers and every page of its orders.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use conv_common::HelloAssoConfig;
use conv_core::{CustomFieldAnswer, ExternalTicketing, ItemOption};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::services::{ServiceError, ServiceResult};

const ORDERS_PAGE_SIZE: u32 = 100;

/// Tier as published by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderTier {
    pub external_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderItem {
    pub external_id: i64,
    pub tier_external_id: Option<i64>,
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub amount_cents: i32,
    pub state: String,
    pub options: Vec<ItemOption>,
    pub custom_fields: Vec<CustomFieldAnswer>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderOrder {
    pub external_id: i64,
    pub ordered_at: DateTime<Utc>,
    pub payer_first_name: String,
    pub payer_last_name: String,
    pub payer_email: String,
    pub amount_cents: i32,
    pub items: Vec<ProviderItem>,
}

/// Everything one synchronisation pulls from the provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderSnapshot {
    pub tiers: Vec<ProviderTier>,
    pub orders: Vec<ProviderOrder>,
}

/// External ticketing provider
#[async_trait]
pub trait TicketingProviderClient: Send + Sync {
    /// Obtain an access token with the configured credentials
    async fn test_connection(&self, config: &ExternalTicketing) -> ServiceResult<()>;

    /// Fetch the form's tiers and all of its orders
    async fn fetch(&self, config: &ExternalTicketing) -> ServiceResult<ProviderSnapshot>;
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct FormResponse {
    #[serde(default)]
    tiers: Vec<TierPayload>,
}

#[derive(Debug, Deserialize)]
struct TierPayload {
    id: i64,
    label: Option<String>,
    description: Option<String>,
    #[serde(default)]
    price: i32,
}

#[derive(Debug, Deserialize)]
struct OrdersPage {
    #[serde(default)]
    data: Vec<OrderPayload>,
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    page_index: u32,
    total_pages: u32,
}

#[derive(Debug, Deserialize)]
struct OrderPayload {
    id: i64,
    date: DateTime<Utc>,
    payer: Option<PersonPayload>,
    amount: Option<AmountPayload>,
    #[serde(default)]
    items: Vec<ItemPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonPayload {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AmountPayload {
    #[serde(default)]
    total: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemPayload {
    id: i64,
    tier_id: Option<i64>,
    name: Option<String>,
    #[serde(default)]
    amount: i32,
    #[serde(default)]
    state: String,
    user: Option<PersonPayload>,
    #[serde(default)]
    options: Vec<OptionPayload>,
    #[serde(default)]
    custom_fields: Vec<CustomFieldPayload>,
}

#[derive(Debug, Deserialize)]
struct OptionPayload {
    name: String,
    #[serde(default)]
    amount: i32,
}

#[derive(Debug, Deserialize)]
struct CustomFieldPayload {
    name: String,
    #[serde(default)]
    answer: String,
}

impl From<TierPayload> for ProviderTier {
    fn from(tier: TierPayload) -> Self {
        Self {
            external_id: tier.id,
            name: tier
                .label
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| format!("Tier {}", tier.id)),
            description: tier.description,
            price_cents: tier.price,
        }
    }
}

impl From<ItemPayload> for ProviderItem {
    fn from(item: ItemPayload) -> Self {
        let user = item.user.unwrap_or_default();
        Self {
            external_id: item.id,
            tier_external_id: item.tier_id,
            name: item.name.unwrap_or_default(),
            first_name: user.first_name,
            last_name: user.last_name,
            amount_cents: item.amount,
            state: item.state,
            options: item
                .options
                .into_iter()
                .map(|o| ItemOption {
                    name: o.name,
                    amount_cents: o.amount,
                })
                .collect(),
            custom_fields: item
                .custom_fields
                .into_iter()
                .map(|f| CustomFieldAnswer {
                    name: f.name,
                    answer: f.answer,
                })
                .collect(),
        }
    }
}

impl From<OrderPayload> for ProviderOrder {
    fn from(order: OrderPayload) -> Self {
        let payer = order.payer.unwrap_or_default();
        Self {
            external_id: order.id,
            ordered_at: order.date,
            payer_first_name: payer.first_name.unwrap_or_default(),
            payer_last_name: payer.last_name.unwrap_or_default(),
            payer_email: payer.email.unwrap_or_default(),
            amount_cents: order.amount.map_or(0, |a| a.total),
            items: order.items.into_iter().map(ProviderItem::from).collect(),
        }
    }
}

// ============================================================================
// Client
// ============================================================================

#[derive(Debug, Clone)]
pub struct HelloAssoClient {
    http: Client,
    api_url: String,
    token_url: String,
}

impl HelloAssoClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: &HelloAssoConfig) -> ServiceResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServiceError::internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token_url: config.token_url.clone(),
        })
    }

    fn form_url(&self, config: &ExternalTicketing) -> String {
        format!(
            "{}/v5/organizations/{}/forms/{}/{}",
            self.api_url, config.organization_slug, config.form_type, config.form_slug
        )
    }

    async fn access_token(&self, config: &ExternalTicketing) -> ServiceResult<String> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", config.client_id.as_str()),
                ("client_secret", config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ServiceError::external(format!("HelloAsso token request failed: {e}")))?;

        if response.status() == StatusCode::UNAUTHORIZED
            || response.status() == StatusCode::BAD_REQUEST
        {
            return Err(ServiceError::external("HelloAsso rejected the credentials"));
        }

        let token: TokenResponse = read_json(response).await?;
        Ok(token.access_token)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
        query: &[(&str, String)],
    ) -> ServiceResult<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| ServiceError::external(format!("HelloAsso request failed: {e}")))?;

        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ServiceResult<T> {
    let status = response.status();
    if !status.is_success() {
        warn!(%status, "HelloAsso answered with an error status");
        return Err(ServiceError::external(format!(
            "HelloAsso answered {status}"
        )));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ServiceError::external(format!("Unexpected HelloAsso payload: {e}")))
}

#[async_trait]
impl TicketingProviderClient for HelloAssoClient {
    #[instrument(skip(self, config), fields(organization = %config.organization_slug))]
    async fn test_connection(&self, config: &ExternalTicketing) -> ServiceResult<()> {
        self.access_token(config).await.map(|_| ())
    }

    #[instrument(skip(self, config), fields(form = %config.form_slug))]
    async fn fetch(&self, config: &ExternalTicketing) -> ServiceResult<ProviderSnapshot> {
        let token = self.access_token(config).await?;
        let form_url = self.form_url(config);

        let form: FormResponse = self
            .get_json(&format!("{form_url}/public"), &token, &[])
            .await?;

        let orders_url = format!("{form_url}/orders");
        let mut orders = Vec::new();
        let mut page_index = 1;
        loop {
            let page: OrdersPage = self
                .get_json(
                    &orders_url,
                    &token,
                    &[
                        ("pageIndex", page_index.to_string()),
                        ("pageSize", ORDERS_PAGE_SIZE.to_string()),
                        ("withDetails", "true".to_string()),
                    ],
                )
                .await?;

            let fetched = page.data.len();
            orders.extend(page.data.into_iter().map(ProviderOrder::from));

            let has_more = match page.pagination {
                Some(p) => p.page_index < p.total_pages,
                None => fetched == ORDERS_PAGE_SIZE as usize,
            };
            if !has_more || fetched == 0 {
                break;
            }
            page_index += 1;
        }

        debug!(tiers = form.tiers.len(), orders = orders.len(), "HelloAsso form fetched");

        Ok(ProviderSnapshot {
            tiers: form.tiers.into_iter().map(ProviderTier::from).collect(),
            orders,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_page_parsing() {
        let raw = r#"{
            "data": [{
                "id": 9001,
                "date": "2025-05-01T10:00:00+02:00",
                "payer": {"firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com"},
                "amount": {"total": 3000},
                "items": [{
                    "id": 1,
                    "tierId": 42,
                    "name": "Full pass",
                    "amount": 2500,
                    "state": "Processed",
                    "user": {"firstName": "Ada", "lastName": "Lovelace"},
                    "options": [{"name": "Camping", "amount": 500}],
                    "customFields": [{"name": "Tent", "answer": "Yes"}]
                }]
            }],
            "pagination": {"pageIndex": 1, "totalPages": 3}
        }"#;

        let page: OrdersPage = serde_json::from_str(raw).unwrap();
        let pagination = page.pagination.as_ref().unwrap();
        assert!(pagination.page_index < pagination.total_pages);

        let order = ProviderOrder::from(page.data.into_iter().next().unwrap());
        assert_eq!(order.external_id, 9001);
        assert_eq!(order.amount_cents, 3000);
        assert_eq!(order.payer_email, "ada@example.com");

        let item = &order.items[0];
        assert_eq!(item.tier_external_id, Some(42));
        assert_eq!(item.options[0].amount_cents, 500);
        assert_eq!(item.custom_fields[0].answer, "Yes");
    }

    #[test]
    fn test_missing_fields_default() {
        let raw = r#"{"id": 5, "date": "2025-05-01T08:00:00Z", "items": [{"id": 7}]}"#;
        let order = ProviderOrder::from(serde_json::from_str::<OrderPayload>(raw).unwrap());
        assert_eq!(order.payer_first_name, "");
        assert_eq!(order.amount_cents, 0);
        assert_eq!(order.items[0].name, "");
        assert!(order.items[0].first_name.is_none());
    }

    #[test]
    fn test_tier_label_fallback() {
        let tier = ProviderTier::from(TierPayload {
            id: 42,
            label: Some("  ".into()),
            description: None,
            price: 1000,
        });
        assert_eq!(tier.name, "Tier 42");
        assert_eq!(tier.price_cents, 1000);
    }

    #[test]
    fn test_form_url() {
        let client = HelloAssoClient::new(&HelloAssoConfig {
            api_url: "https://api.helloasso.com/".into(),
            token_url: "https://api.helloasso.com/oauth2/token".into(),
            timeout_secs: 5,
        })
        .unwrap();
        let now = Utc::now();
        let config = ExternalTicketing {
            id: conv_core::Snowflake::new(1),
            edition_id: conv_core::Snowflake::new(2),
            provider: conv_core::TicketingProvider::HelloAsso,
            organization_slug: "juggling-club".into(),
            form_type: "Event".into(),
            form_slug: "jugglefest-2025".into(),
            client_id: "id".into(),
            client_secret: "secret".into(),
            last_sync_at: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(
            client.form_url(&config),
            "https://api.helloasso.com/v5/organizations/juggling-club/forms/Event/jugglefest-2025",
        );
    }
}
