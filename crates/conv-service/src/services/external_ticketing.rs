//! External ticketing (HelloAsso) configuration and synchronisation

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use conv_core::entities::{
    ExternalTicketing, OrderStatus, TicketingOrder, TicketingOrderItem, TicketingProvider,
    TicketingSync, TicketingTier,
};
use conv_core::{Capability, DomainError, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{
    ConfigureExternalTicketingRequest, ConnectionTestResponse, ExternalTicketingResponse,
    SyncResultResponse,
};
use crate::integrations::{ProviderItem, ProviderSnapshot};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::PermissionService;

/// Order status derived from its items: refunded or canceled only when every
/// item is
fn order_status(items: &[ProviderItem]) -> OrderStatus {
    let mut states = items.iter().map(|i| OrderStatus::from_provider(&i.state));
    match states.next() {
        Some(first) if states.all(|s| s == first) => first,
        _ => OrderStatus::Processed,
    }
}

/// Turn a provider snapshot into rows ready to upsert. Tier references on
/// items resolve through the snapshot's tiers by external id.
pub fn build_sync(
    edition_id: Snowflake,
    snapshot: ProviderSnapshot,
    synced_at: DateTime<Utc>,
    mut next_id: impl FnMut() -> Snowflake,
) -> TicketingSync {
    let mut by_external: HashMap<i64, Snowflake> = HashMap::new();
    let tiers: Vec<TicketingTier> = snapshot
        .tiers
        .into_iter()
        .enumerate()
        .map(|(position, tier)| {
            let id = next_id();
            by_external.insert(tier.external_id, id);
            TicketingTier {
                id,
                edition_id,
                name: tier.name,
                description: tier.description,
                price_cents: tier.price_cents,
                position: i32::try_from(position).unwrap_or(i32::MAX),
                is_active: true,
                external_id: Some(tier.external_id),
                created_at: synced_at,
                updated_at: synced_at,
            }
        })
        .collect();

    let orders = snapshot
        .orders
        .into_iter()
        .map(|order| {
            let order_id = next_id();
            let status = order_status(&order.items);
            let items = order
                .items
                .into_iter()
                .map(|item| TicketingOrderItem {
                    id: next_id(),
                    order_id,
                    tier_id: item
                        .tier_external_id
                        .and_then(|ext| by_external.get(&ext).copied()),
                    external_id: Some(item.external_id),
                    name: item.name,
                    first_name: item.first_name,
                    last_name: item.last_name,
                    amount_cents: item.amount_cents,
                    options: item.options,
                    custom_fields: item.custom_fields,
                })
                .collect();

            TicketingOrder {
                id: order_id,
                edition_id,
                external_id: Some(order.external_id),
                payer_first_name: order.payer_first_name,
                payer_last_name: order.payer_last_name,
                payer_email: order.payer_email,
                amount_cents: order.amount_cents,
                status,
                ordered_at: order.ordered_at,
                items,
                created_at: synced_at,
            }
        })
        .collect();

    TicketingSync {
        tiers,
        orders,
        synced_at: Some(synced_at),
    }
}

/// External ticketing service
pub struct ExternalTicketingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ExternalTicketingService<'a> {
    /// Create a new ExternalTicketingService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn get(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<ExternalTicketingResponse> {
        PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::EditEdition)
            .await?;
        let config = self.load(edition_id).await?;
        Ok(ExternalTicketingResponse::from(&config))
    }

    /// Create or replace the configuration; an omitted secret keeps the stored one
    #[instrument(skip(self, request))]
    pub async fn configure(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
        request: ConfigureExternalTicketingRequest,
    ) -> ServiceResult<ExternalTicketingResponse> {
        PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::EditEdition)
            .await?;

        let existing = self
            .ctx
            .external_ticketing_repo()
            .find_by_edition(edition_id)
            .await?;

        let client_secret = match (request.client_secret, &existing) {
            (Some(secret), _) if !secret.is_empty() => secret,
            (_, Some(current)) => current.client_secret.clone(),
            _ => return Err(ServiceError::validation("client_secret is required")),
        };

        let now = Utc::now();
        let config = ExternalTicketing {
            id: existing
                .as_ref()
                .map_or_else(|| self.ctx.generate_id(), |c| c.id),
            edition_id,
            provider: TicketingProvider::HelloAsso,
            organization_slug: request.organization_slug.trim().to_string(),
            form_type: request.form_type.trim().to_string(),
            form_slug: request.form_slug.trim().to_string(),
            client_id: request.client_id.trim().to_string(),
            client_secret,
            last_sync_at: existing.as_ref().and_then(|c| c.last_sync_at),
            created_at: existing.as_ref().map_or(now, |c| c.created_at),
            updated_at: now,
        };
        self.ctx.external_ticketing_repo().upsert(&config).await?;

        info!(
            edition_id = %edition_id,
            organization = %config.organization_slug,
            "External ticketing configured"
        );

        Ok(ExternalTicketingResponse::from(&config))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, edition_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::EditEdition)
            .await?;
        if !self.ctx.external_ticketing_repo().delete(edition_id).await? {
            return Err(DomainError::ExternalTicketingNotConfigured.into());
        }
        info!(edition_id = %edition_id, "External ticketing removed");
        Ok(())
    }

    /// Check the stored credentials against the provider
    #[instrument(skip(self))]
    pub async fn test_connection(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<ConnectionTestResponse> {
        PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::EditEdition)
            .await?;
        let config = self.load(edition_id).await?;

        self.ctx.ticketing_client().test_connection(&config).await?;

        Ok(ConnectionTestResponse { ok: true })
    }

    /// Pull tiers and orders from the provider and upsert them
    #[instrument(skip(self))]
    pub async fn sync(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<SyncResultResponse> {
        PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::EditEdition)
            .await?;
        let config = self.load(edition_id).await?;

        let snapshot = self
            .ctx
            .ticketing_client()
            .fetch(&config)
            .await
            .inspect_err(|e| {
                warn!(edition_id = %edition_id, error = %e, "Ticketing fetch failed");
            })?;

        let synced_at = Utc::now();
        let sync = build_sync(edition_id, snapshot, synced_at, || self.ctx.generate_id());
        let result = SyncResultResponse {
            tiers: sync.tiers.len(),
            orders: sync.orders.len(),
            items: sync.orders.iter().map(|o| o.items.len()).sum(),
            synced_at,
        };

        self.ctx
            .external_ticketing_repo()
            .apply_sync(edition_id, &sync)
            .await?;

        info!(
            edition_id = %edition_id,
            tiers = result.tiers,
            orders = result.orders,
            items = result.items,
            "Ticketing synchronised"
        );

        Ok(result)
    }

    async fn load(&self, edition_id: Snowflake) -> ServiceResult<ExternalTicketing> {
        self.ctx
            .external_ticketing_repo()
            .find_by_edition(edition_id)
            .await?
            .ok_or_else(|| DomainError::ExternalTicketingNotConfigured.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::{ProviderOrder, ProviderTier};

    fn item(external_id: i64, tier: Option<i64>, state: &str) -> ProviderItem {
        ProviderItem {
            external_id,
            tier_external_id: tier,
            name: "Pass".into(),
            first_name: None,
            last_name: None,
            amount_cents: 1000,
            state: state.into(),
            options: vec![],
            custom_fields: vec![],
        }
    }

    fn order(external_id: i64, items: Vec<ProviderItem>) -> ProviderOrder {
        ProviderOrder {
            external_id,
            ordered_at: Utc::now(),
            payer_first_name: "Ada".into(),
            payer_last_name: "Lovelace".into(),
            payer_email: "ada@example.com".into(),
            amount_cents: 1000 * items.len() as i32,
            items,
        }
    }

    fn ids() -> impl FnMut() -> Snowflake {
        let mut next = 0;
        move || {
            next += 1;
            Snowflake::new(next)
        }
    }

    #[test]
    fn test_order_status_from_items() {
        assert_eq!(order_status(&[]), OrderStatus::Processed);
        assert_eq!(
            order_status(&[item(1, None, "Refunded"), item(2, None, "Refunded")]),
            OrderStatus::Refunded
        );
        assert_eq!(
            order_status(&[item(1, None, "Refunded"), item(2, None, "Processed")]),
            OrderStatus::Processed
        );
        assert_eq!(order_status(&[item(1, None, "Canceled")]), OrderStatus::Canceled);
    }

    #[test]
    fn test_build_sync_resolves_tiers_by_external_id() {
        let snapshot = ProviderSnapshot {
            tiers: vec![
                ProviderTier {
                    external_id: 500,
                    name: "Day".into(),
                    description: None,
                    price_cents: 1000,
                },
                ProviderTier {
                    external_id: 501,
                    name: "Weekend".into(),
                    description: None,
                    price_cents: 2500,
                },
            ],
            orders: vec![order(
                9000,
                vec![item(1, Some(501), "Processed"), item(2, Some(999), "Processed")],
            )],
        };

        let sync = build_sync(Snowflake::new(42), snapshot, Utc::now(), ids());

        assert_eq!(sync.tiers.len(), 2);
        assert_eq!(sync.tiers[1].position, 1);
        assert_eq!(sync.tiers[1].external_id, Some(501));

        let order = &sync.orders[0];
        assert_eq!(order.external_id, Some(9000));
        assert_eq!(order.edition_id, Snowflake::new(42));
        assert_eq!(order.items[0].tier_id, Some(sync.tiers[1].id));
        assert_eq!(order.items[0].order_id, order.id);
        assert_eq!(order.items[1].tier_id, None);
        assert!(sync.synced_at.is_some());
    }
}
