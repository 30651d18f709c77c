//! PostgreSQL implementation of ExternalTicketingRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use conv_core::entities::{ExternalTicketing, TicketingSync};
use conv_core::error::DomainError;
use conv_core::traits::{ExternalTicketingRepository, RepoResult};
use conv_core::value_objects::Snowflake;

use crate::models::ExternalTicketingModel;

use super::error::{map_db_error, map_fk_violation};
use super::order::insert_items;

/// PostgreSQL implementation of ExternalTicketingRepository
#[derive(Clone)]
pub struct PgExternalTicketingRepository {
    pool: PgPool,
}

impl PgExternalTicketingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExternalTicketingRepository for PgExternalTicketingRepository {
    #[instrument(skip(self))]
    async fn find_by_edition(
        &self,
        edition_id: Snowflake,
    ) -> RepoResult<Option<ExternalTicketing>> {
        let row = sqlx::query_as::<_, ExternalTicketingModel>(
            r"
            SELECT id, edition_id, provider, organization_slug, form_type, form_slug, client_id,
                   client_secret, last_sync_at, created_at, updated_at
            FROM external_ticketing
            WHERE edition_id = $1
            ",
        )
        .bind(edition_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(ExternalTicketing::try_from).transpose()
    }

    #[instrument(skip(self, config), fields(edition_id = %config.edition_id))]
    async fn upsert(&self, config: &ExternalTicketing) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO external_ticketing (id, edition_id, provider, organization_slug, form_type,
                                            form_slug, client_id, client_secret, last_sync_at,
                                            created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (edition_id) DO UPDATE
            SET provider = EXCLUDED.provider,
                organization_slug = EXCLUDED.organization_slug,
                form_type = EXCLUDED.form_type,
                form_slug = EXCLUDED.form_slug,
                client_id = EXCLUDED.client_id,
                client_secret = EXCLUDED.client_secret,
                updated_at = NOW()
            ",
        )
        .bind(config.id.into_inner())
        .bind(config.edition_id.into_inner())
        .bind(config.provider.as_str())
        .bind(&config.organization_slug)
        .bind(&config.form_type)
        .bind(&config.form_slug)
        .bind(&config.client_id)
        .bind(&config.client_secret)
        .bind(config.last_sync_at)
        .bind(config.created_at)
        .bind(config.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::EditionNotFound(config.edition_id)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, edition_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM external_ticketing WHERE edition_id = $1")
            .bind(edition_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, sync), fields(tiers = sync.tiers.len(), orders = sync.orders.len()))]
    async fn apply_sync(&self, edition_id: Snowflake, sync: &TicketingSync) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Imported tier id -> id of the row that actually holds that external id
        let mut tier_ids: HashMap<i64, i64> = HashMap::new();
        for tier in &sync.tiers {
            let stored_id = sqlx::query_scalar::<_, i64>(
                r"
                INSERT INTO ticketing_tiers (id, edition_id, name, description, price_cents,
                                             position, is_active, external_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ON CONFLICT (edition_id, external_id) DO UPDATE
                SET name = EXCLUDED.name,
                    description = EXCLUDED.description,
                    price_cents = EXCLUDED.price_cents,
                    is_active = EXCLUDED.is_active,
                    updated_at = NOW()
                RETURNING id
                ",
            )
            .bind(tier.id.into_inner())
            .bind(edition_id.into_inner())
            .bind(&tier.name)
            .bind(&tier.description)
            .bind(tier.price_cents)
            .bind(tier.position)
            .bind(tier.is_active)
            .bind(tier.external_id)
            .bind(tier.created_at)
            .bind(tier.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

            tier_ids.insert(tier.id.into_inner(), stored_id);
        }

        for order in &sync.orders {
            let stored_id = sqlx::query_scalar::<_, i64>(
                r"
                INSERT INTO ticketing_orders (id, edition_id, external_id, payer_first_name,
                                              payer_last_name, payer_email, amount_cents, status,
                                              ordered_at, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ON CONFLICT (edition_id, external_id) DO UPDATE
                SET payer_first_name = EXCLUDED.payer_first_name,
                    payer_last_name = EXCLUDED.payer_last_name,
                    payer_email = EXCLUDED.payer_email,
                    amount_cents = EXCLUDED.amount_cents,
                    status = EXCLUDED.status
                RETURNING id
                ",
            )
            .bind(order.id.into_inner())
            .bind(edition_id.into_inner())
            .bind(order.external_id)
            .bind(&order.payer_first_name)
            .bind(&order.payer_last_name)
            .bind(&order.payer_email)
            .bind(order.amount_cents)
            .bind(order.status.as_str())
            .bind(order.ordered_at)
            .bind(order.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

            sqlx::query("DELETE FROM ticketing_order_items WHERE order_id = $1")
                .bind(stored_id)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;

            insert_items(&mut tx, stored_id, &order.items, &tier_ids).await?;
        }

        let result = sqlx::query(
            "UPDATE external_ticketing SET last_sync_at = $2, updated_at = NOW() WHERE edition_id = $1",
        )
        .bind(edition_id.into_inner())
        .bind(sync.synced_at.unwrap_or_else(Utc::now))
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ExternalTicketingNotConfigured);
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgExternalTicketingRepository>();
    }
}
