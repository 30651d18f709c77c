//! PostgreSQL implementation of OrderRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use conv_core::entities::{TicketingOrder, TicketingOrderItem};
use conv_core::error::DomainError;
use conv_core::traits::{OrderRepository, Page, RepoResult};
use conv_core::value_objects::Snowflake;

use crate::mappers::order_with_items;
use crate::models::{OrderItemModel, OrderModel};

use super::error::{map_db_error, map_insert_error};

const ORDER_COLUMNS: &str = r"
    id, edition_id, external_id, payer_first_name, payer_last_name, payer_email, amount_cents,
    status, ordered_at, created_at
";

/// PostgreSQL implementation of OrderRepository
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn hydrate(&self, rows: Vec<OrderModel>) -> RepoResult<Vec<TicketingOrder>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let items = sqlx::query_as::<_, OrderItemModel>(
            r"
            SELECT id, order_id, tier_id, external_id, name, first_name, last_name,
                   amount_cents, options, custom_fields
            FROM ticketing_order_items
            WHERE order_id = ANY($1)
            ORDER BY id
            ",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter()
            .map(|row| order_with_items(row, &items))
            .collect()
    }
}

/// Insert the items of an order; `tier_ids` remaps tier ids that were
/// resolved to existing rows during the same transaction
pub(super) async fn insert_items(
    tx: &mut Transaction<'_, Postgres>,
    order_id: i64,
    items: &[TicketingOrderItem],
    tier_ids: &HashMap<i64, i64>,
) -> RepoResult<()> {
    for item in items {
        let tier_id = item
            .tier_id
            .map(Snowflake::into_inner)
            .map(|id| tier_ids.get(&id).copied().unwrap_or(id));

        sqlx::query(
            r"
            INSERT INTO ticketing_order_items (id, order_id, tier_id, external_id, name, first_name,
                                               last_name, amount_cents, options, custom_fields)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(item.id.into_inner())
        .bind(order_id)
        .bind(tier_id)
        .bind(item.external_id)
        .bind(&item.name)
        .bind(&item.first_name)
        .bind(&item.last_name)
        .bind(item.amount_cents)
        .bind(Json(&item.options))
        .bind(Json(&item.custom_fields))
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;
    }

    Ok(())
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<TicketingOrder>> {
        let row = sqlx::query_as::<_, OrderModel>(&format!(
            "SELECT {ORDER_COLUMNS} FROM ticketing_orders WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn find_by_edition(
        &self,
        edition_id: Snowflake,
        page: Page,
    ) -> RepoResult<Vec<TicketingOrder>> {
        let rows = sqlx::query_as::<_, OrderModel>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM ticketing_orders
            WHERE edition_id = $1
            ORDER BY ordered_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(edition_id.into_inner())
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.hydrate(rows).await
    }

    #[instrument(skip(self))]
    async fn find_all_by_edition(&self, edition_id: Snowflake) -> RepoResult<Vec<TicketingOrder>> {
        let rows = sqlx::query_as::<_, OrderModel>(&format!(
            "SELECT {ORDER_COLUMNS} FROM ticketing_orders WHERE edition_id = $1 ORDER BY ordered_at"
        ))
        .bind(edition_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.hydrate(rows).await
    }

    #[instrument(skip(self, order), fields(order_id = %order.id, items = order.items.len()))]
    async fn create(&self, order: &TicketingOrder) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO ticketing_orders (id, edition_id, external_id, payer_first_name,
                                          payer_last_name, payer_email, amount_cents, status,
                                          ordered_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(order.id.into_inner())
        .bind(order.edition_id.into_inner())
        .bind(order.external_id)
        .bind(&order.payer_first_name)
        .bind(&order.payer_last_name)
        .bind(&order.payer_email)
        .bind(order.amount_cents)
        .bind(order.status.as_str())
        .bind(order.ordered_at)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_insert_error(
                e,
                || DomainError::OrderAlreadyExists,
                || DomainError::EditionNotFound(order.edition_id),
            )
        })?;

        insert_items(&mut tx, order.id.into_inner(), &order.items, &HashMap::new()).await?;

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
        assert_send_sync::<PgOrderRepository>();
    }
}
