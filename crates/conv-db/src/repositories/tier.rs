//! PostgreSQL implementation of TierRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use conv_core::entities::TicketingTier;
use conv_core::error::DomainError;
use conv_core::traits::{RepoResult, TierRepository};
use conv_core::value_objects::Snowflake;

use crate::models::TierModel;

use super::error::{map_db_error, map_fk_violation};

/// PostgreSQL implementation of TierRepository
#[derive(Clone)]
pub struct PgTierRepository {
    pool: PgPool,
}

impl PgTierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TierRepository for PgTierRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<TicketingTier>> {
        let row = sqlx::query_as::<_, TierModel>(
            r"
            SELECT id, edition_id, name, description, price_cents, position, is_active,
                   external_id, created_at, updated_at
            FROM ticketing_tiers
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(TicketingTier::from))
    }

    #[instrument(skip(self))]
    async fn find_by_edition(&self, edition_id: Snowflake) -> RepoResult<Vec<TicketingTier>> {
        let rows = sqlx::query_as::<_, TierModel>(
            r"
            SELECT id, edition_id, name, description, price_cents, position, is_active,
                   external_id, created_at, updated_at
            FROM ticketing_tiers
            WHERE edition_id = $1
            ORDER BY position, id
            ",
        )
        .bind(edition_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(TicketingTier::from).collect())
    }

    #[instrument(skip(self, tier), fields(tier_id = %tier.id))]
    async fn create(&self, tier: &TicketingTier) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO ticketing_tiers (id, edition_id, name, description, price_cents, position,
                                         is_active, external_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(tier.id.into_inner())
        .bind(tier.edition_id.into_inner())
        .bind(&tier.name)
        .bind(&tier.description)
        .bind(tier.price_cents)
        .bind(tier.position)
        .bind(tier.is_active)
        .bind(tier.external_id)
        .bind(tier.created_at)
        .bind(tier.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::EditionNotFound(tier.edition_id)))?;

        Ok(())
    }

    #[instrument(skip(self, tier), fields(tier_id = %tier.id))]
    async fn update(&self, tier: &TicketingTier) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE ticketing_tiers
            SET name = $2, description = $3, price_cents = $4, position = $5, is_active = $6,
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(tier.id.into_inner())
        .bind(&tier.name)
        .bind(&tier.description)
        .bind(tier.price_cents)
        .bind(tier.position)
        .bind(tier.is_active)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TierNotFound(tier.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM ticketing_tiers WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TierNotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgTierRepository>();
    }
}
