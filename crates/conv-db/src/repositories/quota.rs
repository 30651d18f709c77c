//! PostgreSQL implementation of QuotaRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use conv_core::entities::{CustomFieldMatch, TicketingQuota};
use conv_core::error::DomainError;
use conv_core::traits::{QuotaRepository, RepoResult};
use conv_core::value_objects::Snowflake;

use crate::mappers::{quota_with_links, QuotaLinks};
use crate::models::{QuotaCustomFieldModel, QuotaLinkModel, QuotaModel};

use super::error::{map_db_error, map_fk_violation};

/// PostgreSQL implementation of QuotaRepository
#[derive(Clone)]
pub struct PgQuotaRepository {
    pool: PgPool,
}

impl PgQuotaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_links(&self, ids: Vec<i64>) -> RepoResult<QuotaLinks> {
        if ids.is_empty() {
            return Ok(QuotaLinks::default());
        }

        let tiers = sqlx::query_as::<_, QuotaLinkModel>(
            "SELECT quota_id, tier_id AS target_id FROM ticketing_quota_tiers WHERE quota_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let options = sqlx::query_as::<_, QuotaLinkModel>(
            "SELECT quota_id, option_id AS target_id FROM ticketing_quota_options WHERE quota_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let custom_fields = sqlx::query_as::<_, QuotaCustomFieldModel>(
            r"
            SELECT quota_id, field_name, answer
            FROM ticketing_quota_custom_fields
            WHERE quota_id = ANY($1)
            ORDER BY field_name, answer
            ",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(QuotaLinks {
            tiers,
            options,
            custom_fields,
        })
    }

    async fn hydrate(&self, rows: Vec<QuotaModel>) -> RepoResult<Vec<TicketingQuota>> {
        let links = self.load_links(rows.iter().map(|r| r.id).collect()).await?;
        Ok(rows
            .into_iter()
            .map(|row| quota_with_links(row, &links))
            .collect())
    }
}

#[async_trait]
impl QuotaRepository for PgQuotaRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<TicketingQuota>> {
        let row = sqlx::query_as::<_, QuotaModel>(
            r"
            SELECT id, edition_id, title, description, quantity, created_at, updated_at
            FROM ticketing_quotas
            WHERE id = $1
            ",
        )
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
    async fn find_by_edition(&self, edition_id: Snowflake) -> RepoResult<Vec<TicketingQuota>> {
        let rows = sqlx::query_as::<_, QuotaModel>(
            r"
            SELECT id, edition_id, title, description, quantity, created_at, updated_at
            FROM ticketing_quotas
            WHERE edition_id = $1
            ORDER BY title, id
            ",
        )
        .bind(edition_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.hydrate(rows).await
    }

    #[instrument(skip(self, quota), fields(quota_id = %quota.id))]
    async fn create(&self, quota: &TicketingQuota) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO ticketing_quotas (id, edition_id, title, description, quantity,
                                          created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(quota.id.into_inner())
        .bind(quota.edition_id.into_inner())
        .bind(&quota.title)
        .bind(&quota.description)
        .bind(quota.quantity)
        .bind(quota.created_at)
        .bind(quota.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::EditionNotFound(quota.edition_id)))?;

        Ok(())
    }

    #[instrument(skip(self, quota), fields(quota_id = %quota.id))]
    async fn update(&self, quota: &TicketingQuota) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE ticketing_quotas
            SET title = $2, description = $3, quantity = $4, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(quota.id.into_inner())
        .bind(&quota.title)
        .bind(&quota.description)
        .bind(quota.quantity)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::QuotaNotFound(quota.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM ticketing_quotas WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::QuotaNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn link_tier(&self, quota_id: Snowflake, tier_id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO ticketing_quota_tiers (quota_id, tier_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(quota_id.into_inner())
        .bind(tier_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::TierNotFound(tier_id)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn unlink_tier(&self, quota_id: Snowflake, tier_id: Snowflake) -> RepoResult<bool> {
        let result =
            sqlx::query("DELETE FROM ticketing_quota_tiers WHERE quota_id = $1 AND tier_id = $2")
                .bind(quota_id.into_inner())
                .bind(tier_id.into_inner())
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn link_option(&self, quota_id: Snowflake, option_id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO ticketing_quota_options (quota_id, option_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(quota_id.into_inner())
        .bind(option_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::OptionNotFound(option_id)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn unlink_option(&self, quota_id: Snowflake, option_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            "DELETE FROM ticketing_quota_options WHERE quota_id = $1 AND option_id = $2",
        )
        .bind(quota_id.into_inner())
        .bind(option_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, field), fields(field_name = %field.field_name))]
    async fn add_custom_field(
        &self,
        quota_id: Snowflake,
        field: &CustomFieldMatch,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO ticketing_quota_custom_fields (quota_id, field_name, answer)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(quota_id.into_inner())
        .bind(field.field_name.trim())
        .bind(field.answer.trim())
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::QuotaNotFound(quota_id)))?;

        Ok(())
    }

    #[instrument(skip(self, field), fields(field_name = %field.field_name))]
    async fn remove_custom_field(
        &self,
        quota_id: Snowflake,
        field: &CustomFieldMatch,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM ticketing_quota_custom_fields
            WHERE quota_id = $1 AND field_name = $2 AND answer = $3
            ",
        )
        .bind(quota_id.into_inner())
        .bind(field.field_name.trim())
        .bind(field.answer.trim())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgQuotaRepository>();
    }
}
