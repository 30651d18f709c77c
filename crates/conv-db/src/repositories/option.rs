//! PostgreSQL implementation of OptionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use conv_core::entities::TicketingOption;
use conv_core::error::DomainError;
use conv_core::traits::{OptionRepository, RepoResult};
use conv_core::value_objects::Snowflake;

use crate::models::OptionModel;

use super::error::{map_db_error, map_fk_violation, try_map_all};

/// PostgreSQL implementation of OptionRepository
#[derive(Clone)]
pub struct PgOptionRepository {
    pool: PgPool,
}

impl PgOptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OptionRepository for PgOptionRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<TicketingOption>> {
        let row = sqlx::query_as::<_, OptionModel>(
            r"
            SELECT id, edition_id, name, description, kind, choices, is_required, position,
                   external_name, created_at, updated_at
            FROM ticketing_options
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(TicketingOption::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_edition(&self, edition_id: Snowflake) -> RepoResult<Vec<TicketingOption>> {
        let rows = sqlx::query_as::<_, OptionModel>(
            r"
            SELECT id, edition_id, name, description, kind, choices, is_required, position,
                   external_name, created_at, updated_at
            FROM ticketing_options
            WHERE edition_id = $1
            ORDER BY position, id
            ",
        )
        .bind(edition_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        try_map_all(rows)
    }

    #[instrument(skip(self, option), fields(option_id = %option.id))]
    async fn create(&self, option: &TicketingOption) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO ticketing_options (id, edition_id, name, description, kind, choices,
                                           is_required, position, external_name, created_at,
                                           updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(option.id.into_inner())
        .bind(option.edition_id.into_inner())
        .bind(&option.name)
        .bind(&option.description)
        .bind(option.kind.as_str())
        .bind(&option.choices)
        .bind(option.is_required)
        .bind(option.position)
        .bind(&option.external_name)
        .bind(option.created_at)
        .bind(option.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::EditionNotFound(option.edition_id)))?;

        Ok(())
    }

    #[instrument(skip(self, option), fields(option_id = %option.id))]
    async fn update(&self, option: &TicketingOption) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE ticketing_options
            SET name = $2, description = $3, kind = $4, choices = $5, is_required = $6,
                position = $7, external_name = $8, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(option.id.into_inner())
        .bind(&option.name)
        .bind(&option.description)
        .bind(option.kind.as_str())
        .bind(&option.choices)
        .bind(option.is_required)
        .bind(option.position)
        .bind(&option.external_name)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::OptionNotFound(option.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM ticketing_options WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::OptionNotFound(id));
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
        assert_send_sync::<PgOptionRepository>();
    }
}
