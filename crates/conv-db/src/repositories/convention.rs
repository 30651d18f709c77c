//! PostgreSQL implementation of ConventionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use conv_core::entities::Convention;
use conv_core::error::DomainError;
use conv_core::traits::{ConventionRepository, Page, RepoResult};
use conv_core::value_objects::Snowflake;

use crate::models::ConventionModel;

use super::error::{map_db_error, map_fk_violation};

/// PostgreSQL implementation of ConventionRepository
#[derive(Clone)]
pub struct PgConventionRepository {
    pool: PgPool,
}

impl PgConventionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConventionRepository for PgConventionRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Convention>> {
        let result = sqlx::query_as::<_, ConventionModel>(
            r"
            SELECT id, name, description, logo, author_id, is_archived, created_at, updated_at
            FROM conventions
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Convention::from))
    }

    #[instrument(skip(self))]
    async fn list_active(&self, page: Page) -> RepoResult<Vec<Convention>> {
        let rows = sqlx::query_as::<_, ConventionModel>(
            r"
            SELECT id, name, description, logo, author_id, is_archived, created_at, updated_at
            FROM conventions
            WHERE NOT is_archived
            ORDER BY name, id
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Convention::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Convention>> {
        let rows = sqlx::query_as::<_, ConventionModel>(
            r"
            SELECT c.id, c.name, c.description, c.logo, c.author_id, c.is_archived,
                   c.created_at, c.updated_at
            FROM conventions c
            WHERE c.author_id = $1
               OR EXISTS (
                   SELECT 1 FROM convention_collaborators cc
                   WHERE cc.convention_id = c.id AND cc.user_id = $1
               )
            ORDER BY c.created_at DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Convention::from).collect())
    }

    #[instrument(skip(self, convention), fields(convention_id = %convention.id))]
    async fn create(&self, convention: &Convention) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO conventions (id, name, description, logo, author_id, is_archived,
                                     created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(convention.id.into_inner())
        .bind(&convention.name)
        .bind(&convention.description)
        .bind(&convention.logo)
        .bind(convention.author_id.into_inner())
        .bind(convention.is_archived)
        .bind(convention.created_at)
        .bind(convention.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::UserNotFound(convention.author_id)))?;

        Ok(())
    }

    #[instrument(skip(self, convention), fields(convention_id = %convention.id))]
    async fn update(&self, convention: &Convention) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE conventions
            SET name = $2, description = $3, logo = $4, is_archived = $5, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(convention.id.into_inner())
        .bind(&convention.name)
        .bind(&convention.description)
        .bind(&convention.logo)
        .bind(convention.is_archived)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ConventionNotFound(convention.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM conventions WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ConventionNotFound(id));
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
        assert_send_sync::<PgConventionRepository>();
    }
}
