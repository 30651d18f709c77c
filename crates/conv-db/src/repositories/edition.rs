//! PostgreSQL implementation of EditionRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use conv_core::entities::Edition;
use conv_core::error::DomainError;
use conv_core::traits::{EditionRepository, Page, RepoResult};
use conv_core::value_objects::Snowflake;

use crate::models::EditionModel;

use super::error::{map_db_error, map_fk_violation};

const EDITION_COLUMNS: &str = r"
    id, convention_id, creator_id, name, description, start_date, end_date, city, country,
    address, image, is_online, volunteers_open, volunteer_setup_start, volunteer_teardown_end,
    created_at, updated_at
";

/// PostgreSQL implementation of EditionRepository
#[derive(Clone)]
pub struct PgEditionRepository {
    pool: PgPool,
}

impl PgEditionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EditionRepository for PgEditionRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Edition>> {
        let result = sqlx::query_as::<_, EditionModel>(&format!(
            "SELECT {EDITION_COLUMNS} FROM editions WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Edition::from))
    }

    #[instrument(skip(self))]
    async fn find_by_convention(&self, convention_id: Snowflake) -> RepoResult<Vec<Edition>> {
        let rows = sqlx::query_as::<_, EditionModel>(&format!(
            "SELECT {EDITION_COLUMNS} FROM editions WHERE convention_id = $1 ORDER BY start_date DESC"
        ))
        .bind(convention_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Edition::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_upcoming(&self, today: NaiveDate, page: Page) -> RepoResult<Vec<Edition>> {
        let rows = sqlx::query_as::<_, EditionModel>(&format!(
            r"
            SELECT {EDITION_COLUMNS}
            FROM editions
            WHERE is_online AND end_date >= $1
            ORDER BY start_date, id
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(today)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Edition::from).collect())
    }

    #[instrument(skip(self, edition), fields(edition_id = %edition.id))]
    async fn create(&self, edition: &Edition) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO editions (id, convention_id, creator_id, name, description, start_date,
                                  end_date, city, country, address, image, is_online,
                                  volunteers_open, volunteer_setup_start, volunteer_teardown_end,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ",
        )
        .bind(edition.id.into_inner())
        .bind(edition.convention_id.into_inner())
        .bind(edition.creator_id.into_inner())
        .bind(&edition.name)
        .bind(&edition.description)
        .bind(edition.start_date)
        .bind(edition.end_date)
        .bind(&edition.city)
        .bind(&edition.country)
        .bind(&edition.address)
        .bind(&edition.image)
        .bind(edition.is_online)
        .bind(edition.volunteers_open)
        .bind(edition.volunteer_setup_start)
        .bind(edition.volunteer_teardown_end)
        .bind(edition.created_at)
        .bind(edition.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_fk_violation(e, || DomainError::ConventionNotFound(edition.convention_id))
        })?;

        Ok(())
    }

    #[instrument(skip(self, edition), fields(edition_id = %edition.id))]
    async fn update(&self, edition: &Edition) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE editions
            SET name = $2, description = $3, start_date = $4, end_date = $5, city = $6,
                country = $7, address = $8, image = $9, is_online = $10, volunteers_open = $11,
                volunteer_setup_start = $12, volunteer_teardown_end = $13, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(edition.id.into_inner())
        .bind(&edition.name)
        .bind(&edition.description)
        .bind(edition.start_date)
        .bind(edition.end_date)
        .bind(&edition.city)
        .bind(&edition.country)
        .bind(&edition.address)
        .bind(&edition.image)
        .bind(edition.is_online)
        .bind(edition.volunteers_open)
        .bind(edition.volunteer_setup_start)
        .bind(edition.volunteer_teardown_end)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EditionNotFound(edition.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM editions WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EditionNotFound(id));
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
        assert_send_sync::<PgEditionRepository>();
    }
}
