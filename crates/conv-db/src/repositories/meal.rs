//! PostgreSQL implementation of MealRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use conv_core::entities::{VolunteerMeal, VolunteerMealSelection};
use conv_core::error::DomainError;
use conv_core::traits::{MealRepository, RepoResult};
use conv_core::value_objects::Snowflake;

use crate::models::{MealHeadcountModel, MealModel, MealSelectionModel};

use super::error::{map_db_error, map_fk_violation, try_map_all};

/// PostgreSQL implementation of MealRepository
#[derive(Clone)]
pub struct PgMealRepository {
    pool: PgPool,
}

impl PgMealRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Replace the selections of one application inside an open transaction
pub(super) async fn write_selections(
    tx: &mut Transaction<'_, Postgres>,
    application_id: Snowflake,
    selections: &[VolunteerMealSelection],
) -> RepoResult<()> {
    sqlx::query("DELETE FROM volunteer_meal_selections WHERE application_id = $1")
        .bind(application_id.into_inner())
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;

    for selection in selections {
        sqlx::query(
            r"
            INSERT INTO volunteer_meal_selections (application_id, meal_id, accepted, updated_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(application_id.into_inner())
        .bind(selection.meal_id.into_inner())
        .bind(selection.accepted)
        .bind(selection.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::MealNotFound(selection.meal_id)))?;
    }

    Ok(())
}

#[async_trait]
impl MealRepository for PgMealRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<VolunteerMeal>> {
        let row = sqlx::query_as::<_, MealModel>(
            r"
            SELECT id, edition_id, date, meal_type, phase, enabled
            FROM volunteer_meals
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(VolunteerMeal::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_edition(&self, edition_id: Snowflake) -> RepoResult<Vec<VolunteerMeal>> {
        let rows = sqlx::query_as::<_, MealModel>(
            r"
            SELECT id, edition_id, date, meal_type, phase, enabled
            FROM volunteer_meals
            WHERE edition_id = $1
            ",
        )
        .bind(edition_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut meals: Vec<VolunteerMeal> = try_map_all(rows)?;
        meals.sort_by_key(VolunteerMeal::sort_key);
        Ok(meals)
    }

    #[instrument(skip(self, meals), fields(count = meals.len()))]
    async fn create_many(&self, meals: &[VolunteerMeal]) -> RepoResult<u64> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let mut inserted = 0;

        for meal in meals {
            let result = sqlx::query(
                r"
                INSERT INTO volunteer_meals (id, edition_id, date, meal_type, phase, enabled)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (edition_id, date, meal_type) DO NOTHING
                ",
            )
            .bind(meal.id.into_inner())
            .bind(meal.edition_id.into_inner())
            .bind(meal.date)
            .bind(meal.meal_type.as_str())
            .bind(meal.phase.as_str())
            .bind(meal.enabled)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_fk_violation(e, || DomainError::EditionNotFound(meal.edition_id)))?;

            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(inserted)
    }

    #[instrument(skip(self))]
    async fn set_enabled(&self, id: Snowflake, enabled: bool) -> RepoResult<()> {
        let result = sqlx::query("UPDATE volunteer_meals SET enabled = $2 WHERE id = $1")
            .bind(id.into_inner())
            .bind(enabled)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MealNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_selections(
        &self,
        application_id: Snowflake,
    ) -> RepoResult<Vec<VolunteerMealSelection>> {
        let rows = sqlx::query_as::<_, MealSelectionModel>(
            r"
            SELECT application_id, meal_id, accepted, updated_at
            FROM volunteer_meal_selections
            WHERE application_id = $1
            ",
        )
        .bind(application_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(VolunteerMealSelection::from).collect())
    }

    #[instrument(skip(self, selections), fields(count = selections.len()))]
    async fn replace_selections(
        &self,
        application_id: Snowflake,
        selections: &[VolunteerMealSelection],
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        write_selections(&mut tx, application_id, selections).await?;
        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn headcounts(&self, edition_id: Snowflake) -> RepoResult<Vec<(Snowflake, i64)>> {
        let rows = sqlx::query_as::<_, MealHeadcountModel>(
            r"
            SELECT s.meal_id, COUNT(*) AS headcount
            FROM volunteer_meal_selections s
            INNER JOIN volunteer_meals m ON m.id = s.meal_id
            INNER JOIN volunteer_applications a ON a.id = s.application_id
            WHERE m.edition_id = $1 AND m.enabled AND s.accepted AND a.status = 'ACCEPTED'
            GROUP BY s.meal_id
            ",
        )
        .bind(edition_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|r| (Snowflake::new(r.meal_id), r.headcount))
            .collect())
    }
}
