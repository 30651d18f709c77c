//! PostgreSQL implementation of VolunteerApplicationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use conv_core::entities::{ApplicationStatus, VolunteerApplication, VolunteerMealSelection};
use conv_core::error::DomainError;
use conv_core::traits::{RepoResult, VolunteerApplicationRepository};
use conv_core::value_objects::Snowflake;

use crate::models::ApplicationModel;

use super::error::{map_db_error, map_insert_error, raw_ids, try_map_all};
use super::meal::write_selections;

const APPLICATION_COLUMNS: &str = r"
    id, edition_id, user_id, status, motivation, arrival, departure, setup_availability,
    event_availability, teardown_availability, team_preferences, diet, allergies, phone,
    decided_at, decided_by_id, created_at, updated_at
";

/// PostgreSQL implementation of VolunteerApplicationRepository
#[derive(Clone)]
pub struct PgApplicationRepository {
    pool: PgPool,
}

impl PgApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VolunteerApplicationRepository for PgApplicationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<VolunteerApplication>> {
        let row = sqlx::query_as::<_, ApplicationModel>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM volunteer_applications WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(VolunteerApplication::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<VolunteerApplication>> {
        let row = sqlx::query_as::<_, ApplicationModel>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM volunteer_applications WHERE edition_id = $1 AND user_id = $2"
        ))
        .bind(edition_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(VolunteerApplication::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_edition(
        &self,
        edition_id: Snowflake,
        status: Option<ApplicationStatus>,
    ) -> RepoResult<Vec<VolunteerApplication>> {
        let rows = sqlx::query_as::<_, ApplicationModel>(&format!(
            r"
            SELECT {APPLICATION_COLUMNS}
            FROM volunteer_applications
            WHERE edition_id = $1 AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY created_at
            "
        ))
        .bind(edition_id.into_inner())
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        try_map_all(rows)
    }

    #[instrument(skip(self, application), fields(application_id = %application.id))]
    async fn create(&self, application: &VolunteerApplication) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO volunteer_applications (id, edition_id, user_id, status, motivation, arrival,
                departure, setup_availability, event_availability, teardown_availability,
                team_preferences, diet, allergies, phone, decided_at, decided_by_id,
                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ",
        )
        .bind(application.id.into_inner())
        .bind(application.edition_id.into_inner())
        .bind(application.user_id.into_inner())
        .bind(application.status.as_str())
        .bind(&application.motivation)
        .bind(application.arrival.map(|a| a.to_string()))
        .bind(application.departure.map(|d| d.to_string()))
        .bind(application.setup_availability)
        .bind(application.event_availability)
        .bind(application.teardown_availability)
        .bind(raw_ids(&application.team_preferences))
        .bind(application.diet.as_str())
        .bind(&application.allergies)
        .bind(&application.phone)
        .bind(application.decided_at)
        .bind(application.decided_by_id.map(Snowflake::into_inner))
        .bind(application.created_at)
        .bind(application.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_insert_error(
                e,
                || DomainError::AlreadyApplied,
                || DomainError::EditionNotFound(application.edition_id),
            )
        })?;

        Ok(())
    }

    #[instrument(skip(self, application), fields(application_id = %application.id))]
    async fn update(&self, application: &VolunteerApplication) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE volunteer_applications
            SET motivation = $2, arrival = $3, departure = $4, setup_availability = $5,
                event_availability = $6, teardown_availability = $7, team_preferences = $8,
                diet = $9, allergies = $10, phone = $11, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(application.id.into_inner())
        .bind(&application.motivation)
        .bind(application.arrival.map(|a| a.to_string()))
        .bind(application.departure.map(|d| d.to_string()))
        .bind(application.setup_availability)
        .bind(application.event_availability)
        .bind(application.teardown_availability)
        .bind(raw_ids(&application.team_preferences))
        .bind(application.diet.as_str())
        .bind(&application.allergies)
        .bind(&application.phone)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ApplicationNotFound);
        }

        Ok(())
    }

    #[instrument(
        skip(self, application, selections),
        fields(application_id = %application.id, status = application.status.as_str())
    )]
    async fn decide(
        &self,
        application: &VolunteerApplication,
        selections: &[VolunteerMealSelection],
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r"
            UPDATE volunteer_applications
            SET status = $2, decided_at = $3, decided_by_id = $4, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(application.id.into_inner())
        .bind(application.status.as_str())
        .bind(application.decided_at)
        .bind(application.decided_by_id.map(Snowflake::into_inner))
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ApplicationNotFound);
        }

        write_selections(&mut tx, application.id, selections).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM volunteer_applications WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ApplicationNotFound);
        }

        Ok(())
    }
}
