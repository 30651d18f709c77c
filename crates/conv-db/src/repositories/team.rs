//! PostgreSQL implementation of VolunteerTeamRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use conv_core::entities::VolunteerTeam;
use conv_core::error::DomainError;
use conv_core::traits::{RepoResult, VolunteerTeamRepository};
use conv_core::value_objects::Snowflake;

use crate::models::TeamModel;

use super::error::{map_db_error, map_insert_error, map_unique_violation};

/// PostgreSQL implementation of VolunteerTeamRepository
#[derive(Clone)]
pub struct PgTeamRepository {
    pool: PgPool,
}

impl PgTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VolunteerTeamRepository for PgTeamRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<VolunteerTeam>> {
        let row = sqlx::query_as::<_, TeamModel>(
            r"
            SELECT id, edition_id, name, description, color, max_volunteers, created_at, updated_at
            FROM volunteer_teams
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(VolunteerTeam::from))
    }

    #[instrument(skip(self))]
    async fn find_by_edition(&self, edition_id: Snowflake) -> RepoResult<Vec<VolunteerTeam>> {
        let rows = sqlx::query_as::<_, TeamModel>(
            r"
            SELECT id, edition_id, name, description, color, max_volunteers, created_at, updated_at
            FROM volunteer_teams
            WHERE edition_id = $1
            ORDER BY name
            ",
        )
        .bind(edition_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(VolunteerTeam::from).collect())
    }

    #[instrument(skip(self))]
    async fn name_exists(
        &self,
        edition_id: Snowflake,
        name: &str,
        except: Option<Snowflake>,
    ) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM volunteer_teams
                WHERE edition_id = $1 AND LOWER(name) = LOWER($2)
                  AND ($3::BIGINT IS NULL OR id <> $3)
            )
            ",
        )
        .bind(edition_id.into_inner())
        .bind(name.trim())
        .bind(except.map(Snowflake::into_inner))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, team), fields(team_id = %team.id))]
    async fn create(&self, team: &VolunteerTeam) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO volunteer_teams (id, edition_id, name, description, color, max_volunteers,
                                         created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(team.id.into_inner())
        .bind(team.edition_id.into_inner())
        .bind(&team.name)
        .bind(&team.description)
        .bind(&team.color)
        .bind(team.max_volunteers)
        .bind(team.created_at)
        .bind(team.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_insert_error(
                e,
                || DomainError::TeamNameTaken,
                || DomainError::EditionNotFound(team.edition_id),
            )
        })?;

        Ok(())
    }

    #[instrument(skip(self, team), fields(team_id = %team.id))]
    async fn update(&self, team: &VolunteerTeam) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE volunteer_teams
            SET name = $2, description = $3, color = $4, max_volunteers = $5, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(team.id.into_inner())
        .bind(&team.name)
        .bind(&team.description)
        .bind(&team.color)
        .bind(team.max_volunteers)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::TeamNameTaken))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TeamNotFound(team.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM volunteer_teams WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TeamNotFound(id));
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
        assert_send_sync::<PgTeamRepository>();
    }
}
