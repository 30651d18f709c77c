//! PostgreSQL implementation of TimeSlotRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use conv_core::entities::VolunteerTimeSlot;
use conv_core::error::DomainError;
use conv_core::traits::{RepoResult, TimeSlotRepository};
use conv_core::value_objects::Snowflake;

use crate::mappers::time_slot_with_assignments;
use crate::models::{AssignmentModel, TimeSlotModel};

use super::error::{map_db_error, map_fk_violation, map_unique_violation};

/// PostgreSQL implementation of TimeSlotRepository
#[derive(Clone)]
pub struct PgTimeSlotRepository {
    pool: PgPool,
}

impl PgTimeSlotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn hydrate(&self, rows: Vec<TimeSlotModel>) -> RepoResult<Vec<VolunteerTimeSlot>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let assignments = sqlx::query_as::<_, AssignmentModel>(
            r"
            SELECT time_slot_id, user_id
            FROM volunteer_assignments
            WHERE time_slot_id = ANY($1)
            ORDER BY assigned_at
            ",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut by_slot: HashMap<i64, Vec<i64>> = HashMap::new();
        for a in assignments {
            by_slot.entry(a.time_slot_id).or_default().push(a.user_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let users = by_slot.remove(&row.id).unwrap_or_default();
                time_slot_with_assignments(row, users)
            })
            .collect())
    }
}

#[async_trait]
impl TimeSlotRepository for PgTimeSlotRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<VolunteerTimeSlot>> {
        let row = sqlx::query_as::<_, TimeSlotModel>(
            r"
            SELECT id, edition_id, team_id, title, description, start_at, end_at, max_volunteers,
                   created_at, updated_at
            FROM volunteer_time_slots
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
    async fn find_by_edition(&self, edition_id: Snowflake) -> RepoResult<Vec<VolunteerTimeSlot>> {
        let rows = sqlx::query_as::<_, TimeSlotModel>(
            r"
            SELECT id, edition_id, team_id, title, description, start_at, end_at, max_volunteers,
                   created_at, updated_at
            FROM volunteer_time_slots
            WHERE edition_id = $1
            ORDER BY start_at, id
            ",
        )
        .bind(edition_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.hydrate(rows).await
    }

    #[instrument(skip(self))]
    async fn find_assigned(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Vec<VolunteerTimeSlot>> {
        let rows = sqlx::query_as::<_, TimeSlotModel>(
            r"
            SELECT s.id, s.edition_id, s.team_id, s.title, s.description, s.start_at, s.end_at,
                   s.max_volunteers, s.created_at, s.updated_at
            FROM volunteer_time_slots s
            INNER JOIN volunteer_assignments a ON a.time_slot_id = s.id
            WHERE s.edition_id = $1 AND a.user_id = $2
            ORDER BY s.start_at
            ",
        )
        .bind(edition_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.hydrate(rows).await
    }

    #[instrument(skip(self, slot), fields(slot_id = %slot.id))]
    async fn create(&self, slot: &VolunteerTimeSlot) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO volunteer_time_slots (id, edition_id, team_id, title, description,
                                              start_at, end_at, max_volunteers, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(slot.id.into_inner())
        .bind(slot.edition_id.into_inner())
        .bind(slot.team_id.map(Snowflake::into_inner))
        .bind(&slot.title)
        .bind(&slot.description)
        .bind(slot.start_at)
        .bind(slot.end_at)
        .bind(slot.max_volunteers)
        .bind(slot.created_at)
        .bind(slot.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::EditionNotFound(slot.edition_id)))?;

        Ok(())
    }

    #[instrument(skip(self, slot), fields(slot_id = %slot.id))]
    async fn update(&self, slot: &VolunteerTimeSlot) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE volunteer_time_slots
            SET team_id = $2, title = $3, description = $4, start_at = $5, end_at = $6,
                max_volunteers = $7, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(slot.id.into_inner())
        .bind(slot.team_id.map(Snowflake::into_inner))
        .bind(&slot.title)
        .bind(&slot.description)
        .bind(slot.start_at)
        .bind(slot.end_at)
        .bind(slot.max_volunteers)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TimeSlotNotFound(slot.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM volunteer_time_slots WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TimeSlotNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn assign(&self, slot_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let capacity = sqlx::query_scalar::<_, i32>(
            "SELECT max_volunteers FROM volunteer_time_slots WHERE id = $1 FOR UPDATE",
        )
        .bind(slot_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::TimeSlotNotFound(slot_id))?;

        let assigned = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM volunteer_assignments WHERE time_slot_id = $1",
        )
        .bind(slot_id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if assigned >= i64::from(capacity) {
            return Err(DomainError::TimeSlotFull);
        }

        sqlx::query(
            r"
            INSERT INTO volunteer_assignments (time_slot_id, user_id, assigned_at)
            VALUES ($1, $2, NOW())
            ",
        )
        .bind(slot_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyAssigned))?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn unassign(&self, slot_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            "DELETE FROM volunteer_assignments WHERE time_slot_id = $1 AND user_id = $2",
        )
        .bind(slot_id.into_inner())
        .bind(user_id.into_inner())
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
        assert_send_sync::<PgTimeSlotRepository>();
    }
}
