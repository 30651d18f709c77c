//! PostgreSQL implementation of CollaboratorRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use conv_core::entities::ConventionCollaborator;
use conv_core::error::DomainError;
use conv_core::traits::{CollaboratorRepository, RepoResult};
use conv_core::value_objects::Snowflake;

use crate::mappers::collaborator_with_permissions;
use crate::models::{CollaboratorModel, EditionPermissionModel};

use super::error::{map_db_error, map_fk_violation, map_unique_violation};

/// PostgreSQL implementation of CollaboratorRepository
#[derive(Clone)]
pub struct PgCollaboratorRepository {
    pool: PgPool,
}

impl PgCollaboratorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn permissions_for(&self, ids: Vec<i64>) -> RepoResult<Vec<EditionPermissionModel>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, EditionPermissionModel>(
            r"
            SELECT collaborator_id, edition_id, rights
            FROM collaborator_edition_permissions
            WHERE collaborator_id = ANY($1)
            ",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn hydrate(
        &self,
        rows: Vec<CollaboratorModel>,
    ) -> RepoResult<Vec<ConventionCollaborator>> {
        let permissions = self
            .permissions_for(rows.iter().map(|r| r.id).collect())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| collaborator_with_permissions(row, permissions.iter().cloned()))
            .collect())
    }

    async fn insert_permissions(
        tx: &mut Transaction<'_, Postgres>,
        collaborator: &ConventionCollaborator,
    ) -> RepoResult<()> {
        for permission in &collaborator.edition_permissions {
            sqlx::query(
                r"
                INSERT INTO collaborator_edition_permissions (collaborator_id, edition_id, rights)
                VALUES ($1, $2, $3)
                ",
            )
            .bind(collaborator.id.into_inner())
            .bind(permission.edition_id.into_inner())
            .bind(permission.rights.to_i32())
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                map_fk_violation(e, || DomainError::EditionNotFound(permission.edition_id))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl CollaboratorRepository for PgCollaboratorRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<ConventionCollaborator>> {
        let row = sqlx::query_as::<_, CollaboratorModel>(
            r"
            SELECT id, convention_id, user_id, title, rights, added_by_id, created_at, updated_at
            FROM convention_collaborators
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
    async fn find(
        &self,
        convention_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<ConventionCollaborator>> {
        let row = sqlx::query_as::<_, CollaboratorModel>(
            r"
            SELECT id, convention_id, user_id, title, rights, added_by_id, created_at, updated_at
            FROM convention_collaborators
            WHERE convention_id = $1 AND user_id = $2
            ",
        )
        .bind(convention_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn find_by_convention(
        &self,
        convention_id: Snowflake,
    ) -> RepoResult<Vec<ConventionCollaborator>> {
        let rows = sqlx::query_as::<_, CollaboratorModel>(
            r"
            SELECT id, convention_id, user_id, title, rights, added_by_id, created_at, updated_at
            FROM convention_collaborators
            WHERE convention_id = $1
            ORDER BY created_at
            ",
        )
        .bind(convention_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.hydrate(rows).await
    }

    #[instrument(skip(self, collaborator), fields(collaborator_id = %collaborator.id))]
    async fn create(&self, collaborator: &ConventionCollaborator) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO convention_collaborators (id, convention_id, user_id, title, rights,
                                                  added_by_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(collaborator.id.into_inner())
        .bind(collaborator.convention_id.into_inner())
        .bind(collaborator.user_id.into_inner())
        .bind(&collaborator.title)
        .bind(collaborator.rights.to_i32())
        .bind(collaborator.added_by_id.into_inner())
        .bind(collaborator.created_at)
        .bind(collaborator.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyCollaborator))?;

        Self::insert_permissions(&mut tx, collaborator).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, collaborator), fields(collaborator_id = %collaborator.id))]
    async fn update(&self, collaborator: &ConventionCollaborator) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r"
            UPDATE convention_collaborators
            SET title = $2, rights = $3, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(collaborator.id.into_inner())
        .bind(&collaborator.title)
        .bind(collaborator.rights.to_i32())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CollaboratorNotFound);
        }

        sqlx::query("DELETE FROM collaborator_edition_permissions WHERE collaborator_id = $1")
            .bind(collaborator.id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        Self::insert_permissions(&mut tx, collaborator).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM convention_collaborators WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CollaboratorNotFound);
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
        assert_send_sync::<PgCollaboratorRepository>();
    }
}
