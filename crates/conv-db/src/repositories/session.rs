//! PostgreSQL implementation of SessionRepository (refresh_tokens table)

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use conv_core::entities::AuthSession;
use conv_core::error::DomainError;
use conv_core::traits::{RepoResult, SessionRepository};
use conv_core::value_objects::Snowflake;

use crate::models::SessionModel;

use super::error::{map_db_error, map_fk_violation};

/// PostgreSQL implementation of SessionRepository
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    async fn create(&self, session: &AuthSession) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO refresh_tokens (session_id, user_id, expires_at, revoked_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(&session.session_id)
        .bind(session.user_id.into_inner())
        .bind(session.expires_at)
        .bind(session.revoked_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::UserNotFound(session.user_id)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find(&self, session_id: &str) -> RepoResult<Option<AuthSession>> {
        let result = sqlx::query_as::<_, SessionModel>(
            r"
            SELECT session_id, user_id, expires_at, revoked_at, created_at
            FROM refresh_tokens
            WHERE session_id = $1
            ",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(AuthSession::from))
    }

    #[instrument(skip(self))]
    async fn revoke(&self, session_id: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE refresh_tokens
            SET revoked_at = NOW()
            WHERE session_id = $1 AND revoked_at IS NULL
            ",
        )
        .bind(session_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn revoke_all_for_user(&self, user_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE refresh_tokens
            SET revoked_at = NOW()
            WHERE user_id = $1 AND revoked_at IS NULL
            ",
        )
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgSessionRepository>();
    }
}
