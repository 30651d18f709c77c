//! PostgreSQL implementation of PushSubscriptionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use conv_core::entities::PushSubscription;
use conv_core::error::DomainError;
use conv_core::traits::{PushSubscriptionRepository, RepoResult};
use conv_core::value_objects::Snowflake;

use crate::models::PushSubscriptionModel;

use super::error::{map_db_error, map_fk_violation};

/// PostgreSQL implementation of PushSubscriptionRepository
#[derive(Clone)]
pub struct PgPushSubscriptionRepository {
    pool: PgPool,
}

impl PgPushSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn select(
        &self,
        user_id: Snowflake,
        active_only: bool,
    ) -> RepoResult<Vec<PushSubscription>> {
        let rows = sqlx::query_as::<_, PushSubscriptionModel>(
            r"
            SELECT id, user_id, endpoint, p256dh, auth, user_agent, is_active, created_at, updated_at
            FROM push_subscriptions
            WHERE user_id = $1 AND (NOT $2 OR is_active)
            ORDER BY created_at
            ",
        )
        .bind(user_id.into_inner())
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(PushSubscription::from).collect())
    }
}

#[async_trait]
impl PushSubscriptionRepository for PgPushSubscriptionRepository {
    #[instrument(skip(self, subscription), fields(user_id = %subscription.user_id))]
    async fn upsert(&self, subscription: &PushSubscription) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO push_subscriptions (id, user_id, endpoint, p256dh, auth, user_agent,
                                            is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7, $8)
            ON CONFLICT (endpoint) DO UPDATE
            SET user_id = EXCLUDED.user_id,
                p256dh = EXCLUDED.p256dh,
                auth = EXCLUDED.auth,
                user_agent = EXCLUDED.user_agent,
                is_active = TRUE,
                updated_at = NOW()
            ",
        )
        .bind(subscription.id.into_inner())
        .bind(subscription.user_id.into_inner())
        .bind(&subscription.endpoint)
        .bind(&subscription.p256dh)
        .bind(&subscription.auth)
        .bind(&subscription.user_agent)
        .bind(subscription.created_at)
        .bind(subscription.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::UserNotFound(subscription.user_id)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<PushSubscription>> {
        self.select(user_id, false).await
    }

    #[instrument(skip(self))]
    async fn find_active_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<PushSubscription>> {
        self.select(user_id, true).await
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE push_subscriptions SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::SubscriptionNotFound);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_endpoint(&self, user_id: Snowflake, endpoint: &str) -> RepoResult<bool> {
        let result =
            sqlx::query("DELETE FROM push_subscriptions WHERE user_id = $1 AND endpoint = $2")
                .bind(user_id.into_inner())
                .bind(endpoint)
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
        assert_send_sync::<PgPushSubscriptionRepository>();
    }
}
