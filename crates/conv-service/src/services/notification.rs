//! Notification service
//!
//! Stores in-app notifications, fans them out to the user's push
//! subscriptions and manages those subscriptions.

use chrono::Utc;
use conv_core::entities::{Notification, PushSubscription};
use conv_core::{DomainError, NotificationType, Page, Snowflake};
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::dto::{
    MarkedReadResponse, NotificationResponse, PushConfigResponse, PushSubscriptionResponse,
    SubscribePushRequest, TestNotificationRequest, UnreadCountResponse,
};
use crate::integrations::{PushOutcome, PushPayload};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Outcome counts of one push fan-out
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FanOutReport {
    pub delivered: usize,
    pub deactivated: usize,
    pub failed: usize,
}

/// Notification service
pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    /// Create a new NotificationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Start a notification with a fresh id
    pub fn build(
        &self,
        user_id: Snowflake,
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Notification {
        Notification::new(self.ctx.generate_id(), user_id, kind, title, message)
    }

    /// Store a notification and push it to the user's devices
    #[instrument(skip(self, notification), fields(user_id = %notification.user_id))]
    pub async fn create(&self, notification: Notification) -> ServiceResult<NotificationResponse> {
        self.ctx.notification_repo().create(&notification).await?;

        debug!(notification_id = %notification.id, "Notification stored");

        self.push(&notification).await;

        Ok(NotificationResponse::from(&notification))
    }

    /// Like [`Self::create`] but never fails; used as a side effect of other operations
    pub async fn send(&self, notification: Notification) {
        let user_id = notification.user_id;
        if let Err(e) = self.create(notification).await {
            warn!(user_id = %user_id, error = %e, "Failed to store notification");
        }
    }

    /// Deliver to every active subscription; gone endpoints are deactivated
    #[instrument(skip(self, notification), fields(notification_id = %notification.id))]
    pub async fn push(&self, notification: &Notification) -> FanOutReport {
        let mut report = FanOutReport::default();
        let gateway = self.ctx.push_gateway();
        if !gateway.is_enabled() {
            return report;
        }

        let subscriptions = match self
            .ctx
            .push_subscription_repo()
            .find_active_by_user(notification.user_id)
            .await
        {
            Ok(subscriptions) => subscriptions,
            Err(e) => {
                warn!(error = %e, "Failed to load push subscriptions");
                return report;
            }
        };

        let payload = PushPayload::from(notification);
        let outcomes = join_all(
            subscriptions
                .iter()
                .map(|subscription| gateway.deliver(subscription, &payload)),
        )
        .await;

        for (subscription, outcome) in subscriptions.iter().zip(outcomes) {
            match outcome {
                PushOutcome::Delivered => report.delivered += 1,
                PushOutcome::Skipped => {}
                PushOutcome::Gone => {
                    report.deactivated += 1;
                    if let Err(e) = self
                        .ctx
                        .push_subscription_repo()
                        .deactivate(subscription.id)
                        .await
                    {
                        warn!(
                            subscription_id = %subscription.id,
                            error = %e,
                            "Failed to deactivate subscription"
                        );
                    }
                }
                PushOutcome::Failed(reason) => {
                    report.failed += 1;
                    warn!(
                        subscription_id = %subscription.id,
                        reason = %reason,
                        "Push delivery failed"
                    );
                }
            }
        }

        debug!(?report, "Push fan-out finished");
        report
    }

    /// Newest first, optionally unread only
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: Snowflake,
        unread_only: bool,
        page: Page,
    ) -> ServiceResult<Vec<NotificationResponse>> {
        let notifications = self
            .ctx
            .notification_repo()
            .find_by_user(user_id, unread_only, page)
            .await?;
        Ok(notifications.iter().map(NotificationResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn unread_count(&self, user_id: Snowflake) -> ServiceResult<UnreadCountResponse> {
        let count = self.ctx.notification_repo().unread_count(user_id).await?;
        Ok(UnreadCountResponse { count })
    }

    /// Other users' notifications are reported as missing
    async fn find_own(
        &self,
        user_id: Snowflake,
        notification_id: Snowflake,
    ) -> ServiceResult<Notification> {
        self.ctx
            .notification_repo()
            .find_by_id(notification_id)
            .await?
            .filter(|n| n.user_id == user_id)
            .ok_or_else(|| ServiceError::not_found("Notification", notification_id))
    }

    #[instrument(skip(self))]
    pub async fn mark_read(
        &self,
        user_id: Snowflake,
        notification_id: Snowflake,
    ) -> ServiceResult<NotificationResponse> {
        let mut notification = self.find_own(user_id, notification_id).await?;
        if !notification.is_read {
            self.ctx.notification_repo().mark_read(notification_id).await?;
            notification.is_read = true;
            notification.read_at = Some(Utc::now());
        }
        Ok(NotificationResponse::from(&notification))
    }

    #[instrument(skip(self))]
    pub async fn mark_all_read(&self, user_id: Snowflake) -> ServiceResult<MarkedReadResponse> {
        let updated = self.ctx.notification_repo().mark_all_read(user_id).await?;
        info!(user_id = %user_id, updated, "Notifications marked read");
        Ok(MarkedReadResponse { updated })
    }

    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        user_id: Snowflake,
        notification_id: Snowflake,
    ) -> ServiceResult<()> {
        self.find_own(user_id, notification_id).await?;
        self.ctx.notification_repo().delete(notification_id).await?;
        Ok(())
    }

    /// Send a notification to oneself, to check push delivery end to end
    #[instrument(skip(self, request))]
    pub async fn send_test(
        &self,
        user_id: Snowflake,
        request: TestNotificationRequest,
    ) -> ServiceResult<NotificationResponse> {
        let notification = self
            .build(
                user_id,
                NotificationType::Info,
                request.title.unwrap_or_else(|| "Test notification".to_string()),
                request
                    .message
                    .unwrap_or_else(|| "Notifications are working.".to_string()),
            )
            .with_category("system");
        self.create(notification).await
    }

    // === Push subscriptions ===

    pub fn push_config(&self) -> PushConfigResponse {
        let gateway = self.ctx.push_gateway();
        PushConfigResponse {
            enabled: gateway.is_enabled(),
            public_key: gateway.public_key().map(str::to_string),
        }
    }

    /// Register an endpoint; an existing endpoint is taken over and reactivated
    #[instrument(skip(self, request))]
    pub async fn subscribe(
        &self,
        user_id: Snowflake,
        request: SubscribePushRequest,
    ) -> ServiceResult<PushSubscriptionResponse> {
        let now = Utc::now();
        let subscription = PushSubscription {
            id: self.ctx.generate_id(),
            user_id,
            endpoint: request.endpoint,
            p256dh: request.keys.p256dh,
            auth: request.keys.auth,
            user_agent: request.user_agent,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.ctx.push_subscription_repo().upsert(&subscription).await?;

        info!(user_id = %user_id, "Push subscription registered");

        Ok(PushSubscriptionResponse::from(&subscription))
    }

    #[instrument(skip(self, endpoint))]
    pub async fn unsubscribe(&self, user_id: Snowflake, endpoint: &str) -> ServiceResult<()> {
        let removed = self
            .ctx
            .push_subscription_repo()
            .delete_by_endpoint(user_id, endpoint)
            .await?;
        if !removed {
            return Err(DomainError::SubscriptionNotFound.into());
        }
        info!(user_id = %user_id, "Push subscription removed");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_subscriptions(
        &self,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<PushSubscriptionResponse>> {
        let subscriptions = self.ctx.push_subscription_repo().find_by_user(user_id).await?;
        Ok(subscriptions.iter().map(PushSubscriptionResponse::from).collect())
    }
}
