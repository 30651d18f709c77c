//! Web push delivery through an HTTP relay
//!
//! The relay owns the VAPID keys and the web-push encryption; this side only
//! forwards the subscription and the payload. Without a relay, push is
//! disabled and deliveries are skipped.

use async_trait::async_trait;
use conv_common::PushConfig;
use conv_core::{Notification, PushSubscription};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::services::{ServiceError, ServiceResult};

/// Body shown by the browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub notification_id: String,
}

impl From<&Notification> for PushPayload {
    fn from(notification: &Notification) -> Self {
        Self {
            title: notification.title.clone(),
            body: notification.message.clone(),
            url: notification.action_url.clone(),
            notification_id: notification.id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Delivered,
    /// The endpoint no longer exists; the subscription should be deactivated
    Gone,
    Skipped,
    Failed(String),
}

#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn deliver(&self, subscription: &PushSubscription, payload: &PushPayload) -> PushOutcome;

    fn is_enabled(&self) -> bool;

    /// Public key browsers subscribe with
    fn public_key(&self) -> Option<&str>;
}

#[derive(Serialize)]
struct RelayKeys<'a> {
    p256dh: &'a str,
    auth: &'a str,
}

#[derive(Serialize)]
struct RelaySubscription<'a> {
    endpoint: &'a str,
    keys: RelayKeys<'a>,
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    subscription: RelaySubscription<'a>,
    payload: &'a PushPayload,
}

#[derive(Debug, Clone)]
pub struct RelayPushGateway {
    http: Client,
    relay_url: String,
    relay_token: Option<String>,
    public_key: Option<String>,
}

impl RelayPushGateway {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(
        relay_url: impl Into<String>,
        relay_token: Option<String>,
        public_key: Option<String>,
        timeout: Duration,
    ) -> ServiceResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            relay_url: relay_url.into(),
            relay_token,
            public_key,
        })
    }
}

#[async_trait]
impl PushGateway for RelayPushGateway {
    #[instrument(skip_all, fields(subscription_id = %subscription.id))]
    async fn deliver(&self, subscription: &PushSubscription, payload: &PushPayload) -> PushOutcome {
        let body = RelayRequest {
            subscription: RelaySubscription {
                endpoint: &subscription.endpoint,
                keys: RelayKeys {
                    p256dh: &subscription.p256dh,
                    auth: &subscription.auth,
                },
            },
            payload,
        };

        let mut request = self.http.post(&self.relay_url).json(&body);
        if let Some(token) = &self.relay_token {
            request = request.bearer_auth(token);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => PushOutcome::Delivered,
            Ok(response)
                if matches!(response.status(), StatusCode::NOT_FOUND | StatusCode::GONE) =>
            {
                PushOutcome::Gone
            }
            Ok(response) => {
                warn!(status = %response.status(), "Push relay refused the notification");
                PushOutcome::Failed(format!("relay answered {}", response.status()))
            }
            Err(e) => {
                warn!(error = %e, "Push relay unreachable");
                PushOutcome::Failed(e.to_string())
            }
        }
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn public_key(&self) -> Option<&str> {
        self.public_key.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPushGateway;

#[async_trait]
impl PushGateway for DisabledPushGateway {
    async fn deliver(
        &self,
        subscription: &PushSubscription,
        _payload: &PushPayload,
    ) -> PushOutcome {
        debug!(subscription_id = %subscription.id, "Push disabled, skipping delivery");
        PushOutcome::Skipped
    }

    fn is_enabled(&self) -> bool {
        false
    }

    fn public_key(&self) -> Option<&str> {
        None
    }
}

/// Relay gateway when a relay URL is configured, disabled gateway otherwise
///
/// # Errors
/// Returns an error if the HTTP client cannot be built
pub fn push_gateway_from_config(config: &PushConfig) -> ServiceResult<Arc<dyn PushGateway>> {
    match &config.relay_url {
        Some(url) => Ok(Arc::new(RelayPushGateway::new(
            url.clone(),
            config.relay_token.clone(),
            config.vapid_public_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )?)),
        None => Ok(Arc::new(DisabledPushGateway)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use conv_core::{NotificationType, Snowflake};

    fn subscription() -> PushSubscription {
        let now = Utc::now();
        PushSubscription {
            id: Snowflake::new(1),
            user_id: Snowflake::new(2),
            endpoint: "https://push.example.com/abc".into(),
            p256dh: "key".into(),
            auth: "auth".into(),
            user_agent: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_payload_from_notification() {
        let notification = Notification::new(
            Snowflake::new(77),
            Snowflake::new(2),
            NotificationType::Success,
            "Accepted",
            "Your application was accepted",
        )
        .with_action_url("/editions/100/volunteers");

        let payload = PushPayload::from(&notification);
        assert_eq!(payload.notification_id, "77");
        assert_eq!(payload.url.as_deref(), Some("/editions/100/volunteers"));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["body"], "Your application was accepted");
    }

    #[tokio::test]
    async fn test_disabled_gateway_skips() {
        let gateway = DisabledPushGateway;
        let payload = PushPayload {
            title: "t".into(),
            body: "b".into(),
            url: None,
            notification_id: "1".into(),
        };
        assert_eq!(gateway.deliver(&subscription(), &payload).await, PushOutcome::Skipped);
        assert!(!gateway.is_enabled());
    }

    #[test]
    fn test_gateway_from_config() {
        let disabled = push_gateway_from_config(&PushConfig {
            relay_url: None,
            relay_token: None,
            vapid_public_key: None,
            timeout_secs: 5,
        })
        .unwrap();
        assert!(!disabled.is_enabled());

        let relay = push_gateway_from_config(&PushConfig {
            relay_url: Some("http://localhost:9999/push".into()),
            relay_token: None,
            vapid_public_key: Some("BPublicKey".into()),
            timeout_secs: 5,
        })
        .unwrap();
        assert!(relay.is_enabled());
        assert_eq!(relay.public_key(), Some("BPublicKey"));
    }
}
