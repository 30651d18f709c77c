//! Notification and push subscription mappers

use conv_core::entities::{Notification, PushSubscription};
use conv_core::error::DomainError;
use conv_core::value_objects::Snowflake;

use crate::models::{NotificationModel, PushSubscriptionModel};

impl TryFrom<NotificationModel> for Notification {
    type Error = DomainError;

    fn try_from(model: NotificationModel) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            kind: model.kind.parse()?,
            title: model.title,
            message: model.message,
            category: model.category,
            entity_type: model.entity_type,
            entity_id: model.entity_id.map(Snowflake::new),
            action_url: model.action_url,
            is_read: model.is_read,
            read_at: model.read_at,
            created_at: model.created_at,
        })
    }
}

impl From<PushSubscriptionModel> for PushSubscription {
    fn from(model: PushSubscriptionModel) -> Self {
        PushSubscription {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            endpoint: model.endpoint,
            p256dh: model.p256dh,
            auth: model.auth,
            user_agent: model.user_agent,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
