//! In-app notifications and push subscriptions

use chrono::{DateTime, Utc};
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NotificationType {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl FromStr for NotificationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INFO" => Ok(Self::Info),
            "SUCCESS" => Ok(Self::Success),
            "WARNING" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            other => Err(DomainError::invalid_value("notification type", other)),
        }
    }
}

/// Notification entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub category: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<Snowflake>,
    pub action_url: Option<String>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        id: Snowflake,
        user_id: Snowflake,
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id,
            user_id,
            kind,
            title: title.into(),
            message: message.into(),
            category: None,
            entity_type: None,
            entity_id: None,
            action_url: None,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_entity(mut self, entity_type: impl Into<String>, entity_id: Snowflake) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id);
        self
    }

    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }
}

/// Web push subscription of a browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushSubscription {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub user_agent: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let n = Notification::new(
            Snowflake::new(1),
            Snowflake::new(2),
            NotificationType::Success,
            "Accepted",
            "Your application was accepted",
        )
        .with_category("volunteer")
        .with_entity("edition", Snowflake::new(100))
        .with_action_url("/editions/100/volunteers");

        assert!(!n.is_read);
        assert_eq!(n.category.as_deref(), Some("volunteer"));
        assert_eq!(n.entity_id, Some(Snowflake::new(100)));
        assert_eq!(n.kind.as_str(), "SUCCESS");
    }
}
