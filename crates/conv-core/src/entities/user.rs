//! User entity and refresh-token sessions

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub email: String,
    pub pseudo: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub profile_picture: Option<String>,
    pub is_global_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new regular (non-admin) user
    pub fn new(id: Snowflake, email: String, pseudo: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            pseudo,
            first_name: None,
            last_name: None,
            phone: None,
            profile_picture: None,
            is_global_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// "First Last" when both are known, otherwise the pseudo
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            _ => self.pseudo.clone(),
        }
    }
}

/// A refresh-token session; one row per issued token pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub session_id: String,
    pub user_id: Snowflake,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AuthSession {
    #[inline]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_display_name() {
        let mut user = User::new(Snowflake::new(1), "a@b.c".into(), "juggler".into());
        assert_eq!(user.display_name(), "juggler");
        assert!(!user.is_global_admin);

        user.first_name = Some("Ada".into());
        assert_eq!(user.display_name(), "juggler");

        user.last_name = Some("Lovelace".into());
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_session_liveness() {
        let now = Utc::now();
        let mut session = AuthSession {
            session_id: "s".into(),
            user_id: Snowflake::new(1),
            expires_at: now + Duration::hours(1),
            revoked_at: None,
            created_at: now,
        };
        assert!(session.is_live(now));
        assert!(!session.is_live(now + Duration::hours(2)));

        session.revoked_at = Some(now);
        assert!(!session.is_live(now));
    }
}
