//! Convention entity - a recurring event series

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Convention entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convention {
    pub id: Snowflake,
    pub name: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub author_id: Snowflake,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Convention {
    pub fn new(id: Snowflake, name: String, author_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description: None,
            logo: None,
            author_id,
            is_archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_author(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }

    pub fn set_archived(&mut self, archived: bool) {
        self.is_archived = archived;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convention_creation() {
        let convention = Convention::new(Snowflake::new(1), "JuggleFest".into(), Snowflake::new(9));
        assert!(convention.is_author(Snowflake::new(9)));
        assert!(!convention.is_author(Snowflake::new(10)));
        assert!(!convention.is_archived);
    }

    #[test]
    fn test_archive() {
        let mut convention =
            Convention::new(Snowflake::new(1), "JuggleFest".into(), Snowflake::new(9));
        convention.set_archived(true);
        assert!(convention.is_archived);
        assert!(convention.updated_at >= convention.created_at);
    }
}
