//! Edition entity - one dated instance of a convention

use chrono::{DateTime, NaiveDate, Utc};
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Part of the edition a day belongs to, from a volunteer's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EditionPhase {
    Setup,
    Event,
    Teardown,
}

impl EditionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "SETUP",
            Self::Event => "EVENT",
            Self::Teardown => "TEARDOWN",
        }
    }
}

impl FromStr for EditionPhase {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SETUP" => Ok(Self::Setup),
            "EVENT" => Ok(Self::Event),
            "TEARDOWN" => Ok(Self::Teardown),
            other => Err(DomainError::invalid_value("phase", other)),
        }
    }
}

/// Edition entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edition {
    pub id: Snowflake,
    pub convention_id: Snowflake,
    pub creator_id: Snowflake,
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub city: String,
    pub country: String,
    pub address: Option<String>,
    pub image: Option<String>,
    pub is_online: bool,
    pub volunteers_open: bool,
    /// First day volunteers are expected for setup
    pub volunteer_setup_start: Option<NaiveDate>,
    /// Last day volunteers are expected for teardown
    pub volunteer_teardown_end: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Edition {
    /// Check the date invariants:
    /// `start <= end`, `setup_start <= start`, `teardown_end >= end`
    pub fn validate_dates(&self) -> Result<(), DomainError> {
        if self.end_date < self.start_date {
            return Err(DomainError::InvalidDateRange(
                "end_date must not be before start_date".to_string(),
            ));
        }
        if let Some(setup) = self.volunteer_setup_start {
            if setup > self.start_date {
                return Err(DomainError::InvalidDateRange(
                    "volunteer_setup_start must not be after start_date".to_string(),
                ));
            }
        }
        if let Some(teardown) = self.volunteer_teardown_end {
            if teardown < self.end_date {
                return Err(DomainError::InvalidDateRange(
                    "volunteer_teardown_end must not be before end_date".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Full volunteer period, setup and teardown included
    pub fn volunteer_period(&self) -> (NaiveDate, NaiveDate) {
        (
            self.volunteer_setup_start.unwrap_or(self.start_date),
            self.volunteer_teardown_end.unwrap_or(self.end_date),
        )
    }

    /// Classify a day relative to the public event dates
    pub fn phase_for(&self, date: NaiveDate) -> EditionPhase {
        if date < self.start_date {
            EditionPhase::Setup
        } else if date > self.end_date {
            EditionPhase::Teardown
        } else {
            EditionPhase::Event
        }
    }

    #[inline]
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.end_date >= today
    }

    /// Display label, falling back to the year when no name is set
    pub fn label(&self, convention_name: &str) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{} {}", convention_name, self.start_date.format("%Y")),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Event on 10-12 July 2025 with setup from the 8th and teardown until the 13th
    pub fn edition() -> Edition {
        let now = Utc::now();
        Edition {
            id: Snowflake::new(100),
            convention_id: Snowflake::new(10),
            creator_id: Snowflake::new(2),
            name: None,
            description: None,
            start_date: date(2025, 7, 10),
            end_date: date(2025, 7, 12),
            city: "Lyon".to_string(),
            country: "France".to_string(),
            address: None,
            image: None,
            is_online: true,
            volunteers_open: true,
            volunteer_setup_start: Some(date(2025, 7, 8)),
            volunteer_teardown_end: Some(date(2025, 7, 13)),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{date, edition};
    use super::*;

    #[test]
    fn test_phase_for() {
        let edition = edition();
        assert_eq!(edition.phase_for(date(2025, 7, 9)), EditionPhase::Setup);
        assert_eq!(edition.phase_for(date(2025, 7, 10)), EditionPhase::Event);
        assert_eq!(edition.phase_for(date(2025, 7, 12)), EditionPhase::Event);
        assert_eq!(edition.phase_for(date(2025, 7, 13)), EditionPhase::Teardown);
    }

    #[test]
    fn test_validate_dates() {
        let mut edition = edition();
        assert!(edition.validate_dates().is_ok());

        edition.volunteer_setup_start = Some(date(2025, 7, 11));
        assert!(matches!(
            edition.validate_dates(),
            Err(DomainError::InvalidDateRange(_))
        ));

        let mut edition = super::fixtures::edition();
        edition.end_date = date(2025, 7, 1);
        assert!(edition.validate_dates().is_err());
    }

    #[test]
    fn test_volunteer_period_defaults_to_event_dates() {
        let mut edition = edition();
        assert_eq!(edition.volunteer_period(), (date(2025, 7, 8), date(2025, 7, 13)));

        edition.volunteer_setup_start = None;
        edition.volunteer_teardown_end = None;
        assert_eq!(edition.volunteer_period(), (date(2025, 7, 10), date(2025, 7, 12)));
    }

    #[test]
    fn test_label() {
        let mut edition = edition();
        assert_eq!(edition.label("JuggleFest"), "JuggleFest 2025");
        edition.name = Some("Summer Edition".into());
        assert_eq!(edition.label("JuggleFest"), "Summer Edition");
    }

    #[test]
    fn test_phase_parse() {
        assert_eq!("TEARDOWN".parse::<EditionPhase>().unwrap(), EditionPhase::Teardown);
        assert!("teardown".parse::<EditionPhase>().is_err());
    }
}
