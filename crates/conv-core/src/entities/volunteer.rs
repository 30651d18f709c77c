//! Volunteer applications, teams and time slots

use chrono::{DateTime, Utc};
use std::str::FromStr;

use crate::entities::EditionPhase;
use crate::error::DomainError;
use crate::value_objects::{ArrivalSlot, Snowflake};

/// Lifecycle of a volunteer application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "ACCEPTED" => Ok(Self::Accepted),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(DomainError::invalid_value("application status", other)),
        }
    }
}

/// Dietary preference declared by the volunteer (drives meal preparation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DietaryPreference {
    #[default]
    None,
    Vegetarian,
    Vegan,
}

impl DietaryPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Vegetarian => "VEGETARIAN",
            Self::Vegan => "VEGAN",
        }
    }
}

impl FromStr for DietaryPreference {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(Self::None),
            "VEGETARIAN" => Ok(Self::Vegetarian),
            "VEGAN" => Ok(Self::Vegan),
            other => Err(DomainError::invalid_value("diet", other)),
        }
    }
}

/// A user's request to volunteer at an edition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerApplication {
    pub id: Snowflake,
    pub edition_id: Snowflake,
    pub user_id: Snowflake,
    pub status: ApplicationStatus,
    pub motivation: Option<String>,
    pub arrival: Option<ArrivalSlot>,
    pub departure: Option<ArrivalSlot>,
    pub setup_availability: bool,
    pub event_availability: bool,
    pub teardown_availability: bool,
    pub team_preferences: Vec<Snowflake>,
    pub diet: DietaryPreference,
    pub allergies: Option<String>,
    pub phone: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    pub decided_by_id: Option<Snowflake>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VolunteerApplication {
    /// Check logistics invariants: some availability, arrival before departure
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(self.setup_availability || self.event_availability || self.teardown_availability) {
            return Err(DomainError::NoAvailabilitySelected);
        }
        if let (Some(arrival), Some(departure)) = (self.arrival, self.departure) {
            if departure < arrival {
                return Err(DomainError::InvalidDateRange(
                    "departure must not be before arrival".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Whether the volunteer declared availability for a phase
    pub fn is_available_for(&self, phase: EditionPhase) -> bool {
        match phase {
            EditionPhase::Setup => self.setup_availability,
            EditionPhase::Event => self.event_availability,
            EditionPhase::Teardown => self.teardown_availability,
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == ApplicationStatus::Pending
    }

    #[inline]
    pub fn is_accepted(&self) -> bool {
        self.status == ApplicationStatus::Accepted
    }

    pub fn decide(&mut self, status: ApplicationStatus, decided_by: Snowflake) {
        let now = Utc::now();
        self.status = status;
        self.decided_at = Some(now);
        self.decided_by_id = Some(decided_by);
        self.updated_at = now;
    }
}

/// Volunteer team
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerTeam {
    pub id: Snowflake,
    pub edition_id: Snowflake,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub max_volunteers: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shift volunteers can be assigned to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerTimeSlot {
    pub id: Snowflake,
    pub edition_id: Snowflake,
    pub team_id: Option<Snowflake>,
    pub title: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub max_volunteers: i32,
    pub assigned_user_ids: Vec<Snowflake>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VolunteerTimeSlot {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.end_at <= self.start_at {
            return Err(DomainError::InvalidDateRange(
                "end_at must be after start_at".to_string(),
            ));
        }
        if self.max_volunteers < 1 {
            return Err(DomainError::ValidationError(
                "max_volunteers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Half-open interval overlap; back-to-back slots do not overlap
    #[inline]
    pub fn overlaps(&self, other: &VolunteerTimeSlot) -> bool {
        self.start_at < other.end_at && other.start_at < self.end_at
    }

    #[inline]
    pub fn is_assigned(&self, user_id: Snowflake) -> bool {
        self.assigned_user_ids.contains(&user_id)
    }

    #[inline]
    pub fn remaining(&self) -> i32 {
        (self.max_volunteers - self.assigned_user_ids.len() as i32).max(0)
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn application() -> VolunteerApplication {
        let now = Utc::now();
        VolunteerApplication {
            id: Snowflake::new(1),
            edition_id: Snowflake::new(100),
            user_id: Snowflake::new(5),
            status: ApplicationStatus::Pending,
            motivation: None,
            arrival: Some("2025-07-09_noon".parse().unwrap()),
            departure: Some("2025-07-12_evening".parse().unwrap()),
            setup_availability: true,
            event_availability: true,
            teardown_availability: false,
            team_preferences: vec![],
            diet: DietaryPreference::None,
            allergies: None,
            phone: None,
            decided_at: None,
            decided_by_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn slot(start_hour: u32, end_hour: u32) -> VolunteerTimeSlot {
        let base = Utc.with_ymd_and_hms(2025, 7, 10, 0, 0, 0).unwrap();
        VolunteerTimeSlot {
            id: Snowflake::new(i64::from(start_hour) + 1),
            edition_id: Snowflake::new(100),
            team_id: None,
            title: "Bar".into(),
            description: None,
            start_at: base + Duration::hours(i64::from(start_hour)),
            end_at: base + Duration::hours(i64::from(end_hour)),
            max_volunteers: 2,
            assigned_user_ids: vec![],
            created_at: base,
            updated_at: base,
        }
    }

    #[test]
    fn test_application_validation() {
        let mut app = application();
        assert!(app.validate().is_ok());

        app.departure = Some("2025-07-09_morning".parse().unwrap());
        assert!(matches!(app.validate(), Err(DomainError::InvalidDateRange(_))));

        let mut app = application();
        app.setup_availability = false;
        app.event_availability = false;
        assert!(matches!(app.validate(), Err(DomainError::NoAvailabilitySelected)));
    }

    #[test]
    fn test_decide() {
        let mut app = application();
        assert!(app.is_pending());
        app.decide(ApplicationStatus::Accepted, Snowflake::new(2));
        assert!(app.is_accepted());
        assert_eq!(app.decided_by_id, Some(Snowflake::new(2)));
        assert!(app.decided_at.is_some());
    }

    #[test]
    fn test_slot_overlap() {
        let morning = slot(8, 12);
        let noon = slot(12, 14);
        let late_morning = slot(10, 13);

        assert!(!morning.overlaps(&noon));
        assert!(morning.overlaps(&late_morning));
        assert!(late_morning.overlaps(&noon));
    }

    #[test]
    fn test_slot_capacity() {
        let mut s = slot(8, 12);
        assert_eq!(s.remaining(), 2);
        s.assigned_user_ids = vec![Snowflake::new(1), Snowflake::new(2)];
        assert!(s.is_full());
        assert!(s.is_assigned(Snowflake::new(2)));
    }

    #[test]
    fn test_slot_validation() {
        let mut s = slot(12, 8);
        assert!(s.validate().is_err());
        s = slot(8, 12);
        s.max_volunteers = 0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Accepted,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<ApplicationStatus>().unwrap(), status);
        }
        assert!("MAYBE".parse::<ApplicationStatus>().is_err());
    }
}
