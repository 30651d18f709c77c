//! Volunteer application, team and time slot mappers

use conv_core::entities::{VolunteerApplication, VolunteerTeam, VolunteerTimeSlot};
use conv_core::error::DomainError;
use conv_core::value_objects::{ArrivalSlot, Snowflake};

use crate::models::{ApplicationModel, TeamModel, TimeSlotModel};

fn parse_slot(raw: Option<&str>) -> Result<Option<ArrivalSlot>, DomainError> {
    raw.map(str::parse::<ArrivalSlot>)
        .transpose()
        .map_err(DomainError::from)
}

impl TryFrom<ApplicationModel> for VolunteerApplication {
    type Error = DomainError;

    fn try_from(model: ApplicationModel) -> Result<Self, Self::Error> {
        Ok(VolunteerApplication {
            id: Snowflake::new(model.id),
            edition_id: Snowflake::new(model.edition_id),
            user_id: Snowflake::new(model.user_id),
            status: model.status.parse()?,
            motivation: model.motivation,
            arrival: parse_slot(model.arrival.as_deref())?,
            departure: parse_slot(model.departure.as_deref())?,
            setup_availability: model.setup_availability,
            event_availability: model.event_availability,
            teardown_availability: model.teardown_availability,
            team_preferences: model.team_preferences.into_iter().map(Snowflake::new).collect(),
            diet: model.diet.parse()?,
            allergies: model.allergies,
            phone: model.phone,
            decided_at: model.decided_at,
            decided_by_id: model.decided_by_id.map(Snowflake::new),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<TeamModel> for VolunteerTeam {
    fn from(model: TeamModel) -> Self {
        VolunteerTeam {
            id: Snowflake::new(model.id),
            edition_id: Snowflake::new(model.edition_id),
            name: model.name,
            description: model.description,
            color: model.color,
            max_volunteers: model.max_volunteers,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Build a slot from its row and the users assigned to it
pub fn time_slot_with_assignments(model: TimeSlotModel, user_ids: Vec<i64>) -> VolunteerTimeSlot {
    VolunteerTimeSlot {
        id: Snowflake::new(model.id),
        edition_id: Snowflake::new(model.edition_id),
        team_id: model.team_id.map(Snowflake::new),
        title: model.title,
        description: model.description,
        start_at: model.start_at,
        end_at: model.end_at,
        max_volunteers: model.max_volunteers,
        assigned_user_ids: user_ids.into_iter().map(Snowflake::new).collect(),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use conv_core::entities::{ApplicationStatus, DietaryPreference};

    fn model() -> ApplicationModel {
        let now = Utc::now();
        ApplicationModel {
            id: 1,
            edition_id: 100,
            user_id: 5,
            status: "ACCEPTED".into(),
            motivation: None,
            arrival: Some("2025-07-09_noon".into()),
            departure: None,
            setup_availability: true,
            event_availability: false,
            teardown_availability: false,
            team_preferences: vec![7, 8],
            diet: "VEGAN".into(),
            allergies: None,
            phone: None,
            decided_at: Some(now),
            decided_by_id: Some(2),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_application_mapping() {
        let app = VolunteerApplication::try_from(model()).unwrap();
        assert_eq!(app.status, ApplicationStatus::Accepted);
        assert_eq!(app.diet, DietaryPreference::Vegan);
        assert_eq!(app.arrival.unwrap().to_string(), "2025-07-09_noon");
        assert_eq!(app.team_preferences, vec![Snowflake::new(7), Snowflake::new(8)]);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let mut row = model();
        row.status = "MAYBE".into();
        assert!(matches!(
            VolunteerApplication::try_from(row),
            Err(DomainError::InvalidEnumValue { .. })
        ));
    }

    #[test]
    fn test_malformed_arrival_is_rejected() {
        let mut row = model();
        row.arrival = Some("tomorrow".into());
        assert!(matches!(
            VolunteerApplication::try_from(row),
            Err(DomainError::InvalidArrivalSlot(_))
        ));
    }
}
