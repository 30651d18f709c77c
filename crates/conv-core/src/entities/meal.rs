//! Volunteer meals and per-volunteer selections

use chrono::{DateTime, NaiveDate, Utc};
use std::str::FromStr;

use crate::entities::EditionPhase;
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Meal of the day; ordering follows the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 3] = [Self::Breakfast, Self::Lunch, Self::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "BREAKFAST",
            Self::Lunch => "LUNCH",
            Self::Dinner => "DINNER",
        }
    }
}

impl FromStr for MealType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BREAKFAST" => Ok(Self::Breakfast),
            "LUNCH" => Ok(Self::Lunch),
            "DINNER" => Ok(Self::Dinner),
            other => Err(DomainError::invalid_value("meal type", other)),
        }
    }
}

/// A meal served to volunteers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerMeal {
    pub id: Snowflake,
    pub edition_id: Snowflake,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub phase: EditionPhase,
    pub enabled: bool,
}

impl VolunteerMeal {
    /// Sort key: chronological
    #[inline]
    pub fn sort_key(&self) -> (NaiveDate, MealType) {
        (self.date, self.meal_type)
    }
}

/// Whether a volunteer will take a given meal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerMealSelection {
    pub application_id: Snowflake,
    pub meal_id: Snowflake,
    pub accepted: bool,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_type_order() {
        assert!(MealType::Breakfast < MealType::Lunch);
        assert!(MealType::Lunch < MealType::Dinner);
    }

    #[test]
    fn test_meal_type_parse() {
        assert_eq!("DINNER".parse::<MealType>().unwrap(), MealType::Dinner);
        assert!("SNACK".parse::<MealType>().is_err());
    }
}
