//! Meal mappers

use conv_core::entities::{VolunteerMeal, VolunteerMealSelection};
use conv_core::error::DomainError;
use conv_core::value_objects::Snowflake;

use crate::models::{MealModel, MealSelectionModel};

impl TryFrom<MealModel> for VolunteerMeal {
    type Error = DomainError;

    fn try_from(model: MealModel) -> Result<Self, Self::Error> {
        Ok(VolunteerMeal {
            id: Snowflake::new(model.id),
            edition_id: Snowflake::new(model.edition_id),
            date: model.date,
            meal_type: model.meal_type.parse()?,
            phase: model.phase.parse()?,
            enabled: model.enabled,
        })
    }
}

impl From<MealSelectionModel> for VolunteerMealSelection {
    fn from(model: MealSelectionModel) -> Self {
        VolunteerMealSelection {
            application_id: Snowflake::new(model.application_id),
            meal_id: Snowflake::new(model.meal_id),
            accepted: model.accepted,
            updated_at: model.updated_at,
        }
    }
}
