//! Volunteer meal eligibility
//!
//! A volunteer gets a meal when it is enabled, falls in a phase they declared
//! availability for, and lies between their arrival and departure. On the
//! arrival and departure days the time of day narrows the meals down through
//! two lookup tables.

use chrono::NaiveDate;

use crate::entities::{Edition, EditionPhase, MealType, VolunteerApplication, VolunteerMeal};
use crate::value_objects::TimeOfDay;

use MealType::{Breakfast, Dinner, Lunch};

/// Meals still served on the arrival day
pub fn arrival_meals(time_of_day: TimeOfDay) -> &'static [MealType] {
    match time_of_day {
        TimeOfDay::Morning => &[Breakfast, Lunch, Dinner],
        TimeOfDay::Noon => &[Lunch, Dinner],
        TimeOfDay::Afternoon | TimeOfDay::Evening => &[Dinner],
    }
}

/// Meals taken before leaving on the departure day
pub fn departure_meals(time_of_day: TimeOfDay) -> &'static [MealType] {
    match time_of_day {
        TimeOfDay::Morning => &[Breakfast],
        TimeOfDay::Noon | TimeOfDay::Afternoon => &[Breakfast, Lunch],
        TimeOfDay::Evening => &[Breakfast, Lunch, Dinner],
    }
}

pub fn is_eligible(meal: &VolunteerMeal, application: &VolunteerApplication) -> bool {
    if !meal.enabled || !application.is_available_for(meal.phase) {
        return false;
    }

    if let Some(arrival) = application.arrival {
        if meal.date < arrival.date {
            return false;
        }
        if meal.date == arrival.date
            && !arrival_meals(arrival.time_of_day).contains(&meal.meal_type)
        {
            return false;
        }
    }

    if let Some(departure) = application.departure {
        if meal.date > departure.date {
            return false;
        }
        if meal.date == departure.date
            && !departure_meals(departure.time_of_day).contains(&meal.meal_type)
        {
            return false;
        }
    }

    true
}

/// Filter `meals` down to those the volunteer may take, keeping input order
pub fn eligible_meals<'m>(
    meals: &'m [VolunteerMeal],
    application: &VolunteerApplication,
) -> Vec<&'m VolunteerMeal> {
    meals.iter().filter(|m| is_eligible(m, application)).collect()
}

/// A meal of the default plan, before it gets an id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedMeal {
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub phase: EditionPhase,
}

/// Three meals per day over the whole volunteer period
pub fn default_meal_plan(edition: &Edition) -> Vec<PlannedMeal> {
    let (first, last) = edition.volunteer_period();
    first
        .iter_days()
        .take_while(|d| *d <= last)
        .flat_map(|date| {
            let phase = edition.phase_for(date);
            MealType::ALL.into_iter().map(move |meal_type| PlannedMeal {
                date,
                meal_type,
                phase,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::fixtures::{date, edition};
    use crate::entities::{ApplicationStatus, DietaryPreference};
    use crate::value_objects::Snowflake;
    use chrono::Utc;

    fn application(arrival: Option<&str>, departure: Option<&str>) -> VolunteerApplication {
        let now = Utc::now();
        VolunteerApplication {
            id: Snowflake::new(1),
            edition_id: Snowflake::new(100),
            user_id: Snowflake::new(5),
            status: ApplicationStatus::Accepted,
            motivation: None,
            arrival: arrival.map(|s| s.parse().unwrap()),
            departure: departure.map(|s| s.parse().unwrap()),
            setup_availability: true,
            event_availability: true,
            teardown_availability: true,
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

    fn plan() -> Vec<VolunteerMeal> {
        default_meal_plan(&edition())
            .into_iter()
            .enumerate()
            .map(|(i, p)| VolunteerMeal {
                id: Snowflake::new(i as i64 + 1),
                edition_id: Snowflake::new(100),
                date: p.date,
                meal_type: p.meal_type,
                phase: p.phase,
                enabled: true,
            })
            .collect()
    }

    fn kinds_on(meals: &[&VolunteerMeal], day: NaiveDate) -> Vec<MealType> {
        meals
            .iter()
            .filter(|m| m.date == day)
            .map(|m| m.meal_type)
            .collect()
    }

    #[test]
    fn test_default_plan_covers_volunteer_period() {
        let plan = default_meal_plan(&edition());
        // 8th to 13th July inclusive
        assert_eq!(plan.len(), 6 * 3);
        assert_eq!(plan[0].date, date(2025, 7, 8));
        assert_eq!(plan[0].meal_type, MealType::Breakfast);
        assert_eq!(plan[0].phase, EditionPhase::Setup);
        assert_eq!(plan[6].phase, EditionPhase::Event);
        assert_eq!(plan[17].phase, EditionPhase::Teardown);
    }

    #[test]
    fn test_arrival_table() {
        let meals = plan();
        for (tod, expected) in [
            ("morning", vec![Breakfast, Lunch, Dinner]),
            ("noon", vec![Lunch, Dinner]),
            ("afternoon", vec![Dinner]),
            ("evening", vec![Dinner]),
        ] {
            let app = application(Some(format!("2025-07-09_{tod}").as_str()), None);
            let eligible = eligible_meals(&meals, &app);
            assert_eq!(kinds_on(&eligible, date(2025, 7, 9)), expected, "arrival {tod}");
            assert!(kinds_on(&eligible, date(2025, 7, 8)).is_empty());
            assert_eq!(kinds_on(&eligible, date(2025, 7, 10)).len(), 3);
        }
    }

    #[test]
    fn test_departure_table() {
        let meals = plan();
        for (tod, expected) in [
            ("morning", vec![Breakfast]),
            ("noon", vec![Breakfast, Lunch]),
            ("afternoon", vec![Breakfast, Lunch]),
            ("evening", vec![Breakfast, Lunch, Dinner]),
        ] {
            let app = application(None, Some(format!("2025-07-12_{tod}").as_str()));
            let eligible = eligible_meals(&meals, &app);
            assert_eq!(kinds_on(&eligible, date(2025, 7, 12)), expected, "departure {tod}");
            assert!(kinds_on(&eligible, date(2025, 7, 13)).is_empty());
            assert_eq!(kinds_on(&eligible, date(2025, 7, 8)).len(), 3);
        }
    }

    #[test]
    fn test_same_day_intersects_tables() {
        let meals = plan();
        let app = application(Some("2025-07-10_noon"), Some("2025-07-10_afternoon"));
        let eligible = eligible_meals(&meals, &app);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].meal_type, Lunch);
    }

    #[test]
    fn test_phase_availability_filter() {
        let meals = plan();
        let mut app = application(None, None);
        app.setup_availability = false;
        app.teardown_availability = false;
        let eligible = eligible_meals(&meals, &app);
        assert_eq!(eligible.len(), 3 * 3);
        assert!(eligible.iter().all(|m| m.phase == EditionPhase::Event));
    }

    #[test]
    fn test_disabled_meals_excluded() {
        let mut meals = plan();
        meals[0].enabled = false;
        let app = application(None, None);
        let eligible = eligible_meals(&meals, &app);
        assert_eq!(eligible.len(), meals.len() - 1);
        assert_ne!(eligible[0].id, meals[0].id);
    }

    #[test]
    fn test_output_keeps_input_order() {
        let mut meals = plan();
        meals.reverse();
        let app = application(Some("2025-07-10_morning"), Some("2025-07-11_evening"));
        let eligible = eligible_meals(&meals, &app);
        assert_eq!(eligible.len(), 6);
        assert_eq!(eligible[0].date, date(2025, 7, 11));
        assert_eq!(eligible[0].meal_type, Dinner);
    }
}
