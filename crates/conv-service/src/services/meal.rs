//! Volunteer meal service
//!
//! Managers build and toggle the meal plan of an edition; accepted volunteers
//! pick among the meals they are eligible for.

use std::collections::HashMap;

use chrono::Utc;
use conv_core::entities::{VolunteerApplication, VolunteerMeal, VolunteerMealSelection};
use conv_core::rules::{default_meal_plan, eligible_meals};
use conv_core::{Capability, DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{
    MealHeadcountResponse, MealPlanResponse, MealResponse, UpdateMealSelectionsRequest,
    VolunteerMealResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::permission::PermissionService;

/// Merge requested changes into the current selections; every requested meal
/// must be eligible
pub fn merge_selections(
    application: &VolunteerApplication,
    eligible: &[&VolunteerMeal],
    current: &[VolunteerMealSelection],
    request: &UpdateMealSelectionsRequest,
) -> Result<Vec<VolunteerMealSelection>, DomainError> {
    let now = Utc::now();
    let mut merged: HashMap<Snowflake, VolunteerMealSelection> = current
        .iter()
        .filter(|s| eligible.iter().any(|m| m.id == s.meal_id))
        .map(|s| (s.meal_id, s.clone()))
        .collect();

    for input in &request.selections {
        if !eligible.iter().any(|m| m.id == input.meal_id) {
            return Err(DomainError::MealNotEligible(input.meal_id));
        }
        merged.insert(
            input.meal_id,
            VolunteerMealSelection {
                application_id: application.id,
                meal_id: input.meal_id,
                accepted: input.accepted,
                updated_at: now,
            },
        );
    }

    let mut selections: Vec<VolunteerMealSelection> = merged.into_values().collect();
    selections.sort_by_key(|s| s.meal_id);
    Ok(selections)
}

/// Volunteer meal service
pub struct MealService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MealService<'a> {
    /// Create a new MealService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Three meals a day over the volunteer period; existing meals are kept
    #[instrument(skip(self))]
    pub async fn init_plan(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<MealPlanResponse> {
        let rows = PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::ManageVolunteers)
            .await?;
        let edition = rows.edition()?;

        let meals: Vec<VolunteerMeal> = default_meal_plan(edition)
            .into_iter()
            .map(|planned| VolunteerMeal {
                id: self.ctx.generate_id(),
                edition_id,
                date: planned.date,
                meal_type: planned.meal_type,
                phase: planned.phase,
                enabled: true,
            })
            .collect();
        let created = self.ctx.meal_repo().create_many(&meals).await?;

        info!(edition_id = %edition_id, created, "Meal plan initialised");

        let meals = self.ctx.meal_repo().find_by_edition(edition_id).await?;
        Ok(MealPlanResponse {
            created,
            meals: meals.iter().map(MealResponse::from).collect(),
        })
    }

    #[instrument(skip(self))]
    pub async fn list_meals(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<MealResponse>> {
        PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::ManageVolunteers)
            .await?;
        let meals = self.ctx.meal_repo().find_by_edition(edition_id).await?;
        Ok(meals.iter().map(MealResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn set_enabled(
        &self,
        edition_id: Snowflake,
        meal_id: Snowflake,
        user_id: Snowflake,
        enabled: bool,
    ) -> ServiceResult<MealResponse> {
        PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::ManageVolunteers)
            .await?;
        let mut meal = self
            .ctx
            .meal_repo()
            .find_by_id(meal_id)
            .await?
            .filter(|m| m.edition_id == edition_id)
            .ok_or(DomainError::MealNotFound(meal_id))?;

        self.ctx.meal_repo().set_enabled(meal_id, enabled).await?;
        meal.enabled = enabled;

        info!(meal_id = %meal_id, enabled, "Meal toggled");

        Ok(MealResponse::from(&meal))
    }

    /// Eligible meals of the caller with their current choice
    #[instrument(skip(self))]
    pub async fn my_meals(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<VolunteerMealResponse>> {
        let application = self.accepted_application(edition_id, user_id).await?;
        let meals = self.ctx.meal_repo().find_by_edition(edition_id).await?;
        let selections = self.ctx.meal_repo().find_selections(application.id).await?;
        Ok(Self::volunteer_view(&meals, &application, &selections))
    }

    #[instrument(skip(self, request))]
    pub async fn update_selections(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
        request: UpdateMealSelectionsRequest,
    ) -> ServiceResult<Vec<VolunteerMealResponse>> {
        let application = self.accepted_application(edition_id, user_id).await?;
        let meals = self.ctx.meal_repo().find_by_edition(edition_id).await?;
        let current = self.ctx.meal_repo().find_selections(application.id).await?;

        let eligible = eligible_meals(&meals, &application);
        let selections = merge_selections(&application, &eligible, &current, &request)?;

        self.ctx
            .meal_repo()
            .replace_selections(application.id, &selections)
            .await?;

        info!(
            application_id = %application.id,
            count = selections.len(),
            "Meal selections updated"
        );

        Ok(Self::volunteer_view(&meals, &application, &selections))
    }

    /// Accepted selections per meal, for the kitchen
    #[instrument(skip(self))]
    pub async fn headcounts(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<MealHeadcountResponse>> {
        PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::ManageVolunteers)
            .await?;
        let meals = self.ctx.meal_repo().find_by_edition(edition_id).await?;
        let counts: HashMap<Snowflake, i64> = self
            .ctx
            .meal_repo()
            .headcounts(edition_id)
            .await?
            .into_iter()
            .collect();

        Ok(meals
            .iter()
            .map(|meal| MealHeadcountResponse {
                meal: MealResponse::from(meal),
                headcount: counts.get(&meal.id).copied().unwrap_or(0),
            })
            .collect())
    }

    fn volunteer_view(
        meals: &[VolunteerMeal],
        application: &VolunteerApplication,
        selections: &[VolunteerMealSelection],
    ) -> Vec<VolunteerMealResponse> {
        eligible_meals(meals, application)
            .into_iter()
            .map(|meal| VolunteerMealResponse {
                meal: MealResponse::from(meal),
                accepted: selections
                    .iter()
                    .any(|s| s.meal_id == meal.id && s.accepted),
            })
            .collect()
    }

    async fn accepted_application(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<VolunteerApplication> {
        let application = self
            .ctx
            .application_repo()
            .find(edition_id, user_id)
            .await?
            .ok_or(DomainError::ApplicationNotFound)?;
        if !application.is_accepted() {
            return Err(DomainError::VolunteerNotAccepted.into());
        }
        Ok(application)
    }
}
