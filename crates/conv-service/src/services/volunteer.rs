//! Volunteer application service
//!
//! Handles applying, withdrawing and the managers' accept/reject decision.
//! Acceptance materialises one meal selection per eligible meal.

use std::collections::HashMap;

use chrono::Utc;
use conv_core::entities::{
    ApplicationStatus, DietaryPreference, VolunteerApplication, VolunteerMeal,
    VolunteerMealSelection,
};
use conv_core::rules::eligible_meals;
use conv_core::{Capability, DomainError, NotificationType, Snowflake};
use tracing::{info, instrument};

use crate::dto::{
    ApplicationResponse, ApplyVolunteerRequest, DecideApplicationRequest, PublicUserResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::notification::NotificationService;
use super::permission::PermissionService;

/// Selections created on acceptance: every eligible meal, accepted
pub fn initial_selections(
    meals: &[VolunteerMeal],
    application: &VolunteerApplication,
) -> Vec<VolunteerMealSelection> {
    let now = Utc::now();
    eligible_meals(meals, application)
        .into_iter()
        .map(|meal| VolunteerMealSelection {
            application_id: application.id,
            meal_id: meal.id,
            accepted: true,
            updated_at: now,
        })
        .collect()
}

/// Only a final status can be decided
fn parse_decision(status: &str) -> ServiceResult<ApplicationStatus> {
    match status.parse::<ApplicationStatus>()? {
        ApplicationStatus::Pending => Err(ServiceError::validation(
            "Decision must be ACCEPTED or REJECTED",
        )),
        decided => Ok(decided),
    }
}

/// Volunteer application service
pub struct VolunteerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VolunteerService<'a> {
    /// Create a new VolunteerService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply to volunteer; one application per user and edition
    #[instrument(skip(self, request))]
    pub async fn apply(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
        request: ApplyVolunteerRequest,
    ) -> ServiceResult<ApplicationResponse> {
        let edition = PermissionService::new(self.ctx).load_edition(edition_id).await?;
        if !edition.is_online {
            return Err(DomainError::EditionNotFound(edition_id).into());
        }
        if !edition.volunteers_open {
            return Err(DomainError::VolunteersClosed.into());
        }
        if self
            .ctx
            .application_repo()
            .find(edition_id, user_id)
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadyApplied.into());
        }

        if !request.team_preferences.is_empty() {
            let teams = self.ctx.team_repo().find_by_edition(edition_id).await?;
            if let Some(unknown) = request
                .team_preferences
                .iter()
                .find(|id| !teams.iter().any(|t| t.id == **id))
            {
                return Err(DomainError::TeamNotFound(*unknown).into());
            }
        }

        let diet = match request.diet.as_deref() {
            Some(diet) => diet.parse::<DietaryPreference>()?,
            None => DietaryPreference::default(),
        };

        let now = Utc::now();
        let application = VolunteerApplication {
            id: self.ctx.generate_id(),
            edition_id,
            user_id,
            status: ApplicationStatus::Pending,
            motivation: request.motivation,
            arrival: request.arrival,
            departure: request.departure,
            setup_availability: request.setup_availability,
            event_availability: request.event_availability,
            teardown_availability: request.teardown_availability,
            team_preferences: request.team_preferences,
            diet,
            allergies: request.allergies,
            phone: request.phone,
            decided_at: None,
            decided_by_id: None,
            created_at: now,
            updated_at: now,
        };
        application.validate()?;

        self.ctx.application_repo().create(&application).await?;

        info!(
            application_id = %application.id,
            edition_id = %edition_id,
            "Volunteer application submitted"
        );

        Ok(ApplicationResponse::from(&application))
    }

    /// The caller's own application
    #[instrument(skip(self))]
    pub async fn get_own(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<ApplicationResponse> {
        let application = self.find_own(edition_id, user_id).await?;
        Ok(ApplicationResponse::from(&application))
    }

    /// Withdraw a pending application
    #[instrument(skip(self))]
    pub async fn withdraw(&self, edition_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        let application = self.find_own(edition_id, user_id).await?;
        if !application.is_pending() {
            return Err(DomainError::ApplicationNotPending.into());
        }

        self.ctx.application_repo().delete(application.id).await?;

        info!(application_id = %application.id, "Volunteer application withdrawn");

        Ok(())
    }

    /// Applications of an edition for managers, optionally filtered by status
    #[instrument(skip(self))]
    pub async fn list_applications(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
        status: Option<&str>,
    ) -> ServiceResult<Vec<ApplicationResponse>> {
        PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::ManageVolunteers)
            .await?;

        let status = status.map(str::parse::<ApplicationStatus>).transpose()?;
        let applications = self
            .ctx
            .application_repo()
            .find_by_edition(edition_id, status)
            .await?;

        let ids: Vec<Snowflake> = applications.iter().map(|a| a.user_id).collect();
        let users: HashMap<Snowflake, PublicUserResponse> = self
            .ctx
            .user_repo()
            .find_by_ids(&ids)
            .await?
            .iter()
            .map(|u| (u.id, PublicUserResponse::from(u)))
            .collect();

        Ok(applications
            .iter()
            .map(|a| {
                let mut response = ApplicationResponse::from(a);
                response.user = users.get(&a.user_id).cloned();
                response
            })
            .collect())
    }

    /// Accept or reject a pending application and notify the applicant
    #[instrument(skip(self, request))]
    pub async fn decide(
        &self,
        edition_id: Snowflake,
        application_id: Snowflake,
        actor_id: Snowflake,
        request: DecideApplicationRequest,
    ) -> ServiceResult<ApplicationResponse> {
        let rows = PermissionService::new(self.ctx)
            .require_edition(actor_id, edition_id, Capability::ManageVolunteers)
            .await?;
        let status = parse_decision(&request.status)?;

        let mut application = self
            .ctx
            .application_repo()
            .find_by_id(application_id)
            .await?
            .filter(|a| a.edition_id == edition_id)
            .ok_or(DomainError::ApplicationNotFound)?;
        if !application.is_pending() {
            return Err(DomainError::ApplicationNotPending.into());
        }

        application.decide(status, actor_id);

        let selections = if application.is_accepted() {
            let meals = self.ctx.meal_repo().find_by_edition(edition_id).await?;
            initial_selections(&meals, &application)
        } else {
            Vec::new()
        };
        self.ctx
            .application_repo()
            .decide(&application, &selections)
            .await?;

        info!(
            application_id = %application_id,
            status = status.as_str(),
            meals = selections.len(),
            "Volunteer application decided"
        );

        let label = rows.edition()?.label(&rows.convention.name);
        let (kind, title, message) = match status {
            ApplicationStatus::Accepted => (
                NotificationType::Success,
                "Volunteer application accepted",
                format!("Your volunteer application for {label} was accepted"),
            ),
            _ => (
                NotificationType::Info,
                "Volunteer application declined",
                format!("Your volunteer application for {label} was not retained"),
            ),
        };
        let notifications = NotificationService::new(self.ctx);
        notifications
            .send(
                notifications
                    .build(application.user_id, kind, title, message)
                    .with_category("volunteer")
                    .with_entity("volunteer_application", application.id)
                    .with_action_url(format!("/editions/{edition_id}/volunteers")),
            )
            .await;

        Ok(ApplicationResponse::from(&application))
    }

    async fn find_own(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<VolunteerApplication> {
        self.ctx
            .application_repo()
            .find(edition_id, user_id)
            .await?
            .ok_or_else(|| DomainError::ApplicationNotFound.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use conv_core::{ArrivalSlot, EditionPhase, MealType, TimeOfDay};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    fn meal(id: i64, day: u32, meal_type: MealType, phase: EditionPhase) -> VolunteerMeal {
        VolunteerMeal {
            id: Snowflake::new(id),
            edition_id: Snowflake::new(1),
            date: date(day),
            meal_type,
            phase,
            enabled: true,
        }
    }

    fn application() -> VolunteerApplication {
        let now = Utc::now();
        VolunteerApplication {
            id: Snowflake::new(77),
            edition_id: Snowflake::new(1),
            user_id: Snowflake::new(5),
            status: ApplicationStatus::Accepted,
            motivation: None,
            arrival: Some(ArrivalSlot {
                date: date(10),
                time_of_day: TimeOfDay::Afternoon,
            }),
            departure: None,
            setup_availability: false,
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

    #[test]
    fn test_initial_selections_cover_eligible_meals_only() {
        let meals = vec![
            meal(1, 9, MealType::Dinner, EditionPhase::Setup),
            meal(2, 10, MealType::Lunch, EditionPhase::Event),
            meal(3, 10, MealType::Dinner, EditionPhase::Event),
            meal(4, 11, MealType::Breakfast, EditionPhase::Event),
        ];

        let selections = initial_selections(&meals, &application());
        let ids: Vec<Snowflake> = selections.iter().map(|s| s.meal_id).collect();
        assert_eq!(ids, vec![Snowflake::new(3), Snowflake::new(4)]);
        assert!(selections.iter().all(|s| s.accepted));
        assert!(selections.iter().all(|s| s.application_id == Snowflake::new(77)));
    }

    #[test]
    fn test_parse_decision() {
        assert_eq!(parse_decision("ACCEPTED").unwrap(), ApplicationStatus::Accepted);
        assert_eq!(parse_decision("REJECTED").unwrap(), ApplicationStatus::Rejected);
        assert_eq!(parse_decision("PENDING").unwrap_err().status_code(), 400);
        assert_eq!(parse_decision("MAYBE").unwrap_err().status_code(), 400);
    }
}
