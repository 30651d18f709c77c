//! Volunteer time slot service
//!
//! Slots are managed by volunteer managers. Assignment requires an accepted
//! application, free capacity and no overlap with the volunteer's other slots.

use chrono::Utc;
use conv_core::entities::VolunteerTimeSlot;
use conv_core::{Capability, DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{CreateTimeSlotRequest, TimeSlotResponse, UpdateTimeSlotRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::PermissionService;

/// Check `slot` can take `user_id`, given the slots they already hold
pub fn check_assignable(
    slot: &VolunteerTimeSlot,
    user_id: Snowflake,
    assigned: &[VolunteerTimeSlot],
) -> Result<(), DomainError> {
    if slot.is_assigned(user_id) {
        return Err(DomainError::AlreadyAssigned);
    }
    if slot.is_full() {
        return Err(DomainError::TimeSlotFull);
    }
    if assigned
        .iter()
        .any(|other| other.id != slot.id && other.overlaps(slot))
    {
        return Err(DomainError::TimeSlotOverlap);
    }
    Ok(())
}

/// Check a rescheduled `slot` against the other slots its assignees hold
pub fn check_reschedule(
    slot: &VolunteerTimeSlot,
    held: &[VolunteerTimeSlot],
) -> Result<(), DomainError> {
    if held
        .iter()
        .any(|other| other.id != slot.id && other.overlaps(slot))
    {
        return Err(DomainError::TimeSlotOverlap);
    }
    Ok(())
}

/// Volunteer time slot service
pub struct TimeSlotService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TimeSlotService<'a> {
    /// Create a new TimeSlotService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn list_slots(&self, edition_id: Snowflake) -> ServiceResult<Vec<TimeSlotResponse>> {
        PermissionService::new(self.ctx).load_edition(edition_id).await?;
        let slots = self.ctx.time_slot_repo().find_by_edition(edition_id).await?;
        Ok(slots.iter().map(TimeSlotResponse::from).collect())
    }

    /// Slots the caller is assigned to
    #[instrument(skip(self))]
    pub async fn list_my_slots(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<TimeSlotResponse>> {
        let slots = self
            .ctx
            .time_slot_repo()
            .find_assigned(edition_id, user_id)
            .await?;
        Ok(slots.iter().map(TimeSlotResponse::from).collect())
    }

    #[instrument(skip(self, request))]
    pub async fn create_slot(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
        request: CreateTimeSlotRequest,
    ) -> ServiceResult<TimeSlotResponse> {
        PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::ManageVolunteers)
            .await?;
        if let Some(team_id) = request.team_id {
            self.check_team(edition_id, team_id).await?;
        }

        let now = Utc::now();
        let slot = VolunteerTimeSlot {
            id: self.ctx.generate_id(),
            edition_id,
            team_id: request.team_id,
            title: request.title,
            description: request.description,
            start_at: request.start_at,
            end_at: request.end_at,
            max_volunteers: request.max_volunteers,
            assigned_user_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        slot.validate()?;

        self.ctx.time_slot_repo().create(&slot).await?;

        info!(slot_id = %slot.id, edition_id = %edition_id, "Time slot created");

        Ok(TimeSlotResponse::from(&slot))
    }

    #[instrument(skip(self, request))]
    pub async fn update_slot(
        &self,
        edition_id: Snowflake,
        slot_id: Snowflake,
        user_id: Snowflake,
        request: UpdateTimeSlotRequest,
    ) -> ServiceResult<TimeSlotResponse> {
        PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::ManageVolunteers)
            .await?;
        let mut slot = self.find_in(edition_id, slot_id).await?;
        let previous = (slot.start_at, slot.end_at);

        if let Some(team_id) = request.team_id {
            self.check_team(edition_id, team_id).await?;
            slot.team_id = Some(team_id);
        }
        if let Some(title) = request.title {
            slot.title = title;
        }
        if let Some(description) = request.description {
            slot.description = Some(description);
        }
        if let Some(start_at) = request.start_at {
            slot.start_at = start_at;
        }
        if let Some(end_at) = request.end_at {
            slot.end_at = end_at;
        }
        if let Some(max) = request.max_volunteers {
            if (max as usize) < slot.assigned_user_ids.len() {
                return Err(DomainError::ValidationError(
                    "max_volunteers is below the number of assigned volunteers".to_string(),
                )
                .into());
            }
            slot.max_volunteers = max;
        }
        slot.validate()?;
        if (slot.start_at, slot.end_at) != previous {
            for volunteer_id in &slot.assigned_user_ids {
                let held = self
                    .ctx
                    .time_slot_repo()
                    .find_assigned(edition_id, *volunteer_id)
                    .await?;
                check_reschedule(&slot, &held)?;
            }
        }
        slot.updated_at = Utc::now();

        self.ctx.time_slot_repo().update(&slot).await?;

        info!(slot_id = %slot_id, "Time slot updated");

        Ok(TimeSlotResponse::from(&slot))
    }

    #[instrument(skip(self))]
    pub async fn delete_slot(
        &self,
        edition_id: Snowflake,
        slot_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        PermissionService::new(self.ctx)
            .require_edition(user_id, edition_id, Capability::ManageVolunteers)
            .await?;
        self.find_in(edition_id, slot_id).await?;

        self.ctx.time_slot_repo().delete(slot_id).await?;

        info!(slot_id = %slot_id, "Time slot deleted");

        Ok(())
    }

    /// Assign an accepted volunteer; capacity is rechecked under a row lock
    #[instrument(skip(self))]
    pub async fn assign(
        &self,
        edition_id: Snowflake,
        slot_id: Snowflake,
        actor_id: Snowflake,
        volunteer_id: Snowflake,
    ) -> ServiceResult<TimeSlotResponse> {
        PermissionService::new(self.ctx)
            .require_edition(actor_id, edition_id, Capability::ManageVolunteers)
            .await?;
        let mut slot = self.find_in(edition_id, slot_id).await?;

        let accepted = self
            .ctx
            .application_repo()
            .find(edition_id, volunteer_id)
            .await?
            .is_some_and(|a| a.is_accepted());
        if !accepted {
            return Err(DomainError::VolunteerNotAccepted.into());
        }

        let assigned = self
            .ctx
            .time_slot_repo()
            .find_assigned(edition_id, volunteer_id)
            .await?;
        check_assignable(&slot, volunteer_id, &assigned)?;

        self.ctx.time_slot_repo().assign(slot_id, volunteer_id).await?;
        slot.assigned_user_ids.push(volunteer_id);

        info!(slot_id = %slot_id, user_id = %volunteer_id, "Volunteer assigned");

        Ok(TimeSlotResponse::from(&slot))
    }

    #[instrument(skip(self))]
    pub async fn unassign(
        &self,
        edition_id: Snowflake,
        slot_id: Snowflake,
        actor_id: Snowflake,
        volunteer_id: Snowflake,
    ) -> ServiceResult<()> {
        PermissionService::new(self.ctx)
            .require_edition(actor_id, edition_id, Capability::ManageVolunteers)
            .await?;
        self.find_in(edition_id, slot_id).await?;

        if !self
            .ctx
            .time_slot_repo()
            .unassign(slot_id, volunteer_id)
            .await?
        {
            return Err(ServiceError::not_found("Assignment", volunteer_id));
        }

        info!(slot_id = %slot_id, user_id = %volunteer_id, "Volunteer unassigned");

        Ok(())
    }

    async fn check_team(&self, edition_id: Snowflake, team_id: Snowflake) -> ServiceResult<()> {
        self.ctx
            .team_repo()
            .find_by_id(team_id)
            .await?
            .filter(|t| t.edition_id == edition_id)
            .map(|_| ())
            .ok_or_else(|| DomainError::TeamNotFound(team_id).into())
    }

    async fn find_in(
        &self,
        edition_id: Snowflake,
        slot_id: Snowflake,
    ) -> ServiceResult<VolunteerTimeSlot> {
        self.ctx
            .time_slot_repo()
            .find_by_id(slot_id)
            .await?
            .filter(|s| s.edition_id == edition_id)
            .ok_or_else(|| DomainError::TimeSlotNotFound(slot_id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 10, hour, 0, 0).unwrap()
    }

    fn slot(id: i64, start: u32, end: u32, max: i32, assigned: &[i64]) -> VolunteerTimeSlot {
        VolunteerTimeSlot {
            id: Snowflake::new(id),
            edition_id: Snowflake::new(1),
            team_id: None,
            title: format!("slot {id}"),
            description: None,
            start_at: at(start),
            end_at: at(end),
            max_volunteers: max,
            assigned_user_ids: assigned.iter().copied().map(Snowflake::new).collect(),
            created_at: at(0),
            updated_at: at(0),
        }
    }

    #[test]
    fn test_assignable() {
        let target = slot(1, 10, 12, 2, &[]);
        assert!(check_assignable(&target, Snowflake::new(9), &[]).is_ok());

        // back-to-back is fine
        let before = slot(2, 8, 10, 2, &[9]);
        assert!(check_assignable(&target, Snowflake::new(9), &[before]).is_ok());
    }

    #[test]
    fn test_rejections() {
        let volunteer = Snowflake::new(9);

        let full = slot(1, 10, 12, 1, &[3]);
        assert!(matches!(
            check_assignable(&full, volunteer, &[]),
            Err(DomainError::TimeSlotFull)
        ));

        let already = slot(1, 10, 12, 2, &[9]);
        assert!(matches!(
            check_assignable(&already, volunteer, &[]),
            Err(DomainError::AlreadyAssigned)
        ));

        let target = slot(1, 10, 12, 2, &[]);
        let clash = slot(2, 11, 13, 2, &[9]);
        assert!(matches!(
            check_assignable(&target, volunteer, &[clash]),
            Err(DomainError::TimeSlotOverlap)
        ));
    }

    #[test]
    fn test_reschedule_onto_held_slot() {
        // volunteer 9 holds 09-12 and 13-15; moving the second to 11-15 clashes
        let morning = slot(1, 9, 12, 2, &[9]);
        let mut afternoon = slot(2, 13, 15, 2, &[9]);
        let held = vec![morning.clone(), afternoon.clone()];
        assert!(check_reschedule(&afternoon, &held).is_ok());

        afternoon.start_at = at(11);
        assert!(matches!(
            check_reschedule(&afternoon, &held),
            Err(DomainError::TimeSlotOverlap)
        ));

        // the slot's own stored copy is not a clash
        afternoon.start_at = at(12);
        assert!(check_reschedule(&afternoon, &held).is_ok());
    }
}
