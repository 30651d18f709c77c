//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use conv_core::entities::{
    CarpoolBooking, CarpoolOffer, CarpoolRequest, Convention, ConventionCollaborator, Edition,
    ExternalTicketing, Notification, PushSubscription, TicketingOption, TicketingOrder,
    TicketingOrderItem, TicketingQuota, TicketingTier, User, VolunteerApplication, VolunteerMeal,
    VolunteerTeam, VolunteerTimeSlot,
};
use conv_core::{QuotaStats, Snowflake};

use super::responses::{
    ApplicationResponse, BookingResponse, CarpoolOfferResponse, CarpoolRequestResponse,
    CollaboratorResponse, ConventionResponse, CurrentUserResponse, EditionPermissionResponse,
    EditionResponse, ExternalTicketingResponse, MealResponse, NotificationResponse,
    OptionResponse, OrderItemResponse, OrderResponse, PublicUserResponse,
    PushSubscriptionResponse, QuotaResponse, QuotaStatsResponse, TeamResponse, TierResponse,
    TimeSlotResponse,
};

fn ids(ids: &[Snowflake]) -> Vec<String> {
    ids.iter().map(ToString::to_string).collect()
}

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            pseudo: user.pseudo.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            profile_picture: user.profile_picture.clone(),
            is_global_admin: user.is_global_admin,
            created_at: user.created_at,
        }
    }
}

impl From<&User> for PublicUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            pseudo: user.pseudo.clone(),
            profile_picture: user.profile_picture.clone(),
        }
    }
}

// ============================================================================
// Convention & Edition Mappers
// ============================================================================

impl From<&Convention> for ConventionResponse {
    fn from(convention: &Convention) -> Self {
        Self {
            id: convention.id.to_string(),
            name: convention.name.clone(),
            description: convention.description.clone(),
            logo: convention.logo.clone(),
            author_id: convention.author_id.to_string(),
            is_archived: convention.is_archived,
            created_at: convention.created_at,
            updated_at: convention.updated_at,
        }
    }
}

impl From<&Edition> for EditionResponse {
    fn from(edition: &Edition) -> Self {
        Self {
            id: edition.id.to_string(),
            convention_id: edition.convention_id.to_string(),
            creator_id: edition.creator_id.to_string(),
            name: edition.name.clone(),
            description: edition.description.clone(),
            start_date: edition.start_date,
            end_date: edition.end_date,
            city: edition.city.clone(),
            country: edition.country.clone(),
            address: edition.address.clone(),
            image: edition.image.clone(),
            is_online: edition.is_online,
            volunteers_open: edition.volunteers_open,
            volunteer_setup_start: edition.volunteer_setup_start,
            volunteer_teardown_end: edition.volunteer_teardown_end,
            rights: None,
            created_at: edition.created_at,
            updated_at: edition.updated_at,
        }
    }
}

impl From<&ConventionCollaborator> for CollaboratorResponse {
    fn from(collaborator: &ConventionCollaborator) -> Self {
        Self {
            id: collaborator.id.to_string(),
            convention_id: collaborator.convention_id.to_string(),
            user_id: collaborator.user_id.to_string(),
            user: None,
            title: collaborator.title.clone(),
            rights: collaborator.rights.list(),
            edition_permissions: collaborator
                .edition_permissions
                .iter()
                .map(|p| EditionPermissionResponse {
                    edition_id: p.edition_id.to_string(),
                    rights: p.rights.list(),
                })
                .collect(),
            added_by_id: collaborator.added_by_id.to_string(),
            created_at: collaborator.created_at,
            updated_at: collaborator.updated_at,
        }
    }
}

// ============================================================================
// Volunteer Mappers
// ============================================================================

impl From<&VolunteerApplication> for ApplicationResponse {
    fn from(application: &VolunteerApplication) -> Self {
        Self {
            id: application.id.to_string(),
            edition_id: application.edition_id.to_string(),
            user_id: application.user_id.to_string(),
            user: None,
            status: application.status.as_str(),
            motivation: application.motivation.clone(),
            arrival: application.arrival,
            departure: application.departure,
            setup_availability: application.setup_availability,
            event_availability: application.event_availability,
            teardown_availability: application.teardown_availability,
            team_preferences: ids(&application.team_preferences),
            diet: application.diet.as_str(),
            allergies: application.allergies.clone(),
            phone: application.phone.clone(),
            decided_at: application.decided_at,
            created_at: application.created_at,
        }
    }
}

impl From<&VolunteerTeam> for TeamResponse {
    fn from(team: &VolunteerTeam) -> Self {
        Self {
            id: team.id.to_string(),
            edition_id: team.edition_id.to_string(),
            name: team.name.clone(),
            description: team.description.clone(),
            color: team.color.clone(),
            max_volunteers: team.max_volunteers,
        }
    }
}

impl From<&VolunteerTimeSlot> for TimeSlotResponse {
    fn from(slot: &VolunteerTimeSlot) -> Self {
        Self {
            id: slot.id.to_string(),
            edition_id: slot.edition_id.to_string(),
            team_id: slot.team_id.map(|id| id.to_string()),
            title: slot.title.clone(),
            description: slot.description.clone(),
            start_at: slot.start_at,
            end_at: slot.end_at,
            max_volunteers: slot.max_volunteers,
            assigned_user_ids: ids(&slot.assigned_user_ids),
            remaining: slot.remaining(),
        }
    }
}

impl From<&VolunteerMeal> for MealResponse {
    fn from(meal: &VolunteerMeal) -> Self {
        Self {
            id: meal.id.to_string(),
            date: meal.date,
            meal_type: meal.meal_type.as_str(),
            phase: meal.phase.as_str(),
            enabled: meal.enabled,
        }
    }
}

// ============================================================================
// Ticketing Mappers
// ============================================================================

impl From<&TicketingTier> for TierResponse {
    fn from(tier: &TicketingTier) -> Self {
        Self {
            id: tier.id.to_string(),
            edition_id: tier.edition_id.to_string(),
            name: tier.name.clone(),
            description: tier.description.clone(),
            price_cents: tier.price_cents,
            position: tier.position,
            is_active: tier.is_active,
            external_id: tier.external_id,
        }
    }
}

impl From<&TicketingQuota> for QuotaResponse {
    fn from(quota: &TicketingQuota) -> Self {
        Self {
            id: quota.id.to_string(),
            edition_id: quota.edition_id.to_string(),
            title: quota.title.clone(),
            description: quota.description.clone(),
            quantity: quota.quantity,
            tier_ids: ids(&quota.tier_ids),
            option_ids: ids(&quota.option_ids),
            custom_fields: quota.custom_fields.clone(),
        }
    }
}

impl From<&QuotaStats> for QuotaStatsResponse {
    fn from(stats: &QuotaStats) -> Self {
        Self {
            quota_id: stats.quota_id.to_string(),
            title: stats.title.clone(),
            quantity: stats.quantity,
            used: stats.used,
            remaining: stats.remaining,
            percentage: stats.percentage,
            is_full: stats.is_full,
        }
    }
}

impl From<&TicketingOption> for OptionResponse {
    fn from(option: &TicketingOption) -> Self {
        Self {
            id: option.id.to_string(),
            edition_id: option.edition_id.to_string(),
            name: option.name.clone(),
            description: option.description.clone(),
            kind: option.kind.as_str(),
            choices: option.choices.clone(),
            is_required: option.is_required,
            position: option.position,
            external_name: option.external_name.clone(),
        }
    }
}

impl From<&TicketingOrderItem> for OrderItemResponse {
    fn from(item: &TicketingOrderItem) -> Self {
        Self {
            id: item.id.to_string(),
            tier_id: item.tier_id.map(|id| id.to_string()),
            name: item.name.clone(),
            first_name: item.first_name.clone(),
            last_name: item.last_name.clone(),
            amount_cents: item.amount_cents,
            options: item.options.clone(),
            custom_fields: item.custom_fields.clone(),
        }
    }
}

impl From<&TicketingOrder> for OrderResponse {
    fn from(order: &TicketingOrder) -> Self {
        Self {
            id: order.id.to_string(),
            edition_id: order.edition_id.to_string(),
            external_id: order.external_id,
            payer_first_name: order.payer_first_name.clone(),
            payer_last_name: order.payer_last_name.clone(),
            payer_email: order.payer_email.clone(),
            amount_cents: order.amount_cents,
            status: order.status.as_str(),
            ordered_at: order.ordered_at,
            items: order.items.iter().map(OrderItemResponse::from).collect(),
        }
    }
}

impl From<&ExternalTicketing> for ExternalTicketingResponse {
    fn from(config: &ExternalTicketing) -> Self {
        Self {
            edition_id: config.edition_id.to_string(),
            provider: config.provider.as_str(),
            organization_slug: config.organization_slug.clone(),
            form_type: config.form_type.clone(),
            form_slug: config.form_slug.clone(),
            client_id: config.client_id.clone(),
            has_client_secret: !config.client_secret.is_empty(),
            last_sync_at: config.last_sync_at,
        }
    }
}

// ============================================================================
// Notification Mappers
// ============================================================================

impl From<&Notification> for NotificationResponse {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            kind: notification.kind.as_str(),
            title: notification.title.clone(),
            message: notification.message.clone(),
            category: notification.category.clone(),
            entity_type: notification.entity_type.clone(),
            entity_id: notification.entity_id.map(|id| id.to_string()),
            action_url: notification.action_url.clone(),
            is_read: notification.is_read,
            read_at: notification.read_at,
            created_at: notification.created_at,
        }
    }
}

impl From<&PushSubscription> for PushSubscriptionResponse {
    fn from(subscription: &PushSubscription) -> Self {
        Self {
            id: subscription.id.to_string(),
            endpoint: subscription.endpoint.clone(),
            user_agent: subscription.user_agent.clone(),
            is_active: subscription.is_active,
            created_at: subscription.created_at,
        }
    }
}

// ============================================================================
// Carpool Mappers
// ============================================================================

impl From<&CarpoolOffer> for CarpoolOfferResponse {
    fn from(offer: &CarpoolOffer) -> Self {
        Self {
            id: offer.id.to_string(),
            edition_id: offer.edition_id.to_string(),
            user_id: offer.user_id.to_string(),
            direction: offer.direction.as_str(),
            trip_date: offer.trip_date,
            location_city: offer.location_city.clone(),
            location_address: offer.location_address.clone(),
            seats: offer.seats,
            remaining_seats: offer.remaining_seats(),
            description: offer.description.clone(),
            phone: offer.phone.clone(),
            created_at: offer.created_at,
        }
    }
}

impl From<&CarpoolRequest> for CarpoolRequestResponse {
    fn from(request: &CarpoolRequest) -> Self {
        Self {
            id: request.id.to_string(),
            edition_id: request.edition_id.to_string(),
            user_id: request.user_id.to_string(),
            direction: request.direction.as_str(),
            trip_date: request.trip_date,
            location_city: request.location_city.clone(),
            seats_needed: request.seats_needed,
            description: request.description.clone(),
            phone: request.phone.clone(),
            created_at: request.created_at,
        }
    }
}

impl From<&CarpoolBooking> for BookingResponse {
    fn from(booking: &CarpoolBooking) -> Self {
        Self {
            id: booking.id.to_string(),
            offer_id: booking.offer_id.to_string(),
            requester_id: booking.requester_id.to_string(),
            seats: booking.seats,
            message: booking.message.clone(),
            status: booking.status.as_str(),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use conv_core::{CollaboratorRights, EditionPermission, EditionRights};

    #[test]
    fn test_collaborator_rights_as_names() {
        let now = Utc::now();
        let collaborator = ConventionCollaborator {
            id: Snowflake::new(1),
            convention_id: Snowflake::new(10),
            user_id: Snowflake::new(20),
            title: None,
            rights: CollaboratorRights::EDIT_CONVENTION | CollaboratorRights::MANAGE_VOLUNTEERS,
            edition_permissions: vec![EditionPermission {
                edition_id: Snowflake::new(100),
                rights: EditionRights::DELETE,
            }],
            added_by_id: Snowflake::new(2),
            created_at: now,
            updated_at: now,
        };

        let response = CollaboratorResponse::from(&collaborator);
        assert_eq!(response.rights, vec!["EDIT_CONVENTION", "MANAGE_VOLUNTEERS"]);
        assert_eq!(response.edition_permissions[0].edition_id, "100");
        assert_eq!(response.edition_permissions[0].rights, vec!["DELETE"]);
    }

    #[test]
    fn test_external_ticketing_hides_secret() {
        let now = Utc::now();
        let config = ExternalTicketing {
            id: Snowflake::new(1),
            edition_id: Snowflake::new(2),
            provider: conv_core::TicketingProvider::HelloAsso,
            organization_slug: "club".into(),
            form_type: "Event".into(),
            form_slug: "fest".into(),
            client_id: "client".into(),
            client_secret: "s3cr3t".into(),
            last_sync_at: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(ExternalTicketingResponse::from(&config)).unwrap();
        assert_eq!(json["has_client_secret"], true);
        assert!(!json.to_string().contains("s3cr3t"));
    }

    #[test]
    fn test_notification_type_field() {
        let notification = Notification::new(
            Snowflake::new(5),
            Snowflake::new(6),
            conv_core::NotificationType::Warning,
            "Heads up",
            "Bring a tent",
        );
        let json = serde_json::to_value(NotificationResponse::from(&notification)).unwrap();
        assert_eq!(json["type"], "WARNING");
        assert_eq!(json["id"], "5");
    }
}
