//! Domain entities - core business objects

mod carpool;
mod collaborator;
mod convention;
mod edition;
mod meal;
mod notification;
mod ticketing;
mod user;
mod volunteer;

#[cfg(test)]
pub(crate) use edition::fixtures;

pub use carpool::{BookingStatus, CarpoolBooking, CarpoolOffer, CarpoolRequest, TripDirection};
pub use collaborator::{ConventionCollaborator, EditionPermission};
pub use convention::Convention;
pub use edition::{Edition, EditionPhase};
pub use meal::{MealType, VolunteerMeal, VolunteerMealSelection};
pub use notification::{Notification, NotificationType, PushSubscription};
pub use ticketing::{
    CustomFieldAnswer, CustomFieldMatch, ExternalTicketing, ItemOption, OptionKind, OrderStatus,
    TicketingOption, TicketingOrder, TicketingOrderItem, TicketingProvider, TicketingQuota,
    TicketingSync, TicketingTier,
};
pub use user::{AuthSession, User};
pub use volunteer::{
    ApplicationStatus, DietaryPreference, VolunteerApplication, VolunteerTeam, VolunteerTimeSlot,
};
