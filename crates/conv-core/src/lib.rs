//! # conv-core
//!
//! Domain layer containing entities, value objects, repository traits and the
//! business rules (permissions, meal eligibility, quota statistics).
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod rules;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    ApplicationStatus, AuthSession, BookingStatus, CarpoolBooking, CarpoolOffer, CarpoolRequest,
    Convention, ConventionCollaborator, CustomFieldAnswer, CustomFieldMatch, DietaryPreference,
    Edition, EditionPermission, EditionPhase, ExternalTicketing, ItemOption, MealType,
    Notification, NotificationType, OptionKind, OrderStatus, PushSubscription, TicketingOption,
    TicketingOrder, TicketingOrderItem, TicketingProvider, TicketingQuota, TicketingSync,
    TicketingTier, TripDirection, User, VolunteerApplication, VolunteerMeal,
    VolunteerMealSelection, VolunteerTeam, VolunteerTimeSlot,
};
pub use error::DomainError;
pub use rules::{AccessScope, Capability, QuotaStats};
pub use traits::{
    CarpoolBookingRepository, CarpoolOfferRepository, CarpoolRequestRepository,
    CollaboratorRepository, ConventionRepository, EditionRepository, ExternalTicketingRepository,
    MealRepository, NotificationRepository, OptionRepository, OrderRepository, Page,
    PushSubscriptionRepository, QuotaRepository, RepoResult, SessionRepository, TierRepository,
    TimeSlotRepository, UserRepository, VolunteerApplicationRepository, VolunteerTeamRepository,
};
pub use value_objects::{
    ArrivalSlot, CollaboratorRights, EditionRights, Snowflake, SnowflakeGenerator,
    SnowflakeParseError, TimeOfDay,
};
