//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in conv-core.
//! Each repository handles database operations for a specific domain entity.

mod application;
mod carpool;
mod collaborator;
mod convention;
mod edition;
mod error;
mod external_ticketing;
mod meal;
mod notification;
mod option;
mod order;
mod push_subscription;
mod quota;
mod session;
mod team;
mod tier;
mod time_slot;
mod user;

pub use application::PgApplicationRepository;
pub use carpool::{PgCarpoolBookingRepository, PgCarpoolOfferRepository, PgCarpoolRequestRepository};
pub use collaborator::PgCollaboratorRepository;
pub use convention::PgConventionRepository;
pub use edition::PgEditionRepository;
pub use external_ticketing::PgExternalTicketingRepository;
pub use meal::PgMealRepository;
pub use notification::PgNotificationRepository;
pub use option::PgOptionRepository;
pub use order::PgOrderRepository;
pub use push_subscription::PgPushSubscriptionRepository;
pub use quota::PgQuotaRepository;
pub use session::PgSessionRepository;
pub use team::PgTeamRepository;
pub use tier::PgTierRepository;
pub use time_slot::PgTimeSlotRepository;
pub use user::PgUserRepository;
