//! Business logic services
//!
//! One service per domain area. Each borrows the shared `ServiceContext`,
//! checks rights through `PermissionService` and maps entities to DTOs.

pub mod auth;
pub mod carpool;
pub mod collaborator;
pub mod context;
pub mod convention;
pub mod edition;
pub mod error;
pub mod external_ticketing;
pub mod meal;
pub mod notification;
pub mod permission;
pub mod team;
pub mod ticketing;
pub mod time_slot;
pub mod upload;
pub mod user;
pub mod volunteer;

use conv_core::Page;

// Re-export all services for convenience
pub use auth::AuthService;
pub use carpool::CarpoolService;
pub use collaborator::CollaboratorService;
pub use context::{Repositories, ServiceContext, ServiceContextBuilder};
pub use convention::ConventionService;
pub use edition::{EditionService, EditionToggle};
pub use error::{ServiceError, ServiceResult};
pub use external_ticketing::ExternalTicketingService;
pub use meal::MealService;
pub use notification::{FanOutReport, NotificationService};
pub use permission::{AccessRows, PermissionService};
pub use team::TeamService;
pub use ticketing::TicketingService;
pub use time_slot::TimeSlotService;
pub use upload::UploadService;
pub use user::UserService;
pub use volunteer::VolunteerService;

/// Fetch one row past the page so the caller can tell whether more exist
pub(crate) fn probe(page: Page) -> Page {
    Page {
        limit: page.limit + 1,
        offset: page.offset,
    }
}
