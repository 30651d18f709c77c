//! Database models - SQLx-compatible structs for PostgreSQL tables

mod carpool;
mod collaborator;
mod convention;
mod meal;
mod notification;
mod ticketing;
mod user;
mod volunteer;

pub use carpool::{CarpoolBookingModel, CarpoolOfferModel, CarpoolRequestModel};
pub use collaborator::{CollaboratorModel, EditionPermissionModel};
pub use convention::{ConventionModel, EditionModel};
pub use meal::{MealHeadcountModel, MealModel, MealSelectionModel};
pub use notification::{NotificationModel, PushSubscriptionModel};
pub use ticketing::{
    ExternalTicketingModel, OptionModel, OrderItemModel, OrderModel, QuotaCustomFieldModel,
    QuotaLinkModel, QuotaModel, TierModel,
};
pub use user::{SessionModel, UserModel};
pub use volunteer::{ApplicationModel, AssignmentModel, TeamModel, TimeSlotModel};
