//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Methods documented as transactional must
//! apply all their writes or none.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::entities::{
    ApplicationStatus, AuthSession, BookingStatus, CarpoolBooking, CarpoolOffer, CarpoolRequest,
    Convention, ConventionCollaborator, CustomFieldMatch, Edition, ExternalTicketing,
    Notification, PushSubscription, TicketingOption, TicketingOrder, TicketingQuota,
    TicketingSync, TicketingTier, User, VolunteerApplication, VolunteerMeal,
    VolunteerMealSelection, VolunteerTeam, VolunteerTimeSlot,
};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Offset pagination
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Email lookup is case-insensitive
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>>;

    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;
}

// ============================================================================
// Session Repository (refresh tokens)
// ============================================================================

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &AuthSession) -> RepoResult<()>;

    async fn find(&self, session_id: &str) -> RepoResult<Option<AuthSession>>;

    /// Revoke one session; returns false when it was already revoked or unknown
    async fn revoke(&self, session_id: &str) -> RepoResult<bool>;

    async fn revoke_all_for_user(&self, user_id: Snowflake) -> RepoResult<u64>;
}

// ============================================================================
// Convention Repository
// ============================================================================

#[async_trait]
pub trait ConventionRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Convention>>;

    /// Public listing, archived conventions excluded
    async fn list_active(&self, page: Page) -> RepoResult<Vec<Convention>>;

    /// Conventions the user authored or collaborates on
    async fn find_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Convention>>;

    async fn create(&self, convention: &Convention) -> RepoResult<()>;

    async fn update(&self, convention: &Convention) -> RepoResult<()>;

    /// Hard delete; editions and everything below cascade
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Edition Repository
// ============================================================================

#[async_trait]
pub trait EditionRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Edition>>;

    async fn find_by_convention(&self, convention_id: Snowflake) -> RepoResult<Vec<Edition>>;

    /// Online editions ending on or after `today`, soonest first
    async fn find_upcoming(&self, today: NaiveDate, page: Page) -> RepoResult<Vec<Edition>>;

    async fn create(&self, edition: &Edition) -> RepoResult<()>;

    async fn update(&self, edition: &Edition) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Collaborator Repository
// ============================================================================

#[async_trait]
pub trait CollaboratorRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<ConventionCollaborator>>;

    async fn find(
        &self,
        convention_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<ConventionCollaborator>>;

    async fn find_by_convention(
        &self,
        convention_id: Snowflake,
    ) -> RepoResult<Vec<ConventionCollaborator>>;

    /// Insert the row and its edition overrides (transactional)
    async fn create(&self, collaborator: &ConventionCollaborator) -> RepoResult<()>;

    /// Update title and rights and replace every edition override (transactional)
    async fn update(&self, collaborator: &ConventionCollaborator) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Volunteer Repositories
// ============================================================================

#[async_trait]
pub trait VolunteerApplicationRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<VolunteerApplication>>;

    async fn find(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<VolunteerApplication>>;

    async fn find_by_edition(
        &self,
        edition_id: Snowflake,
        status: Option<ApplicationStatus>,
    ) -> RepoResult<Vec<VolunteerApplication>>;

    async fn create(&self, application: &VolunteerApplication) -> RepoResult<()>;

    async fn update(&self, application: &VolunteerApplication) -> RepoResult<()>;

    /// Persist a decision and, on acceptance, the initial meal selections (transactional)
    async fn decide(
        &self,
        application: &VolunteerApplication,
        selections: &[VolunteerMealSelection],
    ) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

#[async_trait]
pub trait VolunteerTeamRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<VolunteerTeam>>;

    async fn find_by_edition(&self, edition_id: Snowflake) -> RepoResult<Vec<VolunteerTeam>>;

    /// Case-insensitive name check, optionally ignoring one team
    async fn name_exists(
        &self,
        edition_id: Snowflake,
        name: &str,
        except: Option<Snowflake>,
    ) -> RepoResult<bool>;

    async fn create(&self, team: &VolunteerTeam) -> RepoResult<()>;

    async fn update(&self, team: &VolunteerTeam) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

#[async_trait]
pub trait TimeSlotRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<VolunteerTimeSlot>>;

    async fn find_by_edition(&self, edition_id: Snowflake) -> RepoResult<Vec<VolunteerTimeSlot>>;

    /// Slots of an edition the user is assigned to
    async fn find_assigned(
        &self,
        edition_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Vec<VolunteerTimeSlot>>;

    async fn create(&self, slot: &VolunteerTimeSlot) -> RepoResult<()>;

    async fn update(&self, slot: &VolunteerTimeSlot) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Assign under a row lock, rechecking capacity (transactional)
    async fn assign(&self, slot_id: Snowflake, user_id: Snowflake) -> RepoResult<()>;

    /// Returns false when the user was not assigned
    async fn unassign(&self, slot_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;
}

#[async_trait]
pub trait MealRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<VolunteerMeal>>;

    /// Meals of an edition ordered by date then meal type
    async fn find_by_edition(&self, edition_id: Snowflake) -> RepoResult<Vec<VolunteerMeal>>;

    /// Insert, skipping `(date, meal_type)` pairs that already exist; returns inserted count
    async fn create_many(&self, meals: &[VolunteerMeal]) -> RepoResult<u64>;

    async fn set_enabled(&self, id: Snowflake, enabled: bool) -> RepoResult<()>;

    async fn find_selections(
        &self,
        application_id: Snowflake,
    ) -> RepoResult<Vec<VolunteerMealSelection>>;

    /// Replace all selections of an application (transactional)
    async fn replace_selections(
        &self,
        application_id: Snowflake,
        selections: &[VolunteerMealSelection],
    ) -> RepoResult<()>;

    /// Accepted selections per meal, from accepted applications only
    async fn headcounts(&self, edition_id: Snowflake) -> RepoResult<Vec<(Snowflake, i64)>>;
}

// ============================================================================
// Ticketing Repositories
// ============================================================================

#[async_trait]
pub trait TierRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<TicketingTier>>;

    /// Tiers ordered by position
    async fn find_by_edition(&self, edition_id: Snowflake) -> RepoResult<Vec<TicketingTier>>;

    async fn create(&self, tier: &TicketingTier) -> RepoResult<()>;

    async fn update(&self, tier: &TicketingTier) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

#[async_trait]
pub trait QuotaRepository: Send + Sync {
    /// Quota with its tier, option and custom-field links
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<TicketingQuota>>;

    async fn find_by_edition(&self, edition_id: Snowflake) -> RepoResult<Vec<TicketingQuota>>;

    async fn create(&self, quota: &TicketingQuota) -> RepoResult<()>;

    /// Update title, description and quantity
    async fn update(&self, quota: &TicketingQuota) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    async fn link_tier(&self, quota_id: Snowflake, tier_id: Snowflake) -> RepoResult<()>;

    async fn unlink_tier(&self, quota_id: Snowflake, tier_id: Snowflake) -> RepoResult<bool>;

    async fn link_option(&self, quota_id: Snowflake, option_id: Snowflake) -> RepoResult<()>;

    async fn unlink_option(&self, quota_id: Snowflake, option_id: Snowflake) -> RepoResult<bool>;

    async fn add_custom_field(
        &self,
        quota_id: Snowflake,
        field: &CustomFieldMatch,
    ) -> RepoResult<()>;

    async fn remove_custom_field(
        &self,
        quota_id: Snowflake,
        field: &CustomFieldMatch,
    ) -> RepoResult<bool>;
}

#[async_trait]
pub trait OptionRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<TicketingOption>>;

    async fn find_by_edition(&self, edition_id: Snowflake) -> RepoResult<Vec<TicketingOption>>;

    async fn create(&self, option: &TicketingOption) -> RepoResult<()>;

    async fn update(&self, option: &TicketingOption) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Order with its items
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<TicketingOrder>>;

    /// Newest first, with items
    async fn find_by_edition(&self, edition_id: Snowflake, page: Page)
        -> RepoResult<Vec<TicketingOrder>>;

    /// Every order of the edition with items, for statistics
    async fn find_all_by_edition(&self, edition_id: Snowflake) -> RepoResult<Vec<TicketingOrder>>;

    /// Insert an order and its items (transactional)
    async fn create(&self, order: &TicketingOrder) -> RepoResult<()>;
}

#[async_trait]
pub trait ExternalTicketingRepository: Send + Sync {
    async fn find_by_edition(&self, edition_id: Snowflake) -> RepoResult<Option<ExternalTicketing>>;

    /// Insert or replace the configuration of the edition
    async fn upsert(&self, config: &ExternalTicketing) -> RepoResult<()>;

    async fn delete(&self, edition_id: Snowflake) -> RepoResult<bool>;

    /// Upsert tiers and orders by external id and stamp `last_sync_at` (transactional)
    async fn apply_sync(&self, edition_id: Snowflake, sync: &TicketingSync) -> RepoResult<()>;
}

// ============================================================================
// Notification Repositories
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Notification>>;

    /// Newest first
    async fn find_by_user(
        &self,
        user_id: Snowflake,
        unread_only: bool,
        page: Page,
    ) -> RepoResult<Vec<Notification>>;

    async fn unread_count(&self, user_id: Snowflake) -> RepoResult<i64>;

    async fn create(&self, notification: &Notification) -> RepoResult<()>;

    async fn mark_read(&self, id: Snowflake) -> RepoResult<()>;

    async fn mark_all_read(&self, user_id: Snowflake) -> RepoResult<u64>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

#[async_trait]
pub trait PushSubscriptionRepository: Send + Sync {
    /// Insert or take over an endpoint, reactivating it
    async fn upsert(&self, subscription: &PushSubscription) -> RepoResult<()>;

    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<PushSubscription>>;

    async fn find_active_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<PushSubscription>>;

    async fn deactivate(&self, id: Snowflake) -> RepoResult<()>;

    /// Returns false when the user had no such endpoint
    async fn delete_by_endpoint(&self, user_id: Snowflake, endpoint: &str) -> RepoResult<bool>;
}

// ============================================================================
// Carpool Repositories
// ============================================================================

#[async_trait]
pub trait CarpoolOfferRepository: Send + Sync {
    /// Offer with its accepted seat count
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<CarpoolOffer>>;

    async fn find_by_edition(&self, edition_id: Snowflake) -> RepoResult<Vec<CarpoolOffer>>;

    async fn create(&self, offer: &CarpoolOffer) -> RepoResult<()>;

    async fn update(&self, offer: &CarpoolOffer) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

#[async_trait]
pub trait CarpoolRequestRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<CarpoolRequest>>;

    async fn find_by_edition(&self, edition_id: Snowflake) -> RepoResult<Vec<CarpoolRequest>>;

    async fn create(&self, request: &CarpoolRequest) -> RepoResult<()>;

    async fn update(&self, request: &CarpoolRequest) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

#[async_trait]
pub trait CarpoolBookingRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<CarpoolBooking>>;

    async fn find_by_offer(&self, offer_id: Snowflake) -> RepoResult<Vec<CarpoolBooking>>;

    async fn create(&self, booking: &CarpoolBooking) -> RepoResult<()>;

    async fn set_status(&self, id: Snowflake, status: BookingStatus) -> RepoResult<()>;

    /// Accept a pending booking after rechecking the offer's remaining seats
    /// under a row lock (transactional)
    async fn accept(&self, id: Snowflake) -> RepoResult<()>;
}
