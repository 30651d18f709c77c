//! Service context - dependency container for services
//!
//! Holds all repositories, the id generator, JWT service and the outbound
//! integrations needed by services.

use std::sync::Arc;

use conv_common::auth::JwtService;
use conv_core::traits::{
    CarpoolBookingRepository, CarpoolOfferRepository, CarpoolRequestRepository,
    CollaboratorRepository, ConventionRepository, EditionRepository, ExternalTicketingRepository,
    MealRepository, NotificationRepository, OptionRepository, OrderRepository,
    PushSubscriptionRepository, QuotaRepository, SessionRepository, TierRepository,
    TimeSlotRepository, UserRepository, VolunteerApplicationRepository, VolunteerTeamRepository,
};
use conv_core::{Snowflake, SnowflakeGenerator};
use conv_db::{
    PgApplicationRepository, PgCarpoolBookingRepository, PgCarpoolOfferRepository,
    PgCarpoolRequestRepository, PgCollaboratorRepository, PgConventionRepository,
    PgEditionRepository, PgExternalTicketingRepository, PgMealRepository,
    PgNotificationRepository, PgOptionRepository, PgOrderRepository, PgPool,
    PgPushSubscriptionRepository, PgQuotaRepository, PgSessionRepository, PgTeamRepository,
    PgTierRepository, PgTimeSlotRepository, PgUserRepository,
};

use crate::integrations::{PushGateway, TicketingProviderClient, UploadStorage};

use super::error::{ServiceError, ServiceResult};

/// Every repository the services use, behind trait objects
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub conventions: Arc<dyn ConventionRepository>,
    pub editions: Arc<dyn EditionRepository>,
    pub collaborators: Arc<dyn CollaboratorRepository>,
    pub applications: Arc<dyn VolunteerApplicationRepository>,
    pub teams: Arc<dyn VolunteerTeamRepository>,
    pub time_slots: Arc<dyn TimeSlotRepository>,
    pub meals: Arc<dyn MealRepository>,
    pub tiers: Arc<dyn TierRepository>,
    pub quotas: Arc<dyn QuotaRepository>,
    pub options: Arc<dyn OptionRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub external_ticketing: Arc<dyn ExternalTicketingRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub push_subscriptions: Arc<dyn PushSubscriptionRepository>,
    pub carpool_offers: Arc<dyn CarpoolOfferRepository>,
    pub carpool_requests: Arc<dyn CarpoolRequestRepository>,
    pub carpool_bookings: Arc<dyn CarpoolBookingRepository>,
}

impl Repositories {
    /// PostgreSQL implementations sharing one pool
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            sessions: Arc::new(PgSessionRepository::new(pool.clone())),
            conventions: Arc::new(PgConventionRepository::new(pool.clone())),
            editions: Arc::new(PgEditionRepository::new(pool.clone())),
            collaborators: Arc::new(PgCollaboratorRepository::new(pool.clone())),
            applications: Arc::new(PgApplicationRepository::new(pool.clone())),
            teams: Arc::new(PgTeamRepository::new(pool.clone())),
            time_slots: Arc::new(PgTimeSlotRepository::new(pool.clone())),
            meals: Arc::new(PgMealRepository::new(pool.clone())),
            tiers: Arc::new(PgTierRepository::new(pool.clone())),
            quotas: Arc::new(PgQuotaRepository::new(pool.clone())),
            options: Arc::new(PgOptionRepository::new(pool.clone())),
            orders: Arc::new(PgOrderRepository::new(pool.clone())),
            external_ticketing: Arc::new(PgExternalTicketingRepository::new(pool.clone())),
            notifications: Arc::new(PgNotificationRepository::new(pool.clone())),
            push_subscriptions: Arc::new(PgPushSubscriptionRepository::new(pool.clone())),
            carpool_offers: Arc::new(PgCarpoolOfferRepository::new(pool.clone())),
            carpool_requests: Arc::new(PgCarpoolRequestRepository::new(pool.clone())),
            carpool_bookings: Arc::new(PgCarpoolBookingRepository::new(pool.clone())),
        }
    }
}

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - JWT service for authentication
/// - Snowflake generator for ID generation
/// - HelloAsso client, push gateway and upload storage
#[derive(Clone)]
pub struct ServiceContext {
    pool: PgPool,
    repos: Repositories,
    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
    ticketing_client: Arc<dyn TicketingProviderClient>,
    push_gateway: Arc<dyn PushGateway>,
    storage: Arc<UploadStorage>,
}

impl ServiceContext {
    pub fn new(
        pool: PgPool,
        repos: Repositories,
        jwt_service: Arc<JwtService>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        ticketing_client: Arc<dyn TicketingProviderClient>,
        push_gateway: Arc<dyn PushGateway>,
        storage: Arc<UploadStorage>,
    ) -> Self {
        Self {
            pool,
            repos,
            jwt_service,
            snowflake_generator,
            ticketing_client,
            push_gateway,
            storage,
        }
    }

    // === Database Pool ===

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.repos.users.as_ref()
    }

    pub fn session_repo(&self) -> &dyn SessionRepository {
        self.repos.sessions.as_ref()
    }

    pub fn convention_repo(&self) -> &dyn ConventionRepository {
        self.repos.conventions.as_ref()
    }

    pub fn edition_repo(&self) -> &dyn EditionRepository {
        self.repos.editions.as_ref()
    }

    pub fn collaborator_repo(&self) -> &dyn CollaboratorRepository {
        self.repos.collaborators.as_ref()
    }

    pub fn application_repo(&self) -> &dyn VolunteerApplicationRepository {
        self.repos.applications.as_ref()
    }

    pub fn team_repo(&self) -> &dyn VolunteerTeamRepository {
        self.repos.teams.as_ref()
    }

    pub fn time_slot_repo(&self) -> &dyn TimeSlotRepository {
        self.repos.time_slots.as_ref()
    }

    pub fn meal_repo(&self) -> &dyn MealRepository {
        self.repos.meals.as_ref()
    }

    pub fn tier_repo(&self) -> &dyn TierRepository {
        self.repos.tiers.as_ref()
    }

    pub fn quota_repo(&self) -> &dyn QuotaRepository {
        self.repos.quotas.as_ref()
    }

    pub fn option_repo(&self) -> &dyn OptionRepository {
        self.repos.options.as_ref()
    }

    pub fn order_repo(&self) -> &dyn OrderRepository {
        self.repos.orders.as_ref()
    }

    pub fn external_ticketing_repo(&self) -> &dyn ExternalTicketingRepository {
        self.repos.external_ticketing.as_ref()
    }

    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.repos.notifications.as_ref()
    }

    pub fn push_subscription_repo(&self) -> &dyn PushSubscriptionRepository {
        self.repos.push_subscriptions.as_ref()
    }

    pub fn carpool_offer_repo(&self) -> &dyn CarpoolOfferRepository {
        self.repos.carpool_offers.as_ref()
    }

    pub fn carpool_request_repo(&self) -> &dyn CarpoolRequestRepository {
        self.repos.carpool_requests.as_ref()
    }

    pub fn carpool_booking_repo(&self) -> &dyn CarpoolBookingRepository {
        self.repos.carpool_bookings.as_ref()
    }

    // === Services & integrations ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn ticketing_client(&self) -> &dyn TicketingProviderClient {
        self.ticketing_client.as_ref()
    }

    pub fn push_gateway(&self) -> &dyn PushGateway {
        self.push_gateway.as_ref()
    }

    pub fn storage(&self) -> &UploadStorage {
        self.storage.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("repositories", &"...")
            .field("push_enabled", &self.push_gateway.is_enabled())
            .field("storage", &self.storage)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    repos: Option<Repositories>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    ticketing_client: Option<Arc<dyn TicketingProviderClient>>,
    push_gateway: Option<Arc<dyn PushGateway>>,
    storage: Option<Arc<UploadStorage>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pool and, unless repositories were given, the Postgres repositories
    pub fn pool(mut self, pool: PgPool) -> Self {
        if self.repos.is_none() {
            self.repos = Some(Repositories::postgres(&pool));
        }
        self.pool = Some(pool);
        self
    }

    pub fn repositories(mut self, repos: Repositories) -> Self {
        self.repos = Some(repos);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn ticketing_client(mut self, client: Arc<dyn TicketingProviderClient>) -> Self {
        self.ticketing_client = Some(client);
        self
    }

    pub fn push_gateway(mut self, gateway: Arc<dyn PushGateway>) -> Self {
        self.push_gateway = Some(gateway);
        self
    }

    pub fn storage(mut self, storage: Arc<UploadStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let missing = |name: &str| ServiceError::validation(format!("{name} is required"));

        Ok(ServiceContext::new(
            self.pool.ok_or_else(|| missing("pool"))?,
            self.repos.ok_or_else(|| missing("repositories"))?,
            self.jwt_service.ok_or_else(|| missing("jwt_service"))?,
            self.snowflake_generator
                .unwrap_or_else(|| Arc::new(SnowflakeGenerator::default())),
            self.ticketing_client.ok_or_else(|| missing("ticketing_client"))?,
            self.push_gateway.ok_or_else(|| missing("push_gateway"))?,
            self.storage.ok_or_else(|| missing("storage"))?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_reports_missing_dependency() {
        let err = ServiceContextBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("pool is required"));
    }
}
