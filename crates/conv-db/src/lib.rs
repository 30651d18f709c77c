//! # conv-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `conv-core`. It handles:
//!
//! - Connection pool management and startup migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use conv_common::AppConfig;
//! use conv_db::{create_pool, run_migrations, PgUserRepository};
//!
//! async fn example(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&config.database).await?;
//!     run_migrations(&pool, &config.database.migrations_dir).await?;
//!     let user_repo = PgUserRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, PgPool, PoolSettings};
pub use repositories::{
    PgApplicationRepository, PgCarpoolBookingRepository, PgCarpoolOfferRepository,
    PgCarpoolRequestRepository, PgCollaboratorRepository, PgConventionRepository,
    PgEditionRepository, PgExternalTicketingRepository, PgMealRepository,
    PgNotificationRepository, PgOptionRepository, PgOrderRepository, PgPushSubscriptionRepository,
    PgQuotaRepository, PgSessionRepository, PgTeamRepository, PgTierRepository,
    PgTimeSlotRepository, PgUserRepository,
};
