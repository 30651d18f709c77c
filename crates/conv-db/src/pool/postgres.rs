//! PostgreSQL connection pool and startup migrations

use std::path::Path;
use std::time::Duration;

use conv_common::DatabaseConfig;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Pool sizing and timeouts
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    /// Maximum time to wait for a connection
    pub acquire_timeout: Duration,
    /// Maximum idle time before a connection is closed
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

impl From<&DatabaseConfig> for PoolSettings {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_connections: config.max_connections,
            min_connections: config.min_connections.min(config.max_connections),
            ..Self::default()
        }
    }
}

/// Create a new PostgreSQL connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let settings = PoolSettings::from(config);
    tracing::debug!(
        max_connections = settings.max_connections,
        min_connections = settings.min_connections,
        "Opening database pool"
    );

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(settings.idle_timeout)
        .max_lifetime(settings.max_lifetime)
        .connect(&config.url)
        .await
}

/// Apply pending SQL migrations found in `dir`
pub async fn run_migrations(pool: &PgPool, dir: impl AsRef<Path>) -> Result<(), MigrateError> {
    let dir = dir.as_ref();
    let migrator = Migrator::new(dir).await?;
    tracing::info!(
        dir = %dir.display(),
        migrations = migrator.iter().count(),
        "Applying database migrations"
    );
    migrator.run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max: u32, min: u32) -> DatabaseConfig {
        DatabaseConfig {
            url: "postgres://localhost/conventions".to_string(),
            max_connections: max,
            min_connections: min,
            migrations_dir: "./migrations".to_string(),
            run_migrations: true,
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = PoolSettings::default();
        assert_eq!(settings.max_connections, 10);
        assert_eq!(settings.min_connections, 1);
        assert_eq!(settings.acquire_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_settings_from_config_clamp_min() {
        let settings = PoolSettings::from(&config(4, 8));
        assert_eq!(settings.max_connections, 4);
        assert_eq!(settings.min_connections, 4);
    }
}
