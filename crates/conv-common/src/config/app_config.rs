//! Application configuration structs
//!
//! Loaded from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub auth_rate_limit: WindowLimitConfig,
    pub sensitive_rate_limit: WindowLimitConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub snowflake: SnowflakeConfig,
    pub helloasso: HelloAssoConfig,
    pub push: PushConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" | "dev" => Ok(Self::Development),
            other => Err(ConfigError::InvalidValue("APP_ENV", other.to_string())),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    /// Per-request timeout
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Directory holding the SQL migrations applied at startup
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

/// JWT configuration (expiries in seconds)
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,
}

/// Global token-bucket limit applied to the whole API
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
    /// Key per-IP limits on `X-Forwarded-For`; only set behind a trusted proxy
    #[serde(default)]
    pub trust_proxy: bool,
}

/// Sliding-window limit for a group of endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct WindowLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// File storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: u32,
}

impl StorageConfig {
    #[must_use]
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb as usize * 1024 * 1024
    }
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// HelloAsso API endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct HelloAssoConfig {
    #[serde(default = "default_helloasso_api_url")]
    pub api_url: String,
    #[serde(default = "default_helloasso_token_url")]
    pub token_url: String,
    #[serde(default = "default_outbound_timeout")]
    pub timeout_secs: u64,
}

/// Push delivery; disabled when no relay is configured
#[derive(Debug, Clone, Deserialize)]
pub struct PushConfig {
    pub relay_url: Option<String>,
    pub relay_token: Option<String>,
    pub vapid_public_key: Option<String>,
    #[serde(default = "default_outbound_timeout")]
    pub timeout_secs: u64,
}

impl PushConfig {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.relay_url.is_some()
    }
}

// Default value functions
fn default_app_name() -> String {
    "convention-hub".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_migrations_dir() -> String {
    "./crates/conv-db/migrations".to_string()
}

fn default_true() -> bool {
    true
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> i64 {
    2_592_000 // 30 days
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_max_file_size() -> u32 {
    10
}

fn default_helloasso_api_url() -> String {
    "https://api.helloasso.com/v5".to_string()
}

fn default_helloasso_token_url() -> String {
    "https://api.helloasso.com/oauth2/token".to_string()
}

fn default_outbound_timeout() -> u64 {
    15
}

/// Parse `key` when present, falling back to `default` when absent or unparsable
fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key).and_then(|s| s.parse().ok()).unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    ///
    /// # Errors
    /// Returns `MissingVar` for `API_PORT`, `DATABASE_URL` or `JWT_SECRET`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = match lookup("APP_ENV") {
            Some(value) => value.parse()?,
            None => Environment::default(),
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port: lookup("API_PORT")
                    .and_then(|s| s.parse().ok())
                    .ok_or(ConfigError::MissingVar("API_PORT"))?,
                request_timeout_secs: parse_or(
                    &lookup,
                    "API_REQUEST_TIMEOUT_SECS",
                    default_request_timeout(),
                ),
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    default_max_connections(),
                ),
                min_connections: parse_or(
                    &lookup,
                    "DATABASE_MIN_CONNECTIONS",
                    default_min_connections(),
                ),
                migrations_dir: lookup("DATABASE_MIGRATIONS_DIR")
                    .unwrap_or_else(default_migrations_dir),
                run_migrations: parse_or(&lookup, "DATABASE_RUN_MIGRATIONS", true),
            },
            jwt: JwtConfig {
                secret: lookup("JWT_SECRET").ok_or(ConfigError::MissingVar("JWT_SECRET"))?,
                access_token_expiry: parse_or(
                    &lookup,
                    "JWT_ACCESS_TOKEN_EXPIRY",
                    default_access_token_expiry(),
                ),
                refresh_token_expiry: parse_or(
                    &lookup,
                    "JWT_REFRESH_TOKEN_EXPIRY",
                    default_refresh_token_expiry(),
                ),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_or(
                    &lookup,
                    "RATE_LIMIT_REQUESTS_PER_SECOND",
                    default_requests_per_second(),
                ),
                burst: parse_or(&lookup, "RATE_LIMIT_BURST", default_burst()),
                trust_proxy: parse_or(&lookup, "RATE_LIMIT_TRUST_PROXY", false),
            },
            auth_rate_limit: WindowLimitConfig {
                max_requests: parse_or(&lookup, "AUTH_RATE_LIMIT_MAX", 10),
                window_secs: parse_or(&lookup, "AUTH_RATE_LIMIT_WINDOW_SECS", 60),
            },
            sensitive_rate_limit: WindowLimitConfig {
                max_requests: parse_or(&lookup, "SENSITIVE_RATE_LIMIT_MAX", 5),
                window_secs: parse_or(&lookup, "SENSITIVE_RATE_LIMIT_WINDOW_SECS", 60),
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            storage: StorageConfig {
                upload_dir: lookup("UPLOAD_DIR").unwrap_or_else(default_upload_dir),
                max_file_size_mb: parse_or(&lookup, "MAX_FILE_SIZE_MB", default_max_file_size()),
            },
            snowflake: SnowflakeConfig {
                worker_id: parse_or(&lookup, "WORKER_ID", 0),
            },
            helloasso: HelloAssoConfig {
                api_url: lookup("HELLOASSO_API_URL").unwrap_or_else(default_helloasso_api_url),
                token_url: lookup("HELLOASSO_TOKEN_URL")
                    .unwrap_or_else(default_helloasso_token_url),
                timeout_secs: parse_or(
                    &lookup,
                    "HELLOASSO_TIMEOUT_SECS",
                    default_outbound_timeout(),
                ),
            },
            push: PushConfig {
                relay_url: lookup("PUSH_RELAY_URL").filter(|s| !s.is_empty()),
                relay_token: lookup("PUSH_RELAY_TOKEN").filter(|s| !s.is_empty()),
                vapid_public_key: lookup("VAPID_PUBLIC_KEY").filter(|s| !s.is_empty()),
                timeout_secs: parse_or(&lookup, "PUSH_TIMEOUT_SECS", default_outbound_timeout()),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("API_PORT", "8080"),
        ("DATABASE_URL", "postgres://localhost/conventions"),
        ("JWT_SECRET", "secret"),
    ];

    #[test]
    fn test_defaults_with_required_only() {
        let config = AppConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();

        assert_eq!(config.app.name, "convention-hub");
        assert_eq!(config.app.env, Environment::Development);
        assert_eq!(config.api.address(), "127.0.0.1:8080");
        assert_eq!(config.jwt.access_token_expiry, 900);
        assert_eq!(config.auth_rate_limit.max_requests, 10);
        assert!(!config.rate_limit.trust_proxy);
        assert_eq!(config.storage.max_file_size_bytes(), 10 * 1024 * 1024);
        assert!(config.database.run_migrations);
        assert!(!config.push.is_enabled());
        assert!(config.helloasso.api_url.starts_with("https://"));
    }

    #[test]
    fn test_missing_required_vars() {
        let err = AppConfig::from_lookup(lookup_from(&REQUIRED[1..])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("API_PORT")));

        let err = AppConfig::from_lookup(lookup_from(&REQUIRED[..2])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("JWT_SECRET")));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("APP_ENV", "Production"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("AUTH_RATE_LIMIT_MAX", "3"),
            ("RATE_LIMIT_TRUST_PROXY", "true"),
            ("PUSH_RELAY_URL", "http://relay.local/send"),
            ("WORKER_ID", "7"),
        ]);
        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();

        assert!(config.app.env.is_production());
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.auth_rate_limit.max_requests, 3);
        assert!(config.rate_limit.trust_proxy);
        assert!(config.push.is_enabled());
        assert_eq!(config.snowflake.worker_id, 7);
    }

    #[test]
    fn test_invalid_environment() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("APP_ENV", "moon"));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::InvalidValue("APP_ENV", _))
        ));
    }

    #[test]
    fn test_environment_flags() {
        assert!(Environment::Production.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Development.is_development());
    }
}
