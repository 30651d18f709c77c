//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment,
    HelloAssoConfig, JwtConfig, PushConfig, RateLimitConfig, ServerConfig, SnowflakeConfig,
    StorageConfig, WindowLimitConfig,
};
