//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! the configuration and the sliding-window limiters.

use std::sync::Arc;

use conv_common::{AppConfig, JwtService, SlidingWindowLimiter};
use conv_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
    /// Per-IP limiter for the auth endpoints
    auth_limiter: Arc<SlidingWindowLimiter>,
    /// Per-user limiter for outbound-heavy endpoints (sync, push test)
    sensitive_limiter: Arc<SlidingWindowLimiter>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        let auth_limiter = SlidingWindowLimiter::from_config(&config.auth_rate_limit);
        let sensitive_limiter = SlidingWindowLimiter::from_config(&config.sensitive_rate_limit);
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            auth_limiter: Arc::new(auth_limiter),
            sensitive_limiter: Arc::new(sensitive_limiter),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the JWT service from the service context
    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }

    pub fn auth_limiter(&self) -> &SlidingWindowLimiter {
        &self.auth_limiter
    }

    pub fn sensitive_limiter(&self) -> &SlidingWindowLimiter {
        &self.sensitive_limiter
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .finish()
    }
}
