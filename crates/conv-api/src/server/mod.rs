//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use conv_common::{AppConfig, AppError, JwtService};
use conv_core::SnowflakeGenerator;
use conv_db::{create_pool, run_migrations, PgPool};
use conv_service::integrations::{push_gateway_from_config, HelloAssoClient, UploadStorage};
use conv_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{debug, info};

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// How often idle sliding-window keys are dropped
const LIMITER_PURGE_INTERVAL: Duration = Duration::from_secs(300);

/// Build the complete Axum application with all routes and middleware
///
/// # Errors
/// Returns `AppError::Config` when the middleware settings are unusable
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let router = apply_middleware(create_router(&state), state.config())?;
    let upload_dir = state.config().storage.upload_dir.clone();

    Ok(router
        .merge(health_routes())
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool, &config.database.migrations_dir)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    build_state(config, pool)
}

/// Wire the integrations and repositories around an open pool
///
/// # Errors
/// Returns `AppError::Config` when an integration cannot be built
pub fn build_state(config: AppConfig, pool: PgPool) -> Result<AppState, AppError> {
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));

    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let ticketing_client = HelloAssoClient::new(&config.helloasso)
        .map_err(|e| AppError::Config(e.to_string()))?;

    let push_gateway =
        push_gateway_from_config(&config.push).map_err(|e| AppError::Config(e.to_string()))?;
    if !config.push.is_enabled() {
        info!("Push relay not configured, web push disabled");
    }

    let storage = UploadStorage::from_config(&config.storage);

    let service_context = ServiceContextBuilder::new()
        .pool(pool)
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .ticketing_client(Arc::new(ticketing_client))
        .push_gateway(push_gateway)
        .storage(Arc::new(storage))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Periodically drop limiter keys whose window has passed
fn spawn_limiter_purge(state: &AppState) {
    let state = state.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(LIMITER_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = state.auth_limiter().purge_idle() + state.sensitive_limiter().purge_idle();
            if purged > 0 {
                debug!(purged, "Purged idle rate limit keys");
            }
        }
    });
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Server listening on http://{}", addr);

    // Peer addresses feed the per-IP limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::Config(format!("Server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();

    let state = create_app_state(config).await?;
    spawn_limiter_purge(&state);

    let app = create_app(state)?;

    run_server(app, &addr).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    /// State whose pool never connects unless a handler touches it
    fn lazy_state() -> AppState {
        let config = AppConfig::from_lookup(|key| match key {
            "API_PORT" => Some("8080".to_string()),
            "DATABASE_URL" => Some("postgres://localhost/conventions_unused".to_string()),
            "JWT_SECRET" => Some("router-test-secret".to_string()),
            _ => None,
        })
        .unwrap();
        let pool = PgPool::connect_lazy(&config.database.url).unwrap();
        build_state(config, pool).unwrap()
    }

    fn json_post(uri: &str, body: &'static str, forwarded_for: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", forwarded_for)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let app = create_app(lazy_state()).unwrap();

        let response = app
            .oneshot(Request::get("/api/v1/users/@me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let app = create_app(lazy_state()).unwrap();

        let response = app
            .oneshot(Request::get("/api/v1/editions/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_does_not_need_auth() {
        let app = create_app(lazy_state()).unwrap();

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_auth_routes_are_limited_per_ip() {
        let state = lazy_state();
        let max = state.config().auth_rate_limit.max_requests;
        let app = create_app(state).unwrap();

        // Invalid bodies fail validation without reaching the database
        for _ in 0..max {
            let response = app
                .clone()
                .oneshot(json_post(
                    "/api/v1/auth/login",
                    r#"{"email":"nope","password":""}"#,
                    "203.0.113.9",
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        let response = app
            .oneshot(json_post(
                "/api/v1/auth/login",
                r#"{"email":"nope","password":""}"#,
                "203.0.113.9",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key(header::RETRY_AFTER));
    }

    #[tokio::test]
    async fn test_rotating_forwarded_header_shares_one_bucket() {
        let state = lazy_state();
        let max = state.config().auth_rate_limit.max_requests;
        let app = create_app(state).unwrap();

        for i in 0..max {
            let response = app
                .clone()
                .oneshot(json_post(
                    "/api/v1/auth/register",
                    r#"{"email":"nope"}"#,
                    &format!("198.51.100.{i}"),
                ))
                .await
                .unwrap();
            assert_ne!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        }

        let response = app
            .oneshot(json_post(
                "/api/v1/auth/register",
                r#"{"email":"nope"}"#,
                "192.0.2.200",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
