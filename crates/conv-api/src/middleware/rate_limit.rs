//! Sliding-window rate limiting middleware
//!
//! `limit_by_ip` guards the auth endpoints, `limit_by_user` guards endpoints
//! that call out to third parties. Both answer 429 with `Retry-After`.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use conv_common::{RateDecision, SlidingWindowLimiter};
use tracing::warn;

use crate::response::ApiError;
use crate::state::AppState;

/// Client address: the socket peer, or the first `X-Forwarded-For` hop when
/// the proxy in front is trusted
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> String {
    let forwarded = if trust_proxy {
        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    } else {
        None
    };

    forwarded
        .or_else(|| peer.map(|p| p.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn enforce(limiter: &SlidingWindowLimiter, key: &str) -> Result<(), ApiError> {
    match limiter.check(key) {
        RateDecision::Allowed { .. } => Ok(()),
        RateDecision::Limited { retry_after } => {
            warn!(key, retry_after_secs = retry_after.as_secs(), "Rate limit hit");
            Err(ApiError::RateLimited {
                // whole seconds, rounded up
                retry_after_secs: retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0),
            })
        }
    }
}

pub async fn limit_by_ip(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let trust_proxy = state.config().rate_limit.trust_proxy;
    let key = format!("ip:{}", client_ip(request.headers(), peer, trust_proxy));

    if let Err(err) = enforce(state.auth_limiter(), &key) {
        return err.into_response();
    }
    next.run(request).await
}

/// Keyed on the bearer token's subject; unauthenticated requests pass through
/// and are rejected by the handler's extractor
pub async fn limit_by_user(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let user_id = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|token| state.jwt_service().validate_access_token(token).ok())
        .map(|claims| claims.sub);

    if let Some(user_id) = user_id {
        if let Err(err) = enforce(state.sensitive_limiter(), &format!("user:{user_id}")) {
            return err.into_response();
        }
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::time::Duration;

    #[test]
    fn test_client_ip_from_trusted_proxy() {
        let mut headers = HeaderMap::new();
        let peer: SocketAddr = "10.0.0.9:5000".parse().unwrap();
        assert_eq!(client_ip(&headers, Some(peer), true), "10.0.0.9");
        assert_eq!(client_ip(&headers, None, true), "unknown");

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers, Some(peer), true), "203.0.113.7");
    }

    #[test]
    fn test_client_ip_ignores_forwarded_header_by_default() {
        let peer: SocketAddr = "10.0.0.9:5000".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7"));
        assert_eq!(client_ip(&headers, Some(peer), false), "10.0.0.9");

        // rotating the header does not open a new bucket
        headers.insert("x-forwarded-for", HeaderValue::from_static("198.51.100.1"));
        assert_eq!(client_ip(&headers, Some(peer), false), "10.0.0.9");
    }

    #[test]
    fn test_enforce_limits_after_max() {
        let limiter = SlidingWindowLimiter::new(2, Duration::from_secs(60));
        assert!(enforce(&limiter, "ip:1").is_ok());
        assert!(enforce(&limiter, "ip:1").is_ok());

        let err = enforce(&limiter, "ip:1").unwrap_err();
        assert!(matches!(err, ApiError::RateLimited { retry_after_secs } if retry_after_secs > 0));
        assert!(enforce(&limiter, "ip:2").is_ok());
    }
}
