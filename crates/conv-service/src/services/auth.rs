//! Authentication service
//!
//! Handles user registration, login, token refresh, and logout.
//! Every issued token pair is backed by a session row so refresh tokens can
//! be rotated and revoked.

use chrono::Utc;
use conv_common::auth::{hash_password, validate_password_strength, PasswordService};
use conv_common::AppError;
use conv_core::entities::{AuthSession, User};
use conv_core::Snowflake;
use tracing::{info, instrument, warn};

use crate::dto::{
    AuthResponse, CurrentUserResponse, LoginRequest, LogoutRequest, RefreshTokenRequest,
    RegisterRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user
    #[instrument(skip(self, request), fields(pseudo = %request.pseudo))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        validate_password_strength(&request.password)?;

        let email = request.email.trim().to_lowercase();
        if self.ctx.user_repo().email_exists(&email).await? {
            return Err(ServiceError::conflict("Email already registered"));
        }

        let password_hash = hash_password(&request.password)?;

        let mut user = User::new(self.ctx.generate_id(), email, request.pseudo);
        user.first_name = request.first_name;
        user.last_name = request.last_name;

        self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %user.id, "User registered successfully");

        self.issue_tokens(&user).await
    }

    /// Login with email and password
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_email(request.email.trim())
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown email");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        PasswordService::new()
            .verify_or_error(&request.password, &password_hash)
            .inspect_err(|_| warn!(user_id = %user.id, "Login failed: invalid password"))?;

        info!(user_id = %user.id, "User logged in successfully");

        self.issue_tokens(&user).await
    }

    /// Rotate a refresh token: the presented session is revoked and a new
    /// pair is issued under a fresh session
    #[instrument(skip(self, request))]
    pub async fn refresh_tokens(
        &self,
        request: RefreshTokenRequest,
    ) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;
        let user_id = claims.user_id()?;

        let session = self
            .ctx
            .session_repo()
            .find(&claims.sid)
            .await?
            .filter(|s| s.user_id == user_id && s.is_live(Utc::now()))
            .ok_or_else(|| {
                warn!(user_id = %user_id, "Refresh rejected: session not live");
                ServiceError::App(AppError::InvalidToken)
            })?;

        // A concurrent refresh may have won the race
        if !self.ctx.session_repo().revoke(&session.session_id).await? {
            return Err(ServiceError::App(AppError::InvalidToken));
        }

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))?;

        info!(user_id = %user.id, "Tokens refreshed");

        self.issue_tokens(&user).await
    }

    /// Revoke the given refresh token, or every session of the user
    #[instrument(skip(self, request))]
    pub async fn logout(&self, user_id: Snowflake, request: LogoutRequest) -> ServiceResult<()> {
        match request.refresh_token {
            Some(token) => {
                let claims = self.ctx.jwt_service().validate_refresh_token(&token)?;
                if claims.user_id()? != user_id {
                    return Err(ServiceError::App(AppError::InvalidToken));
                }
                self.ctx.session_repo().revoke(&claims.sid).await?;
                info!(user_id = %user_id, "Session revoked");
            }
            None => {
                let count = self.ctx.session_repo().revoke_all_for_user(user_id).await?;
                info!(user_id = %user_id, count, "All sessions revoked");
            }
        }
        Ok(())
    }

    /// Check that the session behind an access token is still live
    #[instrument(skip(self))]
    pub async fn ensure_session_live(&self, session_id: &str) -> ServiceResult<()> {
        let live = self
            .ctx
            .session_repo()
            .find(session_id)
            .await?
            .is_some_and(|s| s.is_live(Utc::now()));
        if live {
            Ok(())
        } else {
            Err(ServiceError::App(AppError::InvalidToken))
        }
    }

    async fn issue_tokens(&self, user: &User) -> ServiceResult<AuthResponse> {
        let issued = self.ctx.jwt_service().issue(user.id)?;

        let session = AuthSession {
            session_id: issued.session_id.clone(),
            user_id: user.id,
            expires_at: issued.refresh_expires_at,
            revoked_at: None,
            created_at: Utc::now(),
        };
        self.ctx.session_repo().create(&session).await?;

        Ok(AuthResponse {
            access_token: issued.pair.access_token,
            refresh_token: issued.pair.refresh_token,
            token_type: issued.pair.token_type,
            expires_in: issued.pair.expires_in,
            user: CurrentUserResponse::from(user),
        })
    }
}
