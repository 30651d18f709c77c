//! User service
//!
//! Handles the current user's profile and public profiles.

use chrono::Utc;
use conv_core::entities::User;
use conv_core::Snowflake;
use tracing::{info, instrument};

use crate::dto::{CurrentUserResponse, PublicUserResponse, UpdateUserRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn find(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))
    }

    /// Get current user (full profile)
    #[instrument(skip(self))]
    pub async fn get_current_user(&self, user_id: Snowflake) -> ServiceResult<CurrentUserResponse> {
        let user = self.find(user_id).await?;
        Ok(CurrentUserResponse::from(&user))
    }

    /// Get another user's public profile
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Snowflake) -> ServiceResult<PublicUserResponse> {
        let user = self.find(user_id).await?;
        Ok(PublicUserResponse::from(&user))
    }

    /// Update current user; the admin flag is never touched here
    #[instrument(skip(self, request))]
    pub async fn update_current_user(
        &self,
        user_id: Snowflake,
        request: UpdateUserRequest,
    ) -> ServiceResult<CurrentUserResponse> {
        let mut user = self.find(user_id).await?;

        if let Some(pseudo) = request.pseudo {
            user.pseudo = pseudo;
        }
        if let Some(first_name) = request.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = request.last_name {
            user.last_name = Some(last_name);
        }
        if let Some(phone) = request.phone {
            user.phone = Some(phone);
        }
        if let Some(picture) = request.profile_picture {
            user.profile_picture = Some(picture);
        }
        user.updated_at = Utc::now();

        self.ctx.user_repo().update(&user).await?;

        info!(user_id = %user_id, "User profile updated");

        Ok(CurrentUserResponse::from(&user))
    }
}
