//! User entity <-> model mapper

use conv_core::entities::{AuthSession, User};
use conv_core::value_objects::Snowflake;

use crate::models::{SessionModel, UserModel};

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            email: model.email,
            pseudo: model.pseudo,
            first_name: model.first_name,
            last_name: model.last_name,
            phone: model.phone,
            profile_picture: model.profile_picture,
            is_global_admin: model.is_global_admin,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<SessionModel> for AuthSession {
    fn from(model: SessionModel) -> Self {
        AuthSession {
            session_id: model.session_id,
            user_id: Snowflake::new(model.user_id),
            expires_at: model.expires_at,
            revoked_at: model.revoked_at,
            created_at: model.created_at,
        }
    }
}
