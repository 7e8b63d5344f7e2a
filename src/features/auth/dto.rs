use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::model::{AuthenticatedUser, Role, UserProfile};

/// Session snapshot for /api/auth/me.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponseDto {
    pub authenticated: bool,
    pub user: Option<MeUserDto>,
}

/// The user behind the current session. `role` and `is_active` come from the
/// profile row and stay empty when the account has no profile yet.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeUserDto {
    pub user_id: Uuid,
    pub email: String,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl MeResponseDto {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            user: None,
        }
    }

    pub fn authenticated(user: &AuthenticatedUser, profile: Option<UserProfile>) -> Self {
        Self {
            authenticated: true,
            user: Some(MeUserDto {
                user_id: user.user_id,
                email: user.email.clone(),
                role: profile.as_ref().map(|p| p.role),
                is_active: profile.as_ref().map(|p| p.is_active),
            }),
        }
    }
}
