use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Global role on a profile, or per-city role on a membership.
///
/// The derived ordering is the authorization contract: viewer < operator <
/// admin, with superuser above all three. Superuser is only meaningful as a
/// global role; memberships carry the lower three.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ToSchema,
    sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Viewer,
    Operator,
    Admin,
    Superuser,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Operator => "operator",
            Role::Admin => "admin",
            Role::Superuser => "superuser",
        }
    }

    /// True when this role meets `minimum` in the fixed ordering.
    pub fn meets(self, minimum: Role) -> bool {
        self >= minimum
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity attested by the auth provider's session token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Per-request identity resolved once at the boundary. Anonymous is a normal
/// state (no credential, or an expired one), not an error.
#[derive(Debug, Clone)]
pub enum Identity {
    Anonymous,
    Authenticated(AuthenticatedUser),
}

impl Identity {
    pub fn user(&self) -> Option<&AuthenticatedUser> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(user) => Some(user),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }
}

/// Role and active flag owned 1:1 by a user. A user with no profile row has
/// no privileges.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering_is_fixed() {
        assert!(Role::Viewer < Role::Operator);
        assert!(Role::Operator < Role::Admin);
        assert!(Role::Admin < Role::Superuser);
    }

    #[test]
    fn test_role_meets_minimum() {
        assert!(Role::Operator.meets(Role::Viewer));
        assert!(Role::Operator.meets(Role::Operator));
        assert!(!Role::Operator.meets(Role::Admin));
        assert!(Role::Superuser.meets(Role::Admin));
        assert!(!Role::Viewer.meets(Role::Operator));
    }

    #[test]
    fn test_identity_accessors() {
        let anon = Identity::Anonymous;
        assert!(anon.is_anonymous());
        assert!(anon.user().is_none());

        let user = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: "op@example.org".to_string(),
        };
        let authed = Identity::Authenticated(user.clone());
        assert!(!authed.is_anonymous());
        assert_eq!(authed.user().map(|u| u.user_id), Some(user.user_id));
    }
}
