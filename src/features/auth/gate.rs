use std::sync::Arc;

use uuid::Uuid;

use super::model::{Identity, Role};
use super::store::AccessStore;
use crate::core::error::AppError;
use crate::features::cities::models::City;
use crate::shared::validation::validate_city_slug;

/// Actions that happen inside one city's workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewContent,
    ManageContent,
    ManageMembers,
}

impl Action {
    pub fn minimum_role(&self) -> Role {
        match self {
            Action::ViewContent => Role::Viewer,
            Action::ManageContent => Role::Operator,
            Action::ManageMembers => Role::Admin,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ViewContent => "view_content",
            Action::ManageContent => "manage_content",
            Action::ManageMembers => "manage_members",
        }
    }
}

/// Actions that are not tied to any single city.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    AccessOperatorArea,
    ManageDirectory,
}

impl GlobalAction {
    pub fn minimum_role(&self) -> Role {
        match self {
            GlobalAction::AccessOperatorArea => Role::Viewer,
            GlobalAction::ManageDirectory => Role::Superuser,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GlobalAction::AccessOperatorArea => "access_operator_area",
            GlobalAction::ManageDirectory => "manage_directory",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    InactiveOrUnknownAccount,
    NoCityAccess,
    InsufficientRole,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::Unauthenticated => "unauthenticated",
            DenyReason::InactiveOrUnknownAccount => "inactive_or_unknown_account",
            DenyReason::NoCityAccess => "no_city_access",
            DenyReason::InsufficientRole => "insufficient_role",
        }
    }
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("authorization denied: {0}")]
    Deny(DenyReason),

    #[error("city not found")]
    CityNotFound,

    #[error("invalid city slug")]
    InvalidCitySlug,

    #[error("authorization data unavailable: {0}")]
    Upstream(#[from] super::store::StoreError),
}

/// Proof that an identity was cleared for an action inside one city.
///
/// Only the gate can mint this, so a handler holding a `CityScope` is known
/// to have passed through `authorize` for that exact city.
#[derive(Debug, Clone)]
pub struct CityScope {
    city: City,
    role: Role,
    user_id: Uuid,
}

impl CityScope {
    pub fn city(&self) -> &City {
        &self.city
    }

    pub fn city_id(&self) -> Uuid {
        self.city.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}

/// Proof that a city was resolved for unauthenticated, read-only access.
#[derive(Debug, Clone)]
pub struct PublicCityScope {
    city: City,
}

impl PublicCityScope {
    pub fn city(&self) -> &City {
        &self.city
    }

    pub fn city_id(&self) -> Uuid {
        self.city.id
    }
}

/// Proof that an identity was cleared for a global action.
#[derive(Debug, Clone)]
pub struct ActorScope {
    user_id: Uuid,
    email: String,
    role: Role,
}

impl ActorScope {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// The single decision point for every protected request.
///
/// The gate resolves identity against the profile table, the city against its
/// slug, and the membership role against the action's minimum. Every deny is
/// logged here with the actor, city, action, and reason; callers translate
/// `GateError` into a redirect or a generic API error and never forward the
/// reason to the client.
pub struct AuthorizationGate {
    store: Arc<dyn AccessStore>,
}

impl AuthorizationGate {
    pub fn new(store: Arc<dyn AccessStore>) -> Self {
        Self { store }
    }

    /// Decides whether `identity` may perform `action` in the city named by
    /// `city_slug`. Checks run in a fixed order: slug shape, authentication,
    /// account state, city existence, membership, role rank. Superusers skip
    /// the membership check but the city must still exist.
    pub async fn authorize(
        &self,
        identity: &Identity,
        city_slug: &str,
        action: Action,
    ) -> Result<CityScope, GateError> {
        if validate_city_slug(city_slug).is_err() {
            return Err(GateError::InvalidCitySlug);
        }

        let user = match identity.user() {
            Some(user) => user,
            None => {
                return Err(self.deny(
                    identity,
                    Some(city_slug),
                    action.as_str(),
                    DenyReason::Unauthenticated,
                ));
            }
        };

        let profile = match self.store.find_profile(user.user_id).await? {
            Some(profile) if profile.is_active => profile,
            _ => {
                return Err(self.deny(
                    identity,
                    Some(city_slug),
                    action.as_str(),
                    DenyReason::InactiveOrUnknownAccount,
                ));
            }
        };

        let city = self
            .store
            .find_city_by_slug(city_slug)
            .await?
            .ok_or(GateError::CityNotFound)?;

        if profile.role == Role::Superuser {
            return Ok(CityScope {
                city,
                role: Role::Superuser,
                user_id: user.user_id,
            });
        }

        let membership_role = match self
            .store
            .find_membership_role(city.id, user.user_id)
            .await?
        {
            Some(role) => role,
            None => {
                return Err(self.deny(
                    identity,
                    Some(city_slug),
                    action.as_str(),
                    DenyReason::NoCityAccess,
                ));
            }
        };

        if !membership_role.meets(action.minimum_role()) {
            return Err(self.deny(
                identity,
                Some(city_slug),
                action.as_str(),
                DenyReason::InsufficientRole,
            ));
        }

        Ok(CityScope {
            city,
            role: membership_role,
            user_id: user.user_id,
        })
    }

    /// Decides whether `identity` may perform a global action. Global actions
    /// are ranked against the account-level role, not any membership.
    pub async fn authorize_global(
        &self,
        identity: &Identity,
        action: GlobalAction,
    ) -> Result<ActorScope, GateError> {
        let user = match identity.user() {
            Some(user) => user,
            None => {
                return Err(self.deny(
                    identity,
                    None,
                    action.as_str(),
                    DenyReason::Unauthenticated,
                ));
            }
        };

        let profile = match self.store.find_profile(user.user_id).await? {
            Some(profile) if profile.is_active => profile,
            _ => {
                return Err(self.deny(
                    identity,
                    None,
                    action.as_str(),
                    DenyReason::InactiveOrUnknownAccount,
                ));
            }
        };

        if !profile.role.meets(action.minimum_role()) {
            return Err(self.deny(
                identity,
                None,
                action.as_str(),
                DenyReason::InsufficientRole,
            ));
        }

        Ok(ActorScope {
            user_id: user.user_id,
            email: profile.email,
            role: profile.role,
        })
    }

    /// Resolves a city for public, read-only access. No identity involved.
    pub async fn resolve_public(&self, city_slug: &str) -> Result<PublicCityScope, GateError> {
        if validate_city_slug(city_slug).is_err() {
            return Err(GateError::InvalidCitySlug);
        }

        let city = self
            .store
            .find_city_by_slug(city_slug)
            .await?
            .ok_or(GateError::CityNotFound)?;

        Ok(PublicCityScope { city })
    }

    fn deny(
        &self,
        identity: &Identity,
        city_slug: Option<&str>,
        action: &str,
        reason: DenyReason,
    ) -> GateError {
        let actor = match identity.user() {
            Some(user) => user.user_id.to_string(),
            None => "anonymous".to_string(),
        };

        match city_slug {
            Some(slug) => {
                tracing::warn!(
                    "Denied '{}' in city '{}' for {}: {}",
                    action,
                    slug,
                    actor,
                    reason
                );
            }
            None => {
                tracing::warn!("Denied '{}' for {}: {}", action, actor, reason);
            }
        }

        GateError::Deny(reason)
    }
}

impl From<GateError> for AppError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Deny(DenyReason::Unauthenticated) => {
                AppError::Unauthorized("Authentication required".to_string())
            }
            GateError::Deny(_) => AppError::Forbidden("Access denied".to_string()),
            GateError::CityNotFound => AppError::NotFound("City not found".to_string()),
            GateError::InvalidCitySlug => {
                AppError::Validation("Invalid city slug format".to_string())
            }
            GateError::Upstream(e) => AppError::Upstream(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::shared::test_helpers::FakeAccessStore;

    fn authenticated(user_id: Uuid) -> Identity {
        Identity::Authenticated(AuthenticatedUser {
            user_id,
            email: format!("{}@example.test", user_id.simple()),
        })
    }

    fn gate_with(store: FakeAccessStore) -> (AuthorizationGate, Arc<FakeAccessStore>) {
        let store = Arc::new(store);
        (AuthorizationGate::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_anonymous_is_denied_unauthenticated() {
        let store = FakeAccessStore::new();
        store.add_city(Uuid::new_v4(), "amsterdam");
        let (gate, _) = gate_with(store);

        let err = gate
            .authorize(&Identity::Anonymous, "amsterdam", Action::ViewContent)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GateError::Deny(DenyReason::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_unknown_account_is_denied() {
        let store = FakeAccessStore::new();
        store.add_city(Uuid::new_v4(), "amsterdam");
        let (gate, _) = gate_with(store);

        let err = gate
            .authorize(
                &authenticated(Uuid::new_v4()),
                "amsterdam",
                Action::ViewContent,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GateError::Deny(DenyReason::InactiveOrUnknownAccount)
        ));
    }

    #[tokio::test]
    async fn test_inactive_account_is_denied() {
        let user_id = Uuid::new_v4();
        let city_id = Uuid::new_v4();
        let store = FakeAccessStore::new();
        store.add_profile(user_id, Role::Admin, false);
        store.add_city(city_id, "amsterdam");
        store.add_membership(city_id, user_id, Role::Admin);
        let (gate, _) = gate_with(store);

        let err = gate
            .authorize(&authenticated(user_id), "amsterdam", Action::ViewContent)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GateError::Deny(DenyReason::InactiveOrUnknownAccount)
        ));
    }

    #[tokio::test]
    async fn test_no_membership_is_denied_no_city_access() {
        let user_id = Uuid::new_v4();
        let store = FakeAccessStore::new();
        store.add_profile(user_id, Role::Operator, true);
        store.add_city(Uuid::new_v4(), "amsterdam");
        let (gate, _) = gate_with(store);

        let err = gate
            .authorize(&authenticated(user_id), "amsterdam", Action::ViewContent)
            .await
            .unwrap_err();

        assert!(matches!(err, GateError::Deny(DenyReason::NoCityAccess)));
    }

    #[tokio::test]
    async fn test_membership_role_gates_each_action() {
        let viewer = Uuid::new_v4();
        let operator = Uuid::new_v4();
        let admin = Uuid::new_v4();
        let city_id = Uuid::new_v4();

        let store = FakeAccessStore::new();
        store.add_profile(viewer, Role::Viewer, true);
        store.add_profile(operator, Role::Viewer, true);
        store.add_profile(admin, Role::Viewer, true);
        store.add_city(city_id, "utrecht");
        store.add_membership(city_id, viewer, Role::Viewer);
        store.add_membership(city_id, operator, Role::Operator);
        store.add_membership(city_id, admin, Role::Admin);
        let (gate, _) = gate_with(store);

        let cases = [
            (viewer, Action::ViewContent, true),
            (viewer, Action::ManageContent, false),
            (viewer, Action::ManageMembers, false),
            (operator, Action::ViewContent, true),
            (operator, Action::ManageContent, true),
            (operator, Action::ManageMembers, false),
            (admin, Action::ViewContent, true),
            (admin, Action::ManageContent, true),
            (admin, Action::ManageMembers, true),
        ];

        for (user_id, action, allowed) in cases {
            let outcome = gate
                .authorize(&authenticated(user_id), "utrecht", action)
                .await;
            if allowed {
                let scope = outcome.unwrap();
                assert_eq!(scope.city().slug, "utrecht");
                assert_eq!(scope.user_id(), user_id);
            } else {
                assert!(matches!(
                    outcome.unwrap_err(),
                    GateError::Deny(DenyReason::InsufficientRole)
                ));
            }
        }
    }

    #[tokio::test]
    async fn test_membership_in_one_city_grants_nothing_elsewhere() {
        let user_id = Uuid::new_v4();
        let amsterdam = Uuid::new_v4();
        let rotterdam = Uuid::new_v4();

        let store = FakeAccessStore::new();
        store.add_profile(user_id, Role::Viewer, true);
        store.add_city(amsterdam, "amsterdam");
        store.add_city(rotterdam, "rotterdam");
        store.add_membership(amsterdam, user_id, Role::Admin);
        let (gate, _) = gate_with(store);

        assert!(gate
            .authorize(&authenticated(user_id), "amsterdam", Action::ManageMembers)
            .await
            .is_ok());

        let err = gate
            .authorize(&authenticated(user_id), "rotterdam", Action::ViewContent)
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::Deny(DenyReason::NoCityAccess)));
    }

    #[tokio::test]
    async fn test_superuser_bypasses_membership_but_not_city_existence() {
        let user_id = Uuid::new_v4();
        let store = FakeAccessStore::new();
        store.add_profile(user_id, Role::Superuser, true);
        store.add_city(Uuid::new_v4(), "groningen");
        let (gate, _) = gate_with(store);

        let scope = gate
            .authorize(&authenticated(user_id), "groningen", Action::ManageMembers)
            .await
            .unwrap();
        assert_eq!(scope.role(), Role::Superuser);

        let err = gate
            .authorize(&authenticated(user_id), "atlantis", Action::ViewContent)
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::CityNotFound));
    }

    #[tokio::test]
    async fn test_unknown_city_is_not_found_for_members_too() {
        let user_id = Uuid::new_v4();
        let store = FakeAccessStore::new();
        store.add_profile(user_id, Role::Operator, true);
        let (gate, _) = gate_with(store);

        let err = gate
            .authorize(&authenticated(user_id), "atlantis", Action::ViewContent)
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::CityNotFound));
    }

    #[tokio::test]
    async fn test_malformed_slug_is_rejected_before_any_lookup() {
        let store = FakeAccessStore::new();
        let (gate, store) = gate_with(store);

        for slug in ["Amsterdam", "am sterdam", "city_1", "-leading", ""] {
            let err = gate
                .authorize(&Identity::Anonymous, slug, Action::ViewContent)
                .await
                .unwrap_err();
            assert!(matches!(err, GateError::InvalidCitySlug), "slug: {slug:?}");
        }

        assert_eq!(store.hits(), 0);
    }

    #[tokio::test]
    async fn test_revocation_applies_on_next_call() {
        let user_id = Uuid::new_v4();
        let city_id = Uuid::new_v4();
        let store = FakeAccessStore::new();
        store.add_profile(user_id, Role::Viewer, true);
        store.add_city(city_id, "amsterdam");
        store.add_membership(city_id, user_id, Role::Operator);
        let (gate, store) = gate_with(store);

        assert!(gate
            .authorize(&authenticated(user_id), "amsterdam", Action::ManageContent)
            .await
            .is_ok());

        store.remove_membership(city_id, user_id);

        let err = gate
            .authorize(&authenticated(user_id), "amsterdam", Action::ManageContent)
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::Deny(DenyReason::NoCityAccess)));
    }

    #[tokio::test]
    async fn test_deactivation_applies_on_next_call() {
        let user_id = Uuid::new_v4();
        let city_id = Uuid::new_v4();
        let store = FakeAccessStore::new();
        store.add_profile(user_id, Role::Viewer, true);
        store.add_city(city_id, "amsterdam");
        store.add_membership(city_id, user_id, Role::Admin);
        let (gate, store) = gate_with(store);

        assert!(gate
            .authorize(&authenticated(user_id), "amsterdam", Action::ViewContent)
            .await
            .is_ok());

        store.set_profile_active(user_id, false);

        let err = gate
            .authorize(&authenticated(user_id), "amsterdam", Action::ViewContent)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GateError::Deny(DenyReason::InactiveOrUnknownAccount)
        ));
    }

    #[tokio::test]
    async fn test_repeated_calls_agree_when_nothing_changed() {
        let user_id = Uuid::new_v4();
        let city_id = Uuid::new_v4();
        let store = FakeAccessStore::new();
        store.add_profile(user_id, Role::Viewer, true);
        store.add_city(city_id, "amsterdam");
        store.add_membership(city_id, user_id, Role::Operator);
        let (gate, _) = gate_with(store);

        let first = gate
            .authorize(&authenticated(user_id), "amsterdam", Action::ManageContent)
            .await
            .unwrap();
        let second = gate
            .authorize(&authenticated(user_id), "amsterdam", Action::ManageContent)
            .await
            .unwrap();

        assert_eq!(first.city_id(), second.city_id());
        assert_eq!(first.role(), second.role());
        assert_eq!(first.user_id(), second.user_id());
    }

    #[tokio::test]
    async fn test_store_failure_is_upstream_not_allow() {
        let user_id = Uuid::new_v4();
        let store = FakeAccessStore::new();
        store.add_profile(user_id, Role::Superuser, true);
        store.set_unavailable(true);
        let (gate, _) = gate_with(store);

        let err = gate
            .authorize(&authenticated(user_id), "amsterdam", Action::ViewContent)
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_global_operator_area_requires_active_account() {
        let active = Uuid::new_v4();
        let inactive = Uuid::new_v4();
        let store = FakeAccessStore::new();
        store.add_profile(active, Role::Viewer, true);
        store.add_profile(inactive, Role::Admin, false);
        let (gate, _) = gate_with(store);

        let scope = gate
            .authorize_global(&authenticated(active), GlobalAction::AccessOperatorArea)
            .await
            .unwrap();
        assert_eq!(scope.user_id(), active);
        assert_eq!(scope.role(), Role::Viewer);

        let err = gate
            .authorize_global(&Identity::Anonymous, GlobalAction::AccessOperatorArea)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GateError::Deny(DenyReason::Unauthenticated)
        ));

        let err = gate
            .authorize_global(&authenticated(inactive), GlobalAction::AccessOperatorArea)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GateError::Deny(DenyReason::InactiveOrUnknownAccount)
        ));
    }

    #[tokio::test]
    async fn test_directory_management_is_superuser_only() {
        let operator = Uuid::new_v4();
        let superuser = Uuid::new_v4();
        let store = FakeAccessStore::new();
        store.add_profile(operator, Role::Admin, true);
        store.add_profile(superuser, Role::Superuser, true);
        let (gate, _) = gate_with(store);

        let err = gate
            .authorize_global(&authenticated(operator), GlobalAction::ManageDirectory)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GateError::Deny(DenyReason::InsufficientRole)
        ));

        assert!(gate
            .authorize_global(&authenticated(superuser), GlobalAction::ManageDirectory)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_resolve_public_checks_slug_and_existence() {
        let city_id = Uuid::new_v4();
        let store = FakeAccessStore::new();
        store.add_city(city_id, "den-haag");
        let (gate, _) = gate_with(store);

        let scope = gate.resolve_public("den-haag").await.unwrap();
        assert_eq!(scope.city_id(), city_id);

        assert!(matches!(
            gate.resolve_public("atlantis").await.unwrap_err(),
            GateError::CityNotFound
        ));
        assert!(matches!(
            gate.resolve_public("Den Haag").await.unwrap_err(),
            GateError::InvalidCitySlug
        ));
    }
}
