use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::dto::MeResponseDto;
use crate::features::auth::model::Identity;
use crate::features::auth::store::AccessStore;

pub struct AuthService {
    store: Arc<dyn AccessStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn AccessStore>) -> Self {
        Self { store }
    }

    /// Snapshot of the current session: who the credential says the caller
    /// is, plus the profile row if one exists. Anonymous callers get a plain
    /// unauthenticated snapshot, not an error.
    pub async fn current_session(&self, identity: &Identity) -> Result<MeResponseDto> {
        let user = match identity.user() {
            Some(user) => user,
            None => return Ok(MeResponseDto::anonymous()),
        };

        let profile = self.store.find_profile(user.user_id).await?;
        Ok(MeResponseDto::authenticated(user, profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::Role;
    use crate::shared::test_helpers::{authenticated_identity, FakeAccessStore};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_anonymous_session_snapshot() {
        let service = AuthService::new(Arc::new(FakeAccessStore::new()));
        let snapshot = service.current_session(&Identity::Anonymous).await.unwrap();
        assert!(!snapshot.authenticated);
        assert!(snapshot.user.is_none());
    }

    #[tokio::test]
    async fn test_session_without_profile_has_no_role() {
        let service = AuthService::new(Arc::new(FakeAccessStore::new()));
        let snapshot = service
            .current_session(&authenticated_identity(Uuid::new_v4()))
            .await
            .unwrap();

        assert!(snapshot.authenticated);
        let user = snapshot.user.unwrap();
        assert!(user.role.is_none());
        assert!(user.is_active.is_none());
    }

    #[tokio::test]
    async fn test_session_with_profile_reports_role() {
        let user_id = Uuid::new_v4();
        let store = FakeAccessStore::new();
        store.add_profile(user_id, Role::Operator, true);
        let service = AuthService::new(Arc::new(store));

        let snapshot = service
            .current_session(&authenticated_identity(user_id))
            .await
            .unwrap();

        let user = snapshot.user.unwrap();
        assert_eq!(user.role, Some(Role::Operator));
        assert_eq!(user.is_active, Some(true));
    }
}
