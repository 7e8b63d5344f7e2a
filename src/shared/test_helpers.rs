#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};
#[cfg(test)]
use chrono::Utc;
#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
use crate::features::auth::model::{AuthenticatedUser, Identity, Role, UserProfile};
#[cfg(test)]
use crate::features::auth::store::{AccessStore, StoreError};
#[cfg(test)]
use crate::features::cities::models::City;

#[cfg(test)]
#[derive(Default)]
struct FakeState {
    profiles: HashMap<Uuid, UserProfile>,
    cities: HashMap<String, City>,
    memberships: HashMap<(Uuid, Uuid), Role>,
    unavailable: bool,
    hits: usize,
}

/// In-memory `AccessStore` for exercising the gate and guards without a
/// database. Rows can be mutated between calls to simulate concurrent
/// revocation.
#[cfg(test)]
#[derive(Default)]
pub struct FakeAccessStore {
    state: Mutex<FakeState>,
}

#[cfg(test)]
#[allow(dead_code)]
impl FakeAccessStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_profile(&self, user_id: Uuid, role: Role, is_active: bool) {
        let now = Utc::now();
        self.state.lock().unwrap().profiles.insert(
            user_id,
            UserProfile {
                user_id,
                email: format!("{}@example.test", user_id.simple()),
                role,
                is_active,
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub fn add_city(&self, id: Uuid, slug: &str) {
        let now = Utc::now();
        self.state.lock().unwrap().cities.insert(
            slug.to_string(),
            City {
                id,
                slug: slug.to_string(),
                name: slug.to_string(),
                country: "NL".to_string(),
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub fn add_membership(&self, city_id: Uuid, user_id: Uuid, role: Role) {
        self.state
            .lock()
            .unwrap()
            .memberships
            .insert((city_id, user_id), role);
    }

    pub fn remove_membership(&self, city_id: Uuid, user_id: Uuid) {
        self.state
            .lock()
            .unwrap()
            .memberships
            .remove(&(city_id, user_id));
    }

    pub fn set_profile_active(&self, user_id: Uuid, is_active: bool) {
        if let Some(profile) = self.state.lock().unwrap().profiles.get_mut(&user_id) {
            profile.is_active = is_active;
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unwrap().unavailable = unavailable;
    }

    /// Number of store calls made so far, for asserting that a path never
    /// touched the store.
    pub fn hits(&self) -> usize {
        self.state.lock().unwrap().hits
    }

    fn query<T>(&self, f: impl FnOnce(&mut FakeState) -> T) -> Result<T, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.hits += 1;
        if state.unavailable {
            return Err(StoreError::from(sqlx::Error::PoolTimedOut));
        }
        Ok(f(&mut state))
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl AccessStore for FakeAccessStore {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        self.query(|s| s.profiles.get(&user_id).cloned())
    }

    async fn find_city_by_slug(&self, slug: &str) -> Result<Option<City>, StoreError> {
        self.query(|s| s.cities.get(slug).cloned())
    }

    async fn find_membership_role(
        &self,
        city_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Role>, StoreError> {
        self.query(|s| s.memberships.get(&(city_id, user_id)).copied())
    }
}

#[cfg(test)]
#[allow(dead_code)]
pub fn authenticated_identity(user_id: Uuid) -> Identity {
    Identity::Authenticated(AuthenticatedUser {
        user_id,
        email: format!("{}@example.test", user_id.simple()),
    })
}

/// Wraps a router with a layer that injects a fixed identity, standing in for
/// the session middleware.
#[cfg(test)]
#[allow(dead_code)]
pub fn with_identity(router: Router, identity: Identity) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let identity = identity.clone();
            async move {
                request.extensions_mut().insert(identity);
                next.run(request).await
            }
        },
    ))
}
