use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::model::{Role, UserProfile};
use crate::features::cities::models::City;

/// Read side of the authorization data: profiles, cities, memberships.
///
/// Implementations must return current state on every call. Results are never
/// cached across requests, so a role change or deactivation is honored by the
/// very next request.
#[async_trait]
pub trait AccessStore: Send + Sync {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError>;

    async fn find_city_by_slug(&self, slug: &str) -> Result<Option<City>, StoreError>;

    async fn find_membership_role(
        &self,
        city_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Role>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
#[error("access store query failed: {0}")]
pub struct StoreError(#[from] sqlx::Error);

impl From<StoreError> for crate::core::error::AppError {
    fn from(e: StoreError) -> Self {
        Self::Upstream(e.to_string())
    }
}

pub struct PgAccessStore {
    pool: PgPool,
}

impl PgAccessStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessStore for PgAccessStore {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_id, email, role, is_active, created_at, updated_at
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load profile for user {}: {}", user_id, e);
            StoreError::from(e)
        })?;

        Ok(profile)
    }

    async fn find_city_by_slug(&self, slug: &str) -> Result<Option<City>, StoreError> {
        let city = sqlx::query_as::<_, City>(
            r#"
            SELECT id, slug, name, country, created_at, updated_at
            FROM cities
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load city '{}': {}", slug, e);
            StoreError::from(e)
        })?;

        Ok(city)
    }

    async fn find_membership_role(
        &self,
        city_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Role>, StoreError> {
        let role = sqlx::query_scalar::<_, Role>(
            r#"
            SELECT role
            FROM city_memberships
            WHERE city_id = $1 AND user_id = $2
            "#,
        )
        .bind(city_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to load membership for user {} in city {}: {}",
                user_id,
                city_id,
                e
            );
            StoreError::from(e)
        })?;

        Ok(role)
    }
}
