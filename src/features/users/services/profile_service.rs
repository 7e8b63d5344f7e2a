use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::gate::ActorScope;
use crate::features::auth::model::UserProfile;
use crate::features::users::dtos::{ProfileResponseDto, UpsertProfileDto};
use crate::shared::types::PaginationQuery;

/// Maps database constraint violations to user-facing errors
fn handle_db_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            return AppError::Conflict("Email already in use".to_string());
        }
    }
    tracing::error!("Database error: {:?}", err);
    AppError::Database(err)
}

/// Service for the account profile directory
pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== Directory Listing ====================

    /// List account profiles, newest first
    pub async fn list_profiles(
        &self,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ProfileResponseDto>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_profiles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count user profiles: {:?}", e);
                AppError::Database(e)
            })?;

        let profiles = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_id, email, role, is_active, created_at, updated_at
            FROM user_profiles
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list user profiles: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((
            profiles.into_iter().map(ProfileResponseDto::from).collect(),
            total,
        ))
    }

    /// Fetch a single profile by account id
    pub async fn get_profile(&self, user_id: Uuid) -> Result<ProfileResponseDto> {
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
            tracing::error!("Failed to fetch user profile {}: {:?}", user_id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("User profile not found".to_string()))?;

        Ok(profile.into())
    }

    // ==================== Profile Provisioning ====================

    /// Create or replace the profile row for an account. The account id
    /// comes from the identity provider; this table only records what the
    /// account is allowed to do here.
    pub async fn upsert_profile(
        &self,
        actor: &ActorScope,
        user_id: Uuid,
        dto: UpsertProfileDto,
    ) -> Result<ProfileResponseDto> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles (user_id, email, role, is_active)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET email = EXCLUDED.email,
                role = EXCLUDED.role,
                is_active = EXCLUDED.is_active,
                updated_at = NOW()
            RETURNING user_id, email, role, is_active, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&dto.email)
        .bind(dto.role)
        .bind(dto.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)?;

        tracing::info!(
            "Profile for {} set to role '{}' (active: {}) by {}",
            user_id,
            profile.role,
            profile.is_active,
            actor.user_id()
        );

        Ok(profile.into())
    }
}
