use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::gate::{ActorScope, CityScope};
use crate::features::auth::model::Role;
use crate::features::cities::dtos::{
    AccessibleCityDto, CityResponseDto, CreateCityDto, MemberResponseDto, MembershipResponseDto,
    UpsertMemberDto,
};
use crate::features::cities::models::{AccessibleCity, City, CityMember, CityMembership};
use crate::shared::types::PaginationQuery;

/// Convert database errors on city and membership writes into specific
/// responses where the violated constraint identifies the cause.
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // Unique violation (PostgreSQL error code 23505)
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            return AppError::Conflict("A city with this slug already exists".to_string());
        }

        // Foreign key violation (PostgreSQL error code 23503): membership
        // writes reference user_profiles and cities.
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23503")) {
            return AppError::BadRequest(
                "Referenced user has no profile in this system".to_string(),
            );
        }
    }

    AppError::Database(e)
}

/// Directory of cities and the memberships inside them.
pub struct CityService {
    pool: PgPool,
}

impl CityService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== Directory (superuser) ====================

    pub async fn list_cities(
        &self,
        params: &PaginationQuery,
    ) -> Result<(Vec<CityResponseDto>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cities")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count cities: {:?}", e);
                AppError::Database(e)
            })?;

        let cities = sqlx::query_as::<_, City>(
            r#"
            SELECT id, slug, name, country, created_at, updated_at
            FROM cities
            ORDER BY name ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch cities: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((cities.into_iter().map(Into::into).collect(), total))
    }

    pub async fn create_city(
        &self,
        actor: &ActorScope,
        dto: CreateCityDto,
    ) -> Result<CityResponseDto> {
        let country = dto
            .country
            .unwrap_or_else(|| "NL".to_string())
            .to_uppercase();

        let city = sqlx::query_as::<_, City>(
            r#"
            INSERT INTO cities (slug, name, country)
            VALUES ($1, $2, $3)
            RETURNING id, slug, name, country, created_at, updated_at
            "#,
        )
        .bind(&dto.slug)
        .bind(&dto.name)
        .bind(&country)
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)?;

        tracing::info!("City '{}' provisioned by {}", city.slug, actor.user_id());
        Ok(city.into())
    }

    // ==================== Memberships (city admin) ====================

    pub async fn list_members(&self, scope: &CityScope) -> Result<Vec<MemberResponseDto>> {
        let members = sqlx::query_as::<_, CityMember>(
            r#"
            SELECT m.user_id, p.email, m.role, p.is_active, m.created_at
            FROM city_memberships m
            JOIN user_profiles p ON p.user_id = m.user_id
            WHERE m.city_id = $1
            ORDER BY p.email ASC
            "#,
        )
        .bind(scope.city_id())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to fetch members of city '{}': {:?}",
                scope.city().slug,
                e
            );
            AppError::Database(e)
        })?;

        Ok(members.into_iter().map(Into::into).collect())
    }

    /// Grant or change one user's role in the scoped city. The membership
    /// table only ever holds viewer, operator or admin.
    pub async fn upsert_member(
        &self,
        scope: &CityScope,
        dto: UpsertMemberDto,
    ) -> Result<MembershipResponseDto> {
        if dto.role == Role::Superuser {
            return Err(AppError::Validation(
                "Superuser is a global role and cannot be granted per city".to_string(),
            ));
        }

        let membership = sqlx::query_as::<_, CityMembership>(
            r#"
            INSERT INTO city_memberships (city_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (city_id, user_id)
            DO UPDATE SET role = EXCLUDED.role, updated_at = NOW()
            RETURNING city_id, user_id, role, created_at, updated_at
            "#,
        )
        .bind(scope.city_id())
        .bind(dto.user_id)
        .bind(dto.role)
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)?;

        tracing::info!(
            "Membership of user {} in city '{}' set to {} by {}",
            dto.user_id,
            scope.city().slug,
            membership.role,
            scope.user_id()
        );

        Ok(membership.into())
    }

    /// Revoke one user's membership. Takes effect on their next request.
    pub async fn remove_member(&self, scope: &CityScope, user_id: Uuid) -> Result<()> {
        let result =
            sqlx::query("DELETE FROM city_memberships WHERE city_id = $1 AND user_id = $2")
                .bind(scope.city_id())
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to remove member {} from city '{}': {:?}",
                        user_id,
                        scope.city().slug,
                        e
                    );
                    AppError::Database(e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Membership not found".to_string()));
        }

        tracing::info!(
            "Membership of user {} in city '{}' removed by {}",
            user_id,
            scope.city().slug,
            scope.user_id()
        );

        Ok(())
    }

    // ==================== Landing page ====================

    /// Cities the actor can open. Superusers see the whole directory; other
    /// accounts see the cities they hold a membership in.
    pub async fn list_accessible(&self, actor: &ActorScope) -> Result<Vec<AccessibleCityDto>> {
        let cities = if actor.role() == Role::Superuser {
            sqlx::query_as::<_, AccessibleCity>(
                r#"
                SELECT id, slug, name, 'superuser'::user_role AS role
                FROM cities
                ORDER BY name ASC
                "#,
            )
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, AccessibleCity>(
                r#"
                SELECT c.id, c.slug, c.name, m.role
                FROM cities c
                JOIN city_memberships m ON m.city_id = c.id
                WHERE m.user_id = $1
                ORDER BY c.name ASC
                "#,
            )
            .bind(actor.user_id())
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| {
            tracing::error!(
                "Failed to fetch accessible cities for {}: {:?}",
                actor.user_id(),
                e
            );
            AppError::Database(e)
        })?;

        Ok(cities.into_iter().map(Into::into).collect())
    }
}
