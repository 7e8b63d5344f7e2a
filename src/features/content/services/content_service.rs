use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::gate::{CityScope, PublicCityScope};
use crate::features::content::dtos::{
    CreateLanguageDto, CreatePointDto, LanguageResponseDto, PointResponseDto, UpdateLanguageDto,
};
use crate::features::content::models::{Language, LanguagePoint};

/// Maps database constraint violations to user-facing errors
fn handle_db_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            return AppError::Conflict(
                "A language with this name already exists in this city".to_string(),
            );
        }
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23503")) {
            return AppError::BadRequest("Referenced language does not exist".to_string());
        }
    }
    tracing::error!("Database error: {:?}", err);
    AppError::Database(err)
}

/// City-scoped accessor for content tables.
///
/// Methods take a scope proof from the authorization gate instead of a raw
/// city id, and every statement runs inside a transaction whose
/// `app.current_city_id` setting pins the row-level security policies to
/// that city. Queries still filter on `city_id` explicitly; the policies
/// back them up.
pub struct ContentService {
    pool: PgPool,
}

impl ContentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a transaction bound to one city for the RLS policies.
    async fn begin_scoped(&self, city_id: Uuid) -> Result<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin content transaction: {:?}", e);
            AppError::Database(e)
        })?;

        sqlx::query("SELECT set_config('app.current_city_id', $1, true)")
            .bind(city_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to pin transaction to city {}: {:?}", city_id, e);
                AppError::Database(e)
            })?;

        Ok(tx)
    }

    // ==================== Languages ====================

    pub async fn list_languages(&self, scope: &CityScope) -> Result<Vec<LanguageResponseDto>> {
        let mut tx = self.begin_scoped(scope.city_id()).await?;

        let languages = sqlx::query_as::<_, Language>(
            r#"
            SELECT id, city_id, name, endonym, iso_code, speaker_estimate,
                   description_en, description_nl, description_fr,
                   is_published, created_at, updated_at
            FROM languages
            WHERE city_id = $1
            ORDER BY name
            "#,
        )
        .bind(scope.city_id())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list languages for city {}: {:?}", scope.city_id(), e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(AppError::Database)?;

        Ok(languages.into_iter().map(LanguageResponseDto::from).collect())
    }

    pub async fn create_language(
        &self,
        scope: &CityScope,
        dto: CreateLanguageDto,
    ) -> Result<LanguageResponseDto> {
        let mut tx = self.begin_scoped(scope.city_id()).await?;

        let language = sqlx::query_as::<_, Language>(
            r#"
            INSERT INTO languages (city_id, name, endonym, iso_code, speaker_estimate,
                                   description_en, description_nl, description_fr, is_published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, city_id, name, endonym, iso_code, speaker_estimate,
                      description_en, description_nl, description_fr,
                      is_published, created_at, updated_at
            "#,
        )
        .bind(scope.city_id())
        .bind(&dto.name)
        .bind(&dto.endonym)
        .bind(&dto.iso_code)
        .bind(dto.speaker_estimate)
        .bind(&dto.description_en)
        .bind(&dto.description_nl)
        .bind(&dto.description_fr)
        .bind(dto.is_published)
        .fetch_one(&mut *tx)
        .await
        .map_err(handle_db_error)?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Language '{}' created in city '{}' by {}",
            language.name,
            scope.city().slug,
            scope.user_id()
        );

        Ok(language.into())
    }

    pub async fn get_language(&self, scope: &CityScope, id: Uuid) -> Result<LanguageResponseDto> {
        let mut tx = self.begin_scoped(scope.city_id()).await?;

        let language = sqlx::query_as::<_, Language>(
            r#"
            SELECT id, city_id, name, endonym, iso_code, speaker_estimate,
                   description_en, description_nl, description_fr,
                   is_published, created_at, updated_at
            FROM languages
            WHERE id = $1 AND city_id = $2
            "#,
        )
        .bind(id)
        .bind(scope.city_id())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch language {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Language not found".to_string()))?;

        tx.commit().await.map_err(AppError::Database)?;

        Ok(language.into())
    }

    pub async fn update_language(
        &self,
        scope: &CityScope,
        id: Uuid,
        dto: UpdateLanguageDto,
    ) -> Result<LanguageResponseDto> {
        let mut tx = self.begin_scoped(scope.city_id()).await?;

        let language = sqlx::query_as::<_, Language>(
            r#"
            UPDATE languages
            SET name = COALESCE($1, name),
                endonym = COALESCE($2, endonym),
                iso_code = COALESCE($3, iso_code),
                speaker_estimate = COALESCE($4, speaker_estimate),
                description_en = COALESCE($5, description_en),
                description_nl = COALESCE($6, description_nl),
                description_fr = COALESCE($7, description_fr),
                is_published = COALESCE($8, is_published),
                updated_at = NOW()
            WHERE id = $9 AND city_id = $10
            RETURNING id, city_id, name, endonym, iso_code, speaker_estimate,
                      description_en, description_nl, description_fr,
                      is_published, created_at, updated_at
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.endonym)
        .bind(&dto.iso_code)
        .bind(dto.speaker_estimate)
        .bind(&dto.description_en)
        .bind(&dto.description_nl)
        .bind(&dto.description_fr)
        .bind(dto.is_published)
        .bind(id)
        .bind(scope.city_id())
        .fetch_optional(&mut *tx)
        .await
        .map_err(handle_db_error)?
        .ok_or_else(|| AppError::NotFound("Language not found".to_string()))?;

        tx.commit().await.map_err(AppError::Database)?;

        Ok(language.into())
    }

    pub async fn delete_language(&self, scope: &CityScope, id: Uuid) -> Result<()> {
        let mut tx = self.begin_scoped(scope.city_id()).await?;

        let result = sqlx::query("DELETE FROM languages WHERE id = $1 AND city_id = $2")
            .bind(id)
            .bind(scope.city_id())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete language {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Language not found".to_string()));
        }

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Language {} deleted from city '{}' by {}",
            id,
            scope.city().slug,
            scope.user_id()
        );

        Ok(())
    }

    // ==================== Points ====================

    pub async fn list_points(&self, scope: &CityScope) -> Result<Vec<PointResponseDto>> {
        let mut tx = self.begin_scoped(scope.city_id()).await?;

        let points = sqlx::query_as::<_, LanguagePoint>(
            r#"
            SELECT id, city_id, language_id, label, latitude, longitude,
                   neighborhood, is_published, created_at, updated_at
            FROM language_points
            WHERE city_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(scope.city_id())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list points for city {}: {:?}", scope.city_id(), e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(AppError::Database)?;

        Ok(points.into_iter().map(PointResponseDto::from).collect())
    }

    pub async fn create_point(
        &self,
        scope: &CityScope,
        dto: CreatePointDto,
    ) -> Result<PointResponseDto> {
        let mut tx = self.begin_scoped(scope.city_id()).await?;

        // A marker may only reference a language of its own city.
        if let Some(language_id) = dto.language_id {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM languages WHERE id = $1 AND city_id = $2)",
            )
            .bind(language_id)
            .bind(scope.city_id())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check language {}: {:?}", language_id, e);
                AppError::Database(e)
            })?;

            if !exists {
                return Err(AppError::BadRequest(
                    "Referenced language does not belong to this city".to_string(),
                ));
            }
        }

        let point = sqlx::query_as::<_, LanguagePoint>(
            r#"
            INSERT INTO language_points (city_id, language_id, label, latitude, longitude,
                                         neighborhood, is_published)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, city_id, language_id, label, latitude, longitude,
                      neighborhood, is_published, created_at, updated_at
            "#,
        )
        .bind(scope.city_id())
        .bind(dto.language_id)
        .bind(&dto.label)
        .bind(dto.latitude)
        .bind(dto.longitude)
        .bind(&dto.neighborhood)
        .bind(dto.is_published)
        .fetch_one(&mut *tx)
        .await
        .map_err(handle_db_error)?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Point '{}' created in city '{}' by {}",
            point.label,
            scope.city().slug,
            scope.user_id()
        );

        Ok(point.into())
    }

    pub async fn delete_point(&self, scope: &CityScope, id: Uuid) -> Result<()> {
        let mut tx = self.begin_scoped(scope.city_id()).await?;

        let result = sqlx::query("DELETE FROM language_points WHERE id = $1 AND city_id = $2")
            .bind(id)
            .bind(scope.city_id())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete point {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Point not found".to_string()));
        }

        tx.commit().await.map_err(AppError::Database)?;

        Ok(())
    }

    // ==================== Public reads ====================

    /// Published languages for the public map, no authentication involved.
    pub async fn published_languages(&self, scope: &PublicCityScope) -> Result<Vec<Language>> {
        let mut tx = self.begin_scoped(scope.city_id()).await?;

        let languages = sqlx::query_as::<_, Language>(
            r#"
            SELECT id, city_id, name, endonym, iso_code, speaker_estimate,
                   description_en, description_nl, description_fr,
                   is_published, created_at, updated_at
            FROM languages
            WHERE city_id = $1 AND is_published = TRUE
            ORDER BY name
            "#,
        )
        .bind(scope.city_id())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to list published languages for city {}: {:?}",
                scope.city_id(),
                e
            );
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(AppError::Database)?;

        Ok(languages)
    }

    /// Published markers for the public map.
    pub async fn published_points(&self, scope: &PublicCityScope) -> Result<Vec<LanguagePoint>> {
        let mut tx = self.begin_scoped(scope.city_id()).await?;

        let points = sqlx::query_as::<_, LanguagePoint>(
            r#"
            SELECT id, city_id, language_id, label, latitude, longitude,
                   neighborhood, is_published, created_at, updated_at
            FROM language_points
            WHERE city_id = $1 AND is_published = TRUE
            ORDER BY label
            "#,
        )
        .bind(scope.city_id())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to list published points for city {}: {:?}",
                scope.city_id(),
                e
            );
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(AppError::Database)?;

        Ok(points)
    }
}
