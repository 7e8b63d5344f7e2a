use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::{RequireCityOperator, RequireCityViewer};
use crate::features::content::dtos::{CreateLanguageDto, LanguageResponseDto, UpdateLanguageDto};
use crate::features::content::services::ContentService;
use crate::shared::types::ApiResponse;

/// Trailing path segment; locale and city slug are consumed by the guard.
#[derive(Deserialize)]
pub struct LanguagePathParams {
    pub id: Uuid,
}

#[utoipa::path(
    get,
    path = "/{locale}/operator/{city_slug}/languages",
    params(
        ("locale" = String, Path, description = "UI locale (en, nl or fr)"),
        ("city_slug" = String, Path, description = "City slug")
    ),
    responses(
        (status = 200, description = "Languages of this city", body = ApiResponse<Vec<LanguageResponseDto>>),
        (status = 303, description = "Redirect to login or to the operator landing"),
        (status = 404, description = "Unknown locale or city")
    ),
    tag = "content",
    security(
        ("session_cookie" = [])
    )
)]
pub async fn list_languages(
    RequireCityViewer(_locale, scope): RequireCityViewer,
    State(service): State<Arc<ContentService>>,
) -> Result<Json<ApiResponse<Vec<LanguageResponseDto>>>> {
    let languages = service.list_languages(&scope).await?;
    Ok(Json(ApiResponse::success(Some(languages), None, None)))
}

#[utoipa::path(
    post,
    path = "/{locale}/operator/{city_slug}/languages",
    params(
        ("locale" = String, Path, description = "UI locale (en, nl or fr)"),
        ("city_slug" = String, Path, description = "City slug")
    ),
    request_body = CreateLanguageDto,
    responses(
        (status = 200, description = "Language created", body = ApiResponse<LanguageResponseDto>),
        (status = 303, description = "Redirect to login or to the operator landing"),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Unknown locale or city"),
        (status = 409, description = "Duplicate language name in this city")
    ),
    tag = "content",
    security(
        ("session_cookie" = [])
    )
)]
pub async fn create_language(
    RequireCityOperator(_locale, scope): RequireCityOperator,
    State(service): State<Arc<ContentService>>,
    AppJson(dto): AppJson<CreateLanguageDto>,
) -> Result<Json<ApiResponse<LanguageResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let language = service.create_language(&scope, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(language),
        Some("Language created successfully".to_string()),
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/{locale}/operator/{city_slug}/languages/{id}",
    params(
        ("locale" = String, Path, description = "UI locale (en, nl or fr)"),
        ("city_slug" = String, Path, description = "City slug"),
        ("id" = Uuid, Path, description = "Language id")
    ),
    responses(
        (status = 200, description = "Language detail", body = ApiResponse<LanguageResponseDto>),
        (status = 303, description = "Redirect to login or to the operator landing"),
        (status = 404, description = "Unknown locale, city or language")
    ),
    tag = "content",
    security(
        ("session_cookie" = [])
    )
)]
pub async fn get_language(
    RequireCityViewer(_locale, scope): RequireCityViewer,
    State(service): State<Arc<ContentService>>,
    Path(params): Path<LanguagePathParams>,
) -> Result<Json<ApiResponse<LanguageResponseDto>>> {
    let language = service.get_language(&scope, params.id).await?;
    Ok(Json(ApiResponse::success(Some(language), None, None)))
}

#[utoipa::path(
    put,
    path = "/{locale}/operator/{city_slug}/languages/{id}",
    params(
        ("locale" = String, Path, description = "UI locale (en, nl or fr)"),
        ("city_slug" = String, Path, description = "City slug"),
        ("id" = Uuid, Path, description = "Language id")
    ),
    request_body = UpdateLanguageDto,
    responses(
        (status = 200, description = "Language updated", body = ApiResponse<LanguageResponseDto>),
        (status = 303, description = "Redirect to login or to the operator landing"),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Unknown locale, city or language"),
        (status = 409, description = "Duplicate language name in this city")
    ),
    tag = "content",
    security(
        ("session_cookie" = [])
    )
)]
pub async fn update_language(
    RequireCityOperator(_locale, scope): RequireCityOperator,
    State(service): State<Arc<ContentService>>,
    Path(params): Path<LanguagePathParams>,
    AppJson(dto): AppJson<UpdateLanguageDto>,
) -> Result<Json<ApiResponse<LanguageResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let language = service.update_language(&scope, params.id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(language),
        Some("Language updated successfully".to_string()),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/{locale}/operator/{city_slug}/languages/{id}",
    params(
        ("locale" = String, Path, description = "UI locale (en, nl or fr)"),
        ("city_slug" = String, Path, description = "City slug"),
        ("id" = Uuid, Path, description = "Language id")
    ),
    responses(
        (status = 200, description = "Language deleted"),
        (status = 303, description = "Redirect to login or to the operator landing"),
        (status = 404, description = "Unknown locale, city or language")
    ),
    tag = "content",
    security(
        ("session_cookie" = [])
    )
)]
pub async fn delete_language(
    RequireCityOperator(_locale, scope): RequireCityOperator,
    State(service): State<Arc<ContentService>>,
    Path(params): Path<LanguagePathParams>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_language(&scope, params.id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Language deleted successfully".to_string()),
        None,
    )))
}
