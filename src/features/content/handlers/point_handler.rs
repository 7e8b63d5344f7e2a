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
use crate::features::content::dtos::{CreatePointDto, PointResponseDto};
use crate::features::content::services::ContentService;
use crate::shared::types::ApiResponse;

#[derive(Deserialize)]
pub struct PointPathParams {
    pub id: Uuid,
}

#[utoipa::path(
    get,
    path = "/{locale}/operator/{city_slug}/points",
    params(
        ("locale" = String, Path, description = "UI locale (en, nl or fr)"),
        ("city_slug" = String, Path, description = "City slug")
    ),
    responses(
        (status = 200, description = "Markers of this city", body = ApiResponse<Vec<PointResponseDto>>),
        (status = 303, description = "Redirect to login or to the operator landing"),
        (status = 404, description = "Unknown locale or city")
    ),
    tag = "content",
    security(
        ("session_cookie" = [])
    )
)]
pub async fn list_points(
    RequireCityViewer(_locale, scope): RequireCityViewer,
    State(service): State<Arc<ContentService>>,
) -> Result<Json<ApiResponse<Vec<PointResponseDto>>>> {
    let points = service.list_points(&scope).await?;
    Ok(Json(ApiResponse::success(Some(points), None, None)))
}

#[utoipa::path(
    post,
    path = "/{locale}/operator/{city_slug}/points",
    params(
        ("locale" = String, Path, description = "UI locale (en, nl or fr)"),
        ("city_slug" = String, Path, description = "City slug")
    ),
    request_body = CreatePointDto,
    responses(
        (status = 200, description = "Marker created", body = ApiResponse<PointResponseDto>),
        (status = 303, description = "Redirect to login or to the operator landing"),
        (status = 400, description = "Validation error or cross-city language reference"),
        (status = 404, description = "Unknown locale or city")
    ),
    tag = "content",
    security(
        ("session_cookie" = [])
    )
)]
pub async fn create_point(
    RequireCityOperator(_locale, scope): RequireCityOperator,
    State(service): State<Arc<ContentService>>,
    AppJson(dto): AppJson<CreatePointDto>,
) -> Result<Json<ApiResponse<PointResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let point = service.create_point(&scope, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(point),
        Some("Marker created successfully".to_string()),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/{locale}/operator/{city_slug}/points/{id}",
    params(
        ("locale" = String, Path, description = "UI locale (en, nl or fr)"),
        ("city_slug" = String, Path, description = "City slug"),
        ("id" = Uuid, Path, description = "Marker id")
    ),
    responses(
        (status = 200, description = "Marker deleted"),
        (status = 303, description = "Redirect to login or to the operator landing"),
        (status = 404, description = "Unknown locale, city or marker")
    ),
    tag = "content",
    security(
        ("session_cookie" = [])
    )
)]
pub async fn delete_point(
    RequireCityOperator(_locale, scope): RequireCityOperator,
    State(service): State<Arc<ContentService>>,
    Path(params): Path<PointPathParams>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_point(&scope, params.id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Marker deleted successfully".to_string()),
        None,
    )))
}
