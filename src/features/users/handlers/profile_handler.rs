use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireSuperuser;
use crate::features::users::dtos::{ProfileResponseDto, UpsertProfileDto};
use crate::features::users::services::ProfileService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Profiles retrieved successfully", body = ApiResponse<Vec<ProfileResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Superuser role required")
    ),
    tag = "users",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn list_profiles(
    RequireSuperuser(_actor): RequireSuperuser,
    State(service): State<Arc<ProfileService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ProfileResponseDto>>>> {
    let (profiles, total) = service.list_profiles(&pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(profiles),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "Account id from the identity provider")
    ),
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<ProfileResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Superuser role required"),
        (status = 404, description = "Profile not found")
    ),
    tag = "users",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn get_profile(
    RequireSuperuser(_actor): RequireSuperuser,
    State(service): State<Arc<ProfileService>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProfileResponseDto>>> {
    let profile = service.get_profile(user_id).await?;
    Ok(Json(ApiResponse::success(Some(profile), None, None)))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "Account id from the identity provider")
    ),
    request_body = UpsertProfileDto,
    responses(
        (status = 200, description = "Profile saved successfully", body = ApiResponse<ProfileResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Superuser role required"),
        (status = 409, description = "Email already in use")
    ),
    tag = "users",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn upsert_profile(
    RequireSuperuser(actor): RequireSuperuser,
    State(service): State<Arc<ProfileService>>,
    Path(user_id): Path<Uuid>,
    AppJson(dto): AppJson<UpsertProfileDto>,
) -> Result<Json<ApiResponse<ProfileResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let profile = service.upsert_profile(&actor, user_id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(profile),
        Some("Profile saved successfully".to_string()),
        None,
    )))
}
