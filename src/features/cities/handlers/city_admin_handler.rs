use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::{RequireCityAdmin, RequireSuperuser};
use crate::features::cities::dtos::{
    CityResponseDto, CreateCityDto, MemberResponseDto, MembershipResponseDto, UpsertMemberDto,
};
use crate::features::cities::services::CityService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

#[derive(Deserialize)]
pub struct MemberPathParams {
    user_id: Uuid,
}

/// List all cities in the directory (superuser only)
#[utoipa::path(
    get,
    path = "/api/admin/cities",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Cities retrieved successfully", body = ApiResponse<Vec<CityResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "cities",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn list_cities(
    RequireSuperuser(_actor): RequireSuperuser,
    State(service): State<Arc<CityService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<CityResponseDto>>>> {
    let (cities, total) = service.list_cities(&params).await?;
    Ok(Json(ApiResponse::success(
        Some(cities),
        None,
        Some(Meta { total }),
    )))
}

/// Provision a new city (superuser only)
#[utoipa::path(
    post,
    path = "/api/admin/cities",
    request_body = CreateCityDto,
    responses(
        (status = 200, description = "City provisioned successfully", body = ApiResponse<CityResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Slug already taken")
    ),
    tag = "cities",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn create_city(
    RequireSuperuser(actor): RequireSuperuser,
    State(service): State<Arc<CityService>>,
    AppJson(dto): AppJson<CreateCityDto>,
) -> Result<Json<ApiResponse<CityResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let city = service.create_city(&actor, dto).await?;
    Ok(Json(ApiResponse::success(Some(city), None, None)))
}

/// List the members of a city (city admin or superuser)
#[utoipa::path(
    get,
    path = "/api/admin/cities/{city_slug}/members",
    params(
        ("city_slug" = String, Path, description = "City slug")
    ),
    responses(
        (status = 200, description = "Members retrieved successfully", body = ApiResponse<Vec<MemberResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "City not found")
    ),
    tag = "cities",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn list_members(
    RequireCityAdmin(scope): RequireCityAdmin,
    State(service): State<Arc<CityService>>,
) -> Result<Json<ApiResponse<Vec<MemberResponseDto>>>> {
    let members = service.list_members(&scope).await?;
    Ok(Json(ApiResponse::success(Some(members), None, None)))
}

/// Grant a role or change an existing member's role (city admin or superuser)
#[utoipa::path(
    put,
    path = "/api/admin/cities/{city_slug}/members",
    params(
        ("city_slug" = String, Path, description = "City slug")
    ),
    request_body = UpsertMemberDto,
    responses(
        (status = 200, description = "Membership saved successfully", body = ApiResponse<MembershipResponseDto>),
        (status = 400, description = "Validation error or unknown user"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "City not found")
    ),
    tag = "cities",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn upsert_member(
    RequireCityAdmin(scope): RequireCityAdmin,
    State(service): State<Arc<CityService>>,
    AppJson(dto): AppJson<UpsertMemberDto>,
) -> Result<Json<ApiResponse<MembershipResponseDto>>> {
    let membership = service.upsert_member(&scope, dto).await?;
    Ok(Json(ApiResponse::success(Some(membership), None, None)))
}

/// Revoke a member's access to a city (city admin or superuser)
#[utoipa::path(
    delete,
    path = "/api/admin/cities/{city_slug}/members/{user_id}",
    params(
        ("city_slug" = String, Path, description = "City slug"),
        ("user_id" = Uuid, Path, description = "User to revoke")
    ),
    responses(
        (status = 200, description = "Membership removed successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "City or membership not found")
    ),
    tag = "cities",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn remove_member(
    RequireCityAdmin(scope): RequireCityAdmin,
    State(service): State<Arc<CityService>>,
    Path(params): Path<MemberPathParams>,
) -> Result<Json<ApiResponse<()>>> {
    service.remove_member(&scope, params.user_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Membership removed".to_string()),
        None,
    )))
}
