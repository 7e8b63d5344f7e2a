use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::guards::RequireOperatorAccess;
use crate::features::cities::dtos::OperatorLandingDto;
use crate::features::cities::services::CityService;
use crate::shared::types::ApiResponse;

/// Operator landing page: the signed-in account and the city workspaces it
/// can open. Anonymous visitors are redirected to the login page by the
/// guard before this body runs.
#[utoipa::path(
    get,
    path = "/{locale}/operator",
    params(
        ("locale" = String, Path, description = "Interface locale: en, nl or fr")
    ),
    responses(
        (status = 200, description = "Landing data retrieved successfully", body = ApiResponse<OperatorLandingDto>),
        (status = 303, description = "Redirect to login"),
        (status = 404, description = "Unknown locale")
    ),
    tag = "operator",
    security(
        ("session_cookie" = [])
    )
)]
pub async fn operator_landing(
    RequireOperatorAccess(_locale, actor): RequireOperatorAccess,
    State(service): State<Arc<CityService>>,
) -> Result<Json<ApiResponse<OperatorLandingDto>>> {
    let cities = service.list_accessible(&actor).await?;
    let landing = OperatorLandingDto {
        email: actor.email().to_string(),
        role: actor.role(),
        cities,
    };

    Ok(Json(ApiResponse::success(Some(landing), None, None)))
}
