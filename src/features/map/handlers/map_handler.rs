use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::guards::PublicCity;
use crate::features::map::dtos::MapViewDto;
use crate::features::map::services::MapService;
use crate::shared::types::ApiResponse;

#[utoipa::path(
    get,
    path = "/{locale}/map/{city_slug}",
    params(
        ("locale" = String, Path, description = "UI locale (en, nl or fr)"),
        ("city_slug" = String, Path, description = "City slug")
    ),
    responses(
        (status = 200, description = "Published map data for this city", body = ApiResponse<MapViewDto>),
        (status = 404, description = "Unknown locale or city")
    ),
    tag = "map"
)]
pub async fn map_view(
    PublicCity(locale, scope): PublicCity,
    State(service): State<Arc<MapService>>,
) -> Result<Json<ApiResponse<MapViewDto>>> {
    let view = service.map_view(&scope, locale).await?;
    Ok(Json(ApiResponse::success(Some(view), None, None)))
}
