use crate::core::error::Result;
use crate::features::auth::dto::MeResponseDto;
use crate::features::auth::model::Identity;
use crate::features::auth::service::AuthService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, Json};
use std::sync::Arc;

/// Report the current session. Anonymous callers get `authenticated: false`
/// with a 200, so clients can bootstrap without special error handling.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current session retrieved successfully", body = ApiResponse<MeResponseDto>)
    ),
    tag = "auth",
    security(
        (),
        ("session_cookie" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn me(
    identity: Identity,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<MeResponseDto>>> {
    let snapshot = service.current_session(&identity).await?;
    Ok(Json(ApiResponse::success(Some(snapshot), None, None)))
}
