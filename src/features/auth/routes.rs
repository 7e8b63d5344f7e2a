use crate::features::auth::handler;
use crate::features::auth::service::AuthService;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Session introspection routes. Open to anonymous callers; the response
/// carries the authentication state instead of a 401.
pub fn routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/me", get(handler::me))
        .with_state(service)
}
