use axum::{
    extract::FromRef,
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::features::auth::gate::AuthorizationGate;
use crate::features::users::handlers::profile_handler;
use crate::features::users::services::ProfileService;

#[derive(Clone, FromRef)]
pub struct UsersState {
    pub profile_service: Arc<ProfileService>,
    pub gate: Arc<AuthorizationGate>,
}

pub fn routes(state: UsersState) -> Router {
    Router::new()
        .route("/api/admin/users", get(profile_handler::list_profiles))
        .route(
            "/api/admin/users/{user_id}",
            get(profile_handler::get_profile).put(profile_handler::upsert_profile),
        )
        .with_state(state)
}
