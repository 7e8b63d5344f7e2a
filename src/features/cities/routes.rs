use axum::extract::FromRef;
use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

use crate::features::auth::gate::AuthorizationGate;
use crate::features::cities::{handlers, services::CityService};

/// State for city routes. Guards pull the gate out through `FromRef`,
/// handlers pull the service.
#[derive(Clone, FromRef)]
pub struct CitiesState {
    pub city_service: Arc<CityService>,
    pub gate: Arc<AuthorizationGate>,
}

/// City directory and membership administration.
pub fn admin_routes(state: CitiesState) -> Router {
    Router::new()
        .route(
            "/api/admin/cities",
            get(handlers::list_cities).post(handlers::create_city),
        )
        .route(
            "/api/admin/cities/{city_slug}/members",
            get(handlers::list_members).put(handlers::upsert_member),
        )
        .route(
            "/api/admin/cities/{city_slug}/members/{user_id}",
            delete(handlers::remove_member),
        )
        .with_state(state)
}

/// Operator landing page.
pub fn page_routes(state: CitiesState) -> Router {
    Router::new()
        .route("/{locale}/operator", get(handlers::operator_landing))
        .with_state(state)
}
