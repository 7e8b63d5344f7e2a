use axum::{extract::FromRef, routing::get, Router};
use std::sync::Arc;

use crate::features::auth::gate::AuthorizationGate;
use crate::features::map::handlers::map_handler;
use crate::features::map::services::MapService;

#[derive(Clone, FromRef)]
pub struct MapState {
    pub map_service: Arc<MapService>,
    pub gate: Arc<AuthorizationGate>,
}

pub fn routes(state: MapState) -> Router {
    Router::new()
        .route("/{locale}/map/{city_slug}", get(map_handler::map_view))
        .with_state(state)
}
