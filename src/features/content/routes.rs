use axum::{
    extract::FromRef,
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

use crate::features::auth::gate::AuthorizationGate;
use crate::features::content::handlers::{language_handler, point_handler};
use crate::features::content::services::ContentService;

#[derive(Clone, FromRef)]
pub struct ContentState {
    pub content_service: Arc<ContentService>,
    pub gate: Arc<AuthorizationGate>,
}

pub fn routes(state: ContentState) -> Router {
    Router::new()
        .route(
            "/{locale}/operator/{city_slug}/languages",
            get(language_handler::list_languages).post(language_handler::create_language),
        )
        .route(
            "/{locale}/operator/{city_slug}/languages/{id}",
            get(language_handler::get_language)
                .put(language_handler::update_language)
                .delete(language_handler::delete_language),
        )
        .route(
            "/{locale}/operator/{city_slug}/points",
            get(point_handler::list_points).post(point_handler::create_point),
        )
        .route(
            "/{locale}/operator/{city_slug}/points/{id}",
            delete(point_handler::delete_point),
        )
        .with_state(state)
}
