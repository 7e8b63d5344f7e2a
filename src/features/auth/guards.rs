//! Authorization guards for page and API routes.
//!
//! Every guard runs the full gate decision before the handler body executes,
//! so a handler holding a scope value never needs its own checks. Page guards
//! answer failures the way a browser expects (redirects and 404s) while API
//! guards answer with generic JSON errors. Neither surface carries the deny
//! reason; that stays in the server log.
//!
//! Role hierarchy (lowest to highest): viewer, operator, admin, with
//! superuser above all three as a global role.

use axum::extract::{FromRef, FromRequestParts, Path};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::auth::gate::{
    Action, ActorScope, AuthorizationGate, CityScope, DenyReason, GateError, GlobalAction,
    PublicCityScope,
};
use crate::features::auth::model::Identity;
use crate::shared::locale::Locale;

/// How page routes answer a failed check.
#[derive(Debug, PartialEq, Eq)]
pub enum PageRejection {
    RedirectToLogin(Locale),
    RedirectToLanding(Locale),
    NotFound,
    ServerError,
}

impl PageRejection {
    pub fn from_gate(err: GateError, locale: Locale) -> Self {
        match err {
            GateError::Deny(DenyReason::Unauthenticated)
            | GateError::Deny(DenyReason::InactiveOrUnknownAccount) => {
                PageRejection::RedirectToLogin(locale)
            }
            GateError::Deny(_) => PageRejection::RedirectToLanding(locale),
            GateError::CityNotFound | GateError::InvalidCitySlug => PageRejection::NotFound,
            GateError::Upstream(_) => PageRejection::ServerError,
        }
    }
}

impl IntoResponse for PageRejection {
    fn into_response(self) -> Response {
        match self {
            PageRejection::RedirectToLogin(locale) => {
                Redirect::to(&locale.login_path()).into_response()
            }
            PageRejection::RedirectToLanding(locale) => {
                Redirect::to(&locale.operator_landing_path()).into_response()
            }
            PageRejection::NotFound => StatusCode::NOT_FOUND.into_response(),
            PageRejection::ServerError => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

#[derive(Deserialize)]
struct CityPageParams {
    locale: String,
    city_slug: String,
}

#[derive(Deserialize)]
struct LocaleParams {
    locale: String,
}

#[derive(Deserialize)]
struct CityApiParams {
    city_slug: String,
}

fn page_identity(parts: &Parts) -> Result<Identity, PageRejection> {
    match parts.extensions.get::<Identity>() {
        Some(identity) => Ok(identity.clone()),
        None => {
            tracing::error!("Identity extension missing; session middleware not applied");
            Err(PageRejection::ServerError)
        }
    }
}

fn api_identity(parts: &Parts) -> Result<Identity, AppError> {
    match parts.extensions.get::<Identity>() {
        Some(identity) => Ok(identity.clone()),
        None => {
            tracing::error!("Identity extension missing; session middleware not applied");
            Err(AppError::Internal(
                "Session middleware not applied".to_string(),
            ))
        }
    }
}

async fn authorize_city_page<S>(
    parts: &mut Parts,
    state: &S,
    action: Action,
) -> Result<(Locale, CityScope), PageRejection>
where
    S: Send + Sync,
    Arc<AuthorizationGate>: FromRef<S>,
{
    let Path(params) = Path::<CityPageParams>::from_request_parts(parts, state)
        .await
        .map_err(|_| PageRejection::NotFound)?;

    let locale = Locale::from_code(&params.locale).ok_or(PageRejection::NotFound)?;
    let identity = page_identity(parts)?;

    let gate = Arc::<AuthorizationGate>::from_ref(state);
    let scope = gate
        .authorize(&identity, &params.city_slug, action)
        .await
        .map_err(|e| PageRejection::from_gate(e, locale))?;

    Ok((locale, scope))
}

/// Page guard for read access to a city workspace.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireCityViewer(locale, scope): RequireCityViewer) { ... }
/// ```
pub struct RequireCityViewer(pub Locale, pub CityScope);

impl<S> FromRequestParts<S> for RequireCityViewer
where
    S: Send + Sync,
    Arc<AuthorizationGate>: FromRef<S>,
{
    type Rejection = PageRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let (locale, scope) = authorize_city_page(parts, state, Action::ViewContent).await?;
        Ok(RequireCityViewer(locale, scope))
    }
}

/// Page guard for content mutations in a city workspace. Requires the
/// operator role or better there.
pub struct RequireCityOperator(pub Locale, pub CityScope);

impl<S> FromRequestParts<S> for RequireCityOperator
where
    S: Send + Sync,
    Arc<AuthorizationGate>: FromRef<S>,
{
    type Rejection = PageRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let (locale, scope) = authorize_city_page(parts, state, Action::ManageContent).await?;
        Ok(RequireCityOperator(locale, scope))
    }
}

/// Page guard for the operator landing page. Any active account qualifies;
/// anonymous visitors are sent to the login page.
pub struct RequireOperatorAccess(pub Locale, pub ActorScope);

impl<S> FromRequestParts<S> for RequireOperatorAccess
where
    S: Send + Sync,
    Arc<AuthorizationGate>: FromRef<S>,
{
    type Rejection = PageRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<LocaleParams>::from_request_parts(parts, state)
            .await
            .map_err(|_| PageRejection::NotFound)?;

        let locale = Locale::from_code(&params.locale).ok_or(PageRejection::NotFound)?;
        let identity = page_identity(parts)?;

        let gate = Arc::<AuthorizationGate>::from_ref(state);
        let scope = gate
            .authorize_global(&identity, GlobalAction::AccessOperatorArea)
            .await
            .map_err(|e| PageRejection::from_gate(e, locale))?;

        Ok(RequireOperatorAccess(locale, scope))
    }
}

/// Resolves the city for a public page. No identity is consulted.
pub struct PublicCity(pub Locale, pub PublicCityScope);

impl<S> FromRequestParts<S> for PublicCity
where
    S: Send + Sync,
    Arc<AuthorizationGate>: FromRef<S>,
{
    type Rejection = PageRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<CityPageParams>::from_request_parts(parts, state)
            .await
            .map_err(|_| PageRejection::NotFound)?;

        let locale = Locale::from_code(&params.locale).ok_or(PageRejection::NotFound)?;

        let gate = Arc::<AuthorizationGate>::from_ref(state);
        let scope = gate
            .resolve_public(&params.city_slug)
            .await
            .map_err(|e| PageRejection::from_gate(e, locale))?;

        Ok(PublicCity(locale, scope))
    }
}

/// API guard for member management inside a city. Requires the admin role
/// there (or superuser).
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireCityAdmin(scope): RequireCityAdmin) { ... }
/// ```
pub struct RequireCityAdmin(pub CityScope);

impl<S> FromRequestParts<S> for RequireCityAdmin
where
    S: Send + Sync,
    Arc<AuthorizationGate>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<CityApiParams>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest("Missing city slug in path".to_string()))?;

        let identity = api_identity(parts)?;

        let gate = Arc::<AuthorizationGate>::from_ref(state);
        let scope = gate
            .authorize(&identity, &params.city_slug, Action::ManageMembers)
            .await?;

        Ok(RequireCityAdmin(scope))
    }
}

/// API guard for directory management: provisioning cities and editing
/// account profiles. Superuser only.
pub struct RequireSuperuser(pub ActorScope);

impl<S> FromRequestParts<S> for RequireSuperuser
where
    S: Send + Sync,
    Arc<AuthorizationGate>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = api_identity(parts)?;

        let gate = Arc::<AuthorizationGate>::from_ref(state);
        let scope = gate
            .authorize_global(&identity, GlobalAction::ManageDirectory)
            .await?;

        Ok(RequireSuperuser(scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::Role;
    use crate::shared::test_helpers::{authenticated_identity, FakeAccessStore, with_identity};
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::routing::{get, post};
    use axum::Router;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn view_probe(RequireCityViewer(locale, scope): RequireCityViewer) -> String {
        format!("{}:{}", locale.code(), scope.city().slug)
    }

    async fn manage_probe(RequireCityOperator(_, scope): RequireCityOperator) -> String {
        scope.city().slug.clone()
    }

    async fn landing_probe(RequireOperatorAccess(locale, scope): RequireOperatorAccess) -> String {
        format!("{}:{}", locale.code(), scope.email())
    }

    async fn admin_probe(RequireSuperuser(scope): RequireSuperuser) -> String {
        scope.user_id().to_string()
    }

    fn page_router(gate: Arc<AuthorizationGate>, identity: Identity) -> Router {
        let router = Router::new()
            .route(
                "/{locale}/operator/{city_slug}/languages",
                get(view_probe).post(manage_probe),
            )
            .route("/{locale}/operator", get(landing_probe))
            .route("/api/admin/cities", post(admin_probe))
            .with_state(gate);
        with_identity(router, identity)
    }

    fn seeded_store() -> (FakeAccessStore, Uuid, Uuid) {
        let store = FakeAccessStore::new();
        let city_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        store.add_city(city_id, "amsterdam");
        store.add_profile(user_id, Role::Viewer, true);
        (store, city_id, user_id)
    }

    fn location(response: &axum::response::Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    #[tokio::test]
    async fn test_anonymous_page_request_redirects_to_login() {
        let (store, _, _) = seeded_store();
        let gate = Arc::new(AuthorizationGate::new(Arc::new(store)));
        let app = page_router(gate, Identity::Anonymous);

        let response = app
            .oneshot(
                Request::get("/en/operator/amsterdam/languages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/en/login");
    }

    #[tokio::test]
    async fn test_login_redirect_keeps_request_locale() {
        let (store, _, _) = seeded_store();
        let gate = Arc::new(AuthorizationGate::new(Arc::new(store)));
        let app = page_router(gate, Identity::Anonymous);

        let response = app
            .oneshot(
                Request::get("/nl/operator/amsterdam/languages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(location(&response), "/nl/login");
    }

    #[tokio::test]
    async fn test_unknown_locale_is_404() {
        let (store, city_id, user_id) = seeded_store();
        store.add_membership(city_id, user_id, Role::Admin);
        let gate = Arc::new(AuthorizationGate::new(Arc::new(store)));
        let app = page_router(gate, authenticated_identity(user_id));

        let response = app
            .oneshot(
                Request::get("/de/operator/amsterdam/languages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_viewer_can_read_but_mutation_redirects_to_landing() {
        let (store, city_id, user_id) = seeded_store();
        store.add_membership(city_id, user_id, Role::Viewer);
        let gate = Arc::new(AuthorizationGate::new(Arc::new(store)));
        let app = page_router(gate, authenticated_identity(user_id));

        let response = app
            .clone()
            .oneshot(
                Request::get("/en/operator/amsterdam/languages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::post("/fr/operator/amsterdam/languages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/fr/operator");
    }

    #[tokio::test]
    async fn test_non_member_page_request_redirects_to_landing() {
        let (store, _, user_id) = seeded_store();
        let gate = Arc::new(AuthorizationGate::new(Arc::new(store)));
        let app = page_router(gate, authenticated_identity(user_id));

        let response = app
            .oneshot(
                Request::get("/en/operator/amsterdam/languages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/en/operator");
    }

    #[tokio::test]
    async fn test_unknown_city_is_404_even_when_authenticated() {
        let (store, _, user_id) = seeded_store();
        let gate = Arc::new(AuthorizationGate::new(Arc::new(store)));
        let app = page_router(gate, authenticated_identity(user_id));

        let response = app
            .oneshot(
                Request::get("/en/operator/atlantis/languages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_superuser_opens_any_city_without_membership() {
        let (store, _, _) = seeded_store();
        let superuser = Uuid::new_v4();
        store.add_profile(superuser, Role::Superuser, true);
        let gate = Arc::new(AuthorizationGate::new(Arc::new(store)));
        let app = page_router(gate, authenticated_identity(superuser));

        let response = app
            .oneshot(
                Request::post("/en/operator/amsterdam/languages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_landing_page_accepts_any_active_account() {
        let (store, _, user_id) = seeded_store();
        let gate = Arc::new(AuthorizationGate::new(Arc::new(store)));
        let app = page_router(gate, authenticated_identity(user_id));

        let response = app
            .oneshot(Request::get("/en/operator").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_inactive_account_is_sent_back_to_login() {
        let (store, _, user_id) = seeded_store();
        store.set_profile_active(user_id, false);
        let gate = Arc::new(AuthorizationGate::new(Arc::new(store)));
        let app = page_router(gate, authenticated_identity(user_id));

        let response = app
            .oneshot(Request::get("/en/operator").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/en/login");
    }

    #[tokio::test]
    async fn test_superuser_api_guard_rejects_lower_roles() {
        let (store, _, user_id) = seeded_store();
        let gate = Arc::new(AuthorizationGate::new(Arc::new(store)));

        let app = page_router(gate.clone(), authenticated_identity(user_id));
        let response = app
            .oneshot(
                Request::post("/api/admin/cities")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let app = page_router(gate, Identity::Anonymous);
        let response = app
            .oneshot(
                Request::post("/api/admin/cities")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_store_outage_fails_closed_with_500() {
        let (store, _, user_id) = seeded_store();
        store.set_unavailable(true);
        let gate = Arc::new(AuthorizationGate::new(Arc::new(store)));
        let app = page_router(gate, authenticated_identity(user_id));

        let response = app
            .oneshot(
                Request::get("/en/operator/amsterdam/languages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
