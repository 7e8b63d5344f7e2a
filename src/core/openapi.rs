use utoipa::openapi::security::{
    ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme,
};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::cities::{dtos as cities_dtos, handlers as cities_handlers};
use crate::features::content::{dtos as content_dtos, handlers as content_handlers};
use crate::features::map::{dtos as map_dtos, handlers as map_handlers};
use crate::features::users::{dtos as users_dtos, handlers::profile_handler};
use crate::shared::locale::Locale;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::me,
        // Users (superuser)
        profile_handler::list_profiles,
        profile_handler::get_profile,
        profile_handler::upsert_profile,
        // Cities
        cities_handlers::city_admin_handler::list_cities,
        cities_handlers::city_admin_handler::create_city,
        cities_handlers::city_admin_handler::list_members,
        cities_handlers::city_admin_handler::upsert_member,
        cities_handlers::city_admin_handler::remove_member,
        cities_handlers::operator_handler::operator_landing,
        // Content (operator pages)
        content_handlers::language_handler::list_languages,
        content_handlers::language_handler::create_language,
        content_handlers::language_handler::get_language,
        content_handlers::language_handler::update_language,
        content_handlers::language_handler::delete_language,
        content_handlers::point_handler::list_points,
        content_handlers::point_handler::create_point,
        content_handlers::point_handler::delete_point,
        // Map (public)
        map_handlers::map_handler::map_view,
    ),
    components(
        schemas(
            // Shared
            Meta,
            Locale,
            // Auth
            auth::model::Role,
            auth::dto::MeResponseDto,
            auth::dto::MeUserDto,
            ApiResponse<auth::dto::MeResponseDto>,
            // Users
            users_dtos::UpsertProfileDto,
            users_dtos::ProfileResponseDto,
            ApiResponse<Vec<users_dtos::ProfileResponseDto>>,
            ApiResponse<users_dtos::ProfileResponseDto>,
            // Cities
            cities_dtos::CreateCityDto,
            cities_dtos::UpsertMemberDto,
            cities_dtos::CityResponseDto,
            cities_dtos::MemberResponseDto,
            cities_dtos::MembershipResponseDto,
            cities_dtos::AccessibleCityDto,
            cities_dtos::OperatorLandingDto,
            ApiResponse<Vec<cities_dtos::CityResponseDto>>,
            ApiResponse<cities_dtos::CityResponseDto>,
            ApiResponse<Vec<cities_dtos::MemberResponseDto>>,
            ApiResponse<cities_dtos::MembershipResponseDto>,
            ApiResponse<cities_dtos::OperatorLandingDto>,
            // Content
            content_dtos::CreateLanguageDto,
            content_dtos::UpdateLanguageDto,
            content_dtos::LanguageResponseDto,
            content_dtos::CreatePointDto,
            content_dtos::PointResponseDto,
            ApiResponse<Vec<content_dtos::LanguageResponseDto>>,
            ApiResponse<content_dtos::LanguageResponseDto>,
            ApiResponse<Vec<content_dtos::PointResponseDto>>,
            ApiResponse<content_dtos::PointResponseDto>,
            // Map
            map_dtos::MapViewDto,
            map_dtos::MapCityDto,
            map_dtos::MapLanguageDto,
            map_dtos::MapPointDto,
            ApiResponse<map_dtos::MapViewDto>,
        )
    ),
    tags(
        (name = "auth", description = "Session introspection"),
        (name = "users", description = "Account profile directory (superuser only)"),
        (name = "cities", description = "City provisioning and membership administration"),
        (name = "operator", description = "Operator landing"),
        (name = "content", description = "City-scoped languages and map markers"),
        (name = "map", description = "Public map data"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Language Map API",
        version = "0.1.0",
        description = "API documentation for the Language Map content service",
    )
)]
pub struct ApiDoc;

/// Adds session cookie and Bearer JWT security schemes to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("lm_session"))),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
