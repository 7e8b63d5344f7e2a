use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::model::Role;
use crate::features::cities::models::{AccessibleCity, City, CityMember, CityMembership};
use crate::shared::validation::SLUG_REGEX;

// Create request (superuser)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCityDto {
    /// URL identifier: lowercase alphanumerics separated by single hyphens
    #[validate(length(min = 1, max = 64), regex(path = *SLUG_REGEX, message = "slug must be lowercase alphanumerics separated by single hyphens"))]
    pub slug: String,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    /// ISO 3166-1 alpha-2 code. Defaults to NL.
    #[validate(length(equal = 2))]
    pub country: Option<String>,
}

// Membership upsert request (city admin)
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertMemberDto {
    pub user_id: Uuid,

    /// viewer, operator or admin. Superuser is a global role and cannot be
    /// granted through a membership.
    pub role: Role,
}

// Response DTOs
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityResponseDto {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<City> for CityResponseDto {
    fn from(city: City) -> Self {
        Self {
            id: city.id,
            slug: city.slug,
            name: city.name,
            country: city.country,
            created_at: city.created_at,
            updated_at: city.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponseDto {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<CityMember> for MemberResponseDto {
    fn from(member: CityMember) -> Self {
        Self {
            user_id: member.user_id,
            email: member.email,
            role: member.role,
            is_active: member.is_active,
            created_at: member.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponseDto {
    pub city_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CityMembership> for MembershipResponseDto {
    fn from(membership: CityMembership) -> Self {
        Self {
            city_id: membership.city_id,
            user_id: membership.user_id,
            role: membership.role,
            created_at: membership.created_at,
            updated_at: membership.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessibleCityDto {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub role: Role,
}

impl From<AccessibleCity> for AccessibleCityDto {
    fn from(city: AccessibleCity) -> Self {
        Self {
            id: city.id,
            slug: city.slug,
            name: city.name,
            role: city.role,
        }
    }
}

/// Data behind the operator landing page: who is signed in and which city
/// workspaces they can open.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperatorLandingDto {
    pub email: String,
    pub role: Role,
    pub cities: Vec<AccessibleCityDto>,
}
