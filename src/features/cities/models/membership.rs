use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::auth::model::Role;

/// One user's role inside one city.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CityMembership {
    pub city_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Membership row joined with the member's profile, for member lists.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CityMember {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A city a user can open from the operator landing page, with the role
/// they hold there.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AccessibleCity {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub role: Role,
}
