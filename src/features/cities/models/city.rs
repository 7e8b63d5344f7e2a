use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A city tenant. Content rows hang off `id`; URLs carry `slug`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct City {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
