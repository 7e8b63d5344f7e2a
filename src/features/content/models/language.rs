use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A language spoken in one city. Descriptions are stored per locale.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Language {
    pub id: Uuid,
    pub city_id: Uuid,
    pub name: String,
    pub endonym: Option<String>,
    pub iso_code: Option<String>,
    pub speaker_estimate: Option<i32>,
    pub description_en: Option<String>,
    pub description_nl: Option<String>,
    pub description_fr: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A map marker within one city, optionally tied to a language.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LanguagePoint {
    pub id: Uuid,
    pub city_id: Uuid,
    pub language_id: Option<Uuid>,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub neighborhood: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
