use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::content::models::LanguagePoint;

// Create request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePointDto {
    #[validate(length(min = 1, max = 200))]
    pub label: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    /// Language this marker belongs to, if any. Must be a language of the
    /// same city.
    pub language_id: Option<Uuid>,

    #[validate(length(min = 1, max = 200))]
    pub neighborhood: Option<String>,

    #[serde(default)]
    pub is_published: bool,
}

// Response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointResponseDto {
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

impl From<LanguagePoint> for PointResponseDto {
    fn from(p: LanguagePoint) -> Self {
        Self {
            id: p.id,
            city_id: p.city_id,
            language_id: p.language_id,
            label: p.label,
            latitude: p.latitude,
            longitude: p.longitude,
            neighborhood: p.neighborhood,
            is_published: p.is_published,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_point_dto_rejects_out_of_range_coordinates() {
        let dto = CreatePointDto {
            label: "Bijlmer market".to_string(),
            latitude: 52.3163,
            longitude: 4.9545,
            language_id: None,
            neighborhood: Some("Amsterdam-Zuidoost".to_string()),
            is_published: true,
        };
        assert!(dto.validate().is_ok());

        let north_of_pole = CreatePointDto {
            latitude: 91.0,
            ..dto
        };
        assert!(north_of_pole.validate().is_err());
    }
}
