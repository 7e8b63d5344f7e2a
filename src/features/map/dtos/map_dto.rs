use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::cities::models::City;
use crate::shared::locale::Locale;

/// Everything the public map page needs for one city, in one response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapViewDto {
    pub city: MapCityDto,
    pub locale: Locale,
    pub languages: Vec<MapLanguageDto>,
    pub points: Vec<MapPointDto>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapCityDto {
    pub slug: String,
    pub name: String,
    pub country: String,
}

impl From<&City> for MapCityDto {
    fn from(city: &City) -> Self {
        Self {
            slug: city.slug.clone(),
            name: city.name.clone(),
            country: city.country.clone(),
        }
    }
}

/// Published language with the description already narrowed to one locale.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapLanguageDto {
    pub id: Uuid,
    pub name: String,
    pub endonym: Option<String>,
    pub iso_code: Option<String>,
    pub speaker_estimate: Option<i32>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapPointDto {
    pub id: Uuid,
    pub language_id: Option<Uuid>,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub neighborhood: Option<String>,
}
