use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::content::models::Language;

/// ISO 639-3 codes are exactly three lowercase letters ("yor", "tur", "nld")
static ISO_639_3_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{3}$").unwrap());

// Create request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLanguageDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    /// Name of the language in the language itself
    #[validate(length(min = 1, max = 200))]
    pub endonym: Option<String>,

    #[validate(regex(path = *ISO_639_3_REGEX, message = "must be a three-letter lowercase ISO 639-3 code"))]
    pub iso_code: Option<String>,

    #[validate(range(min = 0))]
    pub speaker_estimate: Option<i32>,

    #[validate(length(max = 5000))]
    pub description_en: Option<String>,

    #[validate(length(max = 5000))]
    pub description_nl: Option<String>,

    #[validate(length(max = 5000))]
    pub description_fr: Option<String>,

    #[serde(default)]
    pub is_published: bool,
}

// Update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLanguageDto {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub endonym: Option<String>,

    #[validate(regex(path = *ISO_639_3_REGEX, message = "must be a three-letter lowercase ISO 639-3 code"))]
    pub iso_code: Option<String>,

    #[validate(range(min = 0))]
    pub speaker_estimate: Option<i32>,

    #[validate(length(max = 5000))]
    pub description_en: Option<String>,

    #[validate(length(max = 5000))]
    pub description_nl: Option<String>,

    #[validate(length(max = 5000))]
    pub description_fr: Option<String>,

    pub is_published: Option<bool>,
}

// Response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LanguageResponseDto {
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

impl From<Language> for LanguageResponseDto {
    fn from(l: Language) -> Self {
        Self {
            id: l.id,
            city_id: l.city_id,
            name: l.name,
            endonym: l.endonym,
            iso_code: l.iso_code,
            speaker_estimate: l.speaker_estimate,
            description_en: l.description_en,
            description_nl: l.description_nl,
            description_fr: l.description_fr,
            is_published: l.is_published,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_code_regex_accepts_three_lowercase_letters() {
        assert!(ISO_639_3_REGEX.is_match("yor"));
        assert!(ISO_639_3_REGEX.is_match("nld"));
        assert!(!ISO_639_3_REGEX.is_match("NL"));
        assert!(!ISO_639_3_REGEX.is_match("dutch"));
        assert!(!ISO_639_3_REGEX.is_match("nl1"));
    }

    #[test]
    fn test_create_language_dto_validation() {
        let dto = CreateLanguageDto {
            name: "Yoruba".to_string(),
            endonym: Some("Èdè Yorùbá".to_string()),
            iso_code: Some("yor".to_string()),
            speaker_estimate: Some(25_000),
            description_en: None,
            description_nl: None,
            description_fr: None,
            is_published: false,
        };
        assert!(dto.validate().is_ok());

        let bad_code = CreateLanguageDto {
            iso_code: Some("YOR".to_string()),
            ..dto
        };
        assert!(bad_code.validate().is_err());
    }

    #[test]
    fn test_create_language_dto_rejects_negative_speakers() {
        let dto = CreateLanguageDto {
            name: "Turkish".to_string(),
            endonym: None,
            iso_code: None,
            speaker_estimate: Some(-5),
            description_en: None,
            description_nl: None,
            description_fr: None,
            is_published: false,
        };
        assert!(dto.validate().is_err());
    }
}
