use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::gate::PublicCityScope;
use crate::features::content::models::{Language, LanguagePoint};
use crate::features::content::services::ContentService;
use crate::features::map::dtos::{MapLanguageDto, MapPointDto, MapViewDto};
use crate::shared::locale::Locale;

/// Shapes published content into the public map payload.
pub struct MapService {
    content: Arc<ContentService>,
}

impl MapService {
    pub fn new(content: Arc<ContentService>) -> Self {
        Self { content }
    }

    pub async fn map_view(&self, scope: &PublicCityScope, locale: Locale) -> Result<MapViewDto> {
        let languages = self.content.published_languages(scope).await?;
        let points = self.content.published_points(scope).await?;

        Ok(build_map_view(scope, locale, languages, points))
    }
}

fn build_map_view(
    scope: &PublicCityScope,
    locale: Locale,
    languages: Vec<Language>,
    points: Vec<LanguagePoint>,
) -> MapViewDto {
    MapViewDto {
        city: scope.city().into(),
        locale,
        languages: languages
            .into_iter()
            .map(|l| localize_language(l, locale))
            .collect(),
        points: points.into_iter().map(to_point_dto).collect(),
    }
}

/// Picks the description in the requested locale, falling back to English.
fn localize_language(language: Language, locale: Locale) -> MapLanguageDto {
    let description = match locale {
        Locale::En => language.description_en.clone(),
        Locale::Nl => language.description_nl.or_else(|| language.description_en.clone()),
        Locale::Fr => language.description_fr.or_else(|| language.description_en.clone()),
    };

    MapLanguageDto {
        id: language.id,
        name: language.name,
        endonym: language.endonym,
        iso_code: language.iso_code,
        speaker_estimate: language.speaker_estimate,
        description,
    }
}

fn to_point_dto(point: LanguagePoint) -> MapPointDto {
    MapPointDto {
        id: point.id,
        language_id: point.language_id,
        label: point.label,
        latitude: point.latitude,
        longitude: point.longitude,
        neighborhood: point.neighborhood,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_language(en: Option<&str>, nl: Option<&str>, fr: Option<&str>) -> Language {
        Language {
            id: Uuid::new_v4(),
            city_id: Uuid::new_v4(),
            name: "Sranan Tongo".to_string(),
            endonym: None,
            iso_code: Some("srn".to_string()),
            speaker_estimate: Some(70_000),
            description_en: en.map(str::to_string),
            description_nl: nl.map(str::to_string),
            description_fr: fr.map(str::to_string),
            is_published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_description_uses_requested_locale() {
        let language = sample_language(Some("english"), Some("nederlands"), Some("français"));
        let dto = localize_language(language, Locale::Nl);
        assert_eq!(dto.description.as_deref(), Some("nederlands"));
    }

    #[test]
    fn test_description_falls_back_to_english() {
        let language = sample_language(Some("english"), None, None);

        let nl = localize_language(language.clone(), Locale::Nl);
        assert_eq!(nl.description.as_deref(), Some("english"));

        let fr = localize_language(language, Locale::Fr);
        assert_eq!(fr.description.as_deref(), Some("english"));
    }

    #[test]
    fn test_description_absent_when_no_translation_exists() {
        let language = sample_language(None, Some("nederlands"), None);

        let en = localize_language(language.clone(), Locale::En);
        assert_eq!(en.description, None);

        let nl = localize_language(language, Locale::Nl);
        assert_eq!(nl.description.as_deref(), Some("nederlands"));
    }
}
