use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Interface locale carried as the first path segment of every page route.
///
/// An unknown code is a not-found response, never a fallback to a default
/// locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Nl,
    Fr,
}

impl Locale {
    pub fn from_code(code: &str) -> Option<Locale> {
        match code {
            "en" => Some(Locale::En),
            "nl" => Some(Locale::Nl),
            "fr" => Some(Locale::Fr),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Nl => "nl",
            Locale::Fr => "fr",
        }
    }

    /// Login route the frontend serves for this locale.
    pub fn login_path(&self) -> String {
        format!("/{}/login", self.code())
    }

    /// Operator landing route for this locale.
    pub fn operator_landing_path(&self) -> String {
        format!("/{}/operator", self.code())
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_known_locales() {
        assert_eq!(Locale::from_code("en"), Some(Locale::En));
        assert_eq!(Locale::from_code("nl"), Some(Locale::Nl));
        assert_eq!(Locale::from_code("fr"), Some(Locale::Fr));
    }

    #[test]
    fn test_from_code_unknown_locale() {
        assert_eq!(Locale::from_code("de"), None);
        assert_eq!(Locale::from_code("EN"), None);
        assert_eq!(Locale::from_code(""), None);
    }

    #[test]
    fn test_locale_paths() {
        assert_eq!(Locale::En.login_path(), "/en/login");
        assert_eq!(Locale::Nl.login_path(), "/nl/login");
        assert_eq!(Locale::Fr.operator_landing_path(), "/fr/operator");
    }
}
