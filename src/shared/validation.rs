use lazy_static::lazy_static;
use regex::Regex;

use crate::core::error::AppError;
use crate::shared::constants::MAX_SLUG_LENGTH;

lazy_static! {
    /// Regex for city and content slugs.
    /// Must be lowercase alphanumeric with single hyphens
    /// - Valid: "amsterdam", "den-haag", "city123"
    /// - Invalid: "-amsterdam", "amsterdam-", "den--haag", "Amsterdam!", "den_haag"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Checks the shape of a client-supplied city slug before it is allowed
/// anywhere near a query.
pub fn validate_city_slug(slug: &str) -> Result<(), AppError> {
    if slug.len() <= MAX_SLUG_LENGTH && SLUG_REGEX.is_match(slug) {
        Ok(())
    } else {
        Err(AppError::Validation("Invalid city slug format".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_regex_valid() {
        assert!(SLUG_REGEX.is_match("amsterdam"));
        assert!(SLUG_REGEX.is_match("den-haag"));
        assert!(SLUG_REGEX.is_match("city123"));
        assert!(SLUG_REGEX.is_match("a"));
        assert!(SLUG_REGEX.is_match("a-b-c"));
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!SLUG_REGEX.is_match("-amsterdam")); // starts with hyphen
        assert!(!SLUG_REGEX.is_match("amsterdam-")); // ends with hyphen
        assert!(!SLUG_REGEX.is_match("den--haag")); // double hyphen
        assert!(!SLUG_REGEX.is_match("Amsterdam")); // uppercase
        assert!(!SLUG_REGEX.is_match("Amsterdam!")); // symbols
        assert!(!SLUG_REGEX.is_match("den_haag")); // underscore
        assert!(!SLUG_REGEX.is_match("")); // empty
        assert!(!SLUG_REGEX.is_match("den haag")); // space
    }

    #[test]
    fn test_validate_city_slug_rejects_overlong_input() {
        let slug = "a".repeat(MAX_SLUG_LENGTH + 1);
        assert!(validate_city_slug(&slug).is_err());
    }
}
