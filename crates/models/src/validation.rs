//! Field checks shared by the entity modules.

use common::slug::{is_valid_slug, slugify};

use crate::errors::ModelError;

/// Trimmed, non-empty, at most `max` characters.
pub fn required_text(field: &str, value: &str, max: usize) -> Result<String, ModelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelError::Validation(format!("{field} required")));
    }
    if trimmed.chars().count() > max {
        return Err(ModelError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(trimmed.to_string())
}

/// Empty or whitespace-only optional text collapses to `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Use the explicit slug when given (it must already be valid), otherwise derive one from `source`.
pub fn resolve_slug(explicit: Option<&str>, source: &str) -> Result<String, ModelError> {
    match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) if is_valid_slug(s) => Ok(s.to_string()),
        Some(s) => Err(ModelError::Validation(format!("invalid slug '{s}'"))),
        None => {
            let derived = slugify(source);
            if derived.is_empty() {
                return Err(ModelError::Validation("cannot derive slug from name".into()));
            }
            Ok(derived)
        }
    }
}

/// Optional absolute http(s) URL.
pub fn optional_url(field: &str, value: Option<&str>) -> Result<Option<String>, ModelError> {
    match optional_text(value) {
        Some(u) if u.starts_with("http://") || u.starts_with("https://") => Ok(Some(u)),
        Some(_) => Err(ModelError::Validation(format!("{field} must start with http(s)"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_bounds() {
        assert_eq!(required_text("name", "  Sogan ", 10).unwrap(), "Sogan");
        assert!(required_text("name", "   ", 10).is_err());
        assert!(required_text("name", "abcdefghijk", 10).is_err());
    }

    #[test]
    fn slug_is_derived_or_checked() {
        assert_eq!(resolve_slug(None, "Kawung Biru").unwrap(), "kawung-biru");
        assert_eq!(resolve_slug(Some(" "), "Kawung").unwrap(), "kawung");
        assert_eq!(resolve_slug(Some("kawung-2"), "ignored").unwrap(), "kawung-2");
        assert!(resolve_slug(Some("Kawung 2"), "x").is_err());
        assert!(resolve_slug(None, "!!!").is_err());
    }

    #[test]
    fn url_must_be_http() {
        assert_eq!(optional_url("image_url", Some("")).unwrap(), None);
        assert!(optional_url("image_url", Some("ftp://x")).is_err());
        assert!(optional_url("image_url", Some("https://cdn/x.png")).unwrap().is_some());
    }
}
