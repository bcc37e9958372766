//! URL slug helpers shared by models and services.

/// Lowercase ASCII slug: alphanumerics kept, every other run of characters
/// collapsed into a single `-`, no leading or trailing dashes.
///
/// ```
/// assert_eq!(common::slug::slugify("Batik Tulis  Mega Mendung!"), "batik-tulis-mega-mendung");
/// ```
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// A slug is valid when it is non-empty and already in `slugify` form.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slugify(slug) == slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_separators_and_trims() {
        assert_eq!(slugify("  Kain -- Sogan  "), "kain-sogan");
        assert_eq!(slugify("Cap/Tulis & Printing"), "cap-tulis-printing");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn non_ascii_letters_act_as_separators() {
        assert_eq!(slugify("Batik Café Pekalongan"), "batik-caf-pekalongan");
    }

    #[test]
    fn validity_matches_slugify_form() {
        assert!(is_valid_slug("parang-rusak"));
        assert!(!is_valid_slug("Parang Rusak"));
        assert!(!is_valid_slug("-parang"));
        assert!(!is_valid_slug(""));
    }
}
