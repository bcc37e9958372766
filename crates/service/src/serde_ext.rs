//! Serde helpers for partial-update payloads.

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
/// Pair with `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "super::double_option")]
        image_url: Option<Option<String>>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"image_url": null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"image_url": "https://x/y.png"}"#).unwrap();
        assert_eq!(absent.image_url, None);
        assert_eq!(null.image_url, Some(None));
        assert_eq!(set.image_url, Some(Some("https://x/y.png".into())));
    }
}
