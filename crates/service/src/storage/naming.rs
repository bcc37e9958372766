//! Object names for uploads: `[prefix/]<unix-millis>-<6 random>.<ext>`.

use chrono::Utc;
use common::slug::slugify;
use rand::{distributions::Alphanumeric, Rng};

/// Lowercased extension of `file_name`, `bin` when there is none.
pub fn file_extension(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            ext.to_ascii_lowercase()
        }
        _ => "bin".to_string(),
    }
}

fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect()
}

/// Folder prefix with every segment slugified; empty segments dropped.
pub fn sanitize_prefix(prefix: &str) -> String {
    prefix
        .split('/')
        .map(slugify)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn generate_object_name(prefix: Option<&str>, original_file_name: &str) -> String {
    let name = format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        random_suffix(6),
        file_extension(original_file_name)
    );
    match prefix.map(sanitize_prefix).filter(|p| !p.is_empty()) {
        Some(p) => format!("{p}/{name}"),
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_rules() {
        assert_eq!(file_extension("Kain Batik.JPEG"), "jpeg");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("README"), "bin");
        assert_eq!(file_extension(".hidden"), "bin");
        assert_eq!(file_extension("C:\\photos\\motif.png"), "png");
    }

    #[test]
    fn generated_name_shape() {
        let name = generate_object_name(Some("/Banner Home/"), "Hero.PNG");
        let (prefix, file) = name.split_once('/').unwrap();
        assert_eq!(prefix, "banner-home");
        let (stamp, rest) = file.split_once('-').unwrap();
        assert!(stamp.parse::<i64>().is_ok());
        let (rand_part, ext) = rest.split_once('.').unwrap();
        assert_eq!(rand_part.len(), 6);
        assert!(rand_part.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        assert_eq!(ext, "png");
    }

    #[test]
    fn blank_prefix_is_ignored() {
        let name = generate_object_name(Some(" / "), "a.webp");
        assert!(!name.contains('/'));
        assert!(name.ends_with(".webp"));
    }
}
