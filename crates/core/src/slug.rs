//! URL slug generation for catalog entities.

use rand::Rng;

/// Lowercase a title into a URL-safe slug.
///
/// Alphanumerics are kept, runs of anything else collapse to a single `-`,
/// and leading/trailing separators are trimmed.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_sep = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    slug
}

/// Random lowercase-alphanumeric suffix appended on slug collision.
pub fn random_suffix(len: usize) -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Disambiguate a taken slug: `"intro-to-rust"` -> `"intro-to-rust-x7k2"`.
pub fn with_suffix(base: &str, suffix: &str) -> String {
    format!("{base}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Intro to Rust"), "intro-to-rust");
        assert_eq!(slugify("CSC 101: Data Structures"), "csc-101-data-structures");
    }

    #[test]
    fn slugify_collapses_and_trims_separators() {
        assert_eq!(slugify("  hello --- world!  "), "hello-world");
        assert_eq!(slugify("___"), "");
    }

    #[test]
    fn random_suffix_has_requested_length_and_charset() {
        let suffix = random_suffix(4);
        assert_eq!(suffix.len(), 4);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn with_suffix_joins_with_dash() {
        assert_eq!(with_suffix("intro-to-rust", "x7k2"), "intro-to-rust-x7k2");
    }
}
