//! YouTube URL parsing for embedded video lectures.

use std::sync::OnceLock;

use regex::Regex;

/// Matches the 11-character video id in the common YouTube URL shapes:
/// `watch?v=`, `youtu.be/`, `embed/`, and `/v/`.
fn id_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(
                r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/)([a-zA-Z0-9_-]{11})",
            )
            .expect("valid youtube id regex"),
            Regex::new(r"youtube\.com/watch\?.*v=([a-zA-Z0-9_-]{11})")
                .expect("valid youtube query regex"),
        ]
    })
}

/// Extract the 11-character video id from a YouTube URL, if present.
pub fn extract_video_id(url: &str) -> Option<&str> {
    if url.is_empty() {
        return None;
    }
    id_patterns()
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Build the embeddable player URL with restricted-UI parameters.
///
/// Returns `None` when no video id can be extracted.
pub fn embed_url(url: &str) -> Option<String> {
    extract_video_id(url).map(|id| {
        format!(
            "https://www.youtube.com/embed/{id}?rel=0&modestbranding=1&showinfo=0&fs=0&disablekb=1"
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_all_supported_shapes() {
        let id = "dQw4w9WgXcQ";
        let urls = [
            format!("https://www.youtube.com/watch?v={id}"),
            format!("https://youtu.be/{id}"),
            format!("https://www.youtube.com/embed/{id}"),
            format!("https://www.youtube.com/v/{id}"),
            format!("https://www.youtube.com/watch?list=PL123&v={id}"),
        ];
        for url in &urls {
            assert_eq!(extract_video_id(url), Some(id), "failed for {url}");
        }
    }

    #[test]
    fn rejects_non_youtube_urls() {
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("https://vimeo.com/12345"), None);
        assert_eq!(extract_video_id("not a url"), None);
    }

    #[test]
    fn embed_url_carries_restricted_player_params() {
        let url = embed_url("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert!(url.starts_with("https://www.youtube.com/embed/dQw4w9WgXcQ?"));
        assert!(url.contains("rel=0"));
        assert!(url.contains("modestbranding=1"));
        assert_eq!(embed_url("https://example.com/"), None);
    }
}
