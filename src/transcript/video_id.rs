use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// URL shapes tried in order; group 1 is the candidate identifier.
static URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)",
        r"youtube\.com/v/([^&\n?#]+)",
        r"youtube\.com/watch\?.*v=([^&\n?#]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

pub const VIDEO_ID_LEN: usize = 11;

/// A YouTube video identifier: exactly 11 characters of `[A-Za-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Accept `candidate` only if it is a well-formed identifier.
    pub fn parse(candidate: &str) -> Option<Self> {
        is_valid_id(candidate).then(|| Self(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_valid_id(candidate: &str) -> bool {
    candidate.len() == VIDEO_ID_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Turn a watch/short/embed URL or a bare identifier into a [`VideoId`].
///
/// Identifiers captured from a URL must pass the same 11-character check as
/// bare ones; a capture that fails it falls through to the next pattern.
pub fn normalize_video_id(reference: &str) -> Option<VideoId> {
    for pattern in URL_PATTERNS.iter() {
        let candidate = pattern
            .captures(reference)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());
        if let Some(id) = candidate.and_then(VideoId::parse) {
            return Some(id);
        }
        if let Some(rejected) = candidate {
            tracing::debug!("Ignoring malformed video id {:?} in {}", rejected, reference);
        }
    }

    VideoId::parse(reference.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    fn normalized(input: &str) -> Option<String> {
        normalize_video_id(input).map(|id| id.to_string())
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            normalized("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some(ID)
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(normalized("https://youtu.be/dQw4w9WgXcQ").as_deref(), Some(ID));
    }

    #[test]
    fn test_short_url_with_query() {
        assert_eq!(
            normalized("https://youtu.be/_NuH3D4SN-c?si=VSFea_rMwtaiR8Q7").as_deref(),
            Some("_NuH3D4SN-c")
        );
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            normalized("https://www.youtube.com/embed/dQw4w9WgXcQ").as_deref(),
            Some(ID)
        );
    }

    #[test]
    fn test_v_path_url() {
        assert_eq!(normalized("https://www.youtube.com/v/dQw4w9WgXcQ").as_deref(), Some(ID));
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            normalized("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=30s&list=PLrAXtmRdnEQy6nuLMHjMZOz59FYxp5VES")
                .as_deref(),
            Some(ID)
        );
    }

    #[test]
    fn test_watch_url_v_not_first_param() {
        assert_eq!(
            normalized("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ#t=10").as_deref(),
            Some(ID)
        );
    }

    #[test]
    fn test_all_url_shapes_agree() {
        let shapes = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?v=dQw4w9WgXcQ&t=1",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ?start=5",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
        ];
        for shape in shapes {
            assert_eq!(normalized(shape).as_deref(), Some(ID), "shape: {}", shape);
        }
    }

    #[test]
    fn test_bare_id() {
        assert_eq!(normalized(ID).as_deref(), Some(ID));
        assert_eq!(normalized("  dQw4w9WgXcQ\n").as_deref(), Some(ID));
        assert_eq!(normalized("a-b_c-d_e-f").as_deref(), Some("a-b_c-d_e-f"));
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(normalized("https://www.example.com/not-a-youtube-url"), None);
        assert_eq!(normalized("invalid-id-format"), None);
        assert_eq!(normalized("dQw4w9WgXc"), None);
        assert_eq!(normalized("dQw4w9WgXcQQ"), None);
        assert_eq!(normalized("dQw4w9WgX!Q"), None);
        assert_eq!(normalized(""), None);
    }

    #[test]
    fn test_malformed_url_id_is_rejected() {
        assert_eq!(normalized("https://www.youtube.com/watch?v=short"), None);
        assert_eq!(normalized("https://youtu.be/waytoolongvideoid"), None);
    }

    #[test]
    fn test_video_id_parse() {
        assert!(VideoId::parse(ID).is_some());
        assert!(VideoId::parse("not valid!!").is_none());
        assert_eq!(VideoId::parse(ID).unwrap().as_str(), ID);
    }
}
