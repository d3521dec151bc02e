use thiserror::Error;

/// Errors raised by the transcript listing/fetch services.
///
/// The rendered message is what failure classification inspects, so the
/// wording of each variant is part of its behavior.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Too many requests or bot check for video {0}; the request was blocked")]
    RequestBlocked(String),

    #[error("Transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("Video unavailable or private: {0}")]
    VideoUnavailable(String),

    #[error("Video does not exist: {0}")]
    VideoNotFound(String),

    #[error("Video {0} is age restricted")]
    AgeRestricted(String),

    #[error("Video {0} is not playable: {1}")]
    VideoUnplayable(String, String),

    #[error("No transcript found for video {0} in languages {1:?}")]
    NoTranscriptFound(String, Vec<String>),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for TranscriptError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            TranscriptError::MalformedResponse(e.to_string())
        } else {
            TranscriptError::Http(e.to_string())
        }
    }
}
