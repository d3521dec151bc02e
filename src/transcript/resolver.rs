//! Transcript resolution with language fallback.
//!
//! A resolution first asks the fetch service for the preferred languages. If
//! that fails, the listing service is queried and every listed transcript is
//! tried in listing order until one can be fetched. Attempts are sequential
//! and the first success wins.

use std::fmt;

use crate::config::DEFAULT_LANGUAGE;
use crate::transcript::backend::{
    segments_to_text, TranscriptDescriptor, TranscriptFetcher, TranscriptLister,
    TranscriptSegment,
};
use crate::transcript::video_id::VideoId;

/// Why no transcript could be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    ListingUnavailable,
    TranscriptsDisabled,
    VideoUnavailable,
    VideoNotFound,
    MalformedResponse,
    Unknown,
}

impl FailureReason {
    /// Best-effort classification of a service error message.
    pub fn classify(message: &str) -> Self {
        let message = message.to_lowercase();
        if message.contains("no element found")
            || message.contains("malformed")
            || message.contains("parse")
        {
            FailureReason::MalformedResponse
        } else if message.contains("transcript") && message.contains("disabled") {
            FailureReason::TranscriptsDisabled
        } else if message.contains("unavailable") || message.contains("private") {
            FailureReason::VideoUnavailable
        } else if message.contains("does not exist") {
            FailureReason::VideoNotFound
        } else {
            FailureReason::Unknown
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FailureReason::ListingUnavailable => "listing unavailable",
            FailureReason::TranscriptsDisabled => "transcripts are disabled for this video",
            FailureReason::VideoUnavailable => "the video is unavailable or private",
            FailureReason::VideoNotFound => "the video does not exist or the id is invalid",
            FailureReason::MalformedResponse => {
                "the transcript service returned a response that could not be parsed"
            }
            FailureReason::Unknown => "unknown error",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Terminal failure of a resolution attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveFailure {
    pub reason: FailureReason,
    /// Message of the last service error seen.
    pub detail: String,
}

impl fmt::Display for ResolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.reason, self.detail)
    }
}

impl std::error::Error for ResolveFailure {}

#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptOrigin {
    /// Served by the preferred-language fetch.
    Preferred,
    /// Served by a listed transcript after the preferred fetch failed.
    Fallback { language: String, language_code: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTranscript {
    pub text: String,
    pub origin: TranscriptOrigin,
}

pub struct TranscriptResolver<S> {
    source: S,
    default_languages: Vec<String>,
}

impl<S> TranscriptResolver<S>
where
    S: TranscriptLister + TranscriptFetcher,
{
    pub fn new(source: S) -> Self {
        Self::with_default_languages(source, vec![DEFAULT_LANGUAGE.to_string()])
    }

    /// An empty `languages` list falls back to the built-in default.
    pub fn with_default_languages(source: S, languages: Vec<String>) -> Self {
        let default_languages = if languages.is_empty() {
            vec![DEFAULT_LANGUAGE.to_string()]
        } else {
            languages
        };
        Self {
            source,
            default_languages,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn languages_or_default<'a>(&'a self, languages: Option<&'a [String]>) -> &'a [String] {
        match languages {
            Some(langs) if !langs.is_empty() => langs,
            _ => &self.default_languages,
        }
    }

    /// Every transcript the video offers. Failures yield an empty list.
    pub fn list_transcripts(&self, video_id: &VideoId) -> Vec<TranscriptDescriptor> {
        match self.source.list(video_id) {
            Ok(descriptors) => descriptors,
            Err(e) => {
                tracing::error!("Error getting available transcripts for {}: {}", video_id, e);
                Vec::new()
            }
        }
    }

    /// Resolve a transcript, falling back to any listed transcript.
    pub fn resolve(
        &self,
        video_id: &VideoId,
        languages: Option<&[String]>,
    ) -> Result<ResolvedTranscript, ResolveFailure> {
        let languages = self.languages_or_default(languages);
        tracing::info!(
            "Attempting to extract transcript for video {} in languages: {:?}",
            video_id,
            languages
        );

        let primary_error = match self.source.fetch(video_id, languages) {
            Ok(segments) => {
                tracing::info!("Successfully extracted transcript for video {}", video_id);
                return Ok(ResolvedTranscript {
                    text: segments_to_text(&segments),
                    origin: TranscriptOrigin::Preferred,
                });
            }
            Err(e) => e,
        };
        tracing::warn!(
            "Preferred-language transcript failed for video {}: {}",
            video_id,
            primary_error
        );

        tracing::info!("Attempting fallback transcript extraction for video {}", video_id);
        let listed = match self.source.list(video_id) {
            Ok(listed) => listed,
            Err(e) => {
                tracing::error!("Fallback transcript listing failed for video {}: {}", video_id, e);
                return Err(ResolveFailure {
                    reason: FailureReason::ListingUnavailable,
                    detail: e.to_string(),
                });
            }
        };

        let mut last_error = primary_error.to_string();
        for descriptor in &listed {
            tracing::info!(
                "Trying transcript in {} ({})",
                descriptor.language,
                descriptor.language_code
            );
            match self.source.fetch_one(descriptor) {
                Ok(segments) => {
                    tracing::info!(
                        "Successfully extracted transcript in {} for video {}",
                        descriptor.language,
                        video_id
                    );
                    return Ok(ResolvedTranscript {
                        text: segments_to_text(&segments),
                        origin: TranscriptOrigin::Fallback {
                            language: descriptor.language.clone(),
                            language_code: descriptor.language_code.clone(),
                        },
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to fetch transcript in {}: {}",
                        descriptor.language,
                        e
                    );
                    last_error = e.to_string();
                }
            }
        }

        let reason = FailureReason::classify(&last_error);
        tracing::error!(
            "No working transcripts found for video {} ({} listed): {}",
            video_id,
            listed.len(),
            reason
        );
        Err(ResolveFailure {
            reason,
            detail: last_error,
        })
    }

    /// Plain transcript text, or `None` when resolution fails.
    pub fn extract_transcript(
        &self,
        video_id: &VideoId,
        languages: Option<&[String]>,
    ) -> Option<String> {
        self.resolve(video_id, languages).ok().map(|resolved| resolved.text)
    }

    /// Timed segments in the preferred languages. There is no fallback to
    /// other listed transcripts here.
    pub fn extract_transcript_with_timestamps(
        &self,
        video_id: &VideoId,
        languages: Option<&[String]>,
    ) -> Option<Vec<TranscriptSegment>> {
        let languages = self.languages_or_default(languages);
        match self.source.fetch(video_id, languages) {
            Ok(segments) => Some(segments),
            Err(e) => {
                tracing::error!("Error extracting timestamped transcript for {}: {}", video_id, e);
                None
            }
        }
    }
}
