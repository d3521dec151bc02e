use serde::{Deserialize, Serialize};

use crate::transcript::error::TranscriptError;
use crate::transcript::video_id::VideoId;

/// Metadata for one transcript variant a video offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptDescriptor {
    pub language: String,
    pub language_code: String,
    pub is_generated: bool,
    pub is_translatable: bool,
    /// Where the listing service says this transcript can be fetched from.
    #[serde(skip)]
    pub fetch_url: String,
}

/// One timed unit of transcript text. Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

impl TranscriptSegment {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Lists every transcript available for a video.
pub trait TranscriptLister {
    fn list(&self, video_id: &VideoId) -> Result<Vec<TranscriptDescriptor>, TranscriptError>;
}

/// Fetches transcript content.
pub trait TranscriptFetcher {
    /// Fetch the best match for `languages`, tried in order.
    fn fetch(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> Result<Vec<TranscriptSegment>, TranscriptError>;

    /// Fetch exactly the transcript a listing returned.
    fn fetch_one(
        &self,
        descriptor: &TranscriptDescriptor,
    ) -> Result<Vec<TranscriptSegment>, TranscriptError>;
}

/// Flatten segments into plain text, one segment per line.
pub fn segments_to_text(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
