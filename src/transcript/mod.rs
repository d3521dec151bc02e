pub mod backend;
pub mod clean;
pub mod error;
pub mod resolver;
pub mod video_id;
pub mod youtube;

pub use backend::{TranscriptDescriptor, TranscriptFetcher, TranscriptLister, TranscriptSegment};
pub use clean::clean;
pub use error::TranscriptError;
pub use resolver::{FailureReason, ResolveFailure, ResolvedTranscript, TranscriptResolver};
pub use video_id::{normalize_video_id, VideoId};
pub use youtube::YouTubeClient;
