pub mod llm;
pub mod prompt;
pub mod summarizer;

pub use llm::{ChatMessage, GenerationRequest, LlmClient, ModelInfo, TextGenerator};
pub use prompt::{QuestionSummary, SummaryStyle};
pub use summarizer::Summarizer;
