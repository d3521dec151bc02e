use super::llm::TextGenerator;
use super::prompt::{
    build_questions_request, build_summary_request, build_topics_request,
    parse_questions_response, parse_topics, QuestionSummary, SummaryStyle,
};

/// Produces summaries through a [`TextGenerator`].
///
/// Every operation returns `None` when generation fails; the cause is logged.
#[derive(Debug)]
pub struct Summarizer<G> {
    generator: G,
}

impl<G: TextGenerator> Summarizer<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn summarize(
        &self,
        transcript: &str,
        style: SummaryStyle,
        max_length: Option<u32>,
        custom_instruction: Option<&str>,
    ) -> Option<String> {
        let request = build_summary_request(transcript, style, max_length, custom_instruction);
        tracing::info!("Generating {} summary ({} chars of transcript)", style, transcript.len());

        match self.generator.generate(&request) {
            Ok(content) => {
                tracing::info!("Summary generated");
                Some(content.trim().to_string())
            }
            Err(e) => {
                tracing::error!("Error generating summary: {:#}", e);
                None
            }
        }
    }

    pub fn summarize_with_questions(&self, transcript: &str) -> Option<QuestionSummary> {
        let request = build_questions_request(transcript);
        match self.generator.generate(&request) {
            Ok(content) => Some(parse_questions_response(&content)),
            Err(e) => {
                tracing::error!("Error generating summary with questions: {:#}", e);
                None
            }
        }
    }

    pub fn extract_key_topics(&self, transcript: &str, count: usize) -> Option<Vec<String>> {
        let request = build_topics_request(transcript, count);
        match self.generator.generate(&request) {
            Ok(content) => Some(parse_topics(&content, count)),
            Err(e) => {
                tracing::error!("Error extracting key topics: {:#}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::llm::GenerationRequest;
    use std::cell::RefCell;

    /// Returns a canned reply (or error) and keeps every request it saw.
    struct CannedGenerator {
        reply: Result<String, String>,
        requests: RefCell<Vec<GenerationRequest>>,
    }

    impl CannedGenerator {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl TextGenerator for CannedGenerator {
        fn generate(&self, request: &GenerationRequest) -> anyhow::Result<String> {
            self.requests.borrow_mut().push(request.clone());
            self.reply.clone().map_err(|e| anyhow::anyhow!(e))
        }
    }

    #[test]
    fn test_summarize_brief_with_length_limit() {
        let summarizer = Summarizer::new(CannedGenerator::replying("  Short summary.\n"));
        let result = summarizer.summarize("some transcript", SummaryStyle::Brief, Some(50), None);
        assert_eq!(result.as_deref(), Some("Short summary."));

        let requests = summarizer.generator().requests.borrow();
        assert_eq!(requests.len(), 1);
        let system = &requests[0].messages[0].content;
        assert!(system.contains(SummaryStyle::Brief.template()));
        assert!(system.contains("50"));
        assert!(requests[0].messages[1].content.ends_with("some transcript"));
    }

    #[test]
    fn test_summarize_returns_none_on_error() {
        let summarizer = Summarizer::new(CannedGenerator::failing("HTTP 500"));
        assert_eq!(
            summarizer.summarize("text", SummaryStyle::Detailed, None, None),
            None
        );
    }

    #[test]
    fn test_summarize_with_questions() {
        let summarizer = Summarizer::new(CannedGenerator::replying(
            "SUMMARY:\nAbout caching.\nKEY QUESTIONS ANSWERED:\n- When to evict?",
        ));
        let result = summarizer.summarize_with_questions("text").unwrap();
        assert_eq!(result.summary, "About caching.");
        assert_eq!(result.questions, "- When to evict?");
    }

    #[test]
    fn test_summarize_with_questions_error() {
        let summarizer = Summarizer::new(CannedGenerator::failing("timeout"));
        assert!(summarizer.summarize_with_questions("text").is_none());
    }

    #[test]
    fn test_extract_key_topics_truncates() {
        let summarizer = Summarizer::new(CannedGenerator::replying("A\nB\nC\nD\nE\nF"));
        let topics = summarizer.extract_key_topics("text", 3).unwrap();
        assert_eq!(topics, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_extract_key_topics_never_pads() {
        let summarizer = Summarizer::new(CannedGenerator::replying("Only one"));
        let topics = summarizer.extract_key_topics("text", 5).unwrap();
        assert_eq!(topics, vec!["Only one"]);
    }

    #[test]
    fn test_extract_key_topics_error() {
        let summarizer = Summarizer::new(CannedGenerator::failing("bad key"));
        assert!(summarizer.extract_key_topics("text", 5).is_none());
    }
}
