use serde::{Deserialize, Serialize};

use super::llm::{ChatMessage, GenerationRequest};

/// Marker separating the summary from the question list in a questions response.
pub const QUESTIONS_MARKER: &str = "KEY QUESTIONS ANSWERED:";
const SUMMARY_MARKER: &str = "SUMMARY:";
pub const QUESTIONS_PLACEHOLDER: &str = "Could not extract specific questions.";

const SUMMARY_TEMPERATURE: f32 = 0.3;
const SUMMARY_MAX_TOKENS: u32 = 2000;
const TOPICS_TEMPERATURE: f32 = 0.2;
const TOPICS_MAX_TOKENS: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStyle {
    Brief,
    #[default]
    Detailed,
    #[value(alias = "bullet_points")]
    BulletPoints,
    #[value(alias = "key_insights")]
    KeyInsights,
    Academic,
    Casual,
}

impl SummaryStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStyle::Brief => "brief",
            SummaryStyle::Detailed => "detailed",
            SummaryStyle::BulletPoints => "bullet_points",
            SummaryStyle::KeyInsights => "key_insights",
            SummaryStyle::Academic => "academic",
            SummaryStyle::Casual => "casual",
        }
    }

    /// Instruction text sent as the system message for this style.
    pub fn template(&self) -> &'static str {
        match self {
            SummaryStyle::Brief => {
                "Provide a brief, concise summary of this video transcript in 2-3 sentences.\n\
                 Focus on the main topic and key takeaway."
            }
            SummaryStyle::Detailed => {
                "Provide a comprehensive summary of this video transcript.\n\
                 Include the main topics, key points, important details, and conclusions.\n\
                 Organize the summary in clear paragraphs."
            }
            SummaryStyle::BulletPoints => {
                "Summarize this video transcript using bullet points.\n\
                 - Start with the main topic\n\
                 - List key points and important information\n\
                 - Include any conclusions or takeaways\n\
                 Use clear, concise bullet points."
            }
            SummaryStyle::KeyInsights => {
                "Extract and summarize the key insights from this video transcript.\n\
                 Focus on:\n\
                 - Main insights and learnings\n\
                 - Important facts or data mentioned\n\
                 - Actionable advice or recommendations\n\
                 - Notable quotes or statements"
            }
            SummaryStyle::Academic => {
                "Provide an academic-style summary of this video transcript.\n\
                 Structure it with:\n\
                 - Abstract/Overview\n\
                 - Main arguments or points\n\
                 - Supporting evidence or examples\n\
                 - Conclusions\n\
                 Use formal, scholarly language."
            }
            SummaryStyle::Casual => {
                "Summarize this video transcript in a casual, conversational tone.\n\
                 Make it easy to read and understand, as if explaining to a friend.\n\
                 Include the main points and interesting details in a relaxed style."
            }
        }
    }
}

impl std::fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A summary split from the list of questions the video answers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionSummary {
    pub summary: String,
    pub questions: String,
}

/// Build the request for a plain summary.
/// A custom instruction replaces the style template; a word limit is appended either way.
pub fn build_summary_request(
    transcript: &str,
    style: SummaryStyle,
    max_length: Option<u32>,
    custom_instruction: Option<&str>,
) -> GenerationRequest {
    let mut system = match custom_instruction {
        Some(custom) if !custom.trim().is_empty() => custom.to_string(),
        _ => style.template().to_string(),
    };
    if let Some(words) = max_length {
        system.push_str(&format!("\n\nKeep the summary under {} words.", words));
    }

    GenerationRequest {
        messages: vec![
            ChatMessage::system(system),
            ChatMessage::user(format!(
                "Please summarize this video transcript:\n\n{}",
                transcript
            )),
        ],
        temperature: SUMMARY_TEMPERATURE,
        max_tokens: SUMMARY_MAX_TOKENS,
    }
}

pub fn build_questions_request(transcript: &str) -> GenerationRequest {
    let system = format!(
        "Analyze this video transcript and provide:\n\
         1. A comprehensive summary of the main content\n\
         2. A list of key questions that this video answers\n\n\
         Format your response as:\n\
         {SUMMARY_MARKER}\n\
         [Your summary here]\n\n\
         {QUESTIONS_MARKER}\n\
         - [Question 1]\n\
         - [Question 2]\n\
         - [etc.]"
    );

    GenerationRequest {
        messages: vec![
            ChatMessage::system(system),
            ChatMessage::user(format!("Transcript:\n\n{}", transcript)),
        ],
        temperature: SUMMARY_TEMPERATURE,
        max_tokens: SUMMARY_MAX_TOKENS,
    }
}

pub fn build_topics_request(transcript: &str, count: usize) -> GenerationRequest {
    let system = format!(
        "Extract the {count} most important topics discussed in this video transcript.\n\
         Return only the topics, one per line, without numbers or bullets.\n\
         Focus on the main themes and subjects covered."
    );

    GenerationRequest {
        messages: vec![
            ChatMessage::system(system),
            ChatMessage::user(format!("Transcript:\n\n{}", transcript)),
        ],
        temperature: TOPICS_TEMPERATURE,
        max_tokens: TOPICS_MAX_TOKENS,
    }
}

/// Split a questions response on [`QUESTIONS_MARKER`].
/// Anything other than exactly one marker yields the whole text as the summary.
pub fn parse_questions_response(content: &str) -> QuestionSummary {
    let content = content.trim();
    let parts: Vec<&str> = content.split(QUESTIONS_MARKER).collect();
    match parts.as_slice() {
        [summary, questions] => QuestionSummary {
            summary: summary.replace(SUMMARY_MARKER, "").trim().to_string(),
            questions: questions.trim().to_string(),
        },
        _ => QuestionSummary {
            summary: content.to_string(),
            questions: QUESTIONS_PLACEHOLDER.to_string(),
        },
    }
}

/// One topic per non-blank line, capped at `count`.
pub fn parse_topics(content: &str, count: usize) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(count)
        .map(str::to_string)
        .collect()
}
