use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::summarize::{QuestionSummary, SummaryStyle};
use crate::transcript::{TranscriptSegment, VideoId};

const BATCH_SEPARATOR: &str = "==================================================";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SummaryFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl SummaryFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SummaryFormat::Text => "text",
            SummaryFormat::Json => "json",
            SummaryFormat::Markdown => "markdown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TranscriptFormat {
    #[default]
    Text,
    Json,
    Srt,
}

/// A generated summary plus the metadata written alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRecord {
    pub video_id: VideoId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub style: SummaryStyle,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
    pub transcript_length: usize,
    pub summary_length: usize,
    pub generated_at: String,
}

impl SummaryRecord {
    pub fn new(video_id: VideoId, style: SummaryStyle, transcript: &str, summary: String) -> Self {
        Self {
            video_id,
            url: None,
            style,
            transcript_length: word_count(transcript),
            summary_length: word_count(&summary),
            summary,
            questions: None,
            topics: None,
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Replace the summary with the question-aware variant.
    pub fn with_questions(mut self, result: QuestionSummary) -> Self {
        self.summary_length = word_count(&result.summary);
        self.summary = result.summary;
        self.questions = Some(result.questions);
        self
    }

    pub fn with_topics(mut self, topics: Vec<String>) -> Self {
        self.topics = Some(topics);
        self
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn render_summary(record: &SummaryRecord, format: SummaryFormat) -> Result<String> {
    match format {
        SummaryFormat::Text => Ok(summary_text(record)),
        SummaryFormat::Json => {
            serde_json::to_string_pretty(record).context("Failed to serialize summary")
        }
        SummaryFormat::Markdown => Ok(summary_markdown(record)),
    }
}

fn summary_text(record: &SummaryRecord) -> String {
    let mut out = record.summary.clone();
    if let Some(questions) = &record.questions {
        out.push_str("\n\nKey questions answered:\n");
        out.push_str(questions);
    }
    if let Some(topics) = &record.topics {
        out.push_str("\n\nKey topics:\n");
        for topic in topics {
            out.push_str(&format!("- {}\n", topic));
        }
        out.truncate(out.trim_end().len());
    }
    out
}

fn summary_markdown(record: &SummaryRecord) -> String {
    let mut lines = vec![
        "# Video Summary".to_string(),
        String::new(),
        format!("**Video ID:** {}", record.video_id),
    ];
    if let Some(url) = &record.url {
        lines.push(format!("**URL:** {}", url));
    }
    lines.push(format!("**Style:** {}", record.style));
    lines.push(String::new());
    lines.push("## Summary".to_string());
    lines.push(String::new());
    lines.push(record.summary.clone());

    if let Some(questions) = &record.questions {
        lines.push(String::new());
        lines.push("## Key Questions Answered".to_string());
        lines.push(String::new());
        lines.push(questions.clone());
    }
    if let Some(topics) = &record.topics {
        lines.push(String::new());
        lines.push("## Key Topics".to_string());
        lines.push(String::new());
        lines.extend(topics.iter().map(|t| format!("- {}", t)));
    }

    lines.join("\n")
}

/// Combined file for a batch run without an output directory.
pub fn render_batch(records: &[SummaryRecord], format: SummaryFormat) -> Result<String> {
    match format {
        SummaryFormat::Json => {
            serde_json::to_string_pretty(records).context("Failed to serialize batch results")
        }
        SummaryFormat::Text | SummaryFormat::Markdown => {
            let mut out = String::new();
            for record in records {
                out.push_str(&format!("=== {} ===\n", record.video_id));
                if let Some(url) = &record.url {
                    out.push_str(&format!("URL: {}\n", url));
                }
                out.push_str(&format!("Style: {}\n\n", record.style));
                out.push_str(&record.summary);
                out.push_str(&format!("\n\n{}\n\n", BATCH_SEPARATOR));
            }
            Ok(out)
        }
    }
}

pub fn render_segments(segments: &[TranscriptSegment], format: TranscriptFormat) -> Result<String> {
    match format {
        TranscriptFormat::Json => {
            serde_json::to_string_pretty(segments).context("Failed to serialize transcript")
        }
        TranscriptFormat::Srt => Ok(segments_to_srt(segments)),
        TranscriptFormat::Text => Ok(segments_to_timestamped_text(segments)),
    }
}

/// `HH:MM:SS,mmm` as used by SubRip cues.
pub fn format_srt_time(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

pub fn segments_to_srt(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .enumerate()
        .map(|(i, seg)| {
            format!(
                "{}\n{} --> {}\n{}\n",
                i + 1,
                format_srt_time(seg.start),
                format_srt_time(seg.end()),
                seg.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn segments_to_timestamped_text(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|seg| format!("[{:.2}s] {}", seg.start, seg.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write to `path` (creating parent directories) or print to stdout.
pub fn write_output(content: &str, path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        println!("{}", content);
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Output saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record() -> SummaryRecord {
        SummaryRecord::new(
            VideoId::parse("dQw4w9WgXcQ").unwrap(),
            SummaryStyle::BulletPoints,
            "one two three four",
            "short summary".to_string(),
        )
    }

    fn segment(text: &str, start: f64, duration: f64) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            start,
            duration,
        }
    }

    #[test]
    fn test_summary_record_lengths() {
        let r = record();
        assert_eq!(r.transcript_length, 4);
        assert_eq!(r.summary_length, 2);
        assert!(chrono::DateTime::parse_from_rfc3339(&r.generated_at).is_ok());
    }

    #[test]
    fn test_render_summary_json() {
        let json = render_summary(&record(), SummaryFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["video_id"], "dQw4w9WgXcQ");
        assert_eq!(value["style"], "bullet_points");
        assert_eq!(value["summary"], "short summary");
        assert_eq!(value["transcript_length"], 4);
        assert!(value.get("url").is_none());
        assert!(value.get("generated_at").is_some());
    }

    #[test]
    fn test_render_summary_markdown() {
        let md = render_summary(
            &record().with_url("https://youtu.be/dQw4w9WgXcQ"),
            SummaryFormat::Markdown,
        )
        .unwrap();
        assert!(md.starts_with("# Video Summary\n\n**Video ID:** dQw4w9WgXcQ\n"));
        assert!(md.contains("**URL:** https://youtu.be/dQw4w9WgXcQ"));
        assert!(md.contains("**Style:** bullet_points"));
        assert!(md.ends_with("## Summary\n\nshort summary"));
    }

    #[test]
    fn test_render_summary_text_with_extras() {
        let r = record()
            .with_questions(QuestionSummary {
                summary: "new summary".to_string(),
                questions: "- Why?".to_string(),
            })
            .with_topics(vec!["Caching".to_string(), "Eviction".to_string()]);
        let text = render_summary(&r, SummaryFormat::Text).unwrap();
        assert_eq!(
            text,
            "new summary\n\nKey questions answered:\n- Why?\n\nKey topics:\n- Caching\n- Eviction"
        );
    }

    #[test]
    fn test_render_batch_text() {
        let records = vec![record().with_url("u1")];
        let out = render_batch(&records, SummaryFormat::Text).unwrap();
        assert!(out.starts_with("=== dQw4w9WgXcQ ===\nURL: u1\nStyle: bullet_points\n\nshort summary"));
        assert!(out.contains(BATCH_SEPARATOR));
    }

    #[test]
    fn test_render_batch_json_is_array() {
        let records = vec![record().with_url("u1"), record().with_url("u2")];
        let out = render_batch(&records, SummaryFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1]["url"], "u2");
    }

    #[test]
    fn test_format_srt_time() {
        assert_eq!(format_srt_time(0.0), "00:00:00,000");
        assert_eq!(format_srt_time(1.5), "00:00:01,500");
        assert_eq!(format_srt_time(3723.25), "01:02:03,250");
    }

    #[test]
    fn test_segments_to_srt() {
        let segments = vec![segment("Hello", 0.0, 1.5), segment("World", 1.5, 2.0)];
        assert_eq!(
            segments_to_srt(&segments),
            "1\n00:00:00,000 --> 00:00:01,500\nHello\n\n2\n00:00:01,500 --> 00:00:03,500\nWorld\n"
        );
    }

    #[test]
    fn test_segments_to_timestamped_text() {
        let segments = vec![segment("Hello", 12.346, 1.0), segment("World", 60.0, 1.0)];
        assert_eq!(
            segments_to_timestamped_text(&segments),
            "[12.35s] Hello\n[60.00s] World"
        );
    }

    #[test]
    fn test_render_segments_json() {
        let segments = vec![segment("Hello", 0.5, 1.0)];
        let json = render_segments(&segments, TranscriptFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["text"], "Hello");
        assert_eq!(value[0]["start"], 0.5);
        assert_eq!(value[0]["duration"], 1.0);
    }

    #[test]
    fn test_write_output_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("dir").join("summary.md");
        write_output("content", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_extension() {
        assert_eq!(SummaryFormat::Markdown.extension(), "markdown");
        assert_eq!(SummaryFormat::Json.extension(), "json");
    }
}
