use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use yt_summarizer::config::Config;
use yt_summarizer::output::{
    render_batch, render_segments, render_summary, write_output, SummaryFormat, SummaryRecord,
    TranscriptFormat,
};
use yt_summarizer::summarize::{LlmClient, Summarizer, SummaryStyle, TextGenerator};
use yt_summarizer::transcript::{
    clean, normalize_video_id, TranscriptFetcher, TranscriptLister, TranscriptResolver, VideoId,
    YouTubeClient,
};

/// Everything `summarize` needs besides the video itself.
#[derive(Debug, Clone, Default)]
pub struct SummarizeOptions {
    pub style: SummaryStyle,
    pub max_length: Option<u32>,
    pub custom_prompt: Option<String>,
    pub languages: Vec<String>,
    pub clean: bool,
    pub questions: bool,
    pub topics: Option<usize>,
}

fn parse_reference(reference: &str) -> Result<VideoId> {
    normalize_video_id(reference)
        .with_context(|| format!("Could not extract video ID from: {}", reference))
}

fn youtube_resolver(config: &Config) -> Result<TranscriptResolver<YouTubeClient>> {
    let client = YouTubeClient::new(config.transcript.timeout_secs)?;
    Ok(TranscriptResolver::with_default_languages(
        client,
        config.transcript.languages.clone(),
    ))
}

fn languages_arg(languages: &[String]) -> Option<&[String]> {
    (!languages.is_empty()).then_some(languages)
}

/// Resolve, optionally save and clean, then summarize one video.
pub fn summarize_video<S, G>(
    resolver: &TranscriptResolver<S>,
    summarizer: &Summarizer<G>,
    video_id: &VideoId,
    options: &SummarizeOptions,
    save_transcript: Option<&Path>,
) -> Result<SummaryRecord>
where
    S: TranscriptLister + TranscriptFetcher,
    G: TextGenerator,
{
    let resolved = resolver
        .resolve(video_id, languages_arg(&options.languages))
        .with_context(|| format!("Failed to extract transcript for {}", video_id))?;

    if let Some(path) = save_transcript {
        write_output(&resolved.text, Some(path))?;
    }

    let transcript = if options.clean {
        clean(&resolved.text)
    } else {
        resolved.text
    };

    let mut record = if options.questions {
        let result = summarizer
            .summarize_with_questions(&transcript)
            .context("Failed to generate summary")?;
        SummaryRecord::new(video_id.clone(), options.style, &transcript, String::new())
            .with_questions(result)
    } else {
        let summary = summarizer
            .summarize(
                &transcript,
                options.style,
                options.max_length,
                options.custom_prompt.as_deref(),
            )
            .context("Failed to generate summary")?;
        SummaryRecord::new(video_id.clone(), options.style, &transcript, summary)
    };

    if let Some(count) = options.topics {
        match summarizer.extract_key_topics(&transcript, count) {
            Some(topics) => record = record.with_topics(topics),
            None => tracing::warn!("Key topics unavailable for {}", video_id),
        }
    }

    Ok(record)
}

pub fn run_summarize(
    config: &Config,
    reference: &str,
    options: &SummarizeOptions,
    format: SummaryFormat,
    output: Option<&Path>,
    save_transcript: Option<&Path>,
) -> Result<()> {
    // Credential check happens before any network traffic.
    let summarizer = Summarizer::new(LlmClient::from_config(&config.llm)?);
    let video_id = parse_reference(reference)?;
    tracing::info!("Processing video: {}", video_id);

    let resolver = youtube_resolver(config)?;
    let record = summarize_video(&resolver, &summarizer, &video_id, options, save_transcript)?;
    write_output(&render_summary(&record, format)?, output)
}

/// Render a transcript in the requested format. Segment formats and
/// `--timestamps` use the preferred languages only.
pub fn extract_video<S>(
    resolver: &TranscriptResolver<S>,
    video_id: &VideoId,
    languages: &[String],
    format: TranscriptFormat,
    timestamps: bool,
) -> Result<String>
where
    S: TranscriptLister + TranscriptFetcher,
{
    if timestamps || format != TranscriptFormat::Text {
        let segments = resolver
            .extract_transcript_with_timestamps(video_id, languages_arg(languages))
            .with_context(|| format!("Failed to extract transcript for {}", video_id))?;
        return render_segments(&segments, format);
    }

    let resolved = resolver
        .resolve(video_id, languages_arg(languages))
        .with_context(|| format!("Failed to extract transcript for {}", video_id))?;
    Ok(resolved.text)
}

pub fn run_extract(
    config: &Config,
    reference: &str,
    languages: &[String],
    format: TranscriptFormat,
    timestamps: bool,
    output: Option<&Path>,
) -> Result<()> {
    let video_id = parse_reference(reference)?;
    let resolver = youtube_resolver(config)?;
    let content = extract_video(&resolver, &video_id, languages, format, timestamps)?;
    write_output(&content, output)
}

/// Non-blank trimmed lines of a batch input file.
pub fn read_batch_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<SummaryRecord>,
    pub failed: Vec<String>,
}

/// Summarize each reference in order. A failure is recorded and the run continues.
pub fn process_batch<S, G>(
    resolver: &TranscriptResolver<S>,
    summarizer: &Summarizer<G>,
    references: &[String],
    options: &SummarizeOptions,
) -> BatchReport
where
    S: TranscriptLister + TranscriptFetcher,
    G: TextGenerator,
{
    let mut report = BatchReport::default();

    for (i, reference) in references.iter().enumerate() {
        let Some(video_id) = normalize_video_id(reference) else {
            report.failed.push(format!("Invalid URL: {}", reference));
            continue;
        };
        tracing::info!("[{}/{}] Processing {}", i + 1, references.len(), video_id);

        match summarize_video(resolver, summarizer, &video_id, options, None) {
            Ok(record) => report.succeeded.push(record.with_url(reference.as_str())),
            Err(e) => {
                tracing::warn!("Batch entry {} failed: {:#}", video_id, e);
                report.failed.push(format!("{}: {:#}", video_id, e));
            }
        }
    }

    report
}

/// Write one file per video into `output_dir`, or a combined
/// `batch_results.<ext>` into `fallback_dir`.
pub fn write_batch_outputs(
    records: &[SummaryRecord],
    format: SummaryFormat,
    output_dir: Option<&Path>,
    fallback_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            for record in records {
                let path = dir.join(format!("{}.{}", record.video_id, format.extension()));
                write_output(&render_summary(record, format)?, Some(&path))?;
                written.push(path);
            }
        }
        None if !records.is_empty() => {
            let path = fallback_dir.join(format!("batch_results.{}", format.extension()));
            write_output(&render_batch(records, format)?, Some(&path))?;
            written.push(path);
        }
        None => {}
    }

    Ok(written)
}

pub fn run_batch(
    config: &Config,
    input_file: &Path,
    options: &SummarizeOptions,
    format: SummaryFormat,
    output_dir: Option<&Path>,
) -> Result<()> {
    let references = read_batch_file(input_file)?;
    if references.is_empty() {
        anyhow::bail!("No URLs found in {}", input_file.display());
    }

    let summarizer = Summarizer::new(LlmClient::from_config(&config.llm)?);
    let resolver = youtube_resolver(config)?;
    tracing::info!("Processing {} videos", references.len());

    let report = process_batch(&resolver, &summarizer, &references, options);
    let written = write_batch_outputs(&report.succeeded, format, output_dir, Path::new("."))?;

    println!("Successfully processed {} videos", report.succeeded.len());
    if !report.failed.is_empty() {
        println!("Failed to process {} videos:", report.failed.len());
        for failure in &report.failed {
            println!("  {}", failure);
        }
    }
    if output_dir.is_none() {
        for path in &written {
            println!("Batch results saved to {}", path.display());
        }
    }

    Ok(())
}

pub fn run_info(config: &Config, reference: &str) -> Result<()> {
    let video_id = parse_reference(reference)?;
    let resolver = youtube_resolver(config)?;
    let transcripts = resolver.list_transcripts(&video_id);

    if transcripts.is_empty() {
        println!("No transcripts available for {}", video_id);
        return Ok(());
    }

    println!("Found {} available transcript(s) for {}:", transcripts.len(), video_id);
    for t in &transcripts {
        let kind = if t.is_generated { "auto-generated" } else { "manual" };
        let translatable = if t.is_translatable { " | translatable" } else { "" };
        println!("  {} ({}) - {}{}", t.language, t.language_code, kind, translatable);
    }
    Ok(())
}

pub fn show_config(config: &Config, config_path: Option<&Path>) -> Result<()> {
    match config_path {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: none (using defaults)"),
    }

    let mut shown = config.clone();
    if !shown.llm.api_key.is_empty() {
        shown.llm.api_key = "[REDACTED]".to_string();
    }
    println!("{}", toml::to_string_pretty(&shown).context("Failed to render config")?);

    match LlmClient::from_config(&config.llm) {
        Ok(client) => {
            let info = client.model_info();
            println!("Model:      {}", info.model);
            println!("API base:   {}", info.api_base);
            println!("API key:    {}", if info.api_key_set { "set" } else { "not set" });
        }
        Err(e) => println!("LLM client unavailable: {:#}", e),
    }
    Ok(())
}

pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it",
            path.display()
        );
    }
    write_output(&Config::generate_default_commented(), Some(path))?;
    println!("Config written to {}", path.display());
    Ok(())
}

/// Where `config init` writes when no `--config` path is given.
pub fn default_init_path() -> Result<PathBuf> {
    Config::platform_config_path().context("Could not determine the platform config directory")
}
