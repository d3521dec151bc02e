use clap::{Parser, Subcommand};
use std::path::PathBuf;

use yt_summarizer::output::{SummaryFormat, TranscriptFormat};
use yt_summarizer::summarize::SummaryStyle;

#[derive(Parser, Debug)]
#[command(
    name = "yt-summarizer",
    version,
    about = "Extract YouTube transcripts and summarize them with an OpenAI-compatible model"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API key (overrides config and OPENAI_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// API base URL (overrides config and OPENAI_API_BASE)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Model name
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a single video
    Summarize {
        /// Video URL or 11-character video ID
        url_or_video_id: String,

        #[arg(short, long, value_enum, default_value_t = SummaryStyle::Detailed)]
        style: SummaryStyle,

        /// Keep the summary under this many words
        #[arg(short = 'l', long)]
        max_length: Option<u32>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long = "format", value_enum, default_value_t = SummaryFormat::Text)]
        format: SummaryFormat,

        /// Preferred transcript language (repeatable)
        #[arg(long = "language")]
        languages: Vec<String>,

        /// Also save the raw transcript to this file
        #[arg(long)]
        save_transcript: Option<PathBuf>,

        /// Instruction replacing the style template
        #[arg(long)]
        custom_prompt: Option<String>,

        /// Strip bracketed annotations before summarizing
        #[arg(long)]
        clean: bool,

        /// Include the key questions the video answers
        #[arg(long)]
        questions: bool,

        /// Append this many key topics
        #[arg(long)]
        topics: Option<usize>,
    },

    /// Extract the transcript without summarizing
    Extract {
        url_or_video_id: String,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long = "format", value_enum, default_value_t = TranscriptFormat::Text)]
        format: TranscriptFormat,

        #[arg(long = "language")]
        languages: Vec<String>,

        /// Prefix each segment with its start time
        #[arg(long)]
        timestamps: bool,
    },

    /// Summarize every URL or ID listed in a file, one per line
    Batch {
        input_file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = SummaryStyle::Detailed)]
        style: SummaryStyle,

        /// Write one file per video into this directory
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,

        #[arg(short, long = "format", value_enum, default_value_t = SummaryFormat::Text)]
        format: SummaryFormat,

        #[arg(short = 'l', long)]
        max_length: Option<u32>,
    },

    /// List the transcripts a video offers
    Info { url_or_video_id: String },

    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a commented default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_summarize_defaults() {
        let cli = Cli::try_parse_from(["yt-summarizer", "summarize", "dQw4w9WgXcQ"]).unwrap();
        match cli.command {
            Commands::Summarize {
                style,
                format,
                languages,
                max_length,
                ..
            } => {
                assert_eq!(style, SummaryStyle::Detailed);
                assert_eq!(format, SummaryFormat::Text);
                assert!(languages.is_empty());
                assert_eq!(max_length, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_summarize_options() {
        let cli = Cli::try_parse_from([
            "yt-summarizer",
            "--model",
            "gpt-4o-mini",
            "summarize",
            "dQw4w9WgXcQ",
            "-s",
            "bullet_points",
            "-l",
            "50",
            "-f",
            "markdown",
            "--language",
            "de",
            "--language",
            "en",
            "--topics",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.model.as_deref(), Some("gpt-4o-mini"));
        match cli.command {
            Commands::Summarize {
                style,
                format,
                languages,
                max_length,
                topics,
                ..
            } => {
                assert_eq!(style, SummaryStyle::BulletPoints);
                assert_eq!(format, SummaryFormat::Markdown);
                assert_eq!(languages, vec!["de", "en"]);
                assert_eq!(max_length, Some(50));
                assert_eq!(topics, Some(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_extract_srt() {
        let cli =
            Cli::try_parse_from(["yt-summarizer", "extract", "dQw4w9WgXcQ", "-f", "srt"]).unwrap();
        match cli.command {
            Commands::Extract { format, timestamps, .. } => {
                assert_eq!(format, TranscriptFormat::Srt);
                assert!(!timestamps);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_batch_and_config() {
        let cli = Cli::try_parse_from(["yt-summarizer", "batch", "urls.txt", "-d", "out"]).unwrap();
        assert!(matches!(cli.command, Commands::Batch { output_dir: Some(_), .. }));

        let cli = Cli::try_parse_from(["yt-summarizer", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config { action: ConfigAction::Init { force: true } }
        ));
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["yt-summarizer", "-v", "-q", "info", "x"]).is_err());
    }
}
