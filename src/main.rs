mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction};
use commands::SummarizeOptions;
use tracing_subscriber::EnvFilter;
use yt_summarizer::config::Config;

fn log_filter(verbose: bool, quiet: bool) -> anyhow::Result<EnvFilter> {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return Ok(EnvFilter::from_default_env());
    }
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    Ok(EnvFilter::new("warn").add_directive(format!("yt_summarizer={}", level).parse()?))
}

fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, cli.quiet)?)
        .with_writer(std::io::stderr)
        .init();

    // `config init` must work before a config file exists
    let initializing = matches!(
        cli.command,
        Commands::Config {
            action: ConfigAction::Init { .. }
        }
    );
    let (mut config, config_path) = if initializing {
        (Config::default(), None)
    } else {
        Config::load_with_path(cli.config.as_deref())?
    };
    config.apply_overrides(
        cli.api_key.as_deref(),
        cli.api_base.as_deref(),
        cli.model.as_deref(),
    );
    tracing::debug!("Effective config: {:?}", config);

    match cli.command {
        Commands::Summarize {
            url_or_video_id,
            style,
            max_length,
            output,
            format,
            languages,
            save_transcript,
            custom_prompt,
            clean,
            questions,
            topics,
        } => {
            let options = SummarizeOptions {
                style,
                max_length,
                custom_prompt,
                languages,
                clean,
                questions,
                topics,
            };
            commands::run_summarize(
                &config,
                &url_or_video_id,
                &options,
                format,
                output.as_deref(),
                save_transcript.as_deref(),
            )
        }
        Commands::Extract {
            url_or_video_id,
            output,
            format,
            languages,
            timestamps,
        } => commands::run_extract(
            &config,
            &url_or_video_id,
            &languages,
            format,
            timestamps,
            output.as_deref(),
        ),
        Commands::Batch {
            input_file,
            style,
            output_dir,
            format,
            max_length,
        } => {
            let options = SummarizeOptions {
                style,
                max_length,
                ..Default::default()
            };
            commands::run_batch(&config, &input_file, &options, format, output_dir.as_deref())
        }
        Commands::Info { url_or_video_id } => commands::run_info(&config, &url_or_video_id),
        Commands::Config { action: ConfigAction::Show } => {
            commands::show_config(&config, config_path.as_deref())
        }
        Commands::Config {
            action: ConfigAction::Init { force },
        } => {
            let path = match cli.config {
                Some(path) => path,
                None => commands::default_init_path()?,
            };
            commands::init_config(&path, force)
        }
    }
}
