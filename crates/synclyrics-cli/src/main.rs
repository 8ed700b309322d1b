//! SyncLyrics CLI
//!
//! Tap-to-sync lyrics from the terminal, plus headless replay, conversion
//! and inspection of caption files.

mod commands;
mod input;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use synclyrics_lib::core::settings::{SettingsManager, SyncSettings};

use crate::commands::ExportFormat;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Parser)]
#[command(name = "synclyrics")]
#[command(about = "Sync lyrics and subtitles to media by tapping along")]
#[command(version)]
struct Cli {
    /// Log debug detail
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to a daily rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session: play, tap to sync, then write the export
    Run {
        /// Lyrics (plain text) or subtitle (SRT) file
        #[arg(short, long)]
        lyrics: PathBuf,

        /// Media file the lyrics belong to; names the export
        #[arg(short, long)]
        media: Option<PathBuf>,

        /// Media duration in seconds
        #[arg(long)]
        duration: Option<f64>,

        /// Directory for the export
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Replay recorded tap times and write the export
    Sync {
        /// Lyrics (plain text) or subtitle (SRT) file
        #[arg(short, long)]
        lyrics: PathBuf,

        /// Tap times in seconds, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        taps: Vec<f64>,

        /// Media file name used to name the export
        #[arg(short, long)]
        media: Option<PathBuf>,

        /// Directory for the export
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Convert a caption document to SRT or WebVTT
    Convert {
        /// Input SRT or plain text file
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "srt")]
        format: ExportFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the captions of a document
    Inspect {
        /// Input SRT or plain text file
        input: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_dir.as_deref());

    match cli.command {
        Commands::Run {
            lyrics,
            media,
            duration,
            out,
        } => {
            let settings = load_settings(cli.config.as_deref());
            commands::run(settings, &lyrics, media.as_deref(), duration, &out).await?
        }

        Commands::Sync {
            lyrics,
            taps,
            media,
            out,
        } => {
            let settings = load_settings(cli.config.as_deref());
            commands::sync(settings, &lyrics, &taps, media.as_deref(), &out)?;
        }

        Commands::Convert {
            input,
            format,
            output,
        } => commands::convert(&input, format, output.as_deref())?,

        Commands::Inspect { input, json } => commands::inspect(&input, json)?,
    }

    Ok(())
}

fn load_settings(config: Option<&Path>) -> SyncSettings {
    let manager = match config {
        Some(path) => SettingsManager::new(path.to_path_buf()),
        None => SettingsManager::in_config_dir(),
    };
    manager.load()
}

/// Logs go to stderr, or only to a rolling file when `log_dir` is set so an
/// interactive session's output stays readable.
fn init_logging(verbose: bool, log_dir: Option<&Path>) {
    use tracing_subscriber::prelude::*;

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = log_dir.and_then(|dir| {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Cannot create log dir {}: {}", dir.display(), e);
            return None;
        }
        let file_appender = tracing_appender::rolling::daily(dir, "synclyrics.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let _ = LOG_GUARD.set(guard);
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
    });

    let stderr_layer = file_layer.is_none().then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer);

    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sync_taps() {
        let cli = Cli::parse_from([
            "synclyrics",
            "sync",
            "--lyrics",
            "song.txt",
            "--taps",
            "1.0,2.5,4",
        ]);
        match cli.command {
            Commands::Sync { taps, out, .. } => {
                assert_eq!(taps, vec![1.0, 2.5, 4.0]);
                assert_eq!(out, PathBuf::from("."));
            }
            _ => panic!("expected sync"),
        }
    }

    #[test]
    fn test_parse_convert_format() {
        let cli = Cli::parse_from(["synclyrics", "--verbose", "convert", "in.srt", "-f", "vtt"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Convert {
                format: ExportFormat::Vtt,
                ..
            }
        ));
    }
}
