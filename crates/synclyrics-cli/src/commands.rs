//! Subcommand implementations

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use synclyrics_lib::core::captions::timecode::to_display_timestamp;
use synclyrics_lib::core::captions::{export_srt, export_vtt, parse_srt, Caption, UlidIdGenerator};
use synclyrics_lib::core::fs::{atomic_write_bytes, read_text_file};
use synclyrics_lib::core::is_valid_time_sec;
use synclyrics_lib::core::playback::{ManualClock, PlaybackAdapter, WallClock};
use synclyrics_lib::core::settings::SyncSettings;
use synclyrics_lib::core::timeline::SyncOutcome;
use synclyrics_lib::{action_for_key, ActionOutcome, SyncSession};

use crate::input::{parse_command, InputCommand, HELP};

/// Output format for `convert`
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Srt,
    Vtt,
}

// =============================================================================
// sync
// =============================================================================

/// Replays recorded tap times against a lyrics file and writes the export
pub fn sync(
    settings: SyncSettings,
    lyrics: &Path,
    taps: &[f64],
    media: Option<&Path>,
    out_dir: &Path,
) -> Result<PathBuf> {
    let mut session = SyncSession::new(ManualClock::new(), settings);
    session
        .import_file(lyrics)
        .with_context(|| format!("Failed to import {}", lyrics.display()))?;
    if let Some(media) = media {
        session.load_media(media);
    }

    let mut synced = 0;
    for &tap in taps {
        session.scrub(tap);
        match session.sync() {
            SyncOutcome::Synced { .. } => synced += 1,
            SyncOutcome::EndOfTimeline => {
                warn!("Tap at {:.3}s ignored: every line is already synced", tap);
            }
        }
    }
    info!("Applied {} of {} tap(s)", synced, taps.len());

    let path = session
        .export_to_dir(out_dir)
        .with_context(|| format!("Failed to write export to {}", out_dir.display()))?;
    println!("Wrote {} ({} line(s) synced)", path.display(), synced);
    Ok(path)
}

// =============================================================================
// convert
// =============================================================================

/// Re-exports a document as SRT or WebVTT
pub fn convert(input: &Path, format: ExportFormat, output: Option<&Path>) -> Result<()> {
    let captions = load_captions(input)?;
    let contents = match format {
        ExportFormat::Srt => export_srt(&captions),
        ExportFormat::Vtt => export_vtt(&captions),
    };

    match output {
        Some(path) => {
            atomic_write_bytes(path, contents.as_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {} caption(s) to {}", captions.len(), path.display());
        }
        None => print!("{}", contents),
    }
    Ok(())
}

// =============================================================================
// inspect
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectReport<'a> {
    total: usize,
    synced: usize,
    degenerate: usize,
    captions: &'a [Caption],
}

/// Prints the captions of a document with their times
pub fn inspect(input: &Path, json: bool) -> Result<()> {
    let captions = load_captions(input)?;
    let report = InspectReport {
        total: captions.len(),
        synced: captions.iter().filter(|c| c.is_synced()).count(),
        degenerate: captions.iter().filter(|c| c.is_degenerate()).count(),
        captions: &captions,
    };

    if json {
        let output = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", output);
        return Ok(());
    }

    print_captions(&captions, None);
    println!(
        "\n{} line(s), {} synced, {} shorter than the minimum duration",
        report.total, report.synced, report.degenerate
    );
    Ok(())
}

fn load_captions(input: &Path) -> Result<Vec<Caption>> {
    let text = read_text_file(input).with_context(|| format!("Failed to read {}", input.display()))?;
    Ok(parse_srt(&text, &mut UlidIdGenerator))
}

fn print_captions(captions: &[Caption], active: Option<usize>) {
    for (index, caption) in captions.iter().enumerate() {
        let marker = if Some(index) == active { '>' } else { ' ' };
        println!(
            "{} {:>3}  {:>9} - {:<9}  {}",
            marker,
            index + 1,
            to_display_timestamp(caption.start_sec),
            to_display_timestamp(caption.end_sec),
            caption.text.replace('\n', " / ")
        );
    }
}

// =============================================================================
// run
// =============================================================================

/// Interactive sync session on a wall clock, driven by stdin lines
pub async fn run(
    settings: SyncSettings,
    lyrics: &Path,
    media: Option<&Path>,
    duration: Option<f64>,
    out_dir: &Path,
) -> Result<()> {
    if duration.is_some_and(|d| !is_valid_time_sec(d) || d == 0.0) {
        bail!("Duration must be a positive number of seconds");
    }

    let tick_interval = Duration::from_millis(settings.tick_interval_ms);
    let mut session = SyncSession::new(WallClock::new(duration), settings);
    let count = session
        .import_file(lyrics)
        .with_context(|| format!("Failed to import {}", lyrics.display()))?;
    if let Some(media) = media {
        session.load_media(media);
    }

    println!("{} line(s) loaded. Type ? for help, Enter to sync.", count);

    let mut ticker = tokio::time::interval(tick_interval);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown: Option<usize> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let active = session.tick();
                if active != shown {
                    shown = active;
                    show_active(&session);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                if !handle_line(&mut session, &line, out_dir)? {
                    break;
                }
                shown = session.active_index();
            }
        }
    }

    info!("Session ended");
    Ok(())
}

/// Handles one input line. Returns false when the session should end.
fn handle_line<P: PlaybackAdapter>(
    session: &mut SyncSession<P>,
    line: &str,
    out_dir: &Path,
) -> Result<bool> {
    let command = match parse_command(line, session.settings().nudge_step_sec) {
        Ok(command) => command,
        Err(e) => {
            println!("{}", e);
            return Ok(true);
        }
    };

    let action = match command {
        InputCommand::Key(press) => {
            match action_for_key(press, session.settings().seek_step_sec, false) {
                Some(action) => action,
                None => return Ok(true),
            }
        }
        InputCommand::Action(action) => action,
        InputCommand::Edit(path) => {
            match read_text_file(&path) {
                Ok(text) => {
                    let count = session.save_editor(&text);
                    println!("{} line(s) after edit", count);
                }
                Err(e) => println!("Could not read {}: {}", path.display(), e),
            }
            return Ok(true);
        }
        InputCommand::Write => {
            let path = session
                .export_to_dir(out_dir)
                .with_context(|| format!("Failed to write export to {}", out_dir.display()))?;
            println!("Wrote {}", path.display());
            return Ok(true);
        }
        InputCommand::List => {
            print_captions(session.captions(), session.active_index());
            return Ok(true);
        }
        InputCommand::Help => {
            println!("{}", HELP);
            return Ok(true);
        }
        InputCommand::Quit => return Ok(false),
    };

    match session.dispatch(action) {
        Ok(outcome) => report(session, &outcome),
        Err(e) => println!("{}", e),
    }
    Ok(true)
}

fn report<P: PlaybackAdapter>(session: &SyncSession<P>, outcome: &ActionOutcome) {
    let now = to_display_timestamp(Some(session.current_time()));
    match outcome {
        ActionOutcome::Playing(true) => println!("Playing from {}", now),
        ActionOutcome::Playing(false) => println!("Paused at {}", now),
        ActionOutcome::Synced { .. } | ActionOutcome::Jumped { .. } | ActionOutcome::Restored { .. } => {
            show_active(session)
        }
        ActionOutcome::Adjusted { index } => {
            let start = session.captions().get(*index).and_then(|c| c.start_sec);
            println!("Line {} now starts at {}", index + 1, to_display_timestamp(start));
        }
        ActionOutcome::EndOfTimeline => println!("Every line is synced. Type w to write the export."),
        ActionOutcome::Seeked { .. } => println!("At {}", now),
        ActionOutcome::Exported(document) => println!("Export ready: {}", document.file_name),
        ActionOutcome::Unchanged => println!("Nothing to do"),
    }
}

fn show_active<P: PlaybackAdapter>(session: &SyncSession<P>) {
    let now = to_display_timestamp(Some(session.current_time()));
    match session.timeline().active_caption() {
        Some(caption) => println!(
            "[{}] {:>3}  {}",
            now,
            session.active_index().map_or(0, |index| index + 1),
            caption.text
        ),
        None => println!("[{}]   -", now),
    }
}
