//! Caption Format Parsers and Exporters
//!
//! Supports:
//! - SRT (SubRip) parsing, with a plain-text fallback for bare lyrics
//! - SRT and WebVTT export
//!
//! # Example
//!
//! ```rust,ignore
//! use synclyrics_lib::core::captions::{parse_srt, export_vtt, UlidIdGenerator};
//!
//! let captions = parse_srt("Hello\nWorld", &mut UlidIdGenerator);
//! assert_eq!(captions.len(), 2);
//! let vtt = export_vtt(&captions);
//! ```

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use super::timecode::{parse_srt_timestamp, to_srt_timestamp, to_vtt_timestamp};
use super::{Caption, IdGenerator};
use crate::core::{TimeSec, DEFAULT_CAPTION_SEC};

/// MIME type used for exported SRT documents
pub const SRT_MIME_TYPE: &str = "text/srt";

const EXPORT_PREFIX: &str = "synced_";
const EXPORT_FALLBACK_STEM: &str = "subtitles";

// =============================================================================
// SRT Parsing
// =============================================================================

fn srt_block_regex() -> &'static Regex {
    static SRT_BLOCK: OnceLock<Regex> = OnceLock::new();
    SRT_BLOCK.get_or_init(|| {
        Regex::new(
            r"(\d+)[ \t]*\n[ \t]*(\d+:\d{2}:\d{2}[,.]\d{3})[ \t]*-->[ \t]*(\d+:\d{2}:\d{2}[,.]\d{3})[^\n]*(?:\n([\s\S]*))?",
        )
        .expect("SRT block pattern is valid")
    })
}

fn blank_line_regex() -> &'static Regex {
    static BLANK_LINE: OnceLock<Regex> = OnceLock::new();
    BLANK_LINE.get_or_init(|| Regex::new(r"\n[ \t]*\n\s*").expect("blank line pattern is valid"))
}

/// Converts `\r\n` and lone `\r` line endings to `\n`
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Parses SRT (SubRip) content into a list of captions.
///
/// Every caption receives a fresh id from `ids`. If the document holds no
/// SRT block at all but is not blank, each non-blank line becomes one
/// untimed caption, so plain lyrics can be loaded directly.
///
/// # SRT Format
///
/// ```text
/// 1
/// 00:00:01,000 --> 00:00:04,000
/// First caption text
///
/// 2
/// 00:00:05,500 --> 00:00:08,000
/// Second caption text
/// with multiple lines
/// ```
///
/// Parsing never fails: malformed timestamps read as `0` and unrecognized
/// blocks are skipped.
pub fn parse_srt(document: &str, ids: &mut dyn IdGenerator) -> Vec<Caption> {
    let normalized = normalize_line_endings(document);
    let block_regex = srt_block_regex();

    let mut captions = Vec::new();
    for block in blank_line_regex().split(&normalized) {
        let Some(caps) = block_regex.captures(block) else {
            if !block.trim().is_empty() {
                debug!("Skipping unrecognized SRT block: {:?}", block);
            }
            continue;
        };

        if let Some(whole) = caps.get(0) {
            let prefix = &block[..whole.start()];
            if !prefix.trim().is_empty() {
                debug!("Discarding text before SRT block: {:?}", prefix.trim());
            }
        }

        let start_sec = parse_srt_timestamp(&caps[2]);
        let end_sec = parse_srt_timestamp(&caps[3]);
        let text = caps.get(4).map_or("", |m| m.as_str()).trim();
        captions.push(Caption {
            id: ids.next_id(),
            start_sec: Some(start_sec),
            end_sec: Some(end_sec),
            text: text.to_string(),
        });
    }

    if captions.is_empty() && !normalized.trim().is_empty() {
        debug!("No SRT blocks found, importing as plain text lines");
        return parse_plain_lines(&normalized, ids);
    }

    let degenerate = captions.iter().filter(|c| c.is_degenerate()).count();
    if degenerate > 0 {
        warn!(
            "Imported {} caption(s) shorter than the minimum duration",
            degenerate
        );
    }

    captions
}

/// One untimed caption per non-blank line
fn parse_plain_lines(text: &str, ids: &mut dyn IdGenerator) -> Vec<Caption> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Caption::untimed(&ids.next_id(), line))
        .collect()
}

// =============================================================================
// SRT Export
// =============================================================================

/// Exports captions to SRT format.
///
/// Unset times are filled in: a missing start becomes `0`, a missing end
/// becomes `start + 2s`. This is a lossy export, re-importing the result
/// yields timed captions.
pub fn export_srt(captions: &[Caption]) -> String {
    export_srt_with_duration(captions, DEFAULT_CAPTION_SEC)
}

/// Exports captions to SRT, using `default_sec` as the length of captions
/// that have no end time
pub fn export_srt_with_duration(captions: &[Caption], default_sec: TimeSec) -> String {
    captions
        .iter()
        .enumerate()
        .map(|(index, caption)| {
            let (start, end) = export_range(caption, default_sec);
            format!(
                "{}\n{} --> {}\n{}\n",
                index + 1,
                to_srt_timestamp(Some(start)),
                to_srt_timestamp(Some(end)),
                caption.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn export_range(caption: &Caption, default_sec: TimeSec) -> (TimeSec, TimeSec) {
    let start = caption.start_sec.unwrap_or(0.0);
    let end = caption.end_sec.unwrap_or(start + default_sec);
    (start, end)
}

// =============================================================================
// VTT Export
// =============================================================================

/// Exports captions to WebVTT format, filling unset times like `export_srt`
pub fn export_vtt(captions: &[Caption]) -> String {
    let mut output = String::from("WEBVTT\n\n");

    let cues = captions
        .iter()
        .map(|caption| {
            let (start, end) = export_range(caption, DEFAULT_CAPTION_SEC);
            format!(
                "{} --> {}\n{}\n",
                to_vtt_timestamp(Some(start)),
                to_vtt_timestamp(Some(end)),
                caption.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    output.push_str(&cues);

    output
}

// =============================================================================
// Export Naming
// =============================================================================

/// File name for an exported document: `synced_<media stem>.srt`, or
/// `synced_subtitles.srt` when no media is loaded
pub fn export_file_name(media: Option<&Path>) -> String {
    let stem = media
        .and_then(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().to_string())
        .filter(|stem| !stem.trim().is_empty())
        .unwrap_or_else(|| EXPORT_FALLBACK_STEM.to_string());
    format!("{EXPORT_PREFIX}{stem}.srt")
}

// =============================================================================
// Tests
// =============================================================================
