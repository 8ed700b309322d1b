//! Timestamp Conversion
//!
//! Converts between seconds and the textual timestamps used by the SRT
//! exchange format, WebVTT and the on-screen clock.
//!
//! All conversions work on integer milliseconds so that hours never wrap
//! at 24h and long media formats correctly.

use crate::core::TimeSec;

/// Converts seconds into whole milliseconds, clamping bad input to zero
fn to_millis(seconds: TimeSec) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * 1000.0).round() as u64
}

fn split_millis(total_ms: u64) -> (u64, u64, u64, u64) {
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;
    (hours, mins, secs, ms)
}

/// Formats seconds as an SRT timestamp (`HH:MM:SS,mmm`).
///
/// `None` formats as `00:00:00,000`.
pub fn to_srt_timestamp(seconds: Option<TimeSec>) -> String {
    let (hours, mins, secs, ms) = split_millis(seconds.map(to_millis).unwrap_or(0));
    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, ms)
}

/// Formats seconds as a WebVTT timestamp (`HH:MM:SS.mmm`)
pub fn to_vtt_timestamp(seconds: Option<TimeSec>) -> String {
    let (hours, mins, secs, ms) = split_millis(seconds.map(to_millis).unwrap_or(0));
    format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
}

/// Formats seconds for display as `MM:SS.cc`.
///
/// Minutes are unbounded (there is no hour field). `None` formats as `--:--`.
pub fn to_display_timestamp(seconds: Option<TimeSec>) -> String {
    let Some(seconds) = seconds else {
        return "--:--".to_string();
    };
    let total_cs = to_millis(seconds) / 10;
    let cs = total_cs % 100;
    let total_secs = total_cs / 100;
    format!("{:02}:{:02}.{:02}", total_secs / 60, total_secs % 60, cs)
}

/// Parses an SRT timestamp (`HH:MM:SS,mmm` or `HH:MM:SS.mmm`) into seconds.
///
/// Lenient: anything malformed parses to `0.0`.
pub fn parse_srt_timestamp(text: &str) -> TimeSec {
    let normalized = text.trim().replace(',', ".");
    let parts: Vec<&str> = normalized.split(':').collect();
    if parts.len() < 3 {
        return 0.0;
    }

    let mut total = 0.0;
    for (part, scale) in parts.iter().zip([3600.0, 60.0, 1.0]) {
        match part.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => total += value * scale,
            _ => return 0.0,
        }
    }
    total
}
