//! SyncLyrics Core Type Definitions
//!
//! Defines fundamental types used throughout the engine.

use tracing::warn;

// =============================================================================
// ID Types
// =============================================================================

/// Caption unique identifier (ULID by default)
pub type CaptionId = String;

// =============================================================================
// Time Types
// =============================================================================

/// Time in seconds (floating point)
pub type TimeSec = f64;

/// Shortest duration a synced caption may have, in seconds
pub const MIN_CAPTION_SEC: TimeSec = 0.1;

/// Length given to captions without an end time on export, in seconds
pub const DEFAULT_CAPTION_SEC: TimeSec = 2.0;

/// Returns true if the value is usable as a playback position
pub fn is_valid_time_sec(value: TimeSec) -> bool {
    value.is_finite() && value >= 0.0
}

/// Coerces a clock reading into a usable playback position.
///
/// Negative readings clamp to zero; NaN and infinities become zero.
pub fn sanitize_time_sec(value: TimeSec) -> TimeSec {
    if value.is_nan() || value.is_infinite() {
        warn!("Non-finite playback time {}, using 0", value);
        return 0.0;
    }
    value.max(0.0)
}

// =============================================================================
// Media Types
// =============================================================================

/// Kind of media being synced against
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// Guesses the media kind from a file extension.
    ///
    /// Unknown extensions are treated as video, which is what a generic
    /// media element would attempt to play.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" | "wav" | "flac" | "ogg" | "oga" | "opus" | "m4a" | "aac" | "wma" | "aiff"
            | "aif" => Self::Audio,
            _ => Self::Video,
        }
    }
}
