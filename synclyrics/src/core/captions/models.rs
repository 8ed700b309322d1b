//! Caption Data Models
//!
//! A caption is one line of lyrics or subtitle text, optionally timed.
//! Unset times are the normal state of a line that has not been synced yet.

use serde::{Deserialize, Serialize};

use crate::core::{CaptionId, TimeSec, MIN_CAPTION_SEC};

/// A single caption entry with text and optional timing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caption {
    /// Unique identifier, immutable for the caption's lifetime
    pub id: CaptionId,
    /// Start time in seconds (None = not synced yet)
    #[serde(default)]
    pub start_sec: Option<TimeSec>,
    /// End time in seconds (None = open until the next caption starts)
    #[serde(default)]
    pub end_sec: Option<TimeSec>,
    /// Caption text (may contain line breaks)
    pub text: String,
}

impl Caption {
    /// Creates a timed caption
    pub fn new(id: &str, start_sec: TimeSec, end_sec: TimeSec, text: &str) -> Self {
        Self {
            id: id.to_string(),
            start_sec: Some(start_sec),
            end_sec: Some(end_sec),
            text: text.to_string(),
        }
    }

    /// Creates a caption with no timing
    pub fn untimed(id: &str, text: &str) -> Self {
        Self {
            id: id.to_string(),
            start_sec: None,
            end_sec: None,
            text: text.to_string(),
        }
    }

    /// Returns true once a start time has been assigned
    pub fn is_synced(&self) -> bool {
        self.start_sec.is_some()
    }

    /// Returns true if `time` falls inside `[start, end)`.
    ///
    /// A caption with no start never contains anything; a caption with a
    /// start but no end is open-ended.
    pub fn contains(&self, time: TimeSec) -> bool {
        match self.start_sec {
            Some(start) => time >= start && self.end_sec.is_none_or(|end| time < end),
            None => false,
        }
    }

    /// Duration in seconds, when both ends are known
    pub fn duration(&self) -> Option<TimeSec> {
        match (self.start_sec, self.end_sec) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Returns true if both times are set but closer than the minimum duration.
    ///
    /// Only imported captions can be in this state; the sync algorithm never
    /// produces it.
    pub fn is_degenerate(&self) -> bool {
        self.duration()
            .is_some_and(|duration| duration < MIN_CAPTION_SEC - 1e-9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_contains() {
        let caption = Caption::new("c1", 1.0, 2.5, "Hello");
        assert!(!caption.contains(0.99));
        assert!(caption.contains(1.0));
        assert!(caption.contains(2.49));
        assert!(!caption.contains(2.5));
    }

    #[test]
    fn test_caption_open_ended_contains() {
        let mut caption = Caption::untimed("c1", "Hello");
        assert!(!caption.contains(0.0));

        caption.start_sec = Some(3.0);
        assert!(caption.contains(3.0));
        assert!(caption.contains(10_000.0));
        assert!(!caption.contains(2.9));
    }

    #[test]
    fn test_caption_duration_and_degenerate() {
        assert_eq!(Caption::new("a", 1.0, 3.0, "x").duration(), Some(2.0));
        assert_eq!(Caption::untimed("b", "x").duration(), None);
        assert!(Caption::new("c", 5.0, 5.05, "x").is_degenerate());
        assert!(Caption::new("d", 5.0, 4.0, "x").is_degenerate());
        assert!(!Caption::new("e", 5.0, 5.1, "x").is_degenerate());
    }

    #[test]
    fn test_caption_serialization_uses_camel_case() {
        let caption = Caption::new("c1", 1.0, 2.0, "Hi");
        let json = serde_json::to_string(&caption).unwrap();
        assert!(json.contains("\"startSec\":1.0"));
        assert!(json.contains("\"endSec\":2.0"));

        let parsed: Caption = serde_json::from_str(r#"{"id":"x","text":"t"}"#).unwrap();
        assert_eq!(parsed.start_sec, None);
        assert_eq!(parsed.end_sec, None);
    }
}
