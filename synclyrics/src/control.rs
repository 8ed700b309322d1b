//! Keyboard Control
//!
//! Maps key presses onto session actions. The mapping is pure so any front
//! end (terminal, GUI, tests) can share it.

use serde::{Deserialize, Serialize};

use crate::core::TimeSec;
use crate::session::ExportedDocument;

// =============================================================================
// Keys
// =============================================================================

/// Physical key, independent of the front end that produced it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Key {
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
    /// Letter or symbol key, compared case-insensitively
    Char(char),
}

/// A key together with its modifier state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPress {
    pub key: Key,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub shift: bool,
}

impl KeyPress {
    /// Key with no modifiers held
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            shift: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Ctrl on most platforms, Cmd on macOS
    fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    fn is_char(&self, expected: char) -> bool {
        matches!(self.key, Key::Char(c) if c.eq_ignore_ascii_case(&expected))
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Everything a user can ask a sync session to do
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum SessionAction {
    TogglePlay,
    SyncNext,
    Undo,
    Redo,
    /// Relative seek in seconds
    SeekBy(TimeSec),
    /// Absolute seek in seconds
    Scrub(TimeSec),
    /// Shift the active caption's start
    NudgeActive(TimeSec),
    AdjustStart { index: usize, delta: TimeSec },
    JumpTo(usize),
    Export,
}

/// What a dispatched action did
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    /// Playback state after a toggle
    Playing(bool),
    Synced { index: usize },
    EndOfTimeline,
    /// Start time of the caption at `index` changed
    Adjusted { index: usize },
    /// A snapshot was restored by undo or redo
    Restored { active_index: Option<usize> },
    /// Playback position after a seek
    Seeked { time: TimeSec },
    Jumped { index: usize },
    Exported(ExportedDocument),
    /// The action was valid but had nothing to do
    Unchanged,
}

/// Translates a key press into a session action.
///
/// Returns None for unmapped keys, and for every key while a text surface
/// (such as the lyrics editor) has focus.
pub fn action_for_key(press: KeyPress, seek_step: TimeSec, text_focus: bool) -> Option<SessionAction> {
    if text_focus {
        return None;
    }

    if press.command() && press.is_char('z') {
        return Some(if press.shift {
            SessionAction::Redo
        } else {
            SessionAction::Undo
        });
    }

    match press.key {
        Key::Space => Some(SessionAction::TogglePlay),
        Key::ArrowDown => Some(SessionAction::SyncNext),
        Key::Char(_) if press.is_char('s') && !press.command() => Some(SessionAction::SyncNext),
        Key::ArrowLeft => Some(SessionAction::SeekBy(-seek_step)),
        Key::ArrowRight => Some(SessionAction::SeekBy(seek_step)),
        _ => None,
    }
}
