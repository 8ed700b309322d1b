//! SyncLyrics Core Library
//!
//! Tap-to-sync engine for lyrics and subtitles.
//! This library contains the caption codecs, the timeline model with its
//! undo history, and the session that ties them to a playback clock.
//!
//! ## Layout
//!
//! - `core`: captions, timeline, history, playback clocks, settings
//! - `control`: key bindings and session actions
//! - `session`: the owned sync session driven by a front end

pub mod control;
pub mod core;
pub mod session;

pub use control::{action_for_key, ActionOutcome, Key, KeyPress, SessionAction};
pub use session::{ExportedDocument, LoadedMedia, SyncSession};
