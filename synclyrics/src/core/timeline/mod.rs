//! Timeline Module
//!
//! The ordered caption list and its active-caption cursor: playback-time
//! resolution, tap-to-sync assignment, start nudging and text reflow.

mod models;
mod reflow;

pub use models::{SyncOutcome, Timeline};
pub use reflow::{editor_lines, reflow_from_text};
