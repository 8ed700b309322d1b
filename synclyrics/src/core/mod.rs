//! SyncLyrics Core Engine
//!
//! Timeline sync engine module.
//! Handles captions, the SRT codec, active-line resolution, undo history and playback clocks.

pub mod captions;
pub mod fs;
pub mod history;
pub mod playback;
pub mod settings;
pub mod timeline;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;

#[cfg(test)]
mod tests_destructive;
