//! SyncLyrics Error Definitions
//!
//! Defines error types used at the engine's I/O boundaries.
//! Codec, timeline and history operations are total and never fail.

use thiserror::Error;

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Document Errors
    // =========================================================================
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Caption index out of range: {index} (timeline has {len} captions)")]
    CaptionIndexOutOfRange { index: usize, len: usize },

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;
