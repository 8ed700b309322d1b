//! Caption System Module
//!
//! Provides the caption data model and its text formats:
//! - Caption data model (`Caption`) and id generation
//! - Timestamp conversion for SRT, WebVTT and on-screen display
//! - SRT parsing (with plain-text fallback) and SRT/VTT export
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Caption System                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  models.rs     - Caption entry                                  │
//! │  ids.rs        - Injectable caption id generators               │
//! │  timecode.rs   - Seconds <-> timestamp strings                  │
//! │  formats.rs    - SRT parsing, SRT/VTT export, export naming     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use synclyrics_lib::core::captions::{parse_srt, export_srt, UlidIdGenerator};
//!
//! let mut ids = UlidIdGenerator;
//! let captions = parse_srt(&std::fs::read_to_string("song.srt")?, &mut ids);
//! let srt = export_srt(&captions);
//! ```

mod formats;
mod ids;
mod models;
pub mod timecode;

pub use models::Caption;

pub use ids::{IdGenerator, SequentialIdGenerator, UlidIdGenerator};

pub use formats::{
    export_file_name, export_srt, export_srt_with_duration, export_vtt, normalize_line_endings,
    parse_srt, SRT_MIME_TYPE,
};
