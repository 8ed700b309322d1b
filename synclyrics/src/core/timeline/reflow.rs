//! Text Reflow
//!
//! Rebuilds the caption list after the lyrics text has been edited as a
//! whole, carrying sync work over by position.

use crate::core::captions::{normalize_line_endings, Caption, IdGenerator};

/// Splits editor text into trimmed, non-blank lines
pub fn editor_lines(text: &str) -> Vec<String> {
    normalize_line_endings(text)
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rebuilds captions from edited lines.
///
/// Line `i` keeps the id and times of `previous[i]` when such a caption
/// exists; lines beyond the old count get fresh ids and no times. When the
/// line count is unchanged this replaces only the text.
///
/// The merge is positional, not content-aware: inserting a line in the
/// middle shifts every later time onto the wrong text.
pub fn reflow_from_text(
    lines: &[String],
    previous: &[Caption],
    ids: &mut dyn IdGenerator,
) -> Vec<Caption> {
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let text = line.trim().to_string();
            match previous.get(index) {
                Some(old) => Caption {
                    text,
                    ..old.clone()
                },
                None => Caption {
                    id: ids.next_id(),
                    start_sec: None,
                    end_sec: None,
                    text,
                },
            }
        })
        .collect()
}
