//! Undo/Redo History
//!
//! Bounded linear history of full timeline snapshots.
//!
//! Snapshots are deep copies, so later edits to the live timeline never
//! reach back into history. A pointer marks the current snapshot; undo and
//! redo move it and hand back the snapshot to restore. Recording after an
//! undo discards the redo branch.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::captions::Caption;

/// Default number of snapshots retained
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

// =============================================================================
// Snapshot
// =============================================================================

/// Frozen copy of the timeline's captions and active index
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub captions: Vec<Caption>,
    pub active_index: Option<usize>,
    /// Timestamp when the snapshot was taken
    pub taken_at: String,
}

impl Snapshot {
    fn new(captions: &[Caption], active_index: Option<usize>) -> Self {
        Self {
            captions: captions.to_vec(),
            active_index,
            taken_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

// =============================================================================
// History
// =============================================================================

/// Linear undo/redo history over snapshots
#[derive(Debug, Clone)]
pub struct History {
    /// Retained snapshots, oldest first
    snapshots: VecDeque<Snapshot>,
    /// Index of the current snapshot
    pointer: usize,
    /// Maximum number of snapshots kept
    limit: usize,
}

impl History {
    /// Creates a history seeded with an empty timeline
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Creates a history that keeps at most `limit` snapshots (minimum 1)
    pub fn with_limit(limit: usize) -> Self {
        let mut history = Self {
            snapshots: VecDeque::new(),
            pointer: 0,
            limit: limit.max(1),
        };
        history.reset(&[]);
        history
    }

    /// Records a snapshot after the current one.
    ///
    /// Any snapshots ahead of the pointer (the redo branch) are discarded.
    /// When the limit is exceeded the oldest snapshot is dropped.
    pub fn push(&mut self, captions: &[Caption], active_index: Option<usize>) {
        self.snapshots.truncate(self.pointer + 1);
        self.snapshots.push_back(Snapshot::new(captions, active_index));

        while self.snapshots.len() > self.limit {
            self.snapshots.pop_front();
        }
        self.pointer = self.snapshots.len() - 1;

        debug!(
            "History push: {} snapshot(s), pointer at {}",
            self.snapshots.len(),
            self.pointer
        );
    }

    /// Steps back one snapshot and returns it, or None at the oldest one
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.pointer == 0 {
            return None;
        }
        self.pointer -= 1;
        self.snapshots.get(self.pointer)
    }

    /// Steps forward one snapshot and returns it, or None at the newest one
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.pointer + 1 >= self.snapshots.len() {
            return None;
        }
        self.pointer += 1;
        self.snapshots.get(self.pointer)
    }

    /// Discards all history and reseeds it with `(captions, None)`
    pub fn reset(&mut self, captions: &[Caption]) {
        self.snapshots.clear();
        self.snapshots.push_back(Snapshot::new(captions, None));
        self.pointer = 0;
    }

    /// Returns true if undo is available
    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    /// Returns true if redo is available
    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.snapshots.len()
    }

    /// The snapshot at the pointer
    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.pointer)
    }

    /// Number of retained snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Index of the current snapshot
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
