//! Timeline Model Definitions
//!
//! A `Timeline` owns the captions in display order plus the index of the
//! caption currently considered playing. The engine never reorders captions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::captions::Caption;
use crate::core::{sanitize_time_sec, TimeSec, MIN_CAPTION_SEC};

/// Result of a sync tap
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The caption at `index` was started; the previous one, if any, was closed
    Synced { index: usize },
    /// Every caption has already been started; nothing changed
    EndOfTimeline,
}

/// Ordered captions plus the active-caption cursor
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    /// Captions in display/playback order
    pub captions: Vec<Caption>,
    /// Index of the active caption (None = nothing active)
    active_index: Option<usize>,
}

impl Timeline {
    /// Creates a timeline with nothing active
    pub fn new(captions: Vec<Caption>) -> Self {
        Self {
            captions,
            active_index: None,
        }
    }

    /// Restores a timeline from stored parts, discarding a stale active index
    pub fn from_parts(captions: Vec<Caption>, active_index: Option<usize>) -> Self {
        let mut timeline = Self {
            captions,
            active_index,
        };
        timeline.revalidate_active();
        timeline
    }

    pub fn len(&self) -> usize {
        self.captions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }

    /// Active caption index; an index past the end reads as None
    pub fn active_index(&self) -> Option<usize> {
        self.active_index.filter(|&index| index < self.captions.len())
    }

    /// The active caption, if any
    pub fn active_caption(&self) -> Option<&Caption> {
        self.active_index().and_then(|index| self.captions.get(index))
    }

    /// Sets the active caption. Out-of-range indices clear the cursor.
    pub fn set_active(&mut self, index: Option<usize>) {
        self.active_index = index.filter(|&i| i < self.captions.len());
    }

    /// Drops the active index if it no longer points at a caption.
    ///
    /// Must be called after any change to the caption count.
    pub fn revalidate_active(&mut self) {
        if self.active_index.is_some_and(|index| index >= self.captions.len()) {
            debug!(
                "Active index {:?} out of range for {} captions, clearing",
                self.active_index,
                self.captions.len()
            );
            self.active_index = None;
        }
    }

    /// Replaces every caption, clearing the active cursor
    pub fn replace_captions(&mut self, captions: Vec<Caption>) {
        self.captions = captions;
        self.active_index = None;
    }

    /// Texts of all captions, one per line
    pub fn editor_text(&self) -> String {
        self.captions
            .iter()
            .map(|caption| caption.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    // =========================================================================
    // Playback Resolution
    // =========================================================================

    /// Decides which caption is playing at `time` and makes it active.
    ///
    /// In priority order:
    /// 1. the current active caption, if it still contains `time`
    /// 2. the first caption containing `time`
    /// 3. the started caption with the greatest start time (ties go to the
    ///    later caption), so a line stays highlighted until the next begins
    /// 4. otherwise the cursor is left where it is
    ///
    /// Leaving the cursor alone when nothing has started keeps a jump or a
    /// backward seek from sending the next sync tap back to the first line.
    /// Captions are never modified.
    pub fn resolve_active(&mut self, time: TimeSec) -> Option<usize> {
        if let Some(current) = self.active_caption() {
            if current.contains(time) {
                return self.active_index();
            }
        }

        let Some(resolved) = self
            .captions
            .iter()
            .position(|caption| caption.contains(time))
            .or_else(|| self.latest_started(time))
        else {
            return self.active_index();
        };

        if Some(resolved) != self.active_index() {
            debug!("Active caption {:?} -> {} at {:.3}s", self.active_index, resolved, time);
        }
        self.active_index = Some(resolved);
        Some(resolved)
    }

    /// Index of the caption with the greatest start at or before `time`
    fn latest_started(&self, time: TimeSec) -> Option<usize> {
        let mut best: Option<(usize, TimeSec)> = None;
        for (index, caption) in self.captions.iter().enumerate() {
            let Some(start) = caption.start_sec.filter(|&start| start <= time) else {
                continue;
            };
            if best.is_none_or(|(_, best_start)| start >= best_start) {
                best = Some((index, start));
            }
        }
        best.map(|(index, _)| index)
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Tap-to-sync: starts the caption after the active one at `time`.
    ///
    /// The next caption gets `start = time` and its end cleared; the
    /// previously active caption is closed at `time`, but never shorter than
    /// `MIN_CAPTION_SEC`. The active cursor then moves forward.
    ///
    /// The caller is responsible for recording history around this call.
    pub fn sync_next(&mut self, time: TimeSec) -> SyncOutcome {
        let time = sanitize_time_sec(time);
        let previous = self.active_index();
        let next = previous.map_or(0, |index| index + 1);

        if next >= self.captions.len() {
            debug!("Sync at {:.3}s ignored: end of timeline", time);
            return SyncOutcome::EndOfTimeline;
        }

        let caption = &mut self.captions[next];
        caption.start_sec = Some(time);
        caption.end_sec = None;

        if let Some(previous) = previous {
            let caption = &mut self.captions[previous];
            let previous_start = caption.start_sec.unwrap_or(0.0);
            caption.end_sec = Some(time.max(previous_start + MIN_CAPTION_SEC));
        }

        self.active_index = Some(next);
        SyncOutcome::Synced { index: next }
    }

    /// Shifts the start of caption `index` by `delta` seconds, floored at 0.
    ///
    /// Returns false without changing anything if the caption does not exist
    /// or has not been synced. The end time is left alone.
    pub fn adjust_start(&mut self, index: usize, delta: TimeSec) -> bool {
        if !delta.is_finite() {
            return false;
        }
        let Some(caption) = self.captions.get_mut(index) else {
            return false;
        };
        let Some(start) = caption.start_sec else {
            return false;
        };

        let adjusted = (start + delta).max(0.0);
        caption.start_sec = Some(adjusted);
        adjusted != start
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn untimed(texts: &[&str]) -> Timeline {
        Timeline::new(
            texts
                .iter()
                .enumerate()
                .map(|(i, text)| Caption::untimed(&format!("c{}", i), text))
                .collect(),
        )
    }

    fn timed(ranges: &[(TimeSec, Option<TimeSec>)]) -> Timeline {
        Timeline::new(
            ranges
                .iter()
                .enumerate()
                .map(|(i, &(start, end))| Caption {
                    id: format!("c{}", i),
                    start_sec: Some(start),
                    end_sec: end,
                    text: format!("line {}", i),
                })
                .collect(),
        )
    }

    // -------------------------------------------------------------------------
    // Active Index Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_stale_active_index_reads_as_none() {
        let mut timeline = Timeline::from_parts(untimed(&["a", "b"]).captions, Some(1));
        assert_eq!(timeline.active_index(), Some(1));

        timeline.captions.pop();
        assert_eq!(timeline.active_index(), None);
        assert!(timeline.active_caption().is_none());

        timeline.revalidate_active();
        assert_eq!(timeline.active_index(), None);
    }

    #[test]
    fn test_from_parts_drops_out_of_range_index() {
        let timeline = Timeline::from_parts(untimed(&["a"]).captions, Some(4));
        assert_eq!(timeline.active_index(), None);
    }

    #[test]
    fn test_set_active_ignores_out_of_range() {
        let mut timeline = untimed(&["a", "b"]);
        timeline.set_active(Some(1));
        assert_eq!(timeline.active_index(), Some(1));
        timeline.set_active(Some(2));
        assert_eq!(timeline.active_index(), None);
    }

    #[test]
    fn test_editor_text() {
        assert_eq!(untimed(&["one", "two", "three"]).editor_text(), "one\ntwo\nthree");
        assert_eq!(Timeline::default().editor_text(), "");
    }

    // -------------------------------------------------------------------------
    // Resolution Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_resolve_direct_match() {
        let mut timeline = timed(&[(1.0, Some(2.0)), (2.0, Some(3.0)), (3.0, Some(4.0))]);
        assert_eq!(timeline.resolve_active(2.5), Some(1));
        assert_eq!(timeline.resolve_active(3.0), Some(2));
    }

    #[test]
    fn test_resolve_keeps_current_while_valid() {
        // Overlapping captions: 0 covers [0, 10), 1 covers [2, 4)
        let mut timeline = timed(&[(0.0, Some(10.0)), (2.0, Some(4.0))]);
        timeline.set_active(Some(1));
        assert_eq!(timeline.resolve_active(3.0), Some(1));

        // Once 1 stops containing the time, the first containing caption wins
        assert_eq!(timeline.resolve_active(5.0), Some(0));
    }

    #[test]
    fn test_resolve_open_ended_caption() {
        let mut timeline = timed(&[(1.0, Some(2.0)), (2.0, None)]);
        assert_eq!(timeline.resolve_active(500.0), Some(1));
    }

    #[test]
    fn test_resolve_karaoke_fallback_in_gap() {
        // Gap between 2.0 and 5.0: the last started line stays highlighted
        let mut timeline = timed(&[(1.0, Some(2.0)), (5.0, Some(6.0)), (7.0, Some(8.0))]);
        assert_eq!(timeline.resolve_active(3.0), Some(0));
        assert_eq!(timeline.resolve_active(6.5), Some(1));
        assert_eq!(timeline.resolve_active(100.0), Some(2));
    }

    #[test]
    fn test_resolve_before_first_start_keeps_cursor() {
        let mut timeline = timed(&[(5.0, Some(6.0)), (7.0, None)]);
        timeline.set_active(Some(0));
        assert_eq!(timeline.resolve_active(1.0), Some(0));
        assert_eq!(timeline.active_index(), Some(0));

        // Nothing active stays nothing active
        let mut fresh = timed(&[(5.0, Some(6.0))]);
        assert_eq!(fresh.resolve_active(1.0), None);
    }

    #[test]
    fn test_resolve_keeps_cursor_on_unsynced_caption() {
        let mut timeline = untimed(&["a", "b", "c"]);
        timeline.set_active(Some(1));
        assert_eq!(timeline.resolve_active(3.0), Some(1));
        assert_eq!(timeline.sync_next(3.0), SyncOutcome::Synced { index: 2 });
    }

    #[test]
    fn test_resolve_untimed_timeline() {
        let mut timeline = untimed(&["a", "b"]);
        assert_eq!(timeline.resolve_active(10.0), None);
    }

    #[test]
    fn test_resolve_fallback_out_of_order_starts() {
        // Caption 1 was nudged earlier than caption 0; no range contains 9.0.
        let mut timeline = timed(&[(6.0, Some(7.0)), (3.0, Some(4.0)), (8.0, Some(8.5))]);
        assert_eq!(timeline.resolve_active(9.0), Some(2));
        assert_eq!(timeline.resolve_active(5.0), Some(1));
        assert_eq!(timeline.resolve_active(7.5), Some(0));
    }

    #[test]
    fn test_resolve_never_moves_backward_for_increasing_time() {
        let mut timeline = timed(&[
            (1.0, Some(2.0)),
            (2.0, Some(2.5)),
            (4.0, None),
            (6.0, Some(7.0)),
        ]);
        let mut last = None;
        let mut t = 0.0;
        while t < 10.0 {
            let active = timeline.resolve_active(t);
            if let (Some(prev), Some(now)) = (last, active) {
                assert!(now >= prev, "moved back from {} to {} at {}", prev, now, t);
            }
            if active.is_some() {
                last = active;
            }
            // Repeating the same time is stable
            assert_eq!(timeline.resolve_active(t), active);
            t += 0.05;
        }
    }

    #[test]
    fn test_resolve_does_not_modify_captions() {
        let mut timeline = timed(&[(1.0, Some(2.0)), (3.0, None)]);
        let before = timeline.captions.clone();
        timeline.resolve_active(2.5);
        timeline.resolve_active(9.0);
        assert_eq!(timeline.captions, before);
    }

    // -------------------------------------------------------------------------
    // Sync Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_sync_first_line() {
        let mut timeline = untimed(&["a", "b"]);
        assert_eq!(timeline.sync_next(1.25), SyncOutcome::Synced { index: 0 });
        assert_eq!(timeline.captions[0].start_sec, Some(1.25));
        assert_eq!(timeline.captions[0].end_sec, None);
        assert_eq!(timeline.active_index(), Some(0));
    }

    #[test]
    fn test_sync_n_lines() {
        let taps = [1.0, 2.0, 3.5, 5.0];
        let mut timeline = untimed(&["a", "b", "c", "d"]);

        for (i, &tap) in taps.iter().enumerate() {
            assert_eq!(timeline.sync_next(tap), SyncOutcome::Synced { index: i });
        }

        for (i, caption) in timeline.captions.iter().enumerate() {
            assert_eq!(caption.start_sec, Some(taps[i]));
            let expected_end = taps.get(i + 1).copied();
            assert_eq!(caption.end_sec, expected_end);
        }

        let before = timeline.clone();
        assert_eq!(timeline.sync_next(9.0), SyncOutcome::EndOfTimeline);
        assert_eq!(timeline, before);
    }

    #[test]
    fn test_sync_enforces_minimum_duration() {
        let mut timeline = untimed(&["a", "b"]);
        timeline.sync_next(4.0);
        timeline.sync_next(4.02);

        let end = timeline.captions[0].end_sec.unwrap();
        assert!((end - 4.1).abs() < 1e-9);
        assert_eq!(timeline.captions[1].start_sec, Some(4.02));
    }

    #[test]
    fn test_sync_clears_stale_end_of_next() {
        let mut timeline = timed(&[(1.0, Some(2.0)), (2.0, Some(3.0))]);
        timeline.set_active(Some(0));
        timeline.sync_next(2.4);
        assert_eq!(timeline.captions[0].end_sec, Some(2.4));
        assert_eq!(timeline.captions[1].start_sec, Some(2.4));
        assert_eq!(timeline.captions[1].end_sec, None);
    }

    #[test]
    fn test_sync_after_unsynced_active_uses_zero_start() {
        let mut timeline = untimed(&["a", "b"]);
        timeline.set_active(Some(0));
        timeline.sync_next(0.05);
        assert_eq!(timeline.captions[0].end_sec, Some(0.1));
    }

    #[test]
    fn test_sync_empty_timeline() {
        let mut timeline = Timeline::default();
        assert_eq!(timeline.sync_next(1.0), SyncOutcome::EndOfTimeline);
        assert_eq!(timeline.active_index(), None);
    }

    #[test]
    fn test_sync_with_stale_active_restarts_from_first() {
        let mut timeline = Timeline::from_parts(untimed(&["a", "b"]).captions, None);
        timeline.active_index = Some(7);
        assert_eq!(timeline.sync_next(1.0), SyncOutcome::Synced { index: 0 });
    }

    // -------------------------------------------------------------------------
    // Adjust Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_adjust_start() {
        let mut timeline = timed(&[(1.0, Some(2.0))]);
        assert!(timeline.adjust_start(0, 0.5));
        assert_eq!(timeline.captions[0].start_sec, Some(1.5));
        assert_eq!(timeline.captions[0].end_sec, Some(2.0));
    }

    #[test]
    fn test_adjust_start_floors_at_zero() {
        let mut timeline = timed(&[(0.05, Some(2.0))]);
        assert!(timeline.adjust_start(0, -0.1));
        assert_eq!(timeline.captions[0].start_sec, Some(0.0));
        assert!(!timeline.adjust_start(0, -0.1));
    }

    #[test]
    fn test_adjust_start_unsynced_is_noop() {
        let mut timeline = untimed(&["a"]);
        assert!(!timeline.adjust_start(0, 0.1));
        assert_eq!(timeline.captions[0].start_sec, None);
        assert!(!timeline.adjust_start(3, 0.1));
    }
}
