//! Destructive and Edge Case Tests for Core Models
//!
//! These tests verify the robustness of the engine against malformed
//! documents, hostile clock readings and stale state.

use crate::core::captions::timecode::{parse_srt_timestamp, to_display_timestamp, to_srt_timestamp};
use crate::core::captions::{export_srt, parse_srt, Caption, SequentialIdGenerator};
use crate::core::history::History;
use crate::core::timeline::{SyncOutcome, Timeline};

fn ids() -> SequentialIdGenerator {
    SequentialIdGenerator::new("d")
}

#[test]
fn test_destructive_malformed_timestamp_falls_back_to_text() {
    // A letter inside the timestamp means no block matches at all
    let doc = "1\n00:00:0a,000 --> 00:00:02,000\nHi";
    let captions = parse_srt(doc, &mut ids());

    assert_eq!(captions.len(), 3);
    assert!(captions.iter().all(|c| !c.is_synced()));
    assert_eq!(captions[2].text, "Hi");
}

#[test]
fn test_destructive_timestamp_garbage() {
    assert_eq!(parse_srt_timestamp(""), 0.0);
    assert_eq!(parse_srt_timestamp("::"), 0.0);
    assert_eq!(parse_srt_timestamp("aa:bb:cc,ddd"), 0.0);
    assert_eq!(parse_srt_timestamp("12:34"), 0.0);

    assert_eq!(to_srt_timestamp(Some(f64::NAN)), "00:00:00,000");
    assert_eq!(to_srt_timestamp(Some(f64::NEG_INFINITY)), "00:00:00,000");
    assert_eq!(to_srt_timestamp(Some(-5.0)), "00:00:00,000");
    assert_eq!(to_display_timestamp(Some(-1.0)), "00:00.00");
}

#[test]
fn test_destructive_huge_hours_do_not_wrap() {
    let doc = "1\n100:00:00,000 --> 100:00:01,000\nLate\n";
    let captions = parse_srt(doc, &mut ids());

    assert_eq!(captions.len(), 1);
    assert_eq!(captions[0].start_sec, Some(360_000.0));
    assert!(export_srt(&captions).contains("100:00:00,000 --> 100:00:01,000"));
}

#[test]
fn test_destructive_blank_documents() {
    assert!(parse_srt("", &mut ids()).is_empty());
    assert!(parse_srt("   \n\n \t \r\n", &mut ids()).is_empty());
}

#[test]
fn test_destructive_inverted_import_is_tolerated() {
    // end < start: kept as imported, never contains anything
    let doc = "1\n00:00:05,000 --> 00:00:04,000\nBackwards\n";
    let captions = parse_srt(doc, &mut ids());
    assert!(captions[0].is_degenerate());
    assert!(!captions[0].contains(4.5));

    let mut timeline = Timeline::new(captions);
    assert_eq!(timeline.resolve_active(3.0), None);
    // Started but never "contains": the karaoke fallback still picks it
    assert_eq!(timeline.resolve_active(6.0), Some(0));
}

#[test]
fn test_destructive_nan_clock_sync() {
    let mut timeline = Timeline::new(vec![Caption::untimed("a", "one")]);
    assert_eq!(timeline.sync_next(f64::NAN), SyncOutcome::Synced { index: 0 });
    assert_eq!(timeline.captions[0].start_sec, Some(0.0));
}

#[test]
fn test_destructive_stale_active_index() {
    let mut timeline = Timeline::from_parts(vec![Caption::untimed("a", "one")], Some(7));
    assert_eq!(timeline.active_index(), None);
    assert_eq!(timeline.sync_next(1.0), SyncOutcome::Synced { index: 0 });

    timeline.set_active(Some(99));
    assert_eq!(timeline.active_index(), None);
}

#[test]
fn test_destructive_sync_backwards_in_time() {
    let mut timeline = Timeline::new(vec![
        Caption::untimed("a", "one"),
        Caption::untimed("b", "two"),
    ]);
    timeline.sync_next(10.0);
    timeline.sync_next(3.0);

    // The closed caption never goes below the minimum duration
    let end = timeline.captions[0].end_sec.unwrap();
    assert!((end - 10.1).abs() < 1e-9);
    assert_eq!(timeline.captions[1].start_sec, Some(3.0));
}

#[test]
fn test_destructive_adjust_start_bad_delta() {
    let mut timeline = Timeline::new(vec![Caption::new("a", 1.0, 2.0, "one")]);
    assert!(!timeline.adjust_start(0, f64::NAN));
    assert!(!timeline.adjust_start(0, f64::INFINITY));
    assert!(!timeline.adjust_start(5, 1.0));
    assert_eq!(timeline.captions[0].start_sec, Some(1.0));

    // Floors at zero
    assert!(timeline.adjust_start(0, -100.0));
    assert_eq!(timeline.captions[0].start_sec, Some(0.0));
    assert!(!timeline.adjust_start(0, -1.0));
}

#[test]
fn test_destructive_zero_history_limit() {
    let mut history = History::with_limit(0);
    assert_eq!(history.limit(), 1);

    history.push(&[Caption::untimed("a", "one")], None);
    history.push(&[Caption::untimed("b", "two")], None);

    assert_eq!(history.len(), 1);
    assert!(!history.can_undo());
    assert!(history.undo().is_none());
    assert_eq!(history.current().unwrap().captions[0].id, "b");
}

#[test]
fn test_destructive_unicode_text_survives_export() {
    let captions = vec![Caption::new("a", 0.0, 1.0, "Ça va? 日本語 🎵")];
    let srt = export_srt(&captions);
    let reparsed = parse_srt(&srt, &mut ids());
    assert_eq!(reparsed[0].text, "Ça va? 日本語 🎵");
}
