//! Playback Clocks
//!
//! The engine never drives media itself. It reads a clock through
//! `PlaybackAdapter` and asks it to play, pause and seek.
//!
//! - `ManualClock`: time moves only when told to (headless replays, tests)
//! - `WallClock`: time advances with the monotonic system clock while playing

use std::time::Instant;

use tracing::debug;

use crate::core::{sanitize_time_sec, TimeSec};

/// Media transport consumed by the sync session
pub trait PlaybackAdapter {
    /// Current playback position in seconds
    fn current_time(&self) -> TimeSec;

    /// Media duration in seconds, once known
    fn duration(&self) -> Option<TimeSec>;

    fn is_playing(&self) -> bool;

    fn play(&mut self);

    fn pause(&mut self);

    /// Moves to an absolute position, clamped into the media
    fn seek(&mut self, to: TimeSec);
}

fn clamp_to_media(to: TimeSec, duration: Option<TimeSec>) -> TimeSec {
    let to = sanitize_time_sec(to);
    match duration {
        Some(duration) => to.min(duration),
        None => to,
    }
}

// =============================================================================
// ManualClock
// =============================================================================

/// Clock that only moves on `seek` or `advance`
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    position: TimeSec,
    duration: Option<TimeSec>,
    playing: bool,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, duration: TimeSec) -> Self {
        self.set_duration(duration);
        self
    }

    /// Records the media duration once it becomes known
    pub fn set_duration(&mut self, duration: TimeSec) {
        self.duration = Some(sanitize_time_sec(duration));
        self.position = clamp_to_media(self.position, self.duration);
    }

    /// Moves the clock forward by `delta` seconds while playing
    pub fn advance(&mut self, delta: TimeSec) {
        if self.playing {
            self.position = clamp_to_media(self.position + delta, self.duration);
        }
    }
}

impl PlaybackAdapter for ManualClock {
    fn current_time(&self) -> TimeSec {
        self.position
    }

    fn duration(&self) -> Option<TimeSec> {
        self.duration
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, to: TimeSec) {
        self.position = clamp_to_media(to, self.duration);
    }
}

// =============================================================================
// WallClock
// =============================================================================

/// Transport that advances in real time while playing.
///
/// Playback stops by itself at the end of the media when the duration is
/// known.
#[derive(Debug, Clone)]
pub struct WallClock {
    /// Position at the moment playback last started or was seeked
    anchor_position: TimeSec,
    /// When playback last started, if playing
    anchor_instant: Option<Instant>,
    duration: Option<TimeSec>,
}

impl WallClock {
    pub fn new(duration: Option<TimeSec>) -> Self {
        Self {
            anchor_position: 0.0,
            anchor_instant: None,
            duration: duration.map(sanitize_time_sec),
        }
    }

    fn reanchor(&mut self, position: TimeSec) {
        self.anchor_position = position;
        if self.anchor_instant.is_some() {
            self.anchor_instant = Some(Instant::now());
        }
    }

    fn at_end(&self, position: TimeSec) -> bool {
        self.duration.is_some_and(|duration| position >= duration)
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new(None)
    }
}

impl PlaybackAdapter for WallClock {
    fn current_time(&self) -> TimeSec {
        let elapsed = self
            .anchor_instant
            .map(|started| started.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        clamp_to_media(self.anchor_position + elapsed, self.duration)
    }

    fn duration(&self) -> Option<TimeSec> {
        self.duration
    }

    fn is_playing(&self) -> bool {
        self.anchor_instant.is_some() && !self.at_end(self.current_time())
    }

    fn play(&mut self) {
        // A transport that ran off the end still holds its anchor
        if self.is_playing() {
            return;
        }
        let mut position = self.current_time();
        if self.at_end(position) {
            debug!("Play at end of media, restarting from 0");
            position = 0.0;
        }
        self.anchor_position = position;
        self.anchor_instant = Some(Instant::now());
    }

    fn pause(&mut self) {
        let position = self.current_time();
        self.anchor_position = position;
        self.anchor_instant = None;
    }

    fn seek(&mut self, to: TimeSec) {
        let position = clamp_to_media(to, self.duration);
        self.reanchor(position);
    }
}
