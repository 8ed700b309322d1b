//! Sync Session
//!
//! Owns the live timeline and its undo history alongside the playback
//! transport and settings. Every mutating call records its resulting state
//! in the same `&mut self` step, so the history's current snapshot always
//! mirrors the live timeline and no clock tick can slip in between.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::control::{ActionOutcome, SessionAction};
use crate::core::captions::{
    export_file_name, export_srt_with_duration, parse_srt, Caption, IdGenerator, UlidIdGenerator,
    SRT_MIME_TYPE,
};
use crate::core::fs::{atomic_write_bytes, read_text_file};
use crate::core::history::History;
use crate::core::playback::PlaybackAdapter;
use crate::core::settings::SyncSettings;
use crate::core::timeline::{editor_lines, reflow_from_text, SyncOutcome, Timeline};
use crate::core::{CoreError, CoreResult, MediaKind, TimeSec};

// =============================================================================
// Supporting Types
// =============================================================================

/// Media file the captions are being synced against
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedMedia {
    pub path: PathBuf,
    pub kind: MediaKind,
}

/// A rendered export, ready to be written or handed to a download
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedDocument {
    pub file_name: String,
    pub mime_type: String,
    pub contents: String,
}

// =============================================================================
// SyncSession
// =============================================================================

/// One lyrics-sync session over a playback transport
pub struct SyncSession<P: PlaybackAdapter> {
    timeline: Timeline,
    history: History,
    playback: P,
    settings: SyncSettings,
    media: Option<LoadedMedia>,
    ids: Box<dyn IdGenerator>,
}

impl<P: PlaybackAdapter> SyncSession<P> {
    /// Creates an empty session with ULID caption ids
    pub fn new(playback: P, settings: SyncSettings) -> Self {
        Self::with_id_generator(playback, settings, Box::new(UlidIdGenerator))
    }

    /// Creates an empty session with a custom id source
    pub fn with_id_generator(playback: P, settings: SyncSettings, ids: Box<dyn IdGenerator>) -> Self {
        let mut settings = settings;
        settings.normalize();
        Self {
            timeline: Timeline::default(),
            history: History::with_limit(settings.history_limit),
            playback,
            settings,
            media: None,
            ids,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn captions(&self) -> &[Caption] {
        &self.timeline.captions
    }

    pub fn active_index(&self) -> Option<usize> {
        self.timeline.active_index()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn playback(&self) -> &P {
        &self.playback
    }

    /// Direct access to the transport, e.g. to feed it a media duration
    pub fn playback_mut(&mut self) -> &mut P {
        &mut self.playback
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn media(&self) -> Option<&LoadedMedia> {
        self.media.as_ref()
    }

    pub fn current_time(&self) -> TimeSec {
        self.playback.current_time()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Records the media file being synced; its kind is guessed from the extension
    pub fn load_media(&mut self, path: &Path) -> &LoadedMedia {
        let kind = path
            .extension()
            .map(|ext| MediaKind::from_extension(&ext.to_string_lossy()))
            .unwrap_or(MediaKind::Video);
        info!("Loaded media {:?} as {:?}", path, kind);
        self.media.insert(LoadedMedia {
            path: path.to_path_buf(),
            kind,
        })
    }

    /// Replaces the timeline with a parsed SRT or plain-text document.
    ///
    /// History restarts from the loaded state. Returns the caption count.
    pub fn load_document(&mut self, text: &str) -> usize {
        let captions = parse_srt(text, self.ids.as_mut());
        let count = captions.len();
        self.history.reset(&captions);
        self.timeline.replace_captions(captions);
        info!(
            "Loaded {} caption(s), {} already synced",
            count,
            self.timeline.captions.iter().filter(|c| c.is_synced()).count()
        );
        count
    }

    /// Reads and loads a document from disk
    pub fn import_file(&mut self, path: &Path) -> CoreResult<usize> {
        let text = read_text_file(path)?;
        info!("Importing {:?}", path);
        Ok(self.load_document(&text))
    }

    // =========================================================================
    // Editor
    // =========================================================================

    /// Caption texts for the bulk editor, one per line
    pub fn editor_text(&self) -> String {
        self.timeline.editor_text()
    }

    /// Applies bulk-edited text, keeping sync work by position.
    ///
    /// Saving into an empty timeline restarts history; otherwise the edit is
    /// one undo step. Returns the new caption count.
    pub fn save_editor(&mut self, text: &str) -> usize {
        let lines = editor_lines(text);
        let was_empty = self.timeline.is_empty();
        let captions = reflow_from_text(&lines, &self.timeline.captions, self.ids.as_mut());

        if captions == self.timeline.captions {
            debug!("Editor saved without changes");
            return captions.len();
        }

        self.timeline.captions = captions;
        self.timeline.revalidate_active();
        if was_empty {
            self.history.reset(&self.timeline.captions);
        } else {
            self.record();
        }
        info!("Editor saved {} caption(s)", self.timeline.len());
        self.timeline.len()
    }

    // =========================================================================
    // Playback
    // =========================================================================

    /// Re-resolves the active caption from the transport's clock
    pub fn tick(&mut self) -> Option<usize> {
        let time = self.playback.current_time();
        self.timeline.resolve_active(time)
    }

    /// Starts or pauses playback; returns whether it is now playing
    pub fn toggle_play(&mut self) -> bool {
        if self.playback.is_playing() {
            self.playback.pause();
        } else {
            self.playback.play();
        }
        self.playback.is_playing()
    }

    /// Relative seek, clamped into the media. Returns the new position.
    pub fn seek_by(&mut self, delta: TimeSec) -> TimeSec {
        let target = self.playback.current_time() + delta;
        self.scrub(target)
    }

    /// Absolute seek. The active caption follows the new position.
    pub fn scrub(&mut self, time: TimeSec) -> TimeSec {
        self.playback.seek(time);
        self.tick();
        self.playback.current_time()
    }

    /// Activates caption `index` and seeks to its start when it has one
    pub fn jump_to(&mut self, index: usize) -> CoreResult<()> {
        let caption = self
            .timeline
            .captions
            .get(index)
            .ok_or(CoreError::CaptionIndexOutOfRange {
                index,
                len: self.timeline.len(),
            })?;

        if let Some(start) = caption.start_sec {
            self.playback.seek(start);
        }
        self.timeline.set_active(Some(index));
        debug!("Jumped to caption {}", index);
        Ok(())
    }

    // =========================================================================
    // Sync Editing
    // =========================================================================

    /// Tap-to-sync at the transport's current time
    pub fn sync(&mut self) -> SyncOutcome {
        let time = self.playback.current_time();
        let outcome = self.timeline.sync_next(time);
        if let SyncOutcome::Synced { index } = outcome {
            debug!("Synced caption {} at {:.3}s", index, time);
            self.record();
        }
        outcome
    }

    /// Shifts one caption's start; returns false if nothing changed
    pub fn adjust_start(&mut self, index: usize, delta: TimeSec) -> bool {
        let changed = self.timeline.adjust_start(index, delta);
        if changed {
            debug!("Adjusted caption {} start by {:+.3}s", index, delta);
            self.record();
        }
        changed
    }

    /// Shifts the active caption's start
    pub fn nudge_active(&mut self, delta: TimeSec) -> bool {
        match self.timeline.active_index() {
            Some(index) => self.adjust_start(index, delta),
            None => false,
        }
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Restores the previous snapshot; false at the oldest one
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            debug!("Nothing to undo");
            return false;
        };
        self.timeline = Timeline::from_parts(snapshot.captions.clone(), snapshot.active_index);
        true
    }

    /// Restores the next snapshot; false at the newest one
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            debug!("Nothing to redo");
            return false;
        };
        self.timeline = Timeline::from_parts(snapshot.captions.clone(), snapshot.active_index);
        true
    }

    fn record(&mut self) {
        self.history
            .push(&self.timeline.captions, self.timeline.active_index());
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Renders the timeline as SRT, named after the loaded media
    pub fn export(&self) -> ExportedDocument {
        ExportedDocument {
            file_name: export_file_name(self.media.as_ref().map(|media| media.path.as_path())),
            mime_type: SRT_MIME_TYPE.to_string(),
            contents: export_srt_with_duration(
                &self.timeline.captions,
                self.settings.default_caption_sec,
            ),
        }
    }

    /// Writes the export into `dir`, returning the written path
    pub fn export_to_dir(&self, dir: &Path) -> CoreResult<PathBuf> {
        let document = self.export();
        let path = dir.join(&document.file_name);
        atomic_write_bytes(&path, document.contents.as_bytes())?;
        info!("Exported {} caption(s) to {:?}", self.timeline.len(), path);
        Ok(path)
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Runs one action to completion
    pub fn dispatch(&mut self, action: SessionAction) -> CoreResult<ActionOutcome> {
        debug!("Dispatching {:?}", action);
        let outcome = match action {
            SessionAction::TogglePlay => ActionOutcome::Playing(self.toggle_play()),
            SessionAction::SyncNext => match self.sync() {
                SyncOutcome::Synced { index } => ActionOutcome::Synced { index },
                SyncOutcome::EndOfTimeline => ActionOutcome::EndOfTimeline,
            },
            SessionAction::Undo => self.restored(Self::undo),
            SessionAction::Redo => self.restored(Self::redo),
            SessionAction::SeekBy(delta) => ActionOutcome::Seeked {
                time: self.seek_by(delta),
            },
            SessionAction::Scrub(time) => ActionOutcome::Seeked {
                time: self.scrub(time),
            },
            SessionAction::NudgeActive(delta) => match self.timeline.active_index() {
                Some(index) if self.adjust_start(index, delta) => ActionOutcome::Adjusted { index },
                _ => ActionOutcome::Unchanged,
            },
            SessionAction::AdjustStart { index, delta } => {
                if index >= self.timeline.len() {
                    return Err(CoreError::CaptionIndexOutOfRange {
                        index,
                        len: self.timeline.len(),
                    });
                }
                if self.adjust_start(index, delta) {
                    ActionOutcome::Adjusted { index }
                } else {
                    ActionOutcome::Unchanged
                }
            }
            SessionAction::JumpTo(index) => {
                self.jump_to(index)?;
                ActionOutcome::Jumped { index }
            }
            SessionAction::Export => ActionOutcome::Exported(self.export()),
        };
        Ok(outcome)
    }

    fn restored(&mut self, step: fn(&mut Self) -> bool) -> ActionOutcome {
        if step(self) {
            ActionOutcome::Restored {
                active_index: self.timeline.active_index(),
            }
        } else {
            ActionOutcome::Unchanged
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
