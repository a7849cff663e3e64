//! The editor context: one project with its playback, media library and
//! configuration, driven by `EditorCommand`s.
//!
//! Engine failures are split two ways here. Not-found errors come from stale
//! commands racing a deletion and are dropped with a debug log; every other
//! error becomes a `Notice` for the user. Either way the model is unchanged.
//! After every command the playback duration is recomputed from the tracks.

use std::sync::Arc;
use std::time::Duration;

use cutline_core::{RationalTime, TimelineScale};
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::command::{EditorCommand, Outcome};
use crate::config::EditorConfig;
use crate::drag::DragPayload;
use crate::element::{ElementSpec, TextContent};
use crate::error::{EditError, Result};
use crate::interaction::{ClickOutcome, ClickTracker, PointerPos};
use crate::media::{MediaAsset, MediaError, MediaLibrary};
use crate::playback::Playback;
use crate::project::Project;
use crate::serialization::ProjectFile;
use crate::timeline::Timeline;
use crate::track::TrackKind;

/// An editor shared between threads; commands are serialized per project.
pub type SharedEditor = Arc<Mutex<Editor>>;

const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 16.0;

fn secs(value: f64) -> RationalTime {
    RationalTime::from_seconds_f64(value)
}

pub struct Editor {
    project: Project,
    library: MediaLibrary,
    playback: Playback,
    config: EditorConfig,
    clicks: ClickTracker,
    zoom: f64,
}

impl Editor {
    /// Editor over a fresh, empty project.
    pub fn new(config: EditorConfig) -> Self {
        let project = Project::default().with_frame_rate(config.frame_rate);
        Self::with_project(project, MediaLibrary::new(), config)
    }

    pub fn with_project(mut project: Project, library: MediaLibrary, config: EditorConfig) -> Self {
        project.timeline.reset_history(config.history_depth);
        project.timeline.snapping_mut().threshold_px = config.snap_threshold_px;
        let clicks = ClickTracker::new(
            config.click_max_movement_px,
            Duration::from_millis(config.click_max_duration_ms),
        );
        let mut editor = Self {
            project,
            library,
            playback: Playback::new(RationalTime::ZERO),
            config,
            clicks,
            zoom: 1.0,
        };
        editor.sync_duration();
        editor
    }

    pub fn from_file(file: ProjectFile, config: EditorConfig) -> Self {
        Self::with_project(file.project, file.media, config)
    }

    /// Snapshot for saving.
    pub fn to_file(&self) -> ProjectFile {
        ProjectFile::new(self.project.clone(), self.library.clone())
    }

    pub fn into_shared(self) -> SharedEditor {
        Arc::new(Mutex::new(self))
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn timeline(&self) -> &Timeline {
        &self.project.timeline
    }

    pub fn library(&self) -> &MediaLibrary {
        &self.library
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn scale(&self) -> TimelineScale {
        self.config.scale(self.zoom)
    }

    pub fn total_duration(&self) -> RationalTime {
        self.project
            .timeline
            .total_duration(self.config.min_timeline_duration())
    }

    // ── Entry points ────────────────────────────────────────────

    /// Execute one command.
    pub fn execute(&mut self, command: EditorCommand) -> Outcome {
        let name = command.name();
        debug!(command = name, "Executing command");
        let result = self.apply(command);
        self.finish(name, result)
    }

    /// Take the outcome of media processing. On success the asset joins the
    /// library and lands on a new track of matching kind at `at` (or 0). On
    /// failure neither happens.
    pub fn import_media(
        &mut self,
        processed: std::result::Result<MediaAsset, MediaError>,
        at: Option<RationalTime>,
    ) -> Outcome {
        let asset = match processed {
            Ok(asset) => asset,
            Err(err) => {
                warn!(error = %err, "Media import failed");
                return Outcome::Notice(err.to_string());
            }
        };

        let spec = self.media_spec(&asset, at.unwrap_or(RationalTime::ZERO));
        let kind = asset.kind.track_kind();
        let result = self
            .project
            .timeline
            .add_element_on_new_track(kind, spec)
            .map(|placed| Outcome::Created(placed.element_id));
        if result.is_ok() {
            info!(media = %asset.id, kind = ?asset.kind, name = %asset.name, "Imported media");
            self.library.add(asset);
        }
        self.finish("import-media", result)
    }

    /// Handle a drop onto the timeline at `time`, optionally over a track.
    pub fn drop_payload(&mut self, payload: DragPayload, target_track: Option<Uuid>, time: RationalTime) -> Outcome {
        let result = self.place_payload(payload, target_track, time);
        self.finish("drop", result)
    }

    fn finish(&mut self, name: &'static str, result: Result<Outcome>) -> Outcome {
        self.sync_duration();
        match result {
            Ok(outcome) => outcome,
            Err(err) if err.is_not_found() => {
                debug!(command = name, error = %err, "Ignoring stale command");
                Outcome::Ignored
            }
            Err(err) => {
                warn!(command = name, "{}", err);
                Outcome::Notice(err.to_string())
            }
        }
    }

    fn sync_duration(&mut self) {
        let duration = self.total_duration();
        self.playback.set_duration(duration);
    }

    // ── Dispatch ────────────────────────────────────────────────

    fn apply(&mut self, command: EditorCommand) -> Result<Outcome> {
        let playhead = self.playback.current_time();
        let gap = self.config.duplicate_gap();
        let timeline = &mut self.project.timeline;

        match command {
            EditorCommand::AddTrack { kind } => Ok(Outcome::Created(timeline.add_track(kind))),
            EditorCommand::RemoveTrack { track_id } => timeline.remove_track(track_id).map(|_| Outcome::Applied),
            EditorCommand::ToggleTrackMute { track_id } => {
                timeline.toggle_track_mute(track_id).map(|_| Outcome::Applied)
            }

            EditorCommand::AddMediaElement {
                track_id,
                media_id,
                start,
            } => {
                let asset = self
                    .library
                    .get(&media_id)
                    .ok_or(EditError::MediaNotFound(media_id))?;
                let spec = self.media_spec(asset, secs(start));
                self.project
                    .timeline
                    .add_element_to_track(track_id, spec)
                    .map(Outcome::Created)
            }
            EditorCommand::AddTextElement {
                track_id,
                content,
                start,
                duration,
            } => {
                let duration = duration
                    .map(secs)
                    .unwrap_or_else(|| self.config.default_image_duration());
                let spec = ElementSpec::text(TextContent::new(content), duration).at(secs(start));
                timeline.add_element_to_track(track_id, spec).map(Outcome::Created)
            }
            EditorCommand::RemoveElement {
                track_id,
                element_id,
                ripple,
            } => {
                let removed = if ripple.unwrap_or(timeline.ripple_enabled()) {
                    timeline.remove_element_from_track_with_ripple(track_id, element_id)
                } else {
                    timeline.remove_element_from_track(track_id, element_id)
                };
                removed.map(|_| Outcome::Applied)
            }
            EditorCommand::SplitElement {
                track_id,
                element_id,
                at,
            } => timeline
                .split_element(track_id, element_id, at.map(secs).unwrap_or(playhead))
                .map(Outcome::Created),
            EditorCommand::SplitKeepLeft {
                track_id,
                element_id,
                at,
            } => timeline
                .split_and_keep_left(track_id, element_id, at.map(secs).unwrap_or(playhead))
                .map(|_| Outcome::Applied),
            EditorCommand::SplitKeepRight {
                track_id,
                element_id,
                at,
            } => timeline
                .split_and_keep_right(track_id, element_id, at.map(secs).unwrap_or(playhead))
                .map(|_| Outcome::Applied),
            EditorCommand::SeparateAudio { track_id, element_id } => timeline
                .separate_audio(track_id, element_id)
                .map(|audio| Outcome::Created(audio.element_id)),
            EditorCommand::DuplicateElement { track_id, element_id } => timeline
                .duplicate_element(track_id, element_id, gap)
                .map(Outcome::Created),
            EditorCommand::MoveElement {
                from_track,
                element_id,
                to_track,
                start,
            } => timeline
                .move_element(from_track, element_id, to_track, secs(start))
                .map(|_| Outcome::Applied),
            EditorCommand::TrimElement {
                track_id,
                element_id,
                trim_start,
                trim_end,
            } => timeline
                .update_element_trim(track_id, element_id, secs(trim_start), secs(trim_end))
                .map(|_| Outcome::Applied),
            EditorCommand::SetElementStart {
                track_id,
                element_id,
                start,
            } => timeline
                .update_element_start_time(track_id, element_id, secs(start))
                .map(|_| Outcome::Applied),
            EditorCommand::ResizeElement {
                track_id,
                element_id,
                edge,
                time,
            } => {
                let scale = self.scale();
                let rate = self.project.frame_rate;
                self.project
                    .timeline
                    .resize_element_snapped(track_id, element_id, edge, secs(time), playhead, &scale, rate)
                    .map(|_| Outcome::Applied)
            }
            EditorCommand::ToggleElementMute { track_id, element_id } => timeline
                .toggle_element_mute(track_id, element_id)
                .map(|_| Outcome::Applied),

            EditorCommand::SelectElement {
                track_id,
                element_id,
                multi,
            } => timeline
                .select_element(track_id, element_id, multi)
                .map(|_| Outcome::Applied),
            EditorCommand::ToggleSelection { track_id, element_id } => timeline
                .toggle_element_selection(track_id, element_id)
                .map(|_| Outcome::Applied),
            EditorCommand::DeselectElement { track_id, element_id } => {
                timeline.deselect_element(track_id, element_id);
                Ok(Outcome::Applied)
            }
            EditorCommand::ClearSelection => {
                timeline.clear_selection();
                Ok(Outcome::Applied)
            }
            EditorCommand::SelectAll => {
                timeline.select_all();
                Ok(Outcome::Applied)
            }
            EditorCommand::DeleteSelected => timeline.delete_selected().map(|_| Outcome::Applied),
            EditorCommand::DuplicateSelected => timeline
                .duplicate_selected(gap)
                .map(|copy| Outcome::Created(copy.element_id)),
            EditorCommand::SplitSelected => timeline.split_selected(playhead).map(|_| Outcome::Applied),
            EditorCommand::SplitSelectedKeepLeft => timeline
                .split_selected_keep_left(playhead)
                .map(|_| Outcome::Applied),
            EditorCommand::SplitSelectedKeepRight => timeline
                .split_selected_keep_right(playhead)
                .map(|_| Outcome::Applied),

            EditorCommand::PointerDown { x, y, at_ms } => {
                self.clicks
                    .pointer_down(PointerPos::new(x, y), Duration::from_millis(at_ms));
                Ok(Outcome::Applied)
            }
            EditorCommand::PointerMove { x, y } => {
                self.clicks.pointer_move(PointerPos::new(x, y));
                Ok(Outcome::Applied)
            }
            EditorCommand::PointerUp { x, y, at_ms } => {
                Ok(self.pointer_up(PointerPos::new(x, y), Duration::from_millis(at_ms)))
            }
            EditorCommand::SelectionBoxStarted => {
                self.clicks.selection_box_started();
                Ok(Outcome::Applied)
            }
            EditorCommand::StartDrag {
                track_id,
                element_id,
                x,
            } => {
                let pointer_time = self.scale().px_to_time(x);
                self.project
                    .timeline
                    .start_drag(track_id, element_id, x, pointer_time)
                    .map(|_| Outcome::Applied)
            }
            EditorCommand::UpdateDrag { x } => {
                let scale = self.scale();
                let rate = self.project.frame_rate;
                let moved = self
                    .project
                    .timeline
                    .update_drag(scale.px_to_time(x), playhead, &scale, rate);
                Ok(moved.map_or(Outcome::Ignored, |_| Outcome::Applied))
            }
            EditorCommand::EndDrag { target_track } => {
                timeline.end_drag(target_track).map(|_| Outcome::Applied)
            }
            EditorCommand::CancelDrag => {
                timeline.cancel_drag();
                Ok(Outcome::Applied)
            }
            EditorCommand::Drop {
                payload,
                target_track,
                time,
            } => self.place_payload(payload, target_track, secs(time)),

            EditorCommand::RemoveMedia { media_id } => {
                self.library
                    .remove(&media_id)
                    .ok_or_else(|| EditError::MediaNotFound(media_id.clone()))?;
                let removed = self.project.timeline.remove_elements_with_media(&media_id);
                info!(media = %media_id, elements = removed, "Removed media");
                Ok(Outcome::Applied)
            }

            EditorCommand::Play => {
                self.playback.play();
                Ok(Outcome::Applied)
            }
            EditorCommand::Pause => {
                self.playback.pause();
                Ok(Outcome::Applied)
            }
            EditorCommand::TogglePlayback => {
                self.playback.toggle();
                Ok(Outcome::Applied)
            }
            EditorCommand::Seek { time } => {
                self.playback.seek(secs(time));
                Ok(Outcome::Applied)
            }
            EditorCommand::Advance { delta } => {
                self.playback.advance(secs(delta));
                Ok(Outcome::Applied)
            }

            EditorCommand::ToggleBookmark { time } => {
                self.project.toggle_bookmark(time.map(secs).unwrap_or(playhead));
                Ok(Outcome::Applied)
            }
            EditorCommand::NextBookmark => Ok(self.seek_to(self.project.bookmarks.next_after(playhead))),
            EditorCommand::PreviousBookmark => {
                Ok(self.seek_to(self.project.bookmarks.previous_before(playhead)))
            }

            EditorCommand::ToggleSnapping => {
                timeline.toggle_snapping();
                Ok(Outcome::Applied)
            }
            EditorCommand::ToggleRipple => {
                timeline.toggle_ripple();
                Ok(Outcome::Applied)
            }
            EditorCommand::SetZoom { zoom } => {
                if !zoom.is_finite() {
                    return Ok(Outcome::Ignored);
                }
                self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
                Ok(Outcome::Applied)
            }

            EditorCommand::Undo => timeline.undo().map(|_| Outcome::Applied),
            EditorCommand::Redo => timeline.redo().map(|_| Outcome::Applied),
        }
    }

    // ── Helpers ─────────────────────────────────────────────────

    fn media_spec(&self, asset: &MediaAsset, start: RationalTime) -> ElementSpec {
        let duration = asset.placement_duration(self.config.default_image_duration());
        ElementSpec::media(asset.name.clone(), asset.id.clone(), duration).at(start)
    }

    /// A background click seeks and clears the selection, unless an element
    /// drag is in progress.
    fn pointer_up(&mut self, pos: PointerPos, now: Duration) -> Outcome {
        match self.clicks.pointer_up(pos, now) {
            ClickOutcome::Click(pos) if !self.project.timeline.drag().is_dragging() => {
                let time = self.scale().px_to_time(pos.x);
                self.playback.seek(time);
                self.project.timeline.clear_selection();
                Outcome::Click(self.playback.current_time())
            }
            _ => Outcome::Ignored,
        }
    }

    fn seek_to(&mut self, time: Option<RationalTime>) -> Outcome {
        match time {
            Some(time) => {
                self.playback.seek(time);
                Outcome::Applied
            }
            None => Outcome::Ignored,
        }
    }

    fn place_payload(&mut self, payload: DragPayload, target_track: Option<Uuid>, time: RationalTime) -> Result<Outcome> {
        match payload {
            DragPayload::TimelineElement { track_id, element_id } => self
                .project
                .timeline
                .move_element(track_id, element_id, target_track.unwrap_or(track_id), time)
                .map(|_| Outcome::Applied),
            DragPayload::MediaItem { media_id } => {
                let asset = self
                    .library
                    .get(&media_id)
                    .ok_or(EditError::MediaNotFound(media_id))?;
                let spec = self.media_spec(asset, time);
                let kind = asset.kind.track_kind();
                self.place_spec(spec, kind, target_track)
            }
            DragPayload::Text { content } => {
                let spec = ElementSpec::text(TextContent::new(content), self.config.default_image_duration()).at(time);
                self.place_spec(spec, TrackKind::Text, target_track)
            }
        }
    }

    /// Add onto the target track when it has the wanted kind, otherwise onto
    /// a new track.
    fn place_spec(&mut self, spec: ElementSpec, kind: TrackKind, target_track: Option<Uuid>) -> Result<Outcome> {
        let timeline = &mut self.project.timeline;
        let target = target_track.filter(|id| timeline.track(*id).is_some_and(|t| t.kind == kind));
        match target {
            Some(track_id) => timeline.add_element_to_track(track_id, spec).map(Outcome::Created),
            None => timeline
                .add_element_on_new_track(kind, spec)
                .map(|placed| Outcome::Created(placed.element_id)),
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
