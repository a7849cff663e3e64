//! The timeline engine: tracks plus every operation that edits them.
//!
//! All mutation goes through the methods here. Each public edit validates
//! first and records an undo snapshot only once it is certain to change the
//! model, so a failed edit leaves both the tracks and the history untouched.

use cutline_core::{FrameRate, RationalTime, TimelineScale};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::element::{min_trimmed_duration, Element, ElementKind, ElementSpec};
use crate::error::{EditError, Result};
use crate::history::History;
use crate::interaction::{DragState, ElementDrag};
use crate::selection::{ElementRef, Selection};
use crate::snapping::{SnapResult, Snapping};
use crate::track::{Track, TrackKind};

/// Which edge of an element a resize gesture holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeEdge {
    Left,
    Right,
}

/// Which part of a split element survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitKeep {
    Both,
    Left,
    Right,
}

/// Tracks of one project together with the transient editing state around
/// them (selection, drag, undo history).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    tracks: Vec<Track>,
    #[serde(default)]
    snapping: Snapping,
    /// Deleting closes the gap left behind
    #[serde(default)]
    ripple_enabled: bool,
    #[serde(skip)]
    selection: Selection,
    #[serde(skip)]
    drag: DragState,
    #[serde(skip)]
    history: History,
}

impl Timeline {
    pub fn new(history_depth: usize) -> Self {
        Self {
            tracks: Vec::new(),
            snapping: Snapping::default(),
            ripple_enabled: false,
            selection: Selection::new(),
            drag: DragState::default(),
            history: History::new(history_depth),
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, track_id: Uuid) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    pub fn element(&self, track_id: Uuid, element_id: Uuid) -> Option<&Element> {
        self.track(track_id)?.find_element(element_id).map(|(_, el)| el)
    }

    /// End of the latest element on any track.
    pub fn content_end(&self) -> RationalTime {
        self.tracks
            .iter()
            .map(Track::end_time)
            .max()
            .unwrap_or(RationalTime::ZERO)
    }

    /// Duration reported to playback: content end, but never below `floor`.
    pub fn total_duration(&self, floor: RationalTime) -> RationalTime {
        self.content_end().max(floor)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Drop all undo state, e.g. after loading a project.
    pub fn reset_history(&mut self, max_depth: usize) {
        self.history = History::new(max_depth);
    }

    pub fn snapping(&self) -> &Snapping {
        &self.snapping
    }

    pub fn snapping_mut(&mut self) -> &mut Snapping {
        &mut self.snapping
    }

    pub fn ripple_enabled(&self) -> bool {
        self.ripple_enabled
    }

    pub fn set_ripple_enabled(&mut self, enabled: bool) {
        self.ripple_enabled = enabled;
    }

    pub fn toggle_snapping(&mut self) -> bool {
        self.snapping.enabled = !self.snapping.enabled;
        self.snapping.enabled
    }

    pub fn toggle_ripple(&mut self) -> bool {
        self.ripple_enabled = !self.ripple_enabled;
        self.ripple_enabled
    }

    // ── Track operations ────────────────────────────────────────

    /// Append an empty track.
    pub fn add_track(&mut self, kind: TrackKind) -> Uuid {
        self.checkpoint();
        let track = Track::new(kind);
        let id = track.id;
        self.tracks.push(track);
        debug!(track = %id, %kind, "Added track");
        id
    }

    /// Remove a track and all its elements.
    pub fn remove_track(&mut self, track_id: Uuid) -> Result<Track> {
        let index = self.track_index(track_id)?;
        self.checkpoint();
        self.selection.deselect_track(track_id);
        Ok(self.tracks.remove(index))
    }

    /// Flip the track mute flag. Returns the new state.
    pub fn toggle_track_mute(&mut self, track_id: Uuid) -> Result<bool> {
        let index = self.track_index(track_id)?;
        self.checkpoint();
        let track = &mut self.tracks[index];
        track.muted = !track.muted;
        Ok(track.muted)
    }

    // ── Element operations ──────────────────────────────────────

    /// Append a new element to a track.
    pub fn add_element_to_track(&mut self, track_id: Uuid, spec: ElementSpec) -> Result<Uuid> {
        let index = self.track_index(track_id)?;
        let track_kind = self.tracks[index].kind;
        if !track_kind.accepts(&spec.kind) {
            return Err(EditError::IncompatibleTrack {
                element: spec.kind.label(),
                track: track_kind,
            });
        }
        self.checkpoint();
        let element = spec.build();
        let id = element.id;
        self.tracks[index].elements.push(element);
        Ok(id)
    }

    /// Create a track of `kind` holding one new element, as a single edit.
    pub fn add_element_on_new_track(&mut self, kind: TrackKind, spec: ElementSpec) -> Result<ElementRef> {
        if !kind.accepts(&spec.kind) {
            return Err(EditError::IncompatibleTrack {
                element: spec.kind.label(),
                track: kind,
            });
        }
        self.checkpoint();
        let mut track = Track::new(kind);
        let element = spec.build();
        let placed = ElementRef::new(track.id, element.id);
        track.elements.push(element);
        self.tracks.push(track);
        debug!(track = %placed.track_id, %kind, "Added track for new element");
        Ok(placed)
    }

    /// Remove every element playing the given media. Returns how many went.
    pub fn remove_elements_with_media(&mut self, media_id: &str) -> usize {
        let uses = |el: &Element| el.media_id() == Some(media_id);
        let count = self
            .tracks
            .iter()
            .flat_map(|t| t.elements.iter())
            .filter(|&el| uses(el))
            .count();
        if count == 0 {
            return 0;
        }
        self.checkpoint();
        for track in &mut self.tracks {
            let track_id = track.id;
            let selection = &mut self.selection;
            track.elements.retain(|el| {
                let keep = !uses(el);
                if !keep {
                    selection.deselect(ElementRef::new(track_id, el.id));
                }
                keep
            });
        }
        count
    }

    /// Delete an element without moving anything else.
    pub fn remove_element_from_track(&mut self, track_id: Uuid, element_id: Uuid) -> Result<Element> {
        let (ti, ei) = self.locate(track_id, element_id)?;
        self.checkpoint();
        Ok(self.take_element(ti, ei, false))
    }

    /// Delete an element and pull every later element on the same track back
    /// by the removed element's effective duration.
    pub fn remove_element_from_track_with_ripple(
        &mut self,
        track_id: Uuid,
        element_id: Uuid,
    ) -> Result<Element> {
        let (ti, ei) = self.locate(track_id, element_id)?;
        self.checkpoint();
        Ok(self.take_element(ti, ei, true))
    }

    /// Split an element in two at `at`. Returns the id of the right part.
    pub fn split_element(&mut self, track_id: Uuid, element_id: Uuid, at: RationalTime) -> Result<Uuid> {
        let (ti, ei) = self.locate_splittable(track_id, element_id, at)?;
        self.checkpoint();
        self.split_at(ti, ei, at, SplitKeep::Both)
            .ok_or(EditError::SplitOutsideElement)
    }

    /// Cut the element at `at`, discarding the right part.
    pub fn split_and_keep_left(&mut self, track_id: Uuid, element_id: Uuid, at: RationalTime) -> Result<()> {
        let (ti, ei) = self.locate_splittable(track_id, element_id, at)?;
        self.checkpoint();
        self.split_at(ti, ei, at, SplitKeep::Left);
        Ok(())
    }

    /// Cut the element at `at`, discarding the left part.
    pub fn split_and_keep_right(&mut self, track_id: Uuid, element_id: Uuid, at: RationalTime) -> Result<()> {
        let (ti, ei) = self.locate_splittable(track_id, element_id, at)?;
        self.checkpoint();
        self.split_at(ti, ei, at, SplitKeep::Right);
        Ok(())
    }

    /// Copy a media element's audio onto an audio track with identical
    /// timing, muting the source. Reuses the first audio track with room for
    /// it, otherwise creates one.
    pub fn separate_audio(&mut self, track_id: Uuid, element_id: Uuid) -> Result<ElementRef> {
        let (ti, ei) = self.locate(track_id, element_id)?;
        let track = &self.tracks[ti];
        let source = &track.elements[ei];
        if track.kind != TrackKind::Media || !matches!(source.kind, ElementKind::Media { .. }) {
            return Err(EditError::NotMediaTrack);
        }

        let range = source.effective_range();
        let mut audio = source.duplicate(source.name.clone(), source.start_time);
        audio.muted = false;
        let audio_id = audio.id;

        self.checkpoint();
        let target = match self
            .tracks
            .iter()
            .position(|t| t.kind == TrackKind::Audio && t.is_range_free(range, None))
        {
            Some(index) => index,
            None => {
                self.tracks.push(Track::new(TrackKind::Audio));
                self.tracks.len() - 1
            }
        };
        self.tracks[target].elements.push(audio);
        self.tracks[ti].elements[ei].muted = true;

        Ok(ElementRef::new(self.tracks[target].id, audio_id))
    }

    /// Place a copy right after the original, `gap` past its effective end.
    pub fn duplicate_element(&mut self, track_id: Uuid, element_id: Uuid, gap: RationalTime) -> Result<Uuid> {
        let (ti, ei) = self.locate(track_id, element_id)?;
        let original = &self.tracks[ti].elements[ei];
        let copy = original.duplicate(
            format!("{} (copy)", original.name),
            original.effective_end() + gap,
        );
        let id = copy.id;
        self.checkpoint();
        self.tracks[ti].insert_element(ei + 1, copy);
        Ok(id)
    }

    /// Duplicate the single selected element, then clear the selection.
    /// Several selected elements are refused rather than guessing how their
    /// copies should be laid out.
    pub fn duplicate_selected(&mut self, gap: RationalTime) -> Result<ElementRef> {
        let target = self.selection.single().ok_or(EditError::InvalidSelection)?;
        let id = self.duplicate_element(target.track_id, target.element_id, gap)?;
        self.selection.clear();
        Ok(ElementRef::new(target.track_id, id))
    }

    /// Move an element to `new_start`, possibly onto another track.
    pub fn move_element(
        &mut self,
        from_track: Uuid,
        element_id: Uuid,
        to_track: Uuid,
        new_start: RationalTime,
    ) -> Result<()> {
        let (ti, ei) = self.locate(from_track, element_id)?;
        let to = self.track_index(to_track)?;
        let kind = &self.tracks[ti].elements[ei].kind;
        let target_kind = self.tracks[to].kind;
        if !target_kind.accepts(kind) {
            return Err(EditError::IncompatibleTrack {
                element: kind.label(),
                track: target_kind,
            });
        }

        self.checkpoint();
        let new_start = new_start.max(RationalTime::ZERO);
        if ti == to {
            self.tracks[ti].elements[ei].start_time = new_start;
        } else {
            let mut element = self.tracks[ti].elements.remove(ei);
            element.start_time = new_start;
            self.tracks[to].elements.push(element);
            self.selection.rehome(element_id, to_track);
        }
        Ok(())
    }

    /// Set both trims, clamped to the source and the minimum element length.
    pub fn update_element_trim(
        &mut self,
        track_id: Uuid,
        element_id: Uuid,
        trim_start: RationalTime,
        trim_end: RationalTime,
    ) -> Result<()> {
        let (ti, ei) = self.locate(track_id, element_id)?;
        self.checkpoint();
        self.tracks[ti].elements[ei].set_trim(trim_start, trim_end, min_trimmed_duration());
        Ok(())
    }

    pub fn update_element_start_time(
        &mut self,
        track_id: Uuid,
        element_id: Uuid,
        start_time: RationalTime,
    ) -> Result<()> {
        let (ti, ei) = self.locate(track_id, element_id)?;
        self.checkpoint();
        self.tracks[ti].elements[ei].start_time = start_time.max(RationalTime::ZERO);
        Ok(())
    }

    /// Drag one edge of an element to `time`. The left edge moves the start
    /// and the head trim together; the right edge moves the tail trim. Both
    /// stop at the source bounds and at the minimum element length.
    pub fn resize_element(
        &mut self,
        track_id: Uuid,
        element_id: Uuid,
        edge: ResizeEdge,
        time: RationalTime,
    ) -> Result<()> {
        let (ti, ei) = self.locate(track_id, element_id)?;
        self.checkpoint();
        let el = &mut self.tracks[ti].elements[ei];
        let keep = min_trimmed_duration().min(el.effective_duration());

        match edge {
            ResizeEdge::Left => {
                let min_start = (el.start_time - el.trim_start).max(RationalTime::ZERO);
                let max_start = el.effective_end() - keep;
                let new_start = time.max(min_start).min(max_start);
                el.trim_start += new_start - el.start_time;
                el.start_time = new_start;
            }
            ResizeEdge::Right => {
                let min_end = el.start_time + keep;
                let max_end = el.effective_end() + el.trim_end;
                let new_end = time.max(min_end).min(max_end);
                el.trim_end -= new_end - el.effective_end();
            }
        }
        Ok(())
    }

    /// Resize gesture with snapping. The held edge is pulled onto the nearest
    /// playhead, element edge or frame boundary (the element's own edges
    /// excluded) before the usual clamping. Returns the snap that applied.
    #[allow(clippy::too_many_arguments)]
    pub fn resize_element_snapped(
        &mut self,
        track_id: Uuid,
        element_id: Uuid,
        edge: ResizeEdge,
        time: RationalTime,
        playhead: RationalTime,
        scale: &TimelineScale,
        rate: FrameRate,
    ) -> Result<Option<SnapResult>> {
        self.locate(track_id, element_id)?;
        let snap = self
            .snapping
            .snap_time(time, &self.tracks, playhead, Some(element_id), scale, rate);
        if let Some(snap) = &snap {
            debug!(
                element = %element_id,
                ?edge,
                to = %snap.time,
                kind = ?snap.point.kind,
                "Resize snapped"
            );
        }
        self.resize_element(track_id, element_id, edge, snap.map_or(time, |s| s.time))?;
        Ok(snap)
    }

    /// Flip an element's audio mute. Returns the new state.
    pub fn toggle_element_mute(&mut self, track_id: Uuid, element_id: Uuid) -> Result<bool> {
        let (ti, ei) = self.locate(track_id, element_id)?;
        self.checkpoint();
        let el = &mut self.tracks[ti].elements[ei];
        el.muted = !el.muted;
        Ok(el.muted)
    }

    // ── Selection-driven batch operations ───────────────────────

    /// Delete every selected element (rippling when enabled) and clear the
    /// selection. Returns how many were removed.
    pub fn delete_selected(&mut self) -> Result<usize> {
        let targets = self.existing_selection();
        if targets.is_empty() {
            return Err(EditError::EmptySelection);
        }
        self.checkpoint();
        let ripple = self.ripple_enabled;
        let mut removed = 0;
        for target in targets {
            if let Ok((ti, ei)) = self.locate(target.track_id, target.element_id) {
                self.take_element(ti, ei, ripple);
                removed += 1;
            }
        }
        self.selection.clear();
        Ok(removed)
    }

    /// Split every selected element containing `at`. Returns the new ids.
    pub fn split_selected(&mut self, at: RationalTime) -> Result<Vec<Uuid>> {
        self.split_selection(at, SplitKeep::Both).map(|(_, created)| created)
    }

    /// Cut every selected element containing `at`, keeping the left parts.
    /// Returns how many elements were cut.
    pub fn split_selected_keep_left(&mut self, at: RationalTime) -> Result<usize> {
        self.split_selection(at, SplitKeep::Left).map(|(count, _)| count)
    }

    pub fn split_selected_keep_right(&mut self, at: RationalTime) -> Result<usize> {
        self.split_selection(at, SplitKeep::Right).map(|(count, _)| count)
    }

    fn split_selection(&mut self, at: RationalTime, keep: SplitKeep) -> Result<(usize, Vec<Uuid>)> {
        let selected = self.existing_selection();
        if selected.is_empty() {
            return Err(EditError::EmptySelection);
        }
        let targets: Vec<(Uuid, Uuid)> = selected
            .iter()
            .filter(|r| {
                self.element(r.track_id, r.element_id)
                    .is_some_and(|el| el.effective_range().strictly_contains(at))
            })
            .map(|r| (r.track_id, r.element_id))
            .collect();
        if targets.is_empty() {
            return Err(EditError::NoElementAtPlayhead);
        }

        self.checkpoint();
        let count = targets.len();
        let mut created = Vec::new();
        for (track_id, element_id) in targets {
            if let Ok((ti, ei)) = self.locate(track_id, element_id) {
                created.extend(self.split_at(ti, ei, at, keep));
            }
        }
        debug!(count, ?keep, "Split selected elements");
        Ok((count, created))
    }

    // ── Selection ───────────────────────────────────────────────

    /// Select an element; without `multi` the previous selection is replaced.
    pub fn select_element(&mut self, track_id: Uuid, element_id: Uuid, multi: bool) -> Result<()> {
        self.locate(track_id, element_id)?;
        self.selection.select(ElementRef::new(track_id, element_id), multi);
        Ok(())
    }

    pub fn toggle_element_selection(&mut self, track_id: Uuid, element_id: Uuid) -> Result<()> {
        self.locate(track_id, element_id)?;
        self.selection.toggle(ElementRef::new(track_id, element_id));
        Ok(())
    }

    pub fn deselect_element(&mut self, track_id: Uuid, element_id: Uuid) {
        self.selection.deselect(ElementRef::new(track_id, element_id));
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn select_all(&mut self) {
        self.selection.clear();
        for track in &self.tracks {
            for el in &track.elements {
                self.selection.select(ElementRef::new(track.id, el.id), true);
            }
        }
    }

    pub fn is_selected(&self, track_id: Uuid, element_id: Uuid) -> bool {
        self.selection.contains(ElementRef::new(track_id, element_id))
    }

    // ── Drag gestures ───────────────────────────────────────────

    /// Pick up an element. Grabbing an unselected element makes it the only
    /// selection.
    pub fn start_drag(
        &mut self,
        track_id: Uuid,
        element_id: Uuid,
        pointer_x: f64,
        pointer_time: RationalTime,
    ) -> Result<()> {
        let (ti, ei) = self.locate(track_id, element_id)?;
        let start = self.tracks[ti].elements[ei].start_time;
        if !self.is_selected(track_id, element_id) {
            self.selection.select(ElementRef::new(track_id, element_id), false);
        }
        self.drag.start(ElementDrag {
            element_id,
            track_id,
            start_pointer_x: pointer_x,
            start_element_time: start,
            click_offset: pointer_time - start,
            current_time: start,
        });
        Ok(())
    }

    /// Follow the pointer. Returns the proposed start time after snapping,
    /// or `None` when no drag is in progress.
    pub fn update_drag(
        &mut self,
        pointer_time: RationalTime,
        playhead: RationalTime,
        scale: &TimelineScale,
        rate: FrameRate,
    ) -> Option<RationalTime> {
        let drag = *self.drag.active()?;
        let length = self
            .element(drag.track_id, drag.element_id)
            .map(Element::effective_duration)?;
        let proposed = (pointer_time - drag.click_offset).max(RationalTime::ZERO);
        let snap = self.snapping.snap_element_move(
            drag.element_id,
            proposed,
            length,
            &self.tracks,
            playhead,
            scale,
            rate,
        );
        let start = snap
            .map(|s| s.time.max(RationalTime::ZERO))
            .unwrap_or(proposed);
        self.drag.update(start, snap);
        Some(start)
    }

    /// Drop the dragged element at its last proposed start, on `target_track`
    /// or back on its own track.
    pub fn end_drag(&mut self, target_track: Option<Uuid>) -> Result<()> {
        let Some(drag) = self.drag.end() else {
            return Ok(());
        };
        let target = target_track.unwrap_or(drag.track_id);
        if target == drag.track_id && drag.current_time == drag.start_element_time {
            return Ok(());
        }
        self.move_element(drag.track_id, drag.element_id, target, drag.current_time)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.end();
    }

    // ── History ─────────────────────────────────────────────────

    pub fn undo(&mut self) -> Result<()> {
        let previous = self
            .history
            .undo(self.tracks.clone())
            .ok_or(EditError::NothingToUndo)?;
        self.restore(previous);
        Ok(())
    }

    pub fn redo(&mut self) -> Result<()> {
        let next = self
            .history
            .redo(self.tracks.clone())
            .ok_or(EditError::NothingToRedo)?;
        self.restore(next);
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────

    fn checkpoint(&mut self) {
        self.history.push(self.tracks.clone());
    }

    fn restore(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.drag.end();
        let tracks = &self.tracks;
        self.selection.retain(|r| {
            tracks
                .iter()
                .any(|t| t.id == r.track_id && t.find_element(r.element_id).is_some())
        });
    }

    fn track_index(&self, track_id: Uuid) -> Result<usize> {
        self.tracks
            .iter()
            .position(|t| t.id == track_id)
            .ok_or(EditError::TrackNotFound(track_id))
    }

    fn locate(&self, track_id: Uuid, element_id: Uuid) -> Result<(usize, usize)> {
        let ti = self.track_index(track_id)?;
        let ei = self.tracks[ti]
            .find_element(element_id)
            .map(|(i, _)| i)
            .ok_or(EditError::ElementNotFound {
                track: track_id,
                element: element_id,
            })?;
        Ok((ti, ei))
    }

    fn locate_splittable(&self, track_id: Uuid, element_id: Uuid, at: RationalTime) -> Result<(usize, usize)> {
        let (ti, ei) = self.locate(track_id, element_id)?;
        if !self.tracks[ti].elements[ei].effective_range().strictly_contains(at) {
            return Err(EditError::SplitOutsideElement);
        }
        Ok((ti, ei))
    }

    fn existing_selection(&self) -> Vec<ElementRef> {
        self.selection
            .items()
            .iter()
            .copied()
            .filter(|r| self.element(r.track_id, r.element_id).is_some())
            .collect()
    }

    /// Remove an element, optionally closing the gap it leaves on its track.
    fn take_element(&mut self, ti: usize, ei: usize, ripple: bool) -> Element {
        let track = &mut self.tracks[ti];
        let removed = track.elements.remove(ei);
        if ripple {
            let cut = removed.effective_end();
            let shift = removed.effective_duration();
            for el in track.elements.iter_mut().filter(|el| el.start_time >= cut) {
                el.start_time -= shift;
            }
        }
        self.selection.deselect(ElementRef::new(track.id, removed.id));
        removed
    }

    /// Caller has checked that `at` lies strictly inside the element.
    fn split_at(&mut self, ti: usize, ei: usize, at: RationalTime, keep: SplitKeep) -> Option<Uuid> {
        let track = &mut self.tracks[ti];
        match keep {
            SplitKeep::Left => {
                track.elements[ei].end_at(at);
                None
            }
            SplitKeep::Right => {
                track.elements[ei].begin_at(at);
                None
            }
            SplitKeep::Both => {
                let original = &mut track.elements[ei];
                let mut right = original.duplicate(format!("{} (right)", original.name), original.start_time);
                right.begin_at(at);
                original.end_at(at);
                let id = right.id;
                track.insert_element(ei + 1, right);
                Some(id)
            }
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(100)
    }
}

// ── Tests ───────────────────────────────────────────────────────
