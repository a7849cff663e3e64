//! Pointer gesture state: click-versus-drag disambiguation and element drags.
//!
//! Pointer-up fires the same way for a click on the background and for the end
//! of a drag, resize or marquee gesture, so a press is only treated as a click
//! (seek + clear selection) when it stayed put and was short.

use std::time::Duration;

use cutline_core::RationalTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::snapping::SnapResult;

/// Pointer position in timeline pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPos {
    pub x: f64,
    pub y: f64,
}

impl PointerPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Background press state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ClickState {
    #[default]
    Idle,
    /// Pressed on the background; still a click candidate.
    Armed { pos: PointerPos, at: Duration },
    /// Moved too far or started a selection box.
    Dragging,
}

/// How a pointer-up should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// A genuine click at this position: seek there and clear the selection.
    Click(PointerPos),
    /// Tail of a drag, resize or marquee gesture.
    DragEnd,
    /// No press was in progress.
    Ignored,
}

/// State machine `Idle → Armed → (Dragging) → Idle` for background presses.
///
/// Timestamps are monotonic offsets supplied by the caller.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    state: ClickState,
    max_movement_px: f64,
    max_duration: Duration,
}

impl ClickTracker {
    pub fn new(max_movement_px: f64, max_duration: Duration) -> Self {
        Self {
            state: ClickState::Idle,
            max_movement_px,
            max_duration,
        }
    }

    pub fn state(&self) -> ClickState {
        self.state
    }

    /// Press on the empty background.
    pub fn pointer_down(&mut self, pos: PointerPos, now: Duration) {
        self.state = ClickState::Armed { pos, at: now };
    }

    pub fn pointer_move(&mut self, pos: PointerPos) {
        if let ClickState::Armed { pos: origin, .. } = self.state {
            if origin.distance(pos) >= self.max_movement_px {
                self.state = ClickState::Dragging;
            }
        }
    }

    /// A marquee selection began; whatever follows is not a click.
    pub fn selection_box_started(&mut self) {
        self.state = ClickState::Dragging;
    }

    pub fn pointer_up(&mut self, pos: PointerPos, now: Duration) -> ClickOutcome {
        match std::mem::take(&mut self.state) {
            ClickState::Idle => ClickOutcome::Ignored,
            ClickState::Dragging => ClickOutcome::DragEnd,
            ClickState::Armed { pos: origin, at } => {
                let still = origin.distance(pos) < self.max_movement_px;
                let quick = now.saturating_sub(at) < self.max_duration;
                if still && quick {
                    ClickOutcome::Click(pos)
                } else {
                    ClickOutcome::DragEnd
                }
            }
        }
    }

}

impl Default for ClickTracker {
    fn default() -> Self {
        Self::new(5.0, Duration::from_millis(500))
    }
}

/// An element move gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementDrag {
    pub element_id: Uuid,
    /// Track the element was picked up from
    pub track_id: Uuid,
    pub start_pointer_x: f64,
    /// Element start when the drag began
    pub start_element_time: RationalTime,
    /// Distance from the element start to the grab point
    pub click_offset: RationalTime,
    /// Latest proposed start time
    pub current_time: RationalTime,
}

/// Transient drag tracking. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragState {
    active: Option<ElementDrag>,
    snap_indicator: Option<SnapResult>,
}

impl DragState {
    pub fn start(&mut self, drag: ElementDrag) {
        self.active = Some(drag);
        self.snap_indicator = None;
    }

    /// Record a new proposed start and the snap that produced it.
    pub fn update(&mut self, current_time: RationalTime, snap: Option<SnapResult>) {
        if let Some(drag) = self.active.as_mut() {
            drag.current_time = current_time;
            self.snap_indicator = snap;
        }
    }

    /// Finish the gesture, returning its final state.
    pub fn end(&mut self) -> Option<ElementDrag> {
        self.snap_indicator = None;
        self.active.take()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ElementDrag> {
        self.active.as_ref()
    }

    /// Snap indicator, shown only while a drag is in progress.
    pub fn snap_indicator(&self) -> Option<&SnapResult> {
        self.active.as_ref().and(self.snap_indicator.as_ref())
    }
}
