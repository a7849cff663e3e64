//! Editor commands.
//!
//! Every user action is expressed as an `EditorCommand`. Front ends (the
//! command-line driver, a UI, a collaboration server) build these and hand
//! them to `Editor::execute`; adding a feature means adding a variant here and
//! one match arm in the editor.
//!
//! Times are plain seconds so scripts stay readable; the editor converts them
//! to exact rational time on the way in.

use cutline_core::RationalTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::drag::DragPayload;
use crate::timeline::ResizeEdge;
use crate::track::TrackKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum EditorCommand {
    // ── Tracks ───────────────────────────────────────────────────
    AddTrack {
        kind: TrackKind,
    },
    RemoveTrack {
        track_id: Uuid,
    },
    ToggleTrackMute {
        track_id: Uuid,
    },

    // ── Elements ─────────────────────────────────────────────────
    /// Place a library asset on a track. Its length comes from the library.
    AddMediaElement {
        track_id: Uuid,
        media_id: String,
        #[serde(default)]
        start: f64,
    },
    AddTextElement {
        track_id: Uuid,
        content: String,
        #[serde(default)]
        start: f64,
        /// Defaults to the image placement duration
        #[serde(default)]
        duration: Option<f64>,
    },
    RemoveElement {
        track_id: Uuid,
        element_id: Uuid,
        /// Close the gap; defaults to the timeline ripple toggle
        #[serde(default)]
        ripple: Option<bool>,
    },
    /// Split at `at`, or at the playhead when omitted.
    SplitElement {
        track_id: Uuid,
        element_id: Uuid,
        #[serde(default)]
        at: Option<f64>,
    },
    SplitKeepLeft {
        track_id: Uuid,
        element_id: Uuid,
        #[serde(default)]
        at: Option<f64>,
    },
    SplitKeepRight {
        track_id: Uuid,
        element_id: Uuid,
        #[serde(default)]
        at: Option<f64>,
    },
    SeparateAudio {
        track_id: Uuid,
        element_id: Uuid,
    },
    DuplicateElement {
        track_id: Uuid,
        element_id: Uuid,
    },
    MoveElement {
        from_track: Uuid,
        element_id: Uuid,
        to_track: Uuid,
        start: f64,
    },
    TrimElement {
        track_id: Uuid,
        element_id: Uuid,
        trim_start: f64,
        trim_end: f64,
    },
    SetElementStart {
        track_id: Uuid,
        element_id: Uuid,
        start: f64,
    },
    ResizeElement {
        track_id: Uuid,
        element_id: Uuid,
        edge: ResizeEdge,
        time: f64,
    },
    ToggleElementMute {
        track_id: Uuid,
        element_id: Uuid,
    },

    // ── Selection ────────────────────────────────────────────────
    SelectElement {
        track_id: Uuid,
        element_id: Uuid,
        #[serde(default)]
        multi: bool,
    },
    ToggleSelection {
        track_id: Uuid,
        element_id: Uuid,
    },
    DeselectElement {
        track_id: Uuid,
        element_id: Uuid,
    },
    ClearSelection,
    SelectAll,
    DeleteSelected,
    DuplicateSelected,
    SplitSelected,
    SplitSelectedKeepLeft,
    SplitSelectedKeepRight,

    // ── Pointer gestures (timeline pixels, caller-supplied ms clock) ──
    PointerDown {
        x: f64,
        y: f64,
        at_ms: u64,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp {
        x: f64,
        y: f64,
        at_ms: u64,
    },
    SelectionBoxStarted,
    StartDrag {
        track_id: Uuid,
        element_id: Uuid,
        x: f64,
    },
    UpdateDrag {
        x: f64,
    },
    EndDrag {
        #[serde(default)]
        target_track: Option<Uuid>,
    },
    CancelDrag,
    Drop {
        payload: DragPayload,
        #[serde(default)]
        target_track: Option<Uuid>,
        time: f64,
    },

    // ── Media library ────────────────────────────────────────────
    /// Remove an asset and every element that references it.
    RemoveMedia {
        media_id: String,
    },

    // ── Playback ─────────────────────────────────────────────────
    Play,
    Pause,
    TogglePlayback,
    Seek {
        time: f64,
    },
    Advance {
        delta: f64,
    },

    // ── Bookmarks ────────────────────────────────────────────────
    /// Toggle at `time`, or at the playhead when omitted.
    ToggleBookmark {
        #[serde(default)]
        time: Option<f64>,
    },
    NextBookmark,
    PreviousBookmark,

    // ── Toggles and view ─────────────────────────────────────────
    ToggleSnapping,
    ToggleRipple,
    SetZoom {
        zoom: f64,
    },

    // ── History ──────────────────────────────────────────────────
    Undo,
    Redo,
}

impl EditorCommand {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddTrack { .. } => "add-track",
            Self::RemoveTrack { .. } => "remove-track",
            Self::ToggleTrackMute { .. } => "toggle-track-mute",
            Self::AddMediaElement { .. } => "add-media-element",
            Self::AddTextElement { .. } => "add-text-element",
            Self::RemoveElement { .. } => "remove-element",
            Self::SplitElement { .. } => "split-element",
            Self::SplitKeepLeft { .. } => "split-keep-left",
            Self::SplitKeepRight { .. } => "split-keep-right",
            Self::SeparateAudio { .. } => "separate-audio",
            Self::DuplicateElement { .. } => "duplicate-element",
            Self::MoveElement { .. } => "move-element",
            Self::TrimElement { .. } => "trim-element",
            Self::SetElementStart { .. } => "set-element-start",
            Self::ResizeElement { .. } => "resize-element",
            Self::ToggleElementMute { .. } => "toggle-element-mute",
            Self::SelectElement { .. } => "select-element",
            Self::ToggleSelection { .. } => "toggle-selection",
            Self::DeselectElement { .. } => "deselect-element",
            Self::ClearSelection => "clear-selection",
            Self::SelectAll => "select-all",
            Self::DeleteSelected => "delete-selected",
            Self::DuplicateSelected => "duplicate-selected",
            Self::SplitSelected => "split-selected",
            Self::SplitSelectedKeepLeft => "split-selected-keep-left",
            Self::SplitSelectedKeepRight => "split-selected-keep-right",
            Self::PointerDown { .. } => "pointer-down",
            Self::PointerMove { .. } => "pointer-move",
            Self::PointerUp { .. } => "pointer-up",
            Self::SelectionBoxStarted => "selection-box-started",
            Self::StartDrag { .. } => "start-drag",
            Self::UpdateDrag { .. } => "update-drag",
            Self::EndDrag { .. } => "end-drag",
            Self::CancelDrag => "cancel-drag",
            Self::Drop { .. } => "drop",
            Self::RemoveMedia { .. } => "remove-media",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::TogglePlayback => "toggle-playback",
            Self::Seek { .. } => "seek",
            Self::Advance { .. } => "advance",
            Self::ToggleBookmark { .. } => "toggle-bookmark",
            Self::NextBookmark => "next-bookmark",
            Self::PreviousBookmark => "previous-bookmark",
            Self::ToggleSnapping => "toggle-snapping",
            Self::ToggleRipple => "toggle-ripple",
            Self::SetZoom { .. } => "set-zoom",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }
}

/// What executing a command did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The command changed state.
    Applied,
    /// The command created a track or element.
    Created(Uuid),
    /// Stale target or nothing to do; dropped silently.
    Ignored,
    /// Refused with a message for the user. State is unchanged.
    Notice(String),
    /// A pointer-up was a genuine click: the playhead moved here and the
    /// selection was cleared.
    Click(RationalTime),
}

impl Outcome {
    pub fn is_notice(&self) -> bool {
        matches!(self, Self::Notice(_))
    }

    pub fn created(&self) -> Option<Uuid> {
        match self {
            Self::Created(id) => Some(*id),
            _ => None,
        }
    }
}
