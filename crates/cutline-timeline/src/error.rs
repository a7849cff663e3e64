//! Timeline engine errors.

use cutline_core::CutlineError;
use thiserror::Error;
use uuid::Uuid;

use crate::track::TrackKind;

/// Why an edit could not be applied.
///
/// Not-found variants come from stale commands and are dropped silently by the
/// editor; every other variant carries a message meant for the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("track {0} not found")]
    TrackNotFound(Uuid),
    #[error("element {element} not found on track {track}")]
    ElementNotFound { track: Uuid, element: Uuid },
    #[error("media {0} not found")]
    MediaNotFound(String),
    #[error("Playhead must be within element")]
    SplitOutsideElement,
    #[error("Playhead must be within a selected element")]
    NoElementAtPlayhead,
    #[error("{element} elements cannot be placed on a {track} track")]
    IncompatibleTrack {
        element: &'static str,
        track: TrackKind,
    },
    #[error("Audio can only be separated from media track elements")]
    NotMediaTrack,
    #[error("Select exactly one element to duplicate")]
    InvalidSelection,
    #[error("No elements selected")]
    EmptySelection,
    #[error("Nothing to undo")]
    NothingToUndo,
    #[error("Nothing to redo")]
    NothingToRedo,
}

impl EditError {
    /// Stale ids: the target vanished between the user's gesture and the command.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TrackNotFound(_) | Self::ElementNotFound { .. } | Self::MediaNotFound(_)
        )
    }
}

impl From<EditError> for CutlineError {
    fn from(err: EditError) -> Self {
        if err.is_not_found() {
            CutlineError::NotFound(err.to_string())
        } else {
            CutlineError::Timeline(err.to_string())
        }
    }
}

/// Result type alias for timeline edits.
pub type Result<T> = std::result::Result<T, EditError>;
