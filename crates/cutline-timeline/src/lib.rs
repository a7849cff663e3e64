//! Cutline Timeline - Timeline data model and editing engine
//!
//! Implements the timeline structure for video editing:
//! - Tracks (media, text, audio) holding time-placed elements
//! - Edit operations: split, trim, ripple delete, duplicate, audio separation
//! - Snapping, selection and pointer gesture disambiguation
//! - A playback coordinator and per-project bookmarks
//! - An `Editor` context that executes commands and reports notices

pub mod command;
pub mod config;
pub mod drag;
pub mod editor;
pub mod element;
pub mod error;
pub mod history;
pub mod interaction;
pub mod media;
pub mod playback;
pub mod project;
pub mod selection;
pub mod serialization;
pub mod snapping;
pub mod timeline;
pub mod track;

pub use command::{EditorCommand, Outcome};
pub use config::EditorConfig;
pub use drag::DragPayload;
pub use editor::{Editor, SharedEditor};
pub use element::{Element, ElementKind, ElementSpec, TextContent};
pub use error::{EditError, Result};
pub use history::History;
pub use interaction::{ClickOutcome, ClickState, ClickTracker, DragState, ElementDrag, PointerPos};
pub use media::{MediaAsset, MediaError, MediaKind, MediaLibrary, MediaSortKey, SortDirection};
pub use playback::Playback;
pub use project::{Bookmarks, Project};
pub use selection::{ElementRef, Selection};
pub use serialization::ProjectFile;
pub use snapping::{SnapKind, SnapPoint, SnapResult, Snapping};
pub use timeline::{ResizeEdge, Timeline};
pub use track::{Track, TrackKind};
