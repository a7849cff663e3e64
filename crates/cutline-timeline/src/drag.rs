//! Payloads carried by drag-and-drop gestures onto the timeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What is being dropped.
///
/// Serialized with a `type` tag so the browser-side drag data and the
/// command scripts share one format:
/// `{"type": "media-item", "media_id": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DragPayload {
    /// An element already on the timeline being moved.
    TimelineElement { track_id: Uuid, element_id: Uuid },
    /// An asset from the media library.
    MediaItem { media_id: String },
    /// A new text element.
    Text { content: String },
}
