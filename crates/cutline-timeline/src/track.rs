//! Track types for the timeline.

use std::fmt;

use cutline_core::{RationalTime, TimeRange};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::element::{Element, ElementKind};

/// Kind of track. Fixed when the track is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Video and image elements
    Media,
    Text,
    Audio,
}

impl TrackKind {
    /// Whether an element of this kind may live on the track.
    pub fn accepts(self, kind: &ElementKind) -> bool {
        match kind {
            ElementKind::Text(_) => self == TrackKind::Text,
            ElementKind::Media { .. } => matches!(self, TrackKind::Media | TrackKind::Audio),
        }
    }

    pub fn default_name(self) -> &'static str {
        match self {
            TrackKind::Media => "Media track",
            TrackKind::Text => "Text track",
            TrackKind::Audio => "Audio track",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrackKind::Media => "media",
            TrackKind::Text => "text",
            TrackKind::Audio => "audio",
        };
        f.write_str(label)
    }
}

/// A track holding elements in insertion order.
///
/// Elements may overlap in time; ordering by time is a presentation concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: Uuid,
    /// Track name
    pub name: String,
    /// Track kind
    pub kind: TrackKind,
    /// Elements in insertion order
    pub elements: Vec<Element>,
    /// Is track muted
    pub muted: bool,
}

impl Track {
    /// Create an empty track of the given kind.
    pub fn new(kind: TrackKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: kind.default_name().to_string(),
            kind,
            elements: Vec::new(),
            muted: false,
        }
    }

    /// End of the last element on this track.
    pub fn end_time(&self) -> RationalTime {
        self.elements
            .iter()
            .map(Element::effective_end)
            .max()
            .unwrap_or(RationalTime::ZERO)
    }

    /// Find an element by UUID. Returns (index, &Element).
    pub fn find_element(&self, id: Uuid) -> Option<(usize, &Element)> {
        self.elements.iter().enumerate().find(|(_, el)| el.id == id)
    }

    /// Remove an element by UUID. Returns the removed element.
    pub fn remove_element(&mut self, id: Uuid) -> Option<Element> {
        let index = self.elements.iter().position(|el| el.id == id)?;
        Some(self.elements.remove(index))
    }

    /// Insert an element at the given index (clamped to the end).
    pub fn insert_element(&mut self, index: usize, element: Element) {
        let index = index.min(self.elements.len());
        self.elements.insert(index, element);
    }

    /// Whether any element other than `except` overlaps `range`.
    pub fn is_range_free(&self, range: TimeRange, except: Option<Uuid>) -> bool {
        !self
            .elements
            .iter()
            .filter(|el| Some(el.id) != except)
            .any(|el| el.effective_range().overlaps(range))
    }

    /// Elements sorted by start time (ties keep insertion order).
    pub fn elements_by_time(&self) -> Vec<&Element> {
        let mut sorted: Vec<&Element> = self.elements.iter().collect();
        sorted.sort_by_key(|el| el.start_time);
        sorted
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
