//! Element selection state.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;

/// Identity of an element on a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef {
    pub track_id: Uuid,
    pub element_id: Uuid,
}

impl ElementRef {
    pub fn new(track_id: Uuid, element_id: Uuid) -> Self {
        Self {
            track_id,
            element_id,
        }
    }
}

/// Set of selected elements. Membership is unique; order carries no meaning.
///
/// Entries are kept by identity, so shifting an element in time never
/// changes whether it is selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    items: SmallVec<[ElementRef; 4]>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an element. Without `multi` the previous selection is replaced.
    pub fn select(&mut self, item: ElementRef, multi: bool) {
        if !multi {
            self.items.clear();
        }
        if !self.contains(item) {
            self.items.push(item);
        }
    }

    /// Flip membership of an element (shift-click).
    pub fn toggle(&mut self, item: ElementRef) {
        if self.contains(item) {
            self.deselect(item);
        } else {
            self.items.push(item);
        }
    }

    pub fn deselect(&mut self, item: ElementRef) {
        self.items.retain(|i| *i != item);
    }

    /// Drop every entry on the given track.
    pub fn deselect_track(&mut self, track_id: Uuid) {
        self.items.retain(|i| i.track_id != track_id);
    }

    /// Follow an element that moved to another track.
    pub fn rehome(&mut self, element_id: Uuid, track_id: Uuid) {
        for item in self.items.iter_mut().filter(|i| i.element_id == element_id) {
            item.track_id = track_id;
        }
    }

    /// Keep only entries for which `exists` holds.
    pub fn retain(&mut self, mut exists: impl FnMut(&ElementRef) -> bool) {
        self.items.retain(|i| exists(i));
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn contains(&self, item: ElementRef) -> bool {
        self.items.contains(&item)
    }

    pub fn items(&self) -> &[ElementRef] {
        &self.items
    }

    /// The selected element, if exactly one is selected.
    pub fn single(&self) -> Option<ElementRef> {
        match self.items.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
