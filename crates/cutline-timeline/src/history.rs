//! Undo/redo history.
//!
//! Every mutating engine operation records the track list as it was before
//! the edit. Snapshots make compound edits (ripple, split, audio separation)
//! undoable without a hand-written inverse per operation.

use crate::track::Track;

/// Undo/redo history stack of track-list snapshots.
#[derive(Debug, Clone)]
pub struct History {
    /// States before executed edits (most recent last).
    undo: Vec<Vec<Track>>,
    /// States replaced by undo (most recent last).
    redo: Vec<Vec<Track>>,
    /// Maximum history depth.
    max_depth: usize,
}

impl History {
    /// Create a new history with the given maximum depth.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth,
        }
    }

    /// Record the state before an edit.
    /// Clears the redo stack (new action invalidates redo history).
    pub fn push(&mut self, before: Vec<Track>) {
        self.redo.clear();
        self.undo.push(before);
        if self.undo.len() > self.max_depth {
            self.undo.remove(0);
        }
    }

    /// Step back: takes the current state, returns the state to restore.
    pub fn undo(&mut self, current: Vec<Track>) -> Option<Vec<Track>> {
        let previous = self.undo.pop()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Step forward: takes the current state, returns the state to restore.
    pub fn redo(&mut self, current: Vec<Track>) -> Option<Vec<Track>> {
        let next = self.redo.pop()?;
        self.undo.push(current);
        Some(next)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Clear all history.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.undo.len()
    }

    /// Number of redo steps available.
    pub fn redo_count(&self) -> usize {
        self.redo.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(100)
    }
}
