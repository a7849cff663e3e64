//! Project and bookmark types.

use cutline_core::{FrameRate, RationalTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timeline::Timeline;

/// A project: one timeline plus the settings and markers around it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,
    /// Project name
    pub name: String,
    /// Frame rate used for quantizing times
    pub frame_rate: FrameRate,
    /// Bookmarked times
    #[serde(default)]
    pub bookmarks: Bookmarks,
    pub timeline: Timeline,
}

impl Project {
    /// Create a new empty project.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            frame_rate: FrameRate::default(),
            bookmarks: Bookmarks::default(),
            timeline: Timeline::default(),
        }
    }

    pub fn with_frame_rate(mut self, frame_rate: FrameRate) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// Toggle a bookmark at `time` (quantized to the project frame rate).
    /// Returns whether the time is bookmarked afterwards.
    pub fn toggle_bookmark(&mut self, time: RationalTime) -> bool {
        self.bookmarks.toggle(time, self.frame_rate)
    }

    pub fn is_bookmarked(&self, time: RationalTime) -> bool {
        self.bookmarks.contains(time, self.frame_rate)
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new("Untitled Project")
    }
}

/// Ordered, duplicate-free bookmark times.
///
/// Times are snapped to frame boundaries on the way in so that toggling at the
/// playhead twice always finds the same bookmark.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bookmarks {
    times: Vec<RationalTime>,
}

impl Bookmarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the bookmark if absent, remove it if present.
    /// Returns whether the time is bookmarked afterwards.
    pub fn toggle(&mut self, time: RationalTime, rate: FrameRate) -> bool {
        let time = time.max(RationalTime::ZERO).round_to_frame(rate);
        match self.times.binary_search(&time) {
            Ok(index) => {
                self.times.remove(index);
                false
            }
            Err(index) => {
                self.times.insert(index, time);
                true
            }
        }
    }

    pub fn contains(&self, time: RationalTime, rate: FrameRate) -> bool {
        let time = time.round_to_frame(rate);
        self.times.binary_search(&time).is_ok()
    }

    /// First bookmark strictly after `time`.
    pub fn next_after(&self, time: RationalTime) -> Option<RationalTime> {
        self.times.iter().copied().find(|t| *t > time)
    }

    /// Last bookmark strictly before `time`.
    pub fn previous_before(&self, time: RationalTime) -> Option<RationalTime> {
        self.times.iter().rev().copied().find(|t| *t < time)
    }

    pub fn times(&self) -> &[RationalTime] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
