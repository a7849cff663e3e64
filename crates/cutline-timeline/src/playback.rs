//! Playback coordinator: playhead position, play/pause and the timeline
//! duration the playhead is bounded by.

use cutline_core::RationalTime;
use serde::{Deserialize, Serialize};

/// Transport state for the preview.
///
/// The playhead always stays within `[0, duration]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playback {
    current_time: RationalTime,
    duration: RationalTime,
    #[serde(skip)]
    is_playing: bool,
}

impl Playback {
    pub fn new(duration: RationalTime) -> Self {
        Self {
            current_time: RationalTime::ZERO,
            duration: duration.max(RationalTime::ZERO),
            is_playing: false,
        }
    }

    pub fn current_time(&self) -> RationalTime {
        self.current_time
    }

    pub fn duration(&self) -> RationalTime {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn play(&mut self) {
        // Playing from the very end restarts from the top
        if self.current_time >= self.duration {
            self.current_time = RationalTime::ZERO;
        }
        self.is_playing = true;
        tracing::debug!(time = %self.current_time, "Playback started");
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
        tracing::debug!(time = %self.current_time, "Playback paused");
    }

    pub fn toggle(&mut self) {
        if self.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Move the playhead, clamped to `[0, duration]`.
    pub fn seek(&mut self, time: RationalTime) {
        self.current_time = time.max(RationalTime::ZERO).min(self.duration);
        tracing::trace!(time = %self.current_time, "Seeked");
    }

    /// Advance by one tick of wall-clock time while playing. Playback stops
    /// on reaching the end.
    pub fn advance(&mut self, delta: RationalTime) {
        if !self.is_playing || delta.is_negative() {
            return;
        }
        let next = self.current_time + delta;
        if next >= self.duration {
            self.current_time = self.duration;
            self.is_playing = false;
            tracing::debug!(time = %self.current_time, "Playback reached end");
        } else {
            self.current_time = next;
        }
    }

    /// Set the duration, pulling the playhead back inside it if needed.
    pub fn set_duration(&mut self, duration: RationalTime) {
        self.duration = duration.max(RationalTime::ZERO);
        if self.current_time > self.duration {
            self.current_time = self.duration;
        }
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(RationalTime::from_secs(10))
    }
}
