//! Conversion between timeline pixels and time.

use serde::{Deserialize, Serialize};

use crate::time::RationalTime;

/// Horizontal scale of the timeline view.
///
/// The editor core only needs this to turn screen-space thresholds (snap
/// distance, click slop) into time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineScale {
    /// Pixels per second at zoom 1.0
    pub pixels_per_second: f64,
    /// Zoom multiplier
    pub zoom: f64,
}

impl TimelineScale {
    pub const DEFAULT_PIXELS_PER_SECOND: f64 = 50.0;

    pub fn new(pixels_per_second: f64, zoom: f64) -> Self {
        Self {
            pixels_per_second,
            zoom,
        }
    }

    /// Effective pixels per second, or `None` for a degenerate scale.
    pub fn effective_pps(&self) -> Option<f64> {
        let pps = self.pixels_per_second * self.zoom;
        (pps.is_finite() && pps > 0.0).then_some(pps)
    }

    /// Horizontal position of `time`.
    pub fn time_to_px(&self, time: RationalTime) -> f64 {
        self.effective_pps()
            .map(|pps| time.to_seconds_f64() * pps)
            .unwrap_or(0.0)
    }

    /// Time at horizontal position `px` (never negative).
    pub fn px_to_time(&self, px: f64) -> RationalTime {
        self.px_span_to_time(px).max(RationalTime::ZERO)
    }

    /// Length in time of a pixel span, e.g. a snap threshold.
    pub fn px_span_to_time(&self, px: f64) -> RationalTime {
        self.effective_pps()
            .map(|pps| RationalTime::from_seconds_f64(px / pps))
            .unwrap_or(RationalTime::ZERO)
    }
}

impl Default for TimelineScale {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PIXELS_PER_SECOND, 1.0)
    }
}
