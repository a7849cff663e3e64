//! Editor configuration.

use std::path::Path;

use cutline_core::{CutlineError, FrameRate, RationalTime, Result, TimelineScale};
use serde::{Deserialize, Serialize};

/// Tunables for the editing engine. Every field has a default, so a config
/// file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Pixels per second at zoom 1.0
    pub pixels_per_second: f64,
    /// Snap distance in screen pixels (divided by zoom)
    pub snap_threshold_px: f64,
    /// Pointer travel beyond which a press is no longer a click
    pub click_max_movement_px: f64,
    /// Press duration beyond which a press is no longer a click
    pub click_max_duration_ms: u64,
    /// Gap left between an element and its duplicate
    pub duplicate_gap_secs: f64,
    /// Floor for the reported timeline duration
    pub min_timeline_duration_secs: f64,
    /// Placement length for media without an intrinsic duration (images)
    pub default_image_duration_secs: f64,
    /// Undo depth
    pub history_depth: usize,
    /// Frame rate for new projects
    pub frame_rate: FrameRate,
}

impl EditorConfig {
    /// Load from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }

    /// Parse from JSON bytes. The frame rate must be usable for quantizing.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| CutlineError::Serialization(format!("Invalid editor config: {}", e)))?;
        if !config.frame_rate.is_valid() {
            return Err(CutlineError::InvalidParameter(format!(
                "Invalid frame rate {}/{}",
                config.frame_rate.numerator, config.frame_rate.denominator
            )));
        }
        Ok(config)
    }

    /// Timeline scale at the given zoom level.
    pub fn scale(&self, zoom: f64) -> TimelineScale {
        TimelineScale::new(self.pixels_per_second, zoom)
    }

    pub fn duplicate_gap(&self) -> RationalTime {
        RationalTime::from_seconds_f64(self.duplicate_gap_secs)
    }

    pub fn min_timeline_duration(&self) -> RationalTime {
        RationalTime::from_seconds_f64(self.min_timeline_duration_secs)
    }

    pub fn default_image_duration(&self) -> RationalTime {
        RationalTime::from_seconds_f64(self.default_image_duration_secs)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            pixels_per_second: TimelineScale::DEFAULT_PIXELS_PER_SECOND,
            snap_threshold_px: 10.0,
            click_max_movement_px: 5.0,
            click_max_duration_ms: 500,
            duplicate_gap_secs: 0.1,
            min_timeline_duration_secs: 10.0,
            default_image_duration_secs: 5.0,
            history_depth: 100,
            frame_rate: FrameRate::FPS_30,
        }
    }
}
