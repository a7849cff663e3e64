//! Time representation for frame-accurate editing
//!
//! Uses rational numbers to avoid floating-point accumulation errors.
//! All time values are represented as numerator/denominator pairs, so a split
//! at `t` leaves the left part ending at exactly the time the right part
//! starts.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A rational time value representing a point in time or a span, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RationalTime {
    /// Time value as a rational number (seconds)
    value: Rational64,
}

impl RationalTime {
    /// Create a new RationalTime from numerator and denominator.
    /// The time is `numerator / denominator` seconds.
    #[inline]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            value: Rational64::new(numerator, denominator),
        }
    }

    /// Whole seconds.
    #[inline]
    pub fn from_secs(seconds: i64) -> Self {
        Self::new(seconds, 1)
    }

    /// Create a RationalTime from a frame number and frame rate.
    #[inline]
    pub fn from_frames(frames: i64, rate: FrameRate) -> Self {
        if !rate.is_valid() {
            return Self::ZERO;
        }
        Self {
            value: Rational64::new(frames * rate.denominator as i64, rate.numerator as i64),
        }
    }

    /// Create a RationalTime from seconds as a float.
    /// Note: May introduce small precision errors. Non-finite input maps to
    /// zero and magnitudes beyond [`Self::MAX_SECONDS`] are clamped, so later
    /// arithmetic stays within `i64`.
    pub fn from_seconds_f64(seconds: f64) -> Self {
        // Microsecond precision is finer than any frame rate we edit at
        const PRECISION: i64 = 1_000_000;
        if !seconds.is_finite() {
            return Self::ZERO;
        }
        let bound = Self::MAX_SECONDS as f64;
        let seconds = seconds.clamp(-bound, bound);
        Self {
            value: Rational64::new((seconds * PRECISION as f64).round() as i64, PRECISION),
        }
    }

    /// Largest magnitude, in seconds, accepted from floating-point input
    /// (about 115 days).
    pub const MAX_SECONDS: i64 = 10_000_000;

    /// Convert to seconds as f64.
    #[inline]
    pub fn to_seconds_f64(self) -> f64 {
        *self.value.numer() as f64 / *self.value.denom() as f64
    }

    /// Convert to frame number at the given frame rate (floored).
    /// An invalid rate counts no frames.
    #[inline]
    pub fn to_frames(self, rate: FrameRate) -> i64 {
        if !rate.is_valid() {
            return 0;
        }
        let frames = self.value * Rational64::new(rate.numerator as i64, rate.denominator as i64);
        frames.floor().to_integer()
    }

    /// Round to the nearest frame boundary at the given frame rate.
    pub fn round_to_frame(self, rate: FrameRate) -> Self {
        if !rate.is_valid() {
            return self;
        }
        let frames = self.value * Rational64::new(rate.numerator as i64, rate.denominator as i64);
        Self::from_frames(frames.round().to_integer(), rate)
    }

    /// Zero time constant.
    pub const ZERO: Self = Self {
        value: Rational64::new_raw(0, 1),
    };

    /// Check if this time is zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        *self.value.numer() == 0
    }

    /// Check if this time is strictly below zero.
    #[inline]
    pub fn is_negative(self) -> bool {
        *self.value.numer() < 0
    }

    /// Get the absolute value of this time.
    #[inline]
    pub fn abs(self) -> Self {
        if self.is_negative() {
            Self { value: -self.value }
        } else {
            self
        }
    }

    /// Format as `HH:MM:SS:FF` at the given frame rate (non-drop-frame).
    pub fn to_timecode(self, rate: FrameRate) -> String {
        let fps = rate.to_fps_f64().round().max(1.0) as i64;
        let total_frames = self.max(Self::ZERO).to_frames(rate);
        let frames = total_frames % fps;
        let total_seconds = total_frames / fps;
        let seconds = total_seconds % 60;
        let minutes = (total_seconds / 60) % 60;
        let hours = total_seconds / 3600;
        format!("{hours:02}:{minutes:02}:{seconds:02}:{frames:02}")
    }
}

impl Default for RationalTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for RationalTime {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value + rhs.value,
        }
    }
}

impl AddAssign for RationalTime {
    fn add_assign(&mut self, rhs: Self) {
        self.value = self.value + rhs.value;
    }
}

impl Sub for RationalTime {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            value: self.value - rhs.value,
        }
    }
}

impl SubAssign for RationalTime {
    fn sub_assign(&mut self, rhs: Self) {
        self.value = self.value - rhs.value;
    }
}

impl Neg for RationalTime {
    type Output = Self;
    fn neg(self) -> Self {
        Self { value: -self.value }
    }
}

impl Mul<i64> for RationalTime {
    type Output = Self;
    fn mul(self, rhs: i64) -> Self {
        Self {
            value: self.value * rhs,
        }
    }
}

impl Div<i64> for RationalTime {
    type Output = Self;
    fn div(self, rhs: i64) -> Self {
        Self {
            value: self.value / rhs,
        }
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.to_seconds_f64())
    }
}

/// Frame rate as a rational number (e.g., 24000/1001 for 23.976 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 24000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// A zero numerator or denominator cannot quantize anything.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.numerator > 0 && self.denominator > 0
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Duration of a single frame (zero for an invalid rate).
    #[inline]
    pub fn frame_duration(self) -> RationalTime {
        if !self.is_valid() {
            return RationalTime::ZERO;
        }
        RationalTime::new(self.denominator as i64, self.numerator as i64)
    }

    /// Common frame rates
    pub const FPS_23_976: Self = Self::new(24000, 1001);
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}

/// A time range with inclusive start and exclusive end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start time (inclusive)
    pub start: RationalTime,
    /// Duration of the range
    pub duration: RationalTime,
}

impl TimeRange {
    /// Create a new time range from start and duration.
    #[inline]
    pub fn new(start: RationalTime, duration: RationalTime) -> Self {
        Self { start, duration }
    }

    /// Create a time range from start and end times.
    #[inline]
    pub fn from_start_end(start: RationalTime, end: RationalTime) -> Self {
        Self {
            start,
            duration: end - start,
        }
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(self) -> RationalTime {
        self.start + self.duration
    }

    /// Check if a time is within this range.
    #[inline]
    pub fn contains(self, time: RationalTime) -> bool {
        time >= self.start && time < self.end()
    }

    /// Check if a time lies strictly between start and end.
    #[inline]
    pub fn strictly_contains(self, time: RationalTime) -> bool {
        time > self.start && time < self.end()
    }

    /// Check if two ranges overlap.
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    /// Compute the intersection of two ranges, if any.
    pub fn intersection(self, other: Self) -> Option<Self> {
        if !self.overlaps(other) {
            return None;
        }
        let start = self.start.max(other.start);
        let end = self.end().min(other.end());
        Some(Self::from_start_end(start, end))
    }

    /// Empty range starting at zero.
    pub const EMPTY: Self = Self {
        start: RationalTime::ZERO,
        duration: RationalTime::ZERO,
    };
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::EMPTY
    }
}
