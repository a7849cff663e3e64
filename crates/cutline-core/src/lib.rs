//! Cutline Core - Foundation types for timeline editing
//!
//! This crate provides the fundamental types used throughout Cutline:
//! - Time representation (RationalTime, FrameRate, TimeRange)
//! - Conversion between timeline pixels and time (TimelineScale)
//! - The shared error type

pub mod error;
pub mod scale;
pub mod time;

pub use error::{CutlineError, Result};
pub use scale::TimelineScale;
pub use time::{FrameRate, RationalTime, TimeRange};
