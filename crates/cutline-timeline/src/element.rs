//! Element types for the timeline.

use cutline_core::{RationalTime, TimeRange};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shortest on-timeline length a trim or resize gesture may leave (0.1 s).
pub fn min_trimmed_duration() -> RationalTime {
    RationalTime::new(1, 10)
}

/// Horizontal alignment of a text element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Inline content of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextContent {
    pub content: String,
    pub font_size: f32,
    pub font_family: String,
    /// CSS-style color string
    pub color: String,
    pub align: TextAlign,
    /// Canvas offset from center, in pixels
    pub x: f32,
    pub y: f32,
}

impl TextContent {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            content: "Default Text".to_string(),
            font_size: 48.0,
            font_family: "Arial".to_string(),
            color: "#ffffff".to_string(),
            align: TextAlign::Center,
            x: 0.0,
            y: 0.0,
        }
    }
}

/// What an element plays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    /// Reference to an asset owned by the media library.
    Media { media_id: String },
    Text(TextContent),
}

impl ElementKind {
    /// Short label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Media { .. } => "media",
            Self::Text(_) => "text",
        }
    }
}

/// An element (clip) placed on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique element ID
    pub id: Uuid,
    /// Element name (displayed in UI)
    pub name: String,
    pub kind: ElementKind,
    /// Where the element begins on the timeline
    pub start_time: RationalTime,
    /// Full duration of the underlying source
    pub duration: RationalTime,
    /// Cut from the head of the source
    pub trim_start: RationalTime,
    /// Cut from the tail of the source
    pub trim_end: RationalTime,
    /// Audio of this element is silenced
    #[serde(default)]
    pub muted: bool,
}

impl Element {
    /// Create an untrimmed element.
    pub fn new(
        name: impl Into<String>,
        kind: ElementKind,
        start_time: RationalTime,
        duration: RationalTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            start_time: start_time.max(RationalTime::ZERO),
            duration: duration.max(RationalTime::ZERO),
            trim_start: RationalTime::ZERO,
            trim_end: RationalTime::ZERO,
            muted: false,
        }
    }

    /// Length on the timeline after trims.
    pub fn effective_duration(&self) -> RationalTime {
        self.duration - self.trim_start - self.trim_end
    }

    pub fn effective_start(&self) -> RationalTime {
        self.start_time
    }

    pub fn effective_end(&self) -> RationalTime {
        self.start_time + self.effective_duration()
    }

    /// On-timeline range after trims.
    pub fn effective_range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.effective_duration())
    }

    pub fn media_id(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Media { media_id } => Some(media_id),
            ElementKind::Text(_) => None,
        }
    }

    /// Trims are non-negative and fit inside the source.
    pub fn trims_are_valid(&self) -> bool {
        !self.trim_start.is_negative()
            && !self.trim_end.is_negative()
            && self.trim_start + self.trim_end <= self.duration
    }

    /// Set both trims, clamped so each is non-negative and at least
    /// `min_length` (or the whole source, if shorter) stays visible.
    pub fn set_trim(&mut self, trim_start: RationalTime, trim_end: RationalTime, min_length: RationalTime) {
        let keep = min_length.max(RationalTime::ZERO).min(self.duration);
        let room = self.duration - keep;
        let start = trim_start.max(RationalTime::ZERO).min(room);
        let end = trim_end.max(RationalTime::ZERO).min(room - start);
        self.trim_start = start;
        self.trim_end = end;
    }

    /// Cut the tail so the element ends exactly at `at`.
    /// Caller guarantees `at` lies inside the effective range.
    pub(crate) fn end_at(&mut self, at: RationalTime) {
        self.trim_end += self.effective_end() - at;
    }

    /// Cut the head so the element starts exactly at `at`.
    /// Caller guarantees `at` lies inside the effective range.
    pub(crate) fn begin_at(&mut self, at: RationalTime) {
        self.trim_start += at - self.start_time;
        self.start_time = at;
    }

    /// Copy with a fresh id.
    pub fn duplicate(&self, name: impl Into<String>, start_time: RationalTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_time,
            ..self.clone()
        }
    }
}

/// Parameters for a new element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub name: String,
    pub kind: ElementKind,
    pub start_time: RationalTime,
    pub duration: RationalTime,
    #[serde(default)]
    pub trim_start: RationalTime,
    #[serde(default)]
    pub trim_end: RationalTime,
}

impl ElementSpec {
    /// Untrimmed media element at the origin.
    pub fn media(name: impl Into<String>, media_id: impl Into<String>, duration: RationalTime) -> Self {
        Self {
            name: name.into(),
            kind: ElementKind::Media {
                media_id: media_id.into(),
            },
            start_time: RationalTime::ZERO,
            duration,
            trim_start: RationalTime::ZERO,
            trim_end: RationalTime::ZERO,
        }
    }

    /// Text element at the origin.
    pub fn text(content: TextContent, duration: RationalTime) -> Self {
        Self {
            name: content.content.clone(),
            kind: ElementKind::Text(content),
            start_time: RationalTime::ZERO,
            duration,
            trim_start: RationalTime::ZERO,
            trim_end: RationalTime::ZERO,
        }
    }

    pub fn at(mut self, start_time: RationalTime) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn with_trim(mut self, trim_start: RationalTime, trim_end: RationalTime) -> Self {
        self.trim_start = trim_start;
        self.trim_end = trim_end;
        self
    }

    /// Build the element; trims are clamped to the source.
    pub fn build(self) -> Element {
        let mut element = Element::new(self.name, self.kind, self.start_time, self.duration);
        element.set_trim(self.trim_start, self.trim_end, RationalTime::ZERO);
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: i64) -> RationalTime {
        RationalTime::from_secs(s)
    }

    fn media(duration: i64) -> Element {
        ElementSpec::media("clip", "m1", secs(duration)).build()
    }

    #[test]
    fn test_effective_range() {
        let el = ElementSpec::media("clip", "m1", secs(10))
            .at(secs(3))
            .with_trim(secs(1), secs(2))
            .build();
        assert_eq!(el.effective_duration(), secs(7));
        assert_eq!(el.effective_start(), secs(3));
        assert_eq!(el.effective_end(), secs(10));
    }

    #[test]
    fn test_build_clamps_excess_trim() {
        let el = ElementSpec::media("clip", "m1", secs(10))
            .with_trim(secs(8), secs(8))
            .build();
        assert_eq!(el.trim_start, secs(8));
        assert_eq!(el.trim_end, secs(2));
        assert!(el.trims_are_valid());
        assert_eq!(el.effective_duration(), RationalTime::ZERO);
    }

    #[test]
    fn test_set_trim_keeps_minimum_length() {
        let mut el = media(10);
        el.set_trim(secs(6), secs(6), secs(1));
        assert_eq!(el.trim_start, secs(6));
        assert_eq!(el.trim_end, secs(3));
        assert_eq!(el.effective_duration(), secs(1));
    }

    #[test]
    fn test_set_trim_negative_clamps_to_zero() {
        let mut el = media(10);
        el.set_trim(secs(-2), secs(-1), secs(1));
        assert_eq!(el.trim_start, RationalTime::ZERO);
        assert_eq!(el.trim_end, RationalTime::ZERO);
    }

    #[test]
    fn test_negative_start_clamps() {
        let el = ElementSpec::media("clip", "m1", secs(5)).at(secs(-3)).build();
        assert_eq!(el.start_time, RationalTime::ZERO);
    }

    #[test]
    fn test_end_at_and_begin_at() {
        let mut left = media(10);
        left.end_at(secs(4));
        assert_eq!(left.trim_end, secs(6));
        assert_eq!(left.effective_end(), secs(4));

        let mut right = media(10);
        right.begin_at(secs(4));
        assert_eq!(right.start_time, secs(4));
        assert_eq!(right.trim_start, secs(4));
        assert_eq!(right.effective_end(), secs(10));
    }

    #[test]
    fn test_duplicate_gets_fresh_id() {
        let el = media(10);
        let copy = el.duplicate("copy", secs(20));
        assert_ne!(copy.id, el.id);
        assert_eq!(copy.duration, el.duration);
        assert_eq!(copy.kind, el.kind);
        assert_eq!(copy.start_time, secs(20));
    }
}
