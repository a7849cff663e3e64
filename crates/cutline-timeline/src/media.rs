//! Media assets referenced by timeline elements.
//!
//! The engine never owns asset bytes: the media collaborator decodes files and
//! hands over finished records. The library mirrors those records so the
//! engine can look up source durations and track kinds.

use std::cmp::Ordering;

use cutline_core::RationalTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::track::TrackKind;

/// Kind of media asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    /// Track kind a dropped asset of this kind lands on.
    pub fn track_kind(self) -> TrackKind {
        match self {
            MediaKind::Image | MediaKind::Video => TrackKind::Media,
            MediaKind::Audio => TrackKind::Audio,
        }
    }
}

/// A processed media asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub id: String,
    pub kind: MediaKind,
    pub name: String,
    pub url: String,
    /// Source length; images have none
    #[serde(default)]
    pub duration: Option<RationalTime>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl MediaAsset {
    pub fn new(
        id: impl Into<String>,
        kind: MediaKind,
        name: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            url: url.into(),
            duration: None,
            thumbnail_url: None,
            width: None,
            height: None,
        }
    }

    pub fn with_duration(mut self, duration: RationalTime) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Length of a fresh element for this asset.
    pub fn placement_duration(&self, image_default: RationalTime) -> RationalTime {
        match (self.kind, self.duration) {
            (MediaKind::Image, _) | (_, None) => image_default,
            (_, Some(duration)) => duration,
        }
    }
}

/// Failure reported by the media collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MediaError {
    #[error("failed to process {name}: {reason}")]
    Processing { name: String, reason: String },
    #[error("unsupported file type: {0}")]
    Unsupported(String),
}

/// Field to order the library by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaSortKey {
    #[default]
    Name,
    Kind,
    Duration,
}

impl MediaSortKey {
    /// Ascending comparison on this key.
    pub fn compare(self, a: &MediaAsset, b: &MediaAsset) -> Ordering {
        match self {
            MediaSortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            MediaSortKey::Kind => a.kind.cmp(&b.kind),
            MediaSortKey::Duration => {
                let a = a.duration.unwrap_or(RationalTime::ZERO);
                let b = b.duration.unwrap_or(RationalTime::ZERO);
                a.cmp(&b)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Media assets known to a project, in import order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaLibrary {
    items: Vec<MediaAsset>,
}

impl MediaLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset, replacing any asset with the same id.
    pub fn add(&mut self, asset: MediaAsset) {
        match self.items.iter_mut().find(|a| a.id == asset.id) {
            Some(existing) => *existing = asset,
            None => self.items.push(asset),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<MediaAsset> {
        let index = self.items.iter().position(|a| a.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&MediaAsset> {
        self.items.iter().find(|a| a.id == id)
    }

    pub fn items(&self) -> &[MediaAsset] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items ordered by `key`; ties keep import order in both directions.
    pub fn sorted(&self, key: MediaSortKey, direction: SortDirection) -> Vec<&MediaAsset> {
        let mut sorted: Vec<&MediaAsset> = self.items.iter().collect();
        sorted.sort_by(|a, b| match direction {
            SortDirection::Ascending => key.compare(a, b),
            SortDirection::Descending => key.compare(b, a),
        });
        sorted
    }
}
