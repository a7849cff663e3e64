//! Project serialization with versioning and migration.
//!
//! Uses JSON with a schema version field for forward-compatible persistence.

use std::path::Path;

use cutline_core::{CutlineError, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::media::MediaLibrary;
use crate::project::Project;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Versioned project file wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Schema version for migration.
    pub version: u32,
    /// The project data.
    pub project: Project,
    /// Library records for the assets the project references.
    #[serde(default)]
    pub media: MediaLibrary,
    /// Application version that wrote this file.
    pub app_version: String,
}

impl ProjectFile {
    pub fn new(project: Project, media: MediaLibrary) -> Self {
        Self {
            version: CURRENT_VERSION,
            project,
            media,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| CutlineError::Serialization(format!("Failed to serialize project: {}", e)))
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| CutlineError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0);
        if version > u64::from(CURRENT_VERSION) {
            return Err(CutlineError::Serialization(format!(
                "Project file version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version as u32)?;
        let file: Self = serde_json::from_value(migrated)
            .map_err(|e| CutlineError::Serialization(format!("Failed to parse project: {}", e)))?;

        let rate = file.project.frame_rate;
        if !rate.is_valid() {
            return Err(CutlineError::InvalidParameter(format!(
                "Invalid frame rate {}/{} in project {}",
                rate.numerator, rate.denominator, file.project.name
            )));
        }
        Ok(file)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        info!(path = %path.display(), project = %self.project.name, "Saved project");
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let file = Self::from_json(&data)?;
        info!(path = %path.display(), project = %file.project.name, "Loaded project");
        Ok(file)
    }
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 files are a bare project with no wrapper
                if data.get("version").is_none() {
                    data = serde_json::json!({
                        "version": 1,
                        "project": data,
                        "app_version": "0.1.0",
                    });
                }
                version = 1;
            }
            _ => {
                return Err(CutlineError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementSpec;
    use crate::media::{MediaAsset, MediaKind};
    use crate::track::TrackKind;
    use cutline_core::RationalTime;

    #[test]
    fn test_project_roundtrip() {
        let mut project = Project::new("Test Project");
        let track = project.timeline.add_track(TrackKind::Media);
        let element = project
            .timeline
            .add_element_to_track(
                track,
                ElementSpec::media("beach", "v1", RationalTime::from_secs(10))
                    .at(RationalTime::new(7, 3))
                    .with_trim(RationalTime::new(1, 30), RationalTime::ZERO),
            )
            .unwrap();
        project.toggle_bookmark(RationalTime::from_secs(2));

        let mut media = MediaLibrary::new();
        media.add(MediaAsset::new("v1", MediaKind::Video, "beach.mp4", "blob:1"));

        let json = ProjectFile::new(project.clone(), media).to_json().unwrap();
        let loaded = ProjectFile::from_json(&json).unwrap();

        assert_eq!(loaded.version, CURRENT_VERSION);
        assert_eq!(loaded.project.name, "Test Project");
        assert_eq!(loaded.project.timeline.tracks(), project.timeline.tracks());
        assert_eq!(loaded.project.bookmarks, project.bookmarks);
        assert_eq!(loaded.media.len(), 1);
        // Transient state is not persisted
        assert!(!loaded.project.timeline.history().can_undo());
        assert!(loaded.project.timeline.element(track, element).is_some());
    }

    #[test]
    fn test_migration_v0() {
        let project = Project::new("Old Project");
        let raw_json = serde_json::to_vec(&project).unwrap();

        let loaded = ProjectFile::from_json(&raw_json).unwrap();
        assert_eq!(loaded.version, CURRENT_VERSION);
        assert_eq!(loaded.project.name, "Old Project");
        assert!(loaded.media.is_empty());
    }

    #[test]
    fn test_future_version_rejected() {
        let json = serde_json::json!({
            "version": 999,
            "project": {},
            "app_version": "99.0.0",
        });
        let data = serde_json::to_vec(&json).unwrap();
        let result = ProjectFile::from_json(&data);
        assert!(matches!(result, Err(CutlineError::Serialization(_))));
    }

    #[test]
    fn test_zero_frame_rate_rejected() {
        let project = Project::new("Broken Rate").with_frame_rate(cutline_core::FrameRate::new(30, 0));
        let json = ProjectFile::new(project, MediaLibrary::new()).to_json().unwrap();
        let result = ProjectFile::from_json(&json);
        assert!(matches!(result, Err(CutlineError::InvalidParameter(_))));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(ProjectFile::from_json(b"not json").is_err());
    }
}
