//! Cutline - headless timeline editor
//!
//! Applies a script of editor commands to a project file:
//!
//! ```text
//! cutline <project.json> <commands.json> [output.json]
//! ```
//!
//! The script is a JSON array. Each entry is either an editor command
//! (`{"command": "split-element", ...}`) or a media import
//! (`{"import": {"id": "v1", "kind": "video", "name": "beach.mp4", "duration": 12.5}}`).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use cutline_core::RationalTime;
use cutline_timeline::{Editor, EditorCommand, EditorConfig, MediaAsset, MediaKind, Outcome, ProjectFile};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Media record as written in scripts, with plain-second durations.
#[derive(Debug, Deserialize)]
struct ScriptMedia {
    id: String,
    kind: MediaKind,
    name: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

impl ScriptMedia {
    fn into_asset(self) -> MediaAsset {
        let url = self.url.unwrap_or_else(|| format!("file:{}", self.name));
        let asset = MediaAsset::new(self.id, self.kind, self.name, url);
        match self.duration {
            Some(secs) => asset.with_duration(RationalTime::from_seconds_f64(secs)),
            None => asset,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Step {
    Import {
        import: ScriptMedia,
        #[serde(default)]
        at: Option<f64>,
    },
    Command(EditorCommand),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (project_path, script_path, output_path) = match args.as_slice() {
        [project, script] => (PathBuf::from(project), PathBuf::from(script), PathBuf::from(project)),
        [project, script, output] => (PathBuf::from(project), PathBuf::from(script), PathBuf::from(output)),
        _ => bail!("usage: cutline <project.json> <commands.json> [output.json]"),
    };

    let config = load_config()?;
    let mut editor = open_project(&project_path, config)?;

    let script = std::fs::read(&script_path)
        .with_context(|| format!("reading command script {}", script_path.display()))?;
    let steps: Vec<Step> = serde_json::from_slice(&script)
        .with_context(|| format!("parsing command script {}", script_path.display()))?;
    info!(steps = steps.len(), "Running script");

    for (index, step) in steps.into_iter().enumerate() {
        let outcome = match step {
            Step::Import { import, at } => {
                editor.import_media(Ok(import.into_asset()), at.map(RationalTime::from_seconds_f64))
            }
            Step::Command(command) => editor.execute(command),
        };
        match outcome {
            Outcome::Notice(message) => println!("step {}: {}", index + 1, message),
            Outcome::Created(id) => println!("step {}: created {}", index + 1, id),
            _ => {}
        }
    }

    print_summary(&editor);

    editor
        .to_file()
        .save_to_file(&output_path)
        .with_context(|| format!("saving project to {}", output_path.display()))?;
    Ok(())
}

fn load_config() -> Result<EditorConfig> {
    match std::env::var_os("CUTLINE_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            EditorConfig::load(&path).with_context(|| format!("loading config {}", path.display()))
        }
        None => Ok(EditorConfig::default()),
    }
}

fn open_project(path: &Path, config: EditorConfig) -> Result<Editor> {
    if path.exists() {
        let file = ProjectFile::load_from_file(path)
            .with_context(|| format!("loading project {}", path.display()))?;
        Ok(Editor::from_file(file, config))
    } else {
        info!(path = %path.display(), "Project not found, starting a new one");
        Ok(Editor::new(config))
    }
}

fn print_summary(editor: &Editor) {
    let project = editor.project();
    let rate = project.frame_rate;
    println!(
        "{} | duration {} | playhead {}",
        project.name,
        editor.playback().duration().to_timecode(rate),
        editor.playback().current_time().to_timecode(rate),
    );
    for track in editor.timeline().tracks() {
        let muted = if track.muted { " (muted)" } else { "" };
        println!("[{}] {}{}", track.kind, track.name, muted);
        for element in track.elements_by_time() {
            let muted = if element.muted { " (muted)" } else { "" };
            println!(
                "    {} - {}  {}{}",
                element.effective_start().to_timecode(rate),
                element.effective_end().to_timecode(rate),
                element.name,
                muted,
            );
        }
    }
    if !project.bookmarks.is_empty() {
        let marks: Vec<String> = project
            .bookmarks
            .times()
            .iter()
            .map(|t| t.to_timecode(rate))
            .collect();
        println!("bookmarks: {}", marks.join(", "));
    }
}
