//! Integration tests for the editor command surface.
//!
//! Drives the editor the way a front end does: JSON commands in, outcomes
//! and project files out.

use cutline_core::{FrameRate, RationalTime};
use cutline_timeline::{
    DragPayload, Editor, EditorCommand, EditorConfig, MediaAsset, MediaError, MediaKind,
    MediaSortKey, Outcome, ProjectFile, SortDirection, TrackKind,
};
use uuid::Uuid;

fn secs(s: i64) -> RationalTime {
    RationalTime::from_secs(s)
}

fn asset(id: &str, kind: MediaKind, len: Option<i64>) -> MediaAsset {
    let asset = MediaAsset::new(id, kind, format!("{id}.bin"), format!("blob:{id}"));
    match len {
        Some(len) => asset.with_duration(secs(len)),
        None => asset,
    }
}

fn run(editor: &mut Editor, json: serde_json::Value) -> Outcome {
    let command: EditorCommand = serde_json::from_value(json).unwrap();
    editor.execute(command)
}

fn first_element(editor: &Editor, track: usize) -> (Uuid, Uuid) {
    let track = &editor.timeline().tracks()[track];
    (track.id, track.elements[0].id)
}

#[test]
fn scripted_session_end_to_end() {
    let mut editor = Editor::default();
    editor.import_media(Ok(asset("beach", MediaKind::Video, Some(10))), None);
    let (track, clip) = first_element(&editor, 0);

    run(&mut editor, serde_json::json!({"command": "seek", "time": 4.0}));
    let right = run(
        &mut editor,
        serde_json::json!({"command": "split-element", "track_id": track, "element_id": clip}),
    )
    .created()
    .unwrap();

    let left = editor.timeline().element(track, clip).unwrap();
    assert_eq!(left.trim_end, secs(6));
    let right_el = editor.timeline().element(track, right).unwrap();
    assert_eq!(right_el.trim_start, secs(4));

    // Ripple-remove the left half: the right half slides to 0
    run(
        &mut editor,
        serde_json::json!({"command": "remove-element", "track_id": track, "element_id": clip, "ripple": true}),
    );
    assert_eq!(editor.timeline().element(track, right).unwrap().start_time, RationalTime::ZERO);
    assert_eq!(editor.playback().duration(), secs(10));

    run(&mut editor, serde_json::json!({"command": "undo"}));
    assert_eq!(editor.timeline().track(track).unwrap().element_count(), 2);
}

#[test]
fn total_duration_has_floor() {
    let mut editor = Editor::default();
    assert_eq!(editor.playback().duration(), secs(10));

    let track = editor
        .execute(EditorCommand::AddTrack {
            kind: TrackKind::Text,
        })
        .created()
        .unwrap();
    editor.execute(EditorCommand::AddTextElement {
        track_id: track,
        content: "Credits".into(),
        start: 8.0,
        duration: Some(4.3),
    });
    assert_eq!(editor.playback().duration(), RationalTime::new(123, 10));
}

#[test]
fn image_import_uses_default_duration() {
    let mut editor = Editor::default();
    editor.import_media(Ok(asset("logo", MediaKind::Image, None)), Some(secs(2)));
    let element = &editor.timeline().tracks()[0].elements[0];
    assert_eq!(element.start_time, secs(2));
    assert_eq!(element.duration, secs(5));
}

#[test]
fn audio_import_lands_on_audio_track() {
    let mut editor = Editor::default();
    editor.import_media(Ok(asset("theme", MediaKind::Audio, Some(30))), None);
    assert_eq!(editor.timeline().tracks()[0].kind, TrackKind::Audio);
}

#[test]
fn failed_processing_leaves_library_and_tracks() {
    let mut editor = Editor::default();
    editor.import_media(Ok(asset("beach", MediaKind::Video, Some(10))), None);
    let outcome = editor.import_media(
        Err(MediaError::Processing {
            name: "broken.mov".into(),
            reason: "no video stream".into(),
        }),
        None,
    );
    assert_eq!(
        outcome,
        Outcome::Notice("failed to process broken.mov: no video stream".into())
    );
    assert_eq!(editor.library().len(), 1);
    assert_eq!(editor.timeline().tracks().len(), 1);
}

#[test]
fn separate_audio_from_text_is_a_notice() {
    let mut editor = Editor::default();
    editor.drop_payload(
        DragPayload::Text {
            content: "Title".into(),
        },
        None,
        RationalTime::ZERO,
    );
    let (track, element) = first_element(&editor, 0);
    let outcome = editor.execute(EditorCommand::SeparateAudio {
        track_id: track,
        element_id: element,
    });
    assert_eq!(
        outcome,
        Outcome::Notice("Audio can only be separated from media track elements".into())
    );
    assert_eq!(editor.timeline().tracks().len(), 1);
}

#[test]
fn duplicate_then_selection_is_cleared() {
    let mut editor = Editor::default();
    editor.import_media(Ok(asset("beach", MediaKind::Video, Some(10))), None);
    let (track, clip) = first_element(&editor, 0);
    editor.execute(EditorCommand::TrimElement {
        track_id: track,
        element_id: clip,
        trim_start: 1.0,
        trim_end: 2.0,
    });
    editor.execute(EditorCommand::SelectElement {
        track_id: track,
        element_id: clip,
        multi: false,
    });

    let copy = editor.execute(EditorCommand::DuplicateSelected).created().unwrap();
    let copy = editor.timeline().element(track, copy).unwrap();
    assert_eq!(copy.start_time, RationalTime::new(71, 10));
    assert_eq!(copy.trim_start, secs(1));
    assert_eq!(copy.trim_end, secs(2));
    assert!(editor.timeline().selection().is_empty());
}

#[test]
fn selection_box_release_does_not_seek() {
    let mut editor = Editor::default();
    editor.execute(EditorCommand::PointerDown { x: 100.0, y: 0.0, at_ms: 0 });
    editor.execute(EditorCommand::SelectionBoxStarted);
    let outcome = editor.execute(EditorCommand::PointerUp { x: 100.0, y: 0.0, at_ms: 20 });
    assert_eq!(outcome, Outcome::Ignored);
    assert_eq!(editor.playback().current_time(), RationalTime::ZERO);
}

#[test]
fn slow_press_does_not_seek() {
    let mut editor = Editor::default();
    editor.execute(EditorCommand::PointerDown { x: 100.0, y: 0.0, at_ms: 0 });
    let outcome = editor.execute(EditorCommand::PointerUp { x: 100.0, y: 0.0, at_ms: 800 });
    assert_eq!(outcome, Outcome::Ignored);
}

#[test]
fn click_respects_zoom() {
    let mut editor = Editor::default();
    editor.execute(EditorCommand::SetZoom { zoom: 2.0 });
    editor.execute(EditorCommand::PointerDown { x: 300.0, y: 0.0, at_ms: 0 });
    let outcome = editor.execute(EditorCommand::PointerUp { x: 300.0, y: 0.0, at_ms: 100 });
    assert_eq!(outcome, Outcome::Click(secs(3)));
}

#[test]
fn custom_config_changes_thresholds() {
    let config = EditorConfig::from_json(
        br#"{"click_max_movement_px": 20.0, "min_timeline_duration_secs": 30, "frame_rate": {"numerator": 24, "denominator": 1}}"#,
    )
    .unwrap();
    let mut editor = Editor::new(config);
    assert_eq!(editor.playback().duration(), secs(30));
    assert_eq!(editor.project().frame_rate, FrameRate::FPS_24);

    editor.execute(EditorCommand::PointerDown { x: 100.0, y: 0.0, at_ms: 0 });
    editor.execute(EditorCommand::PointerMove { x: 112.0, y: 0.0 });
    let outcome = editor.execute(EditorCommand::PointerUp { x: 112.0, y: 0.0, at_ms: 100 });
    assert!(matches!(outcome, Outcome::Click(_)));
}

#[test]
fn saved_editor_reopens_with_library() {
    let mut editor = Editor::default();
    editor.import_media(Ok(asset("beach", MediaKind::Video, Some(10))), None);
    editor.import_media(Ok(asset("theme", MediaKind::Audio, Some(30))), None);
    editor.execute(EditorCommand::ToggleBookmark { time: Some(3.0) });

    let json = editor.to_file().to_json().unwrap();
    let mut reopened = Editor::from_file(ProjectFile::from_json(&json).unwrap(), EditorConfig::default());

    assert_eq!(reopened.playback().duration(), secs(30));
    assert!(reopened.project().is_bookmarked(secs(3)));
    let sorted: Vec<&str> = reopened
        .library()
        .sorted(MediaSortKey::Duration, SortDirection::Descending)
        .iter()
        .map(|a| a.id.as_str())
        .collect();
    assert_eq!(sorted, ["theme", "beach"]);

    // History does not survive a reload
    assert_eq!(
        reopened.execute(EditorCommand::Undo),
        Outcome::Notice("Nothing to undo".into())
    );

    // The library is live: dropping a stored asset works
    let outcome = reopened.drop_payload(
        DragPayload::MediaItem {
            media_id: "beach".into(),
        },
        None,
        secs(40),
    );
    assert!(outcome.created().is_some());
    assert_eq!(reopened.playback().duration(), secs(50));
}
