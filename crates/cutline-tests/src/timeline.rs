//! Integration tests for the timeline engine.
//!
//! Exercises cross-crate interactions between cutline-core time math and
//! cutline-timeline edits, history and persistence.

use cutline_core::{FrameRate, RationalTime, TimelineScale};
use cutline_timeline::{
    EditError, ElementSpec, Project, ProjectFile, MediaLibrary, ResizeEdge, SnapKind, TextContent,
    Timeline, TrackKind,
};
use proptest::prelude::*;
use uuid::Uuid;

// ── Helpers ────────────────────────────────────────────────────

fn secs(s: i64) -> RationalTime {
    RationalTime::from_secs(s)
}

fn clip(name: &str, len: i64) -> ElementSpec {
    ElementSpec::media(name, format!("media/{name}"), secs(len))
}

/// V1: Intro(0–5) Body(5–35) Outro(35–45); V2: Overlay(10–20); A1: Music(0–45).
struct Fixture {
    timeline: Timeline,
    v1: Uuid,
    v2: Uuid,
    a1: Uuid,
    intro: Uuid,
    body: Uuid,
    outro: Uuid,
    overlay: Uuid,
}

fn build_timeline() -> Fixture {
    let mut timeline = Timeline::default();
    let v1 = timeline.add_track(TrackKind::Media);
    let v2 = timeline.add_track(TrackKind::Media);
    let a1 = timeline.add_track(TrackKind::Audio);

    let intro = timeline.add_element_to_track(v1, clip("Intro", 5)).unwrap();
    let body = timeline.add_element_to_track(v1, clip("Body", 30).at(secs(5))).unwrap();
    let outro = timeline.add_element_to_track(v1, clip("Outro", 10).at(secs(35))).unwrap();
    let overlay = timeline.add_element_to_track(v2, clip("Overlay", 10).at(secs(10))).unwrap();
    timeline.add_element_to_track(a1, clip("Music", 45)).unwrap();

    Fixture {
        timeline,
        v1,
        v2,
        a1,
        intro,
        body,
        outro,
        overlay,
    }
}

const FLOOR: RationalTime = RationalTime::ZERO;

// ── Ripple editing ─────────────────────────────────────────────

#[test]
fn ripple_delete_closes_gap_on_one_track_only() {
    let mut f = build_timeline();
    f.timeline.remove_element_from_track_with_ripple(f.v1, f.body).unwrap();

    assert_eq!(f.timeline.element(f.v1, f.intro).unwrap().start_time, secs(0));
    assert_eq!(f.timeline.element(f.v1, f.outro).unwrap().start_time, secs(5));
    assert_eq!(f.timeline.element(f.v2, f.overlay).unwrap().start_time, secs(10));
    assert_eq!(f.timeline.track(f.a1).unwrap().end_time(), secs(45));
}

#[test]
fn ripple_of_trimmed_element_uses_effective_duration() {
    let mut f = build_timeline();
    f.timeline
        .update_element_trim(f.v1, f.body, secs(5), secs(5))
        .unwrap();
    // Body now covers 5–25; leave the gap before Outro as is
    f.timeline.remove_element_from_track_with_ripple(f.v1, f.body).unwrap();
    assert_eq!(f.timeline.element(f.v1, f.outro).unwrap().start_time, secs(15));
}

#[test]
fn ripple_toggle_drives_batch_delete() {
    let mut f = build_timeline();
    f.timeline.set_ripple_enabled(true);
    f.timeline.select_element(f.v1, f.intro, false).unwrap();
    f.timeline.delete_selected().unwrap();

    assert_eq!(f.timeline.element(f.v1, f.body).unwrap().start_time, secs(0));
    assert_eq!(f.timeline.element(f.v1, f.outro).unwrap().start_time, secs(30));
}

// ── Split at exact boundaries ──────────────────────────────────

#[test]
fn split_at_frame_boundary_is_exact() {
    let mut f = build_timeline();
    let rate = FrameRate::FPS_29_97;
    let at = RationalTime::from_frames(600, rate);

    let right = f.timeline.split_element(f.v1, f.body, at).unwrap();
    let left = f.timeline.element(f.v1, f.body).unwrap();
    let right = f.timeline.element(f.v1, right).unwrap();

    assert_eq!(left.effective_end(), at);
    assert_eq!(right.effective_start(), at);
    assert_eq!(left.effective_duration() + right.effective_duration(), secs(30));
    assert_eq!(right.start_time.to_frames(rate), 600);
}

#[test]
fn split_selected_across_tracks() {
    let mut f = build_timeline();
    f.timeline.select_all();
    let created = f.timeline.split_selected(secs(12)).unwrap();
    // Body, Overlay and Music contain 12s; Intro and Outro do not
    assert_eq!(created.len(), 3);
    assert_eq!(f.timeline.track(f.v1).unwrap().element_count(), 4);
    assert_eq!(f.timeline.content_end(), secs(45));
}

// ── Separate audio + undo ──────────────────────────────────────

#[test]
fn separate_audio_lands_on_free_audio_track_and_undoes() {
    let mut f = build_timeline();
    let before = f.timeline.tracks().to_vec();

    // Music occupies A1 for the whole timeline
    let audio = f.timeline.separate_audio(f.v2, f.overlay).unwrap();
    assert_ne!(audio.track_id, f.a1);
    assert_eq!(f.timeline.tracks().len(), 4);
    assert!(f.timeline.element(f.v2, f.overlay).unwrap().muted);

    f.timeline.undo().unwrap();
    assert_eq!(f.timeline.tracks(), before.as_slice());
}

#[test]
fn failed_edits_leave_history_alone() {
    let mut f = build_timeline();
    let depth = f.timeline.history().undo_count();
    let text = f.timeline.add_track(TrackKind::Text);
    let title = f
        .timeline
        .add_element_to_track(text, ElementSpec::text(TextContent::new("Title"), secs(3)))
        .unwrap();
    let depth_after_adds = f.timeline.history().undo_count();
    assert_eq!(depth_after_adds, depth + 2);

    assert_eq!(f.timeline.separate_audio(text, title), Err(EditError::NotMediaTrack));
    assert!(f.timeline.move_element(text, title, f.v1, secs(1)).is_err());
    assert!(f.timeline.split_element(text, title, secs(4)).is_err());
    assert_eq!(f.timeline.history().undo_count(), depth_after_adds);
}

// ── Snapping while dragging ────────────────────────────────────

#[test]
fn dragged_element_snaps_to_edge_on_other_track() {
    let mut f = build_timeline();
    let scale = TimelineScale::default();

    // Grab Overlay at its start and pull it toward Body's end at 35s
    f.timeline.start_drag(f.v2, f.overlay, 500.0, secs(10)).unwrap();
    let start = f
        .timeline
        .update_drag(RationalTime::new(3_490, 100), secs(0), &scale, FrameRate::FPS_30)
        .unwrap();
    assert_eq!(start, secs(35));
    assert_eq!(
        f.timeline.drag().snap_indicator().map(|s| s.point.kind),
        Some(SnapKind::ElementEdge)
    );

    f.timeline.end_drag(Some(f.v1)).unwrap();
    assert!(f.timeline.track(f.v2).unwrap().is_empty());
    assert_eq!(f.timeline.element(f.v1, f.overlay).unwrap().start_time, secs(35));
    assert!(f.timeline.drag().snap_indicator().is_none());
}

#[test]
fn zoomed_in_drag_ignores_distant_edge() {
    let mut f = build_timeline();
    f.timeline.start_drag(f.v2, f.overlay, 500.0, secs(10)).unwrap();
    // 0.15s from the edge: 10px is only 0.05s at zoom 4
    let start = f
        .timeline
        .update_drag(
            RationalTime::new(3_485, 100),
            secs(0),
            &TimelineScale::new(50.0, 4.0),
            FrameRate::FPS_30,
        )
        .unwrap();
    assert_ne!(start, secs(35));
    f.timeline.cancel_drag();
}

// ── Resize ─────────────────────────────────────────────────────

#[test]
fn resize_edges_then_undo() {
    let mut f = build_timeline();
    let original = f.timeline.element(f.v1, f.body).cloned().unwrap();

    f.timeline.resize_element(f.v1, f.body, ResizeEdge::Left, secs(8)).unwrap();
    f.timeline.resize_element(f.v1, f.body, ResizeEdge::Right, secs(30)).unwrap();
    let body = f.timeline.element(f.v1, f.body).unwrap();
    assert_eq!(body.start_time, secs(8));
    assert_eq!(body.trim_start, secs(3));
    assert_eq!(body.trim_end, secs(5));
    assert_eq!(body.effective_range().end(), secs(30));

    f.timeline.undo().unwrap();
    f.timeline.undo().unwrap();
    assert_eq!(f.timeline.element(f.v1, f.body), Some(&original));
}

// ── Serialization roundtrip ────────────────────────────────────

#[test]
fn edited_project_survives_roundtrip() {
    let f = build_timeline();
    let mut project = Project::new("Integration Test Project");
    project.timeline = f.timeline;
    project.timeline.set_ripple_enabled(true);
    project.toggle_bookmark(secs(5));

    let json = ProjectFile::new(project.clone(), MediaLibrary::new())
        .to_json()
        .unwrap();
    let loaded = ProjectFile::from_json(&json).unwrap().project;

    assert_eq!(loaded.timeline.tracks(), project.timeline.tracks());
    assert!(loaded.timeline.ripple_enabled());
    assert!(loaded.timeline.snapping().enabled);
    assert!(loaded.is_bookmarked(secs(5)));
    assert_eq!(loaded.timeline.total_duration(FLOOR), secs(45));
}

// ── Timecodes ──────────────────────────────────────────────────

#[test]
fn element_boundaries_produce_timecodes() {
    let f = build_timeline();
    let rate = FrameRate::FPS_24;
    let track = f.timeline.track(f.v1).unwrap();
    let starts: Vec<String> = track
        .elements_by_time()
        .iter()
        .map(|el| el.effective_start().to_timecode(rate))
        .collect();
    assert_eq!(starts, ["00:00:00:00", "00:00:05:00", "00:00:35:00"]);
    assert_eq!(f.timeline.total_duration(secs(10)).to_timecode(rate), "00:00:45:00");
}

// ── Invariants ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn undo_everything_restores_start(cuts in prop::collection::vec((0usize..5, 1i64..450), 1..20)) {
        let mut f = build_timeline();
        let initial = f.timeline.tracks().to_vec();
        let mut applied = 0;

        for (pick, tenths) in cuts {
            let at = RationalTime::new(tenths, 10);
            let track = &f.timeline.tracks()[pick % 3];
            let (track_id, element_id) = match track.elements.first() {
                Some(el) => (track.id, el.id),
                None => continue,
            };
            if f.timeline.split_element(track_id, element_id, at).is_ok() {
                applied += 1;
            }
            prop_assert_eq!(f.timeline.content_end(), secs(45));
        }

        for _ in 0..applied {
            f.timeline.undo().unwrap();
        }
        prop_assert_eq!(f.timeline.tracks(), initial.as_slice());
    }
}
