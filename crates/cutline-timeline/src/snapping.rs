//! Snapping engine for timeline interactions.

use cutline_core::{FrameRate, RationalTime, TimelineScale};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::track::Track;

/// Kind of snap point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapKind {
    Playhead,
    ElementEdge,
    Frame,
}

/// A point on the timeline that can be snapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapPoint {
    pub time: RationalTime,
    pub kind: SnapKind,
    /// Element owning the edge, for `ElementEdge` points
    pub element_id: Option<Uuid>,
}

impl SnapPoint {
    pub fn playhead(time: RationalTime) -> Self {
        Self {
            time,
            kind: SnapKind::Playhead,
            element_id: None,
        }
    }

    pub fn edge(time: RationalTime, element_id: Uuid) -> Self {
        Self {
            time,
            kind: SnapKind::ElementEdge,
            element_id: Some(element_id),
        }
    }

    pub fn frame(time: RationalTime) -> Self {
        Self {
            time,
            kind: SnapKind::Frame,
            element_id: None,
        }
    }
}

/// Outcome of a successful snap; doubles as the snap indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapResult {
    /// Snapped value. For element moves this is the new start time.
    pub time: RationalTime,
    /// Candidate that attracted the edge
    pub point: SnapPoint,
    /// How far the edge travelled
    pub distance: RationalTime,
}

/// Engine for computing snap targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapping {
    pub enabled: bool,
    /// Snap distance in pixels (converted to time through the scale).
    pub threshold_px: f64,
}

impl Snapping {
    pub fn new(threshold_px: f64) -> Self {
        Self {
            enabled: true,
            threshold_px,
        }
    }

    /// Collect the playhead and every element edge, skipping `exclude`.
    pub fn collect_snap_points(
        tracks: &[Track],
        playhead: RationalTime,
        exclude: Option<Uuid>,
    ) -> Vec<SnapPoint> {
        let mut points = vec![SnapPoint::playhead(playhead)];

        for element in tracks
            .iter()
            .flat_map(|t| t.elements.iter())
            .filter(|el| Some(el.id) != exclude)
        {
            points.push(SnapPoint::edge(element.effective_start(), element.id));
            points.push(SnapPoint::edge(element.effective_end(), element.id));
        }

        points
    }

    /// Snap threshold in time at the given scale.
    pub fn threshold(&self, scale: &TimelineScale) -> RationalTime {
        scale.px_span_to_time(self.threshold_px)
    }

    /// Find the closest snap point within the threshold. When no playhead or
    /// element edge is in reach the nearest frame boundary is used instead.
    /// Ties keep the earlier candidate.
    pub fn find_snap(
        &self,
        time: RationalTime,
        points: &[SnapPoint],
        scale: &TimelineScale,
        rate: FrameRate,
    ) -> Option<SnapResult> {
        if !self.enabled {
            return None;
        }
        let threshold = self.threshold(scale);
        nearest(time, points, threshold).or_else(|| frame_snap(time, threshold, rate))
    }

    /// Snap a single edge (resize handle, playhead scrub).
    /// Disabled snapping returns before any candidate is collected.
    pub fn snap_time(
        &self,
        time: RationalTime,
        tracks: &[Track],
        playhead: RationalTime,
        exclude: Option<Uuid>,
        scale: &TimelineScale,
        rate: FrameRate,
    ) -> Option<SnapResult> {
        if !self.enabled {
            return None;
        }
        let points = Self::collect_snap_points(tracks, playhead, exclude);
        self.find_snap(time, &points, scale, rate)
    }

    /// Snap an element being moved so that whichever of its edges is closer
    /// to a candidate lands on it. The result time is the new start.
    #[allow(clippy::too_many_arguments)]
    pub fn snap_element_move(
        &self,
        element_id: Uuid,
        new_start: RationalTime,
        length: RationalTime,
        tracks: &[Track],
        playhead: RationalTime,
        scale: &TimelineScale,
        rate: FrameRate,
    ) -> Option<SnapResult> {
        if !self.enabled {
            return None;
        }
        let threshold = self.threshold(scale);
        let points = Self::collect_snap_points(tracks, playhead, Some(element_id));

        let start_snap = nearest(new_start, &points, threshold);
        let end_snap = nearest(new_start + length, &points, threshold).map(|snap| SnapResult {
            time: snap.time - length,
            ..snap
        });

        match (start_snap, end_snap) {
            (Some(start), Some(end)) if end.distance < start.distance => Some(end),
            (Some(start), _) => Some(start),
            (None, Some(end)) => Some(end),
            (None, None) => frame_snap(new_start, threshold, rate),
        }
    }
}

/// Closest candidate within `threshold`; the first one wins a tie.
fn nearest(time: RationalTime, points: &[SnapPoint], threshold: RationalTime) -> Option<SnapResult> {
    let mut best: Option<SnapResult> = None;
    for point in points {
        let distance = (point.time - time).abs();
        if distance <= threshold && best.map_or(true, |b| distance < b.distance) {
            best = Some(SnapResult {
                time: point.time,
                point: *point,
                distance,
            });
        }
    }
    best
}

fn frame_snap(time: RationalTime, threshold: RationalTime, rate: FrameRate) -> Option<SnapResult> {
    let frame = SnapPoint::frame(time.round_to_frame(rate));
    let distance = (frame.time - time).abs();
    (distance <= threshold).then_some(SnapResult {
        time: frame.time,
        point: frame,
        distance,
    })
}

impl Default for Snapping {
    fn default() -> Self {
        Self::new(10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementSpec;
    use crate::track::TrackKind;

    const RATE: FrameRate = FrameRate::FPS_30;

    fn t(secs: f64) -> RationalTime {
        RationalTime::from_seconds_f64(secs)
    }

    fn scale() -> TimelineScale {
        // 10px at 50px/s → 0.2s threshold
        TimelineScale::new(50.0, 1.0)
    }

    fn tracks() -> Vec<Track> {
        let mut track = Track::new(TrackKind::Media);
        track
            .elements
            .push(ElementSpec::media("a", "m", t(5.0)).at(t(2.0)).build());
        vec![track]
    }

    #[test]
    fn test_collect_snap_points() {
        let tracks = tracks();
        let points = Snapping::collect_snap_points(&tracks, t(1.0), None);
        // Playhead + 2 element edges
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].kind, SnapKind::Playhead);

        let own = tracks[0].elements[0].id;
        let points = Snapping::collect_snap_points(&tracks, t(1.0), Some(own));
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn test_find_snap_near_edge() {
        let snapping = Snapping::default();
        let tracks = tracks();
        let points = Snapping::collect_snap_points(&tracks, t(20.0), None);
        let snap = snapping.find_snap(t(6.93), &points, &scale(), RATE).unwrap();
        assert_eq!(snap.time, t(7.0));
        assert_eq!(snap.point.kind, SnapKind::ElementEdge);
    }

    #[test]
    fn test_playhead_beats_closer_frame() {
        let snapping = Snapping::default();
        let points = [SnapPoint::playhead(t(3.1))];
        // Frame boundary at 3.0333 is closer, but real candidates come first
        let snap = snapping.find_snap(t(3.04), &points, &scale(), RATE).unwrap();
        assert_eq!(snap.point.kind, SnapKind::Playhead);
        assert_eq!(snap.time, t(3.1));
    }

    #[test]
    fn test_find_snap_falls_back_to_frame() {
        let snapping = Snapping::default();
        let snap = snapping.find_snap(t(1.01), &[], &scale(), RATE).unwrap();
        assert_eq!(snap.point.kind, SnapKind::Frame);
        assert_eq!(snap.time, t(1.0));
    }

    #[test]
    fn test_threshold_scales_with_zoom() {
        let snapping = Snapping::default();
        let points = [SnapPoint::playhead(t(4.0))];
        // 0.15s away: inside 0.2s at zoom 1, outside 0.05s at zoom 4
        let near = snapping.find_snap(t(4.15), &points, &TimelineScale::new(50.0, 1.0), RATE);
        assert_eq!(near.unwrap().point.kind, SnapKind::Playhead);
        let far = snapping.find_snap(t(4.15), &points, &TimelineScale::new(50.0, 4.0), RATE);
        assert_ne!(far.map(|s| s.point.kind), Some(SnapKind::Playhead));
    }

    #[test]
    fn test_disabled_snapping_finds_nothing() {
        let mut snapping = Snapping::default();
        snapping.enabled = false;
        let tracks = tracks();
        let points = Snapping::collect_snap_points(&tracks, t(0.0), None);
        assert!(snapping.find_snap(t(2.0), &points, &scale(), RATE).is_none());
        assert!(snapping
            .snap_time(t(2.0), &tracks, t(0.0), None, &scale(), RATE)
            .is_none());
    }

    #[test]
    fn test_snap_element_move_uses_closer_edge() {
        let snapping = Snapping::default();
        let tracks = tracks();
        let dragged = Uuid::new_v4();
        let len = t(3.0);

        // Start 1.95 is 0.05 from the edge at 2.0
        let snap = snapping
            .snap_element_move(dragged, t(1.95), len, &tracks, t(50.0), &scale(), RATE)
            .unwrap();
        assert_eq!(snap.time, t(2.0));
        assert_eq!(snap.point.kind, SnapKind::ElementEdge);

        // End 6.88 is 0.12 from the edge at 7.0; start follows
        let snap = snapping
            .snap_element_move(dragged, t(3.88), len, &tracks, t(50.0), &scale(), RATE)
            .unwrap();
        assert_eq!(snap.time, t(4.0));
        assert_eq!(snap.point.time, t(7.0));
    }

    #[test]
    fn test_snap_element_move_tie_keeps_start_edge() {
        let snapping = Snapping::default();
        let tracks = tracks();
        // 5s element at 2.1: start and end are both 0.1 from an edge
        let snap = snapping
            .snap_element_move(Uuid::new_v4(), t(2.1), t(5.0), &tracks, t(50.0), &scale(), RATE)
            .unwrap();
        assert_eq!(snap.time, t(2.0));
        assert_eq!(snap.point.time, t(2.0));
    }

    #[test]
    fn test_snap_element_move_falls_back_to_frame() {
        let snapping = Snapping::default();
        let tracks = tracks();
        let snap = snapping
            .snap_element_move(Uuid::new_v4(), t(10.51), t(3.0), &tracks, t(50.0), &scale(), RATE)
            .unwrap();
        assert_eq!(snap.point.kind, SnapKind::Frame);
        assert_eq!(snap.time, t(10.5));
    }
}
