//! Line segments with thickness and a stable identity.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::EPSILON;
use super::bbox::BoundingBox;

static NEXT_SEGMENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_segment_id() -> u64 {
    NEXT_SEGMENT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A stroked line segment.
///
/// The id is process-unique and survives serialization; the drawing sweep
/// relies on it to never assign a segment to two groups. The stored bounding
/// box is the box of the shape the segment came from (for a rectangle edge,
/// the whole rectangle), not necessarily the hull of its endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSegment {
    pub id: u64,
    pub thickness: f64,
    pub from_x: f64,
    pub from_y: f64,
    pub to_x: f64,
    pub to_y: f64,
    pub bbox: BoundingBox,
}

impl LineSegment {
    /// Creates a segment whose bounding box is the hull of its endpoints.
    pub fn new(thickness: f64, from_x: f64, from_y: f64, to_x: f64, to_y: f64) -> Self {
        let bbox = BoundingBox::new(
            from_x.min(to_x),
            from_y.min(to_y),
            (to_x - from_x).abs(),
            (to_y - from_y).abs(),
        );
        Self::with_bbox(bbox, thickness, from_x, from_y, to_x, to_y)
    }

    /// Creates a segment carrying the bounding box of its source shape.
    pub fn with_bbox(
        bbox: BoundingBox,
        thickness: f64,
        from_x: f64,
        from_y: f64,
        to_x: f64,
        to_y: f64,
    ) -> Self {
        Self {
            id: next_segment_id(),
            thickness,
            from_x,
            from_y,
            to_x,
            to_y,
            bbox,
        }
    }

    pub fn is_vertical(&self) -> bool {
        self.from_x == self.to_x
    }

    pub fn is_horizontal(&self) -> bool {
        self.from_y == self.to_y
    }

    /// Shifts the segment in place. Only the sweep control line moves.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.from_x += dx;
        self.to_x += dx;
        self.from_y += dy;
        self.to_y += dy;
        self.bbox.left += dx;
        self.bbox.top += dy;
    }

    /// Geometric intersection test, accounting for the thickness of both
    /// segments: strokes closer than the sum of their half-thicknesses touch.
    pub fn intersects(&self, other: &LineSegment) -> bool {
        if segments_cross(self, other) {
            return true;
        }
        let slack = (self.thickness + other.thickness) / 2.0;
        segment_distance(self, other) <= slack
    }

    /// True when `other` lies on this segment: both are colinear and their
    /// projections overlap.
    pub fn is_on_top(&self, other: &LineSegment) -> bool {
        let dx = self.to_x - self.from_x;
        let dy = self.to_y - self.from_y;
        let len = (dx * dx + dy * dy).sqrt();
        if len < EPSILON {
            return false;
        }

        let cross_from = dx * (other.from_y - self.from_y) - dy * (other.from_x - self.from_x);
        let cross_to = dx * (other.to_y - self.from_y) - dy * (other.to_x - self.from_x);
        if cross_from.abs() / len > EPSILON || cross_to.abs() / len > EPSILON {
            return false;
        }

        let t_from = ((other.from_x - self.from_x) * dx + (other.from_y - self.from_y) * dy)
            / (len * len);
        let t_to = ((other.to_x - self.from_x) * dx + (other.to_y - self.from_y) * dy) / (len * len);
        let lo = t_from.min(t_to);
        let hi = t_from.max(t_to);
        hi >= 0.0 && lo <= 1.0
    }
}

fn orientation(ax: f64, ay: f64, bx: f64, by: f64, cx: f64, cy: f64) -> f64 {
    (bx - ax) * (cy - ay) - (by - ay) * (cx - ax)
}

fn within_span(lo: f64, hi: f64, v: f64) -> bool {
    v >= lo.min(hi) - EPSILON && v <= lo.max(hi) + EPSILON
}

fn on_segment(s: &LineSegment, x: f64, y: f64) -> bool {
    within_span(s.from_x, s.to_x, x) && within_span(s.from_y, s.to_y, y)
}

/// Exact (zero-thickness) segment intersection via orientation tests.
fn segments_cross(a: &LineSegment, b: &LineSegment) -> bool {
    let d1 = orientation(b.from_x, b.from_y, b.to_x, b.to_y, a.from_x, a.from_y);
    let d2 = orientation(b.from_x, b.from_y, b.to_x, b.to_y, a.to_x, a.to_y);
    let d3 = orientation(a.from_x, a.from_y, a.to_x, a.to_y, b.from_x, b.from_y);
    let d4 = orientation(a.from_x, a.from_y, a.to_x, a.to_y, b.to_x, b.to_y);

    if ((d1 > EPSILON && d2 < -EPSILON) || (d1 < -EPSILON && d2 > EPSILON))
        && ((d3 > EPSILON && d4 < -EPSILON) || (d3 < -EPSILON && d4 > EPSILON))
    {
        return true;
    }

    (d1.abs() <= EPSILON && on_segment(b, a.from_x, a.from_y))
        || (d2.abs() <= EPSILON && on_segment(b, a.to_x, a.to_y))
        || (d3.abs() <= EPSILON && on_segment(a, b.from_x, b.from_y))
        || (d4.abs() <= EPSILON && on_segment(a, b.to_x, b.to_y))
}

fn point_segment_distance(px: f64, py: f64, s: &LineSegment) -> f64 {
    let dx = s.to_x - s.from_x;
    let dy = s.to_y - s.from_y;
    let len2 = dx * dx + dy * dy;
    if len2 < EPSILON {
        return ((px - s.from_x).powi(2) + (py - s.from_y).powi(2)).sqrt();
    }
    let t = (((px - s.from_x) * dx + (py - s.from_y) * dy) / len2).clamp(0.0, 1.0);
    let cx = s.from_x + t * dx;
    let cy = s.from_y + t * dy;
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// Minimal distance between two non-crossing segments.
fn segment_distance(a: &LineSegment, b: &LineSegment) -> f64 {
    point_segment_distance(a.from_x, a.from_y, b)
        .min(point_segment_distance(a.to_x, a.to_y, b))
        .min(point_segment_distance(b.from_x, b.from_y, a))
        .min(point_segment_distance(b.to_x, b.to_y, a))
}
