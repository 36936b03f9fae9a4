//! Reconstruction of raw shapes into line segments.

use smallvec::SmallVec;

use crate::error::{DocError, Result};
use crate::geom::{BoundingBox, LineSegment};

use super::records::{RawShape, RawShapeKind, resolve_box};

pub(crate) type ShapeSegments = SmallVec<[LineSegment; 4]>;

/// Turns a raw shape into line segments: a rectangle becomes its 4 edges, a
/// line becomes itself, a polygon one segment per consecutive point pair
/// plus a closing segment unless the last point already coincides with the
/// first.
pub(crate) fn shape_to_segments(shape: &RawShape, page_height: f64) -> Result<ShapeSegments> {
    let bbox_raw = shape
        .bbox
        .as_deref()
        .ok_or_else(|| DocError::malformed("bbox", ""))?;
    let shape_box = resolve_box(bbox_raw, page_height, 1.0)?;

    let thickness = shape
        .linewidth
        .as_deref()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|&w| w != 0.0)
        .unwrap_or(1.0);

    let mut segments = ShapeSegments::new();
    match shape.kind {
        RawShapeKind::Rect => {
            let (l, t, r, b) = (
                shape_box.left,
                shape_box.top,
                shape_box.right(),
                shape_box.bottom(),
            );
            segments.push(LineSegment::with_bbox(shape_box, thickness, l, t, r, t));
            segments.push(LineSegment::with_bbox(shape_box, thickness, r, t, r, b));
            segments.push(LineSegment::with_bbox(shape_box, thickness, r, b, l, b));
            segments.push(LineSegment::with_bbox(shape_box, thickness, l, b, l, t));
        }
        RawShapeKind::Line => {
            segments.push(LineSegment::with_bbox(
                shape_box,
                thickness,
                shape_box.left,
                shape_box.top,
                shape_box.right(),
                shape_box.bottom(),
            ));
        }
        RawShapeKind::Poly => {
            let points = parse_points(shape.pts.as_deref().unwrap_or(""), page_height)?;
            for pair in points.windows(2) {
                segments.push(LineSegment::with_bbox(
                    shape_box, thickness, pair[0].0, pair[0].1, pair[1].0, pair[1].1,
                ));
            }
            if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
                if first != last {
                    segments.push(LineSegment::with_bbox(
                        shape_box, thickness, last.0, last.1, first.0, first.1,
                    ));
                }
            }
        }
    }
    Ok(segments)
}

/// Parses a flattened `x,y,...` coordinate list, flipping the vertical axis.
fn parse_points(raw: &str, page_height: f64) -> Result<Vec<(f64, f64)>> {
    let values: Vec<f64> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<f64>().map_err(|_| DocError::malformed("pts", raw)))
        .collect::<Result<_>>()?;
    if values.len() % 2 != 0 {
        return Err(DocError::malformed("pts", raw));
    }
    Ok(values
        .chunks_exact(2)
        .map(|pair| (pair[0], page_height - pair[1]))
        .collect())
}

/// True when the segment sits on the page's own bounding frame; the
/// extraction tool renders the page border as geometry.
pub(crate) fn is_perimeter_line(segment: &LineSegment, page_box: &BoundingBox) -> bool {
    let from_x = segment.from_x.round();
    let from_y = segment.from_y.round();
    let to_x = segment.to_x.round();
    let to_y = segment.to_y.round();
    let x = from_x.min(to_x);
    let y = from_y.min(to_y);
    let half = segment.thickness / 2.0;
    let x_min = (x - half).floor();
    let x_max = (x + half).ceil();
    let y_min = (y - half).floor();
    let y_max = (y + half).ceil();

    (segment.is_vertical() && (x_min <= 0.0 || x_max >= page_box.width.floor()))
        || (segment.is_horizontal() && (y_min <= 0.0 || y_max >= page_box.height.floor()))
}

/// True for degenerate sub-pixel segments.
pub(crate) fn is_pixel_line(segment: &LineSegment) -> bool {
    let w = (segment.from_x - segment.to_x).abs();
    let h = (segment.from_y - segment.to_y).abs();
    w < 0.5 && h < 0.5
}
