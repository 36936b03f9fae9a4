//! Drawing detection: groups visually connected line segments.
//!
//! A control line sweeps the bounding box of the segment set along both
//! axes; steps where it crosses nothing are visual gaps between groups.
//! Recursing into columns, then rows, until a set can no longer be split
//! leaves exactly the connected figures.

use std::path::Path;

use rustc_hash::FxHashSet;
use tracing::{info, warn};

use crate::error::Result;
use crate::geom::{BoundingBox, LineSegment};
use crate::model::{Document, Drawing, Element};

/// How far the control line runs past the box edge before stopping.
const SWEEP_OVERSHOOT: f64 = 5.0;

/// Groups the line segments of the document's drawings side-channel into
/// `Drawing` elements and persists the result back to the side-channel
/// file.
///
/// The pass is a no-op when the document has no side-channel, when the file
/// is missing or unreadable, or when it already contains drawings.
pub fn detect_drawings(doc: &mut Document) -> Result<()> {
    let Some(path) = doc.drawings_file.clone() else {
        warn!("no drawings file associated with the document, skipping drawing detection");
        return Ok(());
    };
    let mut drawings_doc = match load_drawings(&path) {
        Ok(drawings_doc) => drawings_doc,
        Err(error) => {
            warn!(
                %error,
                path = %path.display(),
                "cannot read drawings file, skipping drawing detection"
            );
            return Ok(());
        }
    };

    if drawings_doc.has_drawings() {
        warn!("document already has drawings, skipping drawing detection");
        return Ok(());
    }

    for page in &mut drawings_doc.pages {
        let segments = page.line_segments();
        let mut drawings = Vec::new();
        group_segments_into_drawings(segments, &mut drawings);
        page.elements = drawings.into_iter().map(Element::Drawing).collect();
    }

    info!(
        count = drawings_doc.drawings_count(),
        "drawings found on document"
    );
    let json = serde_json::to_string(&drawings_doc)?;
    std::fs::write(&path, json)?;
    Ok(())
}

fn load_drawings(path: &Path) -> Result<Document> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Recursively splits a segment set into connected drawings.
///
/// More than one column splits by column; failing that, more than one row
/// splits by row; a set separable in neither direction is one connected
/// drawing.
pub fn group_segments_into_drawings(segments: Vec<LineSegment>, found: &mut Vec<Drawing>) {
    if segments.is_empty() {
        return;
    }
    let (columns, rows) = group_lines(&segments);
    if columns.len() > 1 {
        for column in columns {
            group_segments_into_drawings(column, found);
        }
    } else if rows.len() > 1 {
        for row in rows {
            group_segments_into_drawings(row, found);
        }
    } else if let Some(lines) = columns.into_iter().next() {
        found.push(Drawing::new(lines));
    }
}

fn group_lines(segments: &[LineSegment]) -> (Vec<Vec<LineSegment>>, Vec<Vec<LineSegment>>) {
    let bbox = BoundingBox::from_segments(segments.iter());

    // A vertical control line sweeping rightward detects columns.
    let vertical = LineSegment::new(1.0, bbox.left, bbox.top, bbox.left, bbox.bottom());
    let columns = sweep(segments, &bbox, vertical);

    // A horizontal control line sweeping downward detects rows.
    let horizontal = LineSegment::new(1.0, bbox.left, bbox.top, bbox.right(), bbox.top);
    let rows = sweep(segments, &bbox, horizontal);

    (columns, rows)
}

/// Advances the control line one unit at a time across the box, collecting
/// every segment it touches into the current group; a step that touches
/// nothing closes the group. Segments consumed by an earlier group never
/// join a later one.
fn sweep(
    segments: &[LineSegment],
    bbox: &BoundingBox,
    mut control: LineSegment,
) -> Vec<Vec<LineSegment>> {
    let mut groups: Vec<Vec<LineSegment>> = Vec::new();
    let mut consumed: FxHashSet<u64> = FxHashSet::default();
    let mut current: Vec<LineSegment> = Vec::new();
    let sweeps_rightward = control.is_vertical();

    loop {
        let past_the_end = if sweeps_rightward {
            control.to_x > bbox.right() + SWEEP_OVERSHOOT
        } else {
            control.to_y > bbox.bottom() + SWEEP_OVERSHOOT
        };
        if past_the_end {
            break;
        }

        let touching: Vec<&LineSegment> = segments
            .iter()
            .filter(|s| control.intersects(s) || control.is_on_top(s))
            .collect();
        if touching.is_empty() {
            // The control line is on a gap between drawings.
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
        } else {
            for segment in touching {
                if consumed.insert(segment.id) {
                    current.push(segment.clone());
                }
            }
        }

        if sweeps_rightward {
            control.translate(1.0, 0.0);
        } else {
            control.translate(0.0, 1.0);
        }
    }

    if !current.is_empty() {
        groups.push(current);
    }
    groups
}
