//! Transient raw records mirroring the extraction stream.
//!
//! These hold only the string attributes the external tool emitted plus the
//! raw inter-character text; they are discarded once the document model is
//! built. Numeric parsing happens at reconstruction time, where a failure is
//! a caller-visible error.

use crate::error::{DocError, Result};
use crate::geom::BoundingBox;

/// Attributes carried by a `<text>` record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTextAttrs {
    pub font: Option<String>,
    pub size: Option<String>,
    pub bbox: Option<String>,
    pub ncolour: Option<String>,
}

/// One `<text>` record: a glyph, a separator, or engine noise.
///
/// The upstream engine's conventions: a record with text and attributes is a
/// glyph; attributes without text are an empty glyph; neither is a separator
/// marker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawText {
    pub text: Option<String>,
    pub attrs: Option<RawTextAttrs>,
}

impl RawText {
    pub fn glyph(text: impl Into<String>, attrs: RawTextAttrs) -> Self {
        Self {
            text: Some(text.into()),
            attrs: Some(attrs),
        }
    }

    pub fn separator() -> Self {
        Self::default()
    }
}

/// A `<textline>` record.
#[derive(Debug, Clone, Default)]
pub struct RawTextLine {
    pub texts: Vec<RawText>,
}

/// A `<textbox>` record.
#[derive(Debug, Clone, Default)]
pub struct RawTextBox {
    pub write_mode: Option<String>,
    pub lines: Vec<RawTextLine>,
}

/// An `<image>` record inside a figure.
#[derive(Debug, Clone, Default)]
pub struct RawImage {
    pub width: Option<String>,
    pub height: Option<String>,
}

/// A `<figure>` record. Figures nest arbitrarily deep.
#[derive(Debug, Clone, Default)]
pub struct RawFigure {
    pub name: String,
    pub bbox: Option<String>,
    pub figures: Vec<RawFigure>,
    pub images: Vec<RawImage>,
    pub texts: Vec<RawText>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawShapeKind {
    Rect,
    Line,
    Poly,
}

/// A `<rect>`, `<line>` or `<curve>` record (curves are treated as
/// polygons).
#[derive(Debug, Clone)]
pub struct RawShape {
    pub kind: RawShapeKind,
    pub bbox: Option<String>,
    pub linewidth: Option<String>,
    pub pts: Option<String>,
}

/// A committed `<page>` record with everything accumulated inside it.
#[derive(Debug, Clone, Default)]
pub struct RawPage {
    pub id: Option<String>,
    pub bbox: Option<String>,
    pub text_boxes: Vec<RawTextBox>,
    pub figures: Vec<RawFigure>,
    pub shapes: Vec<RawShape>,
}

/// Parses a comma-separated `x0,y0,x1,y1` attribute.
pub(crate) fn parse_bbox(raw: &str) -> Result<[f64; 4]> {
    let mut values = [0.0; 4];
    let mut parts = raw.split(',');
    for value in &mut values {
        *value = parts
            .next()
            .and_then(|p| p.trim().parse::<f64>().ok())
            .ok_or_else(|| DocError::malformed("bbox", raw))?;
    }
    if parts.next().is_some() {
        return Err(DocError::malformed("bbox", raw));
    }
    Ok(values)
}

/// Resolves a raw `bbox` attribute into page coordinates.
///
/// The extraction tool's origin is the bottom-left corner of the page; the
/// document model's is the top-left, so the vertical axis flips:
/// `top = |page_height - y0| - height`.
pub(crate) fn resolve_box(raw: &str, page_height: f64, scaling: f64) -> Result<BoundingBox> {
    let values = parse_bbox(raw)?.map(|v| v * scaling);
    let width = (values[2] - values[0]).abs();
    let height = (values[1] - values[3]).abs();
    let left = values[0];
    let top = (page_height - values[1]).abs() - height;
    Ok(BoundingBox::new(left, top, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_attributes_parse_into_four_floats() {
        assert_eq!(
            parse_bbox("1.5,2,3.25,4").unwrap(),
            [1.5, 2.0, 3.25, 4.0]
        );
        assert!(parse_bbox("1,2,3").is_err());
        assert!(parse_bbox("1,2,3,x").is_err());
        assert!(parse_bbox("1,2,3,4,5").is_err());
    }

    #[test]
    fn resolve_box_flips_the_vertical_axis() {
        // A 10x20 box whose bottom-left corner sits at (5, 30) on a page of
        // height 100 lands 50 units from the top.
        let resolved = resolve_box("5,30,15,50", 100.0, 1.0).unwrap();
        assert_eq!(resolved, BoundingBox::new(5.0, 50.0, 10.0, 20.0));
    }

    #[test]
    fn resolve_box_applies_scaling_before_the_flip() {
        let resolved = resolve_box("1,2,3,4", 10.0, 2.0).unwrap();
        assert_eq!(resolved, BoundingBox::new(2.0, 2.0, 4.0, 4.0));
    }
}
