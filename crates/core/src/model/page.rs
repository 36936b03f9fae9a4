//! A single page and its geometric queries.

use serde::{Deserialize, Serialize};

use crate::geom::{BoundingBox, LineSegment};

use super::element::{Drawing, Element, Word};

/// One page of the document: a number, a box and an ordered element list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page_number: usize,
    pub bbox: BoundingBox,
    pub elements: Vec<Element>,
}

impl Page {
    pub fn new(page_number: usize, elements: Vec<Element>, bbox: BoundingBox) -> Self {
        Self {
            page_number,
            bbox,
            elements,
        }
    }

    pub fn width(&self) -> f64 {
        self.bbox.width
    }

    pub fn height(&self) -> f64 {
        self.bbox.height
    }

    /// The loose line segments placed on this page.
    pub fn line_segments(&self) -> Vec<LineSegment> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::Line(line) => Some(line.segment.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.elements.iter().filter_map(|e| match e {
            Element::Word(word) => Some(word),
            _ => None,
        })
    }

    pub fn drawings(&self) -> impl Iterator<Item = &Drawing> {
        self.elements.iter().filter_map(|e| match e {
            Element::Drawing(drawing) => Some(drawing),
            _ => None,
        })
    }

    /// Elements strictly contained in `area`.
    pub fn elements_within(&self, area: BoundingBox) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(move |e| area.contains(&e.bbox()))
    }

    /// Mutable view of the elements strictly contained in `area`.
    pub fn elements_within_mut(&mut self, area: BoundingBox) -> impl Iterator<Item = &mut Element> {
        self.elements
            .iter_mut()
            .filter(move |e| area.contains(&e.bbox()))
    }

    /// One flag per row of the page height: is any element printed there?
    pub fn horizontal_occupancy(&self) -> Vec<bool> {
        self.occupancy(self.height(), |b| (b.top, b.bottom()))
    }

    /// One flag per column of the page width: is any element printed there?
    pub fn vertical_occupancy(&self) -> Vec<bool> {
        self.occupancy(self.width(), |b| (b.left, b.right()))
    }

    fn occupancy(&self, extent: f64, span: impl Fn(&BoundingBox) -> (f64, f64)) -> Vec<bool> {
        let len = extent.ceil().max(0.0) as usize;
        let mut occupied = vec![false; len];
        if len == 0 {
            return occupied;
        }
        for element in &self.elements {
            let (start, end) = span(&element.bbox());
            let first = start.ceil().max(0.0) as usize;
            let last = end.floor().min(len as f64 - 1.0);
            if last < 0.0 {
                continue;
            }
            for slot in occupied
                .iter_mut()
                .take(last as usize + 1)
                .skip(first)
            {
                *slot = true;
            }
        }
        occupied
    }
}
