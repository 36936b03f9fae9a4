//! Page elements: the tagged union every page owns.

use serde::{Deserialize, Serialize};

use crate::geom::{BoundingBox, LineSegment};

use super::font::Font;

/// Tags attached to an element by the analysis passes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Properties {
    pub order: Option<usize>,
    pub is_header: bool,
    pub is_footer: bool,
    pub write_mode: Option<String>,
}

/// A single glyph with its resolved font.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub bbox: BoundingBox,
    pub content: String,
    pub font: Font,
    #[serde(default)]
    pub properties: Properties,
}

impl Character {
    pub fn new(bbox: BoundingBox, content: impl Into<String>, font: Font) -> Self {
        Self {
            bbox,
            content: content.into(),
            font,
            properties: Properties::default(),
        }
    }
}

/// A run of characters between separators.
///
/// Invariant: `bbox` equals the merge of the content's boxes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub bbox: BoundingBox,
    pub content: Vec<Character>,
    pub font: Font,
    #[serde(default)]
    pub properties: Properties,
}

impl Word {
    pub fn new(bbox: BoundingBox, content: Vec<Character>, font: Font) -> Self {
        Self {
            bbox,
            content,
            font,
            properties: Properties::default(),
        }
    }

    /// The text carried by this word's characters.
    pub fn text(&self) -> String {
        self.content.iter().map(|c| c.content.as_str()).collect()
    }
}

/// A loose line segment placed on the page by the shape reconstruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub segment: LineSegment,
    #[serde(default)]
    pub properties: Properties,
}

impl Line {
    pub fn new(segment: LineSegment) -> Self {
        Self {
            segment,
            properties: Properties::default(),
        }
    }
}

/// A connected figure: line segments grouped by the drawing detection pass.
///
/// Invariant: `bbox` equals the merge of the content's boxes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    pub bbox: BoundingBox,
    pub content: Vec<LineSegment>,
    #[serde(default)]
    pub properties: Properties,
}

impl Drawing {
    pub fn new(content: Vec<LineSegment>) -> Self {
        let mut drawing = Self {
            bbox: BoundingBox::default(),
            content,
            properties: Properties::default(),
        };
        drawing.update_bounding_box();
        drawing
    }

    /// Re-derives the box from the owned segments.
    pub fn update_bounding_box(&mut self) {
        self.bbox = BoundingBox::merge(self.content.iter().map(|s| s.bbox));
    }
}

/// An embedded image, named by its dotted figure path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub bbox: BoundingBox,
    pub src: String,
    pub name: String,
    #[serde(default)]
    pub properties: Properties,
}

impl Image {
    pub fn new(bbox: BoundingBox, src: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bbox,
            src: src.into(),
            name: name.into(),
            properties: Properties::default(),
        }
    }
}

/// Any element that can appear on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Character(Character),
    Word(Word),
    Line(Line),
    Drawing(Drawing),
    Image(Image),
}

/// Dispatches an expression over every element variant.
macro_rules! dispatch {
    ($self:expr, $e:ident => $body:expr) => {
        match $self {
            Element::Character($e) => $body,
            Element::Word($e) => $body,
            Element::Line($e) => $body,
            Element::Drawing($e) => $body,
            Element::Image($e) => $body,
        }
    };
}

impl Element {
    pub fn bbox(&self) -> BoundingBox {
        match self {
            Element::Character(e) => e.bbox,
            Element::Word(e) => e.bbox,
            Element::Line(e) => e.segment.bbox,
            Element::Drawing(e) => e.bbox,
            Element::Image(e) => e.bbox,
        }
    }

    pub fn properties(&self) -> &Properties {
        dispatch!(self, e => &e.properties)
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        dispatch!(self, e => &mut e.properties)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, Element::Drawing(_))
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Element::Line(_))
    }
}
