//! Streaming parse of the extraction XML into raw page records.
//!
//! The stream arrives as element-open/element-close events; nested figures
//! are tracked with an explicit stack of open builders, and a closing
//! `</page>` commits everything accumulated for that page.

use std::borrow::Cow;
use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::warn;

use crate::error::{DocError, Result};

use super::records::{
    RawFigure, RawImage, RawPage, RawShape, RawShapeKind, RawText, RawTextAttrs, RawTextBox,
    RawTextLine,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Full-fidelity text extraction: textboxes and figures, errors surface.
    Text,
    /// Best-effort shape extraction: rect/curve/line records only.
    Drawings,
}

/// Parses the text layer of an extraction dump.
///
/// Malformed XML is fatal here: downstream reconstruction needs the full
/// stream.
pub fn parse_text_pages<R: BufRead>(reader: R) -> Result<Vec<RawPage>> {
    let (pages, error) = run(reader, Mode::Text);
    match error {
        Some(error) => Err(error),
        None => Ok(pages),
    }
}

/// Parses the shape layer of an extraction dump, best effort: a malformed
/// stream logs a warning and yields whatever pages were committed before
/// the failure.
pub fn parse_drawing_pages<R: BufRead>(reader: R) -> Vec<RawPage> {
    let (pages, error) = run(reader, Mode::Drawings);
    if let Some(error) = error {
        warn!(%error, "xml parsing error during shape extraction, keeping partial results");
    }
    pages
}

struct OpenText {
    attrs: Option<RawTextAttrs>,
    content: String,
}

impl OpenText {
    /// Applies the engine's record convention: inner text only counts when
    /// the element also carried attributes.
    fn into_record(self) -> RawText {
        match (self.attrs, self.content) {
            (Some(attrs), content) if !content.is_empty() => RawText {
                text: Some(content),
                attrs: Some(attrs),
            },
            (Some(attrs), _) => RawText {
                text: None,
                attrs: Some(attrs),
            },
            (None, _) => RawText::separator(),
        }
    }
}

struct Accumulator {
    mode: Mode,
    pages: Vec<RawPage>,
    page_id: Option<String>,
    page_bbox: Option<String>,
    text_boxes: Vec<RawTextBox>,
    current_box: Option<RawTextBox>,
    current_line: Option<RawTextLine>,
    open_text: Option<OpenText>,
    figures: Vec<RawFigure>,
    figure_stack: Vec<RawFigure>,
    shapes: Vec<RawShape>,
}

impl Accumulator {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            pages: Vec::new(),
            page_id: None,
            page_bbox: None,
            text_boxes: Vec::new(),
            current_box: None,
            current_line: None,
            open_text: None,
            figures: Vec::new(),
            figure_stack: Vec::new(),
            shapes: Vec::new(),
        }
    }

    fn open_element(&mut self, element: &BytesStart) {
        match element.name().as_ref() {
            b"page" => {
                self.page_id = attr(element, b"id");
                self.page_bbox = attr(element, b"bbox");
            }
            b"textbox" if self.mode == Mode::Text => {
                self.current_box = Some(RawTextBox {
                    write_mode: attr(element, b"wmode"),
                    lines: Vec::new(),
                });
            }
            b"textline" if self.mode == Mode::Text && self.current_box.is_some() => {
                self.current_line = Some(RawTextLine::default());
            }
            b"text"
                if self.mode == Mode::Text
                    && (self.current_line.is_some() || !self.figure_stack.is_empty()) =>
            {
                self.open_text = Some(OpenText {
                    attrs: text_attrs(element),
                    content: String::new(),
                });
            }
            b"figure" if self.mode == Mode::Text => {
                self.figure_stack.push(RawFigure {
                    name: attr(element, b"name").unwrap_or_default(),
                    bbox: attr(element, b"bbox"),
                    ..RawFigure::default()
                });
            }
            b"image" if self.mode == Mode::Text => {
                if let Some(figure) = self.figure_stack.last_mut() {
                    figure.images.push(RawImage {
                        width: attr(element, b"width"),
                        height: attr(element, b"height"),
                    });
                }
            }
            b"rect" if self.mode == Mode::Drawings => {
                self.shapes.push(shape_record(RawShapeKind::Rect, element));
            }
            // Curves are treated as polygons.
            b"curve" if self.mode == Mode::Drawings => {
                self.shapes.push(shape_record(RawShapeKind::Poly, element));
            }
            b"line" if self.mode == Mode::Drawings => {
                self.shapes.push(shape_record(RawShapeKind::Line, element));
            }
            _ => {}
        }
    }

    fn close_element(&mut self, name: &[u8]) {
        match name {
            b"text" => {
                if let Some(open) = self.open_text.take() {
                    let record = open.into_record();
                    if let Some(figure) = self.figure_stack.last_mut() {
                        figure.texts.push(record);
                    } else if let Some(line) = self.current_line.as_mut() {
                        line.texts.push(record);
                    }
                }
            }
            b"textline" => {
                if let (Some(line), Some(text_box)) =
                    (self.current_line.take(), self.current_box.as_mut())
                {
                    text_box.lines.push(line);
                }
            }
            b"textbox" => {
                if let Some(text_box) = self.current_box.take() {
                    self.text_boxes.push(text_box);
                }
            }
            b"figure" => {
                if let Some(figure) = self.figure_stack.pop() {
                    match self.figure_stack.last_mut() {
                        Some(parent) => parent.figures.push(figure),
                        None => self.figures.push(figure),
                    }
                }
            }
            b"page" => self.commit_page(),
            _ => {}
        }
    }

    /// Appends the accumulated page record and resets every accumulator.
    fn commit_page(&mut self) {
        self.pages.push(RawPage {
            id: self.page_id.take(),
            bbox: self.page_bbox.take(),
            text_boxes: std::mem::take(&mut self.text_boxes),
            figures: std::mem::take(&mut self.figures),
            shapes: std::mem::take(&mut self.shapes),
        });
        self.current_box = None;
        self.current_line = None;
        self.open_text = None;
        self.figure_stack.clear();
    }
}

fn run<R: BufRead>(reader: R, mode: Mode) -> (Vec<RawPage>, Option<DocError>) {
    let mut xml = Reader::from_reader(reader);
    let mut acc = Accumulator::new(mode);
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(element)) => acc.open_element(&element),
            Ok(Event::Empty(element)) => {
                acc.open_element(&element);
                let name = element.name().as_ref().to_vec();
                acc.close_element(&name);
            }
            Ok(Event::Text(text)) => {
                if let Some(open) = acc.open_text.as_mut() {
                    match text.unescape() {
                        Ok(unescaped) => open.content.push_str(&unescaped),
                        Err(error) => return (acc.pages, Some(error.into())),
                    }
                }
            }
            Ok(Event::End(element)) => {
                let name = element.name().as_ref().to_vec();
                acc.close_element(&name);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(error) => return (acc.pages, Some(error.into())),
        }
        buf.clear();
    }
    (acc.pages, None)
}

fn attr(element: &BytesStart, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok())
        .map(Cow::into_owned)
}

fn has_attributes(element: &BytesStart) -> bool {
    element.attributes().flatten().next().is_some()
}

fn text_attrs(element: &BytesStart) -> Option<RawTextAttrs> {
    has_attributes(element).then(|| RawTextAttrs {
        font: attr(element, b"font"),
        size: attr(element, b"size"),
        bbox: attr(element, b"bbox"),
        ncolour: attr(element, b"ncolour"),
    })
}

fn shape_record(kind: RawShapeKind, element: &BytesStart) -> RawShape {
    RawShape {
        kind,
        bbox: attr(element, b"bbox"),
        linewidth: attr(element, b"linewidth"),
        pts: attr(element, b"pts"),
    }
}
