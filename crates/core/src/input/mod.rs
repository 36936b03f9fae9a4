//! Raw extraction adapter.
//!
//! Turns the XML dump of an external page-extraction tool into the document
//! model: a streaming parse accumulates transient raw records, then a
//! reconstruction pass builds pages out of them (word segmentation, font
//! clustering, color decoding, shape-to-segment conversion, figure/image
//! recovery).

mod color;
mod figures;
mod records;
mod shapes;
mod stream;
mod words;

pub use color::ncolour_to_hex;
pub use records::{
    RawFigure, RawImage, RawPage, RawShape, RawShapeKind, RawText, RawTextAttrs, RawTextBox,
    RawTextLine,
};
pub use stream::{parse_drawing_pages, parse_text_pages};
pub use words::break_line_into_words;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::warn;

use crate::error::{DocError, Result};
use crate::geom::BoundingBox;
use crate::model::{Document, Element, Line, Page};

use records::parse_bbox;

/// Parses the text layer of an extraction dump into a document.
pub fn parse_text_document<R: BufRead>(reader: R) -> Result<Document> {
    let raw_pages = parse_text_pages(reader)?;
    build_document(&raw_pages)
}

/// Parses the shape layer of an extraction dump into a document of loose
/// line segments, best effort: pages that cannot be reconstructed are
/// dropped with a warning.
pub fn parse_drawings_document<R: BufRead>(reader: R) -> Document {
    let raw_pages = parse_drawing_pages(reader);
    let mut pages = Vec::with_capacity(raw_pages.len());
    for raw in &raw_pages {
        match build_page(raw) {
            Ok(page) => pages.push(page),
            Err(error) => {
                warn!(%error, page = ?raw.id, "skipping malformed page during shape extraction");
            }
        }
    }
    Document::new(pages)
}

/// Reads and parses the text layer from a file.
pub fn parse_text_file(path: impl AsRef<Path>) -> Result<Document> {
    let file = File::open(path)?;
    parse_text_document(BufReader::new(file))
}

/// Reads and parses the shape layer from a file.
pub fn parse_drawings_file(path: impl AsRef<Path>) -> Result<Document> {
    let file = File::open(path)?;
    Ok(parse_drawings_document(BufReader::new(file)))
}

/// Builds the document model from committed raw pages.
pub fn build_document(raw_pages: &[RawPage]) -> Result<Document> {
    let pages = raw_pages.iter().map(build_page).collect::<Result<_>>()?;
    Ok(Document::new(pages))
}

fn build_page(raw: &RawPage) -> Result<Page> {
    let bbox_raw = raw
        .bbox
        .as_deref()
        .ok_or_else(|| DocError::malformed("bbox", ""))?;
    // Extractor pages are zero-origin, so the raw values map straight onto
    // left/top/width/height.
    let values = parse_bbox(bbox_raw)?;
    let page_box = BoundingBox::new(values[0], values[1], values[2], values[3]);
    let page_height = page_box.height;

    let mut elements: Vec<Element> = Vec::new();

    for text_box in &raw.text_boxes {
        for line in &text_box.lines {
            let words = break_line_into_words(
                &line.texts,
                page_height,
                1.0,
                text_box.write_mode.as_deref(),
            )?;
            elements.extend(words.into_iter().map(Element::Word));
        }
    }

    for figure in &raw.figures {
        if figures::has_images(figure) {
            let images = figures::images_in_figure(figure, page_height, 1.0, "")?;
            elements.extend(images.into_iter().map(Element::Image));
        }
        if figures::has_texts(figure) {
            let words =
                break_line_into_words(figures::texts_in_figure(figure), page_height, 1.0, None)?;
            elements.extend(words.into_iter().map(Element::Word));
        }
    }

    for shape in &raw.shapes {
        for segment in shapes::shape_to_segments(shape, page_height)? {
            if !shapes::is_perimeter_line(&segment, &page_box)
                && !shapes::is_pixel_line(&segment)
            {
                elements.push(Element::Line(Line::new(segment)));
            }
        }
    }

    let page_number = match raw.id.as_deref() {
        Some(id) => id
            .trim()
            .parse::<usize>()
            .map_err(|_| DocError::malformed("id", id))?,
        None => return Err(DocError::malformed("id", "")),
    };
    Ok(Page::new(page_number, elements, page_box))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_page_without_a_bbox_is_malformed() {
        let raw = RawPage {
            id: Some("1".to_string()),
            ..RawPage::default()
        };
        assert!(build_document(&[raw]).is_err());
    }

    #[test]
    fn a_page_without_an_id_is_malformed() {
        let raw = RawPage {
            bbox: Some("0,0,100,100".to_string()),
            ..RawPage::default()
        };
        assert!(build_document(&[raw]).is_err());
    }

    #[test]
    fn an_empty_raw_page_builds_an_empty_page() {
        let raw = RawPage {
            id: Some("3".to_string()),
            bbox: Some("0,0,612,792".to_string()),
            ..RawPage::default()
        };
        let doc = build_document(&[raw]).unwrap();
        assert_eq!(doc.pages.len(), 1);
        let page = &doc.pages[0];
        assert_eq!(page.page_number, 3);
        assert_eq!(page.width(), 612.0);
        assert_eq!(page.height(), 792.0);
        assert!(page.elements.is_empty());
    }
}
