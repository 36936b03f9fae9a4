//! The document: pages, inferred margins and the drawings side-channel.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::element::Element;
use super::page::Page;

/// Document-wide margins inferred by the marginals pass.
///
/// `None` means the margin could not be established on that side and callers
/// must treat it as "no header/footer there", never as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

/// An ordered sequence of pages plus document-level annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub pages: Vec<Page>,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawings_file: Option<PathBuf>,
}

impl Document {
    pub fn new(pages: Vec<Page>) -> Self {
        Self {
            pages,
            margins: Margins::default(),
            drawings_file: None,
        }
    }

    pub fn with_drawings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.drawings_file = Some(path.into());
        self
    }

    pub fn page(&self, page_number: usize) -> Option<&Page> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.pages.iter().flat_map(|p| p.elements.iter())
    }

    pub fn drawings_count(&self) -> usize {
        self.elements().filter(|e| e.is_drawing()).count()
    }

    pub fn has_drawings(&self) -> bool {
        self.elements().any(|e| e.is_drawing())
    }

    /// True when a previous marginals run already tagged elements.
    pub fn has_marginal_tags(&self) -> bool {
        self.elements()
            .any(|e| e.properties().is_header || e.properties().is_footer)
    }
}
