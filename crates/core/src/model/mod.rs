//! The document representation owned by the reconstruction pipeline.
//!
//! A [`Document`] owns ordered [`Page`]s; a page owns a flat collection of
//! [`Element`] variants. The input adapter builds characters, words, images
//! and loose line segments; the analysis passes replace or tag them.

mod document;
mod element;
mod font;
mod page;

pub use document::{Document, Margins};
pub use element::{Character, Drawing, Element, Image, Line, Properties, Word};
pub use font::{Font, FontWeight, find_most_common_font};
pub use page::Page;
