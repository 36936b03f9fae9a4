//! Recovery of images and texts from nested figure trees.

use crate::error::{DocError, Result};
use crate::model::Image;

use super::records::{RawFigure, RawText, resolve_box};

/// True when the figure or any descendant carries texts.
pub(crate) fn has_texts(figure: &RawFigure) -> bool {
    !figure.texts.is_empty() || figure.figures.iter().any(has_texts)
}

/// True when the figure or any descendant carries images.
pub(crate) fn has_images(figure: &RawFigure) -> bool {
    !figure.images.is_empty() || figure.figures.iter().any(has_images)
}

/// The texts of a figure tree.
///
/// A figure with its own texts never looks into its children; otherwise the
/// first child subtree yielding a non-empty result wins. Results are never
/// merged across siblings.
pub(crate) fn texts_in_figure(figure: &RawFigure) -> &[RawText] {
    if !figure.texts.is_empty() {
        return &figure.texts;
    }
    for child in &figure.figures {
        let texts = texts_in_figure(child);
        if !texts.is_empty() {
            return texts;
        }
    }
    &[]
}

/// Emits one `Image` per raw image record, named by the dotted path of the
/// figures above it. A figure with child figures yields only its children's
/// images.
pub(crate) fn images_in_figure(
    figure: &RawFigure,
    page_height: f64,
    scaling: f64,
    parent: &str,
) -> Result<Vec<Image>> {
    if !figure.figures.is_empty() {
        let prefix = format!("{parent}{}.", figure.name);
        let mut images = Vec::new();
        for child in &figure.figures {
            images.extend(images_in_figure(child, page_height, scaling, &prefix)?);
        }
        return Ok(images);
    }

    let mut images = Vec::with_capacity(figure.images.len());
    for _raw in &figure.images {
        let bbox_raw = figure
            .bbox
            .as_deref()
            .ok_or_else(|| DocError::malformed("bbox", ""))?;
        images.push(Image::new(
            resolve_box(bbox_raw, page_height, scaling)?,
            // The image bytes live with the external tool; only the
            // placement is recovered here.
            String::new(),
            format!("{parent}{}", figure.name),
        ));
    }
    Ok(images)
}
