//! Header/footer detection via occupancy statistics.
//!
//! Pages of similar physical size vote with per-row/per-column occupancy
//! vectors; positions no page ever prints on are margin candidates, and the
//! candidate closest to each edge within the allowed band becomes the
//! margin.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::geom::BoundingBox;
use crate::model::{Document, Margins, Page};
use crate::utils::{add_vectors, find_positions};

/// Configuration surface of the marginals pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarginalsConfig {
    /// Page numbers excluded from the statistics.
    pub ignore_pages: Vec<usize>,
    /// Maximum percentage of the page height/width a margin may take.
    /// `None` disables the pass.
    pub max_margin_percentage: Option<f64>,
    /// Tolerance, in percent, when grouping pages of similar size.
    pub similarity_size_percentage: f64,
}

impl Default for MarginalsConfig {
    fn default() -> Self {
        Self {
            ignore_pages: Vec::new(),
            max_margin_percentage: Some(15.0),
            similarity_size_percentage: 5.0,
        }
    }
}

/// Infers document margins and tags the elements inside them as headers and
/// footers.
///
/// Skips entirely when fewer than 2 eligible pages remain, when no margin
/// percentage is configured, or when marginal tags already exist.
pub fn detect_marginals(doc: &mut Document, config: &MarginalsConfig) {
    if !is_computable(doc, config) {
        return;
    }
    let Some(max_margin) = config.max_margin_percentage else {
        return;
    };

    let buckets = pages_by_similar_size(doc, config);
    for bucket in buckets.iter().filter(|b| b.len() > 1) {
        let mut occupancy_across_height: Vec<u32> = Vec::new();
        let mut occupancy_across_width: Vec<u32> = Vec::new();
        for &index in bucket {
            let page = &doc.pages[index];
            let rows: Vec<u32> = page
                .horizontal_occupancy()
                .into_iter()
                .map(u32::from)
                .collect();
            occupancy_across_height = add_vectors(&occupancy_across_height, &rows);
            let columns: Vec<u32> = page
                .vertical_occupancy()
                .into_iter()
                .map(u32::from)
                .collect();
            occupancy_across_width = add_vectors(&occupancy_across_width, &columns);
        }

        doc.margins = infer_margins(
            &occupancy_across_height,
            &occupancy_across_width,
            max_margin,
        );
        info!(
            max_margin_percentage = max_margin,
            margins = ?doc.margins,
            "document margins"
        );

        let margins = doc.margins;
        for &index in bucket {
            tag_marginals(&mut doc.pages[index], &margins);
        }
    }
    debug!("done with marginals detection");
}

fn is_computable(doc: &Document, config: &MarginalsConfig) -> bool {
    let mut eligible = doc.pages.len();
    for &page_number in &config.ignore_pages {
        if page_number > 0 && page_number <= doc.pages.len() {
            eligible -= 1;
        }
    }
    if eligible <= 1 {
        warn!("not computing marginals: at most one eligible page, not enough data");
        return false;
    }
    if config.max_margin_percentage.is_none() {
        info!("not computing marginals: no max margin percentage configured");
        return false;
    }
    if doc.has_marginal_tags() {
        warn!("not computing marginals: header and footer data already exists");
        return false;
    }
    info!(
        max_margin_percentage = config.max_margin_percentage,
        "detecting marginals"
    );
    true
}

/// Groups page indices into buckets of similar physical size: a page joins
/// the first bucket whose founding page has both dimensions within the
/// configured tolerance, otherwise it founds a new bucket.
fn pages_by_similar_size(doc: &Document, config: &MarginalsConfig) -> Vec<Vec<usize>> {
    let max_similarity = 1.0 + config.similarity_size_percentage / 100.0;
    let min_similarity = 1.0 / max_similarity;

    let mut buckets: Vec<Vec<usize>> = Vec::new();
    for (index, page) in doc.pages.iter().enumerate() {
        if config.ignore_pages.contains(&page.page_number) {
            continue;
        }
        let slot = buckets.iter_mut().find(|bucket| {
            let first = &doc.pages[bucket[0]];
            first.width() * min_similarity <= page.width()
                && first.width() * max_similarity >= page.width()
                && first.height() * min_similarity <= page.height()
                && first.height() * max_similarity >= page.height()
        });
        match slot {
            Some(bucket) => bucket.push(index),
            None => buckets.push(vec![index]),
        }
    }
    buckets
}

/// Picks, per edge, the zero-occupancy position closest to the content while
/// still inside the allowed percentage band. A side without a qualifying
/// zero keeps no margin.
fn infer_margins(
    occupancy_across_height: &[u32],
    occupancy_across_width: &[u32],
    max_margin_percentage: f64,
) -> Margins {
    let height_zeros = find_positions(occupancy_across_height, &0);
    let width_zeros = find_positions(occupancy_across_width, &0);

    let height_len = occupancy_across_height.len() as f64;
    let width_len = occupancy_across_width.len() as f64;

    let max_top = (max_margin_percentage * height_len / 100.0).floor();
    let max_bottom = (height_len - max_margin_percentage * height_len / 100.0).floor();
    let max_left = (max_margin_percentage * width_len / 100.0).floor();
    let max_right = (width_len - max_margin_percentage * width_len / 100.0).floor();

    Margins {
        top: largest_below(&height_zeros, max_top),
        bottom: smallest_above(&height_zeros, max_bottom),
        left: largest_below(&width_zeros, max_left),
        right: smallest_above(&width_zeros, max_right),
    }
}

fn largest_below(zeros: &[usize], limit: f64) -> Option<f64> {
    zeros
        .iter()
        .rev()
        .find(|&&position| (position as f64) < limit)
        .map(|&position| position as f64)
}

fn smallest_above(zeros: &[usize], limit: f64) -> Option<f64> {
    zeros
        .iter()
        .find(|&&position| (position as f64) > limit)
        .map(|&position| position as f64)
}

fn tag_marginals(page: &mut Page, margins: &Margins) {
    if let Some(top) = margins.top {
        let header_area = BoundingBox::new(0.0, 0.0, page.width(), top);
        for element in page.elements_within_mut(header_area) {
            element.properties_mut().is_header = true;
        }
    }
    if let Some(bottom) = margins.bottom {
        let footer_area = BoundingBox::new(0.0, bottom, page.width(), page.height() - bottom);
        for element in page.elements_within_mut(footer_area) {
            element.properties_mut().is_footer = true;
        }
    }
}
