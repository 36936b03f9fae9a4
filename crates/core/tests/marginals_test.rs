//! Tests for header/footer detection over occupancy statistics.

use folio_core::geom::BoundingBox;
use folio_core::model::{Document, Element, Font, Page, Word};
use folio_core::passes::{MarginalsConfig, detect_marginals};

fn word_at(left: f64, top: f64, width: f64, height: f64) -> Element {
    Element::Word(Word::new(
        BoundingBox::new(left, top, width, height),
        Vec::new(),
        Font::undefined(),
    ))
}

/// A 100x100 page with a header word, a body block and a footer word.
fn page(page_number: usize) -> Page {
    Page::new(
        page_number,
        vec![
            word_at(10.0, 2.0, 20.0, 3.0),
            word_at(10.0, 10.0, 80.0, 80.0),
            word_at(10.0, 93.0, 20.0, 3.0),
        ],
        BoundingBox::new(0.0, 0.0, 100.0, 100.0),
    )
}

fn three_page_document() -> Document {
    Document::new(vec![page(1), page(2), page(3)])
}

#[test]
fn margins_resolve_inside_the_allowed_band() {
    let mut doc = three_page_document();
    detect_marginals(&mut doc, &MarginalsConfig::default());

    // Content occupies rows 2..=5 (header), 10..=90 (body), 93..=96
    // (footer); the closest blank rows inside the 15% band win.
    let top = doc.margins.top.unwrap();
    let bottom = doc.margins.bottom.unwrap();
    assert!((0.0..=15.0).contains(&top));
    assert!((85.0..=100.0).contains(&bottom));
    assert_eq!(top, 9.0);
    assert_eq!(bottom, 91.0);
    assert_eq!(doc.margins.left, Some(9.0));
    assert_eq!(doc.margins.right, Some(91.0));
}

#[test]
fn elements_inside_the_margins_are_tagged() {
    let mut doc = three_page_document();
    detect_marginals(&mut doc, &MarginalsConfig::default());

    for page in &doc.pages {
        let flags: Vec<(bool, bool)> = page
            .elements
            .iter()
            .map(|e| (e.properties().is_header, e.properties().is_footer))
            .collect();
        assert_eq!(flags, vec![(true, false), (false, false), (false, true)]);
    }
}

#[test]
fn a_single_eligible_page_skips_the_pass() {
    let mut doc = Document::new(vec![page(1), page(2)]);
    let config = MarginalsConfig {
        ignore_pages: vec![2],
        ..MarginalsConfig::default()
    };
    detect_marginals(&mut doc, &config);

    assert_eq!(doc.margins.top, None);
    assert!(!doc.has_marginal_tags());
}

#[test]
fn no_configured_percentage_skips_the_pass() {
    let mut doc = three_page_document();
    let config = MarginalsConfig {
        max_margin_percentage: None,
        ..MarginalsConfig::default()
    };
    detect_marginals(&mut doc, &config);
    assert_eq!(doc.margins, Default::default());
    assert!(!doc.has_marginal_tags());
}

#[test]
fn existing_tags_make_a_second_run_a_no_op() {
    let mut doc = three_page_document();
    detect_marginals(&mut doc, &MarginalsConfig::default());
    let tags_after_first: Vec<(bool, bool)> = doc
        .elements()
        .map(|e| (e.properties().is_header, e.properties().is_footer))
        .collect();

    // A second run with a wildly different band must not recompute.
    let config = MarginalsConfig {
        max_margin_percentage: Some(50.0),
        ..MarginalsConfig::default()
    };
    detect_marginals(&mut doc, &config);
    let tags_after_second: Vec<(bool, bool)> = doc
        .elements()
        .map(|e| (e.properties().is_header, e.properties().is_footer))
        .collect();
    assert_eq!(tags_after_first, tags_after_second);
}

#[test]
fn pages_of_different_sizes_carry_no_signal_alone() {
    // Three pages, every one a different size: three single-page buckets,
    // nothing to infer.
    let mut doc = Document::new(vec![
        Page::new(
            1,
            vec![word_at(10.0, 10.0, 80.0, 80.0)],
            BoundingBox::new(0.0, 0.0, 100.0, 100.0),
        ),
        Page::new(
            2,
            vec![word_at(10.0, 10.0, 80.0, 80.0)],
            BoundingBox::new(0.0, 0.0, 200.0, 100.0),
        ),
        Page::new(
            3,
            vec![word_at(10.0, 10.0, 80.0, 80.0)],
            BoundingBox::new(0.0, 0.0, 100.0, 300.0),
        ),
    ]);
    detect_marginals(&mut doc, &MarginalsConfig::default());
    assert_eq!(doc.margins, Default::default());
    assert!(!doc.has_marginal_tags());
}

#[test]
fn ignored_pages_are_left_untagged() {
    let mut doc = three_page_document();
    let config = MarginalsConfig {
        ignore_pages: vec![2],
        ..MarginalsConfig::default()
    };
    detect_marginals(&mut doc, &config);

    assert!(doc.pages[0].elements[0].properties().is_header);
    assert!(doc.pages[2].elements[0].properties().is_header);
    assert!(
        doc.pages[1]
            .elements
            .iter()
            .all(|e| !e.properties().is_header && !e.properties().is_footer)
    );
}
