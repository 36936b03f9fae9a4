//! End-to-end tests for the raw extraction adapter: XML stream in,
//! document model out.

use folio_core::geom::BoundingBox;
use folio_core::input::{parse_drawings_document, parse_text_document};
use folio_core::model::{Document, Element, FontWeight};

const TWO_PAGE_XML: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<pages>
<page id="1" bbox="0.000,0.000,612.000,792.000" rotate="0">
<textbox id="0" bbox="10,760,60,780">
<textline bbox="10,760,60,780">
<text font="Helvetica-Bold" bbox="10.000,760.000,15.000,780.000" ncolour="0,0,0" size="20.000">H</text>
<text font="Helvetica-Bold" bbox="15.000,760.000,20.000,780.000" ncolour="0,0,0" size="20.000">i</text>
<text>
</text>
<text font="Helvetica" bbox="25.000,760.000,30.000,780.000" ncolour="1,0,0" size="20.000">y</text>
<text font="Helvetica" bbox="30.000,760.000,35.000,780.000" ncolour="1,0,0" size="20.000">o</text>
</textline>
</textbox>
<figure name="Fig" bbox="100,100,200,200">
<image src="embedded.bmp" width="100" height="100" />
</figure>
</page>
<page id="2" bbox="0.000,0.000,612.000,792.000" rotate="0">
<textbox id="1" bbox="10,700,60,720" wmode="vertical">
<textline bbox="10,700,60,720">
<text font="Times" bbox="10,700,15,720" size="20">a</text>
</textline>
</textbox>
</page>
</pages>
"#;

// ============================================================================
// Text layer
// ============================================================================

#[test]
fn words_are_rebuilt_with_flipped_boxes() {
    let doc = parse_text_document(TWO_PAGE_XML.as_bytes()).unwrap();
    assert_eq!(doc.pages.len(), 2);

    let page = &doc.pages[0];
    assert_eq!(page.page_number, 1);
    assert_eq!(page.width(), 612.0);
    assert_eq!(page.height(), 792.0);

    let words: Vec<_> = page.words().collect();
    assert_eq!(words.len(), 2);
    assert_eq!(words[0].text(), "Hi");
    assert_eq!(words[1].text(), "yo");

    // bbox 10,760,15,780 on a 792-high page: top = |792 - 760| - 20 = 12.
    assert_eq!(
        words[0].content[0].bbox,
        BoundingBox::new(10.0, 12.0, 5.0, 20.0)
    );
    assert_eq!(words[0].bbox, BoundingBox::new(10.0, 12.0, 10.0, 20.0));
}

#[test]
fn fonts_and_colors_resolve_per_word() {
    let doc = parse_text_document(TWO_PAGE_XML.as_bytes()).unwrap();
    let page = &doc.pages[0];
    let words: Vec<_> = page.words().collect();

    assert_eq!(words[0].font.name, "Helvetica-Bold");
    assert_eq!(words[0].font.weight, FontWeight::Bold);
    assert_eq!(words[0].font.size, 20.0);
    assert_eq!(words[0].font.color, "#000000");

    assert_eq!(words[1].font.weight, FontWeight::Medium);
    assert_eq!(words[1].font.color, "#ff0000");
}

#[test]
fn the_write_mode_of_the_textbox_tags_its_words() {
    let doc = parse_text_document(TWO_PAGE_XML.as_bytes()).unwrap();
    let second_page_words: Vec<_> = doc.page(2).unwrap().words().collect();
    assert_eq!(second_page_words.len(), 1);
    assert_eq!(
        second_page_words[0].properties.write_mode.as_deref(),
        Some("vertical")
    );

    let first_page_words: Vec<_> = doc.pages[0].words().collect();
    assert!(first_page_words.iter().all(|w| w.properties.write_mode.is_none()));
}

#[test]
fn figure_images_carry_their_figure_box_and_name() {
    let doc = parse_text_document(TWO_PAGE_XML.as_bytes()).unwrap();
    let images: Vec<_> = doc.pages[0]
        .elements
        .iter()
        .filter_map(|e| match e {
            Element::Image(image) => Some(image),
            _ => None,
        })
        .collect();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].name, "Fig");
    // Figure bbox 100,100,200,200 flipped on a 792-high page.
    assert_eq!(images[0].bbox, BoundingBox::new(100.0, 592.0, 100.0, 100.0));
}

#[test]
fn composite_boxes_equal_the_merge_of_their_children() {
    let doc = parse_text_document(TWO_PAGE_XML.as_bytes()).unwrap();
    for page in &doc.pages {
        for word in page.words() {
            assert!(!word.content.is_empty());
            assert_eq!(
                word.bbox,
                BoundingBox::merge(word.content.iter().map(|c| c.bbox))
            );
        }
    }
}

#[test]
fn a_malformed_numeric_attribute_fails_the_text_parse() {
    let xml = r#"<pages>
<page id="1" bbox="0,0,612,792">
<textbox id="0" bbox="10,760,60,780">
<textline bbox="10,760,60,780">
<text font="Helvetica" bbox="ten,760,15,780" size="10">H</text>
</textline>
</textbox>
</page>
</pages>"#;
    assert!(parse_text_document(xml.as_bytes()).is_err());
}

#[test]
fn a_structurally_broken_stream_fails_the_text_parse() {
    let xml = "<pages><page id=\"1\" bbox=\"0,0,10,10\"><textbox></pages>";
    assert!(parse_text_document(xml.as_bytes()).is_err());
}

#[test]
fn the_document_model_round_trips_through_json() {
    let doc = parse_text_document(TWO_PAGE_XML.as_bytes()).unwrap();
    let json = serde_json::to_string(&doc).unwrap();
    let back: Document = serde_json::from_str(&json).unwrap();

    assert_eq!(back.pages.len(), doc.pages.len());
    let words: Vec<_> = back.pages[0].words().collect();
    assert_eq!(words[0].text(), "Hi");
    assert_eq!(words[0].bbox, BoundingBox::new(10.0, 12.0, 10.0, 20.0));
}

// ============================================================================
// Shape layer
// ============================================================================

#[test]
fn shapes_become_loose_line_segments() {
    let xml = r#"<pages>
<page id="1" bbox="0,0,100,100">
<rect bbox="10,10,30,30" linewidth="2" />
<line bbox="40,40,60,60" linewidth="1" />
</page>
</pages>"#;
    let doc = parse_drawings_document(xml.as_bytes());
    assert_eq!(doc.pages.len(), 1);
    let segments = doc.pages[0].line_segments();
    // 4 rectangle edges + 1 line.
    assert_eq!(segments.len(), 5);
    assert!(doc.pages[0].elements.iter().all(Element::is_line));
}

#[test]
fn perimeter_and_pixel_artifacts_are_filtered() {
    let xml = r#"<pages>
<page id="1" bbox="0,0,100,100">
<rect bbox="0,0,100,100" linewidth="1" />
<line bbox="50,50,50.2,50.2" linewidth="1" />
<line bbox="20,20,40,40" linewidth="1" />
</page>
</pages>"#;
    let doc = parse_drawings_document(xml.as_bytes());
    // The full-page rectangle is the page frame, the 0.2-unit line is
    // sub-pixel noise; only the real diagonal survives.
    let segments = doc.pages[0].line_segments();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].bbox, BoundingBox::new(20.0, 60.0, 20.0, 20.0));
}

#[test]
fn a_malformed_page_is_dropped_from_the_shape_layer() {
    let xml = r#"<pages>
<page id="1" bbox="0,0,100,100">
<rect bbox="10,10,30,30" />
</page>
<page id="2" bbox="broken">
<rect bbox="10,10,30,30" />
</page>
</pages>"#;
    let doc = parse_drawings_document(xml.as_bytes());
    assert_eq!(doc.pages.len(), 1);
    assert_eq!(doc.pages[0].page_number, 1);
}
