//! Word segmentation: turns one raw text line into `Word` elements.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{DocError, Result};
use crate::geom::BoundingBox;
use crate::model::{Character, Font, FontWeight, Word, find_most_common_font};

use super::color::ncolour_to_hex;
use super::records::{RawText, RawTextAttrs, resolve_box};

/// Characters the upstream engine emits that never belong to a word.
const DENIED_CHARS: &[&str] = &["\u{200B}"];

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new("(?i)bold").unwrap());
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new("(?i)italic").unwrap());
static UNDERLINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new("(?i)underline").unwrap());
static CID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(cid:").unwrap());

/// Breaks an ordered raw character sequence into words.
///
/// Denied characters and fake spaces are dropped, separators the engine
/// failed to emit are synthesized from geometry, and the surviving runs
/// between separators become words whose font is the most common among
/// their characters. `write_mode`, when the parent text box carries one,
/// tags every produced word.
pub fn break_line_into_words(
    texts: &[RawText],
    page_height: f64,
    scaling: f64,
    write_mode: Option<&str>,
) -> Result<Vec<Word>> {
    let fake_spaces = there_are_fake_spaces(texts);
    let filtered: Vec<&RawText> = texts
        .iter()
        .filter(|t| !t.text.as_deref().is_some_and(|s| DENIED_CHARS.contains(&s)))
        .filter(|t| !is_fake_char(t, fake_spaces))
        .collect();

    let expanded = add_missing_spaces(&filtered)?;

    let mut chars: Vec<Option<Character>> = Vec::with_capacity(expanded.len());
    for record in &expanded {
        match (&record.text, &record.attrs) {
            (Some(text), Some(attrs)) => {
                chars.push(Some(make_character(text, attrs, page_height, scaling)?));
            }
            _ => chars.push(None),
        }
    }

    if chars.first().is_some_and(|c| c.is_none()) {
        chars.remove(0);
    }
    if chars.last().is_some_and(|c| c.is_none()) {
        chars.pop();
    }

    if chars.is_empty() || (chars.len() == 1 && chars[0].is_none()) {
        return Ok(Vec::new());
    }

    if chars
        .iter()
        .flatten()
        .any(|c| c.content.chars().count() > 1)
    {
        debug!("the extraction engine returned characters longer than one glyph");
    }

    let separator_positions: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter_map(|(position, c)| c.is_none().then_some(position))
        .filter(|&position| position != 0)
        .collect();

    let mut words: Vec<Word> = Vec::new();
    if separator_positions.is_empty() {
        push_word(&mut words, chars.into_iter().flatten().collect());
    } else {
        let ranges = std::iter::once((0, separator_positions[0])).chain(
            separator_positions
                .iter()
                .enumerate()
                .map(|(index, &position)| {
                    let from = position + 1;
                    let to = separator_positions
                        .get(index + 1)
                        .copied()
                        .unwrap_or(chars.len());
                    (from, to)
                }),
        );
        for (from, to) in ranges.collect::<Vec<_>>() {
            let selection: Vec<Character> = chars[from..to]
                .iter()
                .filter_map(|c| c.clone())
                .collect();
            push_word(&mut words, selection);
        }
    }

    if let Some(mode) = write_mode {
        for word in &mut words {
            word.properties.write_mode = Some(mode.to_string());
        }
    }
    Ok(words)
}

fn push_word(words: &mut Vec<Word>, selection: Vec<Character>) {
    if selection.is_empty() {
        return;
    }
    let bbox = BoundingBox::merge(selection.iter().map(|c| c.bbox));
    let font = find_most_common_font(selection.iter().map(|c| &c.font));
    words.push(Word::new(bbox, selection, font));
}

fn make_character(
    text: &str,
    attrs: &RawTextAttrs,
    page_height: f64,
    scaling: f64,
) -> Result<Character> {
    let font_name = attrs.font.clone().unwrap_or_default();
    let size = match attrs.size.as_deref() {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| DocError::malformed("size", raw))?,
        None => 0.0,
    };
    let font = Font::new(
        font_name.as_str(),
        size,
        if BOLD_RE.is_match(&font_name) {
            FontWeight::Bold
        } else {
            FontWeight::Medium
        },
        ITALIC_RE.is_match(&font_name),
        UNDERLINE_RE.is_match(&font_name),
        ncolour_to_hex(attrs.ncolour.as_deref()),
    );

    let bbox_raw = attrs
        .bbox
        .as_deref()
        .ok_or_else(|| DocError::malformed("bbox", ""))?;
    let bbox = resolve_box(bbox_raw, page_height, scaling)?;

    // The engine encodes unmapped glyphs as "(cid:N)"; no reverse mapping
    // exists at this stage.
    let content = if CID_RE.is_match(text) { "?" } else { text };
    Ok(Character::new(bbox, content, font))
}

/// Reinserts the separators the engine failed to emit: when two consecutive
/// glyphs are not side by side, an attribute-only marker goes between them.
fn add_missing_spaces(records: &[&RawText]) -> Result<Vec<RawText>> {
    let mut expanded: Vec<RawText> = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        expanded.push((*record).clone());
        let (Some(attrs), Some(next)) = (record.attrs.as_ref(), records.get(index + 1)) else {
            continue;
        };
        let Some(next_attrs) = next.attrs.as_ref() else {
            continue;
        };
        if !chars_are_side_by_side(attrs, next_attrs)? {
            expanded.push(RawText {
                text: None,
                attrs: Some(attrs.clone()),
            });
        }
    }
    Ok(expanded)
}

/// Two glyphs sit side by side when their baselines align within 2 units on
/// the raw (unflipped) coordinates and the second starts right of the first.
fn chars_are_side_by_side(first: &RawTextAttrs, second: &RawTextAttrs) -> Result<bool> {
    let (Some(first_bbox), Some(second_bbox)) = (first.bbox.as_deref(), second.bbox.as_deref())
    else {
        return Ok(true);
    };
    let first_box = resolve_box(first_bbox, 0.0, 1.0)?;
    let second_box = resolve_box(second_bbox, 0.0, 1.0)?;
    Ok((first_box.bottom() - second_box.bottom()).abs() < 2.0 && first_box.left < second_box.left)
}

/// Detects the engine's fake-space pattern: a record with no text and no
/// attributes immediately followed by one with no text but with attributes.
/// When present, every no-text/no-attribute record in the line is noise.
fn there_are_fake_spaces(texts: &[RawText]) -> bool {
    texts.windows(2).any(|pair| {
        pair[0].text.is_none()
            && pair[0].attrs.is_none()
            && pair[1].text.is_none()
            && pair[1].attrs.is_some()
    })
}

fn is_fake_char(record: &RawText, fake_spaces_in_line: bool) -> bool {
    fake_spaces_in_line && record.text.is_none() && record.attrs.is_none()
}
