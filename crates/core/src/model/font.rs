//! Fonts resolved for characters and words.

use serde::{Deserialize, Serialize};

/// Weight of a font face as reported by the extraction engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Medium,
    Bold,
}

/// A resolved font: name, size and style.
///
/// Equality is structural and deliberately semantic: two `Font` values
/// resolved from different characters compare equal when their name, size
/// and style match, which is exactly the relation the clustering in
/// [`find_most_common_font`] needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub name: String,
    pub size: f64,
    pub weight: FontWeight,
    pub is_italic: bool,
    pub is_underline: bool,
    pub color: String,
}

impl Font {
    pub fn new(
        name: impl Into<String>,
        size: f64,
        weight: FontWeight,
        is_italic: bool,
        is_underline: bool,
        color: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            weight,
            is_italic,
            is_underline,
            color: color.into(),
        }
    }

    /// Sentinel returned when no font information is available.
    pub fn undefined() -> Self {
        Self::new("undefined", 0.0, FontWeight::Medium, false, false, "#000000")
    }

    pub fn is_undefined(&self) -> bool {
        self.name == "undefined" && self.size == 0.0
    }
}

/// Clusters fonts into equality baskets and returns a representative of the
/// largest one, or [`Font::undefined`] when `fonts` is empty.
///
/// Ties resolve to the first basket that reached the maximum size, i.e. the
/// basket whose representative was seen earliest in the input.
pub fn find_most_common_font<'a, I>(fonts: I) -> Font
where
    I: IntoIterator<Item = &'a Font>,
{
    let mut baskets: Vec<(&'a Font, usize)> = Vec::new();
    for font in fonts {
        match baskets.iter_mut().find(|(rep, _)| *rep == font) {
            Some((_, count)) => *count += 1,
            None => baskets.push((font, 1)),
        }
    }

    let mut best: Option<(&Font, usize)> = None;
    for (rep, count) in baskets {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((rep, count));
        }
    }
    best.map_or_else(Font::undefined, |(rep, _)| rep.clone())
}
