//! Decoding of the extraction tool's `ncolour` attribute.

const BLACK: &str = "#000000";

/// Decodes an `ncolour` attribute into a `#rrggbb` string.
///
/// The attribute carries a parenthesized comma-separated channel list: 3
/// components are RGB in `[0, 1]`, 4 are CMYK in `[0, 1]`. Channels round
/// with ceiling rounding into 0-255. Absent input, any other component
/// count, or a non-numeric component yields black.
pub fn ncolour_to_hex(colour: Option<&str>) -> String {
    let Some(colour) = colour else {
        return BLACK.to_string();
    };
    let cleaned: String = colour
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '[' | ']') && !c.is_whitespace())
        .collect();
    let components: Vec<f64> = match cleaned.split(',').map(|p| p.parse()).collect() {
        Ok(components) => components,
        Err(_) => return BLACK.to_string(),
    };

    match components[..] {
        [r, g, b] => rgb_to_hex(r, g, b),
        [c, m, y, k] => {
            let r = (1.0 - c) * (1.0 - k);
            let g = (1.0 - m) * (1.0 - k);
            let b = (1.0 - y) * (1.0 - k);
            rgb_to_hex(r, g, b)
        }
        _ => BLACK.to_string(),
    }
}

fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
}

fn channel(value: f64) -> u8 {
    (value * 255.0).ceil().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_components_decode() {
        assert_eq!(ncolour_to_hex(Some("0,0,0")), "#000000");
        assert_eq!(ncolour_to_hex(Some("1,1,1")), "#ffffff");
        assert_eq!(ncolour_to_hex(Some("(1, 0, 0)")), "#ff0000");
        assert_eq!(ncolour_to_hex(Some("[0.5,0.5,0.5]")), "#808080");
    }

    #[test]
    fn cmyk_components_convert_to_rgb() {
        assert_eq!(ncolour_to_hex(Some("0,0,0,0")), "#ffffff");
        assert_eq!(ncolour_to_hex(Some("0,0,0,1")), "#000000");
        assert_eq!(ncolour_to_hex(Some("1,0,0,0")), "#00ffff");
    }

    #[test]
    fn anything_else_is_black() {
        assert_eq!(ncolour_to_hex(None), "#000000");
        assert_eq!(ncolour_to_hex(Some("")), "#000000");
        assert_eq!(ncolour_to_hex(Some("0.3")), "#000000");
        assert_eq!(ncolour_to_hex(Some("0,0")), "#000000");
        assert_eq!(ncolour_to_hex(Some("1,2,3,4,5")), "#000000");
        assert_eq!(ncolour_to_hex(Some("a,b,c")), "#000000");
    }

    #[test]
    fn channels_round_with_ceiling() {
        // 0.001 * 255 = 0.255, ceiling 1
        assert_eq!(ncolour_to_hex(Some("0.001,0,0")), "#010000");
    }
}
