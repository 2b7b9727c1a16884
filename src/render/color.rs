//! Background color parsing.

use image::Rgba;
use palette::Srgb;

use crate::error::{FaviconError, FaviconResult};

pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Parses `#rgb`/`#rrggbb` hex (with or without `#`), CSS color names and the
/// literal `transparent`.
pub fn parse_color(value: &str) -> FaviconResult<Rgba<u8>> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("transparent") {
        return Ok(TRANSPARENT);
    }

    let rgb: Srgb<u8> = match value.parse() {
        Ok(rgb) => rgb,
        Err(_) => palette::named::from_str(&value.to_ascii_lowercase())
            .ok_or_else(|| FaviconError::InvalidColor(value.to_string()))?,
    };
    Ok(Rgba([rgb.red, rgb.green, rgb.blue, 255]))
}
