// Color parsing, comparison and compositing helpers.
// Pixels are stored premultiplied, which keeps both composite modes to one multiply per channel.

use crate::error::ColorError;
use egui::Color32;
use tracing::{trace, warn};

/// Parse `#RRGGBB` (the `#` is optional) into an opaque color.
pub fn parse_hex(input: &str) -> Result<Color32, ColorError> {
    let digits = input.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);

    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        warn!("Rejected color string {:?}", input);
        return Err(ColorError::InvalidHex {
            input: input.to_string(),
        });
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| ColorError::InvalidHex {
            input: input.to_string(),
        })
    };

    let color = Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?);
    trace!("Parsed {:?} as {:?}", input, color);
    Ok(color)
}

/// Format the color channels as `#rrggbb`, dropping alpha.
pub fn to_hex(color: Color32) -> String {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Exact equality on all four channels. No tolerance.
pub fn same_color(a: Color32, b: Color32) -> bool {
    a.to_array() == b.to_array()
}

/// Force a color to full alpha, keeping its unmultiplied channels.
pub fn opaque(color: Color32) -> Color32 {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    Color32::from_rgb(r, g, b)
}

/// Scale a premultiplied color by a global alpha in [0, 1].
pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let opacity = opacity.clamp(0.0, 1.0);
    let [r, g, b, a] = color.to_array();
    let scale = |c: u8| (c as f32 * opacity).round() as u8;
    Color32::from_rgba_premultiplied(scale(r), scale(g), scale(b), scale(a))
}

fn mul_div_255(value: u8, factor: u8) -> u8 {
    ((value as u16 * factor as u16 + 127) / 255) as u8
}

/// Porter-Duff source-over on premultiplied pixels.
pub fn source_over(dst: Color32, src: Color32) -> Color32 {
    let s = src.to_array();
    let d = dst.to_array();
    let inv = 255 - s[3];
    Color32::from_rgba_premultiplied(
        s[0].saturating_add(mul_div_255(d[0], inv)),
        s[1].saturating_add(mul_div_255(d[1], inv)),
        s[2].saturating_add(mul_div_255(d[2], inv)),
        s[3].saturating_add(mul_div_255(d[3], inv)),
    )
}

/// Porter-Duff destination-out: the source's alpha punches through the destination.
pub fn destination_out(dst: Color32, src: Color32) -> Color32 {
    let d = dst.to_array();
    let inv = 255 - src.a();
    Color32::from_rgba_premultiplied(
        mul_div_255(d[0], inv),
        mul_div_255(d[1], inv),
        mul_div_255(d[2], inv),
        mul_div_255(d[3], inv),
    )
}
