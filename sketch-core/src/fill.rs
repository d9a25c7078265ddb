//! Flood fill.
//!
//! 4-connected region fill driven by an explicit stack. The target color is
//! captured at the seed before the pass and matched exactly, so pixels left
//! behind by an anti-aliased edge are not filled. The whole surface is read
//! once and written back once.

use crate::canvas::Raster;
use crate::color::{opaque, parse_hex, same_color};
use crate::error::ColorError;
use egui::Color32;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// Seed out of bounds, or the region already has the fill color.
    Unchanged,
    Filled { pixels: usize },
}

impl FillOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, FillOutcome::Filled { .. })
    }
}

/// Fill the region containing `(start_x, start_y)` with `fill`.
///
/// Fractional coordinates select the pixel that contains them. The fill
/// color is always applied at full alpha.
pub fn flood_fill<R: Raster + ?Sized>(
    raster: &mut R,
    start_x: f32,
    start_y: f32,
    fill: Color32,
) -> FillOutcome {
    let fill = opaque(fill);
    trace!(
        "Starting flood fill at ({}, {}) with color {:?}",
        start_x,
        start_y,
        fill
    );

    let (width, height) = (raster.width(), raster.height());
    if !start_x.is_finite() || !start_y.is_finite() {
        debug!("Fill attempted at non-finite position");
        return FillOutcome::Unchanged;
    }
    let (sx, sy) = (start_x.floor() as i64, start_y.floor() as i64);
    if sx < 0 || sy < 0 || sx >= width as i64 || sy >= height as i64 {
        debug!("Fill attempted at out-of-bounds position ({}, {})", sx, sy);
        return FillOutcome::Unchanged;
    }

    let mut buffer = raster.get_pixels(0, 0, width, height);
    let w = width as usize;
    let target = buffer.pixels()[sy as usize * w + sx as usize];

    if same_color(target, fill) {
        debug!("Target color already matches fill color, skipping fill");
        return FillOutcome::Unchanged;
    }

    // Uniform canvases push O(width * height) entries; reserve for the common
    // case and let the Vec grow from there.
    let mut stack: Vec<(u32, u32)> = Vec::with_capacity(2 * (w + height as usize));
    stack.push((sx as u32, sy as u32));
    let mut filled = 0usize;

    while let Some((x, y)) = stack.pop() {
        let index = y as usize * w + x as usize;
        if !same_color(buffer.pixels()[index], target) {
            continue;
        }

        buffer.pixels_mut()[index] = fill;
        filled += 1;

        if x > 0 {
            stack.push((x - 1, y));
        }
        if x + 1 < width {
            stack.push((x + 1, y));
        }
        if y > 0 {
            stack.push((x, y - 1));
        }
        if y + 1 < height {
            stack.push((x, y + 1));
        }
    }

    raster.put_pixels(&buffer, 0, 0);
    debug!(pixels = filled, "Flood fill completed");
    FillOutcome::Filled { pixels: filled }
}

/// [`flood_fill`] with the color given as `#RRGGBB`.
pub fn flood_fill_hex<R: Raster + ?Sized>(
    raster: &mut R,
    start_x: f32,
    start_y: f32,
    fill_hex: &str,
) -> Result<FillOutcome, ColorError> {
    let fill = parse_hex(fill_hex)?;
    Ok(flood_fill(raster, start_x, start_y, fill))
}
