// The raster surface the drawing widget paints onto.
// It plays the part of the host's 2D context: pixel access, path stroking and snapshots.

use crate::error::SnapshotError;
use crate::shape::Shape;
use crate::snapshot::Snapshot;
use crate::stroke::{self, StrokeStyle};
use egui::Color32;
use tracing::{debug, info, trace, warn};

/// Operations the drawing core needs from a raster backend.
pub trait Raster {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Copy a rectangle out. Pixels outside the surface read as transparent black.
    fn get_pixels(&self, x: i32, y: i32, w: u32, h: u32) -> PixelBuffer;

    /// Write a rectangle back in one step, clipped to the surface.
    fn put_pixels(&mut self, buffer: &PixelBuffer, x: i32, y: i32);

    fn stroke_path(&mut self, shape: &Shape, style: &StrokeStyle);

    fn encode_snapshot(&self) -> Snapshot;

    fn decode_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError>;
}

/// A detached rectangle of pixels. Always holds exactly `width * height` pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color32>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, color: Color32) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Wrap row-major pixels. `None` if the length does not match the size.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color32>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            warn!(
                "Rejected {}x{} pixel buffer holding {} pixels",
                width,
                height,
                pixels.len()
            );
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color32] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<Color32> {
        self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// Unmultiplied RGBA bytes, row-major, as an image API would hand them out.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| p.to_srgba_unmultiplied())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Color32>,
}

impl Canvas {
    // Create a canvas filled with the background color
    pub fn new(width: u32, height: u32, background: Color32) -> Self {
        info!(
            "Creating new canvas of size {}x{} with background color {:?}",
            width, height, background
        );

        let total_pixels = width as usize * height as usize;
        debug!("Total pixels to initialize: {}", total_pixels);

        Self {
            width,
            height,
            pixels: vec![background; total_pixels],
        }
    }

    // Check if coordinates are within canvas bounds
    fn is_valid_coordinate(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    // Convert 2d coordinates to 1d index
    fn coord_to_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    // Get the color of a pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color32> {
        if !self.is_valid_coordinate(x, y) {
            trace!("Requested pixel at invalid coordinates ({}, {})", x, y);
            return None;
        }
        Some(self.pixels[self.coord_to_index(x, y)])
    }

    // Set the color of a pixel at (x, y)
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color32) -> bool {
        if !self.is_valid_coordinate(x, y) {
            warn!("Attempted to set pixel at invalid coordinates ({}, {})", x, y);
            return false;
        }

        let index = self.coord_to_index(x, y);
        self.pixels[index] = color;
        true
    }

    // Fill entire canvas with a color
    pub fn fill(&mut self, color: Color32) {
        debug!("Filling canvas {:?}", color);
        self.pixels.fill(color);
    }

    // Clear canvas back to its background
    pub fn clear(&mut self, background: Color32) {
        info!("Clearing canvas");
        self.fill(background);
    }

    // Row-major pixel slice
    pub fn pixels(&self) -> &[Color32] {
        &self.pixels
    }

    // Get canvas dimensions
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

// Create a default canvas
impl Default for Canvas {
    fn default() -> Self {
        Canvas::new(512, 512, Color32::WHITE)
    }
}

impl Raster for Canvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn get_pixels(&self, x: i32, y: i32, w: u32, h: u32) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(w, h, Color32::TRANSPARENT);
        for row in 0..h {
            let sy = y as i64 + row as i64;
            if sy < 0 || sy >= self.height as i64 {
                continue;
            }
            for col in 0..w {
                let sx = x as i64 + col as i64;
                if sx < 0 || sx >= self.width as i64 {
                    continue;
                }
                buffer.pixels_mut()[row as usize * w as usize + col as usize] =
                    self.pixels[self.coord_to_index(sx as u32, sy as u32)];
            }
        }
        trace!("Read {}x{} pixels at ({}, {})", w, h, x, y);
        buffer
    }

    fn put_pixels(&mut self, buffer: &PixelBuffer, x: i32, y: i32) {
        for row in 0..buffer.height() {
            let dy = y as i64 + row as i64;
            if dy < 0 || dy >= self.height as i64 {
                continue;
            }
            for col in 0..buffer.width() {
                let dx = x as i64 + col as i64;
                if dx < 0 || dx >= self.width as i64 {
                    continue;
                }
                let index = self.coord_to_index(dx as u32, dy as u32);
                self.pixels[index] = buffer.pixels()[row as usize * buffer.width() as usize + col as usize];
            }
        }
        trace!(
            "Wrote {}x{} pixels at ({}, {})",
            buffer.width(),
            buffer.height(),
            x,
            y
        );
    }

    fn stroke_path(&mut self, shape: &Shape, style: &StrokeStyle) {
        let coverage = stroke::coverage(shape, style, self.width, self.height);
        let painted = stroke::apply(&mut self.pixels, &coverage, style);
        trace!("Stroked {} covering {} pixels", shape.name(), painted);
    }

    fn encode_snapshot(&self) -> Snapshot {
        Snapshot::encode(self.width, self.height, &self.pixels)
    }

    fn decode_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let buffer = snapshot.decode()?;
        if (buffer.width(), buffer.height()) != (self.width, self.height) {
            return Err(SnapshotError::DimensionMismatch {
                expected: (self.width, self.height),
                actual: (buffer.width(), buffer.height()),
            });
        }
        self.pixels = buffer.into_pixels();
        debug!("Restored {}x{} snapshot", self.width, self.height);
        Ok(())
    }
}
