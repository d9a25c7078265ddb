//! sketch-core: the raster surface behind the sketchpad widget.
//!
//! Design rules:
//! - Pixels are `egui::Color32` (premultiplied RGBA, 8 bits per channel).
//! - Everything is rasterized immediately; there is no object model.
//! - Drawing never fails. Out-of-bounds work is clipped or skipped.
//! - Snapshots are whole-canvas frames, never diffs.

pub mod canvas;
pub mod color;
pub mod error;
pub mod fill;
pub mod shape;
pub mod snapshot;
pub mod stroke;

pub use canvas::{Canvas, PixelBuffer, Raster};
pub use color::{parse_hex, same_color, to_hex};
pub use error::{ColorError, SnapshotError};
pub use fill::{flood_fill, flood_fill_hex, FillOutcome};
pub use shape::{Shape, ShapeKind};
pub use snapshot::Snapshot;
pub use stroke::{Composite, LineCap, StrokeStyle};

pub use egui::{pos2, Color32, Pos2};
