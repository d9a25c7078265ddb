//! Drawable shapes.
//!
//! Every tool that strokes a path produces a [`Shape`]. The same value renders
//! the translucent preview while dragging and the final committed stroke.

use crate::canvas::Raster;
use crate::stroke::StrokeStyle;
use egui::Pos2;

/// Shapes that are built from a press-drag-release gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Line,
    Rectangle,
    Circle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line { from: Pos2, to: Pos2 },
    /// Axis-aligned; the corners are opposite each other.
    Rectangle { corner_a: Pos2, corner_b: Pos2 },
    Circle { center: Pos2, radius: f32 },
    /// Round-capped, round-joined polyline.
    Freehand { points: Vec<Pos2> },
}

impl Shape {
    /// Build a shape from where the drag started and where it is now.
    pub fn from_drag(kind: ShapeKind, start: Pos2, end: Pos2) -> Self {
        match kind {
            ShapeKind::Line => Shape::Line {
                from: start,
                to: end,
            },
            ShapeKind::Rectangle => Shape::Rectangle {
                corner_a: start,
                corner_b: end,
            },
            ShapeKind::Circle => Shape::Circle {
                center: start,
                radius: start.distance(end),
            },
        }
    }

    pub fn render<R: Raster + ?Sized>(&self, raster: &mut R, style: &StrokeStyle) {
        raster.stroke_path(self, style);
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Line { .. } => "line",
            Shape::Rectangle { .. } => "rectangle",
            Shape::Circle { .. } => "circle",
            Shape::Freehand { .. } => "freehand",
        }
    }
}
