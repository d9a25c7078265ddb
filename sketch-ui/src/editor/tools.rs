// Drawing tools for the sketchpad editor.

use egui::Color32;
use serde::{Deserialize, Serialize};
use sketch_core::{parse_hex, ColorError, ShapeKind, StrokeStyle};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Brush,
    Line,
    Rectangle,
    Circle,
    Fill,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Brush,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Fill,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Brush => "brush",
            ToolKind::Line => "line",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Fill => "fill",
        }
    }

    /// The drag shape this tool previews, if it is a shape tool.
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Brush | ToolKind::Fill => None,
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool {0:?}")]
pub struct UnknownTool(pub String);

impl FromStr for ToolKind {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|tool| tool.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

/// What the host has currently selected.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    pub tool: ToolKind,
    pub color: Color32,
    pub brush_size: f32,
    pub is_erasing: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: ToolKind::Brush,
            color: Color32::BLACK,
            brush_size: 5.0,
            is_erasing: false,
        }
    }
}

impl ToolSettings {
    pub fn set_color_hex(&mut self, hex: &str) -> Result<(), ColorError> {
        self.color = parse_hex(hex)?;
        debug!("Selected color {:?}", self.color);
        Ok(())
    }

    pub fn set_brush_size(&mut self, size: f32) {
        if !size.is_finite() || size <= 0.0 {
            warn!("Ignoring brush size {}", size);
            return;
        }
        self.brush_size = size;
    }

    /// Style for strokes at full strength: the brush, and shapes once committed.
    pub fn stroke_style(&self) -> StrokeStyle {
        let style = StrokeStyle::new(self.color, self.brush_size);
        if self.is_erasing {
            style.erasing()
        } else {
            style
        }
    }

    /// Style for the live shape preview.
    pub fn preview_style(&self, opacity: f32) -> StrokeStyle {
        self.stroke_style().with_opacity(opacity)
    }
}
