// The drawing surface widget.
// It turns pointer events into raster edits on its canvas and commits a snapshot to history
// after every finished gesture. Until it is mounted, every operation does nothing.

use egui::{Color32, Pos2};
use sketch_core::{flood_fill, Canvas, ColorError, PixelBuffer, Raster, Shape, ShapeKind};
use tracing::{debug, error, info, trace};

use super::history::{History, DEFAULT_CAPACITY};
use super::restore::{RestoreQueue, RestoreTicket};
use super::tools::{ToolKind, ToolSettings};
use crate::config::{ConfigError, SurfaceConfig};

/// Called with the new `can_undo()` value whenever history changes.
pub type UndoStateCallback = Box<dyn FnMut(bool)>;

#[derive(Debug)]
enum Gesture {
    Idle,
    Brushing {
        last: Pos2,
    },
    /// `base` is the canvas as it was when the drag started.
    Shaping {
        kind: ShapeKind,
        start: Pos2,
        base: PixelBuffer,
    },
}

pub struct DrawingSurface {
    canvas: Option<Canvas>,
    history: Option<History<sketch_core::Snapshot>>,
    restore: RestoreQueue,
    gesture: Gesture,
    settings: ToolSettings,
    background: Color32,
    history_capacity: usize,
    preview_opacity: f32,
    on_undo_state_changed: Option<UndoStateCallback>,
}

impl Default for DrawingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSurface {
    /// An unmounted surface with default settings.
    pub fn new() -> Self {
        Self {
            canvas: None,
            history: None,
            restore: RestoreQueue::new(),
            gesture: Gesture::Idle,
            settings: ToolSettings::default(),
            background: Color32::WHITE,
            history_capacity: DEFAULT_CAPACITY,
            preview_opacity: 0.7,
            on_undo_state_changed: None,
        }
    }

    /// A surface mounted at the configured size.
    pub fn from_config(config: &SurfaceConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut surface = Self::new();
        surface.background = config.background_color()?;
        surface.settings.color = config.selected_color()?;
        surface.settings.brush_size = config.brush_size;
        surface.history_capacity = config.history_capacity;
        surface.preview_opacity = config.preview_opacity;
        surface.mount(config.width, config.height);
        Ok(surface)
    }

    /// Create the canvas and seed history with its blank state.
    pub fn mount(&mut self, width: u32, height: u32) {
        info!(width, height, "Mounting drawing surface");

        let canvas = Canvas::new(width, height, self.background);
        self.history = Some(History::with_baseline(
            canvas.encode_snapshot(),
            self.history_capacity,
        ));
        self.canvas = Some(canvas);
        self.restore.cancel();
        self.gesture = Gesture::Idle;
        self.notify_undo_state();
    }

    pub fn is_mounted(&self) -> bool {
        self.canvas.is_some()
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    pub fn history(&self) -> Option<&History<sketch_core::Snapshot>> {
        self.history.as_ref()
    }

    pub fn set_on_undo_state_changed(&mut self, callback: impl FnMut(bool) + 'static) {
        self.on_undo_state_changed = Some(Box::new(callback));
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        debug!("Selected tool {}", tool);
        self.settings.tool = tool;
    }

    pub fn set_selected_color(&mut self, color: Color32) {
        self.settings.color = color;
    }

    pub fn set_selected_color_hex(&mut self, hex: &str) -> Result<(), ColorError> {
        self.settings.set_color_hex(hex)
    }

    pub fn set_brush_size(&mut self, size: f32) {
        self.settings.set_brush_size(size);
    }

    pub fn set_erasing(&mut self, is_erasing: bool) {
        self.settings.is_erasing = is_erasing;
    }

    pub fn pointer_down(&mut self, pos: Pos2) {
        if !self.is_mounted() {
            return;
        }
        // Paint over what the history cursor says is current, not a stale frame.
        self.finish_restore();

        let settings = self.settings.clone();
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };
        trace!("Pointer down at {:?} with {}", pos, settings.tool);

        match settings.tool {
            ToolKind::Brush => {
                Shape::Freehand { points: vec![pos] }.render(canvas, &settings.stroke_style());
                self.gesture = Gesture::Brushing { last: pos };
            }
            ToolKind::Fill => {
                let outcome = flood_fill(canvas, pos.x, pos.y, settings.color);
                self.gesture = Gesture::Idle;
                if outcome.changed() {
                    self.commit();
                }
            }
            ToolKind::Line | ToolKind::Rectangle | ToolKind::Circle => {
                let Some(kind) = settings.tool.shape_kind() else {
                    return;
                };
                let base = canvas.get_pixels(0, 0, canvas.width(), canvas.height());
                self.gesture = Gesture::Shaping {
                    kind,
                    start: pos,
                    base,
                };
            }
        }
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };

        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Brushing { last } => {
                Shape::Line {
                    from: *last,
                    to: pos,
                }
                .render(canvas, &self.settings.stroke_style());
                *last = pos;
            }
            Gesture::Shaping { kind, start, base } => {
                canvas.put_pixels(base, 0, 0);
                Shape::from_drag(*kind, *start, pos)
                    .render(canvas, &self.settings.preview_style(self.preview_opacity));
                trace!("Previewing {:?} to {:?}", kind, pos);
            }
        }
    }

    pub fn pointer_up(&mut self, pos: Pos2) {
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };

        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle => {}
            Gesture::Brushing { .. } => {
                debug!("Brush stroke finished");
                self.commit();
            }
            Gesture::Shaping { kind, start, base } => {
                canvas.put_pixels(&base, 0, 0);
                let shape = Shape::from_drag(kind, start, pos);
                shape.render(canvas, &self.settings.stroke_style());
                debug!("Committed {}", shape.name());
                self.commit();
            }
        }
    }

    /// Repaint the whole canvas with the background and record it.
    pub fn clear(&mut self) {
        let background = self.background;
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };
        self.restore.cancel();
        self.gesture = Gesture::Idle;
        canvas.clear(background);
        self.commit();
    }

    /// Move the history cursor back one step and schedule the restore.
    ///
    /// The cursor moves immediately; the pixels follow on the next
    /// [`finish_restore`](Self::finish_restore).
    pub fn undo(&mut self) {
        let Some(history) = self.history.as_mut() else {
            return;
        };
        let Some(snapshot) = history.undo().cloned() else {
            return;
        };
        self.gesture = Gesture::Idle;
        self.restore.schedule(snapshot);
        self.notify_undo_state();
    }

    pub fn can_undo(&self) -> bool {
        self.history.as_ref().is_some_and(|h| h.can_undo())
    }

    pub fn pending_restore(&self) -> Option<RestoreTicket> {
        self.restore.pending()
    }

    pub fn cancel_restore(&mut self) -> Option<RestoreTicket> {
        self.restore.cancel()
    }

    /// Paint the pending restore, if any, and report which one it was.
    pub fn finish_restore(&mut self) -> Option<RestoreTicket> {
        let canvas = self.canvas.as_mut()?;
        let job = self.restore.take()?;

        match canvas.decode_snapshot(&job.snapshot) {
            Ok(()) => {
                debug!(ticket = job.ticket.0, "Restore painted");
                Some(job.ticket)
            }
            Err(err) => {
                error!(ticket = job.ticket.0, error = %err, "Restore failed, canvas left as is");
                None
            }
        }
    }

    fn commit(&mut self) {
        let (Some(canvas), Some(history)) = (self.canvas.as_ref(), self.history.as_mut()) else {
            return;
        };
        history.record(canvas.encode_snapshot());
        self.notify_undo_state();
    }

    fn notify_undo_state(&mut self) {
        let can_undo = self.can_undo();
        if let Some(callback) = self.on_undo_state_changed.as_mut() {
            callback(can_undo);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn mounted(width: u32, height: u32) -> DrawingSurface {
        let mut surface = DrawingSurface::new();
        surface.mount(width, height);
        surface
    }

    #[test]
    fn test_unmounted_surface_ignores_everything() {
        let mut surface = DrawingSurface::new();
        surface.pointer_down(pos2(1.0, 1.0));
        surface.pointer_move(pos2(2.0, 2.0));
        surface.pointer_up(pos2(3.0, 3.0));
        surface.clear();
        surface.undo();

        assert!(!surface.is_mounted());
        assert!(!surface.can_undo());
        assert!(surface.canvas().is_none());
        assert_eq!(surface.finish_restore(), None);
    }

    #[test]
    fn test_brush_stroke_commits_once() {
        let mut surface = mounted(20, 20);
        surface.pointer_down(pos2(5.0, 5.0));
        surface.pointer_move(pos2(10.0, 5.0));
        surface.pointer_move(pos2(15.0, 5.0));

        assert!(!surface.can_undo());
        surface.pointer_up(pos2(15.0, 5.0));

        assert!(surface.can_undo());
        assert_eq!(surface.history().map(|h| h.len()), Some(2));
        let canvas = surface.canvas().unwrap();
        assert_eq!(canvas.get_pixel(12, 4), Some(Color32::BLACK));
    }

    #[test]
    fn test_eraser_clears_pixels() {
        let mut surface = mounted(10, 10);
        surface.set_erasing(true);
        surface.pointer_down(pos2(5.0, 5.0));
        surface.pointer_up(pos2(5.0, 5.0));

        assert_eq!(
            surface.canvas().unwrap().get_pixel(5, 5),
            Some(Color32::TRANSPARENT)
        );
    }

    #[test]
    fn test_fill_on_same_color_records_nothing() {
        let mut surface = mounted(8, 8);
        surface.set_tool(ToolKind::Fill);
        surface.set_selected_color(Color32::WHITE);
        surface.pointer_down(pos2(3.0, 3.0));
        surface.pointer_up(pos2(3.0, 3.0));

        assert!(!surface.can_undo());
    }

    #[test]
    fn test_clear_is_undoable() {
        let mut surface = mounted(8, 8);
        surface.set_tool(ToolKind::Fill);
        surface.set_selected_color(Color32::RED);
        surface.pointer_down(pos2(0.0, 0.0));
        surface.clear();

        assert_eq!(surface.history().map(|h| h.len()), Some(3));
        assert_eq!(
            surface.canvas().unwrap().get_pixel(0, 0),
            Some(Color32::WHITE)
        );

        surface.undo();
        surface.finish_restore();
        assert_eq!(surface.canvas().unwrap().get_pixel(0, 0), Some(Color32::RED));
    }

    #[test]
    fn test_cancelled_restore_is_never_painted() {
        let mut surface = mounted(6, 6);
        surface.set_tool(ToolKind::Fill);
        surface.set_selected_color(Color32::RED);
        surface.pointer_down(pos2(0.0, 0.0));
        surface.undo();

        let pending = surface.pending_restore();
        assert!(pending.is_some());
        assert_eq!(surface.cancel_restore(), pending);
        assert_eq!(surface.finish_restore(), None);

        // The cursor already moved; the pixels stay as they were.
        assert_eq!(surface.history().and_then(|h| h.cursor()), Some(0));
        assert_eq!(surface.canvas().unwrap().get_pixel(0, 0), Some(Color32::RED));
    }
}
