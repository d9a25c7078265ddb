use std::cell::RefCell;
use std::rc::Rc;

use sketch_core::{pos2, Canvas, Color32, Raster, Shape, ShapeKind, Snapshot};
use sketch_ui::{DrawingSurface, History, SurfaceConfig, ToolKind};

fn small_surface() -> DrawingSurface {
    let _ = sketch_ui::logging::init_with_filter("warn");
    let config = SurfaceConfig {
        width: 32,
        height: 24,
        ..Default::default()
    };
    DrawingSurface::from_config(&config).unwrap()
}

fn pixels(surface: &DrawingSurface) -> Vec<Color32> {
    surface.canvas().unwrap().pixels().to_vec()
}

#[test]
fn history_keeps_most_recent_twenty() {
    let mut history = History::with_baseline(0u32, 20);
    for i in 1..=25 {
        history.record(i);
    }

    assert_eq!(history.len(), 20);
    assert_eq!(history.iter().copied().collect::<Vec<_>>(), (6..=25).collect::<Vec<_>>());

    let mut undos = 0;
    while history.undo().is_some() {
        undos += 1;
    }
    assert_eq!(undos, 19);
    assert_eq!(history.current(), Some(&6));
    assert!(!history.can_undo());
    assert_eq!(history.undo(), None);
}

#[test]
fn can_undo_tracks_first_record() {
    let mut surface = small_surface();
    assert!(!surface.can_undo());

    surface.set_tool(ToolKind::Fill);
    surface.set_selected_color(Color32::RED);
    surface.pointer_down(pos2(1.0, 1.0));
    surface.pointer_up(pos2(1.0, 1.0));

    assert!(surface.can_undo());
}

#[test]
fn record_after_undo_discards_redo_branch() {
    let mut surface = small_surface();
    surface.set_tool(ToolKind::Fill);

    surface.set_selected_color(Color32::RED);
    surface.pointer_down(pos2(0.0, 0.0));
    surface.set_selected_color(Color32::GREEN);
    surface.pointer_down(pos2(0.0, 0.0));
    let green = surface.history().unwrap().current().cloned().unwrap();

    surface.undo();
    surface.finish_restore();
    surface.set_selected_color(Color32::BLUE);
    surface.pointer_down(pos2(0.0, 0.0));

    let history = surface.history().unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history.cursor(), Some(2));
    assert!(history.iter().all(|entry| *entry != green));
    assert_eq!(
        surface.canvas().unwrap().get_pixel(5, 5),
        Some(Color32::BLUE)
    );
}

#[test]
fn shape_preview_leaves_committed_pixels_alone() {
    let mut surface = small_surface();
    surface.set_tool(ToolKind::Rectangle);
    surface.set_selected_color(Color32::BLUE);
    surface.set_brush_size(2.0);

    let before = surface.canvas().unwrap().clone();
    surface.pointer_down(pos2(4.0, 4.0));
    surface.pointer_move(pos2(20.0, 12.0));
    surface.pointer_move(pos2(10.0, 18.0));

    // Mid-gesture: the pre-gesture frame plus only the latest preview.
    let mut expected = before.clone();
    Shape::from_drag(ShapeKind::Rectangle, pos2(4.0, 4.0), pos2(10.0, 18.0)).render(
        &mut expected,
        &surface.settings().preview_style(0.7),
    );
    assert_eq!(pixels(&surface), expected.pixels());
    assert!(!surface.can_undo());

    surface.pointer_up(pos2(10.0, 18.0));

    let mut committed = before;
    Shape::from_drag(ShapeKind::Rectangle, pos2(4.0, 4.0), pos2(10.0, 18.0))
        .render(&mut committed, &surface.settings().stroke_style());
    assert_eq!(pixels(&surface), committed.pixels());
    assert!(surface.can_undo());
    assert_eq!(
        surface.history().unwrap().current(),
        Some(&committed.encode_snapshot())
    );
}

#[test]
fn undo_moves_cursor_before_pixels() {
    let mut surface = small_surface();
    surface.set_tool(ToolKind::Fill);
    surface.set_selected_color(Color32::RED);
    surface.pointer_down(pos2(3.0, 3.0));

    surface.undo();

    assert_eq!(surface.history().unwrap().cursor(), Some(0));
    assert!(surface.pending_restore().is_some());
    assert_eq!(
        surface.canvas().unwrap().get_pixel(3, 3),
        Some(Color32::RED)
    );

    assert!(surface.finish_restore().is_some());
    assert_eq!(
        surface.canvas().unwrap().get_pixel(3, 3),
        Some(Color32::WHITE)
    );
}

#[test]
fn rapid_undos_supersede_each_other() {
    let mut surface = small_surface();
    surface.set_tool(ToolKind::Fill);
    for color in [Color32::RED, Color32::GREEN, Color32::BLUE] {
        surface.set_selected_color(color);
        surface.pointer_down(pos2(0.0, 0.0));
    }

    surface.undo();
    let first = surface.pending_restore().unwrap();
    surface.undo();
    let second = surface.pending_restore().unwrap();
    assert_ne!(first, second);

    assert_eq!(surface.finish_restore(), Some(second));
    assert_eq!(surface.finish_restore(), None);
    assert_eq!(
        surface.canvas().unwrap().get_pixel(0, 0),
        Some(Color32::RED)
    );
}

#[test]
fn new_gesture_finishes_pending_restore_first() {
    let mut surface = small_surface();
    surface.set_tool(ToolKind::Fill);
    surface.set_selected_color(Color32::RED);
    surface.pointer_down(pos2(0.0, 0.0));
    surface.undo();

    surface.set_tool(ToolKind::Brush);
    surface.set_selected_color(Color32::BLACK);
    surface.pointer_down(pos2(16.0, 12.0));
    surface.pointer_up(pos2(16.0, 12.0));

    assert!(surface.pending_restore().is_none());
    let canvas = surface.canvas().unwrap();
    assert_eq!(canvas.get_pixel(0, 0), Some(Color32::WHITE));
    assert_eq!(canvas.get_pixel(16, 12), Some(Color32::BLACK));
}

#[test]
fn clear_cancels_pending_restore() {
    let mut surface = small_surface();
    surface.set_tool(ToolKind::Fill);
    surface.set_selected_color(Color32::RED);
    surface.pointer_down(pos2(0.0, 0.0));
    surface.set_selected_color(Color32::GREEN);
    surface.pointer_down(pos2(0.0, 0.0));
    surface.undo();

    surface.clear();

    assert!(surface.pending_restore().is_none());
    assert!(pixels(&surface).iter().all(|p| *p == Color32::WHITE));
    assert_eq!(surface.history().unwrap().len(), 3);
}

#[test]
fn undo_state_callback_reports_changes() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut surface = DrawingSurface::new();
    {
        let seen = Rc::clone(&seen);
        surface.set_on_undo_state_changed(move |can_undo| seen.borrow_mut().push(can_undo));
    }

    surface.mount(8, 8);
    surface.set_tool(ToolKind::Fill);
    surface.set_selected_color(Color32::RED);
    surface.pointer_down(pos2(0.0, 0.0));
    surface.undo();
    surface.undo();

    assert_eq!(*seen.borrow(), vec![false, true, false]);
}

#[test]
fn corrupt_restore_is_logged_and_ignored() {
    let mut canvas = Canvas::new(4, 4, Color32::RED);
    let bad = Snapshot::from_bytes(vec![1, 2, 3]);
    assert!(canvas.decode_snapshot(&bad).is_err());
    assert!(canvas.pixels().iter().all(|p| *p == Color32::RED));
}

#[test]
fn config_file_builds_surface() {
    let path = std::env::temp_dir().join(format!("sketchpad_config_{}.json", std::process::id()));
    std::fs::write(
        &path,
        r##"{"width": 16, "height": 9, "background": "#000000", "history_capacity": 3}"##,
    )
    .unwrap();

    let config = SurfaceConfig::load(&path).unwrap();
    let mut surface = DrawingSurface::from_config(&config).unwrap();
    std::fs::remove_file(&path).unwrap();

    let canvas = surface.canvas().unwrap();
    assert_eq!((canvas.width(), canvas.height()), (16, 9));
    assert_eq!(canvas.get_pixel(0, 0), Some(Color32::BLACK));

    surface.set_tool(ToolKind::Fill);
    for color in [Color32::RED, Color32::GREEN, Color32::BLUE, Color32::YELLOW] {
        surface.set_selected_color(color);
        surface.pointer_down(pos2(0.0, 0.0));
    }
    assert_eq!(surface.history().unwrap().len(), 3);
}
