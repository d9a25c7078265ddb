//! sketch-ui: the embeddable drawing surface.
//!
//! The host mounts a [`DrawingSurface`], feeds it pointer events and tool
//! selections, and calls `clear`, `undo` and `can_undo`. Undo restores are
//! deferred until the host calls `finish_restore`.

pub mod config;
pub mod editor;
pub mod logging;

pub use config::{ConfigError, SurfaceConfig};
pub use editor::{DrawingSurface, History, RestoreTicket, ToolKind, ToolSettings};
