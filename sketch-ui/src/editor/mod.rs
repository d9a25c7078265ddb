// Editor module for the sketchpad widget.

pub mod history;
pub mod restore;
pub mod surface;
pub mod tools;

pub use history::History;
pub use restore::{RestoreJob, RestoreQueue, RestoreTicket};
pub use surface::{DrawingSurface, UndoStateCallback};
pub use tools::{ToolKind, ToolSettings, UnknownTool};
