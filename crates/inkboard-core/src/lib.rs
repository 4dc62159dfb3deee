//! Core data structures and logic for the Inkboard whiteboard.
//!
//! The scene store holds shape records in z-order; tools turn filtered
//! pointer events into scene mutations; the history log keeps
//! whole-scene snapshots for undo/redo; the editor ties it together.

pub mod camera;
pub mod editor;
pub mod history;
pub mod input;
pub mod scene;
pub mod shapes;
pub mod throttle;
pub mod tools;

pub use camera::Camera;
pub use editor::{ContextMenu, Editor};
pub use history::HistoryLog;
pub use input::{Modifiers, PointerButton, PointerInput, PointerType};
pub use scene::Scene;
pub use shapes::{Binding, SerializableColor, Shape, ShapeId, ShapeStyle};
pub use tools::ToolKind;
