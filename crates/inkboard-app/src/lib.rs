//! Inkboard Application
//!
//! The application shell providing windowing, input translation, and
//! integration of the editor core with the Vello renderer and egui chrome.

mod app;
mod ui;

pub use app::{App, AppConfig};
pub use ui::{render_ui, UiAction, UiState};
