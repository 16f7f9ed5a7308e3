//! # User Interface Module
//!
//! Dear ImGui overlay for the viewer.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu, input capture
//! - [`panel`] - Header band, bone information panel, tooltip, return button
//!
//! The UI is drawn after the 3D pass into the same surface texture. While
//! ImGui wants the mouse, pointer input does not reach the 3D view and the
//! pointer counts as being off the model.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{viewer_ui, UiAction};
