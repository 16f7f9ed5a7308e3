//! # Viewer Module
//!
//! Interaction logic on top of the scene: hover highlighting, isolating a bone
//! on click, and returning to the full model.
//!
//! All of it runs on the event loop thread against an explicit
//! [`ViewerState`] owned by the [`ViewerController`].

pub mod controller;
pub mod highlight;
pub mod isolation;
pub mod state;

pub use controller::{ClickGesture, ViewerController};
pub use state::{InfoPanel, IsolationRecord, Tooltip, ViewerState};
