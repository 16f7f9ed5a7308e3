//! # Felis Prelude
//!
//! Commonly used types in one import:
//!
//! ```no_run
//! use felis::prelude::*;
//!
//! let app = FelisApp::new(ViewerConfig::default()).unwrap();
//! app.run().unwrap();
//! ```

// Core application types
pub use crate::app::FelisApp;
pub use crate::config::{ViewerConfig, ViewportLayout};

// Scene and interaction
pub use crate::anatomy::{ManifestEntry, ModelRegistry};
pub use crate::gfx::camera::CameraManager;
pub use crate::gfx::scene::{NodeId, Scene};
pub use crate::viewer::{InfoPanel, ViewerController, ViewerState};

// Common external dependencies
pub use cgmath::{InnerSpace, Vector3};
