// src/lib.rs
//! Felis
//!
//! Interactive 3D feline skeleton viewer built on wgpu and winit. Hover a bone
//! to name it, click it to isolate and read about it, return to the full
//! model with one button.
//!
//! The interaction logic ([`viewer`]) only touches the scene graph and camera,
//! so it runs and is tested without a window or GPU.

pub mod anatomy;
pub mod app;
pub mod config;
pub mod gfx;
pub mod prelude;
pub mod ui;
pub mod viewer;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::FelisApp;
pub use config::ViewerConfig;
