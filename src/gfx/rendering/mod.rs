// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles the bone pipeline, per-node GPU buffers, and frame rendering.

pub mod gpu_mesh;
pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineError, PipelineManager};
pub use render_engine::RenderEngine;
