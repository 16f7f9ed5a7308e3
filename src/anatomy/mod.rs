//! # Anatomy Module
//!
//! What the viewer knows about bones, independent of how they are drawn.
//!
//! - [`descriptors`] - Static label to description table
//! - [`manifest`] - Which assets to load, under which labels
//! - [`registry`] - Loaded model roots by label, last writer wins
//! - [`loader`] - Per-asset async loading and scene insertion

pub mod descriptors;
pub mod loader;
pub mod manifest;
pub mod registry;

pub use loader::{apply_completion, AssetLoader, LoadCompletion, LoadError, LoadPipeline, ObjLoader};
pub use manifest::{default_manifest, ManifestEntry};
pub use registry::ModelRegistry;
