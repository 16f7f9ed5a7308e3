//! GPU resource management
//!
//! Handles the global bind group, depth texture, and bone materials.

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightRig};
pub use material::{EmphasisCue, Material, MaterialUniform};
pub use texture_resource::TextureResource;
