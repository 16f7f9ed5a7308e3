//! # Graphics Module
//!
//! Camera, scene graph, picking, and the wgpu renderer.
//!
//! - **Camera System** ([`camera`]) - Damped orbit camera
//! - **Scene Management** ([`scene`]) - Node arena with transforms and visibility
//! - **Picking** ([`picking`]) - Pointer rays against visible meshes
//! - **Rendering Pipeline** ([`rendering`]) - Lit bone pipeline drawn into the canvas
//! - **Resource Management** ([`resources`]) - Materials, lights, depth buffer
//!
//! [`Scene::visible_meshes`](scene::Scene::visible_meshes) is shared by the
//! renderer and the picker, so what is drawn is exactly what can be hit.

pub mod camera;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
