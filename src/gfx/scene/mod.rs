//! # Scene Management Module
//!
//! Scene graph for the viewer: a camera plus an arena of nodes with local
//! transforms, visibility flags, parent/child links, and optional meshes.
//!
//! ## Key Components
//!
//! - [`Scene`] - Node arena, hierarchy edits, world matrices, bounds
//! - [`Node`] - Name, [`Transform`], visibility, optional [`BoneTag`]
//! - [`Mesh`] - Object-space triangle geometry
//! - [`Vertex3D`] - GPU vertex layout
//!
//! ## Visibility
//!
//! A node is drawn and pickable only when it and all of its ancestors are
//! visible. [`Scene::visible_meshes`] is the single traversal both the
//! renderer and the picker use, so the two can never disagree.

pub mod mesh;
pub mod node;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use mesh::Mesh;
pub use node::{BoneTag, MeshNode, Node, NodeId, NodeKind, Transform};
pub use scene::{Scene, VisibleMesh};
pub use vertex::Vertex3D;

#[cfg(test)]
pub(crate) mod testing {
    use cgmath::Vector3;

    use super::{BoneTag, Mesh, NodeId, Scene, Transform};
    use crate::gfx::{
        camera::{CameraController, CameraManager, OrbitCamera},
        resources::material::Material,
    };

    /// Scene whose camera sits at (0, 0, 5) looking at the origin, square aspect.
    pub fn test_scene() -> Scene {
        let camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0), 1.0);
        let controller = CameraController::new(0.005, 0.1);
        Scene::new(CameraManager::new(camera, controller))
    }

    /// Axis-aligned cube of half extent `half` centred on the origin.
    pub fn cube_mesh(half: f32) -> Mesh {
        let h = half;
        #[rustfmt::skip]
        let positions = vec![
            -h, -h, -h,   h, -h, -h,   h,  h, -h,  -h,  h, -h,
            -h, -h,  h,   h, -h,  h,   h,  h,  h,  -h,  h,  h,
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1, 0, 3, 2, // back
            4, 5, 6, 4, 6, 7, // front
            0, 1, 5, 0, 5, 4, // bottom
            3, 7, 6, 3, 6, 2, // top
            0, 4, 7, 0, 7, 3, // left
            1, 2, 6, 1, 6, 5, // right
        ];
        Mesh::new(positions, Vec::new(), indices)
    }

    /// Detached cube mesh node tagged with `label`, translated to `center`.
    pub fn cube_node(scene: &mut Scene, label: &str, center: Vector3<f32>, half: f32) -> NodeId {
        let id = scene.create_mesh(label, cube_mesh(half), Material::bone());
        if let Some(node) = scene.node_mut(id) {
            node.transform = Transform::from_translation(center);
            node.bone = Some(BoneTag {
                label: label.to_string(),
                description: String::new(),
            });
        }
        id
    }
}
