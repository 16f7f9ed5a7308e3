use cgmath::{Matrix4, SquareMatrix};

use crate::gfx::{
    camera::camera_utils::CameraManager,
    picking::Aabb,
    resources::material::Material,
};

use super::{
    mesh::Mesh,
    node::{MeshNode, Node, NodeId, NodeKind},
};

/// A mesh node that is drawable this frame, with its resolved world matrix.
pub struct VisibleMesh<'a> {
    pub id: NodeId,
    pub world: Matrix4<f32>,
    pub mesh: &'a Mesh,
    pub material: &'a Material,
}

/// Main scene: camera plus a node hierarchy under a single root.
///
/// Nodes are stored in an arena and addressed by [`NodeId`]. They are never
/// removed, only moved between parents, so ids stay valid for the lifetime of
/// the scene.
pub struct Scene {
    pub camera_manager: CameraManager,
    nodes: Vec<Node>,
    root: NodeId,
}

impl Scene {
    /// Creates an empty scene with the given camera manager
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            nodes: vec![Node::new("Scene".to_string(), NodeKind::Group)],
            root: NodeId(0),
        }
    }

    /// Per-frame update: damped camera motion, then camera matrices.
    pub fn update(&mut self) {
        self.camera_manager.update();
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Children of the root, in insertion order.
    pub fn top_level(&self) -> &[NodeId] {
        self.children(self.root)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    /// Adds a detached node. It is not drawn until attached below the root.
    pub fn create_node(&mut self, name: impl Into<String>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(name.into(), kind));
        id
    }

    pub fn create_group(&mut self, name: impl Into<String>) -> NodeId {
        self.create_node(name, NodeKind::Group)
    }

    pub fn create_mesh(
        &mut self,
        name: impl Into<String>,
        mesh: Mesh,
        material: Material,
    ) -> NodeId {
        self.create_node(name, NodeKind::Mesh(MeshNode { mesh, material }))
    }

    /// Removes `child` from its parent. Returns the former parent and the
    /// child's index within it.
    pub fn detach(&mut self, child: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.node_mut(child)?.parent.take()?;
        let siblings = &mut self.nodes[parent.0].children;
        let index = siblings.iter().position(|&c| c == child)?;
        siblings.remove(index);
        Some((parent, index))
    }

    /// Appends `child` to `parent`, detaching it from any previous parent.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) {
        self.attach_at(child, parent, usize::MAX);
    }

    /// Inserts `child` into `parent` at `index` (clamped to the child count).
    ///
    /// Attaching a node below itself or one of its descendants is refused.
    pub fn attach_at(&mut self, child: NodeId, parent: NodeId, index: usize) {
        if child == self.root
            || self.node(child).is_none()
            || self.node(parent).is_none()
            || self.is_ancestor_or_self(child, parent)
        {
            log::warn!("Refusing to attach {child:?} under {parent:?}");
            return;
        }

        self.detach(child);
        let siblings = &mut self.nodes[parent.0].children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    pub fn add_to_root(&mut self, id: NodeId) {
        self.attach(id, self.root);
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.parent(node) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.node_mut(id) {
            node.visible = visible;
        }
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|node| node.visible)
    }

    /// Visible, attached below the root, and every ancestor visible.
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == self.root {
                return true;
            }
            match self.node(node_id) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        false
    }

    /// Local-to-world matrix, composed through every ancestor.
    pub fn world_matrix(&self, id: NodeId) -> Matrix4<f32> {
        let mut matrix = Matrix4::identity();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.node(node_id) else {
                break;
            };
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// `id` and everything below it, depth first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            if self.node(node_id).is_none() {
                continue;
            }
            out.push(node_id);
            stack.extend(self.children(node_id).iter().rev());
        }
        out
    }

    /// World-space bounds of every mesh in the subtree, visible or not.
    pub fn bounding_box(&self, id: NodeId) -> Option<Aabb> {
        self.descendants(id)
            .into_iter()
            .filter_map(|node_id| {
                let bounds = self.node(node_id)?.mesh()?.mesh.local_bounds()?;
                Some(bounds.transform(&self.world_matrix(node_id)))
            })
            .reduce(|a, b| a.union(&b))
    }

    /// Meshes reachable from the root through visible nodes only.
    pub fn visible_meshes(&self) -> Vec<VisibleMesh<'_>> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, Matrix4::identity())];

        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if !node.visible {
                continue;
            }

            let world = parent_world * node.transform.matrix();
            if let Some(mesh_node) = node.mesh() {
                out.push(VisibleMesh {
                    id,
                    world,
                    mesh: &mesh_node.mesh,
                    material: &mesh_node.material,
                });
            }
            stack.extend(node.children().iter().rev().map(|&child| (child, world)));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use crate::gfx::scene::{
        node::Transform,
        testing::{cube_node, test_scene},
    };
    use cgmath::Vector3;

    #[test]
    fn test_attach_detach_keeps_links_consistent() {
        let mut scene = test_scene();
        let group = scene.create_group("Femur");
        let a = cube_node(&mut scene, "a", Vector3::new(0.0, 0.0, 0.0), 0.5);
        let b = cube_node(&mut scene, "b", Vector3::new(1.0, 0.0, 0.0), 0.5);
        scene.attach(a, group);
        scene.attach(b, group);
        scene.add_to_root(group);

        assert_eq!(scene.top_level(), &[group]);
        assert_eq!(scene.children(group), &[a, b]);

        assert_eq!(scene.detach(a), Some((group, 0)));
        assert_eq!(scene.parent(a), None);
        assert_eq!(scene.children(group), &[b]);

        scene.attach_at(a, group, 0);
        assert_eq!(scene.children(group), &[a, b]);
        assert_eq!(scene.parent(a), Some(group));
    }

    #[test]
    fn test_attach_refuses_cycles() {
        let mut scene = test_scene();
        let outer = scene.create_group("outer");
        let inner = scene.create_group("inner");
        scene.attach(inner, outer);
        scene.attach(outer, inner);
        assert_eq!(scene.parent(outer), None);
        assert_eq!(scene.parent(inner), Some(outer));
    }

    #[test]
    fn test_world_matrix_and_bounds_follow_parents() {
        let mut scene = test_scene();
        let group = scene.create_group("Pelvis");
        scene.node_mut(group).unwrap().transform =
            Transform::from_translation(Vector3::new(0.0, 2.0, 0.0));
        let cube = cube_node(&mut scene, "cube", Vector3::new(1.0, 0.0, 0.0), 0.5);
        scene.attach(cube, group);
        scene.add_to_root(group);

        let bounds = scene.bounding_box(group).unwrap();
        assert_eq!(bounds.center(), Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(bounds.size(), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_visibility_is_inherited() {
        let mut scene = test_scene();
        let group = scene.create_group("Skull");
        let cube = cube_node(&mut scene, "cube", Vector3::new(0.0, 0.0, 0.0), 0.5);
        scene.attach(cube, group);
        scene.add_to_root(group);
        assert_eq!(scene.visible_meshes().len(), 1);

        scene.set_visible(group, false);
        assert!(scene.is_visible(cube));
        assert!(!scene.is_effectively_visible(cube));
        assert!(scene.visible_meshes().is_empty());

        let detached = cube_node(&mut scene, "loose", Vector3::new(0.0, 0.0, 0.0), 0.5);
        assert!(!scene.is_effectively_visible(detached));
    }
}
