use cgmath::{InnerSpace, Matrix3, Matrix4, One, Quaternion, SquareMatrix, Vector3};

use crate::gfx::resources::material::Material;

use super::mesh::Mesh;

/// Stable handle to a node in a [`Scene`](super::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Local translation, rotation and scale, composed as T * R * S.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn from_translation(translation: Vector3<f32>) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    pub fn with_rotation(mut self, rotation: Quaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vector3<f32>) -> Self {
        self.scale = scale;
        self
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Decomposes an affine matrix without shear. A zero scale axis leaves the
    /// rotation at identity.
    pub fn from_matrix(matrix: &Matrix4<f32>) -> Self {
        let translation = matrix.w.truncate();
        let mut axes = [matrix.x.truncate(), matrix.y.truncate(), matrix.z.truncate()];
        let mut scale = Vector3::new(axes[0].magnitude(), axes[1].magnitude(), axes[2].magnitude());

        if scale.x == 0.0 || scale.y == 0.0 || scale.z == 0.0 {
            return Self {
                translation,
                rotation: Quaternion::one(),
                scale,
            };
        }

        axes[0] /= scale.x;
        axes[1] /= scale.y;
        axes[2] /= scale.z;
        let mut basis = Matrix3::from_cols(axes[0], axes[1], axes[2]);
        if basis.determinant() < 0.0 {
            scale.x = -scale.x;
            basis.x = -basis.x;
        }

        Self {
            translation,
            rotation: Quaternion::from(basis).normalize(),
            scale,
        }
    }
}

/// Per-mesh descriptive data attached when a bone asset is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoneTag {
    pub label: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct MeshNode {
    pub mesh: Mesh,
    pub material: Material,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Group,
    Mesh(MeshNode),
}

/// Scene graph entry.
///
/// Parent and child links are maintained by the owning scene; everything else
/// is free to edit.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub visible: bool,
    pub bone: Option<BoneTag>,
    pub(super) kind: NodeKind,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
}

impl Node {
    pub(super) fn new(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            transform: Transform::identity(),
            visible: true,
            bone: None,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn mesh(&self) -> Option<&MeshNode> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            NodeKind::Group => None,
        }
    }

    pub fn material_mut(&mut self) -> Option<&mut Material> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(&mut mesh.material),
            NodeKind::Group => None,
        }
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh(_))
    }

    /// Label shown to the user: the bone label when tagged, else the node name.
    pub fn display_label(&self) -> &str {
        self.bone
            .as_ref()
            .map(|tag| tag.label.as_str())
            .unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Rotation3};

    fn assert_matrix_close(a: Matrix4<f32>, b: Matrix4<f32>) {
        let a: &[f32; 16] = a.as_ref();
        let b: &[f32; 16] = b.as_ref();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-4, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_decompose_recovers_matrix() {
        let transform = Transform::from_translation(Vector3::new(1.0, -2.0, 3.0))
            .with_rotation(Quaternion::from_angle_y(Deg(30.0)))
            .with_scale(Vector3::new(2.0, 0.5, 1.5));

        let recovered = Transform::from_matrix(&transform.matrix());
        assert_matrix_close(recovered.matrix(), transform.matrix());
    }

    #[test]
    fn test_decompose_handles_mirroring() {
        let transform = Transform::identity().with_scale(Vector3::new(-1.0, 1.0, 1.0));
        let recovered = Transform::from_matrix(&transform.matrix());
        assert_matrix_close(recovered.matrix(), transform.matrix());
        assert!(recovered.matrix().determinant() < 0.0);
    }
}
