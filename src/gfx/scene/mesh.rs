use cgmath::Vector3;

use crate::gfx::picking::Aabb;

use super::vertex::Vertex3D;

/// Triangle mesh in object space.
///
/// Holds CPU-side geometry only. GPU buffers are owned by the render engine,
/// keyed by the scene node that carries the mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
}

impl Mesh {
    /// Builds a mesh from flat position/normal arrays (3 floats per vertex).
    ///
    /// If `normals` does not have one entry per position, face normals are
    /// computed from the triangles instead.
    pub fn new(positions: Vec<f32>, normals: Vec<f32>, indices: Vec<u32>) -> Self {
        let normals = if normals.len() == positions.len() {
            normals
        } else {
            Self::calculate_face_normals(&positions, &indices)
        };

        let vertices = positions
            .chunks_exact(3)
            .zip(normals.chunks_exact(3))
            .map(|(p, n)| Vertex3D {
                position: [p[0], p[1], p[2]],
                normal: [n[0], n[1], n[2]],
            })
            .collect();

        Self { vertices, indices }
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Object-space bounds, `None` for a mesh without vertices.
    pub fn local_bounds(&self) -> Option<Aabb> {
        if self.vertices.is_empty() {
            return None;
        }
        let positions: Vec<[f32; 3]> = self.vertices.iter().map(|v| v.position).collect();
        Some(Aabb::from_vertices(&positions))
    }

    /// Iterates triangles as corner positions. Triangles with out-of-range
    /// indices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Vector3<f32>; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(move |tri| {
            let corner = |i: u32| {
                self.vertices
                    .get(i as usize)
                    .map(|v| Vector3::from(v.position))
            };
            Some([corner(tri[0])?, corner(tri[1])?, corner(tri[2])?])
        })
    }

    /// Averaged face normals for meshes exported without them.
    pub fn calculate_face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
        let vertex_count = positions.len() / 3;
        let mut normals = vec![0.0; vertex_count * 3];

        let position = |i: usize| {
            Vector3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2])
        };

        for triangle in indices.chunks_exact(3) {
            let [i0, i1, i2] = [
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            ];
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let face = (position(i1) - position(i0)).cross(position(i2) - position(i0));
            for &vertex in &[i0, i1, i2] {
                normals[vertex * 3] += face.x;
                normals[vertex * 3 + 1] += face.y;
                normals[vertex * 3 + 2] += face.z;
            }
        }

        for normal in normals.chunks_exact_mut(3) {
            let length = (normal[0].powi(2) + normal[1].powi(2) + normal[2].powi(2)).sqrt();
            if length > 0.0 {
                normal.iter_mut().for_each(|c| *c /= length);
            }
        }

        normals
    }
}
