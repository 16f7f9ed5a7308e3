//! # Object Picking System
//!
//! Turns a pointer position into a world-space ray and intersects it with the
//! meshes currently visible in the scene.
//!
//! ## How it works
//!
//! 1. **Pointer to NDC**: map the pointer into normalized device coordinates of
//!    the canvas rectangle, recomputed by the caller for every event
//! 2. **NDC to Ray**: unproject the near and far points through the camera
//! 3. **Ray-Mesh Intersection**: per visible mesh, move the ray into object
//!    space, reject by bounding box, then test triangles
//! 4. **Ordering**: hits are returned nearest first
//!
//! Invisible nodes, and everything below them, are never tested. Isolation
//! hides the rest of the skeleton and relies on that.
//!
//! ## Usage
//!
//! ```no_run
//! use felis::gfx::picking::{pick_at_pointer, CanvasRect};
//! # fn demo(scene: &felis::gfx::scene::Scene) {
//! let canvas = CanvasRect::new(0.0, 120.0, 800.0, 680.0);
//! if let Some(hit) = pick_at_pointer((400.0, 400.0), canvas, scene).first() {
//!     println!("nearest node: {:?} at {:.2}", hit.node, hit.distance);
//! }
//! # }
//! ```

use cgmath::{ElementWise, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, Zero};

use crate::gfx::{
    camera::orbit_camera::OrbitCamera,
    scene::{NodeId, Scene},
};

/// Triangles closer to parallel than this are treated as misses.
const TRIANGLE_EPSILON: f32 = 1e-7;

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized when built with [`Ray::new`])
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at parameter t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Same ray expressed in the space `matrix` maps into. The direction is
    /// not renormalized, so ray parameters stay comparable between spaces.
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Self {
        Self {
            origin: (matrix * self.origin.extend(1.0)).truncate(),
            direction: (matrix * self.direction.extend(0.0)).truncate(),
        }
    }

    /// Möller–Trumbore ray/triangle test, both faces. Returns the ray parameter.
    pub fn intersect_triangle(&self, triangle: &[Vector3<f32>; 3]) -> Option<f32> {
        let [a, b, c] = *triangle;
        let edge1 = b - a;
        let edge2 = c - a;

        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < TRIANGLE_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        (t >= 0.0).then_some(t)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Bounds of a point set; an empty set gives a degenerate box at the origin.
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        let Some(first) = vertices.first() else {
            return Self::new(Vector3::zero(), Vector3::zero());
        };

        let first = Vector3::from(*first);
        vertices
            .iter()
            .skip(1)
            .fold(Self::new(first, first), |bounds, v| {
                bounds.expanded_to(Vector3::from(*v))
            })
    }

    fn expanded_to(self, point: Vector3<f32>) -> Self {
        Self {
            min: Vector3::new(
                self.min.x.min(point.x),
                self.min.y.min(point.y),
                self.min.z.min(point.z),
            ),
            max: Vector3::new(
                self.max.x.max(point.x),
                self.max.y.max(point.y),
                self.max.z.max(point.z),
            ),
        }
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Aabb) -> Self {
        self.expanded_to(other.min).expanded_to(other.max)
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Length of the box diagonal, used as the characteristic size when framing.
    pub fn diagonal(&self) -> f32 {
        self.size().magnitude()
    }

    /// Slab test. Returns the entry parameter (or exit, when the origin is inside).
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t_near = t_min.x.min(t_max.x)
            .max(t_min.y.min(t_max.y))
            .max(t_min.z.min(t_max.z));
        let t_far = t_min.x.max(t_max.x)
            .min(t_min.y.max(t_max.y))
            .min(t_min.z.max(t_max.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Bounds of the eight transformed corners.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners: Vec<[f32; 3]> = (0..8)
            .map(|i| {
                let corner = Vector4::new(
                    if i & 1 == 0 { self.min.x } else { self.max.x },
                    if i & 2 == 0 { self.min.y } else { self.max.y },
                    if i & 4 == 0 { self.min.z } else { self.max.z },
                    1.0,
                );
                let p = matrix * corner;
                [p.x / p.w, p.y / p.w, p.z / p.w]
            })
            .collect();

        Self::from_vertices(&corners)
    }
}

/// On-screen rectangle of the 3D canvas, in window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left
            && x <= self.left + self.width
            && y >= self.top
            && y <= self.top + self.height
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Pointer position to normalized device coordinates (x right, y up).
    /// `None` for a collapsed canvas.
    pub fn to_ndc(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some((
            ((x - self.left) / self.width) * 2.0 - 1.0,
            -((y - self.top) / self.height) * 2.0 + 1.0,
        ))
    }
}

/// One intersected mesh node
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    pub node: NodeId,
    /// World-space distance from the ray origin
    pub distance: f32,
    /// World-space intersection point
    pub point: Vector3<f32>,
}

/// Builds the world-space ray through `ndc` for `camera`.
pub fn screen_to_ray(ndc: (f32, f32), camera: &OrbitCamera) -> Ray {
    let (ndc_x, ndc_y) = ndc;

    let view_proj = camera.projection_matrix() * camera.view_matrix();
    let inv_view_proj = view_proj.invert().unwrap_or(Matrix4::identity());

    let unproject = |z: f32| {
        let p = inv_view_proj * Vector4::new(ndc_x, ndc_y, z, 1.0);
        Vector3::new(p.x / p.w, p.y / p.w, p.z / p.w)
    };
    let near = unproject(-1.0);
    let far = unproject(1.0);

    Ray::new(near, far - near)
}

/// Intersects `ray` with every visible mesh in `scene`, nearest hit first.
pub fn intersect_visible(ray: &Ray, scene: &Scene) -> Vec<PickHit> {
    let mut hits = Vec::new();

    for visible in scene.visible_meshes() {
        let Some(world_to_local) = visible.world.invert() else {
            continue;
        };
        let Some(bounds) = visible.mesh.local_bounds() else {
            continue;
        };

        let local_ray = ray.transformed(&world_to_local);
        if bounds.intersect_ray(&local_ray).is_none() {
            continue;
        }

        let nearest = visible
            .mesh
            .triangles()
            .filter_map(|triangle| local_ray.intersect_triangle(&triangle))
            .min_by(|a, b| a.total_cmp(b));

        if let Some(t) = nearest {
            let point = (visible.world * local_ray.point_at(t).extend(1.0)).truncate();
            hits.push(PickHit {
                node: visible.id,
                distance: (point - ray.origin).magnitude(),
                point,
            });
        }
    }

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Picks at a pointer position. A pointer outside `canvas` hits nothing.
pub fn pick_at_pointer(pointer: (f32, f32), canvas: CanvasRect, scene: &Scene) -> Vec<PickHit> {
    let (x, y) = pointer;
    if !canvas.contains(x, y) {
        return Vec::new();
    }
    match canvas.to_ndc(x, y) {
        Some(ndc) => {
            let ray = screen_to_ray(ndc, &scene.camera_manager.camera);
            intersect_visible(&ray, scene)
        }
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::testing::{cube_node, test_scene};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_aabb_creation() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]];
        let aabb = Aabb::from_vertices(&vertices);

        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(aabb.center(), Vector3::zero());
    }

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(aabb.intersect_ray(&ray), Some(4.0));

        let ray_miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());
    }

    #[test]
    fn test_ray_triangle_intersection() {
        let triangle = [
            Vector3::new(-1.0, -1.0, 0.0),
            Vector3::new(1.0, -1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ];
        let front = Ray::new(Vector3::new(0.0, 0.0, 3.0), Vector3::new(0.0, 0.0, -1.0));
        assert!((front.intersect_triangle(&triangle).unwrap() - 3.0).abs() < 1e-6);

        let behind = Ray::new(Vector3::new(0.0, 0.0, 3.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(behind.intersect_triangle(&triangle).is_none());
    }

    #[test]
    fn test_canvas_ndc_mapping() {
        let canvas = CanvasRect::new(0.0, 120.0, 800.0, 600.0);
        assert_eq!(canvas.to_ndc(0.0, 120.0), Some((-1.0, 1.0)));
        assert_eq!(canvas.to_ndc(400.0, 420.0), Some((0.0, 0.0)));
        assert_eq!(canvas.to_ndc(800.0, 720.0), Some((1.0, -1.0)));
        assert!(!canvas.contains(900.0, 300.0));
        assert_eq!(CanvasRect::new(0.0, 0.0, 0.0, 10.0).to_ndc(0.0, 0.0), None);
    }

    #[test]
    fn test_center_ray_hits_nearest_first() {
        let mut scene = test_scene();
        let near = cube_node(&mut scene, "Near", Vector3::new(0.0, 0.0, 1.0), 0.25);
        let far = cube_node(&mut scene, "Far", Vector3::new(0.0, 0.0, -1.0), 0.25);
        scene.add_to_root(far);
        scene.add_to_root(near);

        let ray = screen_to_ray((0.0, 0.0), &scene.camera_manager.camera);
        let hits = intersect_visible(&ray, &scene);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].node, near);
        assert_eq!(hits[1].node, far);
        assert!(hits[0].distance < hits[1].distance);
        assert!((hits[0].point.z - 1.25).abs() < 1e-3);
    }

    #[test]
    fn test_pointer_outside_canvas_hits_nothing() {
        let mut scene = test_scene();
        let cube = cube_node(&mut scene, "Cube", Vector3::zero(), 0.5);
        scene.add_to_root(cube);

        let canvas = CanvasRect::new(0.0, 0.0, 800.0, 800.0);
        assert!(!pick_at_pointer((400.0, 400.0), canvas, &scene).is_empty());
        assert!(pick_at_pointer((1000.0, 400.0), canvas, &scene).is_empty());
    }

    #[test]
    fn test_hidden_nodes_are_never_hit() {
        let mut scene = test_scene();
        let mut hidden = Vec::new();
        for i in 0..5 {
            let x = i as f32 - 2.0;
            let shown = cube_node(&mut scene, "Shown", Vector3::new(x, 0.5, 0.0), 0.4);
            let ghost = cube_node(&mut scene, "Ghost", Vector3::new(x, -0.5, 0.5), 0.4);
            scene.add_to_root(shown);
            scene.add_to_root(ghost);
            scene.set_visible(ghost, false);
            hidden.push(ghost);
        }

        // A hidden group hides its visible children too.
        let group = scene.create_group("Hidden Group");
        let child = cube_node(&mut scene, "Child", Vector3::new(0.0, 0.0, 1.5), 0.6);
        scene.attach(child, group);
        scene.add_to_root(group);
        scene.set_visible(group, false);
        hidden.push(child);

        let canvas = CanvasRect::new(0.0, 0.0, 640.0, 480.0);
        let mut rng = StdRng::seed_from_u64(7);
        let mut total_hits = 0;
        for _ in 0..2000 {
            let pointer = (rng.random_range(0.0..640.0), rng.random_range(0.0..480.0));
            let hits = pick_at_pointer(pointer, canvas, &scene);
            total_hits += hits.len();
            assert!(hits.iter().all(|hit| !hidden.contains(&hit.node)));
        }
        assert!(total_hits > 0, "sampling should hit the visible cubes");
    }
}
