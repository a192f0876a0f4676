//! # Picking
//!
//! Ray casting from cursor positions into the scene. The gizmo uses it to
//! find the handle under the cursor: the overlay layer is drawn with a camera
//! that sits at the origin with identity orientation, so overlay space is
//! the main camera's view space and a view-space ray is all that is needed.
//!
//! ## How it works
//!
//! 1. **Cursor to Ray**: Unproject the cursor through the inverse projection
//! 2. **Bounds Prefilter**: Skip meshes whose world box the ray misses
//! 3. **Ray-Triangle Intersection**: Test the ray in each mesh's own frame
//! 4. **Selection**: Return the closest hit

use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4};

use crate::error::SceneResult;
use crate::gfx::camera::ViewportCamera;
use crate::gfx::geometry::GeometryData;
use crate::gfx::scene::{NodeId, SceneAccess};

const TRIANGLE_EPSILON: f32 = 1e-7;

/// Half-line with a unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    /// `direction` is normalized on construction.
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Moves the ray into another frame. Distances along the result are
    /// measured in that frame.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let origin = matrix * self.origin.extend(1.0);
        let direction = matrix * self.direction.extend(0.0);
        Self::new(origin.truncate() / origin.w, direction.truncate())
    }
}

/// Axis-aligned box, used as the pick prefilter and for pivot placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl AABB {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Tightest box around `points`; `None` when there are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vector3<f32>>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |mut aabb, p| {
            aabb.expand(p);
            aabb
        }))
    }

    pub fn from_vertices(vertices: &[[f32; 3]]) -> Option<Self> {
        Self::from_points(vertices.iter().copied().map(Vector3::from))
    }

    pub fn expand(&mut self, point: Vector3<f32>) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(point[axis]);
            self.max[axis] = self.max[axis].max(point[axis]);
        }
    }

    pub fn union(&self, other: &AABB) -> Self {
        let mut merged = *self;
        merged.expand(other.min);
        merged.expand(other.max);
        merged
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Slab test. Returns the entry distance, or the exit distance when the
    /// origin is inside the box.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let inv = 1.0 / ray.direction[axis];
            let t0 = (self.min[axis] - ray.origin[axis]) * inv;
            let t1 = (self.max[axis] - ray.origin[axis]) * inv;
            t_near = t_near.max(t0.min(t1));
            t_far = t_far.min(t0.max(t1));
        }

        if t_near > t_far || t_far < 0.0 {
            return None;
        }
        Some(if t_near >= 0.0 { t_near } else { t_far })
    }

    /// Box around the eight transformed corners.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = (0..8u8).map(|bits| {
            let pick = |axis: u8| {
                if bits & (1 << axis) == 0 {
                    self.min[axis as usize]
                } else {
                    self.max[axis as usize]
                }
            };
            let p = matrix * Vector4::new(pick(0), pick(1), pick(2), 1.0);
            p.truncate() / p.w
        });
        Self::from_points(corners).unwrap_or(*self)
    }
}

/// Result of a node picking operation
#[derive(Debug, Clone, Copy)]
pub struct PickResult {
    pub node: NodeId,
    /// Distance from the ray origin to the hit
    pub distance: f32,
    pub intersection_point: Vector3<f32>,
}

/// Converts cursor pixels to a ray in the camera's view space.
pub fn screen_to_view_ray(camera: &ViewportCamera, x: f32, y: f32) -> Ray {
    let (width, height) = camera.viewport_size();

    // Pixel rows grow downward, NDC y grows upward
    let ndc_x = (2.0 * x) / width - 1.0;
    let ndc_y = 1.0 - (2.0 * y) / height;

    let inv_proj = camera.inverse_projection_matrix();
    let near = inv_proj * Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
    let far = inv_proj * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);

    let near_3d = near.truncate() / near.w;
    let far_3d = far.truncate() / far.w;

    Ray::new(near_3d, far_3d - near_3d)
}

/// Converts cursor pixels to a ray in world space.
pub fn screen_to_world_ray(camera: &ViewportCamera, x: f32, y: f32) -> Ray {
    screen_to_view_ray(camera, x, y).transform(&camera.view_to_world_matrix())
}

/// Möller-Trumbore ray/triangle test. Returns the ray parameter of the hit.
///
/// Both faces count as hits.
pub fn intersect_triangle(ray: &Ray, v0: Vector3<f32>, v1: Vector3<f32>, v2: Vector3<f32>) -> Option<f32> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Parallel to the triangle plane
    if a.abs() < TRIANGLE_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > TRIANGLE_EPSILON).then_some(t)
}

/// Closest hit of `ray` against a mesh, as a ray parameter.
pub fn intersect_geometry(ray: &Ray, geometry: &GeometryData) -> Option<f32> {
    let vertex = |i: u32| geometry.vertices.get(i as usize).map(|v| Vector3::from(*v));

    geometry
        .indices
        .chunks_exact(3)
        .filter_map(|tri| {
            let (v0, v1, v2) = (vertex(tri[0])?, vertex(tri[1])?, vertex(tri[2])?);
            intersect_triangle(ray, v0, v1, v2)
        })
        .min_by(|a, b| a.total_cmp(b))
}

/// Finds the closest visible mesh under any of the candidates that the ray hits.
///
/// The ray must be expressed in the frame the candidates' world matrices map
/// into. Each candidate's subtree is walked; hidden nodes prune their whole
/// subtree. The reported node is the candidate, not the mesh node.
pub fn pick_nodes<S, I>(scene: &S, candidates: I, ray: &Ray) -> SceneResult<Option<PickResult>>
where
    S: SceneAccess + ?Sized,
    I: IntoIterator<Item = NodeId>,
{
    let mut closest: Option<PickResult> = None;

    for candidate in candidates {
        if !scene.is_effectively_visible(candidate)? {
            continue;
        }

        let mut pending = vec![candidate];
        while let Some(node) = pending.pop() {
            if !scene.is_visible(node)? {
                continue;
            }
            pending.extend(scene.children(node)?);

            let Some(geometry) = scene.geometry(node)? else {
                continue;
            };
            let Some(bounds) = geometry.bounds() else {
                continue;
            };
            let world = scene.world_matrix(node)?;
            if bounds.transform(&world).intersect_ray(ray).is_none() {
                continue;
            }
            // Degenerate transforms (zero scale) cannot be hit
            let Some(inverse) = world.invert() else {
                continue;
            };

            let local_ray = ray.transform(&inverse);
            let Some(t) = intersect_geometry(&local_ray, geometry) else {
                continue;
            };
            let local_hit = local_ray.point_at(t).extend(1.0);
            let world_hit = world * local_hit;
            let point = world_hit.truncate() / world_hit.w;
            let distance = (point - ray.origin).magnitude();

            if closest.map_or(true, |hit| distance < hit.distance) {
                closest = Some(PickResult {
                    node: candidate,
                    distance,
                    intersection_point: point,
                });
            }
        }
    }

    Ok(closest)
}
