//! # Procedural Geometry Generation
//!
//! Gizmo handles are built from procedurally generated primitives, so the
//! crate needs no model files.
//!
//! ## Supported Primitives
//!
//! - **Cylinder**: Translate-handle shafts
//! - **Cone**: Translate-handle tips
//! - **Torus**: Rotate rings, either a half arc or the full circle
//! - **Sphere**: The uniform-scale ball
//! - **Cube**: Stand-in target for hosts and tests
//!
//! ## Usage
//!
//! ```rust
//! use dragcam::gfx::geometry::{generate_arrow, generate_torus};
//! use std::f32::consts::PI;
//!
//! // Translate handle: shaft from z=0 to z=110, tip up to z=140
//! let arrow = generate_arrow(6.0, 110.0, 10.0, 30.0, 32);
//!
//! // Rotate ring: half torus around +Z
//! let ring = generate_torus(80.0, 4.5, PI, 48, 12);
//! ```
//!
//! Every generator builds along (or around) the local +Z axis; handle nodes
//! carry the orientation that turns +Z onto their gizmo axis.

pub mod primitives;

pub use primitives::*;

use cgmath::{Matrix, Matrix3, Matrix4, SquareMatrix, Vector3, Vector4};

use crate::gfx::picking::AABB;

/// Indexed triangle list in the owning node's local frame.
///
/// `normals` runs parallel to `vertices`; `indices` holds counter-clockwise
/// triangles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bounds of the vertex positions; `None` for empty geometry.
    pub fn bounds(&self) -> Option<AABB> {
        AABB::from_vertices(&self.vertices)
    }

    /// Appends `other`, moved by `offset`, re-basing its indices.
    pub fn append(&mut self, other: &GeometryData, offset: [f32; 3]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(
            other
                .vertices
                .iter()
                .map(|v| [v[0] + offset[0], v[1] + offset[1], v[2] + offset[2]]),
        );
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Returns a copy with positions moved by `matrix` and normals re-oriented.
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Self {
        let linear = Matrix3::from_cols(
            matrix.x.truncate(),
            matrix.y.truncate(),
            matrix.z.truncate(),
        );
        let normal_matrix = linear
            .invert()
            .map(|inv| inv.transpose())
            .unwrap_or(linear);

        let vertices = self
            .vertices
            .iter()
            .map(|v| {
                let p = matrix * Vector4::new(v[0], v[1], v[2], 1.0);
                [p.x / p.w, p.y / p.w, p.z / p.w]
            })
            .collect();
        let normals = self
            .normals
            .iter()
            .map(|n| {
                let n = normal_matrix * Vector3::from(*n);
                let len = (n.x * n.x + n.y * n.y + n.z * n.z).sqrt().max(f32::EPSILON);
                [n.x / len, n.y / len, n.z / len]
            })
            .collect();

        Self {
            vertices,
            normals,
            indices: self.indices.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_rebases_indices() {
        let mut data = generate_cone(1.0, 2.0, 8);
        let count = data.vertex_count() as u32;
        let other = generate_cone(1.0, 2.0, 8);
        data.append(&other, [0.0, 0.0, 5.0]);

        assert_eq!(data.vertex_count() as u32, count * 2);
        assert!(data.indices.iter().all(|&i| i < count * 2));
        let bounds = data.bounds().unwrap();
        assert!((bounds.max.z - 7.0).abs() < 1e-5);
    }

    #[test]
    fn test_transformed_moves_bounds() {
        let cube = generate_cube();
        let moved = cube.transformed(&Matrix4::from_translation(Vector3::new(0.0, 3.0, 0.0)));
        let bounds = moved.bounds().unwrap();
        assert!((bounds.center().y - 3.0).abs() < 1e-5);
        assert_eq!(moved.normals.len(), cube.normals.len());
    }

    #[test]
    fn test_empty_geometry_has_no_bounds() {
        assert!(GeometryData::new().bounds().is_none());
    }
}
