//! # Node Transforms
//!
//! A node's local transform is kept decomposed (translation, orientation,
//! non-uniform scale) so the gizmo can change one part without disturbing the
//! others. The composed matrix is `T * R * S`.

use cgmath::{InnerSpace, Matrix4, One, Quaternion, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub translation: Vector3<f32>,
    /// Unit quaternion.
    pub orientation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl NodeTransform {
    pub fn identity() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            orientation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn from_translation(translation: Vector3<f32>) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    pub fn from_orientation(orientation: Quaternion<f32>) -> Self {
        Self {
            orientation: orientation.normalize(),
            ..Self::identity()
        }
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3::new(scale, scale, scale);
        self
    }

    pub fn with_translation(mut self, translation: Vector3<f32>) -> Self {
        self.translation = translation;
        self
    }

    /// Composed local matrix. Order matters: T * R * S
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from(self.orientation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Rotation3, Vector4};

    #[test]
    fn test_trs_order() {
        let transform = NodeTransform {
            translation: Vector3::new(10.0, 0.0, 0.0),
            orientation: Quaternion::from_angle_z(Deg(90.0)),
            scale: Vector3::new(2.0, 1.0, 1.0),
        };

        // Scale first, then rotate +X onto +Y, then translate.
        let p = transform.matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p.x - 10.0).abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
        assert!(p.z.abs() < 1e-5);
    }
}
