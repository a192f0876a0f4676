//! Screen-to-object math behind gizmo drags.
//!
//! All functions are pure: they take the cursor samples, the relevant
//! orientations and the gizmo scale, and return the new target transform or
//! the scalar that produces it. The gizmo feeds them one mouse move at a time.

use std::f32::consts::FRAC_PI_2;

use cgmath::{InnerSpace, Quaternion, Rad, Rotation, Rotation3, Vector3};

use crate::config::DraggerSettings;
use crate::gfx::scene::NodeTransform;

use super::handle::Axis;

/// Uniform scale of the gizmo root for a pivot `depth` units in front of the camera.
///
/// Proportional to depth, so the gizmo keeps its apparent size on screen.
pub fn gizmo_scale_factor(depth: f32, settings: &DraggerSettings) -> f32 {
    let ratio = settings.size_ratio * depth / settings.reference_depth;
    ratio.max(settings.min_gizmo_scale) * settings.root_gain
}

/// Direction of the target's local `axis` in camera space.
pub fn axis_in_camera(
    camera_orientation: Quaternion<f32>,
    target_orientation: Quaternion<f32>,
    axis: Axis,
) -> Vector3<f32> {
    (camera_orientation.conjugate() * target_orientation).rotate_vector(axis.unit())
}

/// Signs applied to the screen deltas so that dragging toward where the axis
/// points on screen always moves along +axis. Screen y grows downwards.
pub fn axis_signs(axis_camera: Vector3<f32>) -> (f32, f32) {
    let sx = if axis_camera.x < 0.0 { -1.0 } else { 1.0 };
    let sy = if axis_camera.y > 0.0 { -1.0 } else { 1.0 };
    (sx, sy)
}

/// Distance to move along the axis for a pixel delta.
pub fn translate_delta(dx: f32, dy: f32, axis_camera: Vector3<f32>, gizmo_scale: f32) -> f32 {
    let (sx, sy) = axis_signs(axis_camera);
    (sx * dx + sy * dy) * gizmo_scale
}

/// Moves the target `delta` units along its local `axis`.
pub fn translate_along_local_axis(transform: &NodeTransform, axis: Axis, delta: f32) -> NodeTransform {
    let offset = transform.orientation.rotate_vector(axis.unit() * delta);
    NodeTransform {
        translation: transform.translation + offset,
        ..*transform
    }
}

/// Angle at the screen origin between the two cursor samples.
///
/// Always non-negative; zero when either sample sits on the origin.
pub fn law_of_cosines_angle(prev: (f32, f32), curr: (f32, f32)) -> f32 {
    let a = (prev.0 * prev.0 + prev.1 * prev.1).sqrt();
    let b = (curr.0 * curr.0 + curr.1 * curr.1).sqrt();
    let (cx, cy) = (curr.0 - prev.0, curr.1 - prev.1);
    let c2 = cx * cx + cy * cy;
    if a <= f32::EPSILON || b <= f32::EPSILON {
        return 0.0;
    }
    let cos = ((a * a + b * b - c2) / (2.0 * a * b)).clamp(-1.0, 1.0);
    cos.acos()
}

/// Signed angle from the cursor travel in normalized screen coordinates.
///
/// Both samples are mapped to [-1, 1] by half the viewport size (y up) and
/// the summed travel is scaled by a quarter turn. `None` when the samples
/// coincide.
pub fn screen_rotation_angle(prev: (f32, f32), curr: (f32, f32), viewport: (f32, f32), axis: Axis) -> Option<f32> {
    let half_w = (viewport.0 * 0.5).max(f32::EPSILON);
    let half_h = (viewport.1 * 0.5).max(f32::EPSILON);
    let normalize = |p: (f32, f32)| ((p.0 - half_w) / half_w, (half_h - p.1) / half_h);

    let p0 = normalize(prev);
    let p1 = normalize(curr);
    if p0 == p1 {
        return None;
    }

    let angle = (p1.0 - p0.0) * FRAC_PI_2 + (p1.1 - p0.1) * FRAC_PI_2;
    Some(match axis {
        Axis::X | Axis::Z => -angle,
        Axis::Y => angle,
    })
}

/// Whether the ring's axis points away from the viewer, which reverses the
/// felt direction of rotation.
pub fn rotation_direction_flip(axis_camera: Vector3<f32>) -> bool {
    axis_camera.z < 0.0
}

/// Rotation to apply for one cursor move on the ring around `axis`.
pub fn rotation_angle(
    prev: (f32, f32),
    curr: (f32, f32),
    viewport: (f32, f32),
    axis: Axis,
    axis_camera: Vector3<f32>,
    gain: f32,
) -> f32 {
    let mut angle = law_of_cosines_angle(prev, curr);
    if let Some(directed) = screen_rotation_angle(prev, curr, viewport, axis) {
        angle = directed;
    }
    if rotation_direction_flip(axis_camera) {
        angle = -angle;
    }
    angle * gain
}

/// Turns the target about its own local `axis`, keeping translation and scale.
pub fn rotate_about_local_axis(transform: &NodeTransform, axis: Axis, angle: f32) -> NodeTransform {
    let step = Quaternion::from_axis_angle(axis.unit(), Rad(angle));
    NodeTransform {
        orientation: (transform.orientation * step).normalize(),
        ..*transform
    }
}

/// Uniform scale change for a pixel delta, or `None` when it would take any
/// component to `min_scale` or below.
pub fn scale_step(
    transform: &NodeTransform,
    dx: f32,
    dy: f32,
    gizmo_scale: f32,
    sensitivity: f32,
    min_scale: f32,
) -> Option<NodeTransform> {
    let delta = (dx + dy) * gizmo_scale / sensitivity;
    let factor = 1.0 + delta / 100.0;
    let scale = transform.scale * factor;
    if scale.x > min_scale && scale.y > min_scale && scale.z > min_scale {
        Some(NodeTransform { scale, ..*transform })
    } else {
        None
    }
}
