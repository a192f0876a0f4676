use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use cgmath::{Vector3, Vector4};

use super::viewport_camera::ViewportCamera;

/// Monotonic time source driving the camera integrator.
pub trait EngineClock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineClock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock advanced explicitly by its owner. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl EngineClock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Converts a pixel delta to a camera-space delta on the plane at `depth`
/// in front of the camera.
///
/// The delta is unprojected onto the near plane through the inverse
/// projection and then stretched out to `depth`. Screen y grows downwards,
/// camera y upwards.
pub fn screen_delta_to_camera(camera: &ViewportCamera, dx: f32, dy: f32, depth: f32) -> Vector3<f32> {
    let (width, height) = camera.viewport_size();
    let ndc_dx = 2.0 * dx / width;
    let ndc_dy = -2.0 * dy / height;

    let near = camera.inverse_projection_matrix() * Vector4::new(ndc_dx, ndc_dy, -1.0, 1.0);
    if near.w.abs() <= f32::EPSILON {
        return Vector3::new(0.0, 0.0, 0.0);
    }
    let near = near.truncate() / near.w;

    let znear = camera.projection.znear.max(f32::EPSILON);
    let stretch = depth.max(znear) / znear;
    Vector3::new(near.x * stretch, near.y * stretch, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_shared() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(16.0);
        handle.advance(4.0);
        assert_eq!(clock.now_ms(), 20.0);
    }

    #[test]
    fn test_screen_delta_direction_and_depth() {
        let camera = ViewportCamera::looking_at(
            Vector3::new(0.0, 0.0, 100.0),
            Vector3::new(0.0, 0.0, 0.0),
            (800, 600),
        );
        let near = screen_delta_to_camera(&camera, 10.0, 10.0, 50.0);
        assert!(near.x > 0.0);
        assert!(near.y < 0.0);

        let far = screen_delta_to_camera(&camera, 10.0, 10.0, 100.0);
        assert!((far.x / near.x - 2.0).abs() < 1e-3);

        // Half the viewport width at depth d spans d * tan(fovy / 2) * aspect.
        let half = screen_delta_to_camera(&camera, 400.0, 0.0, 100.0);
        let expected = 100.0 * (camera.projection.fovy.0 * 0.5).tan() * camera.projection.aspect;
        assert!((half.x - expected).abs() < 1e-2);
    }
}
