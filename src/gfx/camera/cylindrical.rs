//! Frame integrator turning cursor travel and wheel ticks into camera motion.
//!
//! The controller feeds the integrator the latest cursor position and wheel
//! tick count; [`CylindricalManipulator::update_frame`] consumes whatever has
//! accumulated since the previous frame and reports whether the camera moved.

use cgmath::Rad;
use log::trace;

use crate::config::ManipulatorSettings;

use super::camera_utils::screen_delta_to_camera;
use super::viewport_camera::ViewportCamera;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    #[default]
    Orbit,
    Pan,
    RotateXY,
    ZoomFov,
}

#[derive(Debug, Clone)]
pub struct CylindricalManipulator {
    settings: ManipulatorSettings,
    mode: CameraMode,
    fly: bool,
    cursor: (i32, i32),
    last_cursor: (i32, i32),
    wheel_ticks: i32,
    applied_ticks: i32,
}

impl CylindricalManipulator {
    pub fn new(settings: ManipulatorSettings) -> Self {
        Self {
            settings,
            mode: CameraMode::Orbit,
            fly: false,
            cursor: (0, 0),
            last_cursor: (0, 0),
            wheel_ticks: 0,
            applied_ticks: 0,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CameraMode) {
        self.mode = mode;
    }

    /// In fly mode steering also advances the camera.
    pub fn set_fly(&mut self, fly: bool) {
        self.fly = fly;
    }

    pub fn settings(&self) -> &ManipulatorSettings {
        &self.settings
    }

    pub fn set_cursor_position(&mut self, x: i32, y: i32) {
        self.cursor = (x, y);
    }

    /// Starts a new drag at the cursor: the next frame sees no travel.
    pub fn begin_drag(&mut self, x: i32, y: i32) {
        self.cursor = (x, y);
        self.last_cursor = (x, y);
    }

    pub fn wheel_ticks(&self) -> i32 {
        self.wheel_ticks
    }

    /// Sets the absolute wheel position; travel since the last applied
    /// position is consumed by the next frame.
    pub fn set_wheel_ticks(&mut self, ticks: i32) {
        self.wheel_ticks = ticks;
    }

    /// Drops pending travel and re-bases the wheel at zero.
    pub fn reset(&mut self) {
        self.last_cursor = self.cursor;
        self.wheel_ticks = 0;
        self.applied_ticks = 0;
    }

    /// Integrates one frame of `dt` seconds. Returns whether the camera changed.
    pub fn update_frame(&mut self, camera: &mut ViewportCamera, dt: f32) -> bool {
        let dx = (self.cursor.0 - self.last_cursor.0) as f32;
        let dy = (self.cursor.1 - self.last_cursor.1) as f32;
        self.last_cursor = self.cursor;

        let mut changed = false;
        match self.mode {
            CameraMode::Orbit => {
                if dx != 0.0 || dy != 0.0 {
                    let speed = self.settings.orbit_speed;
                    camera.orbit(-dx * speed, -dy * speed, self.settings.pitch_limit);
                    changed = true;
                }
            }
            CameraMode::Pan => {
                if dx != 0.0 || dy != 0.0 {
                    let depth = camera.pivot_depth();
                    let delta = screen_delta_to_camera(camera, dx, dy, depth);
                    let world = camera.orientation * delta;
                    camera.pan(-world);
                    changed = true;
                }
            }
            CameraMode::RotateXY => {
                if dx != 0.0 || dy != 0.0 {
                    let speed = self.settings.rotate_speed;
                    camera.rotate_in_place(-dx * speed, -dy * speed, self.settings.pitch_limit);
                    changed = true;
                }
                if self.fly && dt > 0.0 {
                    let step = self.settings.fly_speed * dt * camera.pivot_distance();
                    camera.advance(step);
                    changed = true;
                }
            }
            CameraMode::ZoomFov => {}
        }

        let pending = self.wheel_ticks - self.applied_ticks;
        if pending != 0 {
            self.applied_ticks = self.wheel_ticks;
            let notches = pending as f32 / self.settings.wheel_notch.max(1) as f32;
            let factor = self.settings.zoom_step.powf(notches);
            changed |= camera.zoom_fov(
                factor,
                Rad::from(self.settings.min_fov),
                Rad::from(self.settings.max_fov),
            );
        }

        if changed {
            trace!("camera frame {:?}: d=({dx}, {dy}) dt={dt}", self.mode);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3, Zero};

    fn camera() -> ViewportCamera {
        ViewportCamera::looking_at(Vector3::new(0.0, 0.0, 10.0), Vector3::zero(), (800, 600))
    }

    #[test]
    fn test_no_travel_no_change() {
        let mut cam = camera();
        let mut manipulator = CylindricalManipulator::new(ManipulatorSettings::default());
        manipulator.begin_drag(100, 100);
        assert!(!manipulator.update_frame(&mut cam, 0.016));
        assert_eq!(cam, camera());
    }

    #[test]
    fn test_orbit_frame() {
        let mut cam = camera();
        let mut manipulator = CylindricalManipulator::new(ManipulatorSettings::default());
        manipulator.begin_drag(100, 100);
        manipulator.set_cursor_position(150, 100);
        assert!(manipulator.update_frame(&mut cam, 0.016));
        assert!((cam.pivot_distance() - 10.0).abs() < 1e-3);
        assert!(cam.position.x.abs() > 0.1);
        // Travel is consumed
        assert!(!manipulator.update_frame(&mut cam, 0.016));
    }

    #[test]
    fn test_pan_follows_cursor() {
        let mut cam = camera();
        let mut manipulator = CylindricalManipulator::new(ManipulatorSettings::default());
        manipulator.set_mode(CameraMode::Pan);
        manipulator.begin_drag(100, 100);
        manipulator.set_cursor_position(120, 100);
        assert!(manipulator.update_frame(&mut cam, 0.016));
        // Dragging right slides the camera left, pivot along with it
        assert!(cam.position.x < 0.0);
        assert!((cam.pivot.x - cam.position.x).abs() < 1e-4);
        assert!((cam.forward() - camera().forward()).magnitude() < 1e-5);
    }

    #[test]
    fn test_wheel_applies_once() {
        let mut cam = camera();
        let mut manipulator = CylindricalManipulator::new(ManipulatorSettings::default());
        manipulator.set_mode(CameraMode::ZoomFov);
        manipulator.set_wheel_ticks(120);
        let before = cam.projection.fovy.0;
        assert!(manipulator.update_frame(&mut cam, 0.0));
        assert!((cam.projection.fovy.0 - before * 0.9).abs() < 1e-5);
        assert!(!manipulator.update_frame(&mut cam, 0.0));
    }

    #[test]
    fn test_fly_advances_while_steering() {
        let mut cam = camera();
        let mut manipulator = CylindricalManipulator::new(ManipulatorSettings::default());
        manipulator.set_mode(CameraMode::RotateXY);
        manipulator.set_fly(true);
        manipulator.begin_drag(0, 0);
        assert!(manipulator.update_frame(&mut cam, 0.5));
        assert!(cam.position.z < 10.0);
    }
}
