use log::debug;

use crate::config::ManipulatorSettings;
use crate::input::{
    EventResult, ManipulationMode, ModifierFlags, MouseAction, MouseEvent, Notification, ViewId,
};

use super::camera_utils::{EngineClock, SystemClock};
use super::cylindrical::{CameraMode, CylindricalManipulator};
use super::viewport_camera::ViewportCamera;

/// Per-viewport camera manipulation state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraManipulationState {
    pub mode: CameraMode,
    /// Accumulated wheel travel; always zero between wheel events.
    pub wheel_ticks: i32,
    pub last_update_ms: f64,
    pub mouse_down: bool,
}

/// Turns mouse events into camera motion for one viewport.
///
/// Every handler returns an [`EventResult`]; a missing camera makes every
/// handler a no-op. Notifications for the host are queued and collected with
/// [`CameraController::take_notifications`].
pub struct CameraController {
    view: ViewId,
    manipulation_mode: ManipulationMode,
    manipulator: CylindricalManipulator,
    state: CameraManipulationState,
    force_pan: bool,
    clock: Box<dyn EngineClock>,
    last_wheel_steps: u32,
    notifications: Vec<Notification>,
}

impl CameraController {
    pub fn new(view: ViewId, settings: ManipulatorSettings, mode: ManipulationMode) -> Self {
        Self::with_clock(view, settings, mode, Box::new(SystemClock::new()))
    }

    pub fn with_clock(
        view: ViewId,
        settings: ManipulatorSettings,
        mode: ManipulationMode,
        clock: Box<dyn EngineClock>,
    ) -> Self {
        let mut manipulator = CylindricalManipulator::new(settings);
        manipulator.set_fly(mode == ManipulationMode::Fly);
        let state = CameraManipulationState {
            last_update_ms: clock.now_ms(),
            ..Default::default()
        };
        Self {
            view,
            manipulation_mode: mode,
            manipulator,
            state,
            force_pan: false,
            clock,
            last_wheel_steps: 0,
            notifications: Vec::new(),
        }
    }

    pub fn state(&self) -> &CameraManipulationState {
        &self.state
    }

    pub fn manipulation_mode(&self) -> ManipulationMode {
        self.manipulation_mode
    }

    pub fn is_dragging(&self) -> bool {
        self.state.mouse_down
    }

    /// Integration steps run by the most recent wheel event.
    pub fn last_wheel_steps(&self) -> u32 {
        self.last_wheel_steps
    }

    pub fn set_manipulation_mode(&mut self, mode: ManipulationMode) {
        if mode != self.manipulation_mode {
            debug!("view {:?}: manipulation mode {:?}", self.view, mode);
        }
        self.manipulation_mode = mode;
        self.manipulator.set_fly(mode == ManipulationMode::Fly);
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Routes a raw mouse event according to the manipulation mode.
    ///
    /// CAD drags with the middle button. USER also drags with the left
    /// button. In USER and FLY a middle-button drag always pans.
    pub fn handle_mouse(&mut self, camera: Option<&mut ViewportCamera>, event: &MouseEvent) -> EventResult {
        let user = self.manipulation_mode == ManipulationMode::User;
        match event.action {
            MouseAction::LeftDown if user => {
                self.force_pan = false;
                self.on_button_down(camera, event.x, event.y, event.flags)
            }
            MouseAction::LeftUp if user => self.on_button_up(),
            MouseAction::MiddleDown => {
                self.force_pan = self.manipulation_mode != ManipulationMode::Cad;
                self.on_button_down(camera, event.x, event.y, event.flags)
            }
            MouseAction::MiddleUp => self.on_button_up(),
            MouseAction::Move => {
                let held = if user {
                    event.flags.left_button() || event.flags.middle_button()
                } else {
                    event.flags.middle_button()
                };
                if !held {
                    self.state.mouse_down = false;
                }
                self.on_mouse_move(camera, event.x, event.y, event.flags)
            }
            MouseAction::Wheel(delta) => self.on_mouse_wheel(camera, delta, event.x, event.y),
            MouseAction::LeftDown | MouseAction::LeftUp => EventResult::IGNORED,
        }
    }

    /// Starts a drag: records cursor and pivot, no camera motion yet.
    pub fn on_button_down(
        &mut self,
        camera: Option<&mut ViewportCamera>,
        x: i32,
        y: i32,
        flags: ModifierFlags,
    ) -> EventResult {
        let Some(camera) = camera else {
            return EventResult::IGNORED;
        };

        self.manipulator.begin_drag(x, y);
        let depth = camera.pivot_depth();
        if depth > camera.projection.znear {
            camera.set_pivot_ahead(depth);
        }
        self.state.mode = self.choose_mode(flags);
        self.manipulator.set_mode(self.state.mode);
        self.state.mouse_down = true;
        self.state.last_update_ms = self.clock.now_ms();

        debug!("view {:?}: manipulation start ({:?})", self.view, self.state.mode);
        self.notifications
            .push(Notification::ManipulationStart(self.view));
        EventResult::HANDLED
    }

    pub fn on_button_up(&mut self) -> EventResult {
        self.state.mouse_down = false;
        self.force_pan = false;
        debug!("view {:?}: manipulation end", self.view);
        self.notifications.push(Notification::ManipulationEnd(self.view));
        EventResult::HANDLED
    }

    pub fn on_mouse_move(
        &mut self,
        camera: Option<&mut ViewportCamera>,
        x: i32,
        y: i32,
        flags: ModifierFlags,
    ) -> EventResult {
        let Some(camera) = camera else {
            return EventResult::IGNORED;
        };
        if !self.state.mouse_down {
            return EventResult::IGNORED;
        }

        self.state.mode = self.choose_mode(flags);
        self.manipulator.set_mode(self.state.mode);
        self.manipulator.set_cursor_position(x, y);

        let dt = self.elapsed_seconds();
        if self.manipulator.update_frame(camera, dt) {
            self.notifications.push(Notification::CameraChanged(self.view));
            EventResult::REPAINT
        } else {
            EventResult::HANDLED
        }
    }

    /// Zooms the field of view by one notch in the direction of `delta`.
    ///
    /// Pending travel is integrated for one step plus a bounded number of
    /// settle frames, after which the accumulator is reset to zero.
    pub fn on_mouse_wheel(
        &mut self,
        camera: Option<&mut ViewportCamera>,
        delta: i32,
        x: i32,
        y: i32,
    ) -> EventResult {
        let Some(camera) = camera else {
            return EventResult::IGNORED;
        };

        self.state.mode = CameraMode::ZoomFov;
        self.manipulator.set_mode(CameraMode::ZoomFov);
        self.manipulator.set_cursor_position(x, y);
        self.manipulator.begin_drag(x, y);
        if delta != 0 {
            self.state.wheel_ticks += self.manipulator.settings().wheel_notch * delta.signum();
        }
        self.manipulator.set_wheel_ticks(self.state.wheel_ticks);

        let mut steps = 1;
        let mut repaint = false;
        let dt = self.elapsed_seconds();
        if self.manipulator.update_frame(camera, dt) {
            repaint = true;
            let settle_frames = self.manipulator.settings().settle_frames;
            let mut frame = 0;
            while frame < settle_frames {
                steps += 1;
                let dt = self.elapsed_seconds();
                if !self.manipulator.update_frame(camera, dt) {
                    break;
                }
                frame += 1;
            }
        }

        self.manipulator.reset();
        self.state.wheel_ticks = 0;
        self.last_wheel_steps = steps;

        if repaint {
            self.notifications.push(Notification::CameraChanged(self.view));
            EventResult::REPAINT
        } else {
            EventResult::HANDLED
        }
    }

    /// Drops pending wheel travel and returns to orbiting around the pivot.
    pub fn reset(&mut self, camera: Option<&mut ViewportCamera>) {
        self.state.wheel_ticks = 0;
        self.state.mode = CameraMode::Orbit;
        self.manipulator.reset();
        self.manipulator.set_mode(CameraMode::Orbit);
        if let Some(camera) = camera {
            let depth = camera.pivot_depth();
            if depth > camera.projection.znear {
                camera.set_pivot_ahead(depth);
            }
        }
    }

    fn choose_mode(&self, flags: ModifierFlags) -> CameraMode {
        if self.force_pan || flags.shift() {
            CameraMode::Pan
        } else if flags.ctrl() || self.manipulation_mode == ManipulationMode::User {
            CameraMode::RotateXY
        } else {
            CameraMode::Orbit
        }
    }

    /// Seconds since the previous integration.
    fn elapsed_seconds(&mut self) -> f32 {
        let now = self.clock.now_ms();
        let elapsed = (now - self.state.last_update_ms).max(0.0);
        self.state.last_update_ms = now;
        (elapsed / 1000.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::ManualClock;
    use cgmath::{Vector3, Zero};

    fn camera() -> ViewportCamera {
        ViewportCamera::looking_at(Vector3::new(0.0, 0.0, 10.0), Vector3::zero(), (800, 600))
    }

    fn controller(mode: ManipulationMode) -> (CameraController, ManualClock) {
        let clock = ManualClock::new();
        let controller = CameraController::with_clock(
            ViewId(1),
            ManipulatorSettings::default(),
            mode,
            Box::new(clock.clone()),
        );
        (controller, clock)
    }

    fn event(action: MouseAction, x: i32, y: i32, flags: ModifierFlags) -> MouseEvent {
        MouseEvent::new(ViewId(1), action, x, y, flags)
    }

    #[test]
    fn test_move_without_button_down_is_ignored() {
        let (mut controller, _) = controller(ManipulationMode::Cad);
        let mut cam = camera();
        let result = controller.on_mouse_move(Some(&mut cam), 50, 50, ModifierFlags::NONE);
        assert_eq!(result, EventResult::IGNORED);
        assert_eq!(cam, camera());
    }

    #[test]
    fn test_missing_camera_is_noop() {
        let (mut controller, _) = controller(ManipulationMode::Cad);
        assert_eq!(
            controller.on_button_down(None, 0, 0, ModifierFlags::MBUTTON),
            EventResult::IGNORED
        );
        assert_eq!(controller.on_mouse_wheel(None, 120, 0, 0), EventResult::IGNORED);
        assert!(controller.take_notifications().is_empty());
    }

    #[test]
    fn test_orbit_drag_notifies() {
        let (mut controller, clock) = controller(ManipulationMode::Cad);
        let mut cam = camera();
        let m = ModifierFlags::MBUTTON;

        controller.handle_mouse(Some(&mut cam), &event(MouseAction::MiddleDown, 100, 100, m));
        assert_eq!(cam, camera());
        clock.advance(16.0);
        let result = controller.handle_mouse(Some(&mut cam), &event(MouseAction::Move, 140, 100, m));
        assert_eq!(result, EventResult::REPAINT);
        assert_eq!(controller.state().mode, CameraMode::Orbit);
        controller.handle_mouse(Some(&mut cam), &event(MouseAction::MiddleUp, 140, 100, ModifierFlags::NONE));

        let notifications = controller.take_notifications();
        assert_eq!(
            notifications,
            vec![
                Notification::ManipulationStart(ViewId(1)),
                Notification::CameraChanged(ViewId(1)),
                Notification::ManipulationEnd(ViewId(1)),
            ]
        );
    }

    #[test]
    fn test_mode_selection_by_modifiers() {
        let (mut controller, _) = controller(ManipulationMode::Cad);
        let mut cam = camera();
        controller.on_button_down(Some(&mut cam), 0, 0, ModifierFlags::MBUTTON);

        controller.on_mouse_move(Some(&mut cam), 5, 0, ModifierFlags::MBUTTON | ModifierFlags::SHIFT);
        assert_eq!(controller.state().mode, CameraMode::Pan);
        controller.on_mouse_move(Some(&mut cam), 10, 0, ModifierFlags::MBUTTON | ModifierFlags::CTRL);
        assert_eq!(controller.state().mode, CameraMode::RotateXY);
        controller.on_mouse_move(Some(&mut cam), 15, 0, ModifierFlags::MBUTTON);
        assert_eq!(controller.state().mode, CameraMode::Orbit);
    }

    #[test]
    fn test_user_mode_routing() {
        let (mut controller, _) = controller(ManipulationMode::User);
        let mut cam = camera();
        let l = ModifierFlags::LBUTTON;

        controller.handle_mouse(Some(&mut cam), &event(MouseAction::LeftDown, 0, 0, l));
        assert!(controller.is_dragging());
        controller.handle_mouse(Some(&mut cam), &event(MouseAction::Move, 10, 0, l));
        assert_eq!(controller.state().mode, CameraMode::RotateXY);
        controller.handle_mouse(Some(&mut cam), &event(MouseAction::LeftUp, 10, 0, ModifierFlags::NONE));
        assert!(!controller.is_dragging());

        let m = ModifierFlags::MBUTTON;
        controller.handle_mouse(Some(&mut cam), &event(MouseAction::MiddleDown, 0, 0, m));
        controller.handle_mouse(Some(&mut cam), &event(MouseAction::Move, 10, 0, m));
        assert_eq!(controller.state().mode, CameraMode::Pan);
    }

    #[test]
    fn test_cad_ignores_left_button() {
        let (mut controller, _) = controller(ManipulationMode::Cad);
        let mut cam = camera();
        let result = controller.handle_mouse(
            Some(&mut cam),
            &event(MouseAction::LeftDown, 0, 0, ModifierFlags::LBUTTON),
        );
        assert_eq!(result, EventResult::IGNORED);
        assert!(!controller.is_dragging());
    }

    #[test]
    fn test_release_outside_view_stops_drag() {
        let (mut controller, _) = controller(ManipulationMode::Cad);
        let mut cam = camera();
        let m = ModifierFlags::MBUTTON;
        controller.handle_mouse(Some(&mut cam), &event(MouseAction::MiddleDown, 0, 0, m));
        // Button released elsewhere; the next move arrives without it
        let result = controller.handle_mouse(
            Some(&mut cam),
            &event(MouseAction::Move, 30, 0, ModifierFlags::NONE),
        );
        assert_eq!(result, EventResult::IGNORED);
        assert!(!controller.is_dragging());
        assert_eq!(cam, camera());
    }

    #[test]
    fn test_wheel_drains_and_resets() {
        let (mut controller, _) = controller(ManipulationMode::Cad);
        let mut cam = camera();
        let before = cam.projection.fovy.0;

        let result = controller.on_mouse_wheel(Some(&mut cam), 360, 400, 300);
        assert_eq!(result, EventResult::REPAINT);
        assert!(controller.last_wheel_steps() <= 3);
        assert_eq!(controller.state().wheel_ticks, 0);
        assert!(cam.projection.fovy.0 < before);
        assert_eq!(
            controller.take_notifications(),
            vec![Notification::CameraChanged(ViewId(1))]
        );

        let zoomed = cam.projection.fovy.0;
        controller.on_mouse_wheel(Some(&mut cam), -1, 400, 300);
        assert!(cam.projection.fovy.0 > zoomed);
        assert_eq!(controller.state().wheel_ticks, 0);
    }

    #[test]
    fn test_wheel_settle_frames_read_the_clock() {
        let (mut controller, clock) = controller(ManipulationMode::Cad);
        let mut cam = camera();
        clock.set(250.0);

        controller.on_mouse_wheel(Some(&mut cam), 120, 400, 300);
        assert!(controller.last_wheel_steps() >= 1);
        assert_eq!(controller.state().last_update_ms, 250.0);

        clock.advance(40.0);
        controller.on_mouse_wheel(Some(&mut cam), -120, 400, 300);
        assert_eq!(controller.state().last_update_ms, 290.0);
        assert_eq!(controller.state().wheel_ticks, 0);
    }

    #[test]
    fn test_zero_wheel_delta_is_guarded() {
        let (mut controller, _) = controller(ManipulationMode::Cad);
        let mut cam = camera();
        let result = controller.on_mouse_wheel(Some(&mut cam), 0, 0, 0);
        assert_eq!(result, EventResult::HANDLED);
        assert_eq!(cam, camera());
        assert_eq!(controller.state().wheel_ticks, 0);
    }

    #[test]
    fn test_fly_mode_advances_over_time() {
        let (mut controller, clock) = controller(ManipulationMode::Fly);
        let mut cam = camera();
        let flags = ModifierFlags::MBUTTON | ModifierFlags::CTRL;
        controller.on_button_down(Some(&mut cam), 0, 0, ModifierFlags::MBUTTON);
        clock.advance(100.0);
        let result = controller.on_mouse_move(Some(&mut cam), 0, 0, flags);
        assert_eq!(result, EventResult::REPAINT);
        assert!(cam.position.z < 10.0);
    }
}
