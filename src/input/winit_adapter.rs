//! Translation of `winit` window events into [`MouseEvent`]s.
//!
//! `winit` reports buttons, cursor motion and modifiers as separate events,
//! while the manipulation layer expects every mouse event to carry the full
//! button and modifier state. The translator keeps that state between events.

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::ModifiersState,
};

use super::events::{ModifierFlags, MouseAction, MouseEvent, ViewId};

/// Pixel travel treated as one wheel notch for touchpads.
const PIXELS_PER_NOTCH: f64 = 50.0;
const WHEEL_NOTCH: f32 = 120.0;

pub struct WinitInputTranslator {
    view: ViewId,
    cursor: (i32, i32),
    flags: ModifierFlags,
}

impl WinitInputTranslator {
    pub fn new(view: ViewId) -> Self {
        Self {
            view,
            cursor: (0, 0),
            flags: ModifierFlags::NONE,
        }
    }

    pub fn flags(&self) -> ModifierFlags {
        self.flags
    }

    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    /// Translates one window event; events unrelated to the mouse yield `None`.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<MouseEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => Some(self.on_cursor_moved(*position)),
            WindowEvent::MouseInput { state, button, .. } => self.on_mouse_input(*state, *button),
            WindowEvent::MouseWheel { delta, .. } => self.on_mouse_wheel(*delta),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.on_modifiers_changed(modifiers.state());
                None
            }
            _ => None,
        }
    }

    pub fn on_cursor_moved(&mut self, position: PhysicalPosition<f64>) -> MouseEvent {
        self.cursor = (position.x.round() as i32, position.y.round() as i32);
        self.event(MouseAction::Move)
    }

    pub fn on_mouse_input(&mut self, state: ElementState, button: MouseButton) -> Option<MouseEvent> {
        let pressed = state == ElementState::Pressed;
        let action = match button {
            MouseButton::Left => {
                self.flags.set(ModifierFlags::LBUTTON, pressed);
                if pressed {
                    MouseAction::LeftDown
                } else {
                    MouseAction::LeftUp
                }
            }
            MouseButton::Middle => {
                self.flags.set(ModifierFlags::MBUTTON, pressed);
                if pressed {
                    MouseAction::MiddleDown
                } else {
                    MouseAction::MiddleUp
                }
            }
            MouseButton::Right => {
                self.flags.set(ModifierFlags::RBUTTON, pressed);
                return None;
            }
            _ => return None,
        };
        Some(self.event(action))
    }

    /// Converts wheel travel to notch units of 120; zero travel yields `None`.
    pub fn on_mouse_wheel(&mut self, delta: MouseScrollDelta) -> Option<MouseEvent> {
        let ticks = match delta {
            MouseScrollDelta::LineDelta(_, lines) => (lines * WHEEL_NOTCH).round() as i32,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => {
                ((y / PIXELS_PER_NOTCH) * WHEEL_NOTCH as f64).round() as i32
            }
        };
        if ticks == 0 {
            return None;
        }
        Some(self.event(MouseAction::Wheel(ticks)))
    }

    pub fn on_modifiers_changed(&mut self, state: ModifiersState) {
        self.flags.set(ModifierFlags::SHIFT, state.shift_key());
        self.flags.set(ModifierFlags::CTRL, state.control_key());
    }

    fn event(&self, action: MouseAction) -> MouseEvent {
        MouseEvent::new(self.view, action, self.cursor.0, self.cursor.1, self.flags)
    }
}
