//! # Camera
//!
//! The viewport camera and the controller that drives it from mouse input.
//!
//! ## Key Components
//!
//! - [`ViewportCamera`] - Position, orientation, pivot and projection of one view
//! - [`CylindricalManipulator`] - Frame integrator for orbit, pan, rotate and zoom
//! - [`CameraController`] - Maps mouse events and modifiers onto the integrator
//! - [`EngineClock`] - Monotonic time source for frame integration

pub mod camera_controller;
pub mod camera_utils;
pub mod cylindrical;
pub mod viewport_camera;

// Re-export main types
pub use camera_controller::{CameraController, CameraManipulationState};
pub use camera_utils::{screen_delta_to_camera, EngineClock, ManualClock, SystemClock};
pub use cylindrical::{CameraMode, CylindricalManipulator};
pub use viewport_camera::{Projection, ViewportCamera};
