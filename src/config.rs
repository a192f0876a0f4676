//! # Viewport Configuration
//!
//! Tunables for the camera controller and the transform gizmo. Both are
//! plain structs with public fields so hosts can adjust them before building
//! a [`Viewport`](crate::viewport::Viewport); nothing here is persisted.

use cgmath::Deg;

use crate::gfx::gizmos::DraggerFilters;
use crate::input::ManipulationMode;

/// Sensitivities and limits for the camera controller.
#[derive(Debug, Clone, Copy)]
pub struct ManipulatorSettings {
    /// Orbit rotation per pixel of cursor travel, in radians.
    pub orbit_speed: f32,
    /// Rotate-in-place (look around) rotation per pixel, in radians.
    pub rotate_speed: f32,
    /// Wheel delta reported for one notch.
    pub wheel_notch: i32,
    /// FOV multiplier applied per notch of forward wheel travel.
    pub zoom_step: f32,
    pub min_fov: Deg<f32>,
    pub max_fov: Deg<f32>,
    /// Extra integration frames allowed after the first wheel step.
    pub settle_frames: u32,
    /// Forward speed in FLY mode, as a fraction of the pivot distance per second.
    pub fly_speed: f32,
    /// Orbit stops when the view direction gets this close to the up axis.
    pub pitch_limit: f32,
}

impl Default for ManipulatorSettings {
    fn default() -> Self {
        Self {
            orbit_speed: 0.01,
            rotate_speed: 0.005,
            wheel_notch: 120,
            zoom_step: 0.9,
            min_fov: Deg(1.0),
            max_fov: Deg(160.0),
            settle_frames: 2,
            fly_speed: 0.5,
            pitch_limit: 0.995,
        }
    }
}

/// Handle dimensions in gizmo-root units (before the camera-relative scale).
#[derive(Debug, Clone, Copy)]
pub struct HandleDimensions {
    pub shaft_radius: f32,
    pub shaft_length: f32,
    pub tip_radius: f32,
    pub tip_length: f32,
    pub ring_radius: f32,
    pub full_ring_radius: f32,
    pub ring_tube: f32,
    pub scale_ball_radius: f32,
}

impl Default for HandleDimensions {
    fn default() -> Self {
        Self {
            shaft_radius: 6.0,
            shaft_length: 110.0,
            tip_radius: 10.0,
            tip_length: 30.0,
            ring_radius: 80.0,
            full_ring_radius: 50.0,
            ring_tube: 4.5,
            scale_ball_radius: 16.0,
        }
    }
}

/// Gains, clamps and appearance of the transform gizmo.
#[derive(Debug, Clone, Copy)]
pub struct DraggerSettings {
    /// Camera depth at which the gizmo is drawn at `size_ratio` scale.
    pub reference_depth: f32,
    pub size_ratio: f32,
    /// Final multiplier on the root scale.
    pub root_gain: f32,
    /// Floor for the depth-derived scale before `root_gain` is applied.
    pub min_gizmo_scale: f32,
    /// Multiplier on the estimated ring rotation angle.
    pub rotation_gain: f32,
    /// Pixels of drag per percent of uniform scale change.
    pub scale_sensitivity: f32,
    /// Every object scale component must stay strictly above this.
    pub min_object_scale: f32,
    pub filters: DraggerFilters,
    pub axis_colors: [[f32; 3]; 3],
    pub scale_color: [f32; 3],
    pub dimensions: HandleDimensions,
}

impl Default for DraggerSettings {
    fn default() -> Self {
        Self {
            reference_depth: 500.5,
            size_ratio: 0.3,
            root_gain: 1.1,
            min_gizmo_scale: 0.001,
            rotation_gain: 4.0,
            scale_sensitivity: 5.0,
            min_object_scale: 0.01,
            filters: DraggerFilters::all(),
            axis_colors: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            scale_color: [1.0, 1.0, 1.0],
            dimensions: HandleDimensions::default(),
        }
    }
}

/// Everything needed to build one viewport's controller and gizmo pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportConfig {
    pub manipulator: ManipulatorSettings,
    pub dragger: DraggerSettings,
    pub manipulation_mode: ManipulationMode,
}
