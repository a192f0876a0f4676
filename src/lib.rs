// src/lib.rs
//! Dragcam
//!
//! Viewport manipulation for 3D authoring tools: a camera controller that
//! orbits, pans and zooms from raw mouse input, and a transform gizmo that
//! moves, turns and scales the selected element through on-screen handles.
//!
//! The crate does not own the scene or render anything. Hosts implement
//! [`gfx::scene::SceneAccess`] over their scene graph (or use the in-memory
//! [`gfx::scene::Scene`]), feed [`input::MouseEvent`]s and
//! [`input::ViewMessage`]s into a [`Viewport`], and act on the
//! [`input::Notification`]s it returns.

pub mod config;
pub mod error;
pub mod gfx;
pub mod input;
pub mod prelude;
pub mod viewport;

// Re-export main types for convenience
pub use config::ViewportConfig;
pub use error::{ParamError, SceneError, SceneResult};
pub use viewport::{Viewport, ViewportRegistry};
