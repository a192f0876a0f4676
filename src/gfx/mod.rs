//! # Graphics Module
//!
//! Everything the manipulation layer knows about the 3D world: the viewport
//! camera and its controller, the transform gizmo, the scene access layer,
//! picking, and the procedural geometry and materials the gizmo is built from.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Orbit, pan, rotate and FOV zoom driven by mouse input
//! - **Gizmos** ([`gizmos`]) - Translate, rotate and scale handles bound to a selection
//! - **Scene Access** ([`scene`]) - The trait hosts implement, plus an in-memory scene
//! - **Picking** ([`picking`]) - Cursor rays and ray/mesh intersection
//! - **Geometry** ([`geometry`]) and **Materials** ([`material`]) - Handle meshes and looks
//!
//! Nothing here renders. Hosts draw the main scene and the overlay layer
//! with their own pipeline, reading camera matrices from
//! [`camera::ViewportCamera`] and handle looks from [`material::Material`].

pub mod camera;
pub mod geometry;
pub mod gizmos;
pub mod material;
pub mod picking;
pub mod scene;

// Re-export commonly used types
pub use camera::{CameraController, ViewportCamera};
pub use gizmos::TransformGizmo;
pub use scene::{Scene, SceneAccess};
