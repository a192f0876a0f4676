//! # Dragcam Prelude
//!
//! Commonly used types in one import.
//!
//! ```no_run
//! use dragcam::prelude::*;
//!
//! let mut scene = Scene::new();
//! let mut registry = ViewportRegistry::new();
//! registry.open(&mut scene, ViewId(0), &ViewportConfig::default()).unwrap();
//! ```

// Viewport composition and settings
pub use crate::config::{DraggerSettings, ManipulatorSettings, ViewportConfig};
pub use crate::error::{ParamError, SceneError, SceneResult};
pub use crate::viewport::{Viewport, ViewportRegistry};

// Camera and gizmo
pub use crate::gfx::camera::{CameraController, CameraMode, ViewportCamera};
pub use crate::gfx::gizmos::{
    Axis, DraggerFilters, ElementKind, HandleId, HandleKind, SelectionBinding, TransformGizmo,
};

// Scene access
pub use crate::gfx::scene::{NodeDesc, NodeId, NodeTransform, Scene, SceneAccess};

// Input boundary
pub use crate::input::{
    DocId, ElementId, EventResult, ManipulationMode, ModifierFlags, MouseAction, MouseEvent,
    Notification, ViewId, ViewMessage, ViewParam,
};

// Re-export common external dependencies
pub use cgmath::{Deg, InnerSpace, Quaternion, Rad, Vector3, Zero};
