//! # Transform Gizmo
//!
//! On-screen handles for moving, turning and scaling the selected element.
//!
//! ## Architecture
//!
//! The handles live in an arena ([`HandleSet`]) indexed by [`HandleId`].
//! Scene nodes carry the handle id as a tag, so a picked node maps back to
//! its handle without the scene holding pointers into the gizmo. The
//! [`TransformGizmo`] owns the handle set, the current [`SelectionBinding`]
//! and at most one [`DragSession`].
//!
//! ## Key Components
//!
//! - [`TransformGizmo`] - Per-viewport state machine (idle, attached, armed)
//! - [`HandleSet`] / [`GizmoHandle`] - Handle nodes, materials and visibility
//! - [`drag_math`] - Pixel deltas to translation, rotation and scale steps
//!
//! ## Usage
//!
//! ```no_run
//! use dragcam::config::DraggerSettings;
//! use dragcam::gfx::gizmos::{SelectionBinding, TransformGizmo};
//! use dragcam::gfx::scene::{NodeDesc, Scene, SceneAccess};
//! use dragcam::input::{DocId, ElementId, ViewId};
//!
//! let mut scene = Scene::new();
//! let element = scene.create_node(None, NodeDesc::new("part")).unwrap();
//!
//! let mut gizmo = TransformGizmo::new(ViewId(0), DraggerSettings::default());
//! gizmo.register(&mut scene).unwrap();
//! gizmo.on_selection_changed(&mut scene, SelectionBinding::new(ElementId(1), DocId(0), "Model", element));
//! ```

pub mod drag_math;
pub mod dragger;
pub mod handle;

#[cfg(test)]
mod test_dragger;

// Re-export main types
pub use dragger::{DragSession, ElementKind, GizmoState, SelectionBinding, TransformGizmo};
pub use handle::{Axis, DraggerFilters, GizmoHandle, HandleId, HandleKind, HandleSet, HANDLE_COUNT};
