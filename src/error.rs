//! # Error Types
//!
//! Errors surface only at two boundaries: the scene access layer, which can
//! be handed stale node references, and the parameter parser that turns the
//! legacy `key=value` view parameters into typed values. The camera
//! controller and the gizmo absorb both kinds locally.

use thiserror::Error;

use crate::gfx::scene::NodeId;

/// Failure reported by a [`SceneAccess`](crate::gfx::scene::SceneAccess) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The node was never created or has been removed.
    #[error("scene node {0:?} does not exist")]
    UnknownNode(NodeId),

    /// The viewport has no camera bound to it.
    #[error("viewport has no camera")]
    NoCamera,

    /// The node is not a child of the overlay layer.
    #[error("scene node {0:?} is not attached to the overlay layer")]
    NotAttached(NodeId),

    /// Handle geometry was already created for this gizmo.
    #[error("gizmo handles are already registered")]
    AlreadyRegistered,
}

/// Failure while parsing a `key=value` view parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("empty parameter list")]
    Empty,

    #[error("unknown view parameter `{0}`")]
    UnknownKey(String),

    #[error("invalid value `{value}` for view parameter `{key}`")]
    InvalidValue { key: String, value: String },
}

pub type SceneResult<T> = Result<T, SceneError>;
