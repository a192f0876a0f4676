//! # Input Boundary
//!
//! Typed versions of the messages the host's dispatcher feeds into a
//! viewport: mouse events tagged with view id and modifier flags, parsed view
//! parameters, selection notifications, and the notifications the core emits
//! back. The [`winit_adapter`] turns `winit` window events into
//! [`MouseEvent`]s for hosts built on `winit`.

pub mod events;
pub mod params;
pub mod winit_adapter;

pub use events::{
    DocId, ElementId, EventResult, ModifierFlags, MouseAction, MouseEvent, Notification,
    ViewId, ViewMessage,
};
pub use params::{ManipulationMode, ViewParam};
pub use winit_adapter::WinitInputTranslator;
