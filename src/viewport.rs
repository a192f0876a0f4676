//! # Viewports
//!
//! A [`Viewport`] pairs one camera controller with one transform gizmo and
//! collects the notifications both produce. The [`ViewportRegistry`] routes
//! events to viewports by [`ViewId`].
//!
//! Mouse events reach the gizmo first. Only when the gizmo leaves an event
//! unhandled does the camera controller see it, so dragging a handle never
//! orbits the view. Camera motion re-places the gizmo before the handler
//! returns.

use std::collections::BTreeMap;

use log::{debug, trace};

use crate::config::ViewportConfig;
use crate::error::{SceneError, SceneResult};
use crate::gfx::camera::{CameraController, EngineClock, SystemClock};
use crate::gfx::gizmos::TransformGizmo;
use crate::gfx::scene::SceneAccess;
use crate::input::{EventResult, MouseEvent, Notification, ViewId, ViewMessage, ViewParam};

/// One view's controller, gizmo and notification outbox.
pub struct Viewport {
    id: ViewId,
    controller: CameraController,
    gizmo: TransformGizmo,
    outbox: Vec<Notification>,
}

impl Viewport {
    pub fn new(id: ViewId, config: &ViewportConfig) -> Self {
        Self::with_clock(id, config, Box::new(SystemClock::new()))
    }

    pub fn with_clock(id: ViewId, config: &ViewportConfig, clock: Box<dyn EngineClock>) -> Self {
        Self {
            id,
            controller: CameraController::with_clock(
                id,
                config.manipulator,
                config.manipulation_mode,
                clock,
            ),
            gizmo: TransformGizmo::new(id, config.dragger),
            outbox: Vec::new(),
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn controller(&self) -> &CameraController {
        &self.controller
    }

    pub fn gizmo(&self) -> &TransformGizmo {
        &self.gizmo
    }

    /// Builds the gizmo's handle nodes in `scene`.
    pub fn register<S: SceneAccess + ?Sized>(&mut self, scene: &mut S) -> SceneResult<()> {
        self.gizmo.register(scene)
    }

    /// Removes the gizmo's nodes from `scene`.
    pub fn unload<S: SceneAccess + ?Sized>(&mut self, scene: &mut S) -> SceneResult<()> {
        self.gizmo.unload(scene)
    }

    pub fn handle_mouse<S: SceneAccess + ?Sized>(&mut self, scene: &mut S, event: &MouseEvent) -> EventResult {
        let gizmo = self.gizmo.handle_mouse(scene, event);
        let result = if gizmo.handled {
            gizmo
        } else {
            gizmo.merge(self.controller.handle_mouse(scene.camera_mut(), event))
        };
        result.merge(self.collect(scene))
    }

    pub fn handle_message<S: SceneAccess + ?Sized>(&mut self, scene: &mut S, message: &ViewMessage) -> EventResult {
        let result = match message {
            ViewMessage::SetViewParam(ViewParam::ManipulationMode(mode)) => {
                self.controller.set_manipulation_mode(*mode);
                EventResult::HANDLED
            }
            other => self.gizmo.handle_message(scene, other),
        };
        result.merge(self.collect(scene))
    }

    /// Hands the queued notifications to the host.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }

    /// Moves component notifications into the outbox, re-placing the gizmo
    /// when the camera moved.
    fn collect<S: SceneAccess + ?Sized>(&mut self, scene: &mut S) -> EventResult {
        let camera = self.controller.take_notifications();
        let camera_moved = camera
            .iter()
            .any(|n| matches!(n, Notification::CameraChanged(_)));
        self.outbox.extend(camera);

        let result = if camera_moved {
            self.gizmo.refresh_placement(scene)
        } else {
            EventResult::IGNORED
        };
        self.outbox.extend(self.gizmo.take_notifications());
        EventResult {
            handled: false,
            requires_repaint: result.requires_repaint,
        }
    }
}

/// Viewports of one host, keyed by view id.
#[derive(Default)]
pub struct ViewportRegistry {
    viewports: BTreeMap<ViewId, Viewport>,
}

impl ViewportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a viewport for `id` and registers its gizmo in `scene`.
    pub fn open<S: SceneAccess + ?Sized>(
        &mut self,
        scene: &mut S,
        id: ViewId,
        config: &ViewportConfig,
    ) -> SceneResult<&mut Viewport> {
        self.insert(scene, Viewport::new(id, config))
    }

    /// Adds a prepared viewport, registering its gizmo in `scene`.
    pub fn insert<S: SceneAccess + ?Sized>(
        &mut self,
        scene: &mut S,
        mut viewport: Viewport,
    ) -> SceneResult<&mut Viewport> {
        let id = viewport.id();
        if self.viewports.contains_key(&id) {
            return Err(SceneError::AlreadyRegistered);
        }
        viewport.register(scene)?;
        debug!("viewport {id:?} opened");
        Ok(self.viewports.entry(id).or_insert(viewport))
    }

    /// Unloads and drops the viewport. Returns whether it existed.
    pub fn close<S: SceneAccess + ?Sized>(&mut self, scene: &mut S, id: ViewId) -> SceneResult<bool> {
        let Some(mut viewport) = self.viewports.remove(&id) else {
            return Ok(false);
        };
        viewport.unload(scene)?;
        debug!("viewport {id:?} closed");
        Ok(true)
    }

    pub fn get(&self, id: ViewId) -> Option<&Viewport> {
        self.viewports.get(&id)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut Viewport> {
        self.viewports.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.viewports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewports.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.viewports.keys().copied()
    }

    /// Routes a mouse event to the viewport named by `event.view`.
    ///
    /// `scene` must be the scene access of that view: its camera is the
    /// view's camera.
    pub fn handle_mouse<S: SceneAccess + ?Sized>(&mut self, scene: &mut S, event: &MouseEvent) -> EventResult {
        match self.viewports.get_mut(&event.view) {
            Some(viewport) => viewport.handle_mouse(scene, event),
            None => {
                trace!("mouse event for unknown view {:?}", event.view);
                EventResult::IGNORED
            }
        }
    }

    pub fn handle_message<S: SceneAccess + ?Sized>(
        &mut self,
        scene: &mut S,
        view: ViewId,
        message: &ViewMessage,
    ) -> EventResult {
        match self.viewports.get_mut(&view) {
            Some(viewport) => viewport.handle_message(scene, message),
            None => {
                trace!("message for unknown view {view:?}");
                EventResult::IGNORED
            }
        }
    }

    /// Drains every viewport's outbox, in view id order.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.viewports
            .values_mut()
            .flat_map(Viewport::drain_notifications)
            .collect()
    }
}
