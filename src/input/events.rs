use std::ops::BitOr;

use crate::gfx::gizmos::SelectionBinding;
use crate::gfx::scene::NodeId;

use super::params::ViewParam;

/// Identifies one viewport of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u32);

/// Identifies a document element (the object a gizmo moves).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u32);

/// Identifies the document owning an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocId(pub u32);

/// Mouse button and keyboard modifier state carried by every mouse event.
///
/// Bit values match the host's native mouse message flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierFlags(u32);

impl ModifierFlags {
    pub const NONE: Self = Self(0);
    pub const LBUTTON: Self = Self(0x0001);
    pub const RBUTTON: Self = Self(0x0002);
    pub const SHIFT: Self = Self(0x0004);
    pub const CTRL: Self = Self(0x0008);
    pub const MBUTTON: Self = Self(0x0010);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    pub fn set(&mut self, other: Self, on: bool) {
        if on {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }

    pub const fn shift(self) -> bool {
        self.contains(Self::SHIFT)
    }

    pub const fn ctrl(self) -> bool {
        self.contains(Self::CTRL)
    }

    pub const fn left_button(self) -> bool {
        self.contains(Self::LBUTTON)
    }

    pub const fn middle_button(self) -> bool {
        self.contains(Self::MBUTTON)
    }
}

impl BitOr for ModifierFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Move,
    LeftDown,
    LeftUp,
    MiddleDown,
    MiddleUp,
    /// Signed wheel travel; one notch is 120.
    Wheel(i32),
}

/// A raw mouse event routed to one viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub view: ViewId,
    pub action: MouseAction,
    pub x: i32,
    pub y: i32,
    pub flags: ModifierFlags,
}

impl MouseEvent {
    pub fn new(view: ViewId, action: MouseAction, x: i32, y: i32, flags: ModifierFlags) -> Self {
        Self {
            view,
            action,
            x,
            y,
            flags,
        }
    }
}

/// Outcome of handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventResult {
    pub handled: bool,
    pub requires_repaint: bool,
}

impl EventResult {
    pub const IGNORED: Self = Self {
        handled: false,
        requires_repaint: false,
    };
    pub const HANDLED: Self = Self {
        handled: true,
        requires_repaint: false,
    };
    pub const REPAINT: Self = Self {
        handled: true,
        requires_repaint: true,
    };

    /// Combines the results of two handlers that saw the same event.
    pub fn merge(self, other: Self) -> Self {
        Self {
            handled: self.handled || other.handled,
            requires_repaint: self.requires_repaint || other.requires_repaint,
        }
    }

    pub fn with_repaint(mut self, repaint: bool) -> Self {
        self.requires_repaint |= repaint;
        self
    }
}

/// Notifications produced by the core for the host's UI and document layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    CameraChanged(ViewId),
    ManipulationStart(ViewId),
    ManipulationEnd(ViewId),
    /// The gizmo just changed the element's transform.
    ElementMoved {
        view: ViewId,
        element_id: ElementId,
        doc_id: DocId,
    },
}

/// Non-mouse messages addressed to a viewport.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewMessage {
    SetViewParam(ViewParam),
    /// The selection layer highlighted an element; bind the gizmo to it.
    HighlightElement(SelectionBinding),
    /// The selection layer dropped the element rooted at `node`.
    UnHighlightElement { node: NodeId },
    /// Hover highlighting changed somewhere in the scene.
    PreHighlightChanged,
    /// The picker hit gizmo handle `handle`; `pre_pick` is hover, otherwise click.
    ViewPick { handle: usize, pre_pick: bool },
    /// Another module moved the camera.
    CameraChanged,
    /// Another module moved a document element.
    ElementMoved,
}
