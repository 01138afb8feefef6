//! Pointer and wheel event types consumed by the engine.

use crate::component::{ComponentId, ConnectionId};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// No modifier held.
    pub fn is_empty(&self) -> bool {
        !(self.shift || self.ctrl || self.alt || self.meta)
    }
}

/// What the pointer landed on when a gesture started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum PointerTarget {
    /// The canvas background element itself.
    Background,
    /// A component body.
    Component(ComponentId),
    /// A connection path.
    Connection(ConnectionId),
    /// Any other element inside the canvas (overlays, handles) whose event
    /// bubbled up to the canvas.
    Other,
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
        target: PointerTarget,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    /// Pointer left the canvas bounds.
    Leave,
}

/// Wheel / trackpad scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    /// Pointer position in screen coordinates.
    pub position: Point,
    /// Raw scroll delta. Positive `y` scrolls down.
    pub delta: Vec2,
    /// Delta is in lines rather than pixels.
    #[serde(default)]
    pub line_based: bool,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl WheelEvent {
    /// Pixel-precise scroll (trackpads, most browsers).
    pub fn pixels(position: Point, delta: Vec2, modifiers: Modifiers) -> Self {
        Self {
            position,
            delta,
            line_based: false,
            modifiers,
        }
    }

    /// Line-based scroll (classic mouse wheels).
    pub fn lines(position: Point, delta: Vec2, modifiers: Modifiers) -> Self {
        Self {
            position,
            delta,
            line_based: true,
            modifiers,
        }
    }
}
