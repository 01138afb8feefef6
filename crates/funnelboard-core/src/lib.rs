//! Funnelboard Core Library
//!
//! Platform-agnostic canvas interaction engine for the Funnelboard funnel
//! editor: viewport transforms, gesture routing, drag-and-drop placement,
//! selection and connections, and snapshot undo/redo.

pub mod canvas;
pub mod clipboard;
pub mod component;
pub mod config;
pub mod gesture;
pub mod history;
pub mod host;
pub mod input;
pub mod placement;
pub mod selection;
pub mod template;
pub mod viewport;

pub use canvas::{Canvas, CanvasAction, DocumentSnapshot, FunnelDocument};
pub use clipboard::Clipboard;
pub use component::{
    Component, ComponentData, ComponentId, ComponentKind, ComponentUpdate, Connection,
    ConnectionId, ConnectionStyle, ConnectionUpdate, LineStyle,
};
pub use config::{CanvasConfig, ConfigError, MAX_DROP_JITTER, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
pub use gesture::{GestureKind, GestureRouter};
pub use history::History;
pub use host::CanvasHost;
pub use input::{Modifiers, MouseButton, PointerEvent, PointerTarget, WheelEvent};
pub use placement::{DragPlacementController, PlacementError, TemplatePayload};
pub use selection::{
    ConnectionError, SelectOutcome, SelectionController, SelectionMode, SelectionState,
};
pub use template::{FunnelTemplate, TemplateError};
pub use viewport::Viewport;
