//! Canvas document and state management.

use crate::clipboard::Clipboard;
use crate::component::{
    Component, ComponentId, ComponentUpdate, Connection, ConnectionId, ConnectionUpdate,
};
use crate::config::CanvasConfig;
use crate::gesture::{GestureKind, GestureRouter};
use crate::history::History;
use crate::host::CanvasHost;
use crate::input::{PointerEvent, WheelEvent};
use crate::placement::DragPlacementController;
use crate::selection::SelectionController;
use crate::template::{FunnelTemplate, TemplateError};
use crate::viewport::Viewport;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Padding kept around content by [`Canvas::fit_to_content`].
const FIT_PADDING: f64 = 50.0;

/// A complete copy of the document graph, used for undo/redo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub components: Vec<Component>,
    pub connections: Vec<Connection>,
}

/// A funnel document containing all components and connections.
///
/// Acts as the host for the interaction engine: every intent is applied
/// here and marks the document as needing a history commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelDocument {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    components: Vec<Component>,
    connections: Vec<Connection>,
    #[serde(skip)]
    pending_commit: bool,
}

impl Default for FunnelDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl FunnelDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled funnel".to_string(),
            components: Vec::new(),
            connections: Vec::new(),
            pending_commit: false,
        }
    }

    /// Take a snapshot of the current graph.
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            components: self.components.clone(),
            connections: self.connections.clone(),
        }
    }

    /// Replace the graph with a snapshot. Does not request a commit.
    pub fn restore(&mut self, snapshot: DocumentSnapshot) {
        self.components = snapshot.components;
        self.connections = snapshot.connections;
    }

    /// Whether an intent changed the document since the last call.
    pub fn take_pending_commit(&mut self) -> bool {
        std::mem::take(&mut self.pending_commit)
    }

    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// Bounding box of all components.
    pub fn bounds(&self) -> Option<Rect> {
        self.components
            .iter()
            .map(Component::bounds)
            .reduce(|acc, bounds| acc.union(bounds))
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl CanvasHost for FunnelDocument {
    fn components(&self) -> &[Component] {
        &self.components
    }

    fn connections(&self) -> &[Connection] {
        &self.connections
    }

    fn on_component_add(&mut self, component: Component) {
        self.components.push(component);
        self.pending_commit = true;
    }

    fn on_component_update(&mut self, id: &ComponentId, update: ComponentUpdate) {
        if let Some(component) = self.components.iter_mut().find(|c| &c.id == id) {
            update.apply(component);
            self.pending_commit = true;
        }
    }

    fn on_component_delete(&mut self, id: &ComponentId) {
        let before = self.components.len();
        self.components.retain(|c| &c.id != id);
        if self.components.len() != before {
            // Dangling connections go with the component.
            self.connections.retain(|c| !c.touches(id));
            self.pending_commit = true;
        }
    }

    fn on_connection_add(&mut self, connection: Connection) {
        self.connections.push(connection);
        self.pending_commit = true;
    }

    fn on_connection_update(&mut self, id: &ConnectionId, update: ConnectionUpdate) {
        if let Some(connection) = self.connections.iter_mut().find(|c| &c.id == id) {
            update.apply(connection);
            self.pending_commit = true;
        }
    }

    fn on_connection_delete(&mut self, id: &ConnectionId) {
        let before = self.connections.len();
        self.connections.retain(|c| &c.id != id);
        if self.connections.len() != before {
            self.pending_commit = true;
        }
    }
}

/// Editor-level actions, usually bound to keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CanvasAction {
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    DeleteSelection,
    ZoomIn,
    ZoomOut,
    ResetView,
    FitToContent,
    Cancel,
}

/// Runtime canvas state (not persisted).
#[derive(Debug, Clone)]
pub struct Canvas {
    /// The document being edited.
    pub document: FunnelDocument,
    /// Pan/zoom state.
    pub viewport: Viewport,
    /// Canvas element bounds in screen space, as last measured by the host.
    pub viewport_rect: Rect,
    /// Selected component or connection, and any armed connection.
    pub selection: SelectionController,
    /// The pointer gesture in progress.
    gestures: GestureRouter,
    /// Turns palette drops into components.
    placement: DragPlacementController,
    /// Document snapshots for undo/redo.
    history: History<DocumentSnapshot>,
    /// Components captured by the last copy or cut.
    clipboard: Clipboard,
    /// Validated tunables this canvas was built with.
    config: CanvasConfig,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a new canvas with an empty document.
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    pub fn with_config(config: CanvasConfig) -> Self {
        Self::with_document(FunnelDocument::new(), config)
    }

    /// Create a canvas with an existing document as the history baseline.
    ///
    /// An invalid config is logged and replaced by the defaults.
    pub fn with_document(document: FunnelDocument, config: CanvasConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("Invalid canvas config, using defaults: {}", e);
                CanvasConfig::default()
            }
        };
        let mut placement = DragPlacementController::new();
        placement.jitter = config.drop_jitter;
        let mut clipboard = Clipboard::new();
        clipboard.paste_offset = config.paste_offset;
        let hint_timeout = Duration::from_secs(config.connect_hint_timeout_secs);

        Self {
            history: History::with_limit(document.snapshot(), config.history_limit),
            document,
            viewport: Viewport::from_config(&config),
            viewport_rect: Rect::new(0.0, 0.0, 800.0, 600.0),
            selection: SelectionController::with_hint_timeout(hint_timeout),
            gestures: GestureRouter::new(),
            placement,
            clipboard,
            config,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn history(&self) -> &History<DocumentSnapshot> {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn gestures(&self) -> &GestureRouter {
        &self.gestures
    }

    /// Make drop jitter reproducible.
    pub fn set_placement_seed(&mut self, seed: u64) {
        self.placement = DragPlacementController::with_seed(seed);
        self.placement.jitter = self.config.drop_jitter;
    }

    /// Replace the document and start a fresh history from it.
    pub fn load_document(&mut self, document: FunnelDocument) {
        self.history.reset(document.snapshot());
        self.document = document;
        self.selection.clear_selection();
        self.gestures.cancel();
    }

    /// Set the canvas element bounds in screen space.
    pub fn set_viewport_rect(&mut self, rect: Rect) {
        self.viewport_rect = rect;
    }

    /// Feed a pointer event through the gesture router.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<GestureKind> {
        let started = match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
                target,
            } => self.gestures.pointer_down(
                position,
                button,
                modifiers,
                &target,
                &mut self.selection,
                &mut self.document,
            ),
            PointerEvent::Move { position } => {
                self.gestures.pointer_move(position, &mut self.viewport);
                None
            }
            PointerEvent::Up { position, .. } => {
                self.gestures
                    .pointer_up(position, &mut self.viewport, &mut self.document);
                None
            }
            PointerEvent::Leave => {
                self.gestures.pointer_leave(&mut self.document);
                None
            }
        };
        self.commit_if_changed();
        started
    }

    pub fn handle_wheel(&mut self, event: &WheelEvent) {
        self.viewport.handle_wheel(event, self.viewport_rect);
    }

    /// Drop a palette template at `screen_point`.
    pub fn handle_drop(
        &mut self,
        payload: Option<&str>,
        screen_point: Point,
    ) -> Option<ComponentId> {
        let id = self.placement.drop_payload(
            payload,
            screen_point,
            self.viewport_rect,
            &self.viewport,
            &mut self.document,
        );
        self.commit_if_changed();
        id
    }

    /// Arm (or disarm) a connection from `id`.
    pub fn start_connection(&mut self, id: &str) {
        if !self.document.has_component(id) {
            log::warn!("Cannot start connection from unknown component {}", id);
            return;
        }
        self.selection.start_connection(id);
    }

    /// Click on a component outside of a pointer gesture. Unknown ids are
    /// ignored.
    pub fn select_component(&mut self, id: &str) {
        self.selection.select(id, &mut self.document);
        self.commit_if_changed();
    }

    pub fn select_connection(&mut self, id: &str) {
        if self.document.connection(id).is_none() {
            log::warn!("Cannot select unknown connection {}", id);
            return;
        }
        self.selection.select_connection(id);
    }

    pub fn update_connection(&mut self, id: &ConnectionId, update: ConnectionUpdate) {
        self.selection
            .update_connection(&mut self.document, id, update);
        self.commit_if_changed();
    }

    pub fn delete_connection(&mut self, id: &ConnectionId) {
        self.selection.delete_connection(&mut self.document, id);
        self.commit_if_changed();
    }

    pub fn update_component(&mut self, id: &ComponentId, update: ComponentUpdate) {
        self.document.on_component_update(id, update);
        self.commit_if_changed();
    }

    /// Delete the selected connection, or the selected component with its connections.
    pub fn delete_selection(&mut self) -> bool {
        if let Some(id) = self.selection.selected_connection().cloned() {
            self.selection.delete_connection(&mut self.document, &id);
        } else if let Some(id) = self.selection.selected_component().cloned() {
            self.document.on_component_delete(&id);
            self.selection.clear_selection();
        } else {
            return false;
        }
        self.commit_if_changed()
    }

    /// Copy the selected component. Returns the number of copied components.
    pub fn copy(&mut self) -> usize {
        let ids: Vec<ComponentId> = self
            .selection
            .selected_component()
            .cloned()
            .into_iter()
            .collect();
        self.copy_components(&ids)
    }

    /// Copy the given components by value.
    pub fn copy_components(&mut self, ids: &[ComponentId]) -> usize {
        if ids.is_empty() {
            return 0;
        }
        let components = self
            .document
            .components()
            .iter()
            .filter(|c| ids.contains(&c.id));
        self.clipboard.copy(components)
    }

    /// Copy then delete the selection, as one history entry.
    pub fn cut(&mut self) -> usize {
        let copied = self.copy();
        if copied > 0 {
            self.delete_selection();
        }
        copied
    }

    /// Paste the clipboard with fresh ids, as one history entry.
    pub fn paste(&mut self) -> Vec<ComponentId> {
        let pasted = self.clipboard.paste();
        if pasted.is_empty() {
            return Vec::new();
        }

        let ids: Vec<ComponentId> = pasted.iter().map(|c| c.id.clone()).collect();
        for component in pasted {
            self.document.on_component_add(component);
        }
        self.selection.clear_selection();
        if let Some(first) = ids.first() {
            self.selection.select(first, &mut self.document);
        }
        log::info!("Pasted {} components", ids.len());
        self.commit_if_changed();
        ids
    }

    /// Add a whole template at `origin` (world space), as one history entry.
    pub fn apply_template(
        &mut self,
        template: &FunnelTemplate,
        origin: Point,
    ) -> Result<Vec<ComponentId>, TemplateError> {
        let (components, connections) = template.instantiate(origin)?;
        let ids: Vec<ComponentId> = components.iter().map(|c| c.id.clone()).collect();
        for component in components {
            self.document.on_component_add(component);
        }
        for connection in connections {
            self.document.on_connection_add(connection);
        }
        log::info!(
            "Applied template '{}' ({} components)",
            template.name,
            ids.len()
        );
        self.commit_if_changed();
        Ok(ids)
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.document.restore(snapshot.clone());
        self.selection.retain_existing(&self.document);
        log::info!("Undo (cursor {})", self.history.cursor());
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.document.restore(snapshot.clone());
        self.selection.retain_existing(&self.document);
        log::info!("Redo (cursor {})", self.history.cursor());
        true
    }

    pub fn zoom_in(&mut self) -> bool {
        self.viewport.zoom_in(self.viewport_rect.size())
    }

    pub fn zoom_out(&mut self) -> bool {
        self.viewport.zoom_out(self.viewport_rect.size())
    }

    /// Fit the view to show all components.
    pub fn fit_to_content(&mut self) {
        if let Some(bounds) = self.document.bounds() {
            self.viewport
                .fit_to_bounds(bounds, self.viewport_rect.size(), FIT_PADDING);
        }
    }

    /// Abort the active gesture and any armed connection.
    pub fn cancel(&mut self) {
        self.gestures.cancel();
        self.selection.cancel_connection();
    }

    /// Run an editor action. Returns whether anything happened.
    pub fn perform(&mut self, action: CanvasAction) -> bool {
        match action {
            CanvasAction::Undo => self.undo(),
            CanvasAction::Redo => self.redo(),
            CanvasAction::Copy => self.copy() > 0,
            CanvasAction::Cut => self.cut() > 0,
            CanvasAction::Paste => !self.paste().is_empty(),
            CanvasAction::DeleteSelection => self.delete_selection(),
            CanvasAction::ZoomIn => self.zoom_in(),
            CanvasAction::ZoomOut => self.zoom_out(),
            CanvasAction::ResetView => {
                self.viewport.reset();
                true
            }
            CanvasAction::FitToContent => {
                self.fit_to_content();
                true
            }
            CanvasAction::Cancel => {
                self.cancel();
                true
            }
        }
    }

    /// Record one history entry if the document changed.
    fn commit_if_changed(&mut self) -> bool {
        if !self.document.take_pending_commit() {
            return false;
        }
        self.history.commit(self.document.snapshot());
        log::debug!(
            "Committed snapshot {} ({} components, {} connections)",
            self.history.cursor(),
            self.document.len(),
            self.document.connections().len()
        );
        true
    }
}
