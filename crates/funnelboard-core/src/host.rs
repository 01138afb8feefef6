//! Host callbacks.
//!
//! The engine never owns the component or connection lists. Every mutation
//! is expressed as an intent sent to a [`CanvasHost`], which is passed down
//! explicitly to whichever controller needs it.

use crate::component::{
    Component, ComponentId, ComponentUpdate, Connection, ConnectionId, ConnectionUpdate,
};

/// Mutation intents and read access supplied by the host document.
pub trait CanvasHost {
    /// Current components, in render order.
    fn components(&self) -> &[Component];

    /// Current connections.
    fn connections(&self) -> &[Connection];

    fn on_component_add(&mut self, component: Component);

    fn on_component_update(&mut self, id: &ComponentId, update: ComponentUpdate);

    fn on_component_delete(&mut self, id: &ComponentId);

    fn on_connection_add(&mut self, connection: Connection);

    fn on_connection_update(&mut self, id: &ConnectionId, update: ConnectionUpdate);

    fn on_connection_delete(&mut self, id: &ConnectionId);

    /// Look up a component by id.
    fn component(&self, id: &str) -> Option<&Component> {
        self.components().iter().find(|c| c.id == id)
    }

    /// Check whether a component exists.
    fn has_component(&self, id: &str) -> bool {
        self.component(id).is_some()
    }
}

/// Host that records intents, for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingHost {
    pub components: Vec<Component>,
    pub connections: Vec<Connection>,
    pub added_components: Vec<Component>,
    pub added_connections: Vec<Connection>,
    pub component_updates: Vec<(ComponentId, ComponentUpdate)>,
    pub connection_updates: Vec<(ConnectionId, ConnectionUpdate)>,
    pub deleted_components: Vec<ComponentId>,
    pub deleted_connections: Vec<ConnectionId>,
}

#[cfg(test)]
impl RecordingHost {
    pub fn with_components(ids: &[&str]) -> Self {
        Self {
            components: ids
                .iter()
                .map(|id| Component::with_id(*id, "landing-page", kurbo::Point::ZERO))
                .collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl CanvasHost for RecordingHost {
    fn components(&self) -> &[Component] {
        &self.components
    }

    fn connections(&self) -> &[Connection] {
        &self.connections
    }

    fn on_component_add(&mut self, component: Component) {
        self.added_components.push(component);
    }

    fn on_component_update(&mut self, id: &ComponentId, update: ComponentUpdate) {
        self.component_updates.push((id.clone(), update));
    }

    fn on_component_delete(&mut self, id: &ComponentId) {
        self.deleted_components.push(id.clone());
    }

    fn on_connection_add(&mut self, connection: Connection) {
        self.added_connections.push(connection);
    }

    fn on_connection_update(&mut self, id: &ConnectionId, update: ConnectionUpdate) {
        self.connection_updates.push((id.clone(), update));
    }

    fn on_connection_delete(&mut self, id: &ConnectionId) {
        self.deleted_connections.push(id.clone());
    }
}
