//! Selection tracking and the two-step connection state machine.

use crate::component::{ComponentId, Connection, ConnectionId, ConnectionUpdate};
use crate::host::CanvasHost;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Default lifetime of the "can connect" hint after arming.
pub const CONNECT_HINT_TIMEOUT: Duration = Duration::from_secs(10);

/// Reasons a connection attempt is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("Cannot connect component {0} to itself")]
    SelfLoop(ComponentId),
    #[error("Connection endpoint not found: {0}")]
    MissingEndpoint(ComponentId),
}

/// Check that a connection from `from` to `to` may be created.
///
/// Parallel edges between the same pair are allowed.
pub fn validate_connection(
    host: &dyn CanvasHost,
    from: &str,
    to: &str,
) -> Result<(), ConnectionError> {
    if from == to {
        return Err(ConnectionError::SelfLoop(from.to_string()));
    }
    for id in [from, to] {
        if !host.has_component(id) {
            return Err(ConnectionError::MissingEndpoint(id.to_string()));
        }
    }
    Ok(())
}

/// Current selection.
///
/// Component and connection selection are mutually exclusive. While armed,
/// `connecting_from` equals `selected_component`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub selected_component: Option<ComponentId>,
    pub connecting_from: Option<ComponentId>,
    pub selected_connection: Option<ConnectionId>,
}

/// Coarse view of the component-side state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode<'a> {
    Idle,
    Selected(&'a str),
    Armed(&'a str),
}

/// Result of clicking a component.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    /// The component is now selected.
    Selected,
    /// An armed connection was completed and the target selected.
    Connected(Connection),
    /// The armed connection was refused; the target is selected anyway.
    Rejected(ConnectionError),
    /// The target does not exist. Nothing is selected and any armed
    /// connection is dropped.
    Ignored,
}

/// Owns the selection state. Sole writer of [`SelectionState`].
#[derive(Debug, Clone)]
pub struct SelectionController {
    state: SelectionState,
    /// State and arming time before the current arming, restored when
    /// arming is toggled off.
    pre_arm: Option<(SelectionState, Option<Instant>)>,
    armed_at: Option<Instant>,
    hint_timeout: Duration,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self {
            state: SelectionState::default(),
            pre_arm: None,
            armed_at: None,
            hint_timeout: CONNECT_HINT_TIMEOUT,
        }
    }
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom hint lifetime.
    pub fn with_hint_timeout(hint_timeout: Duration) -> Self {
        Self {
            hint_timeout,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn mode(&self) -> SelectionMode<'_> {
        match (&self.state.connecting_from, &self.state.selected_component) {
            (Some(from), _) => SelectionMode::Armed(from),
            (None, Some(id)) => SelectionMode::Selected(id),
            (None, None) => SelectionMode::Idle,
        }
    }

    pub fn selected_component(&self) -> Option<&ComponentId> {
        self.state.selected_component.as_ref()
    }

    pub fn selected_connection(&self) -> Option<&ConnectionId> {
        self.state.selected_connection.as_ref()
    }

    pub fn is_armed(&self) -> bool {
        self.state.connecting_from.is_some()
    }

    /// Click on a component.
    ///
    /// Completes an armed connection when `id` differs from the armed source.
    pub fn select(&mut self, id: &str, host: &mut dyn CanvasHost) -> SelectOutcome {
        if !host.has_component(id) {
            log::warn!("Ignoring click on unknown component {}", id);
            self.cancel_connection();
            return SelectOutcome::Ignored;
        }

        let armed_from = self.state.connecting_from.take();
        self.pre_arm = None;
        self.armed_at = None;

        let outcome = match armed_from {
            Some(from) if from != id => match validate_connection(host, &from, id) {
                Ok(()) => {
                    let connection = Connection::new(from.as_str(), id);
                    log::info!("Connected {} -> {} ({})", from, id, connection.id);
                    host.on_connection_add(connection.clone());
                    SelectOutcome::Connected(connection)
                }
                Err(e) => {
                    log::warn!("Connection rejected: {}", e);
                    SelectOutcome::Rejected(e)
                }
            },
            _ => SelectOutcome::Selected,
        };

        self.state.selected_component = Some(id.to_string());
        self.state.selected_connection = None;
        outcome
    }

    /// Toggle the armed state for `id`.
    ///
    /// Arming twice with the same id restores the state from before the
    /// first call.
    pub fn start_connection(&mut self, id: &str) {
        if self.state.connecting_from.as_deref() == Some(id) {
            let (restored, armed_at) = self.pre_arm.take().unwrap_or_else(|| {
                let state = SelectionState {
                    selected_component: Some(id.to_string()),
                    ..SelectionState::default()
                };
                (state, None)
            });
            log::debug!("Connection from {} cancelled", id);
            self.state = restored;
            self.armed_at = armed_at;
            return;
        }

        self.pre_arm = Some((self.state.clone(), self.armed_at));
        self.state = SelectionState {
            selected_component: Some(id.to_string()),
            connecting_from: Some(id.to_string()),
            selected_connection: None,
        };
        self.armed_at = Some(Instant::now());
        log::debug!("Armed connection from {}", id);
    }

    /// Drop an armed connection, keeping the source selected.
    pub fn cancel_connection(&mut self) {
        if let Some(from) = self.state.connecting_from.take() {
            log::debug!("Connection from {} cancelled", from);
            self.state.selected_component = Some(from);
        }
        self.pre_arm = None;
        self.armed_at = None;
    }

    /// Reset to idle.
    pub fn clear_selection(&mut self) {
        self.state = SelectionState::default();
        self.pre_arm = None;
        self.armed_at = None;
    }

    /// Select a connection, clearing any component selection.
    pub fn select_connection(&mut self, id: &str) {
        self.state = SelectionState {
            selected_connection: Some(id.to_string()),
            ..SelectionState::default()
        };
        self.pre_arm = None;
        self.armed_at = None;
    }

    /// Forward a style change for a connection to the host.
    pub fn update_connection(
        &self,
        host: &mut dyn CanvasHost,
        id: &ConnectionId,
        update: ConnectionUpdate,
    ) {
        host.on_connection_update(id, update);
    }

    /// Forward a connection deletion to the host.
    pub fn delete_connection(&mut self, host: &mut dyn CanvasHost, id: &ConnectionId) {
        if self.state.selected_connection.as_ref() == Some(id) {
            self.state.selected_connection = None;
        }
        host.on_connection_delete(id);
    }

    /// Drop selection that refers to components or connections that are gone.
    pub fn retain_existing(&mut self, host: &dyn CanvasHost) {
        let component_gone = self
            .state
            .selected_component
            .as_deref()
            .is_some_and(|id| !host.has_component(id));
        if component_gone {
            self.clear_selection();
            return;
        }
        let connection_gone = self
            .state
            .selected_connection
            .as_deref()
            .is_some_and(|id| !host.connections().iter().any(|c| c.id == id));
        if connection_gone {
            self.state.selected_connection = None;
        }
    }

    /// Whether to show the "can connect" hint on other components.
    ///
    /// Presentation only; arming never expires by itself.
    pub fn can_connect_hint(&self, now: Instant) -> bool {
        match self.armed_at {
            Some(armed_at) if self.is_armed() => {
                now.saturating_duration_since(armed_at) < self.hint_timeout
            }
            _ => false,
        }
    }
}
