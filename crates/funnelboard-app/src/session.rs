//! Scripted session replay.
//!
//! A session is a JSON array of input events. Replaying it drives a
//! [`Canvas`] exactly as a live host would.

use crate::shortcuts::ShortcutRegistry;
use funnelboard_core::{
    Canvas, CanvasAction, CanvasConfig, CanvasHost, Component, ConfigError, Connection,
    FunnelTemplate, Modifiers, MouseButton, PointerEvent, PointerTarget, WheelEvent,
};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort a replay before or after it runs.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid session script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("Invalid document {path}: {source}")]
    Document {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn read(path: &Path) -> Result<String, ReplayError> {
    std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate a canvas config file.
pub fn load_config(path: &Path) -> Result<CanvasConfig, ReplayError> {
    Ok(CanvasConfig::from_json(&read(path)?)?)
}

/// Read a script from disk and replay it into `canvas`.
pub fn replay_file(canvas: &mut Canvas, path: &Path) -> Result<ReplayStats, ReplayError> {
    let events = parse_session(&read(path)?)?;
    log::info!("Loaded {} events from {}", events.len(), path.display());
    Ok(replay(canvas, &events))
}

/// Write the report as pretty JSON.
pub fn write_report(report: &ReplayReport<'_>, path: &Path) -> Result<(), ReplayError> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).map_err(|source| ReplayError::Output {
        path: path.to_path_buf(),
        source,
    })
}

fn primary() -> MouseButton {
    MouseButton::Primary
}

fn background() -> PointerTarget {
    PointerTarget::Background
}

/// One recorded input event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum SessionEvent {
    /// Canvas element moved or resized.
    Resize {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
        width: f64,
        height: f64,
    },
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default = "primary")]
        button: MouseButton,
        #[serde(default)]
        modifiers: Modifiers,
        #[serde(default = "background")]
        target: PointerTarget,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default = "primary")]
        button: MouseButton,
    },
    PointerLeave,
    Wheel {
        x: f64,
        y: f64,
        #[serde(default)]
        dx: f64,
        dy: f64,
        #[serde(default)]
        line_based: bool,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Palette drop. `payload` is the raw drag-channel string, or an object
    /// that gets serialized to one.
    Drop {
        x: f64,
        y: f64,
        #[serde(default)]
        payload: Option<serde_json::Value>,
    },
    StartConnection {
        id: String,
    },
    SelectConnection {
        id: String,
    },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Action {
        action: CanvasAction,
    },
    Template {
        template: FunnelTemplate,
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
}

/// Counters describing a replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplayStats {
    pub events: usize,
    /// Key presses with no bound action.
    pub unbound_keys: usize,
    /// Drops that produced no component.
    pub ignored_drops: usize,
}

/// Final state written after a replay.
#[derive(Debug, Serialize)]
pub struct ReplayReport<'a> {
    pub components: &'a [Component],
    pub connections: &'a [Connection],
    pub pan: Vec2,
    pub zoom: f64,
    pub history_len: usize,
    pub history_cursor: usize,
    pub stats: ReplayStats,
}

impl<'a> ReplayReport<'a> {
    pub fn new(canvas: &'a Canvas, stats: ReplayStats) -> Self {
        Self {
            components: canvas.document.components(),
            connections: canvas.document.connections(),
            pan: canvas.viewport.pan,
            zoom: canvas.viewport.zoom(),
            history_len: canvas.history().len(),
            history_cursor: canvas.history().cursor(),
            stats,
        }
    }
}

/// Parse a session script.
pub fn parse_session(json: &str) -> Result<Vec<SessionEvent>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Feed every event into `canvas`.
pub fn replay(canvas: &mut Canvas, events: &[SessionEvent]) -> ReplayStats {
    let mut stats = ReplayStats::default();
    for event in events {
        stats.events += 1;
        apply_event(canvas, event, &mut stats);
    }
    log::info!(
        "Replayed {} events ({} unbound keys, {} ignored drops)",
        stats.events,
        stats.unbound_keys,
        stats.ignored_drops
    );
    stats
}

fn apply_event(canvas: &mut Canvas, event: &SessionEvent, stats: &mut ReplayStats) {
    match event {
        SessionEvent::Resize {
            x,
            y,
            width,
            height,
        } => {
            canvas.set_viewport_rect(Rect::new(*x, *y, x + width, y + height));
        }
        SessionEvent::PointerDown {
            x,
            y,
            button,
            modifiers,
            target,
        } => {
            canvas.handle_pointer(PointerEvent::Down {
                position: Point::new(*x, *y),
                button: *button,
                modifiers: *modifiers,
                target: target.clone(),
            });
        }
        SessionEvent::PointerMove { x, y } => {
            canvas.handle_pointer(PointerEvent::Move {
                position: Point::new(*x, *y),
            });
        }
        SessionEvent::PointerUp { x, y, button } => {
            canvas.handle_pointer(PointerEvent::Up {
                position: Point::new(*x, *y),
                button: *button,
            });
        }
        SessionEvent::PointerLeave => {
            canvas.handle_pointer(PointerEvent::Leave);
        }
        SessionEvent::Wheel {
            x,
            y,
            dx,
            dy,
            line_based,
            modifiers,
        } => {
            let position = Point::new(*x, *y);
            let delta = Vec2::new(*dx, *dy);
            let event = if *line_based {
                WheelEvent::lines(position, delta, *modifiers)
            } else {
                WheelEvent::pixels(position, delta, *modifiers)
            };
            canvas.handle_wheel(&event);
        }
        SessionEvent::Drop { x, y, payload } => {
            let raw = payload.as_ref().map(|value| match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            });
            let dropped = canvas.handle_drop(raw.as_deref(), Point::new(*x, *y));
            if dropped.is_none() {
                stats.ignored_drops += 1;
            }
        }
        SessionEvent::StartConnection { id } => canvas.start_connection(id),
        SessionEvent::SelectConnection { id } => canvas.select_connection(id),
        SessionEvent::Key { key, modifiers } => match ShortcutRegistry::resolve(key, *modifiers) {
            Some(action) => {
                canvas.perform(action);
            }
            None => {
                log::debug!("No shortcut bound to {}", key);
                stats.unbound_keys += 1;
            }
        },
        SessionEvent::Action { action } => {
            canvas.perform(*action);
        }
        SessionEvent::Template { template, x, y } => {
            if let Err(e) = canvas.apply_template(template, Point::new(*x, *y)) {
                log::warn!("Template '{}' not applied: {}", template.name, e);
            }
        }
    }
}
