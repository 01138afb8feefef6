//! Engine tunables.

use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default lower zoom bound.
pub const MIN_ZOOM: f64 = 0.25;
/// Default upper zoom bound.
pub const MAX_ZOOM: f64 = 3.0;
/// Zoom change per zoom-in/zoom-out action or wheel notch.
pub const ZOOM_STEP: f64 = 0.1;
/// Largest accepted drop jitter, in world units.
pub const MAX_DROP_JITTER: f64 = 1000.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid zoom range: min {min}, max {max}")]
    InvalidZoomRange { min: f64, max: f64 },
    #[error("Invalid zoom step: {0}")]
    InvalidZoomStep(f64),
    #[error("Invalid drop jitter: {0} (expected 0 to 1000)")]
    InvalidDropJitter(f64),
    #[error("Invalid scroll line height: {0}")]
    InvalidScrollLineHeight(f64),
    #[error("Invalid paste offset: ({x}, {y})")]
    InvalidPasteOffset { x: f64, y: f64 },
}

/// Tunables for the canvas engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    /// Pixels per line for line-based wheel deltas.
    pub scroll_line_height: f64,
    /// Maximum random offset (world units, per axis) applied to dropped components.
    pub drop_jitter: f64,
    /// Offset applied to pasted components.
    pub paste_offset: Vec2,
    /// Maximum number of history snapshots; 0 keeps everything.
    pub history_limit: usize,
    /// How long the "can connect" hint stays visible after arming.
    pub connect_hint_timeout_secs: u64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            scroll_line_height: 20.0,
            drop_jitter: 10.0,
            paste_offset: Vec2::new(20.0, 20.0),
            history_limit: 100,
            connect_hint_timeout_secs: 10,
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every tunable is finite and in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom && self.max_zoom.is_finite()) {
            return Err(ConfigError::InvalidZoomRange {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        if !(self.zoom_step > 0.0 && self.zoom_step.is_finite()) {
            return Err(ConfigError::InvalidZoomStep(self.zoom_step));
        }
        if !(0.0..=MAX_DROP_JITTER).contains(&self.drop_jitter) {
            return Err(ConfigError::InvalidDropJitter(self.drop_jitter));
        }
        if !(self.scroll_line_height > 0.0 && self.scroll_line_height.is_finite()) {
            let height = self.scroll_line_height;
            return Err(ConfigError::InvalidScrollLineHeight(height));
        }
        if !self.paste_offset.is_finite() {
            return Err(ConfigError::InvalidPasteOffset {
                x: self.paste_offset.x,
                y: self.paste_offset.y,
            });
        }
        Ok(())
    }
}
