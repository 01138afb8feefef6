//! Viewport module for pan/zoom transforms.

use crate::config::{CanvasConfig, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use crate::input::WheelEvent;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Viewport manages the view transform for the canvas.
///
/// `pan` is the screen-space offset of the world origin relative to the
/// canvas element's top-left corner. Screen points passed in are raw pointer
/// coordinates; the canvas rect is measured by the host at call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Current translation offset.
    pub pan: Vec2,
    /// Current zoom level, always within `[min_zoom, max_zoom]`.
    zoom: f64,
    /// Lower zoom bound.
    pub min_zoom: f64,
    /// Upper zoom bound.
    pub max_zoom: f64,
    /// Zoom delta used by zoom-in/zoom-out actions and wheel zoom.
    pub zoom_step: f64,
    /// Pixels per line for line-based wheel deltas.
    pub scroll_line_height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            scroll_line_height: 20.0,
        }
    }
}

impl Viewport {
    /// Create a viewport with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewport using the bounds and step from `config`.
    ///
    /// An invalid config falls back to the default viewport.
    pub fn from_config(config: &CanvasConfig) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("Using default viewport settings: {}", e);
            return Self::default();
        }
        Self {
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_step: config.zoom_step,
            scroll_line_height: config.scroll_line_height,
            zoom: 1.0_f64.max(config.min_zoom).min(config.max_zoom),
            ..Self::default()
        }
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom directly (clamped), without moving `pan`.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !zoom.is_finite() {
            log::warn!("Ignoring non-finite zoom {}", zoom);
            return;
        }
        self.zoom = self.clamp_zoom(zoom);
    }

    /// Clamp into the zoom bounds. Never panics, even on inverted bounds.
    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }

    /// World-to-viewport-local transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// Convert a screen point to world coordinates.
    ///
    /// `(screen - rect.origin - pan) / zoom`
    pub fn screen_to_world(&self, screen_point: Point, viewport_rect: Rect) -> Point {
        let local = screen_point - viewport_rect.origin().to_vec2();
        self.transform().inverse() * local
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point, viewport_rect: Rect) -> Point {
        self.transform() * world_point + viewport_rect.origin().to_vec2()
    }

    /// Pan by a screen-space delta. Sequential pans compose additively.
    pub fn pan(&mut self, delta: Vec2) {
        if !delta.is_finite() {
            log::warn!("Ignoring non-finite pan delta {:?}", delta);
            return;
        }
        self.pan += delta;
    }

    /// Change zoom by `delta`, keeping the world point under `anchor` fixed.
    ///
    /// `anchor` is relative to the canvas element's top-left corner.
    /// Returns false if the zoom was already at the clamped bound.
    pub fn zoom_by(&mut self, delta: f64, anchor: Point) -> bool {
        if !(delta.is_finite() && anchor.is_finite()) {
            log::warn!("Ignoring zoom by {} at {:?}", delta, anchor);
            return false;
        }
        let new_zoom = self.clamp_zoom(self.zoom + delta);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }

        let anchor = anchor.to_vec2();
        self.pan += -(anchor - self.pan) * ((new_zoom - self.zoom) / self.zoom);
        self.zoom = new_zoom;
        log::debug!(
            "Zoom {:.3} anchored at ({:.1}, {:.1})",
            self.zoom,
            anchor.x,
            anchor.y
        );
        true
    }

    /// Zoom in one step around the viewport center.
    pub fn zoom_in(&mut self, viewport_size: Size) -> bool {
        self.zoom_by(self.zoom_step, center_of(viewport_size))
    }

    /// Zoom out one step around the viewport center.
    pub fn zoom_out(&mut self, viewport_size: Size) -> bool {
        self.zoom_by(-self.zoom_step, center_of(viewport_size))
    }

    /// Apply a wheel event.
    ///
    /// Plain scroll pans vertically, shift+scroll pans horizontally and
    /// ctrl/cmd+scroll zooms around the pointer.
    pub fn handle_wheel(&mut self, event: &WheelEvent, viewport_rect: Rect) {
        let delta = if event.line_based {
            event.delta * self.scroll_line_height
        } else {
            event.delta
        };

        if event.modifiers.command() {
            if delta.y.abs() < f64::EPSILON {
                return;
            }
            let step = if delta.y < 0.0 { self.zoom_step } else { -self.zoom_step };
            let anchor = event.position - viewport_rect.origin().to_vec2();
            self.zoom_by(step, anchor);
        } else if event.modifiers.shift {
            // Vertical wheels report horizontal intent through shift.
            let amount = if delta.x.abs() > f64::EPSILON { delta.x } else { delta.y };
            self.pan(Vec2::new(-amount, 0.0));
        } else {
            self.pan(Vec2::new(0.0, -delta.y));
        }
    }

    /// Reset to the origin at 100%.
    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = self.clamp_zoom(1.0);
    }

    /// Fit the viewport to show the given world bounds.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport_size: Size, padding: f64) {
        if bounds.is_zero_area() || !bounds.is_finite() {
            self.reset();
            return;
        }

        let padded = Size::new(
            (viewport_size.width - padding * 2.0).max(1.0),
            (viewport_size.height - padding * 2.0).max(1.0),
        );
        let scale_x = padded.width / bounds.width();
        let scale_y = padded.height / bounds.height();
        self.zoom = self.clamp_zoom(scale_x.min(scale_y));

        let bounds_center = bounds.center();
        let viewport_center = center_of(viewport_size);
        self.pan = Vec2::new(
            viewport_center.x - bounds_center.x * self.zoom,
            viewport_center.y - bounds_center.y * self.zoom,
        );
    }
}

fn center_of(size: Size) -> Point {
    Point::new(size.width / 2.0, size.height / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    const EPS: f64 = 1e-9;

    fn rect() -> Rect {
        Rect::new(0.0, 0.0, 800.0, 600.0)
    }

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::new();
        assert_eq!(viewport.pan, Vec2::ZERO);
        assert!((viewport.zoom() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_rect_origin() {
        let mut viewport = Viewport::new();
        viewport.pan = Vec2::new(50.0, 100.0);
        viewport.set_zoom(2.0);
        let rect = Rect::new(10.0, 20.0, 810.0, 620.0);
        let world = viewport.screen_to_world(Point::new(160.0, 320.0), rect);
        assert!((world.x - 50.0).abs() < EPS);
        assert!((world.y - 100.0).abs() < EPS);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut viewport = Viewport::new();
        viewport.pan = Vec2::new(30.0, -20.0);
        viewport.set_zoom(1.5);
        let rect = Rect::new(5.0, 7.0, 805.0, 607.0);

        let original = Point::new(123.0, 456.0);
        let back = viewport.world_to_screen(viewport.screen_to_world(original, rect), rect);
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_by_shifts_pan_toward_anchor() {
        let mut viewport = Viewport::new();
        assert!(viewport.zoom_by(0.1, Point::new(100.0, 100.0)));
        assert!((viewport.zoom() - 1.1).abs() < EPS);
        assert!((viewport.pan.x + 10.0).abs() < EPS);
        assert!((viewport.pan.y + 10.0).abs() < EPS);
    }

    #[test]
    fn test_zoom_clamped_is_noop() {
        let mut viewport = Viewport::new();
        viewport.set_zoom(MAX_ZOOM);
        viewport.pan = Vec2::new(5.0, 5.0);
        assert!(!viewport.zoom_by(1.0, Point::new(300.0, 200.0)));
        assert_eq!(viewport.pan, Vec2::new(5.0, 5.0));
        assert!((viewport.zoom() - MAX_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_by_clamps_partial_step() {
        let mut viewport = Viewport::new();
        viewport.set_zoom(MIN_ZOOM + 0.05);
        viewport.zoom_by(-1.0, Point::ZERO);
        assert!((viewport.zoom() - MIN_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_finite_zoom_is_noop() {
        let mut viewport = Viewport::new();
        viewport.pan = Vec2::new(12.0, -4.0);
        for delta in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(!viewport.zoom_by(delta, Point::new(100.0, 100.0)));
        }
        assert!(!viewport.zoom_by(0.1, Point::new(f64::NAN, 0.0)));
        viewport.set_zoom(f64::NAN);

        assert!((viewport.zoom() - 1.0).abs() < f64::EPSILON);
        assert_eq!(viewport.pan, Vec2::new(12.0, -4.0));
    }

    #[test]
    fn test_non_finite_pan_is_noop() {
        let mut viewport = Viewport::new();
        viewport.pan(Vec2::new(f64::NAN, 3.0));
        assert_eq!(viewport.pan, Vec2::ZERO);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let config = CanvasConfig {
            min_zoom: 2.0,
            max_zoom: 1.0,
            ..CanvasConfig::default()
        };
        let viewport = Viewport::from_config(&config);
        assert!((viewport.min_zoom - MIN_ZOOM).abs() < f64::EPSILON);
        assert!((viewport.max_zoom - MAX_ZOOM).abs() < f64::EPSILON);
        assert!((viewport.zoom() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_inverted_bounds_do_not_panic() {
        let mut viewport = Viewport::new();
        viewport.min_zoom = 2.0;
        viewport.max_zoom = 1.0;
        viewport.set_zoom(1.5);
        viewport.zoom_by(0.1, Point::ZERO);
        viewport.reset();
        assert!(viewport.zoom().is_finite());
    }

    #[test]
    fn test_wheel_plain_scrolls_vertically() {
        let mut viewport = Viewport::new();
        let pointer = Point::new(10.0, 10.0);
        let event = WheelEvent::pixels(pointer, Vec2::new(0.0, 30.0), Modifiers::default());
        viewport.handle_wheel(&event, rect());
        assert_eq!(viewport.pan, Vec2::new(0.0, -30.0));
    }

    #[test]
    fn test_wheel_shift_scrolls_horizontally() {
        let mut viewport = Viewport::new();
        let modifiers = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        viewport.handle_wheel(
            &WheelEvent::pixels(Point::new(10.0, 10.0), Vec2::new(0.0, 30.0), modifiers),
            rect(),
        );
        assert_eq!(viewport.pan, Vec2::new(-30.0, 0.0));
    }

    #[test]
    fn test_wheel_ctrl_zooms_at_pointer() {
        let mut viewport = Viewport::new();
        let rect = Rect::new(100.0, 50.0, 900.0, 650.0);
        let pointer = Point::new(300.0, 250.0);
        let before = viewport.screen_to_world(pointer, rect);
        let modifiers = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        let event = WheelEvent::pixels(pointer, Vec2::new(0.0, -1.0), modifiers);
        viewport.handle_wheel(&event, rect);
        let after = viewport.screen_to_world(pointer, rect);
        assert!(viewport.zoom() > 1.0);
        assert!((before.x - after.x).abs() < EPS);
        assert!((before.y - after.y).abs() < EPS);
    }

    #[test]
    fn test_wheel_line_delta_scaled() {
        let mut viewport = Viewport::new();
        viewport.handle_wheel(
            &WheelEvent::lines(Point::ZERO, Vec2::new(0.0, 2.0), Modifiers::default()),
            rect(),
        );
        assert_eq!(viewport.pan, Vec2::new(0.0, -40.0));
    }

    #[test]
    fn test_zoom_in_out_use_center() {
        let mut viewport = Viewport::new();
        let size = Size::new(800.0, 600.0);
        let center = Point::new(400.0, 300.0);
        let before = viewport.screen_to_world(center, rect());
        viewport.zoom_in(size);
        viewport.zoom_out(size);
        viewport.zoom_in(size);
        let after = viewport.screen_to_world(center, rect());
        assert!((before.x - after.x).abs() < EPS);
        assert!((before.y - after.y).abs() < EPS);
    }

    #[test]
    fn test_fit_to_bounds_centers() {
        let mut viewport = Viewport::new();
        let bounds = Rect::new(0.0, 0.0, 400.0, 300.0);
        viewport.fit_to_bounds(bounds, Size::new(800.0, 600.0), 0.0);
        assert!((viewport.zoom() - 2.0).abs() < EPS);
        let center = viewport.world_to_screen(bounds.center(), rect());
        assert!((center.x - 400.0).abs() < EPS);
        assert!((center.y - 300.0).abs() < EPS);
    }

    #[test]
    fn test_reset() {
        let mut viewport = Viewport::new();
        viewport.pan(Vec2::new(3.0, 4.0));
        viewport.set_zoom(2.5);
        viewport.reset();
        assert_eq!(viewport.pan, Vec2::ZERO);
        assert!((viewport.zoom() - 1.0).abs() < f64::EPSILON);
    }
}
