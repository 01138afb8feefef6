//! Drag-and-drop placement of palette templates.

use crate::component::{Component, ComponentData, ComponentId};
use crate::config::MAX_DROP_JITTER;
use crate::host::CanvasHost;
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default maximum jitter per axis, in world units.
pub const DROP_JITTER: f64 = 10.0;

/// Why a drop produced nothing.
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("Drop carried no template payload")]
    MissingPayload,
    #[error("Malformed template payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Template payload has an empty type")]
    EmptyType,
}

/// Default content carried by a palette template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultProps {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub url: Option<String>,
    pub status: Option<String>,
    pub properties: serde_json::Map<String, serde_json::Value>,
}

/// Payload set on the drag channel when a palette item is dragged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePayload {
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub default_props: DefaultProps,
}

impl TemplatePayload {
    /// Parse the raw drag payload.
    pub fn parse(raw: Option<&str>) -> Result<Self, PlacementError> {
        let raw = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(PlacementError::MissingPayload)?;
        let payload: Self = serde_json::from_str(raw)?;
        if payload.component_type.trim().is_empty() {
            return Err(PlacementError::EmptyType);
        }
        Ok(payload)
    }

    /// Component content seeded from the template defaults.
    pub fn component_data(&self) -> ComponentData {
        let props = &self.default_props;
        let title = props
            .title
            .clone()
            .or_else(|| self.label.clone())
            .unwrap_or_else(|| self.component_type.clone());
        ComponentData {
            title,
            description: props.description.clone().unwrap_or_default(),
            image: props.image.clone(),
            url: props.url.clone(),
            status: props.status.clone(),
            properties: props.properties.clone(),
        }
    }
}

/// Turns dropped templates into new components.
#[derive(Debug, Clone)]
pub struct DragPlacementController {
    rng: StdRng,
    /// Maximum random offset per axis.
    pub jitter: f64,
}

impl Default for DragPlacementController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragPlacementController {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            jitter: DROP_JITTER,
        }
    }

    /// Deterministic jitter, for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            jitter: DROP_JITTER,
        }
    }

    /// Handle a drop at `screen_point`.
    ///
    /// `viewport_rect` must be measured at drop time. Missing or malformed
    /// payloads are logged and ignored.
    pub fn drop_payload(
        &mut self,
        payload: Option<&str>,
        screen_point: Point,
        viewport_rect: Rect,
        viewport: &Viewport,
        host: &mut dyn CanvasHost,
    ) -> Option<ComponentId> {
        let template = match TemplatePayload::parse(payload) {
            Ok(template) => template,
            Err(e) => {
                log::warn!("Ignoring drop: {}", e);
                return None;
            }
        };
        let world_point = viewport.screen_to_world(screen_point, viewport_rect);
        Some(self.place(&template, world_point, host))
    }

    /// Create a component from `template` near `world_point` and hand it to the host.
    pub fn place(
        &mut self,
        template: &TemplatePayload,
        world_point: Point,
        host: &mut dyn CanvasHost,
    ) -> ComponentId {
        let position = world_point + self.jitter_offset();
        let component = Component::new(
            template.component_type.as_str(),
            position,
            template.component_data(),
        );
        let id = component.id.clone();
        log::info!(
            "Placed {} ({:?}) at ({:.1}, {:.1})",
            component.component_type,
            component.kind,
            position.x,
            position.y
        );
        host.on_component_add(component);
        id
    }

    fn jitter_offset(&mut self) -> Vec2 {
        if !(self.jitter.is_finite() && self.jitter > 0.0) {
            return Vec2::ZERO;
        }
        let jitter = self.jitter.min(MAX_DROP_JITTER);
        Vec2::new(
            self.rng.gen_range(-jitter..=jitter),
            self.rng.gen_range(-jitter..=jitter),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;
    use crate::host::RecordingHost;

    fn rect() -> Rect {
        Rect::new(0.0, 0.0, 800.0, 600.0)
    }

    #[test]
    fn test_drop_minimal_payload() {
        let mut host = RecordingHost::default();
        let mut placement = DragPlacementController::with_seed(7);
        let id = placement.drop_payload(
            Some(r#"{"type":"rectangle"}"#),
            Point::new(150.0, 150.0),
            rect(),
            &Viewport::new(),
            &mut host,
        );

        assert!(id.is_some());
        let component = &host.added_components[0];
        assert_eq!(Some(&component.id), id.as_ref());
        assert_eq!(component.kind, ComponentKind::Shape);
        assert_eq!(component.data.title, "rectangle");
        assert!((component.position.x - 150.0).abs() <= DROP_JITTER);
        assert!((component.position.y - 150.0).abs() <= DROP_JITTER);
    }

    #[test]
    fn test_drop_uses_current_viewport() {
        let mut host = RecordingHost::default();
        let mut placement = DragPlacementController::with_seed(1);
        placement.jitter = 0.0;
        let mut viewport = Viewport::new();
        viewport.pan(Vec2::new(100.0, 50.0));
        viewport.set_zoom(2.0);
        let rect = Rect::new(20.0, 10.0, 820.0, 610.0);

        placement.drop_payload(
            Some(r#"{"type":"landing-page","label":"Landing","defaultProps":{"status":"draft"}}"#),
            Point::new(320.0, 260.0),
            rect,
            &viewport,
            &mut host,
        );

        let component = &host.added_components[0];
        assert_eq!(component.position, Point::new(100.0, 100.0));
        assert_eq!(component.kind, ComponentKind::Page);
        assert_eq!(component.data.title, "Landing");
        assert_eq!(component.data.status.as_deref(), Some("draft"));
    }

    #[test]
    fn test_missing_payload_is_noop() {
        let mut host = RecordingHost::default();
        let mut placement = DragPlacementController::new();
        for payload in [None, Some(""), Some("   ")] {
            let viewport = Viewport::new();
            let id = placement.drop_payload(payload, Point::ZERO, rect(), &viewport, &mut host);
            assert!(id.is_none());
        }
        assert!(host.added_components.is_empty());
    }

    #[test]
    fn test_malformed_payload_is_noop() {
        let mut host = RecordingHost::default();
        let mut placement = DragPlacementController::new();
        let payloads = [
            "{not json",
            r#"{"label":"no type"}"#,
            r#"{"type":""}"#,
            "[1,2]",
        ];
        for payload in payloads {
            let viewport = Viewport::new();
            let id =
                placement.drop_payload(Some(payload), Point::ZERO, rect(), &viewport, &mut host);
            assert!(id.is_none());
        }
        assert!(host.added_components.is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            TemplatePayload::parse(None),
            Err(PlacementError::MissingPayload)
        ));
        assert!(matches!(
            TemplatePayload::parse(Some("nope")),
            Err(PlacementError::Malformed(_))
        ));
        assert!(matches!(
            TemplatePayload::parse(Some(r#"{"type":"  "}"#)),
            Err(PlacementError::EmptyType)
        ));
    }

    #[test]
    fn test_unusable_jitter_never_panics() {
        for jitter in [1e308, f64::INFINITY, f64::NAN, -5.0] {
            let mut host = RecordingHost::default();
            let mut placement = DragPlacementController::with_seed(11);
            placement.jitter = jitter;
            let template = TemplatePayload::parse(Some(r#"{"type":"wait"}"#)).unwrap();
            placement.place(&template, Point::new(10.0, 10.0), &mut host);

            let position = host.added_components[0].position;
            assert!(position.x.is_finite() && position.y.is_finite());
            assert!((position.x - 10.0).abs() <= MAX_DROP_JITTER);
            assert!((position.y - 10.0).abs() <= MAX_DROP_JITTER);
        }
    }

    #[test]
    fn test_repeated_drops_get_distinct_ids() {
        let mut host = RecordingHost::default();
        let mut placement = DragPlacementController::with_seed(3);
        for _ in 0..5 {
            placement.drop_payload(
                Some(r#"{"type":"wait"}"#),
                Point::new(10.0, 10.0),
                rect(),
                &Viewport::new(),
                &mut host,
            );
        }
        let mut ids: Vec<_> = host.added_components.iter().map(|c| c.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }
}
