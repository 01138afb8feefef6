//! Funnel components, connections and their update intents.

use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique identifier for a component.
pub type ComponentId = String;

/// Unique identifier for a connection.
pub type ConnectionId = String;

/// Traffic sources feeding a funnel.
const SOURCE_TYPES: &[&str] = &[
    "facebook-ads",
    "google-ads",
    "instagram-ads",
    "tiktok-ads",
    "youtube-ads",
    "linkedin-ads",
    "email-campaign",
    "organic-search",
    "social-media",
    "referral",
    "affiliate",
    "direct-traffic",
];

/// Pages a visitor lands on.
const PAGE_TYPES: &[&str] = &[
    "landing-page",
    "opt-in-page",
    "sales-page",
    "order-form",
    "checkout",
    "upsell",
    "downsell",
    "thank-you",
    "webinar",
    "membership",
    "blog-post",
    "video-page",
];

/// Automations triggered along the funnel.
const ACTION_TYPES: &[&str] = &[
    "send-email",
    "send-sms",
    "add-tag",
    "remove-tag",
    "wait",
    "condition",
    "webhook",
    "notify",
    "purchase",
    "form-submit",
];

/// Generate a fresh id of the form `<prefix>-<millis>-<suffix>`.
///
/// Uniqueness is probabilistic (timestamp plus a random suffix), which is
/// enough within a single editing session.
pub fn generate_id(prefix: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", prefix, millis, &suffix[..9])
}

/// Category of a component, resolved once from its type string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Where traffic comes from (ads, email, organic).
    Source,
    /// A page in the funnel.
    Page,
    /// An automation step.
    Action,
    /// Anything else, e.g. plain diagram shapes.
    #[default]
    Shape,
}

impl ComponentKind {
    /// Resolve the kind for a component type string.
    pub fn from_type(component_type: &str) -> Self {
        let normalized = component_type.trim().to_ascii_lowercase();
        let normalized = normalized.as_str();
        if SOURCE_TYPES.contains(&normalized) {
            ComponentKind::Source
        } else if PAGE_TYPES.contains(&normalized) {
            ComponentKind::Page
        } else if ACTION_TYPES.contains(&normalized) {
            ComponentKind::Action
        } else {
            ComponentKind::Shape
        }
    }

    /// Default on-canvas size for freshly placed components of this kind.
    pub fn default_size(self) -> Size {
        match self {
            ComponentKind::Source => Size::new(180.0, 80.0),
            ComponentKind::Page => Size::new(200.0, 240.0),
            ComponentKind::Action => Size::new(160.0, 70.0),
            ComponentKind::Shape => Size::new(120.0, 120.0),
        }
    }
}

/// User-facing content of a component. Opaque to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentData {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub url: Option<String>,
    pub status: Option<String>,
    pub properties: serde_json::Map<String, serde_json::Value>,
}

/// A component placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ComponentRecord")]
pub struct Component {
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub component_type: String,
    /// Resolved from `component_type`; never re-derived after construction.
    pub kind: ComponentKind,
    /// Top-left corner in world coordinates.
    pub position: Point,
    pub size: Size,
    pub data: ComponentData,
}

/// Wire form of a component. The kind is recomputed on ingestion.
#[derive(Deserialize)]
struct ComponentRecord {
    id: ComponentId,
    #[serde(rename = "type")]
    component_type: String,
    position: Point,
    size: Option<Size>,
    #[serde(default)]
    data: ComponentData,
}

impl From<ComponentRecord> for Component {
    fn from(record: ComponentRecord) -> Self {
        let kind = ComponentKind::from_type(&record.component_type);
        Self {
            id: record.id,
            component_type: record.component_type,
            kind,
            position: record.position,
            size: record.size.unwrap_or_else(|| kind.default_size()),
            data: record.data,
        }
    }
}

impl Component {
    /// Create a component with a fresh id and the default size for its kind.
    pub fn new(component_type: impl Into<String>, position: Point, data: ComponentData) -> Self {
        let component_type = component_type.into();
        let kind = ComponentKind::from_type(&component_type);
        Self {
            id: generate_id("component"),
            component_type,
            kind,
            position,
            size: kind.default_size(),
            data,
        }
    }

    /// Create a component with an explicit id.
    pub fn with_id(
        id: impl Into<ComponentId>,
        component_type: impl Into<String>,
        position: Point,
    ) -> Self {
        let mut component = Self::new(component_type, position, ComponentData::default());
        component.id = id.into();
        component
    }

    /// Clone this component under a fresh id, shifted by `offset`.
    pub fn duplicate(&self, offset: Vec2) -> Self {
        let mut copy = self.clone();
        copy.id = generate_id("component");
        copy.position += offset;
        copy
    }

    /// Center of the component in world coordinates.
    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.size.width / 2.0,
            self.position.y + self.size.height / 2.0,
        )
    }

    /// World-space bounds.
    pub fn bounds(&self) -> kurbo::Rect {
        kurbo::Rect::from_origin_size(self.position, self.size)
    }
}

/// Partial update to a component, as sent to the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentUpdate {
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub data: Option<ComponentData>,
}

impl ComponentUpdate {
    /// Update that only moves the component.
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Apply the update in place.
    pub fn apply(&self, component: &mut Component) {
        if let Some(position) = self.position {
            component.position = position;
        }
        if let Some(size) = self.size {
            component.size = size;
        }
        if let Some(data) = &self.data {
            component.data = data.clone();
        }
    }
}

/// Stroke pattern of a connection line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Visual style of a connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionStyle {
    pub line: LineStyle,
    /// CSS-style color string.
    pub color: String,
    pub animated: bool,
    pub label: Option<String>,
}

impl Default for ConnectionStyle {
    fn default() -> Self {
        Self {
            line: LineStyle::Solid,
            color: "#64748b".to_string(),
            animated: false,
            label: None,
        }
    }
}

/// A directed edge between two components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub from_component_id: ComponentId,
    pub to_component_id: ComponentId,
    #[serde(default)]
    pub style: ConnectionStyle,
}

impl Connection {
    /// Create a connection with a fresh id and default style.
    pub fn new(from: impl Into<ComponentId>, to: impl Into<ComponentId>) -> Self {
        Self {
            id: generate_id("connection"),
            from_component_id: from.into(),
            to_component_id: to.into(),
            style: ConnectionStyle::default(),
        }
    }

    /// Check whether the connection touches the given component.
    pub fn touches(&self, id: &str) -> bool {
        self.from_component_id == id || self.to_component_id == id
    }
}

/// Partial update to a connection, as sent to the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionUpdate {
    pub style: Option<ConnectionStyle>,
}

impl ConnectionUpdate {
    /// Apply the update in place.
    pub fn apply(&self, connection: &mut Connection) {
        if let Some(style) = &self.style {
            connection.style = style.clone();
        }
    }
}
