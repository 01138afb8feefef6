//! Multi-component funnel templates applied in one step.

use crate::component::{Component, Connection, ConnectionStyle};
use crate::placement::DefaultProps;
use crate::placement::TemplatePayload;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Template validation errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Invalid template JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Edge {edge} references missing node {node}")]
    MissingNode { edge: usize, node: usize },
    #[error("Edge {0} connects a node to itself")]
    SelfLoop(usize),
}

/// One component of a template, positioned relative to the template origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateNode {
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub offset: Vec2,
    #[serde(default)]
    pub default_props: DefaultProps,
}

/// A directed edge between two template nodes, by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEdge {
    pub from: usize,
    pub to: usize,
    #[serde(default)]
    pub style: ConnectionStyle,
}

/// A reusable funnel layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelTemplate {
    pub name: String,
    pub nodes: Vec<TemplateNode>,
    #[serde(default)]
    pub edges: Vec<TemplateEdge>,
}

impl FunnelTemplate {
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let template: Self = serde_json::from_str(json)?;
        template.validate()?;
        Ok(template)
    }

    /// Check that every edge joins two distinct existing nodes.
    pub fn validate(&self) -> Result<(), TemplateError> {
        for (index, edge) in self.edges.iter().enumerate() {
            for node in [edge.from, edge.to] {
                if node >= self.nodes.len() {
                    return Err(TemplateError::MissingNode { edge: index, node });
                }
            }
            if edge.from == edge.to {
                return Err(TemplateError::SelfLoop(index));
            }
        }
        Ok(())
    }

    /// Build fresh components and connections with the template placed at `origin`.
    pub fn instantiate(
        &self,
        origin: Point,
    ) -> Result<(Vec<Component>, Vec<Connection>), TemplateError> {
        self.validate()?;

        let components: Vec<Component> = self
            .nodes
            .iter()
            .map(|node| {
                let payload = TemplatePayload {
                    component_type: node.component_type.clone(),
                    label: node.label.clone(),
                    default_props: node.default_props.clone(),
                };
                Component::new(
                    node.component_type.as_str(),
                    origin + node.offset,
                    payload.component_data(),
                )
            })
            .collect();

        let connections = self
            .edges
            .iter()
            .map(|edge| {
                let mut connection = Connection::new(
                    components[edge.from].id.as_str(),
                    components[edge.to].id.as_str(),
                );
                connection.style = edge.style.clone();
                connection
            })
            .collect();

        Ok((components, connections))
    }
}
