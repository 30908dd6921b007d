//! Canonical JSON wire schema.
//!
//! These types mirror the exported document one-to-one. Reading is lenient:
//! unknown fields are ignored, cosmetic edge fields are regenerated, and
//! malformed positions or font sizes are read as "unset" instead of failing
//! the whole document.

use std::collections::HashMap;

use serde::{
    Deserialize, Deserializer, Serialize,
    de::IgnoredAny,
};

use crate::{
    model::{MindMap, Node},
    style::{NodeStyle, StyleDefaults},
};

/// Render kind written on every node.
pub const NODE_KIND: &str = "mindmap";

/// Render kind written on every edge.
pub const EDGE_KIND: &str = "bezier";

const EDGE_STROKE: &str = "#d9d9d9";

/// A whole mind map as `{ nodes, edges }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(rename = "type", default = "node_kind", skip_deserializing)]
    pub kind: String,
    #[serde(default)]
    pub data: NodeData,
    #[serde(default, deserialize_with = "lenient_position")]
    pub position: Option<PointRecord>,
    /// Side where outgoing edges leave the node.
    #[serde(
        rename = "sourcePosition",
        default,
        skip_deserializing,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_position: Option<String>,
    /// Side where incoming edges enter the node.
    #[serde(
        rename = "targetPosition",
        default,
        skip_deserializing,
        skip_serializing_if = "Option::is_none"
    )]
    pub target_position: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, alias = "isNotesCollapsed")]
    pub notes_collapsed: bool,
    #[serde(default, alias = "isCollapsed")]
    pub collapsed: bool,
    #[serde(default)]
    pub style: StyleRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_font_size"
    )]
    pub font_size: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default = "edge_kind", skip_deserializing)]
    pub kind: String,
    #[serde(default, skip_deserializing)]
    pub style: EdgeStyleRecord,
    #[serde(default, skip_deserializing)]
    pub marker_end: MarkerRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyleRecord {
    pub stroke: String,
    pub stroke_width: f32,
}

impl Default for EdgeStyleRecord {
    fn default() -> Self {
        Self {
            stroke: EDGE_STROKE.to_string(),
            stroke_width: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub width: f32,
    pub height: f32,
    pub color: String,
}

impl Default for MarkerRecord {
    fn default() -> Self {
        Self {
            kind: "arrowclosed".to_string(),
            width: 15.0,
            height: 15.0,
            color: EDGE_STROKE.to_string(),
        }
    }
}

fn node_kind() -> String {
    NODE_KIND.to_string()
}

fn edge_kind() -> String {
    EDGE_KIND.to_string()
}

impl EdgeRecord {
    /// An edge with the standard cosmetics.
    pub fn new(id: Option<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id,
            source: source.into(),
            target: target.into(),
            kind: edge_kind(),
            style: EdgeStyleRecord::default(),
            marker_end: MarkerRecord::default(),
        }
    }
}

impl StyleRecord {
    pub fn to_style(&self) -> NodeStyle {
        let mut style = NodeStyle::default();
        if let Some(color) = &self.background_color {
            style = style.with_background_color(color.clone());
        }
        if let Some(color) = &self.text_color {
            style = style.with_text_color(color.clone());
        }
        if let Some(size) = self.font_size {
            style = style.with_font_size(size);
        }
        style
    }
}

impl From<&NodeStyle> for StyleRecord {
    fn from(style: &NodeStyle) -> Self {
        Self {
            background_color: style.background_color().map(str::to_string),
            text_color: style.text_color().map(str::to_string),
            font_size: style.font_size(),
        }
    }
}

impl Document {
    /// Sets the edge attachment sides of every node.
    pub fn with_handles(mut self, source: &str, target: &str) -> Self {
        for node in &mut self.nodes {
            node.source_position = Some(source.to_string());
            node.target_position = Some(target.to_string());
        }
        self
    }

    /// Builds the export document of `map`. Every node style is written in
    /// full, with unset fields taken from `defaults`.
    pub fn from_map(map: &MindMap, defaults: &StyleDefaults) -> Self {
        let nodes = map
            .nodes()
            .map(|node| NodeRecord::from_node(node, defaults))
            .collect();
        let edges = map
            .edges()
            .map(|edge| {
                EdgeRecord::new(
                    Some(edge.id().to_string()),
                    edge.source().to_string(),
                    edge.target().to_string(),
                )
            })
            .collect();
        Self { nodes, edges }
    }
}

impl NodeRecord {
    fn from_node(node: &Node, defaults: &StyleDefaults) -> Self {
        let position = node.position();
        Self {
            id: node.id().to_string(),
            kind: node_kind(),
            data: NodeData {
                label: node.label().to_string(),
                notes: node.notes().to_string(),
                notes_collapsed: node.notes_collapsed(),
                collapsed: node.is_collapsed(),
                style: StyleRecord::from(&node.style().filled(defaults)),
            },
            position: Some(PointRecord {
                x: position.x(),
                y: position.y(),
            }),
            source_position: None,
            target_position: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl Scalar {
    fn finite_number(&self) -> Option<f32> {
        match self {
            Scalar::Number(value) if value.is_finite() => Some(*value as f32),
            _ => None,
        }
    }
}

fn lenient_position<'de, D>(deserializer: D) -> Result<Option<PointRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    // Only objects count; a derived struct would also accept `[x, y]`.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPosition {
        Point(HashMap<String, Scalar>),
        Other(IgnoredAny),
    }

    let point = match RawPosition::deserialize(deserializer)? {
        RawPosition::Point(fields) => {
            let coordinate = |key: &str| fields.get(key).and_then(Scalar::finite_number);
            coordinate("x")
                .zip(coordinate("y"))
                .map(|(x, y)| PointRecord { x, y })
        }
        RawPosition::Other(_) => None,
    };
    Ok(point)
}

/// Accepts `14`, `14.5`, `"14"` and `"14px"`.
fn lenient_font_size<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let size = match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(text)) => text
            .trim()
            .trim_end_matches("px")
            .parse::<f32>()
            .ok()
            .filter(|size| size.is_finite()),
        Some(scalar) => scalar.finite_number(),
        None => None,
    };
    Ok(size.filter(|size| *size > 0.0))
}
