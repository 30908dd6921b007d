//! Import of the canonical `{ nodes, edges }` document.
//!
//! The document is taken as-is with light repair: invalid positions become the
//! origin, invalid colors are dropped, and every style is filled from the
//! defaults. Positions are kept; no layout is run.

use std::collections::HashSet;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use mindmap_core::{
    document::{Document, NodeRecord},
    geometry::Point,
    identifier::Id,
    model::{Edge, MindMap, Node, ROOT_ID},
};

use crate::{IngestOptions, error::IngestError, fields};

pub(crate) fn convert(value: &Value, options: &IngestOptions) -> Result<MindMap, IngestError> {
    let document = Document::deserialize(value)?;
    debug!(
        nodes = document.nodes.len(),
        edges = document.edges.len();
        "Converting canonical document"
    );

    let nodes: Vec<Node> = document
        .nodes
        .iter()
        .map(|record| convert_node(record, options))
        .collect();

    let edges: Vec<Edge> = document
        .edges
        .iter()
        .map(|record| {
            let source = Id::new(&record.source);
            let target = Id::new(&record.target);
            match &record.id {
                Some(id) => Edge::with_id(Id::new(id), source, target),
                None => Edge::new(source, target),
            }
        })
        .collect();

    let root = find_root(&nodes, &edges)?;
    debug!(root:% = root; "Selected root");
    Ok(MindMap::from_parts(root, nodes, edges)?)
}

fn convert_node(record: &NodeRecord, options: &IngestOptions) -> Node {
    let position = match record.position {
        Some(point) => Point::new(point.x, point.y),
        None => {
            warn!(node = record.id.as_str(); "Missing or invalid position, using the origin");
            Point::default()
        }
    };
    let data = &record.data;

    Node::new(Id::new(&record.id), data.label.clone())
        .with_notes(data.notes.clone())
        .with_notes_collapsed(data.notes_collapsed)
        .with_collapsed(data.collapsed)
        .with_style(fields::sanitize_style(&record.id, &data.style, options.style()))
        .with_position(position)
}

/// The node named [`ROOT_ID`] if it has no parent, else the first parentless
/// node.
fn find_root(nodes: &[Node], edges: &[Edge]) -> Result<Id, IngestError> {
    let targets: HashSet<Id> = edges.iter().map(Edge::target).collect();
    let mut candidates = nodes
        .iter()
        .map(Node::id)
        .filter(|id| !targets.contains(id))
        .peekable();

    let first = candidates.peek().copied();
    if let Some(root) = candidates.find(|id| *id == ROOT_ID) {
        return Ok(root);
    }
    first.ok_or(IngestError::NoRootFound { candidates: vec![] })
}
