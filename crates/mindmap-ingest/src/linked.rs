//! Import of linked-record maps.
//!
//! Each record names its parent through `Previous`; exactly one record has a
//! `null` parent and becomes the root. Records carry a question (the label)
//! and an answer (the notes).

use std::collections::HashSet;

use log::{debug, warn};
use serde_json::{Map, Value};

use mindmap_core::{
    identifier::Id,
    model::{Edge, MindMap, Node, ROOT_POSITION},
    style::NodeStyle,
};

use crate::{IngestOptions, error::IngestError, fields};

/// Label given to a root record without a question.
const ROOT_LABEL: &str = "Root";

/// One record, decoded.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LinkedRecord {
    pub key: String,
    pub parent: Option<String>,
    pub question: String,
    pub answer: String,
}

pub(crate) fn convert(
    object: &Map<String, Value>,
    options: &IngestOptions,
) -> Result<MindMap, IngestError> {
    let records: Vec<LinkedRecord> = object
        .iter()
        .filter_map(|(key, value)| decode(key, value))
        .collect();
    debug!(records = records.len(), skipped = object.len() - records.len(); "Decoded linked records");
    assemble(records, options, options.depth_styling())
}

fn decode(key: &str, value: &Value) -> Option<LinkedRecord> {
    let Some(record) = value.as_object() else {
        warn!(record = key; "Skipping record that is not an object");
        return None;
    };
    let parent = match record.get("Previous") {
        Some(Value::Null) => None,
        Some(Value::String(parent)) if !parent.is_empty() => Some(parent.clone()),
        _ => {
            warn!(record = key; "Skipping record without a usable `Previous` field");
            return None;
        }
    };
    Some(LinkedRecord {
        key: key.to_string(),
        parent,
        question: fields::first_text(value, &["Question"]).unwrap_or_default(),
        answer: record
            .get("Answer")
            .filter(|answer| !answer.is_null())
            .map(fields::string_or_json)
            .unwrap_or_default(),
    })
}

/// Builds the map from decoded records, in record order.
///
/// Nodes get collapsed notes and, with `depth_styling`, the root and branch
/// themes for depths zero and one. The root sits at [`ROOT_POSITION`]; all
/// other positions are left for the tree layout.
pub(crate) fn assemble(
    records: Vec<LinkedRecord>,
    options: &IngestOptions,
    depth_styling: bool,
) -> Result<MindMap, IngestError> {
    let candidates: Vec<&LinkedRecord> = records
        .iter()
        .filter(|record| record.parent.is_none())
        .collect();
    let [root_record] = candidates.as_slice() else {
        return Err(IngestError::NoRootFound {
            candidates: candidates.iter().map(|record| record.key.clone()).collect(),
        });
    };
    let root_key = root_record.key.clone();

    let keys: HashSet<&str> = records.iter().map(|record| record.key.as_str()).collect();
    let dangling = records.iter().find_map(|record| {
        let parent = record.parent.as_deref()?;
        (!keys.contains(parent)).then(|| (record.key.clone(), parent.to_string()))
    });
    if let Some((record, parent)) = dangling {
        return Err(IngestError::DanglingEdge { record, parent });
    }

    let mut nodes = Vec::with_capacity(records.len());
    let mut edges = Vec::with_capacity(records.len().saturating_sub(1));
    for record in records {
        let id = Id::new(&record.key);
        let is_root = record.key == root_key;

        let label = match (record.question.is_empty(), is_root) {
            (false, _) => record.question,
            (true, true) => ROOT_LABEL.to_string(),
            (true, false) => record.key.clone(),
        };

        let theme = match (depth_styling, is_root, record.parent.as_deref()) {
            (false, _, _) => NodeStyle::default(),
            (true, true, _) => NodeStyle::root_theme(),
            (true, false, Some(parent)) if parent == root_key => NodeStyle::branch_theme(),
            (true, false, _) => NodeStyle::default(),
        };

        let mut node = Node::new(id, label)
            .with_notes(record.answer)
            .with_notes_collapsed(true)
            .with_style(theme.filled(options.style()));
        if is_root {
            node = node.with_position(ROOT_POSITION);
        }
        nodes.push(node);

        if let Some(parent) = &record.parent {
            edges.push(Edge::new(Id::new(parent), id));
        }
    }

    Ok(MindMap::from_parts(Id::new(&root_key), nodes, edges)?)
}
