//! Shape detection for incoming JSON objects.

use std::fmt;

use serde_json::{Map, Value};

/// The shape an input object was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `{ nodes: [...], edges: [...] }` with `id`/`data` node objects.
    Canonical,
    /// `{ key: { Previous, Question, Answer }, ... }`.
    LinkedRecord,
    /// Any other object, converted best-effort.
    Freeform,
}

impl Shape {
    /// Linked-record and freeform inputs carry no positions and must be laid
    /// out after conversion.
    pub fn needs_layout(self) -> bool {
        !matches!(self, Shape::Canonical)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Canonical => "canonical",
            Shape::LinkedRecord => "linked-record",
            Shape::Freeform => "freeform",
        };
        write!(f, "{name}")
    }
}

/// Classifies `object`. The first matching shape wins, in the order
/// canonical, linked-record, freeform.
pub(crate) fn detect(object: &Map<String, Value>) -> Shape {
    if is_canonical(object) {
        Shape::Canonical
    } else if is_linked_record(object) {
        Shape::LinkedRecord
    } else {
        Shape::Freeform
    }
}

fn is_canonical(object: &Map<String, Value>) -> bool {
    match (object.get("nodes"), object.get("edges")) {
        (Some(Value::Array(nodes)), Some(Value::Array(_))) => nodes.iter().all(|node| {
            node.as_object()
                .is_some_and(|node| node.contains_key("id") && node.contains_key("data"))
        }),
        _ => false,
    }
}

/// Only the first entry is inspected.
fn is_linked_record(object: &Map<String, Value>) -> bool {
    object
        .values()
        .next()
        .and_then(Value::as_object)
        .is_some_and(|first| first.contains_key("Previous"))
}
