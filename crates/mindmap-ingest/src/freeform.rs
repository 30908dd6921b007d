//! Best-effort import of objects with no known shape.
//!
//! A synthetic root is created and every top-level entry becomes one child
//! of it. Labels and notes are taken from the first usable candidate field.
//! This never fails on an object input.

use log::debug;
use serde_json::{Map, Value};

use mindmap_core::model::MindMap;

use crate::{
    IngestOptions,
    error::IngestError,
    fields,
    linked::{self, LinkedRecord},
};

/// Key and label of the synthetic root. An input entry with this key is
/// skipped.
const ROOT_KEY: &str = "Root";

pub(crate) fn convert(
    object: &Map<String, Value>,
    options: &IngestOptions,
) -> Result<MindMap, IngestError> {
    let mut records = vec![LinkedRecord {
        key: ROOT_KEY.to_string(),
        parent: None,
        question: ROOT_KEY.to_string(),
        answer: String::new(),
    }];

    // The index counts every entry, including a skipped `Root` entry.
    for (index, (key, value)) in object.iter().enumerate() {
        if key == ROOT_KEY {
            continue;
        }
        records.push(LinkedRecord {
            key: format!("Node_{index}"),
            parent: Some(ROOT_KEY.to_string()),
            question: fields::first_text(value, &["title", "question"])
                .unwrap_or_else(|| key.clone()),
            answer: fields::first_text(value, &["content", "answer"])
                .unwrap_or_else(|| fields::string_or_json(value)),
        });
    }
    debug!(children = records.len() - 1; "Synthesized freeform records");

    linked::assemble(records, options, false)
}
