//! # Mind Map Ingest
//!
//! Shape detection and normalization of externally supplied, tree-shaped JSON
//! into the canonical [`MindMap`] model.
//!
//! Three input shapes are recognized, checked in this order:
//!
//! 1. **Canonical** - the exported `{ nodes, edges }` document
//! 2. **Linked-record** - records pointing to their parent via `Previous`
//! 3. **Freeform** - any other object, converted best-effort (can be disabled)
//!
//! ## Usage
//!
//! ```
//! # use mindmap_ingest::{parse, IngestError, IngestOptions, Shape};
//!
//! fn main() -> Result<(), IngestError> {
//!     let source = r#"{
//!         "A": { "Previous": null, "Question": "Topic", "Answer": "" },
//!         "B": { "Previous": "A", "Question": "Detail", "Answer": "More" }
//!     }"#;
//!
//!     let ingested = parse(source, &IngestOptions::default())?;
//!     assert_eq!(ingested.shape(), Shape::LinkedRecord);
//!     assert_eq!(ingested.map().nodes_count(), 2);
//!     Ok(())
//! }
//! ```

mod canonical;
mod detect;
pub mod error;
mod fields;
mod freeform;
mod linked;

pub use detect::Shape;
pub use error::{ErrorCode, IngestError};

use log::{info, trace};
use serde_json::Value;

use mindmap_core::{model::MindMap, style::StyleDefaults};

/// Options for the normalization pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOptions {
    allow_freeform: bool,
    depth_styling: bool,
    style: StyleDefaults,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            allow_freeform: true,
            depth_styling: true,
            style: StyleDefaults::default(),
        }
    }
}

impl IngestOptions {
    /// Creates a new set of options.
    ///
    /// # Arguments
    ///
    /// * `allow_freeform` - Whether objects of unknown shape are converted
    ///   best-effort instead of rejected.
    /// * `depth_styling` - Whether linked-record imports theme the root and
    ///   its direct children.
    /// * `style` - Fallbacks for unset style fields.
    pub fn new(allow_freeform: bool, depth_styling: bool, style: StyleDefaults) -> Self {
        Self {
            allow_freeform,
            depth_styling,
            style,
        }
    }

    pub fn allow_freeform(&self) -> bool {
        self.allow_freeform
    }

    pub fn depth_styling(&self) -> bool {
        self.depth_styling
    }

    pub fn style(&self) -> &StyleDefaults {
        &self.style
    }
}

/// A converted map and the shape it was detected as.
#[derive(Debug, Clone)]
pub struct Ingested {
    map: MindMap,
    shape: Shape,
}

impl Ingested {
    pub fn map(&self) -> &MindMap {
        &self.map
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn into_parts(self) -> (MindMap, Shape) {
        (self.map, self.shape)
    }
}

/// Parse JSON text and normalize it into a mind map.
///
/// # Errors
///
/// Returns [`IngestError::Json`] for invalid JSON, and any error of
/// [`normalize`] otherwise.
pub fn parse(source: &str, options: &IngestOptions) -> Result<Ingested, IngestError> {
    let value: Value = serde_json::from_str(source)?;
    normalize(&value, options)
}

/// Normalize parsed JSON into a mind map.
///
/// Positions are kept for canonical input. Other shapes carry no positions;
/// [`Shape::needs_layout`] tells the caller to lay the result out.
///
/// # Errors
///
/// Returns [`IngestError::UnrecognizedFormat`] for non-object input (or for
/// freeform input when it is disabled) and a structural error when the
/// converted graph is invalid. Nothing is returned on failure.
pub fn normalize(value: &Value, options: &IngestOptions) -> Result<Ingested, IngestError> {
    let Some(object) = value.as_object() else {
        return Err(IngestError::UnrecognizedFormat(format!(
            "expected a JSON object, found {}",
            fields::json_kind(value)
        )));
    };

    let shape = detect::detect(object);
    info!(shape:% = shape; "Detected input shape");

    let map = match shape {
        Shape::Canonical => canonical::convert(value, options)?,
        Shape::LinkedRecord => linked::convert(object, options)?,
        Shape::Freeform if !options.allow_freeform() => {
            return Err(IngestError::UnrecognizedFormat(
                "object has no known mind map shape and freeform import is disabled".to_string(),
            ));
        }
        Shape::Freeform => freeform::convert(object, options)?,
    };

    info!(nodes = map.nodes_count(), edges = map.edges_count(); "Normalized input");
    trace!(map:?; "Normalized mind map");
    Ok(Ingested { map, shape })
}
