//! Mind maps with automatic layout and JSON import.
//!
//! Maps are imported from any of three JSON shapes, laid out, edited through
//! explicit intents, and exported as canonical JSON.

pub mod config;
pub mod editor;
pub mod export;
pub mod layout;
pub mod mutation;
pub mod responder;
pub mod viewport;

mod error;

pub use mindmap_core::{color, document, error::GraphError, geometry, identifier, model, style};
pub use mindmap_ingest::{ErrorCode, IngestError, Shape};

pub use error::MindMapError;

use std::path::Path;

use log::{debug, info, trace};
use serde_json::Value;

use config::AppConfig;
use editor::Editor;
use export::Exporter;
use layout::{Algorithm, EngineBuilder};
use model::MindMap;

/// Builder for importing, laying out and exporting mind maps.
///
/// # Examples
///
/// ```rust
/// use mindmap::{MindMapBuilder, config::AppConfig};
///
/// let source = r#"{
///     "A": { "Previous": null, "Question": "Topic", "Answer": "" },
///     "B": { "Previous": "A", "Question": "Detail", "Answer": "" }
/// }"#;
///
/// let builder = MindMapBuilder::new(AppConfig::default());
/// let map = builder.import(source).expect("Failed to import");
/// assert_eq!(map.nodes_count(), 2);
///
/// let json = builder.export_json(&map).expect("Failed to export");
/// assert!(json.contains("\"nodes\""));
/// ```
#[derive(Default)]
pub struct MindMapBuilder {
    config: AppConfig,
}

impl MindMapBuilder {
    /// Create a new builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Layout, style and import settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Import a map from JSON text.
    ///
    /// Inputs without positions are laid out with the tree layout.
    /// Canonical documents keep their positions.
    ///
    /// # Errors
    ///
    /// Returns [`MindMapError::Ingest`], carrying `source`, if the text is
    /// not valid JSON or cannot be converted into a map.
    pub fn import(&self, source: &str) -> Result<MindMap, MindMapError> {
        info!("Importing mind map");
        let ingested = mindmap_ingest::parse(source, &self.config.ingest_options())
            .map_err(|err| MindMapError::new_ingest_error(err, source))?;
        self.place(ingested)
    }

    /// Import a map from an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`MindMapError::Ingest`] if the value cannot be converted.
    pub fn import_value(&self, value: &Value) -> Result<MindMap, MindMapError> {
        info!("Importing mind map from value");
        let ingested = mindmap_ingest::normalize(value, &self.config.ingest_options())
            .map_err(|err| MindMapError::new_ingest_error(err, value.to_string()))?;
        self.place(ingested)
    }

    /// Lay `map` out again with the layered layout. The root keeps its
    /// position.
    ///
    /// # Errors
    ///
    /// Returns [`MindMapError::Graph`] if the map has a cycle.
    pub fn relayout(&self, map: &mut MindMap) -> Result<(), MindMapError> {
        let layout = self.engines().engine(Algorithm::Layered).calculate(map)?;
        layout.apply_to(map);
        info!(placed = layout.len(); "Map laid out");
        Ok(())
    }

    /// Render `map` as canonical JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MindMapError::Export`] if serialization fails.
    pub fn export_json(&self, map: &MindMap) -> Result<String, MindMapError> {
        let document = export::document(map, &self.config);
        Ok(export::json::to_string(&document)?)
    }

    /// Write `map` as canonical JSON to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MindMapError::Export`] if the file cannot be written.
    pub fn write_json(&self, map: &MindMap, path: impl AsRef<Path>) -> Result<(), MindMapError> {
        let document = export::document(map, &self.config);
        let mut exporter = export::json::Json::new(path);
        exporter.export_document(&document)?;
        info!(path:? = exporter.path(); "Map exported");
        Ok(())
    }

    /// Start an editing session on a fresh map.
    pub fn editor(&self) -> Editor {
        Editor::new(self.config.clone())
    }

    /// Start an editing session on `map`.
    pub fn editor_for(&self, map: MindMap) -> Editor {
        Editor::with_map(self.config.clone(), map)
    }

    fn engines(&self) -> EngineBuilder {
        EngineBuilder::from_config(self.config.layout())
    }

    fn place(&self, ingested: mindmap_ingest::Ingested) -> Result<MindMap, MindMapError> {
        let (mut map, shape) = ingested.into_parts();
        debug!(shape:% = shape; "Input converted");

        layout::place_imported(&mut map, shape, &self.engines())?;

        info!(shape:% = shape, nodes = map.nodes_count(), edges = map.edges_count(); "Mind map imported");
        trace!(map:?; "Imported map");
        Ok(map)
    }
}
