//! Configuration types for mind map layout, styling and import.
//!
//! This module provides configuration structures that control how maps are
//! laid out, styled and imported. All types implement [`serde::Deserialize`]
//! with defaults on every field, so a partial configuration file is valid.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Direction and spacing of both layout algorithms.
//! - [`StyleConfig`] - Default node style, font size steps and the palette.
//! - [`IngestConfig`] - Import behavior for inputs of unknown shape.
//!
//! # Example
//!
//! ```
//! # use mindmap::config::AppConfig;
//! // Use default configuration
//! let config = AppConfig::default();
//! assert!(config.style().validate().is_ok());
//! assert_eq!(config.layout().layered().node_separation(), 150.0);
//! ```

use serde::Deserialize;

use mindmap_core::{color::Color, geometry::Point, style::StyleDefaults};
use mindmap_ingest::IngestOptions;

use crate::layout::Direction;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Import configuration section.
    #[serde(default)]
    ingest: IngestConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    ///
    /// # Arguments
    ///
    /// * `layout` - Layout direction and spacing.
    /// * `style` - Node styling defaults.
    /// * `ingest` - Import behavior.
    pub fn new(layout: LayoutConfig, style: StyleConfig, ingest: IngestConfig) -> Self {
        Self {
            layout,
            style,
            ingest,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the import configuration.
    pub fn ingest(&self) -> &IngestConfig {
        &self.ingest
    }

    /// Options handed to the import pipeline.
    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions::new(
            self.ingest.allow_freeform,
            self.style.depth_styling,
            self.style.defaults(),
        )
    }
}

/// Layout direction and the spacing of both layout algorithms.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LayoutConfig {
    /// Direction in which children grow away from their parent.
    #[serde(default)]
    direction: Direction,

    /// Layered layout, used after edits.
    #[serde(default)]
    layered: LayeredConfig,

    /// Tree layout, used after importing shapes without positions.
    #[serde(default)]
    tree: TreeConfig,
}

impl LayoutConfig {
    pub fn new(direction: Direction, layered: LayeredConfig, tree: TreeConfig) -> Self {
        Self {
            direction,
            layered,
            tree,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn layered(&self) -> &LayeredConfig {
        &self.layered
    }

    pub fn tree(&self) -> &TreeConfig {
        &self.tree
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

/// Spacing and node size estimates for the layered layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayeredConfig {
    node_separation: f32,
    rank_separation: f32,
    edge_separation: f32,
    node_width: f32,
    node_height: f32,
    notes_height_cap: f32,
    isolated_offset: f32,
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self {
            node_separation: 150.0,
            rank_separation: 200.0,
            edge_separation: 80.0,
            node_width: 200.0,
            node_height: 50.0,
            notes_height_cap: 200.0,
            isolated_offset: 200.0,
        }
    }
}

impl LayeredConfig {
    /// Minimum gap between two nodes of the same rank.
    pub fn node_separation(&self) -> f32 {
        self.node_separation
    }

    /// Minimum gap between two consecutive ranks.
    pub fn rank_separation(&self) -> f32 {
        self.rank_separation
    }

    /// Extra gap between neighbors of the same rank with different parents.
    pub fn edge_separation(&self) -> f32 {
        self.edge_separation
    }

    pub fn node_width(&self) -> f32 {
        self.node_width
    }

    pub fn node_height(&self) -> f32 {
        self.node_height
    }

    /// Upper bound on the extra height of a node showing its notes.
    pub fn notes_height_cap(&self) -> f32 {
        self.notes_height_cap
    }

    /// Distance from the root at which unreachable nodes are stacked.
    pub fn isolated_offset(&self) -> f32 {
        self.isolated_offset
    }

    pub fn with_node_separation(mut self, value: f32) -> Self {
        self.node_separation = value;
        self
    }

    pub fn with_rank_separation(mut self, value: f32) -> Self {
        self.rank_separation = value;
        self
    }
}

/// Start position and spacing of the tree layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    start_x: f32,
    start_y: f32,
    horizontal_spacing: f32,
    vertical_spacing: f32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            start_x: 250.0,
            start_y: 200.0,
            horizontal_spacing: 350.0,
            vertical_spacing: 180.0,
        }
    }
}

impl TreeConfig {
    /// Position of the root.
    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    /// Distance between a parent and its children along the layout
    /// direction.
    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    /// Room reserved per leaf across the layout direction.
    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }
}

/// Default node style and the values used by style edits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: String,
    text_color: String,
    font_size: f32,
    min_font_size: f32,
    font_step: f32,
    palette: Vec<String>,
    depth_styling: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        let defaults = StyleDefaults::default();
        Self {
            background_color: defaults.background_color,
            text_color: defaults.text_color,
            font_size: defaults.font_size,
            min_font_size: 8.0,
            font_step: 2.0,
            palette: ["#ffeb3b", "#4caf50", "#2196f3", "#f44336", "#9c27b0"]
                .map(String::from)
                .to_vec(),
            depth_styling: true,
        }
    }
}

impl StyleConfig {
    /// Fallbacks for unset node style fields.
    pub fn defaults(&self) -> StyleDefaults {
        StyleDefaults {
            background_color: self.background_color.clone(),
            text_color: self.text_color.clone(),
            font_size: self.font_size,
        }
    }

    /// Lower bound applied by font size changes.
    pub fn min_font_size(&self) -> f32 {
        self.min_font_size
    }

    /// Default amount a font size change adds or removes.
    pub fn font_step(&self) -> f32 {
        self.font_step
    }

    /// Background colors cycled through by the cycle-background edit.
    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    /// Whether linked-record imports theme the root and its children.
    pub fn depth_styling(&self) -> bool {
        self.depth_styling
    }

    /// Checks that every configured color parses and the font sizes are
    /// positive.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        let colors = [&self.background_color, &self.text_color]
            .into_iter()
            .chain(self.palette.iter());
        for color in colors {
            Color::new(color).map_err(|err| format!("Invalid color in config: {err}"))?;
        }
        if self.font_size <= 0.0 || self.min_font_size <= 0.0 {
            return Err("Font sizes in config must be positive".to_string());
        }
        Ok(())
    }
}

/// Import behavior.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    allow_freeform: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            allow_freeform: true,
        }
    }
}

impl IngestConfig {
    pub fn new(allow_freeform: bool) -> Self {
        Self { allow_freeform }
    }

    /// Whether objects of unknown shape are imported best-effort.
    pub fn allow_freeform(&self) -> bool {
        self.allow_freeform
    }
}
