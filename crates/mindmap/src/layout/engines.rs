//! Layout engine factory.
//!
//! The [`EngineBuilder`] collects direction, spacing and sizing settings and
//! hands out configured engines for either [`Algorithm`].

use log::debug;

use mindmap_core::{error::GraphError, geometry::Point, model::MindMap};

use crate::{
    config::LayoutConfig,
    layout::{Direction, Layout, NodeSizing, layered, tree},
};

/// The available layout algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Rank-based layout with a pinned root.
    Layered,
    /// Subtree-weighted tree layout from a fixed start.
    Tree,
}

/// Trait defining the interface for mind map layout engines.
pub trait LayoutEngine {
    /// Calculate node placements for `map`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CycleDetected`] if the engine needs an acyclic
    /// graph and the map has a cycle.
    fn calculate(&self, map: &MindMap) -> Result<Layout, GraphError>;
}

/// Builder for creating and configuring layout engines.
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    direction: Direction,
    sizing: NodeSizing,

    // Layered engine
    node_separation: f32,
    rank_separation: f32,
    edge_separation: f32,
    isolated_offset: f32,

    // Tree engine
    tree_start: Point,
    tree_level_spacing: f32,
    tree_sibling_spacing: f32,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl EngineBuilder {
    /// Create a new engine builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine builder from the layout section of the configuration.
    pub fn from_config(config: &LayoutConfig) -> Self {
        let layered = config.layered();
        let tree = config.tree();
        Self {
            direction: config.direction(),
            sizing: NodeSizing::new(
                layered.node_width(),
                layered.node_height(),
                layered.notes_height_cap(),
            ),
            node_separation: layered.node_separation(),
            rank_separation: layered.rank_separation(),
            edge_separation: layered.edge_separation(),
            isolated_offset: layered.isolated_offset(),
            tree_start: tree.start(),
            tree_level_spacing: tree.horizontal_spacing(),
            tree_sibling_spacing: tree.vertical_spacing(),
        }
    }

    /// Set the direction in which children grow.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the node size estimator.
    pub fn with_sizing(mut self, sizing: NodeSizing) -> Self {
        self.sizing = sizing;
        self
    }

    /// Set the minimum gap between nodes of the same rank.
    pub fn with_node_separation(mut self, spacing: f32) -> Self {
        self.node_separation = spacing;
        self
    }

    /// Set the minimum gap between ranks.
    pub fn with_rank_separation(mut self, spacing: f32) -> Self {
        self.rank_separation = spacing;
        self
    }

    /// Set the tree layout's root position and spacing.
    pub fn with_tree_spacing(mut self, start: Point, level: f32, sibling: f32) -> Self {
        self.tree_start = start;
        self.tree_level_spacing = level;
        self.tree_sibling_spacing = sibling;
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn sizing(&self) -> NodeSizing {
        self.sizing
    }

    /// Get an engine for `algorithm` with the configured options.
    pub fn engine(&self, algorithm: Algorithm) -> Box<dyn LayoutEngine> {
        debug!(algorithm:?, direction:? = self.direction; "Building layout engine");
        match algorithm {
            Algorithm::Layered => Box::new(self.layered()),
            Algorithm::Tree => Box::new(self.tree()),
        }
    }

    pub(crate) fn layered(&self) -> layered::Engine {
        let mut engine = layered::Engine::new(self.direction, self.sizing);
        engine
            .set_node_separation(self.node_separation)
            .set_rank_separation(self.rank_separation)
            .set_edge_separation(self.edge_separation)
            .set_isolated_offset(self.isolated_offset);
        engine
    }

    pub(crate) fn tree(&self) -> tree::Engine {
        let mut engine = tree::Engine::new(self.direction, self.sizing);
        engine
            .set_start(self.tree_start)
            .set_level_spacing(self.tree_level_spacing)
            .set_sibling_spacing(self.tree_sibling_spacing);
        engine
    }
}
