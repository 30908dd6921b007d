//! Layered layout engine.
//!
//! Nodes are ranked by their longest path from the root and packed rank by
//! rank across the layout direction. The root never moves: the finished
//! layout is translated so the root lands on its current position.

use std::collections::HashMap;

use log::{debug, trace};
use petgraph::{
    Direction as EdgeDirection,
    algo::toposort,
    graph::{DiGraph, NodeIndex},
};

use mindmap_core::{
    error::GraphError,
    geometry::Size,
    identifier::Id,
    model::MindMap,
};

use crate::layout::{Direction, Layout, LayoutEngine, NodeSizing, Placement};

/// The layered layout engine.
pub struct Engine {
    direction: Direction,
    sizing: NodeSizing,

    /// Minimum gap between nodes of one rank
    node_separation: f32,

    /// Minimum gap between consecutive ranks
    rank_separation: f32,

    /// Extra gap between rank neighbors with different parents
    edge_separation: f32,

    /// Distance from the root at which unreachable nodes are stacked
    isolated_offset: f32,
}

/// The visible part of a map as a petgraph graph.
struct VisibleGraph {
    graph: DiGraph<Id, ()>,
    indices: HashMap<Id, NodeIndex>,
}

impl VisibleGraph {
    fn new(map: &MindMap) -> Self {
        let mut graph = DiGraph::new();
        let mut indices = HashMap::new();
        for node in map.nodes().filter(|node| !node.is_hidden()) {
            indices.insert(node.id(), graph.add_node(node.id()));
        }
        for edge in map.edges() {
            if let (Some(&source), Some(&target)) =
                (indices.get(&edge.source()), indices.get(&edge.target()))
            {
                graph.add_edge(source, target, ());
            }
        }
        Self { graph, indices }
    }

    fn contains(&self, id: Id) -> bool {
        self.indices.contains_key(&id)
    }

    /// Longest-path rank of every node reachable from `root`.
    fn ranks(&self, root: Id) -> Result<HashMap<Id, usize>, GraphError> {
        let sorted = toposort(&self.graph, None)
            .map_err(|cycle| GraphError::CycleDetected(self.graph[cycle.node_id()]))?;

        let mut ranks = HashMap::from([(root, 0)]);
        for idx in sorted {
            let Some(&rank) = ranks.get(&self.graph[idx]) else {
                continue;
            };
            for child in self.graph.neighbors_directed(idx, EdgeDirection::Outgoing) {
                let entry = ranks.entry(self.graph[child]).or_insert(rank + 1);
                *entry = (*entry).max(rank + 1);
            }
        }
        Ok(ranks)
    }
}

impl Engine {
    /// Create a new layered layout engine with the default spacing.
    pub fn new(direction: Direction, sizing: NodeSizing) -> Self {
        Self {
            direction,
            sizing,
            node_separation: 150.0,
            rank_separation: 200.0,
            edge_separation: 80.0,
            isolated_offset: 200.0,
        }
    }

    /// Set the minimum gap between nodes of one rank
    pub fn set_node_separation(&mut self, spacing: f32) -> &mut Self {
        self.node_separation = spacing;
        self
    }

    /// Set the minimum gap between ranks
    pub fn set_rank_separation(&mut self, spacing: f32) -> &mut Self {
        self.rank_separation = spacing;
        self
    }

    /// Set the extra gap between neighbors with different parents
    pub fn set_edge_separation(&mut self, spacing: f32) -> &mut Self {
        self.edge_separation = spacing;
        self
    }

    /// Set the offset of unreachable nodes from the root
    pub fn set_isolated_offset(&mut self, offset: f32) -> &mut Self {
        self.isolated_offset = offset;
        self
    }

    /// Groups ranked nodes into layers, each in first-encountered preorder.
    fn layers(map: &MindMap, visible: &VisibleGraph, ranks: &HashMap<Id, usize>) -> Vec<Vec<Id>> {
        let mut layers: Vec<Vec<Id>> = Vec::new();
        for id in map.depth_first() {
            if !visible.contains(id) {
                continue;
            }
            let Some(&rank) = ranks.get(&id) else {
                continue;
            };
            if layers.len() <= rank {
                layers.resize_with(rank + 1, Vec::new);
            }
            layers[rank].push(id);
        }
        layers
    }

    /// Center of every rank along the layout direction, starting at zero.
    fn rank_centers(&self, layers: &[Vec<Id>], sizes: &HashMap<Id, Size>) -> Vec<f32> {
        let mut centers = Vec::with_capacity(layers.len());
        let mut start = 0.0;
        for layer in layers {
            let extent = layer
                .iter()
                .filter_map(|id| sizes.get(id))
                .map(|size| self.direction.main_extent(*size))
                .fold(0.0, f32::max);
            centers.push(start + extent / 2.0);
            start += extent + self.rank_separation;
        }
        centers
    }

    /// Cross coordinate of every ranked node.
    ///
    /// Each layer is packed in order, then shifted as a block so its middle
    /// sits on the mean position of its nodes' parents.
    fn cross_positions(
        &self,
        map: &MindMap,
        layers: &[Vec<Id>],
        sizes: &HashMap<Id, Size>,
    ) -> HashMap<Id, f32> {
        let mut cross: HashMap<Id, f32> = HashMap::new();

        for layer in layers {
            let mut cursor = 0.0;
            let mut previous_parent = None;
            for (index, id) in layer.iter().enumerate() {
                let parent = map.parent_of(*id);
                if index > 0 {
                    cursor += self.node_separation;
                    if parent != previous_parent {
                        cursor += self.edge_separation;
                    }
                }
                let extent = sizes
                    .get(id)
                    .map_or(0.0, |size| self.direction.cross_extent(*size));
                cross.insert(*id, cursor + extent / 2.0);
                cursor += extent;
                previous_parent = parent;
            }

            let parent_means: Vec<f32> = layer
                .iter()
                .filter_map(|id| {
                    let placed: Vec<f32> = map
                        .parents_of(*id)
                        .filter_map(|parent| cross.get(&parent).copied())
                        .collect();
                    (!placed.is_empty()).then(|| placed.iter().sum::<f32>() / placed.len() as f32)
                })
                .collect();
            let (Some(first), Some(last)) = (layer.first(), layer.last()) else {
                continue;
            };
            if parent_means.is_empty() {
                continue;
            }
            let target = parent_means.iter().sum::<f32>() / parent_means.len() as f32;
            let middle = (cross[first] + cross[last]) / 2.0;
            let shift = target - middle;
            for id in layer {
                if let Some(value) = cross.get_mut(id) {
                    *value += shift;
                }
            }
        }
        cross
    }
}

impl LayoutEngine for Engine {
    fn calculate(&self, map: &MindMap) -> Result<Layout, GraphError> {
        let root = map.root();
        let pinned = map
            .node(root)
            .map(|node| node.position())
            .ok_or(GraphError::UnknownNode(root))?;
        let direction = self.direction;
        let handles = direction.handles();

        let visible = VisibleGraph::new(map);
        let ranks = visible.ranks(root)?;
        let layers = Self::layers(map, &visible, &ranks);

        let sizes: HashMap<Id, Size> = map
            .nodes()
            .filter(|node| visible.contains(node.id()))
            .map(|node| (node.id(), self.sizing.size_of(node)))
            .collect();

        let mains = self.rank_centers(&layers, &sizes);
        let cross = self.cross_positions(map, &layers, &sizes);

        // Translate so the root lands exactly on its pinned position.
        let root_main = mains.first().copied().unwrap_or_default();
        let root_cross = cross.get(&root).copied().unwrap_or_default();
        let offset = pinned.sub_point(direction.point(root_main, root_cross));

        let mut layout = Layout::new();
        for (rank, layer) in layers.iter().enumerate() {
            for id in layer {
                let position = if *id == root {
                    pinned
                } else {
                    direction.point(mains[rank], cross[id]).add_point(offset)
                };
                let size = sizes.get(id).copied().unwrap_or_default();
                layout.insert(*id, Placement::new(position, size, handles));
            }
        }

        // Nodes the root cannot reach are stacked beside it.
        let mut cursor = direction.cross(pinned);
        let mut isolated = 0;
        for node in map.nodes() {
            let id = node.id();
            if !visible.contains(id) || ranks.contains_key(&id) {
                continue;
            }
            let size = sizes.get(&id).copied().unwrap_or_default();
            let extent = direction.cross_extent(size);
            let position = direction.point(direction.main(pinned) + self.isolated_offset, cursor);
            cursor += extent + self.node_separation;
            layout.insert(id, Placement::new(position, size, handles));
            isolated += 1;
        }

        debug!(
            ranks = layers.len(),
            placed = layout.len(),
            isolated;
            "Layered layout calculated"
        );
        trace!(layout:?; "Layered layout");
        Ok(layout)
    }
}
