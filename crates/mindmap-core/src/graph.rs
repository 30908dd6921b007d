//! Arena graph with an adjacency index.
//!
//! This module provides the storage and traversal primitives shared by every
//! part of the mind map: collapse visibility, subtree deletion, layout and
//! import validation all walk the graph through the same functions, so they
//! can never disagree about what a node's descendants are.
//!
//! # Architecture
//!
//! - [`Edge`]: a directed `source -> target` pair with a deterministic id
//! - [`Graph`]: node arena keyed by [`Id`] in insertion order, edge list, and
//!   per-node incoming/outgoing edge indices
//!
//! Capabilities:
//! - Duplicate id and dangling edge rejection on insertion
//! - Root detection (nodes with no incoming edges)
//! - Children in edge insertion order
//! - Descendant closure with cycle detection
//! - Bulk removal with index rebuild

use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};

use crate::{error::GraphError, identifier::Id};

/// Index of an edge in the graph's edge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EdgeIndex(usize);

/// A directed edge. The source is the structural parent of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    id: Id,
    source: Id,
    target: Id,
}

impl Edge {
    /// Creates an edge whose id is derived from the `(source, target)` pair.
    pub fn new(source: Id, target: Id) -> Self {
        Self {
            id: Id::edge(source, target),
            source,
            target,
        }
    }

    /// Creates an edge with an explicit id, as carried by imported documents.
    pub fn with_id(id: Id, source: Id, target: Id) -> Self {
        Self { id, source, target }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    /// Returns true if either endpoint is `node`.
    pub fn touches(&self, node: Id) -> bool {
        self.source == node || self.target == node
    }
}

/// Core graph data structure.
///
/// Nodes are stored by id in insertion order with payload type `N`. Edges are
/// stored in insertion order, which is the order children are reported in.
#[derive(Debug, Clone)]
pub struct Graph<N> {
    nodes: IndexMap<Id, N>,
    edges: Vec<Edge>,
    edge_ids: HashSet<Id>,
    incoming_edges: HashMap<Id, Vec<EdgeIndex>>,
    outgoing_edges: HashMap<Id, Vec<EdgeIndex>>,
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Graph<N> {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Graph {
            nodes: IndexMap::new(),
            edges: Vec::new(),
            edge_ids: HashSet::new(),
            incoming_edges: HashMap::new(),
            outgoing_edges: HashMap::new(),
        }
    }

    /// Returns the node data for the given ID, if it exists.
    pub fn node(&self, id: Id) -> Option<&N> {
        self.nodes.get(&id)
    }

    /// Returns mutable node data for the given ID, if it exists.
    pub fn node_mut(&mut self, id: Id) -> Option<&mut N> {
        self.nodes.get_mut(&id)
    }

    /// Returns an iterator over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (Id, &N)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Returns a mutable iterator over all nodes in insertion order.
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = (Id, &mut N)> {
        self.nodes.iter_mut().map(|(id, node)| (*id, node))
    }

    /// Returns the total number of nodes in the graph.
    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    /// Checks if a node with the given ID exists in the graph.
    pub fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Returns an iterator over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Returns the total number of edges in the graph.
    pub fn edges_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns an iterator over root nodes (nodes with no incoming edges).
    pub fn roots(&self) -> impl Iterator<Item = Id> {
        self.nodes
            .keys()
            .filter(|id| !self.incoming_edges.contains_key(*id))
            .copied()
    }

    /// Returns the number of edges pointing at `id`.
    pub fn in_degree(&self, id: Id) -> usize {
        self.incoming_edges.get(&id).map_or(0, Vec::len)
    }

    /// Returns the targets of the outgoing edges of `source_id`, in edge
    /// insertion order. Empty if the node has no outgoing edges or does not
    /// exist.
    pub fn outgoing_nodes(&self, source_id: Id) -> impl Iterator<Item = Id> {
        self.outgoing(source_id)
            .iter()
            .map(|idx| self.edges[idx.0].target)
    }

    /// Returns the sources of the incoming edges of `target_id`.
    pub fn incoming_nodes(&self, target_id: Id) -> impl Iterator<Item = Id> {
        self.incoming_edges
            .get(&target_id)
            .into_iter()
            .flatten()
            .map(|idx| self.edges[idx.0].source)
    }

    /// Adds a node to the graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateId`] if a node with the same id exists.
    pub fn add_node(&mut self, id: Id, node: N) -> Result<(), GraphError> {
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateId(id));
        }
        self.nodes.insert(id, node);
        Ok(())
    }

    /// Adds a directed edge between two existing nodes.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateId`] if an edge with the same id exists,
    /// and [`GraphError::DanglingEdge`] if either endpoint is missing.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        if self.edge_ids.contains(&edge.id) {
            return Err(GraphError::DuplicateId(edge.id));
        }
        for endpoint in [edge.source, edge.target] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(GraphError::DanglingEdge {
                    edge: edge.id,
                    node: endpoint,
                });
            }
        }

        self.edges.push(edge);
        self.edge_ids.insert(edge.id);

        let idx = EdgeIndex(self.edges.len() - 1);
        self.outgoing_edges.entry(edge.source).or_default().push(idx);
        self.incoming_edges.entry(edge.target).or_default().push(idx);
        Ok(())
    }

    /// Returns every node reachable from `id` through outgoing edges,
    /// excluding `id` itself, in depth-first discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if `id` does not exist and
    /// [`GraphError::CycleDetected`] if the walk runs into a cycle.
    pub fn descendants(&self, id: Id) -> Result<IndexSet<Id>, GraphError> {
        if !self.contains_node(id) {
            return Err(GraphError::UnknownNode(id));
        }
        let mut found = IndexSet::new();
        self.walk(id, &mut HashSet::new(), |node| {
            found.insert(node);
        })?;
        Ok(found)
    }

    /// Returns the first node found to lie on a cycle, if any.
    pub fn find_cycle(&self) -> Option<Id> {
        let mut finished = HashSet::new();
        for id in self.nodes.keys() {
            if finished.contains(id) {
                continue;
            }
            if let Err(GraphError::CycleDetected(node)) = self.walk(*id, &mut finished, |_| {}) {
                return Some(node);
            }
        }
        None
    }

    /// Returns `start` followed by every node reachable from it in depth-first
    /// preorder, children visited in edge insertion order.
    ///
    /// Each node is reported once even if it is reachable along several paths,
    /// so this terminates on any input.
    pub fn preorder(&self, start: Id) -> Vec<Id> {
        if !self.contains_node(start) {
            return Vec::new();
        }
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                continue;
            }
            order.push(node);
            let children = self.outgoing(node);
            stack.extend(
                children
                    .iter()
                    .rev()
                    .map(|idx| self.edges[idx.0].target)
                    .filter(|child| !seen.contains(child)),
            );
        }
        order
    }

    /// Removes every node for which `keep` returns false, together with all
    /// edges touching a removed node. Returns the removed ids.
    pub fn retain_nodes(&mut self, mut keep: impl FnMut(Id) -> bool) -> Vec<Id> {
        let removed: Vec<Id> = self.nodes.keys().copied().filter(|id| !keep(*id)).collect();
        if removed.is_empty() {
            return removed;
        }
        let removed_set: HashSet<Id> = removed.iter().copied().collect();

        self.nodes.retain(|id, _| !removed_set.contains(id));
        let edges = std::mem::take(&mut self.edges);
        self.edge_ids.clear();
        self.incoming_edges.clear();
        self.outgoing_edges.clear();
        for edge in edges {
            if removed_set.contains(&edge.source) || removed_set.contains(&edge.target) {
                continue;
            }
            self.edges.push(edge);
            self.edge_ids.insert(edge.id);
            let idx = EdgeIndex(self.edges.len() - 1);
            self.outgoing_edges.entry(edge.source).or_default().push(idx);
            self.incoming_edges.entry(edge.target).or_default().push(idx);
        }
        removed
    }

    fn outgoing(&self, id: Id) -> &[EdgeIndex] {
        self.outgoing_edges.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Depth-first walk from `start` that calls `visit` for each newly
    /// discovered node. Nodes in `finished` are treated as fully explored.
    fn walk(
        &self,
        start: Id,
        finished: &mut HashSet<Id>,
        mut visit: impl FnMut(Id),
    ) -> Result<(), GraphError> {
        let mut on_path = HashSet::from([start]);
        let mut stack = vec![(start, 0usize)];

        while let Some(&(node, cursor)) = stack.last() {
            match self.outgoing(node).get(cursor) {
                Some(idx) => {
                    if let Some(top) = stack.last_mut() {
                        top.1 += 1;
                    }
                    let child = self.edges[idx.0].target;
                    if on_path.contains(&child) {
                        return Err(GraphError::CycleDetected(child));
                    }
                    if finished.contains(&child) {
                        continue;
                    }
                    visit(child);
                    on_path.insert(child);
                    stack.push((child, 0));
                }
                None => {
                    stack.pop();
                    on_path.remove(&node);
                    finished.insert(node);
                }
            }
        }
        Ok(())
    }
}
