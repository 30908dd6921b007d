//! The canonical mind map model.
//!
//! A [`MindMap`] is a set of [`Node`]s joined by parent-to-child [`Edge`]s,
//! stored in a [`Graph`] arena. The model owns no layout logic: positions are
//! plain data written by the layout engines.

use std::collections::HashSet;

use indexmap::IndexSet;
use log::trace;

use crate::{
    error::GraphError,
    geometry::Point,
    graph::Graph,
    identifier::Id,
    style::NodeStyle,
};

pub use crate::graph::Edge;

/// Id of the root node of a freshly created map.
pub const ROOT_ID: &str = "root";

/// Label given to the root of a freshly created map.
pub const ROOT_LABEL: &str = "Central Topic";

/// Position of the root of a freshly created map.
pub const ROOT_POSITION: Point = Point::new(250.0, 200.0);

/// A single topic in the mind map.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    label: String,
    notes: String,
    notes_collapsed: bool,
    collapsed: bool,
    hidden: bool,
    style: NodeStyle,
    position: Point,
}

impl Node {
    /// Creates a node with empty, collapsed notes at the origin.
    pub fn new(id: Id, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            notes: String::new(),
            notes_collapsed: true,
            collapsed: false,
            hidden: false,
            style: NodeStyle::default(),
            position: Point::default(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_notes_collapsed(mut self, notes_collapsed: bool) -> Self {
        self.notes_collapsed = notes_collapsed;
        self
    }

    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.set_position(position);
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Whether the notes are hidden from display. The notes themselves are
    /// always kept.
    pub fn notes_collapsed(&self) -> bool {
        self.notes_collapsed
    }

    /// Whether the descendants of this node are hidden.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Whether some strict ancestor of this node is collapsed.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Returns true if new children may be added under this node: it is
    /// neither collapsed nor hidden under a collapsed ancestor.
    pub fn accepts_children(&self) -> bool {
        !self.collapsed && !self.hidden
    }

    pub fn style(&self) -> &NodeStyle {
        &self.style
    }

    /// Center of the node.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Returns true if the notes take up room when drawn.
    pub fn shows_notes(&self) -> bool {
        !self.notes.is_empty() && !self.notes_collapsed
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn set_notes_collapsed(&mut self, notes_collapsed: bool) {
        self.notes_collapsed = notes_collapsed;
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    pub fn set_style(&mut self, style: NodeStyle) {
        self.style = style;
    }

    /// Moves the node. Non-finite coordinates are replaced with the origin.
    pub fn set_position(&mut self, position: Point) {
        self.position = position.or_fallback(Point::default());
    }
}

/// An editable mind map: a node arena, its edges, and the designated root.
///
/// # Examples
///
/// ```
/// use mindmap_core::{identifier::Id, model::{MindMap, Node}};
///
/// let mut map = MindMap::new();
/// let root = map.root();
/// let child = map.next_child_id();
/// map.add_child(root, Node::new(child, "New Topic")).unwrap();
///
/// assert_eq!(map.children_of(root).collect::<Vec<_>>(), vec![child]);
/// assert_eq!(map.parent_of(child), Some(root));
/// ```
#[derive(Debug, Clone)]
pub struct MindMap {
    root: Id,
    graph: Graph<Node>,
}

impl Default for MindMap {
    fn default() -> Self {
        Self::new()
    }
}

impl MindMap {
    /// Creates a map holding only the default root node.
    pub fn new() -> Self {
        Self::with_root(Node::new(Id::new(ROOT_ID), ROOT_LABEL).with_position(ROOT_POSITION))
    }

    /// Creates a map holding only `root`.
    pub fn with_root(root: Node) -> Self {
        let mut graph = Graph::new();
        let id = root.id();
        // An empty graph cannot reject its first node.
        let _ = graph.add_node(id, root);
        Self { root: id, graph }
    }

    /// Builds a map from loose parts and checks the structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`GraphError`] raised while inserting the parts or
    /// validating the result.
    pub fn from_parts(
        root: Id,
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<Self, GraphError> {
        let mut graph = Graph::new();
        for node in nodes {
            graph.add_node(node.id(), node)?;
        }
        for edge in edges {
            graph.add_edge(edge)?;
        }
        let mut map = Self { root, graph };
        map.validate()?;
        map.refresh_visibility()?;
        Ok(map)
    }

    pub fn root(&self) -> Id {
        self.root
    }

    /// The root node. Always present in a map built through this API.
    pub fn root_node(&self) -> Option<&Node> {
        self.graph.node(self.root)
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.graph.node(id)
    }

    pub fn node_mut(&mut self, id: Id) -> Option<&mut Node> {
        self.graph.node_mut(id)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.graph.contains_node(id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.nodes().map(|(_, node)| node)
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.graph.nodes_mut().map(|(_, node)| node)
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edges()
    }

    pub fn nodes_count(&self) -> usize {
        self.graph.nodes_count()
    }

    pub fn edges_count(&self) -> usize {
        self.graph.edges_count()
    }

    /// Nodes without an incoming edge, in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = Id> {
        self.graph.roots()
    }

    /// Direct children of `id` in edge insertion order.
    pub fn children_of(&self, id: Id) -> impl Iterator<Item = Id> {
        self.graph.outgoing_nodes(id)
    }

    /// The first parent of `id`, if any.
    pub fn parent_of(&self, id: Id) -> Option<Id> {
        self.graph.incoming_nodes(id).next()
    }

    /// Every parent of `id`. Only imported maps can have more than one.
    pub fn parents_of(&self, id: Id) -> impl Iterator<Item = Id> {
        self.graph.incoming_nodes(id)
    }

    /// Every node reachable from `id`, excluding `id` itself.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] for a missing node and
    /// [`GraphError::CycleDetected`] if the walk runs into a cycle.
    pub fn descendants_of(&self, id: Id) -> Result<IndexSet<Id>, GraphError> {
        self.graph.descendants(id)
    }

    /// The root followed by every node reachable from it, in depth-first
    /// preorder.
    pub fn depth_first(&self) -> Vec<Id> {
        self.graph.preorder(self.root)
    }

    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        self.graph.add_node(node.id(), node)
    }

    /// Adds an edge. The root may never become a target.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        if edge.target() == self.root {
            return Err(GraphError::RootViolation(self.root));
        }
        self.graph.add_edge(edge)
    }

    /// Inserts `node` as the last child of `parent` and returns its id.
    ///
    /// # Errors
    ///
    /// Fails without touching the map if `parent` is unknown or the node id is
    /// already taken.
    pub fn add_child(&mut self, parent: Id, node: Node) -> Result<Id, GraphError> {
        if !self.contains(parent) {
            return Err(GraphError::UnknownNode(parent));
        }
        let id = node.id();
        self.graph.add_node(id, node)?;
        self.graph.add_edge(Edge::new(parent, id))?;
        Ok(id)
    }

    /// Removes `id`, all of its descendants, and every edge touching a removed
    /// node. Returns the removed ids.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::RootViolation`] for the root; the map is left
    /// unchanged on any error.
    pub fn remove_subtree(&mut self, id: Id) -> Result<Vec<Id>, GraphError> {
        if id == self.root {
            return Err(GraphError::RootViolation(id));
        }
        let mut doomed = self.descendants_of(id)?;
        doomed.insert(id);
        let removed = self.graph.retain_nodes(|node| !doomed.contains(&node));
        trace!(node:% = id, removed = removed.len(); "Removed subtree");
        Ok(removed)
    }

    /// Checks that the root exists, has no parent, and that the edges form no
    /// cycle.
    pub fn validate(&self) -> Result<(), GraphError> {
        if !self.contains(self.root) {
            return Err(GraphError::UnknownNode(self.root));
        }
        if self.graph.in_degree(self.root) > 0 {
            return Err(GraphError::RootViolation(self.root));
        }
        match self.graph.find_cycle() {
            Some(node) => Err(GraphError::CycleDetected(node)),
            None => Ok(()),
        }
    }

    /// Recomputes every `hidden` flag: a node is hidden exactly when some
    /// strict ancestor of it is collapsed.
    pub fn refresh_visibility(&mut self) -> Result<(), GraphError> {
        let collapsed: Vec<Id> = self
            .nodes()
            .filter(|node| node.is_collapsed())
            .map(Node::id)
            .collect();

        let mut hidden = HashSet::new();
        for id in collapsed {
            hidden.extend(self.descendants_of(id)?);
        }
        for node in self.nodes_mut() {
            node.hidden = hidden.contains(&node.id);
        }
        Ok(())
    }

    /// The id a new child should get: `node_<n>` for the smallest
    /// `n >= nodes_count + 1` that is not already in use.
    pub fn next_child_id(&self) -> Id {
        let mut n = self.nodes_count() + 1;
        loop {
            let id = Id::new(&format!("node_{n}"));
            if !self.contains(id) {
                return id;
            }
            n += 1;
        }
    }
}
