//! Subtree-weighted tree layout.
//!
//! Every node reserves `subtree_size * sibling_spacing` of room across the
//! layout direction, where the subtree size counts the node itself and all
//! of its descendants. Children of one parent are stacked in that room in
//! edge order, each centered in its own share, so sibling subtrees never
//! share a band. A per-depth low-water mark keeps independent subtrees that
//! reach the same depth from overlapping.

use std::collections::{HashMap, HashSet};

use log::debug;

use mindmap_core::{error::GraphError, geometry::Point, identifier::Id, model::MindMap};

use crate::layout::{Direction, Layout, LayoutEngine, NodeSizing, Placement};

/// The tree layout engine.
pub struct Engine {
    direction: Direction,
    sizing: NodeSizing,

    /// Position of the root
    start: Point,

    /// Distance from a parent to its children along the direction
    level_spacing: f32,

    /// Room reserved per leaf across the direction
    sibling_spacing: f32,
}

/// Parent-to-children links restricted to a spanning tree of the nodes
/// reachable from the root, plus the preorder of that tree.
struct SpanningTree {
    order: Vec<Id>,
    children: HashMap<Id, Vec<Id>>,
}

impl SpanningTree {
    /// Each node is claimed by the first parent that reaches it, so shared
    /// children of a DAG are placed once.
    fn new(map: &MindMap, root: Id) -> Self {
        let mut claimed = HashSet::from([root]);
        let mut order = Vec::new();
        let mut children = HashMap::new();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            order.push(node);
            let kids: Vec<Id> = map
                .children_of(node)
                .filter(|child| claimed.insert(*child))
                .collect();
            stack.extend(kids.iter().rev());
            children.insert(node, kids);
        }
        Self { order, children }
    }

    fn children(&self, id: Id) -> &[Id] {
        self.children.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Depth of every node; the root has depth zero.
    fn depths(&self) -> HashMap<Id, usize> {
        let mut depths = HashMap::with_capacity(self.order.len());
        if let Some(root) = self.order.first() {
            depths.insert(*root, 0);
        }
        for node in &self.order {
            let depth = depths.get(node).copied().unwrap_or_default();
            for child in self.children(*node) {
                depths.insert(*child, depth + 1);
            }
        }
        depths
    }

    /// Subtree size of every node, computed once bottom-up.
    fn subtree_sizes(&self) -> HashMap<Id, usize> {
        let mut sizes: HashMap<Id, usize> = HashMap::with_capacity(self.order.len());
        for node in self.order.iter().rev() {
            let below: usize = self
                .children(*node)
                .iter()
                .map(|child| sizes.get(child).copied().unwrap_or(1))
                .sum();
            sizes.insert(*node, 1 + below);
        }
        sizes
    }
}

impl Engine {
    /// Create a new tree layout engine with the default spacing.
    pub fn new(direction: Direction, sizing: NodeSizing) -> Self {
        Self {
            direction,
            sizing,
            start: Point::new(250.0, 200.0),
            level_spacing: 350.0,
            sibling_spacing: 180.0,
        }
    }

    /// Set the position of the root
    pub fn set_start(&mut self, start: Point) -> &mut Self {
        self.start = start;
        self
    }

    /// Set the distance from a parent to its children
    pub fn set_level_spacing(&mut self, spacing: f32) -> &mut Self {
        self.level_spacing = spacing;
        self
    }

    /// Set the room reserved per leaf
    pub fn set_sibling_spacing(&mut self, spacing: f32) -> &mut Self {
        self.sibling_spacing = spacing;
        self
    }

    fn positions(&self, tree: &SpanningTree) -> HashMap<Id, Point> {
        let depths = tree.depths();
        let sizes = tree.subtree_sizes();
        let size_of = |id: Id| sizes.get(&id).copied().unwrap_or(1) as f32;
        let direction = self.direction;

        let mut positions = HashMap::with_capacity(tree.order.len());
        // Next free cross coordinate per depth
        let mut low_water: HashMap<usize, f32> = HashMap::new();

        // Preorder visits parents before children and, per depth, earlier
        // subtrees before later ones.
        for (index, node) in tree.order.iter().enumerate() {
            if index == 0 {
                positions.insert(*node, self.start);
            }
            let Some(&position) = positions.get(node) else {
                continue;
            };
            let children = tree.children(*node);
            if children.is_empty() {
                continue;
            }

            let child_depth = depths.get(node).copied().unwrap_or_default() + 1;
            let main = direction.main(position) + self.level_spacing;
            let natural = direction.cross(position) - (size_of(*node) - 1.0) * self.sibling_spacing / 2.0;
            let mut cursor = match low_water.get(&child_depth) {
                Some(&mark) => natural.max(mark),
                None => natural,
            };

            // Each child sits in the middle of the room its subtree reserves,
            // which keeps a single child level with its parent.
            for child in children {
                let share = size_of(*child);
                let center = cursor + share * self.sibling_spacing / 2.0;
                positions.insert(*child, direction.point(main, center));
                cursor += share * self.sibling_spacing;
            }
            low_water.insert(child_depth, cursor);
        }
        positions
    }
}

impl LayoutEngine for Engine {
    fn calculate(&self, map: &MindMap) -> Result<Layout, GraphError> {
        let root = map.root();
        if !map.contains(root) {
            return Err(GraphError::UnknownNode(root));
        }

        let tree = SpanningTree::new(map, root);
        let positions = self.positions(&tree);
        let handles = self.direction.handles();

        let mut layout = Layout::new();
        for id in &tree.order {
            let (Some(node), Some(position)) = (map.node(*id), positions.get(id)) else {
                continue;
            };
            layout.insert(
                *id,
                Placement::new(*position, self.sizing.size_of(node), handles),
            );
        }
        debug!(nodes = layout.len(), unplaced = map.nodes_count() - layout.len(); "Tree layout calculated");
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use mindmap_core::model::Node;

    use super::*;

    fn engine() -> Engine {
        let mut engine = Engine::new(Direction::Horizontal, NodeSizing::default());
        engine
            .set_start(Point::new(0.0, 0.0))
            .set_level_spacing(100.0)
            .set_sibling_spacing(10.0);
        engine
    }

    fn add(map: &mut MindMap, parent: &str, child: &str) {
        let parent = if parent == "root" { map.root() } else { Id::new(parent) };
        map.add_child(parent, Node::new(Id::new(child), child)).unwrap();
    }

    #[test]
    fn test_single_child_is_level_with_parent() {
        let mut map = MindMap::new();
        add(&mut map, "root", "a");

        let layout = engine().calculate(&map).unwrap();

        assert_eq!(layout.position(map.root()), Some(Point::new(0.0, 0.0)));
        assert_eq!(layout.position(Id::new("a")), Some(Point::new(100.0, 0.0)));
    }

    #[test]
    fn test_subtree_sizes_count_the_node_itself() {
        let mut map = MindMap::new();
        add(&mut map, "root", "a");
        add(&mut map, "a", "a1");
        add(&mut map, "a", "a2");
        add(&mut map, "root", "b");

        let tree = SpanningTree::new(&map, map.root());
        let sizes = tree.subtree_sizes();

        assert_eq!(sizes[&map.root()], 5);
        assert_eq!(sizes[&Id::new("a")], 3);
        assert_eq!(sizes[&Id::new("b")], 1);
    }

    #[test]
    fn test_children_reserve_room_by_subtree_size() {
        // root(5) -> a(3) -> (a1, a2), root -> b(1)
        let mut map = MindMap::new();
        add(&mut map, "root", "a");
        add(&mut map, "a", "a1");
        add(&mut map, "a", "a2");
        add(&mut map, "root", "b");

        let layout = engine().calculate(&map).unwrap();
        let y = |id: &str| layout.position(Id::new(id)).unwrap().y();

        // root's block is [-20, 20]: a reserves [-20, 10], b reserves [10, 20]
        assert_approx_eq!(f32, y("a"), -5.0);
        assert_approx_eq!(f32, y("b"), 15.0);
        // a's block is [-15, 5]
        assert_approx_eq!(f32, y("a1"), -10.0);
        assert_approx_eq!(f32, y("a2"), 0.0);
        assert_approx_eq!(f32, layout.position(Id::new("a1")).unwrap().x(), 200.0);
    }

    #[test]
    fn test_two_leaves_are_centered_on_parent() {
        let mut map = MindMap::new();
        add(&mut map, "root", "a");
        add(&mut map, "root", "b");

        let layout = engine().calculate(&map).unwrap();
        let y = |id: &str| layout.position(Id::new(id)).unwrap().y();

        assert_approx_eq!(f32, y("a"), -5.0);
        assert_approx_eq!(f32, y("b"), 5.0);
    }

    #[test]
    fn test_cousins_do_not_overlap() {
        let mut map = MindMap::new();
        add(&mut map, "root", "a");
        add(&mut map, "root", "b");
        for child in ["a1", "a2", "a3"] {
            add(&mut map, "a", child);
        }
        for child in ["b1", "b2", "b3"] {
            add(&mut map, "b", child);
        }

        let layout = engine().calculate(&map).unwrap();
        let y = |id: &str| layout.position(Id::new(id)).unwrap().y();

        assert!(y("b1") >= y("a3") + 10.0);
        assert!(y("a1") < y("a2") && y("a2") < y("a3"));
    }

    #[test]
    fn test_vertical_direction_swaps_axes() {
        let mut map = MindMap::new();
        add(&mut map, "root", "a");

        let mut vertical = engine();
        vertical.direction = Direction::Vertical;
        let layout = vertical.calculate(&map).unwrap();

        assert_eq!(layout.position(Id::new("a")), Some(Point::new(0.0, 100.0)));
    }

    #[test]
    fn test_shared_child_is_placed_once() {
        let mut map = MindMap::new();
        add(&mut map, "root", "a");
        add(&mut map, "root", "b");
        add(&mut map, "a", "shared");
        map.add_edge(mindmap_core::model::Edge::new(Id::new("b"), Id::new("shared")))
            .unwrap();

        let layout = engine().calculate(&map).unwrap();
        assert_eq!(layout.len(), 4);
    }
}
