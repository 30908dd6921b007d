//! Layout of mind maps.
//!
//! Two algorithms assign node centers from topology alone:
//!
//! - the **layered** engine ranks nodes by longest path from the root and
//!   keeps the root pinned; it runs after interactive edits and tolerates
//!   general DAGs
//! - the **tree** engine reserves room for each subtree in proportion to its
//!   size; it runs once after importing shapes that carry no positions
//!
//! Both are deterministic. Each produces a [`Layout`] that is applied to the
//! map as a separate step.

mod engines;
mod layered;
mod sizing;
mod tree;

pub use engines::{Algorithm, EngineBuilder, LayoutEngine};
pub use sizing::NodeSizing;

use indexmap::IndexMap;
use serde::Deserialize;

use log::debug;

use mindmap_core::{
    error::GraphError,
    geometry::{Bounds, Point, Size},
    identifier::Id,
    model::MindMap,
};
use mindmap_ingest::Shape;

/// Direction in which children grow away from their parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Left to right. Ranks are columns.
    #[default]
    Horizontal,
    /// Top to bottom. Ranks are rows.
    Vertical,
}

impl Direction {
    /// Coordinate along the direction of growth.
    pub fn main(self, point: Point) -> f32 {
        match self {
            Direction::Horizontal => point.x(),
            Direction::Vertical => point.y(),
        }
    }

    /// Coordinate across the direction of growth.
    pub fn cross(self, point: Point) -> f32 {
        match self {
            Direction::Horizontal => point.y(),
            Direction::Vertical => point.x(),
        }
    }

    /// Builds a point from its main and cross coordinates.
    pub fn point(self, main: f32, cross: f32) -> Point {
        match self {
            Direction::Horizontal => Point::new(main, cross),
            Direction::Vertical => Point::new(cross, main),
        }
    }

    pub fn main_extent(self, size: Size) -> f32 {
        match self {
            Direction::Horizontal => size.width(),
            Direction::Vertical => size.height(),
        }
    }

    pub fn cross_extent(self, size: Size) -> f32 {
        match self {
            Direction::Horizontal => size.height(),
            Direction::Vertical => size.width(),
        }
    }

    /// Connection sides for edges entering and leaving a node.
    pub fn handles(self) -> Handles {
        match self {
            Direction::Horizontal => Handles {
                target: Side::Left,
                source: Side::Right,
            },
            Direction::Vertical => Handles {
                target: Side::Top,
                source: Side::Bottom,
            },
        }
    }
}

/// A side of a node's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Top,
    Right,
    Bottom,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
        }
    }
}

/// Where edges attach to a node: incoming on `target`, outgoing on `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handles {
    pub target: Side,
    pub source: Side,
}

/// The computed placement of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    position: Point,
    size: Size,
    handles: Handles,
}

impl Placement {
    pub fn new(position: Point, size: Size, handles: Handles) -> Self {
        Self {
            position,
            size,
            handles,
        }
    }

    /// Center of the node.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Estimated size of the node.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn handles(&self) -> Handles {
        self.handles
    }

    pub fn bounds(&self) -> Bounds {
        self.position.to_bounds(self.size)
    }
}

/// Node placements produced by a [`LayoutEngine`], keyed by node id.
///
/// Nodes that an engine does not place (hidden nodes, or nodes the tree
/// layout cannot reach) are absent and keep their current position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    placements: IndexMap<Id, Placement>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: Id, placement: Placement) {
        self.placements.insert(id, placement);
    }

    pub fn get(&self, id: Id) -> Option<&Placement> {
        self.placements.get(&id)
    }

    pub fn position(&self, id: Id) -> Option<Point> {
        self.get(id).map(Placement::position)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id, &Placement)> {
        self.placements.iter().map(|(id, placement)| (*id, placement))
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Smallest box containing every placed node.
    pub fn bounds(&self) -> Option<Bounds> {
        self.placements
            .values()
            .map(Placement::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    /// Moves every placed node of `map` to its computed position.
    pub fn apply_to(&self, map: &mut MindMap) {
        for (id, placement) in &self.placements {
            if let Some(node) = map.node_mut(*id) {
                node.set_position(placement.position);
            }
        }
    }
}

/// Gives a freshly imported map its first positions.
///
/// Canonical documents keep their own positions. Shapes without positions
/// are placed by the tree engine.
pub(crate) fn place_imported(
    map: &mut MindMap,
    shape: Shape,
    engines: &EngineBuilder,
) -> Result<(), GraphError> {
    if !shape.needs_layout() {
        return Ok(());
    }
    let layout = engines.engine(Algorithm::Tree).calculate(map)?;
    layout.apply_to(map);
    debug!(shape:% = shape, placed = layout.len(); "Imported map laid out");
    Ok(())
}
