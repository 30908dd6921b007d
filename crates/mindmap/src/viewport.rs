//! Camera placement for a committed mind map.
//!
//! The renderer owns the actual viewport. This module only turns a [`Focus`]
//! request into the camera it should move to, reading positions from the
//! model that was just committed.

use mindmap_core::{
    geometry::{Bounds, Point},
    identifier::Id,
    model::MindMap,
};

use crate::layout::NodeSizing;

const MAX_ZOOM: f32 = 1.5;
const MIN_ZOOM: f32 = 0.5;
const FIT_PADDING: f32 = 0.3;

/// What the viewport should show once a change has been painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Center on one node.
    Node(Id),
    /// Fit every visible node.
    FitAll,
}

/// Where the camera looks and how far it is zoomed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    center: Point,
    zoom: f32,
}

impl Camera {
    pub fn new(center: Point, zoom: f32) -> Self {
        Self { center, zoom }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }
}

/// Size of the renderer's drawing area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1000.0, 800.0)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Resolves `focus` against `map`.
    ///
    /// A node is shown at a zoom that leaves it a third of the viewport in
    /// both directions. Focusing a node that is gone, hidden, or has no
    /// usable position falls back to fitting everything.
    pub fn camera(&self, map: &MindMap, focus: Focus, sizing: &NodeSizing) -> Camera {
        if let Focus::Node(id) = focus {
            let target = map
                .node(id)
                .filter(|node| !node.is_hidden() && node.position().is_finite());
            if let Some(node) = target {
                let size = sizing.size_of(node);
                let zoom = (self.width / (size.width() * 3.0))
                    .min(self.height / (size.height() * 3.0))
                    .min(MAX_ZOOM);
                return Camera::new(node.position(), zoom);
            }
        }
        self.fit_all(map, sizing)
    }

    fn fit_all(&self, map: &MindMap, sizing: &NodeSizing) -> Camera {
        let bounds = map
            .nodes()
            .filter(|node| !node.is_hidden())
            .map(|node| node.position().to_bounds(sizing.size_of(node)))
            .reduce(|acc, bounds| acc.merge(&bounds));

        let Some(bounds) = bounds else {
            return Camera::new(Point::default(), 1.0);
        };
        Camera::new(bounds.center(), self.fit_zoom(bounds))
    }

    fn fit_zoom(&self, bounds: Bounds) -> f32 {
        let padding = 1.0 + FIT_PADDING;
        let zoom = (self.width / (bounds.width() * padding))
            .min(self.height / (bounds.height() * padding));
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    }
}
