//! Node size estimates.

use mindmap_core::{geometry::Size, model::Node};

/// Estimates the drawn size of a node.
///
/// The width is fixed. The height grows with the length of visible notes,
/// up to a cap; collapsed or empty notes add nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSizing {
    width: f32,
    height: f32,
    notes_height_cap: f32,
}

impl Default for NodeSizing {
    fn default() -> Self {
        Self::new(200.0, 50.0, 200.0)
    }
}

impl NodeSizing {
    pub fn new(width: f32, height: f32, notes_height_cap: f32) -> Self {
        Self {
            width,
            height,
            notes_height_cap,
        }
    }

    pub fn size_of(&self, node: &Node) -> Size {
        let notes = if node.shows_notes() {
            (node.notes().chars().count() as f32 / 2.0).min(self.notes_height_cap)
        } else {
            0.0
        };
        Size::new(self.width, self.height + notes)
    }
}
