//! Edits of a mind map.
//!
//! Every edit is an [`Intent`]. [`apply`] takes the current map and returns
//! the edited copy together with what the caller has to do next: lay the map
//! out again, move the viewport, or nothing at all.
//!
//! An intent whose precondition does not hold (a missing node, adding under a
//! collapsed or hidden parent, deleting the root) is not an error. It leaves
//! the map as it was and reports `changed == false`.

use indexmap::IndexSet;
use log::{debug, trace, warn};

use mindmap_core::{
    color::Color,
    error::GraphError,
    geometry::Point,
    identifier::Id,
    model::{MindMap, Node},
    style::NodeStyle,
};

use crate::{config::StyleConfig, viewport::Focus};

/// Label of a freshly added child.
pub const NEW_TOPIC_LABEL: &str = "New Topic";

/// Offset of a new child from its parent until the next layout pass.
const NEW_CHILD_OFFSET: Point = Point::new(200.0, 0.0);

/// Which nodes a font size change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontTarget {
    Node(Id),
    /// Every currently selected node.
    Selected,
}

/// A single edit requested by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Add a "New Topic" child under `parent`.
    AddChild { parent: Id },
    /// Remove a node and everything below it.
    DeleteSubtree(Id),
    /// Collapse or expand a node.
    ToggleCollapse(Id),
    SetLabel { node: Id, label: String },
    SetNotes { node: Id, notes: String },
    ToggleNotesCollapsed(Id),
    /// Override the style fields the patch sets.
    SetStyle { node: Id, patch: NodeStyle },
    /// Grow or shrink the font, never below the configured minimum.
    ChangeFontSize { target: FontTarget, delta: f32 },
    /// Move the background to the next palette color.
    CycleBackground(Id),
    /// Add an answered question as a child of `parent`.
    AddAnswer {
        parent: Id,
        question: String,
        answer: String,
    },
    /// Lay the map out again without changing it.
    Relayout,
}

impl Intent {
    /// Whether a successful application moves nodes around.
    pub fn relayouts(&self) -> bool {
        matches!(
            self,
            Intent::AddChild { .. }
                | Intent::DeleteSubtree(_)
                | Intent::ToggleCollapse(_)
                | Intent::AddAnswer { .. }
                | Intent::Relayout
        )
    }
}

/// The result of applying an [`Intent`].
#[derive(Debug, Clone)]
pub struct Outcome {
    map: MindMap,
    changed: bool,
    relayout: bool,
    focus: Option<Focus>,
}

impl Outcome {
    fn unchanged(map: &MindMap) -> Self {
        Self {
            map: map.clone(),
            changed: false,
            relayout: false,
            focus: None,
        }
    }

    fn changed(map: MindMap, intent: &Intent, focus: Option<Focus>) -> Self {
        Self {
            map,
            changed: true,
            relayout: intent.relayouts(),
            focus,
        }
    }

    pub fn map(&self) -> &MindMap {
        &self.map
    }

    pub fn into_map(self) -> MindMap {
        self.map
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Whether the new map needs a layout pass before it is committed.
    pub fn needs_relayout(&self) -> bool {
        self.relayout
    }

    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }
}

/// Applies `intent` to a copy of `map`.
///
/// `selection` is only read by [`FontTarget::Selected`].
///
/// # Errors
///
/// Returns a [`GraphError`] if the edit would break a structural invariant of
/// the map. Failed preconditions are not errors.
pub fn apply(
    map: &MindMap,
    intent: &Intent,
    style: &StyleConfig,
    selection: &IndexSet<Id>,
) -> Result<Outcome, GraphError> {
    debug!(intent:?; "Applying intent");
    let outcome = match intent {
        Intent::AddChild { parent } => {
            let Some(mut next) = expandable_copy(map, *parent) else {
                return Ok(noop(map, intent));
            };
            let child = next.next_child_id();
            let node = Node::new(child, NEW_TOPIC_LABEL)
                .with_style(NodeStyle::from_defaults(&style.defaults()))
                .with_position(new_child_position(map, *parent));
            next.add_child(*parent, node)?;
            next.refresh_visibility()?;
            Outcome::changed(next, intent, Some(Focus::Node(child)))
        }
        Intent::AddAnswer {
            parent,
            question,
            answer,
        } => {
            let Some(mut next) = expandable_copy(map, *parent) else {
                return Ok(noop(map, intent));
            };
            let child = next.next_child_id();
            let node = Node::new(child, question.as_str())
                .with_notes(answer.as_str())
                .with_notes_collapsed(false)
                .with_style(NodeStyle::answer_theme().filled(&style.defaults()))
                .with_position(new_child_position(map, *parent));
            next.add_child(*parent, node)?;
            next.refresh_visibility()?;
            Outcome::changed(next, intent, Some(Focus::Node(child)))
        }
        Intent::DeleteSubtree(id) => {
            if *id == map.root() || !map.contains(*id) {
                return Ok(noop(map, intent));
            }
            let mut next = map.clone();
            let removed = next.remove_subtree(*id)?;
            next.refresh_visibility()?;
            debug!(node:% = id, removed = removed.len(); "Deleted subtree");
            Outcome::changed(next, intent, Some(Focus::FitAll))
        }
        Intent::ToggleCollapse(id) => {
            let mut next = map.clone();
            let Some(node) = next.node_mut(*id) else {
                return Ok(noop(map, intent));
            };
            node.set_collapsed(!node.is_collapsed());
            next.refresh_visibility()?;
            Outcome::changed(next, intent, Some(Focus::Node(*id)))
        }
        Intent::SetLabel { node, label } => {
            edit_node(map, intent, *node, |node| node.set_label(label.as_str()))
        }
        Intent::SetNotes { node, notes } => {
            edit_node(map, intent, *node, |node| node.set_notes(notes.as_str()))
        }
        Intent::ToggleNotesCollapsed(id) => edit_node(map, intent, *id, |node| {
            node.set_notes_collapsed(!node.notes_collapsed())
        }),
        Intent::SetStyle { node, patch } => {
            let patch = valid_patch(*node, patch);
            edit_node(map, intent, *node, |node| {
                node.set_style(node.style().patched(&patch))
            })
        }
        Intent::ChangeFontSize { target, delta } => {
            change_font_size(map, intent, *target, *delta, style, selection)
        }
        Intent::CycleBackground(id) => {
            let palette = style.palette();
            if palette.is_empty() {
                return Ok(noop(map, intent));
            }
            edit_node(map, intent, *id, |node| {
                let next = next_palette_color(palette, node.style().background_color());
                node.set_style(node.style().clone().with_background_color(next));
            })
        }
        Intent::Relayout => Outcome::changed(map.clone(), intent, Some(Focus::FitAll)),
    };
    trace!(map:? = outcome.map(); "Map after intent");
    Ok(outcome)
}

fn noop(map: &MindMap, intent: &Intent) -> Outcome {
    debug!(intent:?; "Intent precondition failed, ignoring");
    Outcome::unchanged(map)
}

/// A copy of `map` if `parent` exists and accepts children.
fn expandable_copy(map: &MindMap, parent: Id) -> Option<MindMap> {
    map.node(parent)
        .filter(|node| node.accepts_children())
        .map(|_| map.clone())
}

fn new_child_position(map: &MindMap, parent: Id) -> Point {
    map.node(parent)
        .map(|node| node.position())
        .unwrap_or_default()
        .add_point(NEW_CHILD_OFFSET)
}

/// Applies `edit` to one node of a copy of `map`. Never relays out.
fn edit_node(map: &MindMap, intent: &Intent, id: Id, edit: impl FnOnce(&mut Node)) -> Outcome {
    let mut next = map.clone();
    match next.node_mut(id) {
        Some(node) => {
            edit(node);
            Outcome::changed(next, intent, None)
        }
        None => noop(map, intent),
    }
}

/// Drops colors that do not parse from a style patch.
fn valid_patch(node: Id, patch: &NodeStyle) -> NodeStyle {
    let mut valid = NodeStyle::default();
    if let Some(color) = patch.background_color() {
        match Color::new(color) {
            Ok(_) => valid = valid.with_background_color(color),
            Err(err) => warn!(node:% = node, err:% = err; "Ignoring invalid background color"),
        }
    }
    if let Some(color) = patch.text_color() {
        match Color::new(color) {
            Ok(_) => valid = valid.with_text_color(color),
            Err(err) => warn!(node:% = node, err:% = err; "Ignoring invalid text color"),
        }
    }
    if let Some(size) = patch.font_size().filter(|size| size.is_finite() && *size > 0.0) {
        valid = valid.with_font_size(size);
    }
    valid
}

fn change_font_size(
    map: &MindMap,
    intent: &Intent,
    target: FontTarget,
    delta: f32,
    style: &StyleConfig,
    selection: &IndexSet<Id>,
) -> Outcome {
    let targets: Vec<Id> = match target {
        FontTarget::Node(id) => vec![id],
        FontTarget::Selected => selection.iter().copied().collect(),
    };
    let defaults = style.defaults();

    let mut next = map.clone();
    let mut changed = false;
    for id in targets {
        let Some(node) = next.node_mut(id) else {
            continue;
        };
        let current = node.style().font_size_or(&defaults);
        let size = (current + delta).max(style.min_font_size());
        node.set_style(node.style().clone().with_font_size(size));
        changed = true;
    }

    if changed {
        Outcome::changed(next, intent, None)
    } else {
        noop(map, intent)
    }
}

/// The palette entry after `current`, wrapping around. Colors outside the
/// palette restart it.
fn next_palette_color<'a>(palette: &'a [String], current: Option<&str>) -> &'a str {
    let next = current
        .and_then(|color| palette.iter().position(|entry| entry.eq_ignore_ascii_case(color)))
        .map_or(0, |index| (index + 1) % palette.len());
    palette[next].as_str()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn id(name: &str) -> Id {
        Id::new(name)
    }

    /// root -> a -> a1, root -> b
    fn sample() -> MindMap {
        let mut map = MindMap::new();
        let root = map.root();
        map.add_child(root, Node::new(id("a"), "A")).unwrap();
        map.add_child(id("a"), Node::new(id("a1"), "A1")).unwrap();
        map.add_child(root, Node::new(id("b"), "B")).unwrap();
        map
    }

    fn run(map: &MindMap, intent: Intent) -> Outcome {
        apply(map, &intent, &StyleConfig::default(), &IndexSet::new()).unwrap()
    }

    #[test]
    fn test_add_child() {
        let map = MindMap::new();
        let root = map.root();

        let outcome = run(&map, Intent::AddChild { parent: root });
        let next = outcome.map();
        let child = next.children_of(root).next().unwrap();

        assert!(outcome.is_changed());
        assert!(outcome.needs_relayout());
        assert_eq!(outcome.focus(), Some(Focus::Node(child)));
        assert_eq!(child, "node_2");
        assert_eq!(next.nodes_count(), 2);
        assert_eq!(next.node(child).unwrap().label(), NEW_TOPIC_LABEL);
        assert!(next.node(child).unwrap().notes_collapsed());
        // the input is untouched
        assert_eq!(map.nodes_count(), 1);
    }

    #[test]
    fn test_add_child_under_collapsed_parent_is_noop() {
        let mut map = sample();
        map.node_mut(id("a")).unwrap().set_collapsed(true);

        let outcome = run(&map, Intent::AddChild { parent: id("a") });

        assert!(!outcome.is_changed());
        assert_eq!(outcome.focus(), None);
        assert_eq!(outcome.map().nodes_count(), map.nodes_count());
    }

    #[test]
    fn test_add_child_under_hidden_parent_is_noop() {
        // a1 is hidden once a is collapsed
        let collapsed = run(&sample(), Intent::ToggleCollapse(id("a")));
        let map = collapsed.map();

        let child = run(map, Intent::AddChild { parent: id("a1") });
        let answer = run(
            map,
            Intent::AddAnswer {
                parent: id("a1"),
                question: "why".to_string(),
                answer: "because".to_string(),
            },
        );

        assert!(!child.is_changed());
        assert!(!answer.is_changed());
        assert_eq!(child.map().nodes_count(), map.nodes_count());
    }

    #[test]
    fn test_add_child_keeps_hidden_flags_current() {
        let mut map = sample();
        map.node_mut(id("b")).unwrap().set_collapsed(true);
        map.refresh_visibility().unwrap();

        let outcome = run(&map, Intent::AddChild { parent: id("a1") });
        let next = outcome.map();
        let child = next.children_of(id("a1")).next().unwrap();

        assert!(!next.node(child).unwrap().is_hidden());
        assert!(!next.node(id("a1")).unwrap().is_hidden());
    }

    #[test]
    fn test_add_child_to_missing_parent_is_noop() {
        let outcome = run(&sample(), Intent::AddChild { parent: id("ghost") });

        assert!(!outcome.is_changed());
    }

    #[test]
    fn test_delete_subtree_removes_descendants() {
        let outcome = run(&sample(), Intent::DeleteSubtree(id("a")));
        let next = outcome.map();

        assert!(outcome.is_changed());
        assert_eq!(outcome.focus(), Some(Focus::FitAll));
        assert!(!next.contains(id("a")));
        assert!(!next.contains(id("a1")));
        assert!(next.contains(id("b")));
        assert!(next.edges().all(|edge| edge.source() != id("a") && edge.target() != id("a1")));
    }

    #[test]
    fn test_delete_root_is_noop() {
        let map = sample();
        let outcome = run(&map, Intent::DeleteSubtree(map.root()));

        assert!(!outcome.is_changed());
        assert_eq!(outcome.map().nodes_count(), 4);
    }

    #[test]
    fn test_toggle_collapse_hides_and_reveals() {
        let collapsed = run(&sample(), Intent::ToggleCollapse(id("a")));
        assert!(collapsed.map().node(id("a1")).unwrap().is_hidden());
        assert!(!collapsed.map().node(id("a")).unwrap().is_hidden());
        assert_eq!(collapsed.focus(), Some(Focus::Node(id("a"))));

        let expanded = run(collapsed.map(), Intent::ToggleCollapse(id("a")));
        assert!(!expanded.map().node(id("a1")).unwrap().is_hidden());
    }

    #[test]
    fn test_field_edits_do_not_relayout() {
        let map = sample();
        let intents = [
            Intent::SetLabel {
                node: id("a"),
                label: "Renamed".to_string(),
            },
            Intent::SetNotes {
                node: id("a"),
                notes: "Some notes".to_string(),
            },
            Intent::ToggleNotesCollapsed(id("a")),
            Intent::CycleBackground(id("a")),
        ];

        for intent in intents {
            let outcome = run(&map, intent);
            assert!(outcome.is_changed());
            assert!(!outcome.needs_relayout());
            assert_eq!(outcome.focus(), None);
        }
    }

    #[test]
    fn test_set_style_ignores_invalid_colors() {
        let patch = NodeStyle::default()
            .with_background_color("not-a-color")
            .with_text_color("#112233");

        let outcome = run(
            &sample(),
            Intent::SetStyle {
                node: id("a"),
                patch,
            },
        );
        let style = outcome.map().node(id("a")).unwrap().style();

        assert_eq!(style.background_color(), None);
        assert_eq!(style.text_color(), Some("#112233"));
    }

    #[test]
    fn test_font_size_has_a_floor() {
        let outcome = run(
            &sample(),
            Intent::ChangeFontSize {
                target: FontTarget::Node(id("a")),
                delta: -100.0,
            },
        );

        let size = outcome.map().node(id("a")).unwrap().style().font_size();
        assert_approx_eq!(f32, size.unwrap(), 8.0);
    }

    #[test]
    fn test_font_size_applies_to_selection() {
        let map = sample();
        let selection: IndexSet<Id> = [id("a"), id("b"), id("ghost")].into_iter().collect();
        let intent = Intent::ChangeFontSize {
            target: FontTarget::Selected,
            delta: 2.0,
        };

        let outcome = apply(&map, &intent, &StyleConfig::default(), &selection).unwrap();
        let size = |name| outcome.map().node(id(name)).unwrap().style().font_size();

        assert_eq!(size("a"), Some(16.0));
        assert_eq!(size("b"), Some(16.0));
        assert_eq!(size("a1"), None);
    }

    #[test]
    fn test_font_size_with_empty_selection_is_noop() {
        let outcome = run(
            &sample(),
            Intent::ChangeFontSize {
                target: FontTarget::Selected,
                delta: 2.0,
            },
        );

        assert!(!outcome.is_changed());
    }

    #[test]
    fn test_cycle_background_wraps() {
        let palette: Vec<String> = ["#ffeb3b", "#4caf50"].map(String::from).to_vec();

        assert_eq!(next_palette_color(&palette, None), "#ffeb3b");
        assert_eq!(next_palette_color(&palette, Some("#ffffff")), "#ffeb3b");
        assert_eq!(next_palette_color(&palette, Some("#FFEB3B")), "#4caf50");
        assert_eq!(next_palette_color(&palette, Some("#4caf50")), "#ffeb3b");
    }

    #[test]
    fn test_add_answer_shows_notes() {
        let map = sample();
        let outcome = run(
            &map,
            Intent::AddAnswer {
                parent: id("b"),
                question: "Why?".to_string(),
                answer: "Because.".to_string(),
            },
        );
        let next = outcome.map();
        let child = next.children_of(id("b")).next().unwrap();
        let node = next.node(child).unwrap();

        assert_eq!(node.label(), "Why?");
        assert_eq!(node.notes(), "Because.");
        assert!(!node.notes_collapsed());
        assert_eq!(node.style().background_color(), Some("#fef9c3"));
        assert_eq!(outcome.focus(), Some(Focus::Node(child)));
    }

    #[test]
    fn test_relayout_always_changes() {
        let outcome = run(&sample(), Intent::Relayout);

        assert!(outcome.is_changed());
        assert!(outcome.needs_relayout());
        assert_eq!(outcome.focus(), Some(Focus::FitAll));
    }
}
