//! Property tests over random edit sequences and random trees.

use std::collections::HashSet;

use proptest::prelude::*;

use mindmap::{
    config::AppConfig,
    editor::Editor,
    geometry::Point,
    identifier::Id,
    layout::{Algorithm, EngineBuilder},
    model::{MindMap, Node},
    mutation::{FontTarget, Intent},
};

/// An edit aimed at the node with index `target` modulo the node count.
#[derive(Debug, Clone)]
enum Step {
    AddChild(usize),
    Delete(usize),
    Toggle(usize),
    Font(usize, i8),
    Relayout,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => any::<usize>().prop_map(Step::AddChild),
        2 => any::<usize>().prop_map(Step::Delete),
        2 => any::<usize>().prop_map(Step::Toggle),
        1 => (any::<usize>(), any::<i8>()).prop_map(|(n, d)| Step::Font(n, d)),
        1 => Just(Step::Relayout),
    ]
}

fn pick(map: &MindMap, index: usize) -> Id {
    let ids: Vec<Id> = map.nodes().map(Node::id).collect();
    ids[index % ids.len()]
}

fn intent(map: &MindMap, step: &Step) -> Intent {
    match *step {
        Step::AddChild(n) => Intent::AddChild {
            parent: pick(map, n),
        },
        Step::Delete(n) => Intent::DeleteSubtree(pick(map, n)),
        Step::Toggle(n) => Intent::ToggleCollapse(pick(map, n)),
        Step::Font(n, delta) => Intent::ChangeFontSize {
            target: FontTarget::Node(pick(map, n)),
            delta: f32::from(delta),
        },
        Step::Relayout => Intent::Relayout,
    }
}

/// True if some strict ancestor of `id` is collapsed.
fn under_collapsed(map: &MindMap, id: Id) -> bool {
    let mut seen = HashSet::new();
    let mut stack: Vec<Id> = map.parents_of(id).collect();
    while let Some(parent) = stack.pop() {
        if !seen.insert(parent) {
            continue;
        }
        if map.node(parent).is_some_and(Node::is_collapsed) {
            return true;
        }
        stack.extend(map.parents_of(parent));
    }
    false
}

/// Builds a tree where node `i + 1` hangs under node `parents[i] % (i + 1)`.
fn tree(parents: &[usize]) -> MindMap {
    let mut map = MindMap::new();
    let mut ids = vec![map.root()];
    for (i, parent) in parents.iter().enumerate() {
        let id = Id::new(&format!("n{i}"));
        map.add_child(ids[parent % ids.len()], Node::new(id, "topic"))
            .unwrap();
        ids.push(id);
    }
    map
}

proptest! {
    #[test]
    fn test_edits_keep_structure_and_visibility(steps in prop::collection::vec(step(), 1..40)) {
        let mut editor = Editor::new(AppConfig::default());
        let root = editor.map().root();
        let pinned = editor.map().root_node().unwrap().position();

        for step in &steps {
            let intent = intent(editor.map(), step);
            editor.apply(intent).unwrap();
            editor.settle(|_, _| {});

            let map = editor.map();
            prop_assert_eq!(map.roots().collect::<Vec<_>>(), vec![root]);
            prop_assert!(map.validate().is_ok());
            prop_assert_eq!(map.root_node().unwrap().position(), pinned);
            for node in map.nodes() {
                let font = node.style().font_size().unwrap_or(14.0);
                prop_assert!(font >= 8.0);
                prop_assert_eq!(
                    node.is_hidden(),
                    under_collapsed(map, node.id()),
                    "hidden flag of {} is stale",
                    node.id()
                );
            }
        }
    }

    #[test]
    fn test_delete_removes_exactly_the_subtree(parents in prop::collection::vec(any::<usize>(), 1..30), pick_index in any::<usize>()) {
        let map = tree(&parents);
        let target = pick(&map, pick_index);
        prop_assume!(target != map.root());

        let mut expected: HashSet<Id> = map.descendants_of(target).unwrap().into_iter().collect();
        expected.insert(target);

        let mut editor = Editor::with_map(AppConfig::default(), map.clone());
        editor.apply(Intent::DeleteSubtree(target)).unwrap();
        let after = editor.map();

        let before_ids: HashSet<Id> = map.nodes().map(Node::id).collect();
        let after_ids: HashSet<Id> = after.nodes().map(Node::id).collect();
        let removed: HashSet<Id> = before_ids.difference(&after_ids).copied().collect();

        prop_assert_eq!(removed, expected.clone());
        for edge in after.edges() {
            prop_assert!(!expected.contains(&edge.source()));
            prop_assert!(!expected.contains(&edge.target()));
        }
    }

    #[test]
    fn test_tree_layout_sibling_subtrees_do_not_overlap(parents in prop::collection::vec(any::<usize>(), 1..40)) {
        let map = tree(&parents);
        let layout = EngineBuilder::new().engine(Algorithm::Tree).calculate(&map).unwrap();

        // Every placed node keeps its own slot in the layout.
        let mut seen: Vec<Point> = Vec::new();
        for (_, placement) in layout.iter() {
            let position = placement.position();
            prop_assert!(seen.iter().all(|other| *other != position));
            seen.push(position);
        }

        // Sibling subtrees occupy disjoint vertical spans.
        for node in map.nodes() {
            let mut spans: Vec<(f32, f32)> = map
                .children_of(node.id())
                .map(|child| {
                    let mut ids = map.descendants_of(child).unwrap();
                    ids.insert(child);
                    let ys: Vec<f32> = ids
                        .iter()
                        .filter_map(|id| layout.position(*id))
                        .map(|p| p.y())
                        .collect();
                    let min = ys.iter().copied().fold(f32::INFINITY, f32::min);
                    let max = ys.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                    (min, max)
                })
                .collect();
            spans.sort_by(|a, b| a.0.total_cmp(&b.0));
            for pair in spans.windows(2) {
                prop_assert!(pair[0].1 < pair[1].0, "spans {:?} overlap", pair);
            }
        }
    }
}
