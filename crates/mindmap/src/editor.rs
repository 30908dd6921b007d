//! Interactive editing session.
//!
//! An [`Editor`] owns the current map and commits edits in two phases:
//!
//! 1. [`Editor::apply`] edits the map, lays it out if needed, commits the
//!    result and records where the viewport should go next.
//! 2. After painting the committed map, the renderer calls
//!    [`Editor::settle`], which hands over the recorded [`Focus`].
//!
//! No new edit is accepted between the two phases, so the viewport never
//! focuses a node whose position is stale or that a later edit removed.

use indexmap::IndexSet;
use log::{debug, info, trace};
use serde_json::Value;
use thiserror::Error;

use mindmap_core::{
    document::Document,
    error::GraphError,
    identifier::Id,
    model::{MindMap, Node},
};
use mindmap_ingest::{IngestError, Shape};

use crate::{
    config::AppConfig,
    export,
    layout::{self, Algorithm, EngineBuilder},
    mutation::{self, Intent},
    responder::{Responder, ResponderError},
    viewport::{Camera, Focus, Viewport},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("The previous change has not been settled yet")]
    FocusPending,

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Responder(#[from] ResponderError),
}

/// What an accepted edit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    changed: bool,
    focus: Option<Focus>,
}

impl Applied {
    const UNCHANGED: Self = Self {
        changed: false,
        focus: None,
    };

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// The focus waiting for [`Editor::settle`].
    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }
}

/// An editing session over one mind map.
pub struct Editor {
    config: AppConfig,
    engines: EngineBuilder,
    map: MindMap,
    selection: IndexSet<Id>,
    pending: Option<Focus>,
}

impl Editor {
    /// Starts a session on a fresh map holding only the root.
    pub fn new(config: AppConfig) -> Self {
        Self::with_map(config, MindMap::new())
    }

    /// Starts a session on `map`.
    pub fn with_map(config: AppConfig, map: MindMap) -> Self {
        let engines = EngineBuilder::from_config(config.layout());
        Self {
            config,
            engines,
            map,
            selection: IndexSet::new(),
            pending: None,
        }
    }

    /// The committed map.
    pub fn map(&self) -> &MindMap {
        &self.map
    }

    pub fn into_map(self) -> MindMap {
        self.map
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The focus recorded by the last change, until it is settled.
    pub fn pending_focus(&self) -> Option<Focus> {
        self.pending
    }

    pub fn selection(&self) -> &IndexSet<Id> {
        &self.selection
    }

    /// Adds `id` to the selection. Returns `false` for unknown nodes.
    pub fn select(&mut self, id: Id) -> bool {
        if !self.map.contains(id) {
            return false;
        }
        self.selection.insert(id);
        true
    }

    pub fn deselect(&mut self, id: Id) {
        self.selection.shift_remove(&id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Applies one edit.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::FocusPending`] while the previous change is not
    /// settled, and [`EditorError::Graph`] if the edit or its layout breaks a
    /// structural invariant. The committed map is unchanged on any error.
    pub fn apply(&mut self, intent: Intent) -> Result<Applied, EditorError> {
        self.ensure_settled()?;

        let outcome = mutation::apply(&self.map, &intent, self.config.style(), &self.selection)?;
        if !outcome.is_changed() {
            return Ok(Applied::UNCHANGED);
        }

        let relayout = outcome.needs_relayout();
        let focus = outcome.focus();
        let mut map = outcome.into_map();
        if relayout {
            let layout = self.engines.engine(Algorithm::Layered).calculate(&map)?;
            layout.apply_to(&mut map);
        }

        self.commit(map, focus);
        info!(intent:?, relayout; "Change committed");
        Ok(Applied {
            changed: true,
            focus,
        })
    }

    /// Asks `responder` about `node` and adds the answer as a new child.
    ///
    /// Nothing is asked when the node is missing, collapsed or hidden.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Responder`] if no answer was produced, plus the
    /// errors of [`Editor::apply`].
    pub fn ask(
        &mut self,
        node: Id,
        question: &str,
        responder: &dyn Responder,
    ) -> Result<Applied, EditorError> {
        self.ensure_settled()?;
        let askable = self.map.node(node).is_some_and(Node::accepts_children);
        if !askable {
            debug!(node:% = node; "Cannot ask about a missing, collapsed or hidden node");
            return Ok(Applied::UNCHANGED);
        }

        let answer = responder.answer(node, question)?;
        self.apply(Intent::AddAnswer {
            parent: node,
            question: question.to_string(),
            answer: answer.into_text(),
        })
    }

    /// Replaces the map with the one parsed from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Ingest`] if `source` cannot be imported. The
    /// current map is kept on any error.
    pub fn import(&mut self, source: &str) -> Result<Shape, EditorError> {
        self.ensure_settled()?;
        let ingested = mindmap_ingest::parse(source, &self.config.ingest_options())?;
        self.commit_import(ingested)
    }

    /// Replaces the map with the one converted from `value`.
    ///
    /// # Errors
    ///
    /// Same as [`Editor::import`].
    pub fn import_value(&mut self, value: &Value) -> Result<Shape, EditorError> {
        self.ensure_settled()?;
        let ingested = mindmap_ingest::normalize(value, &self.config.ingest_options())?;
        self.commit_import(ingested)
    }

    /// The canonical document of the committed map.
    pub fn export(&self) -> Document {
        export::document(&self.map, &self.config)
    }

    /// Completes the last change.
    ///
    /// `on_settled` receives the committed map and the recorded focus. It is
    /// meant to run after the renderer has painted the committed positions.
    /// Returns the focus that was handed over.
    pub fn settle<F>(&mut self, on_settled: F) -> Option<Focus>
    where
        F: FnOnce(&MindMap, Option<Focus>),
    {
        let focus = self.pending.take();
        trace!(focus:?; "Settling change");
        on_settled(&self.map, focus);
        focus
    }

    /// The camera for `focus` on the committed map.
    pub fn camera(&self, viewport: &Viewport, focus: Focus) -> Camera {
        viewport.camera(&self.map, focus, &self.engines.sizing())
    }

    fn ensure_settled(&self) -> Result<(), EditorError> {
        match self.pending {
            Some(_) => Err(EditorError::FocusPending),
            None => Ok(()),
        }
    }

    fn commit_import(&mut self, ingested: mindmap_ingest::Ingested) -> Result<Shape, EditorError> {
        let (mut map, shape) = ingested.into_parts();
        layout::place_imported(&mut map, shape, &self.engines)?;

        info!(shape:% = shape, nodes = map.nodes_count(); "Imported mind map");
        self.selection.clear();
        self.commit(map, Some(Focus::FitAll));
        Ok(shape)
    }

    fn commit(&mut self, map: MindMap, focus: Option<Focus>) {
        self.map = map;
        let map = &self.map;
        self.selection.retain(|id| map.contains(*id));
        self.pending = focus;
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::{mutation::FontTarget, responder::CannedResponder};

    fn editor() -> Editor {
        Editor::new(AppConfig::default())
    }

    fn settle(editor: &mut Editor) -> Option<Focus> {
        editor.settle(|_, _| {})
    }

    #[test]
    fn test_add_child_commits_layout_and_focus() {
        let mut editor = editor();
        let root = editor.map().root();
        let pinned = editor.map().root_node().unwrap().position();

        let applied = editor.apply(Intent::AddChild { parent: root }).unwrap();
        let child = editor.map().children_of(root).next().unwrap();

        assert!(applied.is_changed());
        assert_eq!(applied.focus(), Some(Focus::Node(child)));
        assert_eq!(editor.pending_focus(), Some(Focus::Node(child)));
        let position = editor.map().node(child).unwrap().position();
        assert_approx_eq!(f32, position.x(), pinned.x() + 400.0);
        assert_approx_eq!(f32, position.y(), pinned.y());
    }

    #[test]
    fn test_second_edit_waits_for_settle() {
        let mut editor = editor();
        let root = editor.map().root();
        editor.apply(Intent::AddChild { parent: root }).unwrap();

        let err = editor.apply(Intent::AddChild { parent: root }).unwrap_err();
        assert_eq!(err, EditorError::FocusPending);
        assert_eq!(editor.map().nodes_count(), 2);

        let mut seen = None;
        editor.settle(|map, focus| seen = Some((map.nodes_count(), focus)));
        let child = editor.map().children_of(root).next().unwrap();
        assert_eq!(seen, Some((2, Some(Focus::Node(child)))));
        assert_eq!(editor.pending_focus(), None);

        assert!(editor.apply(Intent::AddChild { parent: root }).is_ok());
    }

    #[test]
    fn test_noop_records_no_focus() {
        let mut editor = editor();
        let root = editor.map().root();

        let applied = editor.apply(Intent::DeleteSubtree(root)).unwrap();

        assert!(!applied.is_changed());
        assert_eq!(editor.pending_focus(), None);
    }

    #[test]
    fn test_field_edits_leave_positions_alone() {
        let mut editor = editor();
        let root = editor.map().root();
        editor.apply(Intent::AddChild { parent: root }).unwrap();
        settle(&mut editor);
        let child = editor.map().children_of(root).next().unwrap();
        let before = editor.map().node(child).unwrap().position();

        editor
            .apply(Intent::SetNotes {
                node: child,
                notes: "x".repeat(300),
            })
            .unwrap();

        assert_eq!(editor.map().node(child).unwrap().position(), before);
        assert_eq!(editor.pending_focus(), None);
    }

    #[test]
    fn test_selection_drives_font_changes_and_drops_deleted_nodes() {
        let mut editor = editor();
        let root = editor.map().root();
        editor.apply(Intent::AddChild { parent: root }).unwrap();
        settle(&mut editor);
        let child = editor.map().children_of(root).next().unwrap();

        assert!(editor.select(child));
        assert!(!editor.select(Id::new("ghost")));
        editor
            .apply(Intent::ChangeFontSize {
                target: FontTarget::Selected,
                delta: 2.0,
            })
            .unwrap();
        assert_eq!(editor.map().node(child).unwrap().style().font_size(), Some(16.0));

        editor.apply(Intent::DeleteSubtree(child)).unwrap();
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_ask_adds_answer_child() {
        let mut editor = editor();
        let root = editor.map().root();
        let responder = CannedResponder::new().with_answer(root, "It is about {question}");

        let applied = editor.ask(root, "maps", &responder).unwrap();
        let child = editor.map().children_of(root).next().unwrap();
        let node = editor.map().node(child).unwrap();

        assert_eq!(applied.focus(), Some(Focus::Node(child)));
        assert_eq!(node.label(), "maps");
        assert_eq!(node.notes(), "It is about maps");
        assert!(!node.notes_collapsed());
    }

    #[test]
    fn test_ask_about_hidden_node_is_noop() {
        let mut editor = editor();
        let root = editor.map().root();
        editor.apply(Intent::AddChild { parent: root }).unwrap();
        settle(&mut editor);
        let child = editor.map().children_of(root).next().unwrap();
        editor.apply(Intent::AddChild { parent: child }).unwrap();
        settle(&mut editor);
        let grandchild = editor.map().children_of(child).next().unwrap();
        editor.apply(Intent::ToggleCollapse(child)).unwrap();
        settle(&mut editor);

        // an empty question would be rejected if the responder were asked
        let applied = editor.ask(grandchild, "", &CannedResponder::new()).unwrap();

        assert!(!applied.is_changed());
        assert_eq!(editor.map().nodes_count(), 3);
    }

    #[test]
    fn test_ask_failure_changes_nothing() {
        let mut editor = editor();
        let root = editor.map().root();

        let err = editor.ask(root, "", &CannedResponder::new()).unwrap_err();

        assert!(matches!(err, EditorError::Responder(_)));
        assert_eq!(editor.map().nodes_count(), 1);
        assert_eq!(editor.pending_focus(), None);
    }

    #[test]
    fn test_failed_import_keeps_current_map() {
        let mut editor = editor();
        let root = editor.map().root();
        editor.apply(Intent::AddChild { parent: root }).unwrap();
        settle(&mut editor);

        let err = editor
            .import(r#"{"A": {"Previous": null}, "B": {"Previous": null}}"#)
            .unwrap_err();

        assert!(matches!(err, EditorError::Ingest(IngestError::NoRootFound { .. })));
        assert_eq!(editor.map().nodes_count(), 2);
        assert_eq!(editor.pending_focus(), None);
    }

    #[test]
    fn test_import_lays_out_and_fits_all() {
        let mut editor = editor();
        let shape = editor
            .import(
                r#"{
                    "A": {"Previous": null, "Question": "Topic", "Answer": ""},
                    "B": {"Previous": "A", "Question": "First", "Answer": ""},
                    "C": {"Previous": "A", "Question": "Second", "Answer": ""}
                }"#,
            )
            .unwrap();

        assert_eq!(shape, Shape::LinkedRecord);
        assert_eq!(editor.pending_focus(), Some(Focus::FitAll));
        let b = editor.map().node(Id::new("B")).unwrap().position();
        let c = editor.map().node(Id::new("C")).unwrap().position();
        assert_approx_eq!(f32, b.x(), c.x());
        assert!(b.y() != c.y());
    }

    #[test]
    fn test_camera_follows_committed_positions() {
        let mut editor = editor();
        let root = editor.map().root();
        editor.apply(Intent::AddChild { parent: root }).unwrap();

        let focus = editor.pending_focus().unwrap();
        let camera = editor.camera(&Viewport::default(), focus);
        let child = editor.map().children_of(root).next().unwrap();

        assert_eq!(camera.center(), editor.map().node(child).unwrap().position());
    }
}
