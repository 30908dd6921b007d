use mindmap_core::identifier::Id;
use mindmap_ingest::{IngestError, IngestOptions, Shape, normalize, parse};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

#[test]
fn test_round_trip_of_canonical_document() {
    let source = r##"{
        "nodes": [
            {
                "id": "root",
                "type": "mindmap",
                "data": {
                    "label": "Central Topic",
                    "notes": "",
                    "notesCollapsed": true,
                    "style": { "backgroundColor": "#ffffff", "textColor": "#333333", "fontSize": 14 }
                },
                "position": { "x": 250, "y": 200 }
            },
            {
                "id": "node_2",
                "data": { "label": "Idea", "notes": "Long text", "notesCollapsed": false },
                "position": { "x": 600, "y": 200 }
            }
        ],
        "edges": [{ "id": "edge-root-node_2", "source": "root", "target": "node_2" }]
    }"##;

    let ingested = parse(source, &IngestOptions::default()).expect("Failed to parse");

    assert_eq!(ingested.shape(), Shape::Canonical);
    let map = ingested.map();
    assert_eq!(map.root(), "root");

    let idea = map.node(Id::new("node_2")).unwrap();
    assert_eq!(idea.label(), "Idea");
    assert_eq!(idea.notes(), "Long text");
    assert!(!idea.notes_collapsed());
    assert_eq!(idea.position().x(), 600.0);
}

#[test]
fn test_linked_records_with_dashed_keys() {
    let value = json!({
        "a": { "Previous": null, "Question": "Root" },
        "a-b": { "Previous": "a", "Question": "Left" },
        "b-c": { "Previous": "a", "Question": "Right" },
        "c": { "Previous": "a-b", "Question": "Leaf" }
    });

    let ingested = normalize(&value, &IngestOptions::default()).expect("Failed to normalize");
    let map = ingested.map();

    assert_eq!(map.nodes_count(), 4);
    assert_eq!(map.edges_count(), 3);
    assert!(map.validate().is_ok());
}

#[test]
fn test_non_object_input_is_unrecognized() {
    for value in [json!([1, 2, 3]), json!("text"), json!(3), json!(null)] {
        let result = normalize(&value, &IngestOptions::default());
        assert!(matches!(result, Err(IngestError::UnrecognizedFormat(_))));
    }
}

#[test]
fn test_freeform_can_be_disabled() {
    let value = json!({ "anything": { "title": "x" } });

    let strict = IngestOptions::new(false, true, Default::default());
    assert!(matches!(
        normalize(&value, &strict),
        Err(IngestError::UnrecognizedFormat(_))
    ));

    let lenient = normalize(&value, &IngestOptions::default()).unwrap();
    assert_eq!(lenient.shape(), Shape::Freeform);
}

#[test]
fn test_depth_styling_can_be_disabled() {
    let value = json!({
        "A": { "Previous": null, "Question": "q", "Answer": "" },
        "B": { "Previous": "A", "Question": "b", "Answer": "" }
    });

    let plain = IngestOptions::new(true, false, Default::default());
    let map = normalize(&value, &plain).unwrap().into_parts().0;

    for node in map.nodes() {
        assert_eq!(node.style().background_color(), Some("#ffffff"));
    }
}

#[test]
fn test_syntax_error_reports_location() {
    let err = parse("{\n  \"nodes\": [,\n}", &IngestOptions::default()).unwrap_err();
    assert_eq!(err.location().map(|(line, _)| line), Some(2));
}

/// Builds a linked-record set of `count` records where the records listed in
/// `roots` have a null parent and every other record points to record 0.
fn linked_records(count: usize, roots: &[usize]) -> Value {
    let mut object = Map::new();
    for index in 0..count {
        let previous = if roots.contains(&index) {
            Value::Null
        } else {
            json!("r0")
        };
        object.insert(
            format!("r{index}"),
            json!({ "Previous": previous, "Question": format!("q{index}"), "Answer": "" }),
        );
    }
    Value::Object(object)
}

proptest! {
    #[test]
    fn prop_single_null_parent_is_linked_record(count in 1usize..20) {
        let value = linked_records(count, &[0]);
        let ingested = normalize(&value, &IngestOptions::default()).unwrap();

        prop_assert_eq!(ingested.shape(), Shape::LinkedRecord);
        prop_assert_eq!(ingested.map().root(), Id::new("r0"));
        prop_assert_eq!(ingested.map().nodes_count(), count);
        prop_assert_eq!(ingested.map().edges_count(), count - 1);
    }

    #[test]
    fn prop_zero_or_many_null_parents_fail(count in 2usize..20, extra in 1usize..5) {
        // record 0 is always a root; `extra` more roots make it ambiguous
        let roots: Vec<usize> = (0..=extra.min(count - 1)).collect();
        let value = linked_records(count, &roots);

        let result = normalize(&value, &IngestOptions::default());
        let is_no_root = matches!(result, Err(IngestError::NoRootFound { .. }));
        prop_assert!(is_no_root);
    }
}

#[test]
fn test_no_null_parent_fails() {
    let value = json!({
        "a": { "Previous": "a", "Question": "", "Answer": "" }
    });
    let result = normalize(&value, &IngestOptions::default());
    assert!(matches!(result, Err(IngestError::NoRootFound { candidates }) if candidates.is_empty()));
}
