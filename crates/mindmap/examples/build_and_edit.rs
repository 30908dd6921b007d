//! Example: Building and editing a mind map programmatically
//!
//! This example starts from an empty map, applies a few edits through the
//! editor, asks a question about one node, and prints the canonical JSON.

use mindmap::{
    MindMapBuilder,
    mutation::{FontTarget, Intent},
    responder::CannedResponder,
    viewport::Viewport,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let builder = MindMapBuilder::default();
    let mut editor = builder.editor();
    let viewport = Viewport::new(1280.0, 720.0);
    let root = editor.map().root();

    // Every change has to be settled before the next one is accepted. The
    // callback is where a renderer would move its camera.
    let settle = |editor: &mut mindmap::editor::Editor| {
        let camera = editor
            .pending_focus()
            .map(|focus| editor.camera(&viewport, focus));
        editor.settle(|map, focus| {
            println!("{} nodes, focus {focus:?}, camera {camera:?}", map.nodes_count());
        });
    };

    editor.apply(Intent::SetLabel {
        node: root,
        label: "Rust".to_string(),
    })?;
    settle(&mut editor);

    for _ in 0..3 {
        editor.apply(Intent::AddChild { parent: root })?;
        settle(&mut editor);
    }

    let children: Vec<_> = editor.map().children_of(root).collect();
    for (child, label) in children.iter().zip(["Ownership", "Traits", "Async"]) {
        editor.apply(Intent::SetLabel {
            node: *child,
            label: label.to_string(),
        })?;
        settle(&mut editor);
    }

    editor.select(children[0]);
    editor.apply(Intent::ChangeFontSize {
        target: FontTarget::Selected,
        delta: builder.config().style().font_step(),
    })?;
    settle(&mut editor);

    let responder = CannedResponder::new().with_answer(
        children[1],
        "\"{question}\": a trait declares behavior that types implement.",
    );
    editor.ask(children[1], "What is a trait?", &responder)?;
    settle(&mut editor);

    println!("{}", builder.export_json(editor.map())?);
    Ok(())
}
