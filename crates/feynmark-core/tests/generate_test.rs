use feynmark_core::{DefsStore, Error, GenerationOptions, generate_from_json};
use serde_json::json;

const TRIANGLE: &str = r#"{
  "nodes": { "a": {}, "hub": { "style": "Blob" }, "b": {}, "c": {} },
  "edges": [
    { "start_node": "a", "end_node": "hub", "start": [0, 0], "end": [1, 0], "type": "fermion" },
    { "start_node": "hub", "end_node": "b", "start": [1, 0], "end": [2, 1], "type": "gluon", "bend": 0.2 },
    { "start_node": "c", "end_node": "hub", "start": [1, 2], "end": [1, 0], "type": "ghost", "label": "k" }
  ]
}"#;

#[test]
fn shared_blob_is_decorated_on_the_first_edge_only() {
    let options = GenerationOptions::default().with_scale(10.0);
    let mut defs = DefsStore::new();
    let plan = generate_from_json(TRIANGLE, &options, &mut defs).expect("generate");

    let decorated: Vec<bool> = plan
        .edges
        .iter()
        .map(|e| e.decorations.vertices.is_some())
        .collect();
    assert_eq!(decorated, vec![true, false, false]);

    let json = serde_json::to_value(&plan.edges[0]).expect("serialize");
    assert_eq!(json["curve"]["start"], json!([50.0, 50.0]));
    assert_eq!(json["curve"]["end"], json!([60.0, 50.0]));
    assert_eq!(
        json["decorations"]["vertices"],
        json!({
            "style": "blob",
            "endpoints": { "start": false, "end": true },
            "marker_id": "fmarker_blob_3"
        })
    );
    assert_eq!(
        serde_json::to_value(&plan.edges[2].decorations.stroke).expect("serialize"),
        json!({ "kind": "dashed", "dash": "1, 3" })
    );
    assert!(plan.edges[2].decorations.label.is_some());
}

#[test]
fn malformed_json_is_an_error_and_registers_nothing() {
    let mut defs = DefsStore::new();
    let text = r#"{ "edges": [ { "start": 3 } ] }"#;
    let err = generate_from_json(text, &GenerationOptions::default(), &mut defs).unwrap_err();
    assert!(matches!(err, Error::Json(_)));
    assert!(defs.is_empty());
}
