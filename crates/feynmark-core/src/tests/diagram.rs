use crate::geom::point;
use crate::*;

const SAMPLE: &str = r#"{
  "nodes": {
    "v1": { "style": "blob" },
    "v2": {},
    "v3": { "style": "hexagon" }
  },
  "edges": [
    { "start": [0, 0], "end": [40, 0], "bend": 0.0, "type": "fermion",
      "start_node": "v1", "end_node": "v2", "label": "p", "is_anti": true },
    { "id": "gamma", "start": [40, 0], "end": [80, 20], "bend": 0.3, "type": "photon",
      "start_node": "v2", "end_node": "v3" },
    { "start": [80, 20], "end": [0, 0], "type": "graviton",
      "start_node": "v3", "end_node": "v1" }
  ]
}"#;

#[test]
fn decodes_generator_json() {
    let diagram = DiagramSpec::from_json(SAMPLE).expect("decode");

    let ids: Vec<&str> = diagram.nodes.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["v1", "v2", "v3"]);
    assert!(diagram.is_special("v1"));
    assert!(!diagram.is_special("v2"));
    assert_eq!(diagram.node("v3").and_then(|n| n.style), Some(VertexStyle::None));

    assert_eq!(diagram.edges.len(), 3);
    let first = &diagram.edges[0];
    assert_eq!(first.id, "e0");
    assert_eq!(first.start, point(0.0, 0.0));
    assert_eq!(first.end, point(40.0, 0.0));
    assert_eq!(first.particle, Particle::Fermion);
    assert_eq!(first.label.as_deref(), Some("p"));
    assert!(first.anti);

    let second = &diagram.edges[1];
    assert_eq!(second.id, "gamma");
    assert_eq!(second.bend, 0.3);
    assert_eq!(second.label, None);
    assert!(!second.anti);

    assert_eq!(diagram.edges[2].id, "e2");
    assert_eq!(diagram.edges[2].particle, Particle::None);
    assert_eq!(diagram.edges[2].bend, 0.0);
}

#[test]
fn malformed_json_is_a_reportable_error() {
    let err = DiagramSpec::from_json("{ \"edges\": [ { \"start\": [0] } ] }").unwrap_err();
    assert!(matches!(err, Error::Json(_)));
    assert!(err.to_string().starts_with("Invalid diagram JSON"));
}

#[test]
fn missing_node_ids_are_rejected() {
    let text = r#"{ "edges": [ { "start": [0, 0], "end": [1, 0], "type": "photon",
        "start_node": "", "end_node": "b" } ] }"#;
    let err = DiagramSpec::from_json(text).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Diagram generation input error: edge e0 is missing a start or end node id"
    );
}

#[test]
fn generate_from_json_leaves_defs_untouched_on_error() {
    let mut defs = DefsStore::new();
    let res = generate_from_json("not json", &GenerationOptions::default(), &mut defs);
    assert!(res.is_err());
    assert!(defs.is_empty());

    let plan =
        generate_from_json(SAMPLE, &GenerationOptions::default(), &mut defs).expect("plan");
    assert_eq!(plan.edges.len(), 3);
    assert!(!defs.is_empty());

    // v1 is claimed by the first edge; the closing edge back to v1 gets nothing.
    let first = plan.edges[0].decorations.vertices.as_ref().expect("blob");
    assert_eq!(first.endpoints, EndpointSelection::START);
    assert!(plan.edges[2].decorations.vertices.is_none());
    assert_eq!(
        plan.edges[0].decorations.arrow.as_ref().map(|a| a.direction),
        Some(Direction::Backward)
    );
}
