use assert_cmd::prelude::*;
use std::fs;
use std::process::Command;

const DIAGRAM: &str = r#"{
  "nodes": { "v1": {}, "hub": { "style": "blob" }, "v2": {} },
  "edges": [
    { "start_node": "v1", "end_node": "hub", "start": [0, 0], "end": [40, 0], "type": "fermion", "label": "p" },
    { "start_node": "hub", "end_node": "v2", "start": [40, 0], "end": [80, 0], "bend": 0.25, "type": "gluon" }
  ]
}"#;

fn cli() -> Command {
    Command::new(assert_cmd::cargo_bin!("feynmark-cli"))
}

#[test]
fn plan_prints_edges_and_definitions_as_json() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("diagram.json");
    fs::write(&input, DIAGRAM).expect("write input");

    let output = cli()
        .args(["plan", "--offset", "0,0", input.to_string_lossy().as_ref()])
        .output()
        .expect("run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let edges = json["edges"].as_array().expect("edges");
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0]["id"], "e0");
    assert_eq!(edges[0]["curve"]["start"], serde_json::json!([0.0, 0.0]));
    assert_eq!(edges[0]["decorations"]["arrow"]["direction"], "forward");
    assert_eq!(edges[0]["decorations"]["vertices"]["marker_id"], "fmarker_blob_3");
    assert!(edges[1]["decorations"]["vertices"].is_null());

    let ids: Vec<&str> = json["definitions"]
        .as_array()
        .expect("definitions")
        .iter()
        .filter_map(|d| d["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["fmarker_blob_3", "farrow_forward", "fref_gluon"]);
}

#[test]
fn render_writes_svg_to_the_out_path() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("diagram.json");
    let out = tmp.path().join("diagram.svg");
    fs::write(&input, DIAGRAM).expect("write input");

    cli()
        .args([
            "render",
            "--scale",
            "2",
            "--out",
            out.to_string_lossy().as_ref(),
            input.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out).expect("read svg");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"data-edge-id="e0" d="M 50,50 L 130,50""#));
    assert!(svg.contains(r#"data-feynman-ghost="ghost-0""#));
    assert!(svg.contains(r#"data-feynman-pattern="fref_gluon""#));
}

#[test]
fn annotate_applies_flags_on_top_of_config() {
    let output = cli()
        .args([
            "annotate",
            "--curve",
            "0,0,10,20,30,20,40,0",
            "--config",
            r#"{"momentum_offset": 20, "particle": "ghost"}"#,
            "--momentum-arrow",
            "right",
            "--momentum-offset",
            "12",
            "--momentum-label",
            "k",
        ])
        .output()
        .expect("run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["stroke"]["kind"], "dashed");
    assert_eq!(json["momentum"]["direction"], "forward");
    assert_eq!(json["label"]["text"], "k");
    assert_eq!(json["label"]["anchor"], serde_json::json!([20.0, 35.0]));
}

#[test]
fn annotate_can_emit_svg() {
    let output = cli()
        .args([
            "annotate",
            "--curve",
            "0,0,10,0,20,0,30,0",
            "--arrow-type",
            "backward",
            "--svg",
        ])
        .output()
        .expect("run");
    assert!(output.status.success());
    let svg = String::from_utf8(output.stdout).expect("utf8");
    assert!(svg.contains(r#"marker-mid="url(#farrow_backward)""#));
}

#[test]
fn usage_errors_exit_with_code_2() {
    cli().args(["annotate"]).assert().code(2);
    cli()
        .args(["annotate", "--curve", "1,2,3"])
        .assert()
        .code(2);
    cli().args(["plan", "--bogus"]).assert().code(2);
}

#[test]
fn invalid_diagram_input_exits_with_code_1() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("bad.json");
    fs::write(
        &input,
        r#"{ "edges": [ { "start_node": "", "end_node": "b", "start": [0, 0], "end": [1, 0] } ] }"#,
    )
    .expect("write input");

    let output = cli()
        .args(["plan", input.to_string_lossy().as_ref()])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Diagram generation input error"));
}

#[test]
fn annotate_out_writes_the_json_plan_to_a_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("plan.json");

    let output = cli()
        .args([
            "annotate",
            "--curve",
            "0,0,10,20,30,20,40,0",
            "--out",
            out.to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let text = fs::read_to_string(&out).expect("read plan");
    let json: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(json["stroke"]["pattern_id"], "fref_photon");
}

#[test]
fn plan_out_writes_the_json_plan_to_a_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("diagram.json");
    let out = tmp.path().join("plan.json");
    fs::write(&input, DIAGRAM).expect("write input");

    cli()
        .args([
            "plan",
            "--pretty",
            "--out",
            out.to_string_lossy().as_ref(),
            input.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("read plan")).expect("json");
    assert_eq!(json["edges"].as_array().map(Vec::len), Some(2));
}

#[test]
fn vertex_flags_override_config_independently() {
    let output = cli()
        .args([
            "annotate",
            "--curve",
            "10,0,7,0,3,0,0,0",
            "--config",
            r#"{"vertex_location": "right"}"#,
            "--v-style",
            "square",
            "--v-size",
            "2",
        ])
        .output()
        .expect("run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["vertices"]["style"], "square");
    assert_eq!(
        json["vertices"]["endpoints"],
        serde_json::json!({ "start": true, "end": false })
    );
    assert_eq!(json["vertices"]["marker_id"], "fmarker_square_2");
}
