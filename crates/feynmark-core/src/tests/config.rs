use crate::geom::{point, vector};
use crate::*;
use serde_json::json;

#[test]
fn defaults_match_the_documented_values() {
    let config = DecorationConfig::default();
    assert_eq!(config.particle, Particle::Photon);
    assert_eq!(config.amplitude, 5.0);
    assert_eq!(config.vertex_style, VertexStyle::None);
    assert_eq!(config.vertex_location, VertexLocation::Both);
    assert_eq!(config.vertex_size, 3.0);
    assert_eq!(config.arrow, Orientation::None);
    assert_eq!(config.momentum_arrow, Orientation::None);
    assert_eq!(config.momentum_offset, 12.0);
    assert_eq!(config.momentum_length, 12.0);
    assert!(config.momentum_label.is_empty());
    assert!(!config.label_typeset);
}

#[test]
fn json_overlay_keeps_unspecified_fields() {
    let base = DecorationConfig::default().with_amplitude(9.0);
    let merged = base
        .overlay_json(&json!({
            "particle": "gluon",
            "arrow": "left",
            "momentum_offset": -8.0,
            "vertex_style": "hexagon",
        }))
        .expect("overlay");

    assert_eq!(merged.particle, Particle::Gluon);
    assert_eq!(merged.arrow, Orientation::Left);
    assert_eq!(merged.momentum_offset, -8.0);
    assert_eq!(merged.vertex_style, VertexStyle::None);
    assert_eq!(merged.amplitude, 9.0);
    assert_eq!(base.particle, Particle::Photon);
}

#[test]
fn config_serializes_style_tags() {
    let value = serde_json::to_value(
        DecorationConfig::default()
            .with_particle(Particle::NoChange)
            .with_momentum_arrow(Orientation::Down),
    )
    .expect("serialize");
    assert_eq!(value["particle"], json!("no_change"));
    assert_eq!(value["momentum_arrow"], json!("down"));
    assert_eq!(value["vertex_location"], json!("both"));
}

#[test]
fn generation_options_map_points_to_world_space() {
    let options = GenerationOptions::default();
    assert_eq!(options.to_world(point(1.0, 2.0)), point(51.0, 52.0));

    let options: GenerationOptions =
        serde_json::from_value(json!({ "scale": 10.0, "offset": [0.0, 5.0] })).expect("decode");
    assert_eq!(options.offset, vector(0.0, 5.0));
    assert_eq!(options.to_world(point(1.0, 2.0)), point(10.0, 25.0));
    assert_eq!(options.base, DecorationConfig::default());
}

#[test]
fn style_tags_parse_leniently() {
    assert_eq!(Particle::from_tag(" Photon "), Particle::Photon);
    assert_eq!(Particle::from_tag("no_change"), Particle::NoChange);
    assert_eq!(Particle::from_tag("unknown"), Particle::None);
    assert_eq!(VertexLocation::from_tag("diagonal"), VertexLocation::Both);
    assert_eq!(Orientation::from_tag(""), Orientation::None);
    assert_eq!(Orientation::from_tag("UP"), Orientation::Up);
    assert_eq!(Particle::Gluon.to_string(), "gluon");
}
