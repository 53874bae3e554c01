use crate::geom::{Point, Vector, point, vector};
use crate::style::{Orientation, Particle, VertexLocation, VertexStyle};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-edge decoration settings.
///
/// Values are never mutated by the planner or the assembler: per-edge variants are derived with
/// the consuming `with_*` methods and dropped once the edge is planned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationConfig {
    pub particle: Particle,
    /// Width of the repeated stroke pattern.
    pub amplitude: f64,
    pub vertex_style: VertexStyle,
    pub vertex_location: VertexLocation,
    pub vertex_size: f64,
    pub arrow: Orientation,
    pub momentum_arrow: Orientation,
    /// Signed distance along the curve normal.
    pub momentum_offset: f64,
    pub momentum_length: f64,
    pub momentum_label: String,
    /// Wrap the label in `$...$` for LaTeX typesetting.
    pub label_typeset: bool,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            particle: Particle::Photon,
            amplitude: 5.0,
            vertex_style: VertexStyle::None,
            vertex_location: VertexLocation::Both,
            vertex_size: 3.0,
            arrow: Orientation::None,
            momentum_arrow: Orientation::None,
            momentum_offset: 12.0,
            momentum_length: 12.0,
            momentum_label: String::new(),
            label_typeset: false,
        }
    }
}

impl DecorationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlays a (possibly partial) JSON object onto `self`.
    ///
    /// Unknown keys are ignored; unknown style tags fall back like any other tag.
    pub fn overlay_json(&self, overrides: &Value) -> Result<Self, serde_json::Error> {
        let mut merged = serde_json::to_value(self)?;
        deep_merge_value(&mut merged, overrides);
        serde_json::from_value(merged)
    }

    pub fn with_particle(mut self, particle: Particle) -> Self {
        self.particle = particle;
        self
    }

    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn with_vertex(mut self, style: VertexStyle, location: VertexLocation) -> Self {
        self.vertex_style = style;
        self.vertex_location = location;
        self
    }

    pub fn with_vertex_size(mut self, size: f64) -> Self {
        self.vertex_size = size;
        self
    }

    pub fn with_arrow(mut self, arrow: Orientation) -> Self {
        self.arrow = arrow;
        self
    }

    pub fn with_momentum_arrow(mut self, arrow: Orientation) -> Self {
        self.momentum_arrow = arrow;
        self
    }

    pub fn with_momentum_offset(mut self, offset: f64) -> Self {
        self.momentum_offset = offset;
        self
    }

    pub fn with_momentum_length(mut self, length: f64) -> Self {
        self.momentum_length = length;
        self
    }

    pub fn with_momentum_label(mut self, label: impl Into<String>) -> Self {
        self.momentum_label = label.into();
        self
    }

    pub fn with_label_typeset(mut self, typeset: bool) -> Self {
        self.label_typeset = typeset;
        self
    }
}

/// Settings for whole-diagram generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Multiplier applied to generator coordinates.
    pub scale: f64,
    /// Added after scaling; keeps diagrams clear of the page corner.
    pub offset: Vector,
    /// Settings inherited by every edge before per-edge overrides.
    pub base: DecorationConfig,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: vector(50.0, 50.0),
            base: DecorationConfig::default(),
        }
    }
}

impl GenerationOptions {
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_offset(mut self, offset: Vector) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_base(mut self, base: DecorationConfig) -> Self {
        self.base = base;
        self
    }

    /// Maps a generator coordinate into world space.
    pub fn to_world(&self, p: Point) -> Point {
        point(
            p.x * self.scale + self.offset.x,
            p.y * self.scale + self.offset.y,
        )
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
