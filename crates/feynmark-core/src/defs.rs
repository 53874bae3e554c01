//! Shared definitions (stroke patterns, vertex markers, arrowheads) referenced by id.
//!
//! The planner never owns a document. It asks a [`DefsRegistry`] for the id of each definition it
//! needs, and the registry creates the definition on first use. [`DefsStore`] is the in-memory
//! registry used by the SVG sink and the tests.

use crate::style::{Direction, Particle, VertexStyle};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A repeatable stroke pattern stretched along the edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternDef {
    pub particle: Particle,
    /// SVG path data of one pattern period.
    pub d: &'static str,
    pub normal_offset: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum VertexShape {
    Circle { r: f64 },
    Square { half: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexMarkerDef {
    pub style: VertexStyle,
    pub size: f64,
}

impl VertexMarkerDef {
    pub fn shape(&self) -> VertexShape {
        match self.style {
            VertexStyle::Blob => VertexShape::Circle {
                r: self.size * 2.5,
            },
            VertexStyle::Square => VertexShape::Square { half: self.size },
            VertexStyle::Dot | VertexStyle::None => VertexShape::Circle { r: self.size },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowMarkerDef {
    pub direction: Direction,
    /// Momentum-flow heads are always drawn as forward heads; the segment itself is reversed.
    pub momentum: bool,
}

impl ArrowMarkerDef {
    pub const WIDTH: f64 = 10.0;
    pub const HEIGHT: f64 = 8.0;
    pub const REF_X: f64 = 5.0;
    pub const REF_Y: f64 = 4.0;

    pub fn head_path(&self) -> &'static str {
        if self.momentum || self.direction == Direction::Forward {
            "M 0,0 L 10,4 L 0,8 L 2,4 Z"
        } else {
            "M 10,0 L 0,4 L 10,8 L 8,4 Z"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Definition {
    Pattern(PatternDef),
    VertexMarker(VertexMarkerDef),
    ArrowMarker(ArrowMarkerDef),
}

impl Definition {
    /// Deterministic id: identical definitions share one entry.
    pub fn id(&self) -> String {
        match self {
            Definition::Pattern(p) => format!("fref_{}", p.particle),
            Definition::VertexMarker(m) => format!("fmarker_{}_{}", m.style, m.size),
            Definition::ArrowMarker(a) if a.momentum => {
                format!("farrow_momentum_{}", a.direction)
            }
            Definition::ArrowMarker(a) => format!("farrow_{}", a.direction),
        }
    }
}

/// Stroke pattern for a particle, if it uses one.
pub fn particle_pattern(particle: Particle) -> Option<PatternDef> {
    const WAVE: &str = "m 0,0 c 5,-10 10,10 15,0";
    const GLUON: &str = "m 136.21414,149.28102 c 1.74575,0 3.48637,-0.35809 4.92564,-0.9913 \
1.43978,-0.63322 2.56945,-1.53971 3.23396,-2.51027 0.66399,-0.97151 0.85872,-2.00049 \
0.64082,-2.85517 -0.2179,-0.85371 -0.84532,-1.52555 -1.63863,-1.86289 -0.7938,-0.33734 \
-1.74525,-0.33639 -2.53956,0 -0.7938,0.33734 -1.4202,1.00918 -1.63862,1.86289 \
-0.21892,0.85468 -0.0226,1.88366 0.64083,2.85517 0.66348,0.97151 1.79417,1.87609 \
3.23342,2.51027 1.43928,0.63415 3.17989,0.9913 4.92565,0.9913";

    let (d, normal_offset) = match particle {
        Particle::Photon | Particle::Boson => (WAVE, 0.0),
        Particle::Gluon => (GLUON, -4.23),
        Particle::Ghost
        | Particle::Scalar
        | Particle::Fermion
        | Particle::None
        | Particle::NoChange => return None,
    };
    Some(PatternDef {
        particle,
        d,
        normal_offset,
    })
}

/// Dash array for particles drawn as dashed lines.
pub fn particle_dash(particle: Particle) -> Option<&'static str> {
    match particle {
        Particle::Ghost => Some("1, 3"),
        Particle::Scalar => Some("5, 5"),
        _ => None,
    }
}

/// Lookup-or-create capability for shared definitions.
pub trait DefsRegistry {
    /// Returns the id of `def`, registering it first if it is not known yet.
    fn ensure(&mut self, def: &Definition) -> String;
}

/// Ordered in-memory registry; iteration follows first registration.
#[derive(Debug, Clone, Default)]
pub struct DefsStore {
    defs: IndexMap<String, Definition>,
}

impl DefsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Definition> {
        self.defs.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.defs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Definition)> {
        self.defs.iter().map(|(id, def)| (id.as_str(), def))
    }
}

impl DefsRegistry for DefsStore {
    fn ensure(&mut self, def: &Definition) -> String {
        let id = def.id();
        if !self.defs.contains_key(&id) {
            tracing::trace!(id = %id, "registering definition");
            self.defs.insert(id.clone(), def.clone());
        }
        id
    }
}
