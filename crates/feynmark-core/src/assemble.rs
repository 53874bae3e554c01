//! Whole-diagram assembly.
//!
//! Edges are visited strictly in input order. A blob node is decorated on the first edge where it
//! is eligible and on no later edge, so reordering edges changes the output.

use crate::config::{DecorationConfig, GenerationOptions};
use crate::curve::CubicBezier;
use crate::defs::DefsRegistry;
use crate::diagram::{DiagramSpec, EdgeSpec};
use crate::error::Result;
use crate::geom::{EPSILON, Point, midpoint, vector};
use crate::plan::{DecorationPlan, DecorationPlanner};
use crate::style::{Orientation, VertexLocation, VertexStyle};
use rustc_hash::FxHashSet;
use serde::Serialize;

/// World-space edge geometry: a straight chord or a quadratic arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeCurve {
    pub start: Point,
    /// Quadratic control point; `None` for straight edges.
    pub control: Option<Point>,
    pub end: Point,
}

impl EdgeCurve {
    /// Offsets the control point from the chord midpoint by `bend * chord_length`, along the
    /// chord rotated a quarter turn counter-clockwise on screen (y down).
    ///
    /// Chords shorter than [`EPSILON`] fall back to a straight segment.
    pub fn from_bend(start: Point, end: Point, bend: f64) -> Self {
        let straight = Self {
            start,
            control: None,
            end,
        };
        if bend == 0.0 {
            return straight;
        }

        let chord = end - start;
        let dist = chord.length();
        if dist <= EPSILON {
            tracing::debug!(bend, "zero-length chord with nonzero bend; drawing straight");
            return straight;
        }

        let perp = vector(chord.y / dist, -chord.x / dist);
        Self {
            start,
            control: Some(midpoint(start, end) + perp * (dist * bend)),
            end,
        }
    }

    pub fn is_straight(&self) -> bool {
        self.control.is_none()
    }

    pub fn to_cubic(&self) -> CubicBezier {
        match self.control {
            Some(ctrl) => CubicBezier::from_quadratic(self.start, ctrl, self.end),
            None => CubicBezier::line(self.start, self.end),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgePlan {
    pub id: String,
    pub start_node: String,
    pub end_node: String,
    pub curve: EdgeCurve,
    pub decorations: DecorationPlan,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DiagramPlan {
    pub edges: Vec<EdgePlan>,
}

/// Blob placement for one edge, given the nodes already decorated.
fn claim_vertices(
    diagram: &DiagramSpec,
    edge: &EdgeSpec,
    marked: &mut FxHashSet<String>,
) -> Option<VertexLocation> {
    let start_needs = diagram.is_special(&edge.start_node) && !marked.contains(&edge.start_node);
    let end_needs = diagram.is_special(&edge.end_node) && !marked.contains(&edge.end_node);

    if start_needs && end_needs {
        marked.insert(edge.start_node.clone());
        marked.insert(edge.end_node.clone());
        Some(VertexLocation::Both)
    } else if start_needs {
        marked.insert(edge.start_node.clone());
        Some(VertexLocation::Start)
    } else if end_needs {
        marked.insert(edge.end_node.clone());
        Some(VertexLocation::End)
    } else {
        None
    }
}

/// Derives the edge-local config from the shared base; the base itself is never touched.
fn edge_config(
    base: &DecorationConfig,
    edge: &EdgeSpec,
    vertex: Option<VertexLocation>,
) -> DecorationConfig {
    let arrow = match (edge.particle.is_fermion_like(), edge.anti) {
        (true, false) => Orientation::Forward,
        (true, true) => Orientation::Backward,
        (false, _) => Orientation::None,
    };

    let config = base
        .clone()
        .with_particle(edge.particle)
        .with_momentum_label(edge.label.clone().unwrap_or_default())
        .with_momentum_arrow(Orientation::None)
        .with_arrow(arrow);

    match vertex {
        Some(location) => config.with_vertex(VertexStyle::Blob, location),
        None => config.with_vertex(VertexStyle::None, base.vertex_location),
    }
}

/// Plans every edge of `diagram`, registering shared definitions in `defs`.
pub fn assemble(
    diagram: &DiagramSpec,
    options: &GenerationOptions,
    defs: &mut dyn DefsRegistry,
) -> Result<DiagramPlan> {
    diagram.validate()?;

    let mut marked: FxHashSet<String> = FxHashSet::default();
    let mut planner = DecorationPlanner::new(defs);
    let mut out = DiagramPlan {
        edges: Vec::with_capacity(diagram.edges.len()),
    };

    for edge in &diagram.edges {
        let start = options.to_world(edge.start);
        let end = options.to_world(edge.end);
        let curve = EdgeCurve::from_bend(start, end, edge.bend);

        let vertex = claim_vertices(diagram, edge, &mut marked);
        tracing::trace!(
            edge = %edge.id,
            particle = %edge.particle,
            vertex = ?vertex,
            "planning edge"
        );

        let config = edge_config(&options.base, edge, vertex);
        let decorations = planner.plan(&curve.to_cubic(), &config);

        out.edges.push(EdgePlan {
            id: edge.id.clone(),
            start_node: edge.start_node.clone(),
            end_node: edge.end_node.clone(),
            curve,
            decorations,
        });
    }

    tracing::debug!(
        edges = out.edges.len(),
        decorated_nodes = marked.len(),
        "diagram assembled"
    );
    Ok(out)
}
