#![forbid(unsafe_code)]

//! Decoration geometry for Feynman-style diagram edges (headless).
//!
//! The crate computes *where* decorations go and leaves drawing to a sink:
//! - [`curve`]: midpoint, tangent and normal of a cubic Bezier (one De Casteljau step)
//! - [`orientation`]: page-relative arrow requests (`left`, `up`, ...) to forward/backward
//! - [`plan`]: mid-curve arrows, momentum-flow lines, labels, vertex markers, stroke styles
//! - [`assemble`]: whole diagrams from a node/edge description, decorating each blob node once
//!
//! Shared marker and pattern definitions are requested through the [`DefsRegistry`] capability,
//! so the core never touches document state.

pub mod assemble;
pub mod config;
pub mod curve;
pub mod defs;
pub mod diagram;
pub mod error;
pub mod geom;
pub mod orientation;
pub mod plan;
pub mod style;

pub use assemble::{DiagramPlan, EdgeCurve, EdgePlan, assemble};
pub use config::{DecorationConfig, GenerationOptions};
pub use curve::{CubicBezier, CurveSample, Frame};
pub use defs::{Definition, DefsRegistry, DefsStore};
pub use diagram::{DiagramSpec, EdgeSpec, NodeSpec};
pub use error::{Error, Result};
pub use orientation::{EndpointSelection, resolve};
pub use plan::{DecorationPlan, DecorationPlanner, annotate};
pub use style::{Direction, Orientation, Particle, VertexLocation, VertexStyle};

/// Decodes generator JSON and plans the whole diagram in one call.
///
/// Input errors are reported before any edge is planned; `defs` is left untouched in that case.
pub fn generate_from_json(
    text: &str,
    options: &GenerationOptions,
    defs: &mut dyn DefsRegistry,
) -> Result<DiagramPlan> {
    let diagram = DiagramSpec::from_json(text)?;
    assemble(&diagram, options, defs)
}

#[cfg(test)]
mod tests;
