//! Decoration planning for a single curve.
//!
//! A [`DecorationPlan`] is a description, not a drawing: the sink decides how to materialize the
//! stroke style, the mid-curve arrow path, the momentum-flow line and the label.

use crate::config::DecorationConfig;
use crate::curve::{CubicBezier, CurveSample, Frame};
use crate::defs::{
    ArrowMarkerDef, Definition, DefsRegistry, VertexMarkerDef, particle_dash, particle_pattern,
};
use crate::geom::Point;
use crate::orientation::{EndpointSelection, resolve_style, select_endpoints};
use crate::style::{Direction, Particle, VertexStyle};
use serde::Serialize;

/// Label distance from the momentum line when one is drawn.
pub const LABEL_MARGIN_WITH_ARROW: f64 = 8.0;
/// Label distance from the curve when no momentum line is drawn.
pub const LABEL_MARGIN_WITHOUT_ARROW: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrokePlan {
    /// Repeat a pattern definition along the path, stretched to `width`.
    Pattern {
        pattern_id: String,
        width: f64,
        normal_offset: f64,
    },
    Dashed {
        dash: &'static str,
    },
    /// Solid line; clears any previous dash array.
    Plain,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VertexPlan {
    pub style: VertexStyle,
    pub endpoints: EndpointSelection,
    pub marker_id: String,
}

/// Mid-curve arrow: the curve split at its midpoint so the marker can sit on the shared vertex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrowPlan {
    pub direction: Direction,
    pub first: CubicBezier,
    pub second: CubicBezier,
    pub marker_id: String,
}

impl ArrowPlan {
    pub fn midpoint(&self) -> Point {
        self.first.p1
    }

    /// Point sequence of the split path: anchor, handles, mid anchor, handles, anchor.
    pub fn points(&self) -> [Point; 7] {
        [
            self.first.p0,
            self.first.c0,
            self.first.c1,
            self.first.p1,
            self.second.c0,
            self.second.c1,
            self.second.p1,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MomentumPlan {
    pub direction: Direction,
    /// Drawing starts here...
    pub from: Point,
    /// ...and the arrowhead sits here.
    pub to: Point,
    pub marker_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelPlan {
    pub anchor: Point,
    /// Rotation in degrees, within `(-90, 90]`.
    pub angle: f64,
    pub text: String,
    pub typeset: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DecorationPlan {
    /// `None` leaves the existing stroke untouched.
    pub stroke: Option<StrokePlan>,
    pub vertices: Option<VertexPlan>,
    pub arrow: Option<ArrowPlan>,
    pub momentum: Option<MomentumPlan>,
    pub label: Option<LabelPlan>,
}

impl DecorationPlan {
    pub fn is_empty(&self) -> bool {
        self.stroke.is_none()
            && self.vertices.is_none()
            && self.arrow.is_none()
            && self.momentum.is_none()
            && self.label.is_none()
    }
}

/// Plans decorations, registering the definitions it references.
pub struct DecorationPlanner<'a> {
    defs: &'a mut dyn DefsRegistry,
}

impl<'a> DecorationPlanner<'a> {
    pub fn new(defs: &'a mut dyn DefsRegistry) -> Self {
        Self { defs }
    }

    pub fn plan(&mut self, curve: &CubicBezier, config: &DecorationConfig) -> DecorationPlan {
        let sample = curve.sample_mid();
        let (start, end) = (curve.start(), curve.end());

        let stroke = self.stroke(config);
        let vertices = self.vertices(config, start, end);

        let arrow = resolve_style(config.arrow, start, end).map(|direction| {
            let marker_id = self.defs.ensure(&Definition::ArrowMarker(ArrowMarkerDef {
                direction,
                momentum: false,
            }));
            let (first, second) = curve.split_mid();
            ArrowPlan {
                direction,
                first,
                second,
                marker_id,
            }
        });

        let momentum_direction = resolve_style(config.momentum_arrow, start, end);
        let wants_label = !config.momentum_label.is_empty();
        if (momentum_direction.is_some() || wants_label) && sample.frame.is_none() {
            tracing::debug!("degenerate tangent at curve midpoint; skipping momentum and label");
        }

        let momentum = match (momentum_direction, sample.frame) {
            (Some(direction), Some(frame)) => {
                let marker_id = self.defs.ensure(&Definition::ArrowMarker(ArrowMarkerDef {
                    direction,
                    momentum: true,
                }));
                let (from, to) = momentum_segment(
                    &sample,
                    frame,
                    config.momentum_offset,
                    config.momentum_length,
                    direction,
                );
                Some(MomentumPlan {
                    direction,
                    from,
                    to,
                    marker_id,
                })
            }
            _ => None,
        };

        let label = match sample.frame {
            Some(frame) if wants_label => {
                Some(label_placement(&sample, frame, config, momentum.is_some()))
            }
            _ => None,
        };

        DecorationPlan {
            stroke,
            vertices,
            arrow,
            momentum,
            label,
        }
    }

    fn stroke(&mut self, config: &DecorationConfig) -> Option<StrokePlan> {
        match config.particle {
            Particle::Fermion | Particle::NoChange => None,
            particle => {
                if let Some(pattern) = particle_pattern(particle) {
                    let normal_offset = pattern.normal_offset;
                    let pattern_id = self.defs.ensure(&Definition::Pattern(pattern));
                    Some(StrokePlan::Pattern {
                        pattern_id,
                        width: config.amplitude,
                        normal_offset,
                    })
                } else if let Some(dash) = particle_dash(particle) {
                    Some(StrokePlan::Dashed { dash })
                } else {
                    Some(StrokePlan::Plain)
                }
            }
        }
    }

    fn vertices(
        &mut self,
        config: &DecorationConfig,
        start: Point,
        end: Point,
    ) -> Option<VertexPlan> {
        if config.vertex_style == VertexStyle::None {
            return None;
        }
        let endpoints = select_endpoints(config.vertex_location, start, end);
        let marker_id = self.defs.ensure(&Definition::VertexMarker(VertexMarkerDef {
            style: config.vertex_style,
            size: config.vertex_size,
        }));
        Some(VertexPlan {
            style: config.vertex_style,
            endpoints,
            marker_id,
        })
    }
}

/// Convenience wrapper for one-off annotation of a single curve.
pub fn annotate(
    curve: &CubicBezier,
    config: &DecorationConfig,
    defs: &mut dyn DefsRegistry,
) -> DecorationPlan {
    DecorationPlanner::new(defs).plan(curve, config)
}

/// Momentum-flow line of length `length`, centered `offset` away along the normal.
///
/// Returns `(from, to)` in drawing order; the arrowhead goes at `to`.
pub fn momentum_segment(
    sample: &CurveSample,
    frame: Frame,
    offset: f64,
    length: f64,
    direction: Direction,
) -> (Point, Point) {
    let center = sample.midpoint + frame.normal * offset;
    let half = frame.tangent * (length / 2.0);
    let a = center - half;
    let b = center + half;
    match direction {
        Direction::Forward => (a, b),
        Direction::Backward => (b, a),
    }
}

pub fn label_placement(
    sample: &CurveSample,
    frame: Frame,
    config: &DecorationConfig,
    momentum_drawn: bool,
) -> LabelPlan {
    let margin = if momentum_drawn {
        LABEL_MARGIN_WITH_ARROW
    } else {
        LABEL_MARGIN_WITHOUT_ARROW
    };
    let offset = config.momentum_offset;
    let adjusted = offset + if offset >= 0.0 { margin } else { -margin };

    let text = if config.label_typeset {
        format!("${}$", config.momentum_label)
    } else {
        config.momentum_label.clone()
    };

    LabelPlan {
        anchor: sample.midpoint + frame.normal * adjusted,
        angle: sample.upright_angle_degrees(),
        text,
        typeset: config.label_typeset,
    }
}
