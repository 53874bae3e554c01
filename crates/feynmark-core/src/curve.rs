//! Cubic Bezier sampling.
//!
//! Every decoration is anchored at the curve's parameter midpoint. One De Casteljau step at
//! `t = 0.5` yields both the midpoint and the local derivative direction, and collapses to the
//! exact chord midpoint for straight curves.

use crate::geom::{Point, Vector, lerp, point, vector};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub p0: Point,
    pub c0: Point,
    pub c1: Point,
    pub p1: Point,
}

/// Unit tangent and unit normal at a sampled point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub tangent: Vector,
    pub normal: Vector,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    pub midpoint: Point,
    /// Raw (non-normalized) derivative direction `q2 - q1`.
    pub tangent: Vector,
    /// `None` when the tangent has zero length.
    pub frame: Option<Frame>,
}

impl CurveSample {
    /// Label angle in degrees, normalized into `(-90, 90]` so text stays upright.
    pub fn upright_angle_degrees(&self) -> f64 {
        upright_angle_degrees(self.tangent)
    }
}

/// `atan2(ty, tx)` in degrees, folded into `(-90, 90]` by a single half-turn.
pub fn upright_angle_degrees(tangent: Vector) -> f64 {
    let mut angle = tangent.y.atan2(tangent.x).to_degrees();
    if angle > 90.0 {
        angle -= 180.0;
    } else if angle <= -90.0 {
        angle += 180.0;
    }
    angle
}

impl CubicBezier {
    pub fn new(p0: Point, c0: Point, c1: Point, p1: Point) -> Self {
        Self { p0, c0, c1, p1 }
    }

    /// Straight segment with control points at one and two thirds of the chord.
    pub fn line(a: Point, b: Point) -> Self {
        Self {
            p0: a,
            c0: lerp(a, b, 1.0 / 3.0),
            c1: lerp(a, b, 2.0 / 3.0),
            p1: b,
        }
    }

    /// Exact degree elevation of the quadratic `a, ctrl, b`.
    pub fn from_quadratic(a: Point, ctrl: Point, b: Point) -> Self {
        Self {
            p0: a,
            c0: lerp(a, ctrl, 2.0 / 3.0),
            c1: lerp(b, ctrl, 2.0 / 3.0),
            p1: b,
        }
    }

    pub fn start(&self) -> Point {
        self.p0
    }

    pub fn end(&self) -> Point {
        self.p1
    }

    pub fn sample_mid(&self) -> CurveSample {
        let m1 = lerp(self.p0, self.c0, 0.5);
        let m2 = lerp(self.c0, self.c1, 0.5);
        let m3 = lerp(self.c1, self.p1, 0.5);
        let q1 = lerp(m1, m2, 0.5);
        let q2 = lerp(m2, m3, 0.5);
        let midpoint = lerp(q1, q2, 0.5);
        let tangent = q2 - q1;

        let len = tangent.length();
        let frame = (len > 0.0 && len.is_finite()).then(|| {
            let u = tangent / len;
            Frame {
                tangent: u,
                normal: vector(-u.y, u.x),
            }
        });

        CurveSample {
            midpoint,
            tangent,
            frame,
        }
    }

    /// Splits the curve at `t = 0.5`; both halves share the midpoint.
    pub fn split_mid(&self) -> (CubicBezier, CubicBezier) {
        let m1 = lerp(self.p0, self.c0, 0.5);
        let m2 = lerp(self.c0, self.c1, 0.5);
        let m3 = lerp(self.c1, self.p1, 0.5);
        let q1 = lerp(m1, m2, 0.5);
        let q2 = lerp(m2, m3, 0.5);
        let mid = lerp(q1, q2, 0.5);
        (
            CubicBezier::new(self.p0, m1, q1, mid),
            CubicBezier::new(mid, q2, m3, self.p1),
        )
    }

    /// Bernstein evaluation at `t`.
    pub fn point_at(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        point(
            a * self.p0.x + b * self.c0.x + c * self.c1.x + d * self.p1.x,
            a * self.p0.y + b * self.c0.y + c * self.c1.y + d * self.p1.y,
        )
    }

    pub fn is_straight(&self) -> bool {
        const EPS: f64 = 1e-9;
        let chord = self.p1 - self.p0;
        let cross = |p: Point| {
            let v = p - self.p0;
            chord.x * v.y - chord.y * v.x
        };
        cross(self.c0).abs() <= EPS && cross(self.c1).abs() <= EPS
    }
}
