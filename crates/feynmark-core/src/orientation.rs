//! Page-relative orientation requests (`left`, `up`, ...) resolved against a path's endpoints.
//!
//! Only the gross direction of the segment matters: the curve between the endpoints is ignored.
//! Coordinates follow SVG conventions (y grows downward).

use crate::geom::{EPSILON, Point};
use crate::style::{Direction, Orientation, VertexLocation};
use serde::{Deserialize, Serialize};

/// Maps an orientation request onto the path's own start → end direction.
///
/// `None` is treated like any other unspecified request and resolves to forward; use
/// [`resolve_style`] when `none` must stay "no arrow".
pub fn resolve(orientation: Orientation, start: Point, end: Point) -> Direction {
    let (x1, y1, x2, y2) = (start.x, start.y, end.x, end.y);
    let forward = match orientation {
        Orientation::Forward => true,
        Orientation::Backward => false,
        Orientation::Right => x2 > x1 + EPSILON,
        Orientation::Left => x2 < x1 - EPSILON,
        Orientation::Up => y2 < y1 - EPSILON,
        Orientation::Down => y2 > y1 + EPSILON,
        Orientation::None => true,
    };
    if forward {
        Direction::Forward
    } else {
        Direction::Backward
    }
}

/// Like [`resolve`], but `none` means no arrow at all.
pub fn resolve_style(orientation: Orientation, start: Point, end: Point) -> Option<Direction> {
    match orientation {
        Orientation::None => None,
        other => Some(resolve(other, start, end)),
    }
}

/// Endpoints selected for a vertex marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EndpointSelection {
    pub start: bool,
    pub end: bool,
}

impl EndpointSelection {
    pub const START: Self = Self {
        start: true,
        end: false,
    };
    pub const END: Self = Self {
        start: false,
        end: true,
    };
    pub const BOTH: Self = Self {
        start: true,
        end: true,
    };
}

/// Picks the endpoint(s) a vertex marker goes on.
///
/// Directional policies reuse the orientation comparisons: a forward resolution means the path
/// travels toward the requested side, so the end endpoint is the one lying there.
pub fn select_endpoints(location: VertexLocation, start: Point, end: Point) -> EndpointSelection {
    let directional = match location {
        VertexLocation::Both => return EndpointSelection::BOTH,
        VertexLocation::Start => return EndpointSelection::START,
        VertexLocation::End => return EndpointSelection::END,
        VertexLocation::Left => Orientation::Left,
        VertexLocation::Right => Orientation::Right,
        VertexLocation::Up => Orientation::Up,
        VertexLocation::Down => Orientation::Down,
    };
    match resolve(directional, start, end) {
        Direction::Forward => EndpointSelection::END,
        Direction::Backward => EndpointSelection::START,
    }
}
