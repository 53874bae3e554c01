mod config;
mod diagram;

use crate::geom::Point;

pub(crate) fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9
}

pub(crate) fn approx_point(a: Point, b: Point) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y)
}
