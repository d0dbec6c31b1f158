//! Admissible distance estimates for the two movement models. Both assume every passable cell
//! has a weight of at least one, so a cardinal step costs at least `1` and a diagonal step at
//! least `√2`.
use grid_util::point::Point;
use std::f64::consts::SQRT_2;

/// Cost of a cardinal step on a unit-weight grid.
const D: f64 = 1.0;
/// Cost of a diagonal step on a unit-weight grid.
const D2: f64 = SQRT_2;

fn deltas(a: &Point, b: &Point) -> (f64, f64) {
    (((a.x - b.x).abs()) as f64, ((a.y - b.y).abs()) as f64)
}

/// [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry), for 4-directional
/// movement.
pub fn manhattan(a: &Point, b: &Point) -> f64 {
    let (dx, dy) = deltas(a, b);
    D * (dx + dy)
}

/// Octile distance, for 8-directional movement: takes as many diagonal steps as possible and
/// walks the remainder straight.
pub fn octile(a: &Point, b: &Point) -> f64 {
    let (dx, dy) = deltas(a, b);
    D * (dx + dy) + (D2 - 2.0 * D) * dx.min(dy)
}

/// Picks the heuristic matching the movement model.
pub fn estimate(a: &Point, b: &Point, allow_diagonals: bool) -> f64 {
    if allow_diagonals {
        octile(a, b)
    } else {
        manhattan(a, b)
    }
}
