use core::fmt;
use grid_util::point::Point;
use std::f64::consts::SQRT_2;

/// A single grid cell. The position and weight are fixed when the [Grid](crate::grid::Grid) is
/// built; the remaining fields are search bookkeeping that is only meaningful during or right
/// after a search run.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    position: Point,
    pub(crate) weight: u32,
    g: f64,
    h: f64,
    f: f64,
    pub(crate) visited: bool,
    pub(crate) closed: bool,
    pub(crate) parent: Option<usize>,
}

impl Node {
    pub fn new(position: Point, weight: u32) -> Node {
        Node {
            position,
            weight,
            g: 0.0,
            h: 0.0,
            f: 0.0,
            visited: false,
            closed: false,
            parent: None,
        }
    }
    pub fn position(&self) -> Point {
        self.position
    }
    pub fn x(&self) -> i32 {
        self.position.x
    }
    pub fn y(&self) -> i32 {
        self.position.y
    }
    pub fn weight(&self) -> u32 {
        self.weight
    }
    pub fn is_wall(&self) -> bool {
        self.weight == 0
    }
    /// Best known cost from the start.
    pub fn g(&self) -> f64 {
        self.g
    }
    /// Heuristic estimate of the remaining cost.
    pub fn h(&self) -> f64 {
        self.h
    }
    /// Priority key, always `g + h`.
    pub fn f(&self) -> f64 {
        self.f
    }
    pub fn visited(&self) -> bool {
        self.visited
    }
    pub fn closed(&self) -> bool {
        self.closed
    }
    /// Arena index of the node this one was reached from.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub(crate) fn set_g(&mut self, g: f64) {
        self.g = g;
        self.f = self.g + self.h;
    }
    pub(crate) fn set_h(&mut self, h: f64) {
        self.h = h;
        self.f = self.g + self.h;
    }

    /// Cost of entering this node from `from`. Diagonal moves (both coordinates differ) are
    /// scaled by `√2` when diagonals are allowed.
    pub fn cost_from(&self, from: &Point, allow_diagonals: bool) -> f64 {
        let weight = self.weight as f64;
        if allow_diagonals && from.x != self.position.x && from.y != self.position.y {
            weight * SQRT_2
        } else {
            weight
        }
    }

    pub(crate) fn reset(&mut self) {
        self.g = 0.0;
        self.h = 0.0;
        self.f = 0.0;
        self.visited = false;
        self.closed = false;
        self.parent = None;
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} (weight {}, f={:.3}, g={:.3}, h={:.3}, visited={}, closed={})",
            self.position, self.weight, self.f, self.g, self.h, self.visited, self.closed
        )
    }
}
