//! # grid_astar
//!
//! Shortest paths on a weighted grid using
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm). Every cell carries a non-negative
//! weight, the cost of entering it, where a weight of `0` marks a wall. Movement is either
//! 4-directional, guided by the [Manhattan distance](heuristic::manhattan), or 8-directional,
//! guided by the [octile distance](heuristic::octile) with diagonal steps costing `√2` times the
//! weight of the cell entered. Both heuristics are admissible, so returned paths are optimal.
//!
//! Pre-computes
//! [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! to avoid flood-filling behaviour if no path exists.
//!
//! ```
//! use grid_astar::{search, Grid};
//! use grid_util::point::Point;
//!
//! let mut grid = Grid::build(&[[1u32, 1], [0, 1]]).unwrap();
//! let path = search(&mut grid, Point::new(0, 0), Point::new(1, 1), false).unwrap();
//! assert_eq!(path.points(), &[Point::new(1, 0), Point::new(1, 1)]);
//! ```
mod astar;
mod error;
pub mod grid;
pub mod heuristic;
pub mod node;
pub mod queue;
pub mod solver;

pub use error::{Error, Result};
pub use grid::Grid;
pub use node::Node;
pub use solver::{search, AstarSolver, Path};
