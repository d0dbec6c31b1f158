use grid_util::point::Point;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid grid input: {0}")]
    InvalidInput(String),
    #[error("Point {point} is outside the {width}x{height} grid")]
    OutOfBounds {
        point: Point,
        width: usize,
        height: usize,
    },
    #[error("Endpoint {0} is a wall or not part of the grid")]
    InvalidEndpoint(Point),
    /// Only reachable through a broken search loop invariant.
    #[error("Cannot extract from an empty priority queue")]
    EmptyQueue,
}

pub type Result<T> = std::result::Result<T, Error>;
