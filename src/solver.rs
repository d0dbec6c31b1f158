use crate::astar::{astar, Outcome};
use crate::error::Result;
use crate::grid::Grid;
use crate::heuristic;
use grid_util::point::Point;
use log::{info, warn};

/// Cells leading from the start (exclusive) towards the goal (inclusive).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    points: Vec<Point>,
    cost: f64,
    complete: bool,
}

impl Path {
    fn from_outcome(grid: &Grid, outcome: Outcome) -> Path {
        match outcome {
            Outcome::Found(ix) => Path {
                points: grid.path_to(ix),
                cost: grid.node_at(ix).g(),
                complete: true,
            },
            Outcome::Closest(ix) => Path {
                points: grid.path_to(ix),
                cost: grid.node_at(ix).g(),
                complete: false,
            },
            Outcome::Exhausted => Path::default(),
        }
    }
    pub fn points(&self) -> &[Point] {
        &self.points
    }
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
    /// Total cost of moving along the path, with diagonal steps scaled by `√2`.
    pub fn cost(&self) -> f64 {
        self.cost
    }
    /// Whether the path ends at the requested goal. Paths returned in closest-node mode when no
    /// route exists are incomplete, as are the empty paths returned for unreachable goals.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    pub fn len(&self) -> usize {
        self.points.len()
    }
}

impl IntoIterator for Path {
    type Item = Point;
    type IntoIter = std::vec::IntoIter<Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// A* on a weighted [Grid]. Uses the [manhattan](heuristic::manhattan) heuristic for
/// 4-directional movement and the [octile](heuristic::octile) one if diagonal moves are allowed.
#[derive(Clone, Debug, Default)]
pub struct AstarSolver {
    pub allow_diagonals: bool,
    /// If no route to the goal exists, return the path to the visited cell with the smallest
    /// estimate instead of an empty one.
    pub closest_on_failure: bool,
}

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver::default()
    }

    pub fn heuristic(&self, p1: &Point, p2: &Point) -> f64 {
        heuristic::estimate(p1, p2, self.allow_diagonals)
    }

    /// Computes a path from start to goal. Fails if either is a wall or lies outside the grid;
    /// an unreachable goal gives an empty [Path].
    pub fn get_path_single_goal(
        &self,
        grid: &mut Grid,
        start: Point,
        goal: Point,
    ) -> Result<Path> {
        let start_ix = grid.endpoint(&start)?;
        let goal_ix = grid.endpoint(&goal)?;
        grid.update();
        let reachable = grid.reachable(&start, &goal, self.allow_diagonals);
        if !reachable && !self.closest_on_failure {
            // Check if start and goal are on the same connected component.
            info!("{} is not reachable from {}", goal, start);
            // The search that would otherwise reset the grid is skipped
            grid.reset_transient_state();
            return Ok(Path::default());
        }
        info!("Computing path from {} to {}", start, goal);
        let outcome = astar(
            grid,
            start_ix,
            self.allow_diagonals,
            self.closest_on_failure,
            |point| self.heuristic(point, &goal),
            |ix| ix == goal_ix,
        )?;
        if reachable && !matches!(outcome, Outcome::Found(_)) {
            warn!("Reachable goal could not be pathed to, are the components correct?");
        }
        Ok(Path::from_outcome(grid, outcome))
    }

    /// Computes a path from start to the nearest of the given goals and returns the selected goal
    /// in addition to the found path. The heuristic is the smallest estimate to any goal that
    /// shares a component with the start. Gives [None] if no goal can be reached.
    pub fn get_path_multiple_goals(
        &self,
        grid: &mut Grid,
        start: Point,
        goals: &[Point],
    ) -> Result<Option<(Point, Path)>> {
        let start_ix = grid.endpoint(&start)?;
        let goal_ixs = goals
            .iter()
            .map(|goal| grid.endpoint(goal))
            .collect::<Result<Vec<usize>>>()?;
        grid.update();
        let (candidates, candidate_ixs): (Vec<Point>, Vec<usize>) = goals
            .iter()
            .zip(goal_ixs)
            .filter(|(goal, _)| grid.reachable(&start, goal, self.allow_diagonals))
            .map(|(goal, ix)| (*goal, ix))
            .unzip();
        if candidates.is_empty() {
            info!("None of {} goals are reachable from {}", goals.len(), start);
            grid.reset_transient_state();
            return Ok(None);
        }
        let outcome = astar(
            grid,
            start_ix,
            self.allow_diagonals,
            false,
            |point| {
                candidates
                    .iter()
                    .map(|goal| self.heuristic(point, goal))
                    .fold(f64::INFINITY, f64::min)
            },
            |ix| candidate_ixs.contains(&ix),
        )?;
        match outcome {
            Outcome::Found(ix) => Ok(Some((
                grid.node_at(ix).position(),
                Path::from_outcome(grid, outcome),
            ))),
            _ => {
                warn!("Reachable goals could not be pathed to, are the components correct?");
                Ok(None)
            }
        }
    }
}

/// Shortest path from `start` to `end` using 4-directional movement, or 8-directional if
/// `allow_diagonals` is set. Shorthand for [AstarSolver::get_path_single_goal].
pub fn search(grid: &mut Grid, start: Point, end: Point, allow_diagonals: bool) -> Result<Path> {
    let solver = AstarSolver {
        allow_diagonals,
        ..AstarSolver::default()
    };
    solver.get_path_single_goal(grid, start, end)
}
