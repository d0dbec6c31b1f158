//! This module implements the A* loop over the node arena of a [Grid]. The search state lives in
//! the nodes themselves; every node it touches is recorded in the dirty set of the grid so the
//! next run can restore exactly those.
use crate::error::Result;
use crate::grid::Grid;
use crate::node::Node;
use crate::queue::PriorityQueue;
use grid_util::point::Point;
use log::debug;

/// How a run of [astar] ended, in terms of arena indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// A node satisfying the success predicate was extracted.
    Found(usize),
    /// The open set ran dry; holds the visited node with the smallest estimate.
    Closest(usize),
    Exhausted,
}

/// Smallest heuristic value first, ties go to the cheaper node.
fn is_closer(candidate: &Node, closest: &Node) -> bool {
    candidate.h() < closest.h() || (candidate.h() == closest.h() && candidate.g() < closest.g())
}

pub(crate) fn astar<FH, FS>(
    grid: &mut Grid,
    start: usize,
    allow_diagonals: bool,
    closest_on_failure: bool,
    mut heuristic: FH,
    mut success: FS,
) -> Result<Outcome>
where
    FH: FnMut(&Point) -> f64,
    FS: FnMut(usize) -> bool,
{
    grid.reset_transient_state();
    let start_h = heuristic(&grid.node_at(start).position());
    {
        let node = grid.node_at_mut(start);
        node.set_h(start_h);
        node.set_g(0.0);
        node.visited = true;
    }
    grid.mark_dirty(start);
    let mut open: PriorityQueue = std::iter::once((start, grid.node_at(start))).collect();

    let mut closest = start;
    let mut expanded = 0;
    while !open.is_empty() {
        let current = open.extract_min()?;
        let (current_pos, current_g) = {
            let node = grid.node_at(current);
            // We may have inserted a node several times into the queue if we found a better way
            // to access it. The first extraction is the best one, the others are discarded.
            if node.closed() {
                continue;
            }
            (node.position(), node.g())
        };
        if success(current) {
            debug!(
                "Reached {} at cost {:.3} after expanding {} nodes",
                current_pos, current_g, expanded
            );
            return Ok(Outcome::Found(current));
        }
        grid.node_at_mut(current).closed = true;
        expanded += 1;

        for neighbor in grid.neighbors(current, allow_diagonals) {
            let node = grid.node_at(neighbor);
            if node.closed() || node.is_wall() {
                continue;
            }
            let tentative_g = current_g + node.cost_from(&current_pos, allow_diagonals);
            let first_visit = !node.visited();
            if !first_visit && tentative_g >= node.g() {
                continue;
            }
            // The estimate only depends on the position, so it is computed once per run
            let h = if first_visit {
                heuristic(&node.position())
            } else {
                node.h()
            };
            let node = grid.node_at_mut(neighbor);
            node.visited = true;
            node.parent = Some(current);
            node.set_h(h);
            node.set_g(tentative_g);
            grid.mark_dirty(neighbor);
            if closest_on_failure && is_closer(grid.node_at(neighbor), grid.node_at(closest)) {
                closest = neighbor;
            }
            open.insert(neighbor, grid.node_at(neighbor));
        }
    }
    debug!(
        "Open set exhausted after expanding {} nodes ({} touched)",
        expanded,
        grid.dirty_count()
    );
    Ok(if closest_on_failure {
        Outcome::Closest(closest)
    } else {
        Outcome::Exhausted
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::manhattan;

    /// Runs a 4-directional search towards `goal` on the given weights.
    fn run(weights: &[[u32; 3]], goal: Point, closest: bool) -> (Grid, Outcome) {
        let mut grid = Grid::build(weights).unwrap();
        let goal_ix = grid.index(&goal).unwrap();
        let outcome = astar(
            &mut grid,
            0,
            false,
            closest,
            |p| manhattan(p, &goal),
            |ix| ix == goal_ix,
        )
        .unwrap();
        (grid, outcome)
    }

    #[test]
    fn found_goal_has_parents_back_to_start() {
        let (grid, outcome) = run(&[[1, 1, 1], [1, 1, 1], [1, 1, 1]], Point::new(2, 2), false);
        assert_eq!(outcome, Outcome::Found(8));
        assert_eq!(grid.node_at(8).g(), 4.0);
        assert_eq!(grid.path_to(8).len(), 4);
        assert_eq!(grid.node_at(0).parent(), None);
    }

    #[test]
    fn avoids_expensive_cells() {
        // Entering (1, 0) costs 9, the detour through the middle row is cheaper
        let (grid, outcome) = run(&[[1, 9, 1], [1, 1, 1], [1, 1, 1]], Point::new(2, 0), false);
        assert_eq!(outcome, Outcome::Found(2));
        assert_eq!(grid.node_at(2).g(), 4.0);
        assert_eq!(
            grid.path_to(2),
            vec![
                Point::new(0, 1),
                Point::new(1, 1),
                Point::new(2, 1),
                Point::new(2, 0)
            ]
        );
    }

    #[test]
    fn exhausted_without_route() {
        let weights = [[1, 0, 1], [1, 0, 1], [1, 0, 1]];
        let (grid, outcome) = run(&weights, Point::new(2, 0), false);
        assert_eq!(outcome, Outcome::Exhausted);
        assert!(grid.nodes().iter().filter(|n| n.closed()).count() == 3);

        let (grid, outcome) = run(&weights, Point::new(2, 0), true);
        // Going down the left column only moves away from the goal
        assert_eq!(outcome, Outcome::Closest(0));
        assert!(grid.path_to(0).is_empty());
    }

    #[test]
    fn closest_prefers_smallest_estimate() {
        let (grid, outcome) = run(&[[1, 1, 0], [1, 1, 0], [0, 0, 1]], Point::new(2, 2), true);
        // (1, 1) is the only visited cell with estimate 2
        assert_eq!(outcome, Outcome::Closest(4));
        assert_eq!(grid.path_to(4).last(), Some(&Point::new(1, 1)));
    }
}
