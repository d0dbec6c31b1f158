use crate::error::{Error, Result};
use crate::node::Node;
use core::fmt;
use fxhash::FxBuildHasher;
use grid_util::grid::ValueGrid;
use grid_util::point::Point;
use indexmap::IndexSet;
use itertools::Itertools;
use log::info;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

/// West, east, south, north.
const CARDINAL_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
/// South-west, south-east, north-west, north-east.
const DIAGONAL_OFFSETS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// [Grid] owns one [Node] per cell in an arena indexed by `y * width + x`, where `x` is the
/// column and `y` the row of the input weights. Besides the nodes it tracks which of them were
/// touched by the last search (the dirty set) so that resetting costs only as much as the search
/// did, and it maintains [UnionFind] structures holding the connected components for 4- and
/// 8-directional movement to reject unreachable goals without flood-filling.
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    nodes: Vec<Node>,
    dirty: FxIndexSet<usize>,
    pub components: UnionFind<usize>,
    pub diagonal_components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Grid {
    fn from_nodes(width: usize, height: usize, nodes: Vec<Node>) -> Grid {
        let mut grid = Grid {
            width,
            height,
            nodes,
            dirty: FxIndexSet::default(),
            components: UnionFind::new(width * height),
            diagonal_components: UnionFind::new(width * height),
            components_dirty: false,
        };
        grid.generate_components();
        grid
    }

    /// Builds a grid from rows of weights, where a weight of `0` marks a wall. Fails if there
    /// are no cells or if the rows differ in length.
    pub fn build<R: AsRef<[u32]>>(weights: &[R]) -> Result<Grid> {
        let height = weights.len();
        let width = weights.first().map_or(0, |row| row.as_ref().len());
        if width == 0 {
            return Err(Error::InvalidInput(
                "weights must contain at least one cell".to_owned(),
            ));
        }
        if let Some(y) = weights.iter().position(|row| row.as_ref().len() != width) {
            return Err(Error::InvalidInput(format!(
                "row {} has {} cells, expected {}",
                y,
                weights[y].as_ref().len(),
                width
            )));
        }
        let nodes = weights
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.as_ref()
                    .iter()
                    .enumerate()
                    .map(move |(x, &weight)| Node::new(Point::new(x as i32, y as i32), weight))
            })
            .collect();
        Ok(Grid::from_nodes(width, height, nodes))
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }
    fn compute_index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width + x as usize
    }
    fn checked_index(&self, x: i32, y: i32) -> usize {
        assert!(
            self.in_bounds(x, y),
            "({}, {}) is outside the {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        self.compute_index(x, y)
    }
    fn can_move_to(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && !self.nodes[self.compute_index(x, y)].is_wall()
    }

    /// Arena index of the cell at `point`.
    pub fn index(&self, point: &Point) -> Result<usize> {
        if self.in_bounds(point.x, point.y) {
            Ok(self.compute_index(point.x, point.y))
        } else {
            Err(Error::OutOfBounds {
                point: *point,
                width: self.width,
                height: self.height,
            })
        }
    }
    pub fn node(&self, point: &Point) -> Result<&Node> {
        self.index(point).map(|ix| &self.nodes[ix])
    }
    /// Panics if `index` is not an arena index of this grid.
    pub fn node_at(&self, index: usize) -> &Node {
        &self.nodes[index]
    }
    pub(crate) fn node_at_mut(&mut self, index: usize) -> &mut Node {
        &mut self.nodes[index]
    }
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Index of a cell that can serve as start or goal of a search.
    pub fn endpoint(&self, point: &Point) -> Result<usize> {
        match self.index(point) {
            Ok(ix) if !self.nodes[ix].is_wall() => Ok(ix),
            _ => Err(Error::InvalidEndpoint(*point)),
        }
    }

    /// In-bounds neighbours of the node at `index`, walls included: west, east, south and north,
    /// followed by south-west, south-east, north-west and north-east if diagonals are allowed.
    pub fn neighbors(&self, index: usize, allow_diagonals: bool) -> SmallVec<[usize; 8]> {
        let node = &self.nodes[index];
        let (x, y) = (node.x(), node.y());
        let diagonals: &[(i32, i32)] = if allow_diagonals {
            &DIAGONAL_OFFSETS
        } else {
            &[]
        };
        CARDINAL_OFFSETS
            .iter()
            .chain(diagonals)
            .map(|&(dx, dy)| (x + dx, y + dy))
            .filter(|&(nx, ny)| self.in_bounds(nx, ny))
            .map(|(nx, ny)| self.compute_index(nx, ny))
            .collect()
    }

    /// Records that the search state of the node at `index` was changed in the current run.
    pub fn mark_dirty(&mut self, index: usize) {
        self.dirty.insert(index);
    }
    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }
    /// Restores the search state of every node touched since the last reset.
    pub fn reset_transient_state(&mut self) {
        let nodes = &mut self.nodes;
        for ix in self.dirty.drain(..) {
            nodes[ix].reset();
        }
    }

    /// The cells from (excluding) the start of the last search up to the node at `index`,
    /// obtained by following the parents back.
    pub(crate) fn path_to(&self, index: usize) -> Vec<Point> {
        let mut path: Vec<Point> = std::iter::successors(Some(index), |&ix| self.nodes[ix].parent)
            .take_while(|&ix| self.nodes[ix].parent.is_some())
            .map(|ix| self.nodes[ix].position())
            .collect();
        path.reverse();
        path
    }

    /// Sum of the costs of moving along `path` from `start`. Consecutive cells are assumed to be
    /// neighbours.
    pub fn path_cost(&self, start: Point, path: &[Point], allow_diagonals: bool) -> Result<f64> {
        std::iter::once(&start)
            .chain(path)
            .tuple_windows()
            .map(|(from, to)| {
                self.node(to)
                    .map(|node| node.cost_from(from, allow_diagonals))
            })
            .sum()
    }

    /// Changes the weight of a cell. Joins newly connected components and flags the components
    /// as dirty if they are (potentially) broken apart into multiple.
    pub fn set_weight(&mut self, point: &Point, weight: u32) -> Result<()> {
        let ix = self.index(point)?;
        self.set_index_weight(ix, weight);
        Ok(())
    }
    fn set_index_weight(&mut self, ix: usize, weight: u32) {
        let was_wall = self.nodes[ix].is_wall();
        self.nodes[ix].weight = weight;
        if weight == 0 {
            if !was_wall {
                self.components_dirty = true;
            }
        } else if was_wall {
            for n in self.neighbors(ix, false) {
                if !self.nodes[n].is_wall() {
                    self.components.union(ix, n);
                }
            }
            for n in self.neighbors(ix, true) {
                if !self.nodes[n].is_wall() {
                    self.diagonal_components.union(ix, n);
                }
            }
        }
    }

    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point, allow_diagonals: bool) -> bool {
        !self.unreachable(start, goal, allow_diagonals)
    }
    /// Checks if start and goal are not on the same component. Points outside the grid are
    /// never reachable.
    pub fn unreachable(&self, start: &Point, goal: &Point, allow_diagonals: bool) -> bool {
        match (self.index(start), self.index(goal)) {
            (Ok(start_ix), Ok(goal_ix)) => {
                let components = if allow_diagonals {
                    &self.diagonal_components
                } else {
                    &self.components
                };
                !components.equiv(start_ix, goal_ix)
            }
            _ => true,
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates new [UnionFind] structures and links up passable neighbours.
    pub fn generate_components(&mut self) {
        let n = self.nodes.len();
        self.components = UnionFind::new(n);
        self.diagonal_components = UnionFind::new(n);
        self.components_dirty = false;
        for (x, y) in (0..self.width as i32).cartesian_product(0..self.height as i32) {
            if !self.can_move_to(x, y) {
                continue;
            }
            let ix = self.compute_index(x, y);
            // Only forward links, the remaining ones are made from the other cell
            for (dx, dy, diagonal) in [(1, 0, false), (0, 1, false), (1, 1, true), (1, -1, true)] {
                let (nx, ny) = (x + dx, y + dy);
                if self.can_move_to(nx, ny) {
                    let n_ix = self.compute_index(nx, ny);
                    if !diagonal {
                        self.components.union(ix, n_ix);
                    }
                    self.diagonal_components.union(ix, n_ix);
                }
            }
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Grid:")?;
        for row in self.nodes.chunks(self.width) {
            let values = row.iter().map(Node::weight).collect::<Vec<u32>>();
            writeln!(f, "{:?}", values)?;
        }
        Ok(())
    }
}

impl ValueGrid<u32> for Grid {
    /// A grid in which every cell has weight `default_value`.
    /// Panics if either dimension is zero.
    fn new(width: usize, height: usize, default_value: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "grid must contain at least one cell, got {}x{}",
            width,
            height
        );
        let nodes = (0..height as i32)
            .flat_map(|y| {
                (0..width as i32).map(move |x| Node::new(Point::new(x, y), default_value))
            })
            .collect();
        Grid::from_nodes(width, height, nodes)
    }
    /// Panics if `(x, y)` lies outside the grid.
    fn get(&self, x: i32, y: i32) -> u32 {
        self.nodes[self.checked_index(x, y)].weight()
    }
    /// Panics if `(x, y)` lies outside the grid.
    fn set(&mut self, x: i32, y: i32, weight: u32) {
        let ix = self.checked_index(x, y);
        self.set_index_weight(ix, weight);
    }
    fn width(&self) -> usize {
        self.width
    }
    fn height(&self) -> usize {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_rejects_empty_and_ragged() {
        let empty: [[u32; 0]; 0] = [];
        assert!(matches!(Grid::build(&empty), Err(Error::InvalidInput(_))));
        let no_columns: [[u32; 0]; 2] = [[], []];
        assert!(matches!(Grid::build(&no_columns), Err(Error::InvalidInput(_))));
        let ragged = vec![vec![1u32, 1, 1], vec![1, 1]];
        assert!(matches!(Grid::build(&ragged), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn build_maps_columns_to_x() {
        let grid = Grid::build(&[[1u32, 2, 3], [4, 0, 6]]).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.node(&Point::new(2, 0)).unwrap().weight(), 3);
        assert!(grid.node(&Point::new(1, 1)).unwrap().is_wall());
        assert_eq!(grid.get(0, 1), 4);
        assert_eq!(grid.index(&Point::new(2, 1)), Ok(5));
        for (ix, node) in grid.nodes().iter().enumerate() {
            assert_eq!(grid.index(&node.position()), Ok(ix));
        }
    }

    #[test]
    fn out_of_bounds_lookup() {
        let grid = Grid::new(2, 2, 1);
        for p in [Point::new(-1, 0), Point::new(0, 2), Point::new(2, 0)] {
            assert_eq!(
                grid.node(&p).unwrap_err(),
                Error::OutOfBounds {
                    point: p,
                    width: 2,
                    height: 2
                }
            );
        }
    }

    #[test]
    #[should_panic]
    fn set_past_last_column_panics() {
        let mut grid = Grid::build(&[[1u32, 1, 1], [1, 1, 1]]).unwrap();
        // Would alias (0, 1) without the bounds check
        grid.set(3, 0, 0);
    }

    #[test]
    #[should_panic]
    fn get_before_first_column_panics() {
        let grid = Grid::build(&[[1u32, 1, 1], [1, 1, 1]]).unwrap();
        grid.get(-1, 1);
    }

    #[test]
    fn value_grid_access_stays_on_its_cell() {
        let mut grid = Grid::build(&[[1u32, 1, 1], [1, 1, 1]]).unwrap();
        grid.set(2, 0, 0);
        assert_eq!(grid.get(2, 0), 0);
        assert_eq!(grid.get(0, 1), 1);
        assert!(!grid.node(&Point::new(0, 1)).unwrap().is_wall());
    }

    #[test]
    #[should_panic]
    fn new_without_columns_panics() {
        Grid::new(0, 3, 1);
    }

    #[test]
    #[should_panic]
    fn new_without_rows_panics() {
        Grid::new(3, 0, 1);
    }

    #[test]
    fn endpoints_must_be_passable() {
        let grid = Grid::build(&[[1u32, 0]]).unwrap();
        assert_eq!(grid.endpoint(&Point::new(0, 0)), Ok(0));
        assert_eq!(
            grid.endpoint(&Point::new(1, 0)),
            Err(Error::InvalidEndpoint(Point::new(1, 0)))
        );
        assert_eq!(
            grid.endpoint(&Point::new(5, 5)),
            Err(Error::InvalidEndpoint(Point::new(5, 5)))
        );
    }

    #[test]
    fn neighbor_enumeration() {
        let grid = Grid::new(3, 3, 1);
        let center = grid.index(&Point::new(1, 1)).unwrap();
        let points = |ixs: SmallVec<[usize; 8]>| {
            ixs.into_iter()
                .map(|ix| grid.node_at(ix).position())
                .collect::<Vec<_>>()
        };
        assert_eq!(
            points(grid.neighbors(center, false)),
            vec![
                Point::new(0, 1),
                Point::new(2, 1),
                Point::new(1, 0),
                Point::new(1, 2)
            ]
        );
        let all = points(grid.neighbors(center, true));
        assert_eq!(all.len(), 8);
        assert_eq!(all.iter().unique().count(), 8);
        assert_eq!(
            all[4..],
            [
                Point::new(0, 0),
                Point::new(2, 0),
                Point::new(0, 2),
                Point::new(2, 2)
            ]
        );

        let corner = grid.index(&Point::new(0, 0)).unwrap();
        assert_eq!(
            points(grid.neighbors(corner, true)),
            vec![Point::new(1, 0), Point::new(0, 1), Point::new(1, 1)]
        );
    }

    #[test]
    fn reset_only_restores_dirty_nodes() {
        let mut grid = Grid::new(2, 2, 1);
        grid.node_at_mut(0).set_g(3.0);
        grid.node_at_mut(0).visited = true;
        grid.node_at_mut(3).closed = true;
        grid.mark_dirty(0);
        grid.mark_dirty(0);
        assert_eq!(grid.dirty_count(), 1);
        grid.reset_transient_state();
        assert_eq!(grid.dirty_count(), 0);
        assert_eq!(grid.node_at(0).g(), 0.0);
        assert!(!grid.node_at(0).visited());
        // Never marked, so left untouched
        assert!(grid.node_at(3).closed());
    }

    /// Tests whether points are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // |. # .|
        // |. # .|
        let grid = Grid::build(&[[1u32, 0, 1], [1, 0, 1]]).unwrap();
        let p1 = Point::new(0, 0);
        let p2 = Point::new(1, 1);
        let p3 = Point::new(0, 1);
        let p4 = Point::new(2, 0);
        for diag in [false, true] {
            assert!(grid.unreachable(&p1, &p2, diag));
            assert!(grid.reachable(&p1, &p3, diag));
            assert!(grid.unreachable(&p1, &p4, diag));
        }
        assert!(grid.unreachable(&p1, &Point::new(3, 0), false));
    }

    // Tests whether allowing diagonals has the expected effect on diagonal reachability in a minimal setting.
    #[test]
    fn test_diagonal_switch_reachable() {
        //  __
        // | #|
        // |# |
        //  __
        let grid = Grid::build(&[[1u32, 0], [0, 1]]).unwrap();
        let start = Point::new(0, 0);
        let end = Point::new(1, 1);
        assert!(grid.unreachable(&start, &end, false));
        assert!(grid.reachable(&start, &end, true));
    }

    #[test]
    fn set_weight_updates_components() {
        let mut grid = Grid::build(&[[1u32, 0, 1]]).unwrap();
        let left = Point::new(0, 0);
        let right = Point::new(2, 0);
        assert!(grid.unreachable(&left, &right, false));
        grid.set_weight(&Point::new(1, 0), 5).unwrap();
        assert!(!grid.components_dirty);
        assert!(grid.reachable(&left, &right, false));
        assert!(grid.reachable(&left, &right, true));

        grid.set(1, 0, 0);
        assert!(grid.components_dirty);
        grid.update();
        assert!(!grid.components_dirty);
        assert!(grid.unreachable(&left, &right, false));
        assert!(grid.set_weight(&Point::new(3, 0), 1).is_err());
    }

    #[test]
    fn path_cost_scales_diagonals() {
        let grid = Grid::build(&[[1u32, 2], [3, 4]]).unwrap();
        let start = Point::new(0, 0);
        let path = [Point::new(1, 1), Point::new(1, 0)];
        let diagonal = grid.path_cost(start, &path, true).unwrap();
        assert!((diagonal - (4.0 * std::f64::consts::SQRT_2 + 2.0)).abs() < 1e-9);
        assert_eq!(grid.path_cost(start, &path, false), Ok(6.0));
        assert_eq!(grid.path_cost(start, &[], true), Ok(0.0));
    }

    #[test]
    fn display_prints_weights() {
        let grid = Grid::build(&[[1u32, 0], [2, 3]]).unwrap();
        assert_eq!(format!("{}", grid), "Grid:\n[1, 0]\n[2, 3]\n");
    }
}
