use grid_astar::{AstarSolver, Grid};
use grid_util::point::Point;

// In this example a path is found on an 11x8 grid where
// - 0 marks a wall
// - 2 marks a cell that is twice as expensive to enter
//
// Nodes have a 4-neighborhood, set allow_diagonals to use an 8-neighborhood instead.

fn main() {
    let weights = [
        [1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 2, 2, 2, 2, 1, 1, 1, 1, 1],
        [1, 1, 0, 2, 2, 2, 1, 1, 1, 1, 1],
        [1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 0, 0, 0, 0, 1, 1, 1, 1, 1],
        [0, 1, 1, 0, 0, 0, 1, 1, 1, 1, 1u32],
    ];
    let mut grid = Grid::build(&weights).unwrap();
    println!("{}", grid);
    let solver = AstarSolver::new();
    let start = Point::new(2, 7);
    let end = Point::new(7, 7);
    let path = solver.get_path_single_goal(&mut grid, start, end).unwrap();
    println!("Path (cost {:.3}):", path.cost());
    for p in path {
        println!("{:?}", p);
    }
}
