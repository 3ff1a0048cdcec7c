use grid_util::point::Point;

use crate::config::Adjacency;
use crate::error::GridError;
use crate::grid::Grid;
use crate::search::best_first;
use crate::solver::{log_reachability, Algorithm, GridRun};
use crate::STEP_COST;

/// Lower bound on the number of steps between two cells: Manhattan distance on a 4-grid and
/// Chebyshev distance on an 8-grid, where a diagonal step costs the same as a straight one.
/// Both are consistent, so the first time the goal leaves the frontier its path is optimal.
pub fn heuristic(adjacency: Adjacency, p1: &Point, p2: &Point) -> i32 {
    let delta_x = (p1.x - p2.x).abs();
    let delta_y = (p1.y - p2.y).abs();
    match adjacency {
        Adjacency::Four => (delta_x + delta_y) * STEP_COST,
        Adjacency::Eight { .. } => delta_x.max(delta_y) * STEP_COST,
    }
}

/// A* from the grid's start to its goal. Same frontier and relaxation as
/// [dijkstra](crate::solver::dijkstra()), ranked by distance plus [heuristic].
pub fn astar(grid: &Grid) -> Result<GridRun, GridError> {
    let (start, goal) = grid.endpoints()?;
    log_reachability(grid, &start, &goal);
    let adjacency = grid.adjacency();
    let (trace, path) = best_first(
        &start,
        |node| {
            grid.neighbors(*node)
                .into_iter()
                .map(|p| (p, STEP_COST))
        },
        |point| heuristic(adjacency, point, &goal),
        |node| *node == goal,
    );
    Ok(GridRun {
        algorithm: Algorithm::Astar,
        trace,
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::grid::CellRole;
    use crate::search::PathResult;

    /// Asserts that the optimal solution is found for each adjacency.
    #[test]
    fn solve_simple_problem() {
        //  ___
        // |S  |
        // | # |
        // |  G|
        //  ___
        for (adjacency, expected) in [
            (Adjacency::Four, 5),
            (Adjacency::Eight { corner_cutting: true }, 4),
            (Adjacency::Eight { corner_cutting: false }, 5),
        ] {
            let grid = Grid::parse("S..\n.#.\n..G\n", adjacency).unwrap();
            let run = astar(&grid).unwrap();
            assert_eq!(run.path_len(), expected, "{:?}", adjacency);
        }
    }

    #[test]
    fn heuristic_matches_adjacency() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 5);
        assert_eq!(heuristic(Adjacency::Four, &a, &b), 8);
        assert_eq!(heuristic(Adjacency::Eight { corner_cutting: true }, &a, &b), 5);
        assert_eq!(heuristic(Adjacency::Four, &b, &b), 0);
    }

    #[test]
    fn heads_straight_for_goal_on_open_grid() {
        let config = GridConfig::new(1, 10);
        let grid = Grid::new(&config).unwrap();
        let run = astar(&grid).unwrap();
        assert_eq!(run.explored(), 10);
        assert_eq!(run.path.cost(), Some(9));
    }

    // Tests whether allowing diagonals has the expected effect on path existence in a minimal setting.
    #[test]
    fn test_diagonal_switch_path() {
        //  ___
        // |S#|
        // |#G|
        //  __
        let four = Grid::parse("S#\n#G\n", Adjacency::Four).unwrap();
        let eight = Grid::parse("S#\n#G\n", Adjacency::Eight { corner_cutting: true }).unwrap();
        assert_eq!(astar(&four).unwrap().path, PathResult::NoPath);
        assert!(astar(&eight).unwrap().path.is_found());
    }

    #[test]
    fn walls_force_a_detour() {
        let mut grid = Grid::new(&GridConfig::new(3, 5)).unwrap();
        for y in 0..2 {
            grid.set_cell(Point::new(2, y), CellRole::Wall).unwrap();
        }
        let run = astar(&grid).unwrap();
        // (0,0) -> (4,2) with column 2 open only on the bottom row
        assert_eq!(run.path.cost(), Some(6));
        assert!(run.path.nodes().contains(&Point::new(2, 2)));
    }
}
