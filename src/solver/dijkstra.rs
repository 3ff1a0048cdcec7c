use num_traits::Zero;

use crate::error::GridError;
use crate::grid::Grid;
use crate::search::best_first;
use crate::solver::{log_reachability, Algorithm, GridRun};
use crate::STEP_COST;

/// Dijkstra's algorithm from the grid's start to its goal. The frontier is ranked by distance
/// from the start only; ties go to the cell discovered first.
pub fn dijkstra(grid: &Grid) -> Result<GridRun, GridError> {
    let (start, goal) = grid.endpoints()?;
    log_reachability(grid, &start, &goal);
    let (trace, path) = best_first(
        &start,
        |node| {
            grid.neighbors(*node)
                .into_iter()
                .map(|p| (p, STEP_COST))
        },
        |_| Zero::zero(),
        |node| *node == goal,
    );
    Ok(GridRun {
        algorithm: Algorithm::Dijkstra,
        trace,
        path,
    })
}

#[cfg(test)]
mod tests {
    use grid_util::point::Point;

    use super::*;
    use crate::config::{Adjacency, GridConfig};

    #[test]
    fn explores_in_rings_of_distance() {
        let grid = Grid::new(&GridConfig::new(4, 4)).unwrap();
        let run = dijkstra(&grid).unwrap();
        let costs = run.trace.iter().map(|s| s.cost).collect::<Vec<_>>();
        assert!(costs.windows(2).all(|w| w[0] <= w[1]));
        // every cell of the open 4x4 grid lies within distance 6 of the corner
        assert_eq!(run.explored(), 16);
        assert_eq!(run.path.cost(), Some(6));
    }

    #[test]
    fn first_steps_follow_neighbour_order() {
        let grid = Grid::new(&GridConfig::new(3, 3)).unwrap();
        let run = dijkstra(&grid).unwrap();
        let first = run.trace.iter().take(3).map(|s| s.node).collect::<Vec<_>>();
        // from the top-left corner north and west are out of bounds: east before south
        assert_eq!(first, vec![Point::new(0, 0), Point::new(1, 0), Point::new(0, 1)]);
    }

    #[test]
    fn diagonal_moves_shorten_paths() {
        let config = GridConfig::new(5, 5).with_adjacency(Adjacency::Eight {
            corner_cutting: false,
        });
        let grid = Grid::new(&config).unwrap();
        let run = dijkstra(&grid).unwrap();
        assert_eq!(run.path.cost(), Some(4));
        assert_eq!(run.path_len(), 5);
    }
}
