use core::fmt;

use grid_util::point::Point;
use log::info;

use crate::error::GridError;
use crate::grid::Grid;
use crate::search::{PathResult, SearchTrace};
use crate::STEP_COST;

pub mod astar;
pub mod dijkstra;

pub use astar::astar;
pub use dijkstra::dijkstra;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Dijkstra,
    Astar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Dijkstra, Algorithm::Astar];
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Algorithm::Dijkstra => write!(f, "Dijkstra"),
            Algorithm::Astar => write!(f, "A*"),
        }
    }
}

/// The recorded result of one algorithm on one snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRun<N, C> {
    pub algorithm: Algorithm,
    pub trace: SearchTrace<N, C>,
    pub path: PathResult<N, C>,
}

impl<N: PartialEq, C: Copy> SearchRun<N, C> {
    /// Number of finalized nodes.
    pub fn explored(&self) -> usize {
        self.trace.len()
    }
    /// Number of nodes on the path, 0 without one.
    pub fn path_len(&self) -> usize {
        self.path.nodes().len()
    }
}

pub type GridRun = SearchRun<Point, i32>;

/// Both algorithms run on one grid snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub snapshot: Grid,
    pub dijkstra: GridRun,
    pub astar: GridRun,
}

impl Comparison {
    pub fn run(&self, algorithm: Algorithm) -> &GridRun {
        match algorithm {
            Algorithm::Dijkstra => &self.dijkstra,
            Algorithm::Astar => &self.astar,
        }
    }
}

/// Copies the grid once and runs Dijkstra and A* on the copy, so later edits to `grid` cannot
/// leak into either trace.
pub fn compare(grid: &Grid) -> Result<Comparison, GridError> {
    let snapshot = grid.clone();
    let dijkstra = dijkstra(&snapshot)?;
    let astar = astar(&snapshot)?;
    info!(
        "Dijkstra explored {} cells, A* explored {} cells",
        dijkstra.explored(),
        astar.explored()
    );
    Ok(Comparison {
        snapshot,
        dijkstra,
        astar,
    })
}

/// Cost of walking `path` step by step.
pub fn path_cost(path: &[Point]) -> i32 {
    path.len().saturating_sub(1) as i32 * STEP_COST
}

pub(crate) fn log_reachability(grid: &Grid, start: &Point, goal: &Point) {
    if log::log_enabled!(log::Level::Info) {
        if grid.reachable(start, goal) {
            info!("{} is reachable from {}, computing path", goal, start);
        } else {
            info!("{} is not reachable from {}", goal, start);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Adjacency, GridConfig};
    use crate::grid::CellRole;

    #[test]
    fn comparison_uses_snapshot() {
        let mut grid = Grid::new(&GridConfig::new(3, 3)).unwrap();
        let comparison = compare(&grid).unwrap();
        grid.set_cell(Point::new(1, 0), CellRole::Wall).unwrap();
        assert_eq!(comparison.snapshot.walls(), 0);
        assert_eq!(comparison.run(Algorithm::Astar).path.cost(), Some(4));
    }

    #[test]
    fn path_cost_counts_steps() {
        assert_eq!(path_cost(&[]), 0);
        assert_eq!(path_cost(&[Point::new(0, 0)]), 0);
        assert_eq!(path_cost(&[Point::new(0, 0), Point::new(1, 1)]), 1);
    }

    #[test]
    fn compare_requires_endpoints() {
        let grid = Grid::parse("S..\n...\n", Adjacency::Four).unwrap();
        assert!(matches!(compare(&grid), Err(GridError::InvalidGrid { .. })));
    }
}
