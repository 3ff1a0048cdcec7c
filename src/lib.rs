//! # grid_routing
//!
//! Side-by-side comparison of [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)
//! and [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) on an editable grid. Both searches
//! record the order in which they finalize cells so the exploration can be replayed frame by
//! frame, one lane per algorithm. Every step on the grid costs [STEP_COST]; with 4-adjacency A*
//! uses the Manhattan distance and with 8-adjacency the Chebyshev distance, both admissible.
//!
//! ```
//! use grid_routing::{compare, Grid, GridConfig};
//!
//! let grid = Grid::new(&GridConfig::new(5, 5)).unwrap();
//! let comparison = compare(&grid).unwrap();
//! assert_eq!(comparison.dijkstra.path.cost(), Some(8));
//! assert_eq!(comparison.astar.path.cost(), Some(8));
//! assert!(comparison.astar.explored() <= comparison.dijkstra.explored());
//! ```
//!
//! The same searches run over weighted street networks loaded from node-link JSON, see
//! [network::RoadNetwork].
pub mod animator;
pub mod config;
pub mod error;
pub mod grid;
pub mod network;
pub mod search;
pub mod solver;
pub mod visualizer;

pub use animator::{Animator, Frame, LaneFrame, Playback, PlaybackHandle};
pub use config::{Adjacency, GridConfig, PlaybackConfig, VisualizerConfig};
pub use error::{GridError, MissingEndpoint, NetworkError};
pub use grid::{CellRole, Grid};
pub use search::{PathResult, SearchTrace, TraceStep};
pub use solver::{astar, compare, dijkstra, path_cost, Algorithm, Comparison, GridRun, SearchRun};
pub use visualizer::{Mark, Outcome, Visualizer};

pub use grid_util::point::Point;

/// Cost of one move between adjacent cells, straight or diagonal.
pub const STEP_COST: i32 = 1;

/// Inline capacity for neighbour lists; a cell has at most 8 neighbours.
pub(crate) const N_SMALLVEC_SIZE: usize = 8;
