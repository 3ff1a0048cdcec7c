use std::time::Duration;

use grid_util::point::Point;

use crate::error::GridError;

/// Neighbourhood used by both searches. Every step costs [STEP_COST](crate::STEP_COST).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Adjacency {
    /// Up, right, down, left.
    #[default]
    Four,
    /// All eight surrounding cells. Without corner cutting a diagonal step needs both
    /// orthogonal cells it passes to be free of walls.
    Eight { corner_cutting: bool },
}

impl Adjacency {
    pub fn allows_diagonal(&self) -> bool {
        matches!(self, Adjacency::Eight { .. })
    }
}

/// Dimensions, adjacency and default endpoint placement of a grid session.
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    pub adjacency: Adjacency,
    /// Where [reset](crate::grid::Grid::reset) puts the start. Top-left when [None].
    pub default_start: Option<Point>,
    /// Where [reset](crate::grid::Grid::reset) puts the goal. Bottom-right when [None].
    pub default_goal: Option<Point>,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            rows: 15,
            cols: 30,
            adjacency: Adjacency::Four,
            default_start: None,
            default_goal: None,
        }
    }
}

impl GridConfig {
    pub fn new(rows: usize, cols: usize) -> GridConfig {
        GridConfig {
            rows,
            cols,
            ..GridConfig::default()
        }
    }

    pub fn with_adjacency(mut self, adjacency: Adjacency) -> GridConfig {
        self.adjacency = adjacency;
        self
    }

    pub fn with_endpoints(mut self, start: Point, goal: Point) -> GridConfig {
        self.default_start = Some(start);
        self.default_goal = Some(goal);
        self
    }

    pub fn start_position(&self) -> Point {
        self.default_start.unwrap_or(Point::new(0, 0))
    }

    pub fn goal_position(&self) -> Point {
        self.default_goal
            .unwrap_or(Point::new(self.cols as i32 - 1, self.rows as i32 - 1))
    }

    /// Rejects grids that cannot hold both endpoints and default endpoints that collide.
    /// Whether the endpoints fall inside the grid is checked when the grid is built.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.rows == 0 || self.cols == 0 || self.rows * self.cols < 2 {
            return Err(GridError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let (start, goal) = (self.start_position(), self.goal_position());
        if start == goal {
            return Err(GridError::InvalidEndpoints);
        }
        Ok(())
    }
}

/// Replay pacing per lane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackConfig {
    pub dijkstra_interval: Duration,
    pub astar_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            dijkstra_interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            astar_interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
        }
    }
}

const DEFAULT_INTERVAL_MS: u64 = 20;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisualizerConfig {
    pub grid: GridConfig,
    pub playback: PlaybackConfig,
}
