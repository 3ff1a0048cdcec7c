use std::time::{Duration, Instant};

use grid_util::grid::{Grid as ValueGrid, SimpleGrid};
use grid_util::point::Point;
use log::{info, warn};
use rand::Rng;

use crate::animator::{Animator, Frame, Playback, PlaybackHandle};
use crate::config::VisualizerConfig;
use crate::error::GridError;
use crate::grid::{CellRole, Grid};
use crate::solver::{compare, Algorithm, Comparison};

/// What a lane shows on a free cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    Unvisited,
    Explored,
    Path,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Found { cost: i32, len: usize },
    NoPath,
}

#[derive(Clone, Debug)]
struct Overlay {
    marks: SimpleGrid<Mark>,
    explored: usize,
    outcome: Option<Outcome>,
}

impl Overlay {
    fn new(grid: &Grid) -> Overlay {
        Overlay {
            marks: SimpleGrid::new(grid.cols(), grid.rows(), Mark::Unvisited),
            explored: 0,
            outcome: None,
        }
    }
}

fn lane_ix(lane: Algorithm) -> usize {
    match lane {
        Algorithm::Dijkstra => 0,
        Algorithm::Astar => 1,
    }
}

/// Owns everything the routing demo shows: the editable grid, the last comparison, the animator
/// replaying it and one overlay per algorithm. The host forwards clicks to [edit](Self::edit),
/// buttons to [run](Self::run)/[reset](Self::reset) and calls [tick](Self::tick) every frame.
#[derive(Debug)]
pub struct Visualizer {
    config: VisualizerConfig,
    grid: Grid,
    animator: Animator,
    handle: Option<PlaybackHandle>,
    comparison: Option<Comparison>,
    overlays: [Overlay; 2],
}

impl Visualizer {
    pub fn new(config: VisualizerConfig) -> Result<Visualizer, GridError> {
        let grid = Grid::new(&config.grid)?;
        Ok(Visualizer::with_grid(config, grid))
    }

    /// Starts from an existing grid, e.g. one parsed from a layout. The grid's own dimensions
    /// and adjacency take precedence over `config.grid`.
    pub fn with_grid(config: VisualizerConfig, grid: Grid) -> Visualizer {
        let overlays = [Overlay::new(&grid), Overlay::new(&grid)];
        Visualizer {
            config,
            grid,
            animator: Animator::new(),
            handle: None,
            comparison: None,
            overlays,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn comparison(&self) -> Option<&Comparison> {
        self.comparison.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.handle.is_some_and(|h| self.animator.is_active(h))
    }

    /// Cancels playback and forgets the last run.
    fn discard_run(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.animator.cancel(handle);
        }
        self.comparison = None;
        self.overlays = [Overlay::new(&self.grid), Overlay::new(&self.grid)];
    }

    /// Applies a grid edit. A successful edit discards the last run, whose trace no longer
    /// matches the grid.
    pub fn edit(&mut self, pos: Point, role: CellRole) -> Result<(), GridError> {
        self.grid.set_cell(pos, role)?;
        self.discard_run();
        Ok(())
    }

    /// Computes both searches on a snapshot of the grid and starts replaying them side by side.
    pub fn run(&mut self, now: Instant) -> Result<PlaybackHandle, GridError> {
        self.discard_run();
        let comparison = compare(&self.grid).inspect_err(|e| warn!("Run refused: {}", e))?;
        let playback = &self.config.playback;
        let lanes = vec![
            Playback::new(comparison.dijkstra.clone(), playback.dijkstra_interval),
            Playback::new(comparison.astar.clone(), playback.astar_interval),
        ];
        let handle = self.animator.start(lanes, now);
        self.comparison = Some(comparison);
        self.handle = Some(handle);
        Ok(handle)
    }

    /// Stops playback but keeps what has been drawn so far.
    pub fn pause(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.animator.cancel(handle);
        }
    }

    pub fn reset(&mut self) {
        self.discard_run();
        self.grid.reset();
    }

    pub fn regenerate<R: Rng>(&mut self, rng: &mut R, density: f64) -> Result<(), GridError> {
        self.grid.regenerate(rng, density)?;
        self.discard_run();
        Ok(())
    }

    /// Replay interval for `lane`, used from the next [run](Self::run) on.
    pub fn set_interval(&mut self, lane: Algorithm, interval: Duration) {
        info!("{} replay interval set to {:?}", lane, interval);
        match lane {
            Algorithm::Dijkstra => self.config.playback.dijkstra_interval = interval,
            Algorithm::Astar => self.config.playback.astar_interval = interval,
        }
    }

    /// Applies every frame due at `now`. Returns whether any overlay changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let frames = self.animator.tick(now);
        let changed = !frames.is_empty();
        for lane_frame in frames {
            let overlay = &mut self.overlays[lane_ix(lane_frame.lane)];
            match lane_frame.frame {
                Frame::Explore(step) => {
                    overlay.marks.set_point(step.node, Mark::Explored);
                    overlay.explored += 1;
                }
                Frame::Path { nodes, cost } => {
                    for &p in &nodes {
                        overlay.marks.set_point(p, Mark::Path);
                    }
                    overlay.outcome = Some(Outcome::Found {
                        cost,
                        len: nodes.len(),
                    });
                }
                Frame::NoPath => overlay.outcome = Some(Outcome::NoPath),
            }
        }
        if !self.is_playing() {
            self.handle = None;
        }
        changed
    }

    pub fn mark(&self, lane: Algorithm, pos: Point) -> Mark {
        let marks = &self.overlays[lane_ix(lane)].marks;
        if !marks.point_in_bounds(pos) {
            return Mark::Unvisited;
        }
        marks.get_point(pos)
    }

    /// Final outcome of `lane`, once its last frame has been shown.
    pub fn outcome(&self, lane: Algorithm) -> Option<Outcome> {
        self.overlays[lane_ix(lane)].outcome
    }

    pub fn explored(&self, lane: Algorithm) -> usize {
        self.overlays[lane_ix(lane)].explored
    }

    pub fn status(&self, lane: Algorithm) -> String {
        let explored = self.explored(lane);
        match self.outcome(lane) {
            Some(Outcome::Found { cost, len }) => format!(
                "{}: explored {} cells, path cost {} over {} cells",
                lane, explored, cost, len
            ),
            Some(Outcome::NoPath) => {
                format!("{}: explored {} cells, no path exists", lane, explored)
            }
            None if self.is_playing() => format!("{}: exploring, {} cells so far", lane, explored),
            None => format!("{}: idle", lane),
        }
    }

    /// The grid as seen by one lane: `+` explored, `*` path, followed by the status line.
    pub fn render_lane(&self, lane: Algorithm) -> String {
        let mut out = String::with_capacity((self.grid.cols() + 1) * (self.grid.rows() + 1));
        for y in 0..self.grid.rows() as i32 {
            for x in 0..self.grid.cols() as i32 {
                let p = Point::new(x, y);
                let glyph = match (self.grid.cell(p), self.mark(lane, p)) {
                    (Ok(CellRole::Free), Mark::Path) => '*',
                    (Ok(CellRole::Free), Mark::Explored) => '+',
                    (Ok(role), _) => role.glyph(),
                    (Err(_), _) => ' ',
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out.push_str(&self.status(lane));
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use rand::prelude::*;

    const MS: Duration = Duration::from_millis(1);

    fn visualizer(rows: usize, cols: usize) -> Visualizer {
        Visualizer::new(VisualizerConfig {
            grid: GridConfig::new(rows, cols),
            ..VisualizerConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn run_replays_both_lanes_to_completion() {
        let mut vis = visualizer(5, 5);
        let t0 = Instant::now();
        vis.run(t0).unwrap();
        assert!(vis.is_playing());
        assert!(vis.tick(t0 + 100_000 * MS));
        assert!(!vis.is_playing());
        for lane in Algorithm::ALL {
            assert_eq!(vis.outcome(lane), Some(Outcome::Found { cost: 8, len: 9 }));
            assert_eq!(vis.mark(lane, Point::new(4, 4)), Mark::Path);
        }
        assert!(vis.explored(Algorithm::Astar) <= vis.explored(Algorithm::Dijkstra));
        assert!(vis.render_lane(Algorithm::Dijkstra).contains("path cost 8 over 9 cells"));
    }

    #[test]
    fn edit_cancels_playback_and_clears_overlays() {
        let mut vis = visualizer(5, 5);
        let t0 = Instant::now();
        vis.set_interval(Algorithm::Dijkstra, 10 * MS);
        vis.set_interval(Algorithm::Astar, 10 * MS);
        vis.run(t0).unwrap();
        vis.tick(t0 + 20 * MS);
        assert_eq!(vis.explored(Algorithm::Dijkstra), 3);
        vis.edit(Point::new(2, 2), CellRole::Wall).unwrap();
        assert!(!vis.is_playing());
        assert!(vis.comparison().is_none());
        assert!(!vis.tick(t0 + 100_000 * MS));
        assert_eq!(vis.explored(Algorithm::Dijkstra), 0);
        assert_eq!(vis.mark(Algorithm::Dijkstra, Point::new(1, 0)), Mark::Unvisited);
    }

    #[test]
    fn pause_keeps_drawn_overlays() {
        let mut vis = visualizer(5, 5);
        let t0 = Instant::now();
        vis.set_interval(Algorithm::Dijkstra, 10 * MS);
        vis.set_interval(Algorithm::Astar, 10 * MS);
        vis.run(t0).unwrap();
        vis.tick(t0 + 20 * MS);
        vis.pause();
        assert!(!vis.is_playing());
        assert!(!vis.tick(t0 + 100_000 * MS));
        assert!(vis.comparison().is_some());
        for lane in Algorithm::ALL {
            assert_eq!(vis.explored(lane), 3);
            assert_eq!(vis.outcome(lane), None);
        }
        assert_eq!(vis.mark(Algorithm::Dijkstra, Point::new(1, 0)), Mark::Explored);
        assert_eq!(vis.mark(Algorithm::Dijkstra, Point::new(4, 4)), Mark::Unvisited);
    }

    #[test]
    fn failed_edit_keeps_playback() {
        let mut vis = visualizer(3, 3);
        vis.run(Instant::now()).unwrap();
        assert!(vis.edit(Point::new(5, 5), CellRole::Wall).is_err());
        assert!(vis.is_playing());
    }

    #[test]
    fn run_without_goal_is_blocked() {
        let grid = Grid::parse("S..\n.#.\n", crate::config::Adjacency::Four).unwrap();
        let mut vis = Visualizer::with_grid(VisualizerConfig::default(), grid);
        let err = vis.run(Instant::now()).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("place both a start and a goal before running"));
        assert!(!vis.is_playing());
    }

    #[test]
    fn walled_off_goal_reports_no_path() {
        let mut vis = visualizer(3, 3);
        for x in 0..3 {
            vis.edit(Point::new(x, 1), CellRole::Wall).unwrap();
        }
        let t0 = Instant::now();
        vis.run(t0).unwrap();
        vis.tick(t0 + 100_000 * MS);
        for lane in Algorithm::ALL {
            assert_eq!(vis.outcome(lane), Some(Outcome::NoPath));
            assert_eq!(vis.explored(lane), 3);
            assert!(vis.render_lane(lane).contains("no path exists"));
        }
    }

    #[test]
    fn reset_and_regenerate_discard_run() {
        let mut vis = visualizer(6, 6);
        let t0 = Instant::now();
        vis.run(t0).unwrap();
        vis.reset();
        assert!(!vis.is_playing());
        let mut rng = StdRng::seed_from_u64(7);
        vis.regenerate(&mut rng, 0.3).unwrap();
        assert!(vis.comparison().is_none());
        assert_eq!(vis.status(Algorithm::Astar), "A*: idle");
    }

    #[test]
    fn rerun_restarts_from_scratch() {
        let mut vis = visualizer(4, 4);
        let t0 = Instant::now();
        let first = vis.run(t0).unwrap();
        vis.tick(t0 + 100 * MS);
        let second = vis.run(t0 + 200 * MS).unwrap();
        assert_ne!(first, second);
        assert_eq!(vis.explored(Algorithm::Dijkstra), 0);
        vis.tick(t0 + 200 * MS);
        assert_eq!(vis.explored(Algorithm::Dijkstra), 1);
    }
}
