//! Frame-by-frame replay of recorded searches.
//!
//! Nothing here sleeps or spawns. The host calls [Animator::tick] from its own frame loop and
//! receives the frames that became due since the last call; each tick is also the point at
//! which a cancelled playback stops.
use std::time::{Duration, Instant};

use grid_util::point::Point;
use log::debug;

use crate::search::TraceStep;
use crate::solver::{Algorithm, SearchRun};

/// One replay event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame<N, C> {
    /// Mark a node explored, in discovery order.
    Explore(TraceStep<N, C>),
    /// Reveal the final path; always the last frame of a run that found one.
    Path { nodes: Vec<N>, cost: C },
    /// Last frame of a run whose goal was unreachable.
    NoPath,
}

/// A frame tagged with the lane it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaneFrame<N, C> {
    pub lane: Algorithm,
    pub frame: Frame<N, C>,
}

/// Replays one [SearchRun]: one frame per trace step followed by the path frame. The first frame
/// is due when the playback starts and each further one `interval` later.
#[derive(Clone, Debug)]
pub struct Playback<N, C> {
    run: SearchRun<N, C>,
    interval: Duration,
    emitted: usize,
    started: Option<Instant>,
}

impl<N: Clone + PartialEq, C: Copy> Playback<N, C> {
    pub fn new(run: SearchRun<N, C>, interval: Duration) -> Playback<N, C> {
        Playback {
            run,
            interval,
            emitted: 0,
            started: None,
        }
    }

    pub fn lane(&self) -> Algorithm {
        self.run.algorithm
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn total_frames(&self) -> usize {
        self.run.trace.len() + 1
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn is_finished(&self) -> bool {
        self.emitted >= self.total_frames()
    }

    fn frame(&self, i: usize) -> Frame<N, C> {
        match self.run.trace.get(i) {
            Some(step) => Frame::Explore(step.clone()),
            None => match self.run.path.cost() {
                Some(cost) => Frame::Path {
                    nodes: self.run.path.nodes().to_vec(),
                    cost,
                },
                None => Frame::NoPath,
            },
        }
    }

    /// Emits the next frame regardless of timing.
    pub fn step(&mut self) -> Option<Frame<N, C>> {
        if self.is_finished() {
            return None;
        }
        let frame = self.frame(self.emitted);
        self.emitted += 1;
        Some(frame)
    }

    /// Starts the clock at `at` unless it is already running.
    pub fn begin(&mut self, at: Instant) {
        self.started.get_or_insert(at);
    }

    /// Emits every frame that is due at `now`. Starts the clock on first use.
    pub fn advance(&mut self, now: Instant) -> Vec<Frame<N, C>> {
        let started = *self.started.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started);
        let due = if self.interval.is_zero() {
            self.total_frames()
        } else {
            let ticks = elapsed.as_nanos() / self.interval.as_nanos();
            usize::try_from(ticks)
                .unwrap_or(usize::MAX)
                .saturating_add(1)
                .min(self.total_frames())
        };
        let mut frames = Vec::new();
        while self.emitted < due {
            frames.push(self.frame(self.emitted));
            self.emitted += 1;
        }
        frames
    }
}

/// Identifies one started comparison. Stale handles never affect a newer playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlaybackHandle {
    id: u64,
}

#[derive(Debug)]
struct Timer<N, C> {
    id: u64,
    lanes: Vec<Playback<N, C>>,
}

/// Drives up to one set of lanes at a time. Starting a new set cancels the previous one first.
#[derive(Debug)]
pub struct Animator<N = Point, C = i32> {
    timer: Option<Timer<N, C>>,
    next_id: u64,
}

impl<N, C> Default for Animator<N, C> {
    fn default() -> Self {
        Animator {
            timer: None,
            next_id: 0,
        }
    }
}

impl<N: Clone + PartialEq, C: Copy> Animator<N, C> {
    pub fn new() -> Animator<N, C> {
        Animator::default()
    }

    /// Cancels whatever is playing, then starts every lane from the same instant.
    pub fn start(&mut self, mut lanes: Vec<Playback<N, C>>, now: Instant) -> PlaybackHandle {
        self.cancel_all();
        self.next_id += 1;
        let id = self.next_id;
        debug!("Starting playback {} with {} lanes", id, lanes.len());
        for lane in lanes.iter_mut() {
            debug!(
                "{}: {} frames every {:?}",
                lane.lane(),
                lane.total_frames(),
                lane.interval()
            );
            lane.begin(now);
        }
        self.timer = Some(Timer { id, lanes });
        PlaybackHandle { id }
    }

    /// Stops the playback behind `handle`. Returns whether anything was stopped; calling it
    /// again, after natural completion, or with a stale handle does nothing.
    pub fn cancel(&mut self, handle: PlaybackHandle) -> bool {
        if !self.is_active(handle) {
            return false;
        }
        debug!("Cancelled playback {}", handle.id);
        self.timer = None;
        true
    }

    pub fn cancel_all(&mut self) {
        if let Some(timer) = self.timer.take() {
            debug!("Cancelled playback {}", timer.id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn is_active(&self, handle: PlaybackHandle) -> bool {
        self.timer.as_ref().is_some_and(|t| t.id == handle.id)
    }

    /// Frames due at `now` across all lanes, lane by lane. The timer is cleared once every lane
    /// has emitted its last frame.
    pub fn tick(&mut self, now: Instant) -> Vec<LaneFrame<N, C>> {
        let Some(timer) = self.timer.as_mut() else {
            return Vec::new();
        };
        let mut frames = Vec::new();
        for playback in timer.lanes.iter_mut() {
            let lane = playback.lane();
            frames.extend(
                playback
                    .advance(now)
                    .into_iter()
                    .map(|frame| LaneFrame { lane, frame }),
            );
        }
        let id = timer.id;
        if timer.lanes.iter().all(Playback::is_finished) {
            debug!("Playback {} finished", id);
            self.timer = None;
        }
        frames
    }
}

impl<N, C> Drop for Animator<N, C> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            debug!("Dropping animator with playback {} in flight", timer.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::grid::Grid;
    use crate::solver::{compare, GridRun};

    const MS: Duration = Duration::from_millis(1);

    fn runs() -> (GridRun, GridRun) {
        let grid = Grid::new(&GridConfig::new(3, 3)).unwrap();
        let comparison = compare(&grid).unwrap();
        (comparison.dijkstra, comparison.astar)
    }

    #[test]
    fn frames_follow_trace_then_path() {
        let (dijkstra, _) = runs();
        let mut playback = Playback::new(dijkstra.clone(), MS);
        let frames = std::iter::from_fn(|| playback.step()).collect::<Vec<_>>();
        assert_eq!(frames.len(), dijkstra.trace.len() + 1);
        for (frame, step) in frames.iter().zip(dijkstra.trace.iter()) {
            assert_eq!(*frame, Frame::Explore(step.clone()));
        }
        assert!(matches!(frames.last(), Some(Frame::Path { cost: 4, .. })));
        assert!(playback.step().is_none());
    }

    #[test]
    fn advance_paces_by_interval() {
        let (dijkstra, _) = runs();
        let total = dijkstra.trace.len() + 1;
        let t0 = Instant::now();
        let mut playback = Playback::new(dijkstra, 10 * MS);
        assert_eq!(playback.interval(), 10 * MS);
        assert_eq!(playback.advance(t0).len(), 1);
        assert_eq!(playback.advance(t0 + 5 * MS).len(), 0);
        assert_eq!(playback.advance(t0 + 25 * MS).len(), 2);
        assert_eq!(playback.emitted(), 3);
        let rest = playback.advance(t0 + 10_000 * MS);
        assert_eq!(rest.len(), total - 3);
        assert_eq!(playback.emitted(), total);
        assert!(playback.is_finished());
    }

    #[test]
    fn cancelled_playback_emits_nothing() {
        let (dijkstra, astar) = runs();
        let t0 = Instant::now();
        let mut animator = Animator::new();
        let handle = animator.start(
            vec![Playback::new(dijkstra, MS), Playback::new(astar, MS)],
            t0,
        );
        assert_eq!(animator.tick(t0).len(), 2);
        assert!(animator.cancel(handle));
        assert!(!animator.is_running());
        assert!(animator.tick(t0 + 1000 * MS).is_empty());
        // idempotent
        assert!(!animator.cancel(handle));
    }

    #[test]
    fn cancel_after_completion_is_safe() {
        let (dijkstra, astar) = runs();
        let t0 = Instant::now();
        let mut animator = Animator::new();
        let handle = animator.start(
            vec![Playback::new(dijkstra, MS), Playback::new(astar, MS)],
            t0,
        );
        let frames = animator.tick(t0 + 1000 * MS);
        assert!(frames.iter().any(|f| f.lane == Algorithm::Dijkstra));
        assert!(frames.iter().any(|f| f.lane == Algorithm::Astar));
        assert!(!animator.is_active(handle));
        assert!(!animator.cancel(handle));
    }

    #[test]
    fn restart_invalidates_old_handle() {
        let (dijkstra, astar) = runs();
        let t0 = Instant::now();
        let mut animator = Animator::new();
        let first = animator.start(vec![Playback::new(dijkstra.clone(), MS)], t0);
        let second = animator.start(vec![Playback::new(astar, MS)], t0);
        assert_ne!(first, second);
        assert!(!animator.cancel(first));
        assert!(animator.is_active(second));
        let frames = animator.tick(t0);
        assert!(frames.iter().all(|f| f.lane == Algorithm::Astar));
    }

    #[test]
    fn lanes_are_paced_independently() {
        let (dijkstra, astar) = runs();
        let t0 = Instant::now();
        let mut animator = Animator::new();
        animator.start(
            vec![Playback::new(dijkstra, 10 * MS), Playback::new(astar, 5 * MS)],
            t0,
        );
        let frames = animator.tick(t0 + 10 * MS);
        let count = |lane| frames.iter().filter(|f| f.lane == lane).count();
        assert_eq!(count(Algorithm::Dijkstra), 2);
        assert_eq!(count(Algorithm::Astar), 3);
    }
}
