use core::fmt;

use grid_util::grid::{Grid as ValueGrid, SimpleGrid};
use grid_util::point::Point;
use itertools::{iproduct, Itertools};
use log::{debug, info};
use petgraph::unionfind::UnionFind;
use rand::Rng;
use smallvec::SmallVec;

use crate::config::{Adjacency, GridConfig};
use crate::error::{GridError, MissingEndpoint};
use crate::N_SMALLVEC_SIZE;

/// Offsets in neighbour order: N, E, S, W, then NE, SE, SW, NW.
const OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellRole {
    Free,
    Wall,
    Start,
    Goal,
}

impl CellRole {
    pub fn glyph(&self) -> char {
        match self {
            CellRole::Free => '.',
            CellRole::Wall => '#',
            CellRole::Start => 'S',
            CellRole::Goal => 'G',
        }
    }

    fn from_glyph(c: char) -> Option<CellRole> {
        match c {
            '.' => Some(CellRole::Free),
            '#' => Some(CellRole::Wall),
            'S' => Some(CellRole::Start),
            'G' => Some(CellRole::Goal),
            _ => None,
        }
    }

    fn counterpart(&self) -> CellRole {
        match self {
            CellRole::Start => CellRole::Goal,
            CellRole::Goal => CellRole::Start,
            role => *role,
        }
    }
}

/// [Grid] is the editable occupancy grid both searches run on. Positions are [Point]s with
/// `x` the column and `y` the row. At most one start and one goal exist at any time and no
/// edit can remove either once placed; placing one elsewhere demotes the previous cell to
/// [CellRole::Free].
#[derive(Clone, Debug)]
pub struct Grid {
    cells: SimpleGrid<CellRole>,
    adjacency: Adjacency,
    start: Option<Point>,
    goal: Option<Point>,
    default_start: Point,
    default_goal: Point,
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.cells.width == other.cells.width
            && self.cells.values == other.cells.values
            && self.adjacency == other.adjacency
            && self.start == other.start
            && self.goal == other.goal
            && self.default_start == other.default_start
            && self.default_goal == other.default_goal
    }
}

impl Grid {
    /// Creates an empty grid with the configured default endpoints.
    pub fn new(config: &GridConfig) -> Result<Grid, GridError> {
        config.validate()?;
        let cells: SimpleGrid<CellRole> =
            SimpleGrid::new(config.cols, config.rows, CellRole::Free);
        let (start, goal) = (config.start_position(), config.goal_position());
        if !cells.point_in_bounds(start) || !cells.point_in_bounds(goal) {
            return Err(GridError::InvalidEndpoints);
        }
        let mut grid = Grid {
            cells,
            adjacency: config.adjacency,
            start: None,
            goal: None,
            default_start: start,
            default_goal: goal,
        };
        grid.reset();
        Ok(grid)
    }

    /// Parses a layout of `.`, `#`, `S` and `G`, one row per line. Either endpoint may be
    /// absent, in which case the grid can be edited but not searched until it is placed.
    pub fn parse(layout: &str, adjacency: Adjacency) -> Result<Grid, GridError> {
        let lines = layout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>();
        let rows = lines.len();
        let cols = lines.first().map_or(0, |l| l.chars().count());
        if rows * cols < 2 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        let mut cells: SimpleGrid<CellRole> = SimpleGrid::new(cols, rows, CellRole::Free);
        let mut start = None;
        let mut goal = None;
        for (y, line) in lines.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(GridError::InvalidLayout {
                    line: y + 1,
                    reason: format!("expected {} cells", cols),
                });
            }
            for (x, c) in line.chars().enumerate() {
                let role = CellRole::from_glyph(c).ok_or_else(|| GridError::InvalidLayout {
                    line: y + 1,
                    reason: format!("unknown cell {:?}", c),
                })?;
                let slot = match role {
                    CellRole::Start => Some(&mut start),
                    CellRole::Goal => Some(&mut goal),
                    _ => None,
                };
                if let Some(slot) = slot {
                    if slot.is_some() {
                        return Err(GridError::InvalidLayout {
                            line: y + 1,
                            reason: format!("more than one {:?}", role),
                        });
                    }
                    *slot = Some(Point::new(x as i32, y as i32));
                }
                cells.set(x, y, role);
            }
        }
        let top_left = Point::new(0, 0);
        let bottom_right = Point::new(cols as i32 - 1, rows as i32 - 1);
        let (default_start, default_goal) = match (start, goal) {
            (Some(s), Some(g)) => (s, g),
            (Some(s), None) => (s, if s == bottom_right { top_left } else { bottom_right }),
            (None, Some(g)) => (if g == top_left { bottom_right } else { top_left }, g),
            (None, None) => (top_left, bottom_right),
        };
        Ok(Grid {
            cells,
            adjacency,
            start,
            goal,
            default_start,
            default_goal,
        })
    }

    pub fn rows(&self) -> usize {
        self.cells.height()
    }
    pub fn cols(&self) -> usize {
        self.cells.width()
    }
    pub fn adjacency(&self) -> Adjacency {
        self.adjacency
    }
    pub fn start(&self) -> Option<Point> {
        self.start
    }
    pub fn goal(&self) -> Option<Point> {
        self.goal
    }

    /// Both endpoints, or the [GridError::InvalidGrid] that blocks a run.
    pub fn endpoints(&self) -> Result<(Point, Point), GridError> {
        match (self.start, self.goal) {
            (Some(s), Some(g)) => Ok((s, g)),
            (None, Some(_)) => Err(GridError::InvalidGrid {
                missing: MissingEndpoint::Start,
            }),
            (Some(_), None) => Err(GridError::InvalidGrid {
                missing: MissingEndpoint::Goal,
            }),
            (None, None) => Err(GridError::InvalidGrid {
                missing: MissingEndpoint::Both,
            }),
        }
    }

    pub fn in_bounds(&self, pos: Point) -> bool {
        self.cells.point_in_bounds(pos)
    }

    fn check_bounds(&self, pos: Point) -> Result<(), GridError> {
        if self.cells.point_in_bounds(pos) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                position: pos,
                rows: self.rows(),
                cols: self.cols(),
            })
        }
    }

    pub fn cell(&self, pos: Point) -> Result<CellRole, GridError> {
        self.check_bounds(pos)?;
        Ok(self.cells.get_point(pos))
    }

    /// In bounds and not a wall.
    pub fn passable(&self, pos: Point) -> bool {
        self.cells.point_in_bounds(pos) && self.cells.get_point(pos) != CellRole::Wall
    }

    pub fn walls(&self) -> usize {
        self.cells
            .values
            .iter()
            .filter(|c| **c == CellRole::Wall)
            .count()
    }

    /// Applies a single edit. Placing an endpoint on a wall clears the wall first, and placing
    /// one endpoint on the other swaps the two. Writing [CellRole::Free] or [CellRole::Wall]
    /// over an endpoint is refused, as is placing a missing endpoint on the other one, which
    /// would leave nothing to swap back.
    pub fn set_cell(&mut self, pos: Point, role: CellRole) -> Result<(), GridError> {
        self.check_bounds(pos)?;
        let current = self.cells.get_point(pos);
        match role {
            CellRole::Free | CellRole::Wall => {
                if matches!(current, CellRole::Start | CellRole::Goal) {
                    return Err(GridError::EndpointOccupied { position: pos });
                }
                self.cells.set_point(pos, role);
            }
            CellRole::Start | CellRole::Goal => {
                if current == role.counterpart() && self.endpoint_slot(role).is_none() {
                    return Err(GridError::EndpointOccupied { position: pos });
                }
                if current == CellRole::Wall {
                    debug!("Clearing wall at {} before placing {:?}", pos, role);
                    self.cells.set_point(pos, CellRole::Free);
                }
                self.place_endpoint(pos, role);
            }
        }
        Ok(())
    }

    fn endpoint_slot(&mut self, role: CellRole) -> &mut Option<Point> {
        if role == CellRole::Start {
            &mut self.start
        } else {
            &mut self.goal
        }
    }

    fn place_endpoint(&mut self, pos: Point, role: CellRole) {
        let other = role.counterpart();
        let previous = *self.endpoint_slot(role);
        if previous == Some(pos) {
            return;
        }
        if let Some(prev) = previous {
            if *self.endpoint_slot(other) == Some(pos) {
                debug!("Swapping start and goal at {}", pos);
                *self.endpoint_slot(other) = Some(prev);
                self.cells.set_point(prev, other);
            } else {
                self.cells.set_point(prev, CellRole::Free);
            }
        }
        self.cells.set_point(pos, role);
        *self.endpoint_slot(role) = Some(pos);
    }

    /// Passable neighbours of `pos` under the grid's adjacency, in the fixed order N, E, S, W,
    /// NE, SE, SW, NW.
    pub fn neighbors(&self, pos: Point) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        let offsets = if self.adjacency.allows_diagonal() {
            &OFFSETS[..]
        } else {
            &OFFSETS[..4]
        };
        offsets
            .iter()
            .map(|&(dx, dy)| Point::new(pos.x + dx, pos.y + dy))
            .filter(|&p| self.can_move_to(p, pos))
            .collect()
    }

    fn can_move_to(&self, pos: Point, from: Point) -> bool {
        if !self.passable(pos) {
            return false;
        }
        match self.adjacency {
            Adjacency::Eight {
                corner_cutting: false,
            } if pos.x != from.x && pos.y != from.y => {
                self.passable(Point::new(from.x, pos.y)) && self.passable(Point::new(pos.x, from.y))
            }
            _ => true,
        }
    }

    /// Clears every cell and restores the default endpoints.
    pub fn reset(&mut self) {
        info!("Resetting {}x{} grid", self.cols(), self.rows());
        self.cells.values.fill(CellRole::Free);
        self.start = None;
        self.goal = None;
        self.place_endpoint(self.default_start, CellRole::Start);
        self.place_endpoint(self.default_goal, CellRole::Goal);
    }

    /// Resets and then turns each non-endpoint cell into a wall with probability `density`.
    pub fn regenerate<R: Rng>(&mut self, rng: &mut R, density: f64) -> Result<(), GridError> {
        if !(0.0..=1.0).contains(&density) {
            return Err(GridError::InvalidDensity(density));
        }
        self.reset();
        for cell in self.cells.values.iter_mut() {
            if *cell == CellRole::Free && rng.gen_bool(density) {
                *cell = CellRole::Wall;
            }
        }
        info!("Regenerated grid with {} walls", self.walls());
        Ok(())
    }

    /// Links every passable cell to its passable neighbours in a fresh [UnionFind].
    pub fn components(&self) -> UnionFind<usize> {
        let mut components = UnionFind::new(self.rows() * self.cols());
        for (y, x) in iproduct!(0..self.rows() as i32, 0..self.cols() as i32) {
            let point = Point::new(x, y);
            if !self.passable(point) {
                continue;
            }
            let parent_ix = self.cells.get_ix_point(&point);
            for n in self.neighbors(point) {
                components.union(parent_ix, self.cells.get_ix_point(&n));
            }
        }
        components
    }

    /// Checks if `a` and `b` are passable and on the same connected component.
    pub fn reachable(&self, a: &Point, b: &Point) -> bool {
        if !self.passable(*a) || !self.passable(*b) {
            return false;
        }
        let components = self.components();
        components.equiv(self.cells.get_ix_point(a), self.cells.get_ix_point(b))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.values.chunks(self.cols()) {
            writeln!(f, "{}", row.iter().map(CellRole::glyph).join(""))?;
        }
        Ok(())
    }
}
