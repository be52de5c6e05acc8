//! Growable belief map of the world around the anthill.
//!
//! Stores, for every cell the agent (or one of its peers) has looked at,
//! whether it is a wall, how much food and how many ants were there, and when
//! it was last seen. Food and ant counts fade on read as the observation ages;
//! walls never fade.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::simulation::host::{Action, Position, Tile};
use crate::simulation::params::{FOOD_DECAY_PERIOD, INITIAL_GRID_SIZE, OCCUPANCY_DECAY_PERIOD};

/// Logical time, counted in agent ticks.
pub type Tick = u32;

/// Latest representable tick; the wire carries ticks as signed 32-bit values.
pub const MAX_TICK: Tick = i32::MAX as Tick;

/// What the agent believes about a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellBelief {
    /// Set once a wall is seen and never cleared
    pub wall: bool,
    /// Food count at the last observation
    pub food: u32,
    /// Ant count at the last observation
    pub occupancy: u32,
    /// Tick of the last direct observation, `None` if never seen
    pub last_seen: Option<Tick>,
}

impl CellBelief {
    /// A cell nobody has observed.
    pub const UNKNOWN: CellBelief = CellBelief {
        wall: false,
        food: 0,
        occupancy: 0,
        last_seen: None,
    };

    /// Returns true if the cell has been observed at least once.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        self.last_seen.is_some()
    }

    /// Returns this belief as it should be trusted at tick `now`.
    #[must_use]
    pub fn decayed(&self, now: Tick, policy: DecayPolicy) -> Self {
        let Some(seen) = self.last_seen else {
            return Self::UNKNOWN;
        };
        let elapsed = now.saturating_sub(seen);
        Self {
            food: DecayPolicy::fade(self.food, elapsed, policy.food_period),
            occupancy: DecayPolicy::fade(self.occupancy, elapsed, policy.occupancy_period),
            ..*self
        }
    }
}

/// How fast remembered counts fade, in ticks per unit lost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecayPolicy {
    pub food_period: u32,
    pub occupancy_period: u32,
}

impl Default for DecayPolicy {
    fn default() -> Self {
        Self {
            food_period: FOOD_DECAY_PERIOD,
            occupancy_period: OCCUPANCY_DECAY_PERIOD,
        }
    }
}

impl DecayPolicy {
    fn fade(value: u32, elapsed: Tick, period: u32) -> u32 {
        value.saturating_sub(elapsed / period.max(1))
    }
}

/// A candidate step: the action and where it leads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub action: Action,
    pub position: Position,
}

/// How a cell is drawn in diagnostic maps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellGlyph {
    Home,
    Wall,
    Food(u32),
    Unknown,
    Empty,
}

impl fmt::Display for CellGlyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("AH"),
            Self::Wall => f.write_str("##"),
            Self::Food(food) => write!(f, "{:02}", (*food).min(99)),
            Self::Unknown => f.write_str("??"),
            Self::Empty => f.write_str("  "),
        }
    }
}

/// A square, growable grid of [`CellBelief`]s anchored on the anthill.
///
/// World position `(x, y)` lives at array column `x + center_x` and row
/// `y + center_y`. The grid doubles its side whenever a write lands outside
/// it, moving the anchor to the new midpoint; recorded cells keep their world
/// coordinates. It never shrinks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeliefGrid {
    cells: Vec<CellBelief>,
    side: usize,
    center_x: i32,
    center_y: i32,
    decay: DecayPolicy,
}

impl Default for BeliefGrid {
    fn default() -> Self {
        Self::new(INITIAL_GRID_SIZE)
    }
}

impl BeliefGrid {
    /// Creates an all-unknown grid of the given side (at least 1).
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self::with_decay(size, DecayPolicy::default())
    }

    /// Creates an all-unknown grid with a custom decay policy.
    #[must_use]
    pub fn with_decay(size: usize, decay: DecayPolicy) -> Self {
        let side = size.max(1);
        let center = (side / 2) as i32;
        Self {
            cells: vec![CellBelief::UNKNOWN; side * side],
            side,
            center_x: center,
            center_y: center,
            decay,
        }
    }

    /// Reassembles a grid from decoded parts. Callers guarantee
    /// `cells.len() == side * side` and an in-bounds anchor.
    ///
    /// The decay policy is not part of the wire format; decoded grids start
    /// with [`DecayPolicy::default`].
    pub(crate) fn from_parts(
        side: usize,
        center_x: i32,
        center_y: i32,
        cells: Vec<CellBelief>,
    ) -> Self {
        debug_assert_eq!(cells.len(), side * side);
        Self {
            cells,
            side,
            center_x,
            center_y,
            decay: DecayPolicy::default(),
        }
    }

    /// Side length of the backing array.
    #[must_use]
    pub const fn side(&self) -> usize {
        self.side
    }

    /// Array indices of the anthill.
    #[must_use]
    pub const fn center(&self) -> (i32, i32) {
        (self.center_x, self.center_y)
    }

    /// The decay policy applied on read.
    #[must_use]
    pub const fn decay(&self) -> DecayPolicy {
        self.decay
    }

    /// Replaces the decay policy, leaving stored observations untouched.
    pub fn set_decay(&mut self, decay: DecayPolicy) {
        self.decay = decay;
    }

    /// Raw cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellBelief] {
        &self.cells
    }

    /// Converts a world position to an array index, if addressable.
    fn index_of(&self, position: Position) -> Option<usize> {
        let side = self.side as i64;
        let col = i64::from(position.x) + i64::from(self.center_x);
        let row = i64::from(position.y) + i64::from(self.center_y);
        if (0..side).contains(&col) && (0..side).contains(&row) {
            Some((row * side + col) as usize)
        } else {
            None
        }
    }

    /// Converts an array index back to a world position.
    fn position_of(&self, index: usize) -> Position {
        let col = (index % self.side) as i32;
        let row = (index / self.side) as i32;
        Position::new(col - self.center_x, row - self.center_y)
    }

    /// Returns true if `position` is inside the allocated grid.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.index_of(position).is_some()
    }

    /// Doubles the side and recenters, copying every cell to its new index.
    fn grow(&mut self) {
        let new_side = self.side * 2;
        let new_center = (new_side / 2) as i32;
        let shift_x = (new_center - self.center_x) as usize;
        let shift_y = (new_center - self.center_y) as usize;

        let mut cells = vec![CellBelief::UNKNOWN; new_side * new_side];
        for (row, old_row) in self.cells.chunks_exact(self.side).enumerate() {
            let start = (row + shift_y) * new_side + shift_x;
            cells[start..start + self.side].copy_from_slice(old_row);
        }

        trace!(from = self.side, to = new_side, "belief grid grown");
        self.cells = cells;
        self.side = new_side;
        self.center_x = new_center;
        self.center_y = new_center;
    }

    /// Grows until `position` is addressable and returns its index.
    fn ensure_contains(&mut self, position: Position) -> usize {
        loop {
            if let Some(index) = self.index_of(position) {
                return index;
            }
            self.grow();
        }
    }

    /// Records a direct observation of one cell.
    ///
    /// The wall flag is OR-ed with what is already known; food, occupancy and
    /// tick are overwritten. May reallocate the whole grid.
    pub fn update(&mut self, position: Position, wall: bool, food: u32, occupancy: u32, tick: Tick) {
        let index = self.ensure_contains(position);
        let cell = &mut self.cells[index];
        cell.wall |= wall;
        cell.food = food;
        cell.occupancy = occupancy;
        cell.last_seen = Some(tick);
    }

    /// Records a tile reported by the host.
    pub fn observe(&mut self, position: Position, tile: &Tile, tick: Tick) {
        self.update(position, !tile.travelable, tile.food, tile.ants, tick);
    }

    /// Returns the stored belief, or [`CellBelief::UNKNOWN`] if never written.
    #[must_use]
    pub fn query(&self, position: Position) -> CellBelief {
        self.index_of(position)
            .map_or(CellBelief::UNKNOWN, |index| self.cells[index])
    }

    /// Returns the belief with food and occupancy faded to tick `now`.
    #[must_use]
    pub fn estimate(&self, position: Position, now: Tick) -> CellBelief {
        self.query(position).decayed(now, self.decay)
    }

    /// Expected food at `position` as of tick `now`.
    #[must_use]
    pub fn food_at(&self, position: Position, now: Tick) -> u32 {
        self.estimate(position, now).food
    }

    /// Expected ant count at `position` as of tick `now`.
    #[must_use]
    pub fn occupancy_at(&self, position: Position, now: Tick) -> u32 {
        self.estimate(position, now).occupancy
    }

    /// Returns true if `position` is a known wall.
    #[must_use]
    pub fn is_wall(&self, position: Position) -> bool {
        self.query(position).wall
    }

    /// Returns true if any cardinal neighbour has never been observed.
    #[must_use]
    pub fn next_to_unknown(&self, position: Position) -> bool {
        position
            .neighbors()
            .iter()
            .any(|(_, neighbor)| !self.query(*neighbor).is_known())
    }

    /// Candidate moves from `position` in random order.
    ///
    /// Every neighbour that is not a known wall is offered, unknown ones
    /// included, and halting is always an option.
    pub fn possible_moves<R: Rng + ?Sized>(&self, position: Position, rng: &mut R) -> Vec<Move> {
        let mut moves: Vec<Move> = position
            .neighbors()
            .into_iter()
            .filter(|(_, neighbor)| !self.is_wall(*neighbor))
            .map(|(direction, neighbor)| Move {
                action: Action::Move(direction),
                position: neighbor,
            })
            .collect();
        moves.push(Move {
            action: Action::Halt,
            position,
        });
        moves.shuffle(rng);
        moves
    }

    /// Checks `action` against current knowledge.
    #[must_use]
    pub fn valid_move(&self, action: Action, position: Position, carrying_food: bool) -> bool {
        match action {
            Action::Move(direction) => !self.is_wall(position.step(direction)),
            Action::Gather => !carrying_food,
            Action::DropOff => carrying_food,
            Action::Halt => true,
        }
    }

    /// Shifts every recorded tick by `to - from`. Unknown cells stay unknown.
    ///
    /// Shifted ticks saturate into `0..=MAX_TICK`, so a backward shift past
    /// zero collapses the oldest observations onto tick 0.
    pub fn rebase_time(&mut self, from: Tick, to: Tick) {
        let delta = i64::from(to) - i64::from(from);
        if delta == 0 {
            return;
        }
        for cell in &mut self.cells {
            if let Some(seen) = cell.last_seen {
                cell.last_seen = Some(clamp_tick(i64::from(seen) + delta));
            }
        }
    }

    /// Folds a peer's grid into this one.
    ///
    /// Walls are OR-ed unconditionally. Food, occupancy and tick are taken from
    /// `other` only where its observation is strictly newer. Both grids must
    /// already share a clock (see [`BeliefGrid::rebase_time`]).
    pub fn merge_from(&mut self, other: &BeliefGrid) {
        for (position, theirs) in other.known_cells() {
            let index = self.ensure_contains(position);
            let ours = &mut self.cells[index];
            ours.wall |= theirs.wall;
            if theirs.last_seen > ours.last_seen {
                ours.food = theirs.food;
                ours.occupancy = theirs.occupancy;
                ours.last_seen = theirs.last_seen;
            }
        }
    }

    /// Iterates over every observed cell with its world position.
    pub fn known_cells(&self) -> impl Iterator<Item = (Position, CellBelief)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_known())
            .map(|(index, cell)| (self.position_of(index), *cell))
    }

    /// Returns the smallest box containing every observed cell.
    #[must_use]
    pub fn known_bounds(&self) -> Option<(Position, Position)> {
        self.known_cells().fold(None, |bounds, (p, _)| {
            Some(match bounds {
                None => (p, p),
                Some((min, max)) => (
                    Position::new(min.x.min(p.x), min.y.min(p.y)),
                    Position::new(max.x.max(p.x), max.y.max(p.y)),
                ),
            })
        })
    }

    /// How `position` is drawn in diagnostic maps.
    #[must_use]
    pub fn glyph(&self, position: Position) -> CellGlyph {
        let cell = self.query(position);
        if position == Position::HOME {
            CellGlyph::Home
        } else if cell.wall {
            CellGlyph::Wall
        } else if cell.food > 0 {
            CellGlyph::Food(cell.food)
        } else if !cell.is_known() {
            CellGlyph::Unknown
        } else {
            CellGlyph::Empty
        }
    }
}

/// Saturates a signed tick into `0..=MAX_TICK`.
fn clamp_tick(tick: i64) -> Tick {
    tick.clamp(0, i64::from(MAX_TICK)) as Tick
}

impl fmt::Display for BeliefGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((min, max)) = self.known_bounds() else {
            return Ok(());
        };
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                write!(f, "{}|", self.glyph(Position::new(x, y)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::host::Direction;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_grid_is_unknown_and_centered() {
        let grid = BeliefGrid::new(5);
        assert_eq!(grid.side(), 5);
        assert_eq!(grid.center(), (2, 2));
        assert_eq!(grid.query(Position::HOME), CellBelief::UNKNOWN);
        assert_eq!(grid.known_cells().count(), 0);
    }

    #[test]
    fn test_update_and_query() {
        let mut grid = BeliefGrid::new(5);
        grid.update(Position::new(1, -1), false, 4, 2, 7);
        let cell = grid.query(Position::new(1, -1));
        assert_eq!(cell.food, 4);
        assert_eq!(cell.occupancy, 2);
        assert_eq!(cell.last_seen, Some(7));
    }

    #[test]
    fn test_growth_recenters_and_keeps_cells() {
        let mut grid = BeliefGrid::new(5);
        grid.update(Position::new(-2, 2), true, 0, 0, 1);
        grid.update(Position::new(2, -2), false, 3, 0, 2);

        grid.update(Position::new(3, 0), false, 1, 0, 3);

        assert_eq!(grid.side(), 10);
        assert_eq!(grid.center(), (5, 5));
        assert!(grid.query(Position::new(-2, 2)).wall);
        assert_eq!(grid.query(Position::new(2, -2)).food, 3);
        assert_eq!(grid.query(Position::new(3, 0)).food, 1);
    }

    #[test]
    fn test_far_write_grows_repeatedly() {
        let mut grid = BeliefGrid::new(1);
        grid.update(Position::new(-40, 17), false, 1, 0, 0);
        assert!(grid.side() >= 64);
        assert_eq!(grid.query(Position::new(-40, 17)).food, 1);
    }

    #[test]
    fn test_walls_are_sticky() {
        let mut grid = BeliefGrid::new(5);
        grid.update(Position::new(1, 0), true, 0, 0, 0);
        grid.update(Position::new(1, 0), false, 0, 0, 5);
        assert!(grid.is_wall(Position::new(1, 0)));
        assert_eq!(grid.query(Position::new(1, 0)).last_seen, Some(5));
    }

    #[test]
    fn test_food_decays_slower_than_occupancy() {
        let mut grid = BeliefGrid::new(5);
        grid.update(Position::HOME, false, 3, 3, 0);

        let later = grid.estimate(Position::HOME, 10);
        assert_eq!(later.food, 3);
        assert_eq!(later.occupancy, 0);

        assert_eq!(grid.food_at(Position::HOME, 50), 1);
        assert_eq!(grid.food_at(Position::HOME, 1_000), 0);
    }

    #[test]
    fn test_unknown_cell_never_decays_into_data() {
        let grid = BeliefGrid::new(5);
        assert_eq!(grid.estimate(Position::new(1, 1), 100), CellBelief::UNKNOWN);
    }

    #[test]
    fn test_possible_moves_skip_known_walls() {
        let mut grid = BeliefGrid::new(5);
        grid.update(Position::HOME, false, 0, 0, 0);
        grid.update(Position::new(1, 0), true, 0, 0, 0);
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..20 {
            let moves = grid.possible_moves(Position::HOME, &mut rng);
            assert_eq!(moves.len(), 4);
            assert!(!moves
                .iter()
                .any(|m| m.action == Action::Move(Direction::East)));
            assert!(moves.iter().any(|m| m.action == Action::Halt));
        }
    }

    #[test]
    fn test_valid_move_rules() {
        let mut grid = BeliefGrid::new(5);
        grid.update(Position::new(0, -1), true, 0, 0, 0);
        let here = Position::HOME;
        assert!(!grid.valid_move(Action::Move(Direction::North), here, false));
        assert!(grid.valid_move(Action::Move(Direction::South), here, false));
        assert!(grid.valid_move(Action::Gather, here, false));
        assert!(!grid.valid_move(Action::Gather, here, true));
        assert!(grid.valid_move(Action::DropOff, here, true));
        assert!(!grid.valid_move(Action::DropOff, here, false));
        assert!(grid.valid_move(Action::Halt, here, true));
    }

    #[test]
    fn test_next_to_unknown() {
        let mut grid = BeliefGrid::new(5);
        for (_, p) in Position::HOME.neighbors() {
            grid.update(p, false, 0, 0, 0);
        }
        assert!(!grid.next_to_unknown(Position::HOME));
        assert!(grid.next_to_unknown(Position::new(1, 0)));
    }

    #[test]
    fn test_rebase_skips_unknown_cells() {
        let mut grid = BeliefGrid::new(5);
        grid.update(Position::HOME, false, 1, 0, 4);
        grid.rebase_time(4, 10);
        assert_eq!(grid.query(Position::HOME).last_seen, Some(10));
        assert_eq!(grid.query(Position::new(1, 1)).last_seen, None);
        assert_eq!(grid.known_cells().count(), 1);
    }

    #[test]
    fn test_rebase_saturates_at_both_ends() {
        let mut grid = BeliefGrid::new(5);
        grid.update(Position::HOME, false, 0, 0, 2);
        grid.update(Position::new(1, 0), false, 0, 0, 6);
        grid.rebase_time(10, 0);
        assert_eq!(grid.query(Position::HOME).last_seen, Some(0));
        assert_eq!(grid.query(Position::new(1, 0)).last_seen, Some(0));

        grid.rebase_time(0, Tick::MAX);
        assert_eq!(grid.query(Position::HOME).last_seen, Some(MAX_TICK));
    }

    #[test]
    fn test_merge_prefers_newer_and_keeps_walls() {
        let mut ours = BeliefGrid::new(5);
        ours.update(Position::new(1, 0), true, 0, 0, 9);
        ours.update(Position::new(0, 1), false, 5, 0, 9);

        let mut theirs = BeliefGrid::new(5);
        theirs.update(Position::new(1, 0), false, 2, 1, 12);
        theirs.update(Position::new(0, 1), false, 1, 0, 3);
        theirs.update(Position::new(9, 9), false, 7, 0, 3);

        ours.merge_from(&theirs);

        let wall = ours.query(Position::new(1, 0));
        assert!(wall.wall);
        assert_eq!(wall.food, 2);
        assert_eq!(wall.last_seen, Some(12));
        assert_eq!(ours.query(Position::new(0, 1)).food, 5);
        assert_eq!(ours.query(Position::new(9, 9)).food, 7);
    }

    #[test]
    fn test_display_marks_home_walls_and_food() {
        let mut grid = BeliefGrid::new(5);
        grid.update(Position::HOME, false, 0, 0, 0);
        grid.update(Position::new(1, 0), true, 0, 0, 0);
        grid.update(Position::new(2, 0), false, 7, 0, 0);
        assert_eq!(grid.to_string(), "AH|##|07|\n");
    }
}
