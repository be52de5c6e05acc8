//! Value types shared with the host simulation.
//!
//! The host owns the world; the agent only ever sees these primitives:
//! positions relative to the anthill, compass directions, the handful of
//! actions it may emit, and the five tiles visible on each tick.

use std::fmt;

/// A compass direction on the grid. North is toward negative `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Returns all four directions in clockwise order starting at North.
    #[must_use]
    pub const fn all() -> [Direction; 4] {
        [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ]
    }

    /// Returns the `(dx, dy)` offset of one step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        };
        f.write_str(name)
    }
}

/// A grid position, expressed as an offset from the anthill at `(0, 0)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// The anthill.
    pub const HOME: Position = Position { x: 0, y: 0 };

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two positions.
    #[must_use]
    pub const fn manhattan_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The position one step away in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The four cardinal neighbours, paired with the direction that reaches them.
    #[must_use]
    pub fn neighbors(self) -> [(Direction, Position); 4] {
        Direction::all().map(|direction| (direction, self.step(direction)))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Actions the agent may emit, one per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Step one cell in a direction
    Move(Direction),
    /// Pick up one unit of food from the current tile
    Gather,
    /// Drop carried food on the current tile
    DropOff,
    /// Stay put
    Halt,
}

impl Action {
    /// Returns the direction of a movement action.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Move(direction) => Some(direction),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move(direction) => write!(f, "move {direction}"),
            Self::Gather => f.write_str("gather"),
            Self::DropOff => f.write_str("drop off"),
            Self::Halt => f.write_str("halt"),
        }
    }
}

/// What the host reports about a single visible tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub travelable: bool,
    pub food: u32,
    pub ants: u32,
}

impl Tile {
    /// An empty, passable tile.
    pub const OPEN: Tile = Tile {
        travelable: true,
        food: 0,
        ants: 0,
    };

    /// An impassable tile.
    pub const WALL: Tile = Tile {
        travelable: false,
        food: 0,
        ants: 0,
    };

    #[must_use]
    pub const fn with_food(food: u32) -> Self {
        Self {
            travelable: true,
            food,
            ants: 0,
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::OPEN
    }
}

/// The tiles an agent can see on one tick: its own and the four cardinal ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Surroundings {
    pub current: Tile,
    pub north: Tile,
    pub east: Tile,
    pub south: Tile,
    pub west: Tile,
}

impl Surroundings {
    /// Returns the tile seen in `direction`.
    #[must_use]
    pub const fn tile(&self, direction: Direction) -> &Tile {
        match direction {
            Direction::North => &self.north,
            Direction::East => &self.east,
            Direction::South => &self.south,
            Direction::West => &self.west,
        }
    }
}
