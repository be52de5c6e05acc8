use crate::simulation::environment::Arena;
use crate::simulation::host::Position;
use crate::simulation::memory::{BeliefGrid, Tick};
use rayon::prelude::*;

/// Glyphs used by both panes.
pub const HOME: char = 'H';
pub const WALL: char = '#';
pub const ANT: char = '@';
pub const SEEN: char = '.';
pub const UNSEEN: char = ' ';

/// Maps a food count to a single digit, saturating at 9.
fn food_char(food: u32) -> char {
    char::from_digit(food.min(9), 10).unwrap_or('9')
}

/// World position drawn at `(row, col)` of a viewport centered on the anthill.
#[must_use]
pub fn viewport_to_world(row: usize, col: usize, rows: usize, cols: usize) -> Position {
    Position::new(col as i32 - (cols / 2) as i32, row as i32 - (rows / 2) as i32)
}

/// Renders an ant's belief grid, with food faded to tick `now`.
#[must_use]
pub fn compute_belief_grid(
    grid: &BeliefGrid,
    ant: Position,
    now: Tick,
    rows: usize,
    cols: usize,
) -> Vec<String> {
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    // Use rayon to compute rows in parallel
    (0..rows)
        .into_par_iter()
        .map(|r| {
            (0..cols)
                .map(|c| {
                    let position = viewport_to_world(r, c, rows, cols);
                    let cell = grid.estimate(position, now);
                    if position == ant {
                        ANT
                    } else if position == Position::HOME {
                        HOME
                    } else if cell.wall {
                        WALL
                    } else if !cell.is_known() {
                        UNSEEN
                    } else if cell.food > 0 {
                        food_char(cell.food)
                    } else {
                        SEEN
                    }
                })
                .collect()
        })
        .collect()
}

/// Renders the true state of the arena.
#[must_use]
pub fn compute_arena_grid(arena: &Arena, rows: usize, cols: usize) -> Vec<String> {
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    let half = arena.half();
    (0..rows)
        .into_par_iter()
        .map(|r| {
            (0..cols)
                .map(|c| {
                    let position = viewport_to_world(r, c, rows, cols);
                    let tile = arena.terrain(position);
                    if arena.ants.iter().any(|ant| ant.position == position) {
                        ANT
                    } else if position == Position::HOME {
                        HOME
                    } else if !tile.travelable {
                        WALL
                    } else if tile.food > 0 {
                        food_char(tile.food)
                    } else if position.x.abs() <= half && position.y.abs() <= half {
                        SEEN
                    } else {
                        UNSEEN
                    }
                })
                .collect()
        })
        .collect()
}
