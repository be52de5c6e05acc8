//! Sandbox host used by the demo and the integration tests.
//!
//! A square arena centered on the anthill with scattered food patches and
//! optional walls. Tiles outside the arena are open, empty ground. The arena
//! feeds each ant its surroundings, applies the returned actions and lets ants
//! standing on the same tile swap maps.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::simulation::agent::ForagerAnt;
use crate::simulation::config::ArenaConfig;
use crate::simulation::error::AgentError;
use crate::simulation::host::{Action, Direction, Position, Surroundings, Tile};

/// The host's view of one ant.
#[derive(Debug, Clone)]
pub struct ArenaAnt {
    pub agent: ForagerAnt,
    pub position: Position,
    pub carrying_food: bool,
}

/// A static tile world that drives a group of [`ForagerAnt`]s.
#[derive(Debug, Clone)]
pub struct Arena {
    pub config: ArenaConfig,
    pub ants: Vec<ArenaAnt>,
    /// Food units dropped off by ants so far
    pub delivered: u32,
    /// Ticks run so far
    pub tick: u64,
    tiles: Vec<Tile>,
    half: i32,
}

impl Arena {
    /// Lays out a new arena and spawns its ants at the anthill.
    #[must_use]
    pub fn new(config: ArenaConfig) -> Self {
        let mut rng = config
            .rng_seed
            .map_or_else(|| SmallRng::from_rng(&mut rand::rng()), SmallRng::seed_from_u64);

        let half = (config.size / 2) as i32;
        let side = config.size as usize;
        let mut arena = Self {
            ants: Vec::with_capacity(config.ants),
            delivered: 0,
            tick: 0,
            tiles: vec![Tile::OPEN; side * side],
            half,
            config,
        };
        arena.scatter_walls(&mut rng);
        arena.scatter_food(&mut rng);

        for _ in 0..arena.config.ants {
            let agent = ForagerAnt::with_seed(arena.config.agent.clone(), rng.random());
            arena.ants.push(ArenaAnt {
                agent,
                position: Position::HOME,
                carrying_food: false,
            });
        }
        arena
    }

    fn index_of(&self, position: Position) -> Option<usize> {
        let side = self.config.size as i32;
        let col = position.x + self.half;
        let row = position.y + self.half;
        if (0..side).contains(&col) && (0..side).contains(&row) {
            Some((row * side + col) as usize)
        } else {
            None
        }
    }

    /// Half the arena side; the arena spans `-half..=half` on both axes.
    #[must_use]
    pub const fn half(&self) -> i32 {
        self.half
    }

    /// Replaces the tile at `position`. Ignored outside the arena.
    pub fn set_tile(&mut self, position: Position, tile: Tile) {
        if let Some(index) = self.index_of(position) {
            self.tiles[index] = tile;
        }
    }

    /// The terrain at `position`, without ant counts.
    #[must_use]
    pub fn terrain(&self, position: Position) -> Tile {
        self.index_of(position)
            .map_or(Tile::OPEN, |index| self.tiles[index])
    }

    /// The tile at `position` as seen by the ant with index `viewer`.
    #[must_use]
    pub fn tile_for(&self, position: Position, viewer: usize) -> Tile {
        let ants = self
            .ants
            .iter()
            .enumerate()
            .filter(|(i, ant)| *i != viewer && ant.position == position)
            .count() as u32;
        Tile {
            ants,
            ..self.terrain(position)
        }
    }

    /// The five tiles visible to the ant with index `viewer`.
    #[must_use]
    pub fn surroundings(&self, viewer: usize) -> Surroundings {
        let here = self.ants[viewer].position;
        Surroundings {
            current: self.tile_for(here, viewer),
            north: self.tile_for(here.step(Direction::North), viewer),
            east: self.tile_for(here.step(Direction::East), viewer),
            south: self.tile_for(here.step(Direction::South), viewer),
            west: self.tile_for(here.step(Direction::West), viewer),
        }
    }

    /// Total food left on the ground.
    #[must_use]
    pub fn food_remaining(&self) -> u32 {
        self.tiles.iter().map(|tile| tile.food).sum()
    }

    /// Advances every ant by one action, then lets co-located ants talk.
    ///
    /// # Errors
    ///
    /// Propagates the first [`AgentError::PlanDivergence`] raised by an ant.
    pub fn step(&mut self) -> Result<(), AgentError> {
        for index in 0..self.ants.len() {
            let surroundings = self.surroundings(index);
            let action = self.ants[index].agent.next_action(&surroundings)?;
            self.apply(index, action);
        }
        self.exchange_maps();
        self.tick += 1;
        Ok(())
    }

    fn apply(&mut self, index: usize, action: Action) {
        let position = self.ants[index].position;
        match action {
            Action::Move(direction) => {
                let target = position.step(direction);
                if self.terrain(target).travelable {
                    self.ants[index].position = target;
                }
            }
            Action::Gather => {
                if let Some(tile_index) = self.index_of(position) {
                    let tile = &mut self.tiles[tile_index];
                    if tile.food > 0 && !self.ants[index].carrying_food {
                        tile.food -= 1;
                        self.ants[index].carrying_food = true;
                    }
                }
            }
            Action::DropOff => {
                if self.ants[index].carrying_food {
                    self.ants[index].carrying_food = false;
                    self.delivered += 1;
                }
            }
            Action::Halt => {}
        }
    }

    fn exchange_maps(&mut self) {
        for a in 0..self.ants.len() {
            for b in a + 1..self.ants.len() {
                if self.ants[a].position != self.ants[b].position {
                    continue;
                }
                let from_a = self.ants[a].agent.send();
                let from_b = self.ants[b].agent.send();
                if let Err(err) = self.ants[a].agent.receive(&from_b) {
                    warn!(%err, ant = a, "map exchange failed");
                }
                if let Err(err) = self.ants[b].agent.receive(&from_a) {
                    warn!(%err, ant = b, "map exchange failed");
                }
            }
        }
    }

    fn scatter_walls(&mut self, rng: &mut impl Rng) {
        if self.config.wall_density <= 0.0 {
            return;
        }
        for y in -self.half..=self.half {
            for x in -self.half..=self.half {
                let position = Position::new(x, y);
                if position.manhattan_distance(Position::HOME) <= 1 {
                    continue;
                }
                if rng.random_bool(self.config.wall_density) {
                    self.set_tile(position, Tile::WALL);
                }
            }
        }
    }

    fn scatter_food(&mut self, rng: &mut impl Rng) {
        let food = self.config.food_per_tile;
        for _ in 0..self.config.food_patches {
            let center = Position::new(
                rng.random_range(-self.half..=self.half),
                rng.random_range(-self.half..=self.half),
            );
            for position in std::iter::once(center).chain(center.neighbors().map(|(_, p)| p)) {
                if position != Position::HOME && self.terrain(position).travelable {
                    self.set_tile(position, Tile::with_food(food));
                }
            }
        }
    }
}
