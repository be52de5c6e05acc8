use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};

use crate::simulation::config::AgentConfig;
use crate::simulation::error::AgentError;
use crate::simulation::host::{Action, Direction, Position, Surroundings};
use crate::simulation::memory::{decode_message, encode_message, BeliefGrid, Tick, MAX_TICK};
use crate::simulation::planning::{BfsPlanner, Plan, SearchGoal};

/// Top-level behavior of a foraging agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentMode {
    /// Mapping unexplored territory during the opening window
    Scout,
    /// Finding food and carrying it home
    Gatherer,
}

/// A foraging ant that maps its world and plans with breadth-first search.
///
/// Each tick the ant folds its five visible tiles into a [`BeliefGrid`],
/// decides what it is trying to do, replans when its current plan runs out,
/// and emits one action. Position and carrying state are tracked by the ant
/// itself, assuming every emitted action succeeds.
#[derive(Debug, Clone)]
pub struct ForagerAnt {
    config: AgentConfig,
    grid: BeliefGrid,
    planner: BfsPlanner,
    plan: Plan,
    rng: SmallRng,
    position: Position,
    carrying_food: bool,
    mode: AgentMode,
    radius: u32,
    tick: Tick,
    actions: u32,
    last_goal: Option<SearchGoal>,
}

impl Default for ForagerAnt {
    fn default() -> Self {
        Self::new(AgentConfig::default())
    }
}

impl ForagerAnt {
    /// Creates an ant at the anthill with an entropy-seeded random source.
    #[must_use]
    pub fn new(config: AgentConfig) -> Self {
        Self::with_rng(config, SmallRng::from_rng(&mut rand::rng()))
    }

    /// Creates an ant whose tie-breaking is reproducible.
    #[must_use]
    pub fn with_seed(config: AgentConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: AgentConfig, rng: SmallRng) -> Self {
        let grid = BeliefGrid::with_decay(config.initial_grid_size, config.decay_policy());
        let mode = if config.scout_actions > 0 {
            AgentMode::Scout
        } else {
            AgentMode::Gatherer
        };
        Self {
            radius: config.initial_radius,
            config,
            grid,
            planner: BfsPlanner::new(),
            plan: Plan::new(),
            rng,
            position: Position::HOME,
            carrying_food: false,
            mode,
            tick: 0,
            actions: 0,
            last_goal: None,
        }
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn carrying_food(&self) -> bool {
        self.carrying_food
    }

    #[must_use]
    pub const fn mode(&self) -> AgentMode {
        self.mode
    }

    /// Current home radius.
    #[must_use]
    pub const fn radius(&self) -> u32 {
        self.radius
    }

    /// Logical clock, possibly advanced by peers.
    #[must_use]
    pub const fn tick(&self) -> Tick {
        self.tick
    }

    /// Number of actions this ant has emitted itself.
    #[must_use]
    pub const fn actions(&self) -> u32 {
        self.actions
    }

    #[must_use]
    pub const fn grid(&self) -> &BeliefGrid {
        &self.grid
    }

    /// Remaining queued actions.
    #[must_use]
    pub const fn plan(&self) -> &Plan {
        &self.plan
    }

    /// The goal of the most recent search.
    #[must_use]
    pub const fn last_goal(&self) -> Option<SearchGoal> {
        self.last_goal
    }

    #[must_use]
    pub const fn planner(&self) -> &BfsPlanner {
        &self.planner
    }

    /// Runs one tick and returns the action to perform.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::PlanDivergence`] if the next queued step is
    /// illegal against the belief grid. The ant must not be driven further
    /// after that.
    pub fn next_action(&mut self, surroundings: &Surroundings) -> Result<Action, AgentError> {
        self.observe(surroundings);

        self.tick = self.tick.saturating_add(1).min(MAX_TICK);
        self.actions = self.actions.saturating_add(1);
        self.shrink_radius();

        let decided = match self.mode {
            AgentMode::Scout => self.scout_step(),
            AgentMode::Gatherer => self.gatherer_step(),
        };
        let action = decided.unwrap_or_else(|| self.plan.pop_front().unwrap_or(Action::Halt));

        if !self
            .grid
            .valid_move(action, self.position, self.carrying_food)
        {
            let snapshot = self.grid.to_string();
            error!(
                position = %self.position,
                %action,
                "plan attempted an invalid move\n{snapshot}"
            );
            return Err(AgentError::PlanDivergence {
                position: self.position,
                action,
                snapshot,
            });
        }

        self.apply(action);
        Ok(action)
    }

    /// Encodes this ant's clock and belief grid for a peer.
    #[must_use]
    pub fn send(&self) -> Vec<u8> {
        encode_message(self.tick, &self.grid)
    }

    /// Merges a peer's message into this ant's beliefs.
    ///
    /// The whole payload is decoded before anything changes. Clocks are
    /// aligned to the later of the two, the peer's grid is rebased onto the
    /// local clock and merged, and the current plan is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Codec`] for a malformed payload; the ant is left
    /// untouched.
    pub fn receive(&mut self, payload: &[u8]) -> Result<(), AgentError> {
        let (their_tick, mut theirs) = decode_message(payload).map_err(|err| {
            warn!(%err, "unable to receive peer map");
            AgentError::from(err)
        })?;

        if their_tick > self.tick {
            self.grid.rebase_time(self.tick, their_tick);
            self.tick = their_tick;
        }
        theirs.rebase_time(their_tick, self.tick);
        self.grid.merge_from(&theirs);
        self.plan.clear();

        debug!(
            their_tick,
            tick = self.tick,
            side = self.grid.side(),
            "merged peer map"
        );
        Ok(())
    }

    /// Records the current tile and its four neighbours.
    fn observe(&mut self, surroundings: &Surroundings) {
        let here = self.position;
        self.grid.observe(here, &surroundings.current, self.tick);
        for direction in Direction::all() {
            self.grid
                .observe(here.step(direction), surroundings.tile(direction), self.tick);
        }
    }

    /// After the grace period, lose one unit of radius every interval.
    fn shrink_radius(&mut self) {
        let interval = self.config.radius_shrink_interval.max(1);
        if self.actions > self.config.radius_grace_actions
            && self.radius > 0
            && self.actions % interval == 0
        {
            self.radius -= 1;
        }
    }

    fn scout_step(&mut self) -> Option<Action> {
        if self.actions >= self.config.scout_actions {
            self.become_gatherer();
            return self.gatherer_step();
        }
        if self.plan.is_empty() {
            match self.search(SearchGoal::Unknown) {
                Some(plan) => self.plan = plan,
                None => {
                    self.become_gatherer();
                    return self.gatherer_step();
                }
            }
        }
        None
    }

    fn become_gatherer(&mut self) {
        info!(actions = self.actions, "scout turning gatherer");
        self.mode = AgentMode::Gatherer;
        self.plan = self.search(self.discovery_goal()).unwrap_or_default();
    }

    fn gatherer_step(&mut self) -> Option<Action> {
        let from_home = Position::HOME.manhattan_distance(self.position);

        if !self.carrying_food
            && self.grid.food_at(self.position, self.tick) > 0
            && from_home > self.radius
        {
            self.plan = self.search(self.delivery_goal()).unwrap_or_default();
            return Some(Action::Gather);
        }

        if self.carrying_food && from_home <= self.radius {
            self.plan = self.search(self.discovery_goal()).unwrap_or_default();
            return Some(Action::DropOff);
        }

        if self.plan.is_empty() {
            self.replan();
        }
        None
    }

    /// Plans for the carrying state, falling back to exploration, then to
    /// ever smaller radii. Leaves the plan empty if nothing works.
    fn replan(&mut self) {
        let mut plan = self
            .search(self.carrying_goal())
            .filter(|plan| !plan.is_empty())
            .or_else(|| self.search(SearchGoal::Unknown));

        while plan.is_none() && self.radius > 0 {
            self.radius -= 1;
            plan = self.search(self.carrying_goal());
        }

        if plan.is_none() {
            debug!(position = %self.position, "no plan found, halting");
        }
        self.plan = plan.unwrap_or_default();
    }

    fn search(&mut self, goal: SearchGoal) -> Option<Plan> {
        self.last_goal = Some(goal);
        self.planner
            .plan(&self.grid, self.position, goal, self.tick, &mut self.rng)
    }

    const fn discovery_goal(&self) -> SearchGoal {
        SearchGoal::FindFood {
            radius: self.radius,
        }
    }

    const fn delivery_goal(&self) -> SearchGoal {
        SearchGoal::DeliverFood {
            radius: self.radius,
            band: self.config.delivery_band,
        }
    }

    const fn carrying_goal(&self) -> SearchGoal {
        if self.carrying_food {
            self.delivery_goal()
        } else {
            self.discovery_goal()
        }
    }

    /// Updates position and carrying state for an emitted action.
    fn apply(&mut self, action: Action) {
        match action {
            Action::Move(direction) => self.position = self.position.step(direction),
            Action::Gather => self.carrying_food = true,
            Action::DropOff => self.carrying_food = false,
            Action::Halt => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::host::Tile;

    fn gatherer_config() -> AgentConfig {
        AgentConfig {
            scout_actions: 0,
            ..AgentConfig::default()
        }
    }

    #[test]
    fn test_zero_scout_window_starts_gatherer() {
        let ant = ForagerAnt::with_seed(gatherer_config(), 1);
        assert_eq!(ant.mode(), AgentMode::Gatherer);
        assert_eq!(ant.radius(), gatherer_config().initial_radius);
    }

    #[test]
    fn test_radius_shrinks_after_grace_period() {
        let config = AgentConfig {
            scout_actions: 0,
            initial_radius: 10,
            radius_grace_actions: 30,
            radius_shrink_interval: 10,
            ..AgentConfig::default()
        };
        let mut ant = ForagerAnt::with_seed(config, 2);
        for _ in 0..30 {
            ant.shrink_radius_for_test();
        }
        assert_eq!(ant.radius(), 10);
        for _ in 0..10 {
            ant.shrink_radius_for_test();
        }
        assert_eq!(ant.radius(), 9);
        for _ in 0..200 {
            ant.shrink_radius_for_test();
        }
        assert_eq!(ant.radius(), 0);
    }

    #[test]
    fn test_observe_records_five_cells() {
        let mut ant = ForagerAnt::with_seed(gatherer_config(), 3);
        let s = Surroundings {
            north: Tile::WALL,
            east: Tile::with_food(2),
            ..Surroundings::default()
        };
        ant.observe(&s);
        assert_eq!(ant.grid().known_cells().count(), 5);
        assert!(ant.grid().is_wall(Position::new(0, -1)));
        assert_eq!(ant.grid().query(Position::new(1, 0)).food, 2);
    }

    impl ForagerAnt {
        fn shrink_radius_for_test(&mut self) {
            self.actions += 1;
            self.shrink_radius();
        }
    }
}
