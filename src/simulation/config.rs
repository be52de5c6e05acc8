//! Runtime configuration for agents and the sandbox arena.
//!
//! Defaults mirror the constants in [`crate::simulation::params`]; every
//! field may be overridden from JSON, missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::simulation::error::ConfigError;
use crate::simulation::memory::DecayPolicy;
use crate::simulation::params::{
    ARENA_ANTS, ARENA_HOME_RADIUS, ARENA_SIZE, DELIVERY_BAND, FOOD_DECAY_PERIOD, FOOD_PATCHES,
    FOOD_PER_TILE, INITIAL_GRID_SIZE, INITIAL_RADIUS, OCCUPANCY_DECAY_PERIOD,
    RADIUS_GRACE_ACTIONS, RADIUS_SHRINK_INTERVAL, SCOUT_ACTIONS, WALL_DENSITY,
};

/// Tunables for a single foraging agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Side length of the agent's initial belief grid.
    pub initial_grid_size: usize,
    /// Length of the scouting window in actions; 0 starts as a gatherer.
    pub scout_actions: u32,
    /// Starting home radius.
    pub initial_radius: u32,
    /// Actions before the radius begins to shrink.
    pub radius_grace_actions: u32,
    /// Actions between radius decrements.
    pub radius_shrink_interval: u32,
    /// Half-width of the delivery corridor along each axis.
    pub delivery_band: u32,
    /// Ticks per unit of remembered food lost.
    pub food_decay_period: u32,
    /// Ticks per unit of remembered occupancy lost.
    pub occupancy_decay_period: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            initial_grid_size: INITIAL_GRID_SIZE,
            scout_actions: SCOUT_ACTIONS,
            initial_radius: INITIAL_RADIUS,
            radius_grace_actions: RADIUS_GRACE_ACTIONS,
            radius_shrink_interval: RADIUS_SHRINK_INTERVAL,
            delivery_band: DELIVERY_BAND,
            food_decay_period: FOOD_DECAY_PERIOD,
            occupancy_decay_period: OCCUPANCY_DECAY_PERIOD,
        }
    }
}

impl AgentConfig {
    /// Parses a configuration from JSON and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_grid_size == 0 {
            return Err(ConfigError::Invalid("initial_grid_size must be positive"));
        }
        if self.radius_shrink_interval == 0 {
            return Err(ConfigError::Invalid("radius_shrink_interval must be positive"));
        }
        if self.delivery_band == 0 {
            return Err(ConfigError::Invalid("delivery_band must be positive"));
        }
        if self.food_decay_period == 0 || self.occupancy_decay_period == 0 {
            return Err(ConfigError::Invalid("decay periods must be positive"));
        }
        Ok(())
    }

    /// The decay policy handed to the agent's belief grid.
    #[must_use]
    pub const fn decay_policy(&self) -> DecayPolicy {
        DecayPolicy {
            food_period: self.food_decay_period,
            occupancy_period: self.occupancy_decay_period,
        }
    }
}

/// Layout of the sandbox arena used by the demo and integration tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Side length of the arena, centered on the anthill.
    pub size: u32,
    /// Number of ants spawned at the anthill.
    pub ants: usize,
    /// Number of food patches.
    pub food_patches: usize,
    /// Food units per patch tile.
    pub food_per_tile: u32,
    /// Fraction of tiles turned into walls.
    pub wall_density: f64,
    /// Optional seed for a reproducible layout.
    pub rng_seed: Option<u64>,
    /// Configuration shared by every ant.
    pub agent: AgentConfig,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            size: ARENA_SIZE,
            ants: ARENA_ANTS,
            food_patches: FOOD_PATCHES,
            food_per_tile: FOOD_PER_TILE,
            wall_density: WALL_DENSITY,
            rng_seed: None,
            agent: AgentConfig {
                initial_radius: ARENA_HOME_RADIUS,
                ..AgentConfig::default()
            },
        }
    }
}

impl ArenaConfig {
    /// Parses a configuration from JSON and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size < 3 {
            return Err(ConfigError::Invalid("arena size must be at least 3"));
        }
        if !(0.0..1.0).contains(&self.wall_density) {
            return Err(ConfigError::Invalid("wall_density must be in [0, 1)"));
        }
        self.agent.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AgentConfig::default().validate().is_ok());
        assert!(ArenaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = AgentConfig::from_json_str(r#"{"scout_actions": 0}"#).unwrap();
        assert_eq!(config.scout_actions, 0);
        assert_eq!(config.initial_radius, INITIAL_RADIUS);
    }

    #[test]
    fn test_zero_decay_period_rejected() {
        let config = AgentConfig {
            food_decay_period: 0,
            ..AgentConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Invalid("decay periods must be positive"))
        );
    }

    #[test]
    fn test_malformed_json_reports_parse_error() {
        let err = AgentConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_arena_rejects_full_wall_density() {
        let config = ArenaConfig {
            wall_density: 1.0,
            ..ArenaConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
