//! Error types for the belief grid codec, the agent and its configuration.

use thiserror::Error;

use crate::simulation::host::{Action, Position};

/// Reasons a peer payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The payload ended before a field could be read.
    #[error("payload truncated: needed {needed} bytes but only {remaining} remain")]
    Truncated { needed: usize, remaining: usize },
    /// Grids always have at least one cell.
    #[error("grid side length must be positive")]
    EmptyGrid,
    /// The side length cannot be represented as a cell count on this platform.
    #[error("grid side length {0} is too large")]
    OversizedGrid(u32),
    /// The anchor must map home to a cell inside the grid.
    #[error("anchor ({x}, {y}) lies outside a grid of side {side}")]
    AnchorOutOfBounds { x: i32, y: i32, side: u32 },
    /// Walls are encoded as 0 or 1.
    #[error("cell {index}: invalid wall flag {value}")]
    InvalidWallFlag { index: usize, value: u8 },
    /// Ticks are either -1 (never seen) or a non-negative 32-bit count.
    #[error("cell {index}: invalid last-seen tick {value}")]
    InvalidTick { index: usize, value: i64 },
    /// A never-observed cell must not carry wall, food or occupancy data.
    #[error("cell {index}: unobserved cell carries data")]
    PhantomCell { index: usize },
    /// The sender's clock is out of range.
    #[error("invalid sender tick {0}")]
    InvalidSenderTick(i64),
    /// Bytes were left over after the payload was fully read.
    #[error("{0} trailing bytes after payload")]
    TrailingBytes(usize),
}

/// Failures surfaced by the agent control loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    /// A queued plan step is illegal against the grid it was planned on.
    /// The agent is in an inconsistent state and must not be driven further.
    #[error("plan diverged from belief grid at {position}: cannot {action}\n{snapshot}")]
    PlanDivergence {
        position: Position,
        action: Action,
        snapshot: String,
    },
    /// A peer payload could not be decoded; local state is unchanged.
    #[error("rejected peer payload: {0}")]
    Codec(#[from] CodecError),
}

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
    #[error("malformed configuration: {0}")]
    Parse(String),
}
