//! Planning systems for the foraging agent.
//!
//! This module provides:
//! - Goal tests for finding food, delivering it and exploring
//! - Breadth-first search producing shortest action plans

mod bfs;
mod goal;

pub use bfs::{BfsPlanner, Plan, SearchReport};
pub use goal::SearchGoal;
