//! Spatial memory for the foraging agent.
//!
//! This module provides:
//! - The growable belief grid with decay-on-read estimates
//! - The binary codec used to exchange grids between agents

pub mod belief_grid;
pub mod codec;

pub use belief_grid::{BeliefGrid, CellBelief, CellGlyph, DecayPolicy, Move, Tick, MAX_TICK};
pub use codec::{decode_message, encode_message, WireReader, WireWriter};
