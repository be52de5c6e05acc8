//! Agent and sandbox hyperparameters.

// === Belief Grid Parameters ===
/// Side length of a freshly created belief grid
pub const INITIAL_GRID_SIZE: usize = 5;
/// Ticks for a remembered food count to lose one unit
pub const FOOD_DECAY_PERIOD: u32 = 25;
/// Ticks for a remembered ant count to lose one unit
pub const OCCUPANCY_DECAY_PERIOD: u32 = 2;

// === Agent Behavior Parameters ===
/// Actions spent scouting before the agent turns gatherer
pub const SCOUT_ACTIONS: u32 = 20;
/// Initial home radius used by the food goals
pub const INITIAL_RADIUS: u32 = 40;
/// Actions before the home radius starts shrinking
pub const RADIUS_GRACE_ACTIONS: u32 = 30;
/// The radius shrinks by one every this many actions after the grace period
pub const RADIUS_SHRINK_INTERVAL: u32 = 10;
/// Half-width of the corridor along each axis accepted for delivery
pub const DELIVERY_BAND: u32 = 5;

// === Sandbox Parameters ===
/// Side length of the demo arena, centered on the anthill
pub const ARENA_SIZE: u32 = 41;
/// Number of ants in the demo arena
pub const ARENA_ANTS: usize = 4;
/// Number of food patches scattered in the arena
pub const FOOD_PATCHES: usize = 6;
/// Food units placed on each patch tile
pub const FOOD_PER_TILE: u32 = 9;
/// Fraction of arena tiles that are walls
pub const WALL_DENSITY: f64 = 0.0;
/// Home radius given to arena ants, small enough that the patches count as food
pub const ARENA_HOME_RADIUS: u32 = 6;
