use forager_rust::simulation::config::ArenaConfig;
use forager_rust::simulation::environment::Arena;
use forager_rust::simulation::host::{Position, Tile};
use forager_rust::simulation::memory::BeliefGrid;
use forager_rust::ui::field::{
    compute_arena_grid, compute_belief_grid, viewport_to_world, ANT, HOME, SEEN, UNSEEN, WALL,
};
use forager_rust::ui::hud_line;

fn char_at(lines: &[String], position: Position, rows: usize, cols: usize) -> char {
    let row = (position.y + (rows / 2) as i32) as usize;
    let col = (position.x + (cols / 2) as i32) as usize;
    lines[row].chars().nth(col).unwrap()
}

#[test]
fn test_viewport_is_centered_on_home() {
    assert_eq!(viewport_to_world(5, 10, 11, 21), Position::HOME);
    assert_eq!(viewport_to_world(0, 0, 11, 21), Position::new(-10, -5));
}

#[test]
fn test_belief_grid_computation() {
    let mut grid = BeliefGrid::new(5);
    grid.update(Position::HOME, false, 0, 0, 0);
    grid.update(Position::new(1, 0), true, 0, 0, 0);
    grid.update(Position::new(-1, 0), false, 12, 0, 0);
    grid.update(Position::new(0, 1), false, 0, 0, 0);
    let (rows, cols) = (9, 15);

    let lines = compute_belief_grid(&grid, Position::new(0, -1), 0, rows, cols);

    assert_eq!(lines.len(), rows);
    assert!(lines.iter().all(|line| line.chars().count() == cols));
    assert_eq!(char_at(&lines, Position::HOME, rows, cols), HOME);
    assert_eq!(char_at(&lines, Position::new(0, -1), rows, cols), ANT);
    assert_eq!(char_at(&lines, Position::new(1, 0), rows, cols), WALL);
    assert_eq!(char_at(&lines, Position::new(-1, 0), rows, cols), '9');
    assert_eq!(char_at(&lines, Position::new(0, 1), rows, cols), SEEN);
    assert_eq!(char_at(&lines, Position::new(3, 3), rows, cols), UNSEEN);
}

#[test]
fn test_belief_grid_shows_faded_food() {
    let mut grid = BeliefGrid::new(5);
    grid.update(Position::new(2, 0), false, 3, 0, 0);
    let lines = compute_belief_grid(&grid, Position::HOME, 50, 5, 5);
    assert_eq!(char_at(&lines, Position::new(2, 0), 5, 5), '1');
}

#[test]
fn test_arena_grid_computation() {
    let mut arena = Arena::new(ArenaConfig {
        size: 7,
        ants: 1,
        food_patches: 0,
        rng_seed: Some(2),
        ..ArenaConfig::default()
    });
    arena.set_tile(Position::new(2, 0), Tile::WALL);
    arena.set_tile(Position::new(0, 2), Tile::with_food(4));
    let (rows, cols) = (11, 11);

    let lines = compute_arena_grid(&arena, rows, cols);

    assert_eq!(lines.len(), rows);
    assert_eq!(char_at(&lines, Position::HOME, rows, cols), ANT);
    assert_eq!(char_at(&lines, Position::new(2, 0), rows, cols), WALL);
    assert_eq!(char_at(&lines, Position::new(0, 2), rows, cols), '4');
    assert_eq!(char_at(&lines, Position::new(1, 1), rows, cols), SEEN);
    assert_eq!(char_at(&lines, Position::new(5, 5), rows, cols), UNSEEN);
}

#[test]
fn test_empty_viewport() {
    let arena = Arena::new(ArenaConfig::default());
    assert!(compute_arena_grid(&arena, 0, 10).is_empty());
    assert!(compute_belief_grid(&BeliefGrid::default(), Position::HOME, 0, 10, 0).is_empty());
}

#[test]
fn test_hud_reports_halt_reason() {
    let arena = Arena::new(ArenaConfig::default());
    let line = hud_line(&arena, Some("stuck"));
    assert!(line.starts_with("Tick: 0"));
    assert!(line.ends_with("HALTED: stuck"));
    assert!(!hud_line(&arena, None).contains("HALTED"));
}
