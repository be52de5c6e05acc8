//! Goal tests that parameterize the breadth-first search.

use crate::simulation::host::Position;
use crate::simulation::memory::{BeliefGrid, Tick};

/// What a search is looking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchGoal {
    /// A cell believed to hold food, farther than `radius` from home
    FindFood { radius: u32 },
    /// A cell within `radius` of home and within `band` of either axis
    DeliverFood { radius: u32, band: u32 },
    /// A cell bordering unobserved territory
    Unknown,
}

impl SearchGoal {
    /// Returns true if `position` satisfies the goal at tick `now`.
    #[must_use]
    pub fn is_goal(&self, grid: &BeliefGrid, position: Position, now: Tick) -> bool {
        match *self {
            Self::FindFood { radius } => {
                grid.food_at(position, now) > 0
                    && Position::HOME.manhattan_distance(position) > radius
            }
            Self::DeliverFood { radius, band } => {
                Position::HOME.manhattan_distance(position) <= radius
                    && (position.x.unsigned_abs() < band || position.y.unsigned_abs() < band)
            }
            Self::Unknown => grid.next_to_unknown(position),
        }
    }

    /// Short label used in logs and the HUD.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FindFood { .. } => "find food",
            Self::DeliverFood { .. } => "deliver food",
            Self::Unknown => "the unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_food_ignores_home_zone() {
        let mut grid = BeliefGrid::new(9);
        grid.update(Position::new(1, 0), false, 5, 0, 0);
        grid.update(Position::new(3, 1), false, 5, 0, 0);
        let goal = SearchGoal::FindFood { radius: 2 };
        assert!(!goal.is_goal(&grid, Position::new(1, 0), 0));
        assert!(goal.is_goal(&grid, Position::new(3, 1), 0));
        assert!(!goal.is_goal(&grid, Position::new(3, 2), 0));
    }

    #[test]
    fn test_find_food_respects_decay() {
        let mut grid = BeliefGrid::new(9);
        grid.update(Position::new(3, 0), false, 1, 0, 0);
        let goal = SearchGoal::FindFood { radius: 0 };
        assert!(goal.is_goal(&grid, Position::new(3, 0), 10));
        assert!(!goal.is_goal(&grid, Position::new(3, 0), 500));
    }

    #[test]
    fn test_deliver_food_needs_radius_and_corridor() {
        let grid = BeliefGrid::new(5);
        let goal = SearchGoal::DeliverFood { radius: 10, band: 2 };
        assert!(goal.is_goal(&grid, Position::new(8, 1), 0));
        assert!(goal.is_goal(&grid, Position::new(-1, -7), 0));
        assert!(!goal.is_goal(&grid, Position::new(4, 4), 0));
        assert!(!goal.is_goal(&grid, Position::new(11, 0), 0));
    }

    #[test]
    fn test_unknown_goal_tracks_frontier() {
        let mut grid = BeliefGrid::new(5);
        grid.update(Position::HOME, false, 0, 0, 0);
        assert!(SearchGoal::Unknown.is_goal(&grid, Position::HOME, 0));
        for (_, p) in Position::HOME.neighbors() {
            grid.update(p, false, 0, 0, 0);
        }
        assert!(!SearchGoal::Unknown.is_goal(&grid, Position::HOME, 0));
    }

    #[test]
    fn test_names() {
        assert_eq!(SearchGoal::Unknown.name(), "the unknown");
        assert_eq!(SearchGoal::FindFood { radius: 1 }.name(), "find food");
        assert_eq!(
            SearchGoal::DeliverFood { radius: 1, band: 1 }.name(),
            "deliver food"
        );
    }
}
