pub mod field;
pub mod render;

use crate::simulation::environment::Arena;

/// Summary line shown above the panes.
#[must_use]
pub fn hud_line(arena: &Arena, halted: Option<&str>) -> String {
    let Some(first) = arena.ants.first() else {
        return format!("Tick: {} | no ants", arena.tick);
    };
    let ant = &first.agent;
    let goal = ant.last_goal().map_or("-", |goal| goal.name());
    let mut line = format!(
        "Tick: {} | Delivered: {} | Food left: {} | Ant 0: {:?} {} r={} goal={} plan={}",
        arena.tick,
        arena.delivered,
        arena.food_remaining(),
        ant.mode(),
        if ant.carrying_food() { "carrying" } else { "empty" },
        ant.radius(),
        goal,
        ant.plan().len(),
    );
    if let Some(reason) = halted {
        line.push_str(" | HALTED: ");
        line.push_str(reason);
    }
    line
}
