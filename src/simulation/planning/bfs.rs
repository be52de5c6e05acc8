//! Breadth-first path planning over the belief grid.
//!
//! Nodes are grid positions, edges are the moves the grid allows. Unknown
//! cells are traversable, so the search is bounded by the grid's allocated
//! extent rather than by what has been observed.

use std::collections::{HashSet, VecDeque};

use rand::Rng;
use tracing::debug;

use crate::simulation::host::{Action, Position};
use crate::simulation::memory::{BeliefGrid, Tick};
use crate::simulation::planning::SearchGoal;

/// A queue of actions, consumed front first.
pub type Plan = VecDeque<Action>;

/// Summary of the most recent search, for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchReport {
    /// The goal searched for
    pub goal: SearchGoal,
    /// Positions expanded before the search ended
    pub expanded: usize,
    /// Length of the plan found, `None` if there was no path
    pub plan_len: Option<usize>,
}

/// A reached position and the step that led to it.
struct Node {
    position: Position,
    parent: Option<(usize, Action)>,
}

/// Breadth-first planner.
#[derive(Clone, Debug, Default)]
pub struct BfsPlanner {
    last_report: Option<SearchReport>,
}

impl BfsPlanner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the report of the last search, if any.
    #[must_use]
    pub const fn last_report(&self) -> Option<SearchReport> {
        self.last_report
    }

    /// Finds the shortest plan from `start` to the nearest cell satisfying `goal`.
    ///
    /// Returns `Some(empty)` if `start` already satisfies the goal and `None`
    /// if no reachable cell does. Among equally short plans the one returned
    /// depends on `rng`, which shuffles each node's successors.
    pub fn plan<R: Rng + ?Sized>(
        &mut self,
        grid: &BeliefGrid,
        start: Position,
        goal: SearchGoal,
        now: Tick,
        rng: &mut R,
    ) -> Option<Plan> {
        let mut nodes = vec![Node {
            position: start,
            parent: None,
        }];
        let mut frontier = VecDeque::from([0]);
        let mut closed: HashSet<Position> = HashSet::new();
        let mut found = None;

        while let Some(id) = frontier.pop_front() {
            let position = nodes[id].position;
            if !closed.insert(position) {
                continue;
            }
            if goal.is_goal(grid, position, now) {
                found = Some(id);
                break;
            }
            for successor in grid.possible_moves(position, rng) {
                if closed.contains(&successor.position) || !grid.contains(successor.position) {
                    continue;
                }
                nodes.push(Node {
                    position: successor.position,
                    parent: Some((id, successor.action)),
                });
                frontier.push_back(nodes.len() - 1);
            }
        }

        let plan = found.map(|id| reconstruct(&nodes, id));
        let report = SearchReport {
            goal,
            expanded: closed.len(),
            plan_len: plan.as_ref().map(VecDeque::len),
        };
        debug!(
            goal = goal.name(),
            %start,
            expanded = report.expanded,
            plan_len = ?report.plan_len,
            "search finished"
        );
        self.last_report = Some(report);
        plan
    }
}

/// Walks parent links back from `goal` to the root.
fn reconstruct(nodes: &[Node], goal: usize) -> Plan {
    let mut plan = Plan::new();
    let mut current = goal;
    while let Some((parent, action)) = nodes[current].parent {
        plan.push_front(action);
        current = parent;
    }
    plan
}
