use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

/// Default session length: a 10 minute shift.
pub const DEFAULT_TIME_LIMIT_S: f64 = 600.0;

/// Why the session ended. Terminal simulation states, not errors; the
/// presentation layer reads this and switches to its end screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCondition {
    /// The shift timer ran out.
    TimeExhausted,
    /// The human courier's reputation fell below the game-over floor.
    ReputationCollapse,
    /// The income goal was reached before the timer ran out.
    GoalReached,
    /// No orders are active and none are pending release.
    JobsExhausted,
}

/// Explicit session context shared read-only by every component that used to
/// reach back into a global game object: pause flag, income goal, shift
/// length. Elapsed time lives on [`crate::clock::SimulationClock`].
#[derive(Debug, Clone, Copy, Resource, Serialize, Deserialize)]
pub struct SimContext {
    pub paused: bool,
    /// Income goal (from the map document unless overridden).
    pub goal_income: f64,
    pub time_limit_s: f64,
}

impl SimContext {
    pub fn new(goal_income: f64, time_limit_s: f64) -> Self {
        Self {
            paused: false,
            goal_income,
            time_limit_s,
        }
    }

    pub fn time_remaining_s(&self, elapsed_s: f64) -> f64 {
        (self.time_limit_s - elapsed_s).max(0.0)
    }
}

impl Default for SimContext {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_TIME_LIMIT_S)
    }
}

/// Session outcome; `ended` stays `None` while the simulation is live. Once
/// set it is never overwritten, so the first terminal condition wins.
#[derive(Debug, Default, Clone, Copy, Resource, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub ended: Option<EndCondition>,
}

impl SessionOutcome {
    pub fn finish(&mut self, condition: EndCondition) {
        if self.ended.is_none() {
            self.ended = Some(condition);
        }
    }

    pub fn is_over(&self) -> bool {
        self.ended.is_some()
    }
}
