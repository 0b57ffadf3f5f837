//! Autonomous courier decision engine.
//!
//! A closed set of skill tiers with per-tier parameters as plain data; one
//! decision entry point branches on the tier. The low tier wanders with a
//! bias toward its target; the mid tier scores jobs with a weighted
//! heuristic and picks moves with a bounded-depth lookahead.

pub mod heuristic;
pub mod lookahead;

use std::collections::VecDeque;

use bevy_ecs::prelude::Component;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Skill tiers. A top tier existed only as a stub in the predecessor and is
/// intentionally not modeled; add a variant here when it grows a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillTier {
    /// Random job choice, probabilistic walk toward the target.
    Random,
    /// Heuristic job scoring plus bounded-depth lookahead movement.
    Greedy,
}

/// Per-tier tuning. Kept as data rather than types so tiers differ only in
/// numbers and the branch in the decision system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierParams {
    /// Seconds between decision iterations.
    pub decision_interval_s: f64,
    /// Seconds between job-selection attempts while already busy.
    pub job_check_interval_s: f64,
    /// Orders are eligible only this many seconds after release, leaving
    /// the human player a priority window.
    pub eligibility_delay_s: f64,
    /// Most orders an agent keeps accepted at once.
    pub max_accepted: usize,

    /// Job score payout weight (alpha).
    pub payout_weight: f64,
    /// Job score distance weight (beta).
    pub distance_weight: f64,
    /// Job score weather weight (gamma).
    pub weather_weight: f64,
    /// Additive bonus per priority level.
    pub priority_bonus: f64,

    /// Probability of stepping toward the target instead of randomly.
    pub toward_target_probability: f64,
    /// Probability of using the lookahead tree for a decision.
    pub lookahead_probability: f64,
    /// Lookahead depth in moves.
    pub lookahead_depth: u32,

    /// Window of recent positions inspected for oscillation.
    pub loop_window: usize,
    /// Max distinct positions within the window before the agent counts as
    /// stuck.
    pub loop_distinct_max: usize,
    /// Positions retained in history.
    pub history_cap: usize,
    /// Forced uniform-random moves after loop detection trips.
    pub forced_random_moves: u32,
}

impl TierParams {
    pub fn random_tier() -> Self {
        Self {
            decision_interval_s: 0.8,
            job_check_interval_s: 3.0,
            eligibility_delay_s: 3.0,
            max_accepted: 3,
            payout_weight: 0.0,
            distance_weight: 0.0,
            weather_weight: 0.0,
            priority_bonus: 0.0,
            toward_target_probability: 0.85,
            lookahead_probability: 0.0,
            lookahead_depth: 0,
            loop_window: 6,
            loop_distinct_max: 2,
            history_cap: 8,
            forced_random_moves: 5,
        }
    }

    pub fn greedy_tier() -> Self {
        Self {
            decision_interval_s: 0.8,
            job_check_interval_s: 3.0,
            eligibility_delay_s: 3.0,
            max_accepted: 3,
            payout_weight: 1.0,
            distance_weight: 2.0,
            weather_weight: 5.0,
            priority_bonus: 15.0,
            toward_target_probability: 0.85,
            lookahead_probability: 0.9,
            lookahead_depth: 2,
            loop_window: 6,
            loop_distinct_max: 2,
            history_cap: 8,
            forced_random_moves: 5,
        }
    }

    pub fn for_tier(tier: SkillTier) -> Self {
        match tier {
            SkillTier::Random => Self::random_tier(),
            SkillTier::Greedy => Self::greedy_tier(),
        }
    }
}

/// What the agent is currently heading for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    Pickup,
    Dropoff,
}

/// Decision state for one autonomous courier. Owns its RNG so concurrent
/// agents never share a random stream.
#[derive(Debug, Component)]
pub struct AiController {
    pub tier: SkillTier,
    pub params: TierParams,
    pub seed: u64,
    pub rng: StdRng,
    /// Recent tile history for oscillation detection, newest last.
    pub history: VecDeque<(i32, i32)>,
    /// Remaining forced random moves after loop detection tripped.
    pub forced_random_remaining: u32,
    pub last_job_check_s: f64,
    pub target: Option<((i32, i32), TargetKind)>,
}

impl AiController {
    pub fn new(tier: SkillTier, seed: u64) -> Self {
        Self {
            tier,
            params: TierParams::for_tier(tier),
            seed,
            rng: StdRng::seed_from_u64(seed),
            history: VecDeque::new(),
            forced_random_remaining: 0,
            last_job_check_s: f64::NEG_INFINITY,
            target: None,
        }
    }

    pub fn record_position(&mut self, tile: (i32, i32)) {
        if self.history.len() == self.params.history_cap {
            self.history.pop_front();
        }
        self.history.push_back(tile);
    }

    /// Stuck when the most recent `loop_window` positions span at most
    /// `loop_distinct_max` distinct tiles.
    pub fn is_stuck(&self) -> bool {
        if self.history.len() < self.params.loop_window {
            return false;
        }
        let recent: Vec<(i32, i32)> = self
            .history
            .iter()
            .rev()
            .take(self.params.loop_window)
            .copied()
            .collect();
        let mut distinct: Vec<(i32, i32)> = Vec::new();
        for tile in recent {
            if !distinct.contains(&tile) {
                distinct.push(tile);
            }
        }
        distinct.len() <= self.params.loop_distinct_max
    }

    /// Trip the loop breaker: force random moves and forget the history
    /// that tripped it.
    pub fn trip_loop_breaker(&mut self) {
        self.forced_random_remaining = self.params.forced_random_moves;
        self.history.clear();
    }
}
