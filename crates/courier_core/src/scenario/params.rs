use bevy_ecs::prelude::Resource;

use crate::ai::SkillTier;
use crate::context::DEFAULT_TIME_LIMIT_S;
use crate::jobs::{ExpiryConfig, DEFAULT_CAPACITY};
use crate::reputation::ScoringConfig;

/// Fixed simulation tick cadence in milliseconds.
#[derive(Debug, Clone, Copy, Resource)]
pub struct TickConfig {
    pub interval_ms: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self { interval_ms: 100 }
    }
}

/// Simulation end time in milliseconds. When set, the runner stops
/// processing events once the next event would be at or past this
/// timestamp.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimulationEndTimeMs(pub u64);

/// One autonomous courier to spawn.
#[derive(Debug, Clone)]
pub struct BotSpec {
    pub name: String,
    pub tier: SkillTier,
    /// Spawn tile; the first walkable tile when `None`.
    pub start: Option<(i32, i32)>,
}

impl BotSpec {
    pub fn new(name: impl Into<String>, tier: SkillTier) -> Self {
        Self {
            name: name.into(),
            tier,
            start: None,
        }
    }
}

/// Parameters for building a simulation scenario.
#[derive(Debug, Clone)]
pub struct ScenarioParams {
    pub seed: Option<u64>,
    pub player_name: String,
    /// Human spawn tile; the first walkable tile when `None`.
    pub human_start: Option<(i32, i32)>,
    pub bots: Vec<BotSpec>,
    /// Carry capacity per agent, weight units.
    pub capacity: f64,
    pub tick_interval_ms: u64,
    pub time_limit_s: f64,
    /// Overrides the map document's income goal when set.
    pub goal_override: Option<f64>,
    pub scoring: ScoringConfig,
    pub expiry: ExpiryConfig,
    /// Optional hard stop for the event pump.
    pub simulation_end_time_ms: Option<u64>,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            seed: None,
            player_name: "courier".to_string(),
            human_start: None,
            bots: Vec::new(),
            capacity: DEFAULT_CAPACITY,
            tick_interval_ms: TickConfig::default().interval_ms,
            time_limit_s: DEFAULT_TIME_LIMIT_S,
            goal_override: None,
            scoring: ScoringConfig::default(),
            expiry: ExpiryConfig::default(),
            simulation_end_time_ms: None,
        }
    }
}

impl ScenarioParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = name.into();
        self
    }

    pub fn with_human_start(mut self, tile: (i32, i32)) -> Self {
        self.human_start = Some(tile);
        self
    }

    pub fn with_bot(mut self, bot: BotSpec) -> Self {
        self.bots.push(bot);
        self
    }

    pub fn with_time_limit_s(mut self, limit: f64) -> Self {
        self.time_limit_s = limit;
        self
    }

    pub fn with_goal(mut self, goal: f64) -> Self {
        self.goal_override = Some(goal);
        self
    }

    /// Set the hard stop for the event pump, in ms of simulation time.
    pub fn with_simulation_end_time_ms(mut self, end_ms: u64) -> Self {
        self.simulation_end_time_ms = Some(end_ms);
        self
    }
}
