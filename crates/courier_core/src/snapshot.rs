//! Full state export/import.
//!
//! The snapshot covers every live entity — agents with vitals, reputation
//! and job boards, the weather state, the clock, and the session context —
//! as one opaque byte blob. Storage, slots, and file formats belong to the
//! external save subsystem; this module only round-trips the state.
//!
//! RNG streams restart from their stored seeds on import: deterministic
//! replay across a save/load boundary is a non-goal.

use bevy_ecs::prelude::World;
use serde::{Deserialize, Serialize};

use crate::ai::{AiController, SkillTier, TargetKind, TierParams};
use crate::city::CityMap;
use crate::clock::{EventKind, EventSubject, SimulationClock};
use crate::context::{SessionOutcome, SimContext};
use crate::ecs::{Courier, Motion, Position, Wallet};
use crate::jobs::{ExpiryConfig, JobBoard};
use crate::reputation::{Reputation, ScoringConfig};
use crate::scenario::TickConfig;
use crate::stamina::Vitals;
use crate::telemetry::StatusFeed;
use crate::weather::{Burst, WeatherCondition, WeatherModel};

use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSave {
    pub transition: HashMap<WeatherCondition, Vec<(WeatherCondition, f64)>>,
    pub bursts: Vec<Burst>,
    pub seed: Option<u64>,
    pub current: WeatherCondition,
    pub previous: WeatherCondition,
    pub intensity: f64,
    pub last_transition_s: f64,
    pub next_transition_s: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiSave {
    pub tier: SkillTier,
    pub params: TierParams,
    pub seed: u64,
    pub history: Vec<(i32, i32)>,
    pub forced_random_remaining: u32,
    pub last_job_check_s: f64,
    pub target: Option<((i32, i32), TargetKind)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSave {
    pub courier: Courier,
    pub position: Position,
    pub motion: Motion,
    pub vitals: Vitals,
    pub reputation: Reputation,
    pub wallet: Wallet,
    pub board: JobBoard,
    pub ai: Option<AiSave>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub now_ms: u64,
    pub context: SimContext,
    pub outcome: SessionOutcome,
    pub tick_interval_ms: u64,
    pub scoring: ScoringConfig,
    pub expiry: ExpiryConfig,
    pub city: CityMap,
    pub weather: WeatherSave,
    pub agents: Vec<AgentSave>,
}

impl SimSnapshot {
    /// Capture the complete simulation state.
    pub fn capture(world: &mut World) -> Self {
        let now_ms = world.resource::<SimulationClock>().now();
        let context = *world.resource::<SimContext>();
        let outcome = *world.resource::<SessionOutcome>();
        let tick_interval_ms = world.resource::<TickConfig>().interval_ms;
        let scoring = *world.resource::<ScoringConfig>();
        let expiry = *world.resource::<ExpiryConfig>();
        let city = world.resource::<CityMap>().clone();

        let weather = {
            let model = world.resource::<WeatherModel>();
            WeatherSave {
                transition: model.transition_matrix().clone(),
                bursts: model.bursts().to_vec(),
                seed: model.seed(),
                current: model.current_condition(),
                previous: model.previous_condition(),
                intensity: model.current_intensity(),
                last_transition_s: model.last_transition_s(),
                next_transition_s: model.next_transition_s(),
            }
        };

        let mut agents = Vec::new();
        let mut query = world.query::<(
            &Courier,
            &Position,
            &Motion,
            &Vitals,
            &Reputation,
            &Wallet,
            &JobBoard,
            Option<&AiController>,
        )>();
        for (courier, position, motion, vitals, reputation, wallet, board, controller) in
            query.iter(world)
        {
            agents.push(AgentSave {
                courier: courier.clone(),
                position: *position,
                motion: *motion,
                vitals: *vitals,
                reputation: reputation.clone(),
                wallet: *wallet,
                board: board.clone(),
                ai: controller.map(|c| AiSave {
                    tier: c.tier,
                    params: c.params,
                    seed: c.seed,
                    history: c.history.iter().copied().collect(),
                    forced_random_remaining: c.forced_random_remaining,
                    last_job_check_s: c.last_job_check_s,
                    target: c.target,
                }),
            });
        }

        Self {
            now_ms,
            context,
            outcome,
            tick_interval_ms,
            scoring,
            expiry,
            city,
            weather,
            agents,
        }
    }

    /// Rebuild a runnable world. Recurring event chains (tick, weather,
    /// per-bot decisions) are re-seeded relative to the saved instant.
    pub fn restore(&self) -> World {
        let mut world = World::new();

        let mut clock = SimulationClock::starting_at(self.now_ms);
        clock.schedule_in(self.tick_interval_ms, EventKind::Tick, None);

        world.insert_resource(self.context);
        world.insert_resource(self.outcome);
        world.insert_resource(TickConfig {
            interval_ms: self.tick_interval_ms,
        });
        world.insert_resource(self.scoring);
        world.insert_resource(self.expiry);
        world.insert_resource(StatusFeed::default());
        world.insert_resource(self.city.clone());

        let weather = WeatherModel::restore(
            self.weather.transition.clone(),
            self.weather.bursts.clone(),
            self.weather.seed,
            self.weather.current,
            self.weather.previous,
            self.weather.intensity,
            self.weather.last_transition_s,
            self.weather.next_transition_s,
        );
        let now_s = self.now_ms as f64 / 1000.0;
        let weather_in_ms = ((weather.next_transition_s() - now_s).max(1.0) * 1000.0) as u64;
        clock.schedule_in(weather_in_ms, EventKind::WeatherAdvance, None);
        world.insert_resource(weather);

        for save in &self.agents {
            let entity = world
                .spawn((
                    save.courier.clone(),
                    save.position,
                    save.motion,
                    save.vitals,
                    save.reputation.clone(),
                    save.wallet,
                    save.board.clone(),
                ))
                .id();
            if let Some(ai) = &save.ai {
                let mut controller = AiController::new(ai.tier, ai.seed);
                controller.params = ai.params;
                controller.history = ai.history.iter().copied().collect();
                controller.forced_random_remaining = ai.forced_random_remaining;
                controller.last_job_check_s = ai.last_job_check_s;
                controller.target = ai.target;
                let interval_ms = (controller.params.decision_interval_s * 1000.0) as u64;
                world.entity_mut(entity).insert(controller);
                clock.schedule_in(
                    interval_ms,
                    EventKind::AgentDecision,
                    Some(EventSubject::Agent(entity)),
                );
            }
        }

        world.insert_resource(clock);
        world
    }

    /// Opaque export for the external save subsystem.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}
