//! Test helpers: canned scenario documents and world builders shared by
//! unit tests, integration tests, and benches.

use bevy_ecs::prelude::{Entity, Schedule, World};

use crate::ai::SkillTier;
use crate::ecs::{AgentKind, Courier};
use crate::runner::{initialize_simulation, run_next_event};
use crate::scenario::{build_scenario, BotSpec, ScenarioParams};

/// 8x6 demo city: streets with a small park block and a building row.
pub const DEMO_MAP: &str = r#"{
    "name": "demo city",
    "width": 8,
    "height": 6,
    "tiles": [
        "CCCCCCCC",
        "CBBCCPPC",
        "CCCCCPPC",
        "CBCCCCCC",
        "CBCCBBCC",
        "CCCCCCCC"
    ],
    "legend": {
        "C": {"name": "street", "surface_weight": 1.0},
        "P": {"name": "park", "surface_weight": 0.95},
        "B": {"name": "building", "blocked": true}
    },
    "goal": 1500
}"#;

pub const DEMO_JOBS: &str = r#"{
    "jobs": [
        {"id": "pkg-001", "pickup": [2, 0], "dropoff": [7, 5], "payout": 150.0,
         "weight": 2.0, "priority": 1, "release_time": 0},
        {"id": "pkg-002", "pickup": [0, 3], "dropoff": [6, 0], "payout": 90.0,
         "weight": 1.0, "priority": 0, "release_time": 0},
        {"id": "pkg-003", "pickup": [4, 2], "dropoff": [0, 5], "payout": 220.0,
         "weight": 3.0, "priority": 2, "release_time": 15},
        {"id": "pkg-004", "pickup": [6, 3], "dropoff": [2, 2], "payout": 60.0,
         "weight": 1.5, "priority": 0, "release_time": 30}
    ]
}"#;

pub const DEMO_WEATHER: &str = r#"{
    "city": "demo city",
    "initial": {"condition": "clear", "intensity": 0.1},
    "transition": {
        "clear":      {"clear": 0.6, "clouds": 0.25, "rain_light": 0.1, "rain": 0.05},
        "clouds":     {"clear": 0.3, "clouds": 0.5, "rain_light": 0.15, "rain": 0.05},
        "rain_light": {"clouds": 0.3, "rain_light": 0.4, "rain": 0.3},
        "rain":       {"clouds": 0.2, "rain_light": 0.3, "rain": 0.4, "storm": 0.1},
        "storm":      {"rain": 0.6, "storm": 0.4}
    }
}"#;

pub const DEMO_BURSTS: &str = r#"{
    "bursts": [
        {"condition": "rain", "start_s": 120.0, "duration_s": 40.0, "intensity": 0.9},
        {"condition": "storm", "start_s": 300.0, "duration_s": 25.0, "intensity": 1.0}
    ]
}"#;

pub fn demo_params() -> ScenarioParams {
    ScenarioParams::default()
        .with_seed(42)
        .with_player_name("tester")
        .with_bot(BotSpec::new("rookie", SkillTier::Random))
        .with_bot(BotSpec::new("veteran", SkillTier::Greedy))
}

/// World built from the demo documents, not yet initialized.
pub fn demo_world() -> World {
    build_scenario(
        &demo_params(),
        DEMO_MAP,
        DEMO_JOBS,
        DEMO_WEATHER,
        DEMO_BURSTS,
    )
    .expect("demo scenario builds")
}

/// Demo world with the start event queued and a default schedule.
pub fn demo_session() -> (World, Schedule) {
    let mut world = demo_world();
    initialize_simulation(&mut world);
    (world, crate::runner::simulation_schedule())
}

/// Pump events until simulation time reaches `until_ms` or the queue runs
/// dry. Returns the number of events processed.
pub fn pump_until_ms(world: &mut World, schedule: &mut Schedule, until_ms: u64) -> usize {
    let mut steps = 0;
    loop {
        let next = world
            .resource::<crate::clock::SimulationClock>()
            .next_event_time();
        match next {
            Some(ts) if ts <= until_ms => {
                if !run_next_event(world, schedule) {
                    break;
                }
                steps += 1;
            }
            _ => break,
        }
    }
    steps
}

pub fn human_agent(world: &mut World) -> Entity {
    let mut query = world.query::<(Entity, &Courier)>();
    query
        .iter(world)
        .find(|(_, c)| c.kind == AgentKind::Human)
        .map(|(e, _)| e)
        .expect("demo world has a human agent")
}

pub fn bot_agents(world: &mut World) -> Vec<Entity> {
    let mut query = world.query::<(Entity, &Courier)>();
    query
        .iter(world)
        .filter(|(_, c)| c.kind == AgentKind::Bot)
        .map(|(e, _)| e)
        .collect()
}
