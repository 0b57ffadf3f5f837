//! World builder: turns validated inputs and [`ScenarioParams`] into a
//! ready-to-run [`World`].

use bevy_ecs::prelude::World;
use tracing::info;

use crate::ai::AiController;
use crate::city::CityMap;
use crate::clock::SimulationClock;
use crate::context::{SessionOutcome, SimContext};
use crate::ecs::{Courier, Motion, Position, Wallet};
use crate::jobs::JobBoard;
use crate::orders::Order;
use crate::reputation::Reputation;
use crate::stamina::Vitals;
use crate::telemetry::StatusFeed;

use super::data::{parse_jobs_doc, parse_map_doc, parse_weather_doc};
use super::params::{ScenarioParams, SimulationEndTimeMs, TickConfig};
use super::ScenarioError;

fn spawn_tile(
    requested: Option<(i32, i32)>,
    map: &CityMap,
    label: &str,
) -> Result<(i32, i32), ScenarioError> {
    match requested {
        Some(tile) => {
            if map.is_blocked(tile.0, tile.1) {
                return Err(ScenarioError::Map(format!(
                    "{label} spawn {tile:?} is blocked or out of bounds"
                )));
            }
            Ok(tile)
        }
        None => map
            .walkable_tiles()
            .first()
            .copied()
            .ok_or_else(|| ScenarioError::Map("no walkable tiles".into())),
    }
}

fn spawn_agent(
    world: &mut World,
    courier: Courier,
    tile: (i32, i32),
    orders: &[Order],
    capacity: f64,
) -> bevy_ecs::prelude::Entity {
    world
        .spawn((
            courier,
            Position::from(tile),
            Motion::default(),
            Vitals::default(),
            Reputation::default(),
            Wallet::default(),
            JobBoard::from_orders(orders.to_vec(), capacity),
        ))
        .id()
}

/// Build a world from the four raw input documents. The returned world has
/// every resource and agent in place; call
/// [`crate::runner::initialize_simulation`] next.
pub fn build_scenario(
    params: &ScenarioParams,
    map_json: &str,
    jobs_json: &str,
    weather_json: &str,
    bursts_json: &str,
) -> Result<World, ScenarioError> {
    let map = parse_map_doc(map_json)?;
    let orders = parse_jobs_doc(jobs_json, &map)?;
    let weather = parse_weather_doc(weather_json, bursts_json, params.seed)?;

    let goal = params.goal_override.unwrap_or_else(|| map.goal_income());

    let mut world = World::new();
    world.insert_resource(SimulationClock::default());
    world.insert_resource(SimContext::new(goal, params.time_limit_s));
    world.insert_resource(SessionOutcome::default());
    world.insert_resource(TickConfig {
        interval_ms: params.tick_interval_ms,
    });
    world.insert_resource(params.scoring);
    world.insert_resource(params.expiry);
    world.insert_resource(StatusFeed::default());
    if let Some(end_ms) = params.simulation_end_time_ms {
        world.insert_resource(SimulationEndTimeMs(end_ms));
    }

    let human_tile = spawn_tile(params.human_start, &map, "human")?;
    spawn_agent(
        &mut world,
        Courier::human(params.player_name.clone()),
        human_tile,
        &orders,
        params.capacity,
    );

    for (index, bot) in params.bots.iter().enumerate() {
        let tile = spawn_tile(bot.start, &map, &bot.name)?;
        // Each bot owns a private copy of the job list and its own RNG
        // stream derived from the scenario seed.
        let seed = params
            .seed
            .unwrap_or(0)
            .wrapping_mul(31)
            .wrapping_add(index as u64 + 1);
        let entity = spawn_agent(
            &mut world,
            Courier::bot(bot.name.clone()),
            tile,
            &orders,
            params.capacity,
        );
        world
            .entity_mut(entity)
            .insert(AiController::new(bot.tier, seed));
    }

    world.insert_resource(map);
    world.insert_resource(weather);

    info!(
        player = %params.player_name,
        bots = params.bots.len(),
        jobs = orders.len(),
        goal,
        "scenario built"
    );
    Ok(world)
}

/// The human-controlled agent, if one exists.
pub fn human_entity(world: &mut World) -> Option<bevy_ecs::prelude::Entity> {
    let mut query = world.query::<(bevy_ecs::prelude::Entity, &Courier)>();
    query
        .iter(world)
        .find(|(_, courier)| courier.kind == crate::ecs::AgentKind::Human)
        .map(|(entity, _)| entity)
}
