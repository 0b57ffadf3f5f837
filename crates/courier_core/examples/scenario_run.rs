//! Run a full shift with two autonomous couriers and print the outcome.
//!
//! Run with: cargo run -p courier_core --example scenario_run

use courier_core::ai::SkillTier;
use courier_core::runner::{initialize_simulation, run_until_empty, simulation_schedule};
use courier_core::scenario::{build_scenario, BotSpec, ScenarioParams};
use courier_core::telemetry::{agent_snapshots, final_score, performance_rank, weather_snapshot};
use courier_core::test_helpers::{DEMO_BURSTS, DEMO_JOBS, DEMO_MAP, DEMO_WEATHER};

fn main() {
    let params = ScenarioParams::default()
        .with_seed(123)
        .with_player_name("idle-player")
        .with_bot(BotSpec::new("rookie", SkillTier::Random))
        .with_bot(BotSpec::new("veteran", SkillTier::Greedy))
        .with_time_limit_s(600.0);

    let mut world = build_scenario(&params, DEMO_MAP, DEMO_JOBS, DEMO_WEATHER, DEMO_BURSTS)
        .expect("scenario builds");
    initialize_simulation(&mut world);
    let mut schedule = simulation_schedule();

    let steps = run_until_empty(&mut world, &mut schedule, 2_000_000);
    let clock = world.resource::<courier_core::clock::SimulationClock>();
    let sim_time_s = clock.now() / 1000;

    println!("--- Shift complete (seed 123) ---");
    println!("Events processed: {steps}");
    println!("Simulation time: {sim_time_s} s");
    println!(
        "Outcome: {:?}",
        courier_core::telemetry::session_outcome(&world).ended
    );
    let weather = weather_snapshot(&world);
    println!(
        "Final weather: {} (intensity {:.2})",
        weather.condition.as_str(),
        weather.intensity
    );

    println!("\nAgents:");
    for agent in agent_snapshots(&mut world) {
        let score = final_score(agent.earnings, agent.reputation, &agent.daily);
        println!(
            "  {:10} {:?} at {:?}  stamina {:5.1}  rep {:5.1}  earned ${:7.2}  \
             on-time {} early {} late {} lost {}  score {:.0} ({})",
            agent.name,
            agent.kind,
            agent.tile,
            agent.stamina,
            agent.reputation,
            agent.earnings,
            agent.daily.on_time,
            agent.daily.early,
            agent.daily.late,
            agent.daily.lost,
            score,
            performance_rank(score),
        );
    }
}
