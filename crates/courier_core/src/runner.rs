//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each
//! step pops the next event from [SimulationClock], inserts it as
//! [CurrentEvent], then runs the schedule. The host owns the pump: while
//! the session is paused it simply stops calling [run_next_event], which
//! freezes simulation time and every timer derived from it.

use bevy_ecs::prelude::Res;
use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::{apply_deferred, IntoSystemConfigs};

use crate::clock::{CurrentEvent, Event, EventKind, SimulationClock};
use crate::scenario::SimulationEndTimeMs;
use crate::systems::{
    agent_decision::agent_decision_system, startup::simulation_started_system, tick::tick_system,
    weather_advance::weather_advance_system,
};

fn is_simulation_started(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::SimulationStarted)
        .unwrap_or(false)
}

fn is_tick(event: Option<Res<CurrentEvent>>) -> bool {
    event.map(|e| e.0.kind == EventKind::Tick).unwrap_or(false)
}

fn is_weather_advance(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::WeatherAdvance)
        .unwrap_or(false)
}

fn is_agent_decision(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::AgentDecision)
        .unwrap_or(false)
}

/// Runs one simulation step: pops the next event, inserts it as
/// [CurrentEvent], then runs the schedule. Returns `true` if an event was
/// processed, `false` if the clock was empty or the next event is at or past
/// [SimulationEndTimeMs] (when that resource is present).
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    let stop_at = world.get_resource::<SimulationEndTimeMs>().map(|e| e.0);
    let next_ts = world
        .get_resource::<SimulationClock>()
        .and_then(|c| c.next_event_time());
    if let (Some(end_ms), Some(ts)) = (stop_at, next_ts) {
        if ts >= end_ms {
            return false;
        }
    }

    let event = match world.resource_mut::<SimulationClock>().pop_next() {
        Some(e) => e,
        None => return false,
    };
    world.insert_resource(CurrentEvent(event));
    schedule.run(world);
    true
}

/// Runs one simulation step and invokes `hook` after the schedule completes.
pub fn run_next_event_with_hook<F>(world: &mut World, schedule: &mut Schedule, mut hook: F) -> bool
where
    F: FnMut(&World, &Event),
{
    let stop_at = world.get_resource::<SimulationEndTimeMs>().map(|e| e.0);
    let next_ts = world
        .get_resource::<SimulationClock>()
        .and_then(|c| c.next_event_time());
    if let (Some(end_ms), Some(ts)) = (stop_at, next_ts) {
        if ts >= end_ms {
            return false;
        }
    }

    let event = match world.resource_mut::<SimulationClock>().pop_next() {
        Some(e) => e,
        None => return false,
    };
    world.insert_resource(CurrentEvent(event));
    schedule.run(world);
    hook(world, &event);
    true
}

/// Runs simulation steps until the event queue is empty or `max_steps` is
/// reached. Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule) {
        steps += 1;
    }
    steps
}

/// Runs simulation steps until empty and invokes `hook` after each step.
pub fn run_until_empty_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
    mut hook: F,
) -> usize
where
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    while steps < max_steps && run_next_event_with_hook(world, schedule, &mut hook) {
        steps += 1;
    }
    steps
}

/// Builds the default simulation schedule: all event-reacting systems plus
/// [apply_deferred]. Systems are conditionally executed based on event type.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((
        simulation_started_system.run_if(is_simulation_started),
        tick_system.run_if(is_tick),
        weather_advance_system.run_if(is_weather_advance),
        agent_decision_system.run_if(is_agent_decision),
        apply_deferred,
    ));
    schedule
}

/// Schedules the SimulationStarted event at time 0. Call after building the
/// scenario and before pumping events.
pub fn initialize_simulation(world: &mut World) {
    let mut clock = world.resource_mut::<SimulationClock>();
    clock.schedule_at(0, EventKind::SimulationStarted, None);
}
