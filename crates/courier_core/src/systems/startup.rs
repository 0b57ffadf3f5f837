//! Startup system: seeds the recurring event chains when the simulation
//! begins.

use bevy_ecs::prelude::{Entity, Query, Res, ResMut};
use tracing::info;

use crate::ai::AiController;
use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::ecs::Courier;
use crate::jobs::JobBoard;
use crate::scenario::TickConfig;
use crate::weather::WeatherModel;

pub fn simulation_started_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    config: Res<TickConfig>,
    weather: Res<WeatherModel>,
    mut agents: Query<(Entity, &Courier, Option<&AiController>, &mut JobBoard)>,
) {
    if event.0.kind != EventKind::SimulationStarted {
        return;
    }

    let now_s = clock.elapsed_s();
    for (_, _, _, mut board) in agents.iter_mut() {
        board.mark_released(now_s);
    }

    clock.schedule_in(config.interval_ms, EventKind::Tick, None);

    let weather_in_ms = ((weather.next_transition_s() - now_s).max(0.0) * 1000.0) as u64;
    clock.schedule_in(weather_in_ms, EventKind::WeatherAdvance, None);

    let mut bots = 0usize;
    for (entity, courier, controller, _) in agents.iter() {
        if let Some(controller) = controller {
            // Stagger the first decision so bots do not all act on the same
            // event timestamp.
            bots += 1;
            let first_in_ms =
                (controller.params.decision_interval_s * 1000.0) as u64 + bots as u64 * 100;
            clock.schedule_in(
                first_in_ms,
                EventKind::AgentDecision,
                Some(EventSubject::Agent(entity)),
            );
            info!(agent = %courier.name, tier = ?controller.tier, "decision loop scheduled");
        }
    }

    info!(bots, "simulation started");
}
