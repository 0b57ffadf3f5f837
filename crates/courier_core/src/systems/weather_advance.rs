//! Weather transition system: runs one Markov step and re-schedules itself
//! for the next burst-period expiry or burst end.

use bevy_ecs::prelude::{Res, ResMut};
use tracing::info;

use crate::clock::{CurrentEvent, EventKind, SimulationClock, ONE_SEC_MS};
use crate::context::{SessionOutcome, SimContext};
use crate::telemetry::StatusFeed;
use crate::weather::WeatherModel;

pub fn weather_advance_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    context: Res<SimContext>,
    outcome: Res<SessionOutcome>,
    mut weather: ResMut<WeatherModel>,
    mut feed: ResMut<StatusFeed>,
) {
    if event.0.kind != EventKind::WeatherAdvance {
        return;
    }
    if outcome.is_over() {
        return;
    }
    if context.paused {
        // Hold the transition; check again shortly after resume.
        clock.schedule_in(ONE_SEC_MS, EventKind::WeatherAdvance, None);
        return;
    }

    let now_s = clock.elapsed_s();
    let before = weather.current_condition();
    weather.advance(now_s);
    let after = weather.current_condition();

    if before != after {
        info!(from = before.as_str(), to = after.as_str(), "weather changed");
        feed.push(now_s, format!("Weather: {}", after.as_str()));
    }

    let next_in_ms = ((weather.next_transition_s() - now_s).max(0.0) * 1000.0) as u64;
    clock.schedule_in(next_in_ms.max(ONE_SEC_MS), EventKind::WeatherAdvance, None);
}
