use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

pub const ONE_SEC_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventKind {
    SimulationStarted,
    /// Fixed-cadence simulation tick: movement progress, idle recovery,
    /// expiry sweep, end-condition checks.
    Tick,
    /// Weather Markov transition (burst-period timer or burst end).
    WeatherAdvance,
    /// One decision iteration for an autonomous agent.
    AgentDecision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventSubject {
    Agent(Entity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: u64,
    pub kind: EventKind,
    pub subject: Option<EventSubject>,
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by timestamp.
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.kind.cmp(&self.kind))
            .then_with(|| other.subject.cmp(&self.subject))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event currently being processed by the schedule. Inserted by the
/// runner before each pass; systems inspect it and early-out on kind
/// mismatch.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

/// Simulation clock: monotone event heap. Time is milliseconds since game
/// start and only advances when the host pumps events, so a paused host
/// freezes every deadline and timer for free.
#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    /// Empty clock positioned at `now`; used when importing a snapshot, so
    /// re-seeded event chains resume from the saved instant.
    pub fn starting_at(now: u64) -> Self {
        Self {
            now,
            events: BinaryHeap::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Elapsed game time in seconds. Deadlines, release times and burst
    /// windows are all expressed in this unit.
    pub fn elapsed_s(&self) -> f64 {
        self.now as f64 / ONE_SEC_MS as f64
    }

    pub fn schedule_at(&mut self, timestamp: u64, kind: EventKind, subject: Option<EventSubject>) {
        debug_assert!(
            timestamp >= self.now,
            "event timestamp must be >= current time"
        );
        self.events.push(Event {
            timestamp,
            kind,
            subject,
        });
    }

    pub fn schedule_at_secs(&mut self, secs: u64, kind: EventKind, subject: Option<EventSubject>) {
        self.schedule_at(secs * ONE_SEC_MS, kind, subject);
    }

    pub fn schedule_in(&mut self, delta_ms: u64, kind: EventKind, subject: Option<EventSubject>) {
        self.schedule_at(self.now + delta_ms, kind, subject);
    }

    pub fn schedule_in_secs(&mut self, secs: u64, kind: EventKind, subject: Option<EventSubject>) {
        self.schedule_in(secs * ONE_SEC_MS, kind, subject);
    }

    pub fn next_event_time(&self) -> Option<u64> {
        self.events.peek().map(|e| e.timestamp)
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pops_events_in_time_order() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(10, EventKind::Tick, None);
        clock.schedule_at(5, EventKind::WeatherAdvance, None);
        clock.schedule_at(20, EventKind::Tick, None);

        let first = clock.pop_next().expect("first event");
        assert_eq!(first.timestamp, 5);
        assert_eq!(first.kind, EventKind::WeatherAdvance);
        assert_eq!(clock.now(), 5);

        let second = clock.pop_next().expect("second event");
        assert_eq!(second.timestamp, 10);
        assert_eq!(clock.now(), 10);

        let third = clock.pop_next().expect("third event");
        assert_eq!(third.timestamp, 20);
        assert_eq!(clock.now(), 20);

        assert!(clock.pop_next().is_none());
        assert!(clock.is_empty());
    }

    #[test]
    fn elapsed_seconds_track_milliseconds() {
        let mut clock = SimulationClock::default();
        clock.schedule_in(2500, EventKind::Tick, None);
        clock.pop_next().expect("event");
        assert_eq!(clock.now(), 2500);
        assert!((clock.elapsed_s() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn schedule_in_is_relative_to_now() {
        let mut clock = SimulationClock::default();
        clock.schedule_at_secs(3, EventKind::Tick, None);
        clock.pop_next().expect("event");
        clock.schedule_in_secs(2, EventKind::Tick, None);
        assert_eq!(clock.next_event_time(), Some(5 * ONE_SEC_MS));
    }
}
