//! Weather model: a discrete-time Markov chain over named conditions,
//! overlaid with a schedule of fixed-duration bursts that pin intensity.
//!
//! Transitions fire on a burst-period timer (~55 s) with a short reserved
//! window for visual interpolation; an active burst running out forces the
//! next transition early regardless of the timer.

use std::collections::HashMap;

use bevy_ecs::prelude::Resource;
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Seconds between Markov transitions when no burst cuts the period short.
pub const BURST_PERIOD_S: f64 = 55.0;
/// Window after a transition during which the HUD interpolates multipliers.
pub const TRANSITION_WINDOW_S: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    Clouds,
    RainLight,
    Rain,
    Storm,
    Fog,
    Wind,
    Heat,
    Cold,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 9] = [
        WeatherCondition::Clear,
        WeatherCondition::Clouds,
        WeatherCondition::RainLight,
        WeatherCondition::Rain,
        WeatherCondition::Storm,
        WeatherCondition::Fog,
        WeatherCondition::Wind,
        WeatherCondition::Heat,
        WeatherCondition::Cold,
    ];

    /// Fixed speed multiplier per condition, looked up at every speed
    /// computation rather than cached across ticks.
    pub fn speed_multiplier(self) -> f64 {
        match self {
            WeatherCondition::Clear => 1.00,
            WeatherCondition::Clouds => 0.98,
            WeatherCondition::RainLight => 0.90,
            WeatherCondition::Rain => 0.85,
            WeatherCondition::Storm => 0.75,
            WeatherCondition::Fog => 0.88,
            WeatherCondition::Wind => 0.92,
            WeatherCondition::Heat => 0.90,
            WeatherCondition::Cold => 0.92,
        }
    }

    /// Extra stamina drained per tile moved under this condition.
    pub fn stamina_penalty_per_tile(self) -> f64 {
        match self {
            WeatherCondition::Rain
            | WeatherCondition::RainLight
            | WeatherCondition::Wind
            | WeatherCondition::Cold => 0.1,
            WeatherCondition::Heat => 0.2,
            WeatherCondition::Storm => 0.3,
            WeatherCondition::Clear | WeatherCondition::Clouds | WeatherCondition::Fog => 0.0,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "clear" => Some(WeatherCondition::Clear),
            "clouds" => Some(WeatherCondition::Clouds),
            "rain_light" => Some(WeatherCondition::RainLight),
            "rain" => Some(WeatherCondition::Rain),
            "storm" => Some(WeatherCondition::Storm),
            "fog" => Some(WeatherCondition::Fog),
            "wind" => Some(WeatherCondition::Wind),
            "heat" => Some(WeatherCondition::Heat),
            "cold" => Some(WeatherCondition::Cold),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeatherCondition::Clear => "clear",
            WeatherCondition::Clouds => "clouds",
            WeatherCondition::RainLight => "rain_light",
            WeatherCondition::Rain => "rain",
            WeatherCondition::Storm => "storm",
            WeatherCondition::Fog => "fog",
            WeatherCondition::Wind => "wind",
            WeatherCondition::Heat => "heat",
            WeatherCondition::Cold => "cold",
        }
    }
}

/// Scheduled window that pins intensity for its condition while active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Burst {
    pub condition: WeatherCondition,
    pub start_s: f64,
    pub duration_s: f64,
    pub intensity: f64,
}

impl Burst {
    pub fn end_s(&self) -> f64 {
        self.start_s + self.duration_s
    }

    pub fn is_active(&self, now_s: f64) -> bool {
        now_s >= self.start_s && now_s < self.end_s()
    }
}

#[derive(Debug, Resource)]
pub struct WeatherModel {
    transition: HashMap<WeatherCondition, Vec<(WeatherCondition, f64)>>,
    current: WeatherCondition,
    previous: WeatherCondition,
    intensity: f64,
    bursts: Vec<Burst>,
    last_transition_s: f64,
    next_transition_s: f64,
    seed: Option<u64>,
    rng: StdRng,
}

impl WeatherModel {
    pub fn new(
        initial: WeatherCondition,
        initial_intensity: f64,
        transition: HashMap<WeatherCondition, Vec<(WeatherCondition, f64)>>,
        mut bursts: Vec<Burst>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        bursts.sort_by(|a, b| a.start_s.total_cmp(&b.start_s));
        let mut model = Self {
            transition,
            current: initial,
            previous: initial,
            intensity: initial_intensity.clamp(0.0, 1.0),
            bursts,
            last_transition_s: 0.0,
            next_transition_s: 0.0,
            seed,
            rng,
        };
        model.next_transition_s = model.transition_after(0.0);
        model
    }

    pub fn current_condition(&self) -> WeatherCondition {
        self.current
    }

    pub fn current_intensity(&self) -> f64 {
        self.intensity
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.current.speed_multiplier()
    }

    /// Multiplier interpolated across the reserved transition window; equal
    /// to [`Self::speed_multiplier`] once the window has elapsed. HUD only:
    /// the movement engine always reads the fixed per-condition value.
    pub fn speed_multiplier_interpolated(&self, now_s: f64) -> f64 {
        let progress = ((now_s - self.last_transition_s) / TRANSITION_WINDOW_S).clamp(0.0, 1.0);
        let from = self.previous.speed_multiplier();
        let to = self.current.speed_multiplier();
        from + (to - from) * progress
    }

    pub fn next_transition_s(&self) -> f64 {
        self.next_transition_s
    }

    pub fn seconds_to_change(&self, now_s: f64) -> f64 {
        (self.next_transition_s - now_s).max(0.0)
    }

    fn active_burst(&self, condition: WeatherCondition, now_s: f64) -> Option<&Burst> {
        self.bursts
            .iter()
            .find(|b| b.condition == condition && b.is_active(now_s))
    }

    /// Next transition time from `now_s`: the burst-period timer, cut short
    /// by whichever active burst ends first.
    fn transition_after(&self, now_s: f64) -> f64 {
        let mut next = now_s + BURST_PERIOD_S;
        for burst in &self.bursts {
            if burst.is_active(now_s) && burst.end_s() < next {
                next = burst.end_s();
            }
        }
        next.max(now_s + TRANSITION_WINDOW_S)
    }

    /// Run one Markov transition. Samples the next condition from the
    /// current row, then samples a fresh intensity unless a scheduled burst
    /// for that condition is active, in which case the burst's intensity is
    /// pinned.
    pub fn advance(&mut self, now_s: f64) {
        if let Some(row) = self.transition.get(&self.current) {
            if !row.is_empty() {
                let weights: Vec<f64> = row.iter().map(|(_, w)| *w).collect();
                if let Ok(dist) = WeightedIndex::new(&weights) {
                    let idx = dist.sample(&mut self.rng);
                    self.previous = self.current;
                    self.current = row[idx].0;
                }
            }
        }

        self.intensity = match self.active_burst(self.current, now_s) {
            Some(burst) => burst.intensity.clamp(0.0, 1.0),
            None => self.rng.gen_range(0.0..=1.0),
        };

        self.last_transition_s = now_s;
        self.next_transition_s = self.transition_after(now_s);
    }

    /// Rebuild a model from snapshot fields. The RNG restarts from the
    /// stored seed; the stream position is not preserved (deterministic
    /// replay across a save/load boundary is a non-goal).
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        transition: HashMap<WeatherCondition, Vec<(WeatherCondition, f64)>>,
        bursts: Vec<Burst>,
        seed: Option<u64>,
        current: WeatherCondition,
        previous: WeatherCondition,
        intensity: f64,
        last_transition_s: f64,
        next_transition_s: f64,
    ) -> Self {
        let mut model = Self::new(current, intensity, transition, bursts, seed);
        model.previous = previous;
        model.last_transition_s = last_transition_s;
        model.next_transition_s = next_transition_s;
        model
    }

    pub fn transition_matrix(
        &self,
    ) -> &HashMap<WeatherCondition, Vec<(WeatherCondition, f64)>> {
        &self.transition
    }

    pub fn previous_condition(&self) -> WeatherCondition {
        self.previous
    }

    pub fn last_transition_s(&self) -> f64 {
        self.last_transition_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_row(
        from: WeatherCondition,
        to: WeatherCondition,
    ) -> HashMap<WeatherCondition, Vec<(WeatherCondition, f64)>> {
        let mut m = HashMap::new();
        m.insert(from, vec![(to, 1.0)]);
        m
    }

    #[test]
    fn advance_follows_certain_transition() {
        let matrix = single_row(WeatherCondition::Clear, WeatherCondition::Storm);
        let mut model = WeatherModel::new(WeatherCondition::Clear, 0.2, matrix, vec![], Some(7));
        model.advance(10.0);
        assert_eq!(model.current_condition(), WeatherCondition::Storm);
        assert_eq!(model.previous_condition(), WeatherCondition::Clear);
    }

    #[test]
    fn burst_pins_intensity() {
        let matrix = single_row(WeatherCondition::Clear, WeatherCondition::Rain);
        let bursts = vec![Burst {
            condition: WeatherCondition::Rain,
            start_s: 0.0,
            duration_s: 30.0,
            intensity: 0.85,
        }];
        let mut model = WeatherModel::new(WeatherCondition::Clear, 0.0, matrix, bursts, Some(1));
        model.advance(5.0);
        assert_eq!(model.current_condition(), WeatherCondition::Rain);
        assert!((model.current_intensity() - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn active_burst_end_cuts_the_period_short() {
        let matrix = single_row(WeatherCondition::Rain, WeatherCondition::Rain);
        let bursts = vec![Burst {
            condition: WeatherCondition::Rain,
            start_s: 0.0,
            duration_s: 20.0,
            intensity: 1.0,
        }];
        let mut model = WeatherModel::new(WeatherCondition::Rain, 1.0, matrix, bursts, Some(3));
        model.advance(5.0);
        // Burst ends at 20 s, well before the 55 s period timer.
        assert!((model.next_transition_s() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn interpolated_multiplier_reaches_fixed_value() {
        let matrix = single_row(WeatherCondition::Clear, WeatherCondition::Storm);
        let mut model = WeatherModel::new(WeatherCondition::Clear, 0.0, matrix, vec![], Some(9));
        model.advance(100.0);
        let mid = model.speed_multiplier_interpolated(100.0 + TRANSITION_WINDOW_S / 2.0);
        assert!(mid > WeatherCondition::Storm.speed_multiplier());
        assert!(mid < WeatherCondition::Clear.speed_multiplier());
        let settled = model.speed_multiplier_interpolated(100.0 + TRANSITION_WINDOW_S);
        assert_eq!(settled, WeatherCondition::Storm.speed_multiplier());
    }

    #[test]
    fn condition_names_round_trip() {
        for condition in WeatherCondition::ALL {
            assert_eq!(WeatherCondition::parse(condition.as_str()), Some(condition));
        }
        assert_eq!(WeatherCondition::parse("hail"), None);
    }
}
