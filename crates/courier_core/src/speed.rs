//! Per-action speed computation and the speed → tiles-per-action step
//! function shared by the human and autonomous movement paths.

use crate::stamina::Resistance;

/// Default courier base speed, tiles per second.
pub const BASE_SPEED: f64 = 3.0;

/// Speed floor below which no movement is possible.
const MIN_MOVING_SPEED: f64 = 1.0;

/// Base seconds per move animation by distance; divided by the speed ratio
/// but never shrunk past the 2x floor.
const ANIMATION_TIME_1_TILE_S: f64 = 0.25;
const ANIMATION_TIME_2_TILES_S: f64 = 0.35;
const ANIMATION_TIME_LONG_S: f64 = 0.45;
const ANIMATION_SPEED_RATIO_FLOOR: f64 = 0.5;

pub fn weight_multiplier(weight: f64) -> f64 {
    (1.0 - 0.03 * weight).max(0.8)
}

pub fn reputation_multiplier(reputation: f64) -> f64 {
    if reputation >= 90.0 {
        1.03
    } else {
        1.0
    }
}

/// Inputs to one speed computation, assembled from the agent's vitals, the
/// weather model and the occupied tile.
#[derive(Debug, Clone, Copy)]
pub struct SpeedFactors {
    pub base_speed: f64,
    pub weather_multiplier: f64,
    pub weight: f64,
    pub reputation: f64,
    pub resistance: Resistance,
    pub surface_weight: f64,
}

impl SpeedFactors {
    pub fn compute(&self) -> f64 {
        let speed = self.base_speed
            * self.weather_multiplier
            * weight_multiplier(self.weight)
            * reputation_multiplier(self.reputation)
            * self.resistance.speed_multiplier()
            * self.surface_weight;
        speed.max(0.0)
    }
}

/// Tiles traversed by one movement action at the given speed.
pub fn movement_distance(speed: f64) -> u32 {
    if speed < MIN_MOVING_SPEED {
        0
    } else if speed < 2.0 {
        1
    } else if speed < 3.0 {
        2
    } else if speed < 4.0 {
        3
    } else if speed < 5.0 {
        4
    } else {
        ((speed / 3.0).floor() as u32).min(5)
    }
}

/// Progress gained per second while animating a move of `distance` tiles.
/// Longer moves get proportionally shorter per-tile time; the ratio floor
/// keeps slow couriers from crawling forever.
pub fn progress_rate(distance: u32, speed: f64) -> f64 {
    if distance == 0 || speed <= 0.0 {
        return 0.0;
    }
    let base_time = match distance {
        1 => ANIMATION_TIME_1_TILE_S,
        2 => ANIMATION_TIME_2_TILES_S,
        _ => ANIMATION_TIME_LONG_S,
    };
    let ratio = (speed / BASE_SPEED).max(ANIMATION_SPEED_RATIO_FLOOR);
    1.0 / (base_time / ratio)
}
