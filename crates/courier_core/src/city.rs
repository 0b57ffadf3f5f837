//! City map: immutable tile grid plus the legend describing each tile type.
//!
//! The grid is shared read-only by every agent; it is never mutated after
//! load. Coordinates are signed so callers can probe one-past-the-edge
//! positions without wrapping; out-of-bounds is treated as blocked.

use std::collections::HashMap;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

/// Legend entry for one tile character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSpec {
    pub name: String,
    pub blocked: bool,
    /// Speed multiplier applied while standing on this tile. Streets carry
    /// 1.0; rough terrain is below it.
    pub surface_weight: f64,
}

#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct CityMap {
    name: String,
    width: i32,
    height: i32,
    tiles: Vec<Vec<char>>,
    legend: HashMap<char, TileSpec>,
    goal_income: f64,
}

impl CityMap {
    pub fn new(
        name: String,
        tiles: Vec<Vec<char>>,
        legend: HashMap<char, TileSpec>,
        goal_income: f64,
    ) -> Self {
        let height = tiles.len() as i32;
        let width = tiles.first().map(|row| row.len()).unwrap_or(0) as i32;
        Self {
            name,
            width,
            height,
            tiles,
            legend,
            goal_income,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn goal_income(&self) -> f64 {
        self.goal_income
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<char> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.tiles[y as usize][x as usize])
    }

    pub fn tile_spec(&self, x: i32, y: i32) -> Option<&TileSpec> {
        self.tile(x, y).and_then(|t| self.legend.get(&t))
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Out of bounds counts as blocked; tiles missing from the legend are
    /// traversable.
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        match self.tile(x, y) {
            None => true,
            Some(t) => self.legend.get(&t).map(|s| s.blocked).unwrap_or(false),
        }
    }

    /// Surface multiplier of the tile the agent currently occupies.
    pub fn surface_weight(&self, x: i32, y: i32) -> f64 {
        self.tile_spec(x, y)
            .map(|s| s.surface_weight)
            .unwrap_or(1.0)
    }

    /// Street tiles: walkable with full surface speed. The lookahead search
    /// prefers these over rough terrain.
    pub fn is_street(&self, x: i32, y: i32) -> bool {
        self.tile_spec(x, y)
            .map(|s| !s.blocked && s.surface_weight >= 1.0)
            .unwrap_or(false)
    }

    pub fn walkable_tiles(&self) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if !self.is_blocked(x, y) {
                    out.push((x, y));
                }
            }
        }
        out
    }
}

/// Chebyshev distance; pickup/dropoff adjacency means a distance of at
/// most 1.
pub fn chebyshev(a: (i32, i32), b: (i32, i32)) -> i32 {
    (a.0 - b.0).abs().max((a.1 - b.1).abs())
}

pub fn manhattan(a: (i32, i32), b: (i32, i32)) -> i32 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}
