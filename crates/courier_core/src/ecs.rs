use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::speed::BASE_SPEED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentKind {
    Human,
    Bot,
}

/// One courier, human-driven or autonomous. Carried weight is derived from
/// the agent's job board, never stored here.
#[derive(Debug, Clone, Component, Serialize, Deserialize)]
pub struct Courier {
    pub kind: AgentKind,
    pub name: String,
    pub base_speed: f64,
}

impl Courier {
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            kind: AgentKind::Human,
            name: name.into(),
            base_speed: BASE_SPEED,
        }
    }

    pub fn bot(name: impl Into<String>) -> Self {
        Self {
            kind: AgentKind::Bot,
            name: name.into(),
            base_speed: BASE_SPEED,
        }
    }
}

/// Tile position. Movement snaps this to the target when the animation
/// completes; mid-move interpolation lives in [`Motion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn tile(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    /// Facing for a move toward `target`; horizontal movement wins ties,
    /// matching how the sprite layer picks its frames.
    pub fn toward(from: (i32, i32), target: (i32, i32)) -> Self {
        if target.0 > from.0 {
            Facing::Right
        } else if target.0 < from.0 {
            Facing::Left
        } else if target.1 > from.1 {
            Facing::Down
        } else {
            Facing::Up
        }
    }
}

/// In-flight movement state: target tile, normalized progress, and the
/// per-second progress rate computed when the move started.
#[derive(Debug, Clone, Copy, Component, Serialize, Deserialize)]
pub struct Motion {
    pub moving: bool,
    pub target: (i32, i32),
    pub progress: f64,
    pub rate: f64,
    pub facing: Facing,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            moving: false,
            target: (0, 0),
            progress: 0.0,
            rate: 0.0,
            facing: Facing::Down,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, Component, Serialize, Deserialize)]
pub struct Wallet {
    pub earnings: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_prefers_horizontal_axis() {
        assert_eq!(Facing::toward((0, 0), (2, 5)), Facing::Right);
        assert_eq!(Facing::toward((3, 0), (1, 5)), Facing::Left);
        assert_eq!(Facing::toward((0, 0), (0, 2)), Facing::Down);
        assert_eq!(Facing::toward((0, 2), (0, 0)), Facing::Up);
    }
}
