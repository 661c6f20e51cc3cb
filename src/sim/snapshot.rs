//! Read-only view handed to the renderer each frame

use serde::Serialize;

use super::state::{CarKind, GameState};
use crate::consts::*;

/// A car as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub x: f32,
    /// Top edge, centered in the lane
    pub y: f32,
    pub lane: usize,
    pub color: &'static str,
    #[serde(rename = "type")]
    pub kind: CarKind,
    /// Stylesheet class, `car-<type>`
    pub class: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
}

/// Per-frame state snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub obstacles: Vec<ObstacleView>,
    pub player: PlayerView,
    pub score: u64,
    pub speed: f32,
    /// Whole seconds survived (60 clock ticks per second)
    pub elapsed_secs: u64,
}

impl Snapshot {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            obstacles: state
                .obstacles
                .iter()
                .map(|car| ObstacleView {
                    id: car.id,
                    x: car.x,
                    y: car.y(),
                    lane: car.lane,
                    color: car.color(),
                    kind: car.kind,
                    class: car.kind.css_class(),
                })
                .collect(),
            player: PlayerView {
                x: PLAYER_X,
                y: state.player.y,
            },
            score: state.run.score,
            speed: state.run.speed,
            elapsed_secs: state.run.score / 60,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// HUD time label
    pub fn hud_time(&self) -> String {
        format!("{}s", self.elapsed_secs)
    }

    /// HUD speed label
    pub fn hud_speed(&self) -> String {
        format!("{:.1}x", self.speed)
    }

    /// Y offsets of the lane divider lines, top to bottom
    pub fn track_lines() -> [f32; TRACKS + 1] {
        std::array::from_fn(|i| i as f32 * TRACK_HEIGHT)
    }
}
