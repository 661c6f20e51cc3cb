//! Game state and core simulation types
//!
//! Everything the four loops read or write lives in [`GameState`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{is_valid_lane, lane_y, player_lane_y};

/// Car palette (kind + display color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarKind {
    Sports,
    Sedan,
    Truck,
    Taxi,
    Police,
    Luxury,
    Electric,
}

impl CarKind {
    /// Full palette, in draw order
    pub const ALL: [CarKind; 7] = [
        CarKind::Sports,
        CarKind::Sedan,
        CarKind::Truck,
        CarKind::Taxi,
        CarKind::Police,
        CarKind::Luxury,
        CarKind::Electric,
    ];

    pub fn color(&self) -> &'static str {
        match self {
            CarKind::Sports => "#FF1744",
            CarKind::Sedan => "#00E676",
            CarKind::Truck => "#FF9100",
            CarKind::Taxi => "#E91E63",
            CarKind::Police => "#2196F3",
            CarKind::Luxury => "#9C27B0",
            CarKind::Electric => "#00BCD4",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CarKind::Sports => "sports",
            CarKind::Sedan => "sedan",
            CarKind::Truck => "truck",
            CarKind::Taxi => "taxi",
            CarKind::Police => "police",
            CarKind::Luxury => "luxury",
            CarKind::Electric => "electric",
        }
    }

    /// CSS class used by the page stylesheet
    pub fn css_class(&self) -> String {
        format!("car-{}", self.as_str())
    }
}

/// An oncoming car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge, grows every clock tick
    pub x: f32,
    pub lane: usize,
    /// Pixels per clock tick
    pub speed: f32,
    pub kind: CarKind,
}

impl Obstacle {
    pub fn color(&self) -> &'static str {
        self.kind.color()
    }

    /// Top edge for rendering
    pub fn y(&self) -> f32 {
        lane_y(self.lane)
    }

    /// Past the right edge of the field
    pub fn is_off_screen(&self) -> bool {
        self.x >= GAME_WIDTH + CAR_WIDTH
    }

    /// Strictly inside `(min_x, max_x)`
    pub fn within(&self, min_x: f32, max_x: f32) -> bool {
        self.x > min_x && self.x < max_x
    }
}

/// Player lane-change phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    /// Resting in a lane
    Settled { lane: usize },
    /// Easing between lanes
    Transitioning { from: usize, to: usize },
}

/// The autopiloted player sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Last lane the player fully occupied
    pub current_lane: usize,
    /// Lane the autopilot wants
    pub target_lane: usize,
    /// Interpolated top edge in pixels
    pub y: f32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::settled_in(START_LANE)
    }
}

impl PlayerState {
    /// Player resting in `lane`
    pub fn settled_in(lane: usize) -> Self {
        debug_assert!(is_valid_lane(lane), "lane {lane} out of range");
        Self {
            current_lane: lane,
            target_lane: lane,
            y: player_lane_y(lane),
        }
    }

    pub fn motion(&self) -> MotionState {
        if self.current_lane == self.target_lane && self.y == player_lane_y(self.current_lane) {
            MotionState::Settled {
                lane: self.current_lane,
            }
        } else {
            MotionState::Transitioning {
                from: self.current_lane,
                to: self.target_lane,
            }
        }
    }

    /// Vertical distance from the current lane's resting position
    pub fn offset_from_lane(&self) -> f32 {
        (self.y - player_lane_y(self.current_lane)).abs()
    }

    /// Close enough to the current lane to accept a new target
    pub fn is_near_lane(&self, tolerance: f32) -> bool {
        self.offset_from_lane() < tolerance
    }
}

/// Score and difficulty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    /// Clock ticks survived
    pub score: u64,
    pub speed: f32,
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the run was started with (None when the caller supplied the RNG)
    pub seed: Option<u64>,
    /// Cars on the field, in spawn order
    pub obstacles: Vec<Obstacle>,
    pub player: PlayerState,
    pub run: RunState,
    /// Virtual milliseconds since start
    pub time_ms: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh run: no cars, player settled in the middle lane
    pub fn new(speed_start: f32) -> Self {
        Self {
            seed: None,
            obstacles: Vec::new(),
            player: PlayerState::default(),
            run: RunState {
                score: 0,
                speed: speed_start,
            },
            time_ms: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place a car directly (scenarios and tests)
    pub fn push_obstacle(&mut self, x: f32, lane: usize, speed: f32, kind: CarKind) -> u32 {
        debug_assert!(is_valid_lane(lane), "lane {lane} out of range");
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle {
            id,
            x,
            lane,
            speed,
            kind,
        });
        id
    }

    /// Every lane index held anywhere in the state is in range
    pub fn lanes_in_range(&self) -> bool {
        is_valid_lane(self.player.current_lane)
            && is_valid_lane(self.player.target_lane)
            && self.obstacles.iter().all(|o| is_valid_lane(o.lane))
    }
}
