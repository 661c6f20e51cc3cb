//! Lane Dodge - A self-playing lane-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, clock, autopilot, player motion)
//! - `tuning`: Data-driven game balance
//! - `host`: Frame timing and page lifecycle around a run

pub mod host;
pub mod sim;
pub mod tuning;

pub use host::PageHost;
pub use sim::{Simulation, Snapshot};
pub use tuning::{Tuning, TuningError};

/// Play field geometry
pub mod consts {
    /// Number of horizontal lanes
    pub const TRACKS: usize = 5;
    /// Height of one lane in pixels
    pub const TRACK_HEIGHT: f32 = 120.0;

    /// Play field dimensions
    pub const GAME_WIDTH: f32 = 1200.0;
    pub const GAME_HEIGHT: f32 = TRACKS as f32 * TRACK_HEIGHT;

    /// Car sprite size
    pub const CAR_WIDTH: f32 = 80.0;
    pub const CAR_HEIGHT: f32 = 50.0;

    /// Player sprite is square
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Player never moves horizontally
    pub const PLAYER_X: f32 = GAME_WIDTH - 100.0;

    /// Lane the player starts in (middle, rounded down)
    pub const START_LANE: usize = TRACKS / 2;
}

use consts::*;

/// Top edge of a car centered in `lane`
#[inline]
pub fn lane_y(lane: usize) -> f32 {
    lane as f32 * TRACK_HEIGHT + (TRACK_HEIGHT - CAR_HEIGHT) / 2.0
}

/// Resting Y of the player centered in `lane`
#[inline]
pub fn player_lane_y(lane: usize) -> f32 {
    lane as f32 * TRACK_HEIGHT + (TRACK_HEIGHT - PLAYER_SIZE) / 2.0
}

/// Whether `lane` is a valid lane index
#[inline]
pub fn is_valid_lane(lane: usize) -> bool {
    lane < TRACKS
}
