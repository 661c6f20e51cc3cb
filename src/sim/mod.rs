//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual millisecond clock only
//! - Injected or seeded RNG only
//! - Cars kept in spawn order
//! - No rendering or platform dependencies

pub mod avoidance;
pub mod clock;
pub mod motion;
pub mod schedule;
pub mod simulation;
pub mod snapshot;
pub mod spawner;
pub mod state;

pub use avoidance::{avoidance_tick, danger_zone, in_danger, lane_counts, safest_lane};
pub use clock::{ClockOutcome, clock_tick};
pub use motion::motion_tick;
pub use schedule::{LoopKind, Schedule};
pub use simulation::{LoopStats, Simulation};
pub use snapshot::{ObstacleView, PlayerView, Snapshot};
pub use spawner::{spawn_interval_ms, spawn_obstacle};
pub use state::{CarKind, GameState, MotionState, Obstacle, PlayerState, RunState};
