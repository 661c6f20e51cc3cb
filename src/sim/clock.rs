//! Fixed-rate simulation clock
//!
//! Moves every car along its lane, drops the ones that left the field,
//! and ramps score and speed. Runs whether or not the player is mid-lane-change.

use super::state::{GameState, Obstacle};
use crate::tuning::Tuning;

/// What a single clock tick changed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockOutcome {
    /// Cars that drove off the right edge this tick
    pub removed: usize,
    /// Speed moved, so the spawn timer must be re-armed
    pub speed_changed: bool,
}

/// Advance the run by one clock tick
pub fn clock_tick(state: &mut GameState, tuning: &Tuning) -> ClockOutcome {
    let before = state.obstacles.len();

    // Move and prune as one replacement of the collection
    state.obstacles = std::mem::take(&mut state.obstacles)
        .into_iter()
        .map(|car| Obstacle {
            x: car.x + car.speed,
            ..car
        })
        .filter(|car| !car.is_off_screen())
        .collect();

    let removed = before - state.obstacles.len();
    if removed > 0 {
        log::trace!("{} car(s) left the field", removed);
    }

    state.run.score += 1;

    let previous = state.run.speed;
    state.run.speed = (previous + tuning.speed_increment).min(tuning.speed_max);

    ClockOutcome {
        removed,
        speed_changed: state.run.speed != previous,
    }
}
