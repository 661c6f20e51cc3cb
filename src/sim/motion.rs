//! Player lane-change easing
//!
//! Each tick covers a fixed fraction of the remaining distance to the
//! target lane, then snaps once close enough.

use super::state::{GameState, MotionState};
use crate::player_lane_y;
use crate::tuning::Tuning;

/// Ease the player one tick toward its target lane
pub fn motion_tick(state: &mut GameState, tuning: &Tuning) -> MotionState {
    let player = &mut state.player;
    let target_y = player_lane_y(player.target_lane);
    let diff = target_y - player.y;

    if diff.abs() < tuning.snap_epsilon {
        if player.current_lane != player.target_lane {
            log::debug!(
                "Player settled: lane {} -> {}",
                player.current_lane,
                player.target_lane
            );
        }
        player.y = target_y;
        player.current_lane = player.target_lane;
        return MotionState::Settled {
            lane: player.current_lane,
        };
    }

    player.y += diff * tuning.ease_factor;
    MotionState::Transitioning {
        from: player.current_lane,
        to: player.target_lane,
    }
}
