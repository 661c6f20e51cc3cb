//! Autopilot lane choice
//!
//! Looks at the cars bearing down on the player and picks the emptiest lane.
//! Only ever writes `player.target_lane`; the car list is read-only here.

use super::state::{GameState, Obstacle};
use crate::consts::*;
use crate::tuning::Tuning;

/// How far back from the player a car is considered a threat
pub fn danger_zone(speed: f32, tuning: &Tuning) -> f32 {
    tuning.danger_zone_base + speed * tuning.danger_zone_per_speed
}

/// Cars per lane with `x` strictly inside `(min_x, max_x)`
pub fn lane_counts(obstacles: &[Obstacle], min_x: f32, max_x: f32) -> [usize; TRACKS] {
    let mut counts = [0; TRACKS];
    for car in obstacles.iter().filter(|car| car.within(min_x, max_x)) {
        counts[car.lane] += 1;
    }
    counts
}

/// Lane with the fewest cars; ties go to the lowest index
pub fn safest_lane(counts: &[usize]) -> usize {
    counts
        .iter()
        .enumerate()
        .fold((0, usize::MAX), |(best, best_count), (lane, &count)| {
            if count < best_count {
                (lane, count)
            } else {
                (best, best_count)
            }
        })
        .0
}

/// Any car inside the danger window of the player's current lane
pub fn in_danger(state: &GameState, tuning: &Tuning) -> bool {
    let zone = danger_zone(state.run.speed, tuning);
    let lane = state.player.current_lane;
    state
        .obstacles
        .iter()
        .any(|car| car.lane == lane && car.within(PLAYER_X - zone, PLAYER_X + tuning.threat_ahead))
}

/// Run one autopilot decision; returns the new target lane if it changed
pub fn avoidance_tick(state: &mut GameState, tuning: &Tuning) -> Option<usize> {
    if !in_danger(state, tuning) {
        return None;
    }

    let zone = danger_zone(state.run.speed, tuning);
    let counts = lane_counts(&state.obstacles, PLAYER_X - zone, PLAYER_X + tuning.safety_ahead);
    let safest = safest_lane(&counts);

    let player = &mut state.player;
    // A lane change already in flight is never retargeted
    if safest == player.target_lane || !player.is_near_lane(tuning.settle_tolerance) {
        return None;
    }

    log::debug!(
        "Autopilot: lane {} -> {} (counts {:?})",
        player.current_lane,
        safest,
        counts
    );
    player.target_lane = safest;
    Some(safest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player_lane_y;
    use crate::sim::state::CarKind;
    use proptest::prelude::*;

    fn settled_state(lane: usize) -> GameState {
        let mut state = GameState::new(1.0);
        state.player = crate::sim::state::PlayerState::settled_in(lane);
        state
    }

    #[test]
    fn test_safest_lane_ties_go_low() {
        assert_eq!(safest_lane(&[2, 0, 0, 3, 1]), 1);
        assert_eq!(safest_lane(&[0, 0, 0, 0, 0]), 0);
        assert_eq!(safest_lane(&[3, 2, 1, 1, 4]), 2);
        assert_eq!(safest_lane(&[5, 5, 5, 5, 0]), 4);
    }

    #[test]
    fn test_danger_zone_grows_with_speed() {
        let tuning = Tuning::default();
        assert_eq!(danger_zone(1.0, &tuning), 220.0);
        assert_eq!(danger_zone(8.0, &tuning), 360.0);
    }

    #[test]
    fn test_dodges_to_first_empty_lane() {
        let tuning = Tuning::default();
        let mut state = settled_state(2);
        state.push_obstacle(PLAYER_X - 50.0, 2, 8.0, CarKind::Truck);

        assert_eq!(avoidance_tick(&mut state, &tuning), Some(0));
        assert_eq!(state.player.target_lane, 0);
        assert_eq!(state.player.current_lane, 2);
    }

    #[test]
    fn test_prefers_lane_with_fewest_cars() {
        let tuning = Tuning::default();
        let mut state = settled_state(0);
        state.push_obstacle(PLAYER_X - 10.0, 0, 8.0, CarKind::Truck);
        // Lanes 1-3 busy, lane 4 clear
        for lane in 1..4 {
            state.push_obstacle(PLAYER_X + 50.0, lane, 8.0, CarKind::Sedan);
        }

        assert_eq!(avoidance_tick(&mut state, &tuning), Some(4));
    }

    #[test]
    fn test_no_danger_is_noop() {
        let tuning = Tuning::default();
        let mut state = settled_state(2);
        // Far behind the danger window, and a car in another lane
        state.push_obstacle(100.0, 2, 8.0, CarKind::Taxi);
        state.push_obstacle(PLAYER_X - 10.0, 3, 8.0, CarKind::Taxi);
        let before = state.clone();

        assert_eq!(avoidance_tick(&mut state, &tuning), None);
        assert_eq!(state.player, before.player);
        assert_eq!(state.obstacles, before.obstacles);
    }

    #[test]
    fn test_car_past_threat_margin_is_ignored() {
        let tuning = Tuning::default();
        let mut state = settled_state(2);
        // Between the threat margin (+60) and the safety margin (+100)
        state.push_obstacle(PLAYER_X + 80.0, 2, 8.0, CarKind::Police);
        assert!(!in_danger(&state, &tuning));
        assert_eq!(avoidance_tick(&mut state, &tuning), None);
    }

    #[test]
    fn test_window_scales_with_speed() {
        let tuning = Tuning::default();
        let mut state = settled_state(2);
        state.push_obstacle(PLAYER_X - 300.0, 2, 8.0, CarKind::Sports);

        assert!(!in_danger(&state, &tuning));
        state.run.speed = 8.0;
        assert!(in_danger(&state, &tuning));
    }

    #[test]
    fn test_current_lane_safest_keeps_target() {
        let tuning = Tuning::default();
        let mut state = settled_state(0);
        state.push_obstacle(PLAYER_X - 10.0, 0, 8.0, CarKind::Truck);
        for lane in 1..TRACKS {
            state.push_obstacle(PLAYER_X - 20.0, lane, 8.0, CarKind::Sedan);
            state.push_obstacle(PLAYER_X - 40.0, lane, 8.0, CarKind::Sedan);
        }
        assert_eq!(avoidance_tick(&mut state, &tuning), None);
        assert_eq!(state.player.target_lane, 0);
    }

    #[test]
    fn test_mid_flight_is_not_retargeted() {
        let tuning = Tuning::default();
        let mut state = settled_state(2);
        state.player.target_lane = 3;
        state.player.y = player_lane_y(2) + 10.0;
        state.push_obstacle(PLAYER_X - 50.0, 2, 8.0, CarKind::Truck);

        assert_eq!(avoidance_tick(&mut state, &tuning), None);
        assert_eq!(state.player.target_lane, 3);

        // Just inside the settle tolerance a new target is accepted
        state.player.y = player_lane_y(2) + 9.5;
        assert_eq!(avoidance_tick(&mut state, &tuning), Some(0));
    }

    proptest! {
        #[test]
        fn prop_unsettled_player_keeps_target(
            current in 0..TRACKS,
            target in 0..TRACKS,
            offset in 10.0f32..240.0,
            below in any::<bool>(),
            cars in prop::collection::vec((0.0f32..GAME_WIDTH, 0..TRACKS), 0..20),
        ) {
            let tuning = Tuning::default();
            let mut state = settled_state(current);
            state.player.target_lane = target;
            let rest = player_lane_y(current);
            state.player.y = if below { rest + offset } else { rest - offset };
            for (x, lane) in cars {
                state.push_obstacle(x, lane, 8.0, CarKind::Sedan);
            }

            prop_assert_eq!(avoidance_tick(&mut state, &tuning), None);
            prop_assert_eq!(state.player.target_lane, target);
        }

        #[test]
        fn prop_target_stays_in_range(
            current in 0..TRACKS,
            cars in prop::collection::vec((0.0f32..GAME_WIDTH, 0..TRACKS), 0..40),
        ) {
            let tuning = Tuning::default();
            let mut state = settled_state(current);
            for (x, lane) in cars {
                state.push_obstacle(x, lane, 8.0, CarKind::Sedan);
            }
            let before = state.obstacles.clone();

            avoidance_tick(&mut state, &tuning);
            prop_assert!(state.lanes_in_range());
            prop_assert_eq!(state.obstacles, before);
        }
    }
}
