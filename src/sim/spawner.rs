//! Car spawning
//!
//! One car per spawn tick, in a random lane, entering just off the left edge.

use rand::Rng;

use super::state::{CarKind, GameState};
use crate::consts::*;
use crate::tuning::Tuning;

/// Milliseconds between spawns at the given game speed
///
/// Truncated to whole milliseconds, like a browser interval.
pub fn spawn_interval_ms(speed: f32, tuning: &Tuning) -> u64 {
    let interval = (tuning.spawn_interval_base_ms - speed * tuning.spawn_interval_slope_ms)
        .max(tuning.spawn_interval_floor_ms);
    interval as u64
}

/// Append one freshly spawned car; returns its ID
pub fn spawn_obstacle<R: Rng>(state: &mut GameState, rng: &mut R, tuning: &Tuning) -> u32 {
    let lane = rng.random_range(0..TRACKS);
    let jitter = if tuning.car_speed_jitter > 0.0 {
        rng.random_range(0.0..tuning.car_speed_jitter)
    } else {
        0.0
    };
    let speed = tuning.car_base_speed + jitter + tuning.car_speed_factor * state.run.speed;
    let kind = CarKind::ALL[rng.random_range(0..CarKind::ALL.len())];

    let id = state.push_obstacle(-CAR_WIDTH, lane, speed, kind);
    log::debug!(
        "Spawned {} #{} in lane {} at speed {:.2}",
        kind.as_str(),
        id,
        lane,
        speed
    );
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    #[test]
    fn test_interval_shrinks_with_speed() {
        let tuning = Tuning::default();
        assert_eq!(spawn_interval_ms(1.0, &tuning), 1020);
        assert_eq!(spawn_interval_ms(5.0, &tuning), 700);
        assert_eq!(spawn_interval_ms(8.0, &tuning), 460);
        // Floor only matters for speeds past the default cap
        assert_eq!(spawn_interval_ms(12.0, &tuning), 300);
    }

    #[test]
    fn test_interval_truncates() {
        let tuning = Tuning::default();
        // 1100 - 1.003 * 80 = 1019.76
        assert_eq!(spawn_interval_ms(1.003, &tuning), 1019);
    }

    #[test]
    fn test_spawn_appends_one_car_at_left_edge() {
        let tuning = Tuning::default();
        let mut state = GameState::new(3.0);
        let mut rng = Pcg32::seed_from_u64(7);

        let id = spawn_obstacle(&mut state, &mut rng, &tuning);
        assert_eq!(state.obstacles.len(), 1);
        let car = &state.obstacles[0];
        assert_eq!(car.id, id);
        assert_eq!(car.x, -CAR_WIDTH);
        assert!(car.lane < TRACKS);
        // 5 + [0, 5) + 1.0 * 3.0
        assert!(car.speed >= 8.0 && car.speed <= 13.0, "{}", car.speed);
    }

    #[test]
    fn test_spawns_cover_lanes_and_palette() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1.0);
        let mut rng = Pcg32::seed_from_u64(42);

        for _ in 0..500 {
            spawn_obstacle(&mut state, &mut rng, &tuning);
        }
        let lanes: HashSet<_> = state.obstacles.iter().map(|o| o.lane).collect();
        let kinds: HashSet<_> = state.obstacles.iter().map(|o| o.kind).collect();
        assert_eq!(lanes.len(), TRACKS);
        assert_eq!(kinds.len(), CarKind::ALL.len());
        assert!(state.lanes_in_range());
    }

    #[test]
    fn test_same_seed_same_cars() {
        let tuning = Tuning::default();
        let mut a = GameState::new(1.0);
        let mut b = GameState::new(1.0);
        let mut rng_a = Pcg32::seed_from_u64(99);
        let mut rng_b = Pcg32::seed_from_u64(99);

        for _ in 0..20 {
            spawn_obstacle(&mut a, &mut rng_a, &tuning);
            spawn_obstacle(&mut b, &mut rng_b, &tuning);
        }
        assert_eq!(a.obstacles, b.obstacles);
    }

    #[test]
    fn test_zero_jitter_is_deterministic_speed() {
        let tuning = Tuning {
            car_speed_jitter: 0.0,
            ..Default::default()
        };
        let mut state = GameState::new(2.0);
        let mut rng = Pcg32::seed_from_u64(1);
        spawn_obstacle(&mut state, &mut rng, &tuning);
        assert_eq!(state.obstacles[0].speed, 7.0);
    }
}
