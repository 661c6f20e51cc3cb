//! A running game: state, balance, randomness and the four loops
//!
//! The host calls [`Simulation::advance`] with wall-clock milliseconds and
//! reads [`Simulation::snapshot`] to draw. Each loop callback mutates the
//! state in one step, so the next callback never sees a half-applied update.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::avoidance::avoidance_tick;
use super::clock::clock_tick;
use super::motion::motion_tick;
use super::schedule::{LoopKind, Schedule};
use super::snapshot::Snapshot;
use super::spawner::{spawn_interval_ms, spawn_obstacle};
use super::state::GameState;
use crate::tuning::Tuning;

/// How many times each loop has fired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub clock: u64,
    pub motion: u64,
    pub avoidance: u64,
    pub spawn: u64,
}

impl LoopStats {
    fn record(&mut self, kind: LoopKind) {
        match kind {
            LoopKind::Clock => self.clock += 1,
            LoopKind::Motion => self.motion += 1,
            LoopKind::Avoidance => self.avoidance += 1,
            LoopKind::Spawn => self.spawn += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.clock + self.motion + self.avoidance + self.spawn
    }
}

pub struct Simulation<R = Pcg32> {
    state: GameState,
    tuning: Tuning,
    rng: R,
    schedule: Schedule,
    stats: LoopStats,
    disposed: bool,
}

impl Simulation<Pcg32> {
    /// Seeded run, reproducible for a given seed and tuning
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut sim = Self::with_rng(tuning, Pcg32::seed_from_u64(seed));
        sim.state.seed = Some(seed);
        log::info!("Run seed: {}", seed);
        sim
    }
}

impl<R: Rng> Simulation<R> {
    /// Run drawing lanes, speeds and kinds from `rng`
    ///
    /// An invalid `tuning` is replaced by the defaults.
    pub fn with_rng(tuning: Tuning, rng: R) -> Self {
        let tuning = tuning.or_default();
        let state = GameState::new(tuning.speed_start);
        let mut schedule = Schedule::new();

        // Same arming order as the page registers its loops
        schedule.arm(LoopKind::Motion, 0, tuning.motion_period_ms);
        schedule.arm(
            LoopKind::Spawn,
            0,
            spawn_interval_ms(state.run.speed, &tuning),
        );
        schedule.arm(LoopKind::Clock, 0, tuning.clock_period_ms);
        schedule.arm(LoopKind::Avoidance, 0, tuning.avoidance_period_ms);

        log::info!(
            "Simulation started ({} lanes, speed {:.1}x)",
            crate::consts::TRACKS,
            state.run.speed
        );

        Self {
            state,
            tuning,
            rng,
            schedule,
            stats: LoopStats::default(),
            disposed: false,
        }
    }

    /// Let `elapsed_ms` of virtual time pass, firing every loop that comes due
    ///
    /// Long frames are clamped to `max_frame_ms`. Returns the number of
    /// callbacks fired.
    pub fn advance(&mut self, elapsed_ms: u64) -> usize {
        if self.disposed {
            return 0;
        }

        let elapsed_ms = elapsed_ms.min(self.tuning.max_frame_ms);
        let until = self.state.time_ms + elapsed_ms;

        let mut fired = 0;
        while let Some((kind, due)) = self.schedule.next_due(until) {
            self.state.time_ms = due;
            self.fire(kind);
            fired += 1;
        }
        self.state.time_ms = until;

        debug_assert!(self.state.lanes_in_range());
        fired
    }

    /// Run one loop callback and queue its next period
    fn fire(&mut self, kind: LoopKind) {
        self.schedule.reschedule(kind);
        self.stats.record(kind);

        match kind {
            LoopKind::Clock => {
                let outcome = clock_tick(&mut self.state, &self.tuning);
                if outcome.speed_changed {
                    // Restarted, not shortened, whenever speed moves
                    let interval = spawn_interval_ms(self.state.run.speed, &self.tuning);
                    self.schedule
                        .arm(LoopKind::Spawn, self.state.time_ms, interval);
                }
            }
            LoopKind::Spawn => {
                spawn_obstacle(&mut self.state, &mut self.rng, &self.tuning);
            }
            LoopKind::Avoidance => {
                avoidance_tick(&mut self.state, &self.tuning);
            }
            LoopKind::Motion => {
                motion_tick(&mut self.state, &self.tuning);
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_state(&self.state)
    }

    /// Stop all four loops together; later `advance` calls do nothing
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.schedule.cancel_all();
        self.disposed = true;
        log::info!(
            "Simulation disposed at {}ms (score {}, {} callbacks)",
            self.state.time_ms,
            self.state.run.score,
            self.stats.total()
        );
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn now_ms(&self) -> u64 {
        self.state.time_ms
    }

    /// Deadline of the pending spawn, if the loops are running
    pub fn next_spawn_ms(&self) -> Option<u64> {
        self.schedule.due(LoopKind::Spawn)
    }
}
