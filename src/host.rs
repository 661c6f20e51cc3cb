//! Page lifecycle around a running simulation
//!
//! Turns animation-frame timestamps into `advance` calls and decides what
//! tab hiding and page hide/show do to the run.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::sim::{Simulation, Snapshot};

pub struct PageHost<R = Pcg32> {
    sim: Simulation<R>,
    /// Timestamp of the last frame that advanced the run
    last_time: Option<f64>,
    /// Tab hidden
    hidden: bool,
    /// Page parked in the back/forward cache
    frozen: bool,
}

impl<R: Rng> PageHost<R> {
    pub fn new(sim: Simulation<R>) -> Self {
        Self {
            sim,
            last_time: None,
            hidden: false,
            frozen: false,
        }
    }

    /// Handle one animation frame; `None` once the run is disposed
    pub fn frame(&mut self, time: f64) -> Option<Snapshot> {
        if self.sim.is_disposed() {
            return None;
        }
        if self.is_paused() {
            self.last_time = None;
            return Some(self.sim.snapshot());
        }

        match self.last_time {
            Some(last) => {
                let elapsed = (time - last).max(0.0) as u64;
                // Keep the fractional remainder for the next frame
                self.last_time = Some(last + elapsed as f64);
                self.sim.advance(elapsed);
            }
            None => self.last_time = Some(time),
        }
        Some(self.sim.snapshot())
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        if hidden != self.hidden {
            self.hidden = hidden;
            log::info!("{} (tab visibility)", if hidden { "Paused" } else { "Resumed" });
        }
    }

    /// `pagehide`: a cached page is only paused, anything else ends the run
    pub fn page_hide(&mut self, persisted: bool) {
        if persisted {
            self.frozen = true;
            log::info!("Paused (page cached)");
        } else {
            self.sim.dispose();
        }
    }

    /// `pageshow`: resume a page restored from the cache
    pub fn page_show(&mut self) {
        if self.frozen {
            self.frozen = false;
            self.last_time = None;
            log::info!("Resumed (page restored)");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.hidden || self.frozen
    }

    pub fn sim(&self) -> &Simulation<R> {
        &self.sim
    }
}
