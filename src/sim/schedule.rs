//! Virtual-time timer queue
//!
//! Hosts the periodic loops on one single-threaded clock. Timers fire in
//! deadline order; equal deadlines fire in the order they were armed, the
//! same rule a browser event loop applies to intervals.

use serde::{Deserialize, Serialize};

/// The periodic loops driving a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoopKind {
    /// Player easing
    Motion,
    /// Car spawning
    Spawn,
    /// Car movement, score and speed
    Clock,
    /// Autopilot decisions
    Avoidance,
}

#[derive(Debug, Clone)]
struct Timer {
    kind: LoopKind,
    period_ms: u64,
    due_ms: u64,
    /// Arming order, breaks deadline ties
    seq: u64,
}

/// Pending timers, at most one per loop
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    timers: Vec<Timer>,
    next_seq: u64,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) `kind`, first firing `period_ms` after `now_ms`
    ///
    /// A running timer of the same kind is replaced, not adjusted.
    pub fn arm(&mut self, kind: LoopKind, now_ms: u64, period_ms: u64) {
        debug_assert!(period_ms > 0, "{kind:?} period must be positive");
        self.timers.retain(|t| t.kind != kind);
        let seq = self.bump_seq();
        self.timers.push(Timer {
            kind,
            period_ms,
            due_ms: now_ms + period_ms,
            seq,
        });
    }

    /// Earliest timer due at or before `until_ms`
    pub fn next_due(&self, until_ms: u64) -> Option<(LoopKind, u64)> {
        self.timers
            .iter()
            .filter(|t| t.due_ms <= until_ms)
            .min_by_key(|t| (t.due_ms, t.seq))
            .map(|t| (t.kind, t.due_ms))
    }

    /// Queue the next period of `kind` after it fired
    pub fn reschedule(&mut self, kind: LoopKind) {
        let seq = self.bump_seq();
        if let Some(timer) = self.timers.iter_mut().find(|t| t.kind == kind) {
            timer.due_ms += timer.period_ms;
            timer.seq = seq;
        }
    }

    pub fn period(&self, kind: LoopKind) -> Option<u64> {
        self.timers.iter().find(|t| t.kind == kind).map(|t| t.period_ms)
    }

    pub fn due(&self, kind: LoopKind) -> Option<u64> {
        self.timers.iter().find(|t| t.kind == kind).map(|t| t.due_ms)
    }

    /// Drop every timer at once
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}
