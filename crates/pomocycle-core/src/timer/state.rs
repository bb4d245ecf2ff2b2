use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::mode::{SessionMode, WORK_SESSIONS_PER_CYCLE};
use crate::storage::Configuration;

/// Mutable session state owned by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub mode: SessionMode,
    pub remaining_secs: u64,
    pub running: bool,
    /// Which work session (1..=3) is active or was last active.
    pub cycle: u8,
}

impl SessionState {
    /// First work session of a fresh cycle, stopped.
    pub fn initial(cfg: &Configuration) -> Self {
        Self {
            mode: SessionMode::Work,
            remaining_secs: SessionMode::Work.duration_secs(cfg),
            running: false,
            cycle: 1,
        }
    }

    /// State after `secs` whole seconds of countdown. Clamps at zero.
    pub fn elapsed(self, secs: u64) -> Self {
        Self {
            remaining_secs: self.remaining_secs.saturating_sub(secs),
            ..self
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            running: self.running,
            cycle: self.cycle,
        }
    }
}

/// What a presenter gets on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: SessionMode,
    pub remaining_secs: u64,
    pub running: bool,
    pub cycle: u8,
}

impl Snapshot {
    pub fn cycle_label(&self) -> String {
        format!("Cycle {}/{}", self.cycle, WORK_SESSIONS_PER_CYCLE)
    }
}

/// Whole seconds between a tick origin and `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    pub whole_secs: u64,
    /// Origin moved forward by exactly `whole_secs`; the sub-second
    /// remainder stays between it and `now`.
    pub origin: Duration,
}

/// Count whole seconds from `origin` to `now` without dropping the fraction.
///
/// A `now` before `origin` counts as zero elapsed.
pub fn whole_seconds_since(origin: Duration, now: Duration) -> Elapsed {
    let whole_secs = now.saturating_sub(origin).as_secs();
    Elapsed {
        whole_secs,
        origin: origin + Duration::from_secs(whole_secs),
    }
}
