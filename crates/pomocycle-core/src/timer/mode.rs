use serde::{Deserialize, Serialize};

use crate::storage::Configuration;

/// Work sessions per cycle; the last one is followed by a long break.
pub const WORK_SESSIONS_PER_CYCLE: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionMode {
    /// Full length of this mode under `cfg`, in seconds.
    pub fn duration_secs(&self, cfg: &Configuration) -> u64 {
        match self {
            SessionMode::Work => cfg.work_secs(),
            SessionMode::ShortBreak => cfg.short_secs(),
            SessionMode::LongBreak => cfg.long_secs(),
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, SessionMode::Work)
    }
}

/// Mode and cycle position that follow `mode` once it completes.
///
/// ```text
/// Work(c < 3) -> ShortBreak       (c)
/// Work(c >= 3) -> LongBreak       (c)
/// ShortBreak   -> Work            (c + 1)
/// LongBreak    -> Work            (1)
/// ```
pub fn next_session(mode: SessionMode, cycle: u8) -> (SessionMode, u8) {
    match mode {
        SessionMode::Work if cycle >= WORK_SESSIONS_PER_CYCLE => (SessionMode::LongBreak, cycle),
        SessionMode::Work => (SessionMode::ShortBreak, cycle),
        SessionMode::ShortBreak => (SessionMode::Work, cycle.saturating_add(1)),
        SessionMode::LongBreak => (SessionMode::Work, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle_sequence() {
        let mut at = (SessionMode::Work, 1);
        let mut seen = vec![at];
        for _ in 0..6 {
            at = next_session(at.0, at.1);
            seen.push(at);
        }
        assert_eq!(
            seen,
            vec![
                (SessionMode::Work, 1),
                (SessionMode::ShortBreak, 1),
                (SessionMode::Work, 2),
                (SessionMode::ShortBreak, 2),
                (SessionMode::Work, 3),
                (SessionMode::LongBreak, 3),
                (SessionMode::Work, 1),
            ]
        );
    }

    #[test]
    fn durations_follow_config() {
        let cfg = Configuration {
            work: 2,
            short: 3,
            long: 4,
            ..Configuration::default()
        };
        assert_eq!(SessionMode::Work.duration_secs(&cfg), 120);
        assert_eq!(SessionMode::ShortBreak.duration_secs(&cfg), 180);
        assert_eq!(SessionMode::LongBreak.duration_secs(&cfg), 240);
        assert!(SessionMode::LongBreak.is_break());
        assert!(!SessionMode::Work.is_break());
    }
}
