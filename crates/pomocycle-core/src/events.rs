use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::presentation::format_clock;
use crate::storage::SoundKind;
use crate::timer::Snapshot;

/// Timestamped record of what a presenter was told.
/// Headless hosts write these out one per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    StateSnapshot {
        #[serde(flatten)]
        snapshot: Snapshot,
        /// `remaining_secs` as `MM:SS`.
        clock: String,
        at: DateTime<Utc>,
    },
    CueRequested {
        sound: SoundKind,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn snapshot(snapshot: &Snapshot) -> Self {
        Event::StateSnapshot {
            snapshot: *snapshot,
            clock: format_clock(snapshot.remaining_secs),
            at: Utc::now(),
        }
    }

    pub fn cue(sound: SoundKind) -> Self {
        Event::CueRequested {
            sound,
            at: Utc::now(),
        }
    }
}
