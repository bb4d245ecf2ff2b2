//! Contract between the scheduler and whatever shows it.
//!
//! The scheduler never formats anything. It hands a [`Snapshot`] to a
//! [`PresentationAdapter`] on every change and asks it for a cue when a
//! session runs out. [`Render`] and [`CueProfile`] are the shared pieces a
//! host needs to honor the display and audio contracts.

use serde::Serialize;
use std::time::Duration;

use crate::error::CoreError;
use crate::storage::SoundKind;
use crate::timer::{SessionMode, Snapshot};

/// Inbound side of a display/audio host.
///
/// Implementations must return promptly. A slow sink stalls the countdown
/// frame it was called from (the lost time is still accounted for on the
/// next frame, but the display lags).
pub trait PresentationAdapter {
    /// Render the given state. The snapshot is the only source of truth.
    ///
    /// While running, countdown snapshots arrive at most once per whole
    /// second; frames that consume less than a second are silent.
    fn on_snapshot(&mut self, snapshot: &Snapshot);

    /// Play the cue for `sound`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AudioUnavailable`] when no cue could be produced.
    /// The scheduler logs it and carries on.
    fn on_session_complete(&mut self, sound: SoundKind) -> Result<(), CoreError>;
}

impl SessionMode {
    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            SessionMode::Work => "Work Time",
            SessionMode::ShortBreak => "Short Break",
            SessionMode::LongBreak => "Long Break",
        }
    }

    /// Style tag a host can key colours or themes on.
    pub fn style_tag(&self) -> &'static str {
        match self {
            SessionMode::Work => "work",
            SessionMode::ShortBreak => "short-break",
            SessionMode::LongBreak => "long-break",
        }
    }
}

/// `MM:SS`, zero padded. Minutes grow past two digits when needed.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Everything a host prints for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Render {
    pub clock: String,
    pub label: &'static str,
    pub cycle_label: String,
    pub style: &'static str,
    /// Window or tab title, `(MM:SS) <label>`.
    pub title: String,
    pub running: bool,
}

impl Render {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let clock = format_clock(snapshot.remaining_secs);
        let label = snapshot.mode.label();
        Self {
            title: format!("({clock}) {label}"),
            clock,
            label,
            cycle_label: snapshot.cycle_label(),
            style: snapshot.mode.style_tag(),
            running: snapshot.running,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decay {
    Exponential,
    Linear,
}

impl Decay {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decay::Exponential => "exponential",
            Decay::Linear => "linear",
        }
    }
}

/// Shape of an audible cue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CueProfile {
    pub frequency_hz: f32,
    pub duration: Duration,
    pub decay: Decay,
}

/// Level an exponential decay reaches at the end of the cue.
const EXPONENTIAL_FLOOR: f32 = 0.001;

impl CueProfile {
    /// Envelope gain in `0.0..=1.0` at `t` after the cue starts.
    pub fn gain_at(&self, t: Duration) -> f32 {
        if t >= self.duration || self.duration.is_zero() {
            return 0.0;
        }
        let progress = t.as_secs_f32() / self.duration.as_secs_f32();
        match self.decay {
            Decay::Exponential => EXPONENTIAL_FLOOR.powf(progress),
            Decay::Linear => 1.0 - progress,
        }
    }
}

impl SoundKind {
    /// Cue shape for this kind, `None` when the cue is suppressed.
    pub fn profile(&self) -> Option<CueProfile> {
        match self {
            SoundKind::Bell => Some(CueProfile {
                frequency_hz: 220.0,
                duration: Duration::from_millis(1_500),
                decay: Decay::Exponential,
            }),
            SoundKind::Chime => Some(CueProfile {
                frequency_hz: 880.0,
                duration: Duration::from_millis(1_000),
                decay: Decay::Linear,
            }),
            SoundKind::None => None,
        }
    }
}
