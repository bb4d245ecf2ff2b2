//! Session scheduler.
//!
//! The scheduler is a monotonic-clock state machine. It owns no thread and
//! no timer: while running it keeps exactly one frame request outstanding,
//! and the host is responsible for handing that frame back via
//! [`SessionScheduler::fire_frame`] (or calling [`SessionScheduler::tick`]
//! directly with a reading of its own).
//!
//! ## Session sequence
//!
//! ```text
//! Work(1) -> Short -> Work(2) -> Short -> Work(3) -> Long -> Work(1) ...
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut scheduler = SessionScheduler::new(config, presenter, MonotonicClock::new())?;
//! scheduler.reset();
//! scheduler.start();
//! // In the host loop:
//! if let Some(frame) = scheduler.pending_frame() {
//!     scheduler.fire_frame(frame);
//! }
//! ```

use std::time::Duration;

use super::clock::{Clock, MonotonicClock};
use super::frame::{FrameHandle, FrameSlot};
use super::mode::next_session;
use super::state::{whole_seconds_since, SessionState, Snapshot};
use crate::error::CoreError;
use crate::presentation::PresentationAdapter;
use crate::storage::{Configuration, SoundKind};

/// Drives one Pomodoro cycle and reports every change to `P`.
#[derive(Debug)]
pub struct SessionScheduler<P, C = MonotonicClock> {
    config: Configuration,
    state: SessionState,
    /// Clock reading up to which whole seconds have been accounted.
    /// Only set while running.
    tick_origin: Option<Duration>,
    frames: FrameSlot,
    presenter: P,
    clock: C,
}

impl<P: PresentationAdapter, C: Clock> SessionScheduler<P, C> {
    /// Create a stopped scheduler at the first work session.
    ///
    /// Nothing is sent to the presenter until the first operation; hosts
    /// usually call [`reset`](Self::reset) to get an initial render.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfiguration`] if a duration is zero.
    pub fn new(config: Configuration, presenter: P, clock: C) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            config,
            state: SessionState::initial(&config),
            tick_origin: None,
            frames: FrameSlot::default(),
            presenter,
            clock,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// The frame the host should deliver next, if running.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.frames.pending()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace durations and options.
    ///
    /// The current countdown is left alone; call [`reset`](Self::reset) to
    /// start over with the new durations.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfiguration`] and keeps the previous
    /// configuration if a duration is zero.
    pub fn configure(&mut self, config: Configuration) -> Result<(), CoreError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Back to the first work session, stopped.
    pub fn reset(&mut self) {
        self.halt();
        self.state = SessionState::initial(&self.config);
        tracing::debug!("session reset");
        self.notify();
    }

    pub fn start(&mut self) {
        if self.state.running {
            return;
        }
        self.state.running = true;
        self.tick_origin = Some(self.clock.now());
        self.frames.request();
        self.notify();
    }

    pub fn pause(&mut self) {
        if !self.state.running {
            return;
        }
        self.halt();
        self.notify();
    }

    /// Finish the current session now, without a cue.
    pub fn skip(&mut self) {
        self.pause();
        self.complete_session(true);
    }

    /// Account for time up to `now`.
    ///
    /// Only whole seconds are counted; the fractional part stays pending
    /// for the next call, so jittery frames neither gain nor lose time.
    /// Ignored while stopped.
    pub fn tick(&mut self, now: Duration) {
        let Some(origin) = self.tick_origin.filter(|_| self.state.running) else {
            return;
        };
        let elapsed = whole_seconds_since(origin, now);
        if elapsed.whole_secs == 0 {
            return;
        }
        self.tick_origin = Some(elapsed.origin);
        self.state = self.state.elapsed(elapsed.whole_secs);

        if self.state.remaining_secs == 0 {
            self.complete_session(false);
        } else {
            self.notify();
        }
    }

    /// Deliver a frame requested earlier.
    ///
    /// Returns `false` and does nothing if `handle` was cancelled or
    /// superseded. Otherwise ticks at the clock's current reading and, while
    /// still running, requests the next frame.
    pub fn fire_frame(&mut self, handle: FrameHandle) -> bool {
        if !self.frames.take(handle) {
            return false;
        }
        self.tick(self.clock.now());
        if self.state.running && self.frames.pending().is_none() {
            self.frames.request();
        }
        true
    }

    /// End the current session and move to the next one.
    ///
    /// Renders the zero state first, then plays the cue unless `skipped`
    /// or sound is off. With auto-advance the next session starts at once.
    pub fn complete_session(&mut self, skipped: bool) {
        self.halt();
        self.state.remaining_secs = 0;
        self.notify();

        let sound = self.config.sound;
        if !skipped && sound != SoundKind::None {
            if let Err(e) = self.presenter.on_session_complete(sound) {
                tracing::warn!(error = %e, %sound, "session cue skipped");
            }
        }

        let finished = self.state.mode;
        let (mode, cycle) = next_session(finished, self.state.cycle);
        self.state.mode = mode;
        self.state.cycle = cycle;
        self.state.remaining_secs = mode.duration_secs(&self.config);
        tracing::debug!(from = ?finished, to = ?mode, cycle, skipped, "session complete");

        if self.config.auto_advance {
            self.start();
        } else {
            self.notify();
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn halt(&mut self) {
        self.state.running = false;
        self.tick_origin = None;
        self.frames.cancel();
    }

    fn notify(&mut self) {
        let snapshot = self.state.snapshot();
        self.presenter.on_snapshot(&snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{ManualClock, SessionMode};

    #[derive(Debug, Default)]
    struct Recorder {
        snapshots: Vec<Snapshot>,
        cues: Vec<SoundKind>,
    }

    impl PresentationAdapter for Recorder {
        fn on_snapshot(&mut self, snapshot: &Snapshot) {
            self.snapshots.push(*snapshot);
        }

        fn on_session_complete(&mut self, sound: SoundKind) -> Result<(), CoreError> {
            self.cues.push(sound);
            Ok(())
        }
    }

    fn scheduler(config: Configuration) -> (SessionScheduler<Recorder, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let s = SessionScheduler::new(config, Recorder::default(), clock.clone()).unwrap();
        (s, clock)
    }

    #[test]
    fn start_pause_cycle() {
        let (mut s, _) = scheduler(Configuration::default());
        assert!(!s.state().running);

        s.start();
        assert!(s.state().running);
        assert!(s.pending_frame().is_some());

        s.pause();
        assert!(!s.state().running);
        assert!(s.pending_frame().is_none());
    }

    #[test]
    fn new_rejects_zero_duration() {
        let cfg = Configuration {
            work: 0,
            ..Configuration::default()
        };
        let err = SessionScheduler::new(cfg, Recorder::default(), ManualClock::new()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfiguration(_)));
    }

    #[test]
    fn configure_keeps_previous_on_error() {
        let (mut s, _) = scheduler(Configuration::default());
        let bad = Configuration {
            long: 0,
            ..Configuration::default()
        };
        assert!(s.configure(bad).is_err());
        assert_eq!(s.config().long, 15);

        let good = Configuration {
            work: 50,
            ..Configuration::default()
        };
        s.configure(good).unwrap();
        assert_eq!(s.config().work, 50);
        // Countdown untouched until reset.
        assert_eq!(s.state().remaining_secs, 25 * 60);
        s.reset();
        assert_eq!(s.state().remaining_secs, 50 * 60);
    }

    #[test]
    fn sub_second_ticks_do_not_notify() {
        let (mut s, clock) = scheduler(Configuration::default());
        s.start();
        let before = s.presenter().snapshots.len();
        clock.advance(Duration::from_millis(900));
        s.tick(clock.now());
        assert_eq!(s.presenter().snapshots.len(), before);
        assert_eq!(s.state().remaining_secs, 25 * 60);
    }

    #[test]
    fn tick_ignored_while_paused() {
        let (mut s, clock) = scheduler(Configuration::default());
        s.start();
        s.pause();
        clock.advance(Duration::from_secs(30));
        s.tick(clock.now());
        assert_eq!(s.state().remaining_secs, 25 * 60);
    }

    #[test]
    fn completion_plays_configured_cue() {
        let cfg = Configuration {
            sound: SoundKind::Chime,
            ..Configuration::default()
        };
        let (mut s, _) = scheduler(cfg);
        s.complete_session(false);
        assert_eq!(s.presenter().cues, vec![SoundKind::Chime]);
        assert_eq!(s.state().mode, SessionMode::ShortBreak);
        assert_eq!(s.state().remaining_secs, 5 * 60);
    }

    #[test]
    fn sound_none_plays_nothing() {
        let cfg = Configuration {
            sound: SoundKind::None,
            ..Configuration::default()
        };
        let (mut s, _) = scheduler(cfg);
        s.complete_session(false);
        assert!(s.presenter().cues.is_empty());
    }

    #[test]
    fn completion_renders_zero_before_next_mode() {
        let (mut s, _) = scheduler(Configuration::default());
        s.complete_session(false);
        let snaps = &s.presenter().snapshots;
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].mode, SessionMode::Work);
        assert_eq!(snaps[0].remaining_secs, 0);
        assert_eq!(snaps[1].mode, SessionMode::ShortBreak);
        assert_eq!(snaps[1].remaining_secs, 5 * 60);
        assert!(!snaps[1].running);
    }

    #[test]
    fn reset_cancels_pending_frame() {
        let (mut s, clock) = scheduler(Configuration::default());
        s.start();
        let frame = s.pending_frame().unwrap();
        s.reset();
        clock.advance(Duration::from_secs(5));
        assert!(!s.fire_frame(frame));
        assert_eq!(s.state().remaining_secs, 25 * 60);
        assert!(!s.state().running);
    }

    #[test]
    fn fire_frame_rearms_while_running() {
        let (mut s, clock) = scheduler(Configuration::default());
        s.start();
        let first = s.pending_frame().unwrap();
        clock.advance(Duration::from_millis(1_016));
        assert!(s.fire_frame(first));
        let second = s.pending_frame().unwrap();
        assert_ne!(first, second);
        assert_eq!(s.state().remaining_secs, 25 * 60 - 1);
    }
}
