//! # pomocycle core library
//!
//! The business logic behind the `pomocycle` Pomodoro timer. A terminal
//! host lives in `pomocycle-cli`; everything it shows comes from here.
//!
//! ## Architecture
//!
//! - **Session scheduler**: a monotonic-clock state machine that cycles
//!   Work -> Short Break (x2) -> Work -> Long Break. It owns no thread; the
//!   host delivers frames and the scheduler counts whole seconds.
//! - **Presentation contract**: the scheduler reports through a
//!   [`PresentationAdapter`] and never formats or plays anything itself.
//! - **Configuration**: defaults, an optional TOML file, and query-style
//!   parameters that silently fall back on bad values.
//!
//! ## Key Components
//!
//! - [`SessionScheduler`]: the timer state machine
//! - [`Configuration`]: durations and options for one run
//! - [`Render`] / [`CueProfile`]: display and audio contracts for hosts
//! - [`Event`]: serializable log of presenter traffic

pub mod error;
pub mod events;
pub mod presentation;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError};
pub use events::Event;
pub use presentation::{format_clock, CueProfile, Decay, PresentationAdapter, Render};
pub use storage::{ConfigFile, Configuration, HooksConfig, SoundKind};
pub use timer::{
    Clock, FrameHandle, ManualClock, MonotonicClock, SessionMode, SessionScheduler, SessionState,
    Snapshot,
};
