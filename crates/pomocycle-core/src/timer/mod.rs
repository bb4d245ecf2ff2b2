mod clock;
mod engine;
mod frame;
mod mode;
mod state;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use engine::SessionScheduler;
pub use frame::{FrameHandle, FrameSlot};
pub use mode::{next_session, SessionMode, WORK_SESSIONS_PER_CYCLE};
pub use state::{whole_seconds_since, Elapsed, SessionState, Snapshot};
