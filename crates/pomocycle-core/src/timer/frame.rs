//! Cancellable "next frame" requests.
//!
//! The host asks the scheduler for its pending frame, waits one frame
//! interval, and hands the handle back. Each request gets a fresh id, so a
//! handle taken before a pause or reset no longer matches and is dropped.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// At most one outstanding frame request.
#[derive(Debug, Default)]
pub struct FrameSlot {
    next_id: u64,
    pending: Option<FrameHandle>,
}

impl FrameSlot {
    /// Replace any outstanding request with a new one.
    pub fn request(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Consume the request if `handle` is the one outstanding.
    pub fn take(&mut self, handle: FrameHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}
