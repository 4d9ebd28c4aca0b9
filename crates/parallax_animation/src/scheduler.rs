//! Frame scheduling
//!
//! The scene is driven by a recurring timer whose firings are turned into
//! render-synchronised frames. [`FrameGate`] keeps at most one frame request
//! outstanding: timer firings that arrive while a frame is pending are
//! coalesced instead of queueing more work.

use std::time::Duration;

use parallax_platform::Platform;

/// Default period of the recurring tick timer
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(10);

/// Single-slot frame request gate
#[derive(Debug, Default)]
pub struct FrameGate {
    pending: bool,
    requested: u64,
    coalesced: u64,
}

impl FrameGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a timer firing. Requests a frame unless one is already pending.
    ///
    /// Returns true if a new frame was requested.
    pub fn on_timer<P: Platform>(&mut self, platform: &mut P) -> bool {
        if self.pending {
            self.coalesced += 1;
            tracing::trace!(coalesced = self.coalesced, "frame already pending");
            return false;
        }
        platform.request_frame();
        self.pending = true;
        self.requested += 1;
        true
    }

    /// Handle a frame callback. Returns whether a request was outstanding.
    pub fn on_frame(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }

    /// Check if a frame has been requested but not yet delivered
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Number of frames requested so far
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Number of timer firings dropped because a frame was pending
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}
