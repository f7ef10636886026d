//! Per-frame coalescing of scroll recomputation

use crate::layout::{LayoutProbe, Viewport};
use crate::tracker::{ScrollSnapshot, ScrollTracker};

/// Pending-frame guard: at most one recompute is scheduled per animation frame
#[derive(Debug, Clone, Default)]
pub struct FrameThrottle {
    pending: bool,
}

impl FrameThrottle {
    /// Registers an event. Returns true when the caller must request a frame;
    /// false when one is already pending and the event is coalesced.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Clears the pending flag when the frame runs. Returns whether one was pending.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Event adapter around a [`ScrollTracker`]
#[derive(Debug, Clone)]
pub struct ScrollDriver {
    tracker: ScrollTracker,
    throttle: FrameThrottle,
}

impl ScrollDriver {
    pub fn new(tracker: ScrollTracker) -> Self {
        Self {
            tracker,
            throttle: FrameThrottle::default(),
        }
    }

    pub fn tracker(&self) -> &ScrollTracker {
        &self.tracker
    }

    /// Initial computation once the page has rendered
    pub fn mount(&mut self, viewport: &Viewport, probe: &impl LayoutProbe) -> ScrollSnapshot {
        self.tracker.recompute(viewport, probe)
    }

    /// Scroll event. Returns true when the host must request an animation frame.
    pub fn on_scroll(&mut self) -> bool {
        self.throttle.request()
    }

    /// Animation frame callback; recomputes only if a scroll is pending
    pub fn on_frame(
        &mut self,
        viewport: &Viewport,
        probe: &impl LayoutProbe,
    ) -> Option<ScrollSnapshot> {
        if !self.throttle.take() {
            return None;
        }
        Some(self.tracker.recompute(viewport, probe))
    }

    /// Resize event: recomputed immediately
    pub fn on_resize(&mut self, viewport: &Viewport, probe: &impl LayoutProbe) -> ScrollSnapshot {
        self.tracker.recompute(viewport, probe)
    }
}
