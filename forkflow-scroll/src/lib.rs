//! Forkflow Scroll Library
//!
//! This library maps the document scroll position onto the workflow stages:
//! which stage is active, how far through it the reader is, and how far
//! through the whole page. It also provides the state behind the sticky
//! timeline and the sticky scenario switcher.
//!
//! Layout is never read directly; the host supplies it through [`LayoutProbe`].

pub mod layout;
pub mod switcher;
pub mod throttle;
pub mod timeline;
pub mod tracker;

pub use layout::{LayoutProbe, StageRect, StaticLayout, Viewport};
pub use switcher::ScenarioSwitcher;
pub use throttle::{FrameThrottle, ScrollDriver};
pub use timeline::{SegmentFill, TimelineSegment, TimelineView};
pub use tracker::{ScrollRequest, ScrollSnapshot, ScrollTracker};

/// Tracker tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Fraction of the viewport height, from the top, where the trigger line sits
    pub trigger_ratio: f64,
    /// Space left above a stage when scrolling to it (fixed header plus padding)
    pub header_offset: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            trigger_ratio: 0.35,
            header_offset: 100.0,
        }
    }
}
