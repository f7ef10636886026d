//! Scroll position to active stage mapping

use crate::layout::{LayoutProbe, Viewport};
use crate::TrackerConfig;
use forkflow_core::{StageId, WorkflowConfig};

/// Derived scroll state, recomputed on every scroll or resize
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSnapshot {
    pub active_stage: StageId,
    /// Progress through the active stage, 0-100
    pub stage_progress: f64,
    /// Progress through the whole document, 0-100
    pub global_progress: f64,
}

/// A smooth-scroll request for the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub stage: StageId,
    /// Target document offset
    pub top: f64,
    pub smooth: bool,
}

/// Tracks which stage the reader is in
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    stages: Vec<StageId>,
    config: TrackerConfig,
    snapshot: ScrollSnapshot,
}

impl ScrollTracker {
    /// Creates a tracker over the configured stage order
    pub fn new(workflow: &WorkflowConfig, config: TrackerConfig) -> Self {
        Self::with_stages(workflow.stage_ids(), config)
    }

    /// Creates a tracker over an explicit stage order
    pub fn with_stages(stages: Vec<StageId>, config: TrackerConfig) -> Self {
        let snapshot = ScrollSnapshot {
            active_stage: Self::default_stage(&stages),
            stage_progress: 0.0,
            global_progress: 0.0,
        };
        Self {
            stages,
            config,
            snapshot,
        }
    }

    fn default_stage(stages: &[StageId]) -> StageId {
        stages.first().copied().unwrap_or(StageId(1))
    }

    /// The last computed snapshot
    pub fn snapshot(&self) -> ScrollSnapshot {
        self.snapshot
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Document offset of the trigger line for the given viewport
    pub fn trigger_line(&self, viewport: &Viewport) -> f64 {
        viewport.scroll_offset + viewport.viewport_height * self.config.trigger_ratio
    }

    /// Recomputes and stores the snapshot
    pub fn recompute(&mut self, viewport: &Viewport, probe: &impl LayoutProbe) -> ScrollSnapshot {
        let snapshot = self.compute(viewport, probe);
        if snapshot.active_stage != self.snapshot.active_stage {
            tracing::debug!(
                "Active stage {} -> {}",
                self.snapshot.active_stage,
                snapshot.active_stage
            );
        }
        self.snapshot = snapshot;
        snapshot
    }

    /// Computes a snapshot without storing it.
    ///
    /// The active stage is the last stage, in configured order, whose live top
    /// edge is at or above the trigger line. When no rendered stage qualifies
    /// the first configured stage is active with zero progress.
    pub fn compute(&self, viewport: &Viewport, probe: &impl LayoutProbe) -> ScrollSnapshot {
        let trigger = self.trigger_line(viewport);
        let mut active_stage = Self::default_stage(&self.stages);
        let mut stage_progress = 0.0;

        for &id in self.stages.iter().rev() {
            let Some(rect) = probe.stage_rect(id) else {
                continue;
            };
            if trigger >= rect.top {
                active_stage = id;
                stage_progress = progress_within(trigger, rect.top, rect.height);
                break;
            }
        }

        ScrollSnapshot {
            active_stage,
            stage_progress,
            global_progress: global_progress(viewport),
        }
    }

    /// Where to scroll to bring a stage under the fixed header.
    /// `None` when the stage is not rendered.
    pub fn scroll_to_stage(&self, id: StageId, probe: &impl LayoutProbe) -> Option<ScrollRequest> {
        let rect = probe.stage_rect(id)?;
        Some(ScrollRequest {
            stage: id,
            top: rect.top - self.config.header_offset,
            smooth: true,
        })
    }
}

/// Percentage of a stage the trigger line has passed, clamped to 0-100.
/// A zero-height stage counts as fully passed once the line reaches it.
fn progress_within(trigger: f64, top: f64, height: f64) -> f64 {
    if height <= 0.0 {
        return if trigger >= top { 100.0 } else { 0.0 };
    }
    ((trigger - top) / height * 100.0).clamp(0.0, 100.0)
}

/// Percentage of the document overflow scrolled; zero when nothing overflows
fn global_progress(viewport: &Viewport) -> f64 {
    let overflow = viewport.overflow();
    if overflow <= 0.0 {
        return 0.0;
    }
    (viewport.scroll_offset / overflow * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{StageRect, StaticLayout};

    fn tracker() -> ScrollTracker {
        ScrollTracker::with_stages(
            vec![StageId(1), StageId(2), StageId(3)],
            TrackerConfig::default(),
        )
    }

    fn layout() -> StaticLayout {
        // Hero occupies 0..800
        StaticLayout::stacked(
            800.0,
            &[(StageId(1), 1000.0), (StageId(2), 1000.0), (StageId(3), 1000.0)],
        )
    }

    #[test]
    fn test_initial_snapshot() {
        let t = tracker();
        assert_eq!(t.snapshot().active_stage, StageId(1));
        assert_eq!(t.snapshot().stage_progress, 0.0);
    }

    #[test]
    fn test_top_of_page_defaults_to_first_stage() {
        let t = tracker();
        let snap = t.compute(&Viewport::new(0.0, 1000.0, 4000.0), &layout());
        // Trigger at 350, above stage 1 (800)
        assert_eq!(snap.active_stage, StageId(1));
        assert_eq!(snap.stage_progress, 0.0);
        assert_eq!(snap.global_progress, 0.0);
    }

    #[test]
    fn test_active_stage_and_progress() {
        let t = tracker();
        // Trigger = 1600 + 350 = 1950, inside stage 2 (1800..2800)
        let snap = t.compute(&Viewport::new(1600.0, 1000.0, 4000.0), &layout());
        assert_eq!(snap.active_stage, StageId(2));
        assert!((snap.stage_progress - 15.0).abs() < 1e-9);
        assert!((snap.global_progress - 1600.0 / 3000.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_progress_clamped_past_last_stage() {
        let t = tracker();
        let snap = t.compute(&Viewport::new(5000.0, 1000.0, 4000.0), &layout());
        assert_eq!(snap.active_stage, StageId(3));
        assert_eq!(snap.stage_progress, 100.0);
        assert_eq!(snap.global_progress, 100.0);
    }

    #[test]
    fn test_trigger_exactly_on_boundary() {
        let t = tracker();
        // Trigger = 1450 + 350 = 1800 = top of stage 2
        let snap = t.compute(&Viewport::new(1450.0, 1000.0, 4000.0), &layout());
        assert_eq!(snap.active_stage, StageId(2));
        assert_eq!(snap.stage_progress, 0.0);
    }

    #[test]
    fn test_missing_elements_fall_back() {
        let t = tracker();
        let empty = StaticLayout::default();
        let snap = t.compute(&Viewport::new(1600.0, 1000.0, 4000.0), &empty);
        assert_eq!(snap.active_stage, StageId(1));
        assert_eq!(snap.stage_progress, 0.0);
    }

    #[test]
    fn test_unrendered_stage_is_skipped() {
        let t = tracker();
        let mut partial = layout();
        partial.stages.remove(&StageId(2));
        let snap = t.compute(&Viewport::new(1600.0, 1000.0, 4000.0), &partial);
        assert_eq!(snap.active_stage, StageId(1));
        assert_eq!(snap.stage_progress, 100.0);
    }

    #[test]
    fn test_zero_height_stage() {
        let t = ScrollTracker::with_stages(vec![StageId(1)], TrackerConfig::default());
        let probe = |_: StageId| Some(StageRect::new(100.0, 0.0));
        let snap = t.compute(&Viewport::new(0.0, 1000.0, 1000.0), &probe);
        assert_eq!(snap.stage_progress, 100.0);
        assert_eq!(snap.global_progress, 0.0);
    }

    #[test]
    fn test_scroll_to_stage() {
        let t = tracker();
        let request = t.scroll_to_stage(StageId(3), &layout()).unwrap();
        assert_eq!(request.top, 2700.0);
        assert!(request.smooth);
        assert_eq!(t.scroll_to_stage(StageId(3), &layout()), Some(request));
        assert_eq!(t.scroll_to_stage(StageId(9), &layout()), None);
    }

    #[test]
    fn test_recompute_stores_snapshot() {
        let mut t = tracker();
        t.recompute(&Viewport::new(2600.0, 1000.0, 4000.0), &layout());
        assert_eq!(t.snapshot().active_stage, StageId(3));
    }
}
