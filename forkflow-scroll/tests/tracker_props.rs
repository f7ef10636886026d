use forkflow_core::StageId;
use forkflow_scroll::{LayoutProbe, ScrollTracker, StaticLayout, TrackerConfig, Viewport};
use proptest::prelude::*;

fn build(heights: &[f64]) -> (ScrollTracker, StaticLayout) {
    let stages: Vec<(StageId, f64)> = heights
        .iter()
        .enumerate()
        .map(|(i, &h)| (StageId(i as u32 + 1), h))
        .collect();
    let ids = stages.iter().map(|(id, _)| *id).collect();
    let tracker = ScrollTracker::with_stages(ids, TrackerConfig::default());
    (tracker, StaticLayout::stacked(600.0, &stages))
}

proptest! {
    #[test]
    fn prop_active_stage_is_last_above_trigger(
        heights in proptest::collection::vec(0.0..2000.0f64, 1..10),
        offset in 0.0..20000.0f64,
        viewport_height in 200.0..1500.0f64,
    ) {
        let (tracker, layout) = build(&heights);
        let viewport = Viewport::new(offset, viewport_height, 20000.0);
        let snap = tracker.compute(&viewport, &layout);
        let trigger = tracker.trigger_line(&viewport);

        let expected = (1..=heights.len() as u32)
            .rev()
            .map(StageId)
            .find(|id| layout.stage_rect(*id).map_or(false, |r| r.top <= trigger))
            .unwrap_or(StageId(1));
        prop_assert_eq!(snap.active_stage, expected);
    }

    #[test]
    fn prop_progress_is_bounded(
        heights in proptest::collection::vec(0.0..2000.0f64, 1..10),
        offset in -5000.0..50000.0f64,
        viewport_height in 0.0..1500.0f64,
        document_height in 0.0..30000.0f64,
    ) {
        let (tracker, layout) = build(&heights);
        let snap = tracker.compute(&Viewport::new(offset, viewport_height, document_height), &layout);
        prop_assert!((0.0..=100.0).contains(&snap.stage_progress));
        prop_assert!((0.0..=100.0).contains(&snap.global_progress));
    }

    #[test]
    fn prop_scroll_to_stage_is_idempotent(
        heights in proptest::collection::vec(1.0..2000.0f64, 1..10),
        pick in 0usize..10,
    ) {
        let (tracker, layout) = build(&heights);
        let id = StageId((pick % heights.len()) as u32 + 1);
        let first = tracker.scroll_to_stage(id, &layout);
        let second = tracker.scroll_to_stage(id, &layout);
        prop_assert!(first.is_some());
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_unrendered_stage_has_no_scroll_target() {
    let (tracker, layout) = build(&[500.0, 500.0]);
    assert_eq!(tracker.scroll_to_stage(StageId(5), &layout), None);
}
