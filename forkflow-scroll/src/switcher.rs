//! Floating scenario switcher shown once the reader reaches the fork stage

use crate::layout::{LayoutProbe, Viewport};
use forkflow_core::{Scenario, ScenarioStore, StageId};

/// The switcher appears when the fork stage's top is closer than this to the viewport top
pub const REVEAL_DISTANCE: f64 = 200.0;

#[derive(Debug, Clone)]
pub struct ScenarioSwitcher {
    fork_stage: Option<StageId>,
    visible: bool,
    expanded: bool,
}

impl ScenarioSwitcher {
    /// `fork_stage` is `None` when the workflow has no fork; the switcher then never shows
    pub fn new(fork_stage: Option<StageId>) -> Self {
        Self {
            fork_stage,
            visible: false,
            expanded: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Re-evaluates visibility on scroll. Hidden while the fork stage is not rendered.
    pub fn on_scroll(&mut self, viewport: &Viewport, probe: &impl LayoutProbe) -> bool {
        let visible = self
            .fork_stage
            .and_then(|id| probe.stage_rect(id))
            .is_some_and(|rect| rect.top - viewport.scroll_offset < REVEAL_DISTANCE);
        if !visible {
            self.expanded = false;
        }
        self.visible = visible;
        visible
    }

    pub fn hover(&mut self, hovered: bool) {
        self.expanded = hovered && self.visible;
    }

    /// Selects a scenario through the store and collapses the pill
    pub fn select(&mut self, store: &mut ScenarioStore, scenario: Scenario) -> bool {
        self.expanded = false;
        store.select(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::StaticLayout;

    fn layout() -> StaticLayout {
        StaticLayout::stacked(0.0, &[(StageId(1), 1000.0), (StageId(2), 1000.0)])
    }

    #[test]
    fn test_reveal_near_fork() {
        let mut switcher = ScenarioSwitcher::new(Some(StageId(2)));
        assert!(!switcher.on_scroll(&Viewport::new(0.0, 800.0, 3000.0), &layout()));
        assert!(!switcher.on_scroll(&Viewport::new(800.0, 800.0, 3000.0), &layout()));
        assert!(switcher.on_scroll(&Viewport::new(801.0, 800.0, 3000.0), &layout()));
        assert!(switcher.is_visible());
    }

    #[test]
    fn test_hides_when_fork_unrendered() {
        let mut switcher = ScenarioSwitcher::new(Some(StageId(2)));
        assert!(switcher.on_scroll(&Viewport::new(1500.0, 800.0, 3000.0), &layout()));
        assert!(!switcher.on_scroll(&Viewport::new(1500.0, 800.0, 3000.0), &StaticLayout::default()));
    }

    #[test]
    fn test_no_fork_never_shows() {
        let mut switcher = ScenarioSwitcher::new(None);
        assert!(!switcher.on_scroll(&Viewport::new(5000.0, 800.0, 6000.0), &layout()));
    }

    #[test]
    fn test_select_collapses_and_updates_store() {
        let mut store = ScenarioStore::default();
        let mut switcher = ScenarioSwitcher::new(Some(StageId(2)));
        switcher.on_scroll(&Viewport::new(1500.0, 800.0, 3000.0), &layout());

        switcher.hover(true);
        assert!(switcher.is_expanded());
        assert!(switcher.select(&mut store, Scenario::B));
        assert!(!switcher.is_expanded());
        assert_eq!(store.context().scenario(), Scenario::B);
    }

    #[test]
    fn test_hidden_switcher_does_not_expand() {
        let mut switcher = ScenarioSwitcher::new(Some(StageId(2)));
        switcher.hover(true);
        assert!(!switcher.is_expanded());
    }
}
