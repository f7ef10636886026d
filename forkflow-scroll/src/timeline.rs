//! Sticky timeline view derived from the stage list and the scroll snapshot

use crate::tracker::ScrollSnapshot;
use forkflow_core::{StageId, WorkflowConfig};

/// Title shown when the active stage cannot be found
pub const FALLBACK_TITLE: &str = "Workflow";

/// How much of a segment's progress bar is filled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentFill {
    Past,
    Active(f64),
    Upcoming,
}

impl SegmentFill {
    /// Fill as a 0-100 percentage
    pub fn percent(&self) -> f64 {
        match self {
            SegmentFill::Past => 100.0,
            SegmentFill::Active(progress) => *progress,
            SegmentFill::Upcoming => 0.0,
        }
    }
}

/// One clickable slot of the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineSegment {
    pub id: StageId,
    /// "01", "02", ...
    pub label: String,
    pub title: String,
    /// Share of the timeline width, sized by duration weight
    pub width_percent: f64,
    pub fill: SegmentFill,
    pub is_fork: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineView {
    pub segments: Vec<TimelineSegment>,
    /// Title of the active stage
    pub title: String,
}

impl TimelineView {
    pub fn build(workflow: &WorkflowConfig, snapshot: &ScrollSnapshot) -> Self {
        let total = workflow.total_duration();
        let active = snapshot.active_stage;

        let segments = workflow
            .stages
            .iter()
            .map(|stage| {
                let fill = if stage.id < active {
                    SegmentFill::Past
                } else if stage.id == active {
                    SegmentFill::Active(snapshot.stage_progress)
                } else {
                    SegmentFill::Upcoming
                };
                TimelineSegment {
                    id: stage.id,
                    label: stage.id.label(),
                    title: stage.title.clone(),
                    width_percent: if total > 0.0 {
                        stage.duration / total * 100.0
                    } else {
                        0.0
                    },
                    fill,
                    is_fork: stage.is_fork,
                }
            })
            .collect();

        let title = workflow
            .stage(active)
            .map(|s| s.title.clone())
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());

        Self { segments, title }
    }

    pub fn active_segment(&self) -> Option<&TimelineSegment> {
        self.segments
            .iter()
            .find(|s| matches!(s.fill, SegmentFill::Active(_)))
    }
}
