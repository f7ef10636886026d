//! Layout inputs: viewport metrics and live stage rectangles

use forkflow_core::StageId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Document-level scroll metrics at the time of a computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Current vertical scroll offset
    pub scroll_offset: f64,
    pub viewport_height: f64,
    /// Total scrollable height of the document
    pub document_height: f64,
}

impl Viewport {
    pub fn new(scroll_offset: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            scroll_offset,
            viewport_height,
            document_height,
        }
    }

    /// How far the document extends past the viewport
    pub fn overflow(&self) -> f64 {
        self.document_height - self.viewport_height
    }
}

/// Rendered rectangle of a stage section, in document coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageRect {
    pub top: f64,
    pub bottom: f64,
    pub height: f64,
}

impl StageRect {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
            height,
        }
    }
}

/// Resolves a stage to its live on-screen section
pub trait LayoutProbe {
    /// Returns `None` when the stage is not currently rendered
    fn stage_rect(&self, id: StageId) -> Option<StageRect>;
}

impl<F> LayoutProbe for F
where
    F: Fn(StageId) -> Option<StageRect>,
{
    fn stage_rect(&self, id: StageId) -> Option<StageRect> {
        self(id)
    }
}

/// Fixed layout, e.g. captured from a rendered page and stored as JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticLayout {
    pub stages: HashMap<StageId, StageRect>,
}

impl StaticLayout {
    /// Stacks stages of the given heights from `start` downwards
    pub fn stacked(start: f64, heights: &[(StageId, f64)]) -> Self {
        let mut top = start;
        let mut stages = HashMap::new();
        for &(id, height) in heights {
            stages.insert(id, StageRect::new(top, height));
            top += height;
        }
        Self { stages }
    }
}

impl LayoutProbe for StaticLayout {
    fn stage_rect(&self, id: StageId) -> Option<StageRect> {
        self.stages.get(&id).copied()
    }
}
