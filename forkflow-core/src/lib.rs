//! Forkflow Core Library
//!
//! This library provides the data model shared by the forkflow components:
//! ordered workflow stages, the fork stage with its two scenario branches,
//! media sets, and the JSON workflow configuration they are loaded from.

pub mod config;
pub mod media;
pub mod scenario;
pub mod stage;
pub mod sync;

pub use config::WorkflowConfig;
pub use media::{MediaKind, MediaSet};
pub use scenario::{Scenario, ScenarioContext, ScenarioStore};
pub use stage::{ScenarioBranch, Stage, StageId, SubStage};

/// Result type for forkflow-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for forkflow-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Workflow configuration has no stages")]
    NoStages,

    #[error("Duplicate stage ID: {0}")]
    DuplicateStageId(StageId),

    #[error("Stage IDs are not dense: expected {expected}, found {found}")]
    StageIdGap { expected: StageId, found: StageId },

    #[error("Stage {id} has a non-positive duration weight: {duration}")]
    InvalidDuration { id: StageId, duration: f64 },

    #[error("Stage {0} follows the largest possible stage ID")]
    StageIdOverflow(StageId),

    #[error("Stage not found: {0}")]
    StageNotFound(StageId),
}
