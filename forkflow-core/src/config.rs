//! Workflow configuration loading, validation and saving

use crate::{Error, Result, Stage, StageId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Complete workflow configuration: the ordered stage list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowConfig {
    pub stages: Vec<Stage>,
}

impl WorkflowConfig {
    /// Creates and validates a configuration
    pub fn new(stages: Vec<Stage>) -> Result<Self> {
        let config = Self { stages };
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a configuration from a JSON reader
    pub fn read<R: Read>(reader: R) -> Result<Self> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Self::read(json.as_bytes())
    }

    /// Loads a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading workflow configuration from {}", path.display());
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Writes the configuration as pretty JSON with four-space indentation
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut serializer)?;
        Ok(())
    }

    /// Saves the configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Checks the stage invariants: non-empty, unique dense ids, positive weights.
    ///
    /// Forks with a missing branch and stages without media are valid; they are
    /// rendered as placeholders.
    pub fn validate(&self) -> Result<()> {
        let first = self.stages.first().ok_or(Error::NoStages)?;

        let mut seen = HashSet::new();
        let mut expected = Some(first.id);
        for stage in &self.stages {
            if !seen.insert(stage.id) {
                return Err(Error::DuplicateStageId(stage.id));
            }
            match expected {
                Some(id) if id == stage.id => {}
                Some(id) => {
                    return Err(Error::StageIdGap {
                        expected: id,
                        found: stage.id,
                    })
                }
                None => return Err(Error::StageIdOverflow(stage.id)),
            }
            if !(stage.duration.is_finite() && stage.duration > 0.0) {
                return Err(Error::InvalidDuration {
                    id: stage.id,
                    duration: stage.duration,
                });
            }
            expected = stage.id.next();

            if stage.is_fork && (stage.scenario_a.is_none() || stage.scenario_b.is_none()) {
                tracing::warn!("Fork stage {} is missing a scenario branch", stage.id);
            }
            if stage.media().is_empty() {
                tracing::warn!("Stage {} has no media; a placeholder will be shown", stage.id);
            }
        }

        Ok(())
    }

    /// Gets a stage by ID
    pub fn stage(&self, id: StageId) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == id)
    }

    /// Gets a stage by ID, failing with [`Error::StageNotFound`]
    pub fn require_stage(&self, id: StageId) -> Result<&Stage> {
        self.stage(id).ok_or(Error::StageNotFound(id))
    }

    /// Gets a stage by ID for mutation
    pub fn stage_mut(&mut self, id: StageId) -> Option<&mut Stage> {
        self.stages.iter_mut().find(|s| s.id == id)
    }

    /// Ordered stage identifiers
    pub fn stage_ids(&self) -> Vec<StageId> {
        self.stages.iter().map(|s| s.id).collect()
    }

    /// The first fork stage, if any
    pub fn fork_stage(&self) -> Option<&Stage> {
        self.stages.iter().find(|s| s.is_fork)
    }

    /// Sum of all duration weights
    pub fn total_duration(&self) -> f64 {
        self.stages.iter().map(|s| s.duration).sum()
    }
}
