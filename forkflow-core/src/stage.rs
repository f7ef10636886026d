//! Stage data structures for the workflow narrative

use crate::media::MediaSet;
use crate::scenario::Scenario;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a top-level stage. Identifiers are dense and follow stage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageId(pub u32);

impl StageId {
    /// The identifier of the stage following this one; `None` past `u32::MAX`
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Zero-padded two digit label used by the timeline ("01", "02", ...)
    pub fn label(self) -> String {
        format!("{:02}", self.0)
    }

    /// DOM-style anchor of the rendered section ("stage-3")
    pub fn anchor(self) -> String {
        format!("stage-{}", self.0)
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A visual section of the narrative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    /// Unique, dense identifier
    pub id: StageId,
    /// Display title
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
    /// Weight used to size the stage's slot in the timeline (not real time)
    pub duration: f64,
    /// Whether this stage branches into Scenario A / Scenario B
    #[serde(default)]
    pub is_fork: bool,
    /// Single media URL, kept in sync with the first entry of `media_urls`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<String>,
    #[serde(default)]
    pub key_focus: Vec<String>,
    /// Set when the stage's media contains playable video
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_animated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_a: Option<ScenarioBranch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_b: Option<ScenarioBranch>,
}

impl Stage {
    /// Creates a plain (non-fork) stage with no media
    pub fn new(id: StageId, title: impl Into<String>, duration: f64) -> Self {
        Self {
            id,
            title: title.into(),
            subtitle: None,
            description_en: None,
            duration,
            is_fork: false,
            media_url: None,
            media_urls: Vec::new(),
            checkpoint: None,
            key_focus: Vec::new(),
            is_animated: false,
            poster_url: None,
            scenario_a: None,
            scenario_b: None,
        }
    }

    /// The stage's own media set
    pub fn media(&self) -> MediaSet {
        MediaSet::normalize(self.media_url.as_deref(), &self.media_urls)
    }

    /// Replaces the stage media, keeping `media_url` pointed at the first entry
    pub fn set_media(&mut self, urls: Vec<String>) {
        self.media_url = urls.first().cloned();
        self.media_urls = urls;
    }

    /// Returns the branch for the given scenario, if this is a fork stage that defines it
    pub fn branch(&self, scenario: Scenario) -> Option<&ScenarioBranch> {
        if !self.is_fork {
            return None;
        }
        match scenario {
            Scenario::A => self.scenario_a.as_ref(),
            Scenario::B => self.scenario_b.as_ref(),
        }
    }

    /// Mutable access to the branch for the given scenario
    pub fn branch_mut(&mut self, scenario: Scenario) -> Option<&mut ScenarioBranch> {
        if !self.is_fork {
            return None;
        }
        match scenario {
            Scenario::A => self.scenario_a.as_mut(),
            Scenario::B => self.scenario_b.as_mut(),
        }
    }

    /// Header media for the fork section under the given scenario.
    ///
    /// Falls back to the stage's own media when the branch is missing or has no
    /// header media. For a non-fork stage this is simply [`Stage::media`].
    pub fn header_media(&self, scenario: Scenario) -> MediaSet {
        match self.branch(scenario) {
            Some(branch) => {
                let header = branch.header_media();
                if header.is_empty() {
                    self.media()
                } else {
                    header
                }
            }
            None => self.media(),
        }
    }

    /// Sub-stages visible under the given scenario (empty for non-fork stages)
    pub fn sub_stages(&self, scenario: Scenario) -> &[SubStage] {
        self.branch(scenario)
            .map(|b| b.sub_stages.as_slice())
            .unwrap_or(&[])
    }
}

/// One of the two mutually exclusive content branches of a fork stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioBranch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_media_url: Option<String>,
    #[serde(default)]
    pub header_media_urls: Vec<String>,
    #[serde(default)]
    pub sub_stages: Vec<SubStage>,
}

impl ScenarioBranch {
    /// Media shown at the top of the fork section for this branch
    pub fn header_media(&self) -> MediaSet {
        MediaSet::normalize(self.header_media_url.as_deref(), &self.header_media_urls)
    }

    /// Replaces the header media, keeping `header_media_url` pointed at the first entry
    pub fn set_header_media(&mut self, urls: Vec<String>) {
        self.header_media_url = urls.first().cloned();
        self.header_media_urls = urls;
    }

    /// Looks up a sub-stage by its identifier ("3.1")
    pub fn sub_stage_mut(&mut self, id: &str) -> Option<&mut SubStage> {
        self.sub_stages.iter_mut().find(|s| s.id == id)
    }
}

/// An ordered step inside a scenario branch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubStage {
    /// Dotted identifier, e.g. "3.1"
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<String>,
    #[serde(default)]
    pub key_focus: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default)]
    pub media_urls: Vec<String>,
}

impl SubStage {
    pub fn media(&self) -> MediaSet {
        MediaSet::normalize(self.media_url.as_deref(), &self.media_urls)
    }

    pub fn set_media(&mut self, urls: Vec<String>) {
        self.media_url = urls.first().cloned();
        self.media_urls = urls;
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
