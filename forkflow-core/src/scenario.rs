//! Scenario selection for the fork stage
//!
//! A single [`ScenarioStore`] is owned at the composition root. Readers get a
//! copy of the current [`ScenarioContext`] for each render; the only way to
//! change the selection is through the store's commands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two alternative storylines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    /// Precision
    #[default]
    A,
    /// Artistic
    B,
}

impl Scenario {
    /// The other scenario
    pub fn other(self) -> Self {
        match self {
            Scenario::A => Scenario::B,
            Scenario::B => Scenario::A,
        }
    }

    /// Display name, e.g. "Scenario A: Precision"
    pub fn label(self) -> &'static str {
        match self {
            Scenario::A => "Scenario A: Precision",
            Scenario::B => "Scenario B: Artistic",
        }
    }

    /// Folder-name suffix used by the asset host for this scenario
    pub fn folder_suffix(self) -> &'static str {
        match self {
            Scenario::A => "",
            Scenario::B => "_B",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::A => f.write_str("A"),
            Scenario::B => f.write_str("B"),
        }
    }
}

impl std::str::FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "a" | "A" | "precision" => Ok(Scenario::A),
            "b" | "B" | "artistic" => Ok(Scenario::B),
            other => Err(format!("unknown scenario '{other}', expected A or B")),
        }
    }
}

/// Immutable view of the scenario selection handed to readers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScenarioContext {
    scenario: Scenario,
    revision: u64,
}

impl ScenarioContext {
    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    /// Shorthand for the Precision branch being selected
    pub fn is_precision(&self) -> bool {
        self.scenario == Scenario::A
    }

    /// Monotonic counter bumped on every effective change
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Single owner of the global scenario selection
#[derive(Debug, Default)]
pub struct ScenarioStore {
    current: ScenarioContext,
}

impl ScenarioStore {
    pub fn new(initial: Scenario) -> Self {
        Self {
            current: ScenarioContext {
                scenario: initial,
                revision: 0,
            },
        }
    }

    /// Current selection as a value
    pub fn context(&self) -> ScenarioContext {
        self.current
    }

    /// Selects a scenario. Returns true when the selection changed.
    pub fn select(&mut self, scenario: Scenario) -> bool {
        if self.current.scenario == scenario {
            return false;
        }
        tracing::debug!("Scenario switched: {} -> {}", self.current.scenario, scenario);
        self.current = ScenarioContext {
            scenario,
            revision: self.current.revision + 1,
        };
        true
    }

    /// Switches to the other scenario and returns the new selection
    pub fn toggle(&mut self) -> Scenario {
        let next = self.current.scenario.other();
        self.select(next);
        next
    }
}
