//! Scenario catalog aggregate
//!
//! The catalog is the only way scenarios enter the engine. Every definition
//! is validated when the catalog is built, so lookups never hand out a
//! scenario whose bonuses or skills reference missing attributes.

use std::collections::BTreeMap;

use crate::domain::entities::{Scenario, ScenarioValidationError};
use crate::domain::errors::GameError;

#[derive(Debug, Clone, Default)]
pub struct ScenarioCatalog {
    scenarios: BTreeMap<String, Scenario>,
}

impl ScenarioCatalog {
    /// Build a catalog, rejecting invalid or duplicate definitions
    pub fn new(scenarios: impl IntoIterator<Item = Scenario>) -> Result<Self, ScenarioValidationError> {
        let mut catalog = Self::default();
        for scenario in scenarios {
            catalog.insert(scenario)?;
        }
        Ok(catalog)
    }

    /// Add one more scenario after validating it
    pub fn insert(&mut self, scenario: Scenario) -> Result<(), ScenarioValidationError> {
        scenario.validate()?;
        if self.scenarios.contains_key(&scenario.id) {
            return Err(ScenarioValidationError::DuplicateScenario(scenario.id));
        }
        self.scenarios.insert(scenario.id.clone(), scenario);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.get(id)
    }

    /// Look up a scenario, failing with `InvalidScenario` for unknown ids
    pub fn require(&self, id: &str) -> Result<&Scenario, GameError> {
        self.get(id)
            .ok_or_else(|| GameError::InvalidScenario(format!("Unknown scenario '{}'", id)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.values()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
