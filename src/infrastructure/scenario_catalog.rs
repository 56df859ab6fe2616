//! Scenario catalog loading
//!
//! Built-in scenarios ship inside the binary. An optional JSON file (an array
//! of scenarios in the same format) may add more; every definition is
//! validated before the server starts.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::aggregates::ScenarioCatalog;
use crate::domain::entities::Scenario;

const BUILT_IN_SCENARIOS: &str = include_str!("../../data/scenarios.json");

pub fn built_in_scenarios() -> Result<Vec<Scenario>> {
    serde_json::from_str(BUILT_IN_SCENARIOS).context("Built-in scenario data is malformed")
}

/// Build the catalog from the built-ins plus the scenarios in `extra`, if given
pub fn load_catalog(extra: Option<&Path>) -> Result<ScenarioCatalog> {
    let mut catalog = ScenarioCatalog::new(built_in_scenarios()?)
        .context("Built-in scenario failed validation")?;
    anyhow::ensure!(!catalog.is_empty(), "No built-in scenarios are defined");

    if let Some(path) = extra {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenarios: Vec<Scenario> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse scenario file {}", path.display()))?;

        for scenario in scenarios {
            let id = scenario.id.clone();
            catalog
                .insert(scenario)
                .with_context(|| format!("Scenario '{}' in {} is invalid", id, path.display()))?;
        }
        tracing::info!("Loaded extra scenarios from {}", path.display());
    }

    Ok(catalog)
}
