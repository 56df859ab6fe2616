//! Aggregates - consistency boundaries over groups of entities

mod scenario_catalog;

pub use scenario_catalog::ScenarioCatalog;
