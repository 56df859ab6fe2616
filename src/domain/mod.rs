//! Domain layer - Core game rules with no external dependencies
//!
//! This layer contains:
//! - Entities: Scenario, Player, GameState, CustomStory
//! - Aggregates: the validated scenario catalog
//! - Value Objects: identifiers, D20 rolls and outcome bands
//! - Domain Services: character initialization and game setup
//! - Errors: game rule violations

pub mod aggregates;
pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
