//! Player entity - the character sheet fixed at character creation

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::Scenario;
use crate::domain::services::{initialize_attributes, initialize_skills};
use crate::domain::value_objects::PlayerId;

/// The player's character for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
    pub attributes: BTreeMap<String, i32>,
    pub skills: BTreeMap<String, i32>,
    /// Chosen option per customization category
    pub customizations: BTreeMap<String, String>,
}

impl Player {
    /// Build a character sheet from the scenario and the player's choices
    pub fn create(
        scenario: &Scenario,
        username: impl Into<String>,
        customizations: BTreeMap<String, String>,
    ) -> Self {
        let attributes = initialize_attributes(scenario, &customizations);
        let skills = initialize_skills(scenario, &attributes);

        Self {
            id: PlayerId::new(),
            username: username.into(),
            attributes,
            skills,
            customizations,
        }
    }
}
