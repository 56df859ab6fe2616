//! Scenario entity - a playable setting template
//!
//! A scenario declares the attributes a character is measured by, the skills
//! derived from those attributes, and the customization categories a player
//! picks from at character creation. Scenarios are immutable once the catalog
//! is built and are validated on the way in.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{default_roll_bands, RollBand, D20_MAX, D20_MIN};

/// Every attribute starts at this value before customization bonuses
pub const BASE_ATTRIBUTE_VALUE: i32 = 5;

/// A playable setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Catalog key, e.g. "asian-parent"
    pub id: String,
    /// Display title
    pub name: String,
    /// Narrative seed text
    pub starting_point: String,
    /// Short introduction shown before story-mode play
    #[serde(default)]
    pub introduction: String,
    /// Dungeon Master guidance for story-mode play
    #[serde(default)]
    pub story_prompt: String,
    pub attributes: Vec<AttributeDefinition>,
    #[serde(default)]
    pub base_skills: BTreeMap<String, SkillDefinition>,
    #[serde(default)]
    pub customization_categories: BTreeMap<String, CustomizationCategory>,
    #[serde(default = "default_roll_bands")]
    pub roll_bands: Vec<RollBand>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A skill whose value is copied from a single attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDefinition {
    pub attribute: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationCategory {
    pub description: String,
    pub options: BTreeMap<String, CustomizationOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationOption {
    pub description: String,
    #[serde(default)]
    pub attribute_bonus: BTreeMap<String, i32>,
}

/// Reasons a scenario definition is rejected when the catalog is built
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioValidationError {
    #[error("Scenario id cannot be empty")]
    EmptyId,

    #[error("Scenario '{0}' has no name")]
    EmptyName(String),

    #[error("Scenario '{0}' declares no attributes")]
    NoAttributes(String),

    #[error("Scenario '{scenario}' declares attribute '{attribute}' more than once")]
    DuplicateAttribute { scenario: String, attribute: String },

    #[error("Scenario '{scenario}': skill '{skill}' derives from unknown attribute '{attribute}'")]
    UnknownSkillAttribute {
        scenario: String,
        skill: String,
        attribute: String,
    },

    #[error(
        "Scenario '{scenario}': option '{category}/{option}' grants a bonus to unknown attribute '{attribute}'"
    )]
    UnknownBonusAttribute {
        scenario: String,
        category: String,
        option: String,
        attribute: String,
    },

    #[error(
        "Scenario '{scenario}': option '{category}/{option}' lowers '{attribute}' by {bonus}; bonuses cannot be negative"
    )]
    NegativeBonus {
        scenario: String,
        category: String,
        option: String,
        attribute: String,
        bonus: i32,
    },

    #[error("Scenario '{scenario}': customization category '{category}' has no options")]
    EmptyCategory { scenario: String, category: String },

    #[error("Scenario '{scenario}': invalid roll bands: {reason}")]
    InvalidRollBands { scenario: String, reason: String },

    #[error("Scenario '{0}' is defined more than once")]
    DuplicateScenario(String),
}

impl Scenario {
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    /// Look up a customization option by category key and option name
    pub fn customization_option(&self, category: &str, option: &str) -> Option<&CustomizationOption> {
        self.customization_categories
            .get(category)
            .and_then(|c| c.options.get(option))
    }

    /// Check the structural invariants of the definition
    pub fn validate(&self) -> Result<(), ScenarioValidationError> {
        if self.id.trim().is_empty() {
            return Err(ScenarioValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(ScenarioValidationError::EmptyName(self.id.clone()));
        }
        if self.attributes.is_empty() {
            return Err(ScenarioValidationError::NoAttributes(self.id.clone()));
        }

        let mut seen = HashSet::new();
        for attribute in &self.attributes {
            if !seen.insert(attribute.name.as_str()) {
                return Err(ScenarioValidationError::DuplicateAttribute {
                    scenario: self.id.clone(),
                    attribute: attribute.name.clone(),
                });
            }
        }

        for (skill, definition) in &self.base_skills {
            if !self.has_attribute(&definition.attribute) {
                return Err(ScenarioValidationError::UnknownSkillAttribute {
                    scenario: self.id.clone(),
                    skill: skill.clone(),
                    attribute: definition.attribute.clone(),
                });
            }
        }

        for (category_key, category) in &self.customization_categories {
            if category.options.is_empty() {
                return Err(ScenarioValidationError::EmptyCategory {
                    scenario: self.id.clone(),
                    category: category_key.clone(),
                });
            }
            for (option_name, option) in &category.options {
                if let Some(attribute) = option
                    .attribute_bonus
                    .keys()
                    .find(|attribute| !self.has_attribute(attribute))
                {
                    return Err(ScenarioValidationError::UnknownBonusAttribute {
                        scenario: self.id.clone(),
                        category: category_key.clone(),
                        option: option_name.clone(),
                        attribute: attribute.clone(),
                    });
                }
                // attributes never drop below the base value
                if let Some((attribute, bonus)) =
                    option.attribute_bonus.iter().find(|(_, bonus)| **bonus < 0)
                {
                    return Err(ScenarioValidationError::NegativeBonus {
                        scenario: self.id.clone(),
                        category: category_key.clone(),
                        option: option_name.clone(),
                        attribute: attribute.clone(),
                        bonus: -*bonus,
                    });
                }
            }
        }

        self.validate_roll_bands()
    }

    /// Bands must tile 1..=20 in ascending order with no gaps or overlaps
    fn validate_roll_bands(&self) -> Result<(), ScenarioValidationError> {
        let invalid = |reason: String| ScenarioValidationError::InvalidRollBands {
            scenario: self.id.clone(),
            reason,
        };

        let mut next = D20_MIN;
        for band in &self.roll_bands {
            if band.min != next {
                return Err(invalid(format!(
                    "band {} should start at {}",
                    band.label(),
                    next
                )));
            }
            if band.max < band.min || band.max > D20_MAX {
                return Err(invalid(format!("band {} is out of range", band.label())));
            }
            if band.outcome.trim().is_empty() {
                return Err(invalid(format!("band {} has no outcome text", band.label())));
            }
            next = band.max + 1;
        }
        if next != D20_MAX + 1 {
            return Err(invalid(format!("bands stop before {}", D20_MAX)));
        }
        Ok(())
    }
}
