//! Character initialization - starting attributes and derived skills
//!
//! Bonuses are plain integer additions, so the order in which customization
//! choices are applied never changes the result.

use std::collections::BTreeMap;

use crate::domain::entities::{Scenario, BASE_ATTRIBUTE_VALUE};

/// Compute starting attribute values for a set of customization choices
///
/// Every attribute declared by the scenario starts at the base value. Each
/// `(category, option)` pair adds the option's bonuses. Unknown categories,
/// unknown options and bonuses naming undeclared attributes are skipped.
pub fn initialize_attributes<K, V>(
    scenario: &Scenario,
    customizations: impl IntoIterator<Item = (K, V)>,
) -> BTreeMap<String, i32>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut attributes: BTreeMap<String, i32> = scenario
        .attribute_names()
        .map(|name| (name.to_string(), BASE_ATTRIBUTE_VALUE))
        .collect();

    for (category, choice) in customizations {
        let Some(option) = scenario.customization_option(category.as_ref(), choice.as_ref()) else {
            continue;
        };
        for (attribute, bonus) in &option.attribute_bonus {
            if let Some(value) = attributes.get_mut(attribute) {
                *value += bonus;
            }
        }
    }

    attributes
}

/// Derive skill values; each skill copies its attribute, or 0 if it is absent
pub fn initialize_skills(
    scenario: &Scenario,
    attributes: &BTreeMap<String, i32>,
) -> BTreeMap<String, i32> {
    scenario
        .base_skills
        .iter()
        .map(|(skill, definition)| {
            let value = attributes.get(&definition.attribute).copied().unwrap_or(0);
            (skill.clone(), value)
        })
        .collect()
}

/// Human-readable listing of every customization category and its options
pub fn describe_customizations(scenario: &Scenario) -> String {
    scenario
        .customization_categories
        .iter()
        .map(|(key, category)| {
            let options = category
                .options
                .iter()
                .map(|(name, option)| format!("- {}: {}", name, option.description))
                .collect::<Vec<_>>()
                .join("\n");
            format!("{}: {}\nOptions:\n{}", key, category.description, options)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
