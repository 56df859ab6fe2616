//! Prompt building functions for LLM requests

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::application::ports::outbound::ChatMessage;
use crate::domain::entities::{GameMessage, MessageRole, Player, Scenario};
use crate::domain::value_objects::D20Roll;

/// Opening user turn for story-mode games
pub const STORY_START_MESSAGE: &str = "I'd like to start playing this game. Please introduce the scenario and give me my first situation to respond to.";

/// Build the Dungeon Master directive for one turn
///
/// Carries the scenario title, the full character sheet, the roll that was
/// just drawn and the band guidance for reading it.
pub fn build_turn_system_prompt(scenario: &Scenario, player: &Player, roll: D20Roll) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "You are the Dungeon Master for a role-playing game based on: \"{}\".\n",
        scenario.name
    ));
    if !scenario.starting_point.is_empty() {
        prompt.push_str(&format!("The story began with: {}\n", scenario.starting_point));
    }
    prompt.push('\n');

    prompt.push_str(&format!(
        "The player's attributes are: {}\n",
        join_pairs(&player.attributes)
    ));
    prompt.push_str(&format!(
        "The player's skills are: {}\n",
        join_pairs(&player.skills)
    ));
    prompt.push_str(&format!(
        "The player's customizations are: {}\n\n",
        join_pairs(&player.customizations)
    ));

    prompt.push_str("You should:\n");
    prompt.push_str("1. Interpret the player's action\n");
    prompt.push_str("2. Consider the player's attributes and skills that might be relevant\n");
    prompt.push_str(&format!(
        "3. Take into account the randomly generated D20 roll: {} (higher is better)\n",
        roll
    ));
    prompt.push_str("4. Determine the outcome and narrate the result in an engaging way\n");
    prompt.push_str("5. End with a prompt or question that encourages the player's next action\n\n");

    prompt.push_str("Interpret the roll using these bands:\n");
    for band in &scenario.roll_bands {
        prompt.push_str(&format!("- {}: {}\n", band.label(), band.outcome));
    }
    prompt.push('\n');

    prompt.push_str("Keep the tone consistent with the scenario. Be creative and immersive.\n");
    prompt.push_str(
        "Remember the game's history and maintain continuity. Good outcomes should generally \
         correspond with higher dice rolls, especially if the player has relevant high attributes.",
    );

    prompt
}

/// Directive for the opening narration of a scenario
pub fn build_introduction_prompt(scenario: &Scenario) -> String {
    format!(
        "You are a Dungeon Master for a role-playing game based on the scenario: \"{}\".\n\
         Create an engaging and immersive introduction to the game. Use a second-person narrative \
         style to pull the player into the world.\n\
         The starting point for the scenario is: \"{}\".\n\
         Make it fun, engaging, and set the stage for an interactive adventure.",
        scenario.name, scenario.starting_point
    )
}

/// Map game history onto the two-party chat scheme
pub fn history_to_messages(history: &[GameMessage]) -> Vec<ChatMessage> {
    history
        .iter()
        .map(|message| match message.role {
            MessageRole::Narrator => ChatMessage::assistant(message.content.clone()),
            MessageRole::Player => ChatMessage::user(message.content.clone()),
        })
        .collect()
}

fn join_pairs<V: Display>(values: &BTreeMap<String, V>) -> String {
    if values.is_empty() {
        return "none".to_string();
    }
    values
        .iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect::<Vec<_>>()
        .join(", ")
}
