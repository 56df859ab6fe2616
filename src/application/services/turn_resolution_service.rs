//! Turn resolution - rolls the die, builds the narrator context and asks the
//! narrative generation service what happens next.
//!
//! Resolution never mutates the game state. Generation failures are folded
//! into a fixed fallback narration so a flaky backend never blocks play.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::application::ports::outbound::{ChatMessage, DiceRollerPort, LlmPort, LlmRequest};
use crate::application::services::llm::complete_with_timeout;
use crate::application::services::llm::prompt_builder::{
    build_introduction_prompt, build_turn_system_prompt, history_to_messages,
};
use crate::domain::entities::{GameState, Scenario};
use crate::domain::errors::GameError;
use crate::domain::value_objects::{band_for_roll, D20Roll};

pub const FALLBACK_NARRATION: &str = "The system is experiencing some issues. Please try again.";
pub const EMPTY_NARRATION: &str = "Something happens...";
pub const FALLBACK_INTRODUCTION: &str =
    "Welcome to the game! (Error generating custom introduction)";

/// Generation knobs for turns and introductions
#[derive(Debug, Clone)]
pub struct NarrationSettings {
    /// Prior messages sent as context with each turn
    pub history_window: usize,
    pub max_output_tokens: u32,
    pub turn_temperature: f32,
    pub intro_temperature: f32,
    pub timeout: Duration,
}

impl Default for NarrationSettings {
    fn default() -> Self {
        Self {
            history_window: 5,
            max_output_tokens: 500,
            turn_temperature: 0.8,
            intro_temperature: 0.7,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Outcome of one resolved turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnResolution {
    pub roll: D20Roll,
    pub narration: String,
    /// False when the fallback narration stands in for a failed generation
    pub generated: bool,
}

pub struct TurnResolutionService {
    llm: Arc<dyn LlmPort>,
    dice: Arc<dyn DiceRollerPort>,
    settings: NarrationSettings,
}

impl TurnResolutionService {
    pub fn new(
        llm: Arc<dyn LlmPort>,
        dice: Arc<dyn DiceRollerPort>,
        settings: NarrationSettings,
    ) -> Self {
        Self {
            llm,
            dice,
            settings,
        }
    }

    /// Narrated outcome of `action` against the current state
    pub async fn resolve_turn(
        &self,
        state: &GameState,
        action: &str,
        scenario: &Scenario,
    ) -> Result<String, GameError> {
        Ok(self
            .resolve_turn_detailed(state, action, scenario)
            .await?
            .narration)
    }

    /// Same as [`Self::resolve_turn`] but also reports the roll and whether
    /// the narration came from the generator
    #[instrument(skip(self, state, action, scenario), fields(game_id = %state.id, turn = state.current_turn))]
    pub async fn resolve_turn_detailed(
        &self,
        state: &GameState,
        action: &str,
        scenario: &Scenario,
    ) -> Result<TurnResolution, GameError> {
        let action = action.trim();
        if action.is_empty() {
            return Err(GameError::InvalidInput(
                "Player action cannot be empty".to_string(),
            ));
        }
        if state.is_ended {
            return Err(GameError::InvalidState(format!(
                "Game {} has ended and accepts no further actions",
                state.id
            )));
        }

        let roll = self.dice.roll_d20();
        let band = band_for_roll(&scenario.roll_bands, roll).map(|b| b.outcome.as_str());
        debug!(roll = %roll, band = band.unwrap_or("unbanded"), "Rolled D20");

        let mut messages = history_to_messages(state.recent_history(self.settings.history_window));
        messages.push(ChatMessage::user(action));

        let request = LlmRequest::new(messages)
            .with_system_prompt(build_turn_system_prompt(scenario, &state.player, roll))
            .with_temperature(self.settings.turn_temperature)
            .with_max_tokens(self.settings.max_output_tokens);

        let resolution = match complete_with_timeout(self.llm.as_ref(), request, self.settings.timeout).await {
            Ok(text) if text.trim().is_empty() => TurnResolution {
                roll,
                narration: EMPTY_NARRATION.to_string(),
                generated: true,
            },
            Ok(text) => TurnResolution {
                roll,
                narration: text,
                generated: true,
            },
            Err(e) => {
                warn!("Narration failed, using fallback: {}", e);
                TurnResolution {
                    roll,
                    narration: FALLBACK_NARRATION.to_string(),
                    generated: false,
                }
            }
        };

        Ok(resolution)
    }

    /// Second-person opening narration for a scenario
    #[instrument(skip(self, scenario), fields(scenario = %scenario.id))]
    pub async fn generate_introduction(&self, scenario: &Scenario) -> String {
        let request = LlmRequest::new(vec![ChatMessage::user(
            "Please provide an introduction to the game.",
        )])
        .with_system_prompt(build_introduction_prompt(scenario))
        .with_temperature(self.settings.intro_temperature)
        .with_max_tokens(self.settings.max_output_tokens);

        match complete_with_timeout(self.llm.as_ref(), request, self.settings.timeout).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => FALLBACK_INTRODUCTION.to_string(),
            Err(e) => {
                warn!("Introduction generation failed: {}", e);
                FALLBACK_INTRODUCTION.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::application::ports::outbound::{MessageRole, MockDiceRollerPort};
    use crate::application::services::test_support::ScriptedLlm;
    use crate::domain::entities::scenario::fixtures::parenting_scenario;

    fn fixed_dice(value: u8) -> Arc<dyn DiceRollerPort> {
        let mut dice = MockDiceRollerPort::new();
        dice.expect_roll_d20()
            .return_const(D20Roll::new(value).unwrap());
        Arc::new(dice)
    }

    fn service(llm: Arc<ScriptedLlm>, roll: u8) -> TurnResolutionService {
        TurnResolutionService::new(llm, fixed_dice(roll), NarrationSettings::default())
    }

    fn game_with_history(player_turns: usize) -> GameState {
        let choices = BTreeMap::from([("background".to_string(), "Tiger Parent".to_string())]);
        let mut state = GameState::start(&parenting_scenario(), "Alice", choices).unwrap();
        for i in 0..player_turns {
            state.append_player_message(format!("action {}", i)).unwrap();
            state.append_narrator_message(format!("reply {}", i));
        }
        state
    }

    #[tokio::test]
    async fn test_resolve_turn_returns_narration_verbatim() {
        let llm = Arc::new(ScriptedLlm::replying("Your son wins the spelling bee."));
        let service = service(llm.clone(), 17);
        let state = game_with_history(0);

        let narration = service
            .resolve_turn(&state, "Drill him on vocabulary", &parenting_scenario())
            .await
            .unwrap();

        assert_eq!(narration, "Your son wins the spelling bee.");
        let request = llm.last_request();
        assert_eq!(request.temperature, Some(0.8));
        assert_eq!(request.max_tokens, Some(500));
        let prompt = request.system_prompt.unwrap();
        assert!(prompt.contains("D20 roll: 17"));
        assert!(prompt.contains("Academic Performance: 8"));
        assert!(prompt.contains("Math: 8"));
        assert!(prompt.contains("background: Tiger Parent"));
    }

    #[tokio::test]
    async fn test_history_window_is_bounded() {
        let llm = Arc::new(ScriptedLlm::replying("ok"));
        let service = service(llm.clone(), 10);
        let state = game_with_history(6);
        assert_eq!(state.history.len(), 13);

        service
            .resolve_turn(&state, "Next move", &parenting_scenario())
            .await
            .unwrap();

        let request = llm.last_request();
        // five prior messages plus the new action
        assert_eq!(request.messages.len(), 6);
        assert_eq!(request.messages[0].content, "reply 3");
        assert_eq!(request.messages[0].role, MessageRole::Assistant);
        assert_eq!(request.messages[4].content, "reply 5");
        let newest = request.messages.last().unwrap();
        assert_eq!(newest.role, MessageRole::User);
        assert_eq!(newest.content, "Next move");
    }

    #[tokio::test]
    async fn test_failure_yields_fallback_without_mutation() {
        let llm = Arc::new(ScriptedLlm::failing());
        let service = service(llm, 3);
        let state = game_with_history(1);
        let before = state.clone();

        let resolution = service
            .resolve_turn_detailed(&state, "Hide the report card", &parenting_scenario())
            .await
            .unwrap();

        assert_eq!(resolution.narration, FALLBACK_NARRATION);
        assert!(!resolution.generated);
        assert_eq!(resolution.roll.value(), 3);
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn test_timeout_yields_fallback() {
        let llm = Arc::new(ScriptedLlm::hanging());
        let settings = NarrationSettings {
            timeout: Duration::from_millis(20),
            ..NarrationSettings::default()
        };
        let service = TurnResolutionService::new(llm, fixed_dice(12), settings);

        let narration = service
            .resolve_turn(&game_with_history(0), "Wait", &parenting_scenario())
            .await
            .unwrap();

        assert_eq!(narration, FALLBACK_NARRATION);
    }

    #[tokio::test]
    async fn test_empty_completion_reads_something_happens() {
        let llm = Arc::new(ScriptedLlm::replying("   "));
        let service = service(llm, 8);

        let narration = service
            .resolve_turn(&game_with_history(0), "Look around", &parenting_scenario())
            .await
            .unwrap();

        assert_eq!(narration, EMPTY_NARRATION);
    }

    #[tokio::test]
    async fn test_blank_action_rejected_before_generation() {
        let llm = Arc::new(ScriptedLlm::replying("unused"));
        let service = TurnResolutionService::new(
            llm.clone(),
            Arc::new(MockDiceRollerPort::new()),
            NarrationSettings::default(),
        );

        let result = service
            .resolve_turn(&game_with_history(0), "  ", &parenting_scenario())
            .await;

        assert!(matches!(result, Err(GameError::InvalidInput(_))));
        assert!(llm.requests().is_empty());
    }

    #[tokio::test]
    async fn test_ended_game_rejected_before_generation() {
        let llm = Arc::new(ScriptedLlm::replying("unused"));
        let service = service(llm.clone(), 5);
        let mut state = game_with_history(0);
        state.end();

        let result = service
            .resolve_turn(&state, "Keep going", &parenting_scenario())
            .await;

        assert!(matches!(result, Err(GameError::InvalidState(_))));
        assert!(llm.requests().is_empty());
    }

    #[tokio::test]
    async fn test_introduction_uses_fallback_on_failure() {
        let failing = service(Arc::new(ScriptedLlm::failing()), 1);
        let intro = failing.generate_introduction(&parenting_scenario()).await;
        assert_eq!(intro, FALLBACK_INTRODUCTION);

        let llm = Arc::new(ScriptedLlm::replying("You wake to the sound of a tiger mom."));
        let working = service(llm.clone(), 1);
        let intro = working.generate_introduction(&parenting_scenario()).await;
        assert_eq!(intro, "You wake to the sound of a tiger mom.");
        assert_eq!(llm.last_request().temperature, Some(0.7));
    }
}
