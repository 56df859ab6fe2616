//! Custom story entity - user-authored story-mode scenarios

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::StoryId;

const MAX_TITLE_LENGTH: usize = 200;
const MAX_DESCRIPTION_LENGTH: usize = 10_000;
const MAX_PROMPT_LENGTH: usize = 20_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitOption {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Free-text effect the narrator should take into account
    #[serde(default)]
    pub effect: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterTrait {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub options: Vec<TraitOption>,
}

/// The author-editable part of a story
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomStoryDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub background_image_url: Option<String>,
    pub system_prompt: String,
    pub introduction: String,
    #[serde(default)]
    pub character_traits: BTreeMap<String, CharacterTrait>,
    #[serde(default)]
    pub is_public: bool,
}

impl CustomStoryDraft {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Story title cannot be empty".to_string());
        }
        if self.title.len() > MAX_TITLE_LENGTH {
            return Err(format!(
                "Story title cannot exceed {} characters",
                MAX_TITLE_LENGTH
            ));
        }
        if self.description.len() > MAX_DESCRIPTION_LENGTH {
            return Err(format!(
                "Story description cannot exceed {} characters",
                MAX_DESCRIPTION_LENGTH
            ));
        }
        if self.system_prompt.trim().is_empty() {
            return Err("Story system prompt cannot be empty".to_string());
        }
        if self.system_prompt.len() > MAX_PROMPT_LENGTH {
            return Err(format!(
                "Story system prompt cannot exceed {} characters",
                MAX_PROMPT_LENGTH
            ));
        }
        if self.introduction.trim().is_empty() {
            return Err("Story introduction cannot be empty".to_string());
        }
        if self.introduction.len() > MAX_DESCRIPTION_LENGTH {
            return Err(format!(
                "Story introduction cannot exceed {} characters",
                MAX_DESCRIPTION_LENGTH
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomStory {
    pub id: StoryId,
    pub user_id: String,
    #[serde(flatten)]
    pub draft: CustomStoryDraft,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomStory {
    pub fn new(user_id: impl Into<String>, draft: CustomStoryDraft) -> Self {
        let now = Utc::now();
        Self {
            id: StoryId::new(),
            user_id: user_id.into(),
            draft,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_visible_to(&self, user_id: Option<&str>) -> bool {
        self.draft.is_public || user_id == Some(self.user_id.as_str())
    }

    /// Story prompt with the character traits appended for the narrator
    pub fn narrator_prompt(&self) -> String {
        let mut prompt = self.draft.system_prompt.clone();
        if self.draft.character_traits.is_empty() {
            return prompt;
        }

        prompt.push_str("\n\nCharacter traits the player may choose from:\n");
        for character_trait in self.draft.character_traits.values() {
            prompt.push_str(&format!(
                "- {}: {}\n",
                character_trait.name, character_trait.description
            ));
            for option in &character_trait.options {
                prompt.push_str(&format!("  * {} ({})", option.name, option.description));
                if !option.effect.is_empty() {
                    prompt.push_str(&format!(" - effect: {}", option.effect));
                }
                prompt.push('\n');
            }
        }
        prompt
    }
}

#[cfg(test)]
pub(crate) fn sample_draft() -> CustomStoryDraft {
    CustomStoryDraft {
        title: "Lighthouse Keeper".to_string(),
        description: "Keep the light burning through the storm".to_string(),
        background_image_url: None,
        system_prompt: "You are the narrator of a stormy coastal mystery.".to_string(),
        introduction: "The storm rolls in at dusk.".to_string(),
        character_traits: BTreeMap::from([(
            "temperament".to_string(),
            CharacterTrait {
                name: "Temperament".to_string(),
                description: "How the keeper handles pressure".to_string(),
                options: vec![TraitOption {
                    name: "Stoic".to_string(),
                    description: "Unflappable".to_string(),
                    effect: "Calm under pressure".to_string(),
                }],
            },
        )]),
        is_public: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_title_and_prompts() {
        assert!(sample_draft().validate().is_ok());

        let mut draft = sample_draft();
        draft.title = "  ".to_string();
        assert!(draft.validate().is_err());

        let mut draft = sample_draft();
        draft.system_prompt.clear();
        assert!(draft.validate().is_err());

        let mut draft = sample_draft();
        draft.title = "x".repeat(MAX_TITLE_LENGTH + 1);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_visibility() {
        let story = CustomStory::new("author", sample_draft());
        assert!(story.is_visible_to(Some("author")));
        assert!(!story.is_visible_to(Some("someone-else")));
        assert!(!story.is_visible_to(None));

        let mut public = story.clone();
        public.draft.is_public = true;
        assert!(public.is_visible_to(None));
    }

    #[test]
    fn test_narrator_prompt_includes_traits() {
        let story = CustomStory::new("author", sample_draft());
        let prompt = story.narrator_prompt();

        assert!(prompt.starts_with("You are the narrator"));
        assert!(prompt.contains("- Temperament: How the keeper handles pressure"));
        assert!(prompt.contains("* Stoic (Unflappable) - effect: Calm under pressure"));
    }

    #[test]
    fn test_wire_format_is_flat_camel_case() {
        let story = CustomStory::new("author", sample_draft());
        let value = serde_json::to_value(&story).unwrap();

        assert_eq!(value["title"], "Lighthouse Keeper");
        assert_eq!(value["userId"], "author");
        assert_eq!(value["isPublic"], false);
        assert!(value.get("draft").is_none());
    }
}
