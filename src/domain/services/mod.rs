//! Domain services - pure game rules that span several entities

mod character_initializer;
mod game_setup;

pub use character_initializer::{describe_customizations, initialize_attributes, initialize_skills};
pub use game_setup::start_new_game;
