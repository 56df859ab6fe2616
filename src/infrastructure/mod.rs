//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: SQLite storage for saved games and custom stories
//! - HTTP: REST API routes
//! - OpenAI: chat completion client used for narration
//! - Scenario catalog: built-in scenario definitions
//! - Config: Application configuration
//! - State: Shared application state
//! - Session: Active game sessions and turn slots

pub mod config;
pub mod http;
pub mod openai;
pub mod persistence;
pub mod scenario_catalog;
pub mod session;
pub mod state;
