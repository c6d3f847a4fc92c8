//! Engine configuration loaded from TOML.

use crate::board::Mark;
use crate::game::GameMode;
use crate::search::Difficulty;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings for a play session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Mode a new session starts in.
    #[serde(default)]
    mode: GameMode,

    /// AI tier.
    #[serde(default)]
    difficulty: Difficulty,

    /// Mark the AI plays in versus-AI mode.
    #[serde(default = "default_ai_mark")]
    ai_mark: Mark,

    /// Pause before the AI replies, in milliseconds.
    #[serde(default = "default_ai_delay_ms")]
    ai_delay_ms: u64,
}

#[instrument]
fn default_ai_mark() -> Mark {
    Mark::O
}

#[instrument]
fn default_ai_delay_ms() -> u64 {
    500
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            difficulty: Difficulty::default(),
            ai_mark: default_ai_mark(),
            ai_delay_ms: default_ai_delay_ms(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!(mode = %config.mode, difficulty = %config.difficulty, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// The AI delay as a duration.
    pub fn ai_delay(&self) -> Duration {
        Duration::from_millis(self.ai_delay_ms)
    }

    /// Overrides the mode.
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    /// Overrides the difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Overrides the AI mark.
    pub fn with_ai_mark(mut self, ai_mark: Mark) -> Self {
        self.ai_mark = ai_mark;
        self
    }

    /// Overrides the AI delay.
    pub fn with_ai_delay_ms(mut self, ai_delay_ms: u64) -> Self {
        self.ai_delay_ms = ai_delay_ms;
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
