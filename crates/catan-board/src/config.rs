//! Board configuration.

use crate::rules::ProximityRule;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest radius a board may be configured with
pub const MAX_BOARD_SIZE: u32 = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid board config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("board size {size} exceeds the maximum of {max}")]
    TooLarge { size: u32, max: u32 },
}

/// Settings used when building a [`Board`](crate::Board)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Hex radius of the playable area (2 for the standard 19-tile board)
    pub size: u32,
    /// Rule applied to settlements placed without bypassing the road check
    pub proximity: ProximityRule,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: 2,
            proximity: ProximityRule::default(),
        }
    }
}

impl BoardConfig {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn with_proximity(mut self, proximity: ProximityRule) -> Self {
        self.proximity = proximity;
        self
    }

    /// Parse and validate a JSON config; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size > MAX_BOARD_SIZE {
            return Err(ConfigError::TooLarge {
                size: self.size,
                max: MAX_BOARD_SIZE,
            });
        }
        Ok(())
    }
}
