//! Simulation Configuration
//!
//! Tunable physics and gameplay constants. Defaults are the stock game
//! values; hosts may override any subset from JSON.

use std::path::Path;
use serde::{Serialize, Deserialize};

use crate::core::units::{
    GRAVITY, JUMP_SPEED, PLAYER_MAX_SPEED, BLOB_MAX_SPEED, FLY_MAX_SPEED,
    BULLET_SPEED, DIE_TIME_MS, STARTING_PISTOL_AMMO,
};

/// Errors raised while loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The config text is not valid JSON for [`SimConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for the simulation.
///
/// Speeds are px/ms, accelerations px/ms², durations ms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Downward acceleration applied to every non-flying creature
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative is up)
    pub jump_speed: f32,
    /// Player horizontal speed while a move action is held
    pub player_max_speed: f32,
    /// Speed a woken blob starts walking at
    pub blob_max_speed: f32,
    /// Speed a woken fly starts flying at
    pub fly_max_speed: f32,
    /// Horizontal speed of a fired bullet
    pub bullet_speed: f32,
    /// Time spent dying before a creature is dead
    pub die_time_ms: u64,
    /// Pistol rounds the player spawns with
    pub starting_pistol_ammo: u32,
    /// Tile column the player spawns in
    pub player_spawn_tile_x: i32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_speed: JUMP_SPEED,
            player_max_speed: PLAYER_MAX_SPEED,
            blob_max_speed: BLOB_MAX_SPEED,
            fly_max_speed: FLY_MAX_SPEED,
            bullet_speed: BULLET_SPEED,
            die_time_ms: DIE_TIME_MS,
            starting_pistol_ammo: STARTING_PISTOL_AMMO,
            player_spawn_tile_x: 3,
        }
    }
}

impl SimConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let config = SimConfig::default();
        assert_eq!(config.gravity, 0.002);
        assert_eq!(config.jump_speed, -0.95);
        assert_eq!(config.die_time_ms, 1000);
        assert_eq!(config.starting_pistol_ammo, 10);
        assert_eq!(config.player_spawn_tile_x, 3);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SimConfig::from_json_str(r#"{ "gravity": 0.0, "die_time_ms": 250 }"#).unwrap();
        assert_eq!(config.gravity, 0.0);
        assert_eq!(config.die_time_ms, 250);
        assert_eq!(config.bullet_speed, SimConfig::default().bullet_speed);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SimConfig::from_json_str(r#"{ "gravty": 1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SimConfig::load("/nonexistent/platformer.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
