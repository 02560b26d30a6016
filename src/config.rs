//! Run configuration: difficulty tiers, pursuer count, lives and controls.

use bevy_ecs::resource::Resource;
use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::constants::{DEFAULT_PURSUERS, MAX_PURSUERS};
use crate::error::ConfigError;
use crate::input::ControlScheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// The tuning a difficulty tier resolves to.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct DifficultySettings {
    /// Length of a Vulnerable window.
    pub vulnerable_seconds: f32,
    /// Base pursuer speed, pixels per second.
    pub pursuer_speed: f32,
    /// Base player speed, pixels per second.
    pub player_speed: f32,
}

impl Difficulty {
    pub fn settings(self) -> DifficultySettings {
        match self {
            Difficulty::Easy => DifficultySettings {
                vulnerable_seconds: 8.0,
                pursuer_speed: 70.0,
                player_speed: 96.0,
            },
            Difficulty::Normal => DifficultySettings {
                vulnerable_seconds: 6.0,
                pursuer_speed: 80.0,
                player_speed: 90.0,
            },
            Difficulty::Hard => DifficultySettings {
                vulnerable_seconds: 5.0,
                pursuer_speed: 88.0,
                player_speed: 88.0,
            },
        }
    }
}

/// Which keys may steer the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Controls {
    Arrows,
    Wasd,
    #[default]
    Both,
}

impl Controls {
    pub fn scheme(self) -> ControlScheme {
        match self {
            Controls::Arrows => ControlScheme::ARROWS,
            Controls::Wasd => ControlScheme::WASD,
            Controls::Both => ControlScheme::BOTH,
        }
    }
}

/// Options fixed for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    /// Number of pursuers, `1..=4`.
    pub pursuers: u8,
    /// Lives at the start of the run.
    pub lives: u8,
    pub controls: Controls,
    /// Seed for pursuer randomness. Unseeded runs draw from the OS.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            pursuers: DEFAULT_PURSUERS,
            lives: 3,
            controls: Controls::Both,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Checks the options that the type system does not.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pursuers == 0 || self.pursuers as usize > MAX_PURSUERS {
            return Err(ConfigError::PursuerCount {
                found: self.pursuers,
                max: MAX_PURSUERS,
            });
        }
        if self.lives == 0 {
            return Err(ConfigError::NoLives);
        }
        Ok(())
    }

    pub fn settings(&self) -> DifficultySettings {
        self.difficulty.settings()
    }
}

/// Builds a [`GameConfig`] from defaults overridden by `MAZECHASE_*` environment variables.
///
/// For example `MAZECHASE_DIFFICULTY=hard MAZECHASE_PURSUERS=2`.
pub fn load_config() -> Result<GameConfig, ConfigError> {
    load_from(Figment::from(Serialized::defaults(GameConfig::default())).merge(Env::prefixed("MAZECHASE_")))
}

fn load_from(figment: Figment) -> Result<GameConfig, ConfigError> {
    let config: GameConfig = figment.extract().map_err(Box::new)?;
    config.validate()?;
    Ok(config)
}
