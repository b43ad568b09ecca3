//! Game tunables.
//!
//! Defaults reproduce the reference reward curve and difficulty banding. A JSON
//! override can be supplied through `PUZZLE_CONFIG_PATH`.

use crate::error::{GameError, GameResult};
use serde::{Deserialize, Serialize};
use std::{env, fs};

pub const CONFIG_PATH_ENV: &str = "PUZZLE_CONFIG_PATH";

pub const DEFAULT_MAX_LEVEL: u32 = 3200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Highest playable level number
    pub max_level: u32,
    /// Reward at level 0 (before the per-level step is added)
    pub reward_base: f64,
    /// Saturation point of the reward curve
    pub reward_cap: f64,
    /// Levels per whole currency unit of reward growth
    pub reward_step: f64,
    /// Levels per difficulty tier
    pub tier_band: u32,
    pub max_tier: u8,
    /// Hint cost as a fraction of the level reward
    pub hint_cost_ratio: f64,
    /// Skip cost as a multiple of the level reward
    pub skip_cost_ratio: f64,
    /// Base seed for decoys and shuffles (never for canonical answers)
    pub decoy_seed: u64,
    pub leaderboard_size: usize,
    /// Serve the hand-authored table for the lowest levels
    pub use_embedded_levels: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            reward_base: 1.0,
            reward_cap: 3.0,
            reward_step: 1000.0,
            tier_band: 600,
            max_tier: 5,
            hint_cost_ratio: 0.5,
            skip_cost_ratio: 2.0,
            decoy_seed: 0x5EED_B17_3000,
            leaderboard_size: 10,
            use_embedded_levels: true,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> GameResult<Self> {
        serde_json::from_str(json).map_err(|e| GameError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.max_level == 0 {
            return Err(GameError::InvalidConfig("max_level must be at least 1".into()));
        }
        if self.tier_band == 0 {
            return Err(GameError::InvalidConfig("tier_band must be at least 1".into()));
        }
        if !(1..=5).contains(&self.max_tier) {
            return Err(GameError::InvalidConfig(format!(
                "max_tier must be in 1..=5, got {}",
                self.max_tier
            )));
        }
        if self.reward_step <= 0.0 {
            return Err(GameError::InvalidConfig("reward_step must be positive".into()));
        }
        if self.reward_base < 0.0 || self.reward_cap < self.reward_base {
            return Err(GameError::InvalidConfig(format!(
                "reward curve must satisfy 0 <= base ({}) <= cap ({})",
                self.reward_base, self.reward_cap
            )));
        }
        if self.hint_cost_ratio <= 0.0 || self.skip_cost_ratio <= 0.0 {
            return Err(GameError::InvalidConfig("cost ratios must be positive".into()));
        }
        if self.leaderboard_size == 0 {
            return Err(GameError::InvalidConfig("leaderboard_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Load the file named by `PUZZLE_CONFIG_PATH`, or defaults when unset.
    pub fn from_env() -> GameResult<Self> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            GameError::InvalidConfig(format!(
                "Failed to read config from {CONFIG_PATH_ENV}='{path}': {e}"
            ))
        })?;

        let config = Self::from_json(&content)?;
        config.validate()?;
        log::info!("Loaded game config from {}", path);
        Ok(config)
    }

    /// `min(cap, base + level / step)`: non-decreasing and saturating.
    pub fn reward_for(&self, level_number: u32) -> f64 {
        (self.reward_base + level_number as f64 / self.reward_step).min(self.reward_cap)
    }

    /// `min(max_tier, ceil(level / band))`, never below 1.
    pub fn tier_for(&self, level_number: u32) -> u8 {
        let band = level_number.div_ceil(self.tier_band).max(1);
        band.min(self.max_tier as u32) as u8
    }

    pub fn hint_cost(&self, reward: f64) -> f64 {
        reward * self.hint_cost_ratio
    }

    pub fn skip_cost(&self, reward: f64) -> f64 {
        reward * self.skip_cost_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_reward_curve_reference_points() {
        let config = GameConfig::default();
        assert!((config.reward_for(1) - 1.001).abs() < 1e-9);
        assert!((config.reward_for(1000) - 2.0).abs() < 1e-9);
        assert!((config.reward_for(2000) - 3.0).abs() < 1e-9);
        assert!((config.reward_for(3200) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_tier_banding() {
        let config = GameConfig::default();
        assert_eq!(config.tier_for(1), 1);
        assert_eq!(config.tier_for(600), 1);
        assert_eq!(config.tier_for(601), 2);
        assert_eq!(config.tier_for(1800), 3);
        assert_eq!(config.tier_for(2400), 4);
        assert_eq!(config.tier_for(2401), 5);
        assert_eq!(config.tier_for(3200), 5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{"max_level": 100, "reward_cap": 5.0}"#).unwrap();
        assert_eq!(config.max_level, 100);
        assert_eq!(config.reward_cap, 5.0);
        assert_eq!(config.tier_band, 600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_inverted_curve() {
        let config = GameConfig { reward_base: 4.0, reward_cap: 3.0, ..GameConfig::default() };
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let config = GameConfig { tier_band: 0, ..GameConfig::default() };
        assert!(config.validate().is_err());
    }
}
