//! Session configuration.
//!
//! A `GameConfig` is built once when a raid starts and handed by reference
//! to everything that needs it. Nothing mutates it afterwards, so changing
//! difficulty means starting a new session.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{GameError, GameResult};

/// Difficulty selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];

    /// Scaling applied to enemies for this difficulty.
    pub fn preset(self) -> DifficultyPreset {
        match self {
            Difficulty::Easy => DifficultyPreset {
                health_multiplier: 0.75,
                damage_multiplier: 0.5,
                spawn_min: 3,
                spawn_max: 5,
            },
            Difficulty::Normal => DifficultyPreset {
                health_multiplier: 1.0,
                damage_multiplier: 1.0,
                spawn_min: 5,
                spawn_max: 8,
            },
            Difficulty::Hard => DifficultyPreset {
                health_multiplier: 1.5,
                damage_multiplier: 1.5,
                spawn_min: 8,
                spawn_max: 12,
            },
            Difficulty::Extreme => DifficultyPreset {
                health_multiplier: 2.0,
                damage_multiplier: 2.0,
                spawn_min: 12,
                spawn_max: 16,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::UnknownDifficulty(s.to_string()))
    }
}

/// Enemy health/damage multipliers and spawn count range for a difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyPreset {
    pub health_multiplier: f32,
    pub damage_multiplier: f32,
    pub spawn_min: usize,
    pub spawn_max: usize,
}

impl DifficultyPreset {
    /// Roll how many enemies to spawn (inclusive range).
    pub fn spawn_count(&self, rng: &mut impl Rng) -> usize {
        rng.gen_range(self.spawn_min..=self.spawn_max.max(self.spawn_min))
    }

    pub fn scale_health(&self, base: f32) -> f32 {
        (base * self.health_multiplier).max(1.0)
    }
}

/// Immutable per-session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    /// Seed for the session RNG; the same seed replays the same raid
    pub seed: u64,
    pub map_width: f32,
    pub map_height: f32,
    /// Seconds before the player is declared missing in action
    pub raid_time_limit: f32,
    pub inventory_size: usize,
    pub extraction_time: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            seed: 0,
            map_width: MAP_DEFAULT_WIDTH,
            map_height: MAP_DEFAULT_HEIGHT,
            raid_time_limit: RAID_TIME_LIMIT,
            inventory_size: DEFAULT_INVENTORY_SIZE,
            extraction_time: EXTRACTION_TIME,
        }
    }
}

impl GameConfig {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            seed,
            ..Self::default()
        }
    }

    /// Parse a config from JSON. Missing fields take their defaults and
    /// out-of-range numbers are clamped.
    pub fn from_json(json: &str) -> GameResult<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn preset(&self) -> DifficultyPreset {
        self.difficulty.preset()
    }

    /// Clamp numeric fields into ranges the simulation can run with.
    pub fn sanitized(mut self) -> Self {
        let min_side = MAP_EDGE_MARGIN * 4.0;
        self.map_width = finite_or(self.map_width, MAP_DEFAULT_WIDTH).max(min_side);
        self.map_height = finite_or(self.map_height, MAP_DEFAULT_HEIGHT).max(min_side);
        self.raid_time_limit = finite_or(self.raid_time_limit, RAID_TIME_LIMIT).max(1.0);
        self.extraction_time = finite_or(self.extraction_time, EXTRACTION_TIME).max(0.0);
        self.inventory_size = self.inventory_size.max(1);
        self
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    #[rstest]
    #[case("easy", Difficulty::Easy)]
    #[case("Normal", Difficulty::Normal)]
    #[case(" HARD ", Difficulty::Hard)]
    #[case("extreme", Difficulty::Extreme)]
    fn test_difficulty_from_str(#[case] input: &str, #[case] expected: Difficulty) {
        assert_eq!(input.parse::<Difficulty>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_difficulty_rejected() {
        let err = "nightmare".parse::<Difficulty>().unwrap_err();
        assert!(matches!(err, GameError::UnknownDifficulty(name) if name == "nightmare"));
    }

    #[test]
    fn test_presets_get_harder() {
        let presets: Vec<_> = Difficulty::ALL.iter().map(|d| d.preset()).collect();
        for pair in presets.windows(2) {
            assert!(pair[1].health_multiplier > pair[0].health_multiplier);
            assert!(pair[1].damage_multiplier > pair[0].damage_multiplier);
            assert!(pair[1].spawn_min >= pair[0].spawn_max);
        }
    }

    #[test]
    fn test_spawn_count_within_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let preset = Difficulty::Hard.preset();
        for _ in 0..100 {
            let n = preset.spawn_count(&mut rng);
            assert!((preset.spawn_min..=preset.spawn_max).contains(&n));
        }
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = GameConfig::from_json(r#"{"difficulty": "hard", "seed": 42}"#).unwrap();
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.seed, 42);
        assert_eq!(config.inventory_size, DEFAULT_INVENTORY_SIZE);
        assert_eq!(config.map_width, MAP_DEFAULT_WIDTH);
    }

    #[test]
    fn test_from_json_clamps_numbers() {
        let config =
            GameConfig::from_json(r#"{"map_width": 10.0, "inventory_size": 0, "extraction_time": -3.0}"#)
                .unwrap();
        assert_eq!(config.map_width, MAP_EDGE_MARGIN * 4.0);
        assert_eq!(config.inventory_size, 1);
        assert_eq!(config.extraction_time, 0.0);
    }

    #[test]
    fn test_from_json_rejects_unknown_difficulty() {
        let result = GameConfig::from_json(r#"{"difficulty": "nightmare"}"#);
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));
    }
}
