use crate::rules::cards::{starter, CardId};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read the config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse the config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Starting values of a combatant.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct EntityStats {
    pub max_health: i32,
    pub max_energy: i32,
    #[serde(default)]
    pub base_crit_chance: f64,
}

impl EntityStats {
    pub fn new(max_health: i32, max_energy: i32) -> Self {
        Self {
            max_health,
            max_energy,
            base_crit_chance: 0.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CombatConfig {
    pub player: EntityStats,
    pub local_pet: EntityStats,
    /// Used for the opponent's pet until its owner publishes a record.
    pub opponent_pet_fallback: EntityStats,
    pub player_hand_size: u32,
    pub pet_hand_size: u32,
    pub player_deck: Vec<CardId>,
    /// The deck manifest of this peer's own pet.
    pub pet_deck: Vec<CardId>,
    pub seed: Option<u64>,
    pub turn_limit: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            player: EntityStats {
                max_health: 60,
                max_energy: 3,
                base_crit_chance: 5.0,
            },
            local_pet: EntityStats::new(40, 3),
            opponent_pet_fallback: EntityStats::new(40, 3),
            player_hand_size: 5,
            pet_hand_size: 3,
            player_deck: starter::player_deck(),
            pet_deck: starter::pet_deck(),
            seed: None,
            turn_limit: 50,
        }
    }
}

impl CombatConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
