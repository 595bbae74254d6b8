//! Session settings
//!
//! World constants are injected at session start, never owned by the sim.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    pub world_width: f32,
    pub world_height: f32,

    // === Camera viewport ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Timing ===
    /// Simulation ticks per second
    pub tick_rate: u32,

    // === Population ===
    /// Enemies spawned at session start
    pub enemy_count: u32,
    /// Probability that a spawned enemy is a Mother with minions
    pub mother_chance: f64,

    // === Player ===
    pub player_health: u32,

    /// Fixed run seed (random per run when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            tick_rate: TICK_RATE,
            enemy_count: 50,
            mother_chance: 0.25,
            player_health: PLAYER_START_HEALTH,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Fixed timestep in seconds
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Convert a duration in seconds to a tick count (at least one tick)
    pub fn ticks(&self, secs: f32) -> u32 {
        ((secs * self.tick_rate as f32).round() as u32).max(1)
    }
}
