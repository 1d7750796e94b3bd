//! Data-driven game balance
//!
//! Tunable numbers live in a serde struct so balance passes don't need a
//! recompile. Loaded from a JSON file with a logged fallback to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub world_width: f32,
    pub world_height: f32,

    // === Player ===
    pub starting_lives: u8,
    pub player_thrust: f32,
    pub player_max_speed: f32,

    // === Asteroids ===
    /// Tier-2 asteroids in the first wave
    pub first_wave_size: usize,
    /// Speed of a tier-2 asteroid; children scale this up per tier
    pub asteroid_base_speed: f32,

    // === Bullets ===
    pub bullet_speed: f32,

    // === Drops ===
    /// Chance a terminal asteroid leaves a pickable behind (0.0 - 1.0)
    pub drop_chance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            starting_lives: 3,
            player_thrust: PLAYER_THRUST,
            player_max_speed: PLAYER_MAX_SPEED,
            first_wave_size: 3,
            asteroid_base_speed: ASTEROID_BASE_SPEED,
            bullet_speed: BULLET_SPEED,
            drop_chance: 0.3,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file, falling back to defaults
    ///
    /// A missing or corrupt file is not an error: the defaults ship the
    /// intended balance and a warning is logged.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => {
                    log::info!("loaded tuning from {}", path.display());
                    tuning
                }
                Err(err) => {
                    log::warn!("ignoring corrupt tuning file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no tuning file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write tuning as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let tuning = Tuning::load(Path::new("/nonexistent/driftfield-tuning.json"));
        assert_eq!(tuning.starting_lives, 3);
        assert!((tuning.world_width - WORLD_WIDTH).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{"drop_chance": 0.9}"#).expect("parse");
        assert!((tuning.drop_chance - 0.9).abs() < 1e-6);
        assert_eq!(tuning.first_wave_size, 3);
        assert!((tuning.bullet_speed - BULLET_SPEED).abs() < f32::EPSILON);
    }

    #[test]
    fn test_roundtrip() {
        let mut tuning = Tuning::default();
        tuning.world_width = 1024.0;
        let json = serde_json::to_string(&tuning).expect("serialize");
        let back: Tuning = serde_json::from_str(&json).expect("parse");
        assert!((back.world_width - 1024.0).abs() < f32::EPSILON);
    }
}
