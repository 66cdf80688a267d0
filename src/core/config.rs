//! Simulation configuration with documented constants
//!
//! Every tunable the simulation core reads lives here. Values can be
//! overridden from a TOML file; anything missing keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{KreatureError, Result};

/// Configuration for the simulation systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === RUN CONTROL ===
    /// Disables every fight that involves the player's kreature
    pub god_mode: bool,

    /// Hard stop for the run loop
    pub max_ticks: u64,

    /// Real-time pause between ticks (seconds)
    ///
    /// Pure pacing. Zero runs the simulation as fast as it can go.
    pub tick_length: f64,

    /// Optional RNG seed. Runs are only reproducible when this is set.
    pub seed: Option<u64>,

    // === PLAYER SURVIVAL ===
    /// Number of ticks from the start during which the player is protected
    pub early_game_grace_period: u64,

    /// Fraction of incoming damage the player ignores during the grace period
    pub player_damage_reduction: f64,

    /// Percent chance that an attacker spares the player during the grace period
    pub attack_avoidance_chance: u32,

    // === POPULATION CONTROL ===
    /// Initial dynamic population cap
    pub max_entities: usize,

    /// Floor for the dynamic cap
    pub min_entities: usize,

    /// Ceiling for the dynamic cap
    pub max_entities_limit: usize,

    /// Culling starts once population exceeds `cap * entity_cull_threshold`
    pub entity_cull_threshold: f64,

    /// Culling removes the weakest until population is `cap * entity_cull_target`
    ///
    /// Must sit below the threshold, otherwise every tick would cull again.
    pub entity_cull_target: f64,

    /// Per-entity log cap. Oldest lines are evicted first.
    pub entity_log_max_size: usize,

    // === ADAPTIVE PERFORMANCE ===
    /// Mean tick duration (seconds) above which the simulation is lagging
    pub lag_threshold: f64,

    /// Number of recent tick durations kept for the rolling mean
    pub performance_window: usize,

    /// Multiplier applied to the cap when lag is detected
    pub cap_shrink_factor: f64,

    /// Multiplier applied to the cap when ticks are fast and the world is full
    pub cap_growth_factor: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            god_mode: false,
            max_ticks: 1000,
            tick_length: 0.1,
            seed: None,

            early_game_grace_period: 50,
            player_damage_reduction: 0.4,
            attack_avoidance_chance: 85,

            // min < initial < limit
            max_entities: 100,
            min_entities: 20,
            max_entities_limit: 300,
            entity_cull_threshold: 0.9,
            entity_cull_target: 0.7,
            entity_log_max_size: 50,

            lag_threshold: 0.05,
            performance_window: 10,
            cap_shrink_factor: 0.8,
            cap_growth_factor: 1.2,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document. Keys that are absent keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a config file, falling back to defaults when it is missing or malformed
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match Self::load(path) {
            Ok(config) => {
                tracing::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!(
                    "Could not use config {} ({}), falling back to defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.min_entities > self.max_entities || self.max_entities > self.max_entities_limit {
            return Err(KreatureError::InvalidConfig(format!(
                "expected min_entities ({}) <= max_entities ({}) <= max_entities_limit ({})",
                self.min_entities, self.max_entities, self.max_entities_limit
            )));
        }

        if !(0.0..1.0).contains(&self.entity_cull_target)
            || !(0.0..1.0).contains(&self.entity_cull_threshold)
            || self.entity_cull_target <= 0.0
        {
            return Err(KreatureError::InvalidConfig(
                "entity_cull_threshold and entity_cull_target must be in (0, 1)".into(),
            ));
        }

        if self.entity_cull_target >= self.entity_cull_threshold {
            return Err(KreatureError::InvalidConfig(format!(
                "entity_cull_target ({}) should be < entity_cull_threshold ({})",
                self.entity_cull_target, self.entity_cull_threshold
            )));
        }

        if !(0.0..1.0).contains(&self.player_damage_reduction) {
            return Err(KreatureError::InvalidConfig(format!(
                "player_damage_reduction ({}) must be in [0, 1)",
                self.player_damage_reduction
            )));
        }

        if self.attack_avoidance_chance > 100 {
            return Err(KreatureError::InvalidConfig(format!(
                "attack_avoidance_chance ({}) is a percentage",
                self.attack_avoidance_chance
            )));
        }

        if self.performance_window == 0 || self.entity_log_max_size == 0 {
            return Err(KreatureError::InvalidConfig(
                "performance_window and entity_log_max_size must be positive".into(),
            ));
        }

        if self.lag_threshold <= 0.0 || self.tick_length < 0.0 {
            return Err(KreatureError::InvalidConfig(
                "lag_threshold must be positive and tick_length non-negative".into(),
            ));
        }

        if !(self.cap_shrink_factor > 0.0 && self.cap_shrink_factor < 1.0)
            || self.cap_growth_factor <= 1.0
        {
            return Err(KreatureError::InvalidConfig(format!(
                "cap_shrink_factor ({}) must be in (0, 1) and cap_growth_factor ({}) above 1",
                self.cap_shrink_factor, self.cap_growth_factor
            )));
        }

        Ok(())
    }
}
