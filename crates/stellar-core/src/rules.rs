//! Game rules consumed by the mine field engine.
//!
//! [`Rules`] is plain configuration: a per-type mine field stats table and the
//! game seed. `Default` reproduces the standard ruleset, and every field has a
//! serde default so a partial JSON document only overrides what it names.
//!
//! # Example
//!
//! ```
//! use stellar_core::minefield::MineFieldType;
//! use stellar_core::rules::Rules;
//!
//! let rules = Rules::with_seed(42);
//! assert_eq!(rules.seed, 42);
//! assert_eq!(rules.stats(MineFieldType::Standard).max_speed, 4);
//! assert!(rules.validate().is_ok());
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::minefield::MineFieldType;

/// A rules table failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RulesError {
    /// A hit chance per light year must be a probability.
    #[error("{mine_field_type} mine fields have chance of hit {chance}, expected 0..=1")]
    ChanceOutOfRange {
        /// Offending mine field type
        mine_field_type: MineFieldType,
        /// Configured chance
        chance: f64,
    },
    /// Sweeping can never add mines.
    #[error("{mine_field_type} mine fields have sweep factor {factor}, expected >= 0")]
    NegativeSweepFactor {
        /// Offending mine field type
        mine_field_type: MineFieldType,
        /// Configured factor
        factor: f64,
    },
}

/// Behaviour of one type of mine field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineFieldStats {
    /// Flat damage to the first token of a small fleet with a ramscoop, per engine
    pub min_damage_per_fleet_rs: u32,
    /// Damage per engine to ships with a ramscoop
    pub damage_per_engine_rs: u32,
    /// Highest warp that can cross the field safely
    pub max_speed: u32,
    /// Chance of a hit per light year per warp above `max_speed`
    pub chance_of_hit: f64,
    /// Flat damage to the first token of a small fleet, per engine
    pub min_damage_per_fleet: u32,
    /// Damage per engine
    pub damage_per_engine: u32,
    /// Multiplier applied to a fleet's sweep power
    pub sweep_factor: f64,
    /// Fewest mines that decay per year from an owned field
    pub min_decay: u32,
    /// Whether the field can be ordered to detonate
    pub can_detonate: bool,
}

impl MineFieldStats {
    /// Standard mine fields.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            min_damage_per_fleet_rs: 600,
            damage_per_engine_rs: 125,
            max_speed: 4,
            chance_of_hit: 0.003,
            min_damage_per_fleet: 500,
            damage_per_engine: 100,
            sweep_factor: 1.0,
            min_decay: 10,
            can_detonate: true,
        }
    }

    /// Heavy mine fields.
    #[must_use]
    pub fn heavy() -> Self {
        Self {
            min_damage_per_fleet_rs: 2500,
            damage_per_engine_rs: 600,
            max_speed: 6,
            chance_of_hit: 0.01,
            min_damage_per_fleet: 2000,
            damage_per_engine: 500,
            sweep_factor: 1.0,
            min_decay: 10,
            can_detonate: false,
        }
    }

    /// Speed bump mine fields: no damage, they only stop fleets.
    #[must_use]
    pub fn speed_bump() -> Self {
        Self {
            min_damage_per_fleet_rs: 0,
            damage_per_engine_rs: 0,
            max_speed: 5,
            chance_of_hit: 0.035,
            min_damage_per_fleet: 0,
            damage_per_engine: 0,
            sweep_factor: 3.0,
            min_decay: 2,
            can_detonate: false,
        }
    }
}

/// Stats for every mine field type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MineFieldStatsTable {
    /// Standard fields
    pub standard: MineFieldStats,
    /// Heavy fields
    pub heavy: MineFieldStats,
    /// Speed bump fields
    pub speed_bump: MineFieldStats,
}

impl Default for MineFieldStatsTable {
    fn default() -> Self {
        Self {
            standard: MineFieldStats::standard(),
            heavy: MineFieldStats::heavy(),
            speed_bump: MineFieldStats::speed_bump(),
        }
    }
}

impl MineFieldStatsTable {
    /// Returns the stats for a type.
    #[must_use]
    pub const fn get(&self, mine_field_type: MineFieldType) -> &MineFieldStats {
        match mine_field_type {
            MineFieldType::Standard => &self.standard,
            MineFieldType::Heavy => &self.heavy,
            MineFieldType::SpeedBump => &self.speed_bump,
        }
    }

    fn iter(&self) -> impl Iterator<Item = (MineFieldType, &MineFieldStats)> + '_ {
        MineFieldType::ALL
            .into_iter()
            .map(move |mine_field_type| (mine_field_type, self.get(mine_field_type)))
    }
}

/// Rules for one game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Seed for the game's random source
    pub seed: u64,
    /// Mine field behaviour by type
    pub mine_field_stats: MineFieldStatsTable,
}

impl Rules {
    /// Standard rules with a specific seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Returns the stats for a mine field type.
    #[must_use]
    pub const fn stats(&self, mine_field_type: MineFieldType) -> &MineFieldStats {
        self.mine_field_stats.get(mine_field_type)
    }

    /// Creates a fresh random source from the game seed.
    ///
    /// Every call starts the same sequence, so a turn replayed from its seed
    /// makes the same draws.
    #[must_use]
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }

    /// Checks the stats table for values the engine cannot honour.
    ///
    /// # Errors
    ///
    /// Returns the first [`RulesError`] found, checking types in declaration order.
    pub fn validate(&self) -> Result<(), RulesError> {
        for (mine_field_type, stats) in self.mine_field_stats.iter() {
            if !(0.0..=1.0).contains(&stats.chance_of_hit) {
                return Err(RulesError::ChanceOutOfRange {
                    mine_field_type,
                    chance: stats.chance_of_hit,
                });
            }
            if stats.sweep_factor.is_nan() || stats.sweep_factor < 0.0 {
                return Err(RulesError::NegativeSweepFactor {
                    mine_field_type,
                    factor: stats.sweep_factor,
                });
            }
        }
        Ok(())
    }
}
