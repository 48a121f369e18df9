//! # Stellar Core
//!
//! Universe bookkeeping and mine field physics for turn-based star map games.
//!
//! A game turn needs two things from this crate: a registry that can find any
//! object by its natural key or by its exact position, and the rules that
//! decide what happens to fleets flying through enemy mine fields.
//!
//! ## Architecture
//!
//! - **Universe**: an ID-keyed arena of [`MapEntity`] values, with
//!   per-kind lookup tables and a [`starmap::PositionIndex`] kept in step
//!   with every move
//! - **Mine fields**: decay, sweeping, drift, collision checks and damage
//!   live on [`MineField`] and in [`minefield`]
//! - **Game**: [`Game`] owns one universe, its rules and players, and the
//!   seeded random source every collision check draws from
//!
//! ## Usage
//!
//! ```
//! use starmap::Vector;
//! use stellar_core::{hash_universe, Game, MineFieldType, Player, PlayerTable, Rules, Universe};
//!
//! let players: PlayerTable = [Player::new(1, "Alice"), Player::new(2, "Bob")]
//!     .into_iter()
//!     .collect();
//! let mut game = Game::new(Universe::new(), Rules::with_seed(7), players).unwrap();
//!
//! let field = game.lay_mines(2, MineFieldType::Standard, Vector::ZERO, 400).unwrap();
//! assert_eq!(game.universe().mine_field(field).unwrap().radius(), 20.0);
//!
//! let before = hash_universe(game.universe());
//! game.decay_mine_fields();
//! assert_ne!(before, hash_universe(game.universe()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub use starmap;

pub mod entity;
pub mod game;
pub mod hash;
pub mod minefield;
pub mod object;
pub mod player;
pub mod rules;
pub mod universe;

// Re-exports for convenience
pub use entity::{Fleet, MapEntity, Planet, ShipDesign, ShipToken, Waypoint};
pub use game::{decay_games, Game, GameError};
pub use hash::hash_universe;
pub use minefield::{check_collision, Collision, DamageApplier, MineField, MineFieldDamage, MineFieldType};
pub use object::{MapObject, MapObjectKind, ObjectId, ObjectRef};
pub use player::{Player, PlayerLookup, PlayerTable, RaceSpec};
pub use rules::{MineFieldStats, Rules, RulesError};
pub use universe::{Universe, UniverseData};

#[cfg(test)]
mod tests;
