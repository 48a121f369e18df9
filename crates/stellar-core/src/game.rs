//! One game's universe, rules, players and random source.
//!
//! [`Game`] runs the mine field steps of a turn against its own state. Every
//! random draw comes from the game's `ChaCha8Rng`, seeded from
//! [`Rules::seed`], so a turn replayed from the same seed and state makes the
//! same draws and reaches the same outcome.
//!
//! Games share nothing, so [`decay_games`] can process many of them in
//! parallel.
//!
//! # Example
//!
//! ```
//! use starmap::Vector;
//! use stellar_core::game::Game;
//! use stellar_core::minefield::MineFieldType;
//! use stellar_core::player::{Player, PlayerTable};
//! use stellar_core::rules::Rules;
//! use stellar_core::universe::Universe;
//!
//! let players: PlayerTable = [Player::new(1, "Alice")].into_iter().collect();
//! let mut game = Game::new(Universe::new(), Rules::with_seed(42), players).unwrap();
//!
//! let field = game.lay_mines(1, MineFieldType::Standard, Vector::ZERO, 1000).unwrap();
//! assert_eq!(game.decay_mine_fields(), 20);
//! assert_eq!(game.universe().mine_field(field).unwrap().num_mines, 980);
//! ```

use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use starmap::Vector;
use thiserror::Error;
use tracing::debug;

use crate::entity::Waypoint;
use crate::minefield::{check_collision, Collision, DamageApplier, MineFieldDamage, MineFieldType};
use crate::object::ObjectId;
use crate::player::{PlayerLookup, PlayerTable};
use crate::rules::{Rules, RulesError};
use crate::universe::Universe;

/// A game-level call could not be carried out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// The rules failed validation.
    #[error("invalid rules: {0}")]
    Rules(#[from] RulesError),
    /// No fleet has this ID.
    #[error("no fleet with id {0}")]
    UnknownFleet(ObjectId),
    /// No mine field has this ID.
    #[error("no mine field with id {0}")]
    UnknownMineField(ObjectId),
    /// No player has this number.
    #[error("no player {0}")]
    UnknownPlayer(u32),
}

/// One game's state.
#[derive(Debug, Clone)]
pub struct Game {
    universe: Universe,
    rules: Rules,
    players: PlayerTable,
    rng: ChaCha8Rng,
}

impl Game {
    /// Creates a game, validating its rules and seeding its random source.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Rules`] if the rules fail validation.
    pub fn new(universe: Universe, rules: Rules, players: PlayerTable) -> Result<Self, GameError> {
        rules.validate()?;
        let rng = rules.rng();
        Ok(Self {
            universe,
            rules,
            players,
            rng,
        })
    }

    /// Returns the universe.
    #[must_use]
    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Returns the universe mutably.
    pub fn universe_mut(&mut self) -> &mut Universe {
        &mut self.universe
    }

    /// Returns the rules.
    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Returns the players.
    #[must_use]
    pub fn players(&self) -> &PlayerTable {
        &self.players
    }

    /// Returns the game's random source.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Lays mines for a player; see [`Universe::lay_mines`].
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownPlayer`] if no player has `player_num`.
    pub fn lay_mines(
        &mut self,
        player_num: u32,
        mine_field_type: MineFieldType,
        position: Vector,
        num_mines: u32,
    ) -> Result<ObjectId, GameError> {
        let owner = self
            .players
            .player(player_num)
            .ok_or(GameError::UnknownPlayer(player_num))?;
        Ok(self
            .universe
            .lay_mines(owner, mine_field_type, position, num_mines))
    }

    /// Refreshes every mine field's spec, then removes this year's decayed mines.
    ///
    /// Returns the total number of mines that decayed.
    pub fn decay_mine_fields(&mut self) -> u32 {
        self.universe
            .update_mine_field_specs(&self.rules, &self.players);

        let mut total = 0;
        for (id, mine_field) in self.universe.mine_fields_mut() {
            let decayed = mine_field.apply_decay();
            if decayed > 0 {
                mine_field.map_object.mark_dirty();
                debug!(mine_field = %id, decayed, remaining = mine_field.num_mines, "mine field decayed");
            }
            total += decayed;
        }
        total
    }

    /// Lets every fleet with sweep power sweep the hostile fields it sits in.
    ///
    /// Fleets go in registration order and each sweeps fields in
    /// registration order. A field is hostile to a fleet unless its owner is
    /// the fleet's owner or counts the fleet's owner as a friend. Returns the
    /// total number of mines swept.
    pub fn sweep_mine_fields(&mut self) -> u32 {
        let sweepers: Vec<(u32, Vector, u32)> = self
            .universe
            .fleets()
            .filter(|(_, fleet)| fleet.mine_sweep > 0)
            .map(|(_, fleet)| (fleet.map_object.player_num, fleet.position(), fleet.mine_sweep))
            .collect();

        let mut total = 0;
        for (fleet_owner, position, mine_sweep) in sweepers {
            for (id, mine_field) in self.universe.mine_fields_mut() {
                let field_owner = mine_field.map_object.player_num;
                if field_owner == fleet_owner || self.players.is_friend(field_owner, fleet_owner) {
                    continue;
                }
                let swept = mine_field.sweep(&self.rules, position, mine_sweep);
                if swept > 0 {
                    mine_field.map_object.mark_dirty();
                    debug!(mine_field = %id, swept, fleet_owner, "mine field swept");
                }
                total += swept;
            }
        }
        total
    }

    /// Checks a fleet's move against every mine field, drawing from the game's random source.
    ///
    /// A fleet that strikes a field is flagged with `struck_mine_field`; the
    /// caller moves it `distance_travelled` along its path.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownFleet`] if `fleet_id` is not a fleet.
    pub fn check_mine_field_collision(
        &mut self,
        fleet_id: ObjectId,
        destination: &Waypoint,
        distance: f64,
    ) -> Result<Collision, GameError> {
        let fleet = self
            .universe
            .fleet(fleet_id)
            .ok_or(GameError::UnknownFleet(fleet_id))?;

        let collision = check_collision(
            &self.rules,
            &self.players,
            self.universe.mine_fields(),
            fleet,
            destination,
            distance,
            &mut self.rng,
        );

        if collision.is_hit() {
            if let Some(fleet) = self.universe.fleet_mut(fleet_id) {
                fleet.struck_mine_field = true;
                fleet.map_object.mark_dirty();
            }
        }
        Ok(collision)
    }

    /// Damages a fleet that struck a mine field, then shrinks the field.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownMineField`] or [`GameError::UnknownFleet`]
    /// if either ID is unknown.
    pub fn damage_fleet_from_mine_field<A>(
        &mut self,
        fleet_id: ObjectId,
        mine_field_id: ObjectId,
        applier: &mut A,
    ) -> Result<MineFieldDamage, GameError>
    where
        A: DamageApplier + ?Sized,
    {
        if self.universe.mine_field(mine_field_id).is_none() {
            return Err(GameError::UnknownMineField(mine_field_id));
        }
        let damage = self
            .universe
            .damage_fleet(fleet_id, mine_field_id, &self.rules, applier)
            .ok_or(GameError::UnknownFleet(fleet_id))?;

        if let Some(mine_field) = self.universe.mine_field_mut(mine_field_id) {
            mine_field.reduce_on_impact();
            mine_field.map_object.mark_dirty();
        }
        Ok(damage)
    }
}

/// Runs the decay step of many independent games in parallel.
///
/// Returns the mines decayed per game, in the order the games were given.
pub fn decay_games(games: &mut [Game]) -> Vec<u32> {
    games.par_iter_mut().map(Game::decay_mine_fields).collect()
}
