//! Test helper functions for setting up games, players and fleets.
//!
//! This module provides factory functions that keep the scenario tests short
//! and consistent with each other.

use starmap::Vector;

use crate::entity::{DesignKey, DesignSpec, Fleet, MapEntity, Planet, ShipDesign, ShipToken};
use crate::game::Game;
use crate::minefield::DamageApplier;
use crate::object::ObjectId;
use crate::player::{Player, PlayerTable};
use crate::rules::Rules;
use crate::universe::{Universe, UniverseData};

/// Player number of the fleet owner in the standard scenario.
pub const ALICE: u32 = 1;
/// Player number of the mine layer in the standard scenario.
pub const BOB: u32 = 2;

// =============================================================================
// Logging
// =============================================================================

/// Routes `tracing` output to the test harness.
///
/// Safe to call from every test; only the first call installs the subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

// =============================================================================
// Designs and Players
// =============================================================================

/// A one-engine scout with 20 armor and a fuel-burning engine.
pub fn scout_design(player_num: u32) -> ShipDesign {
    ShipDesign {
        key: DesignKey::new(player_num, 1),
        name: String::from("Scout"),
        spec: DesignSpec {
            num_engines: 1,
            engine_free_speed: 1,
            armor: 20,
            immune_to_own_detonation: false,
        },
    }
}

/// A two-engine freighter with 200 armor and a ramscoop.
pub fn ramscoop_design(player_num: u32) -> ShipDesign {
    ShipDesign {
        key: DesignKey::new(player_num, 2),
        name: String::from("Ramscoop Freighter"),
        spec: DesignSpec {
            num_engines: 2,
            engine_free_speed: 6,
            armor: 200,
            immune_to_own_detonation: false,
        },
    }
}

/// Creates Alice and Bob, each with the scout and ramscoop designs.
///
/// # Returns
///
/// A player table with players [`ALICE`] and [`BOB`], who are not friends.
pub fn standard_players() -> PlayerTable {
    [ALICE, BOB]
        .into_iter()
        .map(|num| {
            let name = if num == ALICE { "Alice" } else { "Bob" };
            Player::new(num, name)
                .with_design(scout_design(num))
                .with_design(ramscoop_design(num))
        })
        .collect()
}

/// Rules where every light year inside a hostile standard field is a hit.
pub fn certain_hit_rules(seed: u64) -> Rules {
    let mut rules = Rules::with_seed(seed);
    rules.mine_field_stats.standard.chance_of_hit = 1.0;
    rules
}

// =============================================================================
// Fleets
// =============================================================================

/// Creates a fleet of `quantity` ships of a design.
///
/// # Arguments
///
/// * `design` - Design of every ship in the fleet; its owner owns the fleet
/// * `num` - Fleet number
/// * `quantity` - Number of ships
/// * `position` - Where the fleet starts
pub fn fleet_of(design: &ShipDesign, num: u32, quantity: u32, position: Vector) -> Fleet {
    Fleet::new(design.key.player_num, num, format!("{} #{num}", design.name), position)
        .with_token(ShipToken::new(design.key, quantity))
}

/// Adds a fleet to a game's universe.
///
/// # Returns
///
/// The fleet's ID.
pub fn spawn_fleet(game: &mut Game, fleet: Fleet) -> ObjectId {
    game.universe_mut().insert(MapEntity::Fleet(fleet)).id()
}

// =============================================================================
// Games
// =============================================================================

/// Sets up a game with the standard players and three planets along the x axis.
///
/// Planets sit at (-100, 0), (10, 0) and (100, 0). The universe is built
/// from [`UniverseData`] so the players' designs are indexed.
pub fn setup_standard_game(rules: Rules) -> Game {
    let players = standard_players();
    let data = UniverseData {
        planets: vec![
            Planet::new(0, 1, "West", Vector::new(-100.0, 0.0)),
            Planet::new(BOB, 2, "Bob Prime", Vector::new(10.0, 0.0)),
            Planet::new(0, 3, "East", Vector::new(100.0, 0.0)),
        ],
        ..UniverseData::default()
    };
    let universe = Universe::build(data, players.iter());
    Game::new(universe, rules, players).expect("standard rules are valid")
}

/// Sets up a standard game with a line of Alice's scouts about to cross a
/// large field of Bob's.
///
/// Bob's 1600-mine standard field sits at the origin. Alice has `fleets`
/// single-scout fleets spread along x = -60, each ordered east at warp 9.
///
/// # Returns
///
/// The game, the mine field's ID and the fleet IDs in creation order.
pub fn setup_crossing(rules: Rules, fleets: u32) -> (Game, ObjectId, Vec<ObjectId>) {
    let mut game = setup_standard_game(rules);
    let mine_field = game
        .lay_mines(BOB, crate::minefield::MineFieldType::Standard, Vector::ZERO, 1600)
        .expect("Bob is a player");

    let scout = scout_design(ALICE);
    let ids = (0..fleets)
        .map(|i| {
            let y = f64::from(i) * 4.0 - 30.0;
            spawn_fleet(&mut game, fleet_of(&scout, i + 1, 1, Vector::new(-60.0, y)))
        })
        .collect();
    (game, mine_field, ids)
}

// =============================================================================
// Damage
// =============================================================================

/// Turns mine damage into destroyed ships using each design's armor.
///
/// Damage is spread over the token: every full `armor` of damage destroys a
/// ship, and the leftover is carried by one damaged ship.
#[derive(Debug, Default)]
pub struct ArmorDamage {
    /// Damage received per call, in order
    pub received: Vec<u32>,
}

impl DamageApplier for ArmorDamage {
    fn apply_mine_damage(&mut self, token: &mut ShipToken, design: &ShipDesign, damage: u32) -> u32 {
        self.received.push(damage);
        let armor = design.spec.armor.max(1);
        let destroyed = (damage / armor).min(token.quantity);
        token.quantity -= destroyed;

        let leftover = damage - destroyed * armor;
        if token.quantity > 0 && leftover > 0 {
            token.quantity_damaged = 1;
            token.damage = f64::from(leftover);
        }
        destroyed
    }
}
