//! Deterministic digest of a universe, for replay checks.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::entity::{Fleet, MapEntity};
use crate::universe::Universe;

/// Hashes the state of every entity in registration order.
///
/// Two universes built from the same data and driven through the same calls
/// with the same seed hash equal. Floating point values are hashed by bit
/// pattern.
#[must_use]
pub fn hash_universe(universe: &Universe) -> u64 {
    let mut hasher = DefaultHasher::new();
    for (id, entity) in universe.entities() {
        id.hash(&mut hasher);
        hash_entity(entity, &mut hasher);
    }
    hasher.finish()
}

fn hash_entity(entity: &MapEntity, hasher: &mut DefaultHasher) {
    let object = entity.map_object();
    object.kind.hash(hasher);
    object.player_num.hash(hasher);
    object.num.hash(hasher);
    object.name.hash(hasher);
    object.position().x.to_bits().hash(hasher);
    object.position().y.to_bits().hash(hasher);

    match entity {
        MapEntity::Fleet(fleet) | MapEntity::Starbase(fleet) => hash_fleet(fleet, hasher),
        MapEntity::MineField(mine_field) => {
            mine_field.mine_field_type.hash(hasher);
            mine_field.num_mines.hash(hasher);
            mine_field.orders.detonate.hash(hasher);
        }
        MapEntity::Wormhole(wormhole) => {
            wormhole.destination_num.hash(hasher);
            wormhole.stability.hash(hasher);
        }
        MapEntity::Salvage(salvage) => salvage.cargo.hash(hasher),
        MapEntity::MineralPacket(packet) => {
            packet.cargo.hash(hasher);
            packet.target_planet_num.hash(hasher);
        }
        MapEntity::Planet(planet) => planet.starbase.hash(hasher),
    }
}

fn hash_fleet(fleet: &Fleet, hasher: &mut DefaultHasher) {
    fleet.struck_mine_field.hash(hasher);
    fleet.mine_sweep.hash(hasher);
    for token in &fleet.tokens {
        token.design.hash(hasher);
        token.quantity.hash(hasher);
        token.quantity_damaged.hash(hasher);
        token.damage.to_bits().hash(hasher);
    }
}
