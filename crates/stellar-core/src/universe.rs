//! The universe: every placeable object of one game, plus the indices over them.
//!
//! The universe is an arena. Each entity gets a monotonically increasing
//! [`ObjectId`] when it is registered, and entities are stored in a `BTreeMap`
//! so iteration always follows registration order. Everything else is an
//! index holding [`ObjectRef`] handles or IDs:
//!
//! - position buckets: which objects stand at an exact position
//! - fleets and mine fields by `(player, num)`
//! - planets, wormholes and salvage by `num`
//! - mineral packets by `(player, num)`
//! - ship designs by [`DesignKey`] and battle plans by `(player, name)`
//!
//! # Keeping the indices honest
//!
//! Positions of stored objects can only change through the universe
//! ([`Universe::move_fleet`], [`Universe::move_wormhole`],
//! [`Universe::drift_mine_field`]), which patch the position bucket in the same
//! step. Deletion removes an object from every index at once.
//!
//! If a bucket is found out of sync the operation still completes and a
//! warning is logged, so one bad entry never aborts a turn.
//!
//! Starbases are reached through the planet they orbit and are not placed in
//! position buckets. Changing an object's kind, owner or number through a
//! mutable accessor requires a [`Universe::rebuild`].
//!
//! # Example
//!
//! ```
//! use starmap::Vector;
//! use stellar_core::entity::{Fleet, Planet};
//! use stellar_core::player::Player;
//! use stellar_core::universe::{Universe, UniverseData};
//!
//! let players = vec![Player::new(1, "Alice")];
//! let data = UniverseData {
//!     planets: vec![Planet::new(1, 1, "Home", Vector::new(10.0, 10.0))],
//!     fleets: vec![Fleet::new(1, 1, "Scout #1", Vector::new(10.0, 10.0))],
//!     ..UniverseData::default()
//! };
//!
//! let mut universe = Universe::build(data, &players);
//! assert_eq!(universe.get_by_position(Vector::new(10.0, 10.0)).len(), 2);
//!
//! let fleet = universe.fleet_id(1, 1).unwrap();
//! universe.move_fleet(fleet, Vector::new(20.0, 10.0));
//! assert_eq!(universe.get_by_position(Vector::new(10.0, 10.0)).len(), 1);
//! assert_eq!(universe.get_fleet(1, 1).unwrap().position(), Vector::new(20.0, 10.0));
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use starmap::{PositionIndex, Vector};
use tracing::{debug, warn};

use crate::entity::{
    BattlePlan, Cargo, DesignKey, Fleet, MapEntity, MineralPacket, Planet, Salvage, ShipDesign,
    Wormhole, WormholeStability,
};
use crate::minefield::{DamageApplier, MineField, MineFieldDamage, MineFieldType};
use crate::object::{MapObjectKind, ObjectId, ObjectRef};
use crate::player::{Player, PlayerLookup};
use crate::rules::Rules;

/// Raw entity lists a universe is built from, as loaded by the persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseData {
    /// Planets
    pub planets: Vec<Planet>,
    /// Fleets
    pub fleets: Vec<Fleet>,
    /// Starbases, linked to planets by `planet_num`
    pub starbases: Vec<Fleet>,
    /// Wormholes
    pub wormholes: Vec<Wormhole>,
    /// Mineral packets
    pub mineral_packets: Vec<MineralPacket>,
    /// Mine fields
    pub mine_fields: Vec<MineField>,
    /// Salvage
    pub salvages: Vec<Salvage>,
}

/// Everything a player commands, in registration order.
#[derive(Debug, Clone, Default)]
pub struct PlayerMapObjects<'a> {
    /// The player's fleets, starbases excluded
    pub fleets: Vec<&'a Fleet>,
    /// The player's planets
    pub planets: Vec<&'a Planet>,
    /// The player's mine fields
    pub mine_fields: Vec<&'a MineField>,
}

/// Every placeable object of one game.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    /// Next ID to hand out.
    next_id: u64,
    /// Entity storage in registration order.
    entities: BTreeMap<ObjectId, MapEntity>,
    /// Handles by exact position.
    positions: PositionIndex<ObjectRef>,
    fleets: HashMap<(u32, u32), ObjectId>,
    planets: HashMap<u32, ObjectId>,
    wormholes: HashMap<u32, ObjectId>,
    salvages: HashMap<u32, ObjectId>,
    mineral_packets: HashMap<(u32, u32), ObjectId>,
    mine_fields: HashMap<(u32, u32), ObjectId>,
    designs: HashMap<DesignKey, ShipDesign>,
    battle_plans: HashMap<u32, HashMap<String, BattlePlan>>,
}

impl Universe {
    /// Creates an empty universe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a universe from raw entity lists and indexes it.
    ///
    /// Entities are registered planets first, then fleets, starbases,
    /// wormholes, mineral packets, mine fields and salvage, each list in its
    /// given order.
    #[must_use]
    pub fn build<'a>(data: UniverseData, players: impl IntoIterator<Item = &'a Player>) -> Self {
        let UniverseData {
            planets,
            fleets,
            starbases,
            wormholes,
            mineral_packets,
            mine_fields,
            salvages,
        } = data;

        let mut universe = Self::new();
        let entities = planets
            .into_iter()
            .map(MapEntity::Planet)
            .chain(fleets.into_iter().map(MapEntity::Fleet))
            .chain(starbases.into_iter().map(MapEntity::Starbase))
            .chain(wormholes.into_iter().map(MapEntity::Wormhole))
            .chain(mineral_packets.into_iter().map(MapEntity::MineralPacket))
            .chain(mine_fields.into_iter().map(MapEntity::MineField))
            .chain(salvages.into_iter().map(MapEntity::Salvage));
        for entity in entities {
            let id = universe.allocate_id();
            universe.entities.insert(id, entity);
        }

        universe.rebuild(players);
        universe
    }

    /// Rebuilds every index from the stored entities and the players' designs
    /// and battle plans.
    ///
    /// Runs in linear time and gives the same result however often it is
    /// called. Duplicate keys are logged and the later entity wins.
    pub fn rebuild<'a>(&mut self, players: impl IntoIterator<Item = &'a Player>) {
        self.positions = PositionIndex::with_capacity(self.entities.len());
        self.fleets.clear();
        self.planets.clear();
        self.wormholes.clear();
        self.salvages.clear();
        self.mineral_packets.clear();
        self.mine_fields.clear();
        self.designs.clear();
        self.battle_plans.clear();

        for player in players {
            for design in &player.designs {
                self.designs.insert(design.key, design.clone());
            }
            let plans = self.battle_plans.entry(player.num).or_default();
            for plan in &player.battle_plans {
                plans.insert(plan.name.clone(), plan.clone());
            }
        }

        for planet in self.entities.values_mut().filter_map(MapEntity::as_planet_mut) {
            planet.starbase = None;
        }

        // Planets must be keyed before starbases can find them.
        let (starbases, others): (Vec<ObjectId>, Vec<ObjectId>) = self
            .entities
            .keys()
            .copied()
            .partition(|id| self.entities[id].kind() == MapObjectKind::Starbase);
        for id in others.into_iter().chain(starbases) {
            self.index(id);
        }
    }

    /// Registers a new entity, assigning its ID and indexing it.
    pub fn insert(&mut self, entity: MapEntity) -> ObjectRef {
        let id = self.allocate_id();
        let handle = entity.handle(id);
        self.entities.insert(id, entity);
        self.index(id);
        handle
    }

    fn allocate_id(&mut self) -> ObjectId {
        self.next_id += 1;
        ObjectId::new(self.next_id)
    }

    /// Adds one stored entity to every index.
    fn index(&mut self, id: ObjectId) {
        let Some(entity) = self.entities.get(&id) else {
            return;
        };
        let handle = entity.handle(id);
        let object = entity.map_object();
        let (player_num, num, position) = (object.player_num, object.num, object.position());
        let starbase_planet = entity.as_starbase().and_then(|starbase| starbase.planet_num);
        if let Some(fleet) = entity
            .as_fleet()
            .filter(|fleet| self.get_battle_plan(player_num, &fleet.battle_plan_name).is_none())
        {
            warn!(
                player_num,
                num,
                battle_plan = %fleet.battle_plan_name,
                "fleet has no matching battle plan"
            );
        }

        let previous = match handle {
            ObjectRef::Planet(_) => self.planets.insert(num, id),
            ObjectRef::Fleet(_) => self.fleets.insert((player_num, num), id),
            ObjectRef::Wormhole(_) => self.wormholes.insert(num, id),
            ObjectRef::Salvage(_) => self.salvages.insert(num, id),
            ObjectRef::MineralPacket(_) => self.mineral_packets.insert((player_num, num), id),
            ObjectRef::MineField(_) => self.mine_fields.insert((player_num, num), id),
            ObjectRef::Starbase(_) => {
                self.link_starbase(id, starbase_planet);
                return;
            }
        };
        if let Some(previous) = previous.filter(|previous| *previous != id) {
            warn!(
                kind = %handle.kind(),
                player_num,
                num,
                replaced = %previous,
                "duplicate key, later object wins"
            );
        }

        self.add_at_position(handle, position);
    }

    fn link_starbase(&mut self, id: ObjectId, planet_num: Option<u32>) {
        let planet = planet_num
            .and_then(|num| self.planets.get(&num))
            .and_then(|planet_id| self.entities.get_mut(planet_id))
            .and_then(MapEntity::as_planet_mut);
        match planet {
            Some(planet) => planet.starbase = Some(id),
            None => warn!(starbase = %id, planet_num = ?planet_num, "starbase orbits an unknown planet"),
        }
    }

    /// Registers a handle in the position bucket at `position`.
    ///
    /// The handle is only added if it is not already there. Starbases are
    /// never bucketed.
    pub fn add_at_position(&mut self, handle: ObjectRef, position: Vector) {
        if handle.kind() == MapObjectKind::Starbase {
            return;
        }
        if !self.positions.contains(position, handle) {
            self.positions.insert(position, handle);
        }
    }

    /// Returns the handles of everything at exactly `position`, possibly none.
    ///
    /// Handles keep the order they were added in, but callers should not rely
    /// on it.
    #[must_use]
    pub fn get_by_position(&self, position: Vector) -> &[ObjectRef] {
        self.positions.get(position)
    }

    /// Returns an entity by handle.
    #[must_use]
    pub fn get(&self, handle: ObjectRef) -> Option<&MapEntity> {
        self.entities
            .get(&handle.id())
            .filter(|entity| entity.kind() == handle.kind())
    }

    /// Iterates over all entities in registration order.
    pub fn entities(&self) -> impl Iterator<Item = (ObjectId, &MapEntity)> + '_ {
        self.entities.iter().map(|(id, entity)| (*id, entity))
    }

    /// Number of stored entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // =========================================================================
    // Keyed lookups
    // =========================================================================

    /// Returns the ID of a player's fleet.
    #[must_use]
    pub fn fleet_id(&self, player_num: u32, num: u32) -> Option<ObjectId> {
        self.fleets.get(&(player_num, num)).copied()
    }

    /// Returns a player's fleet by number.
    #[must_use]
    pub fn get_fleet(&self, player_num: u32, num: u32) -> Option<&Fleet> {
        self.fleet_id(player_num, num).and_then(|id| self.fleet(id))
    }

    /// Returns a player's fleet by number, mutably.
    pub fn get_fleet_mut(&mut self, player_num: u32, num: u32) -> Option<&mut Fleet> {
        let id = self.fleet_id(player_num, num)?;
        self.fleet_mut(id)
    }

    /// Returns a fleet by ID.
    #[must_use]
    pub fn fleet(&self, id: ObjectId) -> Option<&Fleet> {
        self.entities.get(&id).and_then(MapEntity::as_fleet)
    }

    /// Returns a fleet by ID, mutably.
    pub fn fleet_mut(&mut self, id: ObjectId) -> Option<&mut Fleet> {
        self.entities.get_mut(&id).and_then(MapEntity::as_fleet_mut)
    }

    /// Iterates over fleets in registration order, starbases excluded.
    pub fn fleets(&self) -> impl Iterator<Item = (ObjectId, &Fleet)> + '_ {
        self.entities
            .iter()
            .filter_map(|(id, entity)| entity.as_fleet().map(|fleet| (*id, fleet)))
    }

    /// Returns a planet by number.
    #[must_use]
    pub fn get_planet(&self, num: u32) -> Option<&Planet> {
        self.planets
            .get(&num)
            .and_then(|id| self.entities.get(id))
            .and_then(MapEntity::as_planet)
    }

    /// Returns a planet by number, mutably.
    pub fn get_planet_mut(&mut self, num: u32) -> Option<&mut Planet> {
        let id = self.planets.get(&num)?;
        self.entities.get_mut(id).and_then(MapEntity::as_planet_mut)
    }

    /// Iterates over planets in registration order.
    pub fn planets(&self) -> impl Iterator<Item = &Planet> + '_ {
        self.entities.values().filter_map(MapEntity::as_planet)
    }

    /// Returns the starbase orbiting a planet.
    #[must_use]
    pub fn get_starbase(&self, planet_num: u32) -> Option<&Fleet> {
        self.get_planet(planet_num)
            .and_then(|planet| planet.starbase)
            .and_then(|id| self.entities.get(&id))
            .and_then(MapEntity::as_starbase)
    }

    /// Returns a wormhole by number.
    #[must_use]
    pub fn get_wormhole(&self, num: u32) -> Option<&Wormhole> {
        self.wormhole_id(num)
            .and_then(|id| self.entities.get(&id))
            .and_then(MapEntity::as_wormhole)
    }

    /// Returns the ID of a wormhole.
    #[must_use]
    pub fn wormhole_id(&self, num: u32) -> Option<ObjectId> {
        self.wormholes.get(&num).copied()
    }

    /// Returns a salvage pile by number.
    #[must_use]
    pub fn get_salvage(&self, num: u32) -> Option<&Salvage> {
        self.salvage_id(num)
            .and_then(|id| self.entities.get(&id))
            .and_then(MapEntity::as_salvage)
    }

    /// Returns the ID of a salvage pile.
    #[must_use]
    pub fn salvage_id(&self, num: u32) -> Option<ObjectId> {
        self.salvages.get(&num).copied()
    }

    /// Returns a player's mineral packet by number.
    #[must_use]
    pub fn get_mineral_packet(&self, player_num: u32, num: u32) -> Option<&MineralPacket> {
        self.mineral_packets
            .get(&(player_num, num))
            .and_then(|id| self.entities.get(id))
            .and_then(MapEntity::as_mineral_packet)
    }

    /// Returns a player's mine field by number.
    #[must_use]
    pub fn get_mine_field(&self, player_num: u32, num: u32) -> Option<&MineField> {
        self.mine_field_id(player_num, num).and_then(|id| self.mine_field(id))
    }

    /// Returns the ID of a player's mine field.
    #[must_use]
    pub fn mine_field_id(&self, player_num: u32, num: u32) -> Option<ObjectId> {
        self.mine_fields.get(&(player_num, num)).copied()
    }

    /// Returns a mine field by ID.
    #[must_use]
    pub fn mine_field(&self, id: ObjectId) -> Option<&MineField> {
        self.entities.get(&id).and_then(MapEntity::as_mine_field)
    }

    /// Returns a mine field by ID, mutably.
    pub fn mine_field_mut(&mut self, id: ObjectId) -> Option<&mut MineField> {
        self.entities.get_mut(&id).and_then(MapEntity::as_mine_field_mut)
    }

    /// Iterates over mine fields in registration order.
    ///
    /// Collision checks visit fields in this order.
    pub fn mine_fields(&self) -> impl Iterator<Item = (ObjectId, &MineField)> + '_ {
        self.entities
            .iter()
            .filter_map(|(id, entity)| entity.as_mine_field().map(|field| (*id, field)))
    }

    /// Iterates over mine fields in registration order, mutably.
    pub fn mine_fields_mut(&mut self) -> impl Iterator<Item = (ObjectId, &mut MineField)> + '_ {
        self.entities
            .iter_mut()
            .filter_map(|(id, entity)| entity.as_mine_field_mut().map(|field| (*id, field)))
    }

    /// Returns a ship design by key.
    #[must_use]
    pub fn get_design(&self, key: DesignKey) -> Option<&ShipDesign> {
        self.designs.get(&key)
    }

    /// Returns every indexed ship design.
    #[must_use]
    pub fn designs(&self) -> &HashMap<DesignKey, ShipDesign> {
        &self.designs
    }

    /// Returns a player's battle plan by name.
    #[must_use]
    pub fn get_battle_plan(&self, player_num: u32, name: &str) -> Option<&BattlePlan> {
        self.battle_plans
            .get(&player_num)
            .and_then(|plans| plans.get(name))
    }

    /// Returns the battle plan a fleet is following, if its owner has one by that name.
    #[must_use]
    pub fn fleet_battle_plan(&self, id: ObjectId) -> Option<&BattlePlan> {
        let fleet = self.fleet(id)?;
        self.get_battle_plan(fleet.map_object.player_num, &fleet.battle_plan_name)
    }

    /// Collects the fleets, planets and mine fields a player owns.
    #[must_use]
    pub fn player_map_objects(&self, player_num: u32) -> PlayerMapObjects<'_> {
        let mut objects = PlayerMapObjects::default();
        for entity in self.entities.values() {
            if entity.map_object().player_num != player_num {
                continue;
            }
            match entity {
                MapEntity::Fleet(fleet) => objects.fleets.push(fleet),
                MapEntity::Planet(planet) => objects.planets.push(planet),
                MapEntity::MineField(mine_field) => objects.mine_fields.push(mine_field),
                _ => {}
            }
        }
        objects
    }

    /// Counts planets within `radius` of `center`, edge included.
    #[must_use]
    pub fn planets_within(&self, center: Vector, radius: f64) -> u32 {
        let radius_squared = radius * radius;
        let count = self
            .planets()
            .filter(|planet| planet.map_object.position().distance_squared(center) <= radius_squared)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Returns `true` if `position` is further than `min_distance` from every occupied position.
    #[must_use]
    pub fn is_position_valid(position: Vector, occupied: &[Vector], min_distance: f64) -> bool {
        starmap::is_position_valid(position, occupied, min_distance)
    }

    /// Next fleet number for a player.
    ///
    /// Walks the player's fleet numbers in ascending order and returns the
    /// first gap after an existing fleet, or one past the highest number.
    /// Numbers below the lowest fleet are never reused, so `{2, 3}` gives 4.
    #[must_use]
    pub fn get_next_fleet_num(&self, player_num: u32) -> u32 {
        let mut nums: Vec<u32> = self
            .fleets
            .keys()
            .filter(|(owner, _)| *owner == player_num)
            .map(|(_, num)| *num)
            .collect();
        nums.sort_unstable();
        next_after_gap(&nums)
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Creates an empty fleet named `"{base_name} #{num}"` numbered by [`Universe::get_next_fleet_num`].
    pub fn create_fleet(&mut self, player_num: u32, base_name: &str, position: Vector) -> ObjectId {
        let num = self.get_next_fleet_num(player_num);
        let fleet = Fleet::new(player_num, num, format!("{base_name} #{num}"), position);
        let handle = self.insert(MapEntity::Fleet(fleet));
        debug!(player_num, num, "created fleet");
        handle.id()
    }

    /// Creates a wormhole numbered one past the highest existing wormhole.
    ///
    /// When `companion` names an existing wormhole the two are linked to each other.
    pub fn create_wormhole(
        &mut self,
        position: Vector,
        stability: WormholeStability,
        companion: Option<u32>,
    ) -> ObjectId {
        let num = self.wormholes.keys().max().map_or(1, |last| last + 1);
        let mut wormhole = Wormhole::new(num, position, stability);

        if let Some(companion_num) = companion {
            let companion = self
                .wormholes
                .get(&companion_num)
                .and_then(|id| self.entities.get_mut(id))
                .and_then(MapEntity::as_wormhole_mut);
            match companion {
                Some(companion) => {
                    companion.destination_num = Some(num);
                    companion.map_object.mark_dirty();
                    wormhole.destination_num = Some(companion_num);
                }
                None => warn!(companion = companion_num, "companion wormhole not found"),
            }
        }

        self.insert(MapEntity::Wormhole(wormhole)).id()
    }

    /// Creates a salvage pile numbered one past the highest existing pile.
    pub fn create_salvage(&mut self, position: Vector, player_num: u32, cargo: Cargo) -> ObjectId {
        let num = self.salvages.keys().max().map_or(1, |last| last + 1);
        self.insert(MapEntity::Salvage(Salvage::new(num, player_num, position, cargo)))
            .id()
    }

    /// Creates a mine field with the lowest mine field number the owner is not using.
    pub fn create_mine_field(
        &mut self,
        owner: &Player,
        mine_field_type: MineFieldType,
        num_mines: u32,
        position: Vector,
    ) -> ObjectId {
        let mut nums: Vec<u32> = self
            .mine_fields
            .keys()
            .filter(|(player_num, _)| *player_num == owner.num)
            .map(|(_, num)| *num)
            .collect();
        nums.sort_unstable();
        let num = lowest_unused(&nums);

        let name = MineField::default_name(owner, mine_field_type, num);
        let mine_field = MineField::new(owner.num, num, name, mine_field_type, num_mines, position);
        let handle = self.insert(MapEntity::MineField(mine_field));
        debug!(player_num = owner.num, num, num_mines, "created mine field");
        handle.id()
    }

    /// Lays `num_mines` mines of a type at `position` for `owner`.
    ///
    /// If one of the owner's fields of that type already covers the position,
    /// the mines join it and the field drifts toward `position`. Otherwise a
    /// new field is created there.
    pub fn lay_mines(
        &mut self,
        owner: &Player,
        mine_field_type: MineFieldType,
        position: Vector,
        num_mines: u32,
    ) -> ObjectId {
        let existing = self.mine_fields().find_map(|(id, mine_field)| {
            (mine_field.map_object.owned_by(owner.num)
                && mine_field.mine_field_type == mine_field_type
                && mine_field.contains(position))
            .then_some(id)
        });

        let Some(id) = existing else {
            return self.create_mine_field(owner, mine_field_type, num_mines, position);
        };

        if let Some(mine_field) = self.mine_field_mut(id) {
            mine_field.num_mines = mine_field.num_mines.saturating_add(num_mines);
            mine_field.map_object.mark_dirty();
        }
        self.drift_mine_field(id, position, num_mines);
        id
    }

    // =========================================================================
    // Relocation
    // =========================================================================

    /// Moves a fleet, patching its position bucket in the same step.
    ///
    /// The fleet's first waypoint follows it and the fleet is marked dirty.
    /// Returns the previous position, or `None` if `id` is not a fleet.
    pub fn move_fleet(&mut self, id: ObjectId, destination: Vector) -> Option<Vector> {
        let fleet = self.fleet_mut(id)?;
        let from = fleet.position();
        fleet.map_object.set_position(destination);
        fleet.map_object.mark_dirty();
        if let Some(current) = fleet.waypoints.first_mut() {
            current.position = destination;
        }

        self.relocate(ObjectRef::Fleet(id), from, destination);
        Some(from)
    }

    /// Moves a wormhole, patching its position bucket in the same step.
    ///
    /// Returns the previous position, or `None` if `id` is not a wormhole.
    pub fn move_wormhole(&mut self, id: ObjectId, destination: Vector) -> Option<Vector> {
        let wormhole = self.entities.get_mut(&id).and_then(MapEntity::as_wormhole_mut)?;
        let from = wormhole.map_object.position();
        wormhole.map_object.set_position(destination);
        wormhole.map_object.mark_dirty();

        self.relocate(ObjectRef::Wormhole(id), from, destination);
        Some(from)
    }

    /// Drifts a mine field toward the fleet that laid `mines_laid` mines at `layer_position`.
    ///
    /// Returns the field's new position, or `None` if `id` is not a mine field.
    pub fn drift_mine_field(
        &mut self,
        id: ObjectId,
        layer_position: Vector,
        mines_laid: u32,
    ) -> Option<Vector> {
        let mine_field = self.mine_field_mut(id)?;
        let from = mine_field.position();
        let to = mine_field.drift_toward_layer(layer_position, mines_laid);
        if from != to {
            mine_field.map_object.mark_dirty();
            self.relocate(ObjectRef::MineField(id), from, to);
        }
        Some(to)
    }

    fn relocate(&mut self, handle: ObjectRef, from: Vector, to: Vector) {
        if let Err(error) = self.positions.relocate(handle, from, to) {
            warn!(
                ?handle,
                from = ?from,
                to = ?to,
                error = %error,
                "position index out of sync while moving object"
            );
        }
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Deletes a fleet from the universe and every index.
    ///
    /// The returned fleet is flagged for deletion.
    pub fn delete_fleet(&mut self, id: ObjectId) -> Option<Fleet> {
        match self.remove(ObjectRef::Fleet(id))? {
            MapEntity::Fleet(fleet) => Some(fleet),
            _ => None,
        }
    }

    /// Deletes a wormhole from the universe and every index.
    pub fn delete_wormhole(&mut self, id: ObjectId) -> Option<Wormhole> {
        match self.remove(ObjectRef::Wormhole(id))? {
            MapEntity::Wormhole(wormhole) => Some(wormhole),
            _ => None,
        }
    }

    /// Deletes a salvage pile from the universe and every index.
    pub fn delete_salvage(&mut self, id: ObjectId) -> Option<Salvage> {
        match self.remove(ObjectRef::Salvage(id))? {
            MapEntity::Salvage(salvage) => Some(salvage),
            _ => None,
        }
    }

    /// Deletes a mine field from the universe and every index.
    ///
    /// Empty fields are never deleted automatically.
    pub fn delete_mine_field(&mut self, id: ObjectId) -> Option<MineField> {
        match self.remove(ObjectRef::MineField(id))? {
            MapEntity::MineField(mine_field) => Some(mine_field),
            _ => None,
        }
    }

    fn remove(&mut self, handle: ObjectRef) -> Option<MapEntity> {
        let id = handle.id();
        if self.get(handle).is_none() {
            return None;
        }
        let mut entity = self.entities.remove(&id)?;
        entity.map_object_mut().mark_deleted();

        let object = entity.map_object();
        let (player_num, num, position) = (object.player_num, object.num, object.position());
        let removed = match handle {
            ObjectRef::Fleet(_) => remove_if(&mut self.fleets, &(player_num, num), id),
            ObjectRef::Wormhole(_) => remove_if(&mut self.wormholes, &num, id),
            ObjectRef::Salvage(_) => remove_if(&mut self.salvages, &num, id),
            ObjectRef::MineField(_) => remove_if(&mut self.mine_fields, &(player_num, num), id),
            ObjectRef::MineralPacket(_) => {
                remove_if(&mut self.mineral_packets, &(player_num, num), id)
            }
            ObjectRef::Planet(_) => remove_if(&mut self.planets, &num, id),
            ObjectRef::Starbase(_) => true,
        };
        if !removed {
            warn!(?handle, player_num, num, "keyed index did not point at deleted object");
        }

        if handle.kind() != MapObjectKind::Starbase {
            if let Err(error) = self.positions.remove(position, handle) {
                warn!(?handle, error = %error, "position index out of sync while deleting object");
            }
        }

        debug!(?handle, "deleted object");
        Some(entity)
    }

    // =========================================================================
    // Mine fields
    // =========================================================================

    /// Recomputes the cached spec of every mine field.
    ///
    /// Each field's decay depends on how many planets lie inside it.
    pub fn update_mine_field_specs<P>(&mut self, rules: &Rules, players: &P)
    where
        P: PlayerLookup + ?Sized,
    {
        let specs: Vec<_> = self
            .mine_fields()
            .map(|(id, mine_field)| {
                let num_planets = self.planets_within(mine_field.position(), mine_field.radius());
                let owner = players.player(mine_field.map_object.player_num);
                (id, mine_field.compute_spec(rules, owner, num_planets))
            })
            .collect();

        for (id, spec) in specs {
            if let Some(mine_field) = self.mine_field_mut(id) {
                mine_field.spec = spec;
            }
        }
    }

    /// Applies a mine field's damage to a fleet that struck it.
    ///
    /// Returns `None` if either ID is unknown.
    pub fn damage_fleet<A>(
        &mut self,
        fleet_id: ObjectId,
        mine_field_id: ObjectId,
        rules: &Rules,
        applier: &mut A,
    ) -> Option<MineFieldDamage>
    where
        A: DamageApplier + ?Sized,
    {
        let mine_field = self.mine_field(mine_field_id)?.clone();
        let stats = rules.stats(mine_field.mine_field_type);
        let fleet = self
            .entities
            .get_mut(&fleet_id)
            .and_then(MapEntity::as_fleet_mut)?;

        let damage = mine_field.damage_fleet(fleet, stats, &self.designs, applier);
        if damage.damage > 0 {
            fleet.map_object.mark_dirty();
        }
        Some(damage)
    }
}

fn remove_if<K>(map: &mut HashMap<K, ObjectId>, key: &K, id: ObjectId) -> bool
where
    K: std::hash::Hash + Eq,
{
    if map.get(key) == Some(&id) {
        map.remove(key);
        true
    } else {
        false
    }
}

/// First number following a gap in sorted `nums`, or one past the last.
fn next_after_gap(nums: &[u32]) -> u32 {
    let mut next = 1;
    for (i, &num) in nums.iter().enumerate() {
        if i > 0 && num > 1 && num != nums[i - 1].saturating_add(1) {
            return nums[i - 1].saturating_add(1);
        }
        next = num.saturating_add(1);
    }
    next
}

/// Lowest positive number missing from sorted `nums`.
fn lowest_unused(nums: &[u32]) -> u32 {
    let mut next = 1;
    for &num in nums {
        if num > next {
            break;
        }
        if num == next {
            next += 1;
        }
    }
    next
}
