//! Entities owned by a universe.
//!
//! [`MapEntity`] is the arena's storage type: one enum variant per kind of
//! placeable object, each holding the concrete struct from [`components`] or
//! the [`MineField`] from the mine field engine.
//!
//! The variant always agrees with the entity's `map_object.kind`, and with the
//! [`ObjectRef`] variant the universe hands out for it.
//!
//! # Example
//!
//! ```
//! use starmap::Vector;
//! use stellar_core::entity::{Fleet, MapEntity};
//! use stellar_core::object::MapObjectKind;
//!
//! let entity = MapEntity::Fleet(Fleet::new(1, 1, "Scout #1", Vector::ZERO));
//! assert_eq!(entity.kind(), MapObjectKind::Fleet);
//! assert!(entity.as_fleet().is_some());
//! assert!(entity.as_planet().is_none());
//! ```

pub mod components;

use serde::{Deserialize, Serialize};

pub use components::{
    BattlePlan, Cargo, DesignKey, DesignSpec, Fleet, MineralPacket, Planet, Salvage, ShipDesign,
    ShipToken, Waypoint, Wormhole, WormholeStability,
};

use crate::minefield::MineField;
use crate::object::{MapObject, MapObjectKind, ObjectId, ObjectRef};

/// Storage for any placeable object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapEntity {
    /// A planet
    Planet(Planet),
    /// A fleet
    Fleet(Fleet),
    /// A starbase
    Starbase(Fleet),
    /// A wormhole
    Wormhole(Wormhole),
    /// A mine field
    MineField(MineField),
    /// A salvage pile
    Salvage(Salvage),
    /// A mineral packet
    MineralPacket(MineralPacket),
}

impl MapEntity {
    /// Returns the kind tag of the stored entity.
    #[must_use]
    pub const fn kind(&self) -> MapObjectKind {
        match self {
            Self::Planet(_) => MapObjectKind::Planet,
            Self::Fleet(_) => MapObjectKind::Fleet,
            Self::Starbase(_) => MapObjectKind::Starbase,
            Self::Wormhole(_) => MapObjectKind::Wormhole,
            Self::MineField(_) => MapObjectKind::MineField,
            Self::Salvage(_) => MapObjectKind::Salvage,
            Self::MineralPacket(_) => MapObjectKind::MineralPacket,
        }
    }

    /// Returns the tagged handle for this entity under `id`.
    #[must_use]
    pub const fn handle(&self, id: ObjectId) -> ObjectRef {
        ObjectRef::new(self.kind(), id)
    }

    /// Returns the shared identity of the stored entity.
    #[must_use]
    pub const fn map_object(&self) -> &MapObject {
        match self {
            Self::Planet(planet) => &planet.map_object,
            Self::Fleet(fleet) | Self::Starbase(fleet) => &fleet.map_object,
            Self::Wormhole(wormhole) => &wormhole.map_object,
            Self::MineField(mine_field) => &mine_field.map_object,
            Self::Salvage(salvage) => &salvage.map_object,
            Self::MineralPacket(packet) => &packet.map_object,
        }
    }

    /// Returns the shared identity mutably.
    pub fn map_object_mut(&mut self) -> &mut MapObject {
        match self {
            Self::Planet(planet) => &mut planet.map_object,
            Self::Fleet(fleet) | Self::Starbase(fleet) => &mut fleet.map_object,
            Self::Wormhole(wormhole) => &mut wormhole.map_object,
            Self::MineField(mine_field) => &mut mine_field.map_object,
            Self::Salvage(salvage) => &mut salvage.map_object,
            Self::MineralPacket(packet) => &mut packet.map_object,
        }
    }

    /// Returns the planet, if this is a planet.
    #[must_use]
    pub const fn as_planet(&self) -> Option<&Planet> {
        match self {
            Self::Planet(planet) => Some(planet),
            _ => None,
        }
    }

    /// Returns the planet mutably, if this is a planet.
    pub fn as_planet_mut(&mut self) -> Option<&mut Planet> {
        match self {
            Self::Planet(planet) => Some(planet),
            _ => None,
        }
    }

    /// Returns the fleet, if this is a fleet (starbases excluded).
    #[must_use]
    pub const fn as_fleet(&self) -> Option<&Fleet> {
        match self {
            Self::Fleet(fleet) => Some(fleet),
            _ => None,
        }
    }

    /// Returns the fleet mutably, if this is a fleet (starbases excluded).
    pub fn as_fleet_mut(&mut self) -> Option<&mut Fleet> {
        match self {
            Self::Fleet(fleet) => Some(fleet),
            _ => None,
        }
    }

    /// Returns the starbase, if this is a starbase.
    #[must_use]
    pub const fn as_starbase(&self) -> Option<&Fleet> {
        match self {
            Self::Starbase(starbase) => Some(starbase),
            _ => None,
        }
    }

    /// Returns the wormhole, if this is a wormhole.
    #[must_use]
    pub const fn as_wormhole(&self) -> Option<&Wormhole> {
        match self {
            Self::Wormhole(wormhole) => Some(wormhole),
            _ => None,
        }
    }

    /// Returns the wormhole mutably, if this is a wormhole.
    pub fn as_wormhole_mut(&mut self) -> Option<&mut Wormhole> {
        match self {
            Self::Wormhole(wormhole) => Some(wormhole),
            _ => None,
        }
    }

    /// Returns the mine field, if this is a mine field.
    #[must_use]
    pub const fn as_mine_field(&self) -> Option<&MineField> {
        match self {
            Self::MineField(mine_field) => Some(mine_field),
            _ => None,
        }
    }

    /// Returns the mine field mutably, if this is a mine field.
    pub fn as_mine_field_mut(&mut self) -> Option<&mut MineField> {
        match self {
            Self::MineField(mine_field) => Some(mine_field),
            _ => None,
        }
    }

    /// Returns the salvage, if this is salvage.
    #[must_use]
    pub const fn as_salvage(&self) -> Option<&Salvage> {
        match self {
            Self::Salvage(salvage) => Some(salvage),
            _ => None,
        }
    }

    /// Returns the mineral packet, if this is a mineral packet.
    #[must_use]
    pub const fn as_mineral_packet(&self) -> Option<&MineralPacket> {
        match self {
            Self::MineralPacket(packet) => Some(packet),
            _ => None,
        }
    }
}
