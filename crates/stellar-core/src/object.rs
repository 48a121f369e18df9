//! Identity shared by every placeable object on the star map.
//!
//! This module provides:
//! - [`ObjectId`]: stable arena handle assigned by the [`Universe`](crate::universe::Universe)
//! - [`MapObjectKind`]: the kind tag of a placeable object
//! - [`ObjectRef`]: a tagged handle stored in position buckets and lookup tables
//! - [`ObjectFlags`]: transient per-turn bookkeeping bits
//! - [`MapObject`]: owner, number, name and position common to all entities
//!
//! # Positions
//!
//! A map object's position is read-only outside this crate. Moving something
//! that lives in a universe must go through the universe (for example
//! [`Universe::move_fleet`](crate::universe::Universe::move_fleet)) so the
//! position index is patched in the same step.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use starmap::Vector;

/// Player number used for objects nobody owns.
pub const UNOWNED: u32 = 0;

/// Stable handle for an entity stored in a universe.
///
/// IDs are assigned monotonically and never reused within one universe, so
/// ordering by `ObjectId` is the order objects were registered.
///
/// # Example
///
/// ```
/// use stellar_core::object::ObjectId;
///
/// let first = ObjectId::new(1);
/// let second = ObjectId::new(2);
/// assert!(first < second);
/// assert_eq!(second.as_u64(), 2);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Creates an `ObjectId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind tag for a placeable object.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MapObjectKind {
    /// A planet, owned or not
    Planet,
    /// A fleet of ships
    Fleet,
    /// A starbase orbiting a planet
    Starbase,
    /// One end of a wormhole pair
    Wormhole,
    /// A field of mines laid by a player
    MineField,
    /// Minerals left behind by destroyed or scrapped ships
    Salvage,
    /// A packet of minerals flung by a mass driver
    MineralPacket,
}

impl fmt::Display for MapObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Planet => "Planet",
            Self::Fleet => "Fleet",
            Self::Starbase => "Starbase",
            Self::Wormhole => "Wormhole",
            Self::MineField => "MineField",
            Self::Salvage => "Salvage",
            Self::MineralPacket => "MineralPacket",
        };
        f.write_str(name)
    }
}

/// Tagged handle to an entity in a universe.
///
/// Position buckets hold `ObjectRef`s rather than entities, so callers match
/// on the variant to learn what they found.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectRef {
    /// Handle to a [`Planet`](crate::entity::Planet)
    Planet(ObjectId),
    /// Handle to a [`Fleet`](crate::entity::Fleet)
    Fleet(ObjectId),
    /// Handle to a starbase (stored as a [`Fleet`](crate::entity::Fleet))
    Starbase(ObjectId),
    /// Handle to a [`Wormhole`](crate::entity::Wormhole)
    Wormhole(ObjectId),
    /// Handle to a [`MineField`](crate::minefield::MineField)
    MineField(ObjectId),
    /// Handle to a [`Salvage`](crate::entity::Salvage)
    Salvage(ObjectId),
    /// Handle to a [`MineralPacket`](crate::entity::MineralPacket)
    MineralPacket(ObjectId),
}

impl ObjectRef {
    /// Builds the handle for an entity of the given kind.
    #[must_use]
    pub const fn new(kind: MapObjectKind, id: ObjectId) -> Self {
        match kind {
            MapObjectKind::Planet => Self::Planet(id),
            MapObjectKind::Fleet => Self::Fleet(id),
            MapObjectKind::Starbase => Self::Starbase(id),
            MapObjectKind::Wormhole => Self::Wormhole(id),
            MapObjectKind::MineField => Self::MineField(id),
            MapObjectKind::Salvage => Self::Salvage(id),
            MapObjectKind::MineralPacket => Self::MineralPacket(id),
        }
    }

    /// Returns the arena handle.
    #[must_use]
    pub const fn id(self) -> ObjectId {
        match self {
            Self::Planet(id)
            | Self::Fleet(id)
            | Self::Starbase(id)
            | Self::Wormhole(id)
            | Self::MineField(id)
            | Self::Salvage(id)
            | Self::MineralPacket(id) => id,
        }
    }

    /// Returns the kind tag.
    #[must_use]
    pub const fn kind(self) -> MapObjectKind {
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
}

bitflags! {
    /// Transient bookkeeping bits, never persisted.
    ///
    /// The persistence layer uses these after a turn to decide what to write
    /// back and what to delete.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ObjectFlags: u8 {
        /// The object changed during this turn
        const DIRTY = 1 << 0;
        /// The object was removed from the universe during this turn
        const DELETE = 1 << 1;
    }
}

/// Identity and position shared by every placeable object.
///
/// # Example
///
/// ```
/// use starmap::Vector;
/// use stellar_core::object::{MapObject, MapObjectKind};
///
/// let planet = MapObject::new(MapObjectKind::Planet, 0, 12, "Brin", Vector::new(300.0, 42.0));
/// assert!(!planet.owned());
/// assert_eq!(planet.position(), Vector::new(300.0, 42.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    /// Kind tag
    pub kind: MapObjectKind,
    /// Owning player number, [`UNOWNED`] for nobody
    pub player_num: u32,
    /// Number unique per owner and kind
    pub num: u32,
    /// Display name
    pub name: String,
    position: Vector,
    #[serde(skip)]
    flags: ObjectFlags,
}

impl MapObject {
    /// Creates a map object at a position with no flags set.
    #[must_use]
    pub fn new(
        kind: MapObjectKind,
        player_num: u32,
        num: u32,
        name: impl Into<String>,
        position: Vector,
    ) -> Self {
        Self {
            kind,
            player_num,
            num,
            name: name.into(),
            position,
            flags: ObjectFlags::empty(),
        }
    }

    /// Returns the object's current position.
    #[must_use]
    pub const fn position(&self) -> Vector {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Vector) {
        self.position = position;
    }

    /// Returns `true` if a player owns this object.
    #[must_use]
    pub const fn owned(&self) -> bool {
        self.player_num != UNOWNED
    }

    /// Returns `true` if `player_num` owns this object.
    #[must_use]
    pub const fn owned_by(&self, player_num: u32) -> bool {
        self.owned() && self.player_num == player_num
    }

    /// Returns the transient flags.
    #[must_use]
    pub const fn flags(&self) -> ObjectFlags {
        self.flags
    }

    /// Returns `true` if the object changed this turn.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.flags.contains(ObjectFlags::DIRTY)
    }

    /// Returns `true` if the object was removed this turn.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.flags.contains(ObjectFlags::DELETE)
    }

    /// Marks the object as changed.
    pub fn mark_dirty(&mut self) {
        self.flags.insert(ObjectFlags::DIRTY);
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.flags.insert(ObjectFlags::DELETE);
    }

    /// Clears all transient flags, typically after the turn is persisted.
    pub fn clear_flags(&mut self) {
        self.flags = ObjectFlags::empty();
    }
}

impl fmt::Display for MapObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} #{} ({}) of player {}",
            self.kind, self.num, self.name, self.player_num
        )
    }
}
