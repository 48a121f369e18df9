//! Concrete entity structs stored in a universe.
//!
//! Only the state the spatial index and the mine field engine need is kept
//! here. Production, cargo transfer and combat state belong to other layers.

use serde::{Deserialize, Serialize};
use starmap::Vector;

use crate::object::{MapObject, MapObjectKind, ObjectId};

/// A planet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    /// Identity and position
    pub map_object: MapObject,
    /// Starbase orbiting this planet, linked when the universe is built
    #[serde(skip)]
    pub starbase: Option<ObjectId>,
}

impl Planet {
    /// Creates a planet.
    #[must_use]
    pub fn new(player_num: u32, num: u32, name: impl Into<String>, position: Vector) -> Self {
        Self {
            map_object: MapObject::new(MapObjectKind::Planet, player_num, num, name, position),
            starbase: None,
        }
    }
}

/// Natural key of a ship design: owner plus per-owner design number.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DesignKey {
    /// Owning player
    pub player_num: u32,
    /// Design number within the owner's designs
    pub num: u32,
}

impl DesignKey {
    /// Creates a design key.
    #[must_use]
    pub const fn new(player_num: u32, num: u32) -> Self {
        Self { player_num, num }
    }
}

/// The computed parts of a design the mine field engine cares about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignSpec {
    /// Engines per ship
    pub num_engines: u32,
    /// Highest warp the engine reaches without fuel; above 1 means ramscoop
    pub engine_free_speed: u32,
    /// Armor per ship
    pub armor: u32,
    /// Ships of this design ignore their owner's detonating mine fields
    pub immune_to_own_detonation: bool,
}

/// A ship design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipDesign {
    /// Natural key
    pub key: DesignKey,
    /// Display name
    pub name: String,
    /// Computed spec
    pub spec: DesignSpec,
}

impl ShipDesign {
    /// Returns `true` if the design's engine is a ramscoop.
    #[must_use]
    pub const fn has_ramscoop(&self) -> bool {
        self.spec.engine_free_speed > 1
    }
}

/// A named battle plan; fleets refer to plans by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattlePlan {
    /// Plan name, unique per owner
    pub name: String,
}

/// A stack of identical ships within a fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipToken {
    /// Design of every ship in the stack
    pub design: DesignKey,
    /// Number of ships
    pub quantity: u32,
    /// Damage carried by the damaged ships, per ship
    pub damage: f64,
    /// Number of ships carrying damage
    pub quantity_damaged: u32,
}

impl ShipToken {
    /// Creates an undamaged token.
    #[must_use]
    pub const fn new(design: DesignKey, quantity: u32) -> Self {
        Self {
            design,
            quantity,
            damage: 0.0,
            quantity_damaged: 0,
        }
    }
}

/// A fleet destination and the warp speed to travel there at.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Target position
    pub position: Vector,
    /// Travel speed
    pub warp_speed: u32,
}

impl Waypoint {
    /// Creates a waypoint.
    #[must_use]
    pub const fn new(position: Vector, warp_speed: u32) -> Self {
        Self {
            position,
            warp_speed,
        }
    }
}

/// A fleet, or a starbase when `map_object.kind` is [`MapObjectKind::Starbase`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    /// Identity and position
    pub map_object: MapObject,
    /// Ship stacks
    pub tokens: Vec<ShipToken>,
    /// Orders, the first of which is the fleet's current location
    pub waypoints: Vec<Waypoint>,
    /// Name of the owner's battle plan this fleet follows
    pub battle_plan_name: String,
    /// Mines this fleet sweeps per year
    pub mine_sweep: u32,
    /// Planet a starbase orbits
    pub planet_num: Option<u32>,
    /// Set when a mine field stopped this fleet this turn
    #[serde(skip)]
    pub struck_mine_field: bool,
}

impl Fleet {
    /// Creates an empty fleet.
    #[must_use]
    pub fn new(player_num: u32, num: u32, name: impl Into<String>, position: Vector) -> Self {
        Self {
            map_object: MapObject::new(MapObjectKind::Fleet, player_num, num, name, position),
            tokens: Vec::new(),
            waypoints: vec![Waypoint::new(position, 0)],
            battle_plan_name: String::from("Default"),
            mine_sweep: 0,
            planet_num: None,
            struck_mine_field: false,
        }
    }

    /// Creates a starbase orbiting a planet.
    #[must_use]
    pub fn new_starbase(player_num: u32, num: u32, name: impl Into<String>, planet: &Planet) -> Self {
        let position = planet.map_object.position();
        Self {
            map_object: MapObject::new(MapObjectKind::Starbase, player_num, num, name, position),
            planet_num: Some(planet.map_object.num),
            waypoints: Vec::new(),
            ..Self::new(player_num, num, "", position)
        }
    }

    /// Adds a token, builder style.
    #[must_use]
    pub fn with_token(mut self, token: ShipToken) -> Self {
        self.tokens.push(token);
        self
    }

    /// Total ships across all tokens.
    #[must_use]
    pub fn total_ships(&self) -> u32 {
        self.tokens.iter().map(|token| token.quantity).sum()
    }

    /// Returns the current position.
    #[must_use]
    pub const fn position(&self) -> Vector {
        self.map_object.position()
    }
}

/// How long a wormhole stays in place before jumping.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WormholeStability {
    /// Never moves
    RockSolid,
    /// Rarely moves
    Stable,
    /// Occasionally moves
    MostlyStable,
    /// Moves every few years
    #[default]
    Average,
    /// Moves often
    SlightlyVolatile,
    /// Moves very often
    Volatile,
    /// Moves almost every year
    ExtremelyVolatile,
}

/// One end of a wormhole pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wormhole {
    /// Identity and position
    pub map_object: MapObject,
    /// Number of the companion wormhole
    pub destination_num: Option<u32>,
    /// Stability class
    pub stability: WormholeStability,
}

impl Wormhole {
    /// Creates an unpaired wormhole.
    #[must_use]
    pub fn new(num: u32, position: Vector, stability: WormholeStability) -> Self {
        Self {
            map_object: MapObject::new(
                MapObjectKind::Wormhole,
                crate::object::UNOWNED,
                num,
                format!("Wormhole #{num}"),
                position,
            ),
            destination_num: None,
            stability,
        }
    }
}

/// Minerals and colonists carried or dumped in space, in kilotons.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cargo {
    /// Ironium
    pub ironium: u32,
    /// Boranium
    pub boranium: u32,
    /// Germanium
    pub germanium: u32,
    /// Colonists, in hundreds
    pub colonists: u32,
}

impl Cargo {
    /// Total mass.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.ironium + self.boranium + self.germanium + self.colonists
    }
}

/// Minerals left in space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Salvage {
    /// Identity and position
    pub map_object: MapObject,
    /// Remaining cargo
    pub cargo: Cargo,
}

impl Salvage {
    /// Creates a salvage pile.
    #[must_use]
    pub fn new(num: u32, player_num: u32, position: Vector, cargo: Cargo) -> Self {
        Self {
            map_object: MapObject::new(
                MapObjectKind::Salvage,
                player_num,
                num,
                format!("Salvage #{num}"),
                position,
            ),
            cargo,
        }
    }
}

/// A packet of minerals in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineralPacket {
    /// Identity and position
    pub map_object: MapObject,
    /// Minerals carried
    pub cargo: Cargo,
    /// Planet the packet is flung toward
    pub target_planet_num: u32,
    /// Flight speed
    pub warp_speed: u32,
}
