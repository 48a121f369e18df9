//! Mine fields and their per-turn behaviour.
//!
//! A mine field is a disc of radius `sqrt(num_mines)` laid by a player. Each
//! turn it decays, enemy fleets sweep it, fleets crossing it too fast may hit
//! it (see [`check_collision`]) and take damage (see
//! [`MineField::damage_fleet`]), and laying more mines drags it toward the
//! laying fleet.
//!
//! All mine counts are whole numbers. The rounding below reproduces the
//! classic ruleset exactly, so replays of old turns match.
//!
//! # Example
//!
//! ```
//! use starmap::Vector;
//! use stellar_core::minefield::{MineField, MineFieldType};
//! use stellar_core::player::Player;
//! use stellar_core::rules::Rules;
//!
//! let owner = Player::new(1, "Alice");
//! let mut field = MineField::new(1, 1, "Mines", MineFieldType::Standard, 1000, Vector::ZERO);
//!
//! let spec = field.compute_spec(&Rules::default(), Some(&owner), 1);
//! assert_eq!(spec.decay_rate, 60);
//! assert_eq!(spec.radius, 1000_f64.sqrt());
//!
//! field.spec = spec;
//! assert_eq!(field.apply_decay(), 60);
//! assert_eq!(field.num_mines, 940);
//! ```

mod collision;
mod damage;

use std::fmt;

use serde::{Deserialize, Serialize};
use starmap::Vector;

pub use collision::{check_collision, Collision};
pub use damage::{DamageApplier, DesignLookup, MineFieldDamage};

use crate::object::{MapObject, MapObjectKind};
use crate::player::Player;
use crate::rules::Rules;

/// Kind of mine field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MineFieldType {
    /// Damages fleets, can be detonated
    Standard,
    /// Damages fleets heavily
    Heavy,
    /// Stops fleets without damage
    SpeedBump,
}

impl MineFieldType {
    /// Every type, in declaration order.
    pub const ALL: [Self; 3] = [Self::Standard, Self::Heavy, Self::SpeedBump];
}

impl fmt::Display for MineFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Standard => "Standard",
            Self::Heavy => "Heavy",
            Self::SpeedBump => "Speed Bump",
        };
        f.write_str(name)
    }
}

/// Orders the owner can give a mine field.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineFieldOrders {
    /// Detonate the field this turn
    pub detonate: bool,
}

/// Values derived from a mine field, its owner and its surroundings.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MineFieldSpec {
    /// Radius in light years
    pub radius: f64,
    /// Mines lost per year, or -1 when the owner's race is unknown
    pub decay_rate: i32,
    /// Whether the field accepts a detonate order
    pub can_detonate: bool,
}

/// A field of mines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineField {
    /// Identity and position
    pub map_object: MapObject,
    /// Owner's orders
    pub orders: MineFieldOrders,
    /// Kind of mines
    pub mine_field_type: MineFieldType,
    /// Mines in the field
    pub num_mines: u32,
    /// Cached derived values, refreshed by [`MineField::compute_spec`]
    pub spec: MineFieldSpec,
}

impl MineField {
    /// Creates a mine field with no orders and an empty spec.
    #[must_use]
    pub fn new(
        player_num: u32,
        num: u32,
        name: impl Into<String>,
        mine_field_type: MineFieldType,
        num_mines: u32,
        position: Vector,
    ) -> Self {
        Self {
            map_object: MapObject::new(MapObjectKind::MineField, player_num, num, name, position),
            orders: MineFieldOrders::default(),
            mine_field_type,
            num_mines,
            spec: MineFieldSpec::default(),
        }
    }

    /// Name given to a newly laid field, e.g. "Humanoids Speed Bump Mine Field #3".
    #[must_use]
    pub fn default_name(owner: &Player, mine_field_type: MineFieldType, num: u32) -> String {
        format!("{} {mine_field_type} Mine Field #{num}", owner.race.plural_name)
    }

    /// Radius in light years, always `sqrt(num_mines)`.
    #[must_use]
    pub fn radius(&self) -> f64 {
        f64::from(self.num_mines).sqrt()
    }

    /// Returns the field's center.
    #[must_use]
    pub const fn position(&self) -> Vector {
        self.map_object.position()
    }

    /// Computes the derived spec.
    ///
    /// `num_planets` is the number of planets inside the field. `owner` is
    /// the field's owner; without one the decay rate is -1.
    #[must_use]
    pub fn compute_spec(&self, rules: &Rules, owner: Option<&Player>, num_planets: u32) -> MineFieldSpec {
        MineFieldSpec {
            radius: self.radius(),
            decay_rate: self.decay_rate(rules, owner, num_planets),
            can_detonate: rules.stats(self.mine_field_type).can_detonate,
        }
    }

    /// Number of mines that decay this year, or -1 for unowned fields.
    ///
    /// The race's base rate plus a per-planet rate (plus the detonate rate
    /// when detonating) is scaled by the race's decay factor, capped at the
    /// race's maximum, applied to the mine count with round-half-up, and
    /// floored at the type's minimum decay.
    #[must_use]
    pub fn decay_rate(&self, rules: &Rules, owner: Option<&Player>, num_planets: u32) -> i32 {
        let Some(owner) = owner.filter(|_| self.map_object.owned()) else {
            return -1;
        };
        let race = &owner.race;

        let mut rate = race.mine_field_base_decay_rate
            + race.mine_field_planet_decay_rate * f64::from(num_planets);
        if self.orders.detonate {
            rate += race.mine_field_detonate_decay_rate;
        }
        rate *= race.mine_field_min_decay_factor;
        rate = rate.min(race.mine_field_max_decay_rate);

        #[allow(clippy::cast_possible_truncation)]
        let decayed = (f64::from(self.num_mines) * rate + 0.5) as i32;
        let min_decay = i32::try_from(rules.stats(self.mine_field_type).min_decay).unwrap_or(i32::MAX);
        decayed.max(min_decay)
    }

    /// Removes this year's decayed mines, as cached in `spec.decay_rate`.
    ///
    /// Returns the number of mines removed. A negative rate removes nothing
    /// and the count never drops below zero.
    pub fn apply_decay(&mut self) -> u32 {
        let Ok(decayed) = u32::try_from(self.spec.decay_rate) else {
            return 0;
        };
        let old = self.num_mines;
        self.num_mines = old.saturating_sub(decayed);
        old - self.num_mines
    }

    /// Shrinks the field after a fleet strikes it.
    ///
    /// | mines | after impact |
    /// |-------|--------------|
    /// | ≤ 10 | 0 |
    /// | ≤ 200 | mines − 10 |
    /// | ≤ 1000 | mines × 0.95, truncated |
    /// | ≤ 5000 | mines − 50 |
    /// | above | mines × 0.95, truncated |
    pub fn reduce_on_impact(&mut self) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let shrink = |mines: u32| (f64::from(mines) * 0.95) as u32;

        self.num_mines = match self.num_mines {
            0..=10 => 0,
            mines @ 11..=200 => mines - 10,
            mines @ 201..=1000 => shrink(mines),
            mines @ 1001..=5000 => mines - 50,
            mines => shrink(mines),
        };
    }

    /// Sweeps mines with a fleet at `fleet_position`, returning how many were removed.
    ///
    /// A fleet only reaches mines between itself and the edge: the field can
    /// lose at most `mines - ceil(distance_to_center²)`, and at most
    /// `floor(mine_sweep × sweep_factor)`.
    pub fn sweep(&mut self, rules: &Rules, fleet_position: Vector, mine_sweep: u32) -> u32 {
        let distance = fleet_position.distance(self.position());

        #[allow(clippy::cast_possible_truncation)]
        let unreachable = (distance * distance).ceil() as i64;
        let reachable = (i64::from(self.num_mines) - unreachable).max(0);

        #[allow(clippy::cast_possible_truncation)]
        let power = (f64::from(mine_sweep) * rules.stats(self.mine_field_type).sweep_factor) as i64;

        let swept = u32::try_from(reachable.min(power).max(0)).unwrap_or(0);
        let old = self.num_mines;
        self.num_mines = old.saturating_sub(swept);
        old - self.num_mines
    }

    /// Where the field ends up after `mines_laid` mines are laid from `layer_position`.
    ///
    /// The field moves `min(1, mines_laid / num_mines)` of the way toward the
    /// layer, with both coordinates rounded to whole light years.
    #[must_use]
    pub fn drift_target(&self, layer_position: Vector, mines_laid: u32) -> Vector {
        let center = self.position();
        if mines_laid == 0 {
            return center;
        }

        let factor = (f64::from(mines_laid) / f64::from(self.num_mines.max(1))).min(1.0);
        let heading = (layer_position - center).normalize_or_zero();
        let distance = layer_position.distance(center);
        (center + heading * distance * factor).round()
    }

    /// Moves the field toward the laying fleet. Only the universe may do this,
    /// since the field's position bucket has to follow.
    pub(crate) fn drift_toward_layer(&mut self, layer_position: Vector, mines_laid: u32) -> Vector {
        let target = self.drift_target(layer_position, mines_laid);
        self.map_object.set_position(target);
        target
    }

    /// Returns `true` if `position` lies inside or on the edge of the field.
    #[must_use]
    pub fn contains(&self, position: Vector) -> bool {
        position.distance_squared(self.position()) <= f64::from(self.num_mines)
    }
}
