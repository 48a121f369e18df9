//! Fleets striking enemy mine fields while moving.

use rand::Rng;
use starmap::segment_intersects_circle;
use tracing::{debug, trace};

use super::MineField;
use crate::entity::{Fleet, Waypoint};
use crate::object::ObjectId;
use crate::player::PlayerLookup;
use crate::rules::Rules;

/// Outcome of moving a fleet past mine fields.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Collision {
    /// The field the fleet struck, if any
    pub mine_field: Option<ObjectId>,
    /// How far the fleet got; the full distance when nothing was struck
    pub distance_travelled: f64,
}

impl Collision {
    /// Returns `true` if the fleet struck a field.
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        self.mine_field.is_some()
    }
}

/// Checks a fleet's move of `distance` light years toward `destination` against mine fields.
///
/// Fields are visited in the order `mine_fields` yields them and the first
/// hit ends the check, so the order together with the draws taken from `rng`
/// fixes the outcome. Fields owned by the fleet's owner, or by a player who
/// counts the fleet's owner as a friend, are skipped, as is every field the
/// fleet crosses at or below the type's max speed plus its race's safe warp
/// bonus.
///
/// For each remaining field the travel segment is tested against the field's
/// disc. If it enters, one uniform draw per light year inside the field
/// (at most the radius) is compared against `chance_of_hit × warps over the
/// safe speed`. The first draw at or below that chance stops the fleet at the
/// light year it was taken on.
pub fn check_collision<'a, P, I, R>(
    rules: &Rules,
    players: &P,
    mine_fields: I,
    fleet: &Fleet,
    destination: &Waypoint,
    distance: f64,
    rng: &mut R,
) -> Collision
where
    P: PlayerLookup + ?Sized,
    I: IntoIterator<Item = (ObjectId, &'a MineField)>,
    R: Rng + ?Sized,
{
    let fleet_owner = fleet.map_object.player_num;
    let safe_warp_bonus = players
        .player(fleet_owner)
        .map_or(0, |player| player.race.mine_field_safe_warp_bonus);

    let from = fleet.position();
    let to = from + (destination.position - from).normalize_or_zero() * distance;

    for (id, mine_field) in mine_fields {
        let field_owner = mine_field.map_object.player_num;
        if field_owner == fleet_owner || players.is_friend(field_owner, fleet_owner) {
            continue;
        }

        let stats = rules.stats(mine_field.mine_field_type);
        let safe_speed = stats.max_speed.saturating_add(safe_warp_bonus);
        if destination.warp_speed <= safe_speed {
            continue;
        }

        let radius = mine_field.radius();
        let Some(entry) = segment_intersects_circle(from, to, mine_field.position(), radius) else {
            continue;
        };

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let light_years_in_field = radius.min(((1.0 - entry) * distance).ceil()) as u32;
        let light_years_before_field = entry * distance;
        let chance_to_hit = stats.chance_of_hit * f64::from(destination.warp_speed - safe_speed);

        trace!(
            mine_field = %id,
            light_years_in_field,
            chance_to_hit,
            "fleet crossing mine field"
        );

        for check in 0..light_years_in_field {
            if chance_to_hit >= rng.gen::<f64>() {
                let distance_travelled = light_years_before_field + f64::from(check);
                debug!(
                    fleet = %fleet.map_object,
                    mine_field = %id,
                    distance_travelled,
                    "fleet struck mine field"
                );
                return Collision {
                    mine_field: Some(id),
                    distance_travelled,
                };
            }
        }
    }

    Collision {
        mine_field: None,
        distance_travelled: distance,
    }
}
