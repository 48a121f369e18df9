//! Damage dealt to a fleet that strikes a mine field.
//!
//! The engine only decides how much damage each token takes. Turning damage
//! into armor loss and destroyed ships is the job of a [`DamageApplier`]
//! supplied by the combat layer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::MineField;
use crate::entity::{DesignKey, Fleet, ShipDesign, ShipToken};
use crate::rules::MineFieldStats;

/// Damage dealt by one mine field strike.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineFieldDamage {
    /// Total damage across all tokens
    pub damage: u32,
    /// Ships destroyed across all tokens
    pub ships_destroyed: u32,
    /// Whether every ship in the fleet was destroyed
    pub fleet_destroyed: bool,
}

/// Applies mine damage to a ship token.
pub trait DamageApplier {
    /// Applies `damage` to `token` and returns the number of ships destroyed.
    fn apply_mine_damage(&mut self, token: &mut ShipToken, design: &ShipDesign, damage: u32) -> u32;
}

impl<F> DamageApplier for F
where
    F: FnMut(&mut ShipToken, &ShipDesign, u32) -> u32,
{
    fn apply_mine_damage(&mut self, token: &mut ShipToken, design: &ShipDesign, damage: u32) -> u32 {
        self(token, design, damage)
    }
}

/// Looks ship designs up by key.
pub trait DesignLookup {
    /// Returns the design with this key, if any.
    fn design(&self, key: DesignKey) -> Option<&ShipDesign>;
}

impl DesignLookup for HashMap<DesignKey, ShipDesign> {
    fn design(&self, key: DesignKey) -> Option<&ShipDesign> {
        self.get(&key)
    }
}

impl DesignLookup for [ShipDesign] {
    fn design(&self, key: DesignKey) -> Option<&ShipDesign> {
        self.iter().find(|design| design.key == key)
    }
}

impl MineField {
    /// Damages a fleet that struck this field.
    ///
    /// Any ramscoop engine in the fleet switches the whole fleet to the `_rs`
    /// damage values. Fields whose minimum damage is zero deal no damage.
    ///
    /// - Fleets of up to 5 ships: the first damaged token takes
    ///   `engines × min_damage` once. Later tokens only take
    ///   `damage_per_engine × quantity` for each engine beyond the first
    ///   token's engine count.
    /// - Larger fleets: every token takes `damage_per_engine × engines × quantity`.
    ///
    /// While the field is detonating, tokens of the owner's own designs that
    /// are immune to their own detonation take nothing. Tokens whose design
    /// cannot be found are skipped with a warning.
    pub fn damage_fleet<D, A>(
        &self,
        fleet: &mut Fleet,
        stats: &MineFieldStats,
        designs: &D,
        applier: &mut A,
    ) -> MineFieldDamage
    where
        D: DesignLookup + ?Sized,
        A: DamageApplier + ?Sized,
    {
        let total_ships = fleet.total_ships();
        let has_ramscoop = fleet.tokens.iter().any(|token| {
            designs
                .design(token.design)
                .is_some_and(ShipDesign::has_ramscoop)
        });

        let (min_damage, damage_per_engine) = if has_ramscoop {
            (stats.min_damage_per_fleet_rs, stats.damage_per_engine_rs)
        } else {
            (stats.min_damage_per_fleet, stats.damage_per_engine)
        };

        let mut result = MineFieldDamage::default();
        if min_damage > 0 {
            let own_detonation =
                self.orders.detonate && self.map_object.owned_by(fleet.map_object.player_num);
            let small_fleet = total_ships <= 5;
            let mut first_engines = 0;

            for token in &mut fleet.tokens {
                let Some(design) = designs.design(token.design) else {
                    warn!(
                        design = ?token.design,
                        fleet = %fleet.map_object,
                        "token design not found, skipping mine damage"
                    );
                    continue;
                };
                if own_detonation && design.spec.immune_to_own_detonation {
                    continue;
                }

                let engines = design.spec.num_engines;
                let damage = if !small_fleet {
                    damage_per_engine.saturating_mul(engines).saturating_mul(token.quantity)
                } else if first_engines == 0 {
                    first_engines = engines;
                    engines.saturating_mul(min_damage)
                } else if engines > first_engines {
                    damage_per_engine
                        .saturating_mul(engines - first_engines)
                        .saturating_mul(token.quantity)
                } else {
                    continue;
                };

                result.damage = result.damage.saturating_add(damage);
                result.ships_destroyed = result
                    .ships_destroyed
                    .saturating_add(applier.apply_mine_damage(token, design, damage));
            }
        }

        result.fleet_destroyed = total_ships <= result.ships_destroyed;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::DesignSpec;
    use crate::minefield::MineFieldType;
    use crate::rules::Rules;
    use starmap::Vector;

    fn design(num: u32, num_engines: u32, engine_free_speed: u32) -> ShipDesign {
        ShipDesign {
            key: DesignKey::new(1, num),
            name: format!("Design {num}"),
            spec: DesignSpec {
                num_engines,
                engine_free_speed,
                armor: 100,
                immune_to_own_detonation: false,
            },
        }
    }

    fn enemy_field(mine_field_type: MineFieldType) -> MineField {
        MineField::new(2, 1, "Mines", mine_field_type, 1000, Vector::ZERO)
    }

    /// Records damage and destroys nothing.
    #[derive(Default)]
    struct Recorder(Vec<u32>);

    impl DamageApplier for Recorder {
        fn apply_mine_damage(&mut self, _token: &mut ShipToken, _design: &ShipDesign, damage: u32) -> u32 {
            self.0.push(damage);
            0
        }
    }

    mod small_fleet_tests {
        use super::*;

        #[test]
        fn first_token_takes_flat_charge() {
            let designs = vec![design(1, 2, 1)];
            let mut fleet = Fleet::new(1, 1, "Scouts", Vector::ZERO)
                .with_token(ShipToken::new(DesignKey::new(1, 1), 3));
            let stats = Rules::default().stats(MineFieldType::Standard).clone();
            let mut log = Recorder::default();

            let damage = enemy_field(MineFieldType::Standard).damage_fleet(
                &mut fleet,
                &stats,
                designs.as_slice(),
                &mut log,
            );

            // 2 engines x 500, not multiplied by quantity
            assert_eq!(log.0, vec![1000]);
            assert_eq!(damage.damage, 1000);
            assert!(!damage.fleet_destroyed);
        }

        #[test]
        fn later_tokens_pay_only_for_extra_engines() {
            let designs = vec![design(1, 1, 1), design(2, 3, 1), design(3, 1, 1)];
            let mut fleet = Fleet::new(1, 1, "Mixed", Vector::ZERO)
                .with_token(ShipToken::new(DesignKey::new(1, 1), 1))
                .with_token(ShipToken::new(DesignKey::new(1, 2), 2))
                .with_token(ShipToken::new(DesignKey::new(1, 3), 1));
            let stats = Rules::default().stats(MineFieldType::Standard).clone();
            let mut log = Recorder::default();

            let damage = enemy_field(MineFieldType::Standard).damage_fleet(
                &mut fleet,
                &stats,
                designs.as_slice(),
                &mut log,
            );

            // 1 x 500, then 100 x (3 - 1) x 2, third token has no extra engines
            assert_eq!(log.0, vec![500, 400]);
            assert_eq!(damage.damage, 900);
        }

        #[test]
        fn ramscoop_anywhere_uses_ramscoop_rates() {
            let designs = vec![design(1, 1, 1), design(2, 2, 6)];
            let mut fleet = Fleet::new(1, 1, "Mixed", Vector::ZERO)
                .with_token(ShipToken::new(DesignKey::new(1, 1), 1))
                .with_token(ShipToken::new(DesignKey::new(1, 2), 1));
            let stats = Rules::default().stats(MineFieldType::Standard).clone();
            let mut log = Recorder::default();

            enemy_field(MineFieldType::Standard).damage_fleet(
                &mut fleet,
                &stats,
                designs.as_slice(),
                &mut log,
            );

            // 1 x 600, then 125 x (2 - 1) x 1
            assert_eq!(log.0, vec![600, 125]);
        }
    }

    mod large_fleet_tests {
        use super::*;

        #[test]
        fn every_token_charged_per_engine() {
            let designs = vec![design(1, 2, 1), design(2, 1, 1)];
            let mut fleet = Fleet::new(1, 1, "Armada", Vector::ZERO)
                .with_token(ShipToken::new(DesignKey::new(1, 1), 4))
                .with_token(ShipToken::new(DesignKey::new(1, 2), 3));
            let stats = Rules::default().stats(MineFieldType::Heavy).clone();
            let mut log = Recorder::default();

            let damage = enemy_field(MineFieldType::Heavy).damage_fleet(
                &mut fleet,
                &stats,
                designs.as_slice(),
                &mut log,
            );

            // 500 x 2 x 4, 500 x 1 x 3
            assert_eq!(log.0, vec![4000, 1500]);
            assert_eq!(damage.damage, 5500);
        }
    }

    mod immunity_tests {
        use super::*;

        #[test]
        fn own_detonation_skips_immune_designs() {
            let mut immune = design(1, 1, 1);
            immune.spec.immune_to_own_detonation = true;
            let designs = vec![immune, design(2, 2, 1)];
            let mut fleet = Fleet::new(1, 1, "Layers", Vector::ZERO)
                .with_token(ShipToken::new(DesignKey::new(1, 1), 1))
                .with_token(ShipToken::new(DesignKey::new(1, 2), 1));
            let mut own_field = MineField::new(1, 1, "Mines", MineFieldType::Standard, 1000, Vector::ZERO);
            own_field.orders.detonate = true;
            let stats = Rules::default().stats(MineFieldType::Standard).clone();
            let mut log = Recorder::default();

            own_field.damage_fleet(&mut fleet, &stats, designs.as_slice(), &mut log);

            // the immune token is skipped, so the second token takes the flat charge
            assert_eq!(log.0, vec![1000]);
        }

        #[test]
        fn enemy_detonation_ignores_immunity() {
            let mut immune = design(1, 1, 1);
            immune.spec.immune_to_own_detonation = true;
            let designs = vec![immune];
            let mut fleet = Fleet::new(1, 1, "Layers", Vector::ZERO)
                .with_token(ShipToken::new(DesignKey::new(1, 1), 1));
            let mut field = enemy_field(MineFieldType::Standard);
            field.orders.detonate = true;
            let stats = Rules::default().stats(MineFieldType::Standard).clone();
            let mut log = Recorder::default();

            field.damage_fleet(&mut fleet, &stats, designs.as_slice(), &mut log);

            assert_eq!(log.0, vec![500]);
        }
    }

    #[test]
    fn speed_bumps_deal_no_damage() {
        let designs = vec![design(1, 2, 1)];
        let mut fleet =
            Fleet::new(1, 1, "Scout", Vector::ZERO).with_token(ShipToken::new(DesignKey::new(1, 1), 1));
        let stats = Rules::default().stats(MineFieldType::SpeedBump).clone();
        let mut log = Recorder::default();

        let damage = enemy_field(MineFieldType::SpeedBump).damage_fleet(
            &mut fleet,
            &stats,
            designs.as_slice(),
            &mut log,
        );

        assert!(log.0.is_empty());
        assert_eq!(damage, MineFieldDamage::default());
    }

    #[test]
    fn fleet_destroyed_when_every_ship_lost() {
        let designs: HashMap<DesignKey, ShipDesign> =
            [(DesignKey::new(1, 1), design(1, 1, 1))].into_iter().collect();
        let mut fleet =
            Fleet::new(1, 1, "Scout", Vector::ZERO).with_token(ShipToken::new(DesignKey::new(1, 1), 2));
        let stats = Rules::default().stats(MineFieldType::Standard).clone();

        let mut destroy_all = |token: &mut ShipToken, _design: &ShipDesign, _damage: u32| {
            let lost = token.quantity;
            token.quantity = 0;
            lost
        };
        let damage = enemy_field(MineFieldType::Standard).damage_fleet(
            &mut fleet,
            &stats,
            &designs,
            &mut destroy_all,
        );

        assert_eq!(damage.ships_destroyed, 2);
        assert!(damage.fleet_destroyed);
        assert_eq!(fleet.tokens[0].quantity, 0);
    }

    #[test]
    fn oversized_damage_saturates() {
        let designs = vec![design(1, 4, 1), design(2, 4, 1)];
        let mut fleet = Fleet::new(1, 1, "Armada", Vector::ZERO)
            .with_token(ShipToken::new(DesignKey::new(1, 1), 10))
            .with_token(ShipToken::new(DesignKey::new(1, 2), 10));
        let mut stats = Rules::default().stats(MineFieldType::Heavy).clone();
        stats.damage_per_engine = u32::MAX / 2;
        let mut log = Recorder::default();

        let damage = enemy_field(MineFieldType::Heavy).damage_fleet(
            &mut fleet,
            &stats,
            designs.as_slice(),
            &mut log,
        );

        assert_eq!(log.0, vec![u32::MAX, u32::MAX]);
        assert_eq!(damage.damage, u32::MAX);
    }

    #[test]
    fn missing_design_is_skipped() {
        let designs: Vec<ShipDesign> = Vec::new();
        let mut fleet =
            Fleet::new(1, 1, "Ghost", Vector::ZERO).with_token(ShipToken::new(DesignKey::new(1, 9), 1));
        let stats = Rules::default().stats(MineFieldType::Standard).clone();
        let mut log = Recorder::default();

        let damage = enemy_field(MineFieldType::Standard).damage_fleet(
            &mut fleet,
            &stats,
            designs.as_slice(),
            &mut log,
        );

        assert!(log.0.is_empty());
        assert_eq!(damage.damage, 0);
    }
}
