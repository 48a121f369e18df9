//! Players, their race tuning, and owner lookup.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::entity::{BattlePlan, ShipDesign};

/// Per-race mine field constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceSpec {
    /// Plural race name used in object names
    pub plural_name: String,
    /// Fraction of mines decaying per year
    pub mine_field_base_decay_rate: f64,
    /// Additional decay per planet inside the field
    pub mine_field_planet_decay_rate: f64,
    /// Additional decay while the field is detonating
    pub mine_field_detonate_decay_rate: f64,
    /// Multiplier applied to the summed decay rate
    pub mine_field_min_decay_factor: f64,
    /// Cap on the decay rate
    pub mine_field_max_decay_rate: f64,
    /// Extra warp this race's fleets cross enemy fields at safely
    pub mine_field_safe_warp_bonus: u32,
}

impl Default for RaceSpec {
    fn default() -> Self {
        Self {
            plural_name: String::from("Humanoids"),
            mine_field_base_decay_rate: 0.02,
            mine_field_planet_decay_rate: 0.04,
            mine_field_detonate_decay_rate: 0.0,
            mine_field_min_decay_factor: 1.0,
            mine_field_max_decay_rate: 0.5,
            mine_field_safe_warp_bonus: 0,
        }
    }
}

/// A player in one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Player number, starting at 1
    pub num: u32,
    /// Display name
    pub name: String,
    /// Race tuning
    pub race: RaceSpec,
    /// Players this player treats as friends
    pub friends: BTreeSet<u32>,
    /// Ship designs
    pub designs: Vec<ShipDesign>,
    /// Battle plans
    pub battle_plans: Vec<BattlePlan>,
}

impl Player {
    /// Creates a player with the default race and no designs.
    #[must_use]
    pub fn new(num: u32, name: impl Into<String>) -> Self {
        Self {
            num,
            name: name.into(),
            race: RaceSpec::default(),
            friends: BTreeSet::new(),
            designs: Vec::new(),
            battle_plans: vec![BattlePlan {
                name: String::from("Default"),
            }],
        }
    }

    /// Replaces the race, builder style.
    #[must_use]
    pub fn with_race(mut self, race: RaceSpec) -> Self {
        self.race = race;
        self
    }

    /// Adds a friend, builder style.
    #[must_use]
    pub fn with_friend(mut self, player_num: u32) -> Self {
        self.friends.insert(player_num);
        self
    }

    /// Adds a design, builder style.
    #[must_use]
    pub fn with_design(mut self, design: ShipDesign) -> Self {
        self.designs.push(design);
        self
    }

    /// Returns `true` if this player treats `player_num` as a friend.
    ///
    /// Every player is their own friend.
    #[must_use]
    pub fn is_friend(&self, player_num: u32) -> bool {
        player_num == self.num || self.friends.contains(&player_num)
    }
}

/// Looks players up by number.
pub trait PlayerLookup {
    /// Returns the player with this number, if any.
    fn player(&self, num: u32) -> Option<&Player>;

    /// Returns `true` if `player_num` treats `other` as a friend.
    ///
    /// Unknown players have no friends.
    fn is_friend(&self, player_num: u32, other: u32) -> bool {
        self.player(player_num)
            .is_some_and(|player| player.is_friend(other))
    }
}

impl PlayerLookup for [Player] {
    fn player(&self, num: u32) -> Option<&Player> {
        self.iter().find(|player| player.num == num)
    }
}

impl PlayerLookup for Vec<Player> {
    fn player(&self, num: u32) -> Option<&Player> {
        self.as_slice().player(num)
    }
}

/// Players of one game, keyed by number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerTable {
    players: BTreeMap<u32, Player>,
}

impl PlayerTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a player.
    pub fn insert(&mut self, player: Player) {
        self.players.insert(player.num, player);
    }

    /// Iterates over players in number order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> + '_ {
        self.players.values()
    }

    /// Number of players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns `true` if there are no players.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl FromIterator<Player> for PlayerTable {
    fn from_iter<I: IntoIterator<Item = Player>>(iter: I) -> Self {
        Self {
            players: iter.into_iter().map(|player| (player.num, player)).collect(),
        }
    }
}

impl PlayerLookup for PlayerTable {
    fn player(&self, num: u32) -> Option<&Player> {
        self.players.get(&num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn players_are_their_own_friends() {
        let player = Player::new(1, "Alice");
        assert!(player.is_friend(1));
        assert!(!player.is_friend(2));
    }

    #[test]
    fn friendship_is_one_way() {
        let table: PlayerTable = [Player::new(1, "Alice").with_friend(2), Player::new(2, "Bob")]
            .into_iter()
            .collect();

        assert!(table.is_friend(1, 2));
        assert!(!table.is_friend(2, 1));
    }

    #[test]
    fn unknown_players_have_no_friends() {
        let table = PlayerTable::new();
        assert!(!table.is_friend(5, 5));
        assert!(table.player(5).is_none());
    }

    #[test]
    fn slice_lookup() {
        let players = vec![Player::new(1, "Alice"), Player::new(3, "Carol")];
        assert_eq!(players.player(3).map(|player| player.name.as_str()), Some("Carol"));
        assert!(players.player(2).is_none());
    }

    #[test]
    fn default_race_constants() {
        let race = RaceSpec::default();
        assert_eq!(race.mine_field_base_decay_rate, 0.02);
        assert_eq!(race.mine_field_planet_decay_rate, 0.04);
        assert_eq!(race.mine_field_max_decay_rate, 0.5);
        assert_eq!(race.mine_field_safe_warp_bonus, 0);
    }

    #[test]
    fn race_from_partial_json() {
        let race: RaceSpec =
            serde_json::from_str(r#"{ "mine_field_safe_warp_bonus": 2 }"#).unwrap();
        assert_eq!(race.mine_field_safe_warp_bonus, 2);
        assert_eq!(race.mine_field_min_decay_factor, 1.0);
    }
}
