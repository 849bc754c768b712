//! Combatant data model. Combatants are owned exclusively by the arena; every
//! other component references them by [`CombatantId`](crate::ids::CombatantId).

pub mod budget;
pub mod resources;

use std::collections::{BTreeMap, BTreeSet};

use crate::config::CombatConfig;
use crate::ids::CombatantId;

pub use budget::{ActionBudget, ActionFlags};
pub use resources::{ResourcePool, ResourceValue};

/// Relationship/allegiance, independent of the integer team tag.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Faction {
    #[default]
    Neutral,
    Player,
    Hostile,
    Ally,
}

/// Life state, with healing able to move Downed back to Alive.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LifeState {
    #[default]
    Alive,
    Downed,
    Unconscious,
    Dead,
}

/// The six D&D ability scores.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

/// Six integer ability scores, indexable by [`Ability`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AbilityScores {
    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: i32) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    /// Standard D&D modifier: `floor((score - 10) / 2)`.
    pub fn modifier(&self, ability: Ability) -> i32 {
        (self.get(ability) - 10).div_euclid(2)
    }
}

/// A 3D world position. The core never interprets these beyond storage and
/// the caller-supplied query parameters that reference them (height, cover).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Death-save tally, each side capped at [`CombatConfig::DEATH_SAVE_CAP`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DeathSaves {
    pub successes: u8,
    pub failures: u8,
}

impl DeathSaves {
    pub fn record_success(&mut self) {
        self.successes = (self.successes + 1).min(CombatConfig::DEATH_SAVE_CAP);
    }

    pub fn record_failure(&mut self) {
        self.failures = (self.failures + 1).min(CombatConfig::DEATH_SAVE_CAP);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A combatant owned by the arena.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub faction: Faction,
    pub team: i32,
    pub position: Position,

    pub abilities: AbilityScores,
    pub base_ac: i32,
    /// Cached AC including modifier/boost contributions; refreshed by the
    /// AC-lookup evaluator whenever the modifier stacks change.
    pub current_ac: i32,

    pub life_state: LifeState,
    pub current_hp: i32,
    pub max_hp: i32,
    pub temporary_hp: i32,

    pub initiative: i32,
    pub initiative_tiebreaker: i32,

    pub budget: ActionBudget,
    pub death_saves: DeathSaves,

    /// Insertion order matters: this is the display/priority order for UI.
    pub known_action_ids: Vec<String>,
    pub passive_toggle_states: BTreeMap<String, bool>,
    pub equipment_slots: BTreeMap<String, String>,
    pub tags: BTreeSet<String>,
    pub resources: ResourcePool,
}

impl Combatant {
    pub fn new(id: CombatantId, name: impl Into<String>, max_hp: i32, max_movement: f64) -> Self {
        Self {
            id,
            name: name.into(),
            faction: Faction::default(),
            team: 0,
            position: Position::default(),
            abilities: AbilityScores::default(),
            base_ac: 10,
            current_ac: 10,
            life_state: LifeState::Alive,
            current_hp: max_hp,
            max_hp,
            temporary_hp: 0,
            initiative: 0,
            initiative_tiebreaker: 0,
            budget: ActionBudget::new(max_movement),
            death_saves: DeathSaves::default(),
            known_action_ids: Vec::new(),
            passive_toggle_states: BTreeMap::new(),
            equipment_slots: BTreeMap::new(),
            tags: BTreeSet::new(),
            resources: ResourcePool::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        !matches!(self.life_state, LifeState::Dead)
    }

    /// Sets current HP, clamping to `[0, max_hp]` and moving Downed back to
    /// Alive if the result is positive, per the data model's monotonicity
    /// exception for healing.
    pub fn set_current_hp(&mut self, value: i32) {
        self.current_hp = value.clamp(0, self.max_hp);
        if self.current_hp > 0 && self.life_state == LifeState::Downed {
            self.life_state = LifeState::Alive;
        }
    }

    pub fn set_temporary_hp(&mut self, value: i32) {
        self.temporary_hp = value.max(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healing_moves_downed_back_to_alive() {
        let mut c = Combatant::new(CombatantId::new(1), "test", 10, 9.0);
        c.life_state = LifeState::Downed;
        c.current_hp = 0;
        c.set_current_hp(5);
        assert_eq!(c.life_state, LifeState::Alive);
        assert_eq!(c.current_hp, 5);
    }

    #[test]
    fn current_hp_clamped_to_max() {
        let mut c = Combatant::new(CombatantId::new(1), "test", 10, 9.0);
        c.set_current_hp(999);
        assert_eq!(c.current_hp, 10);
        c.set_current_hp(-5);
        assert_eq!(c.current_hp, 0);
    }

    #[test]
    fn ability_modifier_rounds_down() {
        let mut scores = AbilityScores::default();
        scores.set(Ability::Strength, 15);
        assert_eq!(scores.modifier(Ability::Strength), 2);
        scores.set(Ability::Strength, 9);
        assert_eq!(scores.modifier(Ability::Strength), -1);
    }
}
