//! Combatant templates: identity, base stats, resource maxima, and granted
//! passives/actions a content author writes down for a PC archetype or NPC
//! statblock. [`CombatantTemplate::instantiate`] turns one into the runtime
//! [`combat_core::Combatant`] the arena owns.

use std::collections::{BTreeMap, BTreeSet};

use combat_core::{AbilityScores, Combatant, CombatantId, Faction};

/// A resource maximum to seed at instantiation, either leveled (spell
/// slots) or flat (named pools like ki or rage charges).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", tag = "kind"))]
pub enum ResourceMaximum {
    Leveled { level: u8, max: i32 },
    Flat { name: String, max: i32 },
}

/// Identity + base stats + resource maxima + granted passives/actions for
/// one combatant archetype or statblock.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CombatantTemplate {
    pub template_id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub faction: Faction,
    pub abilities: AbilityScores,
    pub base_ac: i32,
    pub max_hp: i32,
    pub max_movement: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resource_maxima: Vec<ResourceMaximum>,
    /// Ability ids this combatant starts combat already knowing.
    #[cfg_attr(feature = "serde", serde(default))]
    pub known_action_ids: Vec<String>,
    /// Passive ability ids toggled on by default.
    #[cfg_attr(feature = "serde", serde(default))]
    pub passive_toggle_states: BTreeMap<String, bool>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: BTreeSet<String>,
}

impl CombatantTemplate {
    /// Builds a runtime combatant for `id`, applying every static field this
    /// template declares. Position and team are left at their defaults; the
    /// orchestrator sets those from scenario placement, not content.
    pub fn instantiate(&self, id: CombatantId) -> Combatant {
        let mut combatant = Combatant::new(id, self.name.clone(), self.max_hp, self.max_movement);
        combatant.faction = self.faction;
        combatant.abilities = self.abilities;
        combatant.base_ac = self.base_ac;
        combatant.current_ac = self.base_ac;
        combatant.known_action_ids = self.known_action_ids.clone();
        combatant.passive_toggle_states = self.passive_toggle_states.clone();
        combatant.tags = self.tags.clone();
        for maximum in &self.resource_maxima {
            match maximum {
                ResourceMaximum::Leveled { level, max } => {
                    combatant.resources.set_leveled_max(*level, *max);
                    combatant.resources.leveled.get_mut(level).unwrap().current = *max;
                }
                ResourceMaximum::Flat { name, max } => {
                    combatant.resources.set_flat_max(name.clone(), *max);
                    combatant.resources.flat.get_mut(name.as_str()).unwrap().current = *max;
                }
            }
        }
        combatant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_template() -> CombatantTemplate {
        CombatantTemplate {
            template_id: "goblin_raider".into(),
            name: "Goblin Raider".into(),
            faction: Faction::Hostile,
            abilities: AbilityScores::default(),
            base_ac: 13,
            max_hp: 7,
            max_movement: 9.0,
            resource_maxima: vec![ResourceMaximum::Flat { name: "nimble_escape".into(), max: 1 }],
            known_action_ids: vec!["shortbow_shot".into()],
            passive_toggle_states: BTreeMap::new(),
            tags: BTreeSet::new(),
        }
    }

    #[test]
    fn instantiate_seeds_resources_at_full() {
        let combatant = sample_template().instantiate(CombatantId::new(1));
        assert_eq!(combatant.resources.flat["nimble_escape"].current, 1);
        assert_eq!(combatant.resources.flat["nimble_escape"].max, 1);
    }

    #[test]
    fn instantiate_copies_known_actions_and_ac() {
        let combatant = sample_template().instantiate(CombatantId::new(2));
        assert_eq!(combatant.known_action_ids, vec!["shortbow_shot".to_string()]);
        assert_eq!(combatant.base_ac, 13);
        assert_eq!(combatant.current_ac, 13);
    }
}
