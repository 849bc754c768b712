//! Ability/action content: the static definition an ability id resolves to.
//! Runtime ability usage (cooldowns, resource spend) lives in `combat-core`;
//! this module only shapes what content authors write down.

use std::collections::{BTreeMap, BTreeSet};

use combat_core::{Ability, DamageType, DiceFormula, RuleWindow, StatusDuration};

/// Where an ability's effects can land.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TargetType {
    #[strum(serialize = "self")]
    SelfTarget,
    Single,
    Multi,
    Circle,
    Cone,
    Line,
    Point,
    All,
    None,
}

/// Which combatants a multi-target ability is willing to land on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetFilter {
    #[default]
    Any,
    Allies,
    Enemies,
    ExcludeSelf,
    Tagged(String),
}

/// Melee/ranged distinction used to gate reach-dependent boosts (e.g. a
/// reach weapon or Sharpshooter-style long-range disadvantage waiver).
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttackType {
    Melee,
    Ranged,
}

/// Gates an effect entry to only fire under a specific resolution outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ConditionTrigger {
    OnHit,
    OnCrit,
    OnSaveFail,
}

/// Action economy and resource price of using an ability.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AbilityCost {
    pub action: bool,
    pub bonus_action: bool,
    pub reaction: bool,
    pub movement_cost: f64,
    pub resource_costs: BTreeMap<String, i32>,
}

/// How an ability's cooldown is tracked between uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CooldownPolicy {
    #[default]
    None,
    PerShortRest,
    PerLongRest,
    PerEncounter,
}

/// One effect an ability applies, fired in declaration order and filtered
/// by `condition` where present. Mirrors the effect-entry kinds a content
/// author can write; the core executes whichever of these the orchestrator
/// actually wires up (damage/heal/status effects via C4/C5, the rest via
/// the rule-window bus and resolution stack).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", tag = "kind"))]
pub enum EffectEntry {
    Damage {
        formula: DiceFormula,
        damage_type: DamageType,
        flat_bonus: i32,
        condition: Option<ConditionTrigger>,
    },
    Heal {
        formula: DiceFormula,
        flat_bonus: i32,
    },
    ApplyStatus {
        status_id: String,
        duration: StatusDuration,
        condition: Option<ConditionTrigger>,
    },
    RemoveStatus {
        status_id: String,
    },
    ModifyResource {
        resource_key: String,
        delta: i32,
    },
    Teleport {
        max_range: f64,
    },
    ForcedMove {
        distance: f64,
        away_from_source: bool,
    },
    SpawnSurface {
        surface_kind: String,
        radius: f64,
        duration_rounds: u32,
    },
    Interrupt {
        window: RuleWindow,
    },
    Counter {
        window: RuleWindow,
    },
    GrantAction {
        action_id: String,
    },
}

/// The full static definition an ability id resolves to.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AbilityDescriptor {
    pub id: String,
    pub cost: AbilityCost,
    pub target_type: TargetType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target_filter: TargetFilter,
    pub range: f64,
    pub attack_type: Option<AttackType>,
    pub save_type: Option<Ability>,
    pub effects: Vec<EffectEntry>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: BTreeSet<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub concentration: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: CooldownPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cost_grants_no_action_economy() {
        let cost = AbilityCost::default();
        assert!(!cost.action && !cost.bonus_action && !cost.reaction);
        assert_eq!(cost.movement_cost, 0.0);
    }

    #[test]
    fn default_target_filter_is_any() {
        assert_eq!(TargetFilter::default(), TargetFilter::Any);
    }
}
