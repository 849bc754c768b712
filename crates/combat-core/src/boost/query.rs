//! Pure query functions over a combatant's active boost set.

use std::collections::BTreeSet;
use std::str::FromStr;

use crate::dice::DiceFormula;
use crate::ids::CombatantId;
use crate::modifier::ModifierContext;

use super::{BoostSet, BoostType, ResistanceLevel};

/// The roll an `Advantage`/`Disadvantage`/`RollBonus` clause applies to.
/// Spelled out as a string argument in the DSL (e.g. `Advantage(AttackRoll)`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
pub enum RollType {
    AttackRoll,
    SavingThrow,
    SkillCheck,
    Initiative,
}

/// Whether a boost forces or vetoes critical hits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CriticalHitPolicy {
    pub auto_crit: bool,
    pub never_crit: bool,
}

fn clause_matches(boost: &super::ParsedBoost, boost_type: BoostType, ctx: &ModifierContext) -> bool {
    boost.boost_type == boost_type && boost.condition.as_ref().is_none_or(|c| c.evaluate(ctx))
}

/// Scans `Advantage(RollType[,Ability])` clauses.
pub fn has_advantage(boosts: &BoostSet, roll_type: RollType, ctx: &ModifierContext) -> bool {
    boosts.iter().any(|b| {
        clause_matches(b, BoostType::Advantage, ctx)
            && b.arg(0).and_then(|a| RollType::from_str(a).ok()) == Some(roll_type)
    })
}

/// Scans `Disadvantage(RollType[,Ability])` clauses.
pub fn has_disadvantage(boosts: &BoostSet, roll_type: RollType, ctx: &ModifierContext) -> bool {
    boosts.iter().any(|b| {
        clause_matches(b, BoostType::Disadvantage, ctx)
            && b.arg(0).and_then(|a| RollType::from_str(a).ok()) == Some(roll_type)
    })
}

/// Sums active `AC(n)` clauses.
pub fn get_ac_bonus(boosts: &BoostSet, ctx: &ModifierContext) -> i32 {
    boosts
        .iter()
        .filter(|b| clause_matches(b, BoostType::AC, ctx))
        .filter_map(|b| b.arg_i32(0))
        .sum()
}

/// Picks the strongest conditional `Resistance(DamageType, Tier)` match for
/// `damage_type`. "Strongest" order: Immune > Vulnerable > Resistant >
/// Normal, matching the pipeline's own immunity-dominates-all policy.
pub fn get_resistance_level(boosts: &BoostSet, damage_type: &str, ctx: &ModifierContext) -> ResistanceLevel {
    fn rank(level: ResistanceLevel) -> u8 {
        match level {
            ResistanceLevel::Immune => 3,
            ResistanceLevel::Vulnerable => 2,
            ResistanceLevel::Resistant => 1,
            ResistanceLevel::Normal => 0,
        }
    }

    boosts
        .iter()
        .filter(|b| clause_matches(b, BoostType::Resistance, ctx))
        .filter(|b| b.arg(0).is_some_and(|t| t.eq_ignore_ascii_case(damage_type)))
        .filter_map(|b| b.arg(1).and_then(|t| ResistanceLevel::from_str(t).ok()))
        .max_by_key(|level| rank(*level))
        .unwrap_or(ResistanceLevel::Normal)
}

/// Sums matching `DamageBonus(n, DamageType)` clauses for `damage_type`.
pub fn get_damage_bonus(boosts: &BoostSet, damage_type: &str, ctx: &ModifierContext) -> i32 {
    boosts
        .iter()
        .filter(|b| clause_matches(b, BoostType::DamageBonus, ctx))
        .filter(|b| b.arg(1).is_some_and(|t| t.eq_ignore_ascii_case(damage_type)))
        .filter_map(|b| b.arg_i32(0))
        .sum()
}

/// Collects `RollBonus(RollType, formula)` formulas for `roll_type`.
pub fn get_roll_bonus_dice(boosts: &BoostSet, roll_type: RollType, ctx: &ModifierContext) -> Vec<DiceFormula> {
    boosts
        .iter()
        .filter(|b| clause_matches(b, BoostType::RollBonus, ctx))
        .filter(|b| b.arg(0).and_then(|a| RollType::from_str(a).ok()) == Some(roll_type))
        .filter_map(|b| b.arg(1))
        .filter_map(|formula| DiceFormula::parse(formula).ok())
        .collect()
}

/// Combines `CriticalHit(AutoCrit|NeverCrit)` clauses. `NeverCrit` is
/// evaluated after `AutoCrit` by callers, so it wins when both are present.
pub fn get_critical_hit_modifier(boosts: &BoostSet, ctx: &ModifierContext) -> CriticalHitPolicy {
    let mut policy = CriticalHitPolicy::default();
    for b in boosts.iter().filter(|b| clause_matches(b, BoostType::CriticalHit, ctx)) {
        match b.arg(0) {
            Some("AutoCrit") => policy.auto_crit = true,
            Some("NeverCrit") => policy.never_crit = true,
            _ => {}
        }
    }
    policy
}

/// Set of damage/status type keys a `StatusImmunity(key)` clause grants
/// immunity to.
pub fn get_status_immunities(boosts: &BoostSet, ctx: &ModifierContext) -> BTreeSet<String> {
    boosts
        .iter()
        .filter(|b| clause_matches(b, BoostType::StatusImmunity, ctx))
        .filter_map(|b| b.arg(0))
        .map(str::to_string)
        .collect()
}

/// Convenience wrapper building a [`ModifierContext`] scoped to a single
/// combatant, for boost queries that don't need attacker/defender context.
pub fn self_context(combatant: CombatantId) -> ModifierContext {
    ModifierContext::new().with_attacker(combatant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boost::{parse_boost_string, BoostOrigin};

    fn boosts_from(s: &str) -> BoostSet {
        let mut set = BoostSet::new();
        for b in parse_boost_string(s, BoostOrigin::new("item", "x")).unwrap() {
            set.add(b);
        }
        set
    }

    #[test]
    fn resistance_picks_strongest_not_sum() {
        let set = boosts_from("Resistance(Fire,Resistant);Resistance(Fire,Immune)");
        let ctx = ModifierContext::new();
        assert_eq!(get_resistance_level(&set, "Fire", &ctx), ResistanceLevel::Immune);
    }

    #[test]
    fn ac_bonus_sums() {
        let set = boosts_from("AC(2);AC(1)");
        assert_eq!(get_ac_bonus(&set, &ModifierContext::new()), 3);
    }

    #[test]
    fn conditional_clause_only_applies_when_condition_holds() {
        let set = boosts_from("IF(HasStatus('RAGING')):DamageBonus(2,Slashing)");
        let mut ctx = ModifierContext::new();
        assert_eq!(get_damage_bonus(&set, "Slashing", &ctx), 0);
        ctx.active_statuses.insert("RAGING".to_string());
        assert_eq!(get_damage_bonus(&set, "Slashing", &ctx), 2);
    }
}
