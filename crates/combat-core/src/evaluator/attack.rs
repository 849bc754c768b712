//! 4.4.1: attack roll.

use std::collections::BTreeSet;

use crate::boost::{query as boost_query, BoostSet};
use crate::config::CombatConfig;
use crate::damage::BreakdownEntry;
use crate::ids::CombatantId;
use crate::modifier::{ModifierContext, ModifierEngine, ModifierTarget};
use crate::rng::{roll_resolved, DeterministicRng};

use super::QueryResult;

#[derive(Clone, Debug)]
pub struct AttackInput {
    pub attacker: CombatantId,
    pub defender: CombatantId,
    /// Ability/proficiency/weapon bonus the caller has already computed.
    pub base_attack_bonus: i32,
    pub target_base_ac: i32,
    pub height_modifier: i32,
    pub cover_ac_bonus: i32,
    /// Minimum natural roll for a crit; defaults to the config value.
    pub critical_threshold: Option<u8>,
    /// A "lucky" source re-rolls a natural 1 exactly once.
    pub lucky: bool,
    /// Caller-declared promotion (e.g. from a control status) of a hit to a
    /// crit, applied after boost `NeverCrit`/`AutoCrit` resolution.
    pub auto_crit_on_hit: bool,
    pub melee: bool,
    pub ranged: bool,
    pub attacker_statuses: BTreeSet<String>,
    pub defender_statuses: BTreeSet<String>,
    pub extra_advantage_sources: Vec<String>,
    pub extra_disadvantage_sources: Vec<String>,
    pub context: ModifierContext,
}

/// Advantage/disadvantage contributed by known status keys on attacker or
/// defender, plus whether a control status forces an auto-crit on hit.
fn status_derived_sources(input: &AttackInput) -> (Vec<String>, Vec<String>, bool) {
    let mut advantage = Vec::new();
    let mut disadvantage = Vec::new();
    let mut auto_crit = false;

    if input.defender_statuses.contains("PRONE") {
        if input.melee {
            advantage.push("defender_prone_melee".to_string());
        }
        if input.ranged {
            disadvantage.push("defender_prone_ranged".to_string());
        }
    }
    if input.attacker_statuses.contains("BLINDED") {
        disadvantage.push("attacker_blinded".to_string());
    }
    if input.melee
        && (input.defender_statuses.contains("PARALYZED") || input.defender_statuses.contains("UNCONSCIOUS"))
    {
        auto_crit = true;
    }

    (advantage, disadvantage, auto_crit)
}

pub fn roll_attack(
    rng: &mut DeterministicRng,
    config: &CombatConfig,
    modifiers: &mut ModifierEngine,
    attacker_boosts: &BoostSet,
    input: &AttackInput,
) -> QueryResult {
    let (status_adv, status_dis, status_auto_crit) = status_derived_sources(input);

    let mut extra_adv = input.extra_advantage_sources.clone();
    extra_adv.extend(status_adv);
    let mut extra_dis = input.extra_disadvantage_sources.clone();
    extra_dis.extend(status_dis);

    if boost_query::has_advantage(attacker_boosts, boost_query::RollType::AttackRoll, &input.context) {
        extra_adv.push("boost".to_string());
    }
    if boost_query::has_disadvantage(attacker_boosts, boost_query::RollType::AttackRoll, &input.context) {
        extra_dis.push("boost".to_string());
    }

    // Step 1-2: gather and combine advantage sources.
    let (advantage_state, adv_sources, dis_sources) = modifiers.resolve_advantage(
        input.attacker,
        &ModifierTarget::AttackRoll,
        &input.context,
        &extra_adv,
        &extra_dis,
    );

    // Step 3: roll, with the lucky re-roll rule on a natural 1.
    let (natural, first, second) = roll_resolved(rng, advantage_state, input.lucky, Some(input.attacker));
    let mut breakdown = vec![BreakdownEntry::new("natural_d20", natural as f64, "rng")];
    for source in &adv_sources {
        breakdown.push(BreakdownEntry::new("advantage_source", 1.0, source.clone()));
    }
    for source in &dis_sources {
        breakdown.push(BreakdownEntry::new("disadvantage_source", 1.0, source.clone()));
    }

    let mut running = (natural as i32 + input.base_attack_bonus) as f64;
    breakdown.push(BreakdownEntry::new("base_attack_bonus", input.base_attack_bonus as f64, "caller"));

    // Step 4: boost roll-bonus dice (e.g. Bless's 1d4).
    for formula in boost_query::get_roll_bonus_dice(attacker_boosts, boost_query::RollType::AttackRoll, &input.context) {
        let rolled = formula.roll(rng);
        running += rolled as f64;
        breakdown.push(BreakdownEntry::new("roll_bonus_dice", rolled as f64, formula.to_string()));
    }

    // Step 5: per-attacker modifier stack, then global.
    let (after_modifiers, applied) =
        modifiers.apply_with_global(rng, input.attacker, running, &ModifierTarget::AttackRoll, &input.context);
    for m in &applied {
        breakdown.push(BreakdownEntry::new("modifier", m.value, m.source.clone()));
    }

    // Step 6: target AC.
    let target_ac = input.target_base_ac + input.cover_ac_bonus + input.height_modifier;
    breakdown.push(BreakdownEntry::new("target_ac", target_ac as f64, "query"));
    breakdown.push(BreakdownEntry::new("cover_ac_bonus", input.cover_ac_bonus as f64, "query"));
    breakdown.push(BreakdownEntry::new("height_modifier", input.height_modifier as f64, "query"));

    // Step 7: critical threshold.
    let threshold = input
        .critical_threshold
        .unwrap_or(config.default_critical_threshold)
        .clamp(2, 20);
    let mut critical_hit = natural as u8 >= threshold;
    let critical_failure = natural == 1;

    // Step 8: crit/crit-fail overrides, then boost and status promotions.
    let total = after_modifiers;
    let mut success = if critical_failure {
        false
    } else if critical_hit {
        true
    } else {
        total >= target_ac as f64
    };

    if success && (input.auto_crit_on_hit || status_auto_crit) {
        critical_hit = true;
    }
    let crit_policy = boost_query::get_critical_hit_modifier(attacker_boosts, &input.context);
    if crit_policy.auto_crit && success {
        critical_hit = true;
    }
    if crit_policy.never_crit {
        critical_hit = false;
    }
    if critical_hit && !critical_failure {
        success = true;
    }

    QueryResult {
        base_value: natural as f64,
        natural_d20: Some(natural),
        final_value: total,
        applied_modifiers: applied,
        success: Some(success),
        critical_hit,
        critical_failure,
        advantage_state,
        die_values: if first != second { Some((first, second)) } else { None },
        target_ac: Some(target_ac),
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::CombatantId;

    fn base_input() -> AttackInput {
        AttackInput {
            attacker: CombatantId::new(1),
            defender: CombatantId::new(2),
            base_attack_bonus: 5,
            target_base_ac: 15,
            height_modifier: 0,
            cover_ac_bonus: 0,
            critical_threshold: None,
            lucky: false,
            auto_crit_on_hit: false,
            melee: true,
            ranged: false,
            attacker_statuses: BTreeSet::new(),
            defender_statuses: BTreeSet::new(),
            extra_advantage_sources: Vec::new(),
            extra_disadvantage_sources: Vec::new(),
            context: ModifierContext::new(),
        }
    }

    #[test]
    fn natural_one_always_misses() {
        // Seed chosen so the first d20 draw under Normal is a 1.
        for seed in 0..2000u64 {
            let mut rng = DeterministicRng::new(seed);
            if rng.roll_d20() != 1 {
                continue;
            }
            let mut rng = DeterministicRng::new(seed);
            let mut modifiers = ModifierEngine::new();
            let boosts = BoostSet::new();
            let config = CombatConfig::default();
            let mut input = base_input();
            input.target_base_ac = -999;
            let result = roll_attack(&mut rng, &config, &mut modifiers, &boosts, &input);
            assert_eq!(result.natural_d20, Some(1));
            assert_eq!(result.success, Some(false));
            return;
        }
        panic!("no seed in range produced a natural 1");
    }

    #[test]
    fn natural_twenty_always_hits() {
        for seed in 0..2000u64 {
            let mut rng = DeterministicRng::new(seed);
            if rng.roll_d20() != 20 {
                continue;
            }
            let mut rng = DeterministicRng::new(seed);
            let mut modifiers = ModifierEngine::new();
            let boosts = BoostSet::new();
            let config = CombatConfig::default();
            let mut input = base_input();
            input.target_base_ac = 999;
            let result = roll_attack(&mut rng, &config, &mut modifiers, &boosts, &input);
            assert_eq!(result.natural_d20, Some(20));
            assert_eq!(result.success, Some(true));
            assert!(result.critical_hit);
            return;
        }
        panic!("no seed in range produced a natural 20");
    }
}
