//! 4.4.2: saving throw.

use std::collections::{BTreeMap, BTreeSet};

use crate::boost::{query as boost_query, BoostSet};
use crate::combatant::Ability;
use crate::damage::BreakdownEntry;
use crate::ids::CombatantId;
use crate::modifier::{ModifierContext, ModifierEngine, ModifierTarget};
use crate::rng::{roll_resolved, DeterministicRng};

use super::QueryResult;

#[derive(Clone, Debug)]
pub struct SaveInput {
    pub defender: CombatantId,
    pub ability: Ability,
    pub dc: i32,
    /// Ability modifier + proficiency the caller has already computed.
    pub base_save_bonus: i32,
    pub lucky: bool,
    pub defender_statuses: BTreeSet<String>,
    /// "Aura of Protection"-style bonuses: only the strongest per bucket
    /// name counts, buckets then sum together.
    pub max_bucket_bonuses: BTreeMap<String, i32>,
    pub extra_advantage_sources: Vec<String>,
    pub extra_disadvantage_sources: Vec<String>,
    pub context: ModifierContext,
}

const AUTO_FAIL_STR_DEX_STATUSES: &[&str] = &["PARALYZED", "STUNNED", "UNCONSCIOUS", "PETRIFIED"];
const DEX_DISADVANTAGE_STATUSES: &[&str] = &["RESTRAINED"];

fn auto_fails(input: &SaveInput) -> bool {
    matches!(input.ability, Ability::Strength | Ability::Dexterity)
        && AUTO_FAIL_STR_DEX_STATUSES
            .iter()
            .any(|s| input.defender_statuses.contains(*s))
}

fn status_disadvantage(input: &SaveInput) -> bool {
    input.ability == Ability::Dexterity
        && DEX_DISADVANTAGE_STATUSES
            .iter()
            .any(|s| input.defender_statuses.contains(*s))
}

fn bucketed_bonus(input: &SaveInput) -> i32 {
    input.max_bucket_bonuses.values().copied().sum()
}

pub fn roll_save(
    rng: &mut DeterministicRng,
    modifiers: &mut ModifierEngine,
    defender_boosts: &BoostSet,
    input: &SaveInput,
) -> QueryResult {
    let mut extra_adv = input.extra_advantage_sources.clone();
    let mut extra_dis = input.extra_disadvantage_sources.clone();
    if status_disadvantage(input) {
        extra_dis.push("status_restrained".to_string());
    }
    if boost_query::has_advantage(defender_boosts, boost_query::RollType::SavingThrow, &input.context) {
        extra_adv.push("boost".to_string());
    }
    if boost_query::has_disadvantage(defender_boosts, boost_query::RollType::SavingThrow, &input.context) {
        extra_dis.push("boost".to_string());
    }

    let (advantage_state, adv_sources, dis_sources) = modifiers.resolve_advantage(
        input.defender,
        &ModifierTarget::SavingThrow,
        &input.context,
        &extra_adv,
        &extra_dis,
    );

    let (natural, first, second) = roll_resolved(rng, advantage_state, input.lucky, Some(input.defender));
    let mut breakdown = vec![BreakdownEntry::new("natural_d20", natural as f64, "rng")];
    for source in adv_sources.iter().chain(dis_sources.iter()) {
        breakdown.push(BreakdownEntry::new("advantage_source", 1.0, source.clone()));
    }

    let mut running = (natural as i32 + input.base_save_bonus) as f64;
    breakdown.push(BreakdownEntry::new("base_save_bonus", input.base_save_bonus as f64, "caller"));

    let bucket_bonus = bucketed_bonus(input);
    if bucket_bonus != 0 {
        running += bucket_bonus as f64;
        breakdown.push(BreakdownEntry::new("max_bucket_bonus", bucket_bonus as f64, "aura"));
    }

    for formula in boost_query::get_roll_bonus_dice(defender_boosts, boost_query::RollType::SavingThrow, &input.context) {
        let rolled = formula.roll(rng);
        running += rolled as f64;
        breakdown.push(BreakdownEntry::new("roll_bonus_dice", rolled as f64, formula.to_string()));
    }

    let (after_modifiers, applied) =
        modifiers.apply_with_global(rng, input.defender, running, &ModifierTarget::SavingThrow, &input.context);
    for m in &applied {
        breakdown.push(BreakdownEntry::new("modifier", m.value, m.source.clone()));
    }

    let auto_fail = auto_fails(input);
    let success = !auto_fail && after_modifiers >= input.dc as f64;
    if auto_fail {
        breakdown.push(BreakdownEntry::new("auto_fail", 1.0, "status"));
    }

    QueryResult {
        base_value: natural as f64,
        natural_d20: Some(natural),
        final_value: after_modifiers,
        applied_modifiers: applied,
        success: Some(success),
        critical_hit: false,
        critical_failure: false,
        advantage_state,
        die_values: if first != second { Some((first, second)) } else { None },
        target_ac: None,
        breakdown,
    }
}
