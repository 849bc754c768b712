//! 4.4.3: contested check.

use crate::ids::CombatantId;
use crate::modifier::{ModifierContext, ModifierEngine, ModifierTarget};
use crate::rng::{roll_resolved, DeterministicRng};

use super::QueryResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TiePolicy {
    #[default]
    DefenderWins,
    AttackerWins,
    NoWinner,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContestWinner {
    Attacker,
    Defender,
    NoWinner,
}

#[derive(Clone, Debug)]
pub struct ContestSide {
    pub combatant: CombatantId,
    pub base_bonus: i32,
    pub advantage_sources: Vec<String>,
    pub disadvantage_sources: Vec<String>,
    pub context: ModifierContext,
}

#[derive(Clone, Debug)]
pub struct ContestResult {
    pub attacker: QueryResult,
    pub defender: QueryResult,
    pub margin: i32,
    pub winner: ContestWinner,
}

/// Both sides roll `d20 + modifier` under their own advantage resolution on
/// `SkillCheck`; totals compare, ties resolved by `tie_policy`.
pub fn roll_contest(
    rng: &mut DeterministicRng,
    modifiers: &mut ModifierEngine,
    attacker: &ContestSide,
    defender: &ContestSide,
    tie_policy: TiePolicy,
) -> ContestResult {
    let attacker_result = roll_side(rng, modifiers, attacker);
    let defender_result = roll_side(rng, modifiers, defender);

    let margin = attacker_result.final_value as i32 - defender_result.final_value as i32;
    let winner = match margin.cmp(&0) {
        std::cmp::Ordering::Greater => ContestWinner::Attacker,
        std::cmp::Ordering::Less => ContestWinner::Defender,
        std::cmp::Ordering::Equal => match tie_policy {
            TiePolicy::DefenderWins => ContestWinner::Defender,
            TiePolicy::AttackerWins => ContestWinner::Attacker,
            TiePolicy::NoWinner => ContestWinner::NoWinner,
        },
    };

    ContestResult {
        attacker: attacker_result,
        defender: defender_result,
        margin,
        winner,
    }
}

fn roll_side(rng: &mut DeterministicRng, modifiers: &mut ModifierEngine, side: &ContestSide) -> QueryResult {
    let (resolved_state, adv_sources, dis_sources) = modifiers.resolve_advantage(
        side.combatant,
        &ModifierTarget::SkillCheck,
        &side.context,
        &side.advantage_sources,
        &side.disadvantage_sources,
    );

    let (natural, first, second) = roll_resolved(rng, resolved_state, false, Some(side.combatant));
    let running = (natural as i32 + side.base_bonus) as f64;
    let (after_modifiers, applied) =
        modifiers.apply_with_global(rng, side.combatant, running, &ModifierTarget::SkillCheck, &side.context);

    let mut result = QueryResult::new(natural as f64);
    result.natural_d20 = Some(natural);
    result.final_value = after_modifiers;
    result.applied_modifiers = applied;
    result.advantage_state = resolved_state;
    result.die_values = if first != second { Some((first, second)) } else { None };
    for source in adv_sources.iter().chain(dis_sources.iter()) {
        result
            .breakdown
            .push(crate::damage::BreakdownEntry::new("advantage_source", 1.0, source.clone()));
    }
    result
}
