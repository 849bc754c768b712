//! 4.4.4: damage roll. Gathers `DamageDealt`/`DamageTaken` modifiers and
//! source boost bonuses, delegates the numeric reduction to the pipeline,
//! then applies the target's boost-level resistance tier on top — kept
//! separate from the pipeline's own `DamageTaken` percentage dedup so the
//! two resistance surfaces (modifier-based and boost-based) don't stack.

use crate::boost::{query as boost_query, BoostSet, ResistanceLevel};
use crate::damage::{run_damage_pipeline, BreakdownEntry, DamageContext, DamageResult, DamageType};
use crate::dice::floor_halve;
use crate::ids::CombatantId;
use crate::modifier::{ModifierContext, ModifierEngine, ModifierTarget};

#[derive(Clone, Debug)]
pub struct DamageRollInput {
    pub source: CombatantId,
    pub target: CombatantId,
    pub base_damage: i32,
    pub damage_type: DamageType,
    pub target_temp_hp: i32,
    pub target_current_hp: i32,
    pub target_barrier: Option<i32>,
    pub context: ModifierContext,
}

pub fn roll_damage(
    modifiers: &ModifierEngine,
    source_boosts: &BoostSet,
    target_boosts: &BoostSet,
    input: &DamageRollInput,
) -> DamageResult {
    let mut applicable: Vec<crate::modifier::Modifier> = Vec::new();
    if let Some(stack) = modifiers.stack_for(input.source) {
        applicable.extend(stack.snapshot_for(&ModifierTarget::DamageDealt, &input.context));
    }
    applicable.extend(
        modifiers
            .global_stack()
            .snapshot_for(&ModifierTarget::DamageDealt, &input.context),
    );
    if let Some(stack) = modifiers.stack_for(input.target) {
        applicable.extend(stack.snapshot_for(&ModifierTarget::DamageTaken, &input.context));
    }
    applicable.extend(
        modifiers
            .global_stack()
            .snapshot_for(&ModifierTarget::DamageTaken, &input.context),
    );

    let damage_type_tag = input.damage_type.to_string();
    let source_bonus = boost_query::get_damage_bonus(source_boosts, &damage_type_tag, &input.context);
    let base = input.base_damage + source_bonus;

    let ctx = DamageContext {
        base,
        modifiers: applicable,
        target_temp_hp: input.target_temp_hp,
        target_current_hp: input.target_current_hp,
        target_barrier: input.target_barrier,
        damage_type: input.damage_type,
    };

    let mut result = run_damage_pipeline(&ctx);

    let resistance_level = boost_query::get_resistance_level(target_boosts, &damage_type_tag, &input.context);
    apply_boost_resistance(&mut result, resistance_level, &ctx);
    result
}

/// Applies a boost-granted resistance tier on top of the pipeline's own
/// result: immune zeroes it, resistant halves (floor toward negative
/// infinity, per `floor_halve`'s documented parity with the original
/// rules), vulnerable doubles. Re-runs stage 7's absorption layering against
/// the same pools so `applied_to_hp`/`overkill` stay consistent.
fn apply_boost_resistance(result: &mut DamageResult, level: ResistanceLevel, ctx: &DamageContext) {
    if level == ResistanceLevel::Normal {
        return;
    }

    let adjusted = match level {
        ResistanceLevel::Immune => 0,
        ResistanceLevel::Resistant => floor_halve(result.final_damage as i64) as i32,
        ResistanceLevel::Vulnerable => result.final_damage * 2,
        ResistanceLevel::Normal => unreachable!(),
    };
    result.breakdown.push(BreakdownEntry::new(
        "boost_resistance_level",
        adjusted as f64,
        level.to_string(),
    ));
    result.final_damage = adjusted;

    let mut remaining = adjusted;
    result.absorbed_by_barrier = match ctx.target_barrier {
        Some(barrier) => remaining.min(barrier.max(0)),
        None => 0,
    };
    remaining -= result.absorbed_by_barrier;
    result.absorbed_by_temp_hp = remaining.min(ctx.target_temp_hp.max(0));
    remaining -= result.absorbed_by_temp_hp;
    result.applied_to_hp = remaining.min(ctx.target_current_hp.max(0));
    result.overkill = (remaining - result.applied_to_hp).max(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boost::{parse_boost_string, BoostOrigin};

    fn boosts_from(s: &str) -> BoostSet {
        let mut set = BoostSet::new();
        for b in parse_boost_string(s, BoostOrigin::new("status", "x")).unwrap() {
            set.add(b);
        }
        set
    }

    #[test]
    fn boost_resistance_halves_pipeline_result() {
        let modifiers = ModifierEngine::new();
        let source_boosts = BoostSet::new();
        let target_boosts = boosts_from("Resistance(Fire,Resistant)");
        let input = DamageRollInput {
            source: CombatantId::new(1),
            target: CombatantId::new(2),
            base_damage: 40,
            damage_type: DamageType::Fire,
            target_temp_hp: 0,
            target_current_hp: 100,
            target_barrier: None,
            context: ModifierContext::new(),
        };
        let result = roll_damage(&modifiers, &source_boosts, &target_boosts, &input);
        assert_eq!(result.final_damage, 20);
    }

    #[test]
    fn boost_immunity_zeroes_damage() {
        let modifiers = ModifierEngine::new();
        let source_boosts = BoostSet::new();
        let target_boosts = boosts_from("Resistance(Fire,Immune)");
        let input = DamageRollInput {
            source: CombatantId::new(1),
            target: CombatantId::new(2),
            base_damage: 40,
            damage_type: DamageType::Fire,
            target_temp_hp: 0,
            target_current_hp: 100,
            target_barrier: None,
            context: ModifierContext::new(),
        };
        let result = roll_damage(&modifiers, &source_boosts, &target_boosts, &input);
        assert_eq!(result.final_damage, 0);
        assert_eq!(result.applied_to_hp, 0);
    }
}
