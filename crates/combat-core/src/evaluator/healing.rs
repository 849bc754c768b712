//! 4.4.5: healing roll. Applies `HealingReceived` modifiers to the base
//! heal and floors the result at zero; a negative modifier cannot invert
//! healing into damage.

use crate::damage::BreakdownEntry;
use crate::ids::CombatantId;
use crate::modifier::{ModifierContext, ModifierEngine, ModifierTarget};
use crate::rng::DeterministicRng;

use super::QueryResult;

pub fn roll_healing(
    rng: &mut DeterministicRng,
    modifiers: &mut ModifierEngine,
    target: CombatantId,
    base_heal: i32,
    ctx: &ModifierContext,
) -> QueryResult {
    let (after_modifiers, applied) =
        modifiers.apply_with_global(rng, target, base_heal as f64, &ModifierTarget::HealingReceived, ctx);

    let mut breakdown = vec![BreakdownEntry::new("base_heal", base_heal as f64, "caller")];
    for m in &applied {
        breakdown.push(BreakdownEntry::new("modifier", m.value, m.source.clone()));
    }

    let final_value = after_modifiers.max(0.0);

    let mut result = QueryResult::new(base_heal as f64);
    result.final_value = final_value;
    result.applied_modifiers = applied;
    result.breakdown = breakdown;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::{Modifier, ModifierKind};

    #[test]
    fn negative_modifier_floors_at_zero_instead_of_inverting() {
        let mut rng = DeterministicRng::new(1);
        let mut modifiers = ModifierEngine::new();
        let target = CombatantId::new(1);
        modifiers.add(
            target,
            Modifier::new("wound", ModifierKind::Flat, ModifierTarget::HealingReceived, -999.0),
        );
        let result = roll_healing(&mut rng, &mut modifiers, target, 10, &ModifierContext::new());
        assert_eq!(result.final_value, 0.0);
    }

    #[test]
    fn positive_modifiers_add_to_base_heal() {
        let mut rng = DeterministicRng::new(1);
        let mut modifiers = ModifierEngine::new();
        let target = CombatantId::new(1);
        modifiers.add(
            target,
            Modifier::new("bonus", ModifierKind::Flat, ModifierTarget::HealingReceived, 5.0),
        );
        let result = roll_healing(&mut rng, &mut modifiers, target, 10, &ModifierContext::new());
        assert_eq!(result.final_value, 15.0);
    }
}
