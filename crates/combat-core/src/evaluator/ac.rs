//! 4.4.6: AC lookup. Starts at the combatant's base AC (10 default), applies
//! the target's `ArmorClass` modifier stack, adds boost AC bonus.

use crate::boost::{query as boost_query, BoostSet};
use crate::ids::CombatantId;
use crate::modifier::{ModifierContext, ModifierEngine, ModifierTarget};
use crate::rng::DeterministicRng;

pub fn get_armor_class(
    rng: &mut DeterministicRng,
    modifiers: &mut ModifierEngine,
    boosts: &BoostSet,
    combatant: CombatantId,
    base_ac: i32,
    ctx: &ModifierContext,
) -> i32 {
    let (after_modifiers, _applied) =
        modifiers.apply_with_global(rng, combatant, base_ac as f64, &ModifierTarget::ArmorClass, ctx);
    after_modifiers as i32 + boost_query::get_ac_bonus(boosts, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::{Modifier, ModifierKind};

    #[test]
    fn combines_base_modifier_and_boost_bonus() {
        let mut rng = DeterministicRng::new(1);
        let mut modifiers = ModifierEngine::new();
        let boosts = BoostSet::new();
        let combatant = CombatantId::new(1);
        modifiers.add(
            combatant,
            Modifier::new("shield", ModifierKind::Flat, ModifierTarget::ArmorClass, 2.0),
        );
        let ac = get_armor_class(&mut rng, &mut modifiers, &boosts, combatant, 10, &ModifierContext::new());
        assert_eq!(ac, 12);
    }
}
