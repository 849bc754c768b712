use std::collections::BTreeMap;

use crate::ids::{CombatantId, ModifierId};
use crate::rng::{AdvantageState, DeterministicRng};

use super::{Modifier, ModifierContext, ModifierKind, ModifierTarget};

/// One modifier's contribution to a final value, for breakdowns.
#[derive(Clone, Debug, PartialEq)]
pub struct AppliedModifier {
    pub id: ModifierId,
    pub name: String,
    pub source: String,
    pub kind: ModifierKind,
    /// The effective reported value: the modifier's `value` for Flat/
    /// Percentage/Override, or the rolled total for Dice.
    pub value: f64,
}

/// An ordered collection of modifiers: per-combatant stacks and the global
/// stack both use this type.
#[derive(Clone, Debug, Default)]
pub struct ModifierStack {
    modifiers: Vec<Modifier>,
}

impl ModifierStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    pub(crate) fn insert(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    /// Removes a single modifier by id. Idempotent: returns whether anything
    /// was removed, never an error (`NotFound` is not a failure here).
    pub fn remove_by_id(&mut self, id: ModifierId) -> bool {
        let before = self.modifiers.len();
        self.modifiers.retain(|m| m.id != id);
        self.modifiers.len() != before
    }

    /// Removes every modifier with a matching source. Returns how many were
    /// removed.
    pub fn remove_by_source(&mut self, source: &str) -> usize {
        let before = self.modifiers.len();
        self.modifiers.retain(|m| m.source != source);
        before - self.modifiers.len()
    }

    fn eligible(&self, target: &ModifierTarget, ctx: &ModifierContext) -> Vec<&Modifier> {
        let mut matches: Vec<&Modifier> = self
            .modifiers
            .iter()
            .filter(|m| {
                m.matches_target(target)
                    && !m.consumed
                    && m.predicate.as_ref().is_none_or(|p| p.evaluate(ctx))
            })
            .collect();
        matches.sort_by_key(|m| (m.priority, m.insertion_order));
        matches
    }

    /// Applies this stack's modifiers for `target` to `base`, following the
    /// Override > Flat+Dice+Percentage algorithm. Consumed modifiers are
    /// marked after a successful application. Modifiers are considered in
    /// `(priority, insertion_order)` order throughout.
    pub fn apply(
        &mut self,
        rng: &mut DeterministicRng,
        base: f64,
        target: &ModifierTarget,
        ctx: &ModifierContext,
    ) -> (f64, Vec<AppliedModifier>) {
        struct Eligible {
            id: ModifierId,
            name: String,
            source: String,
            kind: ModifierKind,
            value: f64,
            dice_formula: Option<crate::dice::DiceFormula>,
        }

        // Collect owned snapshots in priority order, then release the borrow
        // of `self` before mutating consumed flags below.
        let ordered: Vec<Eligible> = self
            .eligible(target, ctx)
            .into_iter()
            .map(|m| Eligible {
                id: m.id,
                name: m.name.clone(),
                source: m.source.clone(),
                kind: m.kind,
                value: m.value,
                dice_formula: m.dice_formula,
            })
            .collect();

        if let Some(last) = ordered.iter().filter(|v| v.kind == ModifierKind::Override).last() {
            let applied = AppliedModifier {
                id: last.id,
                name: last.name.clone(),
                source: last.source.clone(),
                kind: ModifierKind::Override,
                value: last.value,
            };
            self.mark_consumed(&[last.id]);
            return (last.value, vec![applied]);
        }

        let mut running = base;
        let mut applied = Vec::new();
        let mut consumed_ids = Vec::new();

        for v in ordered.iter().filter(|v| v.kind == ModifierKind::Flat) {
            running += v.value;
            applied.push(AppliedModifier {
                id: v.id,
                name: v.name.clone(),
                source: v.source.clone(),
                kind: ModifierKind::Flat,
                value: v.value,
            });
            consumed_ids.push(v.id);
        }

        for v in ordered.iter().filter(|v| v.kind == ModifierKind::Dice) {
            let rolled = v.dice_formula.map(|f| f.roll(rng)).unwrap_or(0);
            running += rolled as f64;
            applied.push(AppliedModifier {
                id: v.id,
                name: v.name.clone(),
                source: v.source.clone(),
                kind: ModifierKind::Dice,
                value: rolled as f64,
            });
            consumed_ids.push(v.id);
        }

        for v in ordered.iter().filter(|v| v.kind == ModifierKind::Percentage) {
            running *= 1.0 + v.value / 100.0;
            applied.push(AppliedModifier {
                id: v.id,
                name: v.name.clone(),
                source: v.source.clone(),
                kind: ModifierKind::Percentage,
                value: v.value,
            });
            consumed_ids.push(v.id);
        }

        self.mark_consumed(&consumed_ids);
        (running, applied)
    }

    fn mark_consumed(&mut self, ids: &[ModifierId]) {
        for m in self.modifiers.iter_mut() {
            if ids.contains(&m.id) && m.consume_on_use {
                m.consumed = true;
            }
        }
    }

    /// Owned clones of every eligible modifier for `target`, for callers
    /// (like the damage roll evaluator) that need to hand a modifier list to
    /// a pure function rather than drive `apply` directly.
    pub fn snapshot_for(&self, target: &ModifierTarget, ctx: &ModifierContext) -> Vec<Modifier> {
        self.eligible(target, ctx).into_iter().cloned().collect()
    }

    /// Advantage/disadvantage sources contributed by this stack for `target`.
    pub fn advantage_sources(&self, target: &ModifierTarget, ctx: &ModifierContext) -> (Vec<String>, Vec<String>) {
        let eligible = self.eligible(target, ctx);
        let advantage = eligible
            .iter()
            .filter(|m| m.kind == ModifierKind::Advantage)
            .map(|m| m.source.clone())
            .collect();
        let disadvantage = eligible
            .iter()
            .filter(|m| m.kind == ModifierKind::Disadvantage)
            .map(|m| m.source.clone())
            .collect();
        (advantage, disadvantage)
    }
}

/// The full Modifier Engine: per-combatant stacks plus one global stack,
/// and the id/insertion-order counters that keep modifiers uniquely
/// ordered within a stack.
#[derive(Clone, Debug, Default)]
pub struct ModifierEngine {
    per_combatant: BTreeMap<CombatantId, ModifierStack>,
    global: ModifierStack,
    next_modifier_id: u64,
    next_insertion_order: u64,
}

impl ModifierEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&mut self) -> ModifierId {
        self.next_modifier_id += 1;
        ModifierId::new(self.next_modifier_id)
    }

    /// Adds a modifier to a combatant's stack, assigning it a fresh id and
    /// insertion order. Returns the assigned id.
    pub fn add(&mut self, combatant: CombatantId, mut modifier: Modifier) -> ModifierId {
        let id = self.fresh_id();
        modifier.id = id;
        modifier.insertion_order = self.next_insertion_order;
        self.next_insertion_order += 1;
        self.per_combatant.entry(combatant).or_default().insert(modifier);
        id
    }

    /// Adds a modifier to the global stack.
    pub fn add_global(&mut self, mut modifier: Modifier) -> ModifierId {
        let id = self.fresh_id();
        modifier.id = id;
        modifier.insertion_order = self.next_insertion_order;
        self.next_insertion_order += 1;
        self.global.insert(modifier);
        id
    }

    pub fn remove_by_id(&mut self, combatant: CombatantId, id: ModifierId) -> bool {
        self.per_combatant
            .get_mut(&combatant)
            .map(|stack| stack.remove_by_id(id))
            .unwrap_or(false)
            || self.global.remove_by_id(id)
    }

    pub fn remove_by_source(&mut self, combatant: CombatantId, source: &str) -> usize {
        let local = self
            .per_combatant
            .get_mut(&combatant)
            .map(|stack| stack.remove_by_source(source))
            .unwrap_or(0);
        local + self.global.remove_by_source(source)
    }

    pub fn remove_by_source_everywhere(&mut self, source: &str) -> usize {
        let mut total = self.global.remove_by_source(source);
        for stack in self.per_combatant.values_mut() {
            total += stack.remove_by_source(source);
        }
        total
    }

    pub fn stack_for(&self, combatant: CombatantId) -> Option<&ModifierStack> {
        self.per_combatant.get(&combatant)
    }

    pub fn global_stack(&self) -> &ModifierStack {
        &self.global
    }

    /// Applies the per-combatant stack, then the global stack, in sequence
    /// on the running total, as the evaluator's attack/save/damage flows do.
    pub fn apply_with_global(
        &mut self,
        rng: &mut DeterministicRng,
        combatant: CombatantId,
        base: f64,
        target: &ModifierTarget,
        ctx: &ModifierContext,
    ) -> (f64, Vec<AppliedModifier>) {
        let (after_local, mut applied) = self
            .per_combatant
            .entry(combatant)
            .or_default()
            .apply(rng, base, target, ctx);
        let (after_global, mut global_applied) = self.global.apply(rng, after_local, target, ctx);
        applied.append(&mut global_applied);
        (after_global, applied)
    }

    /// Resolves advantage/disadvantage for `combatant` on `target`, combining
    /// per-combatant modifiers, global modifiers, and caller-supplied extra
    /// sources (from boosts and statuses) under the 5e cancellation rule.
    pub fn resolve_advantage(
        &self,
        combatant: CombatantId,
        target: &ModifierTarget,
        ctx: &ModifierContext,
        extra_advantage: &[String],
        extra_disadvantage: &[String],
    ) -> (AdvantageState, Vec<String>, Vec<String>) {
        let (mut adv, mut dis) = self
            .per_combatant
            .get(&combatant)
            .map(|s| s.advantage_sources(target, ctx))
            .unwrap_or_default();
        let (global_adv, global_dis) = self.global.advantage_sources(target, ctx);
        adv.extend(global_adv);
        dis.extend(global_dis);
        adv.extend(extra_advantage.iter().cloned());
        dis.extend(extra_disadvantage.iter().cloned());
        adv.sort();
        adv.dedup();
        dis.sort();
        dis.dedup();

        let adv_refs: Vec<&str> = adv.iter().map(String::as_str).collect();
        let dis_refs: Vec<&str> = dis.iter().map(String::as_str).collect();
        let state = AdvantageState::resolve(&adv_refs, &dis_refs);
        (state, adv, dis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::ModifierKind;

    fn rng() -> DeterministicRng {
        DeterministicRng::new(1)
    }

    #[test]
    fn flat_modifiers_sum_in_priority_order() {
        let mut engine = ModifierEngine::new();
        let c = CombatantId::new(1);
        engine.add(
            c,
            Modifier::new("a", ModifierKind::Flat, ModifierTarget::AttackRoll, 3.0).with_priority(10),
        );
        engine.add(
            c,
            Modifier::new("b", ModifierKind::Flat, ModifierTarget::AttackRoll, 2.0).with_priority(5),
        );
        let mut r = rng();
        let (value, applied) = engine.apply_with_global(&mut r, c, 10.0, &ModifierTarget::AttackRoll, &ModifierContext::new());
        assert_eq!(value, 15.0);
        assert_eq!(applied[0].name, "b");
        assert_eq!(applied[1].name, "a");
    }

    #[test]
    fn override_wins_last_and_drops_others() {
        let mut engine = ModifierEngine::new();
        let c = CombatantId::new(1);
        engine.add(c, Modifier::new("o1", ModifierKind::Override, ModifierTarget::ArmorClass, 15.0));
        engine.add(c, Modifier::new("o2", ModifierKind::Override, ModifierTarget::ArmorClass, 18.0));
        engine.add(c, Modifier::new("flat", ModifierKind::Flat, ModifierTarget::ArmorClass, 99.0));
        let mut r = rng();
        let (value, applied) = engine.apply_with_global(&mut r, c, 10.0, &ModifierTarget::ArmorClass, &ModifierContext::new());
        assert_eq!(value, 18.0);
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].name, "o2");
    }

    #[test]
    fn consume_on_use_applies_once() {
        let mut engine = ModifierEngine::new();
        let c = CombatantId::new(1);
        engine.add(
            c,
            Modifier::new("once", ModifierKind::Flat, ModifierTarget::AttackRoll, 5.0).consuming(),
        );
        let mut r = rng();
        let (_, first) = engine.apply_with_global(&mut r, c, 0.0, &ModifierTarget::AttackRoll, &ModifierContext::new());
        assert_eq!(first.len(), 1);
        let (_, second) = engine.apply_with_global(&mut r, c, 0.0, &ModifierTarget::AttackRoll, &ModifierContext::new());
        assert!(second.is_empty());
    }

    #[test]
    fn remove_by_source_clears_matching_modifiers() {
        let mut engine = ModifierEngine::new();
        let c = CombatantId::new(1);
        engine.add(
            c,
            Modifier::new("a", ModifierKind::Flat, ModifierTarget::AttackRoll, 5.0).with_source("bless"),
        );
        assert_eq!(engine.remove_by_source(c, "bless"), 1);
        assert_eq!(engine.remove_by_source(c, "bless"), 0);
    }

    #[test]
    fn remove_by_id_is_idempotent() {
        let mut engine = ModifierEngine::new();
        let c = CombatantId::new(1);
        let id = engine.add(c, Modifier::new("a", ModifierKind::Flat, ModifierTarget::AttackRoll, 1.0));
        assert!(engine.remove_by_id(c, id));
        assert!(!engine.remove_by_id(c, id));
    }

    #[test]
    fn advantage_and_disadvantage_cancel() {
        let mut engine = ModifierEngine::new();
        let c = CombatantId::new(1);
        engine.add(c, Modifier::new("prone", ModifierKind::Advantage, ModifierTarget::AttackRoll, 0.0));
        engine.add(c, Modifier::new("blind", ModifierKind::Disadvantage, ModifierTarget::AttackRoll, 0.0));
        let (state, _, _) = engine.resolve_advantage(c, &ModifierTarget::AttackRoll, &ModifierContext::new(), &[], &[]);
        assert_eq!(state, AdvantageState::Normal);
    }
}
