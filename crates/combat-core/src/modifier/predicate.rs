//! A small closed expression AST for modifier and boost conditions.
//!
//! Conditions are data, not closures: this keeps them serializable (so a
//! modifier attached mid-combat survives a snapshot round-trip) and keeps
//! the "compiled predicate" language of the status/modifier data model
//! literal rather than an opaque callback.

use crate::combatant::Ability;
use crate::ids::CombatantId;
use crate::modifier::ModifierContext;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierPredicate {
    HasTag(String),
    HasStatus(String),
    AbilityIs(Ability),
    AttackerIs(CombatantId),
    DefenderIs(CombatantId),
    DataEquals(String, String),
    And(Vec<ModifierPredicate>),
    Or(Vec<ModifierPredicate>),
    Not(Box<ModifierPredicate>),
}

impl ModifierPredicate {
    pub fn evaluate(&self, ctx: &ModifierContext) -> bool {
        match self {
            ModifierPredicate::HasTag(tag) => ctx.tags.contains(tag.as_str()),
            ModifierPredicate::HasStatus(status) => ctx.active_statuses.contains(status.as_str()),
            ModifierPredicate::AbilityIs(ability) => ctx.ability == Some(*ability),
            ModifierPredicate::AttackerIs(id) => ctx.attacker == Some(*id),
            ModifierPredicate::DefenderIs(id) => ctx.defender == Some(*id),
            ModifierPredicate::DataEquals(key, value) => {
                ctx.data.get(key.as_str()).is_some_and(|v| v == value)
            }
            ModifierPredicate::And(preds) => preds.iter().all(|p| p.evaluate(ctx)),
            ModifierPredicate::Or(preds) => preds.iter().any(|p| p.evaluate(ctx)),
            ModifierPredicate::Not(inner) => !inner.evaluate(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_requires_all() {
        let mut ctx = ModifierContext::default();
        ctx.tags.insert("raging".into());
        let pred = ModifierPredicate::And(vec![
            ModifierPredicate::HasTag("raging".into()),
            ModifierPredicate::HasTag("prone".into()),
        ]);
        assert!(!pred.evaluate(&ctx));
        ctx.tags.insert("prone".into());
        assert!(pred.evaluate(&ctx));
    }

    #[test]
    fn not_inverts() {
        let ctx = ModifierContext::default();
        let pred = ModifierPredicate::Not(Box::new(ModifierPredicate::HasTag("x".into())));
        assert!(pred.evaluate(&ctx));
    }
}
