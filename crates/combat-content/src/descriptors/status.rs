//! Status content: the static definition a status id resolves to. Runtime
//! instances ([`combat_core::StatusInstance`]) are built from these by the
//! orchestrator when a status is applied.

use std::collections::BTreeSet;

use combat_core::{ModifierKind, ModifierPredicate, ModifierTarget, StackingPolicy, StatusDuration};

/// One modifier a status grants while active, as a `{target, kind, value}`
/// triple plus an optional compiled predicate, per the content contract.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ModifierDescriptor {
    pub target: ModifierTarget,
    pub kind: ModifierKind,
    pub value: f64,
    pub predicate: Option<ModifierPredicate>,
}

/// The full static definition a status id resolves to.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StatusDescriptor {
    pub id: String,
    pub default_duration: StatusDuration,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stacking_policy: StackingPolicy,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<ModifierDescriptor>,
    /// Action budget flags this status blocks while active, e.g.
    /// `"action"`, `"bonus_action"`, `"reaction"`, `"movement"`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub blocked_actions: BTreeSet<String>,
    /// Ability ids fired once per tick (turn/round boundary, per
    /// `default_duration`'s unit) while the status is active.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tick_effects: Vec<String>,
    /// Ability ids fired when the status is first applied.
    #[cfg_attr(feature = "serde", serde(default))]
    pub trigger_effects: Vec<String>,
    /// Named events (content-defined, e.g. `"take_damage"`,
    /// `"leave_surface"`) that remove the status early.
    #[cfg_attr(feature = "serde", serde(default))]
    pub remove_on_event: BTreeSet<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_descriptor_carries_an_optional_predicate() {
        let unconditional = ModifierDescriptor {
            target: ModifierTarget::ArmorClass,
            kind: ModifierKind::Flat,
            value: 2.0,
            predicate: None,
        };
        assert!(unconditional.predicate.is_none());
    }
}
