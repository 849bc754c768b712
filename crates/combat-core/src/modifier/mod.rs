//! C2: Modifier Engine. Keyed modifier stacks per combatant plus a global
//! stack; condition-predicated application; advantage resolution.

pub mod predicate;
pub mod stack;

use std::collections::{BTreeMap, BTreeSet};

use crate::combatant::Ability;
use crate::ids::{CombatantId, ModifierId};

pub use predicate::ModifierPredicate;
pub use stack::{AppliedModifier, ModifierEngine, ModifierStack};

/// How a modifier combines with the running total. Numeric meaning depends
/// on the variant: `Flat`/`Override` read `value` directly, `Percentage`
/// reads `value` as a percent (`+25` -> `x1.25`), `Dice` ignores `value` and
/// rolls `dice_formula` instead, `Advantage`/`Disadvantage` carry no number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ModifierKind {
    Flat,
    Percentage,
    Override,
    Advantage,
    Disadvantage,
    Dice,
}

/// The named value a modifier rides on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierTarget {
    AttackRoll,
    DamageDealt,
    DamageTaken,
    HealingReceived,
    ArmorClass,
    SavingThrow,
    SkillCheck,
    Initiative,
    MovementSpeed,
    ActionPoints,
    Custom(String),
}

/// Context a predicate is evaluated against, and that filters which
/// modifiers a given `apply` call considers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModifierContext {
    pub attacker: Option<CombatantId>,
    pub defender: Option<CombatantId>,
    pub ability: Option<Ability>,
    pub tags: BTreeSet<String>,
    pub active_statuses: BTreeSet<String>,
    pub data: BTreeMap<String, String>,
}

impl ModifierContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attacker(mut self, attacker: CombatantId) -> Self {
        self.attacker = Some(attacker);
        self
    }

    pub fn with_defender(mut self, defender: CombatantId) -> Self {
        self.defender = Some(defender);
        self
    }
}

/// A single modifier instance within a stack.
#[derive(Clone, Debug, PartialEq)]
pub struct Modifier {
    pub id: ModifierId,
    pub name: String,
    pub kind: ModifierKind,
    pub target: ModifierTarget,
    pub value: f64,
    pub dice_formula: Option<crate::dice::DiceFormula>,
    /// Lower applies earlier. Default 50.
    pub priority: i32,
    pub source: String,
    pub predicate: Option<ModifierPredicate>,
    pub consume_on_use: bool,
    pub consumed: bool,
    /// 0 = persistent.
    pub duration_turns: u32,
    /// Tiebreak for equal-priority modifiers; assigned at insertion.
    pub(crate) insertion_order: u64,
}

impl Modifier {
    pub fn new(name: impl Into<String>, kind: ModifierKind, target: ModifierTarget, value: f64) -> Self {
        Self {
            id: ModifierId::default(),
            name: name.into(),
            kind,
            target,
            value,
            dice_formula: None,
            priority: Self::DEFAULT_PRIORITY,
            source: String::new(),
            predicate: None,
            consume_on_use: false,
            consumed: false,
            duration_turns: 0,
            insertion_order: 0,
        }
    }

    pub const DEFAULT_PRIORITY: i32 = 50;

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_predicate(mut self, predicate: ModifierPredicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_dice_formula(mut self, formula: crate::dice::DiceFormula) -> Self {
        self.dice_formula = Some(formula);
        self
    }

    pub fn consuming(mut self) -> Self {
        self.consume_on_use = true;
        self
    }

    fn matches_target(&self, target: &ModifierTarget) -> bool {
        &self.target == target
    }
}
