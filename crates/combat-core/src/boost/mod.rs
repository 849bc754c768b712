//! C3: Boost Layer. A declarative effect DSL parsed from content strings,
//! resolving to advantage, AC, resistance tier, damage bonus, status
//! immunity, roll-bonus dice, and critical-hit policy.

pub mod parser;
pub mod query;

use crate::modifier::ModifierPredicate;

pub use parser::{parse_boost_string, BoostParseError};
pub use query::{CriticalHitPolicy, RollType};

/// Closed enumeration of boost clause types. Variant names match the DSL's
/// `TypeName` tokens exactly (e.g. `"AC"`, `"DamageBonus"`), so parsing is a
/// direct `FromStr` lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoostType {
    AC,
    Advantage,
    Disadvantage,
    Resistance,
    StatusImmunity,
    DamageBonus,
    WeaponDamage,
    Ability,
    ActionResource,
    RollBonus,
    CriticalHit,
}

/// Where a boost came from, for bulk removal and breakdown provenance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoostOrigin {
    pub kind: String,
    pub id: String,
}

impl BoostOrigin {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// A single parsed boost clause.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedBoost {
    pub boost_type: BoostType,
    /// Positional, string-typed arguments; typed accessors live on
    /// [`ParsedBoost`]'s helper methods below.
    pub args: Vec<String>,
    pub condition: Option<ModifierPredicate>,
    pub origin: BoostOrigin,
}

impl ParsedBoost {
    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    pub fn arg_i32(&self, index: usize) -> Option<i32> {
        self.arg(index)?.parse().ok()
    }
}

/// Resistance tier a boost's `Resistance(DamageType, Tier)` clause grants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResistanceLevel {
    #[default]
    Normal,
    Resistant,
    Immune,
    Vulnerable,
}

/// A combatant's full set of active, parsed boosts (from equipped items,
/// statuses, and innate traits alike — the core does not distinguish origin
/// kinds beyond the provenance field).
#[derive(Clone, Debug, Default)]
pub struct BoostSet {
    boosts: Vec<ParsedBoost>,
}

impl BoostSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, boost: ParsedBoost) {
        self.boosts.push(boost);
    }

    pub fn remove_by_origin(&mut self, origin_id: &str) -> usize {
        let before = self.boosts.len();
        self.boosts.retain(|b| b.origin.id != origin_id);
        before - self.boosts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParsedBoost> {
        self.boosts.iter()
    }
}
