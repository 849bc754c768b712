//! Data-driven content descriptors and loaders.
//!
//! `combat-content` defines the on-disk shape of ability, status, combatant,
//! and boost-string content and parses it from RON/TOML files into plain
//! descriptor types. It never executes an effect or authors game balance;
//! `combat-core` consumes the descriptors this crate produces but carries no
//! dependency on a file format of its own.

pub mod descriptors;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use descriptors::ability::{
    AbilityCost, AbilityDescriptor, AttackType, ConditionTrigger, CooldownPolicy, EffectEntry,
    TargetFilter, TargetType,
};
pub use descriptors::combatant::{CombatantTemplate, ResourceMaximum};
pub use descriptors::status::{ModifierDescriptor, StatusDescriptor};

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, BoostCatalogLoader, CombatantLoader, ConfigLoader, ContentFactory, StatusLoader,
};
