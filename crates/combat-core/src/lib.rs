//! Deterministic, engine-agnostic tactical combat rules.
//!
//! `combat-core` defines the canonical turn-based combat rules (RNG, modifier
//! stacks, boosts, the damage pipeline, rules evaluator, rule-window bus,
//! resolution stack, and the combat state machine) and composes them into a
//! single [`Arena`] value per combat instance. All state mutation flows
//! through `Arena`'s methods; supporting crates depend on the types
//! re-exported here.
pub mod arena;
pub mod boost;
pub mod combatant;
pub mod config;
pub mod damage;
pub mod dice;
pub mod error;
pub mod evaluator;
pub mod ids;
pub mod modifier;
pub mod resolution_stack;
pub mod rng;
pub mod rules_bus;
pub mod snapshot;
pub mod state_machine;
pub mod status;
pub mod surface;

pub use arena::Arena;
pub use boost::{
    BoostOrigin, BoostParseError, BoostSet, BoostType, CriticalHitPolicy, ParsedBoost,
    ResistanceLevel, RollType, parse_boost_string,
};
pub use combatant::{
    Ability, AbilityScores, ActionBudget, ActionFlags, Combatant, DeathSaves, Faction, LifeState,
    Position, ResourcePool, ResourceValue,
};
pub use config::CombatConfig;
pub use damage::{BreakdownEntry, DamageContext, DamageResult, DamageType, run_damage_pipeline};
pub use dice::{DiceFormula, DiceParseError, floor_halve, round_half_away_from_zero};
pub use error::{CoreError, ErrorContext, ErrorSeverity, NeverError};
pub use evaluator::{
    QueryResult,
    ac::get_armor_class,
    attack::{AttackInput, roll_attack},
    contest::{ContestResult, ContestSide, ContestWinner, TiePolicy, roll_contest},
    damage_roll::{DamageRollInput, roll_damage},
    healing::roll_healing,
    hit_chance::calculate_hit_chance,
    save::{SaveInput, roll_save},
};
pub use ids::{
    CombatantId, ConcentrationId, ModifierId, PropId, ReactionPromptId, ResolutionItemId,
    StatusInstanceId, SurfaceInstanceId,
};
pub use modifier::{
    Modifier, ModifierContext, ModifierEngine, ModifierKind, ModifierPredicate, ModifierStack,
    ModifierTarget,
};
pub use resolution_stack::{ResolutionItem, ResolutionStack, StackError};
pub use rng::{AdvantageState, DeterministicRng, RngError};
pub use rules_bus::{RuleEventContext, RuleProvider, RuleWindow, RuleWindowBus};
pub use snapshot::{
    AbilityCooldown, CombatSnapshot, Concentration, CooldownDecrementPhase, FlowSnapshot, Prop,
    ReactionPrompt, RngSnapshot, CURRENT_SCHEMA_VERSION,
};
pub use state_machine::{CombatState, StateMachine, Substate, SubstateRecord, TransitionRecord};
pub use status::{StackingPolicy, StatusDuration, StatusInstance};
pub use surface::Surface;
