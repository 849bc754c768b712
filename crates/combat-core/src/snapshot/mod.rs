//! C7 (part 2): save/load snapshots. A [`CombatSnapshot`] is the complete,
//! serializable state of one combat instance: flow state, RNG state, every
//! combatant, and every piece of transient runtime data tracked elsewhere in
//! this crate. Restoring one reproduces future RNG draws bit-for-bit,
//! because the RNG is restored via [`crate::rng::DeterministicRng::set_state`]
//! rather than by trusting a serialized internal state word.

pub mod export;
pub mod io;
pub mod migrator;
pub mod validator;

use std::collections::BTreeMap;

use crate::combatant::{Combatant, Position};
use crate::ids::{CombatantId, ConcentrationId, PropId, ReactionPromptId};
use crate::resolution_stack::ResolutionItem;
use crate::rules_bus::RuleWindow;
use crate::state_machine::{CombatState, Substate, SubstateRecord, TransitionRecord};
use crate::status::StatusInstance;
use crate::surface::Surface;

/// Current schema version this binary writes and can read without
/// migration. Bump this, and add a branch to [`migrator`], whenever a
/// breaking field change lands.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// When a cooldown's `remaining_cooldown_rounds` ticks down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CooldownDecrementPhase {
    #[default]
    OnTurnStart,
    OnTurnEnd,
    OnRoundEnd,
}

/// A single ability on cooldown/recharge for one combatant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AbilityCooldown {
    pub combatant: CombatantId,
    pub ability_id: String,
    pub max_charges: u32,
    pub current_charges: u32,
    pub remaining_cooldown_rounds: u32,
    pub decrement_phase: CooldownDecrementPhase,
}

/// A live concentration link between a caster and the statuses/surfaces it
/// sustains. Breaking concentration (from damage or a failed check) should
/// remove the link and everything it names.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Concentration {
    pub id: ConcentrationId,
    pub source: CombatantId,
    pub ability_id: String,
    pub linked_statuses: Vec<crate::ids::StatusInstanceId>,
    pub linked_surfaces: Vec<crate::ids::SurfaceInstanceId>,
}

/// A reaction opportunity offered to a combatant, awaiting a decision before
/// the triggering window's resolution can continue.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ReactionPrompt {
    pub id: ReactionPromptId,
    pub combatant: CombatantId,
    pub trigger_window: RuleWindow,
    pub available_reaction_ids: Vec<String>,
}

/// A non-combatant object placed in the arena (a spawned crate, a summoned
/// wall) that combatants can interact with or that blocks movement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Prop {
    pub id: PropId,
    pub definition_id: String,
    pub position: Position,
    pub owner: Option<CombatantId>,
}

/// Combat flow state captured as of the snapshot: the state machine's
/// current state/substate plus turn-order bookkeeping. History logs are
/// intentionally excluded — a restore resumes play, it does not need to
/// replay how the prior instance got here.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FlowSnapshot {
    pub state: CombatState,
    pub substate: Substate,
    pub current_round: u32,
    pub current_turn_index: usize,
    pub turn_order: Vec<CombatantId>,
}

/// RNG state: re-seeding from `seed` and replaying `roll_index` primitive
/// draws reproduces every future roll bit-for-bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RngSnapshot {
    pub seed: u64,
    pub roll_index: i64,
}

/// The complete, serializable state of one combat instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CombatSnapshot {
    pub schema_version: u32,
    /// Caller-supplied capture time (e.g. unix millis). Never interpreted by
    /// this crate beyond carrying it through; purely observability data.
    pub timestamp: u64,

    pub flow: FlowSnapshot,
    pub rng: RngSnapshot,

    pub combatants: Vec<Combatant>,
    pub surfaces: Vec<Surface>,
    pub statuses: Vec<StatusInstance>,
    pub resolution_stack: Vec<ResolutionItem>,
    pub cooldowns: Vec<AbilityCooldown>,
    pub concentrations: Vec<Concentration>,
    pub reaction_prompts: Vec<ReactionPrompt>,
    pub props: Vec<Prop>,

    /// Opaque, engine-defined key/value data not otherwise modeled here
    /// (e.g. scenario-specific flags). Carried through untouched.
    pub extra: BTreeMap<String, String>,
}

impl CombatSnapshot {
    pub fn new(flow: FlowSnapshot, rng: RngSnapshot) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            timestamp: 0,
            flow,
            rng,
            combatants: Vec::new(),
            surfaces: Vec::new(),
            statuses: Vec::new(),
            resolution_stack: Vec::new(),
            cooldowns: Vec::new(),
            concentrations: Vec::new(),
            reaction_prompts: Vec::new(),
            props: Vec::new(),
            extra: BTreeMap::new(),
        }
    }
}

/// Builds a minimal flow snapshot with no turn order, for tests and for
/// fresh combat instances that have not yet entered `CombatStart`.
impl Default for FlowSnapshot {
    fn default() -> Self {
        Self {
            state: CombatState::default(),
            substate: Substate::default(),
            current_round: 0,
            current_turn_index: 0,
            turn_order: Vec::new(),
        }
    }
}

/// Re-derives a [`TransitionRecord`]-compatible starting point for a state
/// machine restored from a snapshot: a single synthetic "restore" entry
/// rather than fabricating the lost history.
pub fn restore_transition_record(flow: &FlowSnapshot) -> TransitionRecord {
    TransitionRecord {
        from: flow.state,
        to: flow.state,
        monotonic_index: 0,
        reason: "restored from snapshot".to_string(),
    }
}

pub fn restore_substate_record(flow: &FlowSnapshot) -> SubstateRecord {
    SubstateRecord {
        substate: flow.substate,
        monotonic_index: 0,
    }
}
