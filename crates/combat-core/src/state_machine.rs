//! C7 (part 1): the combat state machine. A transition is valid iff the
//! target state is in the current state's allow-set; every transition
//! (attempted or forced) is appended to a monotonic history log.

/// The ten lifecycle states a combat instance can be in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatState {
    #[default]
    NotInCombat,
    CombatStart,
    TurnStart,
    PlayerDecision,
    AIDecision,
    ActionExecution,
    ReactionPrompt,
    TurnEnd,
    RoundEnd,
    CombatEnd,
}

/// Orthogonal, UI-facing refinement of the current state. The core tracks
/// these only for history purposes; they carry no transition table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Substate {
    #[default]
    None,
    TargetSelection,
    MultiTargetPicking,
    AoEPlacement,
    MovementPreview,
    ReactionPrompt,
    AnimationLock,
}

fn allowed(from: CombatState) -> &'static [CombatState] {
    use CombatState::*;
    match from {
        NotInCombat => &[CombatStart],
        CombatStart => &[TurnStart],
        TurnStart => &[PlayerDecision, AIDecision],
        PlayerDecision => &[ActionExecution, TurnEnd],
        AIDecision => &[ActionExecution, TurnEnd],
        ActionExecution => &[PlayerDecision, AIDecision, ReactionPrompt, TurnEnd],
        ReactionPrompt => &[PlayerDecision, AIDecision, ActionExecution, TurnEnd],
        TurnEnd => &[TurnStart, RoundEnd, CombatEnd],
        RoundEnd => &[TurnStart, CombatEnd],
        CombatEnd => &[NotInCombat],
    }
}

/// One entry in the transition history log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionRecord {
    pub from: CombatState,
    pub to: CombatState,
    pub monotonic_index: u64,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubstateRecord {
    pub substate: Substate,
    pub monotonic_index: u64,
}

/// The combat instance's single process-wide state scalar plus its history.
#[derive(Clone, Debug, Default)]
pub struct StateMachine {
    current: CombatState,
    substate: Substate,
    history: Vec<TransitionRecord>,
    substate_history: Vec<SubstateRecord>,
    next_index: u64,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> CombatState {
        self.current
    }

    pub fn substate(&self) -> Substate {
        self.substate
    }

    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    /// Attempts a transition; returns whether it was valid. The state
    /// mutates iff the return is true (P8).
    pub fn try_transition(&mut self, to: CombatState, reason: impl Into<String>) -> bool {
        if !allowed(self.current).contains(&to) {
            return false;
        }
        self.record(to, reason);
        true
    }

    /// Unconditionally applies a transition, bypassing the allow-table. For
    /// debug tooling and snapshot restore.
    pub fn force_transition(&mut self, to: CombatState, reason: impl Into<String>) {
        self.record(to, reason);
    }

    fn record(&mut self, to: CombatState, reason: impl Into<String>) {
        let record = TransitionRecord {
            from: self.current,
            to,
            monotonic_index: self.next_index,
            reason: reason.into(),
        };
        self.next_index += 1;
        self.current = to;
        self.history.push(record);
    }

    pub fn enter_substate(&mut self, substate: Substate) {
        self.substate = substate;
        self.substate_history.push(SubstateRecord {
            substate,
            monotonic_index: self.next_index,
        });
        self.next_index += 1;
    }

    pub fn exit_substate(&mut self) {
        self.enter_substate(Substate::None);
    }

    pub fn substate_history(&self) -> &[SubstateRecord] {
        &self.substate_history
    }

    /// Clears all history and returns to `NotInCombat`.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Rebuilds state directly from a snapshot, seeding history with the
    /// given synthetic records rather than replaying a transition sequence
    /// that was never captured.
    pub fn restore(
        &mut self,
        state: CombatState,
        substate: Substate,
        transition: TransitionRecord,
        substate_record: SubstateRecord,
    ) {
        self.current = state;
        self.substate = substate;
        self.history = vec![transition];
        self.substate_history = vec![substate_record];
        self.next_index = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_leaves_state_unchanged() {
        // S6: TurnStart -> RoundEnd is not allowed.
        let mut sm = StateMachine::new();
        sm.try_transition(CombatState::CombatStart, "start");
        sm.try_transition(CombatState::TurnStart, "turn");
        assert!(!sm.try_transition(CombatState::RoundEnd, "skip"));
        assert_eq!(sm.current(), CombatState::TurnStart);
    }

    #[test]
    fn valid_transition_from_turn_end_to_combat_end() {
        let mut sm = StateMachine::new();
        sm.try_transition(CombatState::CombatStart, "start");
        sm.try_transition(CombatState::TurnStart, "turn");
        sm.try_transition(CombatState::PlayerDecision, "decide");
        sm.try_transition(CombatState::TurnEnd, "end");
        assert!(sm.try_transition(CombatState::CombatEnd, "combat over"));
        assert_eq!(sm.current(), CombatState::CombatEnd);
    }

    #[test]
    fn history_is_monotonically_indexed() {
        let mut sm = StateMachine::new();
        sm.try_transition(CombatState::CombatStart, "a");
        sm.try_transition(CombatState::TurnStart, "b");
        let indices: Vec<u64> = sm.history().iter().map(|r| r.monotonic_index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn force_transition_bypasses_the_allow_table() {
        let mut sm = StateMachine::new();
        sm.force_transition(CombatState::RoundEnd, "debug");
        assert_eq!(sm.current(), CombatState::RoundEnd);
    }

    #[test]
    fn reset_clears_history_and_state() {
        let mut sm = StateMachine::new();
        sm.try_transition(CombatState::CombatStart, "a");
        sm.reset();
        assert_eq!(sm.current(), CombatState::NotInCombat);
        assert!(sm.history().is_empty());
    }
}
