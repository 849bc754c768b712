//! The arena: one independent combat instance composing C1–C7. Owns every
//! piece of mutable combat state; no global mutable state is shared between
//! arena instances (§5's multi-instance guarantee) — each `Arena` is a
//! self-contained value with its own RNG, state machine, modifier engine,
//! rule-window bus, and resolution stack.

use std::collections::BTreeMap;

use crate::boost::BoostSet;
use crate::combatant::Combatant;
use crate::config::CombatConfig;
use crate::evaluator::attack::AttackInput;
use crate::evaluator::contest::{ContestResult, ContestSide, TiePolicy};
use crate::evaluator::damage_roll::DamageRollInput;
use crate::evaluator::QueryResult;
use crate::ids::{
    CombatantId, ConcentrationId, IdCounter, ModifierId, PropId, ReactionPromptId,
    ResolutionItemId, StatusInstanceId, SurfaceInstanceId,
};
use crate::modifier::{Modifier, ModifierContext, ModifierEngine};
use crate::resolution_stack::{ResolutionItem, ResolutionStack, StackError};
use crate::rng::{AdvantageState, DeterministicRng};
use crate::rules_bus::{RuleEventContext, RuleProvider, RuleWindow, RuleWindowBus};
use crate::snapshot::validator::{self, ValidationIssue};
use crate::snapshot::{
    AbilityCooldown, CombatSnapshot, Concentration, CooldownDecrementPhase, FlowSnapshot, Prop,
    ReactionPrompt, RngSnapshot,
};
use crate::state_machine::{CombatState, StateMachine, Substate};
use crate::status::StatusInstance;
use crate::surface::Surface;

/// One independent combat instance.
///
/// Holds exactly the state a [`CombatSnapshot`] can reconstruct, plus
/// ephemeral/derived state a restore does not need to recover: the modifier
/// engine, per-combatant boost sets, and the rule-window provider registry.
/// These are recomputed by the embedding shell from content and restored
/// statuses rather than persisted, matching the data model's treatment of
/// boosts and modifiers as query-time evaluation state, not session data.
pub struct Arena {
    config: CombatConfig,
    rng: DeterministicRng,
    state_machine: StateMachine,
    modifiers: ModifierEngine,
    rule_windows: RuleWindowBus,
    resolution_stack: ResolutionStack,

    combatants: BTreeMap<CombatantId, Combatant>,
    boosts: BTreeMap<CombatantId, BoostSet>,
    surfaces: BTreeMap<SurfaceInstanceId, Surface>,
    statuses: BTreeMap<StatusInstanceId, StatusInstance>,
    cooldowns: Vec<AbilityCooldown>,
    concentrations: BTreeMap<ConcentrationId, Concentration>,
    reaction_prompts: BTreeMap<ReactionPromptId, ReactionPrompt>,
    props: BTreeMap<PropId, Prop>,

    current_round: u32,
    current_turn_index: usize,
    turn_order: Vec<CombatantId>,

    extra: BTreeMap<String, String>,

    ids: IdCounter,
}

impl Arena {
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, CombatConfig::default())
    }

    pub fn with_config(seed: u64, config: CombatConfig) -> Self {
        Self {
            resolution_stack: ResolutionStack::new(config.max_resolution_depth),
            config,
            rng: DeterministicRng::new(seed),
            state_machine: StateMachine::new(),
            modifiers: ModifierEngine::new(),
            rule_windows: RuleWindowBus::new(),
            combatants: BTreeMap::new(),
            boosts: BTreeMap::new(),
            surfaces: BTreeMap::new(),
            statuses: BTreeMap::new(),
            cooldowns: Vec::new(),
            concentrations: BTreeMap::new(),
            reaction_prompts: BTreeMap::new(),
            props: BTreeMap::new(),
            current_round: 0,
            current_turn_index: 0,
            turn_order: Vec::new(),
            extra: BTreeMap::new(),
            ids: IdCounter::new(),
        }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn rng(&self) -> &DeterministicRng {
        &self.rng
    }

    // ===== combatants =====

    pub fn add_combatant(&mut self, combatant: Combatant) {
        self.boosts.entry(combatant.id).or_default();
        self.combatants.insert(combatant.id, combatant);
    }

    /// Drops a combatant, its boost set, and any rule-window providers it
    /// owns. Surfaces/statuses/concentrations/props that merely reference
    /// the removed id are left as-is; whether a status outlives its source
    /// leaving combat is an orchestrator-level policy, not this layer's.
    pub fn remove_combatant(&mut self, id: CombatantId) -> Option<Combatant> {
        self.boosts.remove(&id);
        self.rule_windows.unregister_by_owner(id);
        self.turn_order.retain(|c| *c != id);
        self.combatants.remove(&id)
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(&id)
    }

    pub fn combatants(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.values()
    }

    pub fn boosts(&self, id: CombatantId) -> Option<&BoostSet> {
        self.boosts.get(&id)
    }

    pub fn boosts_mut(&mut self, id: CombatantId) -> &mut BoostSet {
        self.boosts.entry(id).or_default()
    }

    // ===== C4: rules evaluator entry points =====

    pub fn roll_attack(&mut self, input: &AttackInput) -> QueryResult {
        let boosts = self.boosts.entry(input.attacker).or_default();
        crate::evaluator::attack::roll_attack(&mut self.rng, &self.config, &mut self.modifiers, boosts, input)
    }

    pub fn roll_save(&mut self, input: &crate::evaluator::save::SaveInput) -> QueryResult {
        let boosts = self.boosts.entry(input.defender).or_default();
        crate::evaluator::save::roll_save(&mut self.rng, &mut self.modifiers, boosts, input)
    }

    pub fn roll_contest(
        &mut self,
        attacker: &ContestSide,
        defender: &ContestSide,
        tie_policy: TiePolicy,
    ) -> ContestResult {
        crate::evaluator::contest::roll_contest(&mut self.rng, &mut self.modifiers, attacker, defender, tie_policy)
    }

    pub fn roll_damage(&self, input: &DamageRollInput) -> crate::damage::DamageResult {
        let source_boosts = self.boosts.get(&input.source).cloned().unwrap_or_default();
        let target_boosts = self.boosts.get(&input.target).cloned().unwrap_or_default();
        crate::evaluator::damage_roll::roll_damage(&self.modifiers, &source_boosts, &target_boosts, input)
    }

    pub fn roll_healing(&mut self, target: CombatantId, base_heal: i32, ctx: &ModifierContext) -> QueryResult {
        crate::evaluator::healing::roll_healing(&mut self.rng, &mut self.modifiers, target, base_heal, ctx)
    }

    pub fn get_armor_class(&mut self, combatant: CombatantId, base_ac: i32, ctx: &ModifierContext) -> i32 {
        let boosts = self.boosts.entry(combatant).or_default();
        crate::evaluator::ac::get_armor_class(&mut self.rng, &mut self.modifiers, boosts, combatant, base_ac, ctx)
    }

    /// Informational only; never advances the RNG.
    pub fn calculate_hit_chance(&self, target_ac: i32, attack_mod: i32, advantage: AdvantageState) -> u32 {
        crate::evaluator::hit_chance::calculate_hit_chance(target_ac, attack_mod, advantage)
    }

    // ===== C2: modifier engine =====

    pub fn add_modifier(&mut self, combatant: CombatantId, modifier: Modifier) -> ModifierId {
        self.modifiers.add(combatant, modifier)
    }

    pub fn add_global_modifier(&mut self, modifier: Modifier) -> ModifierId {
        self.modifiers.add_global(modifier)
    }

    pub fn remove_modifier_by_id(&mut self, combatant: CombatantId, id: ModifierId) -> bool {
        self.modifiers.remove_by_id(combatant, id)
    }

    pub fn remove_modifiers_by_source(&mut self, combatant: CombatantId, source: &str) -> usize {
        self.modifiers.remove_by_source(combatant, source)
    }

    pub fn remove_modifiers_by_source_everywhere(&mut self, source: &str) -> usize {
        self.modifiers.remove_by_source_everywhere(source)
    }

    // ===== C6: rule window bus =====

    pub fn register_provider(
        &mut self,
        id: impl Into<String>,
        owner: CombatantId,
        priority: i32,
        windows: impl IntoIterator<Item = RuleWindow>,
        provider: Box<dyn RuleProvider>,
    ) {
        self.rule_windows.register(id, owner, priority, windows, provider);
    }

    pub fn unregister_provider(&mut self, id: &str) -> bool {
        self.rule_windows.unregister(id)
    }

    pub fn unregister_providers_by_owner(&mut self, owner: CombatantId) -> usize {
        self.rule_windows.unregister_by_owner(owner)
    }

    /// Dispatches `window` to every registered provider. `setup` configures
    /// the event context before dispatch (source/target/ability/etc.);
    /// `read` extracts whatever the caller needs afterward (e.g. a final
    /// damage value via `RuleEventContext::get_final_damage_value`). The
    /// context cannot outlive this call since it borrows the arena's own
    /// RNG, so results are read out through `read` rather than returned
    /// directly.
    pub fn dispatch_window<T>(
        &mut self,
        window: RuleWindow,
        setup: impl FnOnce(&mut RuleEventContext),
        read: impl FnOnce(&RuleEventContext) -> T,
    ) -> T {
        let mut ctx = RuleEventContext::new(&mut self.rng);
        setup(&mut ctx);
        self.rule_windows.dispatch(window, &mut ctx);
        read(&ctx)
    }

    // ===== C6: resolution stack =====

    pub fn push_resolution(
        &mut self,
        action_type: impl Into<String>,
        source: CombatantId,
        target: Option<CombatantId>,
        payload: Vec<u8>,
    ) -> Result<ResolutionItemId, StackError> {
        self.resolution_stack.push(action_type, source, target, payload)
    }

    pub fn pop_resolution(&mut self) -> Option<ResolutionItem> {
        self.resolution_stack.pop()
    }

    pub fn cancel_current_resolution(&mut self) {
        self.resolution_stack.cancel_current();
    }

    pub fn modify_current_resolution(&mut self, payload: Vec<u8>) {
        self.resolution_stack.modify_current(payload);
    }

    pub fn resolution_depth(&self) -> usize {
        self.resolution_stack.depth()
    }

    // ===== C7: state machine =====

    pub fn current_state(&self) -> CombatState {
        self.state_machine.current()
    }

    pub fn substate(&self) -> Substate {
        self.state_machine.substate()
    }

    pub fn try_transition(&mut self, to: CombatState, reason: impl Into<String>) -> bool {
        self.state_machine.try_transition(to, reason)
    }

    pub fn force_transition(&mut self, to: CombatState, reason: impl Into<String>) {
        self.state_machine.force_transition(to, reason);
    }

    pub fn enter_substate(&mut self, substate: Substate) {
        self.state_machine.enter_substate(substate);
    }

    pub fn exit_substate(&mut self) {
        self.state_machine.exit_substate();
    }

    pub fn reset_state_machine(&mut self) {
        self.state_machine.reset();
    }

    // ===== turn/round bookkeeping =====

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn current_turn_index(&self) -> usize {
        self.current_turn_index
    }

    pub fn turn_order(&self) -> &[CombatantId] {
        &self.turn_order
    }

    pub fn current_combatant(&self) -> Option<CombatantId> {
        self.turn_order.get(self.current_turn_index).copied()
    }

    pub fn set_turn_order(&mut self, order: Vec<CombatantId>) {
        self.turn_order = order;
        self.current_turn_index = 0;
    }

    /// Orders every known combatant by initiative descending, ties broken
    /// by `initiative_tiebreaker` descending and then by combatant id
    /// ascending for full determinism; starts a fresh round 1.
    pub fn order_by_initiative(&mut self) -> Vec<CombatantId> {
        let mut order: Vec<CombatantId> = self.combatants.keys().copied().collect();
        order.sort_by(|a, b| {
            let ca = &self.combatants[a];
            let cb = &self.combatants[b];
            cb.initiative
                .cmp(&ca.initiative)
                .then(cb.initiative_tiebreaker.cmp(&ca.initiative_tiebreaker))
                .then(a.cmp(b))
        });
        self.turn_order = order.clone();
        self.current_turn_index = 0;
        self.current_round = 1;
        order
    }

    /// Advances to the next entry in turn order, wrapping to a new round
    /// when the order is exhausted, and ticks cooldowns whose decrement
    /// phase matches the boundary just crossed. Does not drive the state
    /// machine; pair this with the caller's own `TurnEnd`/`TurnStart`/
    /// `RoundEnd` transitions.
    pub fn advance_turn(&mut self) -> Option<CombatantId> {
        if self.turn_order.is_empty() {
            return None;
        }
        if let Some(finishing) = self.current_combatant() {
            self.tick_cooldowns(finishing, CooldownDecrementPhase::OnTurnEnd);
        }

        self.current_turn_index += 1;
        if self.current_turn_index >= self.turn_order.len() {
            self.current_turn_index = 0;
            self.current_round += 1;
            for combatant in self.turn_order.clone() {
                self.tick_cooldowns(combatant, CooldownDecrementPhase::OnRoundEnd);
            }
        }

        let next = self.current_combatant();
        if let Some(next_id) = next {
            self.tick_cooldowns(next_id, CooldownDecrementPhase::OnTurnStart);
        }
        next
    }

    // ===== cooldowns =====

    pub fn add_cooldown(&mut self, cooldown: AbilityCooldown) {
        self.cooldowns.push(cooldown);
    }

    pub fn cooldowns_for(&self, combatant: CombatantId) -> impl Iterator<Item = &AbilityCooldown> {
        self.cooldowns.iter().filter(move |c| c.combatant == combatant)
    }

    pub fn cooldown_mut(&mut self, combatant: CombatantId, ability_id: &str) -> Option<&mut AbilityCooldown> {
        self.cooldowns
            .iter_mut()
            .find(|c| c.combatant == combatant && c.ability_id == ability_id)
    }

    fn tick_cooldowns(&mut self, combatant: CombatantId, phase: CooldownDecrementPhase) {
        for cooldown in self
            .cooldowns
            .iter_mut()
            .filter(|c| c.combatant == combatant && c.decrement_phase == phase)
        {
            cooldown.remaining_cooldown_rounds = cooldown.remaining_cooldown_rounds.saturating_sub(1);
            if cooldown.remaining_cooldown_rounds == 0 {
                cooldown.current_charges = cooldown.max_charges;
            }
        }
    }

    // ===== surfaces, statuses =====

    pub fn fresh_surface_id(&self) -> SurfaceInstanceId {
        SurfaceInstanceId::new(self.ids.next_raw())
    }

    pub fn add_surface(&mut self, surface: Surface) {
        self.surfaces.insert(surface.id, surface);
    }

    pub fn remove_surface(&mut self, id: SurfaceInstanceId) -> Option<Surface> {
        self.surfaces.remove(&id)
    }

    pub fn surfaces(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.values()
    }

    pub fn fresh_status_id(&self) -> StatusInstanceId {
        StatusInstanceId::new(self.ids.next_raw())
    }

    pub fn apply_status(&mut self, status: StatusInstance) {
        self.statuses.insert(status.id, status);
    }

    pub fn remove_status(&mut self, id: StatusInstanceId) -> Option<StatusInstance> {
        self.statuses.remove(&id)
    }

    pub fn statuses_on(&self, target: CombatantId) -> impl Iterator<Item = &StatusInstance> {
        self.statuses.values().filter(move |s| s.target == target)
    }

    // ===== concentration, reaction prompts, props =====

    pub fn fresh_concentration_id(&self) -> ConcentrationId {
        ConcentrationId::new(self.ids.next_raw())
    }

    pub fn add_concentration(&mut self, concentration: Concentration) {
        self.concentrations.insert(concentration.id, concentration);
    }

    /// Removes a concentration link. Callers are responsible for then
    /// removing the statuses/surfaces it named as sustained, since breaking
    /// concentration from damage or a failed check is an evaluator-level
    /// decision the arena does not make on its own.
    pub fn break_concentration(&mut self, id: ConcentrationId) -> Option<Concentration> {
        self.concentrations.remove(&id)
    }

    pub fn concentration(&self, id: ConcentrationId) -> Option<&Concentration> {
        self.concentrations.get(&id)
    }

    pub fn fresh_reaction_prompt_id(&self) -> ReactionPromptId {
        ReactionPromptId::new(self.ids.next_raw())
    }

    pub fn add_reaction_prompt(&mut self, prompt: ReactionPrompt) {
        self.reaction_prompts.insert(prompt.id, prompt);
    }

    pub fn resolve_reaction_prompt(&mut self, id: ReactionPromptId) -> Option<ReactionPrompt> {
        self.reaction_prompts.remove(&id)
    }

    pub fn pending_reaction_prompts(&self) -> impl Iterator<Item = &ReactionPrompt> {
        self.reaction_prompts.values()
    }

    pub fn fresh_prop_id(&self) -> PropId {
        PropId::new(self.ids.next_raw())
    }

    pub fn spawn_prop(&mut self, prop: Prop) {
        self.props.insert(prop.id, prop);
    }

    pub fn remove_prop(&mut self, id: PropId) -> Option<Prop> {
        self.props.remove(&id)
    }

    // ===== engine-defined catch-all =====

    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }

    pub fn set_extra(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.extra.insert(key.into(), value.into());
    }

    // ===== C7: snapshot capture/restore =====

    /// Captures the complete, serializable state of this arena. `timestamp`
    /// is caller-supplied observability data, never interpreted here.
    pub fn capture(&self, timestamp: u64) -> CombatSnapshot {
        let flow = FlowSnapshot {
            state: self.state_machine.current(),
            substate: self.state_machine.substate(),
            current_round: self.current_round,
            current_turn_index: self.current_turn_index,
            turn_order: self.turn_order.clone(),
        };
        let rng = RngSnapshot {
            seed: self.rng.seed(),
            roll_index: self.rng.roll_index(),
        };

        let mut snapshot = CombatSnapshot::new(flow, rng);
        snapshot.timestamp = timestamp;
        snapshot.combatants = self.combatants.values().cloned().collect();
        snapshot.surfaces = self.surfaces.values().cloned().collect();
        snapshot.statuses = self.statuses.values().cloned().collect();
        snapshot.resolution_stack = self.resolution_stack.items().to_vec();
        snapshot.cooldowns = self.cooldowns.clone();
        snapshot.concentrations = self.concentrations.values().cloned().collect();
        snapshot.reaction_prompts = self.reaction_prompts.values().cloned().collect();
        snapshot.props = self.props.values().cloned().collect();
        snapshot.extra = self.extra.clone();
        snapshot
    }

    /// Validates `snapshot`, then rebuilds a fresh arena from it. Fails
    /// without constructing anything if validation rejects the snapshot, so
    /// restore is atomic: no partial state survives a failed attempt.
    ///
    /// The modifier engine, per-combatant boost sets, and rule-window
    /// provider registry come back empty, since none of them are part of
    /// `CombatSnapshot` — they are query-time evaluation state the
    /// embedding shell re-derives from content and the restored statuses,
    /// not session state this crate persists.
    pub fn restore(snapshot: CombatSnapshot, config: CombatConfig) -> Result<Self, Vec<ValidationIssue>> {
        let issues = validator::validate(&snapshot);
        if !issues.is_empty() {
            return Err(issues);
        }

        let mut rng = DeterministicRng::new(snapshot.rng.seed);
        rng.set_state(snapshot.rng.seed, snapshot.rng.roll_index)
            .expect("validator already rejects a negative roll index");

        let mut state_machine = StateMachine::new();
        state_machine.restore(
            snapshot.flow.state,
            snapshot.flow.substate,
            crate::snapshot::restore_transition_record(&snapshot.flow),
            crate::snapshot::restore_substate_record(&snapshot.flow),
        );

        let mut resolution_stack = ResolutionStack::new(config.max_resolution_depth);
        resolution_stack.restore(snapshot.resolution_stack);

        let mut boosts = BTreeMap::new();
        let combatants: BTreeMap<CombatantId, Combatant> = snapshot
            .combatants
            .into_iter()
            .map(|c| {
                boosts.insert(c.id, BoostSet::new());
                (c.id, c)
            })
            .collect();

        let surfaces: BTreeMap<SurfaceInstanceId, Surface> =
            snapshot.surfaces.into_iter().map(|s| (s.id, s)).collect();
        let statuses: BTreeMap<StatusInstanceId, StatusInstance> =
            snapshot.statuses.into_iter().map(|s| (s.id, s)).collect();
        let concentrations: BTreeMap<ConcentrationId, Concentration> =
            snapshot.concentrations.into_iter().map(|c| (c.id, c)).collect();
        let reaction_prompts: BTreeMap<ReactionPromptId, ReactionPrompt> =
            snapshot.reaction_prompts.into_iter().map(|p| (p.id, p)).collect();
        let props: BTreeMap<PropId, Prop> = snapshot.props.into_iter().map(|p| (p.id, p)).collect();

        let next_id = surfaces
            .keys()
            .map(|id| id.get())
            .chain(statuses.keys().map(|id| id.get()))
            .chain(concentrations.keys().map(|id| id.get()))
            .chain(reaction_prompts.keys().map(|id| id.get()))
            .chain(props.keys().map(|id| id.get()))
            .max()
            .map_or(1, |m| m + 1);

        Ok(Self {
            config,
            rng,
            state_machine,
            modifiers: ModifierEngine::new(),
            rule_windows: RuleWindowBus::new(),
            resolution_stack,
            combatants,
            boosts,
            surfaces,
            statuses,
            cooldowns: snapshot.cooldowns,
            concentrations,
            reaction_prompts,
            props,
            current_round: snapshot.flow.current_round,
            current_turn_index: snapshot.flow.current_turn_index,
            turn_order: snapshot.flow.turn_order,
            extra: snapshot.extra,
            ids: IdCounter::starting_at(next_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Combatant;

    fn arena_with_one_combatant(seed: u64) -> Arena {
        let mut arena = Arena::new(seed);
        arena.add_combatant(Combatant::new(CombatantId::new(1), "fighter", 20, 9.0));
        arena
    }

    #[test]
    fn capture_then_restore_reproduces_identical_snapshot() {
        let mut arena = arena_with_one_combatant(42);
        arena.try_transition(CombatState::CombatStart, "start");
        arena.order_by_initiative();
        arena.combatant_mut(CombatantId::new(1)).unwrap().initiative = 10;
        // Burn a few rolls so roll_index is nonzero before capture.
        let input = AttackInput {
            attacker: CombatantId::new(1),
            defender: CombatantId::new(1),
            base_attack_bonus: 0,
            target_base_ac: 10,
            height_modifier: 0,
            cover_ac_bonus: 0,
            critical_threshold: None,
            lucky: false,
            auto_crit_on_hit: false,
            melee: true,
            ranged: false,
            attacker_statuses: Default::default(),
            defender_statuses: Default::default(),
            extra_advantage_sources: Vec::new(),
            extra_disadvantage_sources: Vec::new(),
            context: ModifierContext::new(),
        };
        arena.roll_attack(&input);

        let captured = arena.capture(0);
        let restored = Arena::restore(captured.clone(), CombatConfig::default()).expect("valid snapshot restores");
        let re_captured = restored.capture(0);

        assert_eq!(captured.rng, re_captured.rng);
        assert_eq!(captured.flow, re_captured.flow);
        assert_eq!(captured.combatants, re_captured.combatants);
    }

    #[test]
    fn restore_rejects_invalid_snapshot_without_building_anything() {
        let flow = FlowSnapshot::default();
        let rng = RngSnapshot { seed: 1, roll_index: 0 };
        let snapshot = CombatSnapshot::new(flow, rng);
        let err = Arena::restore(snapshot, CombatConfig::default()).unwrap_err();
        assert!(err.contains(&ValidationIssue::EmptyCombatantList));
    }

    #[test]
    fn advance_turn_wraps_and_increments_round() {
        let mut arena = arena_with_one_combatant(1);
        arena.add_combatant(Combatant::new(CombatantId::new(2), "rogue", 15, 9.0));
        arena.set_turn_order(vec![CombatantId::new(1), CombatantId::new(2)]);
        assert_eq!(arena.current_round(), 0);
        arena.advance_turn();
        assert_eq!(arena.current_combatant(), Some(CombatantId::new(2)));
        assert_eq!(arena.current_round(), 0);
        arena.advance_turn();
        assert_eq!(arena.current_combatant(), Some(CombatantId::new(1)));
        assert_eq!(arena.current_round(), 1);
    }

    #[test]
    fn cooldown_ticks_on_the_phase_it_declares() {
        let mut arena = arena_with_one_combatant(1);
        arena.set_turn_order(vec![CombatantId::new(1)]);
        arena.add_cooldown(AbilityCooldown {
            combatant: CombatantId::new(1),
            ability_id: "fireball".to_string(),
            max_charges: 1,
            current_charges: 0,
            remaining_cooldown_rounds: 1,
            decrement_phase: CooldownDecrementPhase::OnRoundEnd,
        });
        arena.advance_turn();
        let cooldown = arena.cooldown_mut(CombatantId::new(1), "fireball").unwrap();
        assert_eq!(cooldown.remaining_cooldown_rounds, 0);
        assert_eq!(cooldown.current_charges, 1);
    }
}
