//! C6 (part 1): the rule-window event bus. Providers subscribe to a fixed
//! set of lifecycle windows and are dispatched in `(priority,
//! registration_order)` order; a provider's `cancel` flag short-circuits
//! the rest of the batch for that window.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::combatant::Ability;
use crate::dice::round_half_away_from_zero;
use crate::ids::CombatantId;
use crate::rng::DeterministicRng;

/// Fixed enumeration of lifecycle points providers may subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuleWindow {
    BeforeAttackRoll,
    AfterAttackRoll,
    BeforeDamage,
    AfterDamage,
    BeforeSavingThrow,
    AfterSavingThrow,
    OnTurnStart,
    OnTurnEnd,
    OnMove,
    OnLeaveThreateningArea,
    OnEnterSurface,
    OnConcentrationCheck,
    OnConcentrationBroken,
    OnDeclareAction,
    OnActionComplete,
}

/// Mutable payload a provider reads and writes during a window dispatch.
pub struct RuleEventContext<'a> {
    pub source: Option<CombatantId>,
    pub target: Option<CombatantId>,
    pub ability: Option<Ability>,
    pub melee: bool,
    pub ranged: bool,
    pub spell: bool,
    pub critical: bool,
    pub cancel: bool,
    pub rng: &'a mut DeterministicRng,

    damage_bonus: i32,
    damage_multiplier: f64,
    save_bonus: i32,
    save_bonus_buckets: BTreeMap<String, i32>,
    advantage_sources: Vec<String>,
    disadvantage_sources: Vec<String>,
}

impl<'a> RuleEventContext<'a> {
    pub fn new(rng: &'a mut DeterministicRng) -> Self {
        Self {
            source: None,
            target: None,
            ability: None,
            melee: false,
            ranged: false,
            spell: false,
            critical: false,
            cancel: false,
            rng,
            damage_bonus: 0,
            damage_multiplier: 1.0,
            save_bonus: 0,
            save_bonus_buckets: BTreeMap::new(),
            advantage_sources: Vec::new(),
            disadvantage_sources: Vec::new(),
        }
    }

    pub fn add_damage_bonus(&mut self, amount: i32) {
        self.damage_bonus += amount;
    }

    pub fn multiply_damage(&mut self, factor: f64) {
        self.damage_multiplier *= factor;
    }

    /// Folds the accumulated bonus/multiplier onto `base`, rounding
    /// half-away-from-zero, matching the damage pipeline's own rounding rule.
    pub fn get_final_damage_value(&self, base: i32) -> i32 {
        round_half_away_from_zero((base + self.damage_bonus) as f64 * self.damage_multiplier) as i32
    }

    pub fn add_save_bonus(&mut self, amount: i32) {
        self.save_bonus += amount;
    }

    /// Aura-of-Protection-style bonus: only the strongest value per bucket
    /// name is retained.
    pub fn add_max_save_bonus(&mut self, bucket: impl Into<String>, amount: i32) {
        let entry = self.save_bonus_buckets.entry(bucket.into()).or_insert(amount);
        if amount > *entry {
            *entry = amount;
        }
    }

    pub fn total_save_bonus(&self) -> i32 {
        self.save_bonus + self.save_bonus_buckets.values().sum::<i32>()
    }

    pub fn add_advantage_source(&mut self, source: impl Into<String>) {
        let source = source.into();
        if !self.advantage_sources.contains(&source) {
            self.advantage_sources.push(source);
        }
    }

    pub fn add_disadvantage_source(&mut self, source: impl Into<String>) {
        let source = source.into();
        if !self.disadvantage_sources.contains(&source) {
            self.disadvantage_sources.push(source);
        }
    }

    pub fn advantage_sources(&self) -> &[String] {
        &self.advantage_sources
    }

    pub fn disadvantage_sources(&self) -> &[String] {
        &self.disadvantage_sources
    }
}

/// Capability set a rule-window provider implements. Providers are the one
/// genuinely open-ended kind in the core, so this is the one place using
/// dynamic dispatch rather than a closed enum.
pub trait RuleProvider {
    fn is_enabled(&self, ctx: &RuleEventContext) -> bool {
        let _ = ctx;
        true
    }

    fn on_window(&self, window: RuleWindow, ctx: &mut RuleEventContext);
}

struct Registration {
    owner: CombatantId,
    priority: i32,
    windows: std::collections::BTreeSet<RuleWindow>,
    registration_order: u64,
    provider: Box<dyn RuleProvider>,
}

/// Dispatches lifecycle windows to registered providers in priority order.
#[derive(Default)]
pub struct RuleWindowBus {
    providers: BTreeMap<String, Registration>,
    next_registration_order: u64,
}

impl RuleWindowBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider under `id`; re-registering the same id replaces
    /// it (and reassigns its registration order, placing it last among
    /// equal-priority providers).
    pub fn register(
        &mut self,
        id: impl Into<String>,
        owner: CombatantId,
        priority: i32,
        windows: impl IntoIterator<Item = RuleWindow>,
        provider: Box<dyn RuleProvider>,
    ) {
        let registration_order = self.next_registration_order;
        self.next_registration_order += 1;
        self.providers.insert(
            id.into(),
            Registration {
                owner,
                priority,
                windows: windows.into_iter().collect(),
                registration_order,
                provider,
            },
        );
    }

    pub fn unregister(&mut self, id: &str) -> bool {
        self.providers.remove(id).is_some()
    }

    pub fn unregister_by_owner(&mut self, owner: CombatantId) -> usize {
        let before = self.providers.len();
        self.providers.retain(|_, reg| reg.owner != owner);
        before - self.providers.len()
    }

    /// Dispatches `window` to every subscribed, enabled provider in
    /// `(priority, registration_order)` order. Stops early if a provider
    /// sets `ctx.cancel`. A panicking provider is trapped and logged; the
    /// rest of the batch still runs.
    pub fn dispatch(&self, window: RuleWindow, ctx: &mut RuleEventContext) {
        let mut ordered: Vec<&Registration> = self
            .providers
            .values()
            .filter(|reg| reg.windows.contains(&window))
            .collect();
        ordered.sort_by_key(|reg| (reg.priority, reg.registration_order));

        for registration in ordered {
            if !registration.provider.is_enabled(ctx) {
                continue;
            }
            let provider = registration.provider.as_ref();
            let result = catch_unwind(AssertUnwindSafe(|| provider.on_window(window, ctx)));
            if let Err(panic) = result {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic payload".to_string());
                tracing::warn!(window = ?window, error = %message, "rule-window provider panicked; skipping");
            }
            if ctx.cancel {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canceler;
    impl RuleProvider for Canceler {
        fn on_window(&self, _window: RuleWindow, ctx: &mut RuleEventContext) {
            ctx.cancel = true;
        }
    }

    struct Counter {
        calls: std::sync::Arc<std::sync::atomic::AtomicUsize>,
    }
    impl RuleProvider for Counter {
        fn on_window(&self, _window: RuleWindow, _ctx: &mut RuleEventContext) {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
    }

    struct AlwaysDisabled;
    impl RuleProvider for AlwaysDisabled {
        fn is_enabled(&self, _ctx: &RuleEventContext) -> bool {
            false
        }
        fn on_window(&self, _window: RuleWindow, ctx: &mut RuleEventContext) {
            ctx.add_damage_bonus(999);
        }
    }

    struct Panicker;
    impl RuleProvider for Panicker {
        fn on_window(&self, _window: RuleWindow, _ctx: &mut RuleEventContext) {
            panic!("boom");
        }
    }

    #[test]
    fn dispatch_stops_after_cancel() {
        let mut bus = RuleWindowBus::new();
        let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        bus.register("a", CombatantId::new(1), 0, [RuleWindow::BeforeDamage], Box::new(Canceler));
        bus.register(
            "b",
            CombatantId::new(1),
            1,
            [RuleWindow::BeforeDamage],
            Box::new(Counter { calls: calls.clone() }),
        );
        let mut rng = DeterministicRng::new(1);
        let mut ctx = RuleEventContext::new(&mut rng);
        bus.dispatch(RuleWindow::BeforeDamage, &mut ctx);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn disabled_provider_is_skipped_silently() {
        let mut bus = RuleWindowBus::new();
        bus.register("a", CombatantId::new(1), 0, [RuleWindow::BeforeDamage], Box::new(AlwaysDisabled));
        let mut rng = DeterministicRng::new(1);
        let mut ctx = RuleEventContext::new(&mut rng);
        bus.dispatch(RuleWindow::BeforeDamage, &mut ctx);
        assert_eq!(ctx.get_final_damage_value(10), 10);
    }

    #[test]
    fn panicking_provider_does_not_abort_the_batch() {
        let mut bus = RuleWindowBus::new();
        let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        bus.register("panics", CombatantId::new(1), 0, [RuleWindow::OnTurnStart], Box::new(Panicker));
        bus.register(
            "counts",
            CombatantId::new(1),
            1,
            [RuleWindow::OnTurnStart],
            Box::new(Counter { calls: calls.clone() }),
        );
        let mut rng = DeterministicRng::new(1);
        let mut ctx = RuleEventContext::new(&mut rng);
        bus.dispatch(RuleWindow::OnTurnStart, &mut ctx);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn max_save_bonus_bucket_keeps_strongest_only() {
        let mut rng = DeterministicRng::new(1);
        let mut ctx = RuleEventContext::new(&mut rng);
        ctx.add_max_save_bonus("aura", 2);
        ctx.add_max_save_bonus("aura", 5);
        ctx.add_max_save_bonus("aura", 1);
        assert_eq!(ctx.total_save_bonus(), 5);
    }

    #[test]
    fn unregister_by_owner_removes_all_its_providers() {
        let mut bus = RuleWindowBus::new();
        let owner = CombatantId::new(7);
        bus.register("a", owner, 0, [RuleWindow::OnTurnStart], Box::new(Canceler));
        bus.register("b", owner, 0, [RuleWindow::OnTurnEnd], Box::new(Canceler));
        assert_eq!(bus.unregister_by_owner(owner), 2);
    }
}
