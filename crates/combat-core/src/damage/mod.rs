//! C5: Damage Pipeline. A seven-stage ordered reduction from base damage to
//! HP effect, with deduplicated target resist/vuln/immunity and layered
//! absorption (barrier -> temp HP -> current HP).

use crate::dice::round_half_away_from_zero;
use crate::modifier::{Modifier, ModifierKind, ModifierTarget};

/// Closed set of damage types. `Display` renders the canonical lowercase tag
/// (`"fire"`); parsing is case-insensitive so DSL-style `"Fire"` also works.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageType {
    Fire,
    Cold,
    Lightning,
    Poison,
    Acid,
    Thunder,
    Necrotic,
    Radiant,
    Psychic,
    Force,
    Bludgeoning,
    Piercing,
    Slashing,
    #[default]
    Untyped,
}

/// One entry in a structured breakdown, shared by damage, attack, and save
/// results.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BreakdownEntry {
    pub label: String,
    pub value: f64,
    pub source: String,
}

impl BreakdownEntry {
    pub fn new(label: impl Into<String>, value: f64, source: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value,
            source: source.into(),
        }
    }
}

/// Input to the damage pipeline: base damage plus the already-filtered
/// modifier list applicable to this attack (both `DamageDealt` on the
/// source and `DamageTaken` on the target).
#[derive(Clone, Debug)]
pub struct DamageContext {
    pub base: i32,
    pub modifiers: Vec<Modifier>,
    pub target_temp_hp: i32,
    pub target_current_hp: i32,
    pub target_barrier: Option<i32>,
    pub damage_type: DamageType,
}

/// Every intermediate value the pipeline produces, plus a breakdown.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageResult {
    pub base: i32,
    pub after_source_flat: i32,
    pub after_source_percentage: i32,
    pub after_target_multipliers: i32,
    pub after_target_flat: i32,
    pub final_damage: i32,
    pub absorbed_by_barrier: i32,
    pub absorbed_by_temp_hp: i32,
    pub applied_to_hp: i32,
    pub overkill: i32,
    pub breakdown: Vec<BreakdownEntry>,
}

fn sorted_by_priority<'a>(modifiers: &'a [Modifier], target: &ModifierTarget, kind: ModifierKind) -> Vec<&'a Modifier> {
    let mut matches: Vec<&Modifier> = modifiers
        .iter()
        .filter(|m| &m.target == target && m.kind == kind)
        .collect();
    matches.sort_by_key(|m| (m.priority, m.insertion_order));
    matches
}

/// Runs the seven-stage pipeline described by the rules, in order, exactly
/// once per call.
pub fn run_damage_pipeline(ctx: &DamageContext) -> DamageResult {
    let mut breakdown = Vec::new();

    // Stage 1: base.
    let base = ctx.base;
    breakdown.push(BreakdownEntry::new("base", base as f64, "base"));

    // Stage 2: additive source bonuses (Flat, DamageDealt), priority order.
    let mut running = base as f64;
    for m in sorted_by_priority(&ctx.modifiers, &ModifierTarget::DamageDealt, ModifierKind::Flat) {
        running += m.value;
        breakdown.push(BreakdownEntry::new("source_flat", m.value, m.source.clone()));
    }
    let after_source_flat = round_half_away_from_zero(running) as i32;
    running = after_source_flat as f64;

    // Stage 3: source percentage bonuses, sequential, rounding after each.
    for m in sorted_by_priority(&ctx.modifiers, &ModifierTarget::DamageDealt, ModifierKind::Percentage) {
        running = round_half_away_from_zero(running * (1.0 + m.value / 100.0)) as f64;
        breakdown.push(BreakdownEntry::new("source_percentage", m.value, m.source.clone()));
    }
    let after_source_percentage = running as i32;

    // Stage 4: target multipliers, deduplicated per bucket.
    let taken_percentages = sorted_by_priority(&ctx.modifiers, &ModifierTarget::DamageTaken, ModifierKind::Percentage);
    let immunity = taken_percentages
        .iter()
        .filter(|m| m.value <= -100.0)
        .min_by(|a, b| a.value.partial_cmp(&b.value).unwrap());
    let resistance = taken_percentages
        .iter()
        .filter(|m| m.value > -100.0 && m.value < 0.0)
        .min_by(|a, b| a.value.partial_cmp(&b.value).unwrap());
    let vulnerability = taken_percentages
        .iter()
        .filter(|m| m.value > 0.0)
        .max_by(|a, b| a.value.partial_cmp(&b.value).unwrap());

    for selected in [immunity, resistance, vulnerability] {
        if let Some(m) = selected {
            running = round_half_away_from_zero(running * (1.0 + m.value / 100.0)) as f64;
            breakdown.push(BreakdownEntry::new("target_multiplier", m.value, m.source.clone()));
        }
    }
    let after_target_multipliers = running as i32;

    // Stage 5: target flat reductions (typically negative).
    for m in sorted_by_priority(&ctx.modifiers, &ModifierTarget::DamageTaken, ModifierKind::Flat) {
        running += m.value;
        breakdown.push(BreakdownEntry::new("target_flat", m.value, m.source.clone()));
    }
    let after_target_flat = running as i32;

    // Stage 6: floor at zero.
    let final_damage = after_target_flat.max(0);

    // Stage 7: layered absorption: barrier -> temp HP -> current HP.
    let mut remaining = final_damage;
    let mut absorbed_by_barrier = 0;
    if let Some(barrier) = ctx.target_barrier {
        absorbed_by_barrier = remaining.min(barrier.max(0));
        remaining -= absorbed_by_barrier;
    }
    let absorbed_by_temp_hp = remaining.min(ctx.target_temp_hp.max(0));
    remaining -= absorbed_by_temp_hp;
    let applied_to_hp = remaining.min(ctx.target_current_hp.max(0));
    let overkill = (remaining - applied_to_hp).max(0);

    DamageResult {
        base,
        after_source_flat,
        after_source_percentage,
        after_target_multipliers,
        after_target_flat,
        final_damage,
        absorbed_by_barrier,
        absorbed_by_temp_hp,
        applied_to_hp,
        overkill,
        breakdown,
    }
}
