//! C4: Rules Evaluator. Query entry points orchestrating C1 (RNG), C2
//! (modifiers), and C3 (boosts); emits structured breakdowns.

pub mod ac;
pub mod attack;
pub mod contest;
pub mod damage_roll;
pub mod healing;
pub mod hit_chance;
pub mod save;

use crate::damage::BreakdownEntry;
use crate::modifier::AppliedModifier;
use crate::rng::AdvantageState;

/// Shared result shape for every query entry point.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryResult {
    pub base_value: f64,
    pub natural_d20: Option<u32>,
    pub final_value: f64,
    pub applied_modifiers: Vec<AppliedModifier>,
    pub success: Option<bool>,
    pub critical_hit: bool,
    pub critical_failure: bool,
    pub advantage_state: AdvantageState,
    pub die_values: Option<(u32, u32)>,
    pub target_ac: Option<i32>,
    pub breakdown: Vec<BreakdownEntry>,
}

impl QueryResult {
    pub(crate) fn new(base_value: f64) -> Self {
        Self {
            base_value,
            natural_d20: None,
            final_value: base_value,
            applied_modifiers: Vec::new(),
            success: None,
            critical_hit: false,
            critical_failure: false,
            advantage_state: AdvantageState::Normal,
            die_values: None,
            target_ac: None,
            breakdown: Vec::new(),
        }
    }
}
