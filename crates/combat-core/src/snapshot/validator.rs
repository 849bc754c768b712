//! Snapshot validation. The validator is the authoritative contract: any
//! JSON document that passes [`validate`] must restore cleanly into a live
//! combat instance.

use std::collections::{BTreeMap, BTreeSet};

use super::{CombatSnapshot, CURRENT_SCHEMA_VERSION};
use crate::combatant::LifeState;
use crate::config::CombatConfig;
use crate::error::{CoreError, ErrorSeverity};
use crate::ids::CombatantId;

/// One reason a snapshot was rejected. Multiple issues are collected rather
/// than failing fast, so a caller can report everything wrong at once.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("schema version {0} is out of range (must be 1..={CURRENT_SCHEMA_VERSION})")]
    BadSchemaVersion(u32),
    #[error("negative RNG roll index {0}")]
    NegativeRollIndex(i64),
    #[error("combatant list is empty")]
    EmptyCombatantList,
    #[error("duplicate combatant id {0}")]
    DuplicateCombatantId(CombatantId),
    #[error("combatant {0} is alive with negative HP")]
    NegativeHpOnLiveCombatant(CombatantId),
    #[error("combatant {0} has non-positive max HP")]
    NonPositiveMaxHp(CombatantId),
    #[error("turn order references unknown combatant {0}")]
    UnknownCombatantInTurnOrder(CombatantId),
    #[error("turn index {index} >= turn order length {len}")]
    TurnIndexOutOfRange { index: usize, len: usize },
    #[error("status {status} targets unknown combatant {target}")]
    StatusTargetsUnknownCombatant {
        status: crate::ids::StatusInstanceId,
        target: CombatantId,
    },
    #[error("combatant {combatant} knows {count} actions, over the {limit} cap")]
    TooManyKnownActions {
        combatant: CombatantId,
        count: usize,
        limit: usize,
    },
    #[error("combatant {combatant} has {count} equipment slots, over the {limit} cap")]
    TooManyEquipmentSlots {
        combatant: CombatantId,
        count: usize,
        limit: usize,
    },
    #[error("combatant {combatant} carries {count} active statuses, over the {limit} cap")]
    TooManyActiveStatuses {
        combatant: CombatantId,
        count: usize,
        limit: usize,
    },
}

impl CoreError for ValidationIssue {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }
}

/// Validates `snapshot`, returning every issue found. An empty result means
/// the snapshot is safe to restore.
pub fn validate(snapshot: &CombatSnapshot) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if snapshot.schema_version == 0 || snapshot.schema_version > CURRENT_SCHEMA_VERSION {
        issues.push(ValidationIssue::BadSchemaVersion(snapshot.schema_version));
    }
    if snapshot.rng.roll_index < 0 {
        issues.push(ValidationIssue::NegativeRollIndex(snapshot.rng.roll_index));
    }

    if snapshot.combatants.is_empty() {
        issues.push(ValidationIssue::EmptyCombatantList);
    }

    let mut seen_ids = BTreeSet::new();
    for combatant in &snapshot.combatants {
        if !seen_ids.insert(combatant.id) {
            issues.push(ValidationIssue::DuplicateCombatantId(combatant.id));
        }
        if combatant.current_hp < 0 && combatant.life_state != LifeState::Dead {
            issues.push(ValidationIssue::NegativeHpOnLiveCombatant(combatant.id));
        }
        if combatant.max_hp <= 0 {
            issues.push(ValidationIssue::NonPositiveMaxHp(combatant.id));
        }
        if combatant.known_action_ids.len() > CombatConfig::MAX_KNOWN_ACTIONS {
            issues.push(ValidationIssue::TooManyKnownActions {
                combatant: combatant.id,
                count: combatant.known_action_ids.len(),
                limit: CombatConfig::MAX_KNOWN_ACTIONS,
            });
        }
        if combatant.equipment_slots.len() > CombatConfig::MAX_EQUIPMENT_SLOTS {
            issues.push(ValidationIssue::TooManyEquipmentSlots {
                combatant: combatant.id,
                count: combatant.equipment_slots.len(),
                limit: CombatConfig::MAX_EQUIPMENT_SLOTS,
            });
        }
    }

    let mut statuses_per_combatant: BTreeMap<CombatantId, usize> = BTreeMap::new();
    for status in &snapshot.statuses {
        *statuses_per_combatant.entry(status.target).or_insert(0) += 1;
    }
    for (combatant, count) in statuses_per_combatant {
        if count > CombatConfig::MAX_STATUS_EFFECTS {
            issues.push(ValidationIssue::TooManyActiveStatuses {
                combatant,
                count,
                limit: CombatConfig::MAX_STATUS_EFFECTS,
            });
        }
    }

    let known_ids: BTreeSet<CombatantId> = snapshot.combatants.iter().map(|c| c.id).collect();
    for id in &snapshot.flow.turn_order {
        if !known_ids.contains(id) {
            issues.push(ValidationIssue::UnknownCombatantInTurnOrder(*id));
        }
    }
    if !snapshot.flow.turn_order.is_empty()
        && snapshot.flow.current_turn_index >= snapshot.flow.turn_order.len()
    {
        issues.push(ValidationIssue::TurnIndexOutOfRange {
            index: snapshot.flow.current_turn_index,
            len: snapshot.flow.turn_order.len(),
        });
    }

    // Duration is stored as `u32`, so a negative value cannot survive
    // deserialization in the first place; that failure surfaces at the
    // deserialize layer rather than here.
    for status in &snapshot.statuses {
        if !known_ids.contains(&status.target) {
            issues.push(ValidationIssue::StatusTargetsUnknownCombatant {
                status: status.id,
                target: status.target,
            });
        }
    }

    issues
}
