//! Applied status instances. Status *definitions* (duration type, stacking
//! policy, modifiers, tick/trigger effects) are content, loaded by
//! `combat-content`; this module models only the runtime instance the arena
//! tracks per combatant.

use std::collections::BTreeMap;

use crate::ids::{CombatantId, StatusInstanceId};

/// How a status's remaining duration is measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusDuration {
    Turns(u32),
    Rounds(u32),
    Permanent,
    UntilEvent,
}

/// How a reapplied status combines with an existing instance on the same
/// target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StackingPolicy {
    #[default]
    Refresh,
    Replace,
    Extend,
    Stack,
    Unique,
}

/// One applied status instance on a combatant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StatusInstance {
    pub id: StatusInstanceId,
    pub definition_id: String,
    pub target: CombatantId,
    pub source: Option<CombatantId>,
    pub stack_count: u32,
    pub remaining_duration: StatusDuration,
    pub data: BTreeMap<String, String>,
}

impl StatusInstance {
    pub fn new(id: StatusInstanceId, definition_id: impl Into<String>, target: CombatantId) -> Self {
        Self {
            id,
            definition_id: definition_id.into(),
            target,
            source: None,
            stack_count: 1,
            remaining_duration: StatusDuration::Permanent,
            data: BTreeMap::new(),
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.remaining_duration, StatusDuration::Turns(0) | StatusDuration::Rounds(0))
    }

    /// Decrements a turn-based or round-based duration by one; permanent and
    /// event-bound durations are unaffected.
    pub fn tick(&mut self) {
        self.remaining_duration = match self.remaining_duration {
            StatusDuration::Turns(n) => StatusDuration::Turns(n.saturating_sub(1)),
            StatusDuration::Rounds(n) => StatusDuration::Rounds(n.saturating_sub(1)),
            other => other,
        };
    }

    /// Applies `policy` when a status with the same definition is reapplied.
    pub fn reapply(&mut self, policy: StackingPolicy, incoming_duration: StatusDuration) {
        match policy {
            StackingPolicy::Refresh => self.remaining_duration = incoming_duration,
            StackingPolicy::Replace => self.remaining_duration = incoming_duration,
            StackingPolicy::Extend => {
                self.remaining_duration = match (self.remaining_duration, incoming_duration) {
                    (StatusDuration::Turns(a), StatusDuration::Turns(b)) => StatusDuration::Turns(a + b),
                    (StatusDuration::Rounds(a), StatusDuration::Rounds(b)) => StatusDuration::Rounds(a + b),
                    (_, incoming) => incoming,
                };
            }
            StackingPolicy::Stack => self.stack_count += 1,
            StackingPolicy::Unique => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_decrements_turn_duration_without_underflow() {
        let mut status = StatusInstance::new(StatusInstanceId::new(1), "prone", CombatantId::new(1));
        status.remaining_duration = StatusDuration::Turns(1);
        status.tick();
        assert!(status.is_expired());
        status.tick();
        assert!(status.is_expired());
    }

    #[test]
    fn stack_policy_increments_count_instead_of_duration() {
        let mut status = StatusInstance::new(StatusInstanceId::new(1), "bleed", CombatantId::new(1));
        status.reapply(StackingPolicy::Stack, StatusDuration::Turns(3));
        assert_eq!(status.stack_count, 2);
    }

    #[test]
    fn extend_policy_sums_matching_duration_kinds() {
        let mut status = StatusInstance::new(StatusInstanceId::new(1), "burning", CombatantId::new(1));
        status.remaining_duration = StatusDuration::Turns(2);
        status.reapply(StackingPolicy::Extend, StatusDuration::Turns(3));
        assert_eq!(status.remaining_duration, StatusDuration::Turns(5));
    }
}
