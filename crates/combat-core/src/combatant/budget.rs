//! Action economy: the three per-turn booleans plus movement floats.

bitflags::bitflags! {
    /// Which action-economy resources a combatant has left to spend this
    /// turn. Modeled as a bitflags set rather than three ad-hoc bools, since
    /// it recurs across the snapshot serialization boundary.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ActionFlags: u8 {
        const ACTION   = 0b0000_0001;
        const BONUS    = 0b0000_0010;
        const REACTION = 0b0000_0100;
    }
}

/// Action budget for one combatant's current turn.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ActionBudget {
    pub flags: ActionFlags,
    pub remaining_movement: f64,
    pub max_movement: f64,
}

impl ActionBudget {
    pub fn new(max_movement: f64) -> Self {
        Self {
            flags: ActionFlags::all(),
            remaining_movement: max_movement,
            max_movement,
        }
    }

    pub fn has_action(&self) -> bool {
        self.flags.contains(ActionFlags::ACTION)
    }

    pub fn has_bonus(&self) -> bool {
        self.flags.contains(ActionFlags::BONUS)
    }

    pub fn has_reaction(&self) -> bool {
        self.flags.contains(ActionFlags::REACTION)
    }

    /// Spends the action, if available. Returns false and leaves the budget
    /// untouched if the action was already spent.
    pub fn spend_action(&mut self) -> bool {
        if self.has_action() {
            self.flags.remove(ActionFlags::ACTION);
            true
        } else {
            false
        }
    }

    pub fn spend_bonus(&mut self) -> bool {
        if self.has_bonus() {
            self.flags.remove(ActionFlags::BONUS);
            true
        } else {
            false
        }
    }

    pub fn spend_reaction(&mut self) -> bool {
        if self.has_reaction() {
            self.flags.remove(ActionFlags::REACTION);
            true
        } else {
            false
        }
    }

    /// Spends `amount` of remaining movement. Fails without mutation if it
    /// would go negative, matching the core's "consumption that would go
    /// negative fails the attempt" recovery policy.
    pub fn spend_movement(&mut self, amount: f64) -> bool {
        if amount < 0.0 || amount > self.remaining_movement {
            false
        } else {
            self.remaining_movement -= amount;
            true
        }
    }

    /// Resets action/bonus/reaction and movement for a new turn.
    pub fn reset_for_turn(&mut self) {
        self.flags = ActionFlags::all();
        self.remaining_movement = self.max_movement;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_action_twice_fails_second_time() {
        let mut budget = ActionBudget::new(9.0);
        assert!(budget.spend_action());
        assert!(!budget.spend_action());
    }

    #[test]
    fn spend_movement_rejects_overdraw_without_mutating() {
        let mut budget = ActionBudget::new(9.0);
        assert!(!budget.spend_movement(10.0));
        assert_eq!(budget.remaining_movement, 9.0);
        assert!(budget.spend_movement(4.0));
        assert_eq!(budget.remaining_movement, 5.0);
    }
}
