//! C6 (part 2): the resolution stack. A bounded LIFO of in-flight actions,
//! reactions, and effects, supporting nested interrupts: a reaction pushes
//! above the action it interrupts and pops before it.

use crate::error::{CoreError, ErrorContext, ErrorSeverity};
use crate::ids::{IdCounter, ResolutionItemId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    #[error("resolution stack exceeded max depth {max_depth}")]
    StackOverflow {
        max_depth: usize,
        context: ErrorContext,
    },
}

impl CoreError for StackError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            StackError::StackOverflow { context, .. } => Some(context),
        }
    }
}

/// One in-flight action, reaction, or effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ResolutionItem {
    pub id: ResolutionItemId,
    pub action_type: String,
    pub source: crate::ids::CombatantId,
    pub target: Option<crate::ids::CombatantId>,
    pub cancelled: bool,
    /// 0 at top level; each nested push increments.
    pub depth: usize,
    pub payload: Vec<u8>,
}

/// Bounded LIFO resolution stack. `max_depth` is fixed at construction time
/// from [`crate::config::CombatConfig`].
#[derive(Clone, Debug, Default)]
pub struct ResolutionStack {
    items: Vec<ResolutionItem>,
    max_depth: usize,
    ids: IdCounter,
}

impl ResolutionStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            items: Vec::new(),
            max_depth,
            ids: IdCounter::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every item, bottom to top. For snapshot capture only.
    pub fn items(&self) -> &[ResolutionItem] {
        &self.items
    }

    /// Replaces the stack's contents wholesale with previously-captured
    /// items, preserving their original ids, and re-bases the id counter
    /// above the highest one seen so new pushes never collide.
    pub fn restore(&mut self, items: Vec<ResolutionItem>) {
        let next = items.iter().map(|item| item.id.get()).max().map_or(1, |m| m + 1);
        self.items = items;
        self.ids = IdCounter::starting_at(next);
    }

    /// Pushes a new item on top. Fails without mutation if this would exceed
    /// `max_depth`.
    pub fn push(
        &mut self,
        action_type: impl Into<String>,
        source: crate::ids::CombatantId,
        target: Option<crate::ids::CombatantId>,
        payload: Vec<u8>,
    ) -> Result<ResolutionItemId, StackError> {
        if self.items.len() >= self.max_depth {
            return Err(StackError::StackOverflow {
                max_depth: self.max_depth,
                context: ErrorContext::new(),
            });
        }
        let id = ResolutionItemId::new(self.ids.next_raw());
        let depth = self.items.len();
        self.items.push(ResolutionItem {
            id,
            action_type: action_type.into(),
            source,
            target,
            cancelled: false,
            depth,
            payload,
        });
        Ok(id)
    }

    /// Pops the top item, if any. A cancelled item still pops; the caller is
    /// responsible for skipping its effects.
    pub fn pop(&mut self) -> Option<ResolutionItem> {
        self.items.pop()
    }

    pub fn top(&self) -> Option<&ResolutionItem> {
        self.items.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut ResolutionItem> {
        self.items.last_mut()
    }

    /// Marks the current top item cancelled without popping it.
    pub fn cancel_current(&mut self) {
        if let Some(top) = self.top_mut() {
            top.cancelled = true;
        }
    }

    /// Replaces the top item's payload in place, for providers that adjust
    /// an in-flight action (e.g. a Shield reaction raising AC mid-resolution).
    pub fn modify_current(&mut self, payload: Vec<u8>) {
        if let Some(top) = self.top_mut() {
            top.payload = payload;
        }
    }

    /// Pops everything with no effects, for save/load restoration.
    pub fn reset(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::CombatantId;

    #[test]
    fn push_past_max_depth_fails_without_mutation() {
        let mut stack = ResolutionStack::new(1);
        stack.push("attack", CombatantId::new(1), None, Vec::new()).unwrap();
        let err = stack.push("attack", CombatantId::new(1), None, Vec::new()).unwrap_err();
        assert!(matches!(err, StackError::StackOverflow { max_depth: 1, .. }));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn nested_reaction_pushes_above_parent_and_pops_first() {
        let mut stack = ResolutionStack::new(10);
        let attack = stack.push("attack", CombatantId::new(1), Some(CombatantId::new(2)), Vec::new()).unwrap();
        stack.push("shield_reaction", CombatantId::new(2), None, Vec::new()).unwrap();
        assert_eq!(stack.depth(), 2);
        let reaction = stack.pop().unwrap();
        assert_eq!(reaction.action_type, "shield_reaction");
        let top = stack.top().unwrap();
        assert_eq!(top.id, attack);
        stack.pop();
        assert!(stack.is_empty());
    }

    #[test]
    fn cancelled_item_still_pops() {
        let mut stack = ResolutionStack::new(10);
        stack.push("attack", CombatantId::new(1), None, Vec::new()).unwrap();
        stack.cancel_current();
        let item = stack.pop().unwrap();
        assert!(item.cancelled);
    }

    #[test]
    fn reset_clears_with_no_effects() {
        let mut stack = ResolutionStack::new(10);
        stack.push("attack", CombatantId::new(1), None, Vec::new()).unwrap();
        stack.reset();
        assert!(stack.is_empty());
    }
}
