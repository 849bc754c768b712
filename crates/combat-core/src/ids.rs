//! Stable identifiers used across the core. All cross-component references
//! go through these newtypes rather than direct pointers, per the ownership
//! rule that only the arena holds combatants directly.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

macro_rules! id_newtype {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u64);

        impl $name {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

id_newtype!(CombatantId, "Identifies a combatant within an arena.");
id_newtype!(ModifierId, "Identifies a single modifier instance within a stack.");
id_newtype!(StatusInstanceId, "Identifies an applied status instance.");
id_newtype!(SurfaceInstanceId, "Identifies an applied surface instance.");
id_newtype!(ResolutionItemId, "Identifies a resolution stack item.");
id_newtype!(ConcentrationId, "Identifies an active concentration link.");
id_newtype!(PropId, "Identifies a spawned prop.");
id_newtype!(ReactionPromptId, "Identifies a pending reaction prompt.");

/// Monotonically increasing id generator, one per combat instance.
///
/// Each combat instance owns its own counter: ids are unique within a combat
/// but not across independent combat instances (the core shares no global
/// mutable state between instances).
#[derive(Debug, Default)]
pub struct IdCounter {
    next: AtomicU64,
}

impl IdCounter {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Builds a counter that issues `next` first, then onward. Used when
    /// restoring from a snapshot so freshly issued ids can't collide with
    /// ones already present in the restored state.
    pub const fn starting_at(next: u64) -> Self {
        Self {
            next: AtomicU64::new(next),
        }
    }

    /// Returns a fresh, never-before-issued raw id.
    pub fn next_raw(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Clone for IdCounter {
    fn clone(&self) -> Self {
        Self {
            next: AtomicU64::new(self.next.load(Ordering::Relaxed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_issues_distinct_increasing_ids() {
        let counter = IdCounter::new();
        let a = counter.next_raw();
        let b = counter.next_raw();
        assert_ne!(a, b);
        assert!(b > a);
    }
}
