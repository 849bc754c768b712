//! Resource pools: leveled (spell slots keyed by level) and flat (keyed by
//! name), each tracking current/max.

use std::collections::BTreeMap;

/// A single current/max pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ResourceValue {
    pub current: i32,
    pub max: i32,
}

impl ResourceValue {
    pub fn new(current: i32, max: i32) -> Self {
        Self { current, max }
    }
}

/// Leveled and flat resource pools for a single combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ResourcePool {
    /// Spell-slot-like resources keyed by level (1..=9, typically).
    pub leveled: BTreeMap<u8, ResourceValue>,
    /// Named resources (e.g. "ki_points", "rage_charges").
    pub flat: BTreeMap<String, ResourceValue>,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_leveled_max(&mut self, level: u8, max: i32) {
        let entry = self.leveled.entry(level).or_insert(ResourceValue::new(0, 0));
        entry.max = max;
        entry.current = entry.current.min(max);
    }

    pub fn set_flat_max(&mut self, name: impl Into<String>, max: i32) {
        let entry = self
            .flat
            .entry(name.into())
            .or_insert(ResourceValue::new(0, 0));
        entry.max = max;
        entry.current = entry.current.min(max);
    }

    /// Spends `amount` from a leveled resource. Fails without mutation if it
    /// would go negative.
    pub fn spend_leveled(&mut self, level: u8, amount: i32) -> bool {
        match self.leveled.get_mut(&level) {
            Some(value) if value.current >= amount => {
                value.current -= amount;
                true
            }
            _ => false,
        }
    }

    pub fn spend_flat(&mut self, name: &str, amount: i32) -> bool {
        match self.flat.get_mut(name) {
            Some(value) if value.current >= amount => {
                value.current -= amount;
                true
            }
            _ => false,
        }
    }

    /// Composite snapshot keys for leveled resources, e.g. `"spell:L3"` for
    /// a resource named `"spell"` at level 3.
    pub fn leveled_key(name: &str, level: u8) -> String {
        format!("{name}:L{level}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_leveled_rejects_overdraw() {
        let mut pool = ResourcePool::new();
        pool.set_leveled_max(3, 2);
        pool.leveled.get_mut(&3).unwrap().current = 2;
        assert!(!pool.spend_leveled(3, 3));
        assert!(pool.spend_leveled(3, 2));
        assert_eq!(pool.leveled[&3].current, 0);
    }
}
