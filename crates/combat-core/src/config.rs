//! Combat configuration constants and tunable parameters.

/// The core's few overridable knobs: default critical threshold, default
/// resolution-stack depth, and cover AC presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatConfig {
    /// Minimum natural d20 required for a critical hit. Overridable per query
    /// in `[2, 20]`.
    pub default_critical_threshold: u8,
    /// Maximum depth of the resolution stack before `StackOverflow`.
    pub max_resolution_depth: usize,
    /// AC bonus granted by half cover.
    pub half_cover_ac_bonus: i32,
    /// AC bonus granted by three-quarters cover.
    pub three_quarters_cover_ac_bonus: i32,
}

impl CombatConfig {
    // ===== compile-time constants used as fixed-capacity collection bounds =====
    pub const MAX_KNOWN_ACTIONS: usize = 16;
    pub const MAX_EQUIPMENT_SLOTS: usize = 12;
    pub const MAX_STATUS_EFFECTS: usize = 16;
    pub const MAX_RESISTANCE_BUCKETS: usize = 3;
    pub const DEATH_SAVE_CAP: u8 = 3;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CRITICAL_THRESHOLD: u8 = 20;
    pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 10;
    pub const HALF_COVER_AC_BONUS: i32 = 2;
    pub const THREE_QUARTERS_COVER_AC_BONUS: i32 = 5;

    pub const fn new() -> Self {
        Self {
            default_critical_threshold: Self::DEFAULT_CRITICAL_THRESHOLD,
            max_resolution_depth: Self::DEFAULT_MAX_RESOLUTION_DEPTH,
            half_cover_ac_bonus: Self::HALF_COVER_AC_BONUS,
            three_quarters_cover_ac_bonus: Self::THREE_QUARTERS_COVER_AC_BONUS,
        }
    }

    pub const fn with_max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = depth;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = CombatConfig::default();
        assert_eq!(cfg.default_critical_threshold, 20);
        assert_eq!(cfg.max_resolution_depth, 10);
        assert_eq!(cfg.half_cover_ac_bonus, 2);
        assert_eq!(cfg.three_quarters_cover_ac_bonus, 5);
    }
}
