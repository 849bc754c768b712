//! C1: Deterministic RNG.
//!
//! A seeded xorshift64* generator with explicit, pinned constants so that
//! `(seed, sequence_of_calls)` produces bitwise-identical output on every
//! platform. State is `(seed, roll_index)`; `roll_index` increments once per
//! primitive draw (one die roll, including each half of an advantage pair).
//! There is no operation that rewinds `roll_index` in place — restoring an
//! earlier state always goes through [`DeterministicRng::set_state`], which
//! re-seeds from scratch and replays forward.

use crate::error::{CoreError, ErrorContext, ErrorSeverity};
use crate::ids::CombatantId;

/// Errors raised by the deterministic RNG.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RngError {
    #[error("invalid roll index {roll_index} (must be >= 0)")]
    InvalidArgument {
        roll_index: i64,
        context: ErrorContext,
    },
}

impl CoreError for RngError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RngError::InvalidArgument { .. } => ErrorSeverity::Validation,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            RngError::InvalidArgument { context, .. } => Some(context),
        }
    }
}

/// The result of rolling a single d20 under advantage or disadvantage: the
/// value that was kept, followed by the two raw draws in roll order.
pub type AdvantagePair = (u32, u32, u32);

/// Seeded, replayable RNG. One instance per combat instance; never shared.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeterministicRng {
    seed: u64,
    roll_index: i64,
    state: u64,
}

// Fixed xorshift64* constants. Pinned so output never depends on the host
// platform's default PRNG.
const XORSHIFT_A: u32 = 12;
const XORSHIFT_B: u32 = 25;
const XORSHIFT_C: u32 = 27;
const STAR_MULTIPLIER: u64 = 0x2545_F491_4F6C_DD1D;

/// SplitMix64 seed expansion, used once to derive a non-zero initial xorshift
/// state from an arbitrary `u64` seed (xorshift64* cannot start from zero).
fn splitmix64_init(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    let z = z ^ (z >> 31);
    if z == 0 {
        0x9E37_79B9_7F4A_7C15
    } else {
        z
    }
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            roll_index: 0,
            state: splitmix64_init(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn roll_index(&self) -> i64 {
        self.roll_index
    }

    /// Re-seeds and replays `roll_index` primitive draws, discarding their
    /// output, to restore the RNG to the state it held after that many draws.
    pub fn set_state(&mut self, seed: u64, roll_index: i64) -> Result<(), RngError> {
        if roll_index < 0 {
            return Err(RngError::InvalidArgument {
                roll_index,
                context: ErrorContext::new().with_message("set_state"),
            });
        }
        self.seed = seed;
        self.state = splitmix64_init(seed);
        self.roll_index = 0;
        for _ in 0..roll_index {
            self.next_u64();
        }
        debug_assert_eq!(self.roll_index, roll_index);
        Ok(())
    }

    /// One primitive draw: advances `roll_index` by one.
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << XORSHIFT_A;
        x ^= x >> XORSHIFT_B;
        x ^= x << XORSHIFT_C;
        self.state = x;
        self.roll_index += 1;
        x.wrapping_mul(STAR_MULTIPLIER)
    }

    /// Uniform draw in `[1, sides]`. `sides` must be >= 1.
    fn roll_die(&mut self, sides: u32) -> u32 {
        debug_assert!(sides >= 1);
        1 + (self.next_u64() % sides as u64) as u32
    }

    pub fn roll_d20(&mut self) -> u32 {
        self.roll_die(20)
    }

    /// Rolls `count` dice of `sides` and sums them plus `bonus`.
    pub fn roll(&mut self, count: u32, sides: u32, bonus: i32) -> i32 {
        let mut total: i32 = bonus;
        for _ in 0..count {
            total += self.roll_die(sides) as i32;
        }
        total
    }

    /// Rolls two d20s, keeping the higher. Returns `(taken, first, second)`.
    pub fn roll_with_advantage(&mut self) -> AdvantagePair {
        let a = self.roll_d20();
        let b = self.roll_d20();
        (a.max(b), a, b)
    }

    /// Rolls two d20s, keeping the lower. Returns `(taken, first, second)`.
    pub fn roll_with_disadvantage(&mut self) -> AdvantagePair {
        let a = self.roll_d20();
        let b = self.roll_d20();
        (a.min(b), a, b)
    }
}

/// Advantage/disadvantage resolution, shared by attack rolls, saves, and
/// contests: sources cancel pairwise, any-advantage plus any-disadvantage
/// is Normal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AdvantageState {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl AdvantageState {
    /// Resolves the 5e rule: any advantage source + any disadvantage source
    /// cancels to Normal; otherwise whichever side has sources wins.
    pub fn resolve(advantage_sources: &[&str], disadvantage_sources: &[&str]) -> Self {
        match (
            advantage_sources.is_empty(),
            disadvantage_sources.is_empty(),
        ) {
            (false, true) => AdvantageState::Advantage,
            (true, false) => AdvantageState::Disadvantage,
            _ => AdvantageState::Normal,
        }
    }
}

/// Rolls a single d20 resolved through an [`AdvantageState`], re-rolling a
/// natural 1 exactly once per "lucky" source on the attacker (the re-roll's
/// result is used even if it is also 1).
pub fn roll_resolved(
    rng: &mut DeterministicRng,
    state: AdvantageState,
    lucky: bool,
    _attacker: Option<CombatantId>,
) -> AdvantagePair {
    let mut result = match state {
        AdvantageState::Normal => {
            let a = rng.roll_d20();
            (a, a, a)
        }
        AdvantageState::Advantage => rng.roll_with_advantage(),
        AdvantageState::Disadvantage => rng.roll_with_disadvantage(),
    };
    if lucky && result.0 == 1 {
        let rerolled = rng.roll_d20();
        result = (rerolled, result.1, result.2);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = DeterministicRng::new(42);
        let mut b = DeterministicRng::new(42);
        for _ in 0..50 {
            assert_eq!(a.roll_d20(), b.roll_d20());
        }
        assert_eq!(a.roll_index(), b.roll_index());
    }

    #[test]
    fn set_state_replays_to_same_point() {
        let mut original = DeterministicRng::new(7);
        let draws: Vec<u32> = (0..10).map(|_| original.roll_d20()).collect();

        let mut restored = DeterministicRng::new(999);
        restored.set_state(7, 5).unwrap();
        let mut replay = DeterministicRng::new(7);
        for _ in 0..5 {
            replay.roll_d20();
        }
        assert_eq!(restored.roll_index(), replay.roll_index());

        let tail: Vec<u32> = (0..5).map(|_| restored.roll_d20()).collect();
        let expected_tail = &draws[5..10];
        assert_eq!(tail, expected_tail);
    }

    #[test]
    fn negative_roll_index_rejected() {
        let mut rng = DeterministicRng::new(1);
        let err = rng.set_state(1, -1).unwrap_err();
        assert!(matches!(err, RngError::InvalidArgument { roll_index: -1, .. }));
    }

    #[test]
    fn roll_index_increments_once_per_draw() {
        let mut rng = DeterministicRng::new(1);
        assert_eq!(rng.roll_index(), 0);
        rng.roll_d20();
        assert_eq!(rng.roll_index(), 1);
        rng.roll_with_advantage();
        assert_eq!(rng.roll_index(), 3);
    }

    #[test]
    fn advantage_resolution_cancels_pairwise() {
        assert_eq!(
            AdvantageState::resolve(&["a"], &["b"]),
            AdvantageState::Normal
        );
        assert_eq!(AdvantageState::resolve(&["a"], &[]), AdvantageState::Advantage);
        assert_eq!(
            AdvantageState::resolve(&[], &["b"]),
            AdvantageState::Disadvantage
        );
        assert_eq!(AdvantageState::resolve(&[], &[]), AdvantageState::Normal);
    }

    #[test]
    fn hit_chance_never_advances_roll_index() {
        let mut rng = DeterministicRng::new(3);
        let before = rng.roll_index();
        let _ = crate::evaluator::hit_chance::calculate_hit_chance(15, 2, AdvantageState::Normal);
        assert_eq!(rng.roll_index(), before);
        let _ = &mut rng;
    }
}
