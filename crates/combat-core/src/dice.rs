//! Dice formula parsing: `NdM` with an optional leading sign, as used by
//! Dice modifiers, boost `RollBonus` clauses, and ability damage formulas.

use crate::error::{CoreError, ErrorContext, ErrorSeverity};
use crate::rng::DeterministicRng;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiceParseError {
    #[error("malformed dice formula '{formula}': {reason}")]
    Malformed {
        formula: String,
        reason: &'static str,
        context: ErrorContext,
    },
}

impl CoreError for DiceParseError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            DiceParseError::Malformed { context, .. } => Some(context),
        }
    }
}

/// A parsed `NdM` dice formula, with an optional negating sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceFormula {
    pub negative: bool,
    pub count: u32,
    pub sides: u32,
}

impl DiceFormula {
    /// Parses e.g. `"2d6"`, `"-1d4"`, `"1d20"`. Whitespace around the whole
    /// string is trimmed; the body must be exactly `[-]<digits>d<digits>`.
    pub fn parse(formula: &str) -> Result<Self, DiceParseError> {
        let trimmed = formula.trim();
        let malformed = |reason: &'static str| DiceParseError::Malformed {
            formula: formula.to_string(),
            reason,
            context: ErrorContext::new(),
        };

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let mut parts = rest.splitn(2, |c| c == 'd' || c == 'D');
        let count_str = parts.next().unwrap_or_default();
        let sides_str = parts.next().ok_or_else(|| malformed("missing 'd' separator"))?;

        if count_str.is_empty() || sides_str.is_empty() {
            return Err(malformed("missing dice count or sides"));
        }

        let count: u32 = count_str.parse().map_err(|_| malformed("dice count is not a number"))?;
        let sides: u32 = sides_str.parse().map_err(|_| malformed("dice sides is not a number"))?;

        if sides == 0 {
            return Err(malformed("dice cannot have zero sides"));
        }

        Ok(Self {
            negative,
            count,
            sides,
        })
    }

    /// Rolls the formula against the given RNG, returning the signed total.
    pub fn roll(&self, rng: &mut DeterministicRng) -> i32 {
        let total = rng.roll(self.count, self.sides, 0);
        if self.negative {
            -total
        } else {
            total
        }
    }
}

impl core::fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.negative {
            write!(f, "-{}d{}", self.count, self.sides)
        } else {
            write!(f, "{}d{}", self.count, self.sides)
        }
    }
}

/// Rounds half-away-from-zero to the nearest integer, as required by the
/// percentage stages of the damage pipeline and rule-window damage helpers.
pub fn round_half_away_from_zero(value: f64) -> i64 {
    if value >= 0.0 {
        (value + 0.5).floor() as i64
    } else {
        (value - 0.5).ceil() as i64
    }
}

/// Halves a value rounding toward negative infinity (integer floor halving),
/// as used by boost-level `ResistanceLevel` application — deliberately a
/// different rounding rule from [`round_half_away_from_zero`].
pub fn floor_halve(value: i64) -> i64 {
    value.div_euclid(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_formula() {
        let f = DiceFormula::parse("2d6").unwrap();
        assert_eq!(f, DiceFormula { negative: false, count: 2, sides: 6 });
    }

    #[test]
    fn parses_negative_formula() {
        let f = DiceFormula::parse("-1d4").unwrap();
        assert!(f.negative);
        assert_eq!(f.count, 1);
        assert_eq!(f.sides, 4);
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(DiceFormula::parse("1x6").is_err());
    }

    #[test]
    fn rejects_zero_sides() {
        assert!(DiceFormula::parse("1d0").is_err());
    }

    #[test]
    fn half_away_from_zero_rounds_ties_outward() {
        assert_eq!(round_half_away_from_zero(2.5), 3);
        assert_eq!(round_half_away_from_zero(-2.5), -3);
        assert_eq!(round_half_away_from_zero(2.4), 2);
    }

    #[test]
    fn floor_halve_rounds_toward_negative_infinity() {
        assert_eq!(floor_halve(40), 20);
        assert_eq!(floor_halve(41), 20);
        assert_eq!(floor_halve(-41), -21);
    }
}
