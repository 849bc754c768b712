//! 4.4.7: hit-chance calculator. Informational only; never advances the RNG.

use crate::rng::AdvantageState;

/// Probability (as an integer percent) of a `d20 + attack_mod >= target_ac`,
/// clamped to `[5, 95]` before the advantage/disadvantage adjustment.
pub fn calculate_hit_chance(target_ac: i32, attack_mod: i32, advantage: AdvantageState) -> u32 {
    let needed_roll = target_ac - attack_mod;
    let successful_faces = (21 - needed_roll).clamp(0, 20);
    let base_percent = (successful_faces * 5).clamp(5, 95) as f64 / 100.0;

    let adjusted = match advantage {
        AdvantageState::Normal => base_percent,
        AdvantageState::Advantage => 1.0 - (1.0 - base_percent).powi(2),
        AdvantageState::Disadvantage => base_percent.powi(2),
    };

    (adjusted * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_five_and_ninety_five() {
        assert_eq!(calculate_hit_chance(100, 0, AdvantageState::Normal), 5);
        assert_eq!(calculate_hit_chance(-100, 0, AdvantageState::Normal), 95);
    }

    #[test]
    fn advantage_increases_and_disadvantage_decreases_chance() {
        let normal = calculate_hit_chance(15, 2, AdvantageState::Normal);
        let adv = calculate_hit_chance(15, 2, AdvantageState::Advantage);
        let dis = calculate_hit_chance(15, 2, AdvantageState::Disadvantage);
        assert!(adv > normal);
        assert!(dis < normal);
    }
}
