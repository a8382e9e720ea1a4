//! Damage and block math.
//!
//! Everything here is a pure function of its inputs. The only randomness is the crit roll, which
//! [`calculate_damage`] draws from the given rng and [`calculate_damage_with_roll`] takes as an
//! argument.

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const WEAK_MULTIPLIER: f64 = 0.5;
pub const CRIT_MULTIPLIER: f64 = 2.0;
pub const BREAK_BONUS: f64 = 0.5;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct DamageResult {
    pub damage_before_block: i32,
    pub block_consumed: i32,
    pub damage_after_block: i32,
    pub is_critical: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct DamageInput {
    pub raw_damage: i32,
    pub attacker_strength: i32,
    pub target_block: i32,
    pub attacker_is_weak: bool,
    pub target_is_broken: bool,
    /// Percent, 0..=100.
    pub attacker_crit_chance: f64,
}

pub fn calculate_damage(input: &DamageInput, rng: &mut impl Rng) -> DamageResult {
    let roll = rng.gen_range(0.0..100.0);
    calculate_damage_with_roll(input, roll)
}

/// `crit_roll` is a value in `[0, 100)`. The hit is critical when it is below the crit chance.
pub fn calculate_damage_with_roll(input: &DamageInput, crit_roll: f64) -> DamageResult {
    // The order of these steps is part of the rules. Break in particular scales the post-block
    // damage, not the raw hit.
    let after_strength = input.raw_damage + input.attacker_strength;

    let after_weak = if input.attacker_is_weak {
        floor_mul(after_strength, WEAK_MULTIPLIER)
    } else {
        after_strength
    };

    let is_critical = crit_roll < input.attacker_crit_chance;
    let after_crit = if is_critical {
        floor_mul(after_weak, CRIT_MULTIPLIER)
    } else {
        after_weak
    };

    let damage_before_block = after_crit;
    let block_consumed = damage_before_block.clamp(0, input.target_block.max(0));
    let mut damage_after_block = damage_before_block - block_consumed;

    if input.target_is_broken && damage_after_block > 0 {
        damage_after_block += floor_mul(damage_after_block, BREAK_BONUS);
    }

    DamageResult {
        damage_before_block,
        block_consumed,
        damage_after_block: damage_after_block.max(0),
        is_critical,
    }
}

/// Bonus applied while the caster's health is under a share of its maximum.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct LowHealthBonus {
    pub threshold_percent: u32,
    pub multiplier: f64,
}

impl LowHealthBonus {
    pub fn is_below_threshold(&self, current_health: i32, max_health: i32) -> bool {
        if max_health <= 0 {
            return false;
        }
        (current_health.max(0) as i64) * 100 < (self.threshold_percent as i64) * (max_health as i64)
    }
}

/// Per-card growth coefficients shared by damage and block values.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Scaling {
    pub per_turn: f64,
    pub per_play: f64,
    pub per_copy: f64,
    pub low_health: Option<LowHealthBonus>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ScalingInput {
    pub current_turn: u32,
    pub previous_plays: u32,
    pub copies_owned: u32,
    pub below_health_threshold: bool,
    pub strength_bonus: i32,
}

pub fn calculate_card_damage_with_scaling(base: i32, scaling: &Scaling, input: &ScalingInput) -> i32 {
    (scaled_value(base, scaling, input) + input.strength_bonus).max(0)
}

/// Same growth as damage, without strength.
pub fn calculate_card_block_with_scaling(base: i32, scaling: &Scaling, input: &ScalingInput) -> i32 {
    scaled_value(base, scaling, input).max(0)
}

fn scaled_value(base: i32, scaling: &Scaling, input: &ScalingInput) -> i32 {
    let mut total = base;

    total += floor_mul(
        clamp_count(input.current_turn),
        sanitize_coefficient(scaling.per_turn),
    );

    if input.previous_plays > 0 {
        total += floor_mul(
            clamp_count(input.previous_plays),
            sanitize_coefficient(scaling.per_play),
        );
    }

    total += floor_mul(
        clamp_count(input.copies_owned),
        sanitize_coefficient(scaling.per_copy),
    );

    if input.below_health_threshold {
        if let Some(low_health) = &scaling.low_health {
            let multiplier = sanitize_coefficient(low_health.multiplier).max(0.0);
            total = floor_mul(total, multiplier);
        }
    }

    total
}

fn floor_mul(value: i32, factor: f64) -> i32 {
    (value as f64 * factor).floor() as i32
}

fn sanitize_coefficient(coefficient: f64) -> f64 {
    if coefficient.is_finite() {
        coefficient
    } else {
        0.0
    }
}

fn clamp_count(count: u32) -> i32 {
    count.min(i32::MAX as u32) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn input(raw: i32, strength: i32, block: i32, weak: bool, broken: bool) -> DamageInput {
        DamageInput {
            raw_damage: raw,
            attacker_strength: strength,
            target_block: block,
            attacker_is_weak: weak,
            target_is_broken: broken,
            attacker_crit_chance: 0.0,
        }
    }

    #[test]
    fn weak_and_break_apply_around_block() {
        let result = calculate_damage_with_roll(&input(10, 2, 5, true, true), 50.0);

        assert_eq!(result.damage_before_block, 6);
        assert_eq!(result.block_consumed, 5);
        assert_eq!(result.damage_after_block, 1);
        assert!(!result.is_critical);
    }

    #[test]
    fn guaranteed_crit_doubles_damage() {
        let mut rng = StdRng::seed_from_u64(7);
        let result = calculate_damage(
            &DamageInput {
                attacker_crit_chance: 100.0,
                ..input(10, 0, 0, false, false)
            },
            &mut rng,
        );

        assert!(result.is_critical);
        assert_eq!(result.damage_after_block, 20);
        assert_eq!(result.block_consumed, 0);
    }

    #[test]
    fn break_adds_half_of_unblocked_damage() {
        let result = calculate_damage_with_roll(&input(10, 0, 0, false, true), 0.0);
        assert_eq!(result.damage_after_block, 15);
    }

    #[test]
    fn zero_crit_chance_matches_formula() {
        let mut rng = StdRng::seed_from_u64(99);
        for raw in 0..20 {
            for strength in 0..4 {
                for block in [0, 3, 12] {
                    for weak in [false, true] {
                        for broken in [false, true] {
                            let result =
                                calculate_damage(&input(raw, strength, block, weak, broken), &mut rng);

                            let mut expected = raw + strength;
                            if weak {
                                expected /= 2;
                            }
                            let consumed = expected.min(block);
                            let mut after = expected - consumed;
                            if broken && after > 0 {
                                after += after / 2;
                            }

                            assert!(!result.is_critical);
                            assert_eq!(result.block_consumed, consumed);
                            assert_eq!(result.damage_after_block, after);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn fully_blocked_hit_gets_no_break_bonus() {
        let result = calculate_damage_with_roll(&input(4, 0, 10, false, true), 0.0);
        assert_eq!(result.block_consumed, 4);
        assert_eq!(result.damage_after_block, 0);
    }

    #[test]
    fn negative_strength_never_heals() {
        let result = calculate_damage_with_roll(&input(2, -5, 3, false, false), 0.0);
        assert_eq!(result.block_consumed, 0);
        assert_eq!(result.damage_after_block, 0);
    }

    #[test]
    fn scaling_sums_before_low_health_multiplier() {
        let scaling = Scaling {
            per_turn: 0.5,
            per_play: 1.5,
            per_copy: 1.0,
            low_health: Some(LowHealthBonus {
                threshold_percent: 50,
                multiplier: 1.5,
            }),
        };
        let scaling_input = ScalingInput {
            current_turn: 3,
            previous_plays: 1,
            copies_owned: 2,
            below_health_threshold: true,
            strength_bonus: 2,
        };

        // 6 + floor(1.5) + floor(1.5) + 2 = 10, * 1.5 = 15, + 2 strength.
        assert_eq!(calculate_card_damage_with_scaling(6, &scaling, &scaling_input), 17);
        assert_eq!(calculate_card_block_with_scaling(6, &scaling, &scaling_input), 15);
    }

    #[test]
    fn per_play_term_needs_a_previous_play() {
        let scaling = Scaling {
            per_play: -3.0,
            ..Default::default()
        };
        let first = ScalingInput::default();
        assert_eq!(calculate_card_damage_with_scaling(5, &scaling, &first), 5);

        let second = ScalingInput {
            previous_plays: 1,
            ..Default::default()
        };
        assert_eq!(calculate_card_damage_with_scaling(5, &scaling, &second), 2);
    }

    #[test]
    fn malformed_coefficients_are_ignored() {
        let scaling = Scaling {
            per_turn: f64::NAN,
            per_copy: f64::INFINITY,
            ..Default::default()
        };
        let scaling_input = ScalingInput {
            current_turn: 4,
            copies_owned: 4,
            ..Default::default()
        };
        assert_eq!(calculate_card_block_with_scaling(3, &scaling, &scaling_input), 3);
    }

    #[test]
    fn low_health_threshold_is_strict() {
        let bonus = LowHealthBonus {
            threshold_percent: 50,
            multiplier: 2.0,
        };
        assert!(bonus.is_below_threshold(4, 10));
        assert!(!bonus.is_below_threshold(5, 10));
        assert!(!bonus.is_below_threshold(0, 0));
    }
}
