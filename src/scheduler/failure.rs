//! Probabilistic per-step failure injection.

use rand::Rng;

/// Decides whether the step at `step_index` should fail. Step 0 bootstraps
/// the mission and never fails, regardless of the configured chance. For
/// later steps a uniform draw in [0, 100) is compared against
/// `chance_percent`.
pub fn should_fail<R: Rng + ?Sized>(step_index: usize, chance_percent: u8, rng: &mut R) -> bool {
    if step_index == 0 || chance_percent == 0 {
        return false;
    }
    let roll: u8 = rng.random_range(0..100);
    roll < chance_percent.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_step_zero_never_fails() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(!should_fail(0, 100, &mut rng));
        }
    }

    #[test]
    fn test_zero_chance_never_fails() {
        let mut rng = SmallRng::seed_from_u64(7);
        for index in 1..100 {
            assert!(!should_fail(index, 0, &mut rng));
        }
    }

    #[test]
    fn test_full_chance_always_fails_past_step_zero() {
        let mut rng = SmallRng::seed_from_u64(7);
        for index in 1..100 {
            assert!(should_fail(index, 100, &mut rng));
        }
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let draws =
            |seed| -> Vec<bool> {
                let mut rng = SmallRng::seed_from_u64(seed);
                (1..50).map(|i| should_fail(i, 50, &mut rng)).collect()
            };
        assert_eq!(draws(42), draws(42));
    }
}
