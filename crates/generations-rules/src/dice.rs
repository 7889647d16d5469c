//! Random draws.
//!
//! All randomness flows through a caller-supplied [`Rng`]. Fractional draws
//! are integer draws scaled to a [`Decimal`] at a fixed resolution so every
//! probability comparison stays exact.

use rand::Rng;
use rust_decimal::Decimal;

use crate::config::DecimalRange;

/// Number of distinct values a unit roll can take.
pub const ROLL_RESOLUTION: u32 = 1_000_000;

/// Decimal places of a unit roll (`10^6` = [`ROLL_RESOLUTION`]).
const ROLL_SCALE: u32 = 6;

/// A uniform draw from `[0, 1)` with six decimal places.
pub fn unit_roll(rng: &mut impl Rng) -> Decimal {
    let raw: u32 = rng.random_range(0..ROLL_RESOLUTION);
    Decimal::new(i64::from(raw), ROLL_SCALE)
}

/// A uniform draw from the closed range `[range.low, range.high]`.
pub fn uniform_between(rng: &mut impl Rng, range: DecimalRange) -> Decimal {
    let raw: u32 = rng.random_range(0..=ROLL_RESOLUTION);
    let fraction = Decimal::new(i64::from(raw), ROLL_SCALE);
    let span = range.high.saturating_sub(range.low);
    range.low.saturating_add(span.saturating_mul(fraction))
}

/// A uniform draw from `[-magnitude, magnitude]`.
pub fn symmetric_variation(rng: &mut impl Rng, magnitude: Decimal) -> Decimal {
    uniform_between(rng, DecimalRange::new(Decimal::ZERO.saturating_sub(magnitude), magnitude))
}

/// Sixteen random bytes for an identifier.
pub fn random_id_bytes(rng: &mut impl Rng) -> [u8; 16] {
    let mut bytes = [0_u8; 16];
    rng.fill(&mut bytes);
    bytes
}

/// Whether a roll succeeds against `probability` (roll strictly below it).
pub fn succeeds(roll: Decimal, probability: Decimal) -> bool {
    roll < probability
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn unit_roll_stays_in_half_open_interval() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..1000 {
            let roll = unit_roll(&mut rng);
            assert!(roll >= Decimal::ZERO);
            assert!(roll < Decimal::ONE);
        }
    }

    #[test]
    fn uniform_between_respects_bounds() {
        let mut rng = SmallRng::seed_from_u64(7);
        let range = DecimalRange::new(Decimal::new(8, 1), Decimal::new(12, 1));
        for _ in 0..1000 {
            let value = uniform_between(&mut rng, range);
            assert!(value >= range.low && value <= range.high, "{value} out of range");
        }
    }

    #[test]
    fn degenerate_range_returns_its_bound() {
        let mut rng = SmallRng::seed_from_u64(1);
        let range = DecimalRange::new(Decimal::TEN, Decimal::TEN);
        assert_eq!(uniform_between(&mut rng, range), Decimal::TEN);
    }

    #[test]
    fn symmetric_variation_is_centered() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..500 {
            let value = symmetric_variation(&mut rng, Decimal::TEN);
            assert!(value.abs() <= Decimal::TEN);
        }
    }

    #[test]
    fn same_seed_same_id_bytes() {
        let mut a = SmallRng::seed_from_u64(9);
        let mut b = SmallRng::seed_from_u64(9);
        assert_eq!(random_id_bytes(&mut a), random_id_bytes(&mut b));
    }

    #[test]
    fn success_is_strictly_below_probability() {
        assert!(succeeds(Decimal::new(49, 2), Decimal::new(5, 1)));
        assert!(!succeeds(Decimal::new(5, 1), Decimal::new(5, 1)));
        assert!(!succeeds(Decimal::ZERO, Decimal::ZERO));
    }
}
