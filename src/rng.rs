//! Small randomness helpers shared by both games
//!
//! Everything takes the session's RNG explicitly so runs replay exactly from
//! a seed.

use rand::Rng;

/// Uniform integer in `[lo, hi]` (both inclusive). Swapped bounds are tolerated.
pub fn rand_int<R: Rng>(rng: &mut R, lo: i64, hi: i64) -> i64 {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    rng.random_range(lo..=hi)
}

/// Unsigned variant of [`rand_int`] for durations.
pub fn rand_ms<R: Rng>(rng: &mut R, lo: u64, hi: u64) -> u64 {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    rng.random_range(lo..=hi)
}

/// True with probability `p`. Values outside `[0, 1]` saturate.
pub fn chance<R: Rng>(rng: &mut R, p: f64) -> bool {
    rng.random::<f64>() < p
}

/// Uniform float in `[lo, lo + span)`. A zero span returns `lo`.
pub fn uniform<R: Rng>(rng: &mut R, lo: f32, span: f32) -> f32 {
    lo + rng.random::<f32>() * span
}

/// Uniformly pick one element. Returns `None` for an empty slice.
pub fn pick<'a, T, R: Rng>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..items.len());
    items.get(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_rand_int_inclusive_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen_lo = false;
        let mut seen_hi = false;
        for _ in 0..2000 {
            let v = rand_int(&mut rng, -2, 2);
            assert!((-2..=2).contains(&v));
            seen_lo |= v == -2;
            seen_hi |= v == 2;
        }
        assert!(seen_lo && seen_hi);
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            assert!(!chance(&mut rng, 0.0));
            assert!(chance(&mut rng, 1.0));
        }
    }

    #[test]
    fn test_pick_empty() {
        let mut rng = Pcg32::seed_from_u64(3);
        let empty: [u8; 0] = [];
        assert!(pick(&mut rng, &empty).is_none());
        assert_eq!(pick(&mut rng, &[42]), Some(&42));
    }
}
