//! Real vs. displayed score, and the chaos gauge

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::consts::{CHAOS_MAX, CHAOS_MIN};
use crate::rng::{chance, rand_int};

/// Authoritative score plus the number the player is shown.
///
/// `displayed` is recomputed from `real` on every change and is never read
/// back into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreModel {
    real: i64,
    displayed: i64,
}

impl ScoreModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn real(&self) -> i64 {
        self.real
    }

    pub fn displayed(&self) -> i64 {
        self.displayed
    }

    /// Apply a signed delta and recompute the shown value. Returns the shown value.
    pub fn apply_delta<R: Rng>(&mut self, delta: i64, lie: bool, phase: Phase, rng: &mut R) -> i64 {
        self.real += delta;

        let mut shown = self.real;
        if lie {
            shown = self.real + rand_int(rng, -8, 8);
        } else if phase == Phase::Drifty {
            if chance(rng, 0.25) {
                shown = self.real + rand_int(rng, -3, 3);
            }
        } else if phase.is_late() && chance(rng, 0.45) {
            shown = self.real + rand_int(rng, -10, 10);
        }

        self.displayed = shown;
        shown
    }

    /// Put back a display value captured earlier (fake-error recovery)
    pub(crate) fn restore_displayed(&mut self, value: i64) {
        self.displayed = value;
    }
}

/// Face shown next to the chaos bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Calm,
    Uneasy,
    Dizzy,
    Demonic,
}

impl Mood {
    pub fn for_chaos(value: f32) -> Self {
        if value < 20.0 {
            Mood::Calm
        } else if value < 45.0 {
            Mood::Uneasy
        } else if value < 70.0 {
            Mood::Dizzy
        } else {
            Mood::Demonic
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Calm => "🙂",
            Mood::Uneasy => "😐",
            Mood::Dizzy => "😵‍💫",
            Mood::Demonic => "👹",
        }
    }
}

/// Bounded intensity accumulator in `[0, 100]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChaosGauge {
    value: f32,
}

impl ChaosGauge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` (may be negative) and clamp. Returns the new mood.
    pub fn increase(&mut self, amount: f32) -> Mood {
        self.set(self.value + amount)
    }

    pub fn set(&mut self, value: f32) -> Mood {
        // NaN collapses to the floor so the gauge can never leave its range
        self.value = if value.is_nan() {
            CHAOS_MIN
        } else {
            value.clamp(CHAOS_MIN, CHAOS_MAX)
        };
        self.mood()
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn mood(&self) -> Mood {
        Mood::for_chaos(self.value)
    }

    /// Bar fill, 0-100 %
    pub fn fill_percent(&self) -> f32 {
        self.value / CHAOS_MAX * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_honest_delta_in_warmup() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut score = ScoreModel::new();
        assert_eq!(score.apply_delta(5, false, Phase::Warmup, &mut rng), 5);
        assert_eq!(score.real(), 5);
        assert_eq!(score.displayed(), 5);
    }

    #[test]
    fn test_lie_stays_within_eight() {
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..500 {
            let mut score = ScoreModel::new();
            score.apply_delta(10, false, Phase::Warmup, &mut rng);
            let shown = score.apply_delta(-3, true, Phase::Warmup, &mut rng);
            assert_eq!(score.real(), 7);
            assert!((-1..=15).contains(&shown));
        }
    }

    #[test]
    fn test_noise_bounds_per_phase() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut score = ScoreModel::new();
        for _ in 0..500 {
            let shown = score.apply_delta(0, false, Phase::Drifty, &mut rng);
            assert!((shown - score.real()).abs() <= 3);
            let shown = score.apply_delta(0, false, Phase::Final, &mut rng);
            assert!((shown - score.real()).abs() <= 10);
            let shown = score.apply_delta(0, false, Phase::FakeWin, &mut rng);
            assert_eq!(shown, score.real());
        }
    }

    #[test]
    fn test_mood_buckets() {
        let mut gauge = ChaosGauge::new();
        assert_eq!(gauge.mood(), Mood::Calm);
        assert_eq!(gauge.increase(20.0), Mood::Uneasy);
        assert_eq!(gauge.increase(25.0), Mood::Dizzy);
        assert_eq!(gauge.increase(25.0), Mood::Demonic);
        assert_eq!(gauge.fill_percent(), 70.0);
    }

    #[test]
    fn test_nan_does_not_escape_range() {
        let mut gauge = ChaosGauge::new();
        gauge.increase(f32::NAN);
        assert_eq!(gauge.value(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_real_is_exact_sum(
            deltas in proptest::collection::vec((-50i64..50, any::<bool>(), 0usize..7), 0..64),
            seed in any::<u64>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut score = ScoreModel::new();
            let mut sum = 0;
            for (delta, lie, phase_idx) in deltas {
                score.apply_delta(delta, lie, Phase::ALL[phase_idx], &mut rng);
                sum += delta;
            }
            prop_assert_eq!(score.real(), sum);
        }

        #[test]
        fn prop_chaos_stays_clamped(amounts in proptest::collection::vec(-500.0f32..500.0, 0..64)) {
            let mut gauge = ChaosGauge::new();
            for amount in amounts {
                gauge.increase(amount);
                prop_assert!((0.0..=100.0).contains(&gauge.value()));
            }
        }
    }
}
