//! Procedural level generation
//!
//! New platforms are placed no farther than one (discounted) jump from the
//! previous one, so every generated level is solvable by construction.

use rand::Rng;

use super::state::{Dot, Platform, PlatformerState};
use crate::consts::*;
use crate::rng::uniform;
use crate::tuning::PlatformerTuning;

/// Next platform after `last`, plus the dot that rides on it
pub fn next_platform<R: Rng>(
    last: &Platform,
    tuning: &PlatformerTuning,
    canvas_height: f32,
    rng: &mut R,
) -> (Platform, Dot) {
    let (gap_lo, gap_hi) = tuning.gap_range();
    let gap = uniform(rng, gap_lo, gap_hi - gap_lo);

    let y_shift = uniform(rng, -MAX_Y_SHIFT, MAX_Y_SHIFT * 2.0);
    // min then max: tiny canvases pin to the top limit instead of panicking
    let y = (last.pos.y + y_shift)
        .min(canvas_height - PLATFORM_BOTTOM_MARGIN)
        .max(PLATFORM_MIN_Y);

    let platform = Platform::new(last.right() + gap, y, PLATFORM_W, PLATFORM_H);
    let dot = Dot::above(&platform);
    (platform, dot)
}

impl<R: Rng> PlatformerState<R> {
    /// Append one platform (and its dot) after the current last one.
    /// Returns false if there is no platform to build from.
    pub fn spawn_platform(&mut self) -> bool {
        let Some(last) = self.platforms.last().copied() else {
            return false;
        };
        let (platform, dot) = next_platform(&last, &self.tuning, self.canvas.y, &mut self.rng);
        self.platforms.push(platform);
        self.dots.push(dot);
        self.spawned += 1;
        true
    }

    /// Generate until the live platform count is back at the target
    pub fn refill_platforms(&mut self) {
        while self.platforms.len() < self.tuning.target_platforms {
            if !self.spawn_platform() {
                log::warn!("No platform left to generate from");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_dot_centered_above_platform() {
        let mut rng = Pcg32::seed_from_u64(1);
        let tuning = PlatformerTuning::default();
        let last = Platform::new(80.0, 560.0, 260.0, 20.0);
        let (platform, dot) = next_platform(&last, &tuning, 720.0, &mut rng);
        assert_eq!(dot.pos.x, platform.pos.x + 70.0);
        assert_eq!(dot.pos.y, platform.pos.y - DOT_LIFT);
        assert!(!dot.collected);
        assert_eq!(platform.size.x, PLATFORM_W);
    }

    #[test]
    fn test_tiny_canvas_pins_to_top_limit() {
        let mut rng = Pcg32::seed_from_u64(2);
        let tuning = PlatformerTuning::default();
        let last = Platform::new(0.0, 120.0, 140.0, 20.0);
        let (platform, _) = next_platform(&last, &tuning, 150.0, &mut rng);
        assert_eq!(platform.pos.y, PLATFORM_MIN_Y);
    }

    proptest! {
        #[test]
        fn prop_platforms_stay_reachable(
            gravity in 0.2f32..2.0,
            jump_force in 4.0f32..20.0,
            speed in 1.0f32..6.0,
            canvas_height in 300.0f32..1400.0,
            seed in any::<u64>(),
        ) {
            let tuning = PlatformerTuning { gravity, jump_force, speed, ..Default::default() };
            let (gap_lo, gap_hi) = tuning.gap_range();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut last = Platform::new(80.0, canvas_height - 160.0, 260.0, 20.0);
            for _ in 0..50 {
                let (next, _) = next_platform(&last, &tuning, canvas_height, &mut rng);
                let gap = next.pos.x - last.right();
                prop_assert!(gap >= gap_lo - 1e-2 && gap < gap_hi + 1e-2, "gap {} outside [{}, {})", gap, gap_lo, gap_hi);
                prop_assert!(next.pos.y >= PLATFORM_MIN_Y);
                prop_assert!(next.pos.y <= canvas_height - PLATFORM_BOTTOM_MARGIN);
                prop_assert!(next.pos.x > last.pos.x);
                last = next;
            }
        }
    }
}
