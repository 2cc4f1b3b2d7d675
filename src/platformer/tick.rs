//! Per-frame platformer update
//!
//! One call = one animation frame. Constants are per frame, not per second.

use rand::Rng;

use super::state::{Platform, PlatformerState, Player, RunStatus};
use crate::consts::*;

/// Input sampled for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Space pressed since the last frame
    pub jump: bool,
}

/// What a frame did to the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Died,
    Won,
    /// Not running (dead, watching a meme, or already won); nothing moved
    Halted,
}

/// Swept landing test for a player that has already been integrated this frame.
///
/// The foot must be at most `LANDING_SLOP` below the top and the next
/// `vy` of travel must reach it, with horizontal overlap.
pub fn lands_on(player: &Player, platform: &Platform) -> bool {
    player.overlaps_x(platform)
        && player.foot() <= platform.top() + LANDING_SLOP
        && player.foot() + player.vy >= platform.top()
}

/// Snap onto `platform`
pub fn land(player: &mut Player, platform: &Platform) {
    player.pos.y = platform.top() - player.size.y;
    player.vy = 0.0;
    player.grounded = true;
}

/// Advance the platformer by one frame
pub fn step<R: Rng>(state: &mut PlatformerState<R>, input: &FrameInput) -> StepOutcome {
    if input.jump {
        state.jump();
    }

    if state.status != RunStatus::Running {
        return StepOutcome::Halted;
    }

    state.frame += 1;
    let gravity = state.tuning.gravity;
    let speed = state.tuning.speed;

    let player = &mut state.player;
    player.vy += gravity;
    player.pos.y += player.vy;
    player.grounded = false;

    for platform in &mut state.platforms {
        platform.pos.x -= speed;
        if lands_on(player, platform) {
            land(player, platform);
        }
    }

    let center = player.center();
    for dot in &mut state.dots {
        dot.pos.x -= speed;
        if !dot.collected && dot.pos.distance(center) < dot.r + DOT_PICKUP_SLOP {
            dot.collected = true;
            state.dots_collected += 1;
        }
    }

    state
        .dots
        .retain(|d| !d.collected && d.pos.x > DOT_CULL_X);
    state
        .platforms
        .retain(|p| p.right() > PLATFORM_CULL_X);

    state.refill_platforms();

    if state.player.pos.y > state.canvas.y {
        state.die();
        return StepOutcome::Died;
    }

    if state.dots_collected >= state.tuning.dots_to_win {
        log::info!("Platformer won with {} dots", state.dots_collected);
        state.status = RunStatus::Won;
        return StepOutcome::Won;
    }

    StepOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platformer::state::Dot;
    use glam::Vec2;
    use proptest::prelude::*;

    #[test]
    fn test_resting_player_stays_grounded() {
        let mut state = PlatformerState::new(12345);
        let start_top = state.platforms[0].top();
        for _ in 0..20 {
            assert_eq!(step(&mut state, &FrameInput::default()), StepOutcome::Continue);
            assert!(state.player.grounded);
            assert_eq!(state.player.foot(), start_top);
            assert_eq!(state.player.vy, 0.0);
        }
    }

    #[test]
    fn test_jump_leaves_ground() {
        let mut state = PlatformerState::new(1);
        let input = FrameInput { jump: true };
        step(&mut state, &input);
        assert!(!state.player.grounded);
        assert!((state.player.vy - (-JUMP_FORCE + GRAVITY)).abs() < 1e-5);

        // Mid-air jumps do nothing
        let vy = state.player.vy;
        step(&mut state, &input);
        assert!((state.player.vy - (vy + GRAVITY)).abs() < 1e-5);
    }

    #[test]
    fn test_dot_pickup_counts_once() {
        let mut state = PlatformerState::new(2);
        state.dots.clear();
        let center = state.player.center();
        state.dots.push(Dot {
            pos: Vec2::new(center.x + SCROLL_SPEED, center.y),
            r: DOT_RADIUS,
            collected: false,
        });
        step(&mut state, &FrameInput::default());
        assert_eq!(state.dots_collected, 1);
        assert!(state.dots.is_empty());
    }

    #[test]
    fn test_falling_off_the_bottom_dies() {
        let mut state = PlatformerState::new(3);
        state.player.pos.y = state.canvas.y + 1.0;
        state.player.grounded = false;
        assert_eq!(step(&mut state, &FrameInput::default()), StepOutcome::Died);
        assert_eq!(state.status, RunStatus::Dead);
        assert_eq!(step(&mut state, &FrameInput::default()), StepOutcome::Halted);
    }

    proptest! {
        #[test]
        fn prop_crossing_the_top_snaps_exactly(
            top in 150.0f32..600.0,
            above in 0.01f32..2.0,
            vy in 2.0f32..20.0,
            offset in -25.0f32..135.0,
        ) {
            let platform = Platform::new(200.0, top, 140.0, 20.0);
            let mut player = Player::standing_on(200.0 + offset, &platform);
            // Foot just above the top, falling fast enough to cross it this frame
            player.pos.y -= above;
            player.vy = vy;
            player.grounded = false;

            prop_assert!(lands_on(&player, &platform));
            land(&mut player, &platform);
            prop_assert_eq!(player.foot(), top);
            prop_assert_eq!(player.vy, 0.0);
            prop_assert!(player.grounded);
        }

        #[test]
        fn prop_no_landing_without_overlap(
            top in 150.0f32..600.0,
            vy in 2.0f32..20.0,
            gap in 0.0f32..200.0,
        ) {
            let platform = Platform::new(200.0, top, 140.0, 20.0);
            // Entirely to the right of the platform
            let mut player = Player::standing_on(platform.right() + gap, &platform);
            player.vy = vy;
            prop_assert!(!lands_on(&player, &platform));
        }
    }
}
