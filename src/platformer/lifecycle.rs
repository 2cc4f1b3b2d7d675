//! Reset, death, meme-gated respawn and win

use glam::Vec2;
use rand::Rng;

use super::state::{Platform, PlatformerState, PlatformerTask, Player, RunStatus};
use crate::consts::*;
use crate::meme::{Meme, MemeError};
use crate::schedule::Scheduler;
use crate::tuning::PlatformerTuning;

const COUNTDOWN_STEP_MS: u64 = 1000;

impl<R: Rng> PlatformerState<R> {
    /// Build a fresh run around any RNG
    pub fn with_rng(rng: R, tuning: PlatformerTuning) -> Self {
        let start = start_platform(tuning.canvas_height);
        let mut state = Self {
            canvas: Vec2::new(tuning.canvas_width, tuning.canvas_height),
            tuning,
            player: Player::standing_on(PLAYER_X, &start),
            platforms: Vec::new(),
            dots: Vec::new(),
            dots_collected: 0,
            status: RunStatus::Running,
            frame: 0,
            spawned: 0,
            tasks: Scheduler::new(),
            rng,
        };
        state.reset();
        state
    }

    /// Rebuild the world from scratch. Cancels any respawn countdown.
    pub fn reset(&mut self) {
        self.tasks.clear();
        self.dots_collected = 0;
        self.frame = 0;
        self.spawned = 0;
        self.platforms.clear();
        self.dots.clear();

        let start = start_platform(self.canvas.y);
        self.platforms.push(start);
        self.player = Player::standing_on(PLAYER_X, &start);
        self.status = RunStatus::Running;

        for _ in 0..self.tuning.target_platforms {
            self.spawn_platform();
        }
        log::info!("Platformer reset ({} platforms)", self.platforms.len());
    }

    /// New canvas size; takes effect for generation and the death line
    pub fn resize(&mut self, width: f32, height: f32) {
        self.canvas = Vec2::new(width, height);
    }

    /// Start a jump. Only works on the ground in a live run.
    pub fn jump(&mut self) -> bool {
        if self.status != RunStatus::Running || !self.player.grounded {
            return false;
        }
        self.player.vy = -self.tuning.jump_force;
        self.player.grounded = false;
        true
    }

    pub fn die(&mut self) {
        if self.status == RunStatus::Running {
            log::info!(
                "Player died at frame {} with {} dots",
                self.frame,
                self.dots_collected
            );
        }
        self.status = RunStatus::Dead;
    }

    /// Handle the outcome of a meme fetch for the "watch an ad" respawn.
    ///
    /// A failure leaves the run dead and is handed back for the host to
    /// report. Returns `Ok(false)` when the run is not dead.
    pub fn begin_ad(&mut self, meme: Result<Meme, MemeError>, now_ms: u64) -> Result<bool, MemeError> {
        if self.status != RunStatus::Dead {
            return Ok(false);
        }
        let meme = meme.map_err(|err| {
            log::error!("Failed to fetch meme: {err}");
            err
        })?;

        log::info!("Showing meme {} before respawn", meme.url);
        self.status = RunStatus::WatchingAd {
            meme_url: meme.url,
            seconds_left: self.tuning.ad_countdown_secs,
        };
        self.tasks.clear();
        if self.tuning.ad_countdown_secs == 0 {
            self.respawn();
        } else {
            self.tasks
                .schedule_in(now_ms, COUNTDOWN_STEP_MS, PlatformerTask::CountdownTick);
        }
        Ok(true)
    }

    /// Seconds left before the respawn fires, while a meme is showing
    pub fn countdown(&self) -> Option<u32> {
        match &self.status {
            RunStatus::WatchingAd { seconds_left, .. } => Some(*seconds_left),
            _ => None,
        }
    }

    /// Fire due countdown ticks. Respawns when the countdown reaches zero.
    pub fn update(&mut self, now_ms: u64) {
        while let Some((due, task)) = self.tasks.pop_due(now_ms) {
            match task {
                PlatformerTask::CountdownTick => {
                    let RunStatus::WatchingAd { seconds_left, .. } = &mut self.status else {
                        continue;
                    };
                    *seconds_left = seconds_left.saturating_sub(1);
                    if *seconds_left == 0 {
                        self.respawn();
                    } else {
                        self.tasks
                            .schedule_at(due + COUNTDOWN_STEP_MS, PlatformerTask::CountdownTick);
                    }
                }
            }
        }
    }

    /// Put the player back on the first surviving platform without regenerating the level
    pub fn respawn(&mut self) {
        self.tasks.clear();
        let Some(safe) = self.platforms.first().copied() else {
            self.reset();
            return;
        };

        let shift = safe.pos.x - RESPAWN_X;
        for platform in &mut self.platforms {
            platform.pos.x -= shift;
        }
        for dot in &mut self.dots {
            dot.pos.x -= shift;
        }

        let mut anchor = safe;
        anchor.pos.x -= shift;
        self.player = Player::standing_on(RESPAWN_X, &anchor);
        self.status = RunStatus::Running;
        log::info!("Respawned with {} dots", self.dots_collected);
    }
}

fn start_platform(canvas_height: f32) -> Platform {
    Platform::new(
        START_PLATFORM_X,
        canvas_height - START_PLATFORM_LIFT,
        START_PLATFORM_W,
        PLATFORM_H,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platformer::tick::{FrameInput, StepOutcome, step};

    fn meme() -> Result<Meme, MemeError> {
        Ok(Meme {
            url: "https://i.redd.it/abc.png".to_string(),
            title: None,
            subreddit: None,
            post_link: None,
        })
    }

    fn dead_state(seed: u64) -> PlatformerState {
        let mut state = PlatformerState::new(seed);
        for _ in 0..30 {
            step(&mut state, &FrameInput::default());
        }
        state.die();
        state
    }

    #[test]
    fn test_reset_builds_start_plus_target() {
        let state = PlatformerState::new(1);
        assert_eq!(state.platforms.len(), 1 + state.tuning.target_platforms);
        assert_eq!(state.dots.len(), state.tuning.target_platforms);
        assert_eq!(state.platforms[0].pos, Vec2::new(80.0, 720.0 - 160.0));
        assert_eq!(state.player.pos.x, PLAYER_X);
        assert_eq!(state.player.foot(), state.platforms[0].top());
        assert!(state.platforms.windows(2).all(|w| w[0].pos.x < w[1].pos.x));
    }

    #[test]
    fn test_failed_meme_keeps_run_dead() {
        let mut state = dead_state(2);
        let err = state.begin_ad(Err(MemeError::MissingUrl), 0).unwrap_err();
        assert!(matches!(err, MemeError::MissingUrl));
        assert_eq!(state.status, RunStatus::Dead);
        assert_eq!(state.countdown(), None);
    }

    #[test]
    fn test_ad_countdown_then_respawn() {
        let mut state = dead_state(3);
        let before: Vec<_> = state.platforms.iter().map(|p| p.pos.y).collect();
        let spawned = state.spawned;

        assert!(state.begin_ad(meme(), 10_000).unwrap());
        assert_eq!(state.countdown(), Some(15));
        // Physics is paused while the meme plays
        assert_eq!(step(&mut state, &FrameInput::default()), StepOutcome::Halted);

        state.update(10_999);
        assert_eq!(state.countdown(), Some(15));
        state.update(11_000);
        assert_eq!(state.countdown(), Some(14));
        state.update(24_000);
        assert_eq!(state.countdown(), Some(1));
        state.update(25_000);
        assert_eq!(state.status, RunStatus::Running);

        assert_eq!(state.platforms[0].pos.x, RESPAWN_X);
        assert_eq!(state.player.pos.x, RESPAWN_X);
        assert_eq!(state.player.foot(), state.platforms[0].top());
        assert!(state.player.grounded);
        // Same level, just translated
        let after: Vec<_> = state.platforms.iter().map(|p| p.pos.y).collect();
        assert_eq!(before, after);
        assert_eq!(state.spawned, spawned);
    }

    #[test]
    fn test_reset_cancels_countdown() {
        let mut state = dead_state(4);
        state.begin_ad(meme(), 0).unwrap();
        state.reset();
        assert_eq!(state.status, RunStatus::Running);
        state.update(60_000);
        assert_eq!(state.countdown(), None);
        assert_eq!(state.frame, 0);
    }

    #[test]
    fn test_resize_moves_death_line_and_keeps_width() {
        let mut state = PlatformerState::new(6);
        state.resize(800.0, 1000.0);
        assert_eq!(state.canvas, Vec2::new(800.0, 1000.0));

        // Below the old 720 px bottom is still on screen now
        state.player.pos.y = 900.0;
        state.player.grounded = false;
        assert_eq!(step(&mut state, &FrameInput::default()), StepOutcome::Continue);

        state.player.pos.y = 1001.0;
        assert_eq!(step(&mut state, &FrameInput::default()), StepOutcome::Died);

        // Rebuilds against the new height
        state.reset();
        assert_eq!(state.platforms[0].top(), 1000.0 - START_PLATFORM_LIFT);
        assert_eq!(state.canvas.x, 800.0);
    }

    #[test]
    fn test_ad_ignored_while_alive() {
        let mut state = PlatformerState::new(5);
        assert!(!state.begin_ad(meme(), 0).unwrap());
        assert_eq!(state.status, RunStatus::Running);
    }
}
