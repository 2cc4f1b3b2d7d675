//! Platformer world state and entity types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::schedule::Scheduler;
use crate::tuning::PlatformerTuning;

/// Where the run currently stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    /// Fell off the bottom; waiting for a reset or a meme
    Dead,
    /// Meme on screen, respawn when the countdown hits zero
    WatchingAd { meme_url: String, seconds_left: u32 },
    /// Enough dots collected; physics stops
    Won,
}

/// The player rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vy: f32,
    pub grounded: bool,
}

impl Player {
    /// A player at `x` standing on `platform`
    pub fn standing_on(x: f32, platform: &Platform) -> Self {
        let size = Vec2::new(PLAYER_W, PLAYER_H);
        Self {
            pos: Vec2::new(x, platform.top() - size.y),
            size,
            vy: 0.0,
            grounded: true,
        }
    }

    pub fn foot(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn overlaps_x(&self, platform: &Platform) -> bool {
        self.pos.x < platform.right() && self.pos.x + self.size.x > platform.pos.x
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Platform {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// A collectible floating above a platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dot {
    /// Center
    pub pos: Vec2,
    pub r: f32,
    pub collected: bool,
}

impl Dot {
    /// The dot that rides above `platform`
    pub fn above(platform: &Platform) -> Self {
        Self {
            pos: Vec2::new(platform.center_x(), platform.top() - DOT_LIFT),
            r: DOT_RADIUS,
            collected: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlatformerTask {
    /// One second of the respawn countdown has passed
    CountdownTick,
}

/// Complete platformer state
pub struct PlatformerState<R = Pcg32> {
    pub tuning: PlatformerTuning,
    /// Canvas size in pixels. The simulation reads only the height (generation
    /// clamp and death line); the width is carried for the host's drawing.
    pub canvas: Vec2,
    pub player: Player,
    /// Ordered by x, strictly increasing
    pub platforms: Vec<Platform>,
    pub dots: Vec<Dot>,
    pub dots_collected: u32,
    pub status: RunStatus,
    /// Frames simulated since the last reset
    pub frame: u64,
    /// Platforms generated since the last reset
    pub spawned: u64,
    pub(crate) tasks: Scheduler<PlatformerTask>,
    pub(crate) rng: R,
}

impl PlatformerState<Pcg32> {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, PlatformerTuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: PlatformerTuning) -> Self {
        Self::with_rng(Pcg32::seed_from_u64(seed), tuning)
    }
}
