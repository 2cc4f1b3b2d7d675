//! Prank Arcade - two small browser novelty games
//!
//! Core modules:
//! - `clicker`: The deceptive button clicker (phases, lying score, chaos, gates)
//! - `platformer`: Procedural side-scroller (level generation, physics, respawn)
//! - `schedule`: Cancelable timed tasks that replace fire-and-forget timers
//! - `tuning`: Data-driven game balance
//! - `meme`: The "watch an ad" meme source
//! - `web`: wasm-bindgen handles for the browser pages

pub mod clicker;
pub mod meme;
pub mod platformer;
pub mod rng;
pub mod schedule;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use clicker::{ClickOutcome, ClickerEvent, ClickerSession, Phase};
pub use meme::{Meme, MemeError};
pub use platformer::{PlatformerState, RunStatus, StepOutcome};
pub use tuning::{ClickerTuning, PlatformerTuning, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Clicker time acceleration (one real second counts as this many)
    pub const SPEED_FACTOR: f64 = 20.0;
    /// Clicker event tick period (ms of wall time)
    pub const TICK_PERIOD_MS: u64 = 140;
    /// Maximum ticks replayed per `update` call to prevent spiral of death
    pub const MAX_CATCHUP_TICKS: u32 = 8;
    /// Chaos gauge bounds
    pub const CHAOS_MIN: f32 = 0.0;
    pub const CHAOS_MAX: f32 = 100.0;
    /// Real score needed before the fake win can show
    pub const FAKE_WIN_SCORE: i64 = 30;
    /// Streak length that pays a bonus
    pub const STREAK_BONUS_EVERY: u32 = 10;

    /// Platformer physics (per frame)
    pub const GRAVITY: f32 = 0.6;
    pub const JUMP_FORCE: f32 = 12.0;
    pub const SCROLL_SPEED: f32 = 2.8;

    /// Player defaults
    pub const PLAYER_X: f32 = 140.0;
    pub const PLAYER_W: f32 = 30.0;
    pub const PLAYER_H: f32 = 40.0;
    /// Player x after a respawn (safe platform anchor)
    pub const RESPAWN_X: f32 = 80.0;

    /// Start platform
    pub const START_PLATFORM_X: f32 = 80.0;
    pub const START_PLATFORM_W: f32 = 260.0;
    /// Start platform sits this far above the canvas bottom
    pub const START_PLATFORM_LIFT: f32 = 160.0;

    /// Generated platforms
    pub const PLATFORM_W: f32 = 140.0;
    pub const PLATFORM_H: f32 = 20.0;
    pub const MIN_GAP: f32 = 60.0;
    pub const MAX_Y_SHIFT: f32 = 60.0;
    pub const PLATFORM_MIN_Y: f32 = 120.0;
    /// Lowest platform top is canvas height minus this
    pub const PLATFORM_BOTTOM_MARGIN: f32 = 100.0;
    /// Landing tolerance above a platform top (px)
    pub const LANDING_SLOP: f32 = 2.0;

    /// Dots
    pub const DOT_RADIUS: f32 = 6.0;
    pub const DOT_LIFT: f32 = 14.0;
    pub const DOT_PICKUP_SLOP: f32 = 10.0;

    /// Culling thresholds (x coordinate)
    pub const DOT_CULL_X: f32 = -30.0;
    pub const PLATFORM_CULL_X: f32 = -50.0;
}
