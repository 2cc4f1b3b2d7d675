//! Data-driven game balance
//!
//! Defaults reproduce the shipped games. A host may override any subset from
//! JSON; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Clicker timing and penalty knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickerTuning {
    /// Scaled seconds per real second
    pub speed_factor: f64,
    /// Event tick period (ms)
    pub tick_period_ms: u64,
    /// Cap on ticks replayed by one `update`
    pub max_catchup_ticks: u32,
    /// Real score that unlocks the fake win
    pub fake_win_score: i64,
    pub rps_round_penalty: (i64, i64),
    pub rps_match_penalty: (i64, i64),
    /// Delay before a decided RPS match closes or restarts
    pub rps_settle_ms: u64,
    pub fake_error_recover_ms: u64,
    pub fake_error_restore_ms: u64,
    pub win_relabel_ms: u64,
    pub win_fee_ms: u64,
    pub win_fee: (i64, i64),
}

impl Default for ClickerTuning {
    fn default() -> Self {
        Self {
            speed_factor: SPEED_FACTOR,
            tick_period_ms: TICK_PERIOD_MS,
            max_catchup_ticks: MAX_CATCHUP_TICKS,
            fake_win_score: FAKE_WIN_SCORE,
            rps_round_penalty: (2, 5),
            rps_match_penalty: (6, 12),
            rps_settle_ms: 650,
            fake_error_recover_ms: 850,
            fake_error_restore_ms: 2000,
            win_relabel_ms: 900,
            win_fee_ms: 1850,
            win_fee: (5, 12),
        }
    }
}

/// Platformer physics and pacing knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerTuning {
    pub gravity: f32,
    pub jump_force: f32,
    pub speed: f32,
    /// Fraction of the ideal jump range treated as reachable
    pub reach_factor: f32,
    /// Fraction of the reachable range used for gaps
    pub gap_factor: f32,
    /// Live platforms kept ahead of the player
    pub target_platforms: usize,
    pub dots_to_win: u32,
    pub ad_countdown_secs: u32,
    /// Host drawing width; the simulation itself is unbounded to the right
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl Default for PlatformerTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            speed: SCROLL_SPEED,
            reach_factor: 0.7,
            gap_factor: 0.8,
            target_platforms: 12,
            dots_to_win: 200,
            ad_countdown_secs: 15,
            canvas_width: 1280.0,
            canvas_height: 720.0,
        }
    }
}

impl PlatformerTuning {
    /// Horizontal distance one jump can cover, discounted by `reach_factor`
    pub fn max_reach(&self) -> f32 {
        let air_time = (self.jump_force * 2.0) / self.gravity;
        air_time * self.speed * self.reach_factor
    }

    /// Half-open range `[lo, hi)` every generated gap falls into
    pub fn gap_range(&self) -> (f32, f32) {
        (MIN_GAP, self.max_reach() * self.gap_factor + MIN_GAP)
    }
}

/// Complete tuning bundle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub clicker: ClickerTuning,
    pub platformer: PlatformerTuning,
}

impl Tuning {
    /// Parse overrides from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let c = &self.clicker;
        if !(c.speed_factor > 0.0) {
            return Err(invalid("clicker.speed_factor", "must be positive"));
        }
        if c.tick_period_ms == 0 {
            return Err(invalid("clicker.tick_period_ms", "must be non-zero"));
        }
        if c.max_catchup_ticks == 0 {
            return Err(invalid("clicker.max_catchup_ticks", "must be non-zero"));
        }
        for (field, (lo, hi)) in [
            ("clicker.rps_round_penalty", c.rps_round_penalty),
            ("clicker.rps_match_penalty", c.rps_match_penalty),
            ("clicker.win_fee", c.win_fee),
        ] {
            if lo > hi || lo < 0 {
                return Err(invalid(field, "expects 0 <= min <= max"));
            }
        }
        if c.fake_error_recover_ms > c.fake_error_restore_ms {
            return Err(invalid(
                "clicker.fake_error_recover_ms",
                "must not exceed fake_error_restore_ms",
            ));
        }
        if c.win_relabel_ms > c.win_fee_ms {
            return Err(invalid("clicker.win_relabel_ms", "must not exceed win_fee_ms"));
        }

        let p = &self.platformer;
        if !(p.gravity > 0.0) {
            return Err(invalid("platformer.gravity", "must be positive"));
        }
        if !(p.jump_force > 0.0) {
            return Err(invalid("platformer.jump_force", "must be positive"));
        }
        if !(p.speed > 0.0) {
            return Err(invalid("platformer.speed", "must be positive"));
        }
        if !(p.reach_factor > 0.0) {
            return Err(invalid("platformer.reach_factor", "must be positive"));
        }
        if !(p.gap_factor >= 0.0) {
            return Err(invalid("platformer.gap_factor", "must not be negative"));
        }
        if p.target_platforms == 0 {
            return Err(invalid("platformer.target_platforms", "must be non-zero"));
        }
        if !(p.canvas_height > PLATFORM_MIN_Y + PLATFORM_BOTTOM_MARGIN) {
            return Err(invalid("platformer.canvas_height", "too short for platforms"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> TuningError {
    TuningError::Invalid { field, reason }
}
