//! Time-bucketed difficulty phases
//!
//! The clicker runs on accelerated time: one wall-clock second counts as
//! `speed_factor` scaled seconds, and the scaled minute mark selects the phase.

use serde::{Deserialize, Serialize};

/// Deception profile, ordered by when it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Honest +1 per click
    Warmup,
    Sassy,
    /// Points may arrive late
    Drifty,
    Gremlin,
    /// The fake victory unlocks here
    FakeWin,
    Party,
    Final,
}

impl Phase {
    pub const ALL: [Phase; 7] = [
        Phase::Warmup,
        Phase::Sassy,
        Phase::Drifty,
        Phase::Gremlin,
        Phase::FakeWin,
        Phase::Party,
        Phase::Final,
    ];

    /// Phase for a scaled elapsed time. Boundaries are left-inclusive.
    pub fn at(elapsed_secs: f64) -> Self {
        let minutes = elapsed_secs / 60.0;
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|p| minutes >= p.start_minute())
            .unwrap_or(Phase::Warmup)
    }

    /// Scaled minute at which this phase begins
    pub fn start_minute(self) -> f64 {
        match self {
            Phase::Warmup => 0.0,
            Phase::Sassy => 5.0,
            Phase::Drifty => 15.0,
            Phase::Gremlin => 25.0,
            Phase::FakeWin => 35.0,
            Phase::Party => 45.0,
            Phase::Final => 55.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Warmup => "warmup",
            Phase::Sassy => "sassy",
            Phase::Drifty => "drifty",
            Phase::Gremlin => "gremlin",
            Phase::FakeWin => "fakeWin",
            Phase::Party => "party",
            Phase::Final => "final",
        }
    }

    /// Party or final: background chaos, cursor dodging, RPS gates
    pub fn is_chaotic(self) -> bool {
        matches!(self, Phase::Party | Phase::Final)
    }

    /// Gremlin and later (except the fake-win lull): random events and fake errors
    pub fn is_late(self) -> bool {
        matches!(self, Phase::Gremlin | Phase::Party | Phase::Final)
    }

    /// Whether the one-time fake win may show
    pub fn allows_fake_win(self) -> bool {
        self >= Phase::FakeWin
    }

    /// Chaos added every scheduler tick
    pub fn chaos_per_tick(self) -> f32 {
        match self {
            Phase::Warmup => 0.05,
            Phase::Sassy => 0.10,
            Phase::Drifty => 0.16,
            Phase::Gremlin => 0.22,
            Phase::FakeWin => 0.18,
            Phase::Party => 0.25,
            Phase::Final => 0.20,
        }
    }
}

/// Start time of a clicker run; unset until the first click
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameClock {
    started_at_ms: Option<u64>,
    speed_factor: f64,
}

impl GameClock {
    pub fn new(speed_factor: f64) -> Self {
        Self {
            started_at_ms: None,
            speed_factor,
        }
    }

    /// Start the clock. Returns false if it was already running.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.started_at_ms.is_some() {
            return false;
        }
        self.started_at_ms = Some(now_ms);
        true
    }

    pub fn is_started(&self) -> bool {
        self.started_at_ms.is_some()
    }

    pub fn started_at(&self) -> Option<u64> {
        self.started_at_ms
    }

    /// Scaled seconds since the first click (0 before it)
    pub fn elapsed_secs(&self, now_ms: u64) -> f64 {
        match self.started_at_ms {
            Some(start) => now_ms.saturating_sub(start) as f64 / 1000.0 * self.speed_factor,
            None => 0.0,
        }
    }

    pub fn phase(&self, now_ms: u64) -> Phase {
        Phase::at(self.elapsed_secs(now_ms))
    }
}
