//! What the clicker asks its UI to do
//!
//! The session never touches the DOM. Every visible change is queued as a
//! [`ClickerEvent`] and the host drains the queue after each call.

use serde::{Deserialize, Serialize};

use super::phase::Phase;
use super::rps::Hand;
use super::score::Mood;

/// Short procedural sounds the host can synthesize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Click,
    Good,
    Bad,
    Win,
    Chaos,
}

/// Page background
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Backdrop {
    /// Stylesheet default
    Default,
    /// `hsl(h s% l%)`
    Hsl { h: u16, s: u8, l: u8 },
    /// Dark red used by the fake error screen
    Alarm,
}

impl Backdrop {
    pub fn css(&self) -> String {
        match self {
            Backdrop::Default => String::new(),
            Backdrop::Hsl { h, s, l } => format!("hsl({h} {s}% {l}%)"),
            Backdrop::Alarm => "#5b0000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClickerEvent {
    ScoreShown { value: i64 },
    Streak { count: u32 },
    Chaos { value: f32, mood: Mood },
    PhaseChanged { phase: Phase },
    Log { text: String },
    Toast { text: String },
    OverlayShown { title: String, message: String },
    /// `title: None` keeps the current title
    OverlayUpdated { title: Option<String>, message: String },
    OverlayHidden,
    RpsButton { hand: Hand },
    ButtonText { text: String },
    Subtitle { text: String },
    Background { backdrop: Backdrop },
    Shake { on: bool },
    /// Turning this off also snaps the button back to its layout position
    AvoidCursor { on: bool },
    ButtonMoved { x: f32, y: f32 },
    InputEnabled { enabled: bool },
    Sound { cue: SoundCue },
}

pub(crate) const BUTTON_PHRASES: [&str; 12] = [
    "CLICK TO WIN",
    "CLICK TO VIBE",
    "FREE POINTS",
    "DO NOT CLICK",
    "TRUST ME",
    "BET YOU WON'T",
    "GAMBLE",
    "HONEST BUTTON",
    "SUPER LEGIT",
    "ABSOLUTELY SAFE",
    "MORE CHAOS",
    "NORMAL",
];

pub(crate) const SUBTITLE_PHRASES: [&str; 5] = [
    "Totally normal button. Probably.",
    "If it says 'DON'T', it might mean 'DO'.",
    "This game is certified suspicious.",
    "Your clicks are being judged (lovingly).",
    "Welcome to the vibe economy.",
];

/// Overlays that look like a loss but are not
pub(crate) const FAKE_ERRORS: [(&str, &str); 5] = [
    ("YOU LOST", "Better luck next time."),
    ("ERROR", "SCORE CORRUPTED"),
    ("CONNECTION LOST", "Reconnecting to button..."),
    ("SAVE FILE DAMAGED", "Attempting recovery..."),
    ("UNRECOVERABLE ERROR", "Just kidding."),
];

/// Log lines the scheduler picks from, per phase
pub(crate) fn flavor_lines(phase: Phase) -> &'static [&'static str] {
    match phase {
        Phase::Warmup => &[
            "Button warming up…",
            "Calibrating honesty…",
            "Loading trust…",
        ],
        Phase::Sassy => &[
            "That click had aura.",
            "Impressive. Concerning.",
            "Big click energy.",
        ],
        Phase::Drifty => &[
            "Cause and effect are optional.",
            "Time is fake. Keep clicking.",
            "The score is shy.",
        ],
        Phase::Gremlin => &[
            "Gremlin mode engaged.",
            "The button is learning.",
            "Your clicks taste like fear (jk).",
        ],
        Phase::FakeWin => &[
            "Victory is complicated.",
            "Congratulations (pending audit).",
            "We’re checking your vibe score.",
        ],
        Phase::Party => &[
            "Party time. Everyone lies.",
            "Chaos is a feature.",
            "Your mouse is too confident.",
        ],
        Phase::Final => &[
            "Final form unlocked.",
            "Reality is buffering…",
            "Please clap.",
        ],
    }
}

/// What the click handler logs for a normal click in each phase
pub(crate) fn click_line(phase: Phase) -> &'static str {
    match phase {
        Phase::Warmup => "Nice. Normal. Probably.",
        Phase::Sassy => "Good choice. (Officially.)",
        Phase::Drifty => "Points delivered instantly-ish.",
        Phase::Gremlin => "Gremlin verdict: acceptable.",
        Phase::FakeWin => "Almost there. Maybe. Allegedly.",
        Phase::Party => "Party rules: yes.",
        Phase::Final => "Final form: button has opinions.",
    }
}
