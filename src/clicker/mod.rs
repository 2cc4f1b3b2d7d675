//! Deceptive clicker
//!
//! A button whose score, texts and sense of time all lie to the player. The
//! deception escalates through seven [`Phase`]s driven by accelerated time.

pub mod events;
pub mod phase;
pub mod rps;
pub mod score;
pub mod session;

pub use events::{Backdrop, ClickerEvent, SoundCue};
pub use phase::{GameClock, Phase};
pub use rps::{Hand, MatchResult, RoundOutcome, RoundReport, RpsMatch, RpsStage, judge};
pub use score::{ChaosGauge, Mood, ScoreModel};
pub use session::{
    ButtonRect, ClickOutcome, ClickerSession, FakeErrorStage, FakeErrorState, Mode,
};
