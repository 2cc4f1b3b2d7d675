//! Procedural platformer
//!
//! - `state`: World, player, platforms and dots
//! - `level`: Reachable platform generation
//! - `tick`: Per-frame physics, pickups and culling
//! - `lifecycle`: Reset, death and the meme-gated respawn

pub mod level;
pub mod lifecycle;
pub mod state;
pub mod tick;

pub use level::next_platform;
pub use state::{Dot, Platform, PlatformerState, Player, RunStatus};
pub use tick::{FrameInput, StepOutcome, land, lands_on, step};
