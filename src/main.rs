//! Prank Arcade entry point
//!
//! The browser build starts from `web::start`. Natively this runs both games
//! headless with a fixed-step loop and logs what happened.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use prank_arcade::clicker::{ClickOutcome, ClickerSession, Mode};
    use prank_arcade::platformer::{FrameInput, PlatformerState, StepOutcome, step};
    use prank_arcade::Meme;

    /// Simulated click cadence (ms between presses)
    const CLICK_EVERY_MS: u64 = 250;
    /// Simulated session length (ms of wall time)
    const CLICKER_RUN_MS: u64 = 30_000;
    /// One platformer frame at 60 fps
    const FRAME_MS: u64 = 16;
    const MAX_FRAMES: u64 = 60 * 60 * 5;
    const MAX_RESPAWNS: u32 = 3;

    pub fn seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5eed)
    }

    /// Hammer the button for a while, answering every gate with the button's hand
    pub fn run_clicker(seed: u64) {
        let mut session = ClickerSession::new(seed);
        let mut clicks = 0u32;
        let mut blocked = 0u32;
        let mut lies = 0u32;

        let mut now = 0;
        while now <= CLICKER_RUN_MS {
            session.update(now);
            if matches!(session.mode(), Mode::RpsGate(_)) {
                session.press_overlay_button(now);
            } else {
                match session.click(now) {
                    ClickOutcome::Blocked | ClickOutcome::FakeError => blocked += 1,
                    ClickOutcome::Scored { lied, .. } => {
                        clicks += 1;
                        if lied {
                            lies += 1;
                        }
                    }
                    ClickOutcome::Deferred { .. } => clicks += 1,
                }
            }
            for event in session.drain_events() {
                log::debug!("{event:?}");
            }
            now += CLICK_EVERY_MS;
        }

        log::info!(
            "Clicker: {} clicks ({} lied about, {} blocked), real {} shown {}, chaos {:.0}, phase {}",
            clicks,
            lies,
            blocked,
            session.score().real(),
            session.shown_score(),
            session.chaos().value(),
            session.phase(now).name(),
        );
    }

    /// Autopilot: jump when the player is about to run off its platform
    fn wants_jump(state: &PlatformerState) -> bool {
        if !state.player.grounded {
            return false;
        }
        let lookahead = state.player.pos.x + state.player.size.x + state.tuning.speed * 4.0;
        !state
            .platforms
            .iter()
            .any(|p| p.pos.x <= lookahead && p.right() >= lookahead)
    }

    pub fn run_platformer(seed: u64) {
        let mut state = PlatformerState::new(seed);
        let mut respawns = 0;
        let mut now = 0;

        for _ in 0..MAX_FRAMES {
            state.update(now);
            let input = FrameInput {
                jump: wants_jump(&state),
            };
            match step(&mut state, &input) {
                StepOutcome::Died if respawns < MAX_RESPAWNS => {
                    respawns += 1;
                    let meme = Ok(Meme {
                        url: "offline://meme".to_string(),
                        title: None,
                        subreddit: None,
                        post_link: None,
                    });
                    if let Err(err) = state.begin_ad(meme, now) {
                        log::error!("Respawn failed: {err}");
                        break;
                    }
                }
                StepOutcome::Died | StepOutcome::Won => break,
                StepOutcome::Continue | StepOutcome::Halted => {}
            }
            now += FRAME_MS;
        }

        log::info!(
            "Platformer: {} dots of {} after {} frames, {} respawns, {} platforms generated, status {:?}",
            state.dots_collected,
            state.tuning.dots_to_win,
            state.frame,
            respawns,
            state.spawned,
            state.status,
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    let seed = headless::seed();
    log::info!("Prank Arcade (native, headless) seed {seed}");
    log::info!("Run with `trunk serve` for the playable web version");

    headless::run_clicker(seed);
    headless::run_platformer(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
