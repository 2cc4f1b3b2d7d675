//! Browser glue
//!
//! Thin `wasm_bindgen` handles around the two games. The page owns the DOM
//! and the animation loop; it feeds timestamps in and applies the drained
//! events / snapshots. Sessions live in `Rc<RefCell<_>>` so async callbacks
//! (the meme fetch) can reach them.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::clicker::{ButtonRect, ClickerSession, Hand};
use crate::meme::fetch_meme;
use crate::platformer::{Dot, FrameInput, Platform, PlatformerState, Player, RunStatus, StepOutcome, step};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Prank Arcade starting...");

    // Hide loading indicator
    if let Some(loading) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("loading"))
    {
        let _ = loading.set_attribute("class", "hidden");
    }
}

/// Milliseconds on the page clock
fn now_ms() -> u64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now) as u64
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u32::MAX as f64) as u64 ^ js_sys::Date::now() as u64
}

fn load_tuning(json: Option<String>) -> Result<Tuning, JsValue> {
    match json {
        Some(json) => Tuning::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string())),
        None => Ok(Tuning::default()),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub struct ClickerHandle {
    session: Rc<RefCell<ClickerSession>>,
}

#[wasm_bindgen]
impl ClickerHandle {
    /// `tuning` is an optional JSON override of the clicker/platformer balance
    #[wasm_bindgen(constructor)]
    pub fn new(tuning: Option<String>) -> Result<ClickerHandle, JsValue> {
        let tuning = load_tuning(tuning)?;
        Ok(Self {
            session: Rc::new(RefCell::new(ClickerSession::with_tuning(
                random_seed(),
                tuning.clicker,
            ))),
        })
    }

    /// Advance timers and event ticks to `now_ms`
    pub fn update(&self, now_ms: f64) {
        self.session.borrow_mut().update(now_ms as u64);
    }

    /// Press the main button. Returns the outcome as JSON.
    pub fn click(&self, now_ms: f64) -> Result<String, JsValue> {
        let outcome = self.session.borrow_mut().click(now_ms as u64);
        to_json(&outcome)
    }

    pub fn press_overlay_button(&self, now_ms: f64) -> Result<String, JsValue> {
        let report = self.session.borrow_mut().press_overlay_button(now_ms as u64);
        to_json(&report)
    }

    /// Pick a hand by name ("rock", "paper", "scissors")
    pub fn rps_pick(&self, hand: &str, now_ms: f64) -> Result<String, JsValue> {
        let hand: Hand = serde_json::from_value(serde_json::Value::String(hand.to_string()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let report = self.session.borrow_mut().rps_pick(hand, now_ms as u64);
        to_json(&report)
    }

    /// Pointer moved near the button. Returns the new `[x, y]` when it runs away.
    #[allow(clippy::too_many_arguments)]
    pub fn dodge(
        &self,
        cursor_x: f32,
        cursor_y: f32,
        button_x: f32,
        button_y: f32,
        button_w: f32,
        button_h: f32,
        viewport_w: f32,
        viewport_h: f32,
    ) -> Option<Box<[f32]>> {
        let button = ButtonRect {
            pos: Vec2::new(button_x, button_y),
            size: Vec2::new(button_w, button_h),
        };
        self.session
            .borrow_mut()
            .dodge(
                Vec2::new(cursor_x, cursor_y),
                button,
                Vec2::new(viewport_w, viewport_h),
            )
            .map(|p| Box::from([p.x, p.y]))
    }

    pub fn reset(&self) {
        self.session.borrow_mut().reset();
    }

    /// Everything the UI should apply since the last drain, as a JSON array
    pub fn drain_events(&self) -> Result<String, JsValue> {
        let events = self.session.borrow_mut().drain_events();
        to_json(&events)
    }
}

/// What the canvas needs to draw a frame
#[derive(Serialize)]
struct PlatformerView<'a> {
    canvas: [f32; 2],
    player: &'a Player,
    platforms: &'a [Platform],
    dots: &'a [Dot],
    dots_collected: u32,
    status: &'a RunStatus,
}

#[wasm_bindgen]
pub struct PlatformerHandle {
    state: Rc<RefCell<PlatformerState>>,
}

#[wasm_bindgen]
impl PlatformerHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, tuning: Option<String>) -> Result<PlatformerHandle, JsValue> {
        let mut tuning = load_tuning(tuning)?.platformer;
        tuning.canvas_width = width;
        tuning.canvas_height = height;
        Ok(Self {
            state: Rc::new(RefCell::new(PlatformerState::with_tuning(random_seed(), tuning))),
        })
    }

    /// One animation frame. Returns "continue", "died", "won" or "halted".
    pub fn frame(&self, jump: bool) -> String {
        let mut state = self.state.borrow_mut();
        state.update(now_ms());
        let outcome = step(&mut *state, &FrameInput { jump });
        match outcome {
            StepOutcome::Continue => "continue",
            StepOutcome::Died => "died",
            StepOutcome::Won => "won",
            StepOutcome::Halted => "halted",
        }
        .to_string()
    }

    pub fn resize(&self, width: f32, height: f32) {
        self.state.borrow_mut().resize(width, height);
    }

    pub fn reset(&self) {
        self.state.borrow_mut().reset();
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        let state = self.state.borrow();
        to_json(&PlatformerView {
            canvas: state.canvas.to_array(),
            player: &state.player,
            platforms: &state.platforms,
            dots: &state.dots,
            dots_collected: state.dots_collected,
            status: &state.status,
        })
    }

    /// Fetch a meme and start the respawn countdown.
    /// Resolves to the meme url; rejects with a message the page can alert.
    pub fn watch_meme(&self) -> js_sys::Promise {
        let state = Rc::clone(&self.state);
        future_to_promise(async move {
            let meme = fetch_meme().await;
            let mut state = state.borrow_mut();
            match state.begin_ad(meme, now_ms()) {
                Ok(_) => match &state.status {
                    RunStatus::WatchingAd { meme_url, .. } => Ok(JsValue::from_str(meme_url)),
                    _ => Ok(JsValue::NULL),
                },
                Err(err) => Err(JsValue::from_str(&format!("Failed to load meme, try again! ({err})"))),
            }
        })
    }
}
