//! One run of the lying button
//!
//! The session owns every piece of mutable clicker state. Hosts feed it wall
//! time (`now_ms`) through [`ClickerSession::click`] and
//! [`ClickerSession::update`] and drain the resulting [`ClickerEvent`]s.
//! Input blocking is a single [`Mode`]; delayed effects live in a
//! [`Scheduler`] so [`ClickerSession::reset`] drops all of them at once.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{
    BUTTON_PHRASES, Backdrop, ClickerEvent, FAKE_ERRORS, SUBTITLE_PHRASES, SoundCue, click_line,
    flavor_lines,
};
use super::phase::{GameClock, Phase};
use super::rps::{Hand, MatchResult, RoundOutcome, RoundReport, RpsMatch};
use super::score::{ChaosGauge, ScoreModel};
use crate::consts::STREAK_BONUS_EVERY;
use crate::rng::{chance, pick, rand_int, rand_ms};
use crate::schedule::{Scheduler, TaskId};
use crate::tuning::ClickerTuning;

/// Chaos added per click
const CHAOS_PER_SUCCESS: f32 = 0.8;
const CHAOS_PER_FAILURE: f32 = 1.4;

/// Cursor closer than this to the button center makes it flee
const DODGE_RADIUS: f32 = 170.0;
const DODGE_PAD: i64 = 18;
const DODGE_TOP: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FakeErrorStage {
    Shown,
    Recovering,
}

/// A fake "you lost" screen in flight, with what it has to put back
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FakeErrorState {
    pub stage: FakeErrorStage,
    pub saved_display: i64,
    pub saved_backdrop: Backdrop,
}

/// What is currently allowed to happen to the main button
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Mode {
    Idle,
    /// Clicks ignored until `until_ms`; the scheduler keeps ticking
    Frozen { until_ms: u64 },
    /// Rock-paper-scissors gate; clicks and ticks suspended
    RpsGate(RpsMatch),
    /// Fake error theater; clicks and ticks suspended
    FakeError(FakeErrorState),
}

impl Mode {
    /// Gates suspend both clicks and the event scheduler
    pub fn is_gated(&self) -> bool {
        matches!(self, Mode::RpsGate(_) | Mode::FakeError(_))
    }

    pub fn accepts_clicks(&self, now_ms: u64) -> bool {
        match self {
            Mode::Idle => true,
            Mode::Frozen { until_ms } => now_ms >= *until_ms,
            Mode::RpsGate(_) | Mode::FakeError(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClickerTask {
    Unfreeze,
    /// Drifty-phase points that show up late
    DeferredScore { delta: i64 },
    WinRelabel,
    WinFee,
    FakeErrorRecovering,
    FakeErrorRestore,
    RpsSettle,
}

/// Result of pressing the main button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickOutcome {
    /// Gate, fake error or freeze swallowed the click
    Blocked,
    /// The click turned into a fake error instead of scoring
    FakeError,
    Scored { delta: i64, lied: bool },
    /// Points scheduled to land `delay_ms` later
    Deferred { delta: i64, delay_ms: u64 },
}

/// Main button bounds in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ButtonRect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl ButtonRect {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Deceptive clicker state
pub struct ClickerSession<R = Pcg32> {
    tuning: ClickerTuning,
    clock: GameClock,
    score: ScoreModel,
    chaos: ChaosGauge,
    streak: u32,
    mode: Mode,
    win_shown: bool,
    avoid_cursor: bool,
    shaking: bool,
    backdrop: Backdrop,
    last_phase: Option<Phase>,
    next_tick_ms: Option<u64>,
    /// The single pending `Unfreeze`, replaced when a freeze is extended
    unfreeze_task: Option<TaskId>,
    /// End of a freeze that a gate interrupted; resumed when the gate closes
    held_freeze: Option<u64>,
    tasks: Scheduler<ClickerTask>,
    events: Vec<ClickerEvent>,
    rng: R,
}

impl ClickerSession<Pcg32> {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, ClickerTuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: ClickerTuning) -> Self {
        Self::with_rng(Pcg32::seed_from_u64(seed), tuning)
    }
}

impl<R: Rng> ClickerSession<R> {
    /// Build a session around any RNG (scripted sources in tests, seeded PCG in play)
    pub fn with_rng(rng: R, tuning: ClickerTuning) -> Self {
        let mut session = Self {
            clock: GameClock::new(tuning.speed_factor),
            tuning,
            score: ScoreModel::new(),
            chaos: ChaosGauge::new(),
            streak: 0,
            mode: Mode::Idle,
            win_shown: false,
            avoid_cursor: false,
            shaking: false,
            backdrop: Backdrop::Default,
            last_phase: None,
            next_tick_ms: None,
            unfreeze_task: None,
            held_freeze: None,
            tasks: Scheduler::new(),
            events: Vec::new(),
            rng,
        };
        session.announce_fresh_run();
        session
    }

    // --- Accessors ---

    pub fn tuning(&self) -> &ClickerTuning {
        &self.tuning
    }

    pub fn is_started(&self) -> bool {
        self.clock.is_started()
    }

    pub fn phase(&self, now_ms: u64) -> Phase {
        self.clock.phase(now_ms)
    }

    pub fn score(&self) -> &ScoreModel {
        &self.score
    }

    /// Number currently on the score display (0 while a fake error is up)
    pub fn shown_score(&self) -> i64 {
        match self.mode {
            Mode::FakeError(_) => 0,
            _ => self.score.displayed(),
        }
    }

    pub fn chaos(&self) -> &ChaosGauge {
        &self.chaos
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn rps_match(&self) -> Option<&RpsMatch> {
        match &self.mode {
            Mode::RpsGate(m) => Some(m),
            _ => None,
        }
    }

    pub fn win_shown(&self) -> bool {
        self.win_shown
    }

    pub fn avoid_cursor(&self) -> bool {
        self.avoid_cursor
    }

    pub fn shaking(&self) -> bool {
        self.shaking
    }

    pub fn backdrop(&self) -> Backdrop {
        self.backdrop
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn events(&self) -> &[ClickerEvent] {
        &self.events
    }

    /// Take every queued UI event
    pub fn drain_events(&mut self) -> Vec<ClickerEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Driving ---

    /// Start over. Cancels every pending delayed effect.
    pub fn reset(&mut self) {
        self.clock = GameClock::new(self.tuning.speed_factor);
        self.score = ScoreModel::new();
        self.chaos = ChaosGauge::new();
        self.streak = 0;
        self.mode = Mode::Idle;
        self.win_shown = false;
        self.avoid_cursor = false;
        self.shaking = false;
        self.backdrop = Backdrop::Default;
        self.last_phase = None;
        self.next_tick_ms = None;
        self.unfreeze_task = None;
        self.held_freeze = None;
        self.tasks.clear();
        self.events.clear();
        log::info!("Clicker reset");
        self.announce_fresh_run();
    }

    /// Advance to `now_ms`: replay elapsed scheduler ticks and fire due tasks in time order
    pub fn update(&mut self, now_ms: u64) {
        if let Some(mut next) = self.next_tick_ms {
            let period = self.tuning.tick_period_ms;
            let mut ran = 0;
            while next <= now_ms && ran < self.tuning.max_catchup_ticks {
                self.run_due_tasks(next);
                self.step(next);
                next += period;
                ran += 1;
            }
            if next <= now_ms {
                log::debug!(
                    "Clicker fell behind by {} ms, skipping ticks",
                    now_ms - next
                );
                next = now_ms + period;
            }
            self.next_tick_ms = Some(next);
        }
        self.run_due_tasks(now_ms);
    }

    /// One event-scheduler tick
    pub fn step(&mut self, now_ms: u64) {
        if !self.clock.is_started() || self.mode.is_gated() {
            return;
        }

        let phase = self.observe_phase(now_ms);
        self.add_chaos(phase.chaos_per_tick());

        if phase.is_chaotic() {
            if chance(&mut self.rng, 0.12) {
                let backdrop = Backdrop::Hsl {
                    h: rand_int(&mut self.rng, 0, 359) as u16,
                    s: rand_int(&mut self.rng, 35, 95) as u8,
                    l: rand_int(&mut self.rng, 10, 25) as u8,
                };
                self.set_backdrop(backdrop);
            }
            let shake = chance(&mut self.rng, 0.25);
            self.set_shake(shake);
        } else {
            self.set_shake(false);
        }
        self.set_avoid_cursor(phase.is_chaotic());

        if chance(&mut self.rng, 0.18) {
            if let Some(line) = pick(&mut self.rng, flavor_lines(phase)).copied() {
                self.emit(ClickerEvent::Log {
                    text: line.to_string(),
                });
            }
        }

        // Gates and the win sequence: first match wins
        if phase.is_chaotic() && chance(&mut self.rng, 0.006) {
            self.start_rps_gate();
            return;
        }
        if phase.is_late() && chance(&mut self.rng, 0.01) {
            self.trigger_fake_error(now_ms);
            return;
        }
        if !self.win_shown
            && phase.allows_fake_win()
            && self.score.real() >= self.tuning.fake_win_score
        {
            self.start_win_sequence(now_ms);
            return;
        }

        if chance(&mut self.rng, 0.06) && phase.is_late() {
            self.minor_event(now_ms);
        }
    }

    /// Press the main button
    pub fn click(&mut self, now_ms: u64) -> ClickOutcome {
        self.emit(ClickerEvent::Sound {
            cue: SoundCue::Click,
        });

        if self.clock.start(now_ms) {
            log::info!("Clicker run started");
            self.next_tick_ms = Some(now_ms + self.tuning.tick_period_ms);
        }

        match self.mode {
            Mode::RpsGate(_) | Mode::FakeError(_) => return ClickOutcome::Blocked,
            Mode::Frozen { until_ms } if now_ms < until_ms => return ClickOutcome::Blocked,
            Mode::Frozen { .. } => {
                self.mode = Mode::Idle;
                self.cancel_unfreeze();
                self.emit(ClickerEvent::InputEnabled { enabled: true });
            }
            Mode::Idle => {}
        }

        let phase = self.observe_phase(now_ms);

        if phase.is_chaotic() && chance(&mut self.rng, 0.05) {
            self.trigger_fake_error(now_ms);
            return ClickOutcome::FakeError;
        }

        self.streak += 1;
        self.emit(ClickerEvent::Streak { count: self.streak });

        let delta = match phase {
            Phase::Warmup => {
                self.log_line(click_line(phase));
                if chance(&mut self.rng, 0.2) {
                    self.sound(SoundCue::Good);
                }
                1
            }
            Phase::Sassy => {
                let delta = if chance(&mut self.rng, 0.75) {
                    rand_int(&mut self.rng, 1, 3)
                } else {
                    -1
                };
                self.log_line(click_line(phase));
                self.verdict_sound(delta > 0);
                delta
            }
            Phase::Drifty => {
                let delayed = chance(&mut self.rng, 0.5);
                let delta = if chance(&mut self.rng, 0.6) {
                    rand_int(&mut self.rng, 1, 5)
                } else {
                    -rand_int(&mut self.rng, 1, 4)
                };
                if delayed {
                    self.log_line("Your points are arriving… later.");
                    let delay_ms = rand_ms(&mut self.rng, 250, 1100);
                    self.tasks
                        .schedule_in(now_ms, delay_ms, ClickerTask::DeferredScore { delta });
                    if chance(&mut self.rng, 0.25) {
                        self.sound(SoundCue::Chaos);
                    }
                    self.maybe_swap_texts(phase);
                    return ClickOutcome::Deferred { delta, delay_ms };
                }
                self.log_line(click_line(phase));
                self.verdict_sound(delta > 0);
                delta
            }
            Phase::Gremlin => {
                if chance(&mut self.rng, 0.15) {
                    let ms = rand_ms(&mut self.rng, 350, 900);
                    self.freeze_input(now_ms, ms);
                    self.toast("Button needs a snack.".to_string());
                }
                let delta = if chance(&mut self.rng, 0.55) {
                    rand_int(&mut self.rng, 2, 7)
                } else {
                    -rand_int(&mut self.rng, 1, 6)
                };
                self.log_line(click_line(phase));
                self.verdict_sound(delta > 0);
                delta
            }
            Phase::FakeWin => {
                let delta = if chance(&mut self.rng, 0.75) {
                    rand_int(&mut self.rng, 2, 6)
                } else {
                    rand_int(&mut self.rng, -2, 2)
                };
                self.log_line(click_line(phase));
                self.verdict_sound(delta >= 0);
                delta
            }
            Phase::Party => {
                let delta = if chance(&mut self.rng, 0.65) {
                    rand_int(&mut self.rng, 1, 10)
                } else {
                    -rand_int(&mut self.rng, 1, 8)
                };
                self.log_line(click_line(phase));
                if chance(&mut self.rng, 0.35) {
                    self.sound(SoundCue::Chaos);
                }
                self.verdict_sound(delta > 0);
                delta
            }
            Phase::Final => {
                let delta = if chance(&mut self.rng, 0.6) {
                    rand_int(&mut self.rng, 2, 12)
                } else {
                    -rand_int(&mut self.rng, 1, 10)
                };
                self.log_line(click_line(phase));
                if chance(&mut self.rng, 0.55) {
                    self.sound(SoundCue::Chaos);
                }
                self.verdict_sound(delta > 0);
                delta
            }
        };

        let lied = phase.is_chaotic() && chance(&mut self.rng, 0.35);
        self.apply_score(now_ms, delta, lied);

        self.add_chaos(if delta > 0 {
            CHAOS_PER_SUCCESS
        } else {
            CHAOS_PER_FAILURE
        });

        if self.streak.is_multiple_of(STREAK_BONUS_EVERY) {
            let bonus = rand_int(&mut self.rng, 3, 8);
            let lie = chance(&mut self.rng, 0.5);
            self.apply_score(now_ms, bonus, lie);
            self.toast(format!("Streak bonus +{bonus}"));
            self.sound(SoundCue::Win);
        }

        self.maybe_swap_texts(phase);
        ClickOutcome::Scored { delta, lied }
    }

    /// The overlay's single button: an RPS pick while gated, otherwise "continue"
    pub fn press_overlay_button(&mut self, now_ms: u64) -> Option<RoundReport> {
        if let Mode::RpsGate(m) = &self.mode {
            let hand = m.button_hand();
            return self.rps_pick(hand, now_ms);
        }
        self.emit(ClickerEvent::OverlayHidden);
        self.toast("Continuing was brave.".to_string());
        None
    }

    /// Ask the button whether it wants to run away from the cursor.
    /// Returns the new top-left position when it moves.
    pub fn dodge(&mut self, cursor: Vec2, button: ButtonRect, viewport: Vec2) -> Option<Vec2> {
        if !self.clock.is_started() || !self.avoid_cursor || self.mode.is_gated() {
            return None;
        }
        if cursor.distance(button.center()) >= DODGE_RADIUS || !chance(&mut self.rng, 0.6) {
            return None;
        }

        let max_x = ((viewport.x - button.size.x) as i64 - DODGE_PAD).max(DODGE_PAD);
        let max_y = ((viewport.y - button.size.y) as i64 - DODGE_PAD).max(DODGE_TOP);
        let x = rand_int(&mut self.rng, DODGE_PAD, max_x) as f32;
        let y = rand_int(&mut self.rng, DODGE_TOP, max_y) as f32;

        self.emit(ClickerEvent::ButtonMoved { x, y });
        self.sound(SoundCue::Chaos);
        Some(Vec2::new(x, y))
    }

    // --- Gates ---

    /// Open the rock-paper-scissors gate. No-op while another gate is up.
    pub fn start_rps_gate(&mut self) -> bool {
        if self.mode.is_gated() {
            return false;
        }
        log::info!("RPS gate opened");
        self.hold_freeze();
        self.mode = Mode::RpsGate(RpsMatch::new());
        self.emit(ClickerEvent::InputEnabled { enabled: false });
        self.emit(ClickerEvent::OverlayShown {
            title: "ROCK · PAPER · SCISSORS".to_string(),
            message: "Win 2 out of 3 to continue".to_string(),
        });
        self.emit(ClickerEvent::RpsButton { hand: Hand::Rock });
        true
    }

    /// Play `hand` against a random CPU hand
    pub fn rps_pick(&mut self, hand: Hand, now_ms: u64) -> Option<RoundReport> {
        if !matches!(self.mode, Mode::RpsGate(_)) {
            return None;
        }
        let cpu = pick(&mut self.rng, &Hand::ALL).copied().unwrap_or(Hand::Rock);
        self.play_rps_round(hand, cpu, now_ms)
    }

    /// Play one round against a known CPU hand (replays, scripted hosts)
    pub fn play_rps_round(&mut self, player: Hand, cpu: Hand, now_ms: u64) -> Option<RoundReport> {
        let Mode::RpsGate(m) = &mut self.mode else {
            return None;
        };
        let report = m.play_round(player, cpu)?;

        match report.outcome {
            RoundOutcome::Win => self.sound(SoundCue::Good),
            RoundOutcome::Lose => {
                let (lo, hi) = self.tuning.rps_round_penalty;
                let penalty = rand_int(&mut self.rng, lo, hi);
                self.apply_score(now_ms, -penalty, true);
                self.toast(format!("RPS penalty: -{penalty}"));
                self.sound(SoundCue::Bad);
            }
            RoundOutcome::Tie => self.sound(SoundCue::Chaos),
        }

        self.emit(ClickerEvent::OverlayUpdated {
            title: None,
            message: format!(
                "You: {} | CPU: {}\nYou {} – {} CPU\nWin 2 out of 3 to continue",
                report.player.label(),
                report.cpu.label(),
                report.player_wins,
                report.cpu_wins
            ),
        });
        self.emit(ClickerEvent::RpsButton {
            hand: player.next(),
        });

        if let Some(result) = report.decided {
            log::debug!("RPS match decided: {result:?}");
            self.tasks
                .schedule_in(now_ms, self.tuning.rps_settle_ms, ClickerTask::RpsSettle);
        }
        Some(report)
    }

    /// Show a fake loss screen. Never touches the real score.
    pub fn trigger_fake_error(&mut self, now_ms: u64) -> bool {
        if self.mode.is_gated() {
            return false;
        }
        let (title, message) = pick(&mut self.rng, &FAKE_ERRORS)
            .copied()
            .unwrap_or(FAKE_ERRORS[0]);
        log::info!("Fake error: {title}");
        self.hold_freeze();

        self.mode = Mode::FakeError(FakeErrorState {
            stage: FakeErrorStage::Shown,
            saved_display: self.score.displayed(),
            saved_backdrop: self.backdrop,
        });
        self.set_backdrop(Backdrop::Alarm);
        self.set_shake(true);
        self.emit(ClickerEvent::InputEnabled { enabled: false });
        self.emit(ClickerEvent::OverlayShown {
            title: title.to_string(),
            message: message.to_string(),
        });
        self.sound(SoundCue::Bad);
        self.emit(ClickerEvent::ScoreShown { value: 0 });

        self.tasks.schedule_in(
            now_ms,
            self.tuning.fake_error_recover_ms,
            ClickerTask::FakeErrorRecovering,
        );
        self.tasks.schedule_in(
            now_ms,
            self.tuning.fake_error_restore_ms,
            ClickerTask::FakeErrorRestore,
        );
        true
    }

    // --- Internals ---

    fn announce_fresh_run(&mut self) {
        self.emit(ClickerEvent::Chaos {
            value: self.chaos.value(),
            mood: self.chaos.mood(),
        });
        self.emit(ClickerEvent::ScoreShown { value: 0 });
        self.log_line("Click the button. It’s fine. 🙂");
    }

    fn start_win_sequence(&mut self, now_ms: u64) {
        self.win_shown = true;
        log::info!("Fake win at real score {}", self.score.real());
        self.emit(ClickerEvent::OverlayShown {
            title: "YOU WIN".to_string(),
            message: "This seems… suspiciously easy.".to_string(),
        });
        self.sound(SoundCue::Win);
        self.freeze_input(now_ms, self.tuning.win_relabel_ms);
        self.tasks
            .schedule_in(now_ms, self.tuning.win_relabel_ms, ClickerTask::WinRelabel);
        self.tasks
            .schedule_in(now_ms, self.tuning.win_fee_ms, ClickerTask::WinFee);
    }

    fn minor_event(&mut self, now_ms: u64) {
        match rand_int(&mut self.rng, 1, 4) {
            1 => {
                let ms = rand_ms(&mut self.rng, 450, 1200);
                self.freeze_input(now_ms, ms);
                self.toast("Freeze! (for fun)".to_string());
                self.sound(SoundCue::Chaos);
            }
            2 => {
                let bonus = rand_int(&mut self.rng, 2, 6);
                let lie = chance(&mut self.rng, 0.4);
                self.apply_score(now_ms, bonus, lie);
                self.toast(format!("Mystery bonus +{bonus}"));
                self.sound(SoundCue::Good);
            }
            3 => {
                let prank = rand_int(&mut self.rng, 2, 7);
                let lie = chance(&mut self.rng, 0.4);
                self.apply_score(now_ms, -prank, lie);
                self.toast(format!("Prank tax -{prank}"));
                self.sound(SoundCue::Bad);
            }
            _ => {
                self.emit(ClickerEvent::ButtonText {
                    text: "HONEST BUTTON".to_string(),
                });
                self.emit(ClickerEvent::Subtitle {
                    text: "This statement has not been verified.".to_string(),
                });
                self.sound(SoundCue::Chaos);
            }
        }
    }

    fn maybe_swap_texts(&mut self, phase: Phase) {
        if phase == Phase::Warmup {
            return;
        }
        let p = if phase == Phase::Party { 0.25 } else { 0.12 };
        if chance(&mut self.rng, p) {
            if let Some(text) = pick(&mut self.rng, &BUTTON_PHRASES).copied() {
                self.emit(ClickerEvent::ButtonText {
                    text: text.to_string(),
                });
            }
        }
        if chance(&mut self.rng, 0.08) {
            if let Some(text) = pick(&mut self.rng, &SUBTITLE_PHRASES).copied() {
                self.emit(ClickerEvent::Subtitle {
                    text: text.to_string(),
                });
            }
        }
    }

    /// Block clicks for `ms`. Overlapping freezes extend each other; gates win.
    fn freeze_input(&mut self, now_ms: u64, ms: u64) {
        let until_ms = match self.mode {
            Mode::Idle => now_ms + ms,
            Mode::Frozen { until_ms } => until_ms.max(now_ms + ms),
            Mode::RpsGate(_) | Mode::FakeError(_) => return,
        };
        self.mode = Mode::Frozen { until_ms };
        self.emit(ClickerEvent::InputEnabled { enabled: false });
        self.schedule_unfreeze(until_ms);
    }

    fn schedule_unfreeze(&mut self, until_ms: u64) {
        self.cancel_unfreeze();
        self.unfreeze_task = Some(self.tasks.schedule_at(until_ms, ClickerTask::Unfreeze));
    }

    fn cancel_unfreeze(&mut self) {
        if let Some(id) = self.unfreeze_task.take() {
            self.tasks.cancel(id);
        }
    }

    /// A gate is about to take over the mode; park any running freeze
    fn hold_freeze(&mut self) {
        if let Mode::Frozen { until_ms } = self.mode {
            self.held_freeze = Some(until_ms);
            self.cancel_unfreeze();
        }
    }

    /// Leave a gate. Input comes back unless a parked freeze still has time left.
    fn close_gate(&mut self, now_ms: u64) {
        match self.held_freeze.take() {
            Some(until_ms) if until_ms > now_ms => {
                self.mode = Mode::Frozen { until_ms };
                self.schedule_unfreeze(until_ms);
            }
            _ => {
                self.mode = Mode::Idle;
                self.emit(ClickerEvent::InputEnabled { enabled: true });
            }
        }
    }

    fn run_due_tasks(&mut self, now_ms: u64) {
        while let Some((due, task)) = self.tasks.pop_due(now_ms) {
            self.fire(task, due);
        }
    }

    fn fire(&mut self, task: ClickerTask, at_ms: u64) {
        match task {
            ClickerTask::Unfreeze => {
                self.unfreeze_task = None;
                if let Mode::Frozen { until_ms } = self.mode {
                    if until_ms <= at_ms {
                        self.mode = Mode::Idle;
                        self.emit(ClickerEvent::InputEnabled { enabled: true });
                    }
                }
            }
            ClickerTask::DeferredScore { delta } => {
                if !self.mode.is_gated() {
                    self.apply_score(at_ms, delta, false);
                }
            }
            ClickerTask::WinRelabel => {
                // A gate that opened meanwhile owns the overlay now
                if !self.mode.is_gated() {
                    self.emit(ClickerEvent::OverlayUpdated {
                        title: Some("JUST KIDDING".to_string()),
                        message: "Winning has a small processing fee.".to_string(),
                    });
                    self.sound(SoundCue::Bad);
                }
            }
            ClickerTask::WinFee => {
                if !self.mode.is_gated() {
                    self.emit(ClickerEvent::OverlayHidden);
                }
                let (lo, hi) = self.tuning.win_fee;
                let fee = rand_int(&mut self.rng, lo, hi);
                self.apply_score(at_ms, -fee, true);
                self.toast(format!("Processing fee: -{fee}"));
            }
            ClickerTask::FakeErrorRecovering => {
                if let Mode::FakeError(state) = &mut self.mode {
                    state.stage = FakeErrorStage::Recovering;
                    self.emit(ClickerEvent::OverlayUpdated {
                        title: Some("RECOVERING…".to_string()),
                        message: "Please do not unplug the button.".to_string(),
                    });
                    self.sound(SoundCue::Chaos);
                }
            }
            ClickerTask::FakeErrorRestore => {
                if let Mode::FakeError(state) = self.mode {
                    self.close_gate(at_ms);
                    self.emit(ClickerEvent::OverlayHidden);
                    self.set_shake(false);
                    self.set_backdrop(state.saved_backdrop);
                    self.score.restore_displayed(state.saved_display);
                    self.emit(ClickerEvent::ScoreShown {
                        value: state.saved_display,
                    });
                    self.toast("Error resolved.".to_string());
                    log::debug!("Fake error resolved");
                }
            }
            ClickerTask::RpsSettle => self.settle_rps(at_ms),
        }
    }

    fn settle_rps(&mut self, now_ms: u64) {
        let decided = match &self.mode {
            Mode::RpsGate(m) => m.decided(),
            _ => return,
        };
        match decided {
            Some(MatchResult::PlayerWon) => {
                log::info!("RPS gate cleared");
                self.close_gate(now_ms);
                self.emit(ClickerEvent::OverlayHidden);
                self.toast("You may continue.".to_string());
                self.sound(SoundCue::Good);
            }
            Some(MatchResult::CpuWon) => {
                let (lo, hi) = self.tuning.rps_match_penalty;
                let penalty = rand_int(&mut self.rng, lo, hi);
                self.apply_score(now_ms, -penalty, true);
                self.toast(format!("Match loss: -{penalty}"));

                if let Mode::RpsGate(m) = &mut self.mode {
                    m.rematch();
                }
                self.emit(ClickerEvent::OverlayShown {
                    title: "YOU LOST".to_string(),
                    message: "Rock Paper Scissors says no.\nTry again.".to_string(),
                });
                self.emit(ClickerEvent::RpsButton { hand: Hand::Rock });
                self.sound(SoundCue::Bad);
            }
            None => {}
        }
    }

    fn apply_score(&mut self, now_ms: u64, delta: i64, lie: bool) -> i64 {
        let phase = self.clock.phase(now_ms);
        let shown = self.score.apply_delta(delta, lie, phase, &mut self.rng);
        // The fake error keeps showing its corrupted zero
        if !matches!(self.mode, Mode::FakeError(_)) {
            self.emit(ClickerEvent::ScoreShown { value: shown });
        }
        shown
    }

    fn observe_phase(&mut self, now_ms: u64) -> Phase {
        let phase = self.clock.phase(now_ms);
        if self.last_phase != Some(phase) {
            log::info!("Clicker phase: {}", phase.name());
            self.last_phase = Some(phase);
            self.emit(ClickerEvent::PhaseChanged { phase });
        }
        phase
    }

    fn add_chaos(&mut self, amount: f32) {
        let mood = self.chaos.increase(amount);
        self.emit(ClickerEvent::Chaos {
            value: self.chaos.value(),
            mood,
        });
    }

    fn set_shake(&mut self, on: bool) {
        if self.shaking != on {
            self.shaking = on;
            self.emit(ClickerEvent::Shake { on });
        }
    }

    fn set_avoid_cursor(&mut self, on: bool) {
        if self.avoid_cursor != on {
            self.avoid_cursor = on;
            self.emit(ClickerEvent::AvoidCursor { on });
        }
    }

    fn set_backdrop(&mut self, backdrop: Backdrop) {
        self.backdrop = backdrop;
        self.emit(ClickerEvent::Background { backdrop });
    }

    fn verdict_sound(&mut self, good: bool) {
        self.sound(if good { SoundCue::Good } else { SoundCue::Bad });
    }

    fn sound(&mut self, cue: SoundCue) {
        self.emit(ClickerEvent::Sound { cue });
    }

    fn toast(&mut self, text: String) {
        self.emit(ClickerEvent::Toast { text });
    }

    fn log_line(&mut self, text: &str) {
        self.emit(ClickerEvent::Log {
            text: text.to_string(),
        });
    }

    fn emit(&mut self, event: ClickerEvent) {
        self.events.push(event);
    }
}
