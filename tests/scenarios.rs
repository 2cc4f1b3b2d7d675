use prank_arcade::clicker::{Hand, MatchResult, Mode, Phase, ScoreModel};
use prank_arcade::platformer::{Dot, FrameInput, PlatformerState, RunStatus, StepOutcome, step};
use prank_arcade::{ClickerSession, ClickerTuning};
use rand::SeedableRng;
use rand_pcg::Pcg32;

#[test]
fn honest_delta_shows_as_is() {
    let mut rng = Pcg32::seed_from_u64(1);
    let mut score = ScoreModel::new();
    let shown = score.apply_delta(5, false, Phase::Warmup, &mut rng);
    assert_eq!(score.real(), 5);
    assert_eq!(score.displayed(), 5);
    assert_eq!(shown, 5);
}

#[test]
fn lying_delta_stays_within_eight() {
    for seed in 0..64 {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut score = ScoreModel::new();
        score.apply_delta(10, false, Phase::Warmup, &mut rng);
        score.apply_delta(-3, true, Phase::Warmup, &mut rng);
        assert_eq!(score.real(), 7);
        assert!((-1..=15).contains(&score.displayed()), "seed {seed}: {}", score.displayed());
    }
}

#[test]
fn two_rps_losses_reopen_the_match() {
    let tuning = ClickerTuning {
        rps_round_penalty: (3, 3),
        rps_match_penalty: (8, 8),
        ..Default::default()
    };
    let mut session = ClickerSession::with_tuning(42, tuning);
    session.click(0);
    let before = session.score().real();

    assert!(session.start_rps_gate());
    session.play_rps_round(Hand::Rock, Hand::Paper, 100);
    let report = session
        .play_rps_round(Hand::Scissors, Hand::Rock, 200)
        .expect("second round is played");
    assert_eq!(report.decided, Some(MatchResult::CpuWon));

    session.update(1_000);
    let m = session.rps_match().expect("gate stays open");
    assert_eq!((m.player_wins(), m.cpu_wins()), (0, 0));
    assert!(matches!(session.mode(), Mode::RpsGate(_)));
    assert_eq!(before - session.score().real(), 3 + 3 + 8);
}

#[test]
fn culled_platforms_are_replaced_one_for_one() {
    let mut state = PlatformerState::new(7);
    let target = state.tuning.target_platforms;
    // One dot per generated platform; the start platform has none
    state.platforms.truncate(target);
    state.dots.truncate(target - 1);
    // Keep the player far above everything so it never lands or dies
    state.player.pos.y = -100_000.0;
    state.player.grounded = false;

    let mut spawned = state.spawned;
    for removal in 0..2 {
        let mut frames = 0;
        while state.spawned == spawned {
            assert_eq!(step(&mut state, &FrameInput::default()), StepOutcome::Continue);
            frames += 1;
            assert!(frames < 1_000, "platform {removal} never scrolled away");
        }
        assert_eq!(state.spawned, spawned + 1);
        spawned = state.spawned;

        assert_eq!(state.platforms.len(), target);
        assert!(state.platforms.iter().all(|p| p.right() > -50.0));
        // The start platform had no dot; later ones lose theirs to culling first
        assert_eq!(state.dots.len(), target);
        for dot in &state.dots {
            assert!(
                state.platforms.iter().any(|p| p.center_x() == dot.pos.x),
                "orphan dot at {}",
                dot.pos.x
            );
        }
    }
    assert_eq!(state.dots_collected, 0);
}

#[test]
fn two_hundredth_dot_wins_and_halts() {
    let mut state = PlatformerState::new(9);
    state.dots_collected = 199;
    let center = state.player.center();
    state.dots.push(Dot {
        pos: center + glam::Vec2::new(state.tuning.speed, 0.0),
        r: 6.0,
        collected: false,
    });

    assert_eq!(step(&mut state, &FrameInput::default()), StepOutcome::Won);
    assert_eq!(state.dots_collected, 200);
    assert_eq!(state.status, RunStatus::Won);

    let player = state.player;
    let platforms = state.platforms.clone();
    let frame = state.frame;
    assert_eq!(step(&mut state, &FrameInput { jump: true }), StepOutcome::Halted);
    assert_eq!(state.player, player);
    assert_eq!(state.platforms, platforms);
    assert_eq!(state.frame, frame);
}
