//! Rock-paper-scissors gate: best of three, and you cannot leave until you win

use serde::{Deserialize, Serialize};

/// Round wins needed to decide a match
pub const MATCH_TARGET: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    Rock,
    Paper,
    Scissors,
}

impl Hand {
    pub const ALL: [Hand; 3] = [Hand::Rock, Hand::Paper, Hand::Scissors];

    /// The hand this one defeats
    pub fn beats(self) -> Hand {
        match self {
            Hand::Rock => Hand::Scissors,
            Hand::Paper => Hand::Rock,
            Hand::Scissors => Hand::Paper,
        }
    }

    /// Next hand in the overlay button cycle
    pub fn next(self) -> Hand {
        match self {
            Hand::Rock => Hand::Paper,
            Hand::Paper => Hand::Scissors,
            Hand::Scissors => Hand::Rock,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Hand::Rock => "Rock",
            Hand::Paper => "Paper",
            Hand::Scissors => "Scissors",
        }
    }
}

/// Result of one round from the player's side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    Win,
    Lose,
    Tie,
}

pub fn judge(player: Hand, cpu: Hand) -> RoundOutcome {
    if player == cpu {
        RoundOutcome::Tie
    } else if player.beats() == cpu {
        RoundOutcome::Win
    } else {
        RoundOutcome::Lose
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    PlayerWon,
    CpuWon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RpsStage {
    /// Waiting for the player's pick
    Awaiting,
    /// Match decided; picks are ignored until the settle delay runs out
    Settling(MatchResult),
}

/// What a resolved round looked like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub player: Hand,
    pub cpu: Hand,
    pub outcome: RoundOutcome,
    pub player_wins: u8,
    pub cpu_wins: u8,
    pub decided: Option<MatchResult>,
}

/// One best-of-three attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpsMatch {
    player_wins: u8,
    cpu_wins: u8,
    stage: RpsStage,
    button_hand: Hand,
}

impl Default for RpsMatch {
    fn default() -> Self {
        Self::new()
    }
}

impl RpsMatch {
    pub fn new() -> Self {
        Self {
            player_wins: 0,
            cpu_wins: 0,
            stage: RpsStage::Awaiting,
            button_hand: Hand::Rock,
        }
    }

    pub fn player_wins(&self) -> u8 {
        self.player_wins
    }

    pub fn cpu_wins(&self) -> u8 {
        self.cpu_wins
    }

    pub fn stage(&self) -> RpsStage {
        self.stage
    }

    /// Hand currently offered on the overlay button
    pub fn button_hand(&self) -> Hand {
        self.button_hand
    }

    pub fn decided(&self) -> Option<MatchResult> {
        match self.stage {
            RpsStage::Settling(result) => Some(result),
            RpsStage::Awaiting => None,
        }
    }

    /// Resolve one round. Returns `None` while the match is settling.
    pub fn play_round(&mut self, player: Hand, cpu: Hand) -> Option<RoundReport> {
        if self.stage != RpsStage::Awaiting {
            return None;
        }

        let outcome = judge(player, cpu);
        match outcome {
            RoundOutcome::Win => self.player_wins += 1,
            RoundOutcome::Lose => self.cpu_wins += 1,
            RoundOutcome::Tie => {}
        }
        self.button_hand = player.next();

        let decided = if self.player_wins >= MATCH_TARGET {
            Some(MatchResult::PlayerWon)
        } else if self.cpu_wins >= MATCH_TARGET {
            Some(MatchResult::CpuWon)
        } else {
            None
        };
        if let Some(result) = decided {
            self.stage = RpsStage::Settling(result);
        }

        Some(RoundReport {
            player,
            cpu,
            outcome,
            player_wins: self.player_wins,
            cpu_wins: self.cpu_wins,
            decided,
        })
    }

    /// Start over after a lost match
    pub fn rematch(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_judge_cycle() {
        assert_eq!(judge(Hand::Rock, Hand::Scissors), RoundOutcome::Win);
        assert_eq!(judge(Hand::Scissors, Hand::Paper), RoundOutcome::Win);
        assert_eq!(judge(Hand::Paper, Hand::Rock), RoundOutcome::Win);
        assert_eq!(judge(Hand::Rock, Hand::Paper), RoundOutcome::Lose);
        assert_eq!(judge(Hand::Paper, Hand::Paper), RoundOutcome::Tie);
    }

    #[test]
    fn test_two_one_player_win_settles() {
        let mut m = RpsMatch::new();
        m.play_round(Hand::Rock, Hand::Scissors);
        m.play_round(Hand::Rock, Hand::Paper);
        let report = m.play_round(Hand::Paper, Hand::Rock).unwrap();
        assert_eq!((report.player_wins, report.cpu_wins), (2, 1));
        assert_eq!(report.decided, Some(MatchResult::PlayerWon));
        // Further picks are ignored while settling
        assert!(m.play_round(Hand::Rock, Hand::Scissors).is_none());
        assert_eq!(m.player_wins(), 2);
    }

    #[test]
    fn test_button_cycles_from_last_pick() {
        let mut m = RpsMatch::new();
        assert_eq!(m.button_hand(), Hand::Rock);
        m.play_round(Hand::Rock, Hand::Rock);
        assert_eq!(m.button_hand(), Hand::Paper);
        m.play_round(Hand::Scissors, Hand::Scissors);
        assert_eq!(m.button_hand(), Hand::Rock);
    }

    #[test]
    fn test_rematch_resets() {
        let mut m = RpsMatch::new();
        m.play_round(Hand::Rock, Hand::Paper);
        m.play_round(Hand::Rock, Hand::Paper);
        assert_eq!(m.decided(), Some(MatchResult::CpuWon));
        m.rematch();
        assert_eq!((m.player_wins(), m.cpu_wins()), (0, 0));
        assert_eq!(m.stage(), RpsStage::Awaiting);
    }

    fn hand() -> impl Strategy<Value = Hand> {
        prop_oneof![Just(Hand::Rock), Just(Hand::Paper), Just(Hand::Scissors)]
    }

    proptest! {
        #[test]
        fn prop_counters_never_pass_target(rounds in proptest::collection::vec((hand(), hand()), 0..40)) {
            let mut m = RpsMatch::new();
            for (player, cpu) in rounds {
                match m.play_round(player, cpu) {
                    Some(report) => {
                        prop_assert!(report.player_wins <= MATCH_TARGET);
                        prop_assert!(report.cpu_wins <= MATCH_TARGET);
                        let either_at_target = report.player_wins == MATCH_TARGET
                            || report.cpu_wins == MATCH_TARGET;
                        prop_assert_eq!(report.decided.is_some(), either_at_target);
                    }
                    None => {
                        prop_assert!(m.decided().is_some());
                        if m.decided() == Some(MatchResult::CpuWon) {
                            m.rematch();
                        }
                    }
                }
            }
        }
    }
}
