use rand::Rng;
use serde::Serialize;

use arcade_core::arcade_game_boilerplate;
use arcade_core::game_trait::{ArcadeGame, GameContext, GameInput};
use arcade_core::timers::TimerId;

use crate::config::RockPaperScissorsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Rock,
    Paper,
    Scissors,
}

impl Hand {
    pub const ALL: [Hand; 3] = [Hand::Rock, Hand::Paper, Hand::Scissors];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    fn index(self) -> usize {
        match self {
            Self::Rock => 0,
            Self::Paper => 1,
            Self::Scissors => 2,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Rock => "✊",
            Self::Paper => "✋",
            Self::Scissors => "✌️",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
    Tie,
    Win,
    Loss,
}

impl RoundResult {
    /// `(player - computer + 3) mod 3`: 0 tie, 1 win, 2 loss.
    pub fn of(player: Hand, computer: Hand) -> Self {
        match (player.index() + 3 - computer.index()) % 3 {
            0 => Self::Tie,
            1 => Self::Win,
            _ => Self::Loss,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RockPaperScissorsState {
    pub last_round: Option<(Hand, Hand, RoundResult)>,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub score: u32,
    pub over: bool,
}

/// Endless rounds against a random computer hand.
pub struct RockPaperScissors {
    config: RockPaperScissorsConfig,
    state: RockPaperScissorsState,
}

impl RockPaperScissors {
    pub fn new(config: RockPaperScissorsConfig) -> Self {
        Self {
            config,
            state: RockPaperScissorsState {
                last_round: None,
                wins: 0,
                losses: 0,
                ties: 0,
                score: 0,
                over: false,
            },
        }
    }

    pub fn state(&self) -> &RockPaperScissorsState {
        &self.state
    }

    /// Play `player` against a fixed computer hand.
    pub fn play(&mut self, player: Hand, computer: Hand, ctx: &mut GameContext<'_>) {
        let result = RoundResult::of(player, computer);
        self.state.last_round = Some((player, computer, result));
        match result {
            RoundResult::Tie => self.state.ties += 1,
            RoundResult::Loss => self.state.losses += 1,
            RoundResult::Win => {
                self.state.wins += 1;
                self.state.score = self.state.wins * self.config.points;
                ctx.report_score(self.state.score);
            },
        }
    }
}

impl ArcadeGame for RockPaperScissors {
    fn start(&mut self, _ctx: &mut GameContext<'_>) {}

    fn handle_input(&mut self, input: &GameInput, ctx: &mut GameContext<'_>) {
        let GameInput::Select(index) = *input else {
            return;
        };
        let Some(player) = Hand::from_index(index) else {
            return;
        };
        let computer = Hand::ALL[ctx.rng().random_range(0..Hand::ALL.len())];
        self.play(player, computer, ctx);
    }

    fn on_timer(&mut self, _timer: TimerId, _ctx: &mut GameContext<'_>) {}

    arcade_game_boilerplate!();
}

#[cfg(test)]
mod tests {
    use arcade_core::game_trait::GameEvent;
    use arcade_core::test_helpers::{
        contract_input_after_stop_is_ignored, contract_start_produces_view,
        contract_stop_cancels_timers, start_session,
    };

    use super::*;

    fn new_game() -> RockPaperScissors {
        RockPaperScissors::new(RockPaperScissorsConfig::default())
    }

    #[test]
    fn contract() {
        contract_start_produces_view(Box::new(new_game()));
        contract_stop_cancels_timers(Box::new(new_game()));
        contract_input_after_stop_is_ignored(Box::new(new_game()), &[GameInput::Select(0)]);
    }

    #[test]
    fn result_table() {
        use Hand::*;
        assert_eq!(RoundResult::of(Rock, Rock), RoundResult::Tie);
        assert_eq!(RoundResult::of(Paper, Rock), RoundResult::Win);
        assert_eq!(RoundResult::of(Scissors, Paper), RoundResult::Win);
        assert_eq!(RoundResult::of(Rock, Scissors), RoundResult::Win);
        assert_eq!(RoundResult::of(Rock, Paper), RoundResult::Loss);
        assert_eq!(RoundResult::of(Scissors, Rock), RoundResult::Loss);
    }

    #[test]
    fn score_counts_wins_only() {
        let mut session = start_session(new_game(), 1);
        session.drive(|g, ctx| g.play(Hand::Paper, Hand::Rock, ctx));
        session.drive(|g, ctx| g.play(Hand::Paper, Hand::Scissors, ctx));
        session.drive(|g, ctx| g.play(Hand::Paper, Hand::Paper, ctx));
        session.drive(|g, ctx| g.play(Hand::Rock, Hand::Scissors, ctx));
        assert_eq!(
            session.drain_events(),
            vec![
                GameEvent::ScoreUpdate { score: 10 },
                GameEvent::ScoreUpdate { score: 20 },
            ]
        );
        let state = session.game().state();
        assert_eq!((state.wins, state.losses, state.ties), (2, 1, 1));
    }

    #[test]
    fn clicks_play_random_rounds() {
        let mut session = start_session(new_game(), 1);
        for _ in 0..30 {
            session.handle_input(&GameInput::Select(2));
        }
        session.handle_input(&GameInput::Select(3));
        let state = session.game().state();
        assert_eq!(state.wins + state.losses + state.ties, 30);
        assert_eq!(state.score, state.wins * 10);
    }
}
