use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use arcade_core::arcade_game_boilerplate;
use arcade_core::game_trait::{ArcadeGame, GameContext, GameInput};
use arcade_core::timers::TimerId;

use crate::config::TicTacToeConfig;

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mark {
    X,
    O,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    PlayerWins,
    ComputerWins,
    Tie,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicTacToeState {
    pub board: [Option<Mark>; 9],
    pub turn: Mark,
    pub outcome: Option<Outcome>,
    pub status: String,
    pub score: u32,
    pub over: bool,
}

/// Player X against a computer that plays a random empty cell.
pub struct TicTacToe {
    config: TicTacToeConfig,
    state: TicTacToeState,
    computer_timer: Option<TimerId>,
}

impl TicTacToe {
    pub fn new(config: TicTacToeConfig) -> Self {
        Self {
            config,
            state: TicTacToeState {
                board: [None; 9],
                turn: Mark::X,
                outcome: None,
                status: "Player X's Turn".to_string(),
                score: 0,
                over: false,
            },
            computer_timer: None,
        }
    }

    pub fn state(&self) -> &TicTacToeState {
        &self.state
    }

    /// Play O at `cell` now, cancelling the pending computer move. Returns
    /// false when it is not O's turn or the cell is taken.
    pub fn computer_move(&mut self, cell: usize, ctx: &mut GameContext<'_>) -> bool {
        if self.state.over || self.state.turn != Mark::O || !self.is_empty(cell) {
            return false;
        }
        ctx.clear_slot(&mut self.computer_timer);
        self.state.board[cell] = Some(Mark::O);
        if !self.check_end(ctx) {
            self.state.turn = Mark::X;
            self.state.status = "Player X's Turn".to_string();
        }
        true
    }

    fn is_empty(&self, cell: usize) -> bool {
        self.state.board.get(cell).is_some_and(|c| c.is_none())
    }

    fn outcome(&self) -> Option<Outcome> {
        let board = &self.state.board;
        for [a, b, c] in LINES {
            if let Some(mark) = board[a]
                && board[b] == Some(mark)
                && board[c] == Some(mark)
            {
                return Some(match mark {
                    Mark::X => Outcome::PlayerWins,
                    Mark::O => Outcome::ComputerWins,
                });
            }
        }
        board.iter().all(Option::is_some).then_some(Outcome::Tie)
    }

    /// Finish the game if the board is decided. Returns whether it was.
    fn check_end(&mut self, ctx: &mut GameContext<'_>) -> bool {
        let Some(outcome) = self.outcome() else {
            return false;
        };
        self.state.over = true;
        self.state.outcome = Some(outcome);
        let (status, points) = match outcome {
            Outcome::PlayerWins => ("🎉 You Win!", Some(self.config.win_points)),
            Outcome::ComputerWins => ("😢 Computer Wins!", None),
            Outcome::Tie => ("It's a Tie!", Some(self.config.tie_points)),
        };
        self.state.status = status.to_string();
        if let Some(points) = points {
            self.state.score += points;
            ctx.report_score(self.state.score);
        }
        ctx.clear_slot(&mut self.computer_timer);
        ctx.finish(self.state.score);
        true
    }
}

impl ArcadeGame for TicTacToe {
    fn start(&mut self, _ctx: &mut GameContext<'_>) {}

    fn handle_input(&mut self, input: &GameInput, ctx: &mut GameContext<'_>) {
        let GameInput::Select(cell) = *input else {
            return;
        };
        if self.state.over || self.state.turn != Mark::X || !self.is_empty(cell) {
            return;
        }
        self.state.board[cell] = Some(Mark::X);
        if self.check_end(ctx) {
            return;
        }
        self.state.turn = Mark::O;
        self.state.status = "Computer's Turn".to_string();
        self.computer_timer = Some(ctx.set_timeout(Duration::from_millis(
            self.config.computer_delay_ms,
        )));
    }

    fn on_timer(&mut self, timer: TimerId, ctx: &mut GameContext<'_>) {
        if self.computer_timer != Some(timer) {
            return;
        }
        self.computer_timer = None;
        let empty: Vec<usize> = (0..9).filter(|&i| self.is_empty(i)).collect();
        if empty.is_empty() {
            return;
        }
        let cell = empty[ctx.rng().random_range(0..empty.len())];
        self.computer_move(cell, ctx);
    }

    arcade_game_boilerplate!();
}
