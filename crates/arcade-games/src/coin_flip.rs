use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use arcade_core::arcade_game_boilerplate;
use arcade_core::game_trait::{ArcadeGame, GameContext, GameInput};
use arcade_core::timers::TimerId;

use crate::config::CoinFlipConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Heads,
    Tails,
}

impl Side {
    /// `Select(0)` is heads, `Select(1)` tails.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Heads),
            1 => Some(Self::Tails),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Heads => "heads",
            Self::Tails => "tails",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoinFlipState {
    /// The player's call while the coin is in the air.
    pub flipping: Option<Side>,
    pub last_result: Option<Side>,
    pub result_text: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub score: u32,
    pub over: bool,
}

/// Call heads or tails; the coin lands after a short flip.
pub struct CoinFlip {
    config: CoinFlipConfig,
    state: CoinFlipState,
    flip_timer: Option<TimerId>,
}

impl CoinFlip {
    pub fn new(config: CoinFlipConfig) -> Self {
        Self {
            config,
            state: CoinFlipState {
                flipping: None,
                last_result: None,
                result_text: None,
                wins: 0,
                losses: 0,
                score: 0,
                over: false,
            },
            flip_timer: None,
        }
    }

    pub fn state(&self) -> &CoinFlipState {
        &self.state
    }

    /// Land the coin on `result` now.
    pub fn land(&mut self, result: Side, ctx: &mut GameContext<'_>) {
        let Some(call) = self.state.flipping.take() else {
            return;
        };
        ctx.clear_slot(&mut self.flip_timer);
        self.state.last_result = Some(result);
        if call == result {
            self.state.wins += 1;
            self.state.score = self.state.wins * self.config.points;
            self.state.result_text = Some(format!("It's {}! You win! 🎉", result.as_str()));
            ctx.report_score(self.state.score);
        } else {
            self.state.losses += 1;
            self.state.result_text = Some(format!("It's {}! You lose! 😢", result.as_str()));
        }
    }
}

impl ArcadeGame for CoinFlip {
    fn start(&mut self, _ctx: &mut GameContext<'_>) {}

    fn handle_input(&mut self, input: &GameInput, ctx: &mut GameContext<'_>) {
        let GameInput::Select(index) = *input else {
            return;
        };
        let Some(call) = Side::from_index(index) else {
            return;
        };
        if self.state.flipping.is_some() {
            return;
        }
        self.state.flipping = Some(call);
        self.flip_timer = Some(ctx.set_timeout(Duration::from_millis(self.config.flip_ms)));
    }

    fn on_timer(&mut self, timer: TimerId, ctx: &mut GameContext<'_>) {
        if self.flip_timer != Some(timer) {
            return;
        }
        self.flip_timer = None;
        let result = if ctx.rng().random_bool(0.5) {
            Side::Heads
        } else {
            Side::Tails
        };
        self.land(result, ctx);
    }

    arcade_game_boilerplate!();
}
