use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use arcade_core::arcade_game_boilerplate;
use arcade_core::game_trait::{ArcadeGame, GameContext, GameInput};
use arcade_core::timers::TimerId;

use crate::config::ColorMatchConfig;

#[derive(Debug, Clone, Serialize)]
pub struct ColorMatchState {
    /// Colour name shown, upper-cased.
    pub word: String,
    /// Colour the word is painted in.
    pub ink: String,
    pub correct: u32,
    pub time_left: u32,
    pub score: u32,
    pub over: bool,
}

/// Say whether the word names the colour it is painted in, against the clock.
pub struct ColorMatch {
    config: ColorMatchConfig,
    state: ColorMatchState,
    matching: bool,
    countdown: Option<TimerId>,
}

impl ColorMatch {
    pub fn new(config: ColorMatchConfig) -> Self {
        Self {
            state: ColorMatchState {
                word: String::new(),
                ink: String::new(),
                correct: 0,
                time_left: config.duration_secs,
                score: 0,
                over: false,
            },
            matching: false,
            countdown: None,
            config,
        }
    }

    pub fn state(&self) -> &ColorMatchState {
        &self.state
    }

    fn new_round(&mut self, ctx: &mut GameContext<'_>) {
        let colors = &self.config.colors;
        let word = ctx.rng().random_range(0..colors.len());
        let ink = ctx.rng().random_range(0..colors.len());
        self.state.word = colors[word].to_uppercase();
        self.state.ink = colors[ink].clone();
        self.matching = word == ink;
    }
}

impl ArcadeGame for ColorMatch {
    fn start(&mut self, ctx: &mut GameContext<'_>) {
        self.new_round(ctx);
        self.countdown = Some(ctx.set_interval(Duration::from_secs(1)));
    }

    fn handle_input(&mut self, input: &GameInput, ctx: &mut GameContext<'_>) {
        let GameInput::Answer(answer) = *input else {
            return;
        };
        if self.state.over {
            return;
        }
        if answer == self.matching {
            self.state.correct += 1;
            self.state.score = self.state.correct * self.config.points;
            ctx.report_score(self.state.score);
        }
        self.new_round(ctx);
    }

    fn on_timer(&mut self, timer: TimerId, ctx: &mut GameContext<'_>) {
        if self.countdown != Some(timer) || self.state.over {
            return;
        }
        self.state.time_left = self.state.time_left.saturating_sub(1);
        if self.state.time_left == 0 {
            self.state.over = true;
            ctx.clear_slot(&mut self.countdown);
            ctx.notify(format!("Time's up! You got {} correct!", self.state.correct));
            ctx.finish(self.state.score);
        }
    }

    arcade_game_boilerplate!();
}
