use rand::Rng;
use serde::Serialize;

use arcade_core::arcade_game_boilerplate;
use arcade_core::game_trait::{ArcadeGame, GameContext, GameInput};
use arcade_core::timers::TimerId;

use crate::config::NumberGuessConfig;

#[derive(Debug, Clone, Serialize)]
pub struct NumberGuessState {
    pub max: u32,
    pub attempts: u32,
    pub feedback: Option<String>,
    pub score: u32,
    pub over: bool,
}

/// Guess the secret number with higher/lower hints.
pub struct NumberGuess {
    config: NumberGuessConfig,
    state: NumberGuessState,
    target: Option<u32>,
}

impl NumberGuess {
    pub fn new(config: NumberGuessConfig) -> Self {
        Self {
            state: NumberGuessState {
                max: config.max,
                attempts: 0,
                feedback: None,
                score: 0,
                over: false,
            },
            target: None,
            config,
        }
    }

    /// Game with a known secret number.
    pub fn with_target(config: NumberGuessConfig, target: u32) -> Self {
        let mut game = Self::new(config);
        game.target = Some(target);
        game
    }

    pub fn state(&self) -> &NumberGuessState {
        &self.state
    }

    fn guess(&mut self, guess: u32, target: u32, ctx: &mut GameContext<'_>) {
        self.state.attempts += 1;
        let feedback = if guess == target {
            self.state.over = true;
            self.state.score = self
                .config
                .base_score
                .saturating_sub(self.state.attempts.saturating_mul(self.config.attempt_penalty));
            ctx.report_score(self.state.score);
            ctx.finish(self.state.score);
            format!("🎉 Correct! You got it in {} attempts!", self.state.attempts)
        } else if guess < target {
            "⬆️ Too low! Try higher.".to_string()
        } else {
            "⬇️ Too high! Try lower.".to_string()
        };
        self.state.feedback = Some(feedback);
    }
}

/// Leading integer of `text`, the way a browser number box reads it:
/// optional whitespace and sign, then as many digits as follow.
fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value = rest[..digits].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

impl ArcadeGame for NumberGuess {
    fn start(&mut self, ctx: &mut GameContext<'_>) {
        if self.target.is_none() {
            self.target = Some(ctx.rng().random_range(1..=self.config.max));
        }
    }

    fn handle_input(&mut self, input: &GameInput, ctx: &mut GameContext<'_>) {
        let GameInput::Submit(text) = input else {
            return;
        };
        let Some(target) = self.target else {
            return;
        };
        if self.state.over {
            return;
        }
        let max = i64::from(self.config.max);
        match parse_leading_int(text).filter(|n| (1..=max).contains(n)) {
            Some(n) => self.guess(u32::try_from(n).unwrap_or(u32::MAX), target, ctx),
            None => {
                self.state.feedback =
                    Some(format!("Please enter a number between 1 and {}", self.config.max));
            },
        }
    }

    fn on_timer(&mut self, _timer: TimerId, _ctx: &mut GameContext<'_>) {}

    arcade_game_boilerplate!();
}
