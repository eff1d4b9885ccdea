use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use arcade_core::arcade_game_boilerplate;
use arcade_core::game_trait::{ArcadeGame, GameContext, GameInput};
use arcade_core::timers::TimerId;

use crate::config::WhackAMoleConfig;

#[derive(Debug, Clone, Serialize)]
pub struct WhackAMoleState {
    /// Whether a mole is up in each hole.
    pub moles: Vec<bool>,
    pub time_left: u32,
    pub score: u32,
    pub over: bool,
}

/// Timed round of hitting moles that pop up in random holes.
pub struct WhackAMole {
    config: WhackAMoleConfig,
    state: WhackAMoleState,
    countdown: Option<TimerId>,
    spawner: Option<TimerId>,
    /// Per hole, the timer that hides its mole.
    hide_timers: Vec<Option<TimerId>>,
}

impl WhackAMole {
    pub fn new(config: WhackAMoleConfig) -> Self {
        Self {
            state: WhackAMoleState {
                moles: vec![false; config.holes],
                time_left: config.duration_secs,
                score: 0,
                over: false,
            },
            hide_timers: vec![None; config.holes],
            countdown: None,
            spawner: None,
            config,
        }
    }

    pub fn state(&self) -> &WhackAMoleState {
        &self.state
    }

    fn spawn(&mut self, ctx: &mut GameContext<'_>) {
        let empty: Vec<usize> = (0..self.state.moles.len())
            .filter(|&i| !self.state.moles[i])
            .collect();
        if empty.is_empty() {
            return;
        }
        let hole = empty[ctx.rng().random_range(0..empty.len())];
        self.state.moles[hole] = true;
        self.hide_timers[hole] =
            Some(ctx.set_timeout(Duration::from_millis(self.config.mole_visible_ms)));
    }

    fn countdown_tick(&mut self, ctx: &mut GameContext<'_>) {
        self.state.time_left = self.state.time_left.saturating_sub(1);
        if self.state.time_left > 0 {
            return;
        }
        self.state.over = true;
        ctx.clear_slot(&mut self.countdown);
        ctx.clear_slot(&mut self.spawner);
        for slot in &mut self.hide_timers {
            ctx.clear_slot(slot);
        }
        ctx.notify(format!("Game Over! Final Score: {}", self.state.score));
        ctx.finish(self.state.score);
    }
}

impl ArcadeGame for WhackAMole {
    fn start(&mut self, ctx: &mut GameContext<'_>) {
        self.countdown = Some(ctx.set_interval(Duration::from_secs(1)));
        self.spawner = Some(ctx.set_interval(Duration::from_millis(self.config.spawn_every_ms)));
    }

    fn handle_input(&mut self, input: &GameInput, ctx: &mut GameContext<'_>) {
        let GameInput::Select(hole) = *input else {
            return;
        };
        if self.state.over || !self.state.moles.get(hole).copied().unwrap_or(false) {
            return;
        }
        self.state.moles[hole] = false;
        ctx.clear_slot(&mut self.hide_timers[hole]);
        self.state.score += self.config.hit_points;
        ctx.report_score(self.state.score);
    }

    fn on_timer(&mut self, timer: TimerId, ctx: &mut GameContext<'_>) {
        if self.state.over {
            return;
        }
        if self.countdown == Some(timer) {
            self.countdown_tick(ctx);
        } else if self.spawner == Some(timer) {
            self.spawn(ctx);
        } else if let Some(hole) = self.hide_timers.iter().position(|t| *t == Some(timer)) {
            self.hide_timers[hole] = None;
            self.state.moles[hole] = false;
        }
    }

    arcade_game_boilerplate!();
}
