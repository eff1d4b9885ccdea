use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use arcade_core::arcade_game_boilerplate;
use arcade_core::game_trait::{ArcadeGame, GameContext, GameInput};
use arcade_core::timers::TimerId;

use crate::config::ReactionTimeConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Box is blue, waiting for the random delay.
    Waiting,
    /// Box is green; the clock is running.
    Ready,
    /// Showing the last reaction time.
    Result { reaction_ms: u64 },
    /// Clicked before green; a new attempt starts shortly.
    TooEarly,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReactionTimeState {
    pub phase: Phase,
    pub box_text: String,
    pub result_text: Option<String>,
    /// Session time the box turned green, in ms.
    pub green_at_ms: Option<u64>,
    pub best_ms: Option<u64>,
    pub score: u32,
    pub over: bool,
}

/// Click as soon as the box turns green. Endless attempts.
pub struct ReactionTime {
    config: ReactionTimeConfig,
    state: ReactionTimeState,
    go_timer: Option<TimerId>,
    restart_timer: Option<TimerId>,
}

impl ReactionTime {
    pub fn new(config: ReactionTimeConfig) -> Self {
        Self {
            config,
            state: ReactionTimeState {
                phase: Phase::Waiting,
                box_text: String::new(),
                result_text: None,
                green_at_ms: None,
                best_ms: None,
                score: 0,
                over: false,
            },
            go_timer: None,
            restart_timer: None,
        }
    }

    pub fn state(&self) -> &ReactionTimeState {
        &self.state
    }

    fn begin_wait(&mut self, ctx: &mut GameContext<'_>) {
        ctx.clear_slot(&mut self.go_timer);
        ctx.clear_slot(&mut self.restart_timer);
        self.state.phase = Phase::Waiting;
        self.state.box_text = "Wait for green...".to_string();
        self.state.green_at_ms = None;

        let jitter = match self.config.wait_jitter_ms {
            0 => 0,
            max => ctx.rng().random_range(0..max),
        };
        let delay = Duration::from_millis(self.config.min_wait_ms + jitter);
        self.go_timer = Some(ctx.set_timeout(delay));
    }

    fn schedule_restart(&mut self, ctx: &mut GameContext<'_>) {
        ctx.clear_slot(&mut self.restart_timer);
        self.restart_timer =
            Some(ctx.set_timeout(Duration::from_millis(self.config.restart_delay_ms)));
    }

    fn record(&mut self, reaction_ms: u64, ctx: &mut GameContext<'_>) {
        let score = u64::from(self.config.max_score).saturating_sub(reaction_ms);
        self.state.score = u32::try_from(score).unwrap_or(u32::MAX);
        self.state.best_ms = Some(self.state.best_ms.map_or(reaction_ms, |b| b.min(reaction_ms)));
        self.state.phase = Phase::Result { reaction_ms };
        self.state.result_text = Some(format!("Your reaction time: {reaction_ms}ms"));
        self.state.box_text = format!("{reaction_ms}ms - Click to try again");
        ctx.report_score(self.state.score);
        self.schedule_restart(ctx);
    }
}

impl ArcadeGame for ReactionTime {
    fn start(&mut self, ctx: &mut GameContext<'_>) {
        self.begin_wait(ctx);
    }

    fn handle_input(&mut self, input: &GameInput, ctx: &mut GameContext<'_>) {
        if *input != GameInput::Press {
            return;
        }
        match self.state.phase {
            Phase::Ready => {
                let green_at = self.state.green_at_ms.unwrap_or(0);
                let now = u64::try_from(ctx.now().as_millis()).unwrap_or(u64::MAX);
                self.record(now.saturating_sub(green_at), ctx);
            },
            Phase::Waiting | Phase::TooEarly => {
                ctx.clear_slot(&mut self.go_timer);
                self.state.phase = Phase::TooEarly;
                self.state.result_text = Some("Too early! Wait for green.".to_string());
                self.schedule_restart(ctx);
            },
            Phase::Result { .. } => self.begin_wait(ctx),
        }
    }

    fn on_timer(&mut self, timer: TimerId, ctx: &mut GameContext<'_>) {
        if self.go_timer == Some(timer) {
            self.go_timer = None;
            self.state.phase = Phase::Ready;
            self.state.box_text = "Click now!".to_string();
            self.state.green_at_ms = u64::try_from(ctx.now().as_millis()).ok();
        } else if self.restart_timer == Some(timer) {
            self.restart_timer = None;
            self.begin_wait(ctx);
        }
    }

    arcade_game_boilerplate!();
}
