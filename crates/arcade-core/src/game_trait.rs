use std::time::Duration;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::catalog::GameId;
use crate::timers::{TimerId, Timers};

/// JSON view of a running game, pushed to the page as-is.
pub type GameView = serde_json::Value;

/// Core trait that every arcade game implements.
///
/// The session owns the game together with its timers and RNG; the game only
/// reacts to input and timer callbacks and reports through the context.
pub trait ArcadeGame {
    /// Called once when the session starts. Schedule timers and build the
    /// initial state here.
    fn start(&mut self, ctx: &mut GameContext<'_>);

    /// A player action routed from the page.
    fn handle_input(&mut self, input: &GameInput, ctx: &mut GameContext<'_>);

    /// A timer scheduled through the context came due.
    fn on_timer(&mut self, timer: TimerId, ctx: &mut GameContext<'_>);

    /// Called when the session stops. Timers are already cancelled by then;
    /// override only to release anything else the game holds.
    fn cleanup(&mut self) {}

    /// Current state for rendering.
    fn view(&self) -> GameView;

    /// Whether the game reached its own termination condition.
    fn is_over(&self) -> bool;
}

/// Creates game instances by catalog id.
pub trait GameLoader {
    fn load(&self, id: GameId) -> Option<Box<dyn ArcadeGame>>;
}

/// Arrow key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Grid offset, with y growing downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    pub fn is_perpendicular_to(self, other: Direction) -> bool {
        self.is_horizontal() != other.is_horizontal()
    }
}

/// Player input, already decoded from the DOM event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameInput {
    /// Arrow key.
    Arrow(Direction),
    /// Click on the n-th cell, card, hole, answer or button of the game.
    Select(usize),
    /// Yes/no answer.
    Answer(bool),
    /// Text typed into the game's input box and submitted.
    Submit(String),
    /// Click on the game's single play area.
    Press,
}

/// Events emitted by a game while handling input or timers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The game's running score changed.
    ScoreUpdate { score: u32 },
    /// A message the page should surface as a blocking notice.
    Message(String),
    /// The game reached its termination condition.
    GameOver { final_score: u32 },
}

/// Everything a game may touch while handling a callback.
pub struct GameContext<'a> {
    timers: &'a mut Timers,
    rng: &'a mut StdRng,
    events: &'a mut Vec<GameEvent>,
}

impl<'a> GameContext<'a> {
    pub fn new(
        timers: &'a mut Timers,
        rng: &'a mut StdRng,
        events: &'a mut Vec<GameEvent>,
    ) -> Self {
        Self {
            timers,
            rng,
            events,
        }
    }

    /// Session time: zero at start, the due time while a timer callback runs.
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn set_timeout(&mut self, delay: Duration) -> TimerId {
        self.timers.set_timeout(delay)
    }

    pub fn set_interval(&mut self, period: Duration) -> TimerId {
        self.timers.set_interval(period)
    }

    /// Cancel a timer; harmless if it already fired.
    pub fn clear_timer(&mut self, id: TimerId) {
        self.timers.clear(id);
    }

    /// Cancel the timer in `slot`, if any, leaving the slot empty.
    pub fn clear_slot(&mut self, slot: &mut Option<TimerId>) {
        if let Some(id) = slot.take() {
            self.timers.clear(id);
        }
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut *self.rng
    }

    pub fn report_score(&mut self, score: u32) {
        self.events.push(GameEvent::ScoreUpdate { score });
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.events.push(GameEvent::Message(message.into()));
    }

    pub fn finish(&mut self, final_score: u32) {
        self.events.push(GameEvent::GameOver { final_score });
    }
}

/// Generates `view` and `is_over` for games whose serializable state lives in
/// a `state` field with an `over: bool` flag.
#[macro_export]
macro_rules! arcade_game_boilerplate {
    () => {
        fn view(&self) -> $crate::game_trait::GameView {
            serde_json::to_value(&self.state).unwrap_or_default()
        }

        fn is_over(&self) -> bool {
            self.state.over
        }
    };
}
