use std::time::Duration;

use rand::rngs::StdRng;

use crate::catalog::GameId;
use crate::game_trait::{ArcadeGame, GameContext, GameEvent, GameInput, GameView};
use crate::timers::Timers;

/// A running game and everything it scheduled.
///
/// Returned by [`Session::start`]; it is the only handle to the game's timers,
/// so stopping it (explicitly or by dropping it) is what cancels them.
pub struct Session<G: ArcadeGame + ?Sized = dyn ArcadeGame> {
    game_id: GameId,
    timers: Timers,
    rng: StdRng,
    events: Vec<GameEvent>,
    stopped: bool,
    game: Box<G>,
}

impl<G: ArcadeGame + ?Sized> Session<G> {
    /// Start `game`, letting it schedule its initial timers.
    pub fn start(game_id: GameId, game: Box<G>, rng: StdRng) -> Self {
        let mut session = Self {
            game_id,
            timers: Timers::new(),
            rng,
            events: Vec::new(),
            stopped: false,
            game,
        };
        session.drive(|game, ctx| game.start(ctx));
        tracing::debug!(
            game = %game_id,
            timers = session.timers.active(),
            "Session started"
        );
        session
    }

    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Session clock.
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn active_timers(&self) -> usize {
        self.timers.active()
    }

    pub fn view(&self) -> GameView {
        self.game.view()
    }

    pub fn is_over(&self) -> bool {
        self.game.is_over()
    }

    /// Route a player action to the game. Ignored once stopped.
    pub fn handle_input(&mut self, input: &GameInput) -> Vec<GameEvent> {
        if !self.stopped {
            self.drive(|game, ctx| game.handle_input(input, ctx));
        }
        self.drain_events()
    }

    /// Advance the clock by `dt`, firing every timer that comes due.
    pub fn advance(&mut self, dt: Duration) -> Vec<GameEvent> {
        if self.stopped {
            return Vec::new();
        }
        let until = self.timers.now() + dt;
        while let Some(timer) = self.timers.pop_due(until) {
            let mut ctx = GameContext::new(&mut self.timers, &mut self.rng, &mut self.events);
            self.game.on_timer(timer, &mut ctx);
        }
        self.timers.settle(until);
        self.drain_events()
    }

    /// Run `f` against the game with a live context. Events it produces stay
    /// queued until the next [`Session::drain_events`].
    pub fn drive<R>(&mut self, f: impl FnOnce(&mut G, &mut GameContext<'_>) -> R) -> R {
        let mut ctx = GameContext::new(&mut self.timers, &mut self.rng, &mut self.events);
        f(self.game.as_mut(), &mut ctx)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Cancel every timer and let the game release what it holds. Idempotent.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        let cancelled = self.timers.clear_all();
        self.game.cleanup();
        self.events.clear();
        tracing::debug!(game = %self.game_id, cancelled, "Session stopped");
    }

    /// Stop and consume the session.
    pub fn dispose(mut self) {
        self.stop();
    }
}

impl<G: ArcadeGame + ?Sized> Drop for Session<G> {
    fn drop(&mut self) {
        self.stop();
    }
}
