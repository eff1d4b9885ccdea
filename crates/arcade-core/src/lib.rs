pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod game_trait;
pub mod manager;
pub mod scores;
pub mod session;
pub mod timers;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde::Serialize;

    use crate::catalog::{Catalog, GameId};
    use crate::error::StorageError;
    use crate::game_trait::{ArcadeGame, GameContext, GameInput, GameLoader, GameView};
    use crate::manager::GameManager;
    use crate::scores::{MemoryStore, ScoreStore};
    use crate::session::Session;
    use crate::timers::TimerId;

    /// Start `game` in a session seeded with `seed`.
    pub fn start_session<G: ArcadeGame>(game: G, seed: u64) -> Session<G> {
        Session::start(GameId(0), Box::new(game), StdRng::seed_from_u64(seed))
    }

    /// Manager over the built-in catalog with an in-memory store, where only
    /// `ids` have a loader.
    pub fn test_manager(ids: &[u32]) -> GameManager {
        GameManager::new(
            Arc::new(Catalog::builtin()),
            Box::new(CountingLoader::for_ids(ids)),
            Box::new(MemoryStore::new()),
            7,
        )
    }

    /// Game that counts a point every 100 ms tick and on every `Press`.
    /// `Answer(true)` ends it.
    #[derive(Debug, Default, Serialize)]
    pub struct CountingGame {
        pub started: bool,
        pub ticks: u32,
        pub score: u32,
        pub over: bool,
        pub cleaned_up: bool,
        pub cleanups: u32,
        #[serde(skip)]
        interval: Option<TimerId>,
    }

    impl CountingGame {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl ArcadeGame for CountingGame {
        fn start(&mut self, ctx: &mut GameContext<'_>) {
            self.started = true;
            self.interval = Some(ctx.set_interval(Duration::from_millis(100)));
        }

        fn handle_input(&mut self, input: &GameInput, ctx: &mut GameContext<'_>) {
            if self.over {
                return;
            }
            match input {
                GameInput::Press => {
                    self.score += 1;
                    ctx.report_score(self.score);
                },
                GameInput::Answer(true) => {
                    self.over = true;
                    ctx.clear_slot(&mut self.interval);
                    ctx.notify("Counting stopped");
                    ctx.finish(self.score);
                },
                _ => {},
            }
        }

        fn on_timer(&mut self, timer: TimerId, ctx: &mut GameContext<'_>) {
            if Some(timer) == self.interval {
                self.ticks += 1;
                self.score += 1;
                ctx.report_score(self.score);
            }
        }

        fn cleanup(&mut self) {
            self.cleaned_up = true;
            self.cleanups += 1;
        }

        fn view(&self) -> GameView {
            serde_json::to_value(self).unwrap_or_default()
        }

        fn is_over(&self) -> bool {
            self.over
        }
    }

    /// Loader that hands out a fresh [`CountingGame`] for a fixed set of ids.
    #[derive(Debug, Default)]
    pub struct CountingLoader {
        ids: BTreeSet<GameId>,
    }

    impl CountingLoader {
        pub fn for_ids(ids: &[u32]) -> Self {
            Self {
                ids: ids.iter().copied().map(GameId).collect(),
            }
        }
    }

    impl GameLoader for CountingLoader {
        fn load(&self, id: GameId) -> Option<Box<dyn ArcadeGame>> {
            self.ids
                .contains(&id)
                .then(|| Box::new(CountingGame::new()) as Box<dyn ArcadeGame>)
        }
    }

    /// Store whose every operation fails, standing in for blocked storage.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct FailingStore;

    impl ScoreStore for FailingStore {
        fn load(&self) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("storage disabled".to_string()))
        }

        fn save(&mut self, _blob: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("storage disabled".to_string()))
        }
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Every ArcadeGame must pass these. Game crates call them from their own
    // #[cfg(test)] modules with a fresh instance.

    /// After start() the game must render a non-empty view and not be over.
    pub fn contract_start_produces_view(game: Box<dyn ArcadeGame>) {
        let session = Session::start(GameId(0), game, StdRng::seed_from_u64(11));
        let view = session.view();
        assert!(
            view.is_object() && view.as_object().is_some_and(|o| !o.is_empty()),
            "view() must be a non-empty object after start, got {view}"
        );
        assert!(!session.is_over(), "a fresh game must not be over");
    }

    /// Stopping the session must leave no timer behind, whatever the game
    /// scheduled while running.
    pub fn contract_stop_cancels_timers(game: Box<dyn ArcadeGame>) {
        let mut session = Session::start(GameId(0), game, StdRng::seed_from_u64(11));
        session.advance(Duration::from_millis(1500));
        session.stop();
        assert_eq!(session.active_timers(), 0, "stop() must cancel every timer");
        assert!(
            session.advance(Duration::from_secs(60)).is_empty(),
            "a stopped session must not fire timers"
        );
    }

    /// Input delivered after stop() must neither change the view nor emit
    /// events.
    pub fn contract_input_after_stop_is_ignored(game: Box<dyn ArcadeGame>, inputs: &[GameInput]) {
        let mut session = Session::start(GameId(0), game, StdRng::seed_from_u64(11));
        session.stop();
        let before = session.view();
        for input in inputs {
            assert!(
                session.handle_input(input).is_empty(),
                "{input:?} must be ignored after stop"
            );
        }
        assert_eq!(before, session.view(), "state must not change after stop");
    }
}
