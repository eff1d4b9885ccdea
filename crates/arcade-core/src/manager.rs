use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::catalog::{Catalog, GameDescriptor, GameId};
use crate::error::ArcadeError;
use crate::game_trait::{GameEvent, GameInput, GameLoader, GameView};
use crate::scores::{ScoreStore, ScoreTable};
use crate::session::Session;

/// Shown in the modal when an implemented catalog entry has no loader.
pub const PLACEHOLDER_TEXT: &str = "Game coming soon!";

/// Result of [`GameManager::open_game`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OpenOutcome {
    /// A session is running.
    Started,
    /// The modal is open but no loader knows the game.
    Placeholder,
    /// The entry is not implemented; a notice was queued.
    ComingSoon,
    /// No catalog entry has this id.
    Unknown,
}

/// Modal state for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ManagerView {
    pub modal_open: bool,
    pub game_id: Option<GameId>,
    pub title: Option<String>,
    pub current_score: u32,
    pub high_score: u32,
    pub finished: bool,
    pub placeholder: Option<&'static str>,
    pub game: Option<GameView>,
}

/// Owns the modal lifecycle, the active session and the score table.
pub struct GameManager {
    catalog: Arc<Catalog>,
    loader: Box<dyn GameLoader>,
    store: Box<dyn ScoreStore>,
    scores: ScoreTable,
    current: Option<GameDescriptor>,
    session: Option<Session>,
    current_score: u32,
    finished: bool,
    notices: VecDeque<String>,
    rng: StdRng,
}

impl GameManager {
    /// Build a manager, reading the score table from `store`. `seed` drives
    /// every game's randomness.
    pub fn new(
        catalog: Arc<Catalog>,
        loader: Box<dyn GameLoader>,
        store: Box<dyn ScoreStore>,
        seed: u64,
    ) -> Self {
        let scores = ScoreTable::load_or_default(store.as_ref());
        tracing::info!(games = catalog.len(), scored = scores.len(), "Game manager ready");
        Self {
            catalog,
            loader,
            store,
            scores,
            current: None,
            session: None,
            current_score: 0,
            finished: false,
            notices: VecDeque::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn descriptor(&self, id: GameId) -> Result<&GameDescriptor, ArcadeError> {
        self.catalog.get(id).ok_or(ArcadeError::UnknownGame(id))
    }

    /// Open the modal on `id` and start the game.
    pub fn open_game(&mut self, id: GameId) -> OpenOutcome {
        let game = match self.descriptor(id) {
            Ok(game) => game.clone(),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring open request");
                return OpenOutcome::Unknown;
            },
        };

        if !game.implemented {
            tracing::info!(game = %id, "Game not implemented yet");
            self.notices.push_back(format!(
                "{} is coming soon! This game hasn't been implemented yet.",
                game.name
            ));
            return OpenOutcome::ComingSoon;
        }

        self.stop_session();
        tracing::info!(game = %id, name = %game.name, "Game opened");
        self.current = Some(game);
        self.current_score = 0;
        self.finished = false;
        self.load_current()
    }

    /// Stop the active game and close the modal.
    pub fn close_game(&mut self) {
        self.stop_session();
        if let Some(game) = self.current.take() {
            tracing::info!(game = %game.id, "Game closed");
        }
        self.current_score = 0;
        self.finished = false;
    }

    /// Stop the active game and start it again from scratch. `None` when no
    /// game is open.
    pub fn restart_game(&mut self) -> Option<OpenOutcome> {
        let id = self.current.as_ref()?.id;
        self.stop_session();
        tracing::info!(game = %id, "Game restarted");
        self.current_score = 0;
        self.finished = false;
        Some(self.load_current())
    }

    /// Show `score` as the current score and keep it if it is a new best for
    /// the open game.
    pub fn update_score(&mut self, score: u32) {
        self.current_score = score;
        let Some(id) = self.current.as_ref().map(|g| g.id) else {
            return;
        };
        if self.scores.record(id, score) {
            tracing::info!(game = %id, score, "New high score");
            if let Err(e) = self.persist() {
                tracing::warn!(game = %id, error = %e, "Failed to save scores");
            }
        }
    }

    /// Route a player action to the running game. Returns false when there is
    /// none.
    pub fn handle_input(&mut self, input: &GameInput) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let events = session.handle_input(input);
        self.apply_events(events);
        true
    }

    /// Advance the running game's clock.
    pub fn advance(&mut self, dt: Duration) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let events = session.advance(dt);
        self.apply_events(events);
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_game(&self) -> Option<&GameDescriptor> {
        self.current.as_ref()
    }

    pub fn current_score(&self) -> u32 {
        self.current_score
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn high_score(&self, id: GameId) -> u32 {
        self.scores.get(id)
    }

    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    pub fn store(&self) -> &dyn ScoreStore {
        self.store.as_ref()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Timers still scheduled by the running game.
    pub fn active_timers(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.active_timers())
    }

    /// Notices queued since the last call, oldest first.
    pub fn take_notices(&mut self) -> Vec<String> {
        self.notices.drain(..).collect()
    }

    pub fn view(&self) -> ManagerView {
        let game_id = self.current.as_ref().map(|g| g.id);
        ManagerView {
            modal_open: self.current.is_some(),
            game_id,
            title: self.current.as_ref().map(|g| g.name.clone()),
            current_score: self.current_score,
            high_score: game_id.map_or(0, |id| self.scores.get(id)),
            finished: self.finished,
            placeholder: (self.current.is_some() && self.session.is_none())
                .then_some(PLACEHOLDER_TEXT),
            game: self.session.as_ref().map(|s| s.view()),
        }
    }

    fn load_current(&mut self) -> OpenOutcome {
        let Some(id) = self.current.as_ref().map(|g| g.id) else {
            return OpenOutcome::Unknown;
        };
        let Some(game) = self.loader.load(id) else {
            tracing::warn!(game = %id, "No loader for game, showing placeholder");
            return OpenOutcome::Placeholder;
        };
        let rng = StdRng::seed_from_u64(self.rng.random());
        let mut session = Session::start(id, game, rng);
        let events = session.drain_events();
        self.session = Some(session);
        self.apply_events(events);
        OpenOutcome::Started
    }

    fn stop_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.dispose();
        }
    }

    fn apply_events(&mut self, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::ScoreUpdate { score } => self.update_score(score),
                GameEvent::Message(message) => self.notices.push_back(message),
                GameEvent::GameOver { final_score } => {
                    self.finished = true;
                    if let Some(game) = &self.current {
                        tracing::info!(game = %game.id, final_score, "Game over");
                    }
                },
            }
        }
    }

    fn persist(&mut self) -> Result<(), ArcadeError> {
        let blob = self.scores.to_json()?;
        self.store.save(&blob)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::scores::MemoryStore;
    use crate::test_helpers::{CountingLoader, FailingStore, test_manager};

    const SNAKE: GameId = GameId(1);
    const TIC_TAC_TOE: GameId = GameId(21);
    const TETRIS: GameId = GameId(2);

    #[test]
    fn unknown_id_changes_nothing() {
        let mut manager = test_manager(&[1]);
        assert_eq!(manager.open_game(GameId(4242)), OpenOutcome::Unknown);
        assert!(!manager.is_open());
        assert!(manager.take_notices().is_empty());
    }

    #[test]
    fn unimplemented_game_queues_notice() {
        let mut manager = test_manager(&[1]);
        assert_eq!(manager.open_game(TETRIS), OpenOutcome::ComingSoon);
        assert!(!manager.is_open());
        let notices = manager.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].starts_with("Tetris is coming soon!"));
    }

    #[test]
    fn unimplemented_game_keeps_current_game_running() {
        let mut manager = test_manager(&[1]);
        manager.open_game(SNAKE);
        manager.open_game(TETRIS);
        assert_eq!(manager.current_game().map(|g| g.id), Some(SNAKE));
        assert_eq!(manager.active_timers(), 1);
    }

    #[test]
    fn loader_miss_shows_placeholder() {
        let mut manager = test_manager(&[]);
        assert_eq!(manager.open_game(SNAKE), OpenOutcome::Placeholder);
        let view = manager.view();
        assert!(view.modal_open);
        assert_eq!(view.placeholder, Some(PLACEHOLDER_TEXT));
        assert!(view.game.is_none());
    }

    #[test]
    fn open_starts_session_with_zero_score() {
        let mut manager = test_manager(&[1]);
        assert_eq!(manager.open_game(SNAKE), OpenOutcome::Started);
        let view = manager.view();
        assert!(view.modal_open);
        assert_eq!(view.title.as_deref(), Some("Snake"));
        assert_eq!(view.current_score, 0);
        assert!(view.game.is_some());
    }

    #[test]
    fn game_scores_flow_into_high_score_and_store() {
        let mut manager = test_manager(&[1]);
        manager.open_game(SNAKE);
        manager.handle_input(&GameInput::Press);
        manager.handle_input(&GameInput::Press);
        assert_eq!(manager.current_score(), 2);
        assert_eq!(manager.high_score(SNAKE), 2);
        assert_eq!(manager.store().load().unwrap().as_deref(), Some(r#"{"1":2}"#));
    }

    #[test]
    fn lower_score_does_not_overwrite() {
        let mut manager = test_manager(&[1]);
        manager.open_game(SNAKE);
        manager.update_score(50);
        manager.update_score(10);
        assert_eq!(manager.current_score(), 10);
        assert_eq!(manager.high_score(SNAKE), 50);
    }

    #[test]
    fn update_without_open_game_only_sets_display() {
        let mut manager = test_manager(&[1]);
        manager.update_score(99);
        assert_eq!(manager.current_score(), 99);
        assert!(manager.scores().is_empty());
    }

    #[test]
    fn close_cancels_timers_and_clears_state() {
        let mut manager = test_manager(&[1]);
        manager.open_game(SNAKE);
        manager.advance(Duration::from_millis(250));
        assert_eq!(manager.active_timers(), 1);

        manager.close_game();
        assert_eq!(manager.active_timers(), 0);
        assert!(manager.session().is_none());
        assert!(!manager.view().modal_open);
        assert_eq!(manager.current_score(), 0);
    }

    #[test]
    fn restart_replaces_session_and_resets_score() {
        let mut manager = test_manager(&[1]);
        manager.open_game(SNAKE);
        manager.advance(Duration::from_millis(500));
        assert!(manager.current_score() > 0);

        assert_eq!(manager.restart_game(), Some(OpenOutcome::Started));
        assert_eq!(manager.current_score(), 0);
        assert_eq!(manager.active_timers(), 1);
        assert_eq!(manager.session().map(|s| s.now()), Some(Duration::ZERO));
        assert!(manager.high_score(SNAKE) > 0);
    }

    #[test]
    fn restart_without_game_is_noop() {
        let mut manager = test_manager(&[1]);
        assert_eq!(manager.restart_game(), None);
    }

    #[test]
    fn opening_second_game_stops_first() {
        let mut manager = test_manager(&[1, 21]);
        manager.open_game(SNAKE);
        manager.open_game(TIC_TAC_TOE);
        assert_eq!(manager.session().map(|s| s.game_id()), Some(TIC_TAC_TOE));
        assert_eq!(manager.active_timers(), 1);
    }

    #[test]
    fn input_without_session_is_not_routed() {
        let mut manager = test_manager(&[1]);
        assert!(!manager.handle_input(&GameInput::Press));
    }

    #[test]
    fn write_failure_keeps_score_in_memory() {
        let mut manager = GameManager::new(
            Arc::new(Catalog::builtin()),
            Box::new(CountingLoader::for_ids(&[1])),
            Box::new(FailingStore),
            7,
        );
        manager.open_game(SNAKE);
        manager.update_score(30);
        assert_eq!(manager.high_score(SNAKE), 30);
    }

    #[test]
    fn scores_are_read_through_on_construction() {
        let manager = GameManager::new(
            Arc::new(Catalog::builtin()),
            Box::new(CountingLoader::for_ids(&[1])),
            Box::new(MemoryStore::with_blob(r#"{"1":40,"94":850}"#)),
            7,
        );
        assert_eq!(manager.high_score(SNAKE), 40);
        assert_eq!(manager.high_score(GameId(94)), 850);
        assert_eq!(manager.high_score(TIC_TAC_TOE), 0);
    }

    #[test]
    fn game_over_event_marks_finished() {
        let mut manager = test_manager(&[1]);
        manager.open_game(SNAKE);
        manager.handle_input(&GameInput::Answer(true));
        assert!(manager.is_finished());
        assert_eq!(manager.take_notices(), vec!["Counting stopped".to_string()]);
        assert_eq!(manager.active_timers(), 0);
    }

    proptest! {
        #[test]
        fn high_score_is_running_maximum(
            reports in proptest::collection::vec((0usize..3, 0u32..2000), 1..60)
        ) {
            let ids = [SNAKE, TIC_TAC_TOE, GameId(22)];
            let mut manager = test_manager(&[1, 21, 22]);
            let mut best = [0u32; 3];
            for (slot, score) in reports {
                if manager.current_game().map(|g| g.id) != Some(ids[slot]) {
                    manager.open_game(ids[slot]);
                }
                let before = manager.high_score(ids[slot]);
                manager.update_score(score);
                best[slot] = best[slot].max(score);
                prop_assert!(manager.high_score(ids[slot]) >= before);
                prop_assert_eq!(manager.high_score(ids[slot]), best[slot]);
            }
            let stored = ScoreTable::load_or_default(manager.store());
            for (slot, id) in ids.iter().enumerate() {
                prop_assert_eq!(stored.get(*id), best[slot]);
            }
        }
    }
}
