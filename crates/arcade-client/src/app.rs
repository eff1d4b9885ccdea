use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use arcade_core::catalog::{Catalog, GameId};
use arcade_core::config::ArcadeConfig;
use arcade_core::dashboard::{CategoryFilter, Dashboard, DashboardView};
use arcade_core::error::ArcadeError;
use arcade_core::game_trait::GameInput;
use arcade_core::manager::{GameManager, ManagerView, OpenOutcome};
use arcade_core::scores::ScoreStore;
use arcade_games::BuiltinGames;
use arcade_games::config::GamesConfig;

use crate::input::{KeyAction, key_action};

/// Longest stretch of game time one animation frame may cover. Background
/// tabs stop calling `requestAnimationFrame`; their games resume instead of
/// fast-forwarding.
const MAX_FRAME: Duration = Duration::from_millis(250);

/// Everything the page renders, pushed as one JSON object.
#[derive(Debug, Clone, Serialize)]
pub struct UiState {
    pub dashboard: DashboardView,
    pub modal: ManagerView,
    /// Blocking notices to show, oldest first.
    pub notices: Vec<String>,
}

/// Browser-independent client state: the dashboard plus the game manager.
pub struct App {
    pub manager: GameManager,
    pub dashboard: Dashboard,
    last_frame_ms: Option<f64>,
    /// JSON of the last state handed to the page.
    last_pushed: Option<String>,
}

impl App {
    pub fn new(games: GamesConfig, store: Box<dyn ScoreStore>, seed: u64) -> Self {
        let catalog = Arc::new(Catalog::builtin());
        let manager = GameManager::new(
            Arc::clone(&catalog),
            Box::new(BuiltinGames::new(games)),
            store,
            seed,
        );
        Self {
            manager,
            dashboard: Dashboard::new(catalog),
            last_frame_ms: None,
            last_pushed: None,
        }
    }

    /// Build from the arcade config; its fixed seed, when set, wins over
    /// `fallback_seed`.
    pub fn from_config(
        config: &ArcadeConfig,
        games: GamesConfig,
        store: Box<dyn ScoreStore>,
        fallback_seed: u64,
    ) -> Self {
        let seed = config.seed.unwrap_or(fallback_seed);
        tracing::debug!(seed, fixed = config.seed.is_some(), "Starting arcade");
        Self::new(games, store, seed)
    }

    /// Dashboard tile click.
    pub fn open(&mut self, id: u32) -> Option<OpenOutcome> {
        self.dashboard.activate(GameId(id), &mut self.manager)
    }

    pub fn close(&mut self) {
        self.manager.close_game();
    }

    pub fn restart(&mut self) {
        self.manager.restart_game();
    }

    pub fn search(&mut self, text: &str) {
        self.dashboard.set_search(text);
    }

    pub fn set_category(&mut self, value: &str) -> Result<(), ArcadeError> {
        let filter: CategoryFilter = value.parse()?;
        self.dashboard.set_category(filter);
        Ok(())
    }

    pub fn input(&mut self, input: &GameInput) {
        self.manager.handle_input(input);
    }

    /// Handle a document key press. Returns true when the key was used and
    /// the browser default should be suppressed.
    pub fn on_key(&mut self, key: &str) -> bool {
        if !self.manager.is_open() {
            return false;
        }
        match key_action(key) {
            Some(KeyAction::Close) => {
                self.manager.close_game();
                true
            },
            Some(KeyAction::Game(input)) => self.manager.handle_input(&input),
            None => false,
        }
    }

    /// Advance game time to the animation frame timestamp `now_ms`. Returns
    /// whether a game is open and the page should be refreshed.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let elapsed = self
            .last_frame_ms
            .map_or(0.0, |last| ((now_ms - last) / 1000.0).max(0.0));
        self.last_frame_ms = Some(now_ms);
        if !self.manager.is_open() || elapsed == 0.0 {
            return self.manager.is_open();
        }
        let dt = Duration::try_from_secs_f64(elapsed).unwrap_or(MAX_FRAME).min(MAX_FRAME);
        self.manager.advance(dt);
        true
    }

    /// Snapshot for the page. Drains the notice queue.
    pub fn ui_state(&mut self) -> UiState {
        UiState {
            dashboard: self.dashboard.render(self.manager.scores()),
            modal: self.manager.view(),
            notices: self.manager.take_notices(),
        }
    }

    /// Serialized UI state, or `None` when it matches what the page already
    /// shows.
    pub fn ui_update(&mut self) -> Option<String> {
        let state = self.ui_state();
        let json = match serde_json::to_string(&state) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize UI state");
                return None;
            },
        };
        if self.last_pushed.as_deref() == Some(json.as_str()) {
            return None;
        }
        self.last_pushed = Some(json.clone());
        Some(json)
    }
}
