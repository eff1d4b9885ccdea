pub mod config;

#[cfg(feature = "coin-flip")]
pub mod coin_flip;
#[cfg(feature = "color-match")]
pub mod color_match;
#[cfg(feature = "math-quiz")]
pub mod math_quiz;
#[cfg(feature = "memory-match")]
pub mod memory_match;
#[cfg(feature = "number-guess")]
pub mod number_guess;
#[cfg(feature = "reaction-time")]
pub mod reaction_time;
#[cfg(feature = "rock-paper-scissors")]
pub mod rock_paper_scissors;
#[cfg(feature = "snake")]
pub mod snake;
#[cfg(feature = "tic-tac-toe")]
pub mod tic_tac_toe;
#[cfg(feature = "whack-a-mole")]
pub mod whack_a_mole;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use arcade_core::catalog::GameId;
use arcade_core::game_trait::{ArcadeGame, GameLoader};

use config::GamesConfig;

/// The playable games, keyed by their catalog id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    Snake,
    TicTacToe,
    MemoryMatch,
    WhackAMole,
    ReactionTime,
    ColorMatch,
    MathQuiz,
    CoinFlip,
    RockPaperScissors,
    NumberGuess,
}

impl GameKind {
    pub const ALL: [GameKind; 10] = [
        GameKind::Snake,
        GameKind::TicTacToe,
        GameKind::MemoryMatch,
        GameKind::WhackAMole,
        GameKind::ReactionTime,
        GameKind::ColorMatch,
        GameKind::MathQuiz,
        GameKind::CoinFlip,
        GameKind::RockPaperScissors,
        GameKind::NumberGuess,
    ];

    pub fn id(self) -> GameId {
        GameId(match self {
            Self::Snake => 1,
            Self::TicTacToe => 21,
            Self::MemoryMatch => 22,
            Self::WhackAMole => 56,
            Self::ReactionTime => 58,
            Self::ColorMatch => 59,
            Self::MathQuiz => 77,
            Self::CoinFlip => 92,
            Self::RockPaperScissors => 93,
            Self::NumberGuess => 94,
        })
    }

    pub fn from_id(id: GameId) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }
}

type GameFactory = fn(&GamesConfig) -> Box<dyn ArcadeGame>;

/// Loader for the games compiled into this build.
pub struct BuiltinGames {
    config: GamesConfig,
    factories: HashMap<GameKind, GameFactory>,
}

impl Default for BuiltinGames {
    fn default() -> Self {
        Self::new(GamesConfig::default())
    }
}

impl BuiltinGames {
    pub fn new(config: GamesConfig) -> Self {
        let mut registry = Self {
            config,
            factories: HashMap::new(),
        };
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        #[cfg(feature = "snake")]
        self.factories
            .insert(GameKind::Snake, |c| Box::new(snake::Snake::new(c.snake.clone())));
        #[cfg(feature = "tic-tac-toe")]
        self.factories.insert(GameKind::TicTacToe, |c| {
            Box::new(tic_tac_toe::TicTacToe::new(c.tic_tac_toe.clone()))
        });
        #[cfg(feature = "memory-match")]
        self.factories.insert(GameKind::MemoryMatch, |c| {
            Box::new(memory_match::MemoryMatch::new(c.memory_match.clone()))
        });
        #[cfg(feature = "whack-a-mole")]
        self.factories.insert(GameKind::WhackAMole, |c| {
            Box::new(whack_a_mole::WhackAMole::new(c.whack_a_mole.clone()))
        });
        #[cfg(feature = "reaction-time")]
        self.factories.insert(GameKind::ReactionTime, |c| {
            Box::new(reaction_time::ReactionTime::new(c.reaction_time.clone()))
        });
        #[cfg(feature = "color-match")]
        self.factories.insert(GameKind::ColorMatch, |c| {
            Box::new(color_match::ColorMatch::new(c.color_match.clone()))
        });
        #[cfg(feature = "math-quiz")]
        self.factories.insert(GameKind::MathQuiz, |c| {
            Box::new(math_quiz::MathQuiz::new(c.math_quiz.clone()))
        });
        #[cfg(feature = "coin-flip")]
        self.factories.insert(GameKind::CoinFlip, |c| {
            Box::new(coin_flip::CoinFlip::new(c.coin_flip.clone()))
        });
        #[cfg(feature = "rock-paper-scissors")]
        self.factories.insert(GameKind::RockPaperScissors, |c| {
            Box::new(rock_paper_scissors::RockPaperScissors::new(
                c.rock_paper_scissors.clone(),
            ))
        });
        #[cfg(feature = "number-guess")]
        self.factories.insert(GameKind::NumberGuess, |c| {
            Box::new(number_guess::NumberGuess::new(c.number_guess.clone()))
        });
    }

    pub fn config(&self) -> &GamesConfig {
        &self.config
    }

    pub fn create(&self, kind: GameKind) -> Option<Box<dyn ArcadeGame>> {
        self.factories.get(&kind).map(|f| f(&self.config))
    }

    /// Number of games compiled in.
    pub fn available_games(&self) -> usize {
        self.factories.len()
    }
}

impl GameLoader for BuiltinGames {
    fn load(&self, id: GameId) -> Option<Box<dyn ArcadeGame>> {
        self.create(GameKind::from_id(id)?)
    }
}

#[cfg(test)]
mod tests {
    use arcade_core::catalog::Catalog;

    use super::*;

    #[test]
    fn every_kind_maps_to_an_implemented_catalog_entry() {
        let catalog = Catalog::builtin();
        for kind in GameKind::ALL {
            let entry = catalog.get(kind.id()).unwrap();
            assert!(entry.implemented, "{} should be implemented", entry.name);
            assert_eq!(GameKind::from_id(kind.id()), Some(kind));
        }
    }

    #[test]
    fn implemented_entries_all_have_a_kind() {
        for entry in Catalog::builtin().entries() {
            assert_eq!(GameKind::from_id(entry.id).is_some(), entry.implemented);
        }
    }

    #[test]
    fn default_build_loads_every_game() {
        let games = BuiltinGames::default();
        assert_eq!(games.available_games(), GameKind::ALL.len());
        assert!(games.load(GameId(1)).is_some());
        assert!(games.load(GameId(2)).is_none());
    }
}
