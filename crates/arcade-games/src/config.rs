use serde::{Deserialize, Serialize};

use arcade_core::error::ArcadeError;

/// Largest accepted snake board side.
pub const MAX_GRID_SIZE: u32 = 200;

/// Largest accepted quiz operand; `max * max` plus a distractor offset stays
/// inside `i32`.
pub const MAX_OPERAND: i32 = 1000;

/// Data-driven configuration for every built-in game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamesConfig {
    pub snake: SnakeConfig,
    pub tic_tac_toe: TicTacToeConfig,
    pub memory_match: MemoryMatchConfig,
    pub whack_a_mole: WhackAMoleConfig,
    pub reaction_time: ReactionTimeConfig,
    pub color_match: ColorMatchConfig,
    pub math_quiz: MathQuizConfig,
    pub coin_flip: CoinFlipConfig,
    pub rock_paper_scissors: RockPaperScissorsConfig,
    pub number_guess: NumberGuessConfig,
}

impl GamesConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("ARCADE_GAMES_CONFIG")
            && let Ok(contents) = std::fs::read_to_string(&path)
        {
            match Self::from_toml_str(&contents) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(path = %path, error = %e, "Ignoring games config"),
            }
        }
        if let Ok(contents) = std::fs::read_to_string("config/games.toml") {
            match Self::from_toml_str(&contents) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(error = %e, "Ignoring config/games.toml"),
            }
        }
        Self::default()
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ArcadeError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ArcadeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no game can run with.
    pub fn validate(&self) -> Result<(), ArcadeError> {
        let fail = |msg: &str| -> Result<(), ArcadeError> {
            Err(ArcadeError::Config(msg.to_string()))
        };
        if !(2..=MAX_GRID_SIZE).contains(&self.snake.grid_size) {
            return fail("snake.grid_size must be between 2 and 200");
        }
        let [fx, fy] = self.snake.first_food;
        if fx >= self.snake.grid_size || fy >= self.snake.grid_size || (fx, fy) == (0, 0) {
            return fail("snake.first_food must be a free cell inside the grid");
        }
        if self.memory_match.symbols.is_empty() {
            return fail("memory_match.symbols must not be empty");
        }
        if self.whack_a_mole.holes == 0 {
            return fail("whack_a_mole.holes must be at least 1");
        }
        if self.math_quiz.questions == 0 {
            return fail("math_quiz.questions must be positive");
        }
        if !(1..=MAX_OPERAND).contains(&self.math_quiz.max_operand) {
            return fail("math_quiz.max_operand must be between 1 and 1000");
        }
        if !(2..=10).contains(&self.math_quiz.choices) {
            return fail("math_quiz.choices must be between 2 and 10");
        }
        if self.number_guess.max == 0 {
            return fail("number_guess.max must be at least 1");
        }
        if self.color_match.colors.len() < 2 {
            return fail("color_match.colors needs at least two colours");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    /// Cells per side of the square board.
    pub grid_size: u32,
    pub tick_ms: u64,
    /// Cell of the first food, `[x, y]`.
    pub first_food: [u32; 2],
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            tick_ms: 200,
            first_food: [5, 5],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicTacToeConfig {
    /// Delay before the computer answers a move.
    pub computer_delay_ms: u64,
    pub win_points: u32,
    pub tie_points: u32,
}

impl Default for TicTacToeConfig {
    fn default() -> Self {
        Self {
            computer_delay_ms: 500,
            win_points: 10,
            tie_points: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryMatchConfig {
    /// One entry per pair on the board.
    pub symbols: Vec<String>,
    /// How long the second card of a move stays face up.
    pub reveal_ms: u64,
    pub base_score: u32,
    pub move_penalty: u32,
}

impl Default for MemoryMatchConfig {
    fn default() -> Self {
        Self {
            symbols: ["🍎", "🍌", "🍇", "🍊", "🍓", "🍉", "🍒", "🥝"]
                .into_iter()
                .map(String::from)
                .collect(),
            reveal_ms: 1000,
            base_score: 1000,
            move_penalty: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhackAMoleConfig {
    pub holes: usize,
    pub duration_secs: u32,
    pub spawn_every_ms: u64,
    /// How long a mole stays up when not hit.
    pub mole_visible_ms: u64,
    pub hit_points: u32,
}

impl Default for WhackAMoleConfig {
    fn default() -> Self {
        Self {
            holes: 9,
            duration_secs: 30,
            spawn_every_ms: 800,
            mole_visible_ms: 1000,
            hit_points: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionTimeConfig {
    pub min_wait_ms: u64,
    /// Random extra wait on top of `min_wait_ms`.
    pub wait_jitter_ms: u64,
    pub restart_delay_ms: u64,
    /// Score for a 0 ms reaction; every millisecond costs a point.
    pub max_score: u32,
}

impl Default for ReactionTimeConfig {
    fn default() -> Self {
        Self {
            min_wait_ms: 2000,
            wait_jitter_ms: 3000,
            restart_delay_ms: 1000,
            max_score: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorMatchConfig {
    /// Colour names, shown upper-cased as the word and used as the ink.
    pub colors: Vec<String>,
    pub duration_secs: u32,
    pub points: u32,
}

impl Default for ColorMatchConfig {
    fn default() -> Self {
        Self {
            colors: ["red", "blue", "green", "yellow", "purple", "orange", "pink"]
                .into_iter()
                .map(String::from)
                .collect(),
            duration_secs: 30,
            points: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MathQuizConfig {
    pub questions: u32,
    /// Operands are drawn from `1..=max_operand`.
    pub max_operand: i32,
    pub choices: usize,
    pub points: u32,
    pub next_question_ms: u64,
}

impl Default for MathQuizConfig {
    fn default() -> Self {
        Self {
            questions: 10,
            max_operand: 20,
            choices: 4,
            points: 100,
            next_question_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinFlipConfig {
    pub flip_ms: u64,
    pub points: u32,
}

impl Default for CoinFlipConfig {
    fn default() -> Self {
        Self {
            flip_ms: 1000,
            points: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RockPaperScissorsConfig {
    pub points: u32,
}

impl Default for RockPaperScissorsConfig {
    fn default() -> Self {
        Self { points: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberGuessConfig {
    /// Secret numbers are drawn from `1..=max`.
    pub max: u32,
    pub base_score: u32,
    pub attempt_penalty: u32,
}

impl Default for NumberGuessConfig {
    fn default() -> Self {
        Self {
            max: 100,
            base_score: 1000,
            attempt_penalty: 50,
        }
    }
}
