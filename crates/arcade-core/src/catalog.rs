use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Numeric identifier of a catalog entry. Also the key of the score table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u32);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category a game is listed under on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Arcade,
    Puzzle,
    Strategy,
    Reflex,
    Brain,
    Luck,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Arcade,
        Category::Puzzle,
        Category::Strategy,
        Category::Reflex,
        Category::Brain,
        Category::Luck,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Arcade => "arcade",
            Self::Puzzle => "puzzle",
            Self::Strategy => "strategy",
            Self::Reflex => "reflex",
            Self::Brain => "brain",
            Self::Luck => "luck",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDescriptor {
    pub id: GameId,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub icon: String,
    pub implemented: bool,
}

impl GameDescriptor {
    fn new(
        id: u32,
        name: &str,
        description: &str,
        category: Category,
        icon: &str,
        implemented: bool,
    ) -> Self {
        Self {
            id: GameId(id),
            name: name.to_string(),
            description: description.to_string(),
            category,
            icon: icon.to_string(),
            implemented,
        }
    }
}

/// Immutable list of every game the arcade knows about.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<GameDescriptor>,
}

impl Catalog {
    pub fn new(entries: Vec<GameDescriptor>) -> Self {
        Self { entries }
    }

    /// The games shipped with the arcade, including the ones still marked
    /// "coming soon".
    pub fn builtin() -> Self {
        use Category::*;
        Self::new(vec![
            GameDescriptor::new(1, "Snake", "Eat the food, grow longer and avoid the walls", Arcade, "🐍", true),
            GameDescriptor::new(2, "Tetris", "Stack falling blocks and clear lines", Arcade, "🧱", false),
            GameDescriptor::new(3, "Pong", "Classic paddle duel against the computer", Arcade, "🏓", false),
            GameDescriptor::new(4, "Breakout", "Bounce the ball to smash every brick", Arcade, "🟦", false),
            GameDescriptor::new(21, "Tic-Tac-Toe", "Get three in a row before the computer does", Strategy, "❌", true),
            GameDescriptor::new(22, "Memory Match", "Flip cards and find all matching pairs", Puzzle, "🃏", true),
            GameDescriptor::new(23, "Sudoku", "Fill the grid so every row, column and box has 1-9", Puzzle, "🔢", false),
            GameDescriptor::new(24, "2048", "Slide and merge tiles to reach 2048", Puzzle, "🧮", false),
            GameDescriptor::new(25, "Connect Four", "Drop discs and connect four in a line", Strategy, "🔴", false),
            GameDescriptor::new(56, "Whack-a-Mole", "Hit the moles before they hide again", Reflex, "🐹", true),
            GameDescriptor::new(57, "Simon Says", "Repeat the growing sequence of colours", Reflex, "🎵", false),
            GameDescriptor::new(58, "Reaction Time", "Click the moment the box turns green", Reflex, "⚡", true),
            GameDescriptor::new(59, "Color Match", "Does the word match the colour it is painted in?", Brain, "🎨", true),
            GameDescriptor::new(60, "Typing Test", "Type the words as fast as you can", Reflex, "⌨️", false),
            GameDescriptor::new(77, "Math Quiz", "Answer ten quick arithmetic questions", Brain, "➗", true),
            GameDescriptor::new(78, "Trivia", "Test your general knowledge", Brain, "❓", false),
            GameDescriptor::new(92, "Coin Flip", "Call heads or tails and test your luck", Luck, "🪙", true),
            GameDescriptor::new(93, "Rock Paper Scissors", "Beat the computer at the classic hand game", Luck, "✊", true),
            GameDescriptor::new(94, "Number Guess", "Guess the secret number between 1 and 100", Brain, "🎯", true),
            GameDescriptor::new(95, "Dice Roll", "Roll the dice and hope for doubles", Luck, "🎲", false),
        ])
    }

    pub fn entries(&self) -> &[GameDescriptor] {
        &self.entries
    }

    pub fn get(&self, id: GameId) -> Option<&GameDescriptor> {
        self.entries.iter().find(|g| g.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
