use arcade_core::game_trait::{Direction, GameInput};

/// What a key press on the page means to the arcade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Close the game modal.
    Close,
    /// Forward to the running game.
    Game(GameInput),
}

/// Map a `KeyboardEvent.key` value to an action. Unrelated keys map to `None`
/// and are left to the browser.
pub fn key_action(key: &str) -> Option<KeyAction> {
    let dir = match key {
        "Escape" | "Esc" => return Some(KeyAction::Close),
        "ArrowUp" => Direction::Up,
        "ArrowDown" => Direction::Down,
        "ArrowLeft" => Direction::Left,
        "ArrowRight" => Direction::Right,
        _ => return None,
    };
    Some(KeyAction::Game(GameInput::Arrow(dir)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_closes() {
        assert_eq!(key_action("Escape"), Some(KeyAction::Close));
    }

    #[test]
    fn arrows_go_to_the_game() {
        assert_eq!(
            key_action("ArrowLeft"),
            Some(KeyAction::Game(GameInput::Arrow(Direction::Left)))
        );
        assert_eq!(
            key_action("ArrowDown"),
            Some(KeyAction::Game(GameInput::Arrow(Direction::Down)))
        );
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(key_action("a"), None);
        assert_eq!(key_action("Enter"), None);
    }
}
