use std::time::Duration;

use rand::seq::SliceRandom;
use serde::Serialize;

use arcade_core::game_trait::{ArcadeGame, GameContext, GameInput, GameView};
use arcade_core::timers::TimerId;

use crate::config::MemoryMatchConfig;

#[derive(Debug, Clone)]
struct Card {
    symbol: String,
    face_up: bool,
    matched: bool,
}

#[derive(Serialize)]
struct CardView<'a> {
    /// Only present while the card is face up.
    symbol: Option<&'a str>,
    face_up: bool,
    matched: bool,
}

#[derive(Serialize)]
struct MemoryMatchView<'a> {
    cards: Vec<CardView<'a>>,
    moves: u32,
    score: u32,
    over: bool,
}

/// Pairs of symbols dealt face down; flip two per move to find matches.
pub struct MemoryMatch {
    config: MemoryMatchConfig,
    cards: Vec<Card>,
    flipped: Vec<usize>,
    moves: u32,
    score: u32,
    over: bool,
    resolve_timer: Option<TimerId>,
}

impl MemoryMatch {
    pub fn new(config: MemoryMatchConfig) -> Self {
        let cards = config
            .symbols
            .iter()
            .chain(config.symbols.iter())
            .map(|symbol| Card {
                symbol: symbol.clone(),
                face_up: false,
                matched: false,
            })
            .collect();
        Self {
            config,
            cards,
            flipped: Vec::with_capacity(2),
            moves: 0,
            score: 0,
            over: false,
            resolve_timer: None,
        }
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    fn resolve(&mut self, ctx: &mut GameContext<'_>) {
        let [a, b] = match self.flipped[..] {
            [a, b] => [a, b],
            _ => return,
        };
        self.flipped.clear();
        if self.cards[a].symbol == self.cards[b].symbol {
            self.cards[a].matched = true;
            self.cards[b].matched = true;
        } else {
            self.cards[a].face_up = false;
            self.cards[b].face_up = false;
        }

        if self.cards.iter().all(|c| c.matched) {
            self.over = true;
            self.score = self
                .config
                .base_score
                .saturating_sub(self.moves.saturating_mul(self.config.move_penalty));
            ctx.report_score(self.score);
            ctx.notify(format!(
                "You won in {} moves! Score: {}",
                self.moves, self.score
            ));
            ctx.finish(self.score);
        }
    }
}

impl ArcadeGame for MemoryMatch {
    fn start(&mut self, ctx: &mut GameContext<'_>) {
        self.cards.shuffle(ctx.rng());
    }

    fn handle_input(&mut self, input: &GameInput, ctx: &mut GameContext<'_>) {
        let GameInput::Select(index) = *input else {
            return;
        };
        if self.over || self.resolve_timer.is_some() || self.flipped.len() >= 2 {
            return;
        }
        let Some(card) = self.cards.get_mut(index) else {
            return;
        };
        if card.face_up {
            return;
        }
        card.face_up = true;
        self.flipped.push(index);

        if self.flipped.len() == 2 {
            self.moves += 1;
            self.resolve_timer =
                Some(ctx.set_timeout(Duration::from_millis(self.config.reveal_ms)));
        }
    }

    fn on_timer(&mut self, timer: TimerId, ctx: &mut GameContext<'_>) {
        if self.resolve_timer == Some(timer) {
            self.resolve_timer = None;
            self.resolve(ctx);
        }
    }

    fn view(&self) -> GameView {
        let view = MemoryMatchView {
            cards: self
                .cards
                .iter()
                .map(|c| CardView {
                    symbol: c.face_up.then_some(c.symbol.as_str()),
                    face_up: c.face_up,
                    matched: c.matched,
                })
                .collect(),
            moves: self.moves,
            score: self.score,
            over: self.over,
        };
        serde_json::to_value(view).unwrap_or_default()
    }

    fn is_over(&self) -> bool {
        self.over
    }
}

#[cfg(test)]
mod tests {
    use arcade_core::game_trait::GameEvent;
    use arcade_core::session::Session;
    use arcade_core::test_helpers::{
        contract_input_after_stop_is_ignored, contract_start_produces_view,
        contract_stop_cancels_timers, start_session,
    };

    use super::*;

    fn new_game() -> MemoryMatch {
        MemoryMatch::new(MemoryMatchConfig::default())
    }

    fn pairs(game: &MemoryMatch) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, card) in game.cards.iter().enumerate() {
            if let Some(j) = (i + 1..game.cards.len()).find(|&j| game.cards[j].symbol == card.symbol)
            {
                pairs.push((i, j));
            }
        }
        pairs
    }

    fn mismatch(game: &MemoryMatch) -> (usize, usize) {
        let j = (1..game.cards.len())
            .find(|&j| game.cards[j].symbol != game.cards[0].symbol)
            .unwrap();
        (0, j)
    }

    fn reveal() -> Duration {
        Duration::from_millis(1000)
    }

    fn flip_pair(session: &mut Session<MemoryMatch>, (a, b): (usize, usize)) -> Vec<GameEvent> {
        session.handle_input(&GameInput::Select(a));
        session.handle_input(&GameInput::Select(b));
        session.advance(reveal())
    }

    #[test]
    fn contract() {
        contract_start_produces_view(Box::new(new_game()));
        contract_stop_cancels_timers(Box::new(new_game()));
        contract_input_after_stop_is_ignored(Box::new(new_game()), &[GameInput::Select(0)]);
    }

    #[test]
    fn deck_holds_every_symbol_twice() {
        let session = start_session(new_game(), 5);
        assert_eq!(session.game().card_count(), 16);
        assert_eq!(pairs(session.game()).len(), 8);
    }

    #[test]
    fn face_down_symbols_are_hidden() {
        let mut session = start_session(new_game(), 5);
        session.handle_input(&GameInput::Select(3));
        let view = session.view();
        let cards = view["cards"].as_array().unwrap();
        assert!(cards[3]["symbol"].is_string());
        assert!(cards[0]["symbol"].is_null());
    }

    #[test]
    fn mismatch_flips_back_after_delay() {
        let mut session = start_session(new_game(), 5);
        let pair = mismatch(session.game());
        flip_pair(&mut session, pair);
        let game = session.game();
        assert_eq!(game.moves(), 1);
        assert!(game.cards.iter().all(|c| !c.face_up));
    }

    #[test]
    fn third_click_while_resolving_is_ignored() {
        let mut session = start_session(new_game(), 5);
        let (a, b) = mismatch(session.game());
        session.handle_input(&GameInput::Select(a));
        session.handle_input(&GameInput::Select(b));
        let other = (0..16).find(|i| *i != a && *i != b).unwrap();
        session.handle_input(&GameInput::Select(other));
        assert!(!session.game().cards[other].face_up);
        assert_eq!(session.game().moves(), 1);
    }

    #[test]
    fn same_card_twice_is_not_a_move() {
        let mut session = start_session(new_game(), 5);
        session.handle_input(&GameInput::Select(2));
        session.handle_input(&GameInput::Select(2));
        assert_eq!(session.game().moves(), 0);
        assert_eq!(session.active_timers(), 0);
    }

    #[test]
    fn perfect_game_scores_920() {
        let mut session = start_session(new_game(), 9);
        let all = pairs(session.game());
        let mut last = Vec::new();
        for pair in all {
            last = flip_pair(&mut session, pair);
        }
        assert!(session.is_over());
        assert_eq!(
            last,
            vec![
                GameEvent::ScoreUpdate { score: 920 },
                GameEvent::Message("You won in 8 moves! Score: 920".to_string()),
                GameEvent::GameOver { final_score: 920 },
            ]
        );
    }

    #[test]
    fn score_never_goes_below_zero() {
        let mut session = start_session(new_game(), 9);
        for _ in 0..120 {
            let pair = mismatch(session.game());
            flip_pair(&mut session, pair);
        }
        for pair in pairs(session.game()) {
            flip_pair(&mut session, pair);
        }
        assert_eq!(session.game().score, 0);
        assert!(session.is_over());
    }
}
