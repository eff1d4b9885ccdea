use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use arcade_core::arcade_game_boilerplate;
use arcade_core::game_trait::{ArcadeGame, GameContext, GameInput};
use arcade_core::timers::TimerId;

use crate::config::MathQuizConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "×")]
    Mul,
}

impl Operator {
    const ALL: [Operator; 3] = [Operator::Add, Operator::Sub, Operator::Mul];

    fn apply(self, a: i32, b: i32) -> i32 {
        match self {
            Self::Add => a.saturating_add(b),
            Self::Sub => a.saturating_sub(b),
            Self::Mul => a.saturating_mul(b),
        }
    }

    fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '×',
        }
    }
}

/// How the last question was answered, shown until the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub picked: usize,
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MathQuizState {
    /// 1-based.
    pub question_number: u32,
    pub total_questions: u32,
    pub prompt: String,
    pub choices: Vec<i32>,
    pub feedback: Option<Feedback>,
    pub score: u32,
    pub over: bool,
}

/// A fixed number of multiple-choice arithmetic questions.
pub struct MathQuiz {
    config: MathQuizConfig,
    state: MathQuizState,
    answer: i32,
    next_timer: Option<TimerId>,
}

impl MathQuiz {
    pub fn new(config: MathQuizConfig) -> Self {
        Self {
            state: MathQuizState {
                question_number: 1,
                total_questions: config.questions,
                prompt: String::new(),
                choices: Vec::new(),
                feedback: None,
                score: 0,
                over: false,
            },
            answer: 0,
            next_timer: None,
            config,
        }
    }

    pub fn state(&self) -> &MathQuizState {
        &self.state
    }

    fn generate(&mut self, ctx: &mut GameContext<'_>) {
        let rng = ctx.rng();
        let a = rng.random_range(1..=self.config.max_operand);
        let b = rng.random_range(1..=self.config.max_operand);
        let op = Operator::ALL[rng.random_range(0..Operator::ALL.len())];
        let answer = op.apply(a, b);

        let mut choices = vec![answer];
        while choices.len() < self.config.choices {
            let wrong = answer.saturating_add(rng.random_range(-10..10));
            // Distractors stay non-negative unless the answer is negative.
            if !choices.contains(&wrong) && (wrong >= 0 || answer < 0) {
                choices.push(wrong);
            }
        }
        choices.shuffle(rng);

        self.answer = answer;
        self.state.prompt = format!("{a} {} {b} = ?", op.symbol());
        self.state.choices = choices;
        self.state.feedback = None;
    }
}

impl ArcadeGame for MathQuiz {
    fn start(&mut self, ctx: &mut GameContext<'_>) {
        self.generate(ctx);
    }

    fn handle_input(&mut self, input: &GameInput, ctx: &mut GameContext<'_>) {
        let GameInput::Select(picked) = *input else {
            return;
        };
        if self.state.over || self.state.feedback.is_some() {
            return;
        }
        let Some(&choice) = self.state.choices.get(picked) else {
            return;
        };

        let correct = choice == self.answer;
        if correct {
            self.state.score += self.config.points;
            ctx.report_score(self.state.score);
        }
        self.state.feedback = Some(Feedback { picked, correct });

        if self.state.question_number >= self.config.questions {
            self.state.over = true;
            let max = self.config.questions * self.config.points;
            ctx.notify(format!("Quiz complete! Final Score: {}/{max}", self.state.score));
            ctx.finish(self.state.score);
        } else {
            self.next_timer =
                Some(ctx.set_timeout(Duration::from_millis(self.config.next_question_ms)));
        }
    }

    fn on_timer(&mut self, timer: TimerId, ctx: &mut GameContext<'_>) {
        if self.next_timer == Some(timer) {
            self.next_timer = None;
            self.state.question_number += 1;
            self.generate(ctx);
        }
    }

    arcade_game_boilerplate!();
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use arcade_core::game_trait::GameEvent;
    use arcade_core::session::Session;
    use arcade_core::test_helpers::{
        contract_input_after_stop_is_ignored, contract_start_produces_view,
        contract_stop_cancels_timers, start_session,
    };

    use super::*;

    fn new_game() -> MathQuiz {
        MathQuiz::new(MathQuizConfig::default())
    }

    fn correct_index(session: &Session<MathQuiz>) -> usize {
        let game = session.game();
        game.state()
            .choices
            .iter()
            .position(|c| *c == game.answer)
            .unwrap()
    }

    #[test]
    fn contract() {
        contract_start_produces_view(Box::new(new_game()));
        contract_stop_cancels_timers(Box::new(new_game()));
        contract_input_after_stop_is_ignored(Box::new(new_game()), &[GameInput::Select(0)]);
    }

    #[test]
    fn perfect_quiz_scores_a_thousand() {
        let mut session = start_session(new_game(), 12);
        let mut events = Vec::new();
        for _ in 0..10 {
            let pick = correct_index(&session);
            events = session.handle_input(&GameInput::Select(pick));
            session.advance(Duration::from_millis(1000));
        }
        assert!(session.is_over());
        assert_eq!(session.game().state().question_number, 10);
        assert_eq!(
            events,
            vec![
                GameEvent::ScoreUpdate { score: 1000 },
                GameEvent::Message("Quiz complete! Final Score: 1000/1000".to_string()),
                GameEvent::GameOver { final_score: 1000 },
            ]
        );
    }

    #[test]
    fn wrong_answer_scores_nothing_but_advances() {
        let mut session = start_session(new_game(), 12);
        let wrong = (correct_index(&session) + 1) % 4;
        assert!(session.handle_input(&GameInput::Select(wrong)).is_empty());
        assert_eq!(
            session.game().state().feedback,
            Some(Feedback {
                picked: wrong,
                correct: false
            })
        );
        session.advance(Duration::from_millis(1000));
        assert_eq!(session.game().state().question_number, 2);
        assert_eq!(session.game().state().feedback, None);
    }

    #[test]
    fn clicks_between_questions_are_ignored() {
        let mut session = start_session(new_game(), 12);
        let pick = correct_index(&session);
        session.handle_input(&GameInput::Select(pick));
        assert!(session.handle_input(&GameInput::Select(pick)).is_empty());
        assert_eq!(session.game().state().score, 100);
    }

    #[test]
    fn operators_saturate_instead_of_overflowing() {
        assert_eq!(Operator::Add.apply(i32::MAX, 1), i32::MAX);
        assert_eq!(Operator::Sub.apply(i32::MIN, 1), i32::MIN);
        assert_eq!(Operator::Mul.apply(i32::MAX, 2), i32::MAX);
        assert_eq!(Operator::Mul.apply(6, 7), 42);
    }

    proptest! {
        #[test]
        fn largest_operands_generate_full_questions(seed in any::<u64>()) {
            let config = MathQuizConfig {
                max_operand: crate::config::MAX_OPERAND,
                ..MathQuizConfig::default()
            };
            let session = start_session(MathQuiz::new(config), seed);
            let game = session.game();
            prop_assert_eq!(game.state().choices.len(), 4);
            prop_assert!(game.state().choices.contains(&game.answer));
        }

        #[test]
        fn choices_are_distinct_and_contain_the_answer(seed in any::<u64>()) {
            let session = start_session(new_game(), seed);
            let game = session.game();
            let choices = &game.state().choices;
            prop_assert_eq!(choices.len(), 4);
            prop_assert!(choices.contains(&game.answer));
            for (i, c) in choices.iter().enumerate() {
                prop_assert!(!choices[i + 1..].contains(c));
                if game.answer >= 0 {
                    prop_assert!(*c >= 0);
                }
            }
        }

        #[test]
        fn negative_answers_still_get_a_full_choice_set(seed in any::<u64>()) {
            // 1 - 20 style questions must not stall generation.
            let config = MathQuizConfig { choices: 10, ..MathQuizConfig::default() };
            let session = start_session(MathQuiz::new(config), seed);
            prop_assert_eq!(session.game().state().choices.len(), 10);
        }
    }
}
