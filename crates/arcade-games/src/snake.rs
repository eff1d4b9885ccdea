use std::collections::VecDeque;
use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use arcade_core::arcade_game_boilerplate;
use arcade_core::game_trait::{ArcadeGame, Direction, GameContext, GameInput};
use arcade_core::timers::TimerId;

use crate::config::SnakeConfig;

/// A board cell. `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SnakeState {
    pub grid_size: u32,
    /// Head first.
    pub body: VecDeque<Cell>,
    pub heading: Direction,
    pub food: Cell,
    pub score: u32,
    pub over: bool,
}

/// Classic snake on a square grid, one step per tick.
pub struct Snake {
    config: SnakeConfig,
    state: SnakeState,
    /// Direction of the last step actually taken. Turns are checked against
    /// it so two quick presses inside one tick cannot reverse the snake.
    last_step: Direction,
    tick: Option<TimerId>,
}

impl Snake {
    pub fn new(config: SnakeConfig) -> Self {
        let [fx, fy] = config.first_food;
        let state = SnakeState {
            grid_size: config.grid_size,
            body: VecDeque::from([Cell { x: 0, y: 0 }]),
            heading: Direction::Right,
            food: Cell {
                x: fx as i32,
                y: fy as i32,
            },
            score: 0,
            over: false,
        };
        Self {
            config,
            state,
            last_step: Direction::Right,
            tick: None,
        }
    }

    pub fn state(&self) -> &SnakeState {
        &self.state
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        let size = self.state.grid_size as i32;
        (0..size).contains(&cell.x) && (0..size).contains(&cell.y)
    }

    fn step(&mut self, ctx: &mut GameContext<'_>) {
        let head = self.state.body.front().copied().unwrap_or(Cell { x: 0, y: 0 });
        let next = head.step(self.state.heading);

        if !self.in_bounds(next) || self.state.body.contains(&next) {
            self.end(ctx);
            return;
        }

        self.state.body.push_front(next);
        self.last_step = self.state.heading;

        if next == self.state.food {
            self.state.score += 1;
            ctx.report_score(self.state.score);
            self.place_food(ctx);
        } else {
            self.state.body.pop_back();
        }
    }

    fn place_food(&mut self, ctx: &mut GameContext<'_>) {
        let size = self.state.grid_size as i32;
        let free: Vec<Cell> = (0..size)
            .flat_map(|y| (0..size).map(move |x| Cell { x, y }))
            .filter(|cell| !self.state.body.contains(cell))
            .collect();
        if free.is_empty() {
            // Board is full; nothing left to eat.
            self.end(ctx);
            return;
        }
        self.state.food = free[ctx.rng().random_range(0..free.len())];
    }

    fn end(&mut self, ctx: &mut GameContext<'_>) {
        self.state.over = true;
        ctx.clear_slot(&mut self.tick);
        ctx.notify(format!("Game Over! Final Score: {}", self.state.score));
        ctx.finish(self.state.score);
    }
}

impl ArcadeGame for Snake {
    fn start(&mut self, ctx: &mut GameContext<'_>) {
        self.tick = Some(ctx.set_interval(Duration::from_millis(self.config.tick_ms)));
    }

    fn handle_input(&mut self, input: &GameInput, _ctx: &mut GameContext<'_>) {
        if self.state.over {
            return;
        }
        if let GameInput::Arrow(dir) = *input
            && dir.is_perpendicular_to(self.last_step)
        {
            self.state.heading = dir;
        }
    }

    fn on_timer(&mut self, timer: TimerId, ctx: &mut GameContext<'_>) {
        if self.tick == Some(timer) && !self.state.over {
            self.step(ctx);
        }
    }

    arcade_game_boilerplate!();
}
