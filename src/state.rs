use crate::snake::{Cell, Direction::{self, *}, Snake};

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

pub const DEFAULT_WIDTH: i32 = 30;
pub const DEFAULT_HEIGHT: i32 = 20;

pub const INITIAL_HEAD: Cell = Cell::new(10, 10);
pub const INITIAL_SNAKE_LENGTH: usize = 3;
pub const INITIAL_DIRECTION: Direction = Right;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Over,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    Wall,
    SelfCollision,
    /// The snake covers every cell, so no food can be placed.
    BoardFull,
}

/// What happened during a single `tick()`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub ate_food: bool,
    pub ended: Option<EndReason>,
    /// Set when the game just ended with a new record.
    pub new_high_score: Option<u32>,
}

/// Read-only view handed to renderers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub snake: Vec<Cell>,
    pub direction: Direction,
    pub food: Cell,
    pub score: u32,
    pub high_score: u32,
    pub status: GameStatus,
    pub width: i32,
    pub height: i32,
}

pub struct GameState {
    width: i32,
    height: i32,
    snake: Snake,
    direction: Direction,
    // Direction of the most recent tick. Its opposite stays blocked until the
    // next tick so that several presses cannot reverse into the neck.
    last_moved: Direction,
    food: Cell,
    score: u32,
    high_score: u32,
    status: GameStatus,
    rng: StdRng,
}

impl GameState {
    pub fn new(width: i32, height: i32, high_score: u32) -> Self {
        Self::with_rng(width, height, high_score, StdRng::from_entropy())
    }

    pub fn with_rng(width: i32, height: i32, high_score: u32, rng: StdRng) -> Self {
        let snake = Snake::new(INITIAL_HEAD, INITIAL_SNAKE_LENGTH, INITIAL_DIRECTION);
        let mut state = GameState {
            width,
            height,
            snake,
            direction: INITIAL_DIRECTION,
            last_moved: INITIAL_DIRECTION,
            food: INITIAL_HEAD,
            score: 0,
            high_score,
            status: GameStatus::Running,
            rng,
        };
        state.reset();
        state
    }

    pub fn reset(&mut self) {
        self.snake = Snake::new(INITIAL_HEAD, INITIAL_SNAKE_LENGTH, INITIAL_DIRECTION);
        self.direction = INITIAL_DIRECTION;
        self.last_moved = INITIAL_DIRECTION;
        self.score = 0;
        self.status = GameStatus::Running;
        // Grids are validated to hold more than the initial snake
        self.food = self.spawn_food().unwrap_or_else(|| INITIAL_HEAD.step(INITIAL_DIRECTION));
        log::info!("New game on a {}x{} grid, food at ({}, {})", self.width, self.height, self.food.x, self.food.y);
    }

    pub fn set_direction(&mut self, requested: Direction) {
        if self.status == GameStatus::Over {
            return;
        }

        if self.direction.allows_turn_to(requested) && requested != self.last_moved.opposite() {
            self.direction = requested;
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.status == GameStatus::Over {
            return outcome;
        }

        let new_head = self.snake.head().step(self.direction);
        self.last_moved = self.direction;

        let mut board_full = false;
        if new_head == self.food {
            self.snake.advance(new_head, true);
            self.score += 1;
            outcome.ate_food = true;
            log::debug!("Ate food at ({}, {}). Score: {}", new_head.x, new_head.y, self.score);

            match self.spawn_food() {
                Some(food) => self.food = food,
                None => board_full = true,
            }
        } else {
            self.snake.advance(new_head, false);
        }

        let ended = if !self.in_bounds(new_head) {
            Some(EndReason::Wall)
        } else if self.snake.head_hits_body() {
            Some(EndReason::SelfCollision)
        } else if board_full {
            Some(EndReason::BoardFull)
        } else {
            None
        };

        if let Some(reason) = ended {
            outcome.ended = Some(reason);
            outcome.new_high_score = self.end_game(reason);
        }

        outcome
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            snake: self.snake.body().to_vec(),
            direction: self.direction,
            food: self.food,
            score: self.score,
            high_score: self.high_score,
            status: self.status,
            width: self.width,
            height: self.height,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    ///////////////////////////////////////////////////////////////////////////

    fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    fn end_game(&mut self, reason: EndReason) -> Option<u32> {
        self.status = GameStatus::Over;
        log::info!("Game over ({:?}). Score: {}, length: {}", reason, self.score, self.snake.len());

        if self.score > self.high_score {
            self.high_score = self.score;
            log::info!("New high score: {}", self.high_score);
            Some(self.high_score)
        } else {
            None
        }
    }

    fn spawn_food(&mut self) -> Option<Cell> {
        let choices: Vec<Cell> = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| Cell::new(x, y)))
            .filter(|cell| !self.snake.contains(*cell))
            .collect();
        choices.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(width: i32, height: i32, high_score: u32) -> GameState {
        GameState::with_rng(width, height, high_score, StdRng::seed_from_u64(7))
    }

    fn place(state: &mut GameState, body: &[(i32, i32)], direction: Direction, food: (i32, i32)) {
        state.snake = Snake::from_cells(body.iter().map(|&(x, y)| Cell::new(x, y)).collect());
        state.direction = direction;
        state.last_moved = direction;
        state.food = Cell::new(food.0, food.1);
    }

    #[test]
    fn test_initial_state() {
        let state = seeded(DEFAULT_WIDTH, DEFAULT_HEIGHT, 4);
        let snap = state.snapshot();

        assert_eq!(snap.snake, vec![Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)]);
        assert_eq!(snap.direction, Right);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.high_score, 4);
        assert_eq!(snap.status, GameStatus::Running);
        assert!(!snap.snake.contains(&snap.food));
    }

    #[test]
    fn test_eat_food_scenario() {
        let mut state = seeded(30, 20, 0);
        place(&mut state, &[(10, 10), (9, 10), (8, 10)], Right, (11, 10));

        let outcome = state.tick();

        assert!(outcome.ate_food);
        assert_eq!(outcome.ended, None);
        assert_eq!(state.score(), 1);
        let snap = state.snapshot();
        assert_eq!(
            snap.snake,
            vec![Cell::new(11, 10), Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)]
        );
        assert!(!snap.snake.contains(&snap.food));
        assert_eq!(snap.status, GameStatus::Running);
    }

    #[test]
    fn test_plain_move_keeps_length() {
        let mut state = seeded(30, 20, 0);
        place(&mut state, &[(10, 10), (9, 10), (8, 10)], Right, (0, 0));

        let outcome = state.tick();

        assert_eq!(outcome, TickOutcome::default());
        assert_eq!(state.snapshot().snake, vec![Cell::new(11, 10), Cell::new(10, 10), Cell::new(9, 10)]);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_growth_only_on_eating_tick() {
        let mut state = seeded(30, 20, 0);
        place(&mut state, &[(10, 10), (9, 10), (8, 10)], Right, (11, 10));

        state.tick();
        let len_after_eat = state.snapshot().snake.len();
        // Keep the fresh food out of the way of the next step
        state.food = Cell::new(0, 0);
        state.tick();

        assert_eq!(len_after_eat, 4);
        assert_eq!(state.snapshot().snake.len(), 4);
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_wall_collision_right_edge() {
        let mut state = seeded(30, 20, 0);
        place(&mut state, &[(29, 10), (28, 10), (27, 10)], Right, (0, 0));

        let outcome = state.tick();

        assert_eq!(outcome.ended, Some(EndReason::Wall));
        assert_eq!(state.status(), GameStatus::Over);
        assert_eq!(state.snapshot().snake[0], Cell::new(30, 10));
    }

    #[test]
    fn test_wall_collision_left_edge_freezes() {
        let mut state = seeded(30, 20, 0);
        place(&mut state, &[(0, 5), (1, 5), (2, 5)], Left, (10, 10));

        state.tick();
        assert_eq!(state.status(), GameStatus::Over);
        let frozen = state.snapshot();

        assert_eq!(state.tick(), TickOutcome::default());
        state.set_direction(Up);
        state.tick();
        assert_eq!(state.snapshot(), frozen);
    }

    #[test]
    fn test_self_collision() {
        let mut state = seeded(30, 20, 0);
        place(&mut state, &[(5, 5), (4, 5), (3, 5), (2, 5), (1, 5)], Right, (20, 15));

        state.set_direction(Down);
        state.tick();
        state.set_direction(Left);
        state.tick();
        state.set_direction(Up);
        let outcome = state.tick();

        assert_eq!(outcome.ended, Some(EndReason::SelfCollision));
        assert_eq!(state.status(), GameStatus::Over);
    }

    #[test]
    fn test_moving_into_vacated_tail_is_safe() {
        let mut state = seeded(30, 20, 0);
        // A tight 2x2 loop: the head steps onto the cell the tail just left
        place(&mut state, &[(5, 5), (5, 6), (6, 6), (6, 5)], Up, (20, 15));

        state.set_direction(Right);
        let outcome = state.tick();

        assert_eq!(outcome.ended, None);
        assert_eq!(state.snapshot().snake[0], Cell::new(6, 5));
    }

    #[test]
    fn test_reverse_is_ignored() {
        let mut state = seeded(30, 20, 0);
        state.set_direction(Left);
        assert_eq!(state.snapshot().direction, Right);

        state.set_direction(Up);
        assert_eq!(state.snapshot().direction, Up);
    }

    #[test]
    fn test_queued_turns_cannot_reverse_into_neck() {
        let mut state = seeded(30, 20, 0);

        // Still heading right since the last tick, so Left stays blocked
        state.set_direction(Up);
        state.set_direction(Left);
        assert_eq!(state.snapshot().direction, Up);

        // Opposite of the pending direction is blocked too
        state.set_direction(Down);
        assert_eq!(state.snapshot().direction, Up);

        state.tick();
        state.set_direction(Left);
        assert_eq!(state.snapshot().direction, Left);
    }

    #[test]
    fn test_pending_turn_can_be_taken_back() {
        let mut state = seeded(30, 20, 0);
        place(&mut state, &[(10, 10), (9, 10), (8, 10)], Right, (0, 0));

        state.set_direction(Up);
        state.set_direction(Right);
        assert_eq!(state.snapshot().direction, Right);

        state.tick();
        assert_eq!(state.snapshot().snake[0], Cell::new(11, 10));
    }

    #[test]
    fn test_pending_turn_replaced_after_tick() {
        let mut state = seeded(30, 20, 0);
        place(&mut state, &[(10, 10), (9, 10), (8, 10)], Up, (0, 0));
        state.tick();

        state.set_direction(Right);
        assert_eq!(state.snapshot().direction, Right);

        let mut state = seeded(30, 20, 0);
        place(&mut state, &[(10, 10), (9, 10), (8, 10)], Up, (0, 0));
        state.tick();

        state.set_direction(Left);
        assert_eq!(state.snapshot().direction, Left);

        // Heading up since the last tick, so Down is still refused
        state.set_direction(Down);
        assert_eq!(state.snapshot().direction, Left);
    }

    #[test]
    fn test_high_score_updates_only_when_beaten() {
        let mut state = seeded(30, 20, 5);
        place(&mut state, &[(29, 10), (28, 10), (27, 10)], Right, (0, 0));
        state.score = 3;

        let outcome = state.tick();
        assert_eq!(outcome.new_high_score, None);
        assert_eq!(state.high_score(), 5);

        state.reset();
        place(&mut state, &[(29, 10), (28, 10), (27, 10)], Right, (0, 0));
        state.score = 5;
        assert_eq!(state.tick().new_high_score, None);

        state.reset();
        place(&mut state, &[(29, 10), (28, 10), (27, 10)], Right, (0, 0));
        state.score = 8;
        assert_eq!(state.tick().new_high_score, Some(8));
        assert_eq!(state.high_score(), 8);
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let mut state = seeded(30, 20, 0);
        place(&mut state, &[(29, 10), (28, 10), (27, 10)], Right, (0, 0));
        state.score = 2;
        state.tick();
        assert_eq!(state.status(), GameStatus::Over);

        state.reset();

        let snap = state.snapshot();
        assert_eq!(snap.status, GameStatus::Running);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.high_score, 2);
        assert_eq!(snap.direction, Right);
        assert_eq!(snap.snake, vec![Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)]);
        assert!(!snap.snake.contains(&snap.food));
    }

    #[test]
    fn test_board_full_ends_game() {
        let mut state = seeded(2, 2, 0);
        place(&mut state, &[(0, 0), (0, 1), (1, 1)], Right, (1, 0));

        let outcome = state.tick();

        assert!(outcome.ate_food);
        assert_eq!(outcome.ended, Some(EndReason::BoardFull));
        assert_eq!(outcome.new_high_score, Some(1));
        assert_eq!(state.status(), GameStatus::Over);
    }

    #[test]
    fn test_food_never_spawns_on_snake() {
        let mut state = seeded(12, 11, 0);
        for _ in 0..200 {
            let food = state.spawn_food().unwrap();
            assert!(!state.snake.contains(food));
        }
    }

    #[test]
    fn test_length_never_shrinks_while_running() {
        let mut state = seeded(30, 20, 0);
        let turns = [Down, Left, Up, Right];
        let mut prev_len = state.snapshot().snake.len();

        for (i, dir) in turns.iter().cycle().take(40).enumerate() {
            if i % 3 == 0 {
                state.set_direction(*dir);
            }
            state.tick();
            if state.status() == GameStatus::Over {
                break;
            }
            let len = state.snapshot().snake.len();
            assert!(len >= prev_len);
            prev_len = len;
        }
    }
}
