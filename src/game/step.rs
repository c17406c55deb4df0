//! The per-tick simulation rule, free of any timing or lifecycle concerns.

use rand::Rng;

use super::{
    config::GameConfig,
    state::{CollisionType, GameState, Position, Snake},
};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// The snake covers every cell, no food could be placed
    pub grid_filled: bool,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn moved(ate_food: bool) -> Self {
        Self {
            terminated: false,
            info: StepInfo {
                ate_food,
                collision_type: None,
                grid_filled: false,
            },
        }
    }

    fn collided(collision_type: CollisionType) -> Self {
        Self {
            terminated: true,
            info: StepInfo {
                ate_food: false,
                collision_type: Some(collision_type),
                grid_filled: false,
            },
        }
    }

    fn filled() -> Self {
        Self {
            terminated: true,
            info: StepInfo {
                ate_food: true,
                collision_type: None,
                grid_filled: true,
            },
        }
    }
}

/// Advance the board by one cell.
///
/// Nothing is mutated when the move collides, so the board keeps showing
/// the snake as it was just before the crash.
pub fn step<R: Rng>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
) -> StepResult {
    state.snake.direction = state.pending_direction;

    let new_head = state.snake.head().moved_in_direction(state.snake.direction);

    if !state.is_in_bounds(new_head) {
        return StepResult::collided(CollisionType::Wall);
    }

    let will_eat = state.food == Some(new_head);

    if state.snake.would_collide(new_head, !will_eat) {
        return StepResult::collided(CollisionType::SelfCollision);
    }

    state.snake.advance(new_head, will_eat);

    if !will_eat {
        return StepResult::moved(false);
    }

    state.score += config.score_per_food;
    state.speed_ms = state
        .speed_ms
        .saturating_sub(config.speed_step_ms)
        .max(config.min_speed_ms);
    state.food = spawn_food(&state.snake, state.grid_width, state.grid_height, rng);

    match state.food {
        Some(_) => StepResult::moved(true),
        None => StepResult::filled(),
    }
}

/// Pick a uniformly random cell not covered by the snake.
///
/// Rejection sampling against the whole body; `None` when the snake
/// already covers the grid.
pub fn spawn_food<R: Rng>(
    snake: &Snake,
    grid_width: usize,
    grid_height: usize,
    rng: &mut R,
) -> Option<Position> {
    if snake.len() >= grid_width * grid_height {
        return None;
    }

    loop {
        let x = rng.gen_range(0..grid_width) as i32;
        let y = rng.gen_range(0..grid_height) as i32;
        let pos = Position::new(x, y);

        if !snake.contains(pos) {
            return Some(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;
    use rand::{SeedableRng, rngs::StdRng};

    fn board(cells: &[(i32, i32)], direction: Direction, food: (i32, i32)) -> GameState {
        let snake = Snake::from_cells(
            cells.iter().map(|&(x, y)| Position::new(x, y)),
            direction,
        )
        .unwrap();
        GameState::new(snake, Some(Position::new(food.0, food.1)), 20, 15, 150)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_plain_move_keeps_length() {
        let config = GameConfig::default();
        let mut state = board(&[(10, 7), (9, 7), (8, 7)], Direction::Right, (0, 0));

        let result = step(&mut state, &config, &mut rng());

        assert!(!result.terminated);
        assert!(!result.info.ate_food);
        assert_eq!(state.snake.head(), Position::new(11, 7));
        assert_eq!(state.snake.tail(), Position::new(9, 7));
        assert!(!state.snake.contains(Position::new(8, 7)));
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.speed_ms, 150);
    }

    #[test]
    fn test_pending_direction_is_committed() {
        let config = GameConfig::default();
        let mut state = board(&[(10, 7), (9, 7), (8, 7)], Direction::Right, (0, 0));
        state.pending_direction = Direction::Down;

        step(&mut state, &config, &mut rng());

        assert_eq!(state.snake.direction, Direction::Down);
        assert_eq!(state.snake.head(), Position::new(10, 8));
    }

    #[test]
    fn test_eating_grows_scores_and_speeds_up() {
        let config = GameConfig::default();
        let mut state = board(&[(10, 7), (9, 7), (8, 7)], Direction::Right, (11, 7));

        let result = step(&mut state, &config, &mut rng());

        assert!(result.info.ate_food);
        assert!(!result.terminated);
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.score, 10);
        assert_eq!(state.speed_ms, 148);
        let food = state.food.unwrap();
        assert!(state.is_in_bounds(food));
        assert!(!state.snake.contains(food));
    }

    #[test]
    fn test_speed_floors_at_minimum() {
        let config = GameConfig::default();
        let mut state = board(&[(10, 7), (9, 7), (8, 7)], Direction::Right, (11, 7));
        state.speed_ms = 81;

        step(&mut state, &config, &mut rng());

        assert_eq!(state.speed_ms, 80);
    }

    #[test]
    fn test_wall_collision_leaves_board_untouched() {
        let config = GameConfig::default();
        let mut state = board(&[(0, 5), (1, 5), (2, 5)], Direction::Left, (9, 9));
        let before = state.clone();

        let result = step(&mut state, &config, &mut rng());

        assert!(result.terminated);
        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
        assert_eq!(state.snake, before.snake);
        assert_eq!(state.score, before.score);
    }

    #[test]
    fn test_moving_into_vacating_tail_is_legal() {
        // A 2x2 loop: head (1,0) going down to (1,1), tail at (1,1)
        let config = GameConfig::default();
        let mut state = board(
            &[(1, 0), (0, 0), (0, 1), (1, 1)],
            Direction::Right,
            (10, 10),
        );
        state.pending_direction = Direction::Down;

        let result = step(&mut state, &config, &mut rng());

        assert!(!result.terminated);
        assert_eq!(state.snake.head(), Position::new(1, 1));
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_eating_onto_tail_collides() {
        // Same loop, but food sits on the tail cell so the tail stays
        let config = GameConfig::default();
        let mut state = board(&[(1, 0), (0, 0), (0, 1), (1, 1)], Direction::Right, (1, 1));
        state.pending_direction = Direction::Down;

        let result = step(&mut state, &config, &mut rng());

        assert!(result.terminated);
        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_self_collision_into_body() {
        let config = GameConfig::default();
        let mut state = board(
            &[(5, 5), (5, 6), (6, 6), (6, 5), (6, 4)],
            Direction::Up,
            (10, 10),
        );
        state.pending_direction = Direction::Right;

        let result = step(&mut state, &config, &mut rng());

        assert!(result.terminated);
        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_filling_the_grid_terminates() {
        let config = GameConfig::default();
        let snake = Snake::from_cells(
            [Position::new(1, 0), Position::new(1, 1), Position::new(0, 1)],
            Direction::Left,
        )
        .unwrap();
        let mut state = GameState::new(snake, Some(Position::new(0, 0)), 2, 2, 150);

        let result = step(&mut state, &config, &mut rng());

        assert!(result.terminated);
        assert!(result.info.grid_filled);
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.food, None);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_spawn_food_avoids_snake() {
        let snake = Snake::new(Position::new(2, 0), Direction::Right, 3);
        let mut rng = rng();
        for _ in 0..200 {
            let food = spawn_food(&snake, 4, 1, &mut rng).unwrap();
            assert_eq!(food, Position::new(3, 0));
        }
    }

    #[test]
    fn test_spawn_food_is_uniform_over_free_cells() {
        // 4x2 grid, snake on (2,0),(1,0),(0,0): five free cells
        let snake = Snake::new(Position::new(2, 0), Direction::Right, 3);
        let mut rng = rng();
        let draws: u32 = 5_000;
        let mut counts = std::collections::HashMap::new();
        for _ in 0..draws {
            let food = spawn_food(&snake, 4, 2, &mut rng).unwrap();
            assert!(!snake.contains(food));
            *counts.entry(food).or_insert(0u32) += 1;
        }

        assert_eq!(counts.len(), 5);
        for (cell, count) in counts {
            let share = f64::from(count) / f64::from(draws);
            assert!((share - 0.2).abs() < 0.03, "{cell:?} drawn {share:.3} of the time");
        }
    }

    #[test]
    fn test_spawn_food_on_full_grid() {
        let snake = Snake::new(Position::new(3, 0), Direction::Right, 4);
        assert_eq!(spawn_food(&snake, 4, 1, &mut rng()), None);
    }

    #[test]
    fn test_spawn_food_is_reproducible() {
        let snake = Snake::new(Position::new(10, 7), Direction::Right, 3);
        let a: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10).map(|_| spawn_food(&snake, 20, 15, &mut rng)).collect()
        };
        let b: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10).map(|_| spawn_food(&snake, 20, 15, &mut rng)).collect()
        };
        assert_eq!(a, b);
    }
}
