use crate::snake::Position;

pub const BOARD_WIDTH: i32 = 12;
pub const BOARD_HEIGHT: i32 = 8;
pub const TICKS_PER_SECOND: u32 = 5;

pub const FOOD_POINTS: u32 = 10;
pub const SPECIAL_FOOD_BONUS: u32 = 30;
pub const SPECIAL_FOOD_EVERY: u32 = 30;
pub const SPECIAL_FOOD_MAX_TIMER: u32 = 50;

pub const MIN_OBSTACLES: usize = 5;
pub const MAX_OBSTACLES: usize = 7;
pub const OBSTACLE_ATTEMPTS_PER_CELL: usize = 10;

pub const HIGH_SCORE_FILE: &str = "highscore.txt";
pub const SCORE_LOG_FILE: &str = "scores.log";
pub const DIAGNOSTICS_LOG_FILE: &str = "snake.log";

pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";

/// Rules of a single game. `Default` gives the fixed values the binary plays
/// with; smaller boards are only built by tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub food_points: u32,
    pub special_food_bonus: u32,
    pub special_food_every: u32,
    pub special_food_max_timer: u32,
    pub min_obstacles: usize,
    pub max_obstacles: usize,
}

impl GameConfig {
    pub fn start_position(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    pub fn area(&self) -> usize {
        (self.width.max(0) * self.height.max(0)) as usize
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            food_points: FOOD_POINTS,
            special_food_bonus: SPECIAL_FOOD_BONUS,
            special_food_every: SPECIAL_FOOD_EVERY,
            special_food_max_timer: SPECIAL_FOOD_MAX_TIMER,
            min_obstacles: MIN_OBSTACLES,
            max_obstacles: MAX_OBSTACLES,
        }
    }
}
