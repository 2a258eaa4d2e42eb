use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::{GameConfig, DEFAULT_PLAYER_NAME};
use crate::input::Command;
use crate::placement::{generate_food, generate_obstacles, generate_special_food, obstacle_count};
use crate::score_store::{HighScore, ScoreStore};
use crate::snake::{Crash, Direction, MoveResult, Position, Snake};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Playing,
    Paused,
    GameOver,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOverReason {
    Wall,
    SelfCollision,
    Obstacle,
    Quit,
}

impl From<Crash> for GameOverReason {
    fn from(crash: Crash) -> Self {
        match crash {
            Crash::Wall => GameOverReason::Wall,
            Crash::SelfCollision => GameOverReason::SelfCollision,
        }
    }
}

/// Bonus food that counts down while it sits on the board.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SpecialFood {
    pub position: Position,
    pub active: bool,
    pub timer: u32,
    pub max_timer: u32,
}

impl SpecialFood {
    pub fn activate(&mut self, position: Position, max_timer: u32) {
        self.position = position;
        self.active = max_timer > 0;
        self.timer = max_timer;
        self.max_timer = max_timer;
    }

    /// Counts one tick down. Returns true on the tick it expires.
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.timer = self.timer.saturating_sub(1);
        if self.timer == 0 {
            self.active = false;
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.active = false;
        self.timer = 0;
    }

    pub fn is_at(&self, pos: Position) -> bool {
        self.active && self.position == pos
    }
}

/// Read-only view handed to the renderer each frame.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub width: i32,
    pub height: i32,
    pub state: GameState,
    pub snake: &'a Snake,
    pub food: Position,
    pub special: SpecialFood,
    pub obstacles: &'a HashSet<Position>,
    pub score: u32,
    pub high_score: &'a HighScore,
    pub player_name: &'a str,
    pub special_eaten: u32,
    pub showing_high_scores: bool,
    pub game_over_reason: Option<GameOverReason>,
}

impl Snapshot<'_> {
    pub fn paused(&self) -> bool {
        self.state == GameState::Paused
    }
}

pub struct SnakeGame<S, R> {
    config: GameConfig,
    store: S,
    rng: R,
    player_name: String,
    state: GameState,
    snake: Snake,
    food: Position,
    special: SpecialFood,
    obstacles: HashSet<Position>,
    score: u32,
    special_eaten: u32,
    high_score: HighScore,
    high_score_dirty: bool,
    showing_high_scores: bool,
    game_over_reason: Option<GameOverReason>,
}

impl<S: ScoreStore, R: Rng> SnakeGame<S, R> {
    pub fn new(config: GameConfig, mut store: S, mut rng: R, player_name: &str) -> Self {
        let high_score = store.load();
        let snake = fresh_snake(&config);
        let obstacles = HashSet::new();
        let food = generate_food(&mut rng, &config, &snake, &obstacles);
        let player_name = player_name.trim();

        SnakeGame {
            config,
            store,
            rng,
            player_name: if player_name.is_empty() { DEFAULT_PLAYER_NAME } else { player_name }
                .to_string(),
            state: GameState::Menu,
            snake,
            food,
            special: SpecialFood::default(),
            obstacles,
            score: 0,
            special_eaten: 0,
            high_score,
            high_score_dirty: false,
            showing_high_scores: false,
            game_over_reason: None,
        }
    }

    /// Applies one decoded command according to the current state.
    pub fn handle(&mut self, cmd: Command) -> Flow {
        match self.state {
            GameState::Menu => {
                if cmd == Command::Quit {
                    self.flush_high_score();
                    return Flow::Exit;
                }
                if self.showing_high_scores {
                    self.showing_high_scores = false;
                    return Flow::Continue;
                }
                match cmd {
                    Command::Confirm => self.reset(),
                    Command::ShowHighScores => self.showing_high_scores = true,
                    _ => {}
                }
            }
            GameState::Playing => match cmd {
                Command::Move(dir) => self.snake.change_direction(dir),
                Command::TogglePause => self.state = GameState::Paused,
                Command::Restart => self.reset(),
                Command::Quit => self.end_game(GameOverReason::Quit),
                _ => {}
            },
            GameState::Paused => match cmd {
                Command::TogglePause => self.state = GameState::Playing,
                Command::Restart => self.reset(),
                Command::Quit => self.end_game(GameOverReason::Quit),
                _ => {}
            },
            GameState::GameOver => match cmd {
                Command::Restart | Command::Confirm => self.state = GameState::Menu,
                Command::Quit => {
                    self.flush_high_score();
                    return Flow::Exit;
                }
                _ => {}
            },
        }
        Flow::Continue
    }

    /// Advances the simulation by one step. Does nothing outside PLAYING.
    pub fn tick(&mut self) {
        if self.state != GameState::Playing {
            return;
        }

        let head = match self.snake.move_step() {
            MoveResult::Moved { new_head } => new_head,
            MoveResult::Crashed(crash) => {
                self.end_game(crash.into());
                return;
            }
        };
        if self.obstacles.contains(&head) {
            self.end_game(GameOverReason::Obstacle);
            return;
        }

        if head == self.food {
            self.snake.grow();
            self.score += self.config.food_points;
            self.raise_high_score();
            self.food = generate_food(&mut self.rng, &self.config, &self.snake, &self.obstacles);

            let every = self.config.special_food_every;
            if every > 0 && self.score % every == 0 {
                let spawned = generate_special_food(
                    &mut self.rng,
                    &self.config,
                    &self.snake,
                    &self.obstacles,
                    self.food,
                    &mut self.special,
                );
                if spawned {
                    debug!(x = self.special.position.x, y = self.special.position.y, "special food spawned");
                }
            }
        }

        if self.special.is_at(head) {
            self.snake.grow();
            self.snake.grow();
            self.score += self.config.special_food_bonus;
            self.special.clear();
            self.special_eaten += 1;
            self.raise_high_score();
            debug!(score = self.score, "special food eaten");
        }

        if self.special.tick() {
            debug!("special food expired");
        }
    }

    /// Starts a fresh game and enters PLAYING.
    pub fn reset(&mut self) {
        self.snake = fresh_snake(&self.config);
        self.score = 0;
        self.special_eaten = 0;
        self.special.clear();
        self.obstacles.clear();
        self.game_over_reason = None;
        self.showing_high_scores = false;
        self.food = generate_food(&mut self.rng, &self.config, &self.snake, &self.obstacles);

        let count = obstacle_count(&mut self.rng, &self.config);
        generate_obstacles(
            &mut self.rng,
            &self.config,
            count,
            &self.snake,
            self.food,
            &self.special,
            &mut self.obstacles,
        );

        self.state = GameState::Playing;
        info!(player = %self.player_name, obstacles = self.obstacles.len(), "game started");
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            width: self.config.width,
            height: self.config.height,
            state: self.state,
            snake: &self.snake,
            food: self.food,
            special: self.special,
            obstacles: &self.obstacles,
            score: self.score,
            high_score: &self.high_score,
            player_name: &self.player_name,
            special_eaten: self.special_eaten,
            showing_high_scores: self.showing_high_scores,
            game_over_reason: self.game_over_reason,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> &HighScore {
        &self.high_score
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn special_food(&self) -> &SpecialFood {
        &self.special
    }

    pub fn obstacles(&self) -> &HashSet<Position> {
        &self.obstacles
    }

    pub fn special_eaten(&self) -> u32 {
        self.special_eaten
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    // Layout overrides for setting up exact board positions.

    pub fn set_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }

    pub fn set_food(&mut self, food: Position) {
        self.food = food;
    }

    pub fn set_obstacles<I: IntoIterator<Item = Position>>(&mut self, obstacles: I) {
        self.obstacles = obstacles.into_iter().collect();
    }

    pub fn set_special_food(&mut self, position: Position) {
        self.special.activate(position, self.config.special_food_max_timer);
    }

    ///////////////////////////////////////////////////////////////////////////

    fn raise_high_score(&mut self) {
        if self.score > self.high_score.score {
            self.high_score = HighScore { name: self.player_name.clone(), score: self.score };
            self.high_score_dirty = true;
        }
    }

    fn end_game(&mut self, reason: GameOverReason) {
        self.state = GameState::GameOver;
        self.game_over_reason = Some(reason);
        self.special.clear();

        self.raise_high_score();
        let new_record = self.high_score_dirty;
        if self.high_score_dirty {
            self.flush_high_score();
        }
        if let Err(err) = self.store.append_log(&self.player_name, self.score) {
            warn!(error = %err, "could not append to score log");
        }

        info!(
            ?reason,
            score = self.score,
            length = self.snake.len(),
            new_record,
            "game over"
        );
    }

    fn flush_high_score(&mut self) {
        match self.store.save(&self.high_score) {
            Ok(()) => self.high_score_dirty = false,
            Err(err) => warn!(error = %err, "could not save high score"),
        }
    }
}

fn fresh_snake(config: &GameConfig) -> Snake {
    Snake::new(config.start_position(), Direction::Right, config.width, config.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score_store::MemoryScoreStore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    type TestGame = SnakeGame<MemoryScoreStore, ChaCha8Rng>;

    fn game_on(width: i32, height: i32) -> TestGame {
        let config = GameConfig { width, height, ..GameConfig::default() };
        SnakeGame::new(config, MemoryScoreStore::default(), ChaCha8Rng::seed_from_u64(7), "Ada")
    }

    /// A started game with no obstacles and food parked in a corner.
    fn playing(width: i32, height: i32) -> TestGame {
        let mut game = game_on(width, height);
        game.handle(Command::Confirm);
        game.set_obstacles([]);
        game.set_food(Position::new(0, height - 1));
        game
    }

    #[test]
    fn starts_in_menu_with_loaded_high_score() {
        let store = MemoryScoreStore {
            best: Some(HighScore { name: "Zed".into(), score: 90 }),
            ..MemoryScoreStore::default()
        };
        let game = SnakeGame::new(GameConfig::default(), store, ChaCha8Rng::seed_from_u64(1), "");
        assert_eq!(game.state(), GameState::Menu);
        assert_eq!(game.high_score().score, 90);
        assert_eq!(game.snapshot().player_name, "Anonymous");
    }

    #[test]
    fn menu_confirm_resets_everything() {
        let mut game = game_on(12, 8);
        assert_eq!(game.handle(Command::Confirm), Flow::Continue);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.snake().len(), 1);
        assert_eq!(game.snake().head(), Position::new(6, 4));
        assert!(!game.special_food().active);

        let obstacles = game.obstacles();
        assert!((5..=7).contains(&obstacles.len()));
        assert!(!obstacles.contains(&game.food()));
        assert!(!obstacles.contains(&game.snake().head()));
        assert!(!game.snake().is_on_position(game.food()));
    }

    #[test]
    fn high_score_screen_is_one_shot() {
        let mut game = game_on(12, 8);
        game.handle(Command::ShowHighScores);
        assert!(game.snapshot().showing_high_scores);
        game.handle(Command::Confirm);
        assert!(!game.snapshot().showing_high_scores);
        assert_eq!(game.state(), GameState::Menu);
        game.handle(Command::Confirm);
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn menu_quit_flushes_high_score_and_exits() {
        let mut game = game_on(12, 8);
        assert_eq!(game.handle(Command::Quit), Flow::Exit);
        assert_eq!(game.store().saves, 1);
    }

    #[test]
    fn pause_stops_the_simulation() {
        let mut game = playing(10, 10);
        game.handle(Command::TogglePause);
        assert_eq!(game.state(), GameState::Paused);
        assert!(game.snapshot().paused());

        let head = game.snake().head();
        game.tick();
        game.tick();
        assert_eq!(game.snake().head(), head);

        game.handle(Command::Move(Direction::Up));
        assert_eq!(game.snake().direction(), Direction::Right);

        game.handle(Command::TogglePause);
        assert_eq!(game.state(), GameState::Playing);
        game.tick();
        assert_eq!(game.snake().head(), Position::new(head.x + 1, head.y));
    }

    #[test]
    fn restart_from_play_or_pause_resets() {
        let mut game = playing(10, 10);
        game.set_food(Position::new(6, 5));
        game.tick();
        assert_eq!(game.score(), 10);

        game.handle(Command::TogglePause);
        game.handle(Command::Restart);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.snake().len(), 1);

        game.handle(Command::Restart);
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn reversal_input_is_ignored_while_playing() {
        let mut game = playing(10, 10);
        game.handle(Command::Move(Direction::Left));
        assert_eq!(game.snake().direction(), Direction::Right);
        game.handle(Command::Move(Direction::Down));
        assert_eq!(game.snake().direction(), Direction::Down);
    }

    #[test]
    fn obstacle_hit_ends_game() {
        let mut game = playing(10, 10);
        game.set_obstacles([Position::new(6, 5)]);
        game.tick();
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.game_over_reason(), Some(GameOverReason::Obstacle));
    }

    #[test]
    fn obstacle_wins_over_food_on_the_same_cell() {
        let mut game = playing(10, 10);
        game.set_obstacles([Position::new(6, 5)]);
        game.set_food(Position::new(6, 5));
        game.tick();
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.score(), 0);
        assert_eq!(game.snake().len(), 1);
    }

    #[test]
    fn wall_crash_records_score_and_log() {
        let mut game = playing(3, 3);
        game.set_food(Position::new(2, 1));
        game.tick();
        assert_eq!(game.score(), 10);
        game.tick();
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.game_over_reason(), Some(GameOverReason::Wall));
        assert_eq!(game.high_score(), &HighScore { name: "Ada".into(), score: 10 });
        assert_eq!(game.store().best, Some(HighScore { name: "Ada".into(), score: 10 }));
        assert_eq!(game.store().log, vec![("Ada".to_string(), 10)]);
    }

    #[test]
    fn lower_score_does_not_overwrite_record() {
        let store = MemoryScoreStore {
            best: Some(HighScore { name: "Zed".into(), score: 500 }),
            ..MemoryScoreStore::default()
        };
        let config = GameConfig { width: 3, height: 3, ..GameConfig::default() };
        let mut game = SnakeGame::new(config, store, ChaCha8Rng::seed_from_u64(3), "Ada");
        game.handle(Command::Confirm);
        game.set_obstacles([]);
        game.set_food(Position::new(0, 2));
        game.tick();
        game.tick();
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.store().saves, 0);
        assert_eq!(game.high_score().name, "Zed");
        assert_eq!(game.store().log, vec![("Ada".to_string(), 0)]);
    }

    #[test]
    fn persistence_failure_does_not_stop_play() {
        let store = MemoryScoreStore { fail_writes: true, ..MemoryScoreStore::default() };
        let config = GameConfig { width: 3, height: 3, ..GameConfig::default() };
        let mut game = SnakeGame::new(config, store, ChaCha8Rng::seed_from_u64(3), "Ada");
        game.handle(Command::Confirm);
        game.set_obstacles([]);
        game.set_food(Position::new(2, 1));
        game.tick();
        game.tick();
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.high_score().score, 10);
        assert_eq!(game.handle(Command::Confirm), Flow::Continue);
        assert_eq!(game.state(), GameState::Menu);
        assert_eq!(game.handle(Command::Quit), Flow::Exit);
    }

    #[test]
    fn quitting_a_game_goes_to_game_over_then_exits() {
        let mut game = playing(10, 10);
        game.handle(Command::Quit);
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.game_over_reason(), Some(GameOverReason::Quit));
        assert_eq!(game.store().log.len(), 1);
        assert_eq!(game.handle(Command::Quit), Flow::Exit);
    }

    #[test]
    fn game_over_confirm_returns_to_menu() {
        let mut game = playing(10, 10);
        game.handle(Command::Quit);
        game.handle(Command::Move(Direction::Up));
        assert_eq!(game.state(), GameState::GameOver);
        game.handle(Command::Restart);
        assert_eq!(game.state(), GameState::Menu);
    }

    #[test]
    fn thirty_points_spawns_special_food() {
        let mut game = playing(12, 3);
        for x in 7..10 {
            assert!(!game.special_food().active);
            game.set_food(Position::new(x, 1));
            game.tick();
        }
        assert_eq!(game.score(), 30);
        let special = *game.special_food();
        assert!(special.active);
        assert_eq!(special.timer, special.max_timer - 1);
        assert!(!game.snake().is_on_position(special.position));
        assert_ne!(special.position, game.food());
    }

    #[test]
    fn special_food_adds_bonus_and_two_segments() {
        let mut game = playing(10, 10);
        game.set_special_food(Position::new(6, 5));
        game.tick();
        assert_eq!(game.score(), 30);
        assert_eq!(game.snake().len(), 3);
        assert_eq!(game.special_eaten(), 1);
        assert!(!game.special_food().active);
        assert_eq!(game.high_score().score, 30);
    }

    #[test]
    fn food_and_special_food_on_one_cell_both_count() {
        let mut game = playing(10, 10);
        game.set_food(Position::new(6, 5));
        game.set_special_food(Position::new(6, 5));
        game.tick();
        assert_eq!(game.score(), 40);
        assert_eq!(game.snake().len(), 4);
    }

    #[test]
    fn special_food_expires_after_max_timer_ticks() {
        let config = GameConfig { width: 40, height: 3, special_food_max_timer: 5, ..GameConfig::default() };
        let mut game = SnakeGame::new(config, MemoryScoreStore::default(), ChaCha8Rng::seed_from_u64(9), "Ada");
        game.handle(Command::Confirm);
        game.set_obstacles([]);
        game.set_food(Position::new(0, 0));
        game.set_special_food(Position::new(0, 2));

        let mut active_ticks = 0;
        let mut expirations = 0;
        for _ in 0..8 {
            let was_active = game.special_food().active;
            game.tick();
            if was_active {
                active_ticks += 1;
                if !game.special_food().active {
                    expirations += 1;
                }
            }
        }
        assert_eq!(active_ticks, 5);
        assert_eq!(expirations, 1);
        assert_eq!(game.special_food().timer, 0);
    }

    #[test]
    fn fresh_game_has_no_special_food() {
        let game = game_on(12, 8);
        let special = *game.special_food();
        assert!(!special.active);
        assert_eq!(special, SpecialFood::default());
        assert_eq!(special.position, Position::new(0, 0));
    }

    #[test]
    fn special_timer_counts_down_and_clamps() {
        let mut special = SpecialFood::default();
        assert!(!special.tick());
        special.activate(Position::new(1, 1), 2);
        assert!(!special.tick());
        assert_eq!(special.timer, 1);
        assert!(special.tick());
        assert!(!special.active);
        assert!(!special.tick());
        assert_eq!(special.timer, 0);
    }

    #[test]
    fn score_never_decreases_during_a_game() {
        let mut game = playing(12, 8);
        game.set_obstacles([]);
        let mut last = 0;
        let turns = [Direction::Down, Direction::Left, Direction::Up, Direction::Right];
        for step in 0..60 {
            if game.state() != GameState::Playing {
                break;
            }
            if step % 3 == 0 {
                game.handle(Command::Move(turns[(step / 3) % 4]));
            }
            game.tick();
            assert!(game.score() >= last);
            last = game.score();
        }
    }
}
