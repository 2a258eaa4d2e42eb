//! Random placement of food, special food and obstacles.
//!
//! Every generator is rejection sampling with an attempt cap. The random
//! source is a parameter so tests can drive it with a seeded generator.

use std::collections::HashSet;

use rand::Rng;

use crate::config::{GameConfig, OBSTACLE_ATTEMPTS_PER_CELL};
use crate::game::SpecialFood;
use crate::snake::{Position, Snake};

/// Cell used when the board has no free cell left at all.
pub const SATURATED_FALLBACK: Position = Position::new(0, 0);

pub fn generate_food<R: Rng + ?Sized>(
    rng: &mut R,
    config: &GameConfig,
    snake: &Snake,
    obstacles: &HashSet<Position>,
) -> Position {
    let blocked = |pos: Position| snake.is_on_position(pos) || obstacles.contains(&pos);

    sample_free(rng, config, config.area(), &blocked)
        .or_else(|| first_free(config, &blocked))
        .unwrap_or(SATURATED_FALLBACK)
}

/// Activates `special` on a free cell if it is not already active. Returns
/// whether a new special food was placed.
pub fn generate_special_food<R: Rng + ?Sized>(
    rng: &mut R,
    config: &GameConfig,
    snake: &Snake,
    obstacles: &HashSet<Position>,
    food: Position,
    special: &mut SpecialFood,
) -> bool {
    if special.active {
        return false;
    }

    let blocked =
        |pos: Position| pos == food || snake.is_on_position(pos) || obstacles.contains(&pos);

    match sample_free(rng, config, config.area(), &blocked).or_else(|| first_free(config, &blocked)) {
        Some(pos) => {
            special.activate(pos, config.special_food_max_timer);
            true
        }
        None => false,
    }
}

/// Replaces `obstacles` with up to `count` fresh cells. Fewer are placed if
/// the attempts run out.
pub fn generate_obstacles<R: Rng + ?Sized>(
    rng: &mut R,
    config: &GameConfig,
    count: usize,
    snake: &Snake,
    food: Position,
    special: &SpecialFood,
    obstacles: &mut HashSet<Position>,
) {
    obstacles.clear();

    let mut attempts = count * OBSTACLE_ATTEMPTS_PER_CELL;
    while obstacles.len() < count && attempts > 0 {
        attempts -= 1;
        let pos = random_cell(rng, config);
        let taken = pos == food
            || (special.active && pos == special.position)
            || snake.is_on_position(pos)
            || obstacles.contains(&pos);
        if !taken {
            obstacles.insert(pos);
        }
    }
}

pub fn obstacle_count<R: Rng + ?Sized>(rng: &mut R, config: &GameConfig) -> usize {
    if config.max_obstacles <= config.min_obstacles {
        return config.min_obstacles;
    }
    rng.gen_range(config.min_obstacles..=config.max_obstacles)
}

fn random_cell<R: Rng + ?Sized>(rng: &mut R, config: &GameConfig) -> Position {
    Position::new(rng.gen_range(0..config.width), rng.gen_range(0..config.height))
}

fn sample_free<R, F>(rng: &mut R, config: &GameConfig, attempts: usize, blocked: &F) -> Option<Position>
where
    R: Rng + ?Sized,
    F: Fn(Position) -> bool,
{
    if config.area() == 0 {
        return None;
    }
    (0..attempts).map(|_| random_cell(rng, config)).find(|pos| !blocked(*pos))
}

fn first_free<F: Fn(Position) -> bool>(config: &GameConfig, blocked: &F) -> Option<Position> {
    (0..config.height)
        .flat_map(|y| (0..config.width).map(move |x| Position::new(x, y)))
        .find(|pos| !blocked(*pos))
}
