use std::collections::VecDeque;

use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Position::new(self.x + dx, self.y + dy)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Crash {
    Wall,
    SelfCollision,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Position },
    Crashed(Crash),
}

impl MoveResult {
    pub fn is_moved(&self) -> bool {
        matches!(self, Moved { .. })
    }
}

/// Body segments ordered head first. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    width: i32,
    height: i32,
}

impl Snake {
    pub fn new(start: Position, direction: Direction, width: i32, height: i32) -> Self {
        Snake { body: VecDeque::from([start]), direction, width, height }
    }

    /// Builds a snake from explicit segments, head first. Falls back to a
    /// single segment at the origin when `segments` is empty.
    pub fn from_segments<I>(segments: I, direction: Direction, width: i32, height: i32) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        let mut body: VecDeque<Position> = segments.into_iter().collect();
        if body.is_empty() {
            body.push_back(Position::new(0, 0));
        }
        Snake { body, direction, width, height }
    }

    pub fn change_direction(&mut self, new_direction: Direction) {
        if new_direction != self.direction.opposite() {
            self.direction = new_direction;
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn move_step(&mut self) -> MoveResult {
        let new_head = self.head().step(self.direction);

        if !self.in_bounds(new_head) {
            return Crashed(Crash::Wall);
        }
        if self.body.iter().skip(1).any(|segment| *segment == new_head) {
            return Crashed(Crash::SelfCollision);
        }

        self.body.push_front(new_head);
        self.body.pop_back();
        Moved { new_head }
    }

    /// Duplicates the tail; the copy survives the next move, so the body is
    /// one segment longer from now on.
    pub fn grow(&mut self) {
        let tail = self.tail();
        self.body.push_back(tail);
    }

    pub fn is_on_position(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }

    fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }
}
