use std::io::{self, Write};

use crossterm::{cursor, queue, style, terminal};

use crate::game::{GameOverReason, GameState, Snapshot};
use crate::snake::Position;

const SNAKE_BODY_CHAR: char = '█';
const DEAD_SNAKE_CHAR: char = 'X';
const APPLE_CHAR: char = 'O';
const SPECIAL_FOOD_CHAR: char = '*';
const OBSTACLE_CHAR: char = '#';
const TIMER_BAR_WIDTH: u32 = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Screen {
    Menu,
    HighScores,
    Board,
    GameOver,
}

/// Draws snapshots to a terminal. Each instance remembers what it drew last
/// so it can overwrite in place instead of clearing every frame.
pub struct Renderer {
    first_frame: bool,
    last_screen: Option<Screen>,
    last_widths: Vec<usize>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer { first_frame: true, last_screen: None, last_widths: vec![] }
    }

    pub fn draw<W: Write>(&mut self, out: &mut W, snap: &Snapshot) -> io::Result<()> {
        let screen = screen_of(snap);
        if self.first_frame || self.last_screen != Some(screen) {
            queue!(out, terminal::Clear(terminal::ClearType::All))?;
            self.last_widths.clear();
            self.first_frame = false;
        }
        self.last_screen = Some(screen);

        let lines = compose(snap);
        let mut widths = Vec::with_capacity(lines.len());

        for (y, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            let stale = self.last_widths.get(y).copied().unwrap_or(0);
            queue!(out, cursor::MoveTo(0, y as u16), style::Print(line))?;
            if stale > width {
                queue!(out, style::Print(" ".repeat(stale - width)))?;
            }
            widths.push(width);
        }

        // Blank out rows left over from a taller previous frame.
        for (y, stale) in self.last_widths.iter().enumerate().skip(lines.len()) {
            queue!(out, cursor::MoveTo(0, y as u16), style::Print(" ".repeat(*stale)))?;
        }

        self.last_widths = widths;
        out.flush()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new()
    }
}

/// Text of one frame, top to bottom.
pub fn compose(snap: &Snapshot) -> Vec<String> {
    match screen_of(snap) {
        Screen::Menu => vec![
            "=== SNAKE ===".to_string(),
            String::new(),
            "1. Start game".to_string(),
            "2. High score".to_string(),
            "3. Quit".to_string(),
            String::new(),
            format!("Player: {}", snap.player_name),
        ],
        Screen::HighScores => vec![
            "=== HIGH SCORE ===".to_string(),
            String::new(),
            format!("{}: {}", snap.high_score.name, snap.high_score.score),
            String::new(),
            "Press any key to return".to_string(),
        ],
        Screen::Board => compose_board(snap),
        Screen::GameOver => compose_game_over(snap),
    }
}

fn screen_of(snap: &Snapshot) -> Screen {
    match snap.state {
        GameState::Menu if snap.showing_high_scores => Screen::HighScores,
        GameState::Menu => Screen::Menu,
        GameState::Playing | GameState::Paused => Screen::Board,
        GameState::GameOver => Screen::GameOver,
    }
}

fn compose_board(snap: &Snapshot) -> Vec<String> {
    let mut lines = vec![format!(
        "SNAKE | High: {} ({})",
        snap.high_score.score, snap.high_score.name
    )];
    lines.extend(board_rows(snap, false));
    lines.push(format!(
        "Score: {} | Length: {} | Specials: {}",
        snap.score,
        snap.snake.len(),
        snap.special_eaten
    ));

    if snap.special.active {
        lines.push(format!("Special food! {}", timer_bar(snap.special.timer, snap.special.max_timer)));
    } else {
        lines.push(String::new());
    }

    lines.push("WASD/Arrows move | P pause | R restart | Q quit".to_string());
    lines.push(if snap.paused() {
        "PAUSED - press P to continue".to_string()
    } else {
        String::new()
    });
    lines
}

fn compose_game_over(snap: &Snapshot) -> Vec<String> {
    let cause = match snap.game_over_reason {
        Some(GameOverReason::Wall) => "You hit the wall.",
        Some(GameOverReason::SelfCollision) => "You bit yourself.",
        Some(GameOverReason::Obstacle) => "You hit an obstacle.",
        Some(GameOverReason::Quit) | None => "Game ended.",
    };

    let mut lines = vec!["GAME OVER!".to_string()];
    lines.extend(board_rows(snap, true));
    lines.push(cause.to_string());
    lines.push(format!(
        "Final score: {} | High score: {} ({})",
        snap.score, snap.high_score.score, snap.high_score.name
    ));
    lines.push("SPACE or R for menu | Q to quit".to_string());
    lines
}

fn board_rows(snap: &Snapshot, dead: bool) -> Vec<String> {
    let border = format!("+{}+", "-".repeat(snap.width.max(0) as usize));
    let mut rows = Vec::with_capacity(snap.height.max(0) as usize + 2);
    rows.push(border.clone());

    for y in 0..snap.height {
        let mut row = String::from("|");
        for x in 0..snap.width {
            row.push(cell_char(snap, Position::new(x, y), dead));
        }
        row.push('|');
        rows.push(row);
    }

    rows.push(border);
    rows
}

fn cell_char(snap: &Snapshot, pos: Position, dead: bool) -> char {
    if snap.snake.is_on_position(pos) {
        if dead {
            DEAD_SNAKE_CHAR
        } else if snap.snake.head() == pos {
            snap.snake.head_char()
        } else {
            SNAKE_BODY_CHAR
        }
    } else if snap.special.is_at(pos) {
        SPECIAL_FOOD_CHAR
    } else if snap.food == pos {
        APPLE_CHAR
    } else if snap.obstacles.contains(&pos) {
        OBSTACLE_CHAR
    } else {
        ' '
    }
}

fn timer_bar(timer: u32, max_timer: u32) -> String {
    let filled = if max_timer == 0 { 0 } else { (timer * TIMER_BAR_WIDTH).div_ceil(max_timer) };
    let filled = filled.min(TIMER_BAR_WIDTH) as usize;
    format!(
        "[{}{}] {}",
        "=".repeat(filled),
        " ".repeat(TIMER_BAR_WIDTH as usize - filled),
        timer
    )
}
