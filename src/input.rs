use std::collections::VecDeque;
use std::io;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::snake::Direction;

/// Logical commands the game understands. Raw key codes never get past
/// `decode_key`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    TogglePause,
    Restart,
    Confirm,
    ShowHighScores,
    Quit,
}

/// Non-blocking source of decoded commands.
pub trait InputSource {
    /// Returns immediately with at most one command. Pending keys beyond the
    /// first stay queued for later polls.
    fn poll(&mut self) -> io::Result<Option<Command>>;
}

pub fn decode_key(ev: &KeyEvent) -> Option<Command> {
    if ev.kind == KeyEventKind::Release {
        return None;
    }
    if is_ctrl_c(ev) {
        return Some(Command::Quit);
    }

    let cmd = match ev.code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => Command::Move(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S') => Command::Move(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A') => Command::Move(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D') => Command::Move(Direction::Right),
        KeyCode::Char('p' | 'P') => Command::TogglePause,
        KeyCode::Char('r' | 'R') => Command::Restart,
        KeyCode::Enter | KeyCode::Char(' ' | '1') => Command::Confirm,
        KeyCode::Char('2') => Command::ShowHighScores,
        KeyCode::Esc | KeyCode::Char('q' | 'Q' | '3') => Command::Quit,
        _ => return None,
    };
    Some(cmd)
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

/// Replays a fixed feed, one entry per poll. `None` entries are idle ticks.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    feed: VecDeque<Option<Command>>,
}

impl ScriptedInput {
    pub fn new<I: IntoIterator<Item = Option<Command>>>(feed: I) -> Self {
        ScriptedInput { feed: feed.into_iter().collect() }
    }

    pub fn remaining(&self) -> usize {
        self.feed.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> io::Result<Option<Command>> {
        match self.feed.pop_front() {
            Some(entry) => Ok(entry),
            None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "scripted input exhausted")),
        }
    }
}
