use std::io::{self, BufRead, Stdout, Write};
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, terminal};
use tracing::error;

use crate::config::DEFAULT_PLAYER_NAME;
use crate::input::{decode_key, Command, InputSource};

/// Raw mode plus alternate screen for the lifetime of the value. Dropping it
/// puts the terminal back.
pub struct TermSession {
    stdout: Stdout,
    active: bool,
}

impl TermSession {
    pub fn setup() -> io::Result<Self> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(stdout, cursor::Hide, cursor::DisableBlinking)?;
        Ok(TermSession { stdout, active: true })
    }

    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    pub fn stdout(&mut self) -> &mut Stdout {
        &mut self.stdout
    }
}

impl Drop for TermSession {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            error!(error = %err, "failed to restore terminal");
        }
    }
}

/// Keyboard input from the real terminal. Never waits for a key.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn poll(&mut self) -> io::Result<Option<Command>> {
        if !event::poll(Duration::ZERO)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(ev) => Ok(decode_key(&ev)),
            _ => Ok(None),
        }
    }
}

/// Asks for the player's name on the cooked terminal, before raw mode.
pub fn prompt_player_name() -> io::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "Enter your name (blank for {DEFAULT_PLAYER_NAME}): ")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let name = line.trim();
    Ok(if name.is_empty() { DEFAULT_PLAYER_NAME.to_string() } else { name.to_string() })
}
