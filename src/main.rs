use std::fs::File;
use std::process::exit;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use snake::app;
use snake::clock::FramePacer;
use snake::config::{GameConfig, DIAGNOSTICS_LOG_FILE, HIGH_SCORE_FILE, SCORE_LOG_FILE, TICKS_PER_SECOND};
use snake::game::SnakeGame;
use snake::render::Renderer;
use snake::score_store::FileScoreStore;
use snake::term::{prompt_player_name, TermSession, TerminalInput};

fn main() {
    init_logging();

    if let Err(err) = run() {
        tracing::error!(error = %format!("{err:#}"), "fatal");
        eprintln!("Error: {err:#}");
        exit(1);
    }
}

fn run() -> Result<()> {
    let player = prompt_player_name().context("failed to read player name")?;
    let store = FileScoreStore::new(HIGH_SCORE_FILE, SCORE_LOG_FILE);
    let mut game = SnakeGame::new(GameConfig::default(), store, rand::thread_rng(), &player);

    let mut session = TermSession::setup().context("failed to set up terminal")?;
    let result = app::run(
        &mut game,
        &mut TerminalInput,
        &mut Renderer::new(),
        session.stdout(),
        &mut FramePacer::new(TICKS_PER_SECOND),
    );
    let restored = session.restore();
    app::finish(result, restored)
}

// stdout belongs to the renderer, so diagnostics go to a file. Without one,
// logging stays off.
fn init_logging() {
    let Ok(file) = File::create(DIAGNOSTICS_LOG_FILE) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}
