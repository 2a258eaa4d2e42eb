use std::io::{self, Write};

use anyhow::{Context, Result};
use rand::Rng;
use tracing::{error, info};

use crate::clock::FramePacer;
use crate::game::{Flow, SnakeGame};
use crate::input::InputSource;
use crate::render::Renderer;
use crate::score_store::ScoreStore;

/// Runs frames until the game asks to exit. Each frame applies at most one
/// command, advances the game once and draws once.
pub fn run<S, R, I, W>(
    game: &mut SnakeGame<S, R>,
    input: &mut I,
    renderer: &mut Renderer,
    out: &mut W,
    pacer: &mut FramePacer,
) -> Result<()>
where
    S: ScoreStore,
    R: Rng,
    I: InputSource,
    W: Write,
{
    let mut frames: u64 = 0;

    loop {
        pacer.start_frame();

        if let Some(cmd) = input.poll().context("failed to read input")? {
            if game.handle(cmd) == Flow::Exit {
                break;
            }
        }

        game.tick();
        renderer.draw(out, &game.snapshot()).context("failed to draw frame")?;
        frames += 1;

        pacer.end_frame();
    }

    info!(frames, fps = pacer.fps(), "leaving game loop");
    Ok(())
}

/// Combines the loop outcome with the terminal restore. A failed restore is
/// logged; the loop's own error is the one returned.
pub fn finish(result: Result<()>, restored: io::Result<()>) -> Result<()> {
    match restored {
        Ok(()) => result,
        Err(err) if result.is_err() => {
            error!(error = %err, "failed to restore terminal");
            result
        }
        Err(err) => Err(err).context("failed to restore terminal"),
    }
}
