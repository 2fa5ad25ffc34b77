//! hexsum -- a solver and hint engine for the hexagonal sum game.
//!
//! This binary reads commands from stdin and writes responses to stdout,
//! one command per line. Logs go to stderr, filtered by `RUST_LOG`.

use std::io::{self, BufRead};

use tracing::error;
use tracing_subscriber::EnvFilter;

use hexsum::engine::Engine;
use hexsum::protocol::parser::{parse_command, Command};

/// Runs the main protocol loop, reading commands from stdin
/// and writing responses to stdout.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        let written = match cmd {
            Command::Layouts => engine.handle_layouts(&mut out),
            Command::NewGame(source) => engine.handle_newgame(source, &mut out),
            Command::Load { path } => engine.handle_load(&path, &mut out),
            Command::Play { x, y } => engine.handle_play(x, y, &mut out),
            Command::Winner => engine.handle_winner(&mut out),
            Command::Show => engine.handle_show(&mut out),
            Command::Hint => engine.handle_hint(&mut out),
            Command::SetOption { name, value } => {
                engine.set_option(name, value);
                Ok(())
            }
            Command::IsReady => engine.handle_isready(&mut out),
            Command::Quit => break,
        };

        if let Err(e) = written {
            error!(error = %e, "failed to write response");
            break;
        }
    }
}
