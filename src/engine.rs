//! Engine state management.
//!
//! Holds the layout catalogue, the current game, engine options and the
//! evaluator, and answers protocol commands with line responses.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::accel::{AcceleratedSolver, NativeSolver};
use crate::board::{
    load_layouts, presets, random_layout, BoardLayout, HexState, LayoutError, MoveError, Position,
    Winner,
};
use crate::eval::{EvalConfig, EvalError, Evaluation, Evaluator};
use crate::protocol::format::{format_board, format_hints};
use crate::protocol::parser::GameSource;

/// Why a command could not be carried out.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no game in progress")]
    NoGame,

    #[error("unknown layout {0}")]
    UnknownLayout(usize),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub layouts: Vec<BoardLayout>,
    pub position: Option<Position>,
    pub options: HashMap<String, String>,
    evaluator: Evaluator,
    rng: SmallRng,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an engine with the built-in layouts and no game.
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Engine {
            layouts: presets(),
            position: None,
            options: HashMap::new(),
            evaluator: Evaluator::new(config),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Starts a new game, replacing any game in progress.
    pub fn new_game(&mut self, source: GameSource) -> Result<&Position, EngineError> {
        let layout = match source {
            GameSource::Layout(index) => self
                .layouts
                .get(index)
                .cloned()
                .ok_or(EngineError::UnknownLayout(index))?,
            GameSource::Random => random_layout(&mut self.rng),
        };
        info!(name = %layout.name, moves = layout.moves, cells = layout.playable_cells(), "new game");
        Ok(self.position.insert(Position::new(&layout)))
    }

    /// Appends the layouts in a JSON file. Returns how many were added.
    pub fn load(&mut self, path: &Path) -> Result<usize, EngineError> {
        let loaded = load_layouts(path)?;
        let added = loaded.len();
        self.layouts.extend(loaded);
        info!(path = %path.display(), added, "loaded layouts");
        Ok(added)
    }

    /// Plays the next number of the current game.
    pub fn play(&mut self, x: i32, y: i32) -> Result<&Position, EngineError> {
        let current = self.position.as_ref().ok_or(EngineError::NoGame)?;
        let next = current.play(x, y)?;
        Ok(self.position.insert(next))
    }

    /// Winner of the current game, `None` while it runs or with no game.
    pub fn winner(&self) -> Option<Winner> {
        self.position.as_ref().and_then(|p| p.check_winner())
    }

    /// Evaluates every move of the current position.
    pub fn hint(&mut self) -> Result<Evaluation, EngineError> {
        let position = self.position.as_ref().ok_or(EngineError::NoGame)?;
        Ok(self.evaluator.evaluate(position)?)
    }

    /// Sets an engine option and applies it to the evaluator.
    pub fn set_option(&mut self, name: String, value: Option<String>) {
        self.options.insert(name.clone(), value.unwrap_or_default());
        match name.as_str() {
            "SearchTime" => {
                let budget = self.search_time();
                self.evaluator.set_budget(budget);
            }
            "Seed" => {
                let seed = self.seed();
                self.evaluator.reseed(seed.unwrap_or_else(rand::random));
                self.rng = match seed {
                    Some(seed) => SmallRng::seed_from_u64(seed),
                    None => SmallRng::from_entropy(),
                };
            }
            "Accelerated" => {
                let solver: Option<Box<dyn AcceleratedSolver + Send>> = if self.accelerated() {
                    Some(Box::new(NativeSolver::new()))
                } else {
                    None
                };
                self.evaluator.set_accelerated(solver);
            }
            other => warn!(option = other, "unknown option"),
        }
    }

    /// Returns the configured search time, or the evaluator's default.
    fn search_time(&self) -> Duration {
        self.options
            .get("SearchTime")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(EvalConfig::default().budget)
    }

    /// Configured seed; 0 or unparsable means fresh entropy.
    fn seed(&self) -> Option<u64> {
        self.options
            .get("Seed")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&s| s != 0)
    }

    fn accelerated(&self) -> bool {
        self.options
            .get("Accelerated")
            .map(|v| v.is_empty() || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// Handles `layouts`: one `layout <i> <moves> <name>` line per entry.
    pub fn handle_layouts<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (i, layout) in self.layouts.iter().enumerate() {
            writeln!(out, "layout {} {} {}", i, layout.moves, layout.name)?;
        }
        out.flush()
    }

    /// Handles `newgame`.
    pub fn handle_newgame<W: Write>(&mut self, source: GameSource, out: &mut W) -> io::Result<()> {
        match self.new_game(source) {
            Ok(position) => writeln!(out, "ok {}", position.sum())?,
            Err(e) => writeln!(out, "illegal {e}")?,
        }
        out.flush()
    }

    /// Handles `load`, then lists the catalogue.
    pub fn handle_load<W: Write>(&mut self, path: &str, out: &mut W) -> io::Result<()> {
        match self.load(Path::new(path)) {
            Ok(_) => self.handle_layouts(out),
            Err(e) => {
                warn!(path, error = %e, "load failed");
                writeln!(out, "illegal {e}")?;
                out.flush()
            }
        }
    }

    /// Handles `play`.
    pub fn handle_play<W: Write>(&mut self, x: i32, y: i32, out: &mut W) -> io::Result<()> {
        match self.play(x, y) {
            Ok(position) => writeln!(out, "ok {}", position.sum())?,
            Err(e) => writeln!(out, "illegal {e}")?,
        }
        out.flush()
    }

    /// Handles `winner`.
    pub fn handle_winner<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let label = self.winner().map_or("none", Winner::label);
        writeln!(out, "winner {label}")?;
        out.flush()
    }

    /// Handles `show`.
    pub fn handle_show<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match &self.position {
            Some(position) => {
                for row in format_board(position.board()) {
                    writeln!(out, "board {row}")?;
                }
            }
            None => writeln!(out, "illegal {}", EngineError::NoGame)?,
        }
        out.flush()
    }

    /// Handles `hint`: `hint <row>` lines followed by `hintok`.
    pub fn handle_hint<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        match self.hint() {
            Ok(evaluation) => {
                if let Some(position) = &self.position {
                    for row in format_hints(position.board(), &evaluation) {
                        writeln!(out, "hint {row}")?;
                    }
                }
                writeln!(out, "hintok")?;
            }
            Err(e) => {
                warn!(error = %e, "hint failed");
                writeln!(out, "illegal {e}")?;
            }
        }
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }
}
