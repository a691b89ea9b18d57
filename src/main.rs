//! Hex match terminal runner (default binary).
//!
//! `hexmatch` plays interactively in the terminal using crossterm input and
//! the framebuffer renderer. `hexmatch autoplay` plays hinted moves headlessly
//! and prints one JSON line per cascade.

use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, info};

use hexmatch::autoplay::autoplay;
use hexmatch::cli::{load_config, log_path_from_env, parse_args, Command, RunOptions};
use hexmatch::core::{BoardSnapshot, CascadeLog, Engine, EngineConfig};
use hexmatch::input::{handle_key_event, should_quit, CursorOutcome, HexCursor};
use hexmatch::term::{BoardView, FrameBuffer, TerminalRenderer, ViewMarks, Viewport};
use hexmatch::types::{Coord, GameAction, AUTO_HINT_DELAY_MS, TICK_MS};

/// Time the board stays input-blocked per cascade pass, standing in for the
/// presentation replaying the log.
const REPLAY_MS_PER_PASS: u32 = 150;

fn main() -> Result<()> {
    init_logging()?;
    let args: Vec<String> = env::args().skip(1).collect();
    match parse_args(&args)? {
        Command::Autoplay { options, moves } => run_autoplay(&options, moves),
        Command::Play(options) => run_interactive(&options),
    }
}

fn init_logging() -> Result<()> {
    let Some(path) = log_path_from_env() else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    info!(path = %path, "logging enabled");
    Ok(())
}

fn run_autoplay(options: &RunOptions, moves: u32) -> Result<()> {
    let config = load_config(options)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    autoplay(config, moves, |record| {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
        Ok(())
    })?;
    out.flush()?;
    Ok(())
}

fn run_interactive(options: &RunOptions) -> Result<()> {
    let config = load_config(options)?;
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = play(&mut term, config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Interactive session state around the engine.
struct App {
    engine: Engine,
    cursor: HexCursor,
    hint: Vec<Coord>,
    status: String,
    idle_ms: u32,
    /// Remaining replay time while input is blocked.
    replay_ms: u32,
}

impl App {
    fn new(config: EngineConfig) -> Result<Self> {
        let mut engine = Engine::new(config)?;
        engine.start();
        let cursor = HexCursor::new(engine.topology());
        Ok(Self {
            engine,
            cursor,
            hint: Vec::new(),
            status: String::from("select two adjacent tiles"),
            idle_ms: 0,
            replay_ms: 0,
        })
    }

    fn restart(&mut self) -> Result<()> {
        let seed = self.engine.config().seed.wrapping_add(1);
        let config = self.engine.config().clone().with_seed(seed);
        *self = Self::new(config)?;
        self.status = format!("new board (seed {seed})");
        Ok(())
    }

    fn handle(&mut self, action: GameAction) -> Result<()> {
        self.idle_ms = 0;
        if action != GameAction::Hint {
            self.hint.clear();
        }
        match action {
            GameAction::Hint => self.show_hint(),
            GameAction::Reshuffle => match self.engine.force_reshuffle() {
                Ok(log) => self.play_back(&log, "reshuffled"),
                Err(reason) => self.status = reason.to_string(),
            },
            GameAction::Restart => self.restart()?,
            _ => {
                let outcome = self.cursor.apply(self.engine.topology(), action);
                if let CursorOutcome::Swap(a, b) = outcome {
                    self.swap(a, b);
                }
            }
        }
        Ok(())
    }

    fn swap(&mut self, a: Coord, b: Coord) {
        match self.engine.apply_swap(a, b) {
            Ok(log) => self.play_back(&log, "swap"),
            Err(reason) => {
                debug!(%a, %b, ?reason, "swap rejected");
                self.status = reason.to_string();
            }
        }
    }

    fn show_hint(&mut self) {
        match self.engine.hint() {
            Some(hint) => {
                self.hint = hint.tiles.iter().copied().collect();
                for end in [hint.a, hint.b] {
                    if !self.hint.contains(&end) {
                        self.hint.push(end);
                    }
                }
                self.status = format!("try {} <-> {}", hint.a, hint.b);
            }
            None => self.status = String::from("no move available"),
        }
    }

    /// Block input for the time a replay of `log` would take.
    fn play_back(&mut self, log: &CascadeLog, what: &str) {
        let mut status = format!("{what}: {} tiles", log.tiles_removed);
        if log.obstacles_broken > 0 {
            status.push_str(&format!(", {} hearts", log.obstacles_broken));
        }
        if log.bombs_promoted > 0 {
            status.push_str(&format!(", {} bombs", log.bombs_promoted));
        }
        if log.reshuffles > 0 {
            status.push_str(", reshuffled");
        }
        self.status = status;

        if log.passes > 0 {
            if self.replay_ms == 0 {
                self.engine.block_input(true);
            }
            self.replay_ms = self.replay_ms.max(log.passes * REPLAY_MS_PER_PASS);
        }
    }

    fn tick(&mut self, dt_ms: u32) {
        if self.replay_ms > 0 {
            self.replay_ms = self.replay_ms.saturating_sub(dt_ms);
            if self.replay_ms == 0 {
                self.engine.block_input(false);
            }
            return;
        }
        self.idle_ms = self.idle_ms.saturating_add(dt_ms);
        if self.idle_ms >= AUTO_HINT_DELAY_MS && self.hint.is_empty() {
            self.show_hint();
        }
    }

    fn marks(&self) -> ViewMarks<'_> {
        ViewMarks {
            cursor: Some(self.cursor.coord()),
            selected: self.cursor.selected(),
            hint: &self.hint,
            status: &self.status,
        }
    }
}

fn play(term: &mut TerminalRenderer, config: EngineConfig) -> Result<()> {
    let mut app = App::new(config)?;
    let view = BoardView::default();
    let mut snap = BoardSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        app.engine.snapshot_into(&mut snap);
        view.render_into(&snap, &app.marks(), Viewport::new(w, h), &mut fb);
        term.draw(&fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        app.handle(action)?;
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            app.tick(TICK_MS);
        }
    }
}
