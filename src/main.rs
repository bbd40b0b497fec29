mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        ModifierKeyCode, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use display::{GlyphAssets, TerminalSurface};
use pixel_expedition::compute::{init_state, key_down, key_up, tick, GameMode, GameState};
use pixel_expedition::config::{ConfigError, GameConfig, LogConfig};
use pixel_expedition::entities::Bounds;
use pixel_expedition::input::Key;
use pixel_expedition::render::render;

/// A key counts as held if its last press/repeat arrived within this window.
/// Only used on terminals that never send release events; the OS key-repeat
/// rate keeps a physically held key refreshed well inside it.
const HOLD_WINDOW: Duration = Duration::from_millis(150);

#[derive(Parser, Debug)]
#[command(name = "pixel_expedition")]
#[command(version, about = "Arcade shoot-'em-up with reaction challenges, in your terminal")]
struct Cli {
    /// TOML config file; defaults apply when absent
    #[arg(short, long, default_value = "pixel_expedition.toml")]
    config: PathBuf,

    /// Seed the RNG for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Draw everything procedurally, ignoring glyph sprites
    #[arg(long)]
    no_sprites: bool,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("logger already initialised: {0}")]
    Logger(#[from] log::SetLoggerError),
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Logs go to a file: stdout belongs to the game screen.
fn init_logging(config: &LogConfig) -> Result<(), AppError> {
    let file = File::create(&config.file).map_err(|source| AppError::LogFile {
        path: config.file.clone(),
        source,
    })?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.level))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

// ── Input translation ─────────────────────────────────────────────────────────

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') => Key::W,
        KeyCode::Char('a') | KeyCode::Char('A') => Key::A,
        KeyCode::Char('s') | KeyCode::Char('S') => Key::S,
        KeyCode::Char('d') | KeyCode::Char('D') => Key::D,
        KeyCode::Up => Key::ArrowUp,
        KeyCode::Down => Key::ArrowDown,
        KeyCode::Left => Key::ArrowLeft,
        KeyCode::Right => Key::ArrowRight,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char('b') | KeyCode::Char('B') => Key::Shift,
        // Bare Shift is only reported by keyboard-enhanced terminals.
        KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift) => Key::Shift,
        KeyCode::Esc => Key::Escape,
        _ => Key::Other,
    }
}

fn viewport(config: &GameConfig) -> std::io::Result<(u16, u16, Bounds)> {
    let (cols, rows) = terminal::size()?;
    let bounds = Bounds::new(
        cols as f32 * config.display.cell_width,
        rows as f32 * config.display.cell_height,
    );
    Ok((cols, rows, bounds))
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits (Ctrl+C anywhere, Q on the menu or game-over
/// screen).
///
/// Input model: `held` records when each key was last seen.  Every press or
/// repeat is forwarded as a key-down, mirroring OS auto-repeat.  Keyboard-
/// enhanced terminals send proper releases; on classic terminals a key is
/// released once it has been silent for `HOLD_WINDOW`.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    config: &GameConfig,
    assets: &GlyphAssets,
    rx: &mpsc::Receiver<Event>,
    keyboard_enhanced: bool,
    rng: &mut StdRng,
) -> std::io::Result<()> {
    let frame = Duration::from_millis(config.display.frame_ms.max(1));
    let (cols, rows, _) = viewport(config)?;
    let mut surface = TerminalSurface::new(
        cols,
        rows,
        config.display.cell_width,
        config.display.cell_height,
    );
    let mut held: HashMap<Key, Instant> = HashMap::new();
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else { continue };

            if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(());
            }
            let idle = matches!(state.mode, GameMode::Menu | GameMode::GameOver);
            if idle && kind == KeyEventKind::Press && matches!(code, KeyCode::Char('q' | 'Q')) {
                return Ok(());
            }

            let key = map_key(code);
            match kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    held.insert(key, frame_start);
                    key_down(state, key, rng);
                }
                KeyEventKind::Release => {
                    held.remove(&key);
                    key_up(state, key);
                }
            }
        }

        if !keyboard_enhanced {
            let expired: Vec<Key> = held
                .iter()
                .filter(|(_, seen)| frame_start.duration_since(**seen) > HOLD_WINDOW)
                .map(|(key, _)| *key)
                .collect();
            for key in expired {
                held.remove(&key);
                key_up(state, key);
            }
        }

        // ── Simulate & draw ───────────────────────────────────────────────────
        let (cols, rows, bounds) = viewport(config)?;
        let dt_ms = last.elapsed().as_secs_f32() * 1000.0;
        last = Instant::now();
        tick(state, dt_ms, bounds, rng);

        surface.begin_frame(cols, rows);
        render(state, &mut surface, assets);
        surface.flush(out)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    if let Err(err) = try_main() {
        eprintln!("pixel_expedition: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = GameConfig::load_or_default(Some(cli.config.as_path()))?;
    init_logging(&config.log)?;
    info!("starting with config {}", cli.config.display());

    let mut rng = match cli.seed {
        Some(seed) => {
            info!("rng seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let assets = GlyphAssets::new(&config.assets, !cli.no_sprites);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request release events (and bare modifier keys) from the terminal.
    // Kitty-protocol terminals support this; others fall back to HOLD_WINDOW.
    let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES,
            ))
            .is_ok();
    if !keyboard_enhanced {
        warn!("terminal lacks key release events; emulating held keys");
    }

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = viewport(&config).and_then(|(_, _, bounds)| {
        let mut state = init_state(bounds, config.gameplay.clone());
        game_loop(&mut out, &mut state, &config, &assets, &rx, keyboard_enhanced, &mut rng)
    });

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("shutting down");
    result.map_err(AppError::from)
}
