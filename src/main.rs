use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use tracing::{info, warn};

use wave_shooter::audio::TerminalBell;
use wave_shooter::config::GameConfig;
use wave_shooter::display::{self, Viewport};
use wave_shooter::input::{is_quit, KeyTracker};
use wave_shooter::scores;
use wave_shooter::session::Session;
use wave_shooter::sprites::SpriteSet;

#[derive(Parser, Debug)]
#[command(name = "wave_shooter", about = "Terminal arcade shooter against descending enemy waves")]
struct Args {
    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the menu and play under this name
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    fps: Option<u32>,

    #[arg(long)]
    lives: Option<u32>,

    /// Score file
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Directory searched for sprite images
    #[arg(long)]
    assets: Option<PathBuf>,

    /// RNG seed for reproducible waves
    #[arg(long)]
    seed: Option<u64>,

    /// Log output; the terminal itself is the game screen
    #[arg(long, default_value = "wave_shooter.log")]
    log_file: PathBuf,
}

impl Args {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        if let Some(v) = self.width {
            config.width = v;
        }
        if let Some(v) = self.height {
            config.height = v;
        }
        if let Some(v) = self.fps {
            config.fps = v;
        }
        if let Some(v) = self.lives {
            config.lives = v;
        }
        if let Some(v) = &self.scores {
            config.scores_path = v.clone();
        }
        if let Some(v) = &self.assets {
            config.assets_dir = v.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(String),
    Quit,
}

fn viewport() -> std::io::Result<Viewport> {
    let (cols, rows) = terminal::size()?;
    Ok(Viewport::new(cols, rows))
}

/// Block until the next key press.  `None` once the input thread is gone.
fn next_press(rx: &mpsc::Receiver<Event>) -> Option<KeyEvent> {
    loop {
        match rx.recv() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => return Some(key),
            Ok(_) => {}
            Err(_) => return None,
        }
    }
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> std::io::Result<MenuResult> {
    loop {
        display::render_menu(out, viewport()?)?;
        let Some(key) = next_press(rx) else {
            return Ok(MenuResult::Quit);
        };
        match key.code {
            KeyCode::Char('1') => {
                if let Some(name) = ask_name(out, rx, config)? {
                    return Ok(MenuResult::Start(name));
                }
            }
            KeyCode::Char('2') => show_scores(out, rx, config)?,
            _ if is_quit(&key) => return Ok(MenuResult::Quit),
            _ => {}
        }
    }
}

/// Name entry.  `None` when the player backs out.
fn ask_name<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> std::io::Result<Option<String>> {
    let mut name = String::new();
    let mut error: Option<String> = None;
    loop {
        display::render_name_prompt(out, viewport()?, &name, error.as_deref())?;
        let Some(key) = next_press(rx) else {
            return Ok(None);
        };
        match key.code {
            KeyCode::Esc => return Ok(None),
            KeyCode::Enter => match scores::validate_new_name(&config.scores_path, &name) {
                Ok(valid) => return Ok(Some(valid)),
                Err(e) => error = Some(e.to_string()),
            },
            KeyCode::Backspace => {
                name.pop();
            }
            KeyCode::Char(c) if !c.is_control() && name.chars().count() < 16 => {
                name.push(c);
                error = None;
            }
            _ => {}
        }
    }
}

fn show_scores<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> std::io::Result<()> {
    let entries = scores::load(&config.scores_path).unwrap_or_else(|e| {
        warn!("{e}");
        Vec::new()
    });
    loop {
        display::render_scores(out, viewport()?, &entries)?;
        match next_press(rx).map(|k| k.code) {
            None | Some(KeyCode::Esc) | Some(KeyCode::Backspace) => return Ok(()),
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Fixed-rate loop.  Returns `true` if the player asked to quit the program.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    sprites: &Arc<SpriteSet>,
    name: String,
) -> std::io::Result<bool> {
    let frame_time = Duration::from_secs_f64(1.0 / config.fps as f64);
    let bell = TerminalBell::new(stdout());
    let mut session = Session::new(config, Some(name), Arc::clone(sprites), bell);
    let mut keys = KeyTracker::new();
    let mut frame: u64 = 0;

    while session.is_running() {
        let frame_start = Instant::now();
        frame += 1;

        // Drain all pending input events (non-blocking)
        loop {
            match rx.try_recv() {
                Ok(Event::Key(key)) => keys.record(&key, frame),
                Ok(_) => {}
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return Ok(true),
            }
        }

        let input = keys.snapshot(frame);
        session.step(&input);
        if input.quit {
            return Ok(true);
        }

        display::render(out, session.state(), viewport()?)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }

    Ok(false)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new("warn")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;
    let config = args.game_config().context("invalid configuration")?;
    let name = match &args.name {
        Some(raw) => Some(scores::check_name_format(raw).context("invalid --name")?),
        None => None,
    };
    let sprites = Arc::new(SpriteSet::load(&config.assets_dir));
    info!(?config, "starting");

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Key-release events where the terminal supports them.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the frame loop never waits.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &config, &sprites, name);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("terminal I/O failed")
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    sprites: &Arc<SpriteSet>,
    name: Option<String>,
) -> std::io::Result<()> {
    if let Some(name) = name {
        game_loop(out, rx, config, sprites, name)?;
        return Ok(());
    }
    loop {
        match show_menu(out, rx, config)? {
            MenuResult::Quit => break,
            MenuResult::Start(name) => {
                if game_loop(out, rx, config, sprites, name)? {
                    break;
                }
            }
        }
    }
    Ok(())
}
