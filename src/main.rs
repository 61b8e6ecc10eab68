use anyhow::{Context, Result};
use clap::Parser;
use coinworks::{Effect, FRAME_STEP, FireworksShow, Mixer, ShowConfig};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Terminal fireworks show with copper-coin bursts.
///
/// Click anywhere to launch a rocket. Press 'q', ESC, or Ctrl+C to exit.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// YAML show configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for launch positions, particle velocities and clip choice
    #[arg(long)]
    seed: Option<u64>,

    /// Background color as hex (e.g. 1a1b26)
    #[arg(long, value_parser = parse_hex_color)]
    bg_color: Option<(u8, u8, u8)>,

    /// Skip the start control
    #[arg(long)]
    autostart: bool,

    /// Write logs to this file (level from RUST_LOG, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_hex_color(hex: &str) -> Result<(u8, u8, u8), String> {
    let digits = hex.trim_start_matches('#');
    let invalid = || format!("invalid hex color '{hex}', expected RRGGBB (e.g. 1a1b26)");
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).map_err(|_| invalid());
    Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

#[cfg(feature = "rodio")]
fn mixer() -> impl Mixer {
    coinworks::audio::RodioMixer::new()
}

#[cfg(not(feature = "rodio"))]
fn mixer() -> impl Mixer {
    coinworks::SilentMixer
}

/// Undoes the terminal setup. Raw mode is always released, even when
/// writing the leave sequences fails; the first error is reported.
fn restore_terminal<W: Write>(
    out: &mut W,
    disable_raw_mode: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    let screen = execute!(out, Show, LeaveAlternateScreen, DisableMouseCapture).and_then(|_| out.flush());
    let raw = disable_raw_mode();
    screen.and(raw)
}

fn drive<E: Effect>(effect: &mut E, stdout: &mut BufWriter<Stdout>) -> io::Result<()> {
    let mut last_frame = Instant::now();
    let mut accumulator = Duration::ZERO;

    loop {
        if event::poll(Duration::from_millis(1))? {
            let event = event::read()?;
            match &event {
                Event::Key(key_event) => {
                    if key_event.code == KeyCode::Char('q')
                        || key_event.code == KeyCode::Esc
                        || (key_event.code == KeyCode::Char('c')
                            && key_event.modifiers.contains(event::KeyModifiers::CONTROL))
                    {
                        break;
                    }
                    effect.handle_event(&event);
                }
                Event::Resize(cols, rows) => {
                    effect.resize(*cols as usize, *rows as usize * 2);
                    execute!(stdout, Clear(ClearType::All))?;
                }
                _ => {
                    effect.handle_event(&event);
                }
            }
        }

        let now = Instant::now();
        accumulator += now.duration_since(last_frame);
        last_frame = now;
        accumulator = accumulator.min(FRAME_STEP * 3);

        while accumulator >= FRAME_STEP {
            effect.update(FRAME_STEP);
            accumulator -= FRAME_STEP;
        }

        effect.render(stdout)?;
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let mut config = match &args.config {
        Some(path) => ShowConfig::load(path)?,
        None => ShowConfig::default(),
    };
    if let Some(color) = args.bg_color {
        config.background = color;
    }

    let rng = match args.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    coinworks::audio::describe_backend();

    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout());

    terminal::enable_raw_mode()?;
    let result = (|| -> io::Result<()> {
        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All), EnableMouseCapture)?;

        let (cols, rows) = terminal::size()?;
        let mut show = FireworksShow::new(cols as usize, rows as usize * 2, config, mixer(), rng);
        if args.autostart {
            show.activate();
        }
        info!("surface {}x{} pixels", cols, rows as usize * 2);

        drive(&mut show, &mut stdout)
    })();
    let restored = restore_terminal(&mut stdout, terminal::disable_raw_mode);

    result.context("terminal loop failed")?;
    restored.context("failed to restore terminal")
}
