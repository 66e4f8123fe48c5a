use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing_subscriber::EnvFilter;

use termbingo::Rgb;
use termbingo::app::BingoApp;
use termbingo::config::{self, BingoConfig};

/// Terminal bingo card with fireworks
#[derive(Debug, Parser)]
#[command(version, about, after_help = "Press 'q', ESC, or Ctrl+C to exit")]
struct Args {
    /// Card config (.toml, or .json with the web keys)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the card shuffle and fireworks
    #[arg(long)]
    seed: Option<u64>,

    /// Background color as hex (e.g. 1a1b26)
    #[arg(long, value_name = "RRGGBB", value_parser = config::parse_hex_color)]
    bg_color: Option<Rgb>,

    /// Write logs here; RUST_LOG picks the level
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn is_quit(event: &Event) -> bool {
    let Event::Key(key_event) = event else {
        return false;
    };
    key_event.code == KeyCode::Char('q')
        || key_event.code == KeyCode::Esc
        || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
}

fn event_loop<W: Write>(out: &mut W, app: &mut BingoApp) -> anyhow::Result<()> {
    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f32;
    const FIXED_DT: f32 = 1.0 / 60.0;

    loop {
        if event::poll(Duration::from_millis(1))? {
            let event = event::read()?;
            if is_quit(&event) {
                break;
            }
            if let Event::Resize(cols, rows) = event {
                app.resize(cols as usize, rows as usize);
                execute!(out, Clear(ClearType::All))?;
            } else {
                app.handle_event(&event);
            }
        }

        let now = Instant::now();
        let frame_time = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        accumulator += frame_time;
        if accumulator > FIXED_DT * 3.0 {
            accumulator = FIXED_DT * 3.0;
        }

        while accumulator >= FIXED_DT {
            app.update(FIXED_DT);
            accumulator -= FIXED_DT;
        }

        app.render(out)?;
    }

    Ok(())
}

fn run(config: BingoConfig, seed: u64, bg_color: Rgb) -> anyhow::Result<()> {
    let mut out = BufWriter::with_capacity(1024 * 64, stdout());

    terminal::enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All), EnableMouseCapture)?;

    let result = terminal::size()
        .map_err(anyhow::Error::from)
        .and_then(|(cols, rows)| {
            let mut app = BingoApp::new(config, cols as usize, rows as usize, seed, bg_color);
            event_loop(&mut out, &mut app)
        });

    // Both restore steps run whatever happened in the loop
    let restore = execute!(out, Show, LeaveAlternateScreen, DisableMouseCapture);
    let raw_mode = terminal::disable_raw_mode();

    finish(result, restore, raw_mode)
}

/// The loop's own error wins; restore failures behind it are only logged.
fn finish(
    result: anyhow::Result<()>,
    restore: std::io::Result<()>,
    raw_mode: std::io::Result<()>,
) -> anyhow::Result<()> {
    let restore = restore.context("failed to restore the terminal screen");
    let raw_mode = raw_mode.context("failed to leave raw mode");

    let mut first = None;
    for outcome in [result, restore, raw_mode] {
        if let Err(err) = outcome {
            if first.is_none() {
                first = Some(err);
            } else {
                tracing::error!(error = %format!("{err:#}"), "terminal cleanup failed");
            }
        }
    }
    first.map_or(Ok(()), Err)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = match &args.config {
        Some(path) => BingoConfig::load(path)
            .with_context(|| format!("could not load card config {}", path.display()))?,
        None => BingoConfig::default(),
    };

    let seed = args.seed.unwrap_or_else(|| fastrand::u64(..));
    tracing::info!(seed, grid_size = config.grid_size, "starting termbingo");

    run(config, seed, args.bg_color.unwrap_or((0, 0, 0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_err(msg: &str) -> std::io::Error {
        std::io::Error::other(msg.to_string())
    }

    #[test]
    fn test_finish_ok() {
        assert!(finish(Ok(()), Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn test_finish_keeps_loop_error() {
        let err = finish(
            Err(anyhow::anyhow!("loop broke")),
            Err(io_err("screen")),
            Err(io_err("raw")),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "loop broke");
    }

    #[test]
    fn test_finish_reports_restore_failure() {
        let err = finish(Ok(()), Err(io_err("screen")), Ok(())).unwrap_err();
        assert_eq!(err.to_string(), "failed to restore the terminal screen");
        assert!(format!("{err:#}").contains("screen"));
    }

    #[test]
    fn test_finish_reports_raw_mode_after_restore() {
        let err = finish(Ok(()), Ok(()), Err(io_err("raw"))).unwrap_err();
        assert_eq!(err.to_string(), "failed to leave raw mode");
    }
}
