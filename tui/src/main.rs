//! Genblock TUI Entry Point
//!
//! Launches the terminal dashboard for the generative content card.
//!
//! Usage:
//!   genblock [OPTIONS]
//!
//! Options:
//!   --config <FILE>            Card configuration file
//!   --kind <KIND>              Initial content kind (paragraph, bullet)
//!   --base-reveal-ms <MS>      Base delay of every unit reveal
//!   --per-char-reveal-ms <MS>  Per-character reveal delay
//!
//! Logs go to `$XDG_STATE_HOME/genblock/genblock.log` (or the cache dir)
//! so they never corrupt the terminal. Use `RUST_LOG` to change the level.

use std::fs::{self, File};
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use genblock_core::{load_config_from_path, CardEngine, ConfigOverrides, ContentKind};
use genblock_tui::{App, Dashboard, SystemClipboard};

/// Genblock - a regenerating content card in your terminal
#[derive(Parser, Debug)]
#[command(name = "genblock")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "GENBLOCK_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initial content kind (paragraph, bullet)
    #[arg(short = 'k', long, value_name = "KIND")]
    kind: Option<String>,

    /// Base delay of every unit reveal, in milliseconds
    #[arg(long, value_name = "MS")]
    base_reveal_ms: Option<u64>,

    /// Per-character reveal delay, in milliseconds
    #[arg(long, value_name = "MS")]
    per_char_reveal_ms: Option<u64>,
}

/// Directory the log file lives in
fn log_dir() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map(|dir| dir.join("genblock"))
}

/// Route tracing output to a file
fn init_logging() -> Result<Option<PathBuf>> {
    let Some(dir) = log_dir() else {
        return Ok(None);
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {dir:?}"))?;

    let path = dir.join("genblock.log");
    let file = File::create(&path).with_context(|| format!("Failed to create log file: {path:?}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("genblock=info".parse()?)
                .add_directive("genblock_tui=info".parse()?)
                .add_directive("genblock_core=info".parse()?),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(Some(path))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: genblock requires a terminal (TTY)");
        eprintln!();
        eprintln!("For headless runs use genblock-trace instead.");
        std::process::exit(1);
    }

    let log_path = init_logging()?;

    let mut config = load_config_from_path(args.config.clone()).context("Failed to load configuration")?;
    let mut overrides = ConfigOverrides::new();
    if let Some(ref kind) = args.kind {
        let kind = ContentKind::parse(kind).with_context(|| format!("Unknown content kind: {kind}"))?;
        overrides = overrides.with_kind(kind);
    }
    if let Some(ms) = args.base_reveal_ms {
        overrides = overrides.with_base_reveal_ms(ms);
    }
    if let Some(ms) = args.per_char_reveal_ms {
        overrides = overrides.with_per_character_reveal_ms(ms);
    }
    overrides.apply(&mut config).context("Invalid command-line override")?;

    info!(source = %config.source(), kind = %config.kind, log = ?log_path, "Starting genblock");

    let dashboard = Dashboard::new(config.kind);
    let (engine, card) = CardEngine::new(config, dashboard.block(), SystemClipboard::new())?;
    let engine_task = engine.spawn();

    // Restore the terminal before printing a panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, card.clone(), dashboard).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Quitting shuts the engine down; this covers the error path
    if card.shutdown().await.is_ok() {
        warn!("Card engine was still running at exit");
    }
    drop(card);
    engine_task.await?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    card: genblock_core::CardHandle,
    dashboard: Dashboard,
) -> Result<()> {
    let mut app = App::new(card, dashboard).await?;
    app.run(terminal).await
}
