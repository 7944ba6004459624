//! Attendance Kiosk - unattended library check-in terminal
//!
//! A staff member signs the terminal in once a day; after that visitors pick
//! their role, type the last digits of their ID and are checked in or out.

use std::fs::{self, OpenOptions};
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use kiosk_client::HttpBackend;
use kiosk_core::FileSessionStore;
use kiosk_tui::{App, KioskConfig};
use ratatui::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log targets enabled when RUST_LOG is unset
const DEFAULT_DIRECTIVES: [&str; 4] = [
    "attendance_kiosk=info",
    "kiosk_tui=info",
    "kiosk_core=info",
    "kiosk_client=info",
];

#[derive(Parser)]
#[command(name = "attendance-kiosk")]
#[command(author, version, about = "Library attendance check-in kiosk", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the XDG config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the configuration file
    #[arg(long, value_name = "URL")]
    backend_url: Option<String>,

    /// Where the daily terminal session is stored
    #[arg(long, value_name = "PATH")]
    session_file: Option<PathBuf>,

    /// Log file; stdout belongs to the terminal UI
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Application entry point with panic handling for terminal restoration
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up panic hook to restore terminal on crash
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        );
        original_hook(panic_info);
    }));

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(KioskConfig::default_log_file);
    init_logging(&log_file)?;

    let mut config = KioskConfig::load(cli.config.as_deref());
    if let Some(url) = cli.backend_url {
        config.backend_url = url;
    }
    if let Some(path) = cli.session_file {
        config.session_file = Some(path);
    }
    config.validate().context("Invalid configuration")?;

    tracing::info!(backend = %config.backend_url, "starting attendance kiosk");

    let backend = HttpBackend::new(config.backend_url.as_str(), config.request_timeout())
        .context("Failed to create backend client")?;
    let store = FileSessionStore::new(config.session_path());
    let mut app = App::new(&config, Arc::new(backend), store)?;

    let result = run_app(&mut app).await;

    if let Err(e) = &result {
        tracing::error!("Application error: {:#}", e);
    }

    result
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(rust_log.as_deref());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .init();

    Ok(())
}

/// RUST_LOG replaces the default directives entirely; an unparsable value falls back to them
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES.join(",")))
}

/// Set up the terminal, run the kiosk, restore the terminal
async fn run_app(app: &mut App<FileSessionStore>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}
