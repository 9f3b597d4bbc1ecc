mod api;
mod config;
mod db;
mod import;
mod models;
mod run;
mod sources;
mod ui;

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().collect();
    let settings = config::Settings::from_args(&mut args)?;
    init_logging(&settings.log_path)?;
    tracing::info!(db = %settings.db_path.display(), page_size = settings.page_size, "starting emptui");

    match args.len() {
        1 => run::as_tui(&settings),
        2.. => run::as_cli(&args, &settings),
        _ => {
            eprintln!("Usage: emptui [command]");
            Ok(())
        }
    }
}

/// Log to a file; the terminal belongs to the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_env(config::LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("emptui=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .init();
    Ok(())
}
