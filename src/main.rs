mod api;
mod charts;
mod config;
mod error;
mod models;
mod pipeline;
mod run;
mod store;
mod ui;

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const CONFIG_FILE: &str = "config.toml";
const STATE_FILE: &str = "state.json";
const LOG_FILE: &str = "splitui.log";
const VERBOSE_ENV: &str = "SPLITUI_VERBOSE";

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().collect();
    let verbose = take_flag(&mut args, &["--verbose", "-v"])
        || std::env::var(VERBOSE_ENV).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

    let data_dir = get_data_dir()?;
    let tui = args.len() == 1;
    let log_file = data_dir.join(LOG_FILE);
    init_logging(verbose, tui.then_some(log_file.as_path()))?;

    let config = config::Config::load(Some(&data_dir.join(CONFIG_FILE)))
        .context("Failed to load configuration")?;
    let store = store::LocalStore::open(&data_dir.join(STATE_FILE));
    let gateway = api::HttpGateway::new(&config.api).context("Failed to build HTTP client")?;

    let ctx = run::Context {
        config,
        store,
        gateway: Arc::new(gateway),
    };

    if tui {
        run::as_tui(&ctx)
    } else {
        run::as_cli(&args, &ctx)
    }
}

/// Remove every occurrence of `names` from `args`, returning whether any
/// was present.
fn take_flag(args: &mut Vec<String>, names: &[&str]) -> bool {
    let before = args.len();
    args.retain(|a| !names.contains(&a.as_str()));
    args.len() != before
}

/// Priority: RUST_LOG env var > --verbose flag > default (info).
/// The TUI owns the terminal, so it logs to a file instead of stderr.
fn init_logging(verbose: bool, file: Option<&Path>) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let registry = tracing_subscriber::registry().with(filter);
    match file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .compact()
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .compact()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
    Ok(())
}

fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "splitui", "SplitTUI")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}
