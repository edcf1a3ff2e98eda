// ============================================================
// Layer 6 — Logging
// ============================================================
// Installs the global tracing subscriber. Progress always goes
// to stdout; with a log directory it is also appended to
// <log_dir>/textrnn_cls.log (without ANSI colours).
//
// RUST_LOG, when set, is the whole filter. Otherwise this crate
// logs at `info`.

use anyhow::{Context, Result};
use std::{fs, path::Path, sync::Mutex};
use tracing_subscriber::{fmt::writer::MakeWriterExt, EnvFilter};

pub const LOG_FILE: &str = "textrnn_cls.log";

const DEFAULT_DIRECTIVES: &str = "textrnn_cls=info";

/// Filter from RUST_LOG-style directives, or the crate default
fn build_filter(directives: Option<&str>) -> Result<EnvFilter> {
    match directives {
        Some(d) if !d.trim().is_empty() => Ok(EnvFilter::try_new(d)?),
        _ => Ok(EnvFilter::new(DEFAULT_DIRECTIVES)),
    }
}

pub fn init(log_dir: Option<&Path>) -> Result<()> {
    let filter = build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())?;

    match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create log directory '{}'", dir.display()))?;
            let path = dir.join(LOG_FILE);
            let file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Cannot open log file '{}'", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::io::stdout.and(Mutex::new(file)))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .init();
        }
    }
    Ok(())
}
