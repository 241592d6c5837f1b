// Copyright (c) 2026 rezky_nightky

use std::fs::OpenOptions;
use std::io::Result;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Routes `tracing` output to `path`. The terminal belongs to the animation,
/// so without a log file nothing is subscribed and events are dropped.
pub fn init_file_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
    if let Err(e) = installed {
        eprintln!("failed to install logger: {}", e);
    }
    Ok(())
}
