use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "TYPETRIAL_LOG";

/// Sends tracing output to `path`; the terminal belongs to the UI.
///
/// Returns `Ok(false)` if a global subscriber was already installed.
pub fn init(path: &Path) -> io::Result<bool> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_level(true)
        .with_target(true);

    let installed = subscriber.try_init().is_ok();
    if installed {
        tracing::info!(path = %path.display(), "tracing initialized");
    }
    Ok(installed)
}
