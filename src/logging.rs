use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_ENV: &str = "REVOLT_LOG_FILE";
const DEFAULT_LOG_FILE: &str = "revolt-debug.log";

#[cfg_attr(not(feature = "debug-log"), allow(dead_code))]
fn resolve_log_path(var: Option<OsString>) -> PathBuf {
    var.filter(|v| !v.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from)
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

#[cfg(feature = "debug-log")]
mod inner {
    use super::{LOG_FILE_ENV, env_filter, resolve_log_path};
    use std::fs;
    use std::path::PathBuf;
    use tracing_appender::non_blocking::WorkerGuard;
    use tracing_subscriber::{fmt, prelude::*};

    /// JSON lines into the debug log file while the terminal UI owns the
    /// screen. Keep the guard alive until exit or buffered lines are lost.
    pub fn init() -> Option<(PathBuf, WorkerGuard)> {
        let log_path = resolve_log_path(std::env::var_os(LOG_FILE_ENV));

        let file = match fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
        {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Failed to open log file {}: {e}", log_path.display());
                return None;
            }
        };

        let (non_blocking, guard) = tracing_appender::non_blocking(file);

        let subscriber = tracing_subscriber::registry()
            .with(env_filter("debug"))
            .with(
                fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_target(true)
                    .with_line_number(true),
            );

        if tracing::subscriber::set_global_default(subscriber).is_err() {
            eprintln!("Failed to set tracing subscriber");
            return None;
        }

        tracing::info!(path = %log_path.display(), "Debug logging initialized");

        Some((log_path, guard))
    }
}

#[cfg(not(feature = "debug-log"))]
mod inner {
    use std::path::PathBuf;

    /// Without `debug-log` the UI session is not logged anywhere.
    #[inline(always)]
    pub const fn init() -> Option<(PathBuf, ())> {
        None
    }
}

pub use inner::init;

/// Human-readable logs on stderr for headless commands. Silent unless
/// `verbose` is set, so stdout stays clean for the generated code.
pub fn init_stderr(verbose: bool) -> bool {
    if !verbose {
        return false;
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
