//! Tracing initialization.
//!
//! - Console events go to stderr so they never interleave with the
//!   disposition lines on stdout. Their level follows LogLevel.
//! - An optional append-only log file receives at least info-level events,
//!   whatever the console level, through a non-blocking writer.
//! - Compact or JSON formatting for both, with a local human timestamp.
//! - File logging is refused if any ancestor of the file path is a symlink.

use anyhow::Result;
use chrono::Local;
use std::fmt as stdfmt;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{registry, Layer, Registry};

use arr_relocate::output as out;
use arr_relocate::platform::open_log_file_secure_append;
use arr_relocate::{default_log_path, path_has_symlink_ancestor, LogLevel};

type BoxedLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

/// DD/MM/YY HH:MM:SS in local time.
struct LocalHumanTime;
impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%d/%m/%y %H:%M:%S"))
    }
}

fn console_level(lvl: LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Quiet => LevelFilter::ERROR,
        LogLevel::Normal => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::TRACE,
    }
}

/// Our crate at `level`, the HTTP stack held to warnings unless debugging.
fn env_filter(level: LevelFilter) -> EnvFilter {
    let deps = if level == LevelFilter::TRACE { "debug" } else { "warn" };
    EnvFilter::new(format!(
        "{},reqwest={deps},hyper={deps},hyper_util={deps}",
        level.to_string().to_lowercase()
    ))
}

fn console_layer(json: bool, level: LevelFilter) -> BoxedLayer {
    let layer = tsfmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(LocalHumanTime)
        .with_level(true)
        .with_target(true);
    if json {
        layer.json().with_filter(level).boxed()
    } else {
        layer.compact().with_filter(level).boxed()
    }
}

fn file_layer(json: bool, level: LevelFilter, writer: NonBlocking) -> BoxedLayer {
    let layer = tsfmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_timer(LocalHumanTime)
        .with_level(true)
        .with_target(true)
        .with_thread_ids(true);
    if json {
        layer.json().with_filter(level).boxed()
    } else {
        layer.compact().with_filter(level).boxed()
    }
}

/// Open `path` for appending behind a non-blocking writer, or explain on
/// stderr why not and return None.
fn maybe_open_non_blocking_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match path_has_symlink_ancestor(path) {
        Ok(true) => {
            eprintln!(
                "Refusing to enable file logging: an ancestor of {} is a symlink.",
                path.display()
            );
            return None;
        }
        Err(e) => {
            eprintln!("Error checking log path {} for symlinks: {e}", path.display());
            return None;
        }
        Ok(false) => {}
    }

    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match open_log_file_secure_append(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            eprintln!("Failed to open log file {}: {e}", path.display());
            None
        }
    }
}

/// Install the global subscriber. The returned guard, when present, must be
/// held until exit so buffered file logs are flushed.
pub fn init_tracing(lvl: LogLevel, log_file: Option<&Path>, json: bool) -> Result<Option<WorkerGuard>> {
    let console = console_level(lvl);
    let mut layers: Vec<BoxedLayer> = vec![console_layer(json, console)];
    let mut guard = None;
    let mut global = console;

    if let Some(path) = log_file {
        match maybe_open_non_blocking_writer(path) {
            Some((writer, g)) => {
                let level = console.max(LevelFilter::INFO);
                layers.push(file_layer(json, level, writer));
                global = global.max(level);
                guard = Some(g);
            }
            None => {
                out::print_warn(&format!(
                    "file logging to '{}' is not enabled; logs continue on stderr only",
                    path.display()
                ));
                if let Some(def) = default_log_path() {
                    out::print_info(&format!("the default log path is {}", def.display()));
                }
            }
        }
    }

    registry()
        .with(env_filter(global))
        .with(layers)
        .try_init()?;
    Ok(guard)
}
