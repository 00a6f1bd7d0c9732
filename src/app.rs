//! Application orchestrator.
//! Merges CLI and file settings into one Config, initializes logging,
//! installs the Ctrl-C handler, validates paths, and runs the batch.

use anyhow::{bail, Context, Result};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use arr_relocate::config::{load_file_settings, validate_and_normalize, FileSettings, CONFIG_ENV};
use arr_relocate::output::{self as out, ConsoleReporter};
use arr_relocate::{default_config_path, provider_for, run_batch, BatchError, Config, LogLevel};

use crate::cli::{Args, Command};
use crate::logging::init_tracing;

/// Exit status used when the run is interrupted with Ctrl-C.
const INTERRUPTED: i32 = 130;

pub fn run(args: Args) -> Result<ExitCode> {
    if args.print_config {
        print_config_location();
        return Ok(ExitCode::SUCCESS);
    }
    let Some(command) = args.command.as_ref() else {
        bail!("no backend given; run with radarr or sonarr (see --help)");
    };

    let file = load_file_settings()?;
    let mut cfg = build_config(&args, command, file.as_ref());

    let guard = init_tracing(cfg.log_level, cfg.log_file.as_deref(), cfg.json_logs)
        .context("failed to initialize logging")?;

    // Dropping the guard flushes the file writer before the process exits.
    let guard_slot = Arc::new(Mutex::new(guard));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            out::print_warn("interrupted; the entity in progress may need manual repair");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
            std::process::exit(INTERRUPTED);
        })
        .context("failed to install the Ctrl-C handler")?;
    }

    debug!(backend = %cfg.backend, tag = %cfg.tag, dry_run = cfg.dry_run, "starting arr_relocate");
    let result = execute(&mut cfg, command);

    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }
    result
}

fn execute(cfg: &mut Config, command: &Command) -> Result<ExitCode> {
    validate_and_normalize(cfg)?;
    let provider = provider_for(cfg.backend, &cfg.host, &cfg.api_key)
        .with_context(|| format!("cannot talk to {} at {}", cfg.backend, cfg.host))?;

    let mut reporter = ConsoleReporter {
        verbose: command.args().verbose || cfg.log_level >= LogLevel::Info,
    };
    match run_batch(provider.as_ref(), cfg, &mut reporter) {
        Ok(summary) => {
            info!(
                relocated = summary.relocated,
                skipped = summary.skipped,
                "run complete"
            );
            out::print_summary(&summary, cfg.dry_run);
            Ok(ExitCode::SUCCESS)
        }
        Err(BatchError::Catalog(e)) => {
            error!(backend = %cfg.backend, tag = %cfg.tag, error = %e, "catalog lookup failed");
            out::print_error(&format!("catalog lookup failed: {e}"));
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            // The reporter already printed the entity's failure.
            error!(error = %e, "batch aborted");
            out::print_error("aborted; remaining entities were not processed");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// CLI values win over the config file; the file wins over built-in defaults.
fn build_config(args: &Args, command: &Command, file: Option<&FileSettings>) -> Config {
    let backend = command.backend();
    let cli = command.args();
    let file_backend = file.map(|f| f.backend(backend));

    let api_key = cli
        .api_key
        .clone()
        .or_else(|| file_backend.and_then(|b| b.api_key.clone()))
        .unwrap_or_default();
    let mut cfg = Config::new(backend, api_key, cli.tag.clone(), cli.destination.clone());

    if let Some(host) = cli
        .host
        .clone()
        .or_else(|| file_backend.and_then(|b| b.host.clone()))
    {
        cfg.host = host;
    }
    cfg.source_prefix = cli
        .prefix_path
        .clone()
        .or_else(|| file.and_then(|f| f.prefix_path.clone()));
    cfg.symlink_root = cli
        .symlink_root
        .clone()
        .or_else(|| file.and_then(|f| f.symlink_root.clone()));
    cfg.log_file = args
        .log_file
        .clone()
        .or_else(|| file.and_then(|f| f.log_file.clone()));

    cfg.log_level = match (args.log_level, cli.verbose) {
        (Some(lvl), _) => lvl,
        (None, true) => LogLevel::Info,
        (None, false) => file.and_then(|f| f.log_level).unwrap_or_default(),
    };
    cfg.json_logs = args.json;
    cfg.dry_run = args.dry_run;
    cfg.preserve_times = args.preserve_times;
    cfg
}

fn print_config_location() {
    if let Ok(explicit) = std::env::var(CONFIG_ENV) {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit): {explicit}"));
        return;
    }
    match default_config_path() {
        Some(p) if p.exists() => {
            out::print_info(&format!("Config file: {}", p.display()));
        }
        Some(p) => {
            out::print_info(&format!("Config file: {} (not present; optional)", p.display()));
        }
        None => out::print_error("Could not determine a default config path"),
    }
}
