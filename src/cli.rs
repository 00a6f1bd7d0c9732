//! CLI definition and parsing.
//!
//! One subcommand per catalog backend. Global flags come before the
//! subcommand; values left unset fall back to the XML config file.

use clap::error::ErrorKind;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueHint};
use std::path::PathBuf;
use std::process::ExitCode;

use arr_relocate::{Backend, LogLevel};

/// Relocate tagged Radarr/Sonarr media onto other storage, leaving symlinks behind.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Set log level: quiet, normal, info, debug.
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Emit logs in structured JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Also write logs to this file (append).
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Show what would be relocated without touching the filesystem.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Carry access/modification times over to the copies.
    #[arg(long, global = true)]
    pub preserve_times: bool,

    /// Print the config file location in use and exit.
    #[arg(long)]
    pub print_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Relocate movies tagged in Radarr.
    Radarr(BackendArgs),
    /// Relocate series tagged in Sonarr.
    Sonarr(BackendArgs),
}

impl Command {
    pub fn backend(&self) -> Backend {
        match self {
            Command::Radarr(_) => Backend::Radarr,
            Command::Sonarr(_) => Backend::Sonarr,
        }
    }

    pub fn args(&self) -> &BackendArgs {
        match self {
            Command::Radarr(a) | Command::Sonarr(a) => a,
        }
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct BackendArgs {
    /// API key (falls back to the config file).
    #[arg(short = 'a', long)]
    pub api_key: Option<String>,

    /// Label of the tag whose entities are relocated.
    #[arg(short = 't', long)]
    pub tag: String,

    /// Directory the entity folders are copied into.
    #[arg(short = 'd', long, value_hint = ValueHint::DirPath)]
    pub destination: PathBuf,

    /// Service address, e.g. http://localhost:7878.
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Prefix joined onto catalog paths to reach them from this machine.
    #[arg(short = 'p', long, value_hint = ValueHint::DirPath)]
    pub prefix_path: Option<PathBuf>,

    /// Root the symlinks point into (defaults to the destination).
    #[arg(short = 's', long, value_hint = ValueHint::DirPath)]
    pub symlink_root: Option<PathBuf>,

    /// Per-entity details (same as --log-level info).
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Parse the command line. Help and version exit 0; any other parse error exits 1.
pub fn parse() -> Result<Args, ExitCode> {
    match Args::try_parse() {
        Ok(args) => Ok(args),
        Err(e) => {
            let _ = e.print();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Err(ExitCode::SUCCESS),
                _ => Err(ExitCode::FAILURE),
            }
        }
    }
}
