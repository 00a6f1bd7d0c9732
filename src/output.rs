//! User-facing output: colored status lines (only when stdout is a TTY) and
//! the console `Reporter` that prints each entity's disposition.

use owo_colors::OwoColorize;

use crate::batch::{BatchSummary, Reporter};
use crate::catalog::Relocatable;
use crate::errors::{BatchError, RelocateError};
use crate::fs_ops::RelocationPlan;

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn line(label: &str, msg: &str, paint: fn(&str) -> String) -> String {
    if is_tty() {
        format!("{} {}", paint(label), msg)
    } else {
        format!("{label} {msg}")
    }
}

pub fn print_info(msg: &str) {
    println!("{}", line("info:", msg, |s| s.cyan().bold().to_string()));
}

pub fn print_warn(msg: &str) {
    eprintln!("{}", line("warn:", msg, |s| s.yellow().bold().to_string()));
}

pub fn print_error(msg: &str) {
    eprintln!("{}", line("error:", msg, |s| s.red().bold().to_string()));
}

pub fn print_success(msg: &str) {
    println!("{}", line("ok:", msg, |s| s.green().bold().to_string()));
}

/// What is on disk after a failure that needs a human to finish the job.
pub fn repair_hint(error: &RelocateError, plan: &RelocationPlan) -> Option<String> {
    match error {
        RelocateError::RemoveFailed { .. } => Some(format!(
            "the copy at '{}' is complete but '{}' could not be fully removed; \
             the entity is neither at its source nor relocated. Finish removing the source, \
             then create the symlink '{}' -> '{}' by hand.",
            plan.destination.display(),
            plan.source.display(),
            plan.source.display(),
            plan.link_target.display()
        )),
        RelocateError::LinkFailed { .. } => Some(format!(
            "the source '{}' was removed and its data is at '{}', but the symlink was not created; \
             the catalog path is now missing. Create the symlink '{}' -> '{}' by hand.",
            plan.source.display(),
            plan.destination.display(),
            plan.source.display(),
            plan.link_target.display()
        )),
        _ => None,
    }
}

/// Prints dispositions to stdout/stderr. `verbose` adds the skip lines and plan details.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
}

impl Reporter for ConsoleReporter {
    fn skipped(&mut self, entity: &Relocatable) {
        print_info(&format!("{entity}: already relocated, skipping"));
    }

    fn moving(&mut self, entity: &Relocatable, plan: &RelocationPlan) {
        if self.verbose {
            print_info(&format!(
                "{entity}: moving '{}' -> '{}' (link -> '{}')",
                plan.source.display(),
                plan.destination.display(),
                plan.link_target.display()
            ));
        } else {
            print_info(&format!("{entity}: moving to '{}'", plan.destination.display()));
        }
    }

    fn moved(&mut self, entity: &Relocatable, plan: &RelocationPlan) {
        print_success(&format!(
            "{entity}: relocated; '{}' -> '{}'",
            plan.source.display(),
            plan.link_target.display()
        ));
    }

    fn planned(&mut self, entity: &Relocatable, plan: &RelocationPlan) {
        print_info(&format!(
            "{entity}: dry-run, would copy to '{}' and link '{}' -> '{}'",
            plan.destination.display(),
            plan.source.display(),
            plan.link_target.display()
        ));
    }

    fn failed(&mut self, entity: &Relocatable, plan: Option<&RelocationPlan>, error: &BatchError) {
        print_error(&format!("{entity}: {error}"));
        if let (BatchError::Relocate { error, .. }, Some(plan)) = (error, plan) {
            if let Some(hint) = repair_hint(error, plan) {
                print_warn(&format!("MANUAL REPAIR NEEDED for {entity}: {hint}"));
            }
        }
    }
}

pub fn print_summary(summary: &BatchSummary, dry_run: bool) {
    if dry_run {
        print_success(&format!(
            "dry-run complete: {} entities, {} would move, {} already relocated",
            summary.total, summary.planned, summary.skipped
        ));
    } else {
        print_success(&format!(
            "done: {} entities, {} relocated, {} already relocated",
            summary.total, summary.relocated, summary.skipped
        ));
    }
}
