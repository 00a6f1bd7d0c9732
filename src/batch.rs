//! Batch driver: fetch the tagged entities, then for each one in catalog
//! order probe it, skip it if already relocated, otherwise relocate it.
//!
//! Strictly sequential. The first fatal error (catalog, probe, or any
//! relocation failure) stops the batch; later entities are not touched.

use tracing::{error, info, info_span};

use crate::catalog::{EntityProvider, Relocatable};
use crate::config::Config;
use crate::errors::BatchError;
use crate::fs_ops::{check_movability, Movability, RelocationPlan, Relocator};

/// Receives each entity's disposition as the batch progresses.
pub trait Reporter {
    fn skipped(&mut self, entity: &Relocatable);
    fn moving(&mut self, entity: &Relocatable, plan: &RelocationPlan);
    fn moved(&mut self, entity: &Relocatable, plan: &RelocationPlan);
    fn planned(&mut self, entity: &Relocatable, plan: &RelocationPlan);
    fn failed(&mut self, entity: &Relocatable, plan: Option<&RelocationPlan>, error: &BatchError);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub relocated: usize,
    pub skipped: usize,
    pub planned: usize,
}

/// Process every entity `provider` lists for `cfg.tag`.
pub fn run_batch(
    provider: &dyn EntityProvider,
    cfg: &Config,
    reporter: &mut dyn Reporter,
) -> Result<BatchSummary, BatchError> {
    let entities = provider.relocatables(&cfg.tag)?;
    info!(backend = %provider.backend(), tag = %cfg.tag, count = entities.len(), "entities on tag");

    let relocator = Relocator::from_config(cfg);
    let mut summary = BatchSummary {
        total: entities.len(),
        ..BatchSummary::default()
    };

    for entity in &entities {
        let local = entity.localized(cfg.source_prefix.as_deref());
        let _span = info_span!("entity", title = %local.title).entered();

        match check_movability(&local.probe_paths()) {
            Ok(Movability::AlreadyRelocated) => {
                reporter.skipped(&local);
                summary.skipped += 1;
                continue;
            }
            Ok(Movability::Movable) => {}
            Err(e) => {
                error!(path = ?e.path(), error = %e, "probe failed");
                let err = BatchError::Probe {
                    title: local.title.clone(),
                    error: e,
                };
                reporter.failed(&local, None, &err);
                return Err(err);
            }
        }

        let plan = match relocator.plan(&local) {
            Ok(plan) => plan,
            Err(e) => {
                let err = BatchError::Relocate {
                    title: local.title.clone(),
                    error: e,
                };
                reporter.failed(&local, None, &err);
                return Err(err);
            }
        };
        reporter.moving(&local, &plan);

        match relocator.relocate(&local) {
            Ok(done) if cfg.dry_run => {
                reporter.planned(&local, &done);
                summary.planned += 1;
            }
            Ok(done) => {
                reporter.moved(&local, &done);
                summary.relocated += 1;
            }
            Err(e) => {
                error!(
                    code = e.code(),
                    kind = e.kind(),
                    manual_repair = e.requires_manual_repair(),
                    error = %e,
                    "relocation failed"
                );
                let err = BatchError::Relocate {
                    title: local.title.clone(),
                    error: e,
                };
                reporter.failed(&local, Some(&plan), &err);
                return Err(err);
            }
        }
    }

    info!(
        total = summary.total,
        relocated = summary.relocated,
        skipped = summary.skipped,
        planned = summary.planned,
        "batch finished"
    );
    Ok(summary)
}
