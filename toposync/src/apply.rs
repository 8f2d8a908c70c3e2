//! Orchestration for `toposync apply` and `toposync show`.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::core::lifecycle::{Decision, Outcome, apply_action};
use crate::core::types::{ActionRequest, Snapshot};
use crate::io::config::load_config;
use crate::io::store::{SyncPaths, load_db, write_db};

/// Result of one apply invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub decision: Decision,
    pub snapshot: Snapshot,
}

/// Run one load → decide → save cycle against the store under `root`.
///
/// Rejections are reported in the decision and still persisted to the
/// failures log; only storage faults propagate as `Err`.
pub fn apply_from_root(root: &Path, request: &ActionRequest) -> Result<ApplyReport> {
    let paths = SyncPaths::new(root);
    let config = load_config(&paths.config_path).with_context(|| "load config.toml")?;
    let db_path = paths.db_path(&config);

    let mut db = load_db(&db_path).with_context(|| "load action db")?;
    let decision = apply_action(&mut db, request);
    write_db(&db_path, &db).with_context(|| "write action db")?;

    match decision.outcome {
        Outcome::Applied => info!(entry = %decision.entry, "action applied"),
        Outcome::Rejected(reason) => info!(entry = %decision.entry, %reason, "action rejected"),
    }

    Ok(ApplyReport {
        decision,
        snapshot: Snapshot::of(&db),
    })
}

/// Read-only snapshot of the store under `root`.
pub fn snapshot_from_root(root: &Path) -> Result<Snapshot> {
    let paths = SyncPaths::new(root);
    let config = load_config(&paths.config_path).with_context(|| "load config.toml")?;
    let db = load_db(&paths.db_path(&config)).with_context(|| "load action db")?;
    Ok(Snapshot::of(&db))
}
