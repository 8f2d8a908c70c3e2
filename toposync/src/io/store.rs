//! Action db storage (`.toposync/actionDb.json`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::types::ActionDb;
use crate::io::config::SyncConfig;

/// Canonical paths under `.toposync/` for a working root.
#[derive(Debug, Clone)]
pub struct SyncPaths {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub config_path: PathBuf,
}

impl SyncPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let data_dir = root.join(".toposync");
        Self {
            config_path: data_dir.join("config.toml"),
            root,
            data_dir,
        }
    }

    /// Action db location, honoring the configured file name.
    pub fn db_path(&self, config: &SyncConfig) -> PathBuf {
        self.data_dir.join(&config.db_file)
    }
}

/// Load the action db from disk.
///
/// A missing file is the initial state: no topology claimed, empty logs.
/// An existing file that cannot be read or parsed is a storage fault.
pub fn load_db(path: &Path) -> Result<ActionDb> {
    if !path.exists() {
        debug!(path = %path.display(), "no action db on disk, starting empty");
        return Ok(ActionDb::default());
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("read action db {}", path.display()))?;
    let db: ActionDb = serde_json::from_str(&contents)
        .with_context(|| format!("parse action db {}", path.display()))?;
    debug!(
        state = ?db.state(),
        success = db.actions.success.len(),
        failures = db.actions.failures.len(),
        "action db loaded"
    );
    Ok(db)
}

/// Atomically write the action db to disk (temp file + rename).
///
/// A load after any completed write observes exactly the written state; a
/// crash mid-write leaves the previous db intact.
pub fn write_db(path: &Path, db: &ActionDb) -> Result<()> {
    debug!(path = %path.display(), state = ?db.state(), "writing action db");
    let mut buf = serde_json::to_string_pretty(db)?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("action db path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp action db {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace action db {}", path.display()))?;
    Ok(())
}
