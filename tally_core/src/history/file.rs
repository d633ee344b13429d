//! File-backed history.
//!
//! All sessions live in a single JSON document:
//!
//! ```json
//! { "version": "0.1.0", "sessions": [ ... ] }
//! ```
//!
//! Saves are atomic (write `.tmp`, fsync, rename) and run under an
//! exclusive lock: an OS-level `fs2` lock on a `<file>.lock` companion that
//! also records who holds it. A missing history file reads as empty.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::{find, upsert, HistoryStore};
use crate::errors::{CalcError, CalcResult};
use crate::session::CalculationSession;

/// Schema version written to new history files
pub const HISTORY_SCHEMA_VERSION: &str = "0.1.0";

/// Hours after which a lock left behind by a dead process is ignored
const STALE_LOCK_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
struct HistoryFile {
    version: String,
    #[serde(default)]
    sessions: Vec<CalculationSession>,
}

impl Default for HistoryFile {
    fn default() -> Self {
        HistoryFile {
            version: HISTORY_SCHEMA_VERSION.to_string(),
            sessions: Vec::new(),
        }
    }
}

// ============================================================================
// Lock
// ============================================================================

/// Metadata stored in the `.lock` file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Who is writing (user name or tool name)
    pub user_id: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok())
    }
}

/// Exclusive lock on a history file, released on drop.
pub struct FileLock {
    lock_path: PathBuf,
    /// Holds the OS lock
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire the lock for `path`.
    ///
    /// Fails with `FileLocked` while another live process holds it.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if let Some(existing) = Self::check(path) {
            return Err(CalcError::file_locked(
                path.display().to_string(),
                format!("{} ({})", existing.user_id, existing.machine),
                existing.locked_at.to_rfc3339(),
            ));
        }

        let mut lock_file = lock_exclusive(path, &lock_path)?;
        lock_file
            .set_len(0)
            .map_err(|e| CalcError::file_error("clear lock", lock_path.display().to_string(), e.to_string()))?;

        let lock_json = serde_json::to_string_pretty(&info).map_err(CalcError::serialization)?;
        lock_file
            .write_all(lock_json.as_bytes())
            .map_err(|e| CalcError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;
        lock_file
            .sync_all()
            .map_err(|e| CalcError::file_error("sync lock", lock_path.display().to_string(), e.to_string()))?;

        debug!(path = %path.display(), "history lock acquired");

        Ok(FileLock {
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Current holder of the lock, if any live one exists.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if !lock_path.exists() {
            return None;
        }
        read_lock_info(&lock_path).ok().filter(|info| !is_lock_stale(info))
    }
}

/// Open the lock file and take the OS lock. The file is left as found
/// until the lock is held, so a losing process keeps the holder's info.
fn lock_exclusive(path: &Path, lock_path: &Path) -> CalcResult<File> {
    let lock_file = OpenOptions::new()
        .write(true)
        .read(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .map_err(|e| CalcError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

    lock_file
        .try_lock_exclusive()
        .map_err(|_| CalcError::file_locked(path.display().to_string(), "another process", "unknown"))?;
    Ok(lock_file)
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut lock_path = path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

fn read_lock_info(lock_path: &Path) -> CalcResult<LockInfo> {
    let contents = read_to_string(lock_path, "read lock")?;
    serde_json::from_str(&contents).map_err(CalcError::serialization)
}

/// A lock is stale when its process is gone (same machine) or it is old.
fn is_lock_stale(info: &LockInfo) -> bool {
    if hostname().as_deref() == Some(info.machine.as_str()) {
        #[cfg(unix)]
        {
            if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                return true;
            }
        }
    }

    (Utc::now() - info.locked_at).num_hours() > STALE_LOCK_HOURS
}

// ============================================================================
// Store
// ============================================================================

/// History kept in one JSON file.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
    user_id: String,
}

impl FileHistoryStore {
    /// Store backed by `path`; `user_id` is recorded in the lock file.
    pub fn new(path: impl Into<PathBuf>, user_id: impl Into<String>) -> Self {
        FileHistoryStore {
            path: path.into(),
            user_id: user_id.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> CalcResult<HistoryFile> {
        if !self.path.exists() {
            return Ok(HistoryFile::default());
        }

        let contents = read_to_string(&self.path, "read")?;
        let file: HistoryFile = serde_json::from_str(&contents).map_err(|e| {
            CalcError::serialization(format!("Invalid JSON in {}: {}", self.path.display(), e))
        })?;

        validate_version(&file.version)?;
        Ok(file)
    }
}

impl HistoryStore for FileHistoryStore {
    fn save(&mut self, session: &CalculationSession) -> CalcResult<Uuid> {
        let _lock = FileLock::acquire(&self.path, self.user_id.as_str())?;

        let mut file = self.load()?;
        file.version = HISTORY_SCHEMA_VERSION.to_string();
        upsert(&mut file.sessions, session);
        atomic_write(&self.path, &file)?;

        info!(
            id = %session.id,
            calculator = %session.calculator_id,
            path = %self.path.display(),
            "calculation saved to history"
        );
        Ok(session.id)
    }

    fn get(&self, id: Uuid) -> CalcResult<CalculationSession> {
        find(&self.load()?.sessions, id)
    }

    fn list(&self) -> CalcResult<Vec<CalculationSession>> {
        Ok(self.load()?.sessions)
    }
}

fn read_to_string(path: &Path, operation: &str) -> CalcResult<String> {
    let mut file =
        File::open(path).map_err(|e| CalcError::file_error(operation, path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error(operation, path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Serialize to `<path>.tmp`, fsync, then rename over `path`.
fn atomic_write(path: &Path, file: &HistoryFile) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(file).map_err(CalcError::serialization)?;

    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .sync_all()
        .map_err(|e| CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// Major version must match; on 0.x a newer minor is rejected too.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: HISTORY_SCHEMA_VERSION.to_string(),
    };

    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(HISTORY_SCHEMA_VERSION);

    let (Some(file_major), Some(current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }
    if *current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }
    Ok(())
}
