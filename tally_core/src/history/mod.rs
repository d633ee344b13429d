//! # Calculation History
//!
//! Frozen sessions are persisted through the [`HistoryStore`] trait. The
//! engine never calls a store itself; a front end saves the session it
//! already holds, and a failed save leaves that session untouched.
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryHistory`] keeps sessions in insertion order, for tests and
//!   short-lived tools.
//! - [`FileHistoryStore`] keeps them in one JSON file with atomic saves and
//!   a lock file (native targets only).
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use tally_core::history::{HistoryStore, MemoryHistory};
//! use tally_core::{compute, CalculationInput, PriceList};
//!
//! let session = compute("steel-weight", &CalculationInput::new(), &PriceList::new())?
//!     .into_session(Utc::now());
//!
//! let mut history = MemoryHistory::new();
//! let id = history.save(&session)?;
//! assert_eq!(history.get(id)?.calculator_id, "steel-weight");
//! assert_eq!(history.list()?.len(), 1);
//! # Ok::<(), tally_core::CalcError>(())
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(not(target_arch = "wasm32"))]
pub use file::{FileHistoryStore, FileLock, LockInfo, HISTORY_SCHEMA_VERSION};

use uuid::Uuid;

use crate::errors::{CalcError, CalcResult};
use crate::session::CalculationSession;

/// Persistence for frozen calculation sessions.
pub trait HistoryStore {
    /// Store a session, replacing any earlier one with the same id.
    fn save(&mut self, session: &CalculationSession) -> CalcResult<Uuid>;

    /// Fetch one session; `HistoryNotFound` when the id is unknown.
    fn get(&self, id: Uuid) -> CalcResult<CalculationSession>;

    /// Every stored session, oldest first.
    fn list(&self) -> CalcResult<Vec<CalculationSession>>;
}

/// In-memory history, oldest first.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    sessions: Vec<CalculationSession>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl HistoryStore for MemoryHistory {
    fn save(&mut self, session: &CalculationSession) -> CalcResult<Uuid> {
        upsert(&mut self.sessions, session);
        Ok(session.id)
    }

    fn get(&self, id: Uuid) -> CalcResult<CalculationSession> {
        find(&self.sessions, id)
    }

    fn list(&self) -> CalcResult<Vec<CalculationSession>> {
        Ok(self.sessions.clone())
    }
}

fn upsert(sessions: &mut Vec<CalculationSession>, session: &CalculationSession) {
    match sessions.iter_mut().find(|s| s.id == session.id) {
        Some(existing) => *existing = session.clone(),
        None => sessions.push(session.clone()),
    }
}

fn find(sessions: &[CalculationSession], id: Uuid) -> CalcResult<CalculationSession> {
    sessions
        .iter()
        .find(|s| s.id == id)
        .cloned()
        .ok_or_else(|| CalcError::history_not_found(id))
}
