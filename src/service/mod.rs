//! Decision logic for leave and shift scheduling.

pub mod leave;
pub mod shift;

pub use leave::LeaveLedger;
pub use shift::ShiftRoster;

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex;

/// Registry of per-employee async mutexes.
///
/// Submit/approve and shift assignment are check-then-act sequences; holding
/// the employee's mutex across the sequence keeps concurrent callers from
/// both passing the same check. Storage-level unique keys remain the
/// backstop across processes.
#[derive(Clone, Default)]
pub struct EmployeeLocks {
    inner: Arc<StdMutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl EmployeeLocks {
    pub fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().unwrap();
        map.entry(key.to_string()).or_default().clone()
    }
}
