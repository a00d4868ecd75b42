pub mod leave;
pub mod shift;

use crate::service::{LeaveLedger, ShiftRoster};

/// Shared handler state: the two engine services.
#[derive(Clone)]
pub struct AppState {
    pub ledger: LeaveLedger,
    pub roster: ShiftRoster,
}

impl AppState {
    pub fn new(ledger: LeaveLedger, roster: ShiftRoster) -> Self {
        Self { ledger, roster }
    }
}
