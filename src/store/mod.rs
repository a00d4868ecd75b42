//! Abstract collaborator contracts for persistence.
//!
//! The engine only sees these narrow traits; backends live in
//! [`memory`] (tests, local development) and [`mysql`] (production).
//!
//! `save` follows an upsert convention shared by every backend: an entity
//! with `id == 0` is inserted and returned with its assigned id, any other
//! id is updated in place.

pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{Break, Company, Employee, EmployeeShift, LeaveRequest, LeaveType, Shift};

pub use memory::MemoryStores;
pub use mysql::MySqlStores;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A storage-level uniqueness constraint rejected the write. Serves as
    /// the authoritative backstop behind the application-level guards.
    #[error("duplicate key")]
    DuplicateKey,

    #[error("database error: {0}")]
    Database(String),
}

/// Normalization strategy for business-key lookup. A single store call
/// covers both the exact and the folded match so concurrent renames cannot
/// produce an inconsistent read between two lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLookup {
    Exact,
    /// Prefer an exact match, fall back to case-insensitive.
    CaseInsensitive,
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn find_by_code(&self, code: &str, lookup: CodeLookup) -> StoreResult<Option<Employee>>;
    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Employee>>;
    async fn save(&self, employee: &Employee) -> StoreResult<Employee>;
}

#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Company>>;
}

#[async_trait]
pub trait LeaveTypeStore: Send + Sync {
    async fn find_by_id(&self, id: u64) -> StoreResult<Option<LeaveType>>;
}

#[async_trait]
pub trait LeaveRequestStore: Send + Sync {
    async fn save(&self, request: &LeaveRequest) -> StoreResult<LeaveRequest>;
    async fn find_by_employee(&self, employee_id: u64) -> StoreResult<Vec<LeaveRequest>>;
}

#[async_trait]
pub trait ShiftStore: Send + Sync {
    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Shift>>;
    async fn find_by_company(&self, company_id: u64) -> StoreResult<Vec<Shift>>;
    async fn save(&self, shift: &Shift) -> StoreResult<Shift>;
    async fn delete(&self, id: u64) -> StoreResult<()>;
}

#[async_trait]
pub trait EmployeeShiftStore: Send + Sync {
    async fn exists_for(&self, employee_id: u64, date: NaiveDate) -> StoreResult<bool>;
    async fn find_by_employee(&self, employee_id: u64) -> StoreResult<Vec<EmployeeShift>>;
    async fn save(&self, assignment: &EmployeeShift) -> StoreResult<EmployeeShift>;
    async fn delete_by_shift(&self, shift_id: u64) -> StoreResult<()>;
}

#[async_trait]
pub trait BreakStore: Send + Sync {
    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Break>>;
    async fn find_by_shift(&self, shift_id: u64) -> StoreResult<Vec<Break>>;
    async fn save(&self, brk: &Break) -> StoreResult<Break>;
    async fn delete(&self, id: u64) -> StoreResult<()>;
    async fn delete_by_shift(&self, shift_id: u64) -> StoreResult<()>;
}
