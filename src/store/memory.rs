//! In-memory store backend.
//!
//! Backs the test suites and local development runs. Mirrors the uniqueness
//! constraints the MySQL schema enforces, so the engine sees the same
//! `DuplicateKey` backstop behavior against both backends.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::model::{Break, Company, Employee, EmployeeShift, LeaveRequest, LeaveStatus, LeaveType, Shift};

use super::{
    BreakStore, CodeLookup, CompanyStore, EmployeeShiftStore, EmployeeStore, LeaveRequestStore,
    LeaveTypeStore, ShiftStore, StoreError, StoreResult,
};

#[derive(Default)]
struct Inner {
    next_id: u64,
    companies: HashMap<u64, Company>,
    employees: HashMap<u64, Employee>,
    leave_types: HashMap<u64, LeaveType>,
    leave_requests: HashMap<u64, LeaveRequest>,
    shifts: HashMap<u64, Shift>,
    employee_shifts: HashMap<u64, EmployeeShift>,
    breaks: HashMap<u64, Break>,
}

impl Inner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStores {
    inner: RwLock<Inner>,
}

impl MemoryStores {
    pub fn new() -> Self {
        Self::default()
    }

    // Seeding helpers for tests and local runs.

    pub fn seed_company(&self, name: &str) -> Company {
        let mut inner = self.inner.write().unwrap();
        let company = Company {
            id: inner.next_id(),
            name: name.to_string(),
        };
        inner.companies.insert(company.id, company.clone());
        company
    }

    pub fn seed_employee(&self, number: &str, company_id: u64, leave_balance: u32) -> Employee {
        let mut inner = self.inner.write().unwrap();
        let employee = Employee {
            id: inner.next_id(),
            employee_number: number.to_string(),
            first_name: "Test".into(),
            last_name: number.to_string(),
            email: format!("{}@example.com", number.to_lowercase()),
            company_id,
            leave_balance,
            hire_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        };
        inner.employees.insert(employee.id, employee.clone());
        employee
    }

    pub fn seed_leave_type(&self, company_id: u64, name: &str, max_days: u32, is_paid: bool) -> LeaveType {
        let mut inner = self.inner.write().unwrap();
        let leave_type = LeaveType {
            id: inner.next_id(),
            company_id,
            name: name.to_string(),
            max_days,
            is_paid,
        };
        inner.leave_types.insert(leave_type.id, leave_type.clone());
        leave_type
    }
}

#[async_trait]
impl EmployeeStore for MemoryStores {
    async fn find_by_code(&self, code: &str, lookup: CodeLookup) -> StoreResult<Option<Employee>> {
        let inner = self.inner.read().unwrap();
        let exact = inner
            .employees
            .values()
            .find(|e| e.employee_number == code)
            .cloned();
        if exact.is_some() || lookup == CodeLookup::Exact {
            return Ok(exact);
        }
        Ok(inner
            .employees
            .values()
            .find(|e| e.employee_number.eq_ignore_ascii_case(code))
            .cloned())
    }

    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Employee>> {
        Ok(self.inner.read().unwrap().employees.get(&id).cloned())
    }

    async fn save(&self, employee: &Employee) -> StoreResult<Employee> {
        let mut inner = self.inner.write().unwrap();
        let mut saved = employee.clone();
        if saved.id == 0 {
            saved.id = inner.next_id();
        }
        inner.employees.insert(saved.id, saved.clone());
        Ok(saved)
    }
}

#[async_trait]
impl CompanyStore for MemoryStores {
    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Company>> {
        Ok(self.inner.read().unwrap().companies.get(&id).cloned())
    }
}

#[async_trait]
impl LeaveTypeStore for MemoryStores {
    async fn find_by_id(&self, id: u64) -> StoreResult<Option<LeaveType>> {
        Ok(self.inner.read().unwrap().leave_types.get(&id).cloned())
    }
}

#[async_trait]
impl LeaveRequestStore for MemoryStores {
    async fn save(&self, request: &LeaveRequest) -> StoreResult<LeaveRequest> {
        let mut inner = self.inner.write().unwrap();
        let mut saved = request.clone();
        if saved.id == 0 {
            // Constraint mirror: no second non-rejected request may overlap
            // an existing one for the same employee.
            let conflicting = inner.leave_requests.values().any(|r| {
                r.employee_id == saved.employee_id
                    && r.status != LeaveStatus::Rejected
                    && saved.status != LeaveStatus::Rejected
                    && r.overlaps(saved.start_date, saved.end_date)
            });
            if conflicting {
                return Err(StoreError::DuplicateKey);
            }
            saved.id = inner.next_id();
        }
        inner.leave_requests.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn find_by_employee(&self, employee_id: u64) -> StoreResult<Vec<LeaveRequest>> {
        let inner = self.inner.read().unwrap();
        let mut requests: Vec<_> = inner
            .leave_requests
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        requests.sort_by_key(|r| r.id);
        Ok(requests)
    }
}

#[async_trait]
impl ShiftStore for MemoryStores {
    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Shift>> {
        Ok(self.inner.read().unwrap().shifts.get(&id).cloned())
    }

    async fn find_by_company(&self, company_id: u64) -> StoreResult<Vec<Shift>> {
        let inner = self.inner.read().unwrap();
        let mut shifts: Vec<_> = inner
            .shifts
            .values()
            .filter(|s| s.company_id == company_id)
            .cloned()
            .collect();
        shifts.sort_by_key(|s| s.id);
        Ok(shifts)
    }

    async fn save(&self, shift: &Shift) -> StoreResult<Shift> {
        let mut inner = self.inner.write().unwrap();
        let mut saved = shift.clone();
        if saved.id == 0 {
            saved.id = inner.next_id();
        }
        inner.shifts.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn delete(&self, id: u64) -> StoreResult<()> {
        self.inner.write().unwrap().shifts.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl EmployeeShiftStore for MemoryStores {
    async fn exists_for(&self, employee_id: u64, date: NaiveDate) -> StoreResult<bool> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .employee_shifts
            .values()
            .any(|a| a.employee_id == employee_id && a.assigned_date == date))
    }

    async fn find_by_employee(&self, employee_id: u64) -> StoreResult<Vec<EmployeeShift>> {
        let inner = self.inner.read().unwrap();
        let mut assignments: Vec<_> = inner
            .employee_shifts
            .values()
            .filter(|a| a.employee_id == employee_id)
            .cloned()
            .collect();
        assignments.sort_by_key(|a| a.assigned_date);
        Ok(assignments)
    }

    async fn save(&self, assignment: &EmployeeShift) -> StoreResult<EmployeeShift> {
        let mut inner = self.inner.write().unwrap();
        let mut saved = assignment.clone();
        if saved.id == 0 {
            // Constraint mirror of UNIQUE (employee_id, assigned_date)
            let booked = inner.employee_shifts.values().any(|a| {
                a.employee_id == saved.employee_id && a.assigned_date == saved.assigned_date
            });
            if booked {
                return Err(StoreError::DuplicateKey);
            }
            saved.id = inner.next_id();
        }
        inner.employee_shifts.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn delete_by_shift(&self, shift_id: u64) -> StoreResult<()> {
        self.inner
            .write()
            .unwrap()
            .employee_shifts
            .retain(|_, a| a.shift_id != shift_id);
        Ok(())
    }
}

#[async_trait]
impl BreakStore for MemoryStores {
    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Break>> {
        Ok(self.inner.read().unwrap().breaks.get(&id).cloned())
    }

    async fn find_by_shift(&self, shift_id: u64) -> StoreResult<Vec<Break>> {
        let inner = self.inner.read().unwrap();
        let mut breaks: Vec<_> = inner
            .breaks
            .values()
            .filter(|b| b.shift_id == shift_id)
            .cloned()
            .collect();
        breaks.sort_by_key(|b| b.id);
        Ok(breaks)
    }

    async fn save(&self, brk: &Break) -> StoreResult<Break> {
        let mut inner = self.inner.write().unwrap();
        let mut saved = brk.clone();
        if saved.id == 0 {
            saved.id = inner.next_id();
        }
        inner.breaks.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn delete(&self, id: u64) -> StoreResult<()> {
        self.inner.write().unwrap().breaks.remove(&id);
        Ok(())
    }

    async fn delete_by_shift(&self, shift_id: u64) -> StoreResult<()> {
        self.inner
            .write()
            .unwrap()
            .breaks
            .retain(|_, b| b.shift_id != shift_id);
        Ok(())
    }
}
