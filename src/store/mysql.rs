//! MySQL store backend.
//!
//! Queries are bound at runtime so the crate builds without a live database.
//! Uniqueness is enforced by the schema: `UNIQUE (employee_id, assigned_date)`
//! on `employee_shifts` and an overlap trigger on `leave_requests`; violations
//! surface as MySQL error class 23000 and map to `StoreError::DuplicateKey`.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::model::{Break, Company, Employee, EmployeeShift, LeaveRequest, LeaveType, Shift};

use super::{
    BreakStore, CodeLookup, CompanyStore, EmployeeShiftStore, EmployeeStore, LeaveRequestStore,
    LeaveTypeStore, ShiftStore, StoreError, StoreResult,
};

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            // Integrity constraint violation (duplicate key and friends)
            if db_err.code().as_deref() == Some("23000") {
                return StoreError::DuplicateKey;
            }
        }
        StoreError::Database(e.to_string())
    }
}

#[derive(Clone)]
pub struct MySqlStores {
    pool: MySqlPool,
}

impl MySqlStores {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const EMPLOYEE_COLUMNS: &str =
    "id, employee_number, first_name, last_name, email, company_id, leave_balance, hire_date";

const LEAVE_REQUEST_COLUMNS: &str = "id, employee_id, leave_type_id, start_date, end_date, \
     total_days, status, employee_note, manager_note, approved_by, approved_at";

#[async_trait]
impl EmployeeStore for MySqlStores {
    async fn find_by_code(&self, code: &str, lookup: CodeLookup) -> StoreResult<Option<Employee>> {
        // Exact match first; binary comparison regardless of column collation.
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE BINARY employee_number = ? LIMIT 1"
        );
        let exact = sqlx::query_as::<_, Employee>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        if exact.is_some() || lookup == CodeLookup::Exact {
            return Ok(exact);
        }

        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees \
             WHERE LOWER(employee_number) = LOWER(?) LIMIT 1"
        );
        Ok(sqlx::query_as::<_, Employee>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?");
        Ok(sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save(&self, employee: &Employee) -> StoreResult<Employee> {
        let mut saved = employee.clone();
        if saved.id == 0 {
            let result = sqlx::query(
                "INSERT INTO employees \
                 (employee_number, first_name, last_name, email, company_id, leave_balance, hire_date) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&saved.employee_number)
            .bind(&saved.first_name)
            .bind(&saved.last_name)
            .bind(&saved.email)
            .bind(saved.company_id)
            .bind(saved.leave_balance)
            .bind(saved.hire_date)
            .execute(&self.pool)
            .await?;
            saved.id = result.last_insert_id();
        } else {
            sqlx::query(
                "UPDATE employees SET employee_number = ?, first_name = ?, last_name = ?, \
                 email = ?, company_id = ?, leave_balance = ?, hire_date = ? WHERE id = ?",
            )
            .bind(&saved.employee_number)
            .bind(&saved.first_name)
            .bind(&saved.last_name)
            .bind(&saved.email)
            .bind(saved.company_id)
            .bind(saved.leave_balance)
            .bind(saved.hire_date)
            .bind(saved.id)
            .execute(&self.pool)
            .await?;
        }
        Ok(saved)
    }
}

#[async_trait]
impl CompanyStore for MySqlStores {
    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Company>> {
        Ok(sqlx::query_as::<_, Company>("SELECT id, name FROM companies WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl LeaveTypeStore for MySqlStores {
    async fn find_by_id(&self, id: u64) -> StoreResult<Option<LeaveType>> {
        Ok(sqlx::query_as::<_, LeaveType>(
            "SELECT id, company_id, name, max_days, is_paid FROM leave_types WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }
}

#[async_trait]
impl LeaveRequestStore for MySqlStores {
    async fn save(&self, request: &LeaveRequest) -> StoreResult<LeaveRequest> {
        let mut saved = request.clone();
        if saved.id == 0 {
            let result = sqlx::query(
                "INSERT INTO leave_requests \
                 (employee_id, leave_type_id, start_date, end_date, total_days, status, \
                  employee_note, manager_note, approved_by, approved_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(saved.employee_id)
            .bind(saved.leave_type_id)
            .bind(saved.start_date)
            .bind(saved.end_date)
            .bind(saved.total_days)
            .bind(saved.status)
            .bind(&saved.employee_note)
            .bind(&saved.manager_note)
            .bind(saved.approved_by)
            .bind(saved.approved_at)
            .execute(&self.pool)
            .await?;
            saved.id = result.last_insert_id();
        } else {
            sqlx::query(
                "UPDATE leave_requests SET status = ?, manager_note = ?, approved_by = ?, \
                 approved_at = ? WHERE id = ?",
            )
            .bind(saved.status)
            .bind(&saved.manager_note)
            .bind(saved.approved_by)
            .bind(saved.approved_at)
            .bind(saved.id)
            .execute(&self.pool)
            .await?;
        }
        Ok(saved)
    }

    async fn find_by_employee(&self, employee_id: u64) -> StoreResult<Vec<LeaveRequest>> {
        let sql = format!(
            "SELECT {LEAVE_REQUEST_COLUMNS} FROM leave_requests WHERE employee_id = ? ORDER BY id"
        );
        Ok(sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await?)
    }
}

#[async_trait]
impl ShiftStore for MySqlStores {
    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Shift>> {
        Ok(sqlx::query_as::<_, Shift>(
            "SELECT id, company_id, name, start_time, end_time FROM shifts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_by_company(&self, company_id: u64) -> StoreResult<Vec<Shift>> {
        Ok(sqlx::query_as::<_, Shift>(
            "SELECT id, company_id, name, start_time, end_time \
             FROM shifts WHERE company_id = ? ORDER BY id",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn save(&self, shift: &Shift) -> StoreResult<Shift> {
        let mut saved = shift.clone();
        if saved.id == 0 {
            let result = sqlx::query(
                "INSERT INTO shifts (company_id, name, start_time, end_time) VALUES (?, ?, ?, ?)",
            )
            .bind(saved.company_id)
            .bind(&saved.name)
            .bind(saved.start_time)
            .bind(saved.end_time)
            .execute(&self.pool)
            .await?;
            saved.id = result.last_insert_id();
        } else {
            sqlx::query(
                "UPDATE shifts SET company_id = ?, name = ?, start_time = ?, end_time = ? \
                 WHERE id = ?",
            )
            .bind(saved.company_id)
            .bind(&saved.name)
            .bind(saved.start_time)
            .bind(saved.end_time)
            .bind(saved.id)
            .execute(&self.pool)
            .await?;
        }
        Ok(saved)
    }

    async fn delete(&self, id: u64) -> StoreResult<()> {
        sqlx::query("DELETE FROM shifts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl EmployeeShiftStore for MySqlStores {
    async fn exists_for(&self, employee_id: u64, date: NaiveDate) -> StoreResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM employee_shifts WHERE employee_id = ? AND assigned_date = ?",
        )
        .bind(employee_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn find_by_employee(&self, employee_id: u64) -> StoreResult<Vec<EmployeeShift>> {
        Ok(sqlx::query_as::<_, EmployeeShift>(
            "SELECT id, employee_id, shift_id, assigned_date, start_time, end_time \
             FROM employee_shifts WHERE employee_id = ? ORDER BY assigned_date",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn save(&self, assignment: &EmployeeShift) -> StoreResult<EmployeeShift> {
        let mut saved = assignment.clone();
        if saved.id == 0 {
            let result = sqlx::query(
                "INSERT INTO employee_shifts \
                 (employee_id, shift_id, assigned_date, start_time, end_time) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(saved.employee_id)
            .bind(saved.shift_id)
            .bind(saved.assigned_date)
            .bind(saved.start_time)
            .bind(saved.end_time)
            .execute(&self.pool)
            .await?;
            saved.id = result.last_insert_id();
        } else {
            sqlx::query(
                "UPDATE employee_shifts SET employee_id = ?, shift_id = ?, assigned_date = ?, \
                 start_time = ?, end_time = ? WHERE id = ?",
            )
            .bind(saved.employee_id)
            .bind(saved.shift_id)
            .bind(saved.assigned_date)
            .bind(saved.start_time)
            .bind(saved.end_time)
            .bind(saved.id)
            .execute(&self.pool)
            .await?;
        }
        Ok(saved)
    }

    async fn delete_by_shift(&self, shift_id: u64) -> StoreResult<()> {
        sqlx::query("DELETE FROM employee_shifts WHERE shift_id = ?")
            .bind(shift_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl BreakStore for MySqlStores {
    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Break>> {
        Ok(sqlx::query_as::<_, Break>(
            "SELECT id, shift_id, name, start_time, end_time, duration_minutes \
             FROM breaks WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_by_shift(&self, shift_id: u64) -> StoreResult<Vec<Break>> {
        Ok(sqlx::query_as::<_, Break>(
            "SELECT id, shift_id, name, start_time, end_time, duration_minutes \
             FROM breaks WHERE shift_id = ? ORDER BY id",
        )
        .bind(shift_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn save(&self, brk: &Break) -> StoreResult<Break> {
        let mut saved = brk.clone();
        if saved.id == 0 {
            let result = sqlx::query(
                "INSERT INTO breaks (shift_id, name, start_time, end_time, duration_minutes) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(saved.shift_id)
            .bind(&saved.name)
            .bind(saved.start_time)
            .bind(saved.end_time)
            .bind(saved.duration_minutes)
            .execute(&self.pool)
            .await?;
            saved.id = result.last_insert_id();
        } else {
            sqlx::query(
                "UPDATE breaks SET shift_id = ?, name = ?, start_time = ?, end_time = ?, \
                 duration_minutes = ? WHERE id = ?",
            )
            .bind(saved.shift_id)
            .bind(&saved.name)
            .bind(saved.start_time)
            .bind(saved.end_time)
            .bind(saved.duration_minutes)
            .bind(saved.id)
            .execute(&self.pool)
            .await?;
        }
        Ok(saved)
    }

    async fn delete(&self, id: u64) -> StoreResult<()> {
        sqlx::query("DELETE FROM breaks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_by_shift(&self, shift_id: u64) -> StoreResult<()> {
        sqlx::query("DELETE FROM breaks WHERE shift_id = ?")
            .bind(shift_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
