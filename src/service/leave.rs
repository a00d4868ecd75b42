//! Leave ledger: request submission and the approval workflow.
//!
//! Owns every mutation of an employee's leave balance and request set. The
//! balance is only ever decremented on the pending-to-approved transition,
//! and both terminal states reject re-entry.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::calendar::WorkCalendar;
use crate::error::{HrmError, HrmResult};
use crate::model::{Employee, LeaveRequest, LeaveStatus};
use crate::store::{CodeLookup, EmployeeStore, LeaveRequestStore, LeaveTypeStore, StoreError};

use super::EmployeeLocks;

#[derive(Clone)]
pub struct LeaveLedger {
    employees: Arc<dyn EmployeeStore>,
    leave_types: Arc<dyn LeaveTypeStore>,
    requests: Arc<dyn LeaveRequestStore>,
    calendar: WorkCalendar,
    locks: EmployeeLocks,
}

impl LeaveLedger {
    pub fn new(
        employees: Arc<dyn EmployeeStore>,
        leave_types: Arc<dyn LeaveTypeStore>,
        requests: Arc<dyn LeaveRequestStore>,
        calendar: WorkCalendar,
    ) -> Self {
        Self {
            employees,
            leave_types,
            requests,
            calendar,
            locks: EmployeeLocks::default(),
        }
    }

    async fn resolve_employee(&self, employee_number: &str) -> HrmResult<Employee> {
        self.employees
            .find_by_code(employee_number, CodeLookup::CaseInsensitive)
            .await?
            .ok_or_else(|| HrmError::not_found(format!("Employee {employee_number} not found")))
    }

    /// Submit a new leave request. The request is persisted as pending; the
    /// balance is not touched until approval.
    pub async fn submit_leave_request(
        &self,
        employee_number: &str,
        leave_type_id: u64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        employee_note: Option<String>,
    ) -> HrmResult<LeaveRequest> {
        let lock = self.locks.lock_for(&employee_number.to_lowercase());
        let _guard = lock.lock().await;

        let employee = self.resolve_employee(employee_number).await?;

        let leave_type = self
            .leave_types
            .find_by_id(leave_type_id)
            .await?
            .ok_or_else(|| HrmError::invalid(format!("Unknown leave type {leave_type_id}")))?;

        if end_date < start_date {
            return Err(HrmError::invalid("start_date cannot be after end_date"));
        }

        let history = self.requests.find_by_employee(employee.id).await?;
        let overlapping = history
            .iter()
            .any(|r| r.status != LeaveStatus::Rejected && r.overlaps(start_date, end_date));
        if overlapping {
            return Err(HrmError::conflict(
                "A leave request already exists in this range",
            ));
        }

        let total_days = self.calendar.working_days(start_date, end_date);

        if employee.leave_balance < total_days {
            return Err(HrmError::conflict("Insufficient leave balance"));
        }

        let request = LeaveRequest {
            id: 0,
            employee_id: employee.id,
            leave_type_id: leave_type.id,
            start_date,
            end_date,
            total_days,
            status: LeaveStatus::Pending,
            employee_note,
            manager_note: None,
            approved_by: None,
            approved_at: None,
        };

        let saved = self.requests.save(&request).await.map_err(|e| match e {
            StoreError::DuplicateKey => {
                HrmError::conflict("A leave request already exists in this range")
            }
            other => HrmError::Store(other),
        })?;

        info!(
            employee = %employee.employee_number,
            total_days,
            "Leave request submitted"
        );
        Ok(saved)
    }

    /// Approve the request of `employee_number` that starts exactly on
    /// `start_date`, decrementing the balance by its stored day count.
    pub async fn approve_leave_request(
        &self,
        employee_number: &str,
        start_date: NaiveDate,
        approver_number: &str,
    ) -> HrmResult<()> {
        let lock = self.locks.lock_for(&employee_number.to_lowercase());
        let _guard = lock.lock().await;

        let mut employee = self.resolve_employee(employee_number).await?;
        let approver = self
            .employees
            .find_by_code(approver_number, CodeLookup::CaseInsensitive)
            .await?
            .ok_or_else(|| HrmError::not_found(format!("Approver {approver_number} not found")))?;

        let history = self.requests.find_by_employee(employee.id).await?;
        let mut request = history
            .into_iter()
            .find(|r| r.start_date == start_date)
            .ok_or_else(|| {
                HrmError::not_found(format!("No leave request starting on {start_date}"))
            })?;

        match request.status {
            LeaveStatus::Approved => {
                return Err(HrmError::conflict("Leave request is already approved"));
            }
            LeaveStatus::Rejected => {
                return Err(HrmError::conflict("Leave request is already rejected"));
            }
            LeaveStatus::Pending => {}
        }

        // Balance may have been spent by another approval since submission.
        if employee.leave_balance < request.total_days {
            return Err(HrmError::conflict("Insufficient leave balance"));
        }

        request.status = LeaveStatus::Approved;
        request.approved_by = Some(approver.id);
        request.approved_at = Some(Utc::now());
        employee.leave_balance -= request.total_days;

        self.requests.save(&request).await?;
        self.employees.save(&employee).await?;

        info!(
            employee = %employee.employee_number,
            approver = %approver.employee_number,
            total_days = request.total_days,
            balance = employee.leave_balance,
            "Leave request approved"
        );
        Ok(())
    }

    /// Reject the employee's first pending request. The balance is untouched.
    pub async fn reject_leave_request(
        &self,
        employee_number: &str,
        approver_number: &str,
        manager_note: Option<String>,
    ) -> HrmResult<()> {
        let lock = self.locks.lock_for(&employee_number.to_lowercase());
        let _guard = lock.lock().await;

        let employee = self.resolve_employee(employee_number).await?;
        let approver = self
            .employees
            .find_by_code(approver_number, CodeLookup::CaseInsensitive)
            .await?
            .ok_or_else(|| HrmError::not_found(format!("Approver {approver_number} not found")))?;

        let history = self.requests.find_by_employee(employee.id).await?;
        let mut request = history
            .into_iter()
            .find(|r| r.status == LeaveStatus::Pending)
            .ok_or_else(|| {
                HrmError::not_found(format!(
                    "No pending leave request for employee {employee_number}"
                ))
            })?;

        request.status = LeaveStatus::Rejected;
        request.approved_by = Some(approver.id);
        request.approved_at = Some(Utc::now());
        request.manager_note = manager_note;

        self.requests.save(&request).await?;

        info!(
            employee = %employee.employee_number,
            rejecter = %approver.employee_number,
            "Leave request rejected"
        );
        Ok(())
    }

    /// Leave history for an employee, resolved by business key.
    pub async fn requests_for_employee(
        &self,
        employee_number: &str,
    ) -> HrmResult<Vec<LeaveRequest>> {
        let employee = self.resolve_employee(employee_number).await?;
        Ok(self.requests.find_by_employee(employee.id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStores;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    struct Fixture {
        stores: Arc<MemoryStores>,
        ledger: LeaveLedger,
        leave_type_id: u64,
    }

    fn fixture(balance: u32) -> Fixture {
        let stores = Arc::new(MemoryStores::new());
        let company = stores.seed_company("Acme");
        stores.seed_employee("E001", company.id, balance);
        stores.seed_employee("M001", company.id, 0);
        let leave_type = stores.seed_leave_type(company.id, "annual", 20, true);
        let ledger = LeaveLedger::new(
            stores.clone(),
            stores.clone(),
            stores.clone(),
            WorkCalendar::with_default_holidays(),
        );
        Fixture {
            stores,
            ledger,
            leave_type_id: leave_type.id,
        }
    }

    async fn balance_of(stores: &Arc<MemoryStores>, number: &str) -> u32 {
        stores
            .find_by_code(number, CodeLookup::Exact)
            .await
            .unwrap()
            .unwrap()
            .leave_balance
    }

    #[tokio::test]
    async fn submission_computes_working_days_and_stays_pending() {
        let f = fixture(10);
        // Mon..Fri, no holidays
        let request = f
            .ledger
            .submit_leave_request(
                "E001",
                f.leave_type_id,
                date("2025-02-03"),
                date("2025-02-07"),
                Some("family visit".into()),
            )
            .await
            .unwrap();

        assert_eq!(request.total_days, 5);
        assert_eq!(request.status, LeaveStatus::Pending);
        // Balance untouched until approval
        assert_eq!(balance_of(&f.stores, "E001").await, 10);
    }

    #[tokio::test]
    async fn lookup_falls_back_to_case_insensitive() {
        let f = fixture(10);
        let request = f
            .ledger
            .submit_leave_request("e001", f.leave_type_id, date("2025-02-03"), date("2025-02-03"), None)
            .await
            .unwrap();
        assert_eq!(request.total_days, 1);
    }

    #[tokio::test]
    async fn unknown_employee_is_not_found() {
        let f = fixture(10);
        let err = f
            .ledger
            .submit_leave_request("E999", f.leave_type_id, date("2025-02-03"), date("2025-02-03"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::NotFound(_)));
    }

    #[tokio::test]
    async fn unknown_leave_type_is_invalid() {
        let f = fixture(10);
        let err = f
            .ledger
            .submit_leave_request("E001", 9999, date("2025-02-03"), date("2025-02-03"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn reversed_dates_are_invalid() {
        let f = fixture(10);
        let err = f
            .ledger
            .submit_leave_request("E001", f.leave_type_id, date("2025-02-07"), date("2025-02-03"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn overlapping_request_is_a_conflict() {
        let f = fixture(10);
        f.ledger
            .submit_leave_request("E001", f.leave_type_id, date("2025-02-03"), date("2025-02-07"), None)
            .await
            .unwrap();

        let err = f
            .ledger
            .submit_leave_request("E001", f.leave_type_id, date("2025-02-05"), date("2025-02-06"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::Conflict(_)));
    }

    #[tokio::test]
    async fn rejected_requests_do_not_block_the_range() {
        let f = fixture(10);
        f.ledger
            .submit_leave_request("E001", f.leave_type_id, date("2025-02-03"), date("2025-02-07"), None)
            .await
            .unwrap();
        f.ledger
            .reject_leave_request("E001", "M001", Some("coverage gap".into()))
            .await
            .unwrap();

        // Same range again is fine once the first request is rejected
        f.ledger
            .submit_leave_request("E001", f.leave_type_id, date("2025-02-03"), date("2025-02-07"), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn insufficient_balance_is_a_conflict() {
        let f = fixture(3);
        let err = f
            .ledger
            .submit_leave_request("E001", f.leave_type_id, date("2025-02-03"), date("2025-02-07"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::Conflict(_)));
    }

    #[tokio::test]
    async fn approval_decrements_balance_once() {
        let f = fixture(10);
        f.ledger
            .submit_leave_request("E001", f.leave_type_id, date("2025-02-03"), date("2025-02-07"), None)
            .await
            .unwrap();

        f.ledger
            .approve_leave_request("E001", date("2025-02-03"), "M001")
            .await
            .unwrap();

        assert_eq!(balance_of(&f.stores, "E001").await, 5);

        let requests = f.ledger.requests_for_employee("E001").await.unwrap();
        assert_eq!(requests[0].status, LeaveStatus::Approved);
        assert!(requests[0].approved_by.is_some());
        assert!(requests[0].approved_at.is_some());

        // Terminal state: approving again is rejected and the balance holds
        let err = f
            .ledger
            .approve_leave_request("E001", date("2025-02-03"), "M001")
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::Conflict(_)));
        assert_eq!(balance_of(&f.stores, "E001").await, 5);
    }

    #[tokio::test]
    async fn approval_requires_a_matching_start_date() {
        let f = fixture(10);
        f.ledger
            .submit_leave_request("E001", f.leave_type_id, date("2025-02-03"), date("2025-02-07"), None)
            .await
            .unwrap();

        let err = f
            .ledger
            .approve_leave_request("E001", date("2025-02-04"), "M001")
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::NotFound(_)));
    }

    #[tokio::test]
    async fn approval_revalidates_balance_against_stored_days() {
        // Two 5-day requests pass submission against a balance of 8, but the
        // second approval must fail once the first has spent 5.
        let f = fixture(8);
        f.ledger
            .submit_leave_request("E001", f.leave_type_id, date("2025-02-03"), date("2025-02-07"), None)
            .await
            .unwrap();
        f.ledger
            .submit_leave_request("E001", f.leave_type_id, date("2025-03-03"), date("2025-03-07"), None)
            .await
            .unwrap();

        f.ledger
            .approve_leave_request("E001", date("2025-02-03"), "M001")
            .await
            .unwrap();
        assert_eq!(balance_of(&f.stores, "E001").await, 3);

        let err = f
            .ledger
            .approve_leave_request("E001", date("2025-03-03"), "M001")
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::Conflict(_)));
        assert_eq!(balance_of(&f.stores, "E001").await, 3);
    }

    #[tokio::test]
    async fn unknown_approver_is_not_found() {
        let f = fixture(10);
        f.ledger
            .submit_leave_request("E001", f.leave_type_id, date("2025-02-03"), date("2025-02-07"), None)
            .await
            .unwrap();

        let err = f
            .ledger
            .approve_leave_request("E001", date("2025-02-03"), "M999")
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::NotFound(_)));
    }

    #[tokio::test]
    async fn rejection_keeps_the_balance_and_stores_the_note() {
        let f = fixture(10);
        f.ledger
            .submit_leave_request("E001", f.leave_type_id, date("2025-02-03"), date("2025-02-07"), None)
            .await
            .unwrap();

        f.ledger
            .reject_leave_request("E001", "M001", Some("busy period".into()))
            .await
            .unwrap();

        assert_eq!(balance_of(&f.stores, "E001").await, 10);
        let requests = f.ledger.requests_for_employee("E001").await.unwrap();
        assert_eq!(requests[0].status, LeaveStatus::Rejected);
        assert_eq!(requests[0].manager_note.as_deref(), Some("busy period"));
        assert!(requests[0].approved_by.is_some());
    }

    #[tokio::test]
    async fn rejection_without_pending_request_is_not_found() {
        let f = fixture(10);
        let err = f
            .ledger
            .reject_leave_request("E001", "M001", None)
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::NotFound(_)));

        // Terminal requests do not qualify either
        f.ledger
            .submit_leave_request("E001", f.leave_type_id, date("2025-02-03"), date("2025-02-07"), None)
            .await
            .unwrap();
        f.ledger
            .approve_leave_request("E001", date("2025-02-03"), "M001")
            .await
            .unwrap();
        let err = f
            .ledger
            .reject_leave_request("E001", "M001", None)
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::NotFound(_)));
    }
}
