//! Shift roster: shift definitions, per-date assignments, and break
//! validation.
//!
//! Invariants enforced here: no two shifts of a company overlap in
//! time-of-day, at most one assignment per (employee, date), assignments
//! never cross companies, and a break nests inside its parent shift.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::info;

use crate::error::{HrmError, HrmResult};
use crate::model::{Break, EmployeeShift, Shift};
use crate::store::{
    BreakStore, CompanyStore, EmployeeShiftStore, EmployeeStore, ShiftStore, StoreError,
};

use super::EmployeeLocks;

#[derive(Clone)]
pub struct ShiftRoster {
    companies: Arc<dyn CompanyStore>,
    employees: Arc<dyn EmployeeStore>,
    shifts: Arc<dyn ShiftStore>,
    assignments: Arc<dyn EmployeeShiftStore>,
    breaks: Arc<dyn BreakStore>,
    locks: EmployeeLocks,
}

impl ShiftRoster {
    pub fn new(
        companies: Arc<dyn CompanyStore>,
        employees: Arc<dyn EmployeeStore>,
        shifts: Arc<dyn ShiftStore>,
        assignments: Arc<dyn EmployeeShiftStore>,
        breaks: Arc<dyn BreakStore>,
    ) -> Self {
        Self {
            companies,
            employees,
            shifts,
            assignments,
            breaks,
            locks: EmployeeLocks::default(),
        }
    }

    /// Reject the shift if its `[start, end)` interval overlaps any other
    /// shift of the company. `exclude_id` skips the shift being updated.
    async fn check_overlap(
        &self,
        company_id: u64,
        start_time: NaiveTime,
        end_time: NaiveTime,
        exclude_id: Option<u64>,
    ) -> HrmResult<()> {
        let existing = self.shifts.find_by_company(company_id).await?;
        let overlapping = existing
            .iter()
            .filter(|s| exclude_id != Some(s.id))
            .any(|s| s.overlaps(start_time, end_time));
        if overlapping {
            return Err(HrmError::conflict(
                "Shift times overlap with an existing shift",
            ));
        }
        Ok(())
    }

    pub async fn create_shift(
        &self,
        name: &str,
        start_time: NaiveTime,
        end_time: NaiveTime,
        company_id: u64,
    ) -> HrmResult<Shift> {
        self.companies
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| HrmError::not_found(format!("Company {company_id} not found")))?;

        self.check_overlap(company_id, start_time, end_time, None).await?;

        let shift = Shift {
            id: 0,
            company_id,
            name: name.to_string(),
            start_time,
            end_time,
        };
        Ok(self.shifts.save(&shift).await?)
    }

    pub async fn update_shift(
        &self,
        id: u64,
        name: &str,
        start_time: NaiveTime,
        end_time: NaiveTime,
        company_id: u64,
    ) -> HrmResult<Shift> {
        let mut shift = self
            .shifts
            .find_by_id(id)
            .await?
            .ok_or_else(|| HrmError::not_found(format!("Shift {id} not found")))?;

        self.companies
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| HrmError::not_found(format!("Company {company_id} not found")))?;

        self.check_overlap(company_id, start_time, end_time, Some(id)).await?;

        shift.name = name.to_string();
        shift.start_time = start_time;
        shift.end_time = end_time;
        shift.company_id = company_id;
        Ok(self.shifts.save(&shift).await?)
    }

    /// Delete a shift and its dependents. Assignments and breaks are removed
    /// by explicit store calls before the shift row itself.
    pub async fn delete_shift(&self, id: u64) -> HrmResult<()> {
        self.shifts
            .find_by_id(id)
            .await?
            .ok_or_else(|| HrmError::not_found(format!("Shift {id} not found")))?;

        self.assignments.delete_by_shift(id).await?;
        self.breaks.delete_by_shift(id).await?;
        self.shifts.delete(id).await?;

        info!(shift_id = id, "Shift deleted with its assignments and breaks");
        Ok(())
    }

    /// Assign a shift to an employee on a date, snapshotting the shift's
    /// current hours into the assignment.
    pub async fn assign_shift(
        &self,
        employee_id: u64,
        shift_id: u64,
        assigned_date: NaiveDate,
    ) -> HrmResult<EmployeeShift> {
        let lock = self.locks.lock_for(&employee_id.to_string());
        let _guard = lock.lock().await;

        let employee = self
            .employees
            .find_by_id(employee_id)
            .await?
            .ok_or_else(|| HrmError::not_found(format!("Employee {employee_id} not found")))?;

        let shift = self
            .shifts
            .find_by_id(shift_id)
            .await?
            .ok_or_else(|| HrmError::not_found(format!("Shift {shift_id} not found")))?;

        if self.assignments.exists_for(employee_id, assigned_date).await? {
            return Err(HrmError::conflict(format!(
                "Employee already has a shift on {assigned_date}"
            )));
        }

        if employee.company_id != shift.company_id {
            return Err(HrmError::conflict(
                "Employee and shift belong to different companies",
            ));
        }

        let assignment = EmployeeShift {
            id: 0,
            employee_id,
            shift_id,
            assigned_date,
            start_time: shift.start_time,
            end_time: shift.end_time,
        };

        let saved = self.assignments.save(&assignment).await.map_err(|e| match e {
            StoreError::DuplicateKey => HrmError::conflict(format!(
                "Employee already has a shift on {assigned_date}"
            )),
            other => HrmError::Store(other),
        })?;

        info!(
            employee_id,
            shift_id,
            date = %assigned_date,
            "Shift assigned"
        );
        Ok(saved)
    }

    /// Validate a break against its parent shift and return the persisted
    /// record with its duration fixed in minutes.
    async fn validated_break(
        &self,
        id: u64,
        name: &str,
        start_time: NaiveTime,
        end_time: NaiveTime,
        duration_minutes: Option<u32>,
        shift_id: u64,
    ) -> HrmResult<Break> {
        let shift = self
            .shifts
            .find_by_id(shift_id)
            .await?
            .ok_or_else(|| HrmError::not_found(format!("Shift {shift_id} not found")))?;

        if start_time < shift.start_time || end_time > shift.end_time {
            return Err(HrmError::invalid(
                "Break must fall within the shift time range",
            ));
        }

        if end_time <= start_time {
            return Err(HrmError::invalid("Break end time must be after start time"));
        }

        let computed = (end_time - start_time).num_minutes() as u32;
        if let Some(supplied) = duration_minutes {
            if supplied != computed {
                return Err(HrmError::invalid(
                    "Break duration does not match its time range",
                ));
            }
        }

        Ok(Break {
            id,
            shift_id,
            name: name.to_string(),
            start_time,
            end_time,
            duration_minutes: computed,
        })
    }

    pub async fn create_break(
        &self,
        name: &str,
        start_time: NaiveTime,
        end_time: NaiveTime,
        duration_minutes: Option<u32>,
        shift_id: u64,
    ) -> HrmResult<Break> {
        let brk = self
            .validated_break(0, name, start_time, end_time, duration_minutes, shift_id)
            .await?;
        Ok(self.breaks.save(&brk).await?)
    }

    pub async fn update_break(
        &self,
        id: u64,
        name: &str,
        start_time: NaiveTime,
        end_time: NaiveTime,
        duration_minutes: Option<u32>,
        shift_id: u64,
    ) -> HrmResult<Break> {
        self.breaks
            .find_by_id(id)
            .await?
            .ok_or_else(|| HrmError::not_found(format!("Break {id} not found")))?;

        let brk = self
            .validated_break(id, name, start_time, end_time, duration_minutes, shift_id)
            .await?;
        Ok(self.breaks.save(&brk).await?)
    }

    pub async fn delete_break(&self, id: u64) -> HrmResult<()> {
        self.breaks
            .find_by_id(id)
            .await?
            .ok_or_else(|| HrmError::not_found(format!("Break {id} not found")))?;
        self.breaks.delete(id).await?;
        Ok(())
    }

    pub async fn shifts_for_company(&self, company_id: u64) -> HrmResult<Vec<Shift>> {
        self.companies
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| HrmError::not_found(format!("Company {company_id} not found")))?;
        Ok(self.shifts.find_by_company(company_id).await?)
    }

    pub async fn breaks_for_shift(&self, shift_id: u64) -> HrmResult<Vec<Break>> {
        self.shifts
            .find_by_id(shift_id)
            .await?
            .ok_or_else(|| HrmError::not_found(format!("Shift {shift_id} not found")))?;
        Ok(self.breaks.find_by_shift(shift_id).await?)
    }

    pub async fn assignments_for_employee(&self, employee_id: u64) -> HrmResult<Vec<EmployeeShift>> {
        self.employees
            .find_by_id(employee_id)
            .await?
            .ok_or_else(|| HrmError::not_found(format!("Employee {employee_id} not found")))?;
        Ok(self.assignments.find_by_employee(employee_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Company;
    use crate::store::MemoryStores;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M:%S").unwrap()
    }

    struct Fixture {
        stores: Arc<MemoryStores>,
        roster: ShiftRoster,
        company: Company,
    }

    fn fixture() -> Fixture {
        let stores = Arc::new(MemoryStores::new());
        let company = stores.seed_company("Acme");
        let roster = ShiftRoster::new(
            stores.clone(),
            stores.clone(),
            stores.clone(),
            stores.clone(),
            stores.clone(),
        );
        Fixture {
            stores,
            roster,
            company,
        }
    }

    #[tokio::test]
    async fn overlapping_shift_in_same_company_is_a_conflict() {
        let f = fixture();
        f.roster
            .create_shift("Morning", time("09:00:00"), time("17:00:00"), f.company.id)
            .await
            .unwrap();

        let err = f
            .roster
            .create_shift("Late", time("16:00:00"), time("22:00:00"), f.company.id)
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::Conflict(_)));
    }

    #[tokio::test]
    async fn adjacent_shifts_are_allowed() {
        let f = fixture();
        f.roster
            .create_shift("Morning", time("09:00:00"), time("17:00:00"), f.company.id)
            .await
            .unwrap();
        f.roster
            .create_shift("Evening", time("17:00:00"), time("23:00:00"), f.company.id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn same_hours_in_another_company_are_allowed() {
        let f = fixture();
        let other = f.stores.seed_company("Globex");
        f.roster
            .create_shift("Morning", time("09:00:00"), time("17:00:00"), f.company.id)
            .await
            .unwrap();
        f.roster
            .create_shift("Morning", time("09:00:00"), time("17:00:00"), other.id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_company_is_not_found() {
        let f = fixture();
        let err = f
            .roster
            .create_shift("Morning", time("09:00:00"), time("17:00:00"), 9999)
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_excludes_itself_from_the_overlap_check() {
        let f = fixture();
        let shift = f
            .roster
            .create_shift("Morning", time("09:00:00"), time("17:00:00"), f.company.id)
            .await
            .unwrap();

        // Shrinking the same shift must not collide with itself
        let updated = f
            .roster
            .update_shift(shift.id, "Morning", time("10:00:00"), time("16:00:00"), f.company.id)
            .await
            .unwrap();
        assert_eq!(updated.start_time, time("10:00:00"));
    }

    #[tokio::test]
    async fn update_still_collides_with_other_shifts() {
        let f = fixture();
        f.roster
            .create_shift("Morning", time("09:00:00"), time("17:00:00"), f.company.id)
            .await
            .unwrap();
        let evening = f
            .roster
            .create_shift("Evening", time("17:00:00"), time("23:00:00"), f.company.id)
            .await
            .unwrap();

        let err = f
            .roster
            .update_shift(evening.id, "Evening", time("16:00:00"), time("23:00:00"), f.company.id)
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::Conflict(_)));
    }

    #[tokio::test]
    async fn assignment_snapshots_the_shift_hours() {
        let f = fixture();
        let employee = f.stores.seed_employee("E1", f.company.id, 0);
        let shift = f
            .roster
            .create_shift("Morning", time("09:00:00"), time("17:00:00"), f.company.id)
            .await
            .unwrap();

        let assignment = f
            .roster
            .assign_shift(employee.id, shift.id, date("2025-03-01"))
            .await
            .unwrap();
        assert_eq!(assignment.start_time, time("09:00:00"));
        assert_eq!(assignment.end_time, time("17:00:00"));

        // Editing the shift afterwards leaves the snapshot alone
        f.roster
            .update_shift(shift.id, "Morning", time("10:00:00"), time("18:00:00"), f.company.id)
            .await
            .unwrap();
        let assignments = f
            .roster
            .assignments_for_employee(employee.id)
            .await
            .unwrap();
        assert_eq!(assignments[0].start_time, time("09:00:00"));
    }

    #[tokio::test]
    async fn double_booking_a_date_is_a_conflict() {
        let f = fixture();
        let employee = f.stores.seed_employee("E1", f.company.id, 0);
        let morning = f
            .roster
            .create_shift("Morning", time("09:00:00"), time("17:00:00"), f.company.id)
            .await
            .unwrap();
        let evening = f
            .roster
            .create_shift("Evening", time("17:00:00"), time("23:00:00"), f.company.id)
            .await
            .unwrap();

        f.roster
            .assign_shift(employee.id, morning.id, date("2025-03-01"))
            .await
            .unwrap();

        let err = f
            .roster
            .assign_shift(employee.id, evening.id, date("2025-03-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::Conflict(_)));

        // A different date is fine
        f.roster
            .assign_shift(employee.id, evening.id, date("2025-03-02"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn cross_company_assignment_is_a_conflict() {
        let f = fixture();
        let other = f.stores.seed_company("Globex");
        let employee = f.stores.seed_employee("E1", other.id, 0);
        let shift = f
            .roster
            .create_shift("Morning", time("09:00:00"), time("17:00:00"), f.company.id)
            .await
            .unwrap();

        let err = f
            .roster
            .assign_shift(employee.id, shift.id, date("2025-03-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleting_a_shift_removes_assignments_and_breaks() {
        let f = fixture();
        let employee = f.stores.seed_employee("E1", f.company.id, 0);
        let shift = f
            .roster
            .create_shift("Morning", time("09:00:00"), time("17:00:00"), f.company.id)
            .await
            .unwrap();
        f.roster
            .assign_shift(employee.id, shift.id, date("2025-03-01"))
            .await
            .unwrap();
        f.roster
            .create_break("Lunch", time("12:00:00"), time("12:30:00"), None, shift.id)
            .await
            .unwrap();

        f.roster.delete_shift(shift.id).await.unwrap();

        let assignments = f
            .roster
            .assignments_for_employee(employee.id)
            .await
            .unwrap();
        assert!(assignments.is_empty());
        let err = f.roster.breaks_for_shift(shift.id).await.unwrap_err();
        assert!(matches!(err, HrmError::NotFound(_)));

        // The freed date can be booked again
        let replacement = f
            .roster
            .create_shift("Morning", time("09:00:00"), time("17:00:00"), f.company.id)
            .await
            .unwrap();
        f.roster
            .assign_shift(employee.id, replacement.id, date("2025-03-01"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn break_duration_is_computed_when_omitted() {
        let f = fixture();
        let shift = f
            .roster
            .create_shift("Morning", time("09:00:00"), time("17:00:00"), f.company.id)
            .await
            .unwrap();

        let brk = f
            .roster
            .create_break("Lunch", time("12:00:00"), time("12:30:00"), None, shift.id)
            .await
            .unwrap();
        assert_eq!(brk.duration_minutes, 30);
    }

    #[tokio::test]
    async fn supplied_duration_must_match_the_range() {
        let f = fixture();
        let shift = f
            .roster
            .create_shift("Morning", time("09:00:00"), time("17:00:00"), f.company.id)
            .await
            .unwrap();

        f.roster
            .create_break("Lunch", time("12:00:00"), time("12:30:00"), Some(30), shift.id)
            .await
            .unwrap();

        let err = f
            .roster
            .create_break("Tea", time("15:00:00"), time("15:15:00"), Some(20), shift.id)
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn break_outside_the_shift_is_invalid() {
        let f = fixture();
        let shift = f
            .roster
            .create_shift("Morning", time("09:00:00"), time("17:00:00"), f.company.id)
            .await
            .unwrap();

        // Starts before the shift starts
        let err = f
            .roster
            .create_break("Early", time("08:30:00"), time("09:30:00"), None, shift.id)
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::InvalidArgument(_)));

        // Ends after the shift ends
        let err = f
            .roster
            .create_break("Late", time("16:30:00"), time("17:30:00"), None, shift.id)
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn zero_length_break_is_invalid() {
        let f = fixture();
        let shift = f
            .roster
            .create_shift("Morning", time("09:00:00"), time("17:00:00"), f.company.id)
            .await
            .unwrap();

        let err = f
            .roster
            .create_break("Nothing", time("12:00:00"), time("12:00:00"), None, shift.id)
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn update_break_revalidates_against_the_shift() {
        let f = fixture();
        let shift = f
            .roster
            .create_shift("Morning", time("09:00:00"), time("17:00:00"), f.company.id)
            .await
            .unwrap();
        let brk = f
            .roster
            .create_break("Lunch", time("12:00:00"), time("12:30:00"), None, shift.id)
            .await
            .unwrap();

        let updated = f
            .roster
            .update_break(brk.id, "Lunch", time("13:00:00"), time("13:45:00"), Some(45), shift.id)
            .await
            .unwrap();
        assert_eq!(updated.duration_minutes, 45);

        let err = f
            .roster
            .update_break(brk.id, "Lunch", time("16:00:00"), time("18:00:00"), None, shift.id)
            .await
            .unwrap_err();
        assert!(matches!(err, HrmError::InvalidArgument(_)));
    }
}
