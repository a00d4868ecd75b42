use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "company_id": 10,
        "name": "Morning",
        "start_time": "09:00:00",
        "end_time": "17:00:00"
    })
)]
pub struct Shift {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 10)]
    pub company_id: u64,

    #[schema(example = "Morning")]
    pub name: String,

    #[schema(example = "09:00:00", value_type = String)]
    pub start_time: NaiveTime,

    #[schema(example = "17:00:00", value_type = String)]
    pub end_time: NaiveTime,
}

impl Shift {
    /// Half-open `[start, end)` time-of-day intersection test.
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.start_time < end && start < self.end_time
    }
}

/// A shift assigned to an employee on a calendar date. Start/end times are a
/// snapshot of the shift at assignment time; later shift edits do not
/// retroactively change past assignments.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct EmployeeShift {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub employee_id: u64,

    #[schema(example = 1)]
    pub shift_id: u64,

    #[schema(example = "2025-03-01", value_type = String, format = "date")]
    pub assigned_date: NaiveDate,

    #[schema(example = "09:00:00", value_type = String)]
    pub start_time: NaiveTime,

    #[schema(example = "17:00:00", value_type = String)]
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Break {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1)]
    pub shift_id: u64,

    #[schema(example = "Lunch")]
    pub name: String,

    #[schema(example = "12:00:00", value_type = String)]
    pub start_time: NaiveTime,

    #[schema(example = "12:30:00", value_type = String)]
    pub end_time: NaiveTime,

    /// Minutes between start and end.
    #[schema(example = 30)]
    pub duration_minutes: u32,
}
