use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveType {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 10)]
    pub company_id: u64,

    #[schema(example = "annual")]
    pub name: String,

    /// Upper bound advertised for this type. Not enforced by the ledger.
    #[schema(example = 20)]
    pub max_days: u32,

    pub is_paid: bool,
}

/// Approval workflow state. Both approved and rejected are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LeaveStatus::Approved | LeaveStatus::Rejected)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": 1000,
        "leave_type_id": 1,
        "start_date": "2025-02-03",
        "end_date": "2025-02-07",
        "total_days": 5,
        "status": "pending",
        "employee_note": "family visit",
        "manager_note": null,
        "approved_by": null,
        "approved_at": null
    })
)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub employee_id: u64,

    #[schema(example = 1)]
    pub leave_type_id: u64,

    #[schema(example = "2025-02-03", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2025-02-07", value_type = String, format = "date")]
    pub end_date: NaiveDate,

    /// Working-day count over the interval, fixed at submission.
    #[schema(example = 5)]
    pub total_days: u32,

    #[schema(example = "pending")]
    pub status: LeaveStatus,

    pub employee_note: Option<String>,

    pub manager_note: Option<String>,

    /// Employee id of the approver (or rejecter).
    pub approved_by: Option<u64>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub approved_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    /// Inclusive date-range intersection test.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        !(end < self.start_date || start > self.end_date)
    }
}
