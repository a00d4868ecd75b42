use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_number": "EMP-001",
        "first_name": "John",
        "last_name": "Doe",
        "email": "john.doe@company.com",
        "company_id": 10,
        "leave_balance": 20,
        "hire_date": "2024-01-01"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    /// Business key. Unique, matched case-insensitively on lookup.
    #[schema(example = "EMP-001")]
    pub employee_number: String,

    #[schema(example = "John")]
    pub first_name: String,

    #[schema(example = "Doe")]
    pub last_name: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    #[schema(example = 10)]
    pub company_id: u64,

    /// Remaining paid leave days. Consumed only when a request is approved.
    #[schema(example = 20)]
    pub leave_balance: u32,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,
}
