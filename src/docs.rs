use crate::api::leave::{ApproveLeave, CreateLeave, RejectLeave};
use crate::api::shift::{AssignShift, CreateBreak, CreateShift, UpdateBreak};
use crate::model::{
    Break, Company, Employee, EmployeeShift, LeaveRequest, LeaveStatus, LeaveType, Shift,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Core API",
        version = "1.0.0",
        description = r#"
## HR administration backend

Leave-balance ledger and shift-scheduling engine.

### Key Features
- **Leave Management**
  - Submit requests against the employee's working-day balance
  - Approve/reject with a terminal three-state workflow
- **Shift Management**
  - Per-company shift definitions with overlap protection
  - Per-date assignments with double-booking protection
  - Break schedules nested inside shifts

### Response Format
- JSON-based RESTful responses
- Errors carry a `message` field; 404 = unknown entity, 400 = malformed
  input, 409 = business-rule conflict
"#,
    ),
    paths(
        crate::api::leave::submit_leave,
        crate::api::leave::approve_leave,
        crate::api::leave::reject_leave,
        crate::api::leave::leave_history,

        crate::api::shift::create_shift,
        crate::api::shift::update_shift,
        crate::api::shift::delete_shift,
        crate::api::shift::company_shifts,
        crate::api::shift::assign_shift,
        crate::api::shift::employee_assignments,
        crate::api::shift::create_break,
        crate::api::shift::shift_breaks,
        crate::api::shift::update_break,
        crate::api::shift::delete_break,
    ),
    components(schemas(
        CreateLeave,
        ApproveLeave,
        RejectLeave,
        CreateShift,
        AssignShift,
        CreateBreak,
        UpdateBreak,
        Company,
        Employee,
        LeaveType,
        LeaveStatus,
        LeaveRequest,
        Shift,
        EmployeeShift,
        Break,
    )),
    tags(
        (name = "Leave", description = "Leave requests and the approval workflow"),
        (name = "Shift", description = "Shift definitions and assignments"),
        (name = "Break", description = "Break schedules within shifts")
    )
)]
pub struct ApiDoc;
