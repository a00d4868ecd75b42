use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::error::HrmError;
use crate::model::LeaveRequest;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "EMP-001")]
    pub employee_number: String,
    #[schema(example = 1)]
    pub leave_type_id: u64,
    #[schema(example = "2025-02-03", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2025-02-07", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "family visit")]
    pub note: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct ApproveLeave {
    #[schema(example = "EMP-001")]
    pub employee_number: String,
    #[schema(example = "2025-02-03", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "MGR-001")]
    pub approver_number: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RejectLeave {
    #[schema(example = "EMP-001")]
    pub employee_number: String,
    #[schema(example = "MGR-001")]
    pub approver_number: String,
    #[schema(example = "busy period")]
    pub manager_note: Option<String>,
}

/// Submit a leave request
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body = CreateLeave,
    responses(
        (status = 200, description = "Leave request submitted", body = LeaveRequest),
        (status = 400, description = "Invalid dates or leave type"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Overlapping request or insufficient balance")
    ),
    tag = "Leave"
)]
pub async fn submit_leave(
    state: web::Data<AppState>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, HrmError> {
    let payload = payload.into_inner();
    let request = state
        .ledger
        .submit_leave_request(
            &payload.employee_number,
            payload.leave_type_id,
            payload.start_date,
            payload.end_date,
            payload.note,
        )
        .await?;
    Ok(HttpResponse::Ok().json(request))
}

/// Approve a pending leave request
#[utoipa::path(
    put,
    path = "/api/v1/leave/approve",
    request_body = ApproveLeave,
    responses(
        (status = 200, description = "Leave approved", body = Object, example = json!({
            "message": "Leave approved"
        })),
        (status = 404, description = "Employee, approver, or request not found"),
        (status = 409, description = "Already processed or insufficient balance")
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    state: web::Data<AppState>,
    payload: web::Json<ApproveLeave>,
) -> Result<HttpResponse, HrmError> {
    let payload = payload.into_inner();
    state
        .ledger
        .approve_leave_request(
            &payload.employee_number,
            payload.start_date,
            &payload.approver_number,
        )
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Leave approved" })))
}

/// Reject the first pending leave request of an employee
#[utoipa::path(
    put,
    path = "/api/v1/leave/reject",
    request_body = RejectLeave,
    responses(
        (status = 200, description = "Leave rejected", body = Object, example = json!({
            "message": "Leave rejected"
        })),
        (status = 404, description = "Employee, approver, or pending request not found")
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    state: web::Data<AppState>,
    payload: web::Json<RejectLeave>,
) -> Result<HttpResponse, HrmError> {
    let payload = payload.into_inner();
    state
        .ledger
        .reject_leave_request(
            &payload.employee_number,
            &payload.approver_number,
            payload.manager_note,
        )
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Leave rejected" })))
}

/// Leave history of an employee
#[utoipa::path(
    get,
    path = "/api/v1/leave/{employee_number}",
    params(
        ("employee_number" = String, Path, description = "Business key of the employee")
    ),
    responses(
        (status = 200, description = "Leave requests of the employee", body = [LeaveRequest]),
        (status = 404, description = "Employee not found")
    ),
    tag = "Leave"
)]
pub async fn leave_history(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, HrmError> {
    let employee_number = path.into_inner();
    let requests = state.ledger.requests_for_employee(&employee_number).await?;
    Ok(HttpResponse::Ok().json(requests))
}
