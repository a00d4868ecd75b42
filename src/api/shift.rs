use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::error::HrmError;
use crate::model::{Break, EmployeeShift, Shift};

#[derive(Deserialize, ToSchema)]
pub struct CreateShift {
    #[schema(example = "Morning")]
    pub name: String,
    #[schema(example = "09:00:00", value_type = String)]
    pub start_time: NaiveTime,
    #[schema(example = "17:00:00", value_type = String)]
    pub end_time: NaiveTime,
    #[schema(example = 10)]
    pub company_id: u64,
}

#[derive(Deserialize, ToSchema)]
pub struct AssignShift {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 1)]
    pub shift_id: u64,
    #[schema(example = "2025-03-01", format = "date", value_type = String)]
    pub assigned_date: NaiveDate,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateBreak {
    #[schema(example = "Lunch")]
    pub name: String,
    #[schema(example = "12:00:00", value_type = String)]
    pub start_time: NaiveTime,
    #[schema(example = "12:30:00", value_type = String)]
    pub end_time: NaiveTime,
    /// Optional; computed from the time range when omitted.
    #[schema(example = 30)]
    pub duration_minutes: Option<u32>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateBreak {
    #[schema(example = "Lunch")]
    pub name: String,
    #[schema(example = "13:00:00", value_type = String)]
    pub start_time: NaiveTime,
    #[schema(example = "13:30:00", value_type = String)]
    pub end_time: NaiveTime,
    #[schema(example = 30)]
    pub duration_minutes: Option<u32>,
    #[schema(example = 1)]
    pub shift_id: u64,
}

/// Create a shift
#[utoipa::path(
    post,
    path = "/api/v1/shift",
    request_body = CreateShift,
    responses(
        (status = 200, description = "Shift created", body = Shift),
        (status = 404, description = "Company not found"),
        (status = 409, description = "Shift times overlap")
    ),
    tag = "Shift"
)]
pub async fn create_shift(
    state: web::Data<AppState>,
    payload: web::Json<CreateShift>,
) -> Result<HttpResponse, HrmError> {
    let payload = payload.into_inner();
    let shift = state
        .roster
        .create_shift(
            &payload.name,
            payload.start_time,
            payload.end_time,
            payload.company_id,
        )
        .await?;
    Ok(HttpResponse::Ok().json(shift))
}

/// Update a shift
#[utoipa::path(
    put,
    path = "/api/v1/shift/{id}",
    params(("id" = u64, Path, description = "Shift id")),
    request_body = CreateShift,
    responses(
        (status = 200, description = "Shift updated", body = Shift),
        (status = 404, description = "Shift or company not found"),
        (status = 409, description = "Shift times overlap")
    ),
    tag = "Shift"
)]
pub async fn update_shift(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<CreateShift>,
) -> Result<HttpResponse, HrmError> {
    let id = path.into_inner();
    let payload = payload.into_inner();
    let shift = state
        .roster
        .update_shift(
            id,
            &payload.name,
            payload.start_time,
            payload.end_time,
            payload.company_id,
        )
        .await?;
    Ok(HttpResponse::Ok().json(shift))
}

/// Delete a shift together with its assignments and breaks
#[utoipa::path(
    delete,
    path = "/api/v1/shift/{id}",
    params(("id" = u64, Path, description = "Shift id")),
    responses(
        (status = 200, description = "Shift deleted", body = Object, example = json!({
            "message": "Shift deleted"
        })),
        (status = 404, description = "Shift not found")
    ),
    tag = "Shift"
)]
pub async fn delete_shift(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, HrmError> {
    state.roster.delete_shift(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Shift deleted" })))
}

/// Shifts of a company
#[utoipa::path(
    get,
    path = "/api/v1/shift/company/{company_id}",
    params(("company_id" = u64, Path, description = "Company id")),
    responses(
        (status = 200, description = "Shifts of the company", body = [Shift]),
        (status = 404, description = "Company not found")
    ),
    tag = "Shift"
)]
pub async fn company_shifts(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, HrmError> {
    let shifts = state.roster.shifts_for_company(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(shifts))
}

/// Assign a shift to an employee on a date
#[utoipa::path(
    post,
    path = "/api/v1/shift/assign",
    request_body = AssignShift,
    responses(
        (status = 200, description = "Shift assigned", body = EmployeeShift),
        (status = 404, description = "Employee or shift not found"),
        (status = 409, description = "Already booked or company mismatch")
    ),
    tag = "Shift"
)]
pub async fn assign_shift(
    state: web::Data<AppState>,
    payload: web::Json<AssignShift>,
) -> Result<HttpResponse, HrmError> {
    let payload = payload.into_inner();
    let assignment = state
        .roster
        .assign_shift(payload.employee_id, payload.shift_id, payload.assigned_date)
        .await?;
    Ok(HttpResponse::Ok().json(assignment))
}

/// Shift assignments of an employee
#[utoipa::path(
    get,
    path = "/api/v1/shift/employee/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Assignments of the employee", body = [EmployeeShift]),
        (status = 404, description = "Employee not found")
    ),
    tag = "Shift"
)]
pub async fn employee_assignments(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, HrmError> {
    let assignments = state
        .roster
        .assignments_for_employee(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(assignments))
}

/// Add a break to a shift
#[utoipa::path(
    post,
    path = "/api/v1/shift/{id}/break",
    params(("id" = u64, Path, description = "Shift id")),
    request_body = CreateBreak,
    responses(
        (status = 200, description = "Break created", body = Break),
        (status = 400, description = "Break outside shift bounds or bad duration"),
        (status = 404, description = "Shift not found")
    ),
    tag = "Break"
)]
pub async fn create_break(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<CreateBreak>,
) -> Result<HttpResponse, HrmError> {
    let shift_id = path.into_inner();
    let payload = payload.into_inner();
    let brk = state
        .roster
        .create_break(
            &payload.name,
            payload.start_time,
            payload.end_time,
            payload.duration_minutes,
            shift_id,
        )
        .await?;
    Ok(HttpResponse::Ok().json(brk))
}

/// Breaks of a shift
#[utoipa::path(
    get,
    path = "/api/v1/shift/{id}/break",
    params(("id" = u64, Path, description = "Shift id")),
    responses(
        (status = 200, description = "Breaks of the shift", body = [Break]),
        (status = 404, description = "Shift not found")
    ),
    tag = "Break"
)]
pub async fn shift_breaks(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, HrmError> {
    let breaks = state.roster.breaks_for_shift(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(breaks))
}

/// Update a break
#[utoipa::path(
    put,
    path = "/api/v1/shift/break/{id}",
    params(("id" = u64, Path, description = "Break id")),
    request_body = UpdateBreak,
    responses(
        (status = 200, description = "Break updated", body = Break),
        (status = 400, description = "Break outside shift bounds or bad duration"),
        (status = 404, description = "Break or shift not found")
    ),
    tag = "Break"
)]
pub async fn update_break(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<UpdateBreak>,
) -> Result<HttpResponse, HrmError> {
    let id = path.into_inner();
    let payload = payload.into_inner();
    let brk = state
        .roster
        .update_break(
            id,
            &payload.name,
            payload.start_time,
            payload.end_time,
            payload.duration_minutes,
            payload.shift_id,
        )
        .await?;
    Ok(HttpResponse::Ok().json(brk))
}

/// Delete a break
#[utoipa::path(
    delete,
    path = "/api/v1/shift/break/{id}",
    params(("id" = u64, Path, description = "Break id")),
    responses(
        (status = 200, description = "Break deleted", body = Object, example = json!({
            "message": "Break deleted"
        })),
        (status = 404, description = "Break not found")
    ),
    tag = "Break"
)]
pub async fn delete_break(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, HrmError> {
    state.roster.delete_break(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Break deleted" })))
}
