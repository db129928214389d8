use chrono::NaiveDate;
use common::{DayWorkTime, OvertimeSummary, WorkingHoursReport};
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for expensive operations
    pub cache: Cache<String, CachedData>,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Overtime(OvertimeSummary),
    WorkingHours(WorkingHoursReport),
}

/// Query parameters for the employee list endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct EmployeeListQuery {
    /// Include archived employees in the listing (default: false)
    pub include_archived: Option<bool>,
}

/// Query parameters for the working-hours report
#[derive(Debug, Deserialize, ToSchema)]
pub struct WorkingHoursQuery {
    /// Start date (YYYY-MM-DD); omitted means the current day
    pub start_date: Option<NaiveDate>,
    /// End date (YYYY-MM-DD); omitted means the single day `start_date`
    pub end_date: Option<NaiveDate>,
}

/// Query parameters for the timesheet sheet list endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct SheetListQuery {
    /// Only sheets of this employee
    pub employee_id: Option<i32>,
    /// Include archived sheets in the listing (default: false)
    pub include_archived: Option<bool>,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service name
    pub service: String,
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::grant_role,
        crate::handlers::employees::create_employee,
        crate::handlers::employees::get_employees,
        crate::handlers::employees::get_employee,
        crate::handlers::employees::update_employee,
        crate::handlers::employees::delete_employee,
        crate::handlers::employees::get_employee_overtime,
        crate::handlers::employees::get_employee_overtime_access,
        crate::handlers::employees::get_employee_working_hours,
        crate::handlers::timesheet_sheets::create_timesheet_sheet,
        crate::handlers::timesheet_sheets::get_timesheet_sheets,
        crate::handlers::timesheet_sheets::get_timesheet_sheet,
        crate::handlers::timesheet_sheets::update_timesheet_sheet,
    ),
    components(
        schemas(
            ApiResponse<crate::handlers::users::UserResponse>,
            ApiResponse<crate::handlers::employees::EmployeeResponse>,
            ApiResponse<crate::handlers::employees::OvertimeAccessResponse>,
            ApiResponse<crate::handlers::timesheet_sheets::TimesheetSheetResponse>,
            ApiResponse<OvertimeSummary>,
            ApiResponse<WorkingHoursReport>,
            ErrorResponse,
            HealthResponse,
            EmployeeListQuery,
            WorkingHoursQuery,
            SheetListQuery,
            OvertimeSummary,
            WorkingHoursReport,
            DayWorkTime,
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::GrantRoleRequest,
            crate::handlers::users::UserResponse,
            crate::handlers::users::UserRoleResponse,
            crate::handlers::employees::CreateEmployeeRequest,
            crate::handlers::employees::UpdateEmployeeRequest,
            crate::handlers::employees::EmployeeResponse,
            crate::handlers::employees::OvertimeAccessResponse,
            crate::handlers::timesheet_sheets::CreateTimesheetSheetRequest,
            crate::handlers::timesheet_sheets::UpdateTimesheetSheetRequest,
            crate::handlers::timesheet_sheets::TimesheetSheetResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User and role management endpoints"),
        (name = "employees", description = "Employee record endpoints"),
        (name = "overtime", description = "Overtime tracking and working-hours endpoints"),
        (name = "timesheet-sheets", description = "Timesheet sheet intake endpoints"),
    ),
    info(
        title = "WorkRust API",
        description = "HR overtime tracker API - timesheet overtime totals, working hours and access control",
        version = "0.1.0",
        contact(
            name = "WorkRust Team",
            email = "contact@workrust.dev"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
