use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::schemas::{ApiResponse, AppState, ErrorResponse, SheetListQuery};
use model::entities::{
    employee,
    timesheet_sheet::{self, SheetState},
};

/// Request body for creating a new timesheet sheet
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateTimesheetSheetRequest {
    /// Employee the sheet belongs to
    pub employee_id: i32,
    /// First day covered by the sheet
    pub date_start: NaiveDate,
    /// Last day covered by the sheet, inclusive
    pub date_end: NaiveDate,
    /// Overtime balance of the sheet in hours (defaults to 0)
    #[validate(range(min = -1000.0, max = 1000.0))]
    pub timesheet_overtime: Option<f64>,
    /// Review state: "new", "confirmed" or "done" (defaults to "new")
    pub state: Option<String>,
}

/// Request body for updating a timesheet sheet
///
/// The owning employee cannot be changed; sheets stay with the employee they
/// were created for.
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateTimesheetSheetRequest {
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    #[validate(range(min = -1000.0, max = 1000.0))]
    pub timesheet_overtime: Option<f64>,
    /// Review state: "new", "confirmed" or "done"
    pub state: Option<String>,
    /// Set to false to archive the sheet and drop it from overtime accrual
    pub active: Option<bool>,
}

/// Timesheet sheet response model
#[derive(Debug, Serialize, ToSchema)]
pub struct TimesheetSheetResponse {
    pub id: i32,
    pub employee_id: i32,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub timesheet_overtime: f64,
    pub state: String,
    pub active: bool,
}

impl From<timesheet_sheet::Model> for TimesheetSheetResponse {
    fn from(model: timesheet_sheet::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            date_start: model.date_start,
            date_end: model.date_end,
            timesheet_overtime: model.timesheet_overtime,
            state: format!("{:?}", model.state),
            active: model.active,
        }
    }
}

/// Parses a sheet state from its API string representation.
fn parse_sheet_state(state_str: &str) -> Option<SheetState> {
    match state_str.to_lowercase().as_str() {
        "new" => Some(SheetState::New),
        "confirmed" => Some(SheetState::Confirmed),
        "done" => Some(SheetState::Done),
        _ => None,
    }
}

fn invalid_sheet_state(state_str: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: format!(
                "Invalid sheet state '{}'. Valid states: new, confirmed, done",
                state_str
            ),
            code: "INVALID_SHEET_STATE".to_string(),
            success: false,
        }),
    )
}

/// Create a new timesheet sheet
#[utoipa::path(
    post,
    path = "/api/v1/timesheet-sheets",
    tag = "timesheet-sheets",
    request_body = CreateTimesheetSheetRequest,
    responses(
        (status = 201, description = "Timesheet sheet created successfully", body = ApiResponse<TimesheetSheetResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_timesheet_sheet(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateTimesheetSheetRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<TimesheetSheetResponse>>), (StatusCode, Json<ErrorResponse>)>
{
    trace!("Entering create_timesheet_sheet function");
    debug!(
        "Creating timesheet sheet for employee {} over [{}, {}]",
        request.employee_id, request.date_start, request.date_end
    );

    if request.date_end < request.date_start {
        warn!(
            "Sheet creation with inverted range [{}, {}]",
            request.date_start, request.date_end
        );
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!(
                    "date_end {} precedes date_start {}",
                    request.date_end, request.date_start
                ),
                code: "INVALID_DATE_RANGE".to_string(),
                success: false,
            }),
        ));
    }

    let sheet_state = match request.state.as_deref() {
        Some(state_str) => match parse_sheet_state(state_str) {
            Some(parsed) => parsed,
            None => {
                warn!("Invalid sheet state provided: {}", state_str);
                return Err(invalid_sheet_state(state_str));
            }
        },
        None => SheetState::New,
    };

    // The sheet must belong to an existing employee
    trace!("Validating employee ID: {}", request.employee_id);
    match employee::Entity::find_by_id(request.employee_id)
        .one(&state.db)
        .await
    {
        Ok(Some(_)) => {
            debug!("Employee {} validated successfully", request.employee_id);
        }
        Ok(None) => {
            warn!("Invalid employee ID provided: {}", request.employee_id);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Employee with id {} does not exist", request.employee_id),
                    code: "INVALID_EMPLOYEE_ID".to_string(),
                    success: false,
                }),
            ));
        }
        Err(db_error) => {
            error!(
                "Database error validating employee {}: {}",
                request.employee_id, db_error
            );
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while validating employee".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    }

    let new_sheet = timesheet_sheet::ActiveModel {
        employee_id: Set(request.employee_id),
        date_start: Set(request.date_start),
        date_end: Set(request.date_end),
        timesheet_overtime: Set(request.timesheet_overtime.unwrap_or(0.0)),
        state: Set(sheet_state),
        active: Set(true),
        ..Default::default()
    };

    trace!("Attempting to insert new timesheet sheet into database");
    match new_sheet.insert(&state.db).await {
        Ok(sheet_model) => {
            // A new sheet may change the employee's accrued overtime
            let cache_key = format!("overtime_{}", sheet_model.employee_id);
            state.cache.invalidate(&cache_key).await;
            trace!("Invalidated cache key: {}", cache_key);

            info!(
                "Timesheet sheet created successfully with ID: {} for employee {}",
                sheet_model.id, sheet_model.employee_id
            );
            let response = ApiResponse {
                data: TimesheetSheetResponse::from(sheet_model),
                message: "Timesheet sheet created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!(
                "Failed to create timesheet sheet for employee {}: {}",
                request.employee_id, db_error
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while creating timesheet sheet".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Get timesheet sheets
///
/// Optionally filtered to a single employee. Archived sheets are hidden
/// unless `include_archived=true` is passed.
#[utoipa::path(
    get,
    path = "/api/v1/timesheet-sheets",
    tag = "timesheet-sheets",
    params(
        ("employee_id" = Option<i32>, Query, description = "Only sheets of this employee"),
        ("include_archived" = Option<bool>, Query, description = "Include archived sheets"),
    ),
    responses(
        (status = 200, description = "Timesheet sheets retrieved successfully", body = ApiResponse<Vec<TimesheetSheetResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_timesheet_sheets(
    State(state): State<AppState>,
    Query(query): Query<SheetListQuery>,
) -> Result<Json<ApiResponse<Vec<TimesheetSheetResponse>>>, StatusCode> {
    trace!("Entering get_timesheet_sheets function");
    debug!(
        "Fetching timesheet sheets (employee_id: {:?}, include_archived: {:?})",
        query.employee_id, query.include_archived
    );

    let mut finder = timesheet_sheet::Entity::find();
    if let Some(employee_id) = query.employee_id {
        finder = finder.filter(timesheet_sheet::Column::EmployeeId.eq(employee_id));
    }
    if !query.include_archived.unwrap_or(false) {
        finder = finder.filter(timesheet_sheet::Column::Active.eq(true));
    }

    match finder.all(&state.db).await {
        Ok(sheets) => {
            let sheet_count = sheets.len();
            debug!("Retrieved {} timesheet sheets from database", sheet_count);

            let sheet_responses: Vec<TimesheetSheetResponse> = sheets
                .into_iter()
                .map(TimesheetSheetResponse::from)
                .collect();

            info!("Successfully retrieved {} timesheet sheets", sheet_count);
            let response = ApiResponse {
                data: sheet_responses,
                message: "Timesheet sheets retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve timesheet sheets from database: {}",
                db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific timesheet sheet by ID
#[utoipa::path(
    get,
    path = "/api/v1/timesheet-sheets/{sheet_id}",
    tag = "timesheet-sheets",
    params(
        ("sheet_id" = i32, Path, description = "Timesheet sheet ID"),
    ),
    responses(
        (status = 200, description = "Timesheet sheet retrieved successfully", body = ApiResponse<TimesheetSheetResponse>),
        (status = 404, description = "Timesheet sheet not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_timesheet_sheet(
    Path(sheet_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TimesheetSheetResponse>>, StatusCode> {
    trace!(
        "Entering get_timesheet_sheet function for sheet_id: {}",
        sheet_id
    );
    debug!("Fetching timesheet sheet with ID: {}", sheet_id);

    match timesheet_sheet::Entity::find_by_id(sheet_id)
        .one(&state.db)
        .await
    {
        Ok(Some(sheet_model)) => {
            info!("Successfully retrieved timesheet sheet with ID: {}", sheet_id);
            let response = ApiResponse {
                data: TimesheetSheetResponse::from(sheet_model),
                message: "Timesheet sheet retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Timesheet sheet with ID {} not found", sheet_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve timesheet sheet with ID {}: {}",
                sheet_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update a timesheet sheet
///
/// Covers overtime corrections, state transitions and archiving. Every
/// change invalidates the owning employee's cached overtime so the next
/// balance read recomputes.
#[utoipa::path(
    put,
    path = "/api/v1/timesheet-sheets/{sheet_id}",
    tag = "timesheet-sheets",
    params(
        ("sheet_id" = i32, Path, description = "Timesheet sheet ID"),
    ),
    request_body = UpdateTimesheetSheetRequest,
    responses(
        (status = 200, description = "Timesheet sheet updated successfully", body = ApiResponse<TimesheetSheetResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Timesheet sheet not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_timesheet_sheet(
    Path(sheet_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateTimesheetSheetRequest>>,
) -> Result<Json<ApiResponse<TimesheetSheetResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!(
        "Entering update_timesheet_sheet function for sheet_id: {}",
        sheet_id
    );

    let existing = match timesheet_sheet::Entity::find_by_id(sheet_id)
        .one(&state.db)
        .await
    {
        Ok(Some(sheet_model)) => sheet_model,
        Ok(None) => {
            warn!("Timesheet sheet with ID {} not found for update", sheet_id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Timesheet sheet with id {} does not exist", sheet_id),
                    code: "SHEET_NOT_FOUND".to_string(),
                    success: false,
                }),
            ));
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve timesheet sheet {} for update: {}",
                sheet_id, db_error
            );
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while updating timesheet sheet".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    // Validate the merged range before writing anything
    let merged_start = request.date_start.unwrap_or(existing.date_start);
    let merged_end = request.date_end.unwrap_or(existing.date_end);
    if merged_end < merged_start {
        warn!(
            "Sheet {} update would invert its range to [{}, {}]",
            sheet_id, merged_start, merged_end
        );
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("date_end {} precedes date_start {}", merged_end, merged_start),
                code: "INVALID_DATE_RANGE".to_string(),
                success: false,
            }),
        ));
    }

    let parsed_state = match request.state.as_deref() {
        Some(state_str) => match parse_sheet_state(state_str) {
            Some(parsed) => Some(parsed),
            None => {
                warn!("Invalid sheet state provided in update: {}", state_str);
                return Err(invalid_sheet_state(state_str));
            }
        },
        None => None,
    };

    let owning_employee_id = existing.employee_id;
    let mut active_sheet: timesheet_sheet::ActiveModel = existing.into();
    let mut updated_fields = Vec::new();

    if let Some(date_start) = request.date_start {
        active_sheet.date_start = Set(date_start);
        updated_fields.push("date_start");
    }
    if let Some(date_end) = request.date_end {
        active_sheet.date_end = Set(date_end);
        updated_fields.push("date_end");
    }
    if let Some(timesheet_overtime) = request.timesheet_overtime {
        active_sheet.timesheet_overtime = Set(timesheet_overtime);
        updated_fields.push("timesheet_overtime");
    }
    if let Some(sheet_state) = parsed_state {
        active_sheet.state = Set(sheet_state);
        updated_fields.push("state");
    }
    if let Some(active) = request.active {
        active_sheet.active = Set(active);
        updated_fields.push("active");
    }

    if updated_fields.is_empty() {
        debug!("No fields provided to update for sheet {}", sheet_id);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No fields provided to update".to_string(),
                code: "EMPTY_UPDATE".to_string(),
                success: false,
            }),
        ));
    }

    debug!(
        "Updating fields [{}] of timesheet sheet {}",
        updated_fields.join(", "),
        sheet_id
    );
    match active_sheet.update(&state.db).await {
        Ok(sheet_model) => {
            // Accrual inputs changed, drop the employee's cached balance
            let cache_key = format!("overtime_{}", owning_employee_id);
            state.cache.invalidate(&cache_key).await;
            trace!("Invalidated cache key: {}", cache_key);

            info!("Timesheet sheet {} updated successfully", sheet_id);
            let response = ApiResponse {
                data: TimesheetSheetResponse::from(sheet_model),
                message: "Timesheet sheet updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!(
                "Failed to update timesheet sheet {}: {}",
                sheet_id, db_error
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while updating timesheet sheet".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}
